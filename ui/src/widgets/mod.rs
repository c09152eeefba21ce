mod footer;
mod header;
mod notices;
mod qr_preview;
mod viewfinder;

pub use footer::footer;
pub use header::header;
pub use notices::notice_toasts;
pub use qr_preview::qr_preview;
pub use viewfinder::viewfinder;
