use std::any::Any;

/// A value that can be stored in a [`StateCtx`](crate::StateCtx).
///
/// Each type is stored at most once; the type itself is the key.
pub trait State: Any {
    /// Short name used in log lines.
    const TYPE: &'static str = "state";
}
