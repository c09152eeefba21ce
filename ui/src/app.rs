use chrono::Utc;

use crate::pages::{GeneratorPanel, ScannerPanel, generator_page, scanner_page};
use crate::{state::State, widgets};

/// The two top-level tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Generate,
    Scan,
}

impl Tab {
    pub fn label(self) -> &'static str {
        match self {
            Tab::Generate => "Generate",
            Tab::Scan => "Scan",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Tab::Generate => "▦",
            Tab::Scan => "📷",
        }
    }
}

pub struct QrVerseApp {
    state: State,
    tab: Tab,
}

impl QrVerseApp {
    /// Called once before the first frame.
    pub fn new(mut state: State) -> Self {
        open_panel(&mut state, Tab::Generate);
        Self {
            state,
            tab: Tab::Generate,
        }
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// Drops the current panel (and with it any camera) and starts the
    /// other one from scratch.
    pub fn switch_tab(&mut self, tab: Tab) {
        if tab == self.tab {
            return;
        }
        close_panel(&mut self.state, self.tab);
        log::debug!("switching tab {:?} -> {tab:?}", self.tab);
        self.tab = tab;
        open_panel(&mut self.state, tab);
    }
}

fn open_panel(state: &mut State, tab: Tab) {
    let config = state.config();
    match tab {
        Tab::Generate => state.ctx.add_state(GeneratorPanel::new(
            state.runtime.clone(),
            config.default_size(),
        )),
        Tab::Scan => {
            let opener = state.platform.camera.opener(config.camera());
            state
                .ctx
                .add_state(ScannerPanel::start(opener, config.scan_interval()));
        }
    }
}

fn close_panel(state: &mut State, tab: Tab) {
    match tab {
        Tab::Generate => drop(state.ctx.remove_state::<GeneratorPanel>()),
        Tab::Scan => drop(state.ctx.remove_state::<ScannerPanel>()),
    }
}

impl eframe::App for QrVerseApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.notices.expire(Utc::now());

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            if let Some(tab) = widgets::header(ui, self.tab) {
                self.switch_tab(tab);
            }
        });

        egui::TopBottomPanel::bottom("bottom_panel").show(ctx, widgets::footer);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match self.tab {
                Tab::Generate => generator_page(&mut self.state, ui),
                Tab::Scan => scanner_page(&mut self.state, ui),
            });
        });

        widgets::notice_toasts(ctx, &self.state.notices);
        if !self.state.notices.is_empty() {
            // Keep ticking so toasts disappear on time.
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }
    }
}
