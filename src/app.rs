use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CrabAgeApp {
    pub state: AppState,
}

impl Default for CrabAgeApp {
    fn default() -> Self {
        let mut state = AppState::default();
        state.preload();
        Self { state }
    }
}

impl eframe::App for CrabAgeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: field descriptions ----
        egui::SidePanel::left("help_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui);
            });

        // ---- Right side panel: contribution chart ----
        egui::SidePanel::right("chart_panel")
            .default_width(360.0)
            .resizable(true)
            .show(ctx, |ui| {
                plot::contribution_chart(ui, &self.state);
            });

        // ---- Central panel: form, result, feature table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::form_panel(ui, &mut self.state);
        });
    }
}
