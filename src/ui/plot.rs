use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Plot};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Contribution chart (right panel)
// ---------------------------------------------------------------------------

/// Horizontal bar per feature: `coefficient · scaled value` of the last
/// prediction, positive bars pushing the age up.
pub fn contribution_chart(ui: &mut Ui, state: &AppState) {
    ui.heading("Contributions");
    ui.separator();

    let breakdown = match &state.prediction {
        Some(b) => b,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label("Press Predict to see how each feature moves the estimate.");
            });
            return;
        }
    };

    // First feature at the top.
    let bars: Vec<Bar> = breakdown
        .rows()
        .enumerate()
        .map(|(i, row)| {
            let color = if row.contribution >= 0.0 {
                Color32::from_rgb(80, 160, 220)
            } else {
                Color32::from_rgb(220, 100, 80)
            };
            Bar::new(-(i as f64), row.contribution)
                .name(row.name)
                .fill(color)
                .width(0.8)
        })
        .collect();

    Plot::new("contribution_plot")
        .x_axis_label("Months")
        .show_axes([true, false])
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}
