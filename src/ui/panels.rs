use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crab_age::data::measurement::{Sex, FIELDS};
use crab_age::data::pipeline::PredictionBreakdown;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – field descriptions
// ---------------------------------------------------------------------------

/// Render the left help panel.
pub fn side_panel(ui: &mut Ui) {
    ui.heading("Measurements");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for spec in &FIELDS {
                ui.label(RichText::new(spec.label).strong().italics());
                ui.label(format!("{} (in {}).", spec.description, spec.unit));
                ui.add_space(6.0);
            }
        });
}

// ---------------------------------------------------------------------------
// Central panel – input form and result
// ---------------------------------------------------------------------------

/// Render the input grid, the Predict button and the last result.
pub fn form_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Model");
    ui.separator();

    // Sex selector first, then the seven numeric fields, two per row.
    egui::Grid::new("measurement_grid")
        .num_columns(4)
        .spacing([16.0, 8.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("Gender");
            egui::ComboBox::from_id_salt("sex")
                .selected_text(state.form.sex.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for sex in Sex::ALL {
                        ui.selectable_value(&mut state.form.sex, sex, sex.label());
                    }
                });

            for (i, spec) in FIELDS.iter().enumerate() {
                // Sex occupies the first cell.
                if i % 2 == 1 {
                    ui.end_row();
                }
                ui.label(format!("{} ({})", spec.label, spec.unit));
                ui.add(
                    egui::DragValue::new(state.form.get_mut(spec.field))
                        .range(spec.min..=spec.max)
                        .speed(spec.step)
                        .max_decimals(4),
                );
            }
            ui.end_row();
        });

    ui.add_space(10.0);

    let predict = egui::Button::new(RichText::new("Predict").strong())
        .fill(Color32::from_rgb(200, 70, 60));
    if ui.add_sized([ui.available_width(), 32.0], predict).clicked() {
        state.run_prediction();
    }

    if let Some(breakdown) = &state.prediction {
        ui.add_space(10.0);
        egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
            ui.heading("Crab Age (months):");
            ui.heading(RichText::new(format!("{:.2}", breakdown.age_months)).strong());
        });

        ui.add_space(10.0);
        ui.collapsing("Features", |ui: &mut Ui| {
            feature_table(ui, breakdown);
        });
    }
}

/// Table of the engineered features behind the last prediction.
fn feature_table(ui: &mut Ui, breakdown: &PredictionBreakdown) {
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(140.0))
        .columns(Column::auto().at_least(80.0), 2)
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in ["Feature", "Value", "Scaled", "Contribution"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for row in breakdown.rows() {
                body.row(18.0, |mut cells| {
                    cells.col(|ui: &mut Ui| {
                        ui.label(row.name);
                    });
                    cells.col(|ui: &mut Ui| {
                        ui.monospace(format!("{:.4}", row.raw));
                    });
                    cells.col(|ui: &mut Ui| {
                        ui.monospace(format!("{:.4}", row.scaled));
                    });
                    cells.col(|ui: &mut Ui| {
                        ui.monospace(format!("{:+.4}", row.contribution));
                    });
                });
            }
            body.row(18.0, |mut cells| {
                cells.col(|ui: &mut Ui| {
                    ui.label("intercept");
                });
                cells.col(|_ui: &mut Ui| {});
                cells.col(|_ui: &mut Ui| {});
                cells.col(|ui: &mut Ui| {
                    ui.monospace(format!("{:+.4}", breakdown.intercept));
                });
            });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open scaler…").clicked() {
                if let Some(path) = pick_artifact("Open min-max scaler") {
                    state.set_scaler_path(path);
                }
                ui.close_menu();
            }
            if ui.button("Open model…").clicked() {
                if let Some(path) = pick_artifact("Open linear model") {
                    state.set_model_path(path);
                }
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Predict CSV…").clicked() {
                batch_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if state.resources.is_some() {
            ui.label(format!(
                "Artifacts: {} · {}",
                state.paths.scaler.display(),
                state.paths.model.display()
            ));
        } else {
            ui.label("Artifacts not loaded");
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                ui.visuals().text_color()
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

fn pick_artifact(title: &str) -> Option<std::path::PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter("JSON artifact", &["json"])
        .pick_file()
}

fn batch_dialog(state: &mut AppState) {
    let Some(input) = rfd::FileDialog::new()
        .set_title("Open crab measurements")
        .add_filter("CSV", &["csv"])
        .pick_file()
    else {
        return;
    };
    let Some(output) = rfd::FileDialog::new()
        .set_title("Save predictions")
        .add_filter("CSV", &["csv"])
        .set_file_name("predictions.csv")
        .save_file()
    else {
        return;
    };
    state.run_batch(&input, &output);
}
