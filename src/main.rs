mod app;
mod state;
mod ui;

use app::CrabAgeApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 760.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Crab Age Prediction",
        options,
        Box::new(|_cc| Ok(Box::new(CrabAgeApp::default()))),
    )
}
