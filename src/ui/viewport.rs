use crate::constant::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};

pub fn build_viewport() -> eframe::NativeOptions {
    eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT])
            .with_min_inner_size([720.0, 480.0])
            .with_resizable(true),
        ..Default::default()
    }
}
