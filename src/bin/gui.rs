// src/bin/gui.rs
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]
use filmarks_badge::gui;
use eframe::egui::ViewportBuilder;

fn main() {
    if let Err(e) = filmarks_badge::log::init(log::LevelFilter::Info, false) {
        eprintln!("Logger unavailable: {e}");
    }

    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_title("Filmarks Badge Preview")
            .with_inner_size([640.0, 360.0]),
        ..Default::default()
    };

    if let Err(e) = gui::run(options) {
        eprintln!("GUI failed: {}", e);
        std::process::exit(1);
    }
}
