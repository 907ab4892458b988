mod core;
mod gui;
mod hotkeys;
mod video;

use std::path::PathBuf;

use eframe::egui;
use gui::EzyGrabApp;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Zero or one positional argument: the video to open. With none, the
    // app falls back to a file picker.
    let video_file = std::env::args().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 600.0])
            .with_title("Ezy Grab - Single-Key Clip Grabber"),
        ..Default::default()
    };

    eframe::run_native(
        "Ezy Grab",
        options,
        Box::new(move |cc| match EzyGrabApp::new(cc, video_file) {
            Ok(app) => Ok(Box::new(app)),
            Err(e) => {
                eprintln!("Failed to initialize app: {}", e);
                std::process::exit(1);
            }
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
