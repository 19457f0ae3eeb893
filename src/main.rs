// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! LESIONMARK - Lesion ROI annotation and measurement
//!
//! A desktop application for drawing, adjusting and measuring polygonal
//! regions of interest over static medical images, and for reviewing
//! machine-proposed regions.

mod app;
mod engine;
mod io;
mod models;
mod ui;
mod util;

use anyhow::Result;
use app::LesionmarkApp;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("LESIONMARK - Lesion ROI annotation"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "LESIONMARK",
        options,
        Box::new(|_cc| Ok(Box::new(LesionmarkApp::new()))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
