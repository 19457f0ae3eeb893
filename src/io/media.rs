// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image loading and display adjustment.
//!
//! Decodes raster images to RGBA8 for texture upload and applies the
//! session's display LUT (brightness/contrast/invert). The LUT only ever
//! runs on a copy of the decoded pixels; stored geometry and the source
//! image are untouched.

use crate::engine::view::ViewState;
use anyhow::Result;
use std::path::Path;

/// A decoded image ready for texture upload.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major.
    pub pixels: Vec<u8>,
}

/// Load and decode an image file to RGBA8.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let img = image::open(path)?.to_rgba8();
    let (width, height) = img.dimensions();
    Ok(LoadedImage {
        width,
        height,
        pixels: img.into_raw(),
    })
}

/// Apply brightness/contrast/invert to a copy of the pixel buffer.
///
/// Contrast pivots around mid-gray, brightness is an additive shift, and
/// invert flips the result. Alpha passes through.
pub fn apply_display_lut(pixels: &[u8], view: &ViewState) -> Vec<u8> {
    let lut: Vec<u8> = (0..=255u16)
        .map(|v| {
            let x = v as f32 / 255.0;
            let mut y = (x - 0.5) * view.contrast + 0.5 + view.brightness;
            if view.invert {
                y = 1.0 - y;
            }
            (y.clamp(0.0, 1.0) * 255.0).round() as u8
        })
        .collect();

    let mut out = pixels.to_vec();
    for px in out.chunks_exact_mut(4) {
        px[0] = lut[px[0] as usize];
        px[1] = lut[px[1] as usize];
        px[2] = lut[px[2] as usize];
    }
    out
}
