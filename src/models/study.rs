// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Study file data.
//!
//! A study ties an image file to its annotation set for import/export.
//! The editor engine never sees this type; it only matters at the I/O
//! boundary.

use super::annotation::RoiAnnotation;
use serde::{Deserialize, Serialize};

/// Complete study data for serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyData {
    pub image_file: String,
    pub image_width: u32,
    pub image_height: u32,
    pub rois: Vec<RoiAnnotation>,
}

impl StudyData {
    /// Create a new study for the given image file and dimensions.
    pub fn new(image_file: String, image_width: u32, image_height: u32) -> Self {
        Self {
            image_file,
            image_width,
            image_height,
            rois: Vec::new(),
        }
    }
}
