// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Study data serialization and deserialization.
//!
//! This module handles exporting and importing study data (image
//! reference plus annotation set) in YAML and JSON formats. Imported
//! ROIs re-enter the editor through the annotation store, which assigns
//! fresh ids, so file ids are informational only.

use crate::models::study::StudyData;
use anyhow::Result;
use std::path::Path;

/// Export study data to YAML format.
pub fn export_yaml(data: &StudyData, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(data)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export study data to JSON format.
pub fn export_json(data: &StudyData, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Import study data from YAML format.
pub fn import_yaml(path: &Path) -> Result<StudyData> {
    let yaml = std::fs::read_to_string(path)?;
    let data = serde_yaml::from_str(&yaml)?;
    Ok(data)
}

/// Import study data from JSON format.
pub fn import_json(path: &Path) -> Result<StudyData> {
    let json = std::fs::read_to_string(path)?;
    let data = serde_json::from_str(&json)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::{Point, RoiAnnotation, RoiKind};

    #[test]
    fn test_json_round_trip() {
        let mut study = StudyData::new("scan_042.png".to_string(), 512, 512);
        study.rois.push(RoiAnnotation::draft(
            RoiKind::Rect,
            vec![
                Point::new(10.0, 10.0),
                Point::new(50.0, 10.0),
                Point::new(50.0, 40.0),
                Point::new(10.0, 40.0),
            ],
            "finding 1".to_string(),
            false,
        ));

        let dir = std::env::temp_dir();
        let path = dir.join("lesionmark_test_study.json");
        export_json(&study, &path).unwrap();
        let back = import_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(back.image_file, study.image_file);
        assert_eq!(back.rois.len(), 1);
        assert_eq!(back.rois[0].points, study.rois[0].points);
        assert!(!back.rois[0].confirmed);
    }
}
