// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! ROI list panel.
//!
//! Side panel listing every region with its derived measurements and the
//! aggregate burden. Mutations are reported back as actions; the panel
//! itself never touches the engine.

use crate::models::annotation::{RoiAnnotation, RoiId};

/// Result of panel interaction.
pub enum PanelAction {
    None,
    SelectRoi(RoiId),
    DeleteRoi(RoiId),
}

/// Display the ROI list and measurement summary.
pub fn show(
    ui: &mut egui::Ui,
    rois: &[RoiAnnotation],
    total_burden: f64,
    selected: Option<RoiId>,
) -> PanelAction {
    let mut action = PanelAction::None;

    ui.heading("Regions");
    ui.separator();

    if rois.is_empty() {
        ui.label(egui::RichText::new("No regions yet").weak());
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for roi in rois {
            let is_selected = Some(roi.id) == selected;
            ui.horizontal(|ui| {
                let title = if roi.confirmed {
                    roi.label.clone()
                } else {
                    format!("{} (proposed)", roi.label)
                };
                if ui.selectable_label(is_selected, title).clicked() {
                    action = PanelAction::SelectRoi(roi.id);
                }
                if ui.small_button("🗑").clicked() {
                    action = PanelAction::DeleteRoi(roi.id);
                }
            });
            ui.label(
                egui::RichText::new(format!(
                    "  {} pts · {:.1} mm · intensity {:.0}",
                    roi.point_count(),
                    roi.measurements.length_mm,
                    roi.measurements.mean_intensity,
                ))
                .weak(),
            );
            ui.add_space(4.0);
        }
    });

    ui.separator();
    ui.label(format!("Regions: {}", rois.len()));
    ui.label(
        egui::RichText::new(format!("Total burden: {total_burden:.1} mm")).strong(),
    );

    action
}
