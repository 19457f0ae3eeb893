// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model for ROI annotations and study files.

pub mod annotation;
pub mod study;
