// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the LESIONMARK application.

pub mod canvas;
pub mod panel;
pub mod toolbar;
