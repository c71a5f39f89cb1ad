// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the meme editor.

pub mod canvas;
pub mod notifications;
pub mod properties;
pub mod templates;
pub mod toolbar;
