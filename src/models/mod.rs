// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data models for the meme editor.

pub mod editor;
pub mod template;
pub mod text_element;
