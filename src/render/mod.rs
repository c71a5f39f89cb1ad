// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Rendering of the meme: compositing, text rasterization and
//! off-thread render results.

pub mod compositor;
pub mod deferred;
pub mod text;
