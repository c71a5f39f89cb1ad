// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: media loading, meme export and config files.

pub mod export;
pub mod media;
pub mod serialization;
