// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file loading (images and videos).
//!
//! This module classifies uploaded files by MIME type, and loads
//! background images from local files or remote template URLs into
//! RGBA buffers ready for compositing.

use image::{ImageFormat, RgbaImage};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Extensions offered in the browse dialog.
pub const BROWSE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff", "mp4", "webm", "mov", "mkv", "avi",
];

const VIDEO_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("m4v", "video/mp4"),
    ("webm", "video/webm"),
    ("mov", "video/quicktime"),
    ("mkv", "video/x-matroska"),
    ("avi", "video/x-msvideo"),
];

/// Errors raised while classifying or loading media.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("unsupported media type {mime:?}")]
    UnsupportedType { mime: Option<String> },
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("video backgrounds need the `video-opencv` feature: {0}")]
    VideoUnsupported(PathBuf),
    #[error("failed to read video frame: {0}")]
    Video(String),
    #[error("loader stopped before finishing")]
    Interrupted,
}

/// Broad kind of an accepted upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a MIME type by its `image/` or `video/` prefix.
    pub fn from_mime(mime: &str) -> Option<Self> {
        if mime.starts_with("image/") {
            Some(MediaKind::Image)
        } else if mime.starts_with("video/") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

/// Where a background image comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MediaLocator {
    Url(String),
    File(PathBuf),
}

impl MediaLocator {
    /// `http://` and `https://` strings are URLs, anything else a path.
    pub fn parse(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            MediaLocator::Url(s.to_string())
        } else {
            MediaLocator::File(PathBuf::from(s))
        }
    }
}

impl fmt::Display for MediaLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaLocator::Url(url) => f.write_str(url),
            MediaLocator::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A user-provided file accepted as background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    pub locator: MediaLocator,
    pub kind: MediaKind,
}

/// Guess the MIME type of a file from its extension.
pub fn mime_type(path: &Path) -> Option<String> {
    if let Ok(format) = ImageFormat::from_path(path) {
        return Some(format.to_mime_type().to_string());
    }
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    VIDEO_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| mime.to_string())
}

/// Accept a file as background media if it is an image or a video.
pub fn classify_upload(path: &Path) -> Result<UploadedMedia, MediaError> {
    let mime = mime_type(path);
    let kind = mime
        .as_deref()
        .and_then(MediaKind::from_mime)
        .ok_or(MediaError::UnsupportedType { mime })?;

    Ok(UploadedMedia {
        locator: MediaLocator::File(path.to_path_buf()),
        kind,
    })
}

/// Pick the upload from a set of dropped or browsed files.
///
/// Only the first file is considered; if it is not an image or video the
/// whole drop is ignored without feedback.
pub fn first_upload(paths: &[PathBuf]) -> Option<UploadedMedia> {
    let path = paths.first()?;
    match classify_upload(path) {
        Ok(media) => Some(media),
        Err(e) => {
            log::debug!("Ignoring {}: {}", path.display(), e);
            None
        }
    }
}

/// Load a background image into RGBA pixels.
///
/// Videos yield their first frame. Animated images yield their first
/// frame as decoded by the `image` crate.
pub fn load_background(locator: &MediaLocator, timeout: Duration) -> Result<RgbaImage, MediaError> {
    match locator {
        MediaLocator::Url(url) => fetch_image(url, timeout),
        MediaLocator::File(path) => {
            let kind = mime_type(path).as_deref().and_then(MediaKind::from_mime);
            match kind {
                Some(MediaKind::Video) => load_video_first_frame(path),
                _ => load_image(path),
            }
        }
    }
}

/// Load an image file from disk.
pub fn load_image(path: &Path) -> Result<RgbaImage, MediaError> {
    let img = image::open(path)?.to_rgba8();
    log::info!("Loaded image: {} ({}x{})", path.display(), img.width(), img.height());
    Ok(img)
}

fn fetch_image(url: &str, timeout: Duration) -> Result<RgbaImage, MediaError> {
    let fetch_err = |source| MediaError::Fetch { url: url.to_string(), source };

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(fetch_err)?;
    let bytes = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.bytes())
        .map_err(fetch_err)?;

    let img = image::load_from_memory(&bytes)?.to_rgba8();
    log::info!("Fetched image: {} ({}x{})", url, img.width(), img.height());
    Ok(img)
}

#[cfg(feature = "video-opencv")]
fn load_video_first_frame(path: &Path) -> Result<RgbaImage, MediaError> {
    use opencv::{core::Mat, imgproc, prelude::*, videoio};

    let video_err = |e: opencv::Error| MediaError::Video(e.to_string());

    let file = path.to_string_lossy();
    let mut capture = videoio::VideoCapture::from_file(&file, videoio::CAP_ANY).map_err(video_err)?;
    let mut frame = Mat::default();
    if !capture.read(&mut frame).map_err(video_err)? || frame.empty() {
        return Err(MediaError::Video(format!("no frames in {}", path.display())));
    }

    let mut rgba = Mat::default();
    imgproc::cvt_color(&frame, &mut rgba, imgproc::COLOR_BGR2RGBA, 0).map_err(video_err)?;

    let width = rgba.cols() as u32;
    let height = rgba.rows() as u32;
    let bytes = rgba.data_bytes().map_err(video_err)?.to_vec();
    log::info!("Loaded first video frame: {} ({}x{})", path.display(), width, height);

    RgbaImage::from_raw(width, height, bytes)
        .ok_or_else(|| MediaError::Video("frame buffer size mismatch".to_string()))
}

#[cfg(not(feature = "video-opencv"))]
fn load_video_first_frame(path: &Path) -> Result<RgbaImage, MediaError> {
    Err(MediaError::VideoUnsupported(path.to_path_buf()))
}
