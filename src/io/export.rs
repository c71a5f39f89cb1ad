// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Delivery of finished memes.
//!
//! A rendered meme is encoded as PNG and handed to one of the delivery
//! channels: a file download, or the share sequence (share sheet, then
//! clipboard, then a fallback download). Channels sit behind traits so
//! platforms without a share sheet or clipboard degrade cleanly.

use image::{ImageFormat, RgbaImage};
use std::borrow::Cow;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const PNG_MIME: &str = "image/png";

pub const SHARE_TITLE: &str = "Check out my meme!";
pub const SHARE_TEXT: &str = "Made with Meme Creator";

pub const DOWNLOAD_SUCCESS: &str = "🎉 Meme downloaded successfully!";
pub const DOWNLOAD_FAILURE: &str = "Failed to download meme";
pub const SHARE_FAILURE: &str = "Failed to share meme";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{0} is not available on this platform")]
    Unsupported(&'static str),
    #[error("export cancelled")]
    Cancelled,
    #[error("failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),
    #[error("clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A rendered meme and its PNG encoding.
pub struct EncodedMeme {
    pub image: RgbaImage,
    pub png: Vec<u8>,
}

impl EncodedMeme {
    pub fn encode(image: RgbaImage) -> Result<Self, ExportError> {
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(Self { image, png })
    }
}

/// What gets handed to a share sheet.
#[derive(Debug, Clone, Copy)]
pub struct SharePayload<'a> {
    pub title: &'a str,
    pub text: &'a str,
    pub file_name: &'a str,
    pub mime: &'a str,
    pub bytes: &'a [u8],
}

/// A native share sheet.
pub trait ShareSheet {
    /// Whether files of `mime` type can be shared.
    fn can_share(&self, mime: &str) -> bool;
    fn share(&mut self, payload: &SharePayload<'_>) -> Result<(), ExportError>;
}

/// Desktop platforms have no portable share sheet.
pub struct UnsupportedShareSheet;

impl ShareSheet for UnsupportedShareSheet {
    fn can_share(&self, _mime: &str) -> bool {
        false
    }

    fn share(&mut self, _payload: &SharePayload<'_>) -> Result<(), ExportError> {
        Err(ExportError::Unsupported("share sheet"))
    }
}

/// Somewhere an image can be copied to.
pub trait ImageClipboard {
    fn copy_image(&mut self, image: &RgbaImage) -> Result<(), ExportError>;
}

/// The OS clipboard.
pub struct SystemClipboard;

impl ImageClipboard for SystemClipboard {
    fn copy_image(&mut self, image: &RgbaImage) -> Result<(), ExportError> {
        // arboard wants ImageData { width, height, bytes } in RGBA order.
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.set_image(arboard::ImageData {
            width: image.width() as usize,
            height: image.height() as usize,
            bytes: Cow::Borrowed(image.as_raw()),
        })?;
        Ok(())
    }
}

/// Destination for downloaded files.
pub trait FileSink {
    /// Save `bytes` under (a path derived from) `file_name`.
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError>;
}

/// Ask the user where to save, with `file_name` pre-filled.
pub struct SaveDialog;

impl FileSink for SaveDialog {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
        let path = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(file_name)
            .save_file()
            .ok_or(ExportError::Cancelled)?;
        write_file(&path, bytes)?;
        Ok(path)
    }
}

/// Save straight into a directory without asking.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl FileSink for DirectorySink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| ExportError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.dir.join(file_name);
        write_file(&path, bytes)?;
        Ok(path)
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    std::fs::write(path, bytes).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Which share step delivered the meme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    CopiedToClipboard,
    DownloadedAsFallback(PathBuf),
}

impl ShareOutcome {
    /// Notification text for the user.
    pub fn message(&self) -> &'static str {
        match self {
            ShareOutcome::Shared => "🚀 Meme shared successfully!",
            ShareOutcome::CopiedToClipboard => "📋 Meme copied to clipboard!",
            ShareOutcome::DownloadedAsFallback(_) => "📥 Meme downloaded as fallback!",
        }
    }
}

/// Delivers encoded memes through the configured channels.
pub struct Exporter {
    share_sheet: Box<dyn ShareSheet>,
    clipboard: Box<dyn ImageClipboard>,
    files: Box<dyn FileSink>,
    download_file_name: String,
    share_file_name: String,
}

impl Exporter {
    pub fn new(
        share_sheet: Box<dyn ShareSheet>,
        clipboard: Box<dyn ImageClipboard>,
        files: Box<dyn FileSink>,
        download_file_name: impl Into<String>,
        share_file_name: impl Into<String>,
    ) -> Self {
        Self {
            share_sheet,
            clipboard,
            files,
            download_file_name: download_file_name.into(),
            share_file_name: share_file_name.into(),
        }
    }

    /// Save the meme under the download file name.
    pub fn download(&mut self, meme: &EncodedMeme) -> Result<PathBuf, ExportError> {
        let path = self.files.save(&self.download_file_name, &meme.png)?;
        log::info!("Downloaded meme to {}", path.display());
        Ok(path)
    }

    /// Share sheet, else clipboard, else a download of the same PNG.
    ///
    /// Each step runs only when the previous one is unavailable or fails.
    /// An error means even the fallback download failed.
    pub fn share(&mut self, meme: &EncodedMeme) -> Result<ShareOutcome, ExportError> {
        if self.share_sheet.can_share(PNG_MIME) {
            let payload = SharePayload {
                title: SHARE_TITLE,
                text: SHARE_TEXT,
                file_name: &self.share_file_name,
                mime: PNG_MIME,
                bytes: &meme.png,
            };
            match self.share_sheet.share(&payload) {
                Ok(()) => {
                    log::info!("Shared meme via share sheet");
                    return Ok(ShareOutcome::Shared);
                }
                Err(e) => log::warn!("Share sheet failed, trying clipboard: {}", e),
            }
        } else {
            log::debug!("No share sheet for {}, trying clipboard", PNG_MIME);
        }

        match self.clipboard.copy_image(&meme.image) {
            Ok(()) => {
                log::info!("Copied meme to clipboard");
                return Ok(ShareOutcome::CopiedToClipboard);
            }
            Err(e) => log::warn!("Clipboard copy failed, falling back to download: {}", e),
        }

        let path = self.files.save(&self.share_file_name, &meme.png)?;
        log::info!("Downloaded meme to {} as share fallback", path.display());
        Ok(ShareOutcome::DownloadedAsFallback(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Calls {
        shared: Vec<(String, String, String, usize)>,
        copied: usize,
    }

    struct FakeShareSheet {
        supported: bool,
        fail: bool,
        calls: Rc<RefCell<Calls>>,
    }

    impl ShareSheet for FakeShareSheet {
        fn can_share(&self, mime: &str) -> bool {
            self.supported && mime == PNG_MIME
        }

        fn share(&mut self, payload: &SharePayload<'_>) -> Result<(), ExportError> {
            if self.fail {
                return Err(ExportError::Cancelled);
            }
            self.calls.borrow_mut().shared.push((
                payload.title.to_string(),
                payload.text.to_string(),
                payload.file_name.to_string(),
                payload.bytes.len(),
            ));
            Ok(())
        }
    }

    struct FakeClipboard {
        available: bool,
        calls: Rc<RefCell<Calls>>,
    }

    impl ImageClipboard for FakeClipboard {
        fn copy_image(&mut self, _image: &RgbaImage) -> Result<(), ExportError> {
            if !self.available {
                return Err(ExportError::Unsupported("clipboard"));
            }
            self.calls.borrow_mut().copied += 1;
            Ok(())
        }
    }

    struct FailingSink;

    impl FileSink for FailingSink {
        fn save(&mut self, _file_name: &str, _bytes: &[u8]) -> Result<PathBuf, ExportError> {
            Err(ExportError::Cancelled)
        }
    }

    fn meme() -> EncodedMeme {
        EncodedMeme::encode(RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255]))).unwrap()
    }

    fn exporter(
        share: (bool, bool),
        clipboard: bool,
        files: Box<dyn FileSink>,
    ) -> (Exporter, Rc<RefCell<Calls>>) {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let exporter = Exporter::new(
            Box::new(FakeShareSheet { supported: share.0, fail: share.1, calls: Rc::clone(&calls) }),
            Box::new(FakeClipboard { available: clipboard, calls: Rc::clone(&calls) }),
            files,
            "my-awesome-meme.png",
            "meme.png",
        );
        (exporter, calls)
    }

    #[test]
    fn test_encode_produces_png() {
        let meme = meme();
        assert_eq!(&meme.png[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&meme.png).unwrap().to_rgba8();
        assert_eq!(decoded, meme.image);
    }

    #[test]
    fn test_download_uses_download_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let (mut exporter, _) = exporter((false, false), false, Box::new(DirectorySink::new(dir.path())));

        let path = exporter.download(&meme()).unwrap();
        assert_eq!(path, dir.path().join("my-awesome-meme.png"));
        assert_eq!(std::fs::read(path).unwrap(), meme().png);
    }

    #[test]
    fn test_share_prefers_share_sheet() {
        let (mut exporter, calls) = exporter((true, false), true, Box::new(FailingSink));

        assert_eq!(exporter.share(&meme()).unwrap(), ShareOutcome::Shared);
        let calls = calls.borrow();
        assert_eq!(calls.shared.len(), 1);
        assert_eq!(calls.shared[0].0, SHARE_TITLE);
        assert_eq!(calls.shared[0].1, SHARE_TEXT);
        assert_eq!(calls.shared[0].2, "meme.png");
        assert_eq!(calls.copied, 0);
    }

    #[test]
    fn test_failed_share_falls_through_to_clipboard() {
        let (mut exporter, calls) = exporter((true, true), true, Box::new(FailingSink));

        let outcome = exporter.share(&meme()).unwrap();
        assert_eq!(outcome, ShareOutcome::CopiedToClipboard);
        assert_eq!(outcome.message(), "📋 Meme copied to clipboard!");
        assert_eq!(calls.borrow().copied, 1);
    }

    #[test]
    fn test_no_share_or_clipboard_downloads_as_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let (mut exporter, calls) = exporter((false, false), false, Box::new(DirectorySink::new(dir.path())));

        let outcome = exporter.share(&meme()).unwrap();
        assert_eq!(outcome, ShareOutcome::DownloadedAsFallback(dir.path().join("meme.png")));
        assert_eq!(outcome.message(), "📥 Meme downloaded as fallback!");
        assert_ne!(outcome.message(), ShareOutcome::Shared.message());
        assert!(calls.borrow().shared.is_empty());
        assert!(dir.path().join("meme.png").exists());
    }

    #[test]
    fn test_total_share_failure_is_an_error() {
        let (mut exporter, _) = exporter((false, false), false, Box::new(FailingSink));
        assert!(exporter.share(&meme()).is_err());
    }

    #[test]
    fn test_unsupported_share_sheet() {
        let mut sheet = UnsupportedShareSheet;
        assert!(!sheet.can_share(PNG_MIME));
        let payload = SharePayload { title: "", text: "", file_name: "", mime: PNG_MIME, bytes: &[] };
        assert!(sheet.share(&payload).is_err());
    }
}
