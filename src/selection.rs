//! SelectionState - the chosen source image and the requested block width.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::resource::{HandleRole, ObjectUrl, ResourceLifecycle};

/// Block width used until the user enters a valid one.
pub const DEFAULT_BLOCK_WIDTH: i64 = 64;

/// Smallest width the numeric control suggests.
pub const MIN_BLOCK_WIDTH: i64 = 1;

/// Largest width the numeric control suggests.
pub const MAX_BLOCK_WIDTH: i64 = 512;

/// Extensions the file picker offers, lowercase.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Content types accepted for a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    Png,
    Jpeg,
}

impl ImageMime {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMime::Png => "image/png",
            ImageMime::Jpeg => "image/jpeg",
        }
    }

    /// Map a declared mime type onto the accepted set.
    pub fn from_mime_str(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(ImageMime::Png),
            "image/jpeg" | "image/jpg" => Some(ImageMime::Jpeg),
            _ => None,
        }
    }

    /// Map a file extension (without dot, any case) onto the accepted set.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageMime::Png),
            "jpg" | "jpeg" => Some(ImageMime::Jpeg),
            _ => None,
        }
    }
}

impl fmt::Display for ImageMime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An image chosen by the user. Cloning shares the underlying bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    file_name: String,
    mime: ImageMime,
    bytes: Arc<[u8]>,
}

impl SourceImage {
    pub fn new(file_name: impl Into<String>, mime: ImageMime, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            file_name: file_name.into(),
            mime,
            bytes: bytes.into(),
        }
    }

    /// Acquire an image from disk, applying the picker's type filter.
    pub fn from_path(path: &Path) -> Result<Self, SelectionError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| SelectionError::MissingFileName(path.to_path_buf()))?
            .to_string();

        let mime = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ImageMime::from_extension)
            .ok_or_else(|| SelectionError::UnsupportedType {
                path: path.to_path_buf(),
            })?;

        let bytes = std::fs::read(path).map_err(|e| SelectionError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(Self::new(file_name, mime, bytes))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime(&self) -> ImageMime {
        self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Number of horizontal blocks in the converted image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockWidth(i64);

impl BlockWidth {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(&self) -> i64 {
        self.0
    }

    /// Numeric coercion of raw user input.
    ///
    /// Accepts anything that parses as a finite number (`"64"`, `" 12 "`,
    /// `"1e2"`, `"12.9"`). Fractions truncate toward zero. Empty input and
    /// non-finite results yield `None`.
    pub fn coerce(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let value: f64 = trimmed.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        Some(Self(value.trunc() as i64))
    }

    /// Whether the value lies in the range the numeric control suggests.
    pub fn in_hint_range(&self) -> bool {
        (MIN_BLOCK_WIDTH..=MAX_BLOCK_WIDTH).contains(&self.0)
    }
}

impl Default for BlockWidth {
    fn default() -> Self {
        Self(DEFAULT_BLOCK_WIDTH)
    }
}

impl fmt::Display for BlockWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What to do with a width outside the hint range at submit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum WidthPolicy {
    /// Send the value as held; the service decides.
    #[default]
    PassThrough,
    /// Clamp into the hint range before sending.
    Clamp,
    /// Refuse to send and report the range.
    Reject,
}

impl WidthPolicy {
    /// Resolve the width to send, or the message to fail with.
    pub fn apply(&self, width: BlockWidth) -> Result<BlockWidth, String> {
        match self {
            WidthPolicy::PassThrough => Ok(width),
            WidthPolicy::Clamp => Ok(BlockWidth(width.0.clamp(MIN_BLOCK_WIDTH, MAX_BLOCK_WIDTH))),
            WidthPolicy::Reject if width.in_hint_range() => Ok(width),
            WidthPolicy::Reject => Err(format!(
                "Block width must be between {} and {}, got {}",
                MIN_BLOCK_WIDTH, MAX_BLOCK_WIDTH, width
            )),
        }
    }
}

/// The currently selected image and block width.
#[derive(Debug, Default)]
pub struct SelectionState {
    image: Option<SourceImage>,
    width: BlockWidth,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_width(width: BlockWidth) -> Self {
        Self { image: None, width }
    }

    /// Replace the selected image and mint its preview.
    ///
    /// `None` is a no-op and returns `None`. Otherwise the new preview
    /// handle is returned.
    pub fn select_file(
        &mut self,
        candidate: Option<SourceImage>,
        resources: &mut ResourceLifecycle,
    ) -> Option<ObjectUrl> {
        candidate.map(|image| self.select(image, resources))
    }

    /// Replace the selected image unconditionally. The previous preview is
    /// released by `resources` after the new one is assigned.
    pub fn select(&mut self, image: SourceImage, resources: &mut ResourceLifecycle) -> ObjectUrl {
        let preview = resources.replace(HandleRole::Preview, image.bytes().to_vec());
        log::info!(
            "Selected {} ({}, {} bytes)",
            image.file_name(),
            image.mime(),
            image.len()
        );
        self.image = Some(image);
        preview
    }

    /// Coerce raw input into the block width. Input that is not a finite
    /// number leaves the current width untouched.
    pub fn set_block_width(&mut self, raw: &str) -> BlockWidth {
        match BlockWidth::coerce(raw) {
            Some(width) => self.width = width,
            None => log::debug!("Ignoring non-numeric width input {:?}", raw),
        }
        self.width
    }

    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    pub fn block_width(&self) -> BlockWidth {
        self.width
    }
}

/// Errors raised while acquiring a source image.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("Failed to read image '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unsupported image type '{}' (expected PNG, JPG or JPEG)", path.display())]
    UnsupportedType { path: PathBuf },

    #[error("Path '{}' has no usable file name", .0.display())]
    MissingFileName(PathBuf),
}
