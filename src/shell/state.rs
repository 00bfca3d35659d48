//! Shell - composes selection, resources and submissions behind the
//! user-facing affordances.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::i18n::{Language, Strings};
use crate::resource::{HandleRole, ObjectUrl, ResourceLifecycle};
use crate::selection::{BlockWidth, SelectionError, SelectionState, SourceImage};
use crate::submission::{Completion, Submission, SubmissionController, SubmissionStatus};

/// File name the converted image is saved under.
pub const DOWNLOAD_FILE_NAME: &str = "minecraft.png";

/// The interactive session state. All mutation goes through the owned
/// components; the shell only decides which affordances are enabled.
#[derive(Debug)]
pub struct Shell {
    selection: SelectionState,
    resources: ResourceLifecycle,
    controller: SubmissionController,
    language: Language,
}

impl Shell {
    pub fn new(controller: SubmissionController, width: BlockWidth, language: Language) -> Self {
        Self {
            selection: SelectionState::with_width(width),
            resources: ResourceLifecycle::new(),
            controller,
            language,
        }
    }

    /// Open the file at `path` through the picker filter and select it.
    pub fn pick_file(&mut self, path: &Path) -> Result<ObjectUrl, ShellError> {
        self.ensure_picker_enabled()?;
        let image = SourceImage::from_path(path)?;
        let preview = self.selection.select(image, &mut self.resources);
        self.controller.clear_error();
        Ok(preview)
    }

    /// Select an already acquired image. A new selection clears any
    /// displayed error. Dismissing the picker (`None`) changes nothing.
    pub fn select(&mut self, candidate: Option<SourceImage>) -> Result<Option<ObjectUrl>, ShellError> {
        self.ensure_picker_enabled()?;
        let Some(preview) = self.selection.select_file(candidate, &mut self.resources) else {
            return Ok(None);
        };
        self.controller.clear_error();
        Ok(Some(preview))
    }

    fn ensure_picker_enabled(&self) -> Result<(), ShellError> {
        if self.controller.status().is_in_flight() {
            return Err(ShellError::Busy);
        }
        Ok(())
    }

    pub fn edit_width(&mut self, raw: &str) -> BlockWidth {
        self.selection.set_block_width(raw)
    }

    /// Trigger the submit affordance. Does nothing while it is disabled.
    pub fn submit(&mut self) -> Option<Submission> {
        if !self.submit_enabled() {
            return None;
        }
        self.controller
            .submit(self.selection.image(), self.selection.block_width())
    }

    pub fn on_completion(&mut self, completion: Completion) -> Option<ObjectUrl> {
        self.controller.complete(completion, &mut self.resources)
    }

    /// Save the active result as `minecraft.png` inside `dir`.
    pub fn download(&self, dir: &Path) -> Result<PathBuf, ShellError> {
        let bytes = self
            .resources
            .active_bytes(HandleRole::Result)
            .ok_or(ShellError::NoResult)?;

        std::fs::create_dir_all(dir).map_err(|e| ShellError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let dest = dir.join(DOWNLOAD_FILE_NAME);
        std::fs::write(&dest, bytes).map_err(|e| ShellError::Io {
            path: dest.clone(),
            source: e,
        })?;
        log::info!("Saved result to {}", dest.display());
        Ok(dest)
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn status(&self) -> &SubmissionStatus {
        self.controller.status()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn resources(&self) -> &ResourceLifecycle {
        &self.resources
    }

    fn submit_enabled(&self) -> bool {
        self.selection.image().is_some() && !self.controller.status().is_in_flight()
    }

    /// Snapshot of what the user currently sees.
    pub fn view(&self) -> ShellView {
        let strings = self.language.strings();
        let in_flight = self.controller.status().is_in_flight();
        let has_image = self.selection.image().is_some();

        ShellView {
            strings,
            language: self.language,
            file_name: self.selection.image().map(|i| i.file_name().to_string()),
            preview: self.resources.active(HandleRole::Preview).cloned(),
            block_width: self.selection.block_width(),
            picker_enabled: !in_flight,
            submit_enabled: self.submit_enabled(),
            submit_label: if in_flight {
                strings.converting
            } else {
                strings.convert
            },
            submit_hint: if has_image {
                None
            } else {
                Some(strings.select_first)
            },
            error: self.controller.status().failure_reason().map(str::to_string),
            result: self.resources.active(HandleRole::Result).cloned(),
        }
    }

    /// End the session, releasing every handle still alive.
    pub fn teardown(&mut self) {
        self.resources.release_all();
    }
}

/// What the interface shows at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellView {
    pub strings: &'static Strings,
    pub language: Language,
    pub file_name: Option<String>,
    pub preview: Option<ObjectUrl>,
    pub block_width: BlockWidth,
    pub picker_enabled: bool,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
    pub submit_hint: Option<&'static str>,
    pub error: Option<String>,
    pub result: Option<ObjectUrl>,
}

impl fmt::Display for ShellView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.strings;
        writeln!(f, "== {} [{}] ==", s.title, self.language)?;

        match (&self.file_name, &self.preview) {
            (Some(name), Some(url)) => writeln!(f, "  {}: {} ({})", s.upload, name, url)?,
            _ => writeln!(f, "  {} ({})", s.choose_image, s.accepted_types)?,
        }

        writeln!(f, "  {}: {}", s.blocks_label, self.block_width)?;

        let state = if self.submit_enabled { s.ready } else { s.disabled };
        match self.submit_hint {
            Some(hint) => writeln!(f, "  [{}] {} - {}", self.submit_label, state, hint)?,
            None => writeln!(f, "  [{}] {}", self.submit_label, state)?,
        }

        if let Some(error) = &self.error {
            writeln!(f, "  ! {}", error)?;
        }

        if let Some(url) = &self.result {
            writeln!(f, "  => {} [{}: {}]", url, s.download, DOWNLOAD_FILE_NAME)?;
        }

        Ok(())
    }
}

/// Errors surfaced by shell affordances.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("A conversion is in progress")]
    Busy,

    #[error("No converted image to download yet")]
    NoResult,

    #[error("Failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
