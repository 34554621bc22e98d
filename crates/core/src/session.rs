//! The document session state machine.

use crate::error::SessionError;
use crate::selector::PageSelector;
use lopdf::{Document, ObjectId};
use signet_pdf_composer::{ComposerError, embed_image, page_ids, stamp_image};
use signet_render::render_page;
use signet_types::{Raster, Rect};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No document loaded.
    Unopened,
    /// A document is loaded and has not been modified.
    Opened,
    /// At least one signature was applied since the last save.
    Signed,
    /// The in-memory document was written out and has not changed since.
    Saved,
}

#[derive(Debug)]
struct OpenDocument {
    doc: Document,
    source: PathBuf,
    pages: Vec<ObjectId>,
}

/// One opened document and the signatures applied to it.
///
/// All edits happen in memory. The source file is only read by
/// [`open`](Self::open), and files are only written by [`save`](Self::save).
#[derive(Debug)]
pub struct DocumentSession {
    document: Option<OpenDocument>,
    state: SessionState,
}

impl Default for DocumentSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentSession {
    pub fn new() -> Self {
        Self {
            document: None,
            state: SessionState::Unopened,
        }
    }

    /// Opens a session on `path` in one step.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let mut session = Self::new();
        session.open(path)?;
        Ok(session)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.document.is_some()
    }

    /// Number of pages of the open document.
    pub fn page_count(&self) -> Result<usize, SessionError> {
        Ok(self.current()?.pages.len())
    }

    /// The file the open document was loaded from.
    pub fn source_path(&self) -> Option<&Path> {
        self.document.as_ref().map(|d| d.source.as_path())
    }

    /// The in-memory document, including applied signatures.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref().map(|d| &d.doc)
    }

    /// Loads a document, replacing any open one.
    ///
    /// On failure the current session, open or not, is left as it was.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let path = path.as_ref();
        let doc = Document::load(path).map_err(|source| SessionError::OpenFailure {
            path: path.to_path_buf(),
            source,
        })?;
        let pages = page_ids(&doc);
        log::info!("Opened {} ({} page(s))", path.display(), pages.len());

        if let Some(previous) = &self.document {
            log::debug!("Discarding {}", previous.source.display());
        }
        self.document = Some(OpenDocument {
            doc,
            source: path.to_path_buf(),
            pages,
        });
        self.state = SessionState::Opened;
        Ok(())
    }

    /// Stamps `raster` into `rect` on every selected page.
    ///
    /// The selection and placement are checked up front and the pages are
    /// stamped on a copy, so any failure leaves the document unchanged. The
    /// raster is embedded once and shared by all stamped pages. Returns the number of pages
    /// stamped; a document without pages is left as is.
    pub fn apply_signature(
        &mut self,
        raster: &Raster,
        rect: Rect,
        pages: &PageSelector,
    ) -> Result<usize, SessionError> {
        let open = self.document.as_mut().ok_or(SessionError::NotOpen)?;
        let indices = pages.resolve(open.pages.len())?;
        if !rect.has_area() {
            return Err(ComposerError::InvalidPlacement(rect).into());
        }
        if indices.is_empty() {
            log::info!("No pages selected; nothing to stamp");
            return Ok(0);
        }

        // Stamp a copy and commit it only once every page succeeded.
        let mut doc = open.doc.clone();
        let image = embed_image(&mut doc, raster)?;
        for &index in &indices {
            log::debug!("Stamping page {} at {}", index, rect);
            stamp_image(&mut doc, open.pages[index], &image, rect)?;
        }
        open.doc = doc;

        log::info!(
            "Applied {}x{} signature to {} page(s)",
            raster.width(),
            raster.height(),
            indices.len()
        );
        self.state = SessionState::Signed;
        Ok(indices.len())
    }

    /// Writes the in-memory document, overlays included, to `path`.
    ///
    /// The file is written next to its destination and moved into place, so
    /// saving over the source document never leaves it half written. The
    /// session stays open and can be signed and saved again.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let path = path.as_ref();
        let open = self.document.as_mut().ok_or(SessionError::NotOpen)?;
        let save_failure = |source: lopdf::Error| SessionError::SaveFailure {
            path: path.to_path_buf(),
            source,
        };

        let mut bytes = Vec::new();
        open.doc
            .save_to(&mut bytes)
            .map_err(lopdf::Error::from)
            .map_err(save_failure)?;
        write_atomically(path, &bytes)
            .map_err(lopdf::Error::from)
            .map_err(save_failure)?;

        log::info!("Saved {} ({} bytes)", path.display(), bytes.len());
        self.state = SessionState::Saved;
        Ok(())
    }

    /// Renders a preview of one page, applied signatures included.
    pub fn render_page(&self, index: usize, dpi: f32) -> Result<Raster, SessionError> {
        let open = self.current()?;
        let page_id = *open
            .pages
            .get(index)
            .ok_or(SessionError::PageIndexOutOfRange {
                index,
                count: open.pages.len(),
            })?;
        Ok(render_page(&open.doc, page_id, dpi)?)
    }

    /// Discards the open document without saving.
    pub fn close(&mut self) {
        if let Some(open) = self.document.take() {
            log::info!("Closed {}", open.source.display());
        }
        self.state = SessionState::Unopened;
    }

    fn current(&self) -> Result<&OpenDocument, SessionError> {
        self.document.as_ref().ok_or(SessionError::NotOpen)
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
