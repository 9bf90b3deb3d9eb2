//! Content processing pipeline.
//!
//! [`ContentProcessor`] combines frontmatter extraction and HTML rendering
//! into the single entry point the update coordinator and the parse
//! endpoint call. The pipeline configuration is built once at construction
//! and never changes afterwards; share one instance process-wide.

use pulldown_cmark::{Options, Parser};
use serde::{Deserialize, Serialize};

use crate::frontmatter::{self, Attributes};
use crate::renderer::HtmlRenderer;

/// Result of processing a raw markdown document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessedContent {
    /// Frontmatter key/value mapping.
    pub attributes: Attributes,
    /// Rendered HTML derived from the body.
    pub rendered: String,
    /// Original input, unchanged.
    pub raw: String,
}

/// Error from content processing.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// The frontmatter block is malformed.
    #[error("malformed frontmatter: {0}")]
    Frontmatter(String),
    /// The markdown pipeline failed to render the body.
    #[error("markdown rendering failed: {0}")]
    Render(String),
}

/// Fixed markdown-to-HTML processing pipeline.
///
/// Construct once at startup and share (e.g. via `Arc`); `process` is a
/// pure function of its input.
pub struct ContentProcessor {
    options: Options,
}

impl ContentProcessor {
    /// Create a processor with the fixed pipeline configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS,
        }
    }

    /// Process a raw markdown document into its stored form.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::Frontmatter`] for a malformed frontmatter
    /// block and [`ProcessError::Render`] if the rendering pipeline fails.
    pub fn process(&self, raw: &str) -> Result<ProcessedContent, ProcessError> {
        let (attributes, body) =
            frontmatter::split(raw).map_err(|e| ProcessError::Frontmatter(e.to_string()))?;

        let parser = Parser::new_ext(body, self.options);
        let rendered = HtmlRenderer::new()
            .render(parser)
            .map_err(|e| ProcessError::Render(e.to_string()))?;

        Ok(ProcessedContent {
            attributes,
            rendered,
            raw: raw.to_owned(),
        })
    }
}

impl Default for ContentProcessor {
    fn default() -> Self {
        Self::new()
    }
}
