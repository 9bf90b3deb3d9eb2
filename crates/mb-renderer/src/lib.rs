//! Markdown processing pipeline for Markbase.
//!
//! Turns a raw markdown document into its stored form: frontmatter
//! attributes, rendered HTML, and the untouched raw text.
//!
//! # Pipeline
//!
//! The rendering pipeline is fixed and configured once, when the
//! [`ContentProcessor`] is constructed:
//!
//! 1. Extract the leading `---` frontmatter block (YAML)
//! 2. Parse the remaining body with pulldown-cmark
//! 3. Render the event stream to HTML, injecting slug `id` attributes into
//!    headings and prepending a self-link anchor to each
//! 4. Serialize to an HTML string
//!
//! Processing is a pure function of the input text; there is no per-call
//! configuration.
//!
//! # Example
//!
//! ```ignore
//! use mb_renderer::ContentProcessor;
//!
//! let processor = ContentProcessor::new();
//! let processed = processor.process("---\nroute: guide\n---\n# Guide")?;
//! assert_eq!(processed.attributes["route"], "guide");
//! assert!(processed.rendered.contains(r#"<h1 id="guide">"#));
//! ```

mod frontmatter;
mod heading;
mod processor;
mod renderer;

pub use frontmatter::Attributes;
pub use processor::{ContentProcessor, ProcessError, ProcessedContent};
