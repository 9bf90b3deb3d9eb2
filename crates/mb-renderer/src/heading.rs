//! Heading tracking and slug generation.
//!
//! Headings buffer their inline content during event processing so the
//! opening tag can be written once the slug id is known. Duplicate slugs
//! on a page are disambiguated with a numeric suffix.

use std::collections::HashMap;

/// State for the heading currently being rendered.
pub(crate) struct HeadingState {
    /// Current heading level (None if not inside a heading).
    current_level: Option<u8>,
    /// Buffer for heading plain text (slug input).
    text: String,
    /// Buffer for heading HTML (with inline formatting).
    html: String,
    /// Counter for generating unique heading ids.
    id_counts: HashMap<String, usize>,
}

impl HeadingState {
    pub(crate) fn new() -> Self {
        Self {
            current_level: None,
            text: String::new(),
            html: String::new(),
            id_counts: HashMap::new(),
        }
    }

    /// Whether we're currently inside a heading.
    pub(crate) fn is_active(&self) -> bool {
        self.current_level.is_some()
    }

    /// Start tracking a heading.
    pub(crate) fn start(&mut self, level: u8) {
        self.current_level = Some(level);
        self.text.clear();
        self.html.clear();
    }

    /// Complete the heading, returning `(level, id, html)`.
    pub(crate) fn complete(&mut self) -> Option<(u8, String, String)> {
        let level = self.current_level.take()?;
        let text = std::mem::take(&mut self.text);
        let html = std::mem::take(&mut self.html);
        let id = self.generate_id(&text);
        Some((level, id, html))
    }

    /// Generate a unique id for a heading.
    fn generate_id(&mut self, text: &str) -> String {
        let base_id = slugify(text);
        let count = self.id_counts.entry(base_id.clone()).or_default();
        let id = match *count {
            0 => base_id,
            n => format!("{base_id}-{n}"),
        };
        *count += 1;
        id
    }

    /// Append plain text to the slug buffer.
    pub(crate) fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Append HTML to the content buffer.
    pub(crate) fn push_html(&mut self, html: &str) {
        self.html.push_str(html);
    }

    /// Get the heading HTML buffer reference.
    pub(crate) fn html_buffer(&mut self) -> &mut String {
        &mut self.html
    }
}

/// Convert heading text to a URL-safe slug.
///
/// Converts to lowercase, replaces whitespace/dashes/underscores with
/// single dashes, and removes other non-alphanumeric characters.
pub(crate) fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true; // Prevents leading dash

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("What's New?"), "whats-new");
        assert_eq!(slugify("  Spaces  "), "spaces");
        assert_eq!(slugify("Multiple   Spaces"), "multiple-spaces");
        assert_eq!(slugify("kebab-case"), "kebab-case");
        assert_eq!(slugify("snake_case"), "snake-case");
    }

    #[test]
    fn test_heading_lifecycle() {
        let mut state = HeadingState::new();
        assert!(!state.is_active());

        state.start(2);
        assert!(state.is_active());
        state.push_text("Section Title");
        state.push_html("Section Title");

        let (level, id, html) = state.complete().unwrap();
        assert_eq!(level, 2);
        assert_eq!(id, "section-title");
        assert_eq!(html, "Section Title");
        assert!(!state.is_active());
    }

    #[test]
    fn test_complete_outside_heading() {
        let mut state = HeadingState::new();
        assert!(state.complete().is_none());
    }

    #[test]
    fn test_duplicate_ids_get_suffix() {
        let mut state = HeadingState::new();

        for expected in ["faq", "faq-1", "faq-2"] {
            state.start(2);
            state.push_text("FAQ");
            let (_, id, _) = state.complete().unwrap();
            assert_eq!(id, expected);
        }
    }
}
