//! Frontmatter extraction.
//!
//! Splits a leading `---` fenced YAML block from a markdown document.
//! Uses serde_yaml for correct handling of all YAML value styles
//! (quoted strings, block scalars `|`/`>`, nested values).

use std::collections::BTreeMap;

use serde_json::Value;

/// Frontmatter key/value mapping.
///
/// Values carry through as JSON so nested YAML (lists, maps, numbers)
/// survives storage and the wire unchanged.
pub type Attributes = BTreeMap<String, Value>;

/// Error from frontmatter parsing.
#[derive(Debug, thiserror::Error)]
pub(crate) enum FrontmatterError {
    /// Opening `---` fence without a closing one.
    #[error("frontmatter block is not terminated")]
    Unterminated,
    /// The block is not a valid YAML mapping.
    #[error("invalid frontmatter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Split a document into frontmatter attributes and the markdown body.
///
/// A document that does not open with a `---` fence line has no
/// frontmatter: the attributes are empty and the whole input is the body.
/// An opened but unterminated block, or a block that is not a YAML
/// mapping with string keys, is an error.
pub(crate) fn split(raw: &str) -> Result<(Attributes, &str), FrontmatterError> {
    let Some(rest) = strip_fence_line(raw) else {
        return Ok((Attributes::new(), raw));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if is_fence(line) {
            let block = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((parse_block(block)?, body));
        }
        offset += line.len();
    }

    Err(FrontmatterError::Unterminated)
}

/// Strip the opening fence line, returning the remainder.
fn strip_fence_line(raw: &str) -> Option<&str> {
    raw.strip_prefix("---\n")
        .or_else(|| raw.strip_prefix("---\r\n"))
}

/// Whether a line (with or without its trailing newline) is a `---` fence.
fn is_fence(line: &str) -> bool {
    line.trim_end_matches(['\r', '\n']) == "---"
}

/// Parse the fenced block as a YAML mapping.
fn parse_block(block: &str) -> Result<Attributes, FrontmatterError> {
    if block.trim().is_empty() {
        return Ok(Attributes::new());
    }
    Ok(serde_yaml::from_str(block)?)
}
