//! Front matter extraction: split off and parse the YAML block.
//!
//! A document looks like:
//!
//! ```text
//! ---
//! title: "User Manual"
//! id: "UM-001"
//! revision: 2
//! ---
//! # Introduction
//! …
//! ```
//!
//! Splitting on the literal `---\n` delimiter keeps the behaviour simple and
//! predictable: anything before the first delimiter is ignored, the first
//! delimited segment must parse as a YAML mapping, and the rest of the
//! document is re-joined verbatim (a markdown body may legitimately contain
//! further `---` thematic breaks).

use crate::error::Md2TexError;
use serde_yaml::{Mapping, Value};
use tracing::debug;

const DELIMITER: &str = "---\n";

/// Parsed front matter: a read-only mapping of string keys to YAML values.
///
/// Typed accessors surface missing required keys as
/// [`Md2TexError::MissingFrontMatterKey`] at the point of use, so a document
/// without a `title` fails when the title block is spliced, not during
/// parsing.
#[derive(Debug, Clone)]
pub struct FrontMatter {
    map: Mapping,
}

impl FrontMatter {
    /// The document title. Required.
    pub fn title(&self) -> Result<String, Md2TexError> {
        self.required_scalar("title")
    }

    /// The document identifier, e.g. "DOC-1". Required.
    pub fn id(&self) -> Result<String, Md2TexError> {
        self.required_scalar("id")
    }

    /// The revision, rendered as a string ("2", "1.4", "draft"). Optional.
    pub fn revision(&self) -> Option<String> {
        self.map.get("revision").and_then(scalar_to_string)
    }

    /// Raw access to any front-matter value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    fn required_scalar(&self, key: &'static str) -> Result<String, Md2TexError> {
        let value = self
            .map
            .get(key)
            .ok_or(Md2TexError::MissingFrontMatterKey { key })?;
        scalar_to_string(value).ok_or_else(|| Md2TexError::InvalidFrontMatter {
            reason: format!("key '{key}' must be a scalar value"),
        })
    }
}

/// Split `raw` into its markdown body and parsed front matter.
///
/// Fails when fewer than two `---` delimiter lines are present or when the
/// first delimited segment is not a YAML mapping.
pub fn extract(raw: &str) -> Result<(String, FrontMatter), Md2TexError> {
    let parts: Vec<&str> = raw.split(DELIMITER).collect();
    if parts.len() < 3 {
        return Err(Md2TexError::InvalidFrontMatter {
            reason: "expected a block delimited by two '---' lines at the start of the document"
                .into(),
        });
    }

    let front_matter_str = parts[1];
    let body = parts[2..].join(DELIMITER);

    let value: Value =
        serde_yaml::from_str(front_matter_str).map_err(|e| Md2TexError::InvalidFrontMatter {
            reason: format!("improperly formatted YAML: {e}"),
        })?;

    let map = match value {
        Value::Mapping(map) => map,
        other => {
            return Err(Md2TexError::InvalidFrontMatter {
                reason: format!("expected a key/value mapping, got {}", yaml_kind(&other)),
            })
        }
    };

    debug!(keys = map.len(), "extracted front matter");
    Ok((body, FrontMatter { map }))
}

/// Render a YAML scalar as the string LaTeX will see.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn yaml_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
