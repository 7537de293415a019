//! Pattern parsing and expansion.
//!
//! Syntax:
//! - Literal text is copied as-is. `\` is normalized to `/`.
//! - `{A ?? B ?? 'C'}` is a placeholder with a fallback chain, tried left to right:
//!   - `Guid` yields a fresh random UUID,
//!   - `'text'` yields `text` verbatim,
//!   - anything else is a tag reference resolved against the file's tags.
//! - Values of placeholders followed by another `/` are directory names and are
//!   passed through [`clean`]; values in the final file name are inserted unchanged.
//! - The expanded path is trimmed of leading/trailing separators.

use dicom_core::Tag;
use uuid::Uuid;

use super::sanitize::clean;
use super::tag::parse_tag;
use crate::dataset::TagStore;
use crate::errors::{PatternError, TagParseError};

/// Canonical separator of expanded paths.
pub const SEPARATOR: char = '/';
const ALT_SEPARATOR: char = '\\';
const FALLBACK: &str = "??";
/// Alternative that produces a new random identifier on every expansion.
pub const FRESH_ID: &str = "Guid";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Alternative {
    FreshId,
    Constant(String),
    /// Tag text is resolved once here; an unparsable reference only fails a file
    /// when the chain actually reaches it.
    Tag {
        text: String,
        tag: Result<Tag, TagParseError>,
    },
}

impl Alternative {
    fn parse(token: &str) -> Self {
        if token == FRESH_ID {
            Alternative::FreshId
        } else if token.starts_with('\'') && token.ends_with('\'') {
            Alternative::Constant(token.trim_matches('\'').to_string())
        } else {
            Alternative::Tag {
                text: token.to_string(),
                tag: parse_tag(token),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder {
        expression: String,
        alternatives: Vec<Alternative>,
        /// True when a separator follows the closing brace.
        directory: bool,
    },
}

/// A parsed destination pattern. Stateless and shareable across worker threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse pattern text. Never fails: an unmatched `{` or `}` is kept as literal text.
    pub fn parse(pattern: &str) -> Self {
        let normalized = pattern.replace(ALT_SEPARATOR, &SEPARATOR.to_string());
        let mut segments = Vec::new();
        let mut rest = normalized.as_str();

        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}').map(|i| open + i) else {
                break;
            };
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let expression = &rest[open + 1..close];
            let after = &rest[close + 1..];
            segments.push(Segment::Placeholder {
                expression: expression.trim().to_string(),
                alternatives: expression
                    .split(FALLBACK)
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(Alternative::parse)
                    .collect(),
                directory: after.contains(SEPARATOR),
            });
            rest = after;
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Self {
            source: pattern.to_string(),
            segments,
        }
    }

    /// The pattern text as given.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of `{...}` placeholders.
    pub fn placeholder_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Placeholder { .. }))
            .count()
    }

    /// Expand the pattern for one file into a relative path using `/` separators.
    pub fn apply<S: TagStore + ?Sized>(&self, store: &S) -> Result<String, PatternError> {
        let mut path = String::with_capacity(self.source.len() + 32);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Placeholder {
                    expression,
                    alternatives,
                    directory,
                } => {
                    let value = evaluate(expression, alternatives, store)?;
                    if *directory {
                        path.push_str(&clean(&value));
                    } else {
                        path.push_str(&value);
                    }
                }
            }
        }

        let trimmed = path.trim_matches(SEPARATOR);
        if trimmed.is_empty() {
            return Err(PatternError::EmptyPath);
        }
        Ok(trimmed.to_string())
    }
}

/// Parse and expand in one go.
pub fn apply<S: TagStore + ?Sized>(store: &S, pattern: &str) -> Result<String, PatternError> {
    Template::parse(pattern).apply(store)
}

fn evaluate<S: TagStore + ?Sized>(
    expression: &str,
    alternatives: &[Alternative],
    store: &S,
) -> Result<String, PatternError> {
    for alternative in alternatives {
        let value = match alternative {
            Alternative::FreshId => Some(Uuid::new_v4().to_string()),
            Alternative::Constant(text) => Some(text.clone()),
            Alternative::Tag { tag, .. } => {
                let tag = tag.clone()?;
                // '^' separates person-name components.
                store.get(tag).map(|v| v.replace('^', " "))
            }
        };
        if let Some(value) = value {
            return Ok(value);
        }
    }
    Err(PatternError::NotPresent(expression.to_string()))
}
