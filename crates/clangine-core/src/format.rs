//! Chunk-sequence formatting into editor-facing completion records.
//!
//! The formatter walks a candidate's chunk sequence once, building the
//! abbreviation, the insertable snippet (with `${N:...}` placeholders) and
//! the info/menu strings. `Optional` groups are unrolled recursively so
//! that each skippable argument group becomes an independently fillable
//! snippet field; traversal order is preserved because placeholder
//! numbering is user-visible.

use crate::chunk::{CompletionCandidate, CompletionChunk};
use serde::Serialize;
use std::fmt::Write;

/// Candidate ordering policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending by the front-end's priority score.
    #[default]
    Priority,
    /// Ascending by the lower-cased typed-text spelling.
    Alpha,
    /// Keep the front-end's own order.
    Unsorted,
}

impl SortOrder {
    /// Parse an order from its configuration name. Unknown names keep the
    /// front-end order.
    pub fn from_name(name: &str) -> Self {
        match name {
            "priority" => Self::Priority,
            "alpha" => Self::Alpha,
            _ => Self::Unsorted,
        }
    }
}

/// An editor-agnostic completion record.
///
/// `snippet` is present only when it differs from `abbr`, i.e. when the
/// candidate has placeholders. `dup` is always `true`: overloads share a
/// word, so the consumer must not deduplicate by word alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedCompletion {
    /// The literal completion word.
    pub word: String,
    /// The abbreviation shown in the completion menu (same as `word`).
    pub abbr: String,
    /// Placeholder-numbered insertion text, when it differs from `abbr`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    /// The menu line: info optionally prefixed with the result type.
    pub menu: String,
    /// The full display form without the result type.
    pub info: String,
    /// Always `true`; overloads share a word.
    pub dup: bool,
}

/// Filter, sort and format a batch of raw candidates.
///
/// Candidates whose typed-text spelling does not start with `typed_prefix`
/// (case-sensitive) are dropped when the prefix is non-empty.
pub fn format_results(
    candidates: &[CompletionCandidate],
    typed_prefix: &str,
    order: SortOrder,
) -> Vec<FormattedCompletion> {
    let mut kept: Vec<&CompletionCandidate> = candidates
        .iter()
        .filter(|candidate| {
            typed_prefix.is_empty()
                || candidate
                    .typed_text()
                    .is_some_and(|text| text.starts_with(typed_prefix))
        })
        .collect();

    match order {
        SortOrder::Priority => kept.sort_by_key(|candidate| candidate.priority),
        SortOrder::Alpha => kept.sort_by_key(|candidate| {
            candidate.typed_text().unwrap_or_default().to_lowercase()
        }),
        SortOrder::Unsorted => {}
    }

    kept.into_iter().map(format_candidate).collect()
}

/// Format a single candidate's chunk sequence.
pub fn format_candidate(candidate: &CompletionCandidate) -> FormattedCompletion {
    let mut abbr = String::new();
    let mut snippet = String::new();
    let mut info = String::new();
    let mut result_type: Option<&str> = None;
    let mut placeholder = 1usize;

    for chunk in &candidate.chunks {
        match chunk {
            CompletionChunk::Informative(_) => {}
            CompletionChunk::ResultType(spelling) => result_type = Some(spelling),
            CompletionChunk::TypedText(spelling) => {
                abbr = spelling.clone();
                snippet.push_str(spelling);
                info.push_str(spelling);
            }
            CompletionChunk::Optional(nested) => {
                for word in roll_out_optional(nested) {
                    let _ = write!(snippet, "${{{placeholder}:[{word}]}}");
                    placeholder += 1;
                    let _ = write!(info, "[{word}]");
                }
            }
            CompletionChunk::Placeholder(spelling) => {
                let _ = write!(snippet, "${{{placeholder}:{spelling}}}");
                placeholder += 1;
                info.push_str(spelling);
            }
            CompletionChunk::Text(spelling) => {
                snippet.push_str(spelling);
                info.push_str(spelling);
            }
        }
    }

    let menu = match result_type {
        Some(result_type) => format!("{result_type} {info}"),
        None => info.clone(),
    };
    let snippet = if snippet == abbr { None } else { Some(snippet) };

    FormattedCompletion {
        word: abbr.clone(),
        abbr,
        snippet,
        menu,
        info,
        dup: true,
    }
}

/// Unroll one optional argument group into a flat word list.
///
/// Informative, result-type and typed-text sub-chunks are skipped; the
/// remaining spellings of one group concatenate into a single word, and any
/// nested `Optional` contributes its own words after it. The candidate's
/// formatter turns each word into one bracketed numbered placeholder.
fn roll_out_optional(chunks: &[CompletionChunk]) -> Vec<String> {
    let mut word = String::new();
    let mut nested = Vec::new();

    for chunk in chunks {
        match chunk {
            CompletionChunk::Informative(_)
            | CompletionChunk::ResultType(_)
            | CompletionChunk::TypedText(_) => {}
            CompletionChunk::Optional(inner) => nested.extend(roll_out_optional(inner)),
            CompletionChunk::Placeholder(spelling) | CompletionChunk::Text(spelling) => {
                word.push_str(spelling);
            }
        }
    }

    let mut words = vec![word];
    words.extend(nested);
    words
}
