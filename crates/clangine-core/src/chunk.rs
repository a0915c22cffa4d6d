//! Completion chunks as produced by the front-end.
//!
//! A completion candidate arrives from the front-end as an ordered sequence
//! of typed chunks. Most chunks carry literal spelling; `Optional` carries a
//! nested sequence describing an argument group that may be skipped (default
//! arguments, variadic tails).

/// One typed fragment of a completion candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionChunk {
    /// Context shown to the user but never inserted (e.g. the enclosing
    /// class of a method).
    Informative(String),
    /// The result type of the candidate, rendered as a menu prefix.
    ResultType(String),
    /// The text the user actually typed against; there is at most one per
    /// candidate.
    TypedText(String),
    /// A parameter slot the user is expected to fill in.
    Placeholder(String),
    /// An argument group that may be skipped, carrying its own chunk
    /// sequence (possibly with further nested groups).
    Optional(Vec<CompletionChunk>),
    /// Literal text: punctuation, keywords, spacing.
    Text(String),
}

impl CompletionChunk {
    /// The spelling contributed by this chunk. `Optional` groups have no
    /// spelling of their own; their content is unrolled separately.
    pub fn spelling(&self) -> &str {
        match self {
            Self::Informative(s)
            | Self::ResultType(s)
            | Self::TypedText(s)
            | Self::Placeholder(s)
            | Self::Text(s) => s,
            Self::Optional(_) => "",
        }
    }
}

/// A raw completion result from the front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCandidate {
    /// The chunk sequence describing display and insertion forms.
    pub chunks: Vec<CompletionChunk>,
    /// The front-end's internal priority score; smaller is better.
    pub priority: u32,
}

impl CompletionCandidate {
    /// The spelling of the candidate's typed-text chunk, if it has one.
    pub fn typed_text(&self) -> Option<&str> {
        self.chunks.iter().find_map(|chunk| match chunk {
            CompletionChunk::TypedText(s) => Some(s.as_str()),
            _ => None,
        })
    }
}
