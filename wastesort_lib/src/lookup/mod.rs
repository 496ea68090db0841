//! Disposal lookup: nearest reference label by embedding similarity.
//!
//! The reference table maps waste category labels to disposal instructions.
//! Every label is embedded once when the table is loaded; a query label is
//! embedded the same way and compared against all of them. The best entry is
//! returned only if its cosine similarity is strictly above the threshold.

use std::fmt::Display;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::embedding::Embedding;
use crate::error::{Error, LoadError};
use crate::similarity::rank;

mod table;

pub use table::{read_rows, read_rows_from, ReferenceRow};

/// Default acceptance threshold.
pub const DEFAULT_THRESHOLD: f32 = 0.4;

/// Default number of ranked candidates.
pub const DEFAULT_TOP_K: usize = 1;

/// Lookup tuning parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookupParams {
    threshold: f32,
    top_k: usize,
}

impl LookupParams {

    /// Create parameters; `threshold` must be finite and `top_k` at least 1.
    pub fn new(threshold: f32, top_k: usize) -> Result<Self, Error> {
        if !threshold.is_finite() {
            return Err(Error::ConfigError("threshold must be a finite number"));
        }
        if top_k == 0 {
            return Err(Error::ConfigError("top_k must be greater than zero"));
        }
        Ok(LookupParams { threshold, top_k })
    }

    /// Minimum similarity (exclusive) for a match.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Number of ranked candidates considered.
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Whether a similarity score is accepted as a match.
    pub fn accepts(&self, score: f32) -> bool {
        score > self.threshold
    }
}

impl Default for LookupParams {
    fn default() -> Self {
        LookupParams {
            threshold: DEFAULT_THRESHOLD,
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Reference table entry with its label embedding.
#[derive(Debug, Clone)]
pub struct ReferenceEntry {
    /// Canonical waste category name.
    pub label: String,
    /// How to dispose of it.
    pub disposal_instructions: String,
    /// Non-blank remarks.
    pub notes: Option<String>,
    /// Embedding of `label`.
    pub embedding: Vec<f32>,
}

/// Best reference entry for a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// Label of the matched entry.
    pub matched_label: String,
    /// Disposal instructions of the matched entry.
    pub disposal_instructions: String,
    /// Notes, absent when blank.
    pub notes: Option<String>,
    /// Cosine similarity between query and label.
    pub similarity_score: f32,
}

/// Lookup outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    /// An entry is similar enough.
    Matched(Match),
    /// No entry is similar enough.
    NoMatch {
        /// The query text.
        query: String,
    },
    /// The reference table could not be loaded.
    Unavailable,
}

impl MatchResult {
    /// Return the match if any.
    pub fn matched(&self) -> Option<&Match> {
        match self {
            MatchResult::Matched(m) => Some(m),
            _ => None,
        }
    }
}

impl Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchResult::Matched(m) => {
                write!(f, "{} (similarity {:.2}):\n{}", m.matched_label, m.similarity_score, m.disposal_instructions)?;
                if let Some(notes) = &m.notes {
                    write!(f, "\nNotes: {}", notes)?;
                }
                Ok(())
            },
            MatchResult::NoMatch { query } => {
                write!(f, "No disposal information found for \"{}\".", query)
            },
            MatchResult::Unavailable => {
                f.write_str("The disposal guide is not available.")
            },
        }
    }
}

/// Reference table with precomputed label embeddings.
pub struct DisposalLookup<E> {
    entries: Vec<ReferenceEntry>,
    embedder: E,
    params: LookupParams,
}

impl<E: Embedding> DisposalLookup<E> {

    /// Load the reference table from a CSV file and embed every label.
    pub fn initialize(path: impl AsRef<Path>, embedder: E, params: LookupParams) -> Result<Self, LoadError> {
        let path = path.as_ref();
        info!("Loading disposal guide from {}", path.display());

        let rows = read_rows(path)?;
        Self::from_rows(rows, embedder, params)
    }

    /// Build from in-memory rows.
    ///
    /// Fails if there are no rows or any label is blank.
    pub fn from_rows(rows: Vec<ReferenceRow>, embedder: E, params: LookupParams) -> Result<Self, LoadError> {
        if rows.is_empty() {
            return Err(LoadError::ParseError("reference table is empty".to_owned()));
        }

        let mut entries = Vec::with_capacity(rows.len());
        for (idx, row) in rows.into_iter().enumerate() {
            let label = row.label.trim();
            if label.is_empty() {
                return Err(LoadError::ParseError(format!("row {}: label is blank", idx + 1)));
            }

            let embedding = embedder.get_embeddings(label)?;
            let notes = row.notes
                .map(|n| n.trim().to_owned())
                .filter(|n| !n.is_empty());

            entries.push(ReferenceEntry {
                label: label.to_owned(),
                disposal_instructions: row.disposal_instructions.trim().to_owned(),
                notes,
                embedding,
            });
        }

        info!("Disposal guide loaded: {} entries", entries.len());

        Ok(DisposalLookup {
            entries,
            embedder,
            params,
        })
    }

    /// Find disposal instructions for a label.
    ///
    /// Fails only if the query can't be embedded or compared.
    pub fn find(&self, query: &str) -> Result<MatchResult, Error> {
        let query_embedding = self.embedder.get_embeddings(query)?;

        let ranked = rank(
            &query_embedding,
            self.entries.iter().map(|e| e.embedding.as_slice()),
            self.params.top_k
        )?;

        let result = match ranked.first() {
            Some(&(idx, score)) if self.params.accepts(score) => {
                let entry = &self.entries[idx];
                debug!("\"{}\" matched \"{}\" with similarity {}", query, entry.label, score);
                MatchResult::Matched(Match {
                    matched_label: entry.label.clone(),
                    disposal_instructions: entry.disposal_instructions.clone(),
                    notes: entry.notes.clone(),
                    similarity_score: score,
                })
            },
            best => {
                debug!("no match for \"{}\", best candidate {:?}", query, best);
                MatchResult::NoMatch { query: query.to_owned() }
            }
        };

        Ok(result)
    }

    /// Reference entries in table order.
    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    /// Lookup parameters.
    pub fn params(&self) -> LookupParams {
        self.params
    }
}

/// Disposal lookup that may have failed to load.
pub enum DisposalGuide<E> {
    /// Loaded and ready for queries.
    Ready(DisposalLookup<E>),
    /// Loading failed; queries return [`MatchResult::Unavailable`].
    Unavailable(LoadError),
}

impl<E: Embedding> DisposalGuide<E> {

    /// Load the guide, keeping the load error instead of returning it.
    pub fn open(path: impl AsRef<Path>, embedder: E, params: LookupParams) -> Self {
        DisposalLookup::initialize(path, embedder, params).into()
    }

    /// Whether queries can be answered.
    pub fn is_available(&self) -> bool {
        matches!(self, DisposalGuide::Ready(_))
    }

    /// The load error, if loading failed.
    pub fn load_error(&self) -> Option<&LoadError> {
        match self {
            DisposalGuide::Ready(_) => None,
            DisposalGuide::Unavailable(err) => Some(err),
        }
    }

    /// Find disposal instructions, or [`MatchResult::Unavailable`] without computing anything.
    pub fn find(&self, query: &str) -> Result<MatchResult, Error> {
        match self {
            DisposalGuide::Ready(lookup) => lookup.find(query),
            DisposalGuide::Unavailable(_) => Ok(MatchResult::Unavailable),
        }
    }
}

impl<E> From<Result<DisposalLookup<E>, LoadError>> for DisposalGuide<E> {
    fn from(result: Result<DisposalLookup<E>, LoadError>) -> Self {
        match result {
            Ok(lookup) => DisposalGuide::Ready(lookup),
            Err(err) => {
                warn!("Disposal guide unavailable: {}", err);
                DisposalGuide::Unavailable(err)
            }
        }
    }
}
