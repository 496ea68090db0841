//! Wastesort-lib classifies photos of waste and finds out how to dispose of
//! them in Paderborn.
//!
//! ### Features
//!
//!  - disposal lookup: nearest reference label by sentence embedding similarity
//!  - image classification with a vision transformer
//!  - question answering over the municipal waste guide website (RAG)
//!
//! ### Examples
//!
//! ```rust no_run
//! use wastesort_lib::embedding::{get_embedding, Type};
//! use wastesort_lib::lookup::{DisposalGuide, LookupParams, MatchResult};
//! use wastesort_lib::vision::{get_classifier, DEFAULT_MODEL};
//!
//! let embedder = get_embedding(Type::HuggingFace).expect("embedding model loaded");
//! let guide = DisposalGuide::open("data/waste_guide.csv", embedder, LookupParams::default());
//!
//! let classifier = get_classifier(DEFAULT_MODEL).expect("classifier loaded");
//! let label = classifier.classify("photo.jpg".as_ref()).expect("image classified");
//!
//! match guide.find(&label).expect("label embedded") {
//!     MatchResult::Matched(m) => { /* show m.disposal_instructions */ }
//!     MatchResult::NoMatch { query } => { /* nothing similar to query */ }
//!     MatchResult::Unavailable => { /* guide failed to load */ }
//! }
//! ```

#![deny(missing_docs)]
#![deny(clippy::suspicious)]
#![allow(clippy::comparison_chain)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::collapsible_if)]

mod error;
mod config;
pub mod embedding;
pub mod llm;
pub mod lookup;
pub mod rag;
pub mod request;
pub mod similarity;
pub mod vision;

pub use error::Error;
pub use error::LoadError;
pub use config::LlmConfig;
pub use config::{DEFAULT_LLM_API_URL, DEFAULT_LLM_MODEL};
