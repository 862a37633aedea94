//! Word2Vec Domain Library
//!
//! Autocomplete and semantic queries over a pre-trained word-embedding
//! vocabulary.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ handlers::router │  ← /suggest (bare array), supervised semantic routes
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │ Word2VecService  │  ← best-effort masking of model failures
//! └───┬──────────┬───┘
//!     │          │
//! ┌───▼────┐ ┌───▼───────────┐
//! │ Prefix │ │ SemanticModel │
//! │ Search │ │   (trait)     │
//! │ Engine │ └───┬───────────┘
//! └───┬────┘     │
//! ┌───▼──────────▼──┐
//! │ VocabularyIndex │ ← built once from Word2Vec::words()
//! └─────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_word2vec::{ModelFormat, VocabularyIndexBuilder, Word2Vec, Word2VecService};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let model = Word2Vec::load("vectors.bin.gz", ModelFormat::Binary)?;
//! let index = VocabularyIndexBuilder::build(model.words())?;
//! let service = Word2VecService::new(index, Arc::new(model));
//!
//! assert!(service.suggest("kin", 10).len() <= 10);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod fold;
pub mod handlers;
pub mod index;
pub mod model;
pub mod models;
pub mod service;
pub mod suggest;

// Re-export commonly used types
pub use error::{IndexBuildError, ModelError, ModelLoadError, ModelResult, W2vError, W2vResult};
pub use fold::fold;
pub use handlers::ApiDoc;
pub use index::{VocabularyIndex, VocabularyIndexBuilder};
pub use model::{ModelFormat, SemanticModel, Word2Vec};
pub use models::{DissimilarResponse, SimilarsResponse, StatusResponse, SuggestQuery};
pub use service::{SIMILAR_TOP_N, Word2VecService};
pub use suggest::PrefixSearchEngine;
