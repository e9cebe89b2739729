//! Question catalog: categories, questions and their translations.
//!
//! `Catalog` is the single entry point for the admin surface. Its operations
//! are split across submodules the same way the store traits are:
//! - `categories`: category administration
//! - `translations`: translation sets and completeness statistics
//! - `mutation`: creating and updating a question with its translations
//! - `listing`: paginated list and edit views

mod categories;
mod listing;
mod mutation;
mod translations;

use std::sync::Arc;

use crate::config::CatalogConfig;
use crate::store::{CategoryStore, MemoryStore, QuestionStore};

pub use listing::PageRequest;
pub use mutation::{CreatedQuestion, SlotAction, TranslationWrite, UpdatedQuestion};
pub use translations::{missing_translations, TranslationStatus};

/// Shared catalog service
#[derive(Clone)]
pub struct Catalog {
    categories: Arc<dyn CategoryStore>,
    questions: Arc<dyn QuestionStore>,
    config: CatalogConfig,
}

impl Catalog {
    pub fn new(
        categories: Arc<dyn CategoryStore>,
        questions: Arc<dyn QuestionStore>,
        config: CatalogConfig,
    ) -> Self {
        Self {
            categories,
            questions,
            config,
        }
    }

    /// Catalog backed by a single in-memory store
    pub fn in_memory(store: MemoryStore, config: CatalogConfig) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store, config)
    }
}
