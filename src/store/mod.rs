//! Persistence boundary for categories and questions.
//!
//! The catalog only talks to storage through these traits. [`MemoryStore`]
//! is the bundled implementation.

mod memory;
pub mod snapshot;

use async_trait::async_trait;
use std::collections::HashMap;

use crate::types::{Category, CategoryId, Language, Question, QuestionId};

pub use memory::MemoryStore;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors reported by a store implementation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// The backing storage could not serve the request
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A write would break a uniqueness constraint
    #[error("Store conflict: {0}")]
    Conflict(String),

    /// The row addressed by a write does not exist
    #[error("Row not found: {0}")]
    NotFound(String),
}

/// Optional equality filters for [`QuestionStore::list_questions`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuestionFilter {
    pub category_id: Option<CategoryId>,
    pub language: Option<Language>,
}

impl QuestionFilter {
    pub fn language(language: Language) -> Self {
        Self {
            category_id: None,
            language: Some(language),
        }
    }

    pub fn with_category(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }

    pub fn matches(&self, question: &Question) -> bool {
        self.category_id
            .map_or(true, |category_id| question.category_id == category_id)
            && self
                .language
                .map_or(true, |language| question.language == language)
    }
}

/// Category records
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Categories in creation order
    async fn list_categories(&self, limit: usize, offset: usize) -> StoreResult<Vec<Category>>;

    async fn category_count(&self) -> StoreResult<usize>;

    async fn get_category(&self, id: CategoryId) -> StoreResult<Option<Category>>;

    async fn create_category(&self, key: String, label: String, icon: String)
        -> StoreResult<Category>;

    /// Fails with [`StoreError::NotFound`] when `id` is unknown
    async fn update_category(
        &self,
        id: CategoryId,
        key: String,
        label: String,
        icon: String,
    ) -> StoreResult<Category>;

    /// Returns false when nothing was deleted
    async fn delete_category(&self, id: CategoryId) -> StoreResult<bool>;
}

/// Question rows in every language
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Rows matching `filter`, in an order that is stable across pages
    async fn list_questions(
        &self,
        limit: usize,
        offset: usize,
        filter: QuestionFilter,
    ) -> StoreResult<Vec<Question>>;

    async fn get_question(&self, id: QuestionId) -> StoreResult<Option<Question>>;

    /// Every row of one logical question
    async fn list_questions_by_base(&self, base_question_id: QuestionId)
        -> StoreResult<Vec<Question>>;

    /// Insert a row; the caller supplies `id` and `base_question_id`
    async fn create_question(&self, question: Question) -> StoreResult<()>;

    /// Replace category, language and text of the row with `question.id`
    async fn update_question(&self, question: &Question) -> StoreResult<Question>;

    /// Returns false when nothing was deleted
    async fn delete_question(&self, id: QuestionId) -> StoreResult<bool>;

    /// Row counts per category, restricted to one language
    async fn question_counts_by_category(
        &self,
        language: Language,
    ) -> StoreResult<HashMap<CategoryId, usize>>;
}
