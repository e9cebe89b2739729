use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::snapshot::CatalogSnapshot;
use super::{CategoryStore, QuestionFilter, QuestionStore, StoreError, StoreResult};
use crate::types::{Category, CategoryId, Language, Question, QuestionId};

/// In-memory category and question store.
///
/// Rows are kept in insertion order, which doubles as the stable listing
/// order. Every call takes its lock once, so a single call is atomic but a
/// sequence of calls is not.
#[derive(Clone, Default)]
pub struct MemoryStore {
    categories: Arc<RwLock<Vec<Category>>>,
    questions: Arc<RwLock<Vec<Question>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the full catalog into a serializable snapshot
    pub async fn snapshot(&self) -> CatalogSnapshot {
        let categories = self.categories.read().await.clone();
        let questions = self.questions.read().await.clone();
        CatalogSnapshot::new(categories, questions)
    }

    /// Replace all contents with a validated snapshot
    pub async fn restore(&self, snapshot: CatalogSnapshot) -> Result<(), String> {
        snapshot.validate()?;

        let mut categories = self.categories.write().await;
        let mut questions = self.questions.write().await;
        tracing::info!(
            "Restoring catalog snapshot from {} ({} categories, {} questions)",
            snapshot.exported_at,
            snapshot.categories.len(),
            snapshot.questions.len()
        );
        *categories = snapshot.categories;
        *questions = snapshot.questions;
        Ok(())
    }

    /// Load a snapshot file into a fresh store
    pub async fn load_from_file(path: &Path) -> Result<Self, String> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let snapshot: CatalogSnapshot = serde_json::from_str(&raw)
            .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;

        let store = Self::new();
        store.restore(snapshot).await?;
        Ok(store)
    }

    /// Write the current contents to a snapshot file
    pub async fn save_to_file(&self, path: &Path) -> Result<(), String> {
        let snapshot = self.snapshot().await;
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| format!("Failed to serialize snapshot: {}", e))?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        tracing::info!(
            "Saved catalog snapshot to {} ({} categories, {} questions)",
            path.display(),
            snapshot.categories.len(),
            snapshot.questions.len()
        );
        Ok(())
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn list_categories(&self, limit: usize, offset: usize) -> StoreResult<Vec<Category>> {
        Ok(self
            .categories
            .read()
            .await
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn category_count(&self) -> StoreResult<usize> {
        Ok(self.categories.read().await.len())
    }

    async fn get_category(&self, id: CategoryId) -> StoreResult<Option<Category>> {
        Ok(self
            .categories
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn create_category(
        &self,
        key: String,
        label: String,
        icon: String,
    ) -> StoreResult<Category> {
        let now = chrono::Utc::now().to_rfc3339();
        let category = Category {
            id: ulid::Ulid::new(),
            key,
            label,
            icon,
            created_at: now.clone(),
            updated_at: now,
        };

        self.categories.write().await.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: CategoryId,
        key: String,
        label: String,
        icon: String,
    ) -> StoreResult<Category> {
        let mut categories = self.categories.write().await;
        let category = categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("category {}", id)))?;

        category.key = key;
        category.label = label;
        category.icon = icon;
        category.updated_at = chrono::Utc::now().to_rfc3339();
        Ok(category.clone())
    }

    async fn delete_category(&self, id: CategoryId) -> StoreResult<bool> {
        let mut categories = self.categories.write().await;
        match categories.iter().position(|c| c.id == id) {
            Some(pos) => {
                categories.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl QuestionStore for MemoryStore {
    async fn list_questions(
        &self,
        limit: usize,
        offset: usize,
        filter: QuestionFilter,
    ) -> StoreResult<Vec<Question>> {
        Ok(self
            .questions
            .read()
            .await
            .iter()
            .filter(|q| filter.matches(q))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get_question(&self, id: QuestionId) -> StoreResult<Option<Question>> {
        Ok(self
            .questions
            .read()
            .await
            .iter()
            .find(|q| q.id == id)
            .cloned())
    }

    async fn list_questions_by_base(
        &self,
        base_question_id: QuestionId,
    ) -> StoreResult<Vec<Question>> {
        Ok(self
            .questions
            .read()
            .await
            .iter()
            .filter(|q| q.base_question_id == base_question_id)
            .cloned()
            .collect())
    }

    async fn create_question(&self, question: Question) -> StoreResult<()> {
        let mut questions = self.questions.write().await;

        if questions.iter().any(|q| q.id == question.id) {
            return Err(StoreError::Conflict(format!(
                "question {} already exists",
                question.id
            )));
        }
        if questions.iter().any(|q| {
            q.base_question_id == question.base_question_id && q.language == question.language
        }) {
            return Err(StoreError::Conflict(format!(
                "question {} already has a '{}' row",
                question.base_question_id, question.language
            )));
        }

        questions.push(question);
        Ok(())
    }

    async fn update_question(&self, question: &Question) -> StoreResult<Question> {
        let mut questions = self.questions.write().await;

        // Changing the language must not collide with a sibling row
        if questions.iter().any(|q| {
            q.id != question.id
                && q.base_question_id == question.base_question_id
                && q.language == question.language
        }) {
            return Err(StoreError::Conflict(format!(
                "question {} already has a '{}' row",
                question.base_question_id, question.language
            )));
        }

        let existing = questions
            .iter_mut()
            .find(|q| q.id == question.id)
            .ok_or_else(|| StoreError::NotFound(format!("question {}", question.id)))?;

        existing.category_id = question.category_id;
        existing.language = question.language;
        existing.text = question.text.clone();
        existing.updated_at = chrono::Utc::now().to_rfc3339();
        Ok(existing.clone())
    }

    async fn delete_question(&self, id: QuestionId) -> StoreResult<bool> {
        let mut questions = self.questions.write().await;
        match questions.iter().position(|q| q.id == id) {
            Some(pos) => {
                questions.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn question_counts_by_category(
        &self,
        language: Language,
    ) -> StoreResult<HashMap<CategoryId, usize>> {
        let mut counts = HashMap::new();
        for question in self.questions.read().await.iter() {
            if question.language == language {
                *counts.entry(question.category_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}
