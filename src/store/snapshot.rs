//! Catalog snapshots for backup and restoration.
//!
//! A snapshot holds every category and question row. It is validated against
//! the catalog invariants before it replaces live data.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::types::{Category, Language, Question};

/// Schema version for snapshot format compatibility
/// Version 1: categories and questions with base_question_id links
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// A serializable copy of the entire question catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// Schema version for forward compatibility
    pub schema_version: u32,
    /// Export timestamp (ISO8601)
    pub exported_at: String,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl CatalogSnapshot {
    /// Create a new snapshot with current timestamp
    pub fn new(categories: Vec<Category>, questions: Vec<Question>) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            exported_at: chrono::Utc::now().to_rfc3339(),
            categories,
            questions,
        }
    }

    /// Validate the snapshot before import
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version > SNAPSHOT_SCHEMA_VERSION {
            return Err(format!(
                "Snapshot schema version {} is newer than supported version {}. \
                 Please update the server.",
                self.schema_version, SNAPSHOT_SCHEMA_VERSION
            ));
        }

        let mut category_ids = HashSet::new();
        for category in &self.categories {
            if !category_ids.insert(category.id) {
                return Err(format!("Duplicate category id '{}'", category.id));
            }
        }

        let mut by_id: HashMap<_, &Question> = HashMap::new();
        for question in &self.questions {
            if by_id.insert(question.id, question).is_some() {
                return Err(format!("Duplicate question id '{}'", question.id));
            }
        }

        let mut slots = HashSet::new();
        let mut dangling_categories = 0usize;
        let mut orphaned_translations = 0usize;
        for question in &self.questions {
            // Category and base deletions do not cascade, so dangling links are legal
            if !category_ids.contains(&question.category_id) {
                dangling_categories += 1;
            }

            if !slots.insert((question.base_question_id, question.language)) {
                return Err(format!(
                    "Question '{}' has more than one '{}' row",
                    question.base_question_id, question.language
                ));
            }

            if question.language == Language::English {
                if question.base_question_id != question.id {
                    return Err(format!(
                        "English question '{}' must be its own base (found '{}')",
                        question.id, question.base_question_id
                    ));
                }
                continue;
            }

            if question.base_question_id == question.id {
                return Err(format!(
                    "Translation '{}' references itself as base",
                    question.id
                ));
            }
            match by_id.get(&question.base_question_id) {
                Some(base) if base.language == Language::English => {}
                Some(_) => {
                    return Err(format!(
                        "Translation '{}' references base '{}' which is not an English question",
                        question.id, question.base_question_id
                    ))
                }
                None => orphaned_translations += 1,
            }
        }

        if dangling_categories > 0 || orphaned_translations > 0 {
            tracing::warn!(
                dangling_categories,
                orphaned_translations,
                "Snapshot contains questions with deleted categories or bases"
            );
        }

        Ok(())
    }
}
