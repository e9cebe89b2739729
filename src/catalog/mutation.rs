//! Creating and updating a question together with its translations.
//!
//! Writes are sequential and independent. Only the English row is mandatory;
//! under the default policy a failed French or Japanese write leaves a
//! partially translated question behind and is reported in the outcome.

use serde::Serialize;
use std::collections::BTreeMap;

use super::Catalog;
use crate::config::TranslationWritePolicy;
use crate::error::{AdminError, AdminResult};
use crate::store::StoreError;
use crate::types::{Category, CategoryId, Language, Question, QuestionId};

/// Result of writing one optional translation row
pub type TranslationWrite = Result<Question, StoreError>;

/// Outcome of creating a logical question
#[derive(Debug, Clone)]
pub struct CreatedQuestion {
    /// The English row; its id is the base id of the whole question
    pub base: Question,
    /// One entry per requested translation
    pub translations: BTreeMap<Language, TranslationWrite>,
}

impl CreatedQuestion {
    /// True when every requested translation was written
    pub fn is_fully_synced(&self) -> bool {
        self.translations.values().all(|write| write.is_ok())
    }

    pub fn failed_languages(&self) -> Vec<Language> {
        self.translations
            .iter()
            .filter(|(_, write)| write.is_err())
            .map(|(language, _)| *language)
            .collect()
    }
}

/// Whether an update rewrote an existing row or added a missing translation
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SlotAction {
    Updated,
    Created,
}

#[derive(Debug, Clone)]
pub struct UpdatedQuestion {
    pub question: Question,
    pub action: SlotAction,
}

/// Language slot addressed by an update: exactly "fr" and "ja" select their
/// translation, anything else (including "FR" or " ja") selects the English row.
fn target_language(lang_code: &str) -> Language {
    match lang_code {
        "fr" => Language::French,
        "ja" => Language::Japanese,
        _ => Language::English,
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

impl Catalog {
    /// Create the English row of a new logical question plus any non-empty translations
    pub async fn create_logical_question(
        &self,
        category_id: CategoryId,
        text_en: &str,
        text_fr: Option<&str>,
        text_ja: Option<&str>,
    ) -> AdminResult<CreatedQuestion> {
        let text_en = non_empty(Some(text_en))
            .ok_or_else(|| AdminError::Validation("English text is required".to_string()))?;
        self.require_category(category_id).await?;

        let base_id = ulid::Ulid::new();
        let base = Question::new(
            base_id,
            category_id,
            Language::English,
            text_en.to_string(),
            base_id,
        );

        if let Err(e) = self.questions.create_question(base.clone()).await {
            tracing::error!("Failed to create question {}: {}", base_id, e);
            return Err(e.into());
        }

        let mut translations = BTreeMap::new();
        for (language, text) in [(Language::French, text_fr), (Language::Japanese, text_ja)] {
            let Some(text) = non_empty(text) else {
                continue;
            };

            let row = Question::new(
                ulid::Ulid::new(),
                category_id,
                language,
                text.to_string(),
                base_id,
            );
            let write = self.questions.create_question(row.clone()).await.map(|_| row);

            if let Err(e) = &write {
                tracing::warn!(
                    "Failed to create '{}' translation of question {}: {}",
                    language,
                    base_id,
                    e
                );
                if self.config.translation_write_policy == TranslationWritePolicy::AllOrNothing {
                    let error = e.clone();
                    translations.insert(language, write);
                    self.roll_back(&base, &translations).await;
                    return Err(error.into());
                }
            }
            translations.insert(language, write);
        }

        let created = CreatedQuestion {
            base,
            translations,
        };
        tracing::info!(
            "Created question {} ({} translations, fully synced: {})",
            base_id,
            created.translations.len(),
            created.is_fully_synced()
        );
        Ok(created)
    }

    /// Remove rows written for a logical question that could not be completed
    async fn roll_back(
        &self,
        base: &Question,
        translations: &BTreeMap<Language, TranslationWrite>,
    ) {
        let written = translations
            .values()
            .filter_map(|write| write.as_ref().ok())
            .map(|q| q.id)
            .chain(std::iter::once(base.id));

        for id in written {
            if let Err(e) = self.questions.delete_question(id).await {
                tracing::error!("Failed to roll back question row {}: {}", id, e);
            }
        }
        tracing::info!("Rolled back partially created question {}", base.id);
    }

    /// Update one language of the logical question `question_id` belongs to.
    ///
    /// The English slot is written from `text`; the French and Japanese slots
    /// from `translation_text`. A missing translation is created, a missing
    /// English row is an inconsistency.
    pub async fn update_logical_question(
        &self,
        question_id: QuestionId,
        category_id: CategoryId,
        lang_code: &str,
        text: &str,
        translation_text: Option<&str>,
    ) -> AdminResult<UpdatedQuestion> {
        let (question, set) = self.get_translations_for_question(question_id).await?;
        self.require_category(category_id).await?;

        let language = target_language(lang_code);
        let new_text = if language.is_canonical() {
            non_empty(Some(text))
        } else {
            non_empty(translation_text)
        }
        .ok_or_else(|| {
            AdminError::Validation(format!("Text for language '{}' is required", language))
        })?;

        if let Some(existing) = set.get(language) {
            let mut row = existing.clone();
            row.category_id = category_id;
            row.language = language;
            row.text = new_text.to_string();

            let updated = self.questions.update_question(&row).await?;
            tracing::info!(
                "Updated '{}' row {} of question {}",
                language,
                updated.id,
                updated.base_question_id
            );
            return Ok(UpdatedQuestion {
                question: updated,
                action: SlotAction::Updated,
            });
        }

        let base_question_id = question.base_question_id;
        if set.english.is_none() {
            return Err(AdminError::Consistency(format!(
                "question {} has no English row",
                base_question_id
            )));
        }

        let row = Question::new(
            ulid::Ulid::new(),
            category_id,
            language,
            new_text.to_string(),
            base_question_id,
        );
        self.questions.create_question(row.clone()).await?;
        tracing::info!(
            "Added '{}' translation {} to question {}",
            language,
            row.id,
            base_question_id
        );
        Ok(UpdatedQuestion {
            question: row,
            action: SlotAction::Created,
        })
    }

    /// Delete a single row. Sibling translations are left untouched.
    pub async fn delete_question(&self, question_id: QuestionId) -> AdminResult<()> {
        if !self.questions.delete_question(question_id).await? {
            return Err(AdminError::NotFound(format!("question {}", question_id)));
        }
        tracing::info!("Deleted question row {}", question_id);
        Ok(())
    }

    async fn require_category(&self, category_id: CategoryId) -> AdminResult<Category> {
        self.categories
            .get_category(category_id)
            .await?
            .ok_or_else(|| AdminError::Validation(format!("Unknown category {}", category_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;
    use crate::store::{CategoryStore, MemoryStore, QuestionStore};
    use ulid::Ulid;

    async fn setup() -> (Catalog, MemoryStore, Category) {
        let store = MemoryStore::new();
        let category = store
            .create_category("romance".into(), "Romance".into(), "heart".into())
            .await
            .unwrap();
        let catalog = Catalog::in_memory(store.clone(), CatalogConfig::default());
        (catalog, store, category)
    }

    #[test]
    fn test_target_language_routing() {
        assert_eq!(target_language("fr"), Language::French);
        assert_eq!(target_language("ja"), Language::Japanese);
        assert_eq!(target_language("en"), Language::English);
        assert_eq!(target_language("es"), Language::English);
        assert_eq!(target_language(""), Language::English);
        assert_eq!(target_language("FR"), Language::English);
        assert_eq!(target_language("Fr"), Language::English);
        assert_eq!(target_language(" ja"), Language::English);
        assert_eq!(target_language("ja "), Language::English);
    }

    #[tokio::test]
    async fn test_update_uppercase_code_targets_english_row() {
        let (catalog, store, category) = setup().await;
        let created = catalog
            .create_logical_question(category.id, "Q1", None, None)
            .await
            .unwrap();

        let updated = catalog
            .update_logical_question(
                created.base.id,
                category.id,
                "FR",
                "Q1 edited",
                Some("Q1-fr"),
            )
            .await
            .unwrap();
        assert_eq!(updated.action, SlotAction::Updated);
        assert_eq!(updated.question.id, created.base.id);
        assert_eq!(updated.question.language, Language::English);
        assert_eq!(updated.question.text, "Q1 edited");

        let rows = store.list_questions_by_base(created.base.id).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_create_base_self_reference() {
        let (catalog, _, category) = setup().await;

        let created = catalog
            .create_logical_question(category.id, "Q1", None, None)
            .await
            .unwrap();
        assert_eq!(created.base.base_question_id, created.base.id);
        assert_eq!(created.base.language, Language::English);
        assert!(created.translations.is_empty());
        assert!(created.is_fully_synced());
    }

    #[tokio::test]
    async fn test_create_skips_empty_translation() {
        let (catalog, _, category) = setup().await;

        let created = catalog
            .create_logical_question(category.id, "Q1", Some(""), Some("Q1-ja"))
            .await
            .unwrap();
        assert_eq!(created.translations.len(), 1);

        let set = catalog.get_translations(created.base.id).await.unwrap();
        assert!(set.english.is_some());
        assert!(set.french.is_none());
        assert_eq!(set.japanese.as_ref().unwrap().text, "Q1-ja");
        assert_eq!(set.japanese.unwrap().base_question_id, created.base.id);

        let status = catalog.get_translation_status(&[created.base.id]).await;
        assert_eq!(status.completeness(&created.base.id), 2);
    }

    #[tokio::test]
    async fn test_create_trims_text_and_skips_blank_translation() {
        let (catalog, _, category) = setup().await;

        let created = catalog
            .create_logical_question(category.id, "  Q1 \n", Some("   "), Some(" Q1-ja "))
            .await
            .unwrap();
        assert_eq!(created.base.text, "Q1");
        assert!(!created.translations.contains_key(&Language::French));

        let set = catalog.get_translations(created.base.id).await.unwrap();
        assert!(set.french.is_none());
        assert_eq!(set.japanese.unwrap().text, "Q1-ja");
    }

    #[tokio::test]
    async fn test_create_requires_english_text() {
        let (catalog, store, category) = setup().await;

        let result = catalog
            .create_logical_question(category.id, "   ", Some("fr"), None)
            .await;
        assert!(matches!(result, Err(AdminError::Validation(_))));
        assert!(store
            .list_questions(10, 0, Default::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_category() {
        let (catalog, _, _) = setup().await;

        let result = catalog
            .create_logical_question(Ulid::new(), "Q", None, None)
            .await;
        assert!(matches!(result, Err(AdminError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_creates_missing_french_row() {
        let (catalog, _, category) = setup().await;
        let created = catalog
            .create_logical_question(category.id, "Q1", None, None)
            .await
            .unwrap();

        let updated = catalog
            .update_logical_question(created.base.id, category.id, "fr", "ignored", Some("Q1-fr"))
            .await
            .unwrap();
        assert_eq!(updated.action, SlotAction::Created);
        assert_eq!(updated.question.language, Language::French);
        assert_eq!(updated.question.text, "Q1-fr");
        assert_eq!(updated.question.base_question_id, created.base.id);
        assert_ne!(updated.question.id, created.base.id);

        // English row is untouched
        let set = catalog.get_translations(created.base.id).await.unwrap();
        assert_eq!(set.english.unwrap().text, "Q1");
    }

    #[tokio::test]
    async fn test_update_existing_translation_in_place() {
        let (catalog, _, category) = setup().await;
        let created = catalog
            .create_logical_question(category.id, "Q1", None, Some("old"))
            .await
            .unwrap();
        let ja_id = created.translations[&Language::Japanese]
            .as_ref()
            .unwrap()
            .id;

        // Addressed through the Japanese row itself
        let updated = catalog
            .update_logical_question(ja_id, category.id, "ja", "", Some("new"))
            .await
            .unwrap();
        assert_eq!(updated.action, SlotAction::Updated);
        assert_eq!(updated.question.id, ja_id);
        assert_eq!(updated.question.text, "new");
        assert_eq!(updated.question.base_question_id, created.base.id);
    }

    #[tokio::test]
    async fn test_update_english_reads_main_text() {
        let (catalog, _, category) = setup().await;
        let other = catalog
            .create_category("travel", "Travel", "plane")
            .await
            .unwrap();
        let created = catalog
            .create_logical_question(category.id, "Q1", Some("Q1-fr"), None)
            .await
            .unwrap();
        let fr_id = created.translations[&Language::French]
            .as_ref()
            .unwrap()
            .id;

        // Routed through the French row, unknown code goes to the English slot
        let updated = catalog
            .update_logical_question(fr_id, other.id, "xx", "Q1 edited", Some("not used"))
            .await
            .unwrap();
        assert_eq!(updated.action, SlotAction::Updated);
        assert_eq!(updated.question.id, created.base.id);
        assert_eq!(updated.question.text, "Q1 edited");
        assert_eq!(updated.question.category_id, other.id);
    }

    #[tokio::test]
    async fn test_update_english_without_base_row_is_inconsistent() {
        let (catalog, store, category) = setup().await;
        let created = catalog
            .create_logical_question(category.id, "Q1", Some("Q1-fr"), None)
            .await
            .unwrap();
        let fr_id = created.translations[&Language::French]
            .as_ref()
            .unwrap()
            .id;
        store.delete_question(created.base.id).await.unwrap();

        let result = catalog
            .update_logical_question(fr_id, category.id, "en", "Q1", None)
            .await;
        assert!(matches!(result, Err(AdminError::Consistency(_))));

        let result = catalog
            .update_logical_question(fr_id, category.id, "ja", "", Some("Q1-ja"))
            .await;
        assert!(matches!(result, Err(AdminError::Consistency(_))));

        // The orphaned row itself can still be edited
        let result = catalog
            .update_logical_question(fr_id, category.id, "fr", "", Some("Q1-fr v2"))
            .await
            .unwrap();
        assert_eq!(result.action, SlotAction::Updated);
    }

    #[tokio::test]
    async fn test_update_unknown_question() {
        let (catalog, _, category) = setup().await;
        let result = catalog
            .update_logical_question(Ulid::new(), category.id, "en", "Q", None)
            .await;
        assert!(matches!(result, Err(AdminError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_requires_text_for_slot() {
        let (catalog, _, category) = setup().await;
        let created = catalog
            .create_logical_question(category.id, "Q1", None, None)
            .await
            .unwrap();

        let result = catalog
            .update_logical_question(created.base.id, category.id, "fr", "Q1", None)
            .await;
        assert!(matches!(result, Err(AdminError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_does_not_cascade() {
        let (catalog, store, category) = setup().await;
        let created = catalog
            .create_logical_question(category.id, "Q1", Some("fr"), Some("ja"))
            .await
            .unwrap();

        catalog.delete_question(created.base.id).await.unwrap();
        let remaining = store.list_questions_by_base(created.base.id).await.unwrap();
        assert_eq!(remaining.len(), 2);

        let again = catalog.delete_question(created.base.id).await;
        assert!(matches!(again, Err(AdminError::NotFound(_))));
    }
}
