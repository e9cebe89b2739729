//! View models handed to the presentation layer.
//!
//! Everything here is plain data: ids as strings, labels, counts and flags.

use serde::Serialize;

use crate::catalog::{CreatedQuestion, SlotAction, UpdatedQuestion};
use crate::types::{Category, Language, Question, TranslationSet};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuestionView {
    pub id: String,
    pub category_id: String,
    pub language_code: String,
    pub text: String,
    pub base_question_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Question> for QuestionView {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id.to_string(),
            category_id: q.category_id.to_string(),
            language_code: q.language.code().to_string(),
            text: q.text.clone(),
            base_question_id: q.base_question_id.to_string(),
            created_at: q.created_at.clone(),
            updated_at: q.updated_at.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryView {
    pub id: String,
    pub key: String,
    pub label: String,
    pub icon: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Category> for CategoryView {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id.to_string(),
            key: c.key.clone(),
            label: c.label.clone(),
            icon: c.icon.clone(),
            created_at: c.created_at.clone(),
            updated_at: c.updated_at.clone(),
        }
    }
}

/// A category in the filter dropdown
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryOption {
    pub id: String,
    pub key: String,
    pub label: String,
    pub icon: String,
    /// English questions in this category
    pub question_count: usize,
    pub selected: bool,
}

/// One line of the question management list (always the English row)
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuestionRow {
    pub id: String,
    pub category_id: String,
    /// Empty when the category was deleted
    pub category_label: String,
    pub language_code: String,
    pub text: String,
    /// Languages present for this logical question (1..=3)
    pub translation_count: u8,
    pub fully_translated: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuestionListView {
    pub questions: Vec<QuestionRow>,
    pub categories: Vec<CategoryOption>,
    pub selected_category: Option<String>,
    pub page: usize,
    pub per_page: usize,
    pub page_sizes: Vec<usize>,
    pub total: usize,
    pub total_pages: usize,
    /// Translations still to write across the whole corpus
    pub missing_translations_count: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryRow {
    #[serde(flatten)]
    pub category: CategoryView,
    pub question_count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryListView {
    pub categories: Vec<CategoryRow>,
    pub page: usize,
    pub per_page: usize,
    pub page_sizes: Vec<usize>,
    pub total: usize,
    pub total_pages: usize,
}

/// Fields of the question edit form: one main field plus one per translation
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuestionEditView {
    pub id: String,
    pub base_question_id: String,
    pub category_id: String,
    pub text_en: Option<String>,
    pub text_fr: Option<String>,
    pub text_ja: Option<String>,
    pub languages: Vec<String>,
    pub translation_count: u8,
    pub categories: Vec<CategoryOption>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TranslationSetView {
    pub base_question_id: String,
    pub english: Option<QuestionView>,
    pub french: Option<QuestionView>,
    pub japanese: Option<QuestionView>,
    pub translation_count: u8,
}

impl TranslationSetView {
    pub fn new(base_question_id: ulid::Ulid, set: &TranslationSet) -> Self {
        Self {
            base_question_id: base_question_id.to_string(),
            english: set.english.as_ref().map(QuestionView::from),
            french: set.french.as_ref().map(QuestionView::from),
            japanese: set.japanese.as_ref().map(QuestionView::from),
            translation_count: set.completeness(),
        }
    }
}

/// Outcome of one optional translation write
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TranslationWriteView {
    pub language_code: String,
    pub question_id: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreatedQuestionView {
    pub base: QuestionView,
    pub translations: Vec<TranslationWriteView>,
    pub fully_synced: bool,
}

impl From<&CreatedQuestion> for CreatedQuestionView {
    fn from(created: &CreatedQuestion) -> Self {
        let translations = created
            .translations
            .iter()
            .map(|(language, write)| match write {
                Ok(question) => TranslationWriteView {
                    language_code: language.code().to_string(),
                    question_id: Some(question.id.to_string()),
                    error: None,
                },
                Err(e) => TranslationWriteView {
                    language_code: language.code().to_string(),
                    question_id: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();

        Self {
            base: QuestionView::from(&created.base),
            translations,
            fully_synced: created.is_fully_synced(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UpdatedQuestionView {
    pub question: QuestionView,
    pub action: SlotAction,
}

impl From<&UpdatedQuestion> for UpdatedQuestionView {
    fn from(updated: &UpdatedQuestion) -> Self {
        Self {
            question: QuestionView::from(&updated.question),
            action: updated.action,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LanguageView {
    pub code: String,
    pub name: String,
    pub canonical: bool,
}

impl From<Language> for LanguageView {
    fn from(language: Language) -> Self {
        Self {
            code: language.code().to_string(),
            name: language.name().to_string(),
            canonical: language.is_canonical(),
        }
    }
}
