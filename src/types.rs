use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Opaque ID types for type safety
pub type CategoryId = Ulid;
pub type QuestionId = Ulid;

/// Languages a question can be written in.
///
/// English is the canonical language: every logical question is anchored by
/// exactly one English row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "ja")]
    Japanese,
}

impl Language {
    /// All supported question languages, canonical language first
    pub const ALL: [Language; 3] = [Language::English, Language::French, Language::Japanese];

    /// ISO 639-1 code ("en", "fr", "ja")
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::French => "fr",
            Language::Japanese => "ja",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::French => "French",
            Language::Japanese => "Japanese",
        }
    }

    pub fn is_canonical(&self) -> bool {
        *self == Language::English
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    /// Stable machine name (e.g. "first_date")
    pub key: String,
    pub label: String,
    pub icon: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A single question row in one language.
///
/// Rows sharing a `base_question_id` form one logical question. The English
/// row of a logical question points at itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub id: QuestionId,
    pub category_id: CategoryId,
    pub language: Language,
    pub text: String,
    pub base_question_id: QuestionId,
    pub created_at: String,
    pub updated_at: String,
}

impl Question {
    /// Build a new row stamped with the current time
    pub fn new(
        id: QuestionId,
        category_id: CategoryId,
        language: Language,
        text: String,
        base_question_id: QuestionId,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id,
            category_id,
            language,
            text,
            base_question_id,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// True for the canonical row of a logical question
    pub fn is_base(&self) -> bool {
        self.language.is_canonical() && self.id == self.base_question_id
    }
}

/// All language variants of one logical question, as currently stored
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationSet {
    pub english: Option<Question>,
    pub french: Option<Question>,
    pub japanese: Option<Question>,
}

impl TranslationSet {
    /// Bucket rows by language. A later row for an already filled slot is ignored.
    pub fn from_rows(rows: impl IntoIterator<Item = Question>) -> Self {
        let mut set = Self::default();
        for row in rows {
            let slot = set.slot_mut(row.language);
            if slot.is_none() {
                *slot = Some(row);
            }
        }
        set
    }

    pub fn get(&self, language: Language) -> Option<&Question> {
        match language {
            Language::English => self.english.as_ref(),
            Language::French => self.french.as_ref(),
            Language::Japanese => self.japanese.as_ref(),
        }
    }

    fn slot_mut(&mut self, language: Language) -> &mut Option<Question> {
        match language {
            Language::English => &mut self.english,
            Language::French => &mut self.french,
            Language::Japanese => &mut self.japanese,
        }
    }

    /// Number of languages with a stored row (0..=3)
    pub fn completeness(&self) -> u8 {
        Language::ALL
            .iter()
            .filter(|lang| self.get(**lang).is_some())
            .count() as u8
    }

    pub fn languages(&self) -> Vec<Language> {
        Language::ALL
            .into_iter()
            .filter(|lang| self.get(*lang).is_some())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::English.code(), "en");
        assert_eq!(Language::French.code(), "fr");
        assert_eq!(Language::Japanese.to_string(), "ja");
    }

    #[test]
    fn test_language_serializes_as_code() {
        let json = serde_json::to_string(&Language::Japanese).unwrap();
        assert_eq!(json, "\"ja\"");
        let parsed: Language = serde_json::from_str("\"fr\"").unwrap();
        assert_eq!(parsed, Language::French);
    }

    #[test]
    fn test_translation_set_buckets_rows() {
        let base = Ulid::new();
        let category = Ulid::new();
        let en = Question::new(base, category, Language::English, "Q".into(), base);
        let ja = Question::new(Ulid::new(), category, Language::Japanese, "Q-ja".into(), base);

        let set = TranslationSet::from_rows(vec![ja.clone(), en.clone()]);
        assert_eq!(set.english, Some(en));
        assert!(set.french.is_none());
        assert_eq!(set.japanese, Some(ja));
        assert_eq!(set.completeness(), 2);
        assert_eq!(set.languages(), vec![Language::English, Language::Japanese]);
        assert!(set.english.as_ref().unwrap().is_base());
    }
}
