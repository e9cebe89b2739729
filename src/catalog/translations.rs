//! Translation sets and completeness statistics.

use std::collections::{HashMap, HashSet};

use super::Catalog;
use crate::config::{
    MissingCountStrategy, DEFAULT_COMPLETENESS, DEFAULT_LANGUAGE, SUPPORTED_LANGUAGE_COUNT,
};
use crate::error::{AdminError, AdminResult};
use crate::store::{QuestionFilter, StoreResult};
use crate::types::{Question, QuestionId, TranslationSet};

/// Completeness count per question id.
///
/// Ids whose translation set could not be resolved have no entry and read
/// as [`DEFAULT_COMPLETENESS`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationStatus {
    counts: HashMap<QuestionId, u8>,
}

impl TranslationStatus {
    /// Languages present for `id`, never less than one
    pub fn completeness(&self, id: &QuestionId) -> u8 {
        self.counts.get(id).copied().unwrap_or(DEFAULT_COMPLETENESS)
    }

    pub fn get(&self, id: &QuestionId) -> Option<u8> {
        self.counts.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn as_map(&self) -> &HashMap<QuestionId, u8> {
        &self.counts
    }
}

impl FromIterator<(QuestionId, u8)> for TranslationStatus {
    fn from_iter<I: IntoIterator<Item = (QuestionId, u8)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// Sum of languages still missing over a set of completeness counts
pub fn missing_translations(counts: impl IntoIterator<Item = u8>) -> u64 {
    counts
        .into_iter()
        .map(|count| u64::from(SUPPORTED_LANGUAGE_COUNT.saturating_sub(count)))
        .sum()
}

impl Catalog {
    /// All stored language variants of the logical question `base_question_id`
    pub async fn get_translations(
        &self,
        base_question_id: QuestionId,
    ) -> AdminResult<TranslationSet> {
        let rows = self.questions.list_questions_by_base(base_question_id).await?;
        Ok(TranslationSet::from_rows(rows))
    }

    /// Resolve a question and the translation set it belongs to
    pub async fn get_translations_for_question(
        &self,
        question_id: QuestionId,
    ) -> AdminResult<(Question, TranslationSet)> {
        let question = self
            .questions
            .get_question(question_id)
            .await?
            .ok_or_else(|| AdminError::NotFound(format!("question {}", question_id)))?;
        let set = self.get_translations(question.base_question_id).await?;
        Ok((question, set))
    }

    /// Completeness of the logical question behind each id.
    ///
    /// Lookups run concurrently. An id that is unknown or whose lookup fails
    /// is left out of the result.
    pub async fn get_translation_status(&self, question_ids: &[QuestionId]) -> TranslationStatus {
        let lookups = question_ids.iter().map(|id| async move {
            match self.completeness_of(*id).await {
                Ok(Some(count)) => Some((*id, count)),
                Ok(None) => None,
                Err(e) => {
                    tracing::warn!("Failed to resolve translations for question {}: {}", id, e);
                    None
                }
            }
        });

        futures::future::join_all(lookups)
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    async fn completeness_of(&self, question_id: QuestionId) -> StoreResult<Option<u8>> {
        let Some(question) = self.questions.get_question(question_id).await? else {
            return Ok(None);
        };
        let rows = self
            .questions
            .list_questions_by_base(question.base_question_id)
            .await?;
        Ok(Some(TranslationSet::from_rows(rows).completeness()))
    }

    /// Translations still missing across every English question
    pub async fn missing_translations_count(&self) -> AdminResult<u64> {
        let missing = match self.config.missing_count_strategy {
            MissingCountStrategy::PerQuestion => self.missing_count_per_question().await?,
            MissingCountStrategy::Grouped => self.missing_count_grouped().await?,
        };
        Ok(missing)
    }

    async fn missing_count_per_question(&self) -> StoreResult<u64> {
        let base_ids: Vec<QuestionId> = self
            .questions
            .list_questions(usize::MAX, 0, QuestionFilter::language(DEFAULT_LANGUAGE))
            .await?
            .into_iter()
            .map(|q| q.id)
            .collect();

        let status = self.get_translation_status(&base_ids).await;
        Ok(missing_translations(
            base_ids.iter().map(|id| status.completeness(id)),
        ))
    }

    async fn missing_count_grouped(&self) -> StoreResult<u64> {
        let rows = self
            .questions
            .list_questions(usize::MAX, 0, QuestionFilter::default())
            .await?;

        let mut languages_by_base: HashMap<QuestionId, HashSet<_>> = HashMap::new();
        for row in &rows {
            languages_by_base
                .entry(row.base_question_id)
                .or_default()
                .insert(row.language);
        }

        Ok(missing_translations(
            rows.iter()
                .filter(|row| row.language == DEFAULT_LANGUAGE)
                .map(|row| {
                    languages_by_base
                        .get(&row.base_question_id)
                        .map_or(DEFAULT_COMPLETENESS, |langs| langs.len() as u8)
                }),
        ))
    }
}
