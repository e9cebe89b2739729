//! Paginated list and edit views for the admin pages

use std::collections::HashMap;

use super::Catalog;
use crate::config::{
    normalize_page_size, total_pages, DEFAULT_LANGUAGE, PAGE_SIZES, SUPPORTED_LANGUAGE_COUNT,
};
use crate::error::AdminResult;
use crate::store::QuestionFilter;
use crate::types::{Category, CategoryId, QuestionId};
use crate::views::{
    CategoryListView, CategoryOption, CategoryRow, CategoryView, QuestionEditView,
    QuestionListView, QuestionRow,
};

/// Resolved pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl PageRequest {
    /// Pages start at 1; page sizes outside the allow-list fall back to the default
    pub fn new(page: Option<usize>, per_page: Option<usize>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: normalize_page_size(per_page),
        }
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

fn category_options(
    categories: &[Category],
    counts: &HashMap<CategoryId, usize>,
    selected: Option<CategoryId>,
) -> Vec<CategoryOption> {
    categories
        .iter()
        .map(|c| CategoryOption {
            id: c.id.to_string(),
            key: c.key.clone(),
            label: c.label.clone(),
            icon: c.icon.clone(),
            question_count: counts.get(&c.id).copied().unwrap_or(0),
            selected: selected == Some(c.id),
        })
        .collect()
}

impl Catalog {
    /// English questions for the management page, annotated with translation status
    pub async fn list_questions_view(
        &self,
        page: Option<usize>,
        per_page: Option<usize>,
        category_filter: Option<CategoryId>,
    ) -> AdminResult<QuestionListView> {
        let request = PageRequest::new(page, per_page);

        let rows = self
            .questions
            .list_questions(
                request.per_page,
                request.offset(),
                QuestionFilter::language(DEFAULT_LANGUAGE).with_category(category_filter),
            )
            .await?;

        let counts = self
            .questions
            .question_counts_by_category(DEFAULT_LANGUAGE)
            .await?;
        let total = match category_filter {
            Some(category_id) => counts.get(&category_id).copied().unwrap_or(0),
            None => counts.values().sum(),
        };

        let ids: Vec<QuestionId> = rows.iter().map(|q| q.id).collect();
        let status = self.get_translation_status(&ids).await;
        let missing_translations_count = self.missing_translations_count().await?;

        let categories = self.all_categories().await?;
        let labels: HashMap<CategoryId, &str> = categories
            .iter()
            .map(|c| (c.id, c.label.as_str()))
            .collect();

        let questions = rows
            .iter()
            .map(|q| {
                let translation_count = status.completeness(&q.id);
                QuestionRow {
                    id: q.id.to_string(),
                    category_id: q.category_id.to_string(),
                    category_label: labels
                        .get(&q.category_id)
                        .map(|l| l.to_string())
                        .unwrap_or_default(),
                    language_code: q.language.code().to_string(),
                    text: q.text.clone(),
                    translation_count,
                    fully_translated: translation_count >= SUPPORTED_LANGUAGE_COUNT,
                    created_at: q.created_at.clone(),
                }
            })
            .collect();

        Ok(QuestionListView {
            questions,
            categories: category_options(&categories, &counts, category_filter),
            selected_category: category_filter.map(|id| id.to_string()),
            page: request.page,
            per_page: request.per_page,
            page_sizes: PAGE_SIZES.to_vec(),
            total,
            total_pages: total_pages(total, request.per_page),
            missing_translations_count,
        })
    }

    /// Categories for the category management page
    pub async fn list_categories_view(
        &self,
        page: Option<usize>,
        per_page: Option<usize>,
    ) -> AdminResult<CategoryListView> {
        let request = PageRequest::new(page, per_page);

        let categories = self
            .categories
            .list_categories(request.per_page, request.offset())
            .await?;
        let total = self.categories.category_count().await?;
        let counts = self
            .questions
            .question_counts_by_category(DEFAULT_LANGUAGE)
            .await?;

        Ok(CategoryListView {
            categories: categories
                .iter()
                .map(|c| CategoryRow {
                    category: CategoryView::from(c),
                    question_count: counts.get(&c.id).copied().unwrap_or(0),
                })
                .collect(),
            page: request.page,
            per_page: request.per_page,
            page_sizes: PAGE_SIZES.to_vec(),
            total,
            total_pages: total_pages(total, request.per_page),
        })
    }

    /// Edit form for the logical question `question_id` belongs to
    pub async fn question_edit_view(
        &self,
        question_id: QuestionId,
    ) -> AdminResult<QuestionEditView> {
        let (question, set) = self.get_translations_for_question(question_id).await?;
        let categories = self.all_categories().await?;
        let counts = self
            .questions
            .question_counts_by_category(DEFAULT_LANGUAGE)
            .await?;

        let category_id = set
            .english
            .as_ref()
            .map_or(question.category_id, |en| en.category_id);

        Ok(QuestionEditView {
            id: question.id.to_string(),
            base_question_id: question.base_question_id.to_string(),
            category_id: category_id.to_string(),
            text_en: set.english.as_ref().map(|q| q.text.clone()),
            text_fr: set.french.as_ref().map(|q| q.text.clone()),
            text_ja: set.japanese.as_ref().map(|q| q.text.clone()),
            languages: set
                .languages()
                .iter()
                .map(|l| l.code().to_string())
                .collect(),
            translation_count: set.completeness(),
            categories: category_options(&categories, &counts, Some(category_id)),
        })
    }
}
