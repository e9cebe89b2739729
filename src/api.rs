//! HTTP API endpoints for the admin panel.
//!
//! Handlers parse text ids, call the catalog and return view models as JSON.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::CatalogConfig;
use crate::error::{parse_id, AdminError, AdminResult};
use crate::store::snapshot::CatalogSnapshot;
use crate::store::MemoryStore;
use crate::types::{CategoryId, Language};
use crate::views::{
    CategoryListView, CategoryView, CreatedQuestionView, LanguageView, QuestionEditView,
    QuestionListView, TranslationSetView, UpdatedQuestionView,
};

/// State shared by all admin handlers
#[derive(Clone)]
pub struct ApiState {
    pub catalog: Catalog,
    /// Backing store, used directly for snapshot export/import
    pub store: MemoryStore,
}

impl ApiState {
    pub fn new(store: MemoryStore, config: CatalogConfig) -> Self {
        Self {
            catalog: Catalog::in_memory(store.clone(), config),
            store,
        }
    }
}

pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/questions", get(list_questions).post(create_question))
        .route("/api/questions/status", post(translation_status))
        .route(
            "/api/questions/{id}",
            get(edit_question)
                .put(update_question)
                .delete(delete_question),
        )
        .route("/api/questions/{id}/translations", get(question_translations))
        .route("/api/categories", get(list_categories).post(create_category))
        .route(
            "/api/categories/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .route("/api/languages", get(list_languages))
        .route("/api/catalog/export", get(export_catalog))
        .route("/api/catalog/import", post(import_catalog))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    /// Category id; empty means "all categories"
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateQuestionForm {
    pub category_id: String,
    pub text_en: String,
    #[serde(default)]
    pub text_fr: Option<String>,
    #[serde(default)]
    pub text_ja: Option<String>,
}

/// Edit form: `text` feeds the English row, `translation_text` the French or Japanese one
#[derive(Debug, Deserialize)]
pub struct UpdateQuestionForm {
    pub category_id: String,
    #[serde(default)]
    pub lang_code: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub translation_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub icon: String,
}

fn optional_category(raw: Option<&str>) -> AdminResult<Option<CategoryId>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => parse_id(raw, "category").map(Some),
        None => Ok(None),
    }
}

/// List English questions with translation status.
///
/// GET /api/questions?page=1&per_page=25&category=<id>
pub async fn list_questions(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListQuery>,
) -> AdminResult<Json<QuestionListView>> {
    let category = optional_category(query.category.as_deref())?;
    let view = state
        .catalog
        .list_questions_view(query.page, query.per_page, category)
        .await?;
    Ok(Json(view))
}

/// Create a question with optional translations.
///
/// POST /api/questions
///
/// Responds 201 even when a translation could not be written; the body
/// reports which translations failed.
pub async fn create_question(
    State(state): State<Arc<ApiState>>,
    Json(form): Json<CreateQuestionForm>,
) -> AdminResult<Response> {
    let category_id = parse_id(&form.category_id, "category")?;
    let created = state
        .catalog
        .create_logical_question(
            category_id,
            &form.text_en,
            form.text_fr.as_deref(),
            form.text_ja.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(CreatedQuestionView::from(&created))).into_response())
}

/// GET /api/questions/{id}
pub async fn edit_question(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> AdminResult<Json<QuestionEditView>> {
    let id = parse_id(&id, "question")?;
    Ok(Json(state.catalog.question_edit_view(id).await?))
}

/// PUT /api/questions/{id}
pub async fn update_question(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(form): Json<UpdateQuestionForm>,
) -> AdminResult<Json<UpdatedQuestionView>> {
    let id = parse_id(&id, "question")?;
    let category_id = parse_id(&form.category_id, "category")?;
    let updated = state
        .catalog
        .update_logical_question(
            id,
            category_id,
            &form.lang_code,
            &form.text,
            form.translation_text.as_deref(),
        )
        .await?;
    Ok(Json(UpdatedQuestionView::from(&updated)))
}

/// DELETE /api/questions/{id}
pub async fn delete_question(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> AdminResult<StatusCode> {
    let id = parse_id(&id, "question")?;
    state.catalog.delete_question(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Translation set of the logical question `id` belongs to.
///
/// GET /api/questions/{id}/translations
pub async fn question_translations(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> AdminResult<Json<TranslationSetView>> {
    let id = parse_id(&id, "question")?;
    let (question, set) = state.catalog.get_translations_for_question(id).await?;
    Ok(Json(TranslationSetView::new(question.base_question_id, &set)))
}

/// Completeness count per question id.
///
/// POST /api/questions/status
///
/// Ids that cannot be resolved report the default count.
pub async fn translation_status(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<StatusRequest>,
) -> AdminResult<Json<HashMap<String, u8>>> {
    let ids = request
        .ids
        .iter()
        .map(|raw| parse_id(raw, "question"))
        .collect::<AdminResult<Vec<_>>>()?;

    let status = state.catalog.get_translation_status(&ids).await;
    Ok(Json(
        ids.iter()
            .map(|id| (id.to_string(), status.completeness(id)))
            .collect(),
    ))
}

/// GET /api/categories?page=1&per_page=25
pub async fn list_categories(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListQuery>,
) -> AdminResult<Json<CategoryListView>> {
    let view = state
        .catalog
        .list_categories_view(query.page, query.per_page)
        .await?;
    Ok(Json(view))
}

/// POST /api/categories
pub async fn create_category(
    State(state): State<Arc<ApiState>>,
    Json(form): Json<CategoryForm>,
) -> AdminResult<Response> {
    let category = state
        .catalog
        .create_category(&form.key, &form.label, &form.icon)
        .await?;
    Ok((StatusCode::CREATED, Json(CategoryView::from(&category))).into_response())
}

/// GET /api/categories/{id}
pub async fn get_category(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> AdminResult<Json<CategoryView>> {
    let id = parse_id(&id, "category")?;
    let category = state.catalog.get_category(id).await?;
    Ok(Json(CategoryView::from(&category)))
}

/// PUT /api/categories/{id}
pub async fn update_category(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(form): Json<CategoryForm>,
) -> AdminResult<Json<CategoryView>> {
    let id = parse_id(&id, "category")?;
    let category = state
        .catalog
        .update_category(id, &form.key, &form.label, &form.icon)
        .await?;
    Ok(Json(CategoryView::from(&category)))
}

/// DELETE /api/categories/{id}
pub async fn delete_category(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> AdminResult<StatusCode> {
    let id = parse_id(&id, "category")?;
    state.catalog.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Languages a question can be translated into.
///
/// GET /api/languages
pub async fn list_languages() -> Json<Vec<LanguageView>> {
    Json(Language::ALL.into_iter().map(LanguageView::from).collect())
}

/// Export the whole catalog as JSON.
///
/// GET /api/catalog/export
pub async fn export_catalog(State(state): State<Arc<ApiState>>) -> Json<CatalogSnapshot> {
    Json(state.store.snapshot().await)
}

/// Import a catalog snapshot.
///
/// POST /api/catalog/import
///
/// Replaces all categories and questions with the imported data.
pub async fn import_catalog(
    State(state): State<Arc<ApiState>>,
    Json(snapshot): Json<CatalogSnapshot>,
) -> AdminResult<Response> {
    match state.store.restore(snapshot).await {
        Ok(()) => Ok((StatusCode::OK, "Catalog imported successfully").into_response()),
        Err(e) => {
            tracing::error!("Catalog import failed: {}", e);
            Err(AdminError::Validation(format!("Import failed: {}", e)))
        }
    }
}
