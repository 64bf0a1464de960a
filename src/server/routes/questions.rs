use std::collections::BTreeMap;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_all_categories, questions},
        NewQuestion, Question,
    },
    server::{
        app::AppState,
        deserializers::PageQuery,
        error::{ApiError, Unprocessable},
        extract::IdPath,
        pagination::paginate,
    },
    telemetry::QUESTIONS_CREATED,
};

use super::{category_map, ApiResponse, CURRENT_CATEGORY};

#[derive(Deserialize)]
struct CreateQuestion {
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
}

impl From<CreateQuestion> for NewQuestion {
    fn from(body: CreateQuestion) -> Self {
        NewQuestion {
            question: body.question,
            answer: body.answer,
            category: body.category,
            difficulty: body.difficulty,
        }
    }
}

#[derive(Deserialize)]
struct SearchRequest {
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    categories: Option<BTreeMap<i64, String>>,
    #[serde(rename = "currentCategory")]
    current_category: &'static str,
}

#[derive(Serialize)]
struct Created {
    success: bool,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
    deleted: i64,
}

impl QuestionsPage {
    /// Slices `selection` to `page`. `total_questions` counts the whole selection.
    fn new(selection: Vec<Question>, page: usize) -> Self {
        let total_questions = selection.len();
        Self {
            success: true,
            questions: paginate(selection, page),
            total_questions,
            categories: None,
            current_category: CURRENT_CATEGORY,
        }
    }

    /// Filtered listings are only "not found" when nothing matched; a page
    /// past the end of a non-empty selection is an empty page.
    fn of_matches(selection: Vec<Question>, page: usize) -> ApiResponse<Self> {
        if selection.is_empty() {
            return Err(ApiError::NotFound);
        }
        Ok(Self::new(selection, page))
    }
}

fn page_of(query: Result<Query<PageQuery>, QueryRejection>) -> usize {
    query.map(|Query(q)| q).unwrap_or_default().page
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResponse<Json<QuestionsPage>> {
    let selection = questions::get_all_questions(&pool).await?;
    let categories = get_all_categories(&pool).await?;

    // the full listing has no filter, so an empty page means there is nothing to show
    let mut page = QuestionsPage::new(selection, page_of(query));
    if page.questions.is_empty() {
        return Err(ApiError::NotFound);
    }
    page.categories = Some(category_map(categories));
    Ok(Json(page))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    payload: Result<Json<CreateQuestion>, JsonRejection>,
) -> ApiResponse<Json<Created>> {
    let Json(body) = payload?;
    let id = questions::create_question(&pool, body.into())
        .await
        .map_err(Unprocessable::from)?;

    QUESTIONS_CREATED.inc();
    tracing::info!(id, "Created question");
    Ok(Json(Created { success: true }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    IdPath(id): IdPath,
) -> ApiResponse<Json<Deleted>> {
    let deleted = questions::delete_question(&pool, id)
        .await
        .map_err(Unprocessable::from)?;
    if deleted == 0 {
        return Err(Unprocessable::Missing(id).into());
    }

    tracing::info!(id, "Deleted question");
    Ok(Json(Deleted {
        success: true,
        deleted: id,
    }))
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    query: Result<Query<PageQuery>, QueryRejection>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> ApiResponse<Json<QuestionsPage>> {
    let Json(body) = payload.map_err(ApiError::unprocessable_body)?;
    let term = body
        .search_term
        .ok_or_else(|| Unprocessable::Validation("searchTerm is required".to_owned()))?;

    let selection = questions::search_questions(&pool, &term)
        .await
        .map_err(Unprocessable::from)?;
    tracing::debug!(term = %term, matches = selection.len(), "Searched questions");

    Ok(Json(QuestionsPage::of_matches(selection, page_of(query))?))
}

async fn questions_by_category(
    State(pool): State<SqlitePool>,
    IdPath(category): IdPath,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResponse<Json<QuestionsPage>> {
    let selection = questions::get_questions_for_category(&pool, category).await?;
    Ok(Json(QuestionsPage::of_matches(selection, page_of(query))?))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/{id}", delete(delete_question))
        .route("/search/questions", post(search_questions))
        .route("/categories/{id}/questions", get(questions_by_category))
        .with_state(state)
}
