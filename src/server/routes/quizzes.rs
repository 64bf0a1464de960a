use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions, Question},
    server::{
        app::AppState,
        error::{ApiError, Unprocessable},
        quiz::{QuizRng, ALL_CATEGORIES},
    },
    telemetry::QUIZ_QUESTIONS_SERVED,
};

use super::ApiResponse;

#[derive(Deserialize)]
struct QuizRequest {
    #[serde(default)]
    previous_questions: Option<Vec<i64>>,
    quiz_category: QuizCategory,
}

#[derive(Deserialize)]
struct QuizCategory {
    // clients send the id either as a number or as a numeric string
    #[serde(deserialize_with = "deserialize_number_from_string")]
    id: i64,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

/// `{}` once every candidate has been seen.
#[derive(Serialize)]
#[serde(untagged)]
enum NextQuestion {
    Question(Question),
    Exhausted {},
}

#[derive(Serialize)]
struct QuizBody {
    question: NextQuestion,
}

async fn next_question(
    State(pool): State<SqlitePool>,
    State(rng): State<QuizRng>,
    payload: Result<Json<QuizRequest>, JsonRejection>,
) -> ApiResponse<Json<QuizBody>> {
    let Json(request) = payload.map_err(ApiError::unprocessable_body)?;
    let category = request.quiz_category;
    let previous = request.previous_questions.unwrap_or_default();

    let candidates = if category.id == ALL_CATEGORIES {
        questions::get_all_questions(&pool).await
    } else {
        questions::get_questions_for_category(&pool, category.id).await
    }
    .map_err(Unprocessable::from)?;

    let question = match rng.select_next(candidates, &previous) {
        Some(question) => {
            let label = category.id.to_string();
            QUIZ_QUESTIONS_SERVED
                .with_label_values(&[label.as_str()])
                .inc();
            tracing::debug!(
                category = category.id,
                kind = category.kind.as_deref().unwrap_or_default(),
                seen = previous.len(),
                id = question.id,
                "Selected next quiz question"
            );
            NextQuestion::Question(question)
        }
        None => {
            tracing::debug!(
                category = category.id,
                seen = previous.len(),
                "Quiz exhausted"
            );
            NextQuestion::Exhausted {}
        }
    };
    Ok(Json(QuizBody { question }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question))
        .with_state(state)
}
