use std::collections::BTreeMap;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::categories::{get_all_categories, get_category},
        Category,
    },
    server::{app::AppState, error::ApiError, extract::IdPath},
};

use super::{category_map, ApiResponse};

#[derive(Serialize)]
struct CategoriesBody {
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
struct CategoryBody {
    success: bool,
    category: Category,
}

async fn categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoriesBody>> {
    let categories = get_all_categories(&pool).await?;
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(CategoriesBody {
        categories: category_map(categories),
    }))
}

async fn category(
    State(pool): State<SqlitePool>,
    IdPath(id): IdPath,
) -> ApiResponse<Json<CategoryBody>> {
    let category = get_category(&pool, id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(CategoryBody {
        success: true,
        category,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(categories))
        .route("/categories/{id}", get(category))
        .with_state(state)
}
