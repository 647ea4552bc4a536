use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::state::AppState;

use super::dto::{GroceriesQuery, MealsQuery};
use super::types::{Grocery, Meal};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals))
        .route("/meals/:id", get(get_meal))
        .route("/groceries", get(list_groceries))
        .route("/groceries/:id", get(get_grocery))
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    Query(q): Query<MealsQuery>,
) -> Json<Vec<Meal>> {
    let meals = state
        .catalog
        .list_meals(q.category, q.featured)
        .into_iter()
        .cloned()
        .collect();
    Json(meals)
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Meal>, (StatusCode, String)> {
    state
        .catalog
        .get_meal(&id)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, format!("no meal with id {id:?}")))
}

#[instrument(skip(state))]
pub async fn list_groceries(
    State(state): State<AppState>,
    Query(q): Query<GroceriesQuery>,
) -> Json<Vec<Grocery>> {
    let groceries = state
        .catalog
        .list_groceries(q.category.as_deref())
        .into_iter()
        .cloned()
        .collect();
    Json(groceries)
}

#[instrument(skip(state))]
pub async fn get_grocery(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Grocery>, (StatusCode, String)> {
    state
        .catalog
        .get_grocery(&id)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, format!("no grocery with id {id:?}")))
}
