use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::RoleController;
use crate::dto::api_response::ApiResponse;
use crate::models::role::{CreateRoleRequest, Role, RoleDeletionSummary, UpdateRoleRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_role_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_role))
        .route("/", get(list_roles))
        .route("/search/:query", get(search_roles))
        .route("/:id", get(get_role))
        .route("/:id", put(update_role))
        .route("/:id", delete(delete_role))
}

async fn create_role(
    State(state): State<AppState>,
    Json(request): Json<CreateRoleRequest>,
) -> Result<Json<ApiResponse<Role>>, AppError> {
    let controller = RoleController::from_state(&state);
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_roles(State(state): State<AppState>) -> Result<Json<Vec<Role>>, AppError> {
    let controller = RoleController::from_state(&state);
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn search_roles(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<Json<Vec<Role>>, AppError> {
    let controller = RoleController::from_state(&state);
    let response = controller.search(&query).await?;
    Ok(Json(response))
}

async fn get_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Role>, AppError> {
    let controller = RoleController::from_state(&state);
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<ApiResponse<Role>>, AppError> {
    let controller = RoleController::from_state(&state);
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RoleDeletionSummary>>, AppError> {
    let controller = RoleController::from_state(&state);
    let response = controller.delete(id).await?;
    Ok(Json(response))
}
