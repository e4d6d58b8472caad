use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::models::role::{CreateRoleRequest, Role, RoleDeletionSummary, UpdateRoleRequest};
use crate::repositories::{PgRoleRepository, RoleStore};
use crate::services::ReassignmentService;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub struct RoleController {
    roles: Arc<dyn RoleStore>,
    deletion: ReassignmentService,
}

impl RoleController {
    pub fn new(roles: Arc<dyn RoleStore>, fallback_role: String) -> Self {
        let deletion = ReassignmentService::new(roles.clone(), fallback_role);
        Self { roles, deletion }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            Arc::new(PgRoleRepository::new(state.pool.clone())),
            state.config.default_role.clone(),
        )
    }

    pub async fn create(&self, request: CreateRoleRequest) -> AppResult<ApiResponse<Role>> {
        request.validate()?;

        // Pre-chequeo para un error claro; la constraint UNIQUE cubre la
        // carrera entre dos creates concurrentes
        if self.roles.find_by_name(&request.name).await?.is_some() {
            return Err(AppError::DuplicateName(format!(
                "El rol '{}' ya existe",
                request.name
            )));
        }

        let role = self
            .roles
            .insert(&request.name, request.description.as_deref())
            .await?;

        info!("Rol '{}' creado", role.name);

        Ok(ApiResponse::success_with_message(
            role,
            "Rol creado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Role> {
        self.roles
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Rol con id '{}' no encontrado", id)))
    }

    pub async fn list(&self) -> AppResult<Vec<Role>> {
        self.roles.find_all().await
    }

    pub async fn search(&self, query: &str) -> AppResult<Vec<Role>> {
        self.roles.search(query).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateRoleRequest,
    ) -> AppResult<ApiResponse<Role>> {
        request.validate()?;

        // Si cambia el nombre, no puede colisionar con otro rol
        if let Some(name) = &request.name {
            if let Some(existing) = self.roles.find_by_name(name).await? {
                if existing.id != id {
                    return Err(AppError::DuplicateName(format!(
                        "Ya existe otro rol con el nombre '{}'",
                        name
                    )));
                }
            }
        }

        let role = self
            .roles
            .update_by_id(id, request.name.as_deref(), request.description.as_deref())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Rol con id '{}' no encontrado", id)))?;

        Ok(ApiResponse::success_with_message(
            role,
            "Rol actualizado exitosamente".to_string(),
        ))
    }

    /// La eliminación pasa siempre por el servicio de reasignación; nunca
    /// es un DELETE directo
    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<RoleDeletionSummary>> {
        let summary = self.deletion.delete_role(id).await?;

        Ok(ApiResponse::success_with_message(
            summary,
            "Rol eliminado exitosamente".to_string(),
        ))
    }
}
