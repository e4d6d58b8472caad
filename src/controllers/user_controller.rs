use std::sync::Arc;

use bcrypt::{hash, DEFAULT_COST};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::models::user::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::repositories::{PgRoleRepository, PgUserRepository, RoleStore, UserStore};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub struct UserController {
    users: Arc<dyn UserStore>,
    roles: Arc<dyn RoleStore>,
}

impl UserController {
    pub fn new(users: Arc<dyn UserStore>, roles: Arc<dyn RoleStore>) -> Self {
        Self { users, roles }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            Arc::new(PgUserRepository::new(state.pool.clone())),
            Arc::new(PgRoleRepository::new(state.pool.clone())),
        )
    }

    pub async fn create(&self, request: CreateUserRequest) -> AppResult<ApiResponse<UserResponse>> {
        request.validate()?;

        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::DuplicateEmail(format!(
                "El email '{}' ya está en uso",
                request.email
            )));
        }

        self.ensure_role_exists(request.role_id).await?;

        let password_hash = hash_password(request.password.as_deref())?;

        let user = self
            .users
            .insert(
                &request.name,
                &request.email,
                password_hash.as_deref(),
                request.role_id,
            )
            .await?;

        info!("Usuario '{}' creado", user.email);

        Ok(ApiResponse::success_with_message(
            user.into(),
            "Usuario creado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<UserResponse> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Usuario con id '{}' no encontrado", id)))?;

        Ok(user.into())
    }

    pub async fn list(&self) -> AppResult<Vec<UserResponse>> {
        let users = self.users.find_all().await?;

        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> AppResult<ApiResponse<UserResponse>> {
        request.validate()?;

        let current = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Usuario con id '{}' no encontrado", id)))?;

        // La unicidad de email se omite cuando el email recibido es el
        // actual: actualizarse a sí mismo no es una colisión
        if let Some(email) = &request.email {
            if *email != current.email && self.users.find_by_email(email).await?.is_some() {
                return Err(AppError::DuplicateEmail(format!(
                    "El email '{}' ya está en uso por otro usuario",
                    email
                )));
            }
        }

        // El rol se re-valida solo si viene en el request
        if let Some(role_id) = request.role_id {
            self.ensure_role_exists(role_id).await?;
        }

        let password_hash = hash_password(request.password.as_deref())?;

        let user = self
            .users
            .update_by_id(
                id,
                request.name.as_deref(),
                request.email.as_deref(),
                password_hash.as_deref(),
                request.role_id,
            )
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Usuario con id '{}' no encontrado", id)))?;

        Ok(ApiResponse::success_with_message(
            user.into(),
            "Usuario actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let deleted = self.users.delete_by_id(id).await?;

        if !deleted {
            return Err(AppError::NotFound(format!(
                "Usuario con id '{}' no encontrado",
                id
            )));
        }

        info!("Usuario '{}' eliminado", id);

        Ok(())
    }

    async fn ensure_role_exists(&self, role_id: Uuid) -> AppResult<()> {
        if self.roles.find_by_id(role_id).await?.is_none() {
            return Err(AppError::InvalidRole(format!(
                "El rol con id '{}' no existe",
                role_id
            )));
        }
        Ok(())
    }
}

fn hash_password(password: Option<&str>) -> AppResult<Option<String>> {
    password
        .map(|p| {
            hash(p, DEFAULT_COST)
                .map_err(|e| AppError::Internal(format!("Error hashing password: {}", e)))
        })
        .transpose()
}
