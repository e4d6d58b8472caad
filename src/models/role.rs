//! Modelo de Role
//!
//! Un rol es una categoría con nombre único que se asigna a usuarios.
//! El rol por defecto ("Desarrollador") absorbe a los usuarios de los
//! roles que se eliminan y nunca puede eliminarse a sí mismo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Role - mapea exactamente a la tabla roles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request para crear un nuevo rol
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoleRequest {
    #[validate(
        length(min = 2, max = 50),
        custom = "crate::utils::validation::not_blank"
    )]
    pub name: String,

    pub description: Option<String>,
}

/// Request para actualizar un rol existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    #[validate(
        length(min = 2, max = 50),
        custom = "crate::utils::validation::not_blank"
    )]
    pub name: Option<String>,

    pub description: Option<String>,
}

/// Resultado de eliminar un rol: cuántos usuarios fueron movidos
/// al rol por defecto antes de la eliminación
#[derive(Debug, Serialize)]
pub struct RoleDeletionSummary {
    pub deleted_role_id: Uuid,
    pub reassigned_users: u64,
}
