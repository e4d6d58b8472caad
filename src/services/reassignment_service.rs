//! Eliminación de roles con reasignación de usuarios
//!
//! Eliminar un rol no puede dejar usuarios apuntando a un rol inexistente.
//! Este servicio coordina el flujo completo: los usuarios del rol se mueven
//! al rol por defecto antes de borrar el rol, dentro de una misma
//! transacción, y el rol por defecto nunca puede eliminarse.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::models::role::RoleDeletionSummary;
use crate::repositories::RoleStore;
use crate::utils::errors::{AppError, AppResult};

pub struct ReassignmentService {
    roles: Arc<dyn RoleStore>,
    fallback_role: String,
}

impl ReassignmentService {
    pub fn new(roles: Arc<dyn RoleStore>, fallback_role: String) -> Self {
        Self {
            roles,
            fallback_role,
        }
    }

    /// Eliminar un rol.
    ///
    /// El rol por defecto es el destino de las reasignaciones: si se
    /// permitiera borrarlo, una eliminación posterior no tendría a dónde
    /// mover los usuarios. Por eso se rechaza con `ProtectedRole` antes de
    /// tocar la base de datos.
    pub async fn delete_role(&self, id: Uuid) -> AppResult<RoleDeletionSummary> {
        let role = self
            .roles
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Rol con id '{}' no encontrado", id)))?;

        if role.name == self.fallback_role {
            warn!(
                "Intento de eliminar el rol por defecto '{}'",
                self.fallback_role
            );
            return Err(AppError::ProtectedRole(format!(
                "No se puede eliminar el rol por defecto: {}",
                self.fallback_role
            )));
        }

        // Región atómica: leer usuarios del rol, reasignarlos al rol por
        // defecto y borrar el rol. Un fallo en cualquier punto deshace todo.
        let reassigned = self
            .roles
            .delete_reassigning_to(role.id, &self.fallback_role)
            .await?;

        info!(
            "Rol '{}' eliminado, {} usuarios reasignados a '{}'",
            role.name, reassigned, self.fallback_role
        );

        Ok(RoleDeletionSummary {
            deleted_role_id: role.id,
            reassigned_users: reassigned,
        })
    }
}
