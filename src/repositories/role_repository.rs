use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::role::Role;
use crate::models::user::User;
use crate::utils::errors::{AppError, AppResult};

use super::{map_unique_violation, user_repository};

/// Persistencia de roles.
///
/// `delete_reassigning_to` es la región transaccional del flujo de
/// eliminación: lee los usuarios del rol, los mueve al rol por defecto y
/// borra el rol, todo dentro de una misma transacción. O se aplica todo,
/// o no se aplica nada.
#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn insert(&self, name: &str, description: Option<&str>) -> AppResult<Role>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    /// Todos los roles, más recientes primero
    async fn find_all(&self) -> AppResult<Vec<Role>>;

    /// Roles cuyo nombre o descripción contiene el texto (case-insensitive)
    async fn search(&self, query: &str) -> AppResult<Vec<Role>>;

    /// Retorna `None` si el rol no existe
    async fn update_by_id(
        &self,
        id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
    ) -> AppResult<Option<Role>>;

    /// Elimina el rol moviendo antes sus usuarios al rol `fallback_name`.
    /// Retorna la cantidad de usuarios reasignados. Falla con `NotFound`
    /// si el rol desapareció (eliminación concurrente) y con
    /// `FallbackRoleMissing` si hay usuarios que mover pero el rol por
    /// defecto no existe.
    async fn delete_reassigning_to(&self, role_id: Uuid, fallback_name: &str) -> AppResult<u64>;
}

pub struct PgRoleRepository {
    pool: PgPool,
}

impl PgRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleStore for PgRoleRepository {
    async fn insert(&self, name: &str, description: Option<&str>) -> AppResult<Role> {
        let now = Utc::now();
        let role = sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO roles (id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                AppError::DuplicateName(format!("El rol '{}' ya existe", name))
            })
        })?;

        Ok(role)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>> {
        let role = sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(role)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let role = sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(role)
    }

    async fn find_all(&self) -> AppResult<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>("SELECT * FROM roles ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(roles)
    }

    async fn search(&self, query: &str) -> AppResult<Vec<Role>> {
        let pattern = format!("%{}%", query);
        let roles = sqlx::query_as::<_, Role>(
            r#"
            SELECT * FROM roles
            WHERE name ILIKE $1 OR description ILIKE $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(roles)
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
    ) -> AppResult<Option<Role>> {
        let current = match self.find_by_id(id).await? {
            Some(role) => role,
            None => return Ok(None),
        };

        let role = sqlx::query_as::<_, Role>(
            r#"
            UPDATE roles
            SET name = $2, description = $3, updated_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name.map(str::to_string).unwrap_or(current.name))
        .bind(description.map(str::to_string).or(current.description))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                AppError::DuplicateName("Ya existe otro rol con ese nombre".to_string())
            })
        })?;

        Ok(Some(role))
    }

    async fn delete_reassigning_to(&self, role_id: Uuid, fallback_name: &str) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        // FOR UPDATE: nadie más puede reasignar o borrar estos usuarios
        // mientras dura la transacción
        let users = sqlx::query_as::<_, User>("SELECT * FROM users WHERE role_id = $1 FOR UPDATE")
            .bind(role_id)
            .fetch_all(&mut *tx)
            .await?;

        let reassigned = if users.is_empty() {
            0
        } else {
            // El rol por defecto se re-resuelve dentro de la transacción y
            // queda bloqueado: no puede ser renombrado ni eliminado mientras
            // se mueven usuarios hacia él.
            let fallback =
                sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE name = $1 FOR UPDATE")
                    .bind(fallback_name)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or_else(|| {
                        AppError::FallbackRoleMissing(format!(
                            "El rol por defecto '{}' no existe",
                            fallback_name
                        ))
                    })?;

            let user_ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
            user_repository::reassign_role(&mut tx, &user_ids, fallback.id).await?
        };

        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(role_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // Una eliminación concurrente ganó: deshacer las reasignaciones
            tx.rollback().await?;
            return Err(AppError::NotFound(format!(
                "Rol con id '{}' no encontrado",
                role_id
            )));
        }

        tx.commit().await?;

        Ok(reassigned)
    }
}
