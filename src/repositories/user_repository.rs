use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::user::User;
use crate::utils::errors::{AppError, AppResult};

use super::map_unique_violation;

/// Persistencia de usuarios
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(
        &self,
        name: &str,
        email: &str,
        password_hash: Option<&str>,
        role_id: Uuid,
    ) -> AppResult<User>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_all(&self) -> AppResult<Vec<User>>;

    /// Retorna `None` si el usuario no existe
    async fn update_by_id(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
        password_hash: Option<&str>,
        role_id: Option<Uuid>,
    ) -> AppResult<Option<User>>;

    /// Retorna `false` si el usuario no existía
    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool>;
}

/// Reasignación masiva de rol, usada únicamente desde la región
/// transaccional de la eliminación de roles. Aplica a todos los usuarios
/// dados dentro de la transacción recibida: o se mueven todos, o el
/// rollback de la transacción no mueve a ninguno.
pub(crate) async fn reassign_role(
    tx: &mut Transaction<'_, Postgres>,
    user_ids: &[Uuid],
    role_id: Uuid,
) -> AppResult<u64> {
    let result = sqlx::query("UPDATE users SET role_id = $1, updated_at = $2 WHERE id = ANY($3)")
        .bind(role_id)
        .bind(Utc::now())
        .bind(user_ids)
        .execute(&mut **tx)
        .await?;

    Ok(result.rows_affected())
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn insert(
        &self,
        name: &str,
        email: &str,
        password_hash: Option<&str>,
        role_id: Uuid,
    ) -> AppResult<User> {
        let now = Utc::now();
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, role_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                AppError::DuplicateEmail(format!("El email '{}' ya está en uso", email))
            })
        })?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
        password_hash: Option<&str>,
        role_id: Option<Uuid>,
    ) -> AppResult<Option<User>> {
        let current = match self.find_by_id(id).await? {
            Some(user) => user,
            None => return Ok(None),
        };

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, email = $3, password_hash = $4, role_id = $5, updated_at = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name.map(str::to_string).unwrap_or(current.name))
        .bind(email.map(str::to_string).unwrap_or(current.email))
        .bind(password_hash.map(str::to_string).or(current.password_hash))
        .bind(role_id.unwrap_or(current.role_id))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                AppError::DuplicateEmail("El email ya está en uso por otro usuario".to_string())
            })
        })?;

        Ok(Some(user))
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
