//! Acceso a datos
//!
//! Traits de persistencia por entidad y sus implementaciones PostgreSQL.
//! Los controladores reciben los traits inyectados, lo que permite
//! sustituirlos por fakes en memoria en los tests.

pub mod role_repository;
pub mod user_repository;

pub use role_repository::{PgRoleRepository, RoleStore};
pub use user_repository::{PgUserRepository, UserStore};

use crate::utils::errors::AppError;

/// Mapear violaciones de UNIQUE (código Postgres 23505) al error de
/// duplicado correspondiente. La constraint del schema es la que serializa
/// dos creates concurrentes que pasaron el pre-chequeo de unicidad.
pub(crate) fn map_unique_violation<F>(err: sqlx::Error, duplicate: F) -> AppError
where
    F: FnOnce() -> AppError,
{
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => duplicate(),
        _ => AppError::Database(err),
    }
}
