//! Schema y datos iniciales
//!
//! Crea las tablas si no existen y siembra los roles predeterminados.
//! La unicidad (nombre de rol, email de usuario) y la integridad
//! referencial usuario→rol viven en el schema, no solo en la aplicación.

use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::utils::errors::{AppError, AppResult};

/// Roles predeterminados del sistema
pub const DEFAULT_ROLES: [(&str, &str); 4] = [
    ("Administrador", "Acceso completo al sistema"),
    ("Lider de Proyecto", "Gestiona proyectos y equipos"),
    ("Desarrollador", "Implementa funcionalidades"),
    ("QA", "Revisa y valida el trabajo"),
];

/// Crear las tablas si no existen
pub async fn ensure_schema(pool: &PgPool) -> AppResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS roles (
            id UUID PRIMARY KEY,
            name VARCHAR(50) NOT NULL UNIQUE,
            description TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            name VARCHAR(50) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            password_hash VARCHAR(255),
            role_id UUID NOT NULL REFERENCES roles(id),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Sembrar los roles predeterminados. Idempotente: los roles que ya
/// existen no se tocan.
pub async fn seed_default_roles(pool: &PgPool, fallback_role: &str) -> AppResult<()> {
    for (name, description) in DEFAULT_ROLES {
        sqlx::query(
            r#"
            INSERT INTO roles (id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .bind(Utc::now())
        .execute(pool)
        .await?;
    }

    // Sin el rol por defecto, la eliminación de roles no tiene destino de
    // reasignación: mejor fallar al arrancar que en el primer DELETE
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM roles WHERE name = $1)")
        .bind(fallback_role)
        .fetch_one(pool)
        .await?;

    if !exists.0 {
        return Err(AppError::FallbackRoleMissing(format!(
            "El rol por defecto '{}' no existe después del seed",
            fallback_role
        )));
    }

    info!("Base de datos inicializada correctamente");

    Ok(())
}
