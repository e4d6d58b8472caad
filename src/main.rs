use anyhow::Result;
use axum::{http::StatusCode, response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use users_roles_api::config::environment::EnvironmentConfig;
use users_roles_api::database;
use users_roles_api::dto::api_response::ApiResponse;
use users_roles_api::middleware::cors::cors_layer;
use users_roles_api::routes;
use users_roles_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("👥 API de Gestión de Usuarios y Roles");
    info!("=====================================");

    let config = EnvironmentConfig::from_env();

    // Inicializar base de datos
    let pool = match database::create_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    // Crear tablas y sembrar roles predeterminados
    database::schema::ensure_schema(&pool).await?;
    database::schema::seed_default_roles(&pool, &config.default_role).await?;

    let addr: SocketAddr = config.server_addr().parse()?;
    let cors = cors_layer(config.cors_origins.as_deref());
    let app_state = AppState::new(pool, config);

    // Crear router de la API
    let app = Router::new()
        .route("/health", get(health))
        .nest("/api/roles", routes::role_routes::create_role_router())
        .nest("/api/users", routes::user_routes::create_user_router())
        .fallback(not_found)
        .layer(cors)
        .with_state(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET    /health - Health check");
    info!("🎭 Roles:");
    info!("   POST   /api/roles - Crear rol");
    info!("   GET    /api/roles - Listar roles");
    info!("   GET    /api/roles/search/:query - Buscar roles");
    info!("   GET    /api/roles/:id - Obtener rol");
    info!("   PUT    /api/roles/:id - Actualizar rol");
    info!("   DELETE /api/roles/:id - Eliminar rol (reasigna usuarios al rol por defecto)");
    info!("👤 Usuarios:");
    info!("   POST   /api/users - Crear usuario");
    info!("   GET    /api/users - Listar usuarios");
    info!("   GET    /api/users/:id - Obtener usuario");
    info!("   PUT    /api/users/:id - Actualizar usuario");
    info!("   DELETE /api/users/:id - Eliminar usuario");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "service": "users-roles-api",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Handler para rutas desconocidas
async fn not_found() -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error("Ruta no encontrada".to_string())),
    )
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
