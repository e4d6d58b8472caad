//! Configuración de variables de entorno

use std::env;

/// Rol al que se reasignan los usuarios cuando se elimina su rol
pub const DEFAULT_FALLBACK_ROLE: &str = "Desarrollador";

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub default_role: String,
    pub cors_origins: Option<Vec<String>>,
}

impl EnvironmentConfig {
    /// Leer la configuración del entorno, con defaults de desarrollo
    pub fn from_env() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            default_role: env::var("DEFAULT_ROLE")
                .unwrap_or_else(|_| DEFAULT_FALLBACK_ROLE.to_string()),
            cors_origins: env::var("CORS_ORIGINS").ok().map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect()
            }),
        }
    }

    /// Obtener la dirección del servidor
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
