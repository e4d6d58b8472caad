//! Utilidades de validación
//!
//! Funciones helper usadas por los derives de `validator` en los requests.

use validator::ValidationError;

/// Validar que un string no sea solo espacios en blanco
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}
