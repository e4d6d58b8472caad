//! Controladores
//!
//! Lógica de negocio por entidad: validación de entrada, chequeos de
//! unicidad y mapeo a DTOs. Reciben la persistencia inyectada como trait.

pub mod role_controller;
pub mod user_controller;

pub use role_controller::RoleController;
pub use user_controller::UserController;
