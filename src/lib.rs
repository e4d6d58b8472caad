//! API REST para gestión de usuarios y roles.
//!
//! CRUD sobre las dos entidades más el flujo de eliminación de roles:
//! los usuarios del rol eliminado se reasignan al rol por defecto dentro
//! de una transacción, y el rol por defecto nunca puede eliminarse.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
