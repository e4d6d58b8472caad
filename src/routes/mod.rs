pub mod role_routes;
pub mod user_routes;
