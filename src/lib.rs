use crate::database::store::PgStore;

pub mod config;
pub mod database;
pub mod errors;
pub mod guards;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod utils;

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: PgStore,
    pub admin_key: Option<String>,
}
