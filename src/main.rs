use actix_cors::Cors;
use actix_web::{App, HttpServer, http, middleware, web};
use sqlx::postgres::PgPoolOptions;

use folio::config::Config;
use folio::database::store::PgStore;
use folio::{AppState, routes};

fn cors(origin: Option<&str>) -> Cors {
    let cors = match origin {
        Some(origin) => Cors::default().allowed_origin(origin),
        None => Cors::default().allow_any_origin(),
    };

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![http::header::CONTENT_TYPE, http::header::ACCEPT])
        .allowed_header(folio::guards::ADMIN_KEY_HEADER)
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    if config.admin_key.is_none() {
        tracing::warn!("ADMIN_KEY is not set, write routes are disabled");
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    let state = web::Data::new(AppState {
        store: PgStore::new(pool, config.retry),
        admin_key: config.admin_key.clone(),
    });

    tracing::info!("Listening on {}", config.server_url);

    let cors_origin = config.cors_origin.clone();
    let http_server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(cors(cors_origin.as_deref()))
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(routes::config)
            .default_service(web::route().to(routes::not_found::not_found))
    })
    .bind(&config.server_url)?
    .run();

    http_server.await?;

    Ok(())
}
