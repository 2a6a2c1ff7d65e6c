mod portfolio;
mod posts;
mod projects;

pub mod not_found;

use actix_web::{guard, web};

use crate::errors::FolioError;
use crate::guards;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default().error_handler(|err, _req| FolioError::from(err).into()),
    );
    cfg.app_data(
        web::QueryConfig::default().error_handler(|err, _req| FolioError::from(err).into()),
    );

    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/admin")
                    .guard(guard::fn_guard(guards::admin_key_guard))
                    .configure(posts::admin_config)
                    .configure(projects::admin_config),
            )
            .configure(posts::config)
            .configure(projects::config)
            .configure(portfolio::config),
    );
}
