//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod management;
pub mod state;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register extractor error handlers and every route.
///
/// User routes live under `/api/v1`; probes and management routes sit at the
/// root. Callers supply `web::Data<HttpState>` and `web::Data<HealthState>`.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_service::inbound::http::configure;
///
/// let app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(
            web::scope("/api/v1")
                .service(users::list_users)
                .service(users::create_user)
                .service(users::get_user)
                .service(users::update_user)
                .service(users::delete_user),
        )
        .service(health::health)
        .service(health::readyz)
        .service(management::set_log_level);
}
