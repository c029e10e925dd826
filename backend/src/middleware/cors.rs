//! Cross-origin resource sharing policy for the public API.

use actix_cors::Cors;
use actix_web::http::header::{self, HeaderName};

/// Seconds browsers may cache a preflight response.
pub const CORS_MAX_AGE_SECS: usize = 300;

/// Open CORS policy: any origin, the CRUD methods, and no credentials.
///
/// Responses carry `Access-Control-Allow-Origin: *` rather than echoing the
/// caller's origin.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_service::middleware::cors_policy;
///
/// let app = App::new().wrap(cors_policy());
/// ```
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allowed_methods(["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-csrf-token"),
        ])
        .expose_headers([header::LINK])
        .max_age(CORS_MAX_AGE_SECS)
}
