//! Runtime management endpoints.
//!
//! ```text
//! GET /debug/log?level=DEBUG&format=json
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::logging::{LogControlError, LogSettings};

/// Query parameters for `GET /debug/log`. Both are optional.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LogQuery {
    /// One of DEBUG, INFO, WARN, ERROR (any case).
    pub level: Option<String>,
    /// One of json, text (any case).
    pub format: Option<String>,
}

/// Logging configuration in effect after the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LogSettingsResponse {
    #[schema(example = "INFO")]
    pub level: String,
    #[schema(example = "text")]
    pub format: String,
}

impl From<LogSettings> for LogSettingsResponse {
    fn from(value: LogSettings) -> Self {
        Self {
            level: value.level.to_string(),
            format: value.format.to_string(),
        }
    }
}

fn map_log_error(err: LogControlError) -> Error {
    match err {
        LogControlError::InvalidLevel { .. } => Error::new(ErrorCode::InvalidLogLevel, err.to_string()),
        LogControlError::InvalidFormat { .. } => {
            Error::new(ErrorCode::InvalidLogFormat, err.to_string())
        }
        LogControlError::Reload { .. } | LogControlError::Install { .. } => {
            tracing::error!(error = %err, "log reconfiguration failed");
            Error::internal("Failed to apply logging configuration")
        }
    }
}

/// Read, and optionally change, the log level and format.
///
/// The level is applied before the format; an invalid format therefore
/// leaves a valid level change in place.
#[utoipa::path(
    get,
    path = "/debug/log",
    params(LogQuery),
    responses(
        (status = 200, description = "Current logging configuration", body = LogSettingsResponse),
        (status = 400, description = "Unknown level or format", body = Error)
    ),
    tags = ["management"],
    operation_id = "setLogLevel"
)]
#[get("/debug/log")]
pub async fn set_log_level(
    state: web::Data<HttpState>,
    query: web::Query<LogQuery>,
) -> ApiResult<web::Json<LogSettingsResponse>> {
    let LogQuery { level, format } = query.into_inner();
    let control = &state.log_control;

    if let Some(level) = level.as_deref() {
        let settings = control.set_level(level).map_err(map_log_error)?;
        info!(level = %settings.level, "log level changed");
    }
    if let Some(format) = format.as_deref() {
        let settings = control.set_format(format).map_err(map_log_error)?;
        info!(format = %settings.format, "log format changed");
    }

    Ok(web::Json(control.settings().into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::{MockUsersCommand, MockUsersQuery};
    use crate::logging::{LogControl, LogFormat, LogLevel};
    use actix_web::{App, http::StatusCode, test};
    use rstest::rstest;
    use serde_json::Value;

    async fn call(control: Arc<LogControl>, uri: &str) -> (StatusCode, Value) {
        let state = HttpState::new(
            Arc::new(MockUsersQuery::new()),
            Arc::new(MockUsersCommand::new()),
            control,
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(set_log_level),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        (res.status(), test::read_body_json(res).await)
    }

    fn control() -> Arc<LogControl> {
        Arc::new(LogControl::detached(LogSettings::default()))
    }

    #[rstest]
    #[actix_web::test]
    async fn reports_current_settings_without_parameters() {
        let (status, body) = call(control(), "/debug/log").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"level": "INFO", "format": "text"}));
    }

    #[rstest]
    #[actix_web::test]
    async fn applies_level_and_format() {
        let control = control();
        let (status, body) = call(control.clone(), "/debug/log?level=debug&format=JSON").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["level"], "DEBUG");
        assert_eq!(body["format"], "json");
        assert_eq!(
            control.settings(),
            LogSettings {
                level: LogLevel::Debug,
                format: LogFormat::Json,
            }
        );
    }

    #[rstest]
    #[case("/debug/log?level=loud", "INVALID_LOG_LEVEL")]
    #[case("/debug/log?format=xml", "INVALID_LOG_FORMAT")]
    #[actix_web::test]
    async fn rejects_unknown_values(#[case] uri: &str, #[case] code: &str) {
        let control = control();
        let (status, body) = call(control.clone(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], code);
        assert_eq!(control.settings(), LogSettings::default());
    }
}
