//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{UsersCommand, UsersQuery};
use crate::logging::LogControl;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users_query: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
    pub log_control: Arc<LogControl>,
}

impl HttpState {
    /// Bundle the ports used by the handlers.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use user_service::domain::UserService;
    /// use user_service::domain::ports::RandomUserIdGenerator;
    /// use user_service::inbound::http::state::HttpState;
    /// use user_service::logging::{LogControl, LogSettings};
    /// use user_service::outbound::persistence::InMemoryUserStore;
    ///
    /// let service = Arc::new(UserService::new(
    ///     Arc::new(InMemoryUserStore::new()),
    ///     Arc::new(DefaultClock),
    ///     Arc::new(RandomUserIdGenerator),
    /// ));
    /// let state = HttpState::new(
    ///     service.clone(),
    ///     service,
    ///     Arc::new(LogControl::detached(LogSettings::default())),
    /// );
    /// let _query = state.users_query.clone();
    /// ```
    pub fn new(
        users_query: Arc<dyn UsersQuery>,
        users_command: Arc<dyn UsersCommand>,
        log_control: Arc<LogControl>,
    ) -> Self {
        Self {
            users_query,
            users_command,
            log_control,
        }
    }
}
