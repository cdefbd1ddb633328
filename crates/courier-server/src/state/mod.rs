//! Application state
//!
//! One state value shared by the REST handlers and the gateway; built
//! once at startup, no process-wide singletons.

use std::sync::Arc;

use courier_common::{AppConfig, JwtService};
use courier_service::ServiceContext;

use crate::gateway::handlers::TypingLimiter;
use crate::gateway::ConnectionRegistry;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    services: Arc<ServiceContext>,
    registry: Arc<ConnectionRegistry>,
    typing_limiter: Arc<TypingLimiter>,
    config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(services: ServiceContext, registry: ConnectionRegistry, config: AppConfig) -> Self {
        Self {
            services: Arc::new(services),
            registry: Arc::new(registry),
            typing_limiter: Arc::new(TypingLimiter::new()),
            config: Arc::new(config),
        }
    }

    /// Get the service context
    pub fn services(&self) -> &ServiceContext {
        &self.services
    }

    /// Get the connection registry
    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Get the typing rate limiter
    pub fn typing_limiter(&self) -> &TypingLimiter {
        &self.typing_limiter
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.services.jwt_service()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
