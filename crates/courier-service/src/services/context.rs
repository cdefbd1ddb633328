//! Service context - dependency container for services
//!
//! All shared infrastructure is constructed once at startup and passed
//! to every component through this container; there are no
//! process-wide singletons.

use std::sync::Arc;

use courier_cache::{OfflineQueueStore, PresenceStore, RedisPool, ResetTokenStore};
use courier_common::{AuthConfig, JwtService};
use courier_core::{
    DirectMessageRepository, GroupMessageRepository, GroupRepository, RefreshTokenRepository,
    UserRepository,
};
use courier_db::PgPool;

use super::mailer::Mailer;

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    pool: PgPool,
    redis_pool: RedisPool,

    user_repo: Arc<dyn UserRepository>,
    message_repo: Arc<dyn DirectMessageRepository>,
    group_repo: Arc<dyn GroupRepository>,
    group_message_repo: Arc<dyn GroupMessageRepository>,
    refresh_token_repo: Arc<dyn RefreshTokenRepository>,

    presence_store: PresenceStore,
    offline_queue: OfflineQueueStore,
    reset_token_store: ResetTokenStore,

    jwt_service: Arc<JwtService>,
    mailer: Arc<dyn Mailer>,
    auth_config: AuthConfig,
}

impl ServiceContext {
    /// Start building a service context
    #[must_use]
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::default()
    }

    /// Get the PostgreSQL connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get the Redis connection pool
    pub fn redis_pool(&self) -> &RedisPool {
        &self.redis_pool
    }

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn message_repo(&self) -> &dyn DirectMessageRepository {
        self.message_repo.as_ref()
    }

    pub fn group_repo(&self) -> &dyn GroupRepository {
        self.group_repo.as_ref()
    }

    pub fn group_message_repo(&self) -> &dyn GroupMessageRepository {
        self.group_message_repo.as_ref()
    }

    pub fn refresh_token_repo(&self) -> &dyn RefreshTokenRepository {
        self.refresh_token_repo.as_ref()
    }

    pub fn presence_store(&self) -> &PresenceStore {
        &self.presence_store
    }

    pub fn offline_queue(&self) -> &OfflineQueueStore {
        &self.offline_queue
    }

    pub fn reset_token_store(&self) -> &ResetTokenStore {
        &self.reset_token_store
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn mailer(&self) -> &dyn Mailer {
        self.mailer.as_ref()
    }

    pub fn auth_config(&self) -> &AuthConfig {
        &self.auth_config
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext").finish_non_exhaustive()
    }
}

/// Builder for [`ServiceContext`]
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    redis_pool: Option<RedisPool>,
    user_repo: Option<Arc<dyn UserRepository>>,
    message_repo: Option<Arc<dyn DirectMessageRepository>>,
    group_repo: Option<Arc<dyn GroupRepository>>,
    group_message_repo: Option<Arc<dyn GroupMessageRepository>>,
    refresh_token_repo: Option<Arc<dyn RefreshTokenRepository>>,
    presence_store: Option<PresenceStore>,
    offline_queue: Option<OfflineQueueStore>,
    reset_token_store: Option<ResetTokenStore>,
    jwt_service: Option<Arc<JwtService>>,
    mailer: Option<Arc<dyn Mailer>>,
    auth_config: Option<AuthConfig>,
}

impl ServiceContextBuilder {
    #[must_use]
    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    #[must_use]
    pub fn redis_pool(mut self, redis_pool: RedisPool) -> Self {
        self.redis_pool = Some(redis_pool);
        self
    }

    #[must_use]
    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    #[must_use]
    pub fn message_repo(mut self, repo: Arc<dyn DirectMessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    #[must_use]
    pub fn group_repo(mut self, repo: Arc<dyn GroupRepository>) -> Self {
        self.group_repo = Some(repo);
        self
    }

    #[must_use]
    pub fn group_message_repo(mut self, repo: Arc<dyn GroupMessageRepository>) -> Self {
        self.group_message_repo = Some(repo);
        self
    }

    #[must_use]
    pub fn refresh_token_repo(mut self, repo: Arc<dyn RefreshTokenRepository>) -> Self {
        self.refresh_token_repo = Some(repo);
        self
    }

    #[must_use]
    pub fn presence_store(mut self, store: PresenceStore) -> Self {
        self.presence_store = Some(store);
        self
    }

    #[must_use]
    pub fn offline_queue(mut self, store: OfflineQueueStore) -> Self {
        self.offline_queue = Some(store);
        self
    }

    #[must_use]
    pub fn reset_token_store(mut self, store: ResetTokenStore) -> Self {
        self.reset_token_store = Some(store);
        self
    }

    #[must_use]
    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    #[must_use]
    pub fn mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    #[must_use]
    pub fn auth_config(mut self, config: AuthConfig) -> Self {
        self.auth_config = Some(config);
        self
    }

    /// Finish building
    ///
    /// # Errors
    /// Returns the name of the first missing dependency.
    pub fn build(self) -> Result<ServiceContext, &'static str> {
        Ok(ServiceContext {
            pool: self.pool.ok_or("pool")?,
            redis_pool: self.redis_pool.ok_or("redis_pool")?,
            user_repo: self.user_repo.ok_or("user_repo")?,
            message_repo: self.message_repo.ok_or("message_repo")?,
            group_repo: self.group_repo.ok_or("group_repo")?,
            group_message_repo: self.group_message_repo.ok_or("group_message_repo")?,
            refresh_token_repo: self.refresh_token_repo.ok_or("refresh_token_repo")?,
            presence_store: self.presence_store.ok_or("presence_store")?,
            offline_queue: self.offline_queue.ok_or("offline_queue")?,
            reset_token_store: self.reset_token_store.ok_or("reset_token_store")?,
            jwt_service: self.jwt_service.ok_or("jwt_service")?,
            mailer: self.mailer.ok_or("mailer")?,
            auth_config: self.auth_config.ok_or("auth_config")?,
        })
    }
}
