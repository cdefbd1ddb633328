//! Authentication service
//!
//! Signup, login, logout, token rotation, session checks and the
//! password reset flow.

use chrono::{Duration, Utc};
use courier_common::{
    generate_opaque_token, hash_opaque_token, hash_password, validate_password_strength,
    verify_password, AppError, TokenPair,
};
use courier_core::{validate_username, User};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::{
    AuthResponse, ConfirmResetRequest, LoginRequest, LookupUserResponse, RefreshRequest,
    RequestResetRequest, SessionResponse, SignupRequest, UserResponse,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// A real bcrypt hash of a throwaway string. Verified against when the
/// login name does not resolve, so unknown-user and wrong-password take
/// the same time and return the same error.
const DUMMY_HASH: &str = "$2b$12$5TXmdpPlhtUeFhxT6FVpV.QIkAyUIEbIrJbMldGpDCTkRJw/S1qrO";

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
    /// Base URL used to build password-reset links
    client_base_url: String,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext, client_base_url: impl Into<String>) -> Self {
        Self {
            ctx,
            client_base_url: client_base_url.into(),
        }
    }

    /// Register a new user and issue a token pair
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn signup(&self, request: SignupRequest) -> ServiceResult<AuthResponse> {
        validate_username(&request.username)?;
        validate_password_strength(&request.password)?;

        let password_hash = hash_password(&request.password).await?;

        let mut user = User::new(request.username, request.email.to_lowercase());
        user.display_name = request
            .display_name
            .filter(|n| !n.trim().is_empty());

        // Uniqueness is enforced by the store; collisions surface as CONFLICT
        self.ctx.user_repo().create(&user, &password_hash).await?;

        info!(user_id = %user.id, "User registered");

        let pair = self.issue_token_pair(&user).await?;
        Ok(Self::auth_response(&user, pair))
    }

    /// Authenticate by username or email and issue a token pair
    #[instrument(skip(self, request), fields(login = %request.login))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let user = self.ctx.user_repo().find_by_login(&request.login).await?;

        let Some(user) = user else {
            // Burn a bcrypt verification so the unknown-user path is not
            // distinguishable by timing
            let _ = verify_password(&request.password, DUMMY_HASH).await;
            warn!("Login failed: unknown user");
            return Err(AppError::AuthInvalid.into());
        };

        let password_hash = self
            .ctx
            .user_repo()
            .password_hash(user.id)
            .await?
            .ok_or(AppError::AuthInvalid)?;

        if !verify_password(&request.password, &password_hash).await? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::AuthInvalid.into());
        }

        info!(user_id = %user.id, "User logged in");

        let pair = self.issue_token_pair(&user).await?;
        Ok(Self::auth_response(&user, pair))
    }

    /// Revoke the presented refresh token. Idempotent: revoking an
    /// unknown or already-revoked token is still a success.
    #[instrument(skip_all)]
    pub async fn logout(&self, refresh_token: &str) -> ServiceResult<()> {
        let token_hash = hash_opaque_token(refresh_token);
        let revoked = self.ctx.refresh_token_repo().revoke(&token_hash).await?;

        info!(revoked, "User logged out");
        Ok(())
    }

    /// Rotate a refresh token: consume the presented token and issue a
    /// new pair. Presenting a revoked, expired or unknown token fails;
    /// concurrent rotation of the same token succeeds exactly once.
    #[instrument(skip_all)]
    pub async fn refresh(&self, request: RefreshRequest) -> ServiceResult<AuthResponse> {
        let token_hash = hash_opaque_token(&request.refresh_token);

        let user_id = self
            .ctx
            .refresh_token_repo()
            .consume(&token_hash)
            .await?
            .ok_or(AppError::AuthInvalid)?;

        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::AuthInvalid)?;

        info!(user_id = %user.id, "Tokens rotated");

        let pair = self.issue_token_pair(&user).await?;
        Ok(Self::auth_response(&user, pair))
    }

    /// Verify that the authenticated user still exists
    #[instrument(skip(self))]
    pub async fn session_check(&self, user_id: Uuid) -> ServiceResult<SessionResponse> {
        let user = self.ctx.user_repo().find_by_id(user_id).await?;
        Ok(match user {
            Some(user) => SessionResponse::valid(&user),
            None => SessionResponse::invalid(),
        })
    }

    /// Translate a username to an id for client-side routing
    #[instrument(skip(self))]
    pub async fn lookup_user(&self, username: &str) -> ServiceResult<LookupUserResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found(format!("user {username}")))?;

        Ok(LookupUserResponse::from(&user))
    }

    /// Issue a password reset token.
    ///
    /// Always reports success to the caller; whether the email exists is
    /// never revealed.
    #[instrument(skip(self, request))]
    pub async fn request_reset(&self, request: RequestResetRequest) -> ServiceResult<()> {
        let Some(user) = self
            .ctx
            .user_repo()
            .find_by_email(&request.email.to_lowercase())
            .await?
        else {
            return Ok(());
        };

        let token = generate_opaque_token();
        self.ctx
            .reset_token_store()
            .store(&hash_opaque_token(&token), user.id)
            .await
            .map_err(|e| AppError::Cache(e.to_string()))?;

        let reset_url = format!("{}/reset-password?token={token}", self.client_base_url);
        self.ctx
            .mailer()
            .send_password_reset(&user.email, &reset_url)
            .await?;

        info!(user_id = %user.id, "Reset token issued");
        Ok(())
    }

    /// Redeem a reset token and set a new password. Single-use:
    /// consumption deletes the token.
    #[instrument(skip(self, request))]
    pub async fn confirm_reset(&self, request: ConfirmResetRequest) -> ServiceResult<()> {
        validate_password_strength(&request.new_password)?;

        let user_id = self
            .ctx
            .reset_token_store()
            .consume(&hash_opaque_token(&request.token))
            .await
            .map_err(|e| AppError::Cache(e.to_string()))?
            .ok_or(AppError::AuthInvalid)?;

        let password_hash = hash_password(&request.new_password).await?;
        self.ctx
            .user_repo()
            .update_password(user_id, &password_hash)
            .await?;

        // Stolen-password sessions should not survive the reset
        self.ctx
            .refresh_token_repo()
            .revoke_all_for_user(user_id)
            .await?;

        info!(user_id = %user_id, "Password reset completed");
        Ok(())
    }

    /// Sign an access token and mint + store a refresh token
    async fn issue_token_pair(&self, user: &User) -> ServiceResult<TokenPair> {
        let access_token = self.ctx.jwt_service().issue_access_token(user)?;

        let refresh_token = generate_opaque_token();
        let expires_at =
            Utc::now() + Duration::seconds(self.ctx.auth_config().refresh_token_ttl_secs);
        self.ctx
            .refresh_token_repo()
            .insert(user.id, &hash_opaque_token(&refresh_token), expires_at)
            .await?;

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.ctx.jwt_service().access_token_ttl(),
        ))
    }

    fn auth_response(user: &User, pair: TokenPair) -> AuthResponse {
        AuthResponse {
            user: UserResponse::from(user),
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: pair.token_type,
            expires_in: pair.expires_in,
        }
    }
}
