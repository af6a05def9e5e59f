//! Session guard: authentication state, identity and role-gated navigation
//!
//! The backend is the only authority on whether a session exists
//! (`/check-auth`) and on who holds it (`/me`). Both are asked on every guard
//! check; the cached user is for display only.

use std::sync::Arc;

use reqwest::Response;

use crate::{
    api::ApiClient,
    config::PagesConfig,
    endpoints,
    error::{AuthFailure, LOGOUT_FAILED_MESSAGE},
    models::user::{
        CheckAuthResponse, ErrorBody, LoginRequest, RegisterResponse, Registration, Role, User,
        UserEnvelope,
    },
    navigation::Navigator,
    session::UserCache,
};

/// Notice shown when the visitor is signed in with the wrong role
pub const ACCESS_DENIED_MESSAGE: &str = "Access denied. Insufficient permissions.";

/// Result of a guard check for one page load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Signed in, and holding the required role if one was asked for
    Granted,
    /// No session on the server
    Unauthenticated,
    /// Signed in, but the identity could not be fetched or has another role
    RoleDenied,
}

#[derive(Clone)]
pub struct SessionGuard {
    api: ApiClient,
    cache: UserCache,
    navigator: Arc<dyn Navigator>,
    pages: PagesConfig,
}

impl SessionGuard {
    pub fn new(
        api: ApiClient,
        cache: UserCache,
        navigator: Arc<dyn Navigator>,
        pages: PagesConfig,
    ) -> Self {
        Self {
            api,
            cache,
            navigator,
            pages,
        }
    }

    /// Ask the server whether this visitor has a session.
    ///
    /// Fails closed: transport and decode errors are logged and read as `false`.
    pub async fn is_authenticated(&self) -> bool {
        match self.fetch_check_auth().await {
            Ok(authenticated) => authenticated,
            Err(e) => {
                tracing::error!("Auth check failed: {}", e);
                false
            }
        }
    }

    async fn fetch_check_auth(&self) -> reqwest::Result<bool> {
        // The body decides, whatever the status
        let response = self.api.get(endpoints::CHECK_AUTH).await?;
        let body: CheckAuthResponse = response.json().await?;
        Ok(body.authenticated)
    }

    /// Fetch the signed-in user from the server. Does not touch the cache.
    pub async fn current_user(&self) -> Option<User> {
        let response = match self.api.get(endpoints::ME).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Get current user failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("Current user unavailable: HTTP {}", response.status());
            return None;
        }

        match response.json::<UserEnvelope>().await {
            Ok(body) => Some(body.user),
            Err(e) => {
                tracing::error!("Get current user failed: {}", e);
                None
            }
        }
    }

    /// Fetch the signed-in user and keep it in the cache for display
    pub async fn remember_current_user(&self) -> Option<User> {
        let user = self.current_user().await?;
        self.update_cached_user(&user);
        Some(user)
    }

    /// Sign in. On success the session cookie is kept by the client and the
    /// user is cached; on failure the cache is left as it was.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthFailure> {
        let response = self
            .api
            .post_json(endpoints::LOGIN, &LoginRequest { username, password })
            .await
            .map_err(|e| {
                tracing::error!("Login failed: {}", e);
                AuthFailure::Network
            })?;

        let user = read_user(response, "Login").await?;
        self.update_cached_user(&user);
        tracing::info!(user_id = user.id, role = %user.role, "Logged in as {}", user.username);

        Ok(user)
    }

    /// Create an account. Any success status counts; the new user is returned
    /// when the server echoes it. Nothing is cached: registering does not sign
    /// the visitor in.
    pub async fn register(&self, registration: &Registration) -> Result<Option<User>, AuthFailure> {
        let response = self
            .api
            .post_json(endpoints::REGISTER, registration)
            .await
            .map_err(|e| {
                tracing::error!("Registration failed: {}", e);
                AuthFailure::Network
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(read_rejection(response, "Registration").await);
        }

        let body: RegisterResponse = response.json().await.map_err(|e| {
            tracing::error!("Registration failed: {}", e);
            AuthFailure::Network
        })?;

        match &body.user {
            Some(user) => tracing::info!(user_id = user.id, "Registered {}", user.username),
            None => tracing::info!(
                "Registered: {}",
                body.message.as_deref().unwrap_or("no details")
            ),
        }

        Ok(body.user)
    }

    /// Sign out. The cached user is removed whatever the server answers.
    pub async fn logout(&self) -> Result<(), AuthFailure> {
        let result = match self.api.post(endpoints::LOGOUT).await {
            Ok(response) if response.status().is_success() => Ok(()),
            Ok(response) => {
                tracing::warn!("Logout rejected: HTTP {}", response.status());
                Err(AuthFailure::rejected(
                    response.status().as_u16(),
                    LOGOUT_FAILED_MESSAGE,
                ))
            }
            Err(e) => {
                tracing::error!("Logout failed: {}", e);
                Err(AuthFailure::Network)
            }
        };

        self.cache.clear();
        result
    }

    /// Decide whether the current page may render, without navigating.
    ///
    /// One round trip to `/check-auth`, and a second one to `/me` when a role
    /// is required.
    pub async fn check_access(&self, required_role: Option<&Role>) -> GuardOutcome {
        if !self.is_authenticated().await {
            return GuardOutcome::Unauthenticated;
        }

        let Some(role) = required_role else {
            return GuardOutcome::Granted;
        };

        match self.current_user().await {
            Some(user) if user.has_role(role) => GuardOutcome::Granted,
            Some(user) => {
                tracing::info!(
                    "User {} with role {} denied page requiring {}",
                    user.username,
                    user.role,
                    role
                );
                GuardOutcome::RoleDenied
            }
            None => GuardOutcome::RoleDenied,
        }
    }

    /// Page guard: returns `true` if the page may render, otherwise sends the
    /// visitor to the landing page (with a notice when the role is wrong).
    pub async fn require_auth(&self, required_role: Option<&Role>) -> bool {
        match self.check_access(required_role).await {
            GuardOutcome::Granted => true,
            GuardOutcome::Unauthenticated => {
                self.navigator.navigate(&self.pages.landing);
                false
            }
            GuardOutcome::RoleDenied => {
                self.navigator.notify(ACCESS_DENIED_MESSAGE);
                self.navigator.navigate(&self.pages.landing);
                false
            }
        }
    }

    /// Send the signed-in user to their dashboard. Anyone else stays put.
    pub async fn redirect_based_on_role(&self) {
        let Some(user) = self.current_user().await else {
            tracing::debug!("No current user, staying on page");
            return;
        };

        match &user.role {
            Role::Admin => self.navigator.navigate(&self.pages.admin_dashboard),
            Role::Student => self.navigator.navigate(&self.pages.student_dashboard),
            Role::Other(role) => {
                tracing::debug!("No dashboard for role {}, staying on page", role);
            }
        }
    }

    /// Log out, then leave for the landing page or tell the visitor why not
    pub async fn handle_logout(&self) -> bool {
        match self.logout().await {
            Ok(()) => {
                self.navigator.navigate(&self.pages.landing);
                true
            }
            Err(e) => {
                self.navigator.notify(&format!("Logout failed: {}", e.message()));
                false
            }
        }
    }

    /// Cached user for display. Not an access decision.
    pub fn cached_user(&self) -> Option<User> {
        self.cache.load()
    }

    /// Replace the cached user, e.g. after a profile update
    pub fn update_cached_user(&self, user: &User) {
        if let Err(e) = self.cache.store(user) {
            tracing::warn!("{}", e);
        }
    }
}

/// Read `{ user }` from a success response or the server's message from a
/// rejection. Unreadable bodies count as a network error.
async fn read_user(response: Response, action: &str) -> Result<User, AuthFailure> {
    if !response.status().is_success() {
        return Err(read_rejection(response, action).await);
    }

    response
        .json::<UserEnvelope>()
        .await
        .map(|body| body.user)
        .map_err(|e| {
            tracing::error!("{} failed: {}", action, e);
            AuthFailure::Network
        })
}

/// Failure for a non-success response, carrying the server's message
async fn read_rejection(response: Response, action: &str) -> AuthFailure {
    let status = response.status();

    let body: ErrorBody = match response.json().await {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("{} failed: HTTP {} with unreadable body: {}", action, status, e);
            return AuthFailure::Network;
        }
    };

    let message = body
        .into_message()
        .unwrap_or_else(|| format!("{} failed (HTTP {})", action, status.as_u16()));
    tracing::info!("{} rejected: HTTP {}: {}", action, status, message);

    AuthFailure::rejected(status.as_u16(), message)
}
