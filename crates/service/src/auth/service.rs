use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;
use tokio::sync::Mutex;
use tracing::{info, debug, instrument};
use uuid::Uuid;

use models::user::{self, PublicUser, User};

use super::domain::{RegisterInput, LoginInput, AuthSession};
use super::errors::AuthError;
use crate::store::Store;

/// Length of the opaque bearer credential handed out at registration.
const TOKEN_LEN: usize = 48;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub min_password_len: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { min_password_len: 6 }
    }
}

/// Auth business service independent of web framework. Registration is the
/// only mutation of the user collection and runs under `users_guard`, so two
/// concurrent registrations cannot both pass the duplicate check.
pub struct AuthService<S: Store> {
    store: Arc<S>,
    cfg: AuthConfig,
    users_guard: Mutex<()>,
}

impl<S: Store> AuthService<S> {
    pub fn new(store: Arc<S>, cfg: AuthConfig) -> Self {
        Self { store, cfg, users_guard: Mutex::new(()) }
    }

    /// Register a new account and hand back its lifetime token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::service::{AuthService, AuthConfig};
    /// use service::auth::domain::RegisterInput;
    /// use service::store::memory::MemoryStore;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MemoryStore::default()), AuthConfig::default());
    /// let input = RegisterInput { username: "alice".into(), email: "a@x.com".into(), password: "pw1234".into() };
    /// let session = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(session.user.username, "alice");
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username, email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthSession, AuthError> {
        for (field, value) in [
            ("username", &input.username),
            ("email", &input.email),
            ("password", &input.password),
        ] {
            if value.trim().is_empty() {
                return Err(AuthError::Validation(format!("{field} is required")));
            }
        }
        user::validate_username(&input.username)?;
        user::validate_email(&input.email)?;
        if input.password.len() < self.cfg.min_password_len {
            return Err(AuthError::Validation(format!(
                "password must be at least {} characters",
                self.cfg.min_password_len
            )));
        }

        let _guard = self.users_guard.lock().await;
        let mut users = self.store.load_users().await?;
        if users.iter().any(|u| u.username == input.username || u.email == input.email) {
            debug!("duplicate account: {}", input.email);
            return Err(AuthError::Conflict);
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        let account = User {
            id: Uuid::new_v4(),
            username: input.username,
            email: input.email,
            password_hash,
            token: generate_token(),
            created_at: Utc::now(),
        };
        let session = AuthSession {
            token: account.token.clone(),
            user: PublicUser::from(&account),
        };
        users.push(account);
        self.store.save_users(&users).await?;

        info!(user_id = %session.user.id, username = %session.user.username, "user_registered");
        Ok(session)
    }

    /// Authenticate by email and password; hands back the stored lifetime
    /// token. An unknown email and a wrong password fail identically.
    ///
    /// # Examples
    /// ```
    /// use service::auth::service::{AuthService, AuthConfig};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use service::store::memory::MemoryStore;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MemoryStore::default()), AuthConfig::default());
    /// let registered = tokio_test::block_on(svc.register(RegisterInput { username: "bob".into(), email: "b@x.com".into(), password: "secret1".into() })).unwrap();
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "b@x.com".into(), password: "secret1".into() })).unwrap();
    /// assert_eq!(session.token, registered.token);
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let users = self.store.load_users().await?;
        let account = users
            .iter()
            .find(|u| u.email == input.email)
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&account.password_hash)
            .map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        info!(user_id = %account.id, "user_logged_in");
        Ok(AuthSession {
            token: account.token.clone(),
            user: PublicUser::from(account),
        })
    }

    /// Resolve a bearer token to its account's public view. Presence and
    /// exact match are the only checks; tokens never expire.
    #[instrument(skip_all)]
    pub async fn verify(&self, token: &str) -> Result<PublicUser, AuthError> {
        if token.is_empty() {
            return Err(AuthError::Unauthorized);
        }
        let users = self.store.load_users().await?;
        users
            .iter()
            .find(|u| u.token == token)
            .map(PublicUser::from)
            .ok_or(AuthError::Unauthorized)
    }
}

/// Opaque bearer credential: alphanumeric, generated once per account and
/// never rotated.
fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}
