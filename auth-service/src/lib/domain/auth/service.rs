use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::JwtError;
use auth::PasswordError;
use auth::PasswordHasher;
use auth::TokenConfig;
use auth::TokenIssuer;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::RepositoryError;
use crate::domain::auth::models::Credentials;
use crate::domain::auth::models::RefreshToken;
use crate::domain::auth::models::TokenHash;
use crate::domain::auth::models::TokenPair;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::CredentialRepository;
use crate::domain::auth::ports::RefreshTokenRepository;

/// Domain service implementation for authentication operations.
///
/// Depends only on the repository ports; uniqueness and rotation atomicity are
/// left to the storage behind them. Every repository call is bounded by
/// `repository_timeout` and no call is retried.
pub struct AuthService<CR, TR>
where
    CR: CredentialRepository,
    TR: RefreshTokenRepository,
{
    credential_repository: Arc<CR>,
    token_repository: Arc<TR>,
    password_hasher: PasswordHasher,
    token_issuer: TokenIssuer,
    repository_timeout: Duration,
}

impl<CR, TR> AuthService<CR, TR>
where
    CR: CredentialRepository,
    TR: RefreshTokenRepository,
{
    pub const DEFAULT_REPOSITORY_TIMEOUT: Duration = Duration::from_secs(5);

    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `credential_repository` - User persistence implementation
    /// * `token_repository` - Refresh-token persistence implementation
    /// * `token_config` - Signing secret and token lifetimes
    ///
    /// # Errors
    /// * `Configuration` - Token configuration violates the issuing policy
    pub fn new(
        credential_repository: Arc<CR>,
        token_repository: Arc<TR>,
        token_config: TokenConfig,
    ) -> Result<Self, AuthError> {
        let token_issuer =
            TokenIssuer::new(token_config).map_err(|e| AuthError::Configuration(e.to_string()))?;

        Ok(Self {
            credential_repository,
            token_repository,
            password_hasher: PasswordHasher::new(),
            token_issuer,
            repository_timeout: Self::DEFAULT_REPOSITORY_TIMEOUT,
        })
    }

    /// Replace the per-call repository timeout.
    pub fn with_repository_timeout(mut self, timeout: Duration) -> Self {
        self.repository_timeout = timeout;
        self
    }

    /// Replace the password hasher (e.g. to tune Argon2 cost).
    pub fn with_password_hasher(mut self, password_hasher: PasswordHasher) -> Self {
        self.password_hasher = password_hasher;
        self
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, RepositoryError>
    where
        F: Future<Output = Result<T, RepositoryError>>,
    {
        tokio::time::timeout(self.repository_timeout, call)
            .await
            .map_err(|_| RepositoryError::Timeout(self.repository_timeout))?
    }

    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        const OP: &str = "register.hash_password";

        let hasher = self.password_hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::internal(OP, e))?
            .map_err(|e| AuthError::internal(OP, e))
    }

    async fn verify_password(&self, password: String, user: &User) -> Result<(), AuthError> {
        const OP: &str = "login.verify_password";

        let hasher = self.password_hasher.clone();
        let password_hash = user.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || hasher.verify(&password, &password_hash))
            .await
            .map_err(|e| AuthError::internal(OP, e))?;

        match verified {
            Ok(()) => Ok(()),
            Err(PasswordError::Mismatch) => {
                tracing::warn!(user_id = %user.id, "Login rejected: password mismatch");
                Err(AuthError::InvalidCredentials)
            }
            Err(e) => Err(AuthError::internal(OP, e)),
        }
    }

    /// Sign a new access token and a new refresh token for `user`.
    ///
    /// Nothing is persisted here; the returned record is for the caller to store.
    fn issue_tokens(
        &self,
        operation: &'static str,
        user: &User,
    ) -> Result<(TokenPair, RefreshToken), AuthError> {
        let access_token = self
            .token_issuer
            .issue_access_token(user.id.0, user.username.as_str())
            .map_err(|e| token_error(operation, e))?;

        let (refresh_token, claims) = self
            .token_issuer
            .issue_refresh_token(user.id.0)
            .map_err(|e| token_error(operation, e))?;

        Ok((
            TokenPair {
                access_token,
                refresh_token,
            },
            RefreshToken::from(&claims),
        ))
    }
}

fn token_error(operation: &'static str, err: JwtError) -> AuthError {
    match err {
        JwtError::InvalidToken(msg) => AuthError::InvalidToken(msg),
        JwtError::TokenExpired => AuthError::TokenExpired,
        JwtError::Configuration(msg) => AuthError::Configuration(msg),
        JwtError::EncodingFailed(msg) => AuthError::internal(operation, msg),
    }
}

#[async_trait]
impl<CR, TR> AuthServicePort for AuthService<CR, TR>
where
    CR: CredentialRepository,
    TR: RefreshTokenRepository,
{
    async fn register(&self, credentials: Credentials) -> Result<UserId, AuthError> {
        let Credentials { username, password } = credentials;

        let exists = self
            .bounded(self.credential_repository.exists_by_username(&username))
            .await
            .map_err(|e| AuthError::repository("register.check_exists", e))?;

        if exists {
            tracing::info!(username = %username, "Registration rejected: username taken");
            return Err(AuthError::UserAlreadyExists(username.to_string()));
        }

        let password_hash = self.hash_password(password).await?;

        let user = User {
            id: UserId::new(),
            username: username.clone(),
            password_hash,
        };

        // A concurrent registration can win between the check and the insert
        let created_user = self
            .bounded(self.credential_repository.create(user))
            .await
            .map_err(|e| match e {
                RepositoryError::AlreadyExists(_) => {
                    AuthError::UserAlreadyExists(username.to_string())
                }
                other => AuthError::repository("register.create_user", other),
            })?;

        tracing::info!(
            user_id = %created_user.id,
            username = %created_user.username,
            "User registered"
        );

        Ok(created_user.id)
    }

    async fn login(&self, credentials: Credentials) -> Result<TokenPair, AuthError> {
        let Credentials { username, password } = credentials;

        let user = self
            .bounded(self.credential_repository.find_by_username(&username))
            .await
            .map_err(|e| AuthError::repository("login.find_user", e))?
            .ok_or_else(|| AuthError::UserNotFound(username.to_string()))?;

        self.verify_password(password, &user).await?;

        let (tokens, record) = self.issue_tokens("login.issue_tokens", &user)?;

        self.bounded(self.token_repository.save(record))
            .await
            .map_err(|e| AuthError::repository("login.save_refresh_token", e))?;

        tracing::info!(user_id = %user.id, "Session opened");

        Ok(tokens)
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let token_hash = self
            .token_issuer
            .parse_refresh_token(refresh_token)
            .map(TokenHash)
            .map_err(|e| token_error("refresh_session.parse_token", e))?;

        let exists = self
            .bounded(self.token_repository.exists_by_hash(&token_hash))
            .await
            .map_err(|e| AuthError::repository("refresh_session.check_token", e))?;

        if !exists {
            tracing::warn!("Refresh rejected: token not found");
            return Err(AuthError::TokenNotFound);
        }

        // The row may be rotated away between the check and this lookup
        let user = self
            .bounded(self.token_repository.find_user_by_token_hash(&token_hash))
            .await
            .map_err(|e| AuthError::repository("refresh_session.find_user", e))?
            .ok_or(AuthError::TokenNotFound)?;

        let (tokens, replacement) = self.issue_tokens("refresh_session.issue_tokens", &user)?;

        self.bounded(
            self.token_repository
                .update_by_hash(&token_hash, &replacement),
        )
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound(_) => {
                tracing::warn!(user_id = %user.id, "Refresh rejected: token already rotated");
                AuthError::TokenNotFound
            }
            other => AuthError::repository("refresh_session.rotate_token", other),
        })?;

        tracing::info!(user_id = %user.id, "Session refreshed");

        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use auth::JwtHandler;
    use auth::RefreshClaims;
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::domain::auth::models::Username;

    const SECRET: &str = "test_secret_key_at_least_32_bytes!";

    // Define mocks in the test module using mockall
    mock! {
        pub TestCredentialRepository {}

        #[async_trait]
        impl CredentialRepository for TestCredentialRepository {
            async fn exists_by_username(&self, username: &Username) -> Result<bool, RepositoryError>;
            async fn create(&self, user: User) -> Result<User, RepositoryError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<User>, RepositoryError>;
        }
    }

    mock! {
        pub TestRefreshTokenRepository {}

        #[async_trait]
        impl RefreshTokenRepository for TestRefreshTokenRepository {
            async fn save(&self, token: RefreshToken) -> Result<(), RepositoryError>;
            async fn exists_by_hash(&self, token_hash: &TokenHash) -> Result<bool, RepositoryError>;
            async fn update_by_hash(&self, token_hash: &TokenHash, replacement: &RefreshToken) -> Result<(), RepositoryError>;
            async fn find_user_by_token_hash(&self, token_hash: &TokenHash) -> Result<Option<User>, RepositoryError>;
        }
    }

    fn token_config() -> TokenConfig {
        TokenConfig::new(
            SECRET,
            chrono::Duration::minutes(15),
            chrono::Duration::days(30),
        )
    }

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::with_params(1024, 1, 1).unwrap()
    }

    fn service(
        credentials: MockTestCredentialRepository,
        tokens: MockTestRefreshTokenRepository,
    ) -> AuthService<MockTestCredentialRepository, MockTestRefreshTokenRepository> {
        AuthService::new(Arc::new(credentials), Arc::new(tokens), token_config())
            .unwrap()
            .with_password_hasher(fast_hasher())
    }

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials::new(username.to_string(), password.to_string()).unwrap()
    }

    fn stored_user(username: &str, password: &str) -> User {
        User {
            id: UserId::new(),
            username: Username::new(username.to_string()).unwrap(),
            password_hash: fast_hasher().hash(password).unwrap(),
        }
    }

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(token_config()).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_token_config() {
        let config = TokenConfig::new(
            "",
            chrono::Duration::minutes(15),
            chrono::Duration::days(30),
        );

        let result = AuthService::new(
            Arc::new(MockTestCredentialRepository::new()),
            Arc::new(MockTestRefreshTokenRepository::new()),
            config,
        );

        assert!(matches!(result, Err(AuthError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut credential_repository = MockTestCredentialRepository::new();

        credential_repository
            .expect_exists_by_username()
            .withf(|username| username.as_str() == "alice")
            .times(1)
            .returning(|_| Ok(false));

        credential_repository
            .expect_create()
            .withf(|user| {
                user.username.as_str() == "alice" && user.password_hash.starts_with("$argon2id$")
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = service(credential_repository, MockTestRefreshTokenRepository::new());

        let result = service.register(credentials("alice", "secret")).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_register_stores_verifiable_hash() {
        let mut credential_repository = MockTestCredentialRepository::new();

        credential_repository
            .expect_exists_by_username()
            .returning(|_| Ok(false));
        credential_repository
            .expect_create()
            .withf(|user| {
                user.password_hash != "secret"
                    && fast_hasher().verify("secret", &user.password_hash).is_ok()
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = service(credential_repository, MockTestRefreshTokenRepository::new());

        assert!(service.register(credentials("alice", "secret")).await.is_ok());
    }

    #[tokio::test]
    async fn test_register_existing_username() {
        let mut credential_repository = MockTestCredentialRepository::new();

        credential_repository
            .expect_exists_by_username()
            .times(1)
            .returning(|_| Ok(true));
        credential_repository.expect_create().times(0);

        let service = service(credential_repository, MockTestRefreshTokenRepository::new());

        let result = service.register(credentials("alice", "other")).await;
        assert!(matches!(result, Err(AuthError::UserAlreadyExists(name)) if name == "alice"));
    }

    #[tokio::test]
    async fn test_register_conflict_on_create_is_duplicate() {
        let mut credential_repository = MockTestCredentialRepository::new();

        credential_repository
            .expect_exists_by_username()
            .times(1)
            .returning(|_| Ok(false));
        credential_repository
            .expect_create()
            .times(1)
            .returning(|user| Err(RepositoryError::AlreadyExists(user.username.to_string())));

        let service = service(credential_repository, MockTestRefreshTokenRepository::new());

        let result = service.register(credentials("alice", "secret")).await;
        assert!(matches!(result, Err(AuthError::UserAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_register_check_failure_is_wrapped() {
        let mut credential_repository = MockTestCredentialRepository::new();

        credential_repository
            .expect_exists_by_username()
            .times(1)
            .returning(|_| Err(RepositoryError::Database("connection refused".to_string())));
        credential_repository.expect_create().times(0);

        let service = service(credential_repository, MockTestRefreshTokenRepository::new());

        let result = service.register(credentials("alice", "secret")).await;
        assert!(matches!(
            result,
            Err(AuthError::Repository {
                operation: "register.check_exists",
                source: RepositoryError::Database(_),
            })
        ));
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut credential_repository = MockTestCredentialRepository::new();
        let mut token_repository = MockTestRefreshTokenRepository::new();

        let user = stored_user("alice", "secret");
        let user_id = user.id;

        credential_repository
            .expect_find_by_username()
            .withf(|username| username.as_str() == "alice")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        token_repository
            .expect_save()
            .withf(move |token| {
                token.user_id == user_id
                    && token.expires_at > token.created_at
                    && token.expires_at > Utc::now()
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = service(credential_repository, token_repository);

        let tokens = service
            .login(credentials("alice", "secret"))
            .await
            .expect("Login failed");

        assert!(!tokens.access_token.is_empty());
        assert!(!tokens.refresh_token.is_empty());

        let issuer = issuer();
        let access = issuer.verify_access_token(&tokens.access_token).unwrap();
        assert_eq!(access.user_id, user_id.0);
        assert_eq!(access.username, "alice");
        assert!(issuer.parse_refresh_token(&tokens.refresh_token).is_ok());
    }

    #[tokio::test]
    async fn test_login_persists_hash_embedded_in_refresh_token() {
        let mut credential_repository = MockTestCredentialRepository::new();
        let mut token_repository = MockTestRefreshTokenRepository::new();

        let user = stored_user("alice", "secret");
        credential_repository
            .expect_find_by_username()
            .returning(move |_| Ok(Some(user.clone())));

        let saved = Arc::new(std::sync::Mutex::new(None));
        let saved_clone = Arc::clone(&saved);
        token_repository.expect_save().times(1).returning(move |token| {
            *saved_clone.lock().unwrap() = Some(token.token_hash);
            Ok(())
        });

        let service = service(credential_repository, token_repository);
        let tokens = service.login(credentials("alice", "secret")).await.unwrap();

        let embedded = issuer().parse_refresh_token(&tokens.refresh_token).unwrap();
        assert_eq!(*saved.lock().unwrap(), Some(TokenHash(embedded)));
    }

    #[tokio::test]
    async fn test_login_user_not_found() {
        let mut credential_repository = MockTestCredentialRepository::new();
        let mut token_repository = MockTestRefreshTokenRepository::new();

        credential_repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));
        token_repository.expect_save().times(0);

        let service = service(credential_repository, token_repository);

        let result = service.login(credentials("nobody", "secret")).await;
        assert!(matches!(result, Err(AuthError::UserNotFound(name)) if name == "nobody"));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut credential_repository = MockTestCredentialRepository::new();
        let mut token_repository = MockTestRefreshTokenRepository::new();

        let user = stored_user("alice", "secret");
        credential_repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        token_repository.expect_save().times(0);

        let service = service(credential_repository, token_repository);

        let result = service.login(credentials("alice", "wrong")).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_fails_when_refresh_record_not_saved() {
        let mut credential_repository = MockTestCredentialRepository::new();
        let mut token_repository = MockTestRefreshTokenRepository::new();

        let user = stored_user("alice", "secret");
        credential_repository
            .expect_find_by_username()
            .returning(move |_| Ok(Some(user.clone())));
        token_repository
            .expect_save()
            .times(1)
            .returning(|_| Err(RepositoryError::Database("disk full".to_string())));

        let service = service(credential_repository, token_repository);

        let result = service.login(credentials("alice", "secret")).await;
        assert!(matches!(
            result,
            Err(AuthError::Repository {
                operation: "login.save_refresh_token",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_refresh_session_rotates_in_place() {
        let credential_repository = MockTestCredentialRepository::new();
        let mut token_repository = MockTestRefreshTokenRepository::new();

        let user = stored_user("alice", "secret");
        let user_id = user.id;
        let (old_token, old_claims) = issuer().issue_refresh_token(user_id.0).unwrap();
        let old_hash = TokenHash(old_claims.token_hash);

        token_repository
            .expect_exists_by_hash()
            .withf(move |hash| *hash == old_hash)
            .times(1)
            .returning(|_| Ok(true));
        token_repository
            .expect_find_user_by_token_hash()
            .withf(move |hash| *hash == old_hash)
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        token_repository
            .expect_update_by_hash()
            .withf(move |hash, replacement| {
                *hash == old_hash
                    && replacement.token_hash != old_hash
                    && replacement.user_id == user_id
                    && replacement.expires_at > replacement.created_at
            })
            .times(1)
            .returning(|_, _| Ok(()));
        token_repository.expect_save().times(0);

        let service = service(credential_repository, token_repository);

        let tokens = service
            .refresh_session(&old_token)
            .await
            .expect("Refresh failed");

        assert!(!tokens.access_token.is_empty());
        assert_ne!(tokens.refresh_token, old_token);

        let new_hash = issuer().parse_refresh_token(&tokens.refresh_token).unwrap();
        assert_ne!(TokenHash(new_hash), old_hash);
    }

    #[tokio::test]
    async fn test_refresh_session_token_not_found() {
        let mut token_repository = MockTestRefreshTokenRepository::new();

        let (token, _) = issuer().issue_refresh_token(UserId::new().0).unwrap();

        token_repository
            .expect_exists_by_hash()
            .times(1)
            .returning(|_| Ok(false));
        token_repository.expect_find_user_by_token_hash().times(0);
        token_repository.expect_update_by_hash().times(0);

        let service = service(MockTestCredentialRepository::new(), token_repository);

        let result = service.refresh_session(&token).await;
        assert!(matches!(result, Err(AuthError::TokenNotFound)));
    }

    #[tokio::test]
    async fn test_refresh_session_lost_rotation_race() {
        let mut token_repository = MockTestRefreshTokenRepository::new();

        let user = stored_user("alice", "secret");
        let (token, _) = issuer().issue_refresh_token(user.id.0).unwrap();

        token_repository
            .expect_exists_by_hash()
            .returning(|_| Ok(true));
        token_repository
            .expect_find_user_by_token_hash()
            .returning(move |_| Ok(Some(user.clone())));
        token_repository
            .expect_update_by_hash()
            .times(1)
            .returning(|hash, _| Err(RepositoryError::NotFound(hash.to_string())));

        let service = service(MockTestCredentialRepository::new(), token_repository);

        let result = service.refresh_session(&token).await;
        assert!(matches!(result, Err(AuthError::TokenNotFound)));
    }

    #[tokio::test]
    async fn test_refresh_session_invalid_token() {
        let mut token_repository = MockTestRefreshTokenRepository::new();
        token_repository.expect_exists_by_hash().times(0);

        let service = service(MockTestCredentialRepository::new(), token_repository);

        let result = service.refresh_session("invalid.token.here").await;
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn test_refresh_session_expired_token() {
        let mut token_repository = MockTestRefreshTokenRepository::new();
        token_repository.expect_exists_by_hash().times(0);

        let now = Utc::now();
        let claims = RefreshClaims::generate(
            UserId::new().0,
            now - chrono::Duration::days(30),
            now - chrono::Duration::minutes(1),
        );
        let token = JwtHandler::new(SECRET.as_bytes()).encode(&claims).unwrap();

        let service = service(MockTestCredentialRepository::new(), token_repository);

        let result = service.refresh_session(&token).await;
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    struct StalledCredentialRepository;

    #[async_trait]
    impl CredentialRepository for StalledCredentialRepository {
        async fn exists_by_username(&self, _username: &Username) -> Result<bool, RepositoryError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(false)
        }

        async fn create(&self, user: User) -> Result<User, RepositoryError> {
            Ok(user)
        }

        async fn find_by_username(
            &self,
            _username: &Username,
        ) -> Result<Option<User>, RepositoryError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_repository_call_times_out() {
        let service = AuthService::new(
            Arc::new(StalledCredentialRepository),
            Arc::new(MockTestRefreshTokenRepository::new()),
            token_config(),
        )
        .unwrap()
        .with_repository_timeout(Duration::from_millis(20));

        let result = service.register(credentials("alice", "secret")).await;
        assert!(matches!(
            result,
            Err(AuthError::Repository {
                operation: "register.check_exists",
                source: RepositoryError::Timeout(_),
            })
        ));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[tokio::test]
    async fn test_refresh_rejections_keep_token_hash_out_of_logs() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let user = stored_user("alice", "secret");
        let user_id = user.id;
        let (unknown_token, unknown_claims) = issuer().issue_refresh_token(user_id.0).unwrap();
        let (raced_token, raced_claims) = issuer().issue_refresh_token(user_id.0).unwrap();
        let raced_hash = TokenHash(raced_claims.token_hash);

        let mut token_repository = MockTestRefreshTokenRepository::new();
        token_repository
            .expect_exists_by_hash()
            .returning(move |hash| Ok(*hash == raced_hash));
        token_repository
            .expect_find_user_by_token_hash()
            .returning(move |_| Ok(Some(user.clone())));
        token_repository
            .expect_update_by_hash()
            .returning(|hash, _| Err(RepositoryError::NotFound(hash.to_string())));

        let service = service(MockTestCredentialRepository::new(), token_repository);

        let result = service.refresh_session(&unknown_token).await;
        assert!(matches!(result, Err(AuthError::TokenNotFound)));
        let result = service.refresh_session(&raced_token).await;
        assert!(matches!(result, Err(AuthError::TokenNotFound)));

        let output = logs.contents();
        assert!(output.contains("Refresh rejected: token not found"));
        assert!(output.contains("Refresh rejected: token already rotated"));
        assert!(output.contains(&user_id.to_string()));
        assert!(!output.contains(&unknown_claims.token_hash.to_string()));
        assert!(!output.contains(&raced_claims.token_hash.to_string()));
    }
}
