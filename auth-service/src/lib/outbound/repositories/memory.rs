use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::auth::errors::RepositoryError;
use crate::domain::auth::models::RefreshToken;
use crate::domain::auth::models::TokenHash;
use crate::domain::auth::models::User;
use crate::domain::auth::models::Username;
use crate::domain::auth::ports::CredentialRepository;
use crate::domain::auth::ports::RefreshTokenRepository;

#[derive(Debug, Default)]
struct Store {
    /// Map of username -> user
    users: HashMap<Username, User>,
    /// Map of token_hash -> refresh-token record
    refresh_tokens: HashMap<TokenHash, RefreshToken>,
}

/// In-process storage implementing both repository ports.
///
/// Users and refresh tokens sit behind one lock, so each operation, rotation
/// included, is atomic with respect to every other. Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored refresh-token records.
    pub async fn refresh_token_count(&self) -> usize {
        self.store.read().await.refresh_tokens.len()
    }
}

#[async_trait]
impl CredentialRepository for InMemoryRepository {
    async fn exists_by_username(&self, username: &Username) -> Result<bool, RepositoryError> {
        Ok(self.store.read().await.users.contains_key(username))
    }

    async fn create(&self, user: User) -> Result<User, RepositoryError> {
        let mut store = self.store.write().await;

        if store.users.contains_key(&user.username) {
            return Err(RepositoryError::AlreadyExists(user.username.to_string()));
        }

        store.users.insert(user.username.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, RepositoryError> {
        Ok(self.store.read().await.users.get(username).cloned())
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRepository {
    async fn save(&self, token: RefreshToken) -> Result<(), RepositoryError> {
        let mut store = self.store.write().await;

        if store.refresh_tokens.contains_key(&token.token_hash) {
            return Err(RepositoryError::AlreadyExists(token.token_hash.to_string()));
        }
        if !store.users.values().any(|user| user.id == token.user_id) {
            return Err(RepositoryError::NotFound(format!(
                "owner of refresh token {}",
                token.token_hash
            )));
        }

        store.refresh_tokens.insert(token.token_hash, token);
        Ok(())
    }

    async fn exists_by_hash(&self, token_hash: &TokenHash) -> Result<bool, RepositoryError> {
        Ok(self.store.read().await.refresh_tokens.contains_key(token_hash))
    }

    async fn update_by_hash(
        &self,
        token_hash: &TokenHash,
        replacement: &RefreshToken,
    ) -> Result<(), RepositoryError> {
        let mut store = self.store.write().await;

        if replacement.token_hash != *token_hash
            && store.refresh_tokens.contains_key(&replacement.token_hash)
        {
            return Err(RepositoryError::AlreadyExists(
                replacement.token_hash.to_string(),
            ));
        }

        let current = store
            .refresh_tokens
            .remove(token_hash)
            .ok_or_else(|| RepositoryError::NotFound(token_hash.to_string()))?;

        // The row keeps its owner; only hash and timestamps change
        let rotated = RefreshToken {
            user_id: current.user_id,
            token_hash: replacement.token_hash,
            expires_at: replacement.expires_at,
            created_at: replacement.created_at,
        };
        store.refresh_tokens.insert(rotated.token_hash, rotated);

        Ok(())
    }

    async fn find_user_by_token_hash(
        &self,
        token_hash: &TokenHash,
    ) -> Result<Option<User>, RepositoryError> {
        let store = self.store.read().await;

        let user = store.refresh_tokens.get(token_hash).and_then(|token| {
            store
                .users
                .values()
                .find(|user| user.id == token.user_id)
                .cloned()
        });

        Ok(user)
    }
}
