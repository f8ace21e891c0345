//! Opaque-credential to identity resolution.
//!
//! Token issuance and signature verification are upstream concerns; this
//! boundary only answers "which user id does this credential belong to".
//! Operations take the token as an explicit parameter; there is no ambient
//! request-scoped actor state.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use vendora_core::{DomainError, DomainResult, UserId};

/// Opaque actor credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorToken(String);

impl ActorToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Maps an opaque credential to a user id.
///
/// Fails with `Unauthorized` when the credential cannot be resolved; it does
/// **not** guarantee the resolved user still exists; existence is checked by
/// the caller against the store.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, token: &ActorToken) -> DomainResult<UserId>;
}

impl<R> IdentityResolver for Arc<R>
where
    R: IdentityResolver + ?Sized,
{
    fn resolve(&self, token: &ActorToken) -> DomainResult<UserId> {
        (**self).resolve(token)
    }
}

/// In-memory resolver for tests/dev: a fixed token → user id table.
#[derive(Debug, Default)]
pub struct StaticTokenResolver {
    inner: RwLock<HashMap<String, UserId>>,
}

impl StaticTokenResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, token: ActorToken, user_id: UserId) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(token.0, user_id);
        }
    }
}

impl IdentityResolver for StaticTokenResolver {
    fn resolve(&self, token: &ActorToken) -> DomainResult<UserId> {
        let map = self
            .inner
            .read()
            .map_err(|_| DomainError::storage("resolver lock poisoned"))?;
        map.get(token.as_str())
            .copied()
            .ok_or(DomainError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granted_token_resolves_to_the_user() {
        let resolver = StaticTokenResolver::new();
        let user_id = UserId::new();
        resolver.grant(ActorToken::new("tok-1"), user_id);

        assert_eq!(resolver.resolve(&ActorToken::new("tok-1")).unwrap(), user_id);
    }

    #[test]
    fn unknown_token_is_unauthorized() {
        let resolver = StaticTokenResolver::new();
        let err = resolver.resolve(&ActorToken::new("missing")).unwrap_err();
        assert_eq!(err, DomainError::Unauthorized);
    }
}
