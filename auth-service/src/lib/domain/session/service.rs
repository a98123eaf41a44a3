use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::TokenPair;
use chrono::Utc;

use crate::domain::authority::models::PhoneNumber;
use crate::domain::authority::ports::AuthorityRepository;
use crate::domain::session::errors::SessionError;
use crate::domain::session::models::LoginCommand;
use crate::domain::session::models::RefreshTokenStatus;
use crate::domain::session::ports::RefreshTokenRegistry;
use crate::domain::session::ports::SessionServicePort;

/// Domain service for login and refresh.
pub struct SessionService<AR, RR>
where
    AR: AuthorityRepository,
    RR: RefreshTokenRegistry,
{
    repository: Arc<AR>,
    registry: Arc<RR>,
    authenticator: Arc<Authenticator>,
}

impl<AR, RR> SessionService<AR, RR>
where
    AR: AuthorityRepository,
    RR: RefreshTokenRegistry,
{
    pub fn new(repository: Arc<AR>, registry: Arc<RR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            registry,
            authenticator,
        }
    }

    async fn track(&self, pair: &TokenPair, generation: u32) -> Result<(), SessionError> {
        self.registry
            .record(pair.refresh_token_id, generation, seconds(pair.refresh_expires_in))
            .await?;
        Ok(())
    }
}

/// Phone credentials are matched in canonical form; anything else as typed.
fn lookup_key(credential: &str) -> String {
    PhoneNumber::new(credential.to_string())
        .map(|phone| phone.as_str().to_string())
        .unwrap_or_else(|_| credential.trim().to_string())
}

fn session_error(err: AuthenticationError) -> SessionError {
    match err {
        AuthenticationError::InvalidCredentials => SessionError::InvalidCredentials,
        AuthenticationError::InvalidRefreshToken(inner) => {
            tracing::warn!(error = %inner, "Refresh token rejected");
            SessionError::InvalidRefreshToken(inner)
        }
        AuthenticationError::Token(inner) => SessionError::Token(inner),
    }
}

fn seconds(value: i64) -> Duration {
    Duration::from_secs(value.max(1) as u64)
}

#[async_trait]
impl<AR, RR> SessionServicePort for SessionService<AR, RR>
where
    AR: AuthorityRepository,
    RR: RefreshTokenRegistry,
{
    async fn login(&self, command: LoginCommand) -> Result<TokenPair, SessionError> {
        let authority = self
            .repository
            .find_by_email_or_phone(&lookup_key(&command.credential))
            .await?
            .ok_or(SessionError::InvalidCredentials)?;

        let pair = self
            .authenticator
            .authenticate(
                &command.password,
                &authority.password_hash,
                &authority.principal(),
                Utc::now(),
            )
            .map_err(session_error)?;

        self.track(&pair, 0).await?;

        tracing::info!(
            authority_id = %authority.id,
            hospital_id = %authority.hospital_id,
            role = %authority.role,
            "Login successful"
        );

        Ok(pair)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, SessionError> {
        if !self.registry.tracks_tokens() {
            return self
                .authenticator
                .refresh_access_token(refresh_token, Utc::now())
                .map_err(session_error);
        }

        let claims = self
            .authenticator
            .decode_refresh_token(refresh_token)
            .map_err(|e| session_error(AuthenticationError::InvalidRefreshToken(e)))?;

        let generation = match self.registry.status(claims.jti).await? {
            RefreshTokenStatus::Untracked => None,
            RefreshTokenStatus::Valid { generation } => Some(generation),
            status @ (RefreshTokenStatus::Unknown | RefreshTokenStatus::Revoked { .. }) => {
                tracing::warn!(
                    jti = %claims.jti,
                    authority_id = %claims.sub,
                    status = %status,
                    "Refresh token replay rejected"
                );
                return Err(SessionError::RefreshTokenRevoked);
            }
        };

        let now = Utc::now();
        let pair = self.authenticator.issue_token_pair(&claims.principal(), now)?;

        if let Some(generation) = generation {
            self.registry
                .revoke(claims.jti, generation, seconds(claims.exp - now.timestamp()))
                .await?;
            self.track(&pair, generation + 1).await?;
        }

        Ok(pair)
    }
}

#[cfg(test)]
mod tests {
    use auth::Role;
    use mockall::mock;
    use uuid::Uuid;

    use super::*;
    use crate::domain::store::StoreError;
    use crate::domain::test_support::authenticator;
    use crate::domain::test_support::authority;
    use crate::domain::test_support::MockTestAuthorityRepository;

    mock! {
        pub TestRefreshTokenRegistry {}

        #[async_trait]
        impl RefreshTokenRegistry for TestRefreshTokenRegistry {
            fn tracks_tokens(&self) -> bool;
            async fn record(&self, jti: Uuid, generation: u32, ttl: Duration) -> Result<(), StoreError>;
            async fn status(&self, jti: Uuid) -> Result<RefreshTokenStatus, StoreError>;
            async fn revoke(&self, jti: Uuid, generation: u32, ttl: Duration) -> Result<(), StoreError>;
        }
    }

    fn untracked() -> MockTestRefreshTokenRegistry {
        let mut registry = MockTestRefreshTokenRegistry::new();
        registry.expect_tracks_tokens().return_const(false);
        registry.expect_record().returning(|_, _, _| Ok(()));
        registry.expect_status().times(0);
        registry.expect_revoke().times(0);
        registry
    }

    #[tokio::test]
    async fn test_login_with_email_or_phone() {
        let authenticator = authenticator();
        let digest = authenticator.hash_password("Secret123").unwrap();

        for (credential, expected_key) in [
            ("ada@x.com", "ada@x.com"),
            ("0555 111 22 33", "5551112233"),
        ] {
            let mut repository = MockTestAuthorityRepository::new();
            let stored = authority(3, Role::Admin, &digest);
            let principal = stored.principal();

            repository
                .expect_find_by_email_or_phone()
                .withf(move |credential| credential == expected_key)
                .times(1)
                .returning(move |_| Ok(Some(stored.clone())));

            let service = SessionService::new(
                Arc::new(repository),
                Arc::new(untracked()),
                Arc::clone(&authenticator),
            );

            let pair = service
                .login(LoginCommand {
                    credential: credential.to_string(),
                    password: "Secret123".to_string(),
                })
                .await
                .unwrap();

            assert_eq!(
                authenticator.verify_access_token(&pair.access_token).unwrap(),
                principal
            );
        }
    }

    #[tokio::test]
    async fn test_login_unknown_identity_and_wrong_password_look_the_same() {
        let authenticator = authenticator();
        let digest = authenticator.hash_password("Secret123").unwrap();

        let mut repository = MockTestAuthorityRepository::new();
        let stored = authority(3, Role::Staff, &digest);
        repository
            .expect_find_by_email_or_phone()
            .returning(move |credential| {
                if credential == "ada@x.com" {
                    Ok(Some(stored.clone()))
                } else {
                    Ok(None)
                }
            });

        let service = SessionService::new(Arc::new(repository), Arc::new(untracked()), authenticator);

        let unknown = service
            .login(LoginCommand {
                credential: "nobody@x.com".to_string(),
                password: "Secret123".to_string(),
            })
            .await
            .unwrap_err();
        let wrong = service
            .login(LoginCommand {
                credential: "ada@x.com".to_string(),
                password: "Wrong123".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(unknown, SessionError::InvalidCredentials));
        assert!(matches!(wrong, SessionError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_refresh_untracked_allows_replay() {
        let authenticator = authenticator();
        let principal = authority(3, Role::Staff, "digest").principal();
        let pair = authenticator.issue_token_pair(&principal, Utc::now()).unwrap();

        let service = SessionService::new(
            Arc::new(MockTestAuthorityRepository::new()),
            Arc::new(untracked()),
            Arc::clone(&authenticator),
        );

        let first = service.refresh(&pair.refresh_token).await.unwrap();
        let second = service.refresh(&pair.refresh_token).await.unwrap();

        assert_ne!(first.refresh_token_id, pair.refresh_token_id);
        assert_eq!(
            authenticator.verify_access_token(&second.access_token).unwrap(),
            principal
        );
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let authenticator = authenticator();
        let principal = authority(3, Role::Admin, "digest").principal();
        let pair = authenticator.issue_token_pair(&principal, Utc::now()).unwrap();

        let mut registry = MockTestRefreshTokenRegistry::new();
        registry.expect_tracks_tokens().return_const(true);
        registry.expect_status().times(0);

        let service = SessionService::new(
            Arc::new(MockTestAuthorityRepository::new()),
            Arc::new(registry),
            authenticator,
        );

        let result = service.refresh(&pair.access_token).await;
        assert!(matches!(
            result,
            Err(SessionError::InvalidRefreshToken(auth::JwtError::WrongTokenKind { .. }))
        ));
    }

    #[tokio::test]
    async fn test_refresh_untracked_rejects_access_token() {
        let authenticator = authenticator();
        let principal = authority(3, Role::Admin, "digest").principal();
        let pair = authenticator.issue_token_pair(&principal, Utc::now()).unwrap();

        let service = SessionService::new(
            Arc::new(MockTestAuthorityRepository::new()),
            Arc::new(untracked()),
            authenticator,
        );

        let result = service.refresh(&pair.access_token).await;
        assert!(matches!(
            result,
            Err(SessionError::InvalidRefreshToken(auth::JwtError::WrongTokenKind { .. }))
        ));
    }

    #[tokio::test]
    async fn test_refresh_tracked_rotates_generation() {
        let authenticator = authenticator();
        let principal = authority(3, Role::Admin, "digest").principal();
        let pair = authenticator.issue_token_pair(&principal, Utc::now()).unwrap();
        let presented = pair.refresh_token_id;

        let mut registry = MockTestRefreshTokenRegistry::new();
        registry.expect_tracks_tokens().return_const(true);
        registry
            .expect_status()
            .withf(move |jti| *jti == presented)
            .times(1)
            .returning(|_| Ok(RefreshTokenStatus::Valid { generation: 4 }));
        registry
            .expect_revoke()
            .withf(move |jti, generation, _| *jti == presented && *generation == 4)
            .times(1)
            .returning(|_, _, _| Ok(()));
        registry
            .expect_record()
            .withf(move |jti, generation, _| *jti != presented && *generation == 5)
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = SessionService::new(
            Arc::new(MockTestAuthorityRepository::new()),
            Arc::new(registry),
            authenticator,
        );

        let rotated = service.refresh(&pair.refresh_token).await.unwrap();
        assert_ne!(rotated.refresh_token_id, presented);
    }

    #[tokio::test]
    async fn test_refresh_tracked_rejects_revoked_and_unknown() {
        for status in [
            RefreshTokenStatus::Revoked { generation: 1 },
            RefreshTokenStatus::Unknown,
        ] {
            let authenticator = authenticator();
            let principal = authority(3, Role::Staff, "digest").principal();
            let pair = authenticator.issue_token_pair(&principal, Utc::now()).unwrap();

            let mut registry = MockTestRefreshTokenRegistry::new();
            registry.expect_tracks_tokens().return_const(true);
            registry.expect_status().returning(move |_| Ok(status));
            registry.expect_revoke().times(0);
            registry.expect_record().times(0);

            let service = SessionService::new(
                Arc::new(MockTestAuthorityRepository::new()),
                Arc::new(registry),
                authenticator,
            );

            let result = service.refresh(&pair.refresh_token).await;
            assert!(matches!(result, Err(SessionError::RefreshTokenRevoked)));
        }
    }
}
