use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Principal;
use chrono::Utc;

use crate::domain::authority::errors::AuthorityError;
use crate::domain::authority::models::Authority;
use crate::domain::authority::models::AuthorityId;
use crate::domain::authority::models::CreateSubUserCommand;
use crate::domain::authority::models::HospitalId;
use crate::domain::authority::models::UpdateSubUserCommand;
use crate::domain::authority::ports::AuthorityRepository;
use crate::domain::authority::ports::AuthorityServicePort;

/// Domain service for identities managed by a hospital administrator.
pub struct AuthorityService<AR>
where
    AR: AuthorityRepository,
{
    repository: Arc<AR>,
    authenticator: Arc<Authenticator>,
}

impl<AR> AuthorityService<AR>
where
    AR: AuthorityRepository,
{
    pub fn new(repository: Arc<AR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    fn hash_password(&self, password: &str) -> Result<String, AuthorityError> {
        self.authenticator
            .hash_password(password)
            .map_err(|e| AuthorityError::PasswordHash(e.to_string()))
    }

    /// Load an identity and check it belongs to the caller's hospital.
    async fn find_in_hospital(
        &self,
        principal: &Principal,
        id: &AuthorityId,
    ) -> Result<Authority, AuthorityError> {
        let authority = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AuthorityError::NotFound(id.to_string()))?;

        if !authority.belongs_to(HospitalId(principal.tenant_id)) {
            tracing::warn!(
                caller = %principal.identity_id,
                caller_hospital = principal.tenant_id,
                target = %id,
                target_hospital = %authority.hospital_id,
                "Cross-hospital access denied"
            );
            return Err(AuthorityError::Forbidden(id.to_string()));
        }

        Ok(authority)
    }
}

#[async_trait]
impl<AR> AuthorityServicePort for AuthorityService<AR>
where
    AR: AuthorityRepository,
{
    async fn create_sub_user(
        &self,
        principal: &Principal,
        command: CreateSubUserCommand,
    ) -> Result<Authority, AuthorityError> {
        let profile = &command.profile;
        if self
            .repository
            .exists(&profile.national_id, &profile.email, &profile.phone)
            .await?
        {
            return Err(AuthorityError::AlreadyExists);
        }

        let password_hash = self.hash_password(&command.password)?;
        let authority = Authority::new(
            command.profile,
            password_hash,
            command.role,
            HospitalId(principal.tenant_id),
        );

        let created = self.repository.create(authority).await?;

        tracing::info!(
            authority_id = %created.id,
            hospital_id = %created.hospital_id,
            role = %created.role,
            created_by = %principal.identity_id,
            "Sub-user created"
        );

        Ok(created)
    }

    async fn list_sub_users(&self, principal: &Principal) -> Result<Vec<Authority>, AuthorityError> {
        self.repository
            .list_by_hospital(HospitalId(principal.tenant_id))
            .await
    }

    async fn update_sub_user(
        &self,
        principal: &Principal,
        id: &AuthorityId,
        command: UpdateSubUserCommand,
    ) -> Result<Authority, AuthorityError> {
        let mut authority = self.find_in_hospital(principal, id).await?;

        let profile = &command.profile;
        if self
            .repository
            .exists_other(id, &profile.national_id, &profile.email, &profile.phone)
            .await?
        {
            return Err(AuthorityError::AlreadyExists);
        }

        if let Some(password) = command.password.as_deref() {
            authority.password_hash = self.hash_password(password)?;
        }

        authority.first_name = command.profile.first_name;
        authority.last_name = command.profile.last_name;
        authority.national_id = command.profile.national_id;
        authority.email = command.profile.email;
        authority.phone = command.profile.phone;
        authority.role = command.role;
        authority.updated_at = Utc::now();

        self.repository.update(authority).await
    }

    async fn delete_sub_user(&self, principal: &Principal, id: &AuthorityId) -> Result<(), AuthorityError> {
        self.find_in_hospital(principal, id).await?;
        self.repository.soft_delete(id).await?;

        tracing::info!(
            authority_id = %id,
            deleted_by = %principal.identity_id,
            "Sub-user deleted"
        );

        Ok(())
    }

    async fn get_profile(&self, principal: &Principal) -> Result<Authority, AuthorityError> {
        let id = AuthorityId(principal.identity_id);
        self.repository
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AuthorityError::NotFound(id.to_string()))
    }
}
