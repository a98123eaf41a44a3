use async_trait::async_trait;
use auth::Principal;

use crate::domain::authority::errors::AuthorityError;
use crate::domain::authority::models::Authority;
use crate::domain::authority::models::AuthorityId;
use crate::domain::authority::models::CreateSubUserCommand;
use crate::domain::authority::models::EmailAddress;
use crate::domain::authority::models::HospitalId;
use crate::domain::authority::models::NationalId;
use crate::domain::authority::models::PhoneNumber;
use crate::domain::authority::models::UpdateSubUserCommand;

/// Port for identity management inside a hospital.
///
/// Every operation acts on behalf of an authenticated principal; the tenant
/// is always taken from the principal, never from the request.
#[async_trait]
pub trait AuthorityServicePort: Send + Sync + 'static {
    /// Create an identity in the caller's hospital.
    ///
    /// # Errors
    /// * `AlreadyExists` - TC, email or phone is already taken by any identity
    /// * `PasswordHash` - Hashing the password failed
    /// * `DatabaseError` - Database operation failed
    async fn create_sub_user(
        &self,
        principal: &Principal,
        command: CreateSubUserCommand,
    ) -> Result<Authority, AuthorityError>;

    /// List live identities of the caller's hospital.
    async fn list_sub_users(&self, principal: &Principal) -> Result<Vec<Authority>, AuthorityError>;

    /// Replace the profile of an identity in the caller's hospital.
    ///
    /// # Errors
    /// * `NotFound` - Identity does not exist
    /// * `Forbidden` - Identity belongs to another hospital
    /// * `AlreadyExists` - Another identity already uses the TC, email or phone
    /// * `DatabaseError` - Database operation failed
    async fn update_sub_user(
        &self,
        principal: &Principal,
        id: &AuthorityId,
        command: UpdateSubUserCommand,
    ) -> Result<Authority, AuthorityError>;

    /// Soft-delete an identity in the caller's hospital.
    ///
    /// # Errors
    /// * `NotFound` - Identity does not exist
    /// * `Forbidden` - Identity belongs to another hospital
    async fn delete_sub_user(&self, principal: &Principal, id: &AuthorityId) -> Result<(), AuthorityError>;

    /// The caller's own identity.
    ///
    /// # Errors
    /// * `NotFound` - Identity was deleted after the token was issued
    async fn get_profile(&self, principal: &Principal) -> Result<Authority, AuthorityError>;
}

/// Persistence operations for the identity aggregate.
///
/// Soft-deleted identities are invisible to every lookup. Uniqueness checks
/// cover them too, since the storage constraints still do.
#[async_trait]
pub trait AuthorityRepository: Send + Sync + 'static {
    /// `true` when any identity already uses the TC, email or phone.
    async fn exists(
        &self,
        national_id: &NationalId,
        email: &EmailAddress,
        phone: &PhoneNumber,
    ) -> Result<bool, AuthorityError>;

    /// `true` when an identity other than `id` uses the TC, email or phone.
    async fn exists_other(
        &self,
        id: &AuthorityId,
        national_id: &NationalId,
        email: &EmailAddress,
        phone: &PhoneNumber,
    ) -> Result<bool, AuthorityError>;

    /// Persist a new identity.
    ///
    /// # Errors
    /// * `AlreadyExists` - A unique constraint rejected the row
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, authority: Authority) -> Result<Authority, AuthorityError>;

    async fn find_by_id(&self, id: &AuthorityId) -> Result<Option<Authority>, AuthorityError>;

    async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<Authority>, AuthorityError>;

    /// Lookup used by login: `credential` is matched against email and phone.
    async fn find_by_email_or_phone(&self, credential: &str) -> Result<Option<Authority>, AuthorityError>;

    async fn list_by_hospital(&self, hospital_id: HospitalId) -> Result<Vec<Authority>, AuthorityError>;

    /// Persist profile changes.
    ///
    /// # Errors
    /// * `NotFound` - Identity does not exist
    /// * `AlreadyExists` - A unique constraint rejected the row
    async fn update(&self, authority: Authority) -> Result<Authority, AuthorityError>;

    /// # Errors
    /// * `NotFound` - Identity does not exist
    async fn update_password(&self, id: &AuthorityId, password_hash: &str) -> Result<(), AuthorityError>;

    /// # Errors
    /// * `NotFound` - Identity does not exist
    async fn soft_delete(&self, id: &AuthorityId) -> Result<(), AuthorityError>;
}
