//! Shared fixtures for the domain unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::CredentialHasher;
use auth::Role;
use auth::SigningKeys;
use auth::TokenPolicy;
use mockall::mock;

use crate::domain::authority::errors::AuthorityError;
use crate::domain::authority::models::Authority;
use crate::domain::authority::models::AuthorityId;
use crate::domain::authority::models::EmailAddress;
use crate::domain::authority::models::HospitalId;
use crate::domain::authority::models::NationalId;
use crate::domain::authority::models::PersonName;
use crate::domain::authority::models::PersonProfile;
use crate::domain::authority::models::PhoneNumber;
use crate::domain::authority::ports::AuthorityRepository;

const PRIVATE_PEM: &str = include_str!("../../../../auth/testdata/rs256_private.pem");
const PUBLIC_PEM: &str = include_str!("../../../../auth/testdata/rs256_public.pem");

mock! {
    pub TestAuthorityRepository {}

    #[async_trait]
    impl AuthorityRepository for TestAuthorityRepository {
        async fn exists(&self, national_id: &NationalId, email: &EmailAddress, phone: &PhoneNumber) -> Result<bool, AuthorityError>;
        async fn exists_other(&self, id: &AuthorityId, national_id: &NationalId, email: &EmailAddress, phone: &PhoneNumber) -> Result<bool, AuthorityError>;
        async fn create(&self, authority: Authority) -> Result<Authority, AuthorityError>;
        async fn find_by_id(&self, id: &AuthorityId) -> Result<Option<Authority>, AuthorityError>;
        async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<Authority>, AuthorityError>;
        async fn find_by_email_or_phone(&self, credential: &str) -> Result<Option<Authority>, AuthorityError>;
        async fn list_by_hospital(&self, hospital_id: HospitalId) -> Result<Vec<Authority>, AuthorityError>;
        async fn update(&self, authority: Authority) -> Result<Authority, AuthorityError>;
        async fn update_password(&self, id: &AuthorityId, password_hash: &str) -> Result<(), AuthorityError>;
        async fn soft_delete(&self, id: &AuthorityId) -> Result<(), AuthorityError>;
    }
}

pub fn authenticator() -> Arc<Authenticator> {
    let keys = SigningKeys::from_pem(PRIVATE_PEM, PUBLIC_PEM).unwrap();
    Arc::new(Authenticator::new(Arc::new(keys), TokenPolicy::default()))
}

pub fn authenticator_with_hasher(hasher: Arc<dyn CredentialHasher>) -> Arc<Authenticator> {
    let keys = SigningKeys::from_pem(PRIVATE_PEM, PUBLIC_PEM).unwrap();
    Arc::new(Authenticator::new(Arc::new(keys), TokenPolicy::default()).with_hasher(hasher))
}

pub fn profile(tc: &str, email: &str, phone: &str) -> PersonProfile {
    PersonProfile {
        first_name: PersonName::new("Ada".to_string()).unwrap(),
        last_name: PersonName::new("Yilmaz".to_string()).unwrap(),
        national_id: NationalId::new(tc.to_string()).unwrap(),
        email: EmailAddress::new(email.to_string()).unwrap(),
        phone: PhoneNumber::new(phone.to_string()).unwrap(),
    }
}

pub fn authority(hospital_id: i64, role: Role, password_hash: &str) -> Authority {
    Authority::new(
        profile("12345678901", "ada@x.com", "5551112233"),
        password_hash.to_string(),
        role,
        HospitalId(hospital_id),
    )
}
