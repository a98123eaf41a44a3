use std::fmt;
use std::str::FromStr;

use auth::Role;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::authority::models::Authority;
use crate::domain::authority::models::AuthorityId;
use crate::domain::authority::models::EmailAddress;
use crate::domain::authority::models::HospitalId;
use crate::domain::authority::models::PersonProfile;
use crate::domain::authority::models::PhoneNumber;
use crate::domain::registration::errors::HospitalProfileError;

/// Tax number (VKN, or TCKN for sole proprietors).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxNumber(String);

impl TaxNumber {
    pub fn new(tax_number: String) -> Result<Self, HospitalProfileError> {
        let tax_number = tax_number.trim().to_string();
        let valid = matches!(tax_number.len(), 10 | 11)
            && tax_number.chars().all(|c| c.is_ascii_digit());

        if valid {
            Ok(Self(tax_number))
        } else {
            Err(HospitalProfileError::InvalidTaxNumber(tax_number))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Hospital data sent to the hospital service on registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HospitalProfile {
    pub name: String,
    pub tax_number: TaxNumber,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub address: String,
    pub city_id: i64,
    pub district_id: i64,
}

impl HospitalProfile {
    /// # Errors
    /// * `EmptyName` / `EmptyAddress` - Blank after trimming
    /// * `InvalidLocation` - City or district id is not positive
    pub fn new(
        name: String,
        tax_number: TaxNumber,
        email: EmailAddress,
        phone: PhoneNumber,
        address: String,
        city_id: i64,
        district_id: i64,
    ) -> Result<Self, HospitalProfileError> {
        let name = name.trim().to_string();
        let address = address.trim().to_string();

        if name.is_empty() {
            return Err(HospitalProfileError::EmptyName);
        }
        if address.is_empty() {
            return Err(HospitalProfileError::EmptyAddress);
        }
        if city_id <= 0 {
            return Err(HospitalProfileError::InvalidLocation { field: "city_id" });
        }
        if district_id <= 0 {
            return Err(HospitalProfileError::InvalidLocation {
                field: "district_id",
            });
        }

        Ok(Self {
            name,
            tax_number,
            email,
            phone,
            address,
            city_id,
            district_id,
        })
    }
}

/// Hospital as reported back by the hospital service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HospitalRecord {
    pub id: HospitalId,
    pub name: String,
    pub tax_number: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city_id: i64,
    pub city_name: String,
    pub district_id: i64,
    pub district_name: String,
}

/// Command to register a hospital together with its first administrator.
#[derive(Debug)]
pub struct RegisterCommand {
    pub hospital: HospitalProfile,
    pub administrator: PersonProfile,
    pub password: String,
}

/// Key identifying one registration attempt, end to end.
///
/// Sent to the hospital service as the `Idempotency-Key` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdempotencyKey(pub Uuid);

impl IdempotencyKey {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for IdempotencyKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle of a provisioning request.
///
/// `pending` → `tenant_created` → `completed`, with `failed` when the
/// hospital was never created and `orphaned` when it was created but its
/// administrator can never be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProvisioningStatus {
    Pending,
    TenantCreated,
    Completed,
    Failed,
    Orphaned,
}

impl ProvisioningStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProvisioningStatus::Pending => "pending",
            ProvisioningStatus::TenantCreated => "tenant_created",
            ProvisioningStatus::Completed => "completed",
            ProvisioningStatus::Failed => "failed",
            ProvisioningStatus::Orphaned => "orphaned",
        }
    }

    /// `true` once nothing more can happen to the request.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProvisioningStatus::Completed | ProvisioningStatus::Failed | ProvisioningStatus::Orphaned
        )
    }
}

impl FromStr for ProvisioningStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ProvisioningStatus::Pending),
            "tenant_created" => Ok(ProvisioningStatus::TenantCreated),
            "completed" => Ok(ProvisioningStatus::Completed),
            "failed" => Ok(ProvisioningStatus::Failed),
            "orphaned" => Ok(ProvisioningStatus::Orphaned),
            other => Err(format!("unknown provisioning status '{other}'")),
        }
    }
}

impl fmt::Display for ProvisioningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ledger entry for one registration attempt.
///
/// Holds everything needed to finish the registration later: both profiles
/// and the administrator's password digest (never the plaintext).
#[derive(Debug, Clone)]
pub struct ProvisioningRequest {
    pub key: IdempotencyKey,
    pub hospital: HospitalProfile,
    pub administrator: PersonProfile,
    pub password_hash: String,
    pub status: ProvisioningStatus,
    pub hospital_id: Option<HospitalId>,
    pub authority_id: Option<AuthorityId>,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProvisioningRequest {
    pub fn new(hospital: HospitalProfile, administrator: PersonProfile, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            key: IdempotencyKey::new(),
            hospital,
            administrator,
            password_hash,
            status: ProvisioningStatus::Pending,
            hospital_id: None,
            authority_id: None,
            last_error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The hospital's first identity; always an administrator.
    pub fn administrator_identity(&self, hospital_id: HospitalId) -> Authority {
        Authority::new(
            self.administrator.clone(),
            self.password_hash.clone(),
            Role::Admin,
            hospital_id,
        )
    }
}

/// Outcome counts of one stale-request sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub examined: usize,
    pub completed: usize,
    pub failed: usize,
    pub orphaned: usize,
    pub unresolved: usize,
}

impl ReconcileReport {
    pub fn record(&mut self, status: ProvisioningStatus) {
        self.examined += 1;
        match status {
            ProvisioningStatus::Completed => self.completed += 1,
            ProvisioningStatus::Failed => self.failed += 1,
            ProvisioningStatus::Orphaned => self.orphaned += 1,
            ProvisioningStatus::Pending | ProvisioningStatus::TenantCreated => self.unresolved += 1,
        }
    }
}
