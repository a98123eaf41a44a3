use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::authority::models::AuthorityId;
use crate::domain::authority::models::EmailAddress;
use crate::domain::authority::models::HospitalId;
use crate::domain::authority::models::NationalId;
use crate::domain::authority::models::PersonName;
use crate::domain::authority::models::PersonProfile;
use crate::domain::authority::models::PhoneNumber;
use crate::domain::registration::errors::LedgerError;
use crate::domain::registration::models::HospitalProfile;
use crate::domain::registration::models::IdempotencyKey;
use crate::domain::registration::models::ProvisioningRequest;
use crate::domain::registration::models::ProvisioningStatus;
use crate::domain::registration::models::TaxNumber;
use crate::domain::registration::ports::ProvisioningLedger;

const SELECT_REQUEST: &str = r#"
    SELECT idempotency_key, hospital, administrator, password_hash, status,
           hospital_id, authority_id, last_error, created_at, updated_at
    FROM provisioning_requests
"#;

/// Provisioning ledger stored in the `provisioning_requests` table.
///
/// Both profiles are kept as JSONB snapshots and validated again on read.
pub struct PostgresProvisioningLedger {
    pool: PgPool,
}

impl PostgresProvisioningLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn transition(
        &self,
        key: &IdempotencyKey,
        status: Option<ProvisioningStatus>,
        hospital_id: Option<HospitalId>,
        authority_id: Option<AuthorityId>,
        last_error: Option<&str>,
    ) -> Result<(), LedgerError> {
        let result = sqlx::query(
            r#"
            UPDATE provisioning_requests
            SET status = COALESCE($2, status),
                hospital_id = COALESCE($3, hospital_id),
                authority_id = COALESCE($4, authority_id),
                last_error = COALESCE($5, last_error),
                updated_at = NOW()
            WHERE idempotency_key = $1
            "#,
        )
        .bind(key.0)
        .bind(status.map(|s| s.as_str()))
        .bind(hospital_id.map(|id| id.0))
        .bind(authority_id.map(|id| id.0))
        .bind(last_error)
        .execute(&self.pool)
        .await
        .map_err(|e| LedgerError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::DatabaseError(format!(
                "provisioning request {key} does not exist"
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct HospitalSnapshot {
    name: String,
    tax_number: String,
    email: String,
    phone: String,
    address: String,
    city_id: i64,
    district_id: i64,
}

impl From<&HospitalProfile> for HospitalSnapshot {
    fn from(hospital: &HospitalProfile) -> Self {
        Self {
            name: hospital.name.clone(),
            tax_number: hospital.tax_number.as_str().to_string(),
            email: hospital.email.as_str().to_string(),
            phone: hospital.phone.as_str().to_string(),
            address: hospital.address.clone(),
            city_id: hospital.city_id,
            district_id: hospital.district_id,
        }
    }
}

impl HospitalSnapshot {
    fn into_profile(self) -> Result<HospitalProfile, String> {
        HospitalProfile::new(
            self.name,
            TaxNumber::new(self.tax_number).map_err(|e| e.to_string())?,
            EmailAddress::new(self.email).map_err(|e| e.to_string())?,
            PhoneNumber::new(self.phone).map_err(|e| e.to_string())?,
            self.address,
            self.city_id,
            self.district_id,
        )
        .map_err(|e| e.to_string())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct AdministratorSnapshot {
    first_name: String,
    last_name: String,
    tc: String,
    email: String,
    phone: String,
}

impl From<&PersonProfile> for AdministratorSnapshot {
    fn from(profile: &PersonProfile) -> Self {
        Self {
            first_name: profile.first_name.as_str().to_string(),
            last_name: profile.last_name.as_str().to_string(),
            tc: profile.national_id.as_str().to_string(),
            email: profile.email.as_str().to_string(),
            phone: profile.phone.as_str().to_string(),
        }
    }
}

impl AdministratorSnapshot {
    fn into_profile(self) -> Result<PersonProfile, String> {
        Ok(PersonProfile {
            first_name: PersonName::new(self.first_name).map_err(|e| e.to_string())?,
            last_name: PersonName::new(self.last_name).map_err(|e| e.to_string())?,
            national_id: NationalId::new(self.tc).map_err(|e| e.to_string())?,
            email: EmailAddress::new(self.email).map_err(|e| e.to_string())?,
            phone: PhoneNumber::new(self.phone).map_err(|e| e.to_string())?,
        })
    }
}

#[derive(Debug, FromRow)]
struct ProvisioningRow {
    idempotency_key: Uuid,
    hospital: Json<HospitalSnapshot>,
    administrator: Json<AdministratorSnapshot>,
    password_hash: String,
    status: String,
    hospital_id: Option<i64>,
    authority_id: Option<Uuid>,
    last_error: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProvisioningRow> for ProvisioningRequest {
    type Error = LedgerError;

    fn try_from(row: ProvisioningRow) -> Result<Self, Self::Error> {
        let key = row.idempotency_key.to_string();
        let corrupt = |reason: String| LedgerError::CorruptRecord {
            key: key.clone(),
            reason,
        };

        Ok(ProvisioningRequest {
            key: IdempotencyKey(row.idempotency_key),
            hospital: row.hospital.0.into_profile().map_err(corrupt)?,
            administrator: row.administrator.0.into_profile().map_err(corrupt)?,
            password_hash: row.password_hash,
            status: row.status.parse().map_err(corrupt)?,
            hospital_id: row.hospital_id.map(HospitalId),
            authority_id: row.authority_id.map(AuthorityId),
            last_error: row.last_error,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl ProvisioningLedger for PostgresProvisioningLedger {
    async fn record(&self, request: &ProvisioningRequest) -> Result<(), LedgerError> {
        sqlx::query(
            r#"
            INSERT INTO provisioning_requests
                (idempotency_key, hospital, administrator, password_hash, status,
                 hospital_id, authority_id, last_error, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(request.key.0)
        .bind(Json(HospitalSnapshot::from(&request.hospital)))
        .bind(Json(AdministratorSnapshot::from(&request.administrator)))
        .bind(&request.password_hash)
        .bind(request.status.as_str())
        .bind(request.hospital_id.map(|id| id.0))
        .bind(request.authority_id.map(|id| id.0))
        .bind(request.last_error.as_deref())
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| LedgerError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find(&self, key: &IdempotencyKey) -> Result<Option<ProvisioningRequest>, LedgerError> {
        let query = format!("{SELECT_REQUEST} WHERE idempotency_key = $1");

        sqlx::query_as::<_, ProvisioningRow>(&query)
            .bind(key.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| LedgerError::DatabaseError(e.to_string()))?
            .map(ProvisioningRequest::try_from)
            .transpose()
    }

    async fn mark_tenant_created(&self, key: &IdempotencyKey, hospital_id: HospitalId) -> Result<(), LedgerError> {
        self.transition(key, Some(ProvisioningStatus::TenantCreated), Some(hospital_id), None, None)
            .await
    }

    async fn mark_completed(&self, key: &IdempotencyKey, authority_id: AuthorityId) -> Result<(), LedgerError> {
        self.transition(key, Some(ProvisioningStatus::Completed), None, Some(authority_id), None)
            .await
    }

    async fn mark_failed(&self, key: &IdempotencyKey, reason: &str) -> Result<(), LedgerError> {
        self.transition(key, Some(ProvisioningStatus::Failed), None, None, Some(reason))
            .await
    }

    async fn mark_orphaned(&self, key: &IdempotencyKey, reason: &str) -> Result<(), LedgerError> {
        self.transition(key, Some(ProvisioningStatus::Orphaned), None, None, Some(reason))
            .await
    }

    async fn note_error(&self, key: &IdempotencyKey, reason: &str) -> Result<(), LedgerError> {
        self.transition(key, None, None, None, Some(reason)).await
    }

    async fn list_stale(&self, before: DateTime<Utc>) -> Result<Vec<ProvisioningRequest>, LedgerError> {
        let query = format!(
            "{SELECT_REQUEST} WHERE status IN ('pending', 'tenant_created') AND updated_at < $1 ORDER BY created_at"
        );

        sqlx::query_as::<_, ProvisioningRow>(&query)
            .bind(before)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| LedgerError::DatabaseError(e.to_string()))?
            .into_iter()
            .map(ProvisioningRequest::try_from)
            .collect()
    }
}
