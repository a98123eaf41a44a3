use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::authority::errors::AuthorityError;
use crate::domain::authority::models::Authority;
use crate::domain::authority::models::AuthorityId;
use crate::domain::authority::models::EmailAddress;
use crate::domain::authority::models::HospitalId;
use crate::domain::authority::models::NationalId;
use crate::domain::authority::models::PersonName;
use crate::domain::authority::models::PhoneNumber;
use crate::domain::authority::ports::AuthorityRepository;

const SELECT_AUTHORITY: &str = r#"
    SELECT id, first_name, last_name, tc, email, phone, password_hash, role,
           hospital_id, created_at, updated_at
    FROM authorities
"#;

pub struct PostgresAuthorityRepository {
    pool: PgPool,
}

impl PostgresAuthorityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, filter: &str, value: &str) -> Result<Option<Authority>, AuthorityError> {
        let query = format!("{SELECT_AUTHORITY} WHERE {filter} AND deleted_at IS NULL");

        sqlx::query_as::<_, AuthorityRow>(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthorityError::DatabaseError(e.to_string()))?
            .map(Authority::try_from)
            .transpose()
    }
}

#[derive(Debug, FromRow)]
struct AuthorityRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    tc: String,
    email: String,
    phone: String,
    password_hash: String,
    role: String,
    hospital_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AuthorityRow> for Authority {
    type Error = AuthorityError;

    fn try_from(row: AuthorityRow) -> Result<Self, Self::Error> {
        Ok(Authority {
            id: AuthorityId(row.id),
            first_name: PersonName::new(row.first_name)?,
            last_name: PersonName::new(row.last_name)?,
            national_id: NationalId::new(row.tc)?,
            email: EmailAddress::new(row.email)?,
            phone: PhoneNumber::new(row.phone)?,
            password_hash: row.password_hash,
            role: row.role.parse()?,
            hospital_id: HospitalId(row.hospital_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn write_error(e: sqlx::Error) -> AuthorityError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AuthorityError::AlreadyExists;
        }
    }
    AuthorityError::DatabaseError(e.to_string())
}

#[async_trait]
impl AuthorityRepository for PostgresAuthorityRepository {
    async fn exists(
        &self,
        national_id: &NationalId,
        email: &EmailAddress,
        phone: &PhoneNumber,
    ) -> Result<bool, AuthorityError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM authorities
                WHERE tc = $1 OR email = $2 OR phone = $3
            )
            "#,
        )
        .bind(national_id.as_str())
        .bind(email.as_str())
        .bind(phone.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AuthorityError::DatabaseError(e.to_string()))
    }

    async fn exists_other(
        &self,
        id: &AuthorityId,
        national_id: &NationalId,
        email: &EmailAddress,
        phone: &PhoneNumber,
    ) -> Result<bool, AuthorityError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM authorities
                WHERE (tc = $1 OR email = $2 OR phone = $3) AND id <> $4
            )
            "#,
        )
        .bind(national_id.as_str())
        .bind(email.as_str())
        .bind(phone.as_str())
        .bind(id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AuthorityError::DatabaseError(e.to_string()))
    }

    async fn create(&self, authority: Authority) -> Result<Authority, AuthorityError> {
        sqlx::query(
            r#"
            INSERT INTO authorities
                (id, first_name, last_name, tc, email, phone, password_hash, role,
                 hospital_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(authority.id.0)
        .bind(authority.first_name.as_str())
        .bind(authority.last_name.as_str())
        .bind(authority.national_id.as_str())
        .bind(authority.email.as_str())
        .bind(authority.phone.as_str())
        .bind(&authority.password_hash)
        .bind(authority.role.as_str())
        .bind(authority.hospital_id.0)
        .bind(authority.created_at)
        .bind(authority.updated_at)
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        Ok(authority)
    }

    async fn find_by_id(&self, id: &AuthorityId) -> Result<Option<Authority>, AuthorityError> {
        let query = format!("{SELECT_AUTHORITY} WHERE id = $1 AND deleted_at IS NULL");

        sqlx::query_as::<_, AuthorityRow>(&query)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthorityError::DatabaseError(e.to_string()))?
            .map(Authority::try_from)
            .transpose()
    }

    async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<Authority>, AuthorityError> {
        self.find_one("phone = $1", phone.as_str()).await
    }

    async fn find_by_email_or_phone(&self, credential: &str) -> Result<Option<Authority>, AuthorityError> {
        self.find_one("(email = $1 OR phone = $1)", credential).await
    }

    async fn list_by_hospital(&self, hospital_id: HospitalId) -> Result<Vec<Authority>, AuthorityError> {
        let query = format!(
            "{SELECT_AUTHORITY} WHERE hospital_id = $1 AND deleted_at IS NULL ORDER BY created_at"
        );

        sqlx::query_as::<_, AuthorityRow>(&query)
            .bind(hospital_id.0)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AuthorityError::DatabaseError(e.to_string()))?
            .into_iter()
            .map(Authority::try_from)
            .collect()
    }

    async fn update(&self, authority: Authority) -> Result<Authority, AuthorityError> {
        let result = sqlx::query(
            r#"
            UPDATE authorities
            SET first_name = $2, last_name = $3, tc = $4, email = $5, phone = $6,
                password_hash = $7, role = $8, updated_at = $9
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(authority.id.0)
        .bind(authority.first_name.as_str())
        .bind(authority.last_name.as_str())
        .bind(authority.national_id.as_str())
        .bind(authority.email.as_str())
        .bind(authority.phone.as_str())
        .bind(&authority.password_hash)
        .bind(authority.role.as_str())
        .bind(authority.updated_at)
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        if result.rows_affected() == 0 {
            return Err(AuthorityError::NotFound(authority.id.to_string()));
        }

        Ok(authority)
    }

    async fn update_password(&self, id: &AuthorityId, password_hash: &str) -> Result<(), AuthorityError> {
        let result = sqlx::query(
            r#"
            UPDATE authorities
            SET password_hash = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.0)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthorityError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AuthorityError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn soft_delete(&self, id: &AuthorityId) -> Result<(), AuthorityError> {
        let result = sqlx::query(
            r#"
            UPDATE authorities
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthorityError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AuthorityError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
