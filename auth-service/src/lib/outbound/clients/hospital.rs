use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::authority::models::HospitalId;
use crate::domain::registration::errors::HospitalClientError;
use crate::domain::registration::models::HospitalProfile;
use crate::domain::registration::models::HospitalRecord;
use crate::domain::registration::models::IdempotencyKey;
use crate::domain::registration::ports::HospitalClient;

pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Hospital service client over HTTP/JSON.
pub struct HttpHospitalClient {
    base_url: String,
    timeout: Duration,
    http_client: Client,
}

impl HttpHospitalClient {
    /// # Arguments
    /// * `base_url` - Hospital service root, e.g. `http://hospital-service:8081`
    /// * `timeout` - Per-request timeout
    /// * `http_client` - Shared reqwest client
    pub fn new(base_url: impl Into<String>, timeout: Duration, http_client: Client) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
            http_client,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/hospital", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct CreateHospitalBody<'a> {
    name: &'a str,
    tax_number: &'a str,
    email: &'a str,
    phone: &'a str,
    address: &'a str,
    city_id: i64,
    district_id: i64,
}

impl<'a> From<&'a HospitalProfile> for CreateHospitalBody<'a> {
    fn from(hospital: &'a HospitalProfile) -> Self {
        Self {
            name: &hospital.name,
            tax_number: hospital.tax_number.as_str(),
            email: hospital.email.as_str(),
            phone: hospital.phone.as_str(),
            address: &hospital.address,
            city_id: hospital.city_id,
            district_id: hospital.district_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct HospitalBody {
    id: i64,
    name: String,
    tax_number: String,
    email: String,
    phone: String,
    address: String,
    city_id: i64,
    #[serde(default)]
    city_name: String,
    district_id: i64,
    #[serde(default)]
    district_name: String,
}

impl From<HospitalBody> for HospitalRecord {
    fn from(body: HospitalBody) -> Self {
        HospitalRecord {
            id: HospitalId(body.id),
            name: body.name,
            tax_number: body.tax_number,
            email: body.email,
            phone: body.phone,
            address: body.address,
            city_id: body.city_id,
            city_name: body.city_name,
            district_id: body.district_id,
            district_name: body.district_name,
        }
    }
}

#[async_trait]
impl HospitalClient for HttpHospitalClient {
    async fn create_hospital(
        &self,
        hospital: &HospitalProfile,
        key: &IdempotencyKey,
    ) -> Result<HospitalRecord, HospitalClientError> {
        let response = self
            .http_client
            .post(self.endpoint())
            .header(IDEMPOTENCY_KEY_HEADER, key.to_string())
            .timeout(self.timeout)
            .json(&CreateHospitalBody::from(hospital))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    HospitalClientError::Unreachable(format!("timed out after {:?}", self.timeout))
                } else {
                    HospitalClientError::Unreachable(e.to_string())
                }
            })?;

        let status = response.status();
        if status != StatusCode::CREATED {
            tracing::warn!(status = %status, idempotency_key = %key, "Hospital service rejected creation");
            return Err(HospitalClientError::Rejected {
                status: status.as_u16(),
            });
        }

        let body = response
            .json::<HospitalBody>()
            .await
            .map_err(|e| HospitalClientError::InvalidResponse(e.to_string()))?;

        if body.id <= 0 {
            return Err(HospitalClientError::InvalidResponse(format!(
                "hospital id must be positive, got {}",
                body.id
            )));
        }

        Ok(body.into())
    }
}
