#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::AtomicU16;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::AuthorizationGate;
use auth::SigningKeys;
use auth::TokenPolicy;
use auth_service::authority::errors::AuthorityError;
use auth_service::authority::models::Authority;
use auth_service::authority::models::AuthorityId;
use auth_service::authority::models::EmailAddress;
use auth_service::authority::models::HospitalId;
use auth_service::authority::models::NationalId;
use auth_service::authority::models::PhoneNumber;
use auth_service::authority::ports::AuthorityRepository;
use auth_service::domain::authority::service::AuthorityService;
use auth_service::domain::recovery::service::RecoveryService;
use auth_service::domain::registration::service::RegistrationService;
use auth_service::domain::session::service::SessionService;
use auth_service::inbound::http::router::create_router;
use auth_service::inbound::http::router::AppState;
use auth_service::outbound::clients::HttpHospitalClient;
use auth_service::outbound::stores::InMemoryStore;
use auth_service::outbound::stores::VolatileRefreshTokenRegistry;
use auth_service::recovery::errors::NotifierError;
use auth_service::recovery::models::RecoveryCode;
use auth_service::recovery::ports::RecoveryNotifier;
use auth_service::registration::errors::LedgerError;
use auth_service::registration::models::IdempotencyKey;
use auth_service::registration::models::ProvisioningRequest;
use auth_service::registration::models::ProvisioningStatus;
use auth_service::registration::ports::ProvisioningLedger;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Json;
use axum::Router;
use chrono::DateTime;
use chrono::Utc;
use serde_json::json;
use serde_json::Value;

const PRIVATE_PEM: &str = include_str!("../../../auth/testdata/rs256_private.pem");
const PUBLIC_PEM: &str = include_str!("../../../auth/testdata/rs256_public.pem");

/// Test application wired with in-memory adapters and a stub hospital service
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub hospital_service: StubHospitalService,
    pub authorities: Arc<InMemoryAuthorityRepository>,
    pub ledger: Arc<InMemoryProvisioningLedger>,
    pub notifier: Arc<CapturingNotifier>,
    pub authenticator: Arc<Authenticator>,
}

impl TestApp {
    /// Spawn the application without refresh-token tracking
    pub async fn spawn() -> Self {
        Self::spawn_with_tracking(false).await
    }

    /// Spawn the application in a background task on a random port
    pub async fn spawn_with_tracking(track_refresh_tokens: bool) -> Self {
        let hospital_service = StubHospitalService::spawn().await;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let keys = Arc::new(SigningKeys::from_pem(PRIVATE_PEM, PUBLIC_PEM).expect("Invalid test keys"));
        let authenticator = Arc::new(Authenticator::new(keys, TokenPolicy::default()));
        let gate = Arc::new(AuthorizationGate::new(authenticator.verifier()));

        let authorities = Arc::new(InMemoryAuthorityRepository::default());
        let ledger = Arc::new(InMemoryProvisioningLedger::default());
        let notifier = Arc::new(CapturingNotifier::default());
        let store = Arc::new(InMemoryStore::new());

        let hospital_client = Arc::new(HttpHospitalClient::new(
            hospital_service.address.clone(),
            std::time::Duration::from_secs(5),
            reqwest::Client::new(),
        ));

        let registration_service = Arc::new(RegistrationService::new(
            Arc::clone(&authorities),
            hospital_client,
            Arc::clone(&ledger),
            Arc::clone(&authenticator),
        ));

        let session_service: Arc<dyn auth_service::session::ports::SessionServicePort> =
            if track_refresh_tokens {
                Arc::new(SessionService::new(
                    Arc::clone(&authorities),
                    Arc::new(VolatileRefreshTokenRegistry::new(Arc::clone(&store))),
                    Arc::clone(&authenticator),
                ))
            } else {
                Arc::new(SessionService::new(
                    Arc::clone(&authorities),
                    Arc::new(auth_service::outbound::stores::UntrackedRefreshTokens),
                    Arc::clone(&authenticator),
                ))
            };

        let recovery_service = Arc::new(RecoveryService::new(
            Arc::clone(&authorities),
            store,
            Arc::clone(&notifier),
            Arc::clone(&authenticator),
        ));

        let authority_service = Arc::new(AuthorityService::new(
            Arc::clone(&authorities),
            Arc::clone(&authenticator),
        ));

        let router = create_router(AppState {
            registration_service,
            session_service,
            recovery_service,
            authority_service,
            gate,
        });

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            hospital_service,
            authorities,
            ledger,
            notifier,
            authenticator,
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register the "Acme Clinic" hospital and return the response
    pub async fn register_acme(&self) -> reqwest::Response {
        self.post("/api/auth/register")
            .json(&acme_registration())
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the response body
    pub async fn login(&self, credential: &str, password: &str) -> Value {
        let response = self
            .post("/api/auth/login")
            .json(&json!({ "credential": credential, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        response.json().await.expect("Failed to parse response")
    }

    /// Access token of the Acme administrator, registering first
    pub async fn acme_admin_token(&self) -> String {
        assert_eq!(self.register_acme().await.status(), reqwest::StatusCode::CREATED);
        let body = self.login("ayse@acme.com", "Secret123").await;
        body["data"]["access_token"].as_str().unwrap().to_string()
    }
}

pub fn acme_registration() -> Value {
    json!({
        "hospital_name": "Acme Clinic",
        "tax_number": "1111111111",
        "hospital_email": "info@acme.com",
        "hospital_phone": "05551112233",
        "address": "Main St 1",
        "city_id": 34,
        "district_id": 1,
        "authority_fname": "Ayse",
        "authority_lname": "Kaya",
        "authority_tc": "12345678901",
        "authority_email": "ayse@acme.com",
        "authority_phone": "5552223344",
        "password": "Secret123"
    })
}

/// Hospital service stand-in counting `POST /api/hospital` calls
pub struct StubHospitalService {
    pub address: String,
    state: StubState,
}

#[derive(Clone)]
struct StubState {
    calls: Arc<AtomicUsize>,
    status: Arc<AtomicU16>,
    keys: Arc<Mutex<Vec<String>>>,
}

impl StubHospitalService {
    async fn spawn() -> Self {
        let state = StubState {
            calls: Arc::new(AtomicUsize::new(0)),
            status: Arc::new(AtomicU16::new(201)),
            keys: Arc::new(Mutex::new(Vec::new())),
        };

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let address = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());

        let router = Router::new()
            .route("/api/hospital", post(create_hospital))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Stub server error");
        });

        Self { address, state }
    }

    pub fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    /// Status returned by subsequent calls
    pub fn respond_with(&self, status: u16) {
        self.state.status.store(status, Ordering::SeqCst);
    }

    pub fn idempotency_keys(&self) -> Vec<String> {
        self.state.keys.lock().unwrap().clone()
    }
}

async fn create_hospital(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let id = state.calls.fetch_add(1, Ordering::SeqCst) + 1;
    if let Some(key) = headers.get("Idempotency-Key").and_then(|v| v.to_str().ok()) {
        state.keys.lock().unwrap().push(key.to_string());
    }

    let status = StatusCode::from_u16(state.status.load(Ordering::SeqCst)).unwrap();
    if status != StatusCode::CREATED {
        return (status, Json(json!({ "error": "rejected" })));
    }

    (
        StatusCode::CREATED,
        Json(json!({
            "id": 41 + id,
            "name": body["name"],
            "tax_number": body["tax_number"],
            "email": body["email"],
            "phone": body["phone"],
            "address": body["address"],
            "city_id": body["city_id"],
            "city_name": "Istanbul",
            "district_id": body["district_id"],
            "district_name": "Kadikoy"
        })),
    )
}

/// Identity repository honoring the same uniqueness rules as the database
#[derive(Default)]
pub struct InMemoryAuthorityRepository {
    rows: Mutex<Vec<(Authority, bool)>>,
    creates: AtomicUsize,
}

impl InMemoryAuthorityRepository {
    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn live(&self) -> Vec<Authority> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, deleted)| !deleted)
            .map(|(authority, _)| authority.clone())
            .collect()
    }

    fn collides(authority: &Authority, tc: &NationalId, email: &EmailAddress, phone: &PhoneNumber) -> bool {
        authority.national_id == *tc || authority.email == *email || authority.phone == *phone
    }

    fn find_live(&self, predicate: impl Fn(&Authority) -> bool) -> Option<Authority> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|(authority, deleted)| !deleted && predicate(authority))
            .map(|(authority, _)| authority.clone())
    }
}

#[async_trait]
impl AuthorityRepository for InMemoryAuthorityRepository {
    async fn exists(&self, tc: &NationalId, email: &EmailAddress, phone: &PhoneNumber) -> Result<bool, AuthorityError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|(authority, _)| Self::collides(authority, tc, email, phone)))
    }

    async fn exists_other(
        &self,
        id: &AuthorityId,
        tc: &NationalId,
        email: &EmailAddress,
        phone: &PhoneNumber,
    ) -> Result<bool, AuthorityError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|(authority, _)| authority.id != *id && Self::collides(authority, tc, email, phone)))
    }

    async fn create(&self, authority: Authority) -> Result<Authority, AuthorityError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|(existing, _)| {
            Self::collides(existing, &authority.national_id, &authority.email, &authority.phone)
        }) {
            return Err(AuthorityError::AlreadyExists);
        }
        rows.push((authority.clone(), false));
        Ok(authority)
    }

    async fn find_by_id(&self, id: &AuthorityId) -> Result<Option<Authority>, AuthorityError> {
        Ok(self.find_live(|authority| authority.id == *id))
    }

    async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<Authority>, AuthorityError> {
        Ok(self.find_live(|authority| authority.phone == *phone))
    }

    async fn find_by_email_or_phone(&self, credential: &str) -> Result<Option<Authority>, AuthorityError> {
        Ok(self.find_live(|authority| {
            authority.email.as_str() == credential || authority.phone.as_str() == credential
        }))
    }

    async fn list_by_hospital(&self, hospital_id: HospitalId) -> Result<Vec<Authority>, AuthorityError> {
        Ok(self
            .live()
            .into_iter()
            .filter(|authority| authority.hospital_id == hospital_id)
            .collect())
    }

    async fn update(&self, authority: Authority) -> Result<Authority, AuthorityError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|(existing, deleted)| !deleted && existing.id == authority.id)
            .ok_or_else(|| AuthorityError::NotFound(authority.id.to_string()))?;
        row.0 = authority.clone();
        Ok(authority)
    }

    async fn update_password(&self, id: &AuthorityId, password_hash: &str) -> Result<(), AuthorityError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|(existing, deleted)| !deleted && existing.id == *id)
            .ok_or_else(|| AuthorityError::NotFound(id.to_string()))?;
        row.0.password_hash = password_hash.to_string();
        row.0.updated_at = Utc::now();
        Ok(())
    }

    async fn soft_delete(&self, id: &AuthorityId) -> Result<(), AuthorityError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|(existing, deleted)| !deleted && existing.id == *id)
            .ok_or_else(|| AuthorityError::NotFound(id.to_string()))?;
        row.1 = true;
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryProvisioningLedger {
    requests: Mutex<HashMap<IdempotencyKey, ProvisioningRequest>>,
}

impl InMemoryProvisioningLedger {
    pub fn all(&self) -> Vec<ProvisioningRequest> {
        self.requests.lock().unwrap().values().cloned().collect()
    }

    fn update(&self, key: &IdempotencyKey, apply: impl FnOnce(&mut ProvisioningRequest)) -> Result<(), LedgerError> {
        let mut requests = self.requests.lock().unwrap();
        let request = requests
            .get_mut(key)
            .ok_or_else(|| LedgerError::DatabaseError(format!("provisioning request {key} does not exist")))?;
        apply(request);
        request.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl ProvisioningLedger for InMemoryProvisioningLedger {
    async fn record(&self, request: &ProvisioningRequest) -> Result<(), LedgerError> {
        self.requests.lock().unwrap().insert(request.key, request.clone());
        Ok(())
    }

    async fn find(&self, key: &IdempotencyKey) -> Result<Option<ProvisioningRequest>, LedgerError> {
        Ok(self.requests.lock().unwrap().get(key).cloned())
    }

    async fn mark_tenant_created(&self, key: &IdempotencyKey, hospital_id: HospitalId) -> Result<(), LedgerError> {
        self.update(key, |request| {
            request.status = ProvisioningStatus::TenantCreated;
            request.hospital_id = Some(hospital_id);
        })
    }

    async fn mark_completed(&self, key: &IdempotencyKey, authority_id: AuthorityId) -> Result<(), LedgerError> {
        self.update(key, |request| {
            request.status = ProvisioningStatus::Completed;
            request.authority_id = Some(authority_id);
        })
    }

    async fn mark_failed(&self, key: &IdempotencyKey, reason: &str) -> Result<(), LedgerError> {
        self.update(key, |request| {
            request.status = ProvisioningStatus::Failed;
            request.last_error = Some(reason.to_string());
        })
    }

    async fn mark_orphaned(&self, key: &IdempotencyKey, reason: &str) -> Result<(), LedgerError> {
        self.update(key, |request| {
            request.status = ProvisioningStatus::Orphaned;
            request.last_error = Some(reason.to_string());
        })
    }

    async fn note_error(&self, key: &IdempotencyKey, reason: &str) -> Result<(), LedgerError> {
        self.update(key, |request| request.last_error = Some(reason.to_string()))
    }

    async fn list_stale(&self, before: DateTime<Utc>) -> Result<Vec<ProvisioningRequest>, LedgerError> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .values()
            .filter(|request| !request.status.is_terminal() && request.updated_at < before)
            .cloned()
            .collect())
    }
}

/// Notifier recording every delivered code
#[derive(Default)]
pub struct CapturingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl CapturingNotifier {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_code_for(&self, phone: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == phone)
            .map(|(_, code)| code.clone())
    }
}

#[async_trait]
impl RecoveryNotifier for CapturingNotifier {
    async fn send(&self, phone: &PhoneNumber, code: &RecoveryCode) -> Result<(), NotifierError> {
        self.sent
            .lock()
            .unwrap()
            .push((phone.as_str().to_string(), code.as_str().to_string()));
        Ok(())
    }
}
