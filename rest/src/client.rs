//! HTTP client implementing the store traits against a PostgREST service.

use crate::config::RestConfig;

use relief_store::{AuditLog, BeneficiaryDirectory, CredentialStore, PackageStore, StoreError};
use relief_types::{
    AidPackage, AuditEntry, AuthCredential, Beneficiary, BeneficiaryId, ContactDetails,
    NationalId, NewBeneficiary, PinHash,
};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

const BENEFICIARIES: &str = "beneficiaries";
const CREDENTIALS: &str = "beneficiary_auth";
const PACKAGES: &str = "packages";
const ACTIVITY_LOG: &str = "activity_log";
const REGISTER_RPC: &str = "register_beneficiary";

/// Client for the portal's backend service.
pub struct RestBackend {
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Body of a credential insert.
#[derive(Serialize)]
struct CredentialRow<'a> {
    beneficiary_id: &'a BeneficiaryId,
    national_id: &'a NationalId,
    password_hash: &'a PinHash,
}

impl RestBackend {
    /// Create a client with the configured timeouts.
    pub fn new(config: &RestConfig) -> Result<Self, StoreError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| StoreError::Backend(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// `{base}/rest/v1/{table}`
    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// `{base}/rest/v1/rpc/{function}`
    fn rpc_url(&self, function: &str) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, function)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http_client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Send a request and turn transport failures and non-2xx statuses into
    /// [`StoreError`]s.
    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(map_status(status, &body))
    }

    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Vec<T>, StoreError> {
        let response = self.send(request).await?;
        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| StoreError::Serialization(format!("failed to parse rows: {e}")))
    }
}

fn map_transport_error(e: reqwest::Error) -> StoreError {
    if e.is_timeout() {
        StoreError::Unavailable(format!("request timed out: {e}"))
    } else if e.is_connect() {
        StoreError::Unavailable(format!("connection failed: {e}"))
    } else {
        StoreError::Backend(e.to_string())
    }
}

fn map_status(status: StatusCode, body: &str) -> StoreError {
    let detail = if body.is_empty() {
        format!("HTTP status {status}")
    } else {
        format!("HTTP status {status}: {body}")
    };
    match status {
        StatusCode::CONFLICT => StoreError::Duplicate(detail),
        StatusCode::NOT_FOUND => StoreError::NotFound(detail),
        StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::BAD_GATEWAY
        | StatusCode::GATEWAY_TIMEOUT => StoreError::Unavailable(detail),
        s if s.is_client_error() => StoreError::Rejected(detail),
        _ => StoreError::Backend(detail),
    }
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

impl BeneficiaryDirectory for RestBackend {
    async fn lookup_by_national_id(
        &self,
        national_id: &NationalId,
    ) -> Result<Option<Beneficiary>, StoreError> {
        tracing::debug!(national_id = %national_id, "looking up beneficiary");
        let request = self
            .request(Method::GET, &self.table_url(BENEFICIARIES))
            .query(&[
                ("national_id", eq(national_id)),
                ("select", "*".to_string()),
                ("limit", "1".to_string()),
            ]);
        let rows: Vec<Beneficiary> = self.fetch_rows(request).await?;
        Ok(rows.into_iter().next())
    }

    async fn create_beneficiary(&self, new: &NewBeneficiary) -> Result<BeneficiaryId, StoreError> {
        tracing::debug!(national_id = %new.national_id, "registering beneficiary");
        let request = self
            .request(Method::POST, &self.rpc_url(REGISTER_RPC))
            .json(new);
        let response = self.send(request).await?;
        response
            .json::<BeneficiaryId>()
            .await
            .map_err(|e| StoreError::Serialization(format!("failed to parse created id: {e}")))
    }

    async fn update_contact(
        &self,
        id: &BeneficiaryId,
        contact: &ContactDetails,
    ) -> Result<(), StoreError> {
        tracing::debug!(beneficiary = %id, "updating contact details");
        let request = self
            .request(Method::PATCH, &self.table_url(BENEFICIARIES))
            .query(&[("id", eq(id))])
            .header("Prefer", "return=representation")
            .json(contact);
        let rows: Vec<serde_json::Value> = self.fetch_rows(request).await?;
        if rows.is_empty() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

impl CredentialStore for RestBackend {
    async fn get_credential(
        &self,
        national_id: &NationalId,
    ) -> Result<Option<AuthCredential>, StoreError> {
        let request = self
            .request(Method::GET, &self.table_url(CREDENTIALS))
            .query(&[
                ("national_id", eq(national_id)),
                ("select", "beneficiary_id,national_id,password_hash".to_string()),
                ("limit", "1".to_string()),
            ]);
        let rows: Vec<AuthCredential> = self.fetch_rows(request).await?;
        Ok(rows.into_iter().next())
    }

    async fn create_credential(
        &self,
        beneficiary_id: &BeneficiaryId,
        national_id: &NationalId,
        pin_hash: &PinHash,
    ) -> Result<(), StoreError> {
        tracing::debug!(beneficiary = %beneficiary_id, "creating credential");
        let request = self
            .request(Method::POST, &self.table_url(CREDENTIALS))
            .header("Prefer", "return=minimal")
            .json(&CredentialRow {
                beneficiary_id,
                national_id,
                password_hash: pin_hash,
            });
        self.send(request).await?;
        Ok(())
    }

    async fn revoke_credential(&self, beneficiary_id: &BeneficiaryId) -> Result<(), StoreError> {
        tracing::debug!(beneficiary = %beneficiary_id, "revoking credential");
        let request = self
            .request(Method::DELETE, &self.table_url(CREDENTIALS))
            .query(&[("beneficiary_id", eq(beneficiary_id))]);
        self.send(request).await?;
        Ok(())
    }
}

impl PackageStore for RestBackend {
    async fn list_packages(
        &self,
        beneficiary_id: &BeneficiaryId,
    ) -> Result<Vec<AidPackage>, StoreError> {
        let request = self
            .request(Method::GET, &self.table_url(PACKAGES))
            .query(&[
                ("beneficiary_id", eq(beneficiary_id)),
                ("select", "*".to_string()),
                ("order", "created_at.desc".to_string()),
            ]);
        self.fetch_rows(request).await
    }
}

impl AuditLog for RestBackend {
    async fn record(&self, entry: &AuditEntry) -> Result<(), StoreError> {
        let request = self
            .request(Method::POST, &self.table_url(ACTIVITY_LOG))
            .header("Prefer", "return=minimal")
            .json(entry);
        self.send(request).await?;
        Ok(())
    }
}
