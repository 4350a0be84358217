use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::backend::{BackendError, BookingBackend};
use crate::models::{
    AvailabilityDay, AvailabilitySlot, BookingConfirmation, BookingRequest, BusinessProfile,
    EmployeeEntry, ServiceCatalogEntry,
};
use crate::validation::format_date;

/// [`BookingBackend`] over the backend's public REST API.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, slug: &str, path: &str) -> String {
        format!("{}/api/v1/book/{slug}{path}", self.base_url)
    }
}

#[async_trait]
impl BookingBackend for HttpBackend {
    async fn business_profile(&self, slug: &str) -> Result<BusinessProfile, BackendError> {
        let resp = self.client.get(self.url(slug, "")).send().await?;
        decode(resp).await
    }

    async fn list_services(&self, slug: &str) -> Result<Vec<ServiceCatalogEntry>, BackendError> {
        let resp = self.client.get(self.url(slug, "/services")).send().await?;
        decode(resp).await
    }

    async fn list_employees(
        &self,
        slug: &str,
        service_id: i64,
    ) -> Result<Vec<EmployeeEntry>, BackendError> {
        let resp = self
            .client
            .get(self.url(slug, "/employees"))
            .query(&[("service_id", service_id)])
            .send()
            .await?;
        decode(resp).await
    }

    async fn availability(
        &self,
        slug: &str,
        employee_id: i64,
        service_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>, BackendError> {
        let resp = self
            .client
            .get(self.url(slug, "/availability"))
            .query(&[
                ("employee_id", employee_id.to_string()),
                ("service_id", service_id.to_string()),
                ("date", format_date(&date)),
            ])
            .send()
            .await?;
        let day: AvailabilityDay = decode(resp).await?;
        Ok(day.into_sorted_slots())
    }

    async fn create_booking(
        &self,
        slug: &str,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, BackendError> {
        let resp = self
            .client
            .post(self.url(slug, "/book"))
            .json(request)
            .send()
            .await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, BackendError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    let body: Option<serde_json::Value> = resp.json().await.ok();
    let message = body
        .as_ref()
        .and_then(detail_message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

    Err(classify(status, message))
}

fn classify(status: StatusCode, message: String) -> BackendError {
    match status {
        StatusCode::NOT_FOUND => BackendError::NotFound(message),
        StatusCode::CONFLICT => BackendError::Conflict(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            BackendError::Validation(message)
        }
        _ => BackendError::Status {
            status: status.as_u16(),
            message,
        },
    }
}

/// Error detail is either a string or a list of `{"msg": ...}` objects.
fn detail_message(body: &serde_json::Value) -> Option<String> {
    match &body["detail"] {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let msgs: Vec<&str> = items.iter().filter_map(|i| i["msg"].as_str()).collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
        _ => None,
    }
}
