use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::{Appointment, Doctor, NewAppointment, NewDoctor};

use crate::store::{SchedulingStore, StoreResult};

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            anon_key: config.supabase_anon_key.clone(),
        }
    }

    fn get_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.anon_key)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.anon_key))?,
        );
        // Writes echo the affected rows so callers get ids back.
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut req = self.client.request(method, &url).headers(self.get_headers()?);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                _ => anyhow!("API error ({}): {}", status, error_text),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }
}

/// Table store behind a PostgREST endpoint (`doctors` and `appointments`
/// tables, ids assigned by the database).
pub struct SupabaseStore {
    client: SupabaseClient,
}

impl SupabaseStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: SupabaseClient::new(config),
        }
    }

    async fn rows<T: DeserializeOwned>(&self, method: Method, path: &str, body: Option<Value>) -> StoreResult<Vec<T>> {
        let rows: Vec<T> = self.client.request(method, path, body).await?;
        Ok(rows)
    }

    async fn single<T: DeserializeOwned>(&self, method: Method, path: &str, body: Option<Value>) -> StoreResult<Option<T>> {
        Ok(self.rows(method, path, body).await?.into_iter().next())
    }
}

#[async_trait]
impl SchedulingStore for SupabaseStore {
    async fn list_doctors(&self) -> StoreResult<Vec<Doctor>> {
        self.rows(Method::GET, "/rest/v1/doctors?order=id.asc", None).await
    }

    async fn get_doctor(&self, doctor_id: i64) -> StoreResult<Option<Doctor>> {
        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        self.single(Method::GET, &path, None).await
    }

    async fn insert_doctor(&self, doctor: NewDoctor) -> StoreResult<Doctor> {
        let body = serde_json::to_value(&doctor)?;
        self.single(Method::POST, "/rest/v1/doctors", Some(body))
            .await?
            .ok_or_else(|| anyhow!("Insert into doctors returned no rows").into())
    }

    async fn list_appointments(&self) -> StoreResult<Vec<Appointment>> {
        self.rows(Method::GET, "/rest/v1/appointments?order=id.asc", None).await
    }

    async fn get_appointment(&self, appointment_id: i64) -> StoreResult<Option<Appointment>> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        self.single(Method::GET, &path, None).await
    }

    async fn list_appointments_for_doctor(&self, doctor_id: i64) -> StoreResult<Vec<Appointment>> {
        let path = format!("/rest/v1/appointments?doctor_id=eq.{}&order=date.asc", doctor_id);
        self.rows(Method::GET, &path, None).await
    }

    async fn insert_appointment(&self, appointment: NewAppointment) -> StoreResult<Appointment> {
        let body = serde_json::to_value(&appointment)?;
        self.single(Method::POST, "/rest/v1/appointments", Some(body))
            .await?
            .ok_or_else(|| anyhow!("Insert into appointments returned no rows").into())
    }

    async fn replace_appointment(
        &self,
        appointment_id: i64,
        appointment: NewAppointment,
    ) -> StoreResult<Option<Appointment>> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let body = serde_json::to_value(&appointment)?;
        self.single(Method::PATCH, &path, Some(body)).await
    }

    async fn delete_appointment(&self, appointment_id: i64) -> StoreResult<bool> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let removed: Vec<Value> = self.rows(Method::DELETE, &path, None).await?;
        Ok(!removed.is_empty())
    }

    async fn clear_appointments(&self) -> StoreResult<usize> {
        // PostgREST refuses unfiltered deletes.
        let removed: Vec<Value> = self
            .rows(Method::DELETE, "/rest/v1/appointments?id=gte.0", None)
            .await?;
        Ok(removed.len())
    }
}
