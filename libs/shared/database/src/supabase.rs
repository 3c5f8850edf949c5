use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use shared_config::AppConfig;
use shared_models::{Appointment, Doctor, DoctorId, NewAppointment, NewDoctor};

use crate::store::SchedulingStore;

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

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut headers = self.get_headers()?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url)
            .headers(headers);

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

// `Z` suffix keeps the value free of `+`, which would need escaping in a query string.
fn query_timestamp(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn representation_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static("return=representation"));
    headers
}

/// `SchedulingStore` over the PostgREST tables `doctors` and `appointments`.
///
/// PostgREST offers no transaction spanning the count and the insert, so
/// `seed_doctors` is check-then-insert here.
pub struct SupabaseStore {
    supabase: SupabaseClient,
}

impl SupabaseStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }
}

#[async_trait]
impl SchedulingStore for SupabaseStore {
    async fn count_doctors(&self) -> Result<usize> {
        let rows: Vec<Value> = self.supabase.request(
            Method::GET,
            "/rest/v1/doctors?select=id",
            None,
        ).await?;

        Ok(rows.len())
    }

    async fn seed_doctors(&self, doctors: Vec<NewDoctor>) -> Result<Option<Vec<Doctor>>> {
        if self.count_doctors().await? > 0 {
            return Ok(None);
        }

        let seeded: Vec<Doctor> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/doctors",
            Some(json!(doctors)),
            Some(representation_headers()),
        ).await?;

        if seeded.is_empty() {
            warn!("Doctor seed returned no rows");
        }

        Ok(Some(seeded))
    }

    async fn get_doctor(&self, doctor_id: DoctorId) -> Result<Option<Doctor>> {
        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let mut rows: Vec<Doctor> = self.supabase.request(Method::GET, &path, None).await?;

        Ok(if rows.is_empty() { None } else { Some(rows.remove(0)) })
    }

    async fn list_doctors(&self) -> Result<Vec<Doctor>> {
        self.supabase.request(Method::GET, "/rest/v1/doctors?order=id.asc", None).await
    }

    async fn insert_appointment(&self, appointment: NewAppointment) -> Result<Appointment> {
        let mut rows: Vec<Appointment> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/appointments",
            Some(json!(appointment)),
            Some(representation_headers()),
        ).await?;

        if rows.is_empty() {
            return Err(anyhow!("Failed to create appointment"));
        }

        Ok(rows.remove(0))
    }

    async fn find_overlapping(
        &self,
        doctor_id: DoctorId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>> {
        let path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&start_time=lt.{}&end_time=gt.{}&order=id.asc",
            doctor_id,
            query_timestamp(&end),
            query_timestamp(&start),
        );

        self.supabase.request(Method::GET, &path, None).await
    }

    async fn find_within(
        &self,
        doctor_id: DoctorId,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>> {
        let path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&start_time=gte.{}&end_time=lte.{}&order=id.asc",
            doctor_id,
            query_timestamp(&window_start),
            query_timestamp(&window_end),
        );

        self.supabase.request(Method::GET, &path, None).await
    }
}
