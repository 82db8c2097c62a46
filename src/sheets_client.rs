use crate::config::{Config, ReadFallback};
use crate::errors::{AppError, ResultExt};
use crate::models::{Activity, Lead, LeadStatus, QueuedLead};
use crate::sample_data;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

/// Client for the spreadsheet-backed lead store.
///
/// Stateless: reads are `GET <base>?action=...`, writes are a single `POST`
/// to the base URL whose JSON body carries an `action` discriminator. Nothing
/// is cached and nothing is retried.
#[derive(Clone)]
pub struct SheetsClient {
    client: reqwest::Client,
    base_url: String,
    read_fallback: ReadFallback,
}

impl SheetsClient {
    /// Creates a new `SheetsClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The deployed spreadsheet script URL.
    /// * `read_fallback` - What reads do when the store cannot be reached.
    /// * `timeout` - Per-request timeout.
    pub fn new(
        base_url: String,
        read_fallback: ReadFallback,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::Configuration(format!("Failed to create lead store client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url,
            read_fallback,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            config.leads_api_base_url.clone(),
            config.read_fallback,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn read_fallback(&self) -> ReadFallback {
        self.read_fallback
    }

    /// Fetches every lead, in store order.
    ///
    /// Rows that do not decode are skipped; the rest of the sheet is kept.
    pub async fn fetch_leads(&self) -> Result<Vec<Lead>, AppError> {
        match self.get_action::<Lead>("getLeads").await {
            Ok(leads) => {
                tracing::info!("Fetched {} leads from lead store", leads.len());
                Ok(leads)
            }
            Err(e) => self.fall_back(e, sample_data::sample_leads),
        }
    }

    /// Fetches the recent activity feed for the dashboard.
    pub async fn fetch_activity(&self) -> Result<Vec<Activity>, AppError> {
        match self.get_action::<Activity>("getDashboardActivity").await {
            Ok(activity) => {
                tracing::info!("Fetched {} activity entries", activity.len());
                Ok(activity)
            }
            Err(e) => self.fall_back(e, sample_data::sample_activity),
        }
    }

    /// Records a call outcome against a lead.
    ///
    /// # Returns
    ///
    /// * `bool` - `true` once the store acknowledged the request. This does not
    ///   mean the row was updated; the store gives no such guarantee.
    pub async fn record_call_outcome(
        &self,
        lead_id: &str,
        result: LeadStatus,
        note_text: &str,
        rep_name: &str,
    ) -> bool {
        tracing::info!("Recording call outcome {} for lead {}", result, lead_id);
        self.post_action(json!({
            "action": "updateLead",
            "leadId": lead_id,
            "callResult": result.as_str(),
            "noteText": note_text,
            "repName": rep_name
        }))
        .await
    }

    /// Submits a batch of new leads as one request.
    pub async fn bulk_upload_leads(&self, leads: &[QueuedLead], rep_name: &str) -> bool {
        tracing::info!("Uploading {} queued leads for {}", leads.len(), rep_name);
        self.post_action(json!({
            "action": "uploadLeads",
            "repName": rep_name,
            "leads": leads
        }))
        .await
    }

    /// Reads the rows behind `action`.
    ///
    /// Only a failed request, a non-success status or a body that is not a
    /// JSON array is an error. Rows that fail to decode are logged and dropped.
    async fn get_action<T: DeserializeOwned>(&self, action: &str) -> Result<Vec<T>, AppError> {
        let url = reqwest::Url::parse_with_params(&self.base_url, &[("action", action)])
            .map_err(|e| AppError::Configuration(format!("Invalid lead store URL: {}", e)))?;
        tracing::debug!("GET lead store: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("{} request failed", action))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Transport(format!(
                "{} returned {}: {}",
                action, status, error_text
            )));
        }

        let rows: Vec<serde_json::Value> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", action))?;

        Ok(decode_rows(action, rows))
    }

    /// Sends a write. The body goes out as `text/plain` so browser deployments
    /// of the same script avoid a CORS preflight.
    async fn post_action(&self, body: serde_json::Value) -> bool {
        let action = body
            .get("action")
            .and_then(|a| a.as_str())
            .unwrap_or("unknown")
            .to_string();

        let response = self
            .client
            .post(&self.base_url)
            .header(CONTENT_TYPE, "text/plain;charset=utf-8")
            .body(body.to_string())
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => {
                tracing::info!("✓ Lead store accepted {}", action);
                true
            }
            Ok(response) => {
                tracing::warn!(
                    "Lead store answered {} with {}; outcome unconfirmed",
                    action,
                    response.status()
                );
                false
            }
            Err(e) => {
                tracing::error!("Lead store {} failed: {}", action, e);
                false
            }
        }
    }

    fn fall_back<T>(&self, error: AppError, sample: fn() -> T) -> Result<T, AppError> {
        match self.read_fallback {
            ReadFallback::Sample => {
                tracing::warn!("{}; serving sample data", error);
                Ok(sample())
            }
            ReadFallback::Surface => Err(error),
        }
    }
}

fn decode_rows<T: DeserializeOwned>(action: &str, rows: Vec<serde_json::Value>) -> Vec<T> {
    let total = rows.len();
    let decoded: Vec<T> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let id = row.get("id").map(|id| id.to_string()).unwrap_or_default();
            match serde_json::from_value(row) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!("Skipping {} row {} (id {}): {}", action, index, id, e);
                    None
                }
            }
        })
        .collect();

    if decoded.len() < total {
        tracing::warn!(
            "{}: kept {} of {} rows",
            action,
            decoded.len(),
            total
        );
    }
    decoded
}
