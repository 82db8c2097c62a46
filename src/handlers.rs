use crate::config::Config;
use crate::display::format_phone_au;
use crate::errors::{AppError, ResultExt};
use crate::filter::{LeadFilter, LeadGroup, TabCounts};
use crate::models::{
    Activity, CallOutcome, EmploymentType, Lead, LeadStatus, QueuedLead, RenterOwner, ViewType,
    SUPERANNUATION_BANDS,
};
use crate::queue::{LeadForm, UploadQueue};
use crate::session::Session;
use crate::sheets_client::SheetsClient;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state injected into handlers.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Client for the spreadsheet-backed lead store.
    pub store: SheetsClient,
    /// The single controller-owned session.
    pub session: Mutex<Session>,
}

impl AppState {
    pub fn new(config: Config, store: SheetsClient) -> Self {
        Self {
            config,
            store,
            session: Mutex::new(Session::new()),
        }
    }
}

// ============ Response shapes ============

/// One row of the lead list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadCard {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub status: LeadStatus,
    pub call_logged: bool,
}

impl From<&Lead> for LeadCard {
    fn from(lead: &Lead) -> Self {
        Self {
            id: lead.id.clone(),
            name: lead.name.clone(),
            address: lead.address.clone(),
            phone: format_phone_au(&lead.phone),
            status: lead.status,
            call_logged: lead.call_logged,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LeadGroupView {
    pub date: String,
    pub leads: Vec<LeadCard>,
}

impl From<LeadGroup<'_>> for LeadGroupView {
    fn from(group: LeadGroup<'_>) -> Self {
        Self {
            date: group.key,
            leads: group.leads.into_iter().map(LeadCard::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LeadListResponse {
    pub filter: LeadFilter,
    pub counts: TabCounts,
    pub groups: Vec<LeadGroupView>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub counts: TabCounts,
    pub activities: Vec<Activity>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOptions {
    pub reps: Vec<String>,
    pub renter_owner: Vec<&'static str>,
    pub superannuation: Vec<&'static str>,
    pub employment_type: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct UploadStateResponse {
    pub form: LeadForm,
    pub queue: UploadQueue,
    pub options: UploadOptions,
}

#[derive(Debug, Deserialize)]
pub struct ViewRequest {
    pub view: ViewType,
}

fn lead_list(session: &Session) -> LeadListResponse {
    LeadListResponse {
        filter: session.filter.clone(),
        counts: session.tab_counts(),
        groups: session.lead_view().into_iter().map(LeadGroupView::from).collect(),
    }
}

fn upload_state(session: &Session, config: &Config) -> UploadStateResponse {
    UploadStateResponse {
        form: session.form.clone(),
        queue: session.queue.clone(),
        options: UploadOptions {
            reps: config.rep_roster.clone(),
            renter_owner: RenterOwner::ALL.iter().map(|r| r.as_str()).collect(),
            superannuation: SUPERANNUATION_BANDS.to_vec(),
            employment_type: EmploymentType::ALL.iter().map(|e| e.as_str()).collect(),
        },
    }
}

/// Loads leads and activity into the session.
///
/// The session lock is released while the store is being read; a load that
/// finishes after a newer one started is dropped.
///
/// # Returns
///
/// * `Result<bool, AppError>` - Whether this load's result was applied.
pub async fn refresh_session(state: &AppState) -> Result<bool, AppError> {
    let ticket = state.session.lock().await.begin_load();

    let (leads, activities) = tokio::join!(state.store.fetch_leads(), state.store.fetch_activity());
    let leads = leads.context("Loading leads")?;
    let activities = activities.context("Loading activity")?;

    let applied = state
        .session
        .lock()
        .await
        .finish_load(ticket, leads, activities);
    Ok(applied)
}

// ============ Handlers ============

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-live-leads",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /api/v1/sync
///
/// Re-reads leads and activity from the lead store.
pub async fn sync(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    tracing::info!("POST /sync");
    let applied = refresh_session(&state).await?;
    let session = state.session.lock().await;
    Ok(Json(json!({
        "applied": applied,
        "leads": session.leads().len(),
        "activities": session.activities().len(),
    })))
}

/// GET /api/v1/view
pub async fn get_view(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let session = state.session.lock().await;
    Json(json!({ "view": session.view, "loaded": session.is_loaded() }))
}

/// PUT /api/v1/view
pub async fn set_view(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ViewRequest>,
) -> Json<serde_json::Value> {
    tracing::debug!("PUT /view - {:?}", request.view);
    let mut session = state.session.lock().await;
    session.view = request.view;
    Json(json!({ "view": session.view }))
}

/// GET /api/v1/dashboard
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardResponse> {
    let session = state.session.lock().await;
    Json(DashboardResponse {
        counts: session.tab_counts(),
        activities: session.activities().to_vec(),
    })
}

/// GET /api/v1/leads
///
/// The grouped lead list under the session's current filter.
pub async fn list_leads(State(state): State<Arc<AppState>>) -> Json<LeadListResponse> {
    let session = state.session.lock().await;
    Json(lead_list(&session))
}

/// PUT /api/v1/leads/filter
pub async fn set_filter(
    State(state): State<Arc<AppState>>,
    Json(filter): Json<LeadFilter>,
) -> Json<LeadListResponse> {
    tracing::debug!("PUT /leads/filter - {:?}", filter);
    let mut session = state.session.lock().await;
    session.filter = filter;
    Json(lead_list(&session))
}

/// GET /api/v1/leads/:id
pub async fn get_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Lead>, AppError> {
    let session = state.session.lock().await;
    Ok(Json(session.lead(&id)?.clone()))
}

/// POST /api/v1/leads/:id/open
pub async fn open_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Lead>, AppError> {
    tracing::info!("POST /leads/{}/open", id);
    let mut session = state.session.lock().await;
    Ok(Json(session.open_detail(&id)?.clone()))
}

/// POST /api/v1/leads/close
pub async fn close_lead(State(state): State<Arc<AppState>>) -> StatusCode {
    state.session.lock().await.close_detail();
    StatusCode::NO_CONTENT
}

/// POST /api/v1/leads/:id/call-outcome
///
/// Logs a call against the lead open in the detail view. The detail view is
/// closed afterwards whether or not the store acknowledged the write.
///
/// The session lock is not held during the store request. The write runs on
/// its own task so it still settles if the client goes away.
pub async fn record_call_outcome(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(outcome): Json<CallOutcome>,
) -> Result<Json<serde_json::Value>, AppError> {
    tracing::info!("POST /leads/{}/call-outcome - {}", id, outcome.result);

    if outcome.rep_name.trim().is_empty() {
        return Err(AppError::BadRequest("repName is required".to_string()));
    }

    state.session.lock().await.begin_call_outcome(&id)?;

    let task_state = Arc::clone(&state);
    let success = tokio::spawn(async move {
        let success = task_state
            .store
            .record_call_outcome(&id, outcome.result, &outcome.note, &outcome.rep_name)
            .await;

        task_state.session.lock().await.finish_call_outcome(
            &id,
            &outcome,
            success,
            Local::now().date_naive(),
        );
        success
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Call outcome task failed: {}", e)))?;

    Ok(Json(json!({ "success": success })))
}

/// GET /api/v1/upload
pub async fn get_upload(State(state): State<Arc<AppState>>) -> Json<UploadStateResponse> {
    let session = state.session.lock().await;
    Json(upload_state(&session, &state.config))
}

/// PUT /api/v1/upload/form
pub async fn update_form(
    State(state): State<Arc<AppState>>,
    Json(form): Json<LeadForm>,
) -> Json<UploadStateResponse> {
    let mut session = state.session.lock().await;
    session.form = form;
    Json(upload_state(&session, &state.config))
}

/// POST /api/v1/upload/queue
///
/// Moves the current form into the queue.
pub async fn enqueue_lead(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<QueuedLead>), AppError> {
    let mut guard = state.session.lock().await;
    let session = &mut *guard;
    let queued = session.queue.enqueue(&mut session.form)?.clone();
    tracing::info!("Queued lead '{}' ({} pending)", queued.name, session.queue.len());
    Ok((StatusCode::CREATED, Json(queued)))
}

/// DELETE /api/v1/upload/queue/:index
pub async fn dequeue_lead(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Json<serde_json::Value> {
    let mut session = state.session.lock().await;
    let removed = session.queue.dequeue(index);
    Json(json!({
        "removed": removed,
        "queued": session.queue.len(),
    }))
}

/// POST /api/v1/upload/submit
///
/// Sends the queue as one batch. On success the session is re-synced in the
/// background. Other routes stay available while the batch is out.
pub async fn submit_upload(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (batch, rep_name) = {
        let mut session = state.session.lock().await;
        let rep_name = session.upload_rep_name();
        (session.queue.begin_submit()?, rep_name)
    };
    let batch_size = batch.len();
    tracing::info!("POST /upload/submit - {} leads for {}", batch_size, rep_name);

    let task_state = Arc::clone(&state);
    let (success, remaining) = tokio::spawn(async move {
        let success = task_state.store.bulk_upload_leads(&batch, &rep_name).await;

        let mut session = task_state.session.lock().await;
        session.queue.finish_submit(success);
        (success, session.queue.len())
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Upload task failed: {}", e)))?;

    if success {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = refresh_session(&state).await {
                tracing::error!("Resync after upload failed: {}", e);
            }
        });
    }

    Ok(Json(json!({
        "success": success,
        "uploaded": if success { batch_size } else { 0 },
        "queued": remaining,
    })))
}
