//! Session state owned by the controller: loaded data, the current view and
//! filter, the upload form and queue, and the lead pinned in the detail view.

use crate::errors::AppError;
use crate::filter::{build_lead_view, tab_counts, LeadFilter, LeadGroup, TabCounts};
use crate::models::{Activity, CallOutcome, Lead, ViewType};
use crate::queue::{LeadForm, UploadQueue};
use chrono::NaiveDate;

/// Issued when a load starts. Only the most recent ticket may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Default)]
pub struct Session {
    leads: Vec<Lead>,
    activities: Vec<Activity>,
    loaded: bool,
    generation: u64,
    selected_lead: Option<String>,
    /// Lead whose call outcome is being written to the store.
    call_in_flight: Option<String>,
    pub view: ViewType,
    pub filter: LeadFilter,
    pub form: LeadForm,
    pub queue: UploadQueue,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Starts a load. Any load started earlier becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    /// Applies a finished load if its ticket is still current.
    ///
    /// Returns false and leaves state untouched for a stale ticket.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        leads: Vec<Lead>,
        activities: Vec<Activity>,
    ) -> bool {
        if ticket.0 != self.generation {
            tracing::warn!(
                "Discarding stale load (ticket {}, current {})",
                ticket.0,
                self.generation
            );
            return false;
        }

        tracing::info!(
            "Session loaded {} leads and {} activities",
            leads.len(),
            activities.len()
        );
        self.leads = leads;
        self.activities = activities;
        self.loaded = true;

        // The pinned lead may have disappeared from the store.
        if let Some(id) = &self.selected_lead {
            if !self.leads.iter().any(|l| &l.id == id) {
                self.selected_lead = None;
            }
        }
        true
    }

    pub fn lead_view(&self) -> Vec<LeadGroup<'_>> {
        build_lead_view(&self.leads, &self.filter)
    }

    pub fn tab_counts(&self) -> TabCounts {
        tab_counts(&self.leads)
    }

    pub fn lead(&self, id: &str) -> Result<&Lead, AppError> {
        self.leads
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Lead {} not found", id)))
    }

    pub fn selected_lead(&self) -> Option<&Lead> {
        let id = self.selected_lead.as_deref()?;
        self.leads.iter().find(|l| l.id == id)
    }

    /// Pins a lead in the detail view. Only one lead may be open at a time.
    pub fn open_detail(&mut self, id: &str) -> Result<&Lead, AppError> {
        match self.selected_lead.as_deref() {
            Some(open) if open != id => {
                return Err(AppError::Conflict(format!(
                    "Lead {} is already open; close it first",
                    open
                )));
            }
            _ => {}
        }
        self.lead(id)?;
        self.selected_lead = Some(id.to_string());
        self.lead(id)
    }

    pub fn close_detail(&mut self) {
        self.selected_lead = None;
    }

    /// Checks that `id` is the lead currently open in the detail view.
    pub fn ensure_open(&self, id: &str) -> Result<(), AppError> {
        match self.selected_lead.as_deref() {
            Some(open) if open == id => Ok(()),
            Some(open) => Err(AppError::Conflict(format!(
                "Lead {} is open, not {}",
                open, id
            ))),
            None => Err(AppError::BadRequest(format!(
                "Open lead {} before logging a call",
                id
            ))),
        }
    }

    /// Claims the pinned lead for a call-outcome write.
    ///
    /// Fails if `id` is not the open lead or a write for it is still pending.
    pub fn begin_call_outcome(&mut self, id: &str) -> Result<(), AppError> {
        self.ensure_open(id)?;
        if let Some(pending) = &self.call_in_flight {
            return Err(AppError::Conflict(format!(
                "A call outcome for lead {} is still being saved",
                pending
            )));
        }
        self.call_in_flight = Some(id.to_string());
        Ok(())
    }

    /// Settles a write claimed with `begin_call_outcome` and closes the detail
    /// view if it still shows that lead.
    pub fn finish_call_outcome(
        &mut self,
        id: &str,
        outcome: &CallOutcome,
        acknowledged: bool,
        contacted_on: NaiveDate,
    ) {
        if self.call_in_flight.as_deref() == Some(id) {
            self.call_in_flight = None;
        }
        if acknowledged {
            if let Err(e) = self.apply_call_outcome(id, outcome, contacted_on) {
                tracing::warn!("Call outcome acknowledged but not applied locally: {}", e);
            }
        }
        if self.selected_lead.as_deref() == Some(id) {
            self.close_detail();
        }
    }

    /// Applies an acknowledged call outcome to the local copy of the lead.
    pub fn apply_call_outcome(
        &mut self,
        id: &str,
        outcome: &CallOutcome,
        contacted_on: NaiveDate,
    ) -> Result<&Lead, AppError> {
        let lead = self
            .leads
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Lead {} not found", id)))?;
        lead.record_call(outcome, contacted_on);
        Ok(lead)
    }

    /// Rep name sent with a bulk upload: the form's selection, else the rep on
    /// the first queued lead.
    pub fn upload_rep_name(&self) -> String {
        if !self.form.rep_name.trim().is_empty() {
            return self.form.rep_name.clone();
        }
        self.queue
            .entries()
            .first()
            .map(|q| q.rep_name.clone())
            .unwrap_or_default()
    }
}
