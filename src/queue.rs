//! Upload form and the queue of validated leads awaiting bulk submission.

use crate::errors::AppError;
use crate::models::{EmploymentType, QueuedLead, RenterOwner};
use crate::sheets_client::SheetsClient;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Shown whenever the form is rejected. It does not name the failing field.
pub const VALIDATION_MESSAGE: &str = "Please complete all required fields before saving.";

pub const MIN_PHONE_LEN: usize = 8;

/// Mobile prefix the phone field starts with.
pub const PHONE_PREFILL: &str = "04";

/// The in-progress upload form. Selects start unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadForm {
    pub date: NaiveDate,
    pub name: String,
    pub house_number: String,
    pub street_name: String,
    pub suburb: String,
    pub postcode: String,
    pub phone: String,
    pub renter_owner: Option<RenterOwner>,
    pub superannuation: String,
    pub employment_type: Option<EmploymentType>,
    pub rep_name: String,
}

impl Default for LeadForm {
    fn default() -> Self {
        Self {
            date: Local::now().date_naive(),
            name: String::new(),
            house_number: String::new(),
            street_name: String::new(),
            suburb: String::new(),
            postcode: String::new(),
            phone: PHONE_PREFILL.to_string(),
            renter_owner: None,
            superannuation: String::new(),
            employment_type: None,
            rep_name: String::new(),
        }
    }
}

impl LeadForm {
    /// Clears the form back to defaults, keeping only the selected rep.
    pub fn reset_keeping_rep(&mut self) {
        let rep_name = std::mem::take(&mut self.rep_name);
        *self = Self {
            rep_name,
            ..Self::default()
        };
    }
}

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

impl TryFrom<&LeadForm> for QueuedLead {
    type Error = AppError;

    fn try_from(form: &LeadForm) -> Result<Self, Self::Error> {
        let rejected = || AppError::Validation(VALIDATION_MESSAGE.to_string());

        if !filled(&form.name) || !filled(&form.suburb) || !filled(&form.rep_name) {
            return Err(rejected());
        }
        let renter_owner = form.renter_owner.ok_or_else(rejected)?;
        if !filled(&form.superannuation) {
            return Err(rejected());
        }
        let employment_type = form.employment_type.ok_or_else(rejected)?;
        if form.phone.chars().count() < MIN_PHONE_LEN {
            return Err(rejected());
        }
        if !filled(&form.house_number) || !filled(&form.street_name) {
            return Err(rejected());
        }

        Ok(QueuedLead {
            date: form.date,
            name: form.name.clone(),
            house_number: form.house_number.clone(),
            street_name: form.street_name.clone(),
            suburb: form.suburb.clone(),
            postcode: form.postcode.clone(),
            phone: form.phone.clone(),
            renter_owner,
            superannuation: form.superannuation.clone(),
            employment_type,
            rep_name: form.rep_name.clone(),
        })
    }
}

/// Fails closed: true only when every required field is present.
pub fn validate(form: &LeadForm) -> bool {
    QueuedLead::try_from(form).is_ok()
}

/// Pending batch of new leads.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UploadQueue {
    entries: Vec<QueuedLead>,
    /// Length of the batch currently being sent, if any.
    #[serde(skip)]
    in_flight: Option<usize>,
}

impl UploadQueue {
    pub fn entries(&self) -> &[QueuedLead] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Validates the form, appends a copy of it and resets the form.
    ///
    /// On rejection neither the queue nor the form changes.
    pub fn enqueue(&mut self, form: &mut LeadForm) -> Result<&QueuedLead, AppError> {
        let queued = QueuedLead::try_from(&*form)?;
        tracing::debug!("Queued lead '{}' ({})", queued.name, queued.suburb);
        self.entries.push(queued);
        form.reset_keeping_rep();
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Removes the entry at `index`. Out of range is a no-op.
    ///
    /// Ignored while a batch is being sent, since the batch is tracked by position.
    pub fn dequeue(&mut self, index: usize) -> Option<QueuedLead> {
        if self.in_flight.is_some() {
            tracing::debug!("Ignoring dequeue of index {} during upload", index);
            return None;
        }
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            tracing::debug!("Ignoring dequeue of index {} (queue length {})", index, self.len());
            None
        }
    }

    /// Marks the current entries as in flight and returns a copy to send.
    ///
    /// Entries enqueued while the batch is out are not part of it.
    pub fn begin_submit(&mut self) -> Result<Vec<QueuedLead>, AppError> {
        if self.in_flight.is_some() {
            return Err(AppError::Conflict(
                "An upload is already in progress".to_string(),
            ));
        }
        if self.entries.is_empty() {
            return Err(AppError::BadRequest("No queued leads to upload".to_string()));
        }
        self.in_flight = Some(self.entries.len());
        Ok(self.entries.clone())
    }

    /// Settles the batch started by `begin_submit`.
    ///
    /// An acknowledged batch is removed from the front of the queue; an
    /// unconfirmed one stays for a manual retry.
    pub fn finish_submit(&mut self, submitted: bool) {
        let Some(sent) = self.in_flight.take() else {
            return;
        };
        if submitted {
            tracing::info!("Uploaded {} leads; clearing them from the queue", sent);
            self.entries.drain(..sent.min(self.entries.len()));
        } else {
            tracing::warn!(
                "Upload of {} leads unconfirmed; keeping queue for retry",
                sent
            );
        }
    }

    /// Sends the whole queue as one upload.
    ///
    /// Clears the queue when the store acknowledges it; leaves it untouched for
    /// a manual retry otherwise. An empty queue is never sent.
    pub async fn submit_batch(&mut self, store: &SheetsClient, rep_name: &str) -> bool {
        let batch = match self.begin_submit() {
            Ok(batch) => batch,
            Err(e) => {
                tracing::debug!("Skipping upload: {}", e);
                return false;
            }
        };

        let submitted = store.bulk_upload_leads(&batch, rep_name).await;
        self.finish_submit(submitted);
        submitted
    }
}
