use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ============ Lead Store Models ============

/// Pipeline status of a lead. Closed set: anything else is rejected on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum LeadStatus {
    Live,
    Revisit,
    Booked,
    Sold,
    #[serde(rename = "DQ")]
    Dq,
    /// Permanently closed out; hidden from every tab.
    Terminal,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 6] = [
        LeadStatus::Live,
        LeadStatus::Revisit,
        LeadStatus::Booked,
        LeadStatus::Sold,
        LeadStatus::Dq,
        LeadStatus::Terminal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Live => "Live",
            LeadStatus::Revisit => "Revisit",
            LeadStatus::Booked => "Booked",
            LeadStatus::Sold => "Sold",
            LeadStatus::Dq => "DQ",
            LeadStatus::Terminal => "Terminal",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = String;

    /// Spreadsheet rows carry both `Live` and `LIVE` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        LeadStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown lead status '{}'", s))
    }
}

impl TryFrom<String> for LeadStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum RenterOwner {
    Renter,
    Owner,
}

impl RenterOwner {
    pub const ALL: [RenterOwner; 2] = [RenterOwner::Owner, RenterOwner::Renter];

    pub fn as_str(&self) -> &'static str {
        match self {
            RenterOwner::Renter => "Renter",
            RenterOwner::Owner => "Owner",
        }
    }
}

impl FromStr for RenterOwner {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "renter" => Ok(RenterOwner::Renter),
            "owner" => Ok(RenterOwner::Owner),
            _ => Err(format!("unknown renter/owner value '{}'", s)),
        }
    }
}

impl TryFrom<String> for RenterOwner {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum EmploymentType {
    #[serde(rename = "Full-Time")]
    FullTime,
    #[serde(rename = "Part-Time")]
    PartTime,
}

impl EmploymentType {
    pub const ALL: [EmploymentType; 2] = [EmploymentType::FullTime, EmploymentType::PartTime];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "Full-Time",
            EmploymentType::PartTime => "Part-Time",
        }
    }
}

impl FromStr for EmploymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(' ', "-").as_str() {
            "full-time" => Ok(EmploymentType::FullTime),
            "part-time" => Ok(EmploymentType::PartTime),
            _ => Err(format!("unknown employment type '{}'", s)),
        }
    }
}

impl TryFrom<String> for EmploymentType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Superannuation bands offered by the upload form.
pub const SUPERANNUATION_BANDS: [&str; 4] = ["$0–75k", "$75–150k", "$150k+", "Other"];

/// A prospective customer record as served by the spreadsheet store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    #[serde(deserialize_with = "cell_text")]
    pub id: String,
    #[serde(default, deserialize_with = "cell_text")]
    pub name: String,
    #[serde(default, deserialize_with = "cell_text")]
    pub address: String,
    #[serde(default, deserialize_with = "cell_text")]
    pub phone: String,
    pub status: LeadStatus,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub renter_owner: Option<RenterOwner>,
    #[serde(default, deserialize_with = "cell_text")]
    pub superannuation: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub employment_type: Option<EmploymentType>,
    #[serde(default, deserialize_with = "cell_text")]
    pub generated_by: String,
    #[serde(default, deserialize_with = "cell_text")]
    pub last_contacted_by: String,
    /// Raw cell value; may be a plain date, an ISO timestamp, or blank.
    #[serde(default, deserialize_with = "cell_text")]
    pub last_contact_date: String,
    /// Oldest first. Only ever appended to.
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub call_logged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suburb: Option<String>,
}

impl Lead {
    /// Applies a confirmed call outcome to the local copy of the lead.
    pub fn record_call(&mut self, outcome: &CallOutcome, contacted_on: NaiveDate) {
        let note = outcome.note.trim();
        if !note.is_empty() {
            self.notes.push(note.to_string());
        }
        self.status = outcome.result;
        self.last_contacted_by = outcome.rep_name.clone();
        self.last_contact_date = contacted_on.format("%Y-%m-%d").to_string();
        self.call_logged = true;
    }
}

/// A past action taken on a lead. Read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(default, deserialize_with = "cell_text")]
    pub id: String,
    #[serde(default, deserialize_with = "cell_text")]
    pub rep_name: String,
    #[serde(default, deserialize_with = "cell_text")]
    pub lead_name: String,
    #[serde(default, deserialize_with = "cell_text")]
    pub action: String,
    #[serde(default, deserialize_with = "cell_text")]
    pub timestamp: String,
}

/// A validated new lead waiting in the upload queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedLead {
    pub date: NaiveDate,
    pub name: String,
    pub house_number: String,
    pub street_name: String,
    pub suburb: String,
    pub postcode: String,
    pub phone: String,
    pub renter_owner: RenterOwner,
    pub superannuation: String,
    pub employment_type: EmploymentType,
    pub rep_name: String,
}

/// Outcome of a call, logged against one lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallOutcome {
    pub result: LeadStatus,
    #[serde(default)]
    pub note: String,
    pub rep_name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    Dashboard,
    #[default]
    Leads,
    Upload,
}

// ============ Lenient cell decoding ============

/// Spreadsheet cells arrive as strings, numbers, booleans or null.
pub(crate) fn cell_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Null => Ok(String::new()),
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a scalar cell, got {}",
            other
        ))),
    }
}

/// Treats a missing or blank string as `None`, otherwise parses it.
pub(crate) fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse().map(Some).map_err(de::Error::custom),
    }
}
