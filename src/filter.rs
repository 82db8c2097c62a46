//! Lead classification and filter engine.
//!
//! Buckets leads into display tabs, applies the list filters and groups the
//! survivors by their last contact date. Everything here is pure.

use crate::display::{format_contact_date, parse_contact_date};
use crate::models::{blank_as_none, Lead, LeadStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Group key for leads that have never been contacted.
pub const NO_DATE_GROUP: &str = "No Date";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadTab {
    #[default]
    Leads,
    Revisit,
}

impl LeadTab {
    /// Maps a status to the tab it is listed under.
    ///
    /// Terminal leads belong to no tab. Live and DQ go to `Leads`; every other
    /// status (Revisit, Booked, Sold) goes to `Revisit`.
    pub fn for_status(status: LeadStatus) -> Option<LeadTab> {
        match status {
            LeadStatus::Terminal => None,
            LeadStatus::Live | LeadStatus::Dq => Some(LeadTab::Leads),
            LeadStatus::Revisit | LeadStatus::Booked | LeadStatus::Sold => Some(LeadTab::Revisit),
        }
    }
}

/// How date groups are ordered in the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupOrder {
    /// Order in which each date first appears in the filtered leads.
    #[default]
    FirstSeen,
    /// Most recent contact date first; undated and unparsable groups last.
    NewestFirst,
}

/// Filter configuration for the lead list.
///
/// Empty text filters and unset dates are no-ops.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadFilter {
    pub active_tab: LeadTab,
    /// Case-insensitive substring of name or address.
    pub search_query: String,
    /// Exact match on the rep who generated the lead.
    pub rep_filter: String,
    /// Case-insensitive substring of address or suburb.
    pub suburb_filter: String,
    #[serde(deserialize_with = "blank_as_none")]
    pub from_date: Option<NaiveDate>,
    #[serde(deserialize_with = "blank_as_none")]
    pub to_date: Option<NaiveDate>,
    pub group_order: GroupOrder,
}

impl LeadFilter {
    pub fn for_tab(tab: LeadTab) -> Self {
        Self {
            active_tab: tab,
            ..Self::default()
        }
    }

    /// Returns true when the lead is listed under the active tab and passes
    /// every active filter.
    pub fn matches(&self, lead: &Lead) -> bool {
        if LeadTab::for_status(lead.status) != Some(self.active_tab) {
            return false;
        }

        let search = self.search_query.trim().to_lowercase();
        if !search.is_empty()
            && !contains_folded(&lead.name, &search)
            && !contains_folded(&lead.address, &search)
        {
            return false;
        }

        if !self.rep_filter.trim().is_empty() && lead.generated_by != self.rep_filter {
            return false;
        }

        let suburb = self.suburb_filter.trim().to_lowercase();
        if !suburb.is_empty()
            && !contains_folded(&lead.address, &suburb)
            && !lead
                .suburb
                .as_deref()
                .is_some_and(|s| contains_folded(s, &suburb))
        {
            return false;
        }

        if self.from_date.is_some() || self.to_date.is_some() {
            // An unparsable date cannot be compared, so it fails any set bound.
            let Some(contacted) = parse_contact_date(&lead.last_contact_date) else {
                return false;
            };
            if self.from_date.is_some_and(|from| contacted < from) {
                return false;
            }
            if self.to_date.is_some_and(|to| contacted > to) {
                return false;
            }
        }

        true
    }
}

fn contains_folded(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Leads sharing one formatted contact date.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadGroup<'a> {
    /// `dd/mm/yyyy`, the raw cell when unparsable, or [`NO_DATE_GROUP`].
    pub key: String,
    pub date: Option<NaiveDate>,
    pub leads: Vec<&'a Lead>,
}

/// Lead counts per tab. Terminal leads are counted nowhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TabCounts {
    pub leads: usize,
    pub revisit: usize,
}

pub fn filter_leads<'a>(leads: &'a [Lead], filter: &LeadFilter) -> Vec<&'a Lead> {
    leads.iter().filter(|lead| filter.matches(lead)).collect()
}

/// Groups leads by formatted contact date, keeping lead order within a group.
pub fn group_by_contact_date<'a, I>(leads: I, order: GroupOrder) -> Vec<LeadGroup<'a>>
where
    I: IntoIterator<Item = &'a Lead>,
{
    let mut groups: Vec<LeadGroup<'a>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for lead in leads {
        let key = if lead.last_contact_date.trim().is_empty() {
            NO_DATE_GROUP.to_string()
        } else {
            format_contact_date(&lead.last_contact_date)
        };

        match index.get(&key) {
            Some(&slot) => groups[slot].leads.push(lead),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(LeadGroup {
                    key,
                    date: parse_contact_date(&lead.last_contact_date),
                    leads: vec![lead],
                });
            }
        }
    }

    if order == GroupOrder::NewestFirst {
        // Stable: groups without a date keep their first-seen order at the end.
        groups.sort_by(|a, b| b.date.cmp(&a.date));
    }

    groups
}

/// Filters then groups: the list view for one tab.
pub fn build_lead_view<'a>(leads: &'a [Lead], filter: &LeadFilter) -> Vec<LeadGroup<'a>> {
    group_by_contact_date(filter_leads(leads, filter), filter.group_order)
}

pub fn tab_counts(leads: &[Lead]) -> TabCounts {
    leads
        .iter()
        .fold(TabCounts::default(), |mut counts, lead| {
            match LeadTab::for_status(lead.status) {
                Some(LeadTab::Leads) => counts.leads += 1,
                Some(LeadTab::Revisit) => counts.revisit += 1,
                None => {}
            }
            counts
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lead(id: &str, status: &str, date: &str) -> Lead {
        serde_json::from_value(json!({
            "id": id,
            "name": format!("Lead {}", id),
            "address": "1 Beach Rd, Scarborough",
            "status": status,
            "generatedBy": "Sam Rep",
            "lastContactDate": date,
        }))
        .unwrap()
    }

    #[test]
    fn test_tab_mapping() {
        assert_eq!(LeadTab::for_status(LeadStatus::Live), Some(LeadTab::Leads));
        assert_eq!(LeadTab::for_status(LeadStatus::Dq), Some(LeadTab::Leads));
        assert_eq!(LeadTab::for_status(LeadStatus::Revisit), Some(LeadTab::Revisit));
        assert_eq!(LeadTab::for_status(LeadStatus::Booked), Some(LeadTab::Revisit));
        assert_eq!(LeadTab::for_status(LeadStatus::Sold), Some(LeadTab::Revisit));
        assert_eq!(LeadTab::for_status(LeadStatus::Terminal), None);
    }

    #[test]
    fn test_unparsable_date_excluded_only_when_bound_set() {
        let leads = vec![lead("1", "Live", "soon"), lead("2", "Live", "")];

        let open = LeadFilter::for_tab(LeadTab::Leads);
        assert_eq!(filter_leads(&leads, &open).len(), 2);

        let bounded = LeadFilter {
            from_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..open.clone()
        };
        assert!(filter_leads(&leads, &bounded).is_empty());

        let upper = LeadFilter {
            to_date: NaiveDate::from_ymd_opt(2030, 1, 1),
            ..open
        };
        assert!(filter_leads(&leads, &upper).is_empty());
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let leads = vec![
            lead("1", "Live", "2024-04-30"),
            lead("2", "Live", "2024-05-01"),
            lead("3", "Live", "2024-05-31"),
            lead("4", "Live", "2024-06-01"),
        ];
        let filter = LeadFilter {
            from_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            to_date: NaiveDate::from_ymd_opt(2024, 5, 31),
            ..LeadFilter::default()
        };
        let ids: Vec<&str> = filter_leads(&leads, &filter)
            .iter()
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn test_groups_keep_first_seen_order() {
        let leads = vec![
            lead("1", "Live", "2024-05-01"),
            lead("2", "Live", "2024-06-10"),
            lead("3", "Live", ""),
            lead("4", "Live", "2024-05-01"),
        ];
        let groups = group_by_contact_date(&leads, GroupOrder::FirstSeen);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["01/05/2024", "10/06/2024", NO_DATE_GROUP]);
        assert_eq!(groups[0].leads.len(), 2);
        assert_eq!(groups[0].leads[1].id, "4");
    }

    #[test]
    fn test_newest_first_puts_undated_last() {
        let leads = vec![
            lead("1", "Live", ""),
            lead("2", "Live", "2024-05-01"),
            lead("3", "Live", "2024-06-10"),
        ];
        let groups = group_by_contact_date(&leads, GroupOrder::NewestFirst);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["10/06/2024", "01/05/2024", NO_DATE_GROUP]);
    }

    #[test]
    fn test_tab_counts_skip_terminal() {
        let leads = vec![
            lead("1", "Live", ""),
            lead("2", "DQ", ""),
            lead("3", "Sold", ""),
            lead("4", "Terminal", ""),
        ];
        assert_eq!(
            tab_counts(&leads),
            TabCounts {
                leads: 2,
                revisit: 1
            }
        );
    }

    #[test]
    fn test_filter_decodes_from_query_shape() {
        let filter: LeadFilter = serde_json::from_value(json!({
            "activeTab": "Revisit",
            "searchQuery": "main",
            "fromDate": "",
            "toDate": "2024-05-31",
            "groupOrder": "newestFirst"
        }))
        .unwrap();
        assert_eq!(filter.active_tab, LeadTab::Revisit);
        assert_eq!(filter.from_date, None);
        assert_eq!(filter.to_date, NaiveDate::from_ymd_opt(2024, 5, 31));
        assert_eq!(filter.group_order, GroupOrder::NewestFirst);
    }
}
