//! Fixed dataset served in place of the remote store when reads fall back.

use crate::models::{Activity, EmploymentType, Lead, LeadStatus, RenterOwner};

#[allow(clippy::too_many_arguments)]
fn sample_lead(
    id: &str,
    name: &str,
    address: &str,
    phone: &str,
    status: LeadStatus,
    renter_owner: RenterOwner,
    superannuation: &str,
    employment_type: EmploymentType,
    generated_by: &str,
    last_contact_date: &str,
    notes: &[&str],
) -> Lead {
    Lead {
        id: id.to_string(),
        name: name.to_string(),
        address: address.to_string(),
        phone: phone.to_string(),
        status,
        renter_owner: Some(renter_owner),
        superannuation: superannuation.to_string(),
        employment_type: Some(employment_type),
        generated_by: generated_by.to_string(),
        last_contacted_by: if last_contact_date.is_empty() {
            String::new()
        } else {
            generated_by.to_string()
        },
        last_contact_date: last_contact_date.to_string(),
        notes: notes.iter().map(|n| n.to_string()).collect(),
        call_logged: !notes.is_empty(),
        suburb: None,
    }
}

pub fn sample_leads() -> Vec<Lead> {
    vec![
        sample_lead(
            "S-001",
            "Olivia Harris",
            "14 Marine Pde, Cottesloe WA 6011",
            "0412345678",
            LeadStatus::Live,
            RenterOwner::Owner,
            "$75–150k",
            EmploymentType::FullTime,
            "Sam Rep",
            "2024-05-01",
            &["Interested, call back after 5pm"],
        ),
        sample_lead(
            "S-002",
            "Noah Patel",
            "3/22 Walcott St, Mount Lawley WA 6050",
            "0423456789",
            LeadStatus::Dq,
            RenterOwner::Renter,
            "$0–75k",
            EmploymentType::PartTime,
            "Alex Agent",
            "",
            &[],
        ),
        sample_lead(
            "S-003",
            "Charlotte Nguyen",
            "88 Canning Hwy, Victoria Park WA 6100",
            "0434567890",
            LeadStatus::Revisit,
            RenterOwner::Owner,
            "$150k+",
            EmploymentType::FullTime,
            "Jess Sales",
            "2024-05-01",
            &["Partner needs to be present", "Revisit next week"],
        ),
        sample_lead(
            "S-004",
            "Liam O'Brien",
            "5 Railway Pde, Midland WA 6056",
            "0445678901",
            LeadStatus::Booked,
            RenterOwner::Owner,
            "$75–150k",
            EmploymentType::FullTime,
            "Sam Rep",
            "2024-04-28",
            &["Booked consult Thursday 10am"],
        ),
        sample_lead(
            "S-005",
            "Amelia Clarke",
            "41 Ocean Reef Rd, Joondalup WA 6027",
            "0456789012",
            LeadStatus::Terminal,
            RenterOwner::Renter,
            "Other",
            EmploymentType::PartTime,
            "Alex Agent",
            "2024-04-20",
            &["Not interested"],
        ),
    ]
}

pub fn sample_activity() -> Vec<Activity> {
    vec![
        Activity {
            id: "A-001".to_string(),
            rep_name: "Sam Rep".to_string(),
            lead_name: "Olivia Harris".to_string(),
            action: "Live".to_string(),
            timestamp: "01/05/2024 4:12 pm".to_string(),
        },
        Activity {
            id: "A-002".to_string(),
            rep_name: "Jess Sales".to_string(),
            lead_name: "Charlotte Nguyen".to_string(),
            action: "Revisit".to_string(),
            timestamp: "01/05/2024 11:40 am".to_string(),
        },
        Activity {
            id: "A-003".to_string(),
            rep_name: "Sam Rep".to_string(),
            lead_name: "Liam O'Brien".to_string(),
            action: "Booked".to_string(),
            timestamp: "28/04/2024 2:05 pm".to_string(),
        },
    ]
}
