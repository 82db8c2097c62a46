/// Property-based tests using proptest
/// Tests invariants of the filter engine and form validation for all inputs
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_live_leads::filter::{build_lead_view, filter_leads, LeadFilter, LeadTab};
use rust_live_leads::models::{EmploymentType, Lead, LeadStatus, RenterOwner};
use rust_live_leads::queue::{validate, LeadForm};

fn status_strategy() -> impl Strategy<Value = LeadStatus> {
    prop::sample::select(LeadStatus::ALL.to_vec())
}

fn tab_strategy() -> impl Strategy<Value = LeadTab> {
    prop::sample::select(vec![LeadTab::Leads, LeadTab::Revisit])
}

fn date_cell_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("not a date".to_string()),
        (0u32..120).prop_map(|offset| {
            let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            (base + chrono::Duration::days(offset as i64))
                .format("%Y-%m-%d")
                .to_string()
        }),
    ]
}

prop_compose! {
    fn lead_strategy()(
        id in "[0-9]{1,4}",
        name in "[A-Za-z ]{0,12}",
        address in "[A-Za-z0-9 ,]{0,20}",
        status in status_strategy(),
        generated_by in prop::sample::select(vec!["Sam Rep", "Alex Agent", ""]),
        last_contact_date in date_cell_strategy(),
    ) -> Lead {
        Lead {
            id,
            name,
            address,
            phone: "0412345678".to_string(),
            status,
            renter_owner: None,
            superannuation: String::new(),
            employment_type: None,
            generated_by: generated_by.to_string(),
            last_contacted_by: String::new(),
            last_contact_date,
            notes: vec![],
            call_logged: false,
            suburb: None,
        }
    }
}

fn optional_date() -> impl Strategy<Value = Option<NaiveDate>> {
    prop::option::of((0u32..120).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(offset as i64)
    }))
}

prop_compose! {
    fn filter_strategy()(
        active_tab in tab_strategy(),
        search_query in "[a-z ]{0,3}",
        rep_filter in prop::sample::select(vec!["", "Sam Rep", "Alex Agent"]),
        suburb_filter in "[a-z]{0,2}",
        from_date in optional_date(),
        to_date in optional_date(),
    ) -> LeadFilter {
        LeadFilter {
            active_tab,
            search_query,
            rep_filter: rep_filter.to_string(),
            suburb_filter,
            from_date,
            to_date,
            ..LeadFilter::default()
        }
    }
}

// Property: terminal leads never appear, whatever the filter
proptest! {
    #[test]
    fn terminal_leads_never_listed(
        leads in prop::collection::vec(lead_strategy(), 0..30),
        filter in filter_strategy()
    ) {
        let view = build_lead_view(&leads, &filter);
        for group in &view {
            for lead in &group.leads {
                prop_assert_ne!(lead.status, LeadStatus::Terminal);
            }
        }
    }

    #[test]
    fn leads_only_listed_under_their_tab(
        leads in prop::collection::vec(lead_strategy(), 0..30),
        tab in tab_strategy()
    ) {
        let filter = LeadFilter::for_tab(tab);
        for lead in filter_leads(&leads, &filter) {
            let expected = match lead.status {
                LeadStatus::Live | LeadStatus::Dq => LeadTab::Leads,
                _ => LeadTab::Revisit,
            };
            prop_assert_eq!(expected, tab);
        }
        // With no other filters every non-terminal lead of the tab is listed
        let expected_count = leads
            .iter()
            .filter(|l| LeadTab::for_status(l.status) == Some(tab))
            .count();
        prop_assert_eq!(filter_leads(&leads, &filter).len(), expected_count);
    }
}

// Property: filters are a conjunction
proptest! {
    #[test]
    fn adding_a_filter_never_grows_the_result(
        leads in prop::collection::vec(lead_strategy(), 0..30),
        filter in filter_strategy(),
        extra_search in "[a-z]{1,2}",
        extra_from in optional_date()
    ) {
        let base = LeadFilter {
            search_query: String::new(),
            from_date: None,
            ..filter.clone()
        };
        let narrowed = LeadFilter {
            search_query: extra_search,
            from_date: extra_from,
            ..base.clone()
        };

        let base_ids: Vec<&str> = filter_leads(&leads, &base).iter().map(|l| l.id.as_str()).collect();
        let narrowed_leads = filter_leads(&leads, &narrowed);
        prop_assert!(narrowed_leads.len() <= base_ids.len());
        for lead in narrowed_leads {
            prop_assert!(base_ids.contains(&lead.id.as_str()));
        }
    }

    #[test]
    fn grouping_preserves_every_filtered_lead(
        leads in prop::collection::vec(lead_strategy(), 0..30),
        filter in filter_strategy()
    ) {
        let filtered = filter_leads(&leads, &filter).len();
        let grouped: usize = build_lead_view(&leads, &filter)
            .iter()
            .map(|g| g.leads.len())
            .sum();
        prop_assert_eq!(filtered, grouped);
    }
}

fn complete_form() -> LeadForm {
    LeadForm {
        date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        name: "John".to_string(),
        house_number: "12".to_string(),
        street_name: "Main St".to_string(),
        suburb: "Perth".to_string(),
        postcode: "6000".to_string(),
        phone: "0412345678".to_string(),
        renter_owner: Some(RenterOwner::Owner),
        superannuation: "$0–75k".to_string(),
        employment_type: Some(EmploymentType::FullTime),
        rep_name: "Sam Rep".to_string(),
    }
}

// Property: validation fails closed
proptest! {
    #[test]
    fn short_phones_always_rejected(phone in "[0-9]{0,7}") {
        let form = LeadForm { phone, ..complete_form() };
        prop_assert!(!validate(&form));
    }

    #[test]
    fn long_enough_phones_accepted(phone in "[0-9 +]{8,14}") {
        let form = LeadForm { phone, ..complete_form() };
        prop_assert!(validate(&form));
    }

    #[test]
    fn blank_name_always_rejected(name in "[ \t]{0,4}") {
        let form = LeadForm { name, ..complete_form() };
        prop_assert!(!validate(&form));
    }

    #[test]
    fn validation_never_panics(
        name in "\\PC*",
        suburb in "\\PC*",
        phone in "\\PC*",
        house_number in "\\PC*",
    ) {
        let form = LeadForm { name, suburb, phone, house_number, ..complete_form() };
        let _ = validate(&form);
    }
}
