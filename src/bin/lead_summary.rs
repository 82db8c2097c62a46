//! Prints per-tab lead counts and date groups straight from the lead store.
//!
//! Usage: `lead_summary [Leads|Revisit]` (defaults to both tabs).

use rust_live_leads::config::Config;
use rust_live_leads::filter::{build_lead_view, tab_counts, LeadFilter, LeadTab};
use rust_live_leads::sheets_client::SheetsClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_live_leads=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    let store = SheetsClient::from_config(&config)?;
    let leads = store.fetch_leads().await?;

    let tabs = match std::env::args().nth(1).as_deref() {
        Some("Leads") => vec![LeadTab::Leads],
        Some("Revisit") => vec![LeadTab::Revisit],
        Some(other) => anyhow::bail!("Unknown tab '{}': expected Leads or Revisit", other),
        None => vec![LeadTab::Leads, LeadTab::Revisit],
    };

    let counts = tab_counts(&leads);
    println!(
        "{} leads fetched ({} in Leads, {} in Revisit)",
        leads.len(),
        counts.leads,
        counts.revisit
    );

    for tab in tabs {
        println!("\n== {:?}", tab);
        for group in build_lead_view(&leads, &LeadFilter::for_tab(tab)) {
            println!("{} ({})", group.key, group.leads.len());
            for lead in group.leads {
                println!("  - {} [{}] {}", lead.name, lead.status, lead.address);
            }
        }
    }

    Ok(())
}
