//! Live Leads CRM controller library.
//!
//! Holds the lead classification and filter engine, the upload queue, the
//! client for the spreadsheet-backed lead store, and the session controller
//! that the presentation views drive over HTTP.
//!
//! # Modules
//!
//! - `api`: HTTP-facing components.
//! - `core`: Domain logic, models and errors.
//! - `integrations`: External lead store access.
//! - `config`: Configuration management.
//! - `display`: Date and phone formatting for lead cards.
//! - `errors`: Error handling types.
//! - `filter`: Tab classification, filtering and date grouping.
//! - `handlers`: HTTP request handlers and shared state.
//! - `models`: Lead store data models.
//! - `queue`: Upload form validation and the pending upload queue.
//! - `routes`: Router construction.
//! - `sample_data`: Built-in fallback dataset.
//! - `session`: Controller-owned session state.
//! - `sheets_client`: Spreadsheet lead store client.

pub mod api;
pub mod core;
pub mod integrations;

pub mod config;
pub mod display;
pub mod errors;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod queue;
pub mod routes;
pub mod sample_data;
pub mod session;
pub mod sheets_client;
