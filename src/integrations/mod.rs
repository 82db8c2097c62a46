//! External service integrations.

pub mod sheets_client {
    pub use crate::sheets_client::*;
}

pub mod sample_data {
    pub use crate::sample_data::*;
}
