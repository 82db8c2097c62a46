// Domain-layer modules and shared errors/models
pub mod filter {
    pub use crate::filter::*;
}

pub mod queue {
    pub use crate::queue::*;
}

pub mod session {
    pub use crate::session::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
