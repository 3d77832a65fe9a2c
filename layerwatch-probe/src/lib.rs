pub mod auth;
pub mod error;
pub mod outcome;
pub mod prober;

pub use auth::{PortalCredentials, TokenProvider};
pub use error::ProbeError;
pub use outcome::CheckOutcome;
pub use prober::Prober;
