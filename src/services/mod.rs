//! Services module.
//!
//! Houses the registration workflow and the storage trait it runs against.
//! Nothing in here knows about HTTP.

pub mod registration;
pub mod traits;

pub use registration::{Registered, RegistrationOutcome, RegistrationService};
pub use traits::UserStore;
