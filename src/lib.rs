pub mod config;
pub mod error;
pub mod hostkey;
pub mod ledger;
pub mod logging;
pub mod manifest;
pub mod notify;
pub mod orchestrator;
pub mod postaction;
pub mod probe;
pub mod readiness;
pub mod ssh_session;
pub mod stats;
pub mod transport;
pub mod verify;
pub mod worker;

pub use error::DeployError;
