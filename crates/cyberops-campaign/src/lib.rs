//! Campaign layer for CyberOps.
//!
//! Persistent progress that survives across missions: statistics, the
//! completed-missions set and the resources granted by victories.

pub mod rewards;
pub mod state;

pub use state::{CampaignState, CampaignStats};
