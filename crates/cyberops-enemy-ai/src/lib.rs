//! Enemy AI for CyberOps.
//!
//! Implements the per-enemy behaviour state machine (pursue, settle,
//! wander, spot, fire) and the stock enemy templates.

pub mod fsm;
pub mod profiles;

pub use cyberops_core as core;
