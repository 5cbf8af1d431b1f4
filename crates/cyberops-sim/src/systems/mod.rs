//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` (or `&World` when read
//! only) plus whatever mission state they touch. They own no state.

pub mod abilities;
pub mod alert;
pub mod effects;
pub mod enemy_ai;
pub mod fog;
pub mod motion;
pub mod objectives;
pub mod projectiles;
pub mod snapshot;
