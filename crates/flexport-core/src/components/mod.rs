//! Component definitions for the ECS simulation.
//!
//! Ship components are pure data structs attached to entities. Ports,
//! contracts and companies are not entities; they live in engine-owned
//! tables and are defined here so systems and snapshots share one type.

mod common;
mod company;
mod contract;
mod port;
mod ship;

pub use common::*;
pub use company::*;
pub use contract::*;
pub use port::*;
pub use ship::*;
