//! Generation - creation of ports, fleets and rivals at game start

mod names;
mod world;

pub use names::*;
pub use world::*;
