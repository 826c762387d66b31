//! Systems - logic that operates on components

mod cargo;
mod competitors;
mod contracts;
mod economy;
mod fleet;
mod movement;
mod ports;

pub use cargo::*;
pub use competitors::*;
pub use contracts::*;
pub use economy::*;
pub use fleet::*;
pub use movement::*;
pub use ports::*;
