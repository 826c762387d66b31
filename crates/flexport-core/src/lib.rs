//! FlexPort Core - Shipping Logistics Simulation Engine
//!
//! An ECS-based simulation of a global shipping company competing against
//! AI-run rivals: ships sail great-circle routes over water, carry contract
//! cargo between real-world ports and earn money for their owners.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Ships (player-owned and competitor-owned)
//! - **Components**: Pure data attached to ships (Position, Voyage, Status, Cargo, ...)
//! - **Systems**: Logic that queries and updates components once per tick
//!
//! Ports, contracts and competitors are plain tables owned by the engine.
//! After every tick and every successful command the engine publishes an
//! immutable [`GameSnapshot`](snapshot::GameSnapshot) for readers.
//!
//! # Example
//!
//! ```rust,no_run
//! use flexport_core::prelude::*;
//! use flexport_logic::config::{GameMode, SimConfig};
//!
//! let mut engine = GameEngine::new(SimConfig::default());
//! engine.start_game(GameMode::Quick);
//!
//! loop {
//!     engine.update(1.0 / 60.0); // 60 FPS
//!     let snapshot = engine.snapshot();
//!     if snapshot.result.is_some() {
//!         break;
//!     }
//! }
//! ```

pub mod commands;
pub mod components;
pub mod engine;
pub mod generation;
pub mod persistence;
pub mod snapshot;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::commands::CommandError;
    pub use crate::components::*;
    pub use crate::engine::GameEngine;
    pub use crate::snapshot::GameSnapshot;
}
