//! Save/Load functionality for persisting a game in progress
//!
//! Uses bincode for compact binary serialization of the whole game.
//! Ship components are serialized individually then reconstructed on load.

use flexport_logic::config::SimConfig;
use hecs::World;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use thiserror::Error;

use crate::components::*;
use crate::engine::GameEngine;
use crate::systems::ContractBoard;

/// Version number for save file format (increment when format changes)
const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of the game
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    pub config: SimConfig,
    pub state: GameState,
    pub ports: Vec<Port>,
    pub contracts: ContractBoard,
    pub competitors: Vec<Competitor>,
    /// Every ship with its components
    pub ships: Vec<SerializableShip>,
}

/// All components a ship entity may carry. Optional ones come and go with
/// its lifecycle.
#[derive(Serialize, Deserialize)]
pub struct SerializableShip {
    pub ship: Ship,
    pub position: Position,
    pub status: Status,
    pub cargo: Cargo,
    pub voyage: Option<Voyage>,
    pub docked: Option<Docked>,
    pub assignment: Option<Assignment>,
}

/// Extract every ship from a world into serializable form
fn serialize_ships(world: &World) -> Vec<SerializableShip> {
    let mut ships: Vec<SerializableShip> = world
        .query::<(
            &Ship,
            &Position,
            &Status,
            &Cargo,
            Option<&Voyage>,
            Option<&Docked>,
            Option<&Assignment>,
        )>()
        .iter()
        .map(
            |(_, (ship, position, status, cargo, voyage, docked, assignment))| SerializableShip {
                ship: ship.clone(),
                position: *position,
                status: *status,
                cargo: cargo.clone(),
                voyage: voyage.cloned(),
                docked: docked.copied(),
                assignment: assignment.copied(),
            },
        )
        .collect();
    // Stable order so equal games produce equal files
    ships.sort_by_key(|s| s.ship.id);
    ships
}

/// Spawn a ship entity with all its components
fn spawn_ship(world: &mut World, saved: SerializableShip) {
    let entity = world.spawn((saved.ship, saved.position, saved.status, saved.cargo));

    if let Some(c) = saved.voyage {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = saved.docked {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = saved.assignment {
        let _ = world.insert_one(entity, c);
    }
}

/// Save the complete game to a writer
pub fn save_game<W: Write>(writer: W, engine: &GameEngine) -> Result<(), SaveError> {
    let save_data = SaveData {
        version: SAVE_VERSION,
        config: engine.config.clone(),
        state: engine.state.clone(),
        ports: engine.ports.clone(),
        contracts: engine.contracts.clone(),
        competitors: engine.competitors.clone(),
        ships: serialize_ships(&engine.world),
    };

    bincode::serialize_into(writer, &save_data)?;
    Ok(())
}

/// Load a game from a reader
pub fn load_game<R: Read>(reader: R) -> Result<LoadedGame, SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    let mut world = World::new();
    for ship in save_data.ships {
        spawn_ship(&mut world, ship);
    }

    Ok(LoadedGame {
        world,
        config: save_data.config,
        state: save_data.state,
        ports: save_data.ports,
        contracts: save_data.contracts,
        competitors: save_data.competitors,
    })
}

/// Result of loading a game
pub struct LoadedGame {
    pub world: World,
    pub config: SimConfig,
    pub state: GameState,
    pub ports: Vec<Port>,
    pub contracts: ContractBoard,
    pub competitors: Vec<Competitor>,
}

/// Errors that can occur during save/load
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use flexport_logic::config::GameMode;

    #[test]
    fn test_save_load_roundtrip() {
        let mut engine = GameEngine::new(SimConfig::seeded(11));
        engine.start_game(GameMode::Quick);
        let ship = engine.snapshot().player_fleet().next().unwrap().id;
        engine.move_ship(ship, PortId(7)).unwrap();
        for _ in 0..50 {
            engine.update(0.1);
        }

        let mut save_buffer = Vec::new();
        engine.save(&mut save_buffer).expect("Save failed");

        let mut loaded = GameEngine::default();
        loaded.load(&save_buffer[..]).expect("Load failed");

        assert_eq!(*loaded.snapshot(), *engine.snapshot());
        assert_eq!(loaded.config, engine.config);
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let engine = GameEngine::new(SimConfig::seeded(1));
        let mut data = SaveData {
            version: SAVE_VERSION + 1,
            config: engine.config.clone(),
            state: engine.state.clone(),
            ports: Vec::new(),
            contracts: ContractBoard::new(),
            competitors: Vec::new(),
            ships: Vec::new(),
        };
        let bytes = bincode::serialize(&data).unwrap();
        match load_game(&bytes[..]) {
            Err(SaveError::VersionMismatch { expected, found }) => {
                assert_eq!(expected, SAVE_VERSION);
                assert_eq!(found, SAVE_VERSION + 1);
            }
            _ => panic!("expected version mismatch"),
        }

        data.version = SAVE_VERSION;
        let bytes = bincode::serialize(&data).unwrap();
        assert!(load_game(&bytes[..]).is_ok());
    }

    #[test]
    fn test_truncated_save_is_an_error() {
        let mut engine = GameEngine::new(SimConfig::seeded(2));
        engine.start_game(GameMode::Sandbox);
        let mut buffer = Vec::new();
        engine.save(&mut buffer).unwrap();
        buffer.truncate(buffer.len() / 2);

        let mut other = GameEngine::default();
        assert!(other.load(&buffer[..]).is_err());
    }
}
