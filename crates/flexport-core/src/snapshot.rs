//! Read model handed to renderers and UIs.
//!
//! A [`GameSnapshot`] is built from the engine after every tick and every
//! successful command and shared behind an `Arc`. Readers never see a
//! half-applied tick.

use flexport_logic::catalog::ShipType;
use flexport_logic::config::GameMode;
use flexport_logic::geo::Vec3;
use hecs::World;
use serde::{Deserialize, Serialize};

use crate::components::{
    Assignment, Cargo, Competitor, Contract, ContractId, Docked, GameResult, GameState, Owner,
    Port, PortId, Position, Ship, ShipId, ShipState, Status, Voyage,
};
use crate::systems::ContractBoard;

/// Everything a renderer needs about one ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipView {
    pub id: ShipId,
    pub name: String,
    pub ship_type: ShipType,
    pub owner: Owner,
    pub status: ShipState,
    pub position: Vec3,
    pub heading: f64,
    pub capacity: u32,
    pub speed: f64,
    pub fuel: f64,
    pub condition: f64,
    pub value: f64,
    pub containers: u32,
    pub contract: Option<ContractId>,
    pub docked_at: Option<PortId>,
    pub destination: Option<PortId>,
    pub waypoints: Vec<Vec3>,
    pub waypoint_index: usize,
}

/// Immutable view of the whole game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub started: bool,
    pub mode: GameMode,
    pub company_name: String,
    pub money: f64,
    pub reputation: f64,
    pub paused: bool,
    pub game_speed: f64,
    /// In-game seconds since start.
    pub game_time: f64,
    /// Whole in-game days since start.
    pub game_day: u32,
    pub ai_development: f64,
    pub singularity_active: bool,
    pub player_efficiency: f64,
    pub contracts_completed: u32,
    pub fleet: Vec<ShipView>,
    pub ports: Vec<Port>,
    pub contracts: Vec<Contract>,
    pub competitors: Vec<Competitor>,
    pub result: Option<GameResult>,
}

impl GameSnapshot {
    pub fn capture(
        world: &World,
        state: &GameState,
        ports: &[Port],
        contracts: &ContractBoard,
        competitors: &[Competitor],
        seconds_per_game_day: f64,
    ) -> Self {
        let mut fleet: Vec<ShipView> = world
            .query::<(
                &Ship,
                &Position,
                &Status,
                &Cargo,
                Option<&Assignment>,
                Option<&Docked>,
                Option<&Voyage>,
            )>()
            .iter()
            .map(
                |(_, (ship, pos, status, cargo, assignment, docked, voyage))| ShipView {
                    id: ship.id,
                    name: ship.name.clone(),
                    ship_type: ship.ship_type,
                    owner: ship.owner,
                    status: status.state,
                    position: pos.pos,
                    heading: pos.heading,
                    capacity: ship.capacity,
                    speed: ship.speed,
                    fuel: ship.fuel,
                    condition: ship.condition,
                    value: ship.value,
                    containers: cargo.len() as u32,
                    contract: assignment.map(|a| a.contract),
                    docked_at: docked.map(|d| d.port),
                    destination: voyage.map(|v| v.destination),
                    waypoints: voyage.map(|v| v.nav.waypoints.clone()).unwrap_or_default(),
                    waypoint_index: voyage.map(|v| v.nav.cursor).unwrap_or(0),
                },
            )
            .collect();
        fleet.sort_by_key(|s| s.id);

        let game_day = if seconds_per_game_day > 0.0 {
            (state.game_time / seconds_per_game_day).floor() as u32
        } else {
            0
        };

        Self {
            started: state.started,
            mode: state.mode,
            company_name: state.company_name.clone(),
            money: state.money,
            reputation: state.reputation,
            paused: state.paused,
            game_speed: state.game_speed,
            game_time: state.game_time,
            game_day,
            ai_development: state.ai_development,
            singularity_active: state.singularity_active,
            player_efficiency: state.player_efficiency,
            contracts_completed: state.contracts_completed,
            fleet,
            ports: ports.to_vec(),
            contracts: contracts.iter().cloned().collect(),
            competitors: competitors.to_vec(),
            result: state.result.clone(),
        }
    }

    /// Ships owned by the player.
    pub fn player_fleet(&self) -> impl Iterator<Item = &ShipView> {
        self.fleet.iter().filter(|s| s.owner.is_player())
    }

    pub fn ship(&self, id: ShipId) -> Option<&ShipView> {
        self.fleet.iter().find(|s| s.id == id)
    }

    pub fn contract(&self, id: ContractId) -> Option<&Contract> {
        self.contracts.iter().find(|c| c.id == id)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{generate_world, player_home_port};
    use flexport_logic::config::SimConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn captured() -> GameSnapshot {
        let mut world = World::new();
        let mut state = GameState::new("Test Co");
        let mut rng = StdRng::seed_from_u64(1);
        let config = SimConfig::default();
        let generated = generate_world(&mut world, &mut state, GameMode::Quick, &config, &mut rng);
        state.game_time = 150.0;
        GameSnapshot::capture(
            &world,
            &state,
            &generated.ports,
            &generated.contracts,
            &generated.competitors,
            config.seconds_per_game_day,
        )
    }

    #[test]
    fn test_capture_lists_fleet_in_id_order() {
        let snap = captured();
        assert_eq!(snap.fleet.len(), 4);
        assert!(snap.fleet.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(snap.player_fleet().count(), 1);
        assert_eq!(snap.game_day, 2);
    }

    #[test]
    fn test_player_starter_docked_at_home() {
        let snap = captured();
        let home = player_home_port(&snap.ports).unwrap().id;
        let starter = snap.player_fleet().next().unwrap();
        assert_eq!(starter.docked_at, Some(home));
        assert_eq!(starter.status, ShipState::Idle);
        assert!(starter.waypoints.is_empty());
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let snap = captured();
        let json = snap.to_json().unwrap();
        let back: GameSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.fleet.len(), snap.fleet.len());
        assert!(json.contains("\"company_name\":\"Test Co\""));
    }
}
