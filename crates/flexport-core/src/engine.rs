//! Game engine - main entry point for running the simulation

use std::sync::Arc;

use flexport_logic::config::{GameMode, SimConfig};
use flexport_logic::water::{RectLandMap, WaterMap};
use hecs::World;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::components::*;
use crate::generation::generate_world;
use crate::snapshot::GameSnapshot;
use crate::systems::*;

/// Main game engine.
///
/// The engine is the only writer of game state. Every mutation happens in
/// [`update`](Self::update) or in a command, and each one ends by publishing
/// a fresh [`GameSnapshot`].
pub struct GameEngine {
    /// ECS world containing every ship
    pub world: World,
    /// Player company and global progress
    pub state: GameState,
    pub ports: Vec<Port>,
    pub contracts: ContractBoard,
    pub competitors: Vec<Competitor>,
    pub config: SimConfig,

    pub(crate) water: Box<dyn WaterMap>,
    pub(crate) rng: StdRng,
    published: Arc<GameSnapshot>,
}

impl GameEngine {
    /// Create an engine on the built-in world map. No game runs until
    /// [`start_game`](Self::start_game).
    pub fn new(config: SimConfig) -> Self {
        Self::with_water_map(config, Box::new(RectLandMap::earth()))
    }

    /// Create an engine with a custom land/water classifier.
    pub fn with_water_map(config: SimConfig, water: Box<dyn WaterMap>) -> Self {
        let rng = seeded_rng(config.seed);
        let state = GameState::new(config.company_name.clone());
        let contracts = ContractBoard::new();
        let published = Arc::new(GameSnapshot::capture(
            &World::new(),
            &state,
            &[],
            &contracts,
            &[],
            config.seconds_per_game_day,
        ));
        Self {
            world: World::new(),
            state,
            ports: Vec::new(),
            contracts,
            competitors: Vec::new(),
            config,
            water,
            rng,
            published,
        }
    }

    /// Begin a new game in `mode`, discarding any game in progress.
    pub fn start_game(&mut self, mode: GameMode) {
        let settings = mode.settings();
        self.world = World::new();
        self.rng = seeded_rng(self.config.seed);

        let mut state = GameState::new(self.config.company_name.clone());
        state.started = true;
        state.paused = false;
        state.mode = mode;
        state.money = settings.starting_money;
        state.reputation = self.config.starting_reputation;
        state.duration = settings.duration_seconds;
        state.game_speed = self.config.min_game_speed;
        self.state = state;

        let generated = generate_world(
            &mut self.world,
            &mut self.state,
            mode,
            &self.config,
            &mut self.rng,
        );
        self.ports = generated.ports;
        self.competitors = generated.competitors;
        self.contracts = generated.contracts;

        info!(
            "started {:?} game: ${:.0}, {} competitors, {} contracts",
            mode,
            self.state.money,
            self.competitors.len(),
            self.contracts.available_count()
        );
        self.publish();
    }

    /// Advance the simulation by `delta_seconds` of wall-clock time.
    ///
    /// Does nothing while paused, before start or after the game ended.
    pub fn update(&mut self, delta_seconds: f64) {
        if !self.state.is_running() {
            return;
        }
        if !delta_seconds.is_finite() {
            warn!("ignoring non-finite tick delta {}", delta_seconds);
            return;
        }
        let dt = self.config.clamp_delta(delta_seconds);
        if dt <= 0.0 {
            return;
        }
        let speed = self.state.game_speed;

        // Movement and docking
        let arrivals = movement_system(&mut self.world, self.water.as_ref(), &self.config, dt, speed);
        handle_arrivals(&mut self.world, &arrivals, &self.contracts);

        // Timed operations
        cargo_system(
            &mut self.world,
            &mut self.contracts,
            &mut self.state,
            &mut self.competitors,
            &self.config,
            dt,
        );

        // Rivals
        competitor_system(
            &mut self.world,
            &mut self.state,
            &mut self.competitors,
            &mut self.contracts,
            &self.ports,
            self.water.as_ref(),
            &self.config,
            &mut self.rng,
            dt,
        );

        // Economy and end conditions
        economy_system(
            &self.world,
            &mut self.state,
            &mut self.contracts,
            self.ports.len(),
            &self.config,
            &mut self.rng,
            dt,
        );
        if let Some(result) =
            check_game_end(&self.world, &self.state, &self.competitors, &self.config)
        {
            self.state.singularity_active = result.reason != EndReason::TimeLimit;
            self.state.paused = true;
            self.state.result = Some(result);
        }

        refresh_ports(&self.world, &mut self.ports, &self.contracts);
        self.publish();
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<GameSnapshot> {
        Arc::clone(&self.published)
    }

    /// The land/water classifier ships are constrained by.
    pub fn water_map(&self) -> &dyn WaterMap {
        self.water.as_ref()
    }

    pub(crate) fn publish(&mut self) {
        self.published = Arc::new(GameSnapshot::capture(
            &self.world,
            &self.state,
            &self.ports,
            &self.contracts,
            &self.competitors,
            self.config.seconds_per_game_day,
        ));
    }

    /// Reseed after a load so a restored seeded game stays reproducible.
    pub(crate) fn reseed(&mut self) {
        let seed = self
            .config
            .seed
            .map(|s| s ^ self.state.game_time.to_bits());
        self.rng = seeded_rng(seed);
    }

    /// Count ships owned by `owner`.
    pub fn ship_count(&self, owner: Owner) -> usize {
        self.world
            .query::<&Ship>()
            .iter()
            .filter(|(_, ship)| ship.owner == owner)
            .count()
    }

    /// Entity of a player-owned ship.
    pub(crate) fn player_ship(&self, id: ShipId) -> Option<hecs::Entity> {
        let entity = find_ship(&self.world, id)?;
        let owner = self.world.get::<&Ship>(entity).ok()?.owner;
        owner.is_player().then_some(entity)
    }

    /// Save the game to a writer
    pub fn save<W: std::io::Write>(&self, writer: W) -> Result<(), crate::persistence::SaveError> {
        crate::persistence::save_game(writer, self)
    }

    /// Load a game from a reader, replacing the current one
    pub fn load<R: std::io::Read>(&mut self, reader: R) -> Result<(), crate::persistence::SaveError> {
        let loaded = crate::persistence::load_game(reader)?;

        self.world = loaded.world;
        self.state = loaded.state;
        self.ports = loaded.ports;
        self.contracts = loaded.contracts;
        self.competitors = loaded.competitors;
        self.config = loaded.config;
        self.reseed();

        refresh_ports(&self.world, &mut self.ports, &self.contracts);
        self.publish();
        Ok(())
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(mode: GameMode) -> GameEngine {
        let mut engine = GameEngine::new(SimConfig::seeded(42));
        engine.start_game(mode);
        engine
    }

    #[test]
    fn test_engine_creation() {
        let engine = GameEngine::default();
        let snap = engine.snapshot();
        assert!(!snap.started);
        assert!(snap.fleet.is_empty());
    }

    #[test]
    fn test_update_before_start_is_noop() {
        let mut engine = GameEngine::new(SimConfig::seeded(1));
        engine.update(0.1);
        assert_eq!(engine.state.game_time, 0.0);
    }

    #[test]
    fn test_start_game_uses_mode_settings() {
        let engine = started(GameMode::Campaign);
        let settings = GameMode::Campaign.settings();
        assert_eq!(engine.state.money, settings.starting_money);
        assert_eq!(engine.competitors.len(), settings.competitor_count);
        assert_eq!(engine.state.duration, settings.duration_seconds);
        assert_eq!(engine.ship_count(Owner::Player), 1);
    }

    #[test]
    fn test_update_advances_game_time() {
        let mut engine = started(GameMode::Sandbox);
        engine.set_game_speed(2.0).unwrap();
        for _ in 0..10 {
            engine.update(0.05);
        }
        assert!((engine.state.game_time - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_delta_is_capped() {
        let mut engine = started(GameMode::Sandbox);
        engine.update(30.0);
        assert!((engine.state.game_time - engine.config.max_delta_seconds).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_delta_is_ignored() {
        let mut engine = started(GameMode::Sandbox);
        engine.update(f64::NAN);
        engine.update(f64::INFINITY);
        engine.update(-1.0);
        assert_eq!(engine.state.game_time, 0.0);
    }

    #[test]
    fn test_snapshot_published_each_tick() {
        let mut engine = started(GameMode::Sandbox);
        let before = engine.snapshot();
        engine.update(0.1);
        let after = engine.snapshot();
        assert!(after.game_time > before.game_time);
        // Old readers keep their consistent view
        assert_eq!(before.game_time, 0.0);
    }

    #[test]
    fn test_seeded_games_are_reproducible() {
        let mut a = started(GameMode::Quick);
        let mut b = started(GameMode::Quick);
        for _ in 0..500 {
            a.update(0.1);
            b.update(0.1);
        }
        assert_eq!(*a.snapshot(), *b.snapshot());
    }
}
