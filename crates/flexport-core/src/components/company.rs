//! The player's company state, AI competitors and the game result.

use flexport_logic::config::GameMode;
use serde::{Deserialize, Serialize};

use super::CompetitorId;
use super::PortId;

/// An AI-run shipping company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    pub name: String,
    /// Display colour, e.g. `#2d9cdb`.
    pub color: String,
    pub money: f64,
    /// Efficiency score (0-100).
    pub efficiency: f64,
    pub ships_owned: u32,
    pub contracts_completed: u32,
    pub total_revenue: f64,
    /// Where this competitor's new ships spawn.
    pub home_port: PortId,
}

/// Why the game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Global AI development reached 100.
    Singularity,
    /// A competitor's efficiency outran the player's by the configured margin.
    CompetitorDominance,
    /// The mode's time limit ran out.
    TimeLimit,
}

/// Final standing of one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalScore {
    pub name: String,
    /// Money plus fleet value.
    pub net_worth: f64,
    pub efficiency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: String,
    pub reason: EndReason,
    /// Player first, then competitors in table order.
    pub scores: Vec<FinalScore>,
    /// In-game seconds played.
    pub duration_seconds: f64,
}

/// The player's company and global game progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub started: bool,
    pub mode: GameMode,
    pub company_name: String,
    pub money: f64,
    /// Reputation (0-100).
    pub reputation: f64,
    pub paused: bool,
    pub game_speed: f64,
    /// In-game seconds since the game started.
    pub game_time: f64,
    /// Time limit in in-game seconds, if the mode has one.
    pub duration: Option<f64>,
    /// Global AI development level (0-100).
    pub ai_development: f64,
    pub singularity_active: bool,
    pub player_efficiency: f64,
    pub contracts_completed: u32,
    pub total_revenue: f64,
    pub result: Option<GameResult>,
    pub next_ship_id: u32,
    pub next_container_id: u32,
}

impl GameState {
    /// Unstarted placeholder state.
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            started: false,
            mode: GameMode::Quick,
            company_name: company_name.into(),
            money: 0.0,
            reputation: 0.0,
            paused: true,
            game_speed: 1.0,
            game_time: 0.0,
            duration: None,
            ai_development: 0.0,
            singularity_active: false,
            player_efficiency: 0.0,
            contracts_completed: 0,
            total_revenue: 0.0,
            result: None,
            next_ship_id: 1,
            next_container_id: 1,
        }
    }

    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    /// True when a tick should advance the simulation.
    pub fn is_running(&self) -> bool {
        self.started && !self.paused && !self.is_over()
    }
}
