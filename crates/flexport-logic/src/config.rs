//! Game modes and tunable simulation parameters.
//!
//! `SimConfig` is plain data with a default for every field, so a JSON file
//! only needs to name the knobs it changes:
//!
//! ```
//! use flexport_logic::config::SimConfig;
//!
//! let config = SimConfig::from_json_str(r#"{ "seed": 7, "loading_seconds": 1.0 }"#).unwrap();
//! assert_eq!(config.seed, Some(7));
//! assert_eq!(config.unloading_seconds, SimConfig::default().unloading_seconds);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::WORLD_RADIUS;

/// Game variants. One engine, parameterized by mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Short session, generous money, three rivals.
    Quick,
    /// Long session, tighter money, five rivals.
    Campaign,
    /// No time limit.
    Sandbox,
}

/// Starting conditions for a mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeSettings {
    pub starting_money: f64,
    pub competitor_count: usize,
    /// In-game seconds until the session ends; `None` runs forever.
    pub duration_seconds: Option<f64>,
}

impl GameMode {
    pub fn settings(&self) -> ModeSettings {
        match self {
            GameMode::Quick => ModeSettings {
                starting_money: 100_000_000.0,
                competitor_count: 3,
                duration_seconds: Some(30.0 * 60.0),
            },
            GameMode::Campaign => ModeSettings {
                starting_money: 50_000_000.0,
                competitor_count: 5,
                duration_seconds: Some(2.0 * 60.0 * 60.0),
            },
            GameMode::Sandbox => ModeSettings {
                starting_money: 250_000_000.0,
                competitor_count: 3,
                duration_seconds: None,
            },
        }
    }
}

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Every tunable number in the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // World
    pub world_radius: f64,
    pub company_name: String,

    // Movement
    /// Distance (world units) under which a waypoint counts as reached.
    pub arrival_threshold: f64,
    /// Cap on a single tick's delta (seconds) to absorb tab-hides and stalls.
    pub max_delta_seconds: f64,
    pub min_game_speed: f64,
    pub max_game_speed: f64,
    pub max_waypoints: usize,
    /// Condition points lost per world unit sailed.
    pub wear_per_unit: f64,
    /// Fuel burned per world unit sailed. Docking refuels to capacity.
    pub fuel_per_unit: f64,

    // Cargo state machine (real seconds, counted inside the tick)
    pub loading_seconds: f64,
    pub unloading_seconds: f64,
    pub repair_seconds: f64,
    pub repair_cost: f64,
    /// Fraction of ship value charged for an upgrade.
    pub upgrade_cost_fraction: f64,
    /// Fraction of ship value refunded on sale.
    pub sell_refund_fraction: f64,
    /// Cargo units per container.
    pub container_unit_size: u32,
    pub reputation_per_delivery: f64,
    pub starting_reputation: f64,

    // Contracts
    /// Expected new contracts per scaled second.
    pub contract_spawn_rate: f64,
    pub max_available_contracts: usize,
    pub initial_contracts: usize,
    pub contract_quantity_min: u32,
    pub contract_quantity_max: u32,
    pub contract_payment_min: f64,
    pub contract_payment_max: f64,
    pub contract_deadline_days_min: u32,
    pub contract_deadline_days_max: u32,
    /// In-game seconds per calendar day.
    pub seconds_per_game_day: f64,

    // AI
    /// AI development points per scaled second.
    pub ai_development_rate: f64,
    /// Competitor efficiency lead over the player that ends the game.
    pub singularity_margin: f64,
    pub competitor_starting_money: f64,
    pub competitor_efficiency_min: f64,
    pub competitor_efficiency_max: f64,
    /// Efficiency points per scaled second before AI-development scaling.
    pub competitor_efficiency_growth: f64,
    /// Chance per scaled second that a competitor considers buying a ship.
    pub competitor_purchase_rate: f64,
    /// Chance per scaled second that a competitor takes a contract.
    pub competitor_assign_rate: f64,
    pub competitor_max_ships: u32,
    pub competitor_max_assignments: usize,
    /// Dollars per ship per scaled second.
    pub competitor_income_per_ship: f64,

    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_radius: WORLD_RADIUS,
            company_name: "FlexPort Logistics".to_string(),

            arrival_threshold: 2.0,
            max_delta_seconds: 0.1,
            min_game_speed: 1.0,
            max_game_speed: 10.0,
            max_waypoints: 20,
            wear_per_unit: 0.01,
            fuel_per_unit: 0.5,

            loading_seconds: 3.0,
            unloading_seconds: 3.0,
            repair_seconds: 5.0,
            repair_cost: 500_000.0,
            upgrade_cost_fraction: 0.25,
            sell_refund_fraction: 0.7,
            container_unit_size: 100,
            reputation_per_delivery: 5.0,
            starting_reputation: 50.0,

            contract_spawn_rate: 0.05,
            max_available_contracts: 20,
            initial_contracts: 5,
            contract_quantity_min: 500,
            contract_quantity_max: 5_000,
            contract_payment_min: 500_000.0,
            contract_payment_max: 5_000_000.0,
            contract_deadline_days_min: 7,
            contract_deadline_days_max: 30,
            seconds_per_game_day: 60.0,

            ai_development_rate: 0.05,
            singularity_margin: 50.0,
            competitor_starting_money: 50_000_000.0,
            competitor_efficiency_min: 20.0,
            competitor_efficiency_max: 40.0,
            competitor_efficiency_growth: 0.01,
            competitor_purchase_rate: 0.01,
            competitor_assign_rate: 0.05,
            competitor_max_ships: 10,
            competitor_max_assignments: 3,
            competitor_income_per_ship: 1_000.0,

            seed: None,
        }
    }
}

impl SimConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Default config with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, v: f64) -> Result<(), ConfigError> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {}", v),
                })
            }
        }
        fn non_negative(field: &'static str, v: f64) -> Result<(), ConfigError> {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be zero or more, got {}", v),
                })
            }
        }
        fn fraction(field: &'static str, v: f64) -> Result<(), ConfigError> {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be within 0..=1, got {}", v),
                })
            }
        }

        positive("world_radius", self.world_radius)?;
        positive("arrival_threshold", self.arrival_threshold)?;
        positive("max_delta_seconds", self.max_delta_seconds)?;
        positive("min_game_speed", self.min_game_speed)?;
        positive("max_game_speed", self.max_game_speed)?;
        if self.min_game_speed > self.max_game_speed {
            return Err(ConfigError::Invalid {
                field: "min_game_speed",
                reason: "must not exceed max_game_speed".into(),
            });
        }
        if self.max_waypoints < 2 {
            return Err(ConfigError::Invalid {
                field: "max_waypoints",
                reason: "a route needs at least two points".into(),
            });
        }
        non_negative("wear_per_unit", self.wear_per_unit)?;
        non_negative("fuel_per_unit", self.fuel_per_unit)?;
        non_negative("loading_seconds", self.loading_seconds)?;
        non_negative("unloading_seconds", self.unloading_seconds)?;
        non_negative("repair_seconds", self.repair_seconds)?;
        non_negative("repair_cost", self.repair_cost)?;
        non_negative("upgrade_cost_fraction", self.upgrade_cost_fraction)?;
        fraction("sell_refund_fraction", self.sell_refund_fraction)?;
        if self.container_unit_size == 0 {
            return Err(ConfigError::Invalid {
                field: "container_unit_size",
                reason: "must be at least 1".into(),
            });
        }
        non_negative("reputation_per_delivery", self.reputation_per_delivery)?;
        fraction("starting_reputation", self.starting_reputation / 100.0)?;
        non_negative("contract_spawn_rate", self.contract_spawn_rate)?;
        if self.contract_quantity_min == 0 || self.contract_quantity_min > self.contract_quantity_max {
            return Err(ConfigError::Invalid {
                field: "contract_quantity_min",
                reason: "must be positive and not exceed contract_quantity_max".into(),
            });
        }
        positive("contract_payment_min", self.contract_payment_min)?;
        if self.contract_payment_min > self.contract_payment_max {
            return Err(ConfigError::Invalid {
                field: "contract_payment_min",
                reason: "must not exceed contract_payment_max".into(),
            });
        }
        if self.contract_deadline_days_min == 0
            || self.contract_deadline_days_min > self.contract_deadline_days_max
        {
            return Err(ConfigError::Invalid {
                field: "contract_deadline_days_min",
                reason: "must be positive and not exceed contract_deadline_days_max".into(),
            });
        }
        positive("seconds_per_game_day", self.seconds_per_game_day)?;
        non_negative("ai_development_rate", self.ai_development_rate)?;
        non_negative("singularity_margin", self.singularity_margin)?;
        non_negative("competitor_starting_money", self.competitor_starting_money)?;
        if !(0.0..=100.0).contains(&self.competitor_efficiency_min)
            || !(0.0..=100.0).contains(&self.competitor_efficiency_max)
            || self.competitor_efficiency_min > self.competitor_efficiency_max
        {
            return Err(ConfigError::Invalid {
                field: "competitor_efficiency_min",
                reason: "efficiency range must lie within 0..=100 and be ordered".into(),
            });
        }
        non_negative("competitor_efficiency_growth", self.competitor_efficiency_growth)?;
        non_negative("competitor_purchase_rate", self.competitor_purchase_rate)?;
        non_negative("competitor_assign_rate", self.competitor_assign_rate)?;
        non_negative("competitor_income_per_ship", self.competitor_income_per_ship)?;
        Ok(())
    }

    /// Clamp a raw frame delta into the range the tick accepts.
    ///
    /// Non-finite and negative deltas become zero.
    pub fn clamp_delta(&self, delta_seconds: f64) -> f64 {
        if !delta_seconds.is_finite() || delta_seconds <= 0.0 {
            0.0
        } else {
            delta_seconds.min(self.max_delta_seconds)
        }
    }

    pub fn is_valid_game_speed(&self, speed: f64) -> bool {
        speed.is_finite() && speed >= self.min_game_speed && speed <= self.max_game_speed
    }
}
