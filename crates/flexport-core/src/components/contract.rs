//! Transport contracts.

use flexport_logic::catalog::CargoType;
use serde::{Deserialize, Serialize};

use super::{ContractId, Owner, PortId, ShipId};

/// Lifecycle: `Available -> Active -> Completed`, or `-> Expired` while no ship works on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractStatus {
    Available,
    Active,
    Completed,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub client: String,
    pub origin: PortId,
    pub destination: PortId,
    pub cargo_type: CargoType,
    /// Cargo units.
    pub quantity: u32,
    /// Dollars paid on delivery.
    pub payment: f64,
    /// In-game seconds since game start.
    pub deadline: f64,
    /// Containers needed to carry `quantity`.
    pub required_capacity: u32,
    pub status: ContractStatus,
    pub holder: Option<Owner>,
    pub assigned_ship: Option<ShipId>,
}

impl Contract {
    pub fn is_available(&self) -> bool {
        self.status == ContractStatus::Available
    }

    pub fn is_active(&self) -> bool {
        self.status == ContractStatus::Active
    }
}
