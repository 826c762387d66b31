//! Ports: fixed geography plus operational state.

use flexport_logic::catalog::PortSeed;
use flexport_logic::geo::{lat_lon_to_position, Vec3};
use serde::{Deserialize, Serialize};

use super::{ContractId, PortId, ShipId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub id: PortId,
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    /// Container throughput the port can stage.
    pub capacity: u32,
    /// Containers aboard ships currently docked here.
    pub current_load: u32,
    pub berths: u32,
    pub available_berths: u32,
    pub player_owned: bool,
    pub docked_ships: Vec<ShipId>,
    /// Available contracts originating here.
    pub contracts: Vec<ContractId>,
}

impl Port {
    pub fn from_seed(id: PortId, seed: &PortSeed) -> Self {
        Self {
            id,
            name: seed.name.to_string(),
            country: seed.country.to_string(),
            lat: seed.lat,
            lon: seed.lon,
            capacity: seed.capacity,
            current_load: 0,
            berths: seed.berths,
            available_berths: seed.berths,
            player_owned: false,
            docked_ships: Vec::new(),
            contracts: Vec::new(),
        }
    }

    /// The port's location on a shell of `radius`.
    pub fn position_at(&self, radius: f64) -> Vec3 {
        lat_lon_to_position(self.lat, self.lon, radius)
    }
}
