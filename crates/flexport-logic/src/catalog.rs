//! Static game data - ship classes, the port list, cargo types, rival names.

use serde::{Deserialize, Serialize};

use crate::geo::{AIR_ALTITUDE, SEA_ALTITUDE};

// ── Ships ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipType {
    Container,
    Bulk,
    Tanker,
    CargoPlane,
}

/// Purchase-time attributes of a ship class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipSpec {
    /// Purchase price in dollars.
    pub price: f64,
    /// Hold size in containers.
    pub capacity: u32,
    /// World units per second.
    pub speed: f64,
    /// Fuel tank size in world units of travel.
    pub fuel_capacity: f64,
}

impl ShipType {
    pub fn all() -> &'static [ShipType] {
        &[
            ShipType::Container,
            ShipType::Bulk,
            ShipType::Tanker,
            ShipType::CargoPlane,
        ]
    }

    pub fn spec(&self) -> ShipSpec {
        match self {
            ShipType::Container => ShipSpec {
                price: 20_000_000.0,
                capacity: 200,
                speed: 2.0,
                fuel_capacity: 2_000.0,
            },
            ShipType::Bulk => ShipSpec {
                price: 15_000_000.0,
                capacity: 150,
                speed: 1.8,
                fuel_capacity: 2_200.0,
            },
            ShipType::Tanker => ShipSpec {
                price: 25_000_000.0,
                capacity: 180,
                speed: 1.6,
                fuel_capacity: 2_500.0,
            },
            ShipType::CargoPlane => ShipSpec {
                price: 40_000_000.0,
                capacity: 40,
                speed: 8.0,
                fuel_capacity: 900.0,
            },
        }
    }

    pub fn is_air(&self) -> bool {
        matches!(self, ShipType::CargoPlane)
    }

    /// Height of this vessel's shell above the globe.
    pub fn altitude(&self) -> f64 {
        if self.is_air() {
            AIR_ALTITUDE
        } else {
            SEA_ALTITUDE
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShipType::Container => "Container Ship",
            ShipType::Bulk => "Bulk Carrier",
            ShipType::Tanker => "Tanker",
            ShipType::CargoPlane => "Cargo Plane",
        }
    }
}

// ── Ports ───────────────────────────────────────────────────────────────

/// A real-world port as it appears in the catalogue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortSeed {
    pub name: &'static str,
    pub country: &'static str,
    pub lat: f64,
    pub lon: f64,
    /// Container throughput capacity.
    pub capacity: u32,
    pub berths: u32,
}

const fn port(
    name: &'static str,
    country: &'static str,
    lat: f64,
    lon: f64,
    capacity: u32,
    berths: u32,
) -> PortSeed {
    PortSeed {
        name,
        country,
        lat,
        lon,
        capacity,
        berths,
    }
}

/// Index into [`PORTS`] of the player's starting port.
pub const PLAYER_HOME_PORT: usize = 3;

pub const PORTS: &[PortSeed] = &[
    port("Shanghai", "China", 31.23, 121.47, 47_000, 20),
    port("Singapore", "Singapore", 1.29, 103.85, 37_000, 18),
    port("Rotterdam", "Netherlands", 51.92, 4.48, 15_000, 14),
    port("Los Angeles", "United States", 33.74, -118.27, 9_000, 12),
    port("Dubai", "United Arab Emirates", 25.01, 55.06, 14_000, 12),
    port("Hong Kong", "China", 22.29, 114.16, 18_000, 14),
    port("Busan", "South Korea", 35.10, 129.04, 22_000, 14),
    port("New York", "United States", 40.68, -74.04, 7_500, 10),
    port("Santos", "Brazil", -23.96, -46.33, 4_300, 8),
    port("Cape Town", "South Africa", -33.92, 18.42, 1_000, 6),
    port("Sydney", "Australia", -33.86, 151.21, 2_600, 6),
    port("Mumbai", "India", 18.95, 72.84, 5_000, 8),
];

// ── Cargo ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CargoType {
    Electronics,
    Textiles,
    Machinery,
    Food,
    Chemicals,
    Automobiles,
    RawMaterials,
    Oil,
}

impl CargoType {
    pub fn all() -> &'static [CargoType] {
        &[
            CargoType::Electronics,
            CargoType::Textiles,
            CargoType::Machinery,
            CargoType::Food,
            CargoType::Chemicals,
            CargoType::Automobiles,
            CargoType::RawMaterials,
            CargoType::Oil,
        ]
    }

    /// Payment multiplier relative to bulk goods.
    pub fn value_factor(&self) -> f64 {
        match self {
            CargoType::Electronics => 1.6,
            CargoType::Automobiles => 1.4,
            CargoType::Machinery => 1.3,
            CargoType::Chemicals => 1.2,
            CargoType::Oil => 1.1,
            CargoType::Textiles => 1.0,
            CargoType::Food => 0.9,
            CargoType::RawMaterials => 0.8,
        }
    }

    /// Tonnes per container.
    pub fn container_weight(&self) -> f64 {
        match self {
            CargoType::Electronics | CargoType::Textiles => 12.0,
            CargoType::Food | CargoType::Automobiles => 18.0,
            CargoType::Machinery | CargoType::Chemicals => 22.0,
            CargoType::RawMaterials | CargoType::Oil => 26.0,
        }
    }
}

// ── Names ───────────────────────────────────────────────────────────────

pub const CLIENT_NAMES: &[&str] = &[
    "Pacific Traders",
    "Global Electronics Co",
    "Nordic Timber",
    "Andes Mining",
    "Sahara Textiles",
    "Bengal Foods",
    "Rhine Chemicals",
    "Tokyo Motors",
    "Cape Minerals",
    "Atlantic Grain",
];

/// (name, display colour) for AI shipping companies, in spawn order.
pub const COMPETITORS: &[(&str, &str)] = &[
    ("Maersk AI", "#2d9cdb"),
    ("COSCO Neural", "#eb5757"),
    ("MSC Quantum", "#f2c94c"),
    ("Evergreen Mind", "#27ae60"),
    ("CMA Logic", "#9b51e0"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{lat_lon_to_position, shell_radius};
    use crate::water::{RectLandMap, WaterMap};

    #[test]
    fn test_every_port_is_on_water() {
        let map = RectLandMap::earth();
        for p in PORTS {
            let pos = lat_lon_to_position(p.lat, p.lon, shell_radius(SEA_ALTITUDE));
            assert!(map.is_over_water(pos), "{} sits on land", p.name);
        }
    }

    #[test]
    fn test_port_names_unique() {
        for (i, a) in PORTS.iter().enumerate() {
            for b in &PORTS[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn test_home_port_in_range() {
        assert!(PLAYER_HOME_PORT < PORTS.len());
        assert_eq!(PORTS[PLAYER_HOME_PORT].name, "Los Angeles");
    }

    #[test]
    fn test_ship_specs_sane() {
        for t in ShipType::all() {
            let s = t.spec();
            assert!(s.price > 0.0);
            assert!(s.capacity > 0);
            assert!(s.speed > 0.0);
        }
        assert_eq!(ShipType::Container.spec().price, 20_000_000.0);
        assert!(ShipType::CargoPlane.altitude() > ShipType::Tanker.altitude());
    }
}
