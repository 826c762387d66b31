//! Land/ocean classification.
//!
//! The route planner and movement integrator only ever ask two questions:
//! "is this position over water?" and "where is the closest water?". Both
//! live behind [`WaterMap`] so a real coastline dataset can replace the
//! coarse rectangles shipped here.

use crate::geo::{lat_lon_to_position, position_to_lat_lon, Vec3};

/// Degrees between rings in the nearest-water search.
const SEARCH_RING_STEP_DEG: f64 = 1.0;
/// Rings searched before giving up (≈ 45° of arc).
const SEARCH_MAX_RINGS: u32 = 45;
/// Bearings tried per ring.
const SEARCH_BEARINGS: u32 = 16;

/// Classifies positions on the globe as land or water.
pub trait WaterMap: Send + Sync {
    /// True when `pos` (at any radius) lies over open water.
    fn is_over_water(&self, pos: Vec3) -> bool;

    /// Closest water position to `pos` at the same radius.
    ///
    /// The default is a bounded ring search around `pos`. If nothing is
    /// found the input is returned unchanged.
    fn nearest_water(&self, pos: Vec3) -> Vec3 {
        if self.is_over_water(pos) {
            return pos;
        }
        let radius = pos.length();
        let (lat, lon) = position_to_lat_lon(pos);

        for ring in 1..=SEARCH_MAX_RINGS {
            let offset = ring as f64 * SEARCH_RING_STEP_DEG;
            for b in 0..SEARCH_BEARINGS {
                let bearing = (b as f64 / SEARCH_BEARINGS as f64) * std::f64::consts::TAU;
                let cand_lat = (lat + offset * bearing.cos()).clamp(-89.9, 89.9);
                let cand_lon = wrap_longitude(lon + offset * bearing.sin());
                let candidate = lat_lon_to_position(cand_lat, cand_lon, radius);
                if self.is_over_water(candidate) {
                    return candidate;
                }
            }
        }
        pos
    }
}

/// Wrap a longitude into `(-180, 180]`.
pub fn wrap_longitude(lon: f64) -> f64 {
    let mut l = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if l <= -180.0 {
        l += 360.0;
    }
    l
}

/// A world with no land at all. Handy for tests and for air-only games.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenOcean;

impl WaterMap for OpenOcean {
    fn is_over_water(&self, _pos: Vec3) -> bool {
        true
    }
}

/// Axis-aligned latitude/longitude box marking land.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandRect {
    pub name: &'static str,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl LandRect {
    pub const fn new(
        name: &'static str,
        lat_min: f64,
        lat_max: f64,
        lon_min: f64,
        lon_max: f64,
    ) -> Self {
        Self {
            name,
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.lat_min && lat <= self.lat_max && lon >= self.lon_min && lon <= self.lon_max
    }
}

/// Coarse continental interiors. Coastlines are deliberately left as water
/// so every catalogue port sits on the ocean.
pub const CONTINENTS: &[LandRect] = &[
    LandRect::new("North America", 30.0, 50.0, -115.0, -80.0),
    LandRect::new("Canada", 50.0, 70.0, -140.0, -60.0),
    LandRect::new("Greenland", 60.0, 82.0, -55.0, -20.0),
    LandRect::new("South America North", -22.0, 5.0, -78.0, -40.0),
    LandRect::new("South America South", -50.0, -22.0, -72.0, -52.0),
    LandRect::new("North Africa", 0.0, 30.0, -10.0, 32.0),
    LandRect::new("Southern Africa", -30.0, 0.0, 12.0, 38.0),
    LandRect::new("Europe", 43.0, 60.0, 6.0, 40.0),
    LandRect::new("Scandinavia", 60.0, 70.0, 10.0, 40.0),
    LandRect::new("Arabia", 15.0, 30.0, 38.0, 54.0),
    LandRect::new("Central Asia", 30.0, 50.0, 40.0, 118.0),
    LandRect::new("Siberia", 50.0, 75.0, 40.0, 180.0),
    LandRect::new("South Asia", 10.0, 30.0, 75.0, 110.0),
    LandRect::new("Australia", -38.0, -12.0, 115.0, 150.0),
    LandRect::new("Antarctica", -90.0, -70.0, -180.0, 180.0),
];

/// Water map backed by lat/lon land rectangles.
#[derive(Debug, Clone)]
pub struct RectLandMap {
    rects: Vec<LandRect>,
}

impl RectLandMap {
    pub fn new(rects: Vec<LandRect>) -> Self {
        Self { rects }
    }

    /// The built-in coarse continent set.
    pub fn earth() -> Self {
        Self::new(CONTINENTS.to_vec())
    }

    pub fn rects(&self) -> &[LandRect] {
        &self.rects
    }

    /// Name of the landmass covering `pos`, if any.
    pub fn landmass_at(&self, pos: Vec3) -> Option<&'static str> {
        let (lat, lon) = position_to_lat_lon(pos);
        self.rects
            .iter()
            .find(|r| r.contains(lat, lon))
            .map(|r| r.name)
    }
}

impl Default for RectLandMap {
    fn default() -> Self {
        Self::earth()
    }
}

impl WaterMap for RectLandMap {
    fn is_over_water(&self, pos: Vec3) -> bool {
        self.landmass_at(pos).is_none()
    }
}
