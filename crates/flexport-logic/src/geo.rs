//! Sphere geometry - positions on the globe, arc distance, interpolation.
//!
//! The world is a sphere centred on the origin. Entities live on a *shell*
//! of radius `WORLD_RADIUS + altitude`; anything computed here that is meant
//! to be an entity position is projected back onto its shell.
//!
//! Coordinate convention: `y` points to the north pole, longitude 0 lies on
//! the `+x` axis and longitude grows toward `+z`.

use serde::{Deserialize, Serialize};

/// Radius of the globe in world units.
pub const WORLD_RADIUS: f64 = 100.0;

/// Shell altitude for sea vessels (and ports).
pub const SEA_ALTITUDE: f64 = 2.0;

/// Shell altitude for air cargo.
pub const AIR_ALTITUDE: f64 = 15.0;

/// 3D position vector
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn distance(&self, other: &Self) -> f64 {
        (*self - *other).length()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            *self * (1.0 / len)
        } else {
            Self::ZERO
        }
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl std::ops::Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl std::ops::Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// Shell radius for an entity flying/sailing at `altitude`.
pub fn shell_radius(altitude: f64) -> f64 {
    WORLD_RADIUS + altitude
}

/// Position for a latitude/longitude (degrees) at the given radius.
pub fn lat_lon_to_position(lat_deg: f64, lon_deg: f64, radius: f64) -> Vec3 {
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();
    Vec3::new(
        radius * lat.cos() * lon.cos(),
        radius * lat.sin(),
        radius * lat.cos() * lon.sin(),
    )
}

/// Latitude/longitude in degrees for a position at any radius.
pub fn position_to_lat_lon(pos: Vec3) -> (f64, f64) {
    let n = pos.normalize();
    let lat = n.y.clamp(-1.0, 1.0).asin().to_degrees();
    let lon = n.z.atan2(n.x).to_degrees();
    (lat, lon)
}

/// Project a position onto the shell of `radius`.
///
/// A zero vector has no direction; it is mapped to the point above
/// lat/lon (0, 0).
pub fn project_to_shell(pos: Vec3, radius: f64) -> Vec3 {
    let n = pos.normalize();
    if n == Vec3::ZERO {
        Vec3::new(radius, 0.0, 0.0)
    } else {
        n * radius
    }
}

/// Angle in radians between two positions as seen from the centre.
pub fn central_angle(a: Vec3, b: Vec3) -> f64 {
    let na = a.normalize();
    let nb = b.normalize();
    // atan2 form stays accurate for tiny and near-antipodal angles
    na.cross(&nb).length().atan2(na.dot(&nb))
}

/// Great-circle distance between two positions measured on `radius`.
pub fn surface_distance(a: Vec3, b: Vec3, radius: f64) -> f64 {
    central_angle(a, b) * radius
}

/// Any unit vector perpendicular to `n`.
fn any_perpendicular(n: Vec3) -> Vec3 {
    let helper = if n.y.abs() < 0.9 {
        Vec3::new(0.0, 1.0, 0.0)
    } else {
        Vec3::new(1.0, 0.0, 0.0)
    };
    n.cross(&helper).normalize()
}

/// Spherical interpolation from `a` to `b` by fraction `t`, on `radius`.
///
/// `t` is clamped to `[0, 1]`. Antipodal endpoints pick an arbitrary great
/// circle through both.
pub fn slerp(a: Vec3, b: Vec3, t: f64, radius: f64) -> Vec3 {
    let t = t.clamp(0.0, 1.0);
    let na = a.normalize();
    let nb = b.normalize();
    let angle = central_angle(na, nb);

    if angle < 1e-12 {
        return project_to_shell(nb, radius);
    }

    // Direction of travel in the plane of the great circle
    let tangent = if (std::f64::consts::PI - angle) < 1e-9 {
        any_perpendicular(na)
    } else {
        (nb - na * na.dot(&nb)).normalize()
    };

    let theta = angle * t;
    project_to_shell(na * theta.cos() + tangent * theta.sin(), radius)
}

/// Compass heading in radians (0 = north, clockwise) from `from` toward `to`
/// in the local tangent plane at `from`.
///
/// Purely derived for the rendering layer. Returns 0 at the poles or when
/// the two points coincide.
pub fn heading(from: Vec3, to: Vec3) -> f64 {
    let up = from.normalize();
    let pole = Vec3::new(0.0, 1.0, 0.0);
    let east = up.cross(&pole);
    if east.length() < 1e-12 {
        return 0.0;
    }
    let east = east.normalize();
    let north = east.cross(&up).normalize();
    let dir = to - from;
    let along_east = dir.dot(&east);
    let along_north = dir.dot(&north);
    if along_east.abs() < 1e-12 && along_north.abs() < 1e-12 {
        return 0.0;
    }
    let h = along_east.atan2(along_north);
    if h < 0.0 {
        h + std::f64::consts::TAU
    } else {
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_lat_lon_roundtrip() {
        let p = lat_lon_to_position(33.74, -118.27, 102.0);
        assert!((p.length() - 102.0).abs() < EPS);
        let (lat, lon) = position_to_lat_lon(p);
        assert!((lat - 33.74).abs() < 1e-9);
        assert!((lon + 118.27).abs() < 1e-9);
    }

    #[test]
    fn test_surface_distance_quarter_circle() {
        let a = lat_lon_to_position(0.0, 0.0, 100.0);
        let b = lat_lon_to_position(0.0, 90.0, 100.0);
        let d = surface_distance(a, b, 100.0);
        assert!((d - std::f64::consts::FRAC_PI_2 * 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_slerp_stays_on_shell() {
        let a = lat_lon_to_position(10.0, 20.0, 102.0);
        let b = lat_lon_to_position(-40.0, 150.0, 102.0);
        for i in 0..=10 {
            let p = slerp(a, b, i as f64 / 10.0, 102.0);
            assert!((p.length() - 102.0).abs() < 1e-9);
        }
        assert!(slerp(a, b, 1.0, 102.0).distance(&b) < 1e-9);
        assert!(slerp(a, b, 0.0, 102.0).distance(&a) < 1e-9);
    }

    #[test]
    fn test_slerp_halfway_is_equidistant() {
        let a = lat_lon_to_position(0.0, 0.0, 100.0);
        let b = lat_lon_to_position(0.0, 120.0, 100.0);
        let mid = slerp(a, b, 0.5, 100.0);
        let da = surface_distance(a, mid, 100.0);
        let db = surface_distance(mid, b, 100.0);
        assert!((da - db).abs() < 1e-6);
    }

    #[test]
    fn test_slerp_antipodal_does_not_blow_up() {
        let a = Vec3::new(100.0, 0.0, 0.0);
        let b = Vec3::new(-100.0, 0.0, 0.0);
        let mid = slerp(a, b, 0.5, 100.0);
        assert!(mid.x.is_finite() && mid.y.is_finite() && mid.z.is_finite());
        assert!((mid.length() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_project_zero_vector() {
        let p = project_to_shell(Vec3::ZERO, 50.0);
        assert!((p.length() - 50.0).abs() < EPS);
    }

    #[test]
    fn test_heading_cardinal_directions() {
        let origin = lat_lon_to_position(0.0, 0.0, 100.0);
        let north = lat_lon_to_position(1.0, 0.0, 100.0);
        let east = lat_lon_to_position(0.0, 1.0, 100.0);
        let south = lat_lon_to_position(-1.0, 0.0, 100.0);

        assert!(heading(origin, north).abs() < 1e-3);
        assert!((heading(origin, east) - std::f64::consts::FRAC_PI_2).abs() < 1e-3);
        assert!((heading(origin, south) - std::f64::consts::PI).abs() < 1e-3);
    }
}
