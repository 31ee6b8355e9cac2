use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cardinal_direction::CardinalDirection;
use crate::tools::math::{polar_degrees, polar_radians};

/// Standard eastward (U) and northward (V) wind components in m/s
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindVector {
    pub u: f64,
    pub v: f64,
}

impl WindVector {
    pub fn new(u: f64, v: f64) -> WindVector {
        WindVector { u, v }
    }

    /// Builds the standard components from the sonic's native axis pair.
    ///
    /// Gill WindSonics report the first axis with the opposite sign to the eastward
    /// convention (see the WindSonic manual), so U is the negated first axis and V is the
    /// second axis unchanged. This is the only place the inversion happens.
    pub fn from_gill_axes(axis1_raw: f64, axis2_raw: f64) -> WindVector {
        WindVector {
            u: -axis1_raw,
            v: axis2_raw,
        }
    }

    /// Speed and direction in degrees, direction in [0, 360)
    pub fn polar(&self) -> PolarWind {
        let (speed, direction) = polar_degrees(self.u, self.v);
        PolarWind { speed, direction }
    }

    /// Speed and the raw atan2 angle in radians, no normalization applied
    pub fn polar_radians(&self) -> (f64, f64) {
        polar_radians(self.u, self.v)
    }

    pub fn is_missing(&self) -> bool {
        self.u.is_nan() || self.v.is_nan()
    }
}

/// Speed and direction of a wind vector. `direction` is the mathematical angle of the
/// vector, counterclockwise from east.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolarWind {
    pub speed: f64,
    pub direction: f64,
}

impl PolarWind {
    /// Compass bearing the vector points toward, clockwise from north in [0, 360)
    pub fn bearing(&self) -> f64 {
        (90.0 - self.direction).rem_euclid(360.0)
    }

    /// Compass point of [`PolarWind::bearing`]
    pub fn cardinal_direction(&self) -> CardinalDirection {
        CardinalDirection::from_degrees(self.bearing())
    }
}

impl fmt::Display for PolarWind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.1} m/s @ {:.1}° {}", self.speed, self.direction, self.cardinal_direction())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_inversion() {
        let wind = WindVector::from_gill_axes(2.03, 0.64);
        assert_eq!(wind.u, -2.03);
        assert_eq!(wind.v, 0.64);

        let wind = WindVector::from_gill_axes(-1.5, -0.25);
        assert_eq!(wind.u, 1.5);
        assert_eq!(wind.v, -0.25);
    }

    #[test]
    fn test_polar_from_gill_axes() {
        let polar = WindVector::from_gill_axes(2.03, 0.64).polar();
        assert!((polar.speed - (2.03f64.powi(2) + 0.64f64.powi(2)).sqrt()).abs() < 1e-12);
        assert!((polar.direction - 162.5).abs() < 0.01);
        assert!((polar.bearing() - 287.5).abs() < 0.01);
        assert_eq!(polar.cardinal_direction(), CardinalDirection::WestNorthWest);
    }

    #[test]
    fn test_missing_component_propagates() {
        let wind = WindVector::from_gill_axes(f64::NAN, 1.0);
        assert!(wind.is_missing());
        let polar = wind.polar();
        assert!(polar.speed.is_nan());
        assert!(polar.direction.is_nan());
        assert_eq!(polar.cardinal_direction(), CardinalDirection::Invalid);
    }

    #[test]
    fn test_display() {
        let polar = WindVector::new(0.0, 2.0).polar();
        assert_eq!(polar.to_string(), "2.0 m/s @ 90.0° n");
    }

    #[test]
    fn test_compass_points() {
        let point = |u: f64, v: f64| WindVector::new(u, v).polar().cardinal_direction();
        assert_eq!(point(0.0, 5.0), CardinalDirection::North);
        assert_eq!(point(5.0, 0.0), CardinalDirection::East);
        assert_eq!(point(0.0, -5.0), CardinalDirection::South);
        assert_eq!(point(-5.0, 0.0), CardinalDirection::West);
        assert_eq!(point(1.0, 1.0), CardinalDirection::NorthEast);
        assert_eq!(point(-1.0, -1.0), CardinalDirection::SouthWest);
    }
}
