use std::fmt;

use serde::{Deserialize, Serialize};

/// Sixteen point compass rose used for the tower status display
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardinalDirection {
    #[serde(rename = "n")]
    North,
    #[serde(rename = "nne")]
    NorthNorthEast,
    #[serde(rename = "ne")]
    NorthEast,
    #[serde(rename = "ene")]
    EastNorthEast,
    #[serde(rename = "e")]
    East,
    #[serde(rename = "ese")]
    EastSouthEast,
    #[serde(rename = "se")]
    SouthEast,
    #[serde(rename = "sse")]
    SouthSouthEast,
    #[serde(rename = "s")]
    South,
    #[serde(rename = "ssw")]
    SouthSouthWest,
    #[serde(rename = "sw")]
    SouthWest,
    #[serde(rename = "wsw")]
    WestSouthWest,
    #[serde(rename = "w")]
    West,
    #[serde(rename = "wnw")]
    WestNorthWest,
    #[serde(rename = "nw")]
    NorthWest,
    #[serde(rename = "nnw")]
    NorthNorthWest,
    Invalid,
}

const ROSE: [CardinalDirection; 16] = [
    CardinalDirection::North,
    CardinalDirection::NorthNorthEast,
    CardinalDirection::NorthEast,
    CardinalDirection::EastNorthEast,
    CardinalDirection::East,
    CardinalDirection::EastSouthEast,
    CardinalDirection::SouthEast,
    CardinalDirection::SouthSouthEast,
    CardinalDirection::South,
    CardinalDirection::SouthSouthWest,
    CardinalDirection::SouthWest,
    CardinalDirection::WestSouthWest,
    CardinalDirection::West,
    CardinalDirection::WestNorthWest,
    CardinalDirection::NorthWest,
    CardinalDirection::NorthNorthWest,
];

impl CardinalDirection {
    /// Each point covers 22.5 degrees centred on its heading. NaN and anything outside
    /// [0, 360] is `Invalid`.
    pub fn from_degrees(degrees: f64) -> CardinalDirection {
        if !(0.0..=360.0).contains(&degrees) {
            return CardinalDirection::Invalid;
        }

        let sector = ((degrees + 11.25) / 22.5).floor() as usize % ROSE.len();
        ROSE[sector]
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            CardinalDirection::North => "n",
            CardinalDirection::NorthNorthEast => "nne",
            CardinalDirection::NorthEast => "ne",
            CardinalDirection::EastNorthEast => "ene",
            CardinalDirection::East => "e",
            CardinalDirection::EastSouthEast => "ese",
            CardinalDirection::SouthEast => "se",
            CardinalDirection::SouthSouthEast => "sse",
            CardinalDirection::South => "s",
            CardinalDirection::SouthSouthWest => "ssw",
            CardinalDirection::SouthWest => "sw",
            CardinalDirection::WestSouthWest => "wsw",
            CardinalDirection::West => "w",
            CardinalDirection::WestNorthWest => "wnw",
            CardinalDirection::NorthWest => "nw",
            CardinalDirection::NorthNorthWest => "nnw",
            CardinalDirection::Invalid => "",
        }
    }
}

impl fmt::Display for CardinalDirection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

#[cfg(test)]
mod tests {
    use super::CardinalDirection;

    #[test]
    fn test_from_degrees() {
        assert_eq!(CardinalDirection::from_degrees(0.0), CardinalDirection::North);
        assert_eq!(CardinalDirection::from_degrees(11.0), CardinalDirection::North);
        assert_eq!(CardinalDirection::from_degrees(12.0), CardinalDirection::NorthNorthEast);
        assert_eq!(CardinalDirection::from_degrees(90.0), CardinalDirection::East);
        assert_eq!(CardinalDirection::from_degrees(200.0), CardinalDirection::SouthSouthWest);
        assert_eq!(CardinalDirection::from_degrees(355.0), CardinalDirection::North);
        assert_eq!(CardinalDirection::from_degrees(360.0), CardinalDirection::North);
    }

    #[test]
    fn test_invalid_degrees() {
        assert_eq!(CardinalDirection::from_degrees(f64::NAN), CardinalDirection::Invalid);
        assert_eq!(CardinalDirection::from_degrees(-5.0), CardinalDirection::Invalid);
        assert_eq!(CardinalDirection::Invalid.to_string(), "");
    }
}
