//! Address Module
//!
//! Value types for the physical warehouse addressing scheme.
//!
//! A full address is the exact concatenation `street + shelf + side + position`,
//! with no separators. Each component is validated at construction so that a
//! `full_address` derived from parsed components is always well-formed:
//! - street: two uppercase letters followed by one digit (e.g. `JA1`)
//! - shelf: one of the fixed levels `P1`..`P10`
//! - side: one of the fixed three-letter codes (`AEE`, `ADD`, `AFF`, `AGG`,
//!   `AHH`, `AII`, `AJJ`, `AKK`)
//! - position: zero-padded decimal string, two digits minimum (`01`, `02`, ...)

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static STREET_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2}[0-9]$").expect("street pattern is valid"));

/// Address component validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Street code does not match two uppercase letters + one digit
    InvalidStreet(String),
    /// Shelf level outside `P1`..`P10`
    InvalidShelf(String),
    /// Side code outside the fixed enumeration
    InvalidSide(String),
    /// Position is not a positive zero-padded decimal
    InvalidPosition(String),
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressError::InvalidStreet(s) => {
                write!(f, "Invalid street code '{s}': expected two uppercase letters and one digit")
            }
            AddressError::InvalidShelf(s) => {
                write!(f, "Invalid shelf level '{s}': expected P1..P10")
            }
            AddressError::InvalidSide(s) => {
                write!(f, "Invalid side code '{s}'")
            }
            AddressError::InvalidPosition(s) => {
                write!(f, "Invalid position '{s}': expected a zero-padded positive number")
            }
        }
    }
}

impl std::error::Error for AddressError {}

/// Street (aisle) code, fixed length 3: two uppercase letters + one digit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StreetCode(String);

impl StreetCode {
    /// Validate and wrap a street code.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::InvalidStreet` if the code does not match the
    /// two-letters-one-digit pattern.
    pub fn new(code: &str) -> Result<Self, AddressError> {
        if STREET_PATTERN.is_match(code) {
            Ok(StreetCode(code.to_string()))
        } else {
            Err(AddressError::InvalidStreet(code.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreetCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StreetCode {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StreetCode::new(s)
    }
}

impl TryFrom<String> for StreetCode {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StreetCode::new(&value)
    }
}

impl From<StreetCode> for String {
    fn from(value: StreetCode) -> Self {
        value.0
    }
}

/// Shelf level, `P1` through `P10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Shelf {
    P1,
    P2,
    P3,
    P4,
    P5,
    P6,
    P7,
    P8,
    P9,
    P10,
}

impl Shelf {
    /// All levels in ascending order.
    pub const ALL: [Shelf; 10] = [
        Shelf::P1,
        Shelf::P2,
        Shelf::P3,
        Shelf::P4,
        Shelf::P5,
        Shelf::P6,
        Shelf::P7,
        Shelf::P8,
        Shelf::P9,
        Shelf::P10,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Shelf::P1 => "P1",
            Shelf::P2 => "P2",
            Shelf::P3 => "P3",
            Shelf::P4 => "P4",
            Shelf::P5 => "P5",
            Shelf::P6 => "P6",
            Shelf::P7 => "P7",
            Shelf::P8 => "P8",
            Shelf::P9 => "P9",
            Shelf::P10 => "P10",
        }
    }
}

impl fmt::Display for Shelf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shelf {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Shelf::ALL
            .iter()
            .copied()
            .find(|shelf| shelf.as_str() == s)
            .ok_or_else(|| AddressError::InvalidShelf(s.to_string()))
    }
}

/// Side code, one of the fixed three-letter aisle-side labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "AEE")]
    Aee,
    #[serde(rename = "ADD")]
    Add,
    #[serde(rename = "AFF")]
    Aff,
    #[serde(rename = "AGG")]
    Agg,
    #[serde(rename = "AHH")]
    Ahh,
    #[serde(rename = "AII")]
    Aii,
    #[serde(rename = "AJJ")]
    Ajj,
    #[serde(rename = "AKK")]
    Akk,
}

impl Side {
    pub const ALL: [Side; 8] = [
        Side::Aee,
        Side::Add,
        Side::Aff,
        Side::Agg,
        Side::Ahh,
        Side::Aii,
        Side::Ajj,
        Side::Akk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Aee => "AEE",
            Side::Add => "ADD",
            Side::Aff => "AFF",
            Side::Agg => "AGG",
            Side::Ahh => "AHH",
            Side::Aii => "AII",
            Side::Ajj => "AJJ",
            Side::Akk => "AKK",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Side::ALL
            .iter()
            .copied()
            .find(|side| side.as_str() == s)
            .ok_or_else(|| AddressError::InvalidSide(s.to_string()))
    }
}

/// Slot position within a segment, stored zero-padded ("01", "02", ...).
///
/// Padding is two digits wide; positions past 99 keep their natural width.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Position(String);

impl Position {
    /// Build a position from its 1-based slot index.
    pub fn from_index(index: u32) -> Self {
        Position(format!("{index:02}"))
    }

    /// Validate and wrap an existing position string.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::InvalidPosition` if the string is not a
    /// zero-padded positive decimal of width >= 2.
    pub fn new(position: &str) -> Result<Self, AddressError> {
        let valid = position.len() >= 2
            && position.chars().all(|c| c.is_ascii_digit())
            && position.parse::<u32>().map(|n| n > 0).unwrap_or(false);
        if valid {
            Ok(Position(position.to_string()))
        } else {
            Err(AddressError::InvalidPosition(position.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric slot index (1-based).
    pub fn index(&self) -> u32 {
        // Validated at construction to be a positive decimal.
        self.0.parse().unwrap_or(0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Position {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Position::new(&value)
    }
}

impl From<Position> for String {
    fn from(value: Position) -> Self {
        value.0
    }
}

/// Compose the full slot address: exact concatenation, no separators.
pub fn full_address(street: &StreetCode, shelf: Shelf, side: Side, position: &Position) -> String {
    format!("{street}{shelf}{side}{position}")
}
