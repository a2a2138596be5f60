//! Strongly-typed wrappers for simulation concepts
//!
//! Grid positions and content names get their own types so that coordinates,
//! pack names and message keys cannot be mixed up with plain integers and
//! strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell on the simulation grid
///
/// Coordinates are integers; the simulation never uses floating point so that
/// runs are reproducible bit for bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub fn new(x: i32, y: i32) -> Self {
        Pos { x, y }
    }

    /// Chebyshev distance (diagonal moves cost one step)
    pub fn distance(&self, other: Pos) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }

    /// The neighbouring cell one step closer to `target`
    pub fn step_toward(&self, target: Pos) -> Pos {
        Pos {
            x: self.x + (target.x - self.x).signum(),
            y: self.y + (target.y - self.y).signum(),
        }
    }

    /// Whether this cell lies inside a `width` x `height` grid
    pub fn in_bounds(&self, width: u32, height: u32) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as u32) < width && (self.y as u32) < height
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Name of a content pack served by an asset loader
///
/// Examples: "standard", "hardened"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentName(String);

impl ContentName {
    pub fn new(s: impl Into<String>) -> Self {
        ContentName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContentName {
    fn from(s: &str) -> Self {
        ContentName(s.to_string())
    }
}

impl Default for ContentName {
    fn default() -> Self {
        ContentName("standard".to_string())
    }
}
