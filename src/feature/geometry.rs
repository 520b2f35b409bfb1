//! Minimal geometries and bounding envelopes
//!
//! Only enough geometry to aggregate bounds. There is no coordinate
//! reference system handling.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A planar coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Geometry value of a record attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Geometry {
    Point(Coord),
    LineString(Vec<Coord>),
    /// Exterior ring first, then holes
    Polygon(Vec<Vec<Coord>>),
}

impl Geometry {
    /// Whether every coordinate is a finite number
    pub fn is_finite(&self) -> bool {
        match self {
            Geometry::Point(c) => c.is_finite(),
            Geometry::LineString(coords) => coords.iter().all(Coord::is_finite),
            Geometry::Polygon(rings) => rings.iter().flatten().all(Coord::is_finite),
        }
    }

    /// Bounding envelope of all coordinates
    pub fn envelope(&self) -> Envelope {
        let mut envelope = Envelope::empty();
        match self {
            Geometry::Point(c) => envelope.expand_to(*c),
            Geometry::LineString(coords) => coords.iter().for_each(|c| envelope.expand_to(*c)),
            Geometry::Polygon(rings) => rings
                .iter()
                .flatten()
                .for_each(|c| envelope.expand_to(*c)),
        }
        envelope
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Geometry::Point(c) => write!(f, "POINT ({} {})", c.x, c.y),
            Geometry::LineString(coords) => write!(f, "LINESTRING ({} coords)", coords.len()),
            Geometry::Polygon(rings) => write!(f, "POLYGON ({} rings)", rings.len()),
        }
    }
}

/// Axis-aligned bounding box
///
/// An empty envelope has `min > max` on both axes and absorbs nothing when
/// included into another envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Envelope {
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn expand_to(&mut self, c: Coord) {
        self.min_x = self.min_x.min(c.x);
        self.min_y = self.min_y.min(c.y);
        self.max_x = self.max_x.max(c.x);
        self.max_y = self.max_y.max(c.y);
    }

    /// Grow this envelope to cover `other`
    pub fn include(&mut self, other: &Envelope) {
        if other.is_empty() {
            return;
        }
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("EMPTY");
        }
        write!(
            f,
            "[{}, {}] - [{}, {}]",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}
