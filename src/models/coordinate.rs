//! Resolved coordinates and the id → coordinate accumulator.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

/// Geographic point (lat/lng)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lng)
    }
}

/// Insertion-ordered map from record id to coordinate.
///
/// A repeated id overwrites the stored coordinate but keeps the position of
/// its first insertion. Entries are never removed.
#[derive(Debug, Clone, Default)]
pub struct ResultMap {
    entries: Vec<(String, Coordinate)>,
    /// id → index into `entries`
    positions: HashMap<String, usize>,
}

impl ResultMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: String, coordinate: Coordinate) {
        match self.positions.get(&id) {
            Some(&idx) => self.entries[idx].1 = coordinate,
            None => {
                self.positions.insert(id.clone(), self.entries.len());
                self.entries.push((id, coordinate));
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Coordinate> {
        self.positions.get(id).map(|&idx| &self.entries[idx].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Coordinate)> {
        self.entries.iter().map(|(id, c)| (id.as_str(), c))
    }
}

impl Serialize for ResultMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, coordinate) in &self.entries {
            map.serialize_entry(id, coordinate)?;
        }
        map.end()
    }
}
