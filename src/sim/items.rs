//! Shopping-list item placement
//!
//! Items are hidden on pellet cells chosen by a seeded shuffle, so the same
//! seed always produces the same store layout.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::grid::{CellKind, TileGrid};
use super::state::RngState;
use crate::error::PlacementError;

/// Which item label sits on which cell
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<PlacedItem>", into = "Vec<PlacedItem>")]
pub struct ItemPlacement {
    labels: BTreeMap<(i32, i32), String>,
}

/// Serialized form of one placement entry (JSON map keys must be strings)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedItem {
    pub col: i32,
    pub row: i32,
    pub label: String,
}

impl From<Vec<PlacedItem>> for ItemPlacement {
    fn from(items: Vec<PlacedItem>) -> Self {
        Self {
            labels: items
                .into_iter()
                .map(|item| ((item.col, item.row), item.label))
                .collect(),
        }
    }
}

impl From<ItemPlacement> for Vec<PlacedItem> {
    fn from(placement: ItemPlacement) -> Self {
        placement
            .labels
            .into_iter()
            .map(|((col, row), label)| PlacedItem { col, row, label })
            .collect()
    }
}

impl ItemPlacement {
    /// Shuffle the grid's pellet cells and hide one label on each of the
    /// first `labels.len()` of them. Chosen cells become special items.
    pub fn place(
        grid: &mut TileGrid,
        labels: &[String],
        rng_state: &RngState,
    ) -> Result<Self, PlacementError> {
        let mut candidates: Vec<(i32, i32)> = grid.cells_of(CellKind::Pellet).collect();
        if labels.len() > candidates.len() {
            return Err(PlacementError::NotEnoughCells {
                requested: labels.len(),
                available: candidates.len(),
            });
        }

        let mut rng = rng_state.to_rng();
        candidates.shuffle(&mut rng);

        let mut placement = Self::default();
        for (label, &(col, row)) in labels.iter().zip(candidates.iter()) {
            // Candidates came from the grid itself, so they are in bounds
            if let Ok(true) = grid.promote_to_special(col, row) {
                log::debug!("Hid '{}' at ({}, {})", label, col, row);
                placement.labels.insert((col, row), label.clone());
            }
        }

        Ok(placement)
    }

    /// Label hidden at a cell, if any
    pub fn label_at(&self, col: i32, row: i32) -> Option<&str> {
        self.labels.get(&(col, row)).map(String::as_str)
    }

    /// Take the label off a cell once collected
    pub fn take(&mut self, col: i32, row: i32) -> Option<String> {
        self.labels.remove(&(col, row))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(i32, i32), &String)> {
        self.labels.iter()
    }
}
