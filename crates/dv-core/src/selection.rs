//! Shared selection state
//!
//! The dashboard has one [`SelectionStore`]. Every view reads it; only the
//! dashboard writes it, through [`SelectionStore::select`] and
//! [`SelectionStore::clear`].

use std::sync::Arc;
use parking_lot::RwLock;

use crate::country::CountryId;

/// What is currently selected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub country: Option<CountryId>,
    pub year: Option<i32>,
}

impl SelectionState {
    pub fn is_empty(&self) -> bool {
        self.country.is_none() && self.year.is_none()
    }

    /// Apply a click on `target`: re-clicking the current value clears the
    /// facet, anything else replaces it.
    pub fn toggled(self, target: SelectionTarget) -> Self {
        match target {
            SelectionTarget::Country(id) => Self {
                country: if self.country == Some(id) { None } else { Some(id) },
                ..self
            },
            SelectionTarget::Year(year) => Self {
                year: if self.year == Some(year) { None } else { Some(year) },
                ..self
            },
        }
    }
}

/// A clickable entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionTarget {
    Country(CountryId),
    Year(i32),
}

/// Result of a selection transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChange {
    pub previous: SelectionState,
    pub current: SelectionState,
}

impl SelectionChange {
    pub fn country_changed(&self) -> bool {
        self.previous.country != self.current.country
    }

    pub fn year_changed(&self) -> bool {
        self.previous.year != self.current.year
    }

    pub fn is_noop(&self) -> bool {
        self.previous == self.current
    }
}

/// Holder of the process-wide selection
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    state: Arc<RwLock<SelectionState>>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current selection
    pub fn current(&self) -> SelectionState {
        *self.state.read()
    }

    /// Toggle the facet addressed by `target`
    pub fn select(&self, target: SelectionTarget) -> SelectionChange {
        let mut state = self.state.write();
        let previous = *state;
        *state = previous.toggled(target);
        let change = SelectionChange { previous, current: *state };
        drop(state);

        tracing::debug!("Selection {:?} -> {:?}", change.previous, change.current);
        change
    }

    /// Reset to the global (unfiltered) view
    pub fn clear(&self) -> SelectionChange {
        let mut state = self.state.write();
        let previous = *state;
        *state = SelectionState::default();
        SelectionChange { previous, current: *state }
    }
}
