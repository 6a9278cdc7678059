//! Authoritative placement store mapping round targets to guessed labels.

use std::collections::{BTreeMap, BTreeSet};

use city_quiz_core::{PlacementView, PointId};

/// Side effects of a single [`Placements::place`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlacementChange {
    /// Point the label occupied before moving, if it moved.
    pub vacated: Option<PointId>,
    /// Label that was overwritten at the destination, now unplaced.
    pub displaced: Option<String>,
}

/// Mapping from target point to the label currently placed on it.
///
/// A label occupies at most one point and a point holds at most one label.
#[derive(Clone, Debug, Default)]
pub struct Placements {
    entries: BTreeMap<PointId, String>,
}

impl Placements {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts `label` on `point`, lifting it from wherever it sat before and
    /// overwriting whatever `point` held.
    pub fn place(&mut self, point: PointId, label: impl Into<String>) -> PlacementChange {
        let label = label.into();
        let previous = self
            .entries
            .iter()
            .find_map(|(held_by, placed)| (*placed == label).then_some(*held_by));
        if let Some(previous) = previous {
            let _ = self.entries.remove(&previous);
        }

        let displaced = self.entries.insert(point, label);
        PlacementChange {
            vacated: previous.filter(|previous| *previous != point),
            displaced,
        }
    }

    /// Label placed on `point`, if any.
    #[must_use]
    pub fn get(&self, point: PointId) -> Option<&str> {
        self.entries.get(&point).map(String::as_str)
    }

    /// Number of occupied points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no label has been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every placement.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Labels currently on the map.
    #[must_use]
    pub fn placed_labels(&self) -> BTreeSet<&str> {
        self.view().placed_labels()
    }

    /// Read-only view handed to systems and adapters.
    #[must_use]
    pub fn view(&self) -> PlacementView<'_> {
        PlacementView::new(&self.entries)
    }
}
