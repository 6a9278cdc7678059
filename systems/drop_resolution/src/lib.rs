#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Snap-to-nearest resolution for labels released on the map.
//!
//! The same resolution backs both the drag-over preview and the committed
//! drop, so a highlighted point is always the point that receives the label.

use city_quiz_core::{LatLng, Point, SnapThreshold};

/// Outcome of resolving a drop against the round targets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DropResolution<'a> {
    /// The drop landed within the threshold of `point`.
    Snapped {
        /// Target receiving the label.
        point: &'a Point,
        /// Distance from the drop to `point` in meters.
        distance: f64,
    },
    /// The drop was too far from every target.
    Missed {
        /// Closest target, absent only when there are no targets.
        nearest: Option<&'a Point>,
        /// Distance to `nearest` in meters, infinite without targets.
        distance: f64,
    },
}

impl<'a> DropResolution<'a> {
    /// Target receiving the label, if the drop snapped.
    #[must_use]
    pub fn point(&self) -> Option<&'a Point> {
        match self {
            Self::Snapped { point, .. } => Some(*point),
            Self::Missed { .. } => None,
        }
    }
}

/// Finds the target closest to `coordinate` together with its distance in meters.
///
/// Ties resolve to the first target in iteration order.
#[must_use]
pub fn nearest(coordinate: LatLng, targets: &[Point]) -> Option<(&Point, f64)> {
    let mut best: Option<(&Point, f64)> = None;
    for target in targets {
        let distance = coordinate.distance_to(target.location());
        match best {
            Some((_, closest)) if distance >= closest => {}
            _ => best = Some((target, distance)),
        }
    }
    best
}

/// Resolves a drop at `coordinate`, accepting the nearest target strictly inside `threshold`.
#[must_use]
pub fn resolve(
    coordinate: LatLng,
    targets: &[Point],
    threshold: SnapThreshold,
) -> DropResolution<'_> {
    match nearest(coordinate, targets) {
        Some((point, distance)) if threshold.admits(distance) => {
            DropResolution::Snapped { point, distance }
        }
        Some((point, distance)) => DropResolution::Missed {
            nearest: Some(point),
            distance,
        },
        None => DropResolution::Missed {
            nearest: None,
            distance: f64::INFINITY,
        },
    }
}

/// Returns the target a drop at `coordinate` snaps to, if any.
#[must_use]
pub fn resolve_drop(
    coordinate: LatLng,
    targets: &[Point],
    threshold: SnapThreshold,
) -> Option<&Point> {
    resolve(coordinate, targets, threshold).point()
}
