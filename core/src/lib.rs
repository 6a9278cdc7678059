#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the City Quiz engine.
//!
//! This crate defines the reference data and the message surface that
//! connect adapters, the authoritative world, and pure systems. Adapters
//! submit [`Command`] values describing user interactions, the world
//! executes those commands via its `apply` entry point, and then broadcasts
//! [`Event`] values describing the resulting state changes. Systems are pure
//! functions over the immutable types declared here.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of points drawn into a round when the region is large enough.
pub const DEFAULT_ROUND_SIZE: usize = 10;

/// Mean Earth radius used for great-circle distances, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Discards the current session and starts over in the provided region.
    ActivateRegion {
        /// Region that becomes active.
        region: Region,
        /// First round, drawn from `region`.
        round: Round,
    },
    /// Replaces the current round and its placements within the active region.
    BeginRound {
        /// Round drawn from the active region.
        round: Round,
    },
    /// Previews where a dragged label would snap without committing it.
    HoverLabel {
        /// Geographic location currently under the pointer.
        coordinate: LatLng,
    },
    /// Signals that the drag left the map, clearing any preview.
    LeaveMap,
    /// Releases a label on the map, committing the placement if it snaps.
    DropLabel {
        /// Label that was dragged.
        label: String,
        /// Geographic location where the label was released.
        coordinate: LatLng,
    },
    /// Requests that the round be scored and finished.
    CheckAnswers,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that a new session started in the provided region.
    RegionActivated {
        /// Short code of the region.
        code: String,
        /// Display name of the region.
        name: String,
        /// Map viewport the presentation layer should show.
        viewport: Viewport,
    },
    /// Announces that a new round is being played.
    RoundStarted {
        /// Identifiers of the round targets in round order.
        targets: Vec<PointId>,
        /// Shuffled labels the player has to place.
        label_order: Vec<String>,
    },
    /// Reports that a round could not be started.
    RoundRejected {
        /// Specific reason the round was refused.
        reason: RoundRejection,
    },
    /// Reports that the previewed point changed.
    HighlightChanged {
        /// Point that would receive the dragged label, if any.
        point: Option<PointId>,
    },
    /// Confirms that a label now occupies a point.
    LabelPlaced {
        /// Label that was placed.
        label: String,
        /// Point now holding the label.
        point: PointId,
        /// Point the label occupied before the move, if any.
        vacated: Option<PointId>,
        /// Label previously held by `point` that became unplaced, if any.
        displaced: Option<String>,
    },
    /// Reports that a drop landed too far from every target.
    DropMissed {
        /// Label that was dropped.
        label: String,
        /// Closest target to the drop location.
        nearest: Option<PointId>,
        /// Distance to `nearest` in meters.
        distance: f64,
    },
    /// Reports that a drop was refused before distance resolution.
    DropRejected {
        /// Label that was dropped.
        label: String,
        /// Specific reason the drop was refused.
        reason: DropRejection,
    },
    /// Reports that answers could not be checked.
    CheckRejected {
        /// Specific reason the check was refused.
        reason: CheckRejection,
    },
    /// Announces that the round was scored.
    RoundFinished {
        /// Number of correctly placed labels.
        score: u32,
        /// Number of targets in the round.
        total: u32,
    },
}

/// Stage of the quiz session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No region has been chosen yet.
    #[default]
    Idle,
    /// The player is placing labels.
    Playing,
    /// The round has been scored.
    Finished,
}

/// Reasons a round may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum RoundRejection {
    /// No region is active, so there is nothing to draw a round from.
    #[error("no region is active")]
    NoActiveRegion,
    /// The round contains a point that does not belong to the region.
    #[error("point {point} does not belong to the active region")]
    ForeignTarget {
        /// Offending point.
        point: PointId,
    },
}

/// Reasons a drop may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum DropRejection {
    /// The session is not accepting placements.
    #[error("labels can only be placed while playing")]
    NotPlaying,
    /// The label is not part of the current round.
    #[error("label is not part of the current round")]
    UnknownLabel,
}

/// Reasons a check request may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum CheckRejection {
    /// The session is not in the playing phase.
    #[error("answers can only be checked while playing")]
    NotPlaying,
    /// Some targets are still empty.
    #[error("{placed} of {required} targets have a label")]
    Incomplete {
        /// Number of targets holding a label.
        placed: usize,
        /// Number of targets in the round.
        required: usize,
    },
}

/// Unique identifier of a point within its region.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PointId(u32);

impl PointId {
    /// Creates a new point identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Geographic coordinate in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    lat: f64,
    lng: f64,
}

impl LatLng {
    /// Creates a coordinate from latitude and longitude in degrees.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitude in degrees, positive north.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees, positive east.
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.lng
    }

    /// Reports whether both components are finite and within range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Great-circle distance to `other` in meters using the haversine formula.
    #[must_use]
    pub fn distance_to(self, other: LatLng) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let sin_dlat = ((other.lat - self.lat).to_radians() / 2.0).sin();
        let sin_dlng = ((other.lng - self.lng).to_radians() / 2.0).sin();
        let a = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlng * sin_dlng;
        let a = a.min(1.0);
        2.0 * EARTH_RADIUS_METERS * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

/// Named geographic location used as a quiz target.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    id: PointId,
    name: String,
    location: LatLng,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub fn new(id: PointId, name: impl Into<String>, location: LatLng) -> Self {
        Self {
            id,
            name: name.into(),
            location,
        }
    }

    /// Identifier of the point, unique within its region.
    #[must_use]
    pub const fn id(&self) -> PointId {
        self.id
    }

    /// Name of the point, unique within its region.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Geographic location of the point.
    #[must_use]
    pub const fn location(&self) -> LatLng {
        self.location
    }
}

/// Initial map framing for a region.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    center: LatLng,
    zoom: u8,
}

impl Viewport {
    /// Creates a viewport centred on `center` at the provided zoom level.
    #[must_use]
    pub const fn new(center: LatLng, zoom: u8) -> Self {
        Self { center, zoom }
    }

    /// Centre of the map.
    #[must_use]
    pub const fn center(&self) -> LatLng {
        self.center
    }

    /// Zoom level of the map.
    #[must_use]
    pub const fn zoom(&self) -> u8 {
        self.zoom
    }
}

/// Maximum distance between a drop and a point for the drop to snap.
///
/// Drops are accepted strictly below the threshold; a drop at exactly the
/// threshold distance misses.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct SnapThreshold(f64);

impl SnapThreshold {
    /// Creates a threshold from meters, refusing non-finite or non-positive values.
    #[must_use]
    pub fn from_meters(meters: f64) -> Option<Self> {
        (meters.is_finite() && meters > 0.0).then_some(Self(meters))
    }

    /// Creates a threshold from kilometers.
    #[must_use]
    pub fn from_kilometers(kilometers: f64) -> Option<Self> {
        Self::from_meters(kilometers * 1_000.0)
    }

    /// Threshold distance in meters.
    #[must_use]
    pub const fn meters(&self) -> f64 {
        self.0
    }

    /// Reports whether a drop `distance` meters away is close enough to snap.
    #[must_use]
    pub fn admits(&self, distance: f64) -> bool {
        distance < self.0
    }
}

/// Problems detected while assembling a region.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegionError {
    /// The region has no points to quiz on.
    #[error("region `{code}` has no points")]
    Empty {
        /// Region code.
        code: String,
    },
    /// Two points share an identifier.
    #[error("region `{code}` lists point {id} more than once")]
    DuplicateId {
        /// Region code.
        code: String,
        /// Repeated identifier.
        id: PointId,
    },
    /// Two points share a name.
    #[error("region `{code}` lists the name `{name}` more than once")]
    DuplicateName {
        /// Region code.
        code: String,
        /// Repeated name.
        name: String,
    },
    /// A point lies outside valid latitude/longitude ranges.
    #[error("region `{code}` has an invalid coordinate for point {id}")]
    InvalidCoordinate {
        /// Region code.
        code: String,
        /// Offending point.
        id: PointId,
    },
}

/// Named set of points with its map framing and snap threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    code: String,
    name: String,
    points: Vec<Point>,
    viewport: Viewport,
    snap_threshold: SnapThreshold,
}

impl Region {
    /// Assembles a region, validating that its points are non-empty and unique.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        points: Vec<Point>,
        viewport: Viewport,
        snap_threshold: SnapThreshold,
    ) -> Result<Self, RegionError> {
        let code = code.into();
        if points.is_empty() {
            return Err(RegionError::Empty { code });
        }

        let mut ids = BTreeSet::new();
        let mut names = BTreeSet::new();
        for point in &points {
            if !point.location().is_valid() {
                return Err(RegionError::InvalidCoordinate {
                    code,
                    id: point.id(),
                });
            }
            if !ids.insert(point.id()) {
                return Err(RegionError::DuplicateId {
                    code,
                    id: point.id(),
                });
            }
            if !names.insert(point.name()) {
                return Err(RegionError::DuplicateName {
                    code,
                    name: point.name().to_owned(),
                });
            }
        }

        Ok(Self {
            code,
            name: name.into(),
            points,
            viewport,
            snap_threshold,
        })
    }

    /// Short code identifying the region.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Display name of the region.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Points of the region in declaration order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Default map framing for the region.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Snap threshold applied to drops within this region.
    #[must_use]
    pub const fn snap_threshold(&self) -> SnapThreshold {
        self.snap_threshold
    }

    /// Looks up a point by identifier.
    #[must_use]
    pub fn point(&self, id: PointId) -> Option<&Point> {
        self.points.iter().find(|point| point.id() == id)
    }

    /// Reports whether `point` is one of this region's points, by value.
    #[must_use]
    pub fn contains(&self, point: &Point) -> bool {
        self.point(point.id()) == Some(point)
    }
}

/// Problems detected while drawing or assembling a round.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RoundError {
    /// The region has no points to draw from.
    #[error("region `{code}` has no points to draw a round from")]
    EmptyRegion {
        /// Region code.
        code: String,
    },
    /// The configured round size is zero.
    #[error("round size must be at least one")]
    ZeroRoundSize,
    /// The round has no targets.
    #[error("a round needs at least one target")]
    NoTargets,
    /// A target appears more than once.
    #[error("target {0} appears more than once")]
    DuplicateTarget(PointId),
    /// The label order is not a permutation of the target names.
    #[error("label order is not a permutation of the target names")]
    LabelOrderMismatch,
}

/// One playthrough: the selected targets and the shuffled label order.
#[derive(Clone, Debug, PartialEq)]
pub struct Round {
    targets: Vec<Point>,
    label_order: Vec<String>,
}

impl Round {
    /// Assembles a round, checking that `label_order` is a permutation of the target names.
    pub fn new(targets: Vec<Point>, label_order: Vec<String>) -> Result<Self, RoundError> {
        if targets.is_empty() {
            return Err(RoundError::NoTargets);
        }

        let mut ids = BTreeSet::new();
        for target in &targets {
            if !ids.insert(target.id()) {
                return Err(RoundError::DuplicateTarget(target.id()));
            }
        }

        let mut expected: Vec<&str> = targets.iter().map(Point::name).collect();
        let mut actual: Vec<&str> = label_order.iter().map(String::as_str).collect();
        expected.sort_unstable();
        actual.sort_unstable();
        if expected != actual {
            return Err(RoundError::LabelOrderMismatch);
        }

        Ok(Self {
            targets,
            label_order,
        })
    }

    /// Points the player has to label.
    #[must_use]
    pub fn targets(&self) -> &[Point] {
        &self.targets
    }

    /// Labels in the order they are offered to the player.
    #[must_use]
    pub fn label_order(&self) -> &[String] {
        &self.label_order
    }

    /// Number of targets in the round.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Always false; rounds hold at least one target.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Looks up a target by identifier.
    #[must_use]
    pub fn target(&self, id: PointId) -> Option<&Point> {
        self.targets.iter().find(|point| point.id() == id)
    }

    /// Looks up the target whose true name is `label`.
    #[must_use]
    pub fn target_named(&self, label: &str) -> Option<&Point> {
        self.targets.iter().find(|point| point.name() == label)
    }

    /// Reports whether `label` is offered in this round.
    #[must_use]
    pub fn offers_label(&self, label: &str) -> bool {
        self.label_order.iter().any(|offered| offered == label)
    }
}

/// Read-only view of the labels currently placed on round targets.
#[derive(Clone, Copy, Debug)]
pub struct PlacementView<'a> {
    entries: &'a BTreeMap<PointId, String>,
}

impl<'a> PlacementView<'a> {
    /// Captures a view backed by the provided placement map.
    #[must_use]
    pub fn new(entries: &'a BTreeMap<PointId, String>) -> Self {
        Self { entries }
    }

    /// Label placed on `point`, if any.
    #[must_use]
    pub fn get(&self, point: PointId) -> Option<&'a str> {
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

    /// Point currently holding `label`, if any.
    #[must_use]
    pub fn point_holding(&self, label: &str) -> Option<PointId> {
        self.entries
            .iter()
            .find_map(|(point, placed)| (placed == label).then_some(*point))
    }

    /// Labels that are currently on the map.
    #[must_use]
    pub fn placed_labels(&self) -> BTreeSet<&'a str> {
        self.entries.values().map(String::as_str).collect()
    }

    /// Iterator over placements ordered by point identifier.
    pub fn iter(&self) -> impl Iterator<Item = (PointId, &'a str)> + 'a {
        self.entries
            .iter()
            .map(|(point, label)| (*point, label.as_str()))
    }
}
