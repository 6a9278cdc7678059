#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative quiz session state for the City Quiz.

mod placements;

pub use placements::{PlacementChange, Placements};

use city_quiz_core::{
    CheckRejection, Command, DropRejection, Event, LatLng, Phase, Point, PointId, Region, Round,
    RoundRejection,
};
use city_quiz_system_drop_resolution::{self as drop_resolution, DropResolution};
use city_quiz_system_scoring as scoring;
use log::{debug, info, warn};

/// Represents the authoritative quiz state.
///
/// A world starts idle. Activating a region creates a session holding the
/// region, the current round, its placements, the phase and the score.
#[derive(Debug, Default)]
pub struct World {
    session: Option<Session>,
}

#[derive(Debug)]
struct Session {
    region: Region,
    round: Round,
    placements: Placements,
    phase: Phase,
    score: Option<u32>,
    highlight: Option<PointId>,
}

impl Session {
    fn new(region: Region, round: Round) -> Self {
        Self {
            region,
            round,
            placements: Placements::new(),
            phase: Phase::Playing,
            score: None,
            highlight: None,
        }
    }

    fn set_highlight(&mut self, point: Option<PointId>, out_events: &mut Vec<Event>) {
        if self.highlight != point {
            match point {
                Some(point) => debug!("previewing drop onto {point}"),
                None => debug!("cleared drop preview"),
            }
            self.highlight = point;
            out_events.push(Event::HighlightChanged { point });
        }
    }
}

impl World {
    /// Creates an idle world with no active region.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn activate_region(&mut self, region: Region, round: Round, out_events: &mut Vec<Event>) {
        if let Some(point) = foreign_target(&region, &round) {
            warn!(
                "refusing round for region `{}`: point {point} is foreign",
                region.code()
            );
            out_events.push(Event::RoundRejected {
                reason: RoundRejection::ForeignTarget { point },
            });
            return;
        }

        if let Some(previous) = self.session.as_mut() {
            previous.set_highlight(None, out_events);
        }

        info!(
            "activated region `{}` with {} targets",
            region.code(),
            round.len()
        );
        out_events.push(Event::RegionActivated {
            code: region.code().to_owned(),
            name: region.name().to_owned(),
            viewport: region.viewport(),
        });
        out_events.push(round_started(&round));
        self.session = Some(Session::new(region, round));
    }

    fn begin_round(&mut self, round: Round, out_events: &mut Vec<Event>) {
        let Some(session) = self.session.as_mut() else {
            warn!("refusing round: no region is active");
            out_events.push(Event::RoundRejected {
                reason: RoundRejection::NoActiveRegion,
            });
            return;
        };

        if let Some(point) = foreign_target(&session.region, &round) {
            warn!(
                "refusing round for region `{}`: point {point} is foreign",
                session.region.code()
            );
            out_events.push(Event::RoundRejected {
                reason: RoundRejection::ForeignTarget { point },
            });
            return;
        }

        session.set_highlight(None, out_events);
        session.placements.reset();
        session.phase = Phase::Playing;
        session.score = None;
        info!(
            "started a new round of {} targets in `{}`",
            round.len(),
            session.region.code()
        );
        out_events.push(round_started(&round));
        session.round = round;
    }

    fn hover(&mut self, coordinate: LatLng, out_events: &mut Vec<Event>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.phase != Phase::Playing {
            return;
        }

        let point = drop_resolution::resolve_drop(
            coordinate,
            session.round.targets(),
            session.region.snap_threshold(),
        )
        .map(Point::id);
        session.set_highlight(point, out_events);
    }

    fn leave_map(&mut self, out_events: &mut Vec<Event>) {
        if let Some(session) = self.session.as_mut() {
            session.set_highlight(None, out_events);
        }
    }

    fn drop_label(&mut self, label: String, coordinate: LatLng, out_events: &mut Vec<Event>) {
        let Some(session) = self.session.as_mut() else {
            warn!("ignoring drop of `{label}`: no region is active");
            out_events.push(Event::DropRejected {
                label,
                reason: DropRejection::NotPlaying,
            });
            return;
        };

        session.set_highlight(None, out_events);

        if session.phase != Phase::Playing {
            warn!("ignoring drop of `{label}`: the round is over");
            out_events.push(Event::DropRejected {
                label,
                reason: DropRejection::NotPlaying,
            });
            return;
        }
        if !session.round.offers_label(&label) {
            warn!("ignoring drop of unknown label `{label}`");
            out_events.push(Event::DropRejected {
                label,
                reason: DropRejection::UnknownLabel,
            });
            return;
        }

        let resolution = drop_resolution::resolve(
            coordinate,
            session.round.targets(),
            session.region.snap_threshold(),
        );
        match resolution {
            DropResolution::Snapped { point, distance } => {
                let point = point.id();
                debug!("`{label}` snapped to {point} ({distance:.0} m away)");
                let change = session.placements.place(point, label.clone());
                out_events.push(Event::LabelPlaced {
                    label,
                    point,
                    vacated: change.vacated,
                    displaced: change.displaced,
                });
            }
            DropResolution::Missed { nearest, distance } => {
                debug!("`{label}` missed every target ({distance:.0} m from the nearest)");
                out_events.push(Event::DropMissed {
                    label,
                    nearest: nearest.map(Point::id),
                    distance,
                });
            }
        }
    }

    fn check_answers(&mut self, out_events: &mut Vec<Event>) {
        let Some(session) = self.session.as_mut() else {
            warn!("refusing check: no region is active");
            out_events.push(Event::CheckRejected {
                reason: CheckRejection::NotPlaying,
            });
            return;
        };
        if session.phase != Phase::Playing {
            warn!("refusing check: the round is already scored");
            out_events.push(Event::CheckRejected {
                reason: CheckRejection::NotPlaying,
            });
            return;
        }

        let placed = session.placements.len();
        let required = session.round.len();
        if placed != required {
            warn!("refusing check with {placed} of {required} targets labelled");
            out_events.push(Event::CheckRejected {
                reason: CheckRejection::Incomplete { placed, required },
            });
            return;
        }

        session.set_highlight(None, out_events);
        let score = scoring::score(&session.round, session.placements.view());
        let total = u32::try_from(required).unwrap_or(u32::MAX);
        session.score = Some(score);
        session.phase = Phase::Finished;
        info!(
            "round in `{}` finished with {score}/{total}",
            session.region.code()
        );
        out_events.push(Event::RoundFinished { score, total });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ActivateRegion { region, round } => {
            world.activate_region(region, round, out_events);
        }
        Command::BeginRound { round } => world.begin_round(round, out_events),
        Command::HoverLabel { coordinate } => world.hover(coordinate, out_events),
        Command::LeaveMap => world.leave_map(out_events),
        Command::DropLabel { label, coordinate } => {
            world.drop_label(label, coordinate, out_events);
        }
        Command::CheckAnswers => world.check_answers(out_events),
    }
}

fn foreign_target(region: &Region, round: &Round) -> Option<PointId> {
    round
        .targets()
        .iter()
        .find(|target| !region.contains(target))
        .map(Point::id)
}

fn round_started(round: &Round) -> Event {
    Event::RoundStarted {
        targets: round.targets().iter().map(Point::id).collect(),
        label_order: round.label_order().to_vec(),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::collections::BTreeSet;

    use super::World;
    use city_quiz_core::{
        Phase, PlacementView, Point, PointId, Region, Round, SnapThreshold, Viewport,
    };
    use city_quiz_system_scoring::{self as scoring, TargetGrade};

    /// Current phase of the session.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world
            .session
            .as_ref()
            .map_or(Phase::Idle, |session| session.phase)
    }

    /// Active region, if one has been chosen.
    #[must_use]
    pub fn region(world: &World) -> Option<&Region> {
        world.session.as_ref().map(|session| &session.region)
    }

    /// Map framing of the active region.
    #[must_use]
    pub fn viewport(world: &World) -> Option<Viewport> {
        region(world).map(Region::viewport)
    }

    /// Snap threshold of the active region.
    #[must_use]
    pub fn snap_threshold(world: &World) -> Option<SnapThreshold> {
        region(world).map(Region::snap_threshold)
    }

    /// Round currently being played or reviewed.
    #[must_use]
    pub fn round(world: &World) -> Option<&Round> {
        world.session.as_ref().map(|session| &session.round)
    }

    /// Targets of the current round; empty while idle.
    #[must_use]
    pub fn targets(world: &World) -> &[Point] {
        round(world).map(Round::targets).unwrap_or_default()
    }

    /// Labels in the order they are offered; empty while idle.
    #[must_use]
    pub fn label_order(world: &World) -> &[String] {
        round(world).map(Round::label_order).unwrap_or_default()
    }

    /// Label placed on `point`, if any.
    #[must_use]
    pub fn placement(world: &World, point: PointId) -> Option<&str> {
        world
            .session
            .as_ref()
            .and_then(|session| session.placements.get(point))
    }

    /// Read-only view of every placement.
    #[must_use]
    pub fn placements(world: &World) -> Option<PlacementView<'_>> {
        world
            .session
            .as_ref()
            .map(|session| session.placements.view())
    }

    /// Labels already on the map, used to mark them in the label list.
    #[must_use]
    pub fn placed_labels(world: &World) -> BTreeSet<&str> {
        world
            .session
            .as_ref()
            .map(|session| session.placements.placed_labels())
            .unwrap_or_default()
    }

    /// Point highlighted by the current drag preview.
    #[must_use]
    pub fn highlight(world: &World) -> Option<PointId> {
        world.session.as_ref().and_then(|session| session.highlight)
    }

    /// Score of the finished round; absent until answers are checked.
    #[must_use]
    pub fn score(world: &World) -> Option<u32> {
        world.session.as_ref().and_then(|session| session.score)
    }

    /// Reports whether every target holds a label so answers can be checked.
    #[must_use]
    pub fn can_check_answers(world: &World) -> bool {
        world.session.as_ref().is_some_and(|session| {
            session.phase == Phase::Playing && session.placements.len() == session.round.len()
        })
    }

    /// Per-target result breakdown, available once the round is finished.
    #[must_use]
    pub fn results(world: &World) -> Option<Vec<TargetGrade>> {
        world
            .session
            .as_ref()
            .filter(|session| session.phase == Phase::Finished)
            .map(|session| scoring::grade(&session.round, session.placements.view()))
    }
}
