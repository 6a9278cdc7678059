use city_quiz_core::{
    CheckRejection, Command, DropRejection, Event, LatLng, Phase, Point, PointId, Region, Round,
    RoundRejection, SnapThreshold, Viewport,
};
use city_quiz_dataset::Catalog;
use city_quiz_system_round_selection::{Config, RoundSelector};
use city_quiz_system_scoring::{self as scoring, Verdict};
use city_quiz_world::{self as world, query, World};
use test_log::test;

const ALPHA: PointId = PointId::new(1);
const BETA: PointId = PointId::new(2);
const GAMMA: PointId = PointId::new(3);

fn triangle() -> Region {
    let points = vec![
        Point::new(ALPHA, "Alpha", LatLng::new(0.0, 0.0)),
        Point::new(BETA, "Beta", LatLng::new(1.0, 0.0)),
        Point::new(GAMMA, "Gamma", LatLng::new(0.0, 1.0)),
    ];
    Region::new(
        "tri",
        "Triangle",
        points,
        Viewport::new(LatLng::new(0.3, 0.3), 8),
        SnapThreshold::from_kilometers(50.0).expect("positive"),
    )
    .expect("valid region")
}

fn started(region: Region, seed: u64) -> World {
    let mut selector = RoundSelector::new(Config::with_seed(seed));
    let round = selector.start_round(&region).expect("round");
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ActivateRegion { region, round },
        &mut events,
    );
    world
}

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn drop(label: &str, lat: f64, lng: f64) -> Command {
    Command::DropLabel {
        label: label.to_owned(),
        coordinate: LatLng::new(lat, lng),
    }
}

#[test]
fn round_size_clamps_to_small_region() {
    let world = started(triangle(), 1);
    assert_eq!(query::phase(&world), Phase::Playing);
    assert_eq!(query::targets(&world).len(), 3);
    assert_eq!(query::label_order(&world).len(), 3);
    assert_eq!(query::score(&world), None);
}

#[test]
fn relocating_a_label_displaces_the_occupant() {
    let mut world = started(triangle(), 2);

    let events = run(&mut world, drop("Beta", 0.98, 0.02));
    assert!(matches!(
        events.as_slice(),
        [Event::LabelPlaced { point, vacated: None, displaced: None, .. }] if *point == BETA
    ));

    let _ = run(&mut world, drop("Alpha", 0.03, -0.02));
    let events = run(&mut world, drop("Gamma", 1.02, 0.01));
    assert_eq!(
        events,
        vec![Event::LabelPlaced {
            label: "Gamma".to_owned(),
            point: BETA,
            vacated: None,
            displaced: Some("Beta".to_owned()),
        }]
    );

    assert_eq!(query::placement(&world, ALPHA), Some("Alpha"));
    assert_eq!(query::placement(&world, BETA), Some("Gamma"));
    assert_eq!(query::placement(&world, GAMMA), None);
    assert!(!query::placed_labels(&world).contains("Beta"));

    let round = query::round(&world).expect("round");
    let placements = query::placements(&world).expect("placements");
    assert_eq!(scoring::score(round, placements), 1);
    assert_eq!(scoring::score(round, placements), 1);

    assert!(!query::can_check_answers(&world));
    let events = run(&mut world, Command::CheckAnswers);
    assert_eq!(
        events,
        vec![Event::CheckRejected {
            reason: CheckRejection::Incomplete {
                placed: 2,
                required: 3
            }
        }]
    );
    assert_eq!(query::phase(&world), Phase::Playing);
    assert_eq!(query::score(&world), None);
}

#[test]
fn moving_a_label_reports_the_vacated_point() {
    let mut world = started(triangle(), 3);
    let _ = run(&mut world, drop("Alpha", 0.0, 0.05));
    let events = run(&mut world, drop("Alpha", 0.05, 1.0));

    assert_eq!(
        events,
        vec![Event::LabelPlaced {
            label: "Alpha".to_owned(),
            point: GAMMA,
            vacated: Some(ALPHA),
            displaced: None,
        }]
    );
    assert_eq!(query::placement(&world, ALPHA), None);
}

#[test]
fn far_drop_is_ignored() {
    let mut world = started(triangle(), 4);
    let events = run(&mut world, drop("Alpha", 0.5, 0.5));

    match events.as_slice() {
        [Event::DropMissed {
            label, distance, ..
        }] => {
            assert_eq!(label, "Alpha");
            assert!(*distance >= 50_000.0);
        }
        other => panic!("expected a miss, got {other:?}"),
    }
    assert!(query::placements(&world).expect("session").is_empty());
}

#[test]
fn unknown_label_is_rejected() {
    let mut world = started(triangle(), 5);
    let events = run(&mut world, drop("Delta", 0.0, 0.0));
    assert_eq!(
        events,
        vec![Event::DropRejected {
            label: "Delta".to_owned(),
            reason: DropRejection::UnknownLabel,
        }]
    );
}

#[test]
fn preview_matches_committed_drop() {
    let mut world = started(triangle(), 6);
    let probes = [
        (0.2, 0.1),
        (0.44, 0.0),
        (0.46, 0.0),
        (0.9, 0.05),
        (0.3, 0.7),
        (0.5, 0.5),
    ];

    for (lat, lng) in probes {
        let coordinate = LatLng::new(lat, lng);
        let _ = run(&mut world, Command::HoverLabel { coordinate });
        let previewed = query::highlight(&world);

        let events = run(
            &mut world,
            Command::DropLabel {
                label: "Alpha".to_owned(),
                coordinate,
            },
        );
        let committed = events.iter().find_map(|event| match event {
            Event::LabelPlaced { point, .. } => Some(*point),
            _ => None,
        });
        assert_eq!(previewed, committed, "preview diverged at ({lat}, {lng})");
        assert_eq!(query::highlight(&world), None, "drop must clear preview");
    }
}

#[test]
fn leaving_the_map_clears_the_preview() {
    let mut world = started(triangle(), 7);
    let _ = run(
        &mut world,
        Command::HoverLabel {
            coordinate: LatLng::new(0.0, 0.1),
        },
    );
    assert_eq!(query::highlight(&world), Some(ALPHA));

    let events = run(&mut world, Command::LeaveMap);
    assert_eq!(events, vec![Event::HighlightChanged { point: None }]);
    assert_eq!(query::highlight(&world), None);

    assert!(run(&mut world, Command::LeaveMap).is_empty());
}

#[test]
fn new_round_clears_the_preview() {
    let mut world = started(triangle(), 14);
    let _ = run(
        &mut world,
        Command::HoverLabel {
            coordinate: LatLng::new(0.98, 0.0),
        },
    );
    assert_eq!(query::highlight(&world), Some(BETA));

    let round = RoundSelector::new(Config::with_seed(15))
        .start_round(&triangle())
        .expect("round");
    let events = run(&mut world, Command::BeginRound { round });

    assert_eq!(events.first(), Some(&Event::HighlightChanged { point: None }));
    assert!(matches!(events.last(), Some(Event::RoundStarted { .. })));
    assert_eq!(query::highlight(&world), None);
}

#[test]
fn switching_region_clears_the_preview() {
    let mut world = started(triangle(), 16);
    let _ = run(
        &mut world,
        Command::HoverLabel {
            coordinate: LatLng::new(0.0, 0.97),
        },
    );
    assert_eq!(query::highlight(&world), Some(GAMMA));

    let catalog = Catalog::builtin().expect("built-in data is valid");
    let estonia = catalog.get("ee").expect("estonia").clone();
    let round = RoundSelector::new(Config::with_seed(17))
        .start_round(&estonia)
        .expect("round");
    let events = run(
        &mut world,
        Command::ActivateRegion {
            region: estonia,
            round,
        },
    );

    assert_eq!(events.first(), Some(&Event::HighlightChanged { point: None }));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::RegionActivated { code, .. } if code == "ee")));
    assert_eq!(query::highlight(&world), None);
}

#[test]
fn complete_round_finishes_with_score() {
    let mut world = started(triangle(), 8);
    let _ = run(&mut world, drop("Alpha", 0.0, 0.0));
    let _ = run(&mut world, drop("Beta", 0.0, 1.0));
    let _ = run(&mut world, drop("Gamma", 1.0, 0.0));
    assert!(query::can_check_answers(&world));

    let events = run(&mut world, Command::CheckAnswers);
    assert_eq!(events, vec![Event::RoundFinished { score: 1, total: 3 }]);
    assert_eq!(query::phase(&world), Phase::Finished);
    assert_eq!(query::score(&world), Some(1));

    let results = query::results(&world).expect("finished");
    let gamma_slot = results
        .iter()
        .find(|grade| grade.point == GAMMA)
        .expect("gamma graded");
    assert_eq!(
        gamma_slot.verdict,
        Verdict::Misplaced {
            placed: "Beta".to_owned(),
            true_location: Some(BETA),
        }
    );

    let events = run(&mut world, drop("Alpha", 1.0, 0.0));
    assert!(matches!(
        events.as_slice(),
        [Event::DropRejected {
            reason: DropRejection::NotPlaying,
            ..
        }]
    ));
    assert_eq!(
        run(&mut world, Command::CheckAnswers),
        vec![Event::CheckRejected {
            reason: CheckRejection::NotPlaying
        }]
    );
    assert_eq!(query::score(&world), Some(1));
}

#[test]
fn play_again_starts_fresh_round_in_same_region() {
    let mut world = started(triangle(), 9);
    let _ = run(&mut world, drop("Alpha", 0.0, 0.0));
    let _ = run(&mut world, drop("Beta", 1.0, 0.0));
    let _ = run(&mut world, drop("Gamma", 0.0, 1.0));
    let _ = run(&mut world, Command::CheckAnswers);
    assert_eq!(query::score(&world), Some(3));

    let region = query::region(&world).expect("region").clone();
    let round = RoundSelector::new(Config::with_seed(10))
        .start_round(&region)
        .expect("round");
    let events = run(&mut world, Command::BeginRound { round });

    assert!(matches!(events.as_slice(), [Event::RoundStarted { .. }]));
    assert_eq!(query::phase(&world), Phase::Playing);
    assert_eq!(query::score(&world), None);
    assert!(query::placed_labels(&world).is_empty());
}

#[test]
fn begin_round_requires_active_region() {
    let mut world = World::new();
    let round = RoundSelector::new(Config::with_seed(11))
        .start_round(&triangle())
        .expect("round");
    assert_eq!(
        run(&mut world, Command::BeginRound { round }),
        vec![Event::RoundRejected {
            reason: RoundRejection::NoActiveRegion
        }]
    );
}

#[test]
fn switching_region_discards_session() {
    let catalog = Catalog::builtin().expect("built-in data is valid");
    let estonia = catalog.get("ee").expect("estonia").clone();
    let ukraine = catalog.get("ua").expect("ukraine").clone();

    let mut selector = RoundSelector::new(Config::with_seed(12));
    let mut world = World::new();
    let round = selector.start_round(&estonia).expect("round");
    let _ = run(
        &mut world,
        Command::ActivateRegion {
            region: estonia,
            round,
        },
    );

    let first = query::targets(&world)[0].clone();
    let _ = run(
        &mut world,
        Command::DropLabel {
            label: first.name().to_owned(),
            coordinate: first.location(),
        },
    );
    assert_eq!(query::placed_labels(&world).len(), 1);

    let round = selector.start_round(&ukraine).expect("round");
    let events = run(
        &mut world,
        Command::ActivateRegion {
            region: ukraine.clone(),
            round,
        },
    );

    assert!(matches!(
        events.first(),
        Some(Event::RegionActivated { code, .. }) if code == "ua"
    ));
    assert_eq!(query::region(&world).map(Region::code), Some("ua"));
    assert!(query::placed_labels(&world).is_empty());
    assert_eq!(query::score(&world), None);
    assert_eq!(query::targets(&world).len(), 10);
    assert!(query::targets(&world)
        .iter()
        .all(|target| ukraine.contains(target)));
    assert_eq!(
        query::snap_threshold(&world).map(|threshold| threshold.meters()),
        Some(75_000.0)
    );
}

#[test]
fn round_from_another_region_is_refused() {
    let catalog = Catalog::builtin().expect("built-in data is valid");
    let estonia = catalog.get("ee").expect("estonia").clone();
    let mut world = started(estonia, 13);
    let before: Vec<PointId> = query::targets(&world).iter().map(Point::id).collect();

    let foreign = Round::new(
        vec![Point::new(PointId::new(1), "Riga", LatLng::new(56.95, 24.11))],
        vec!["Riga".to_owned()],
    )
    .expect("valid round");
    let events = run(&mut world, Command::BeginRound { round: foreign });

    assert_eq!(
        events,
        vec![Event::RoundRejected {
            reason: RoundRejection::ForeignTarget {
                point: PointId::new(1)
            }
        }]
    );
    let after: Vec<PointId> = query::targets(&world).iter().map(Point::id).collect();
    assert_eq!(before, after);
}
