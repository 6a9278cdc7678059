//! Plain-text rendering of the quiz board, events and results.

use std::fmt::Write as _;

use city_quiz_core::{Event, Phase, PointId};
use city_quiz_system_scoring::{Feedback, Verdict};
use city_quiz_world::{query, World};

/// Renders the label tray and the target markers.
pub(crate) fn board(world: &World) -> String {
    let Some(region) = query::region(world) else {
        return "No region selected.\n".to_owned();
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}), drops snap within {:.0} km",
        region.name(),
        region.code(),
        region.snap_threshold().meters() / 1000.0
    );

    let placed = query::placed_labels(world);
    out.push_str("Labels:\n");
    for label in query::label_order(world) {
        let mark = if placed.contains(label.as_str()) { 'x' } else { ' ' };
        let _ = writeln!(out, "  [{mark}] {label}");
    }

    let highlight = query::highlight(world);
    out.push_str("Markers:\n");
    for target in query::targets(world) {
        let cursor = if highlight == Some(target.id()) { '>' } else { ' ' };
        let location = target.location();
        let holding = query::placement(world, target.id()).unwrap_or("-");
        let _ = writeln!(
            out,
            " {cursor}{:>4} ({:>8.4}, {:>8.4})  {holding}",
            target.id().to_string(),
            location.lat(),
            location.lng()
        );
    }

    let footer = match query::phase(world) {
        Phase::Playing if query::can_check_answers(world) => "All labels placed; type `check`.",
        Phase::Playing => "Drop every label to enable `check`.",
        Phase::Finished => "Round over; type `again` or `switch <code>`.",
        Phase::Idle => "",
    };
    out.push_str(footer);
    out.push('\n');
    out
}

/// Describes a world event in one line, if it is worth telling the player.
pub(crate) fn event(event: &Event) -> Option<String> {
    let line = match event {
        Event::RegionActivated { name, code, .. } => format!("Now playing {name} ({code})."),
        Event::RoundStarted { targets, .. } => format!("New round with {} cities.", targets.len()),
        Event::RoundRejected { reason } => format!("Could not start the round: {reason}."),
        Event::HighlightChanged { point: Some(point) } => format!("Would snap to marker {point}."),
        Event::HighlightChanged { point: None } => return None,
        Event::LabelPlaced {
            label,
            point,
            vacated,
            displaced,
        } => {
            let mut line = format!("Placed {label} on marker {point}");
            if let Some(vacated) = vacated {
                let _ = write!(line, ", leaving marker {vacated}");
            }
            if let Some(displaced) = displaced {
                let _ = write!(line, "; {displaced} is back in the tray");
            }
            line.push('.');
            line
        }
        Event::DropMissed {
            label,
            nearest: Some(nearest),
            distance,
        } => format!(
            "{label} landed {:.1} km from marker {nearest}, too far to snap.",
            distance / 1000.0
        ),
        Event::DropMissed { label, .. } => format!("{label} landed nowhere near a marker."),
        Event::DropRejected { label, reason } => format!("Cannot drop {label}: {reason}."),
        Event::CheckRejected { reason } => format!("Cannot check yet: {reason}."),
        Event::RoundFinished { score, total } => format!("Score: {score}/{total}"),
    };
    Some(line)
}

/// Renders the breakdown and feedback of a finished round.
pub(crate) fn results(world: &World) -> Option<String> {
    let grades = query::results(world)?;
    let region = query::region(world)?;
    let score = query::score(world)?;
    let total = u32::try_from(grades.len()).unwrap_or(u32::MAX);

    let mut out = String::new();
    for grade in &grades {
        let _ = match &grade.verdict {
            Verdict::Correct => writeln!(out, "  ok   {} {}", grade.point, grade.name),
            Verdict::Misplaced {
                placed,
                true_location,
            } => writeln!(
                out,
                "  miss {} {} (you put {placed}{})",
                grade.point,
                grade.name,
                belongs_at(*true_location)
            ),
            Verdict::Unplaced => writeln!(out, "  --   {} {} (left empty)", grade.point, grade.name),
        };
    }
    let _ = writeln!(
        out,
        "{score}/{total} correct. {}",
        Feedback::from_score(score, total).message(region.name())
    );
    Some(out)
}

fn belongs_at(true_location: Option<PointId>) -> String {
    true_location
        .map(|point| format!(", which belongs at {point}"))
        .unwrap_or_default()
}
