#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure scoring system comparing placements against the round's ground truth.

use city_quiz_core::{PlacementView, PointId, Round};

/// Counts the targets whose placed label equals their true name.
///
/// The result lies in `0..=round.len()`; unplaced targets count as wrong.
#[must_use]
pub fn score(round: &Round, placements: PlacementView<'_>) -> u32 {
    let correct = round
        .targets()
        .iter()
        .filter(|target| placements.get(target.id()) == Some(target.name()))
        .count();
    u32::try_from(correct).unwrap_or(u32::MAX)
}

/// Judgement for a single target once the round is over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The target holds its own name.
    Correct,
    /// The target holds another target's name.
    Misplaced {
        /// Label the player put on the target.
        placed: String,
        /// Target whose true name is `placed`, if it is part of the round.
        true_location: Option<PointId>,
    },
    /// The target holds nothing.
    Unplaced,
}

/// Per-target line of the result breakdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetGrade {
    /// Target being judged.
    pub point: PointId,
    /// True name of the target.
    pub name: String,
    /// Judgement for the target.
    pub verdict: Verdict,
}

/// Produces the result breakdown in round target order.
#[must_use]
pub fn grade(round: &Round, placements: PlacementView<'_>) -> Vec<TargetGrade> {
    round
        .targets()
        .iter()
        .map(|target| {
            let verdict = match placements.get(target.id()) {
                None => Verdict::Unplaced,
                Some(placed) if placed == target.name() => Verdict::Correct,
                Some(placed) => Verdict::Misplaced {
                    placed: placed.to_owned(),
                    true_location: round.target_named(placed).map(|point| point.id()),
                },
            };
            TargetGrade {
                point: target.id(),
                name: target.name().to_owned(),
                verdict,
            }
        })
        .collect()
}

/// Encouragement tier derived from the share of correct answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Feedback {
    /// Every answer was correct.
    Perfect,
    /// At least 70% correct.
    Great,
    /// At least 40% correct.
    NotBad,
    /// Fewer than 40% correct.
    KeepTrying,
}

impl Feedback {
    /// Selects the tier for `score` correct answers out of `total`.
    #[must_use]
    pub fn from_score(score: u32, total: u32) -> Self {
        if total == 0 {
            return Self::KeepTrying;
        }
        let score = u64::from(score);
        let total = u64::from(total);
        if score >= total {
            Self::Perfect
        } else if score * 100 >= total * 70 {
            Self::Great
        } else if score * 100 >= total * 40 {
            Self::NotBad
        } else {
            Self::KeepTrying
        }
    }

    /// Message shown to the player for a round played in `region`.
    #[must_use]
    pub fn message(self, region: &str) -> String {
        match self {
            Self::Perfect => "Perfect! You're an expert!".to_owned(),
            Self::Great => format!("Great job! You know {region} well!"),
            Self::NotBad => "Not bad! A good start.".to_owned(),
            Self::KeepTrying => "Keep trying! You'll get there.".to_owned(),
        }
    }
}
