//! Parser for the line-oriented commands typed at the quiz prompt.

use std::num::ParseFloatError;

use city_quiz_core::LatLng;
use thiserror::Error;

/// Player action decoded from a single input line.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Action {
    /// Preview which target a label held at the coordinate would snap to.
    Hover(LatLng),
    /// Stop previewing.
    Leave,
    /// Release `label` at `coordinate`.
    Drop {
        /// Drop location.
        coordinate: LatLng,
        /// Label being placed, possibly containing spaces.
        label: String,
    },
    /// Score the current round.
    Check,
    /// Start another round in the active region.
    Again,
    /// Start a fresh session in the region with this code.
    Switch(String),
    /// Print the board again.
    Status,
    /// Leave the quiz.
    Quit,
}

/// Reasons an input line could not be understood.
#[derive(Debug, Error)]
pub(crate) enum ScriptError {
    /// The first word is not a known command.
    #[error("unknown command `{0}` (try hover, leave, drop, check, again, switch, status, quit)")]
    UnknownCommand(String),
    /// A required argument was not supplied.
    #[error("`{command}` needs a {argument}")]
    MissingArgument {
        /// Command being parsed.
        command: &'static str,
        /// Name of the missing argument.
        argument: &'static str,
    },
    /// A latitude or longitude is not a number.
    #[error("`{value}` is not a number")]
    InvalidNumber {
        /// Offending token.
        value: String,
        /// Parser failure.
        #[source]
        source: ParseFloatError,
    },
    /// The coordinate lies outside the valid latitude/longitude ranges.
    #[error("({lat}, {lng}) is not a coordinate on Earth")]
    OutOfRange {
        /// Parsed latitude.
        lat: f64,
        /// Parsed longitude.
        lng: f64,
    },
}

/// Parses one input line. Blank lines and `#` comments yield `None`.
pub(crate) fn parse_line(line: &str) -> Result<Option<Action>, ScriptError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };

    let action = match command.to_ascii_lowercase().as_str() {
        "hover" => Action::Hover(coordinate("hover", &mut words)?),
        "leave" => Action::Leave,
        "drop" => {
            let coordinate = coordinate("drop", &mut words)?;
            let label = words.collect::<Vec<_>>().join(" ");
            if label.is_empty() {
                return Err(ScriptError::MissingArgument {
                    command: "drop",
                    argument: "label",
                });
            }
            Action::Drop { coordinate, label }
        }
        "check" => Action::Check,
        "again" => Action::Again,
        "switch" => {
            let code = words.next().ok_or(ScriptError::MissingArgument {
                command: "switch",
                argument: "region code",
            })?;
            Action::Switch(code.to_owned())
        }
        "status" => Action::Status,
        "quit" | "exit" => Action::Quit,
        _ => return Err(ScriptError::UnknownCommand(command.to_owned())),
    };
    Ok(Some(action))
}

fn coordinate<'a>(
    command: &'static str,
    words: &mut impl Iterator<Item = &'a str>,
) -> Result<LatLng, ScriptError> {
    let lat = number(command, "latitude", words.next())?;
    let lng = number(command, "longitude", words.next())?;
    let coordinate = LatLng::new(lat, lng);
    if !coordinate.is_valid() {
        return Err(ScriptError::OutOfRange { lat, lng });
    }
    Ok(coordinate)
}

fn number(
    command: &'static str,
    argument: &'static str,
    token: Option<&str>,
) -> Result<f64, ScriptError> {
    let token = token.ok_or(ScriptError::MissingArgument { command, argument })?;
    token
        .parse::<f64>()
        .map_err(|source| ScriptError::InvalidNumber {
            value: token.to_owned(),
            source,
        })
}
