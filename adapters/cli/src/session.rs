//! Drives the world with player actions and fresh rounds from the selector.

use anyhow::{anyhow, Context, Result};
use city_quiz_core::{Command, Event};
use city_quiz_dataset::Catalog;
use city_quiz_system_round_selection::{Config, RoundSelector};
use city_quiz_world::{self as world, query, World};
use log::info;

use crate::script::Action;

/// What the prompt loop should do after an action.
#[derive(Debug, PartialEq)]
pub(crate) enum Step {
    /// Keep reading input; the events describe what happened.
    Continue(Vec<Event>),
    /// Redraw the board without changing anything.
    Redraw,
    /// Stop the quiz.
    Quit,
}

/// Interactive quiz session over a region catalog.
#[derive(Debug)]
pub(crate) struct Quiz {
    catalog: Catalog,
    selector: RoundSelector,
    world: World,
}

impl Quiz {
    /// Opens a session in the region named by `code`.
    pub(crate) fn start(
        catalog: Catalog,
        code: &str,
        config: Config,
    ) -> Result<(Self, Vec<Event>)> {
        let mut quiz = Self {
            catalog,
            selector: RoundSelector::new(config),
            world: World::new(),
        };
        let events = quiz.switch(code)?;
        Ok((quiz, events))
    }

    /// Read-only access for rendering.
    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Applies a parsed player action.
    pub(crate) fn handle(&mut self, action: Action) -> Result<Step> {
        let events = match action {
            Action::Hover(coordinate) => self.apply(Command::HoverLabel { coordinate }),
            Action::Leave => self.apply(Command::LeaveMap),
            Action::Drop { coordinate, label } => {
                self.apply(Command::DropLabel { label, coordinate })
            }
            Action::Check => self.apply(Command::CheckAnswers),
            Action::Again => self.again()?,
            Action::Switch(code) => self.switch(&code)?,
            Action::Status => return Ok(Step::Redraw),
            Action::Quit => return Ok(Step::Quit),
        };
        Ok(Step::Continue(events))
    }

    fn again(&mut self) -> Result<Vec<Event>> {
        let region = query::region(&self.world).ok_or_else(|| anyhow!("no region is active"))?;
        let round = self
            .selector
            .start_round(region)
            .with_context(|| format!("failed to draw a round for `{}`", region.code()))?;
        Ok(self.apply(Command::BeginRound { round }))
    }

    fn switch(&mut self, code: &str) -> Result<Vec<Event>> {
        let region = self
            .catalog
            .get(code)
            .cloned()
            .with_context(|| format!("unknown region `{code}`"))?;
        let round = self
            .selector
            .start_round(&region)
            .with_context(|| format!("failed to draw a round for `{code}`"))?;
        info!("switching to region `{code}`");
        Ok(self.apply(Command::ActivateRegion { region, round }))
    }

    fn apply(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        events
    }
}
