//! The ledger: an ordered set of goals plus the running score.
//!
//! Goals are addressed by their 1-based position in creation order. The
//! ledger alone owns the score; goals only report what an event was worth.

use crate::{codec, Error, Goal, GoalDraft, GoalKind, QuoteSource, RecordOutcome, Result};
use std::fmt;
use std::io::{BufRead, Write};

/// Score needed per level
pub const POINTS_PER_LEVEL: u64 = 500;

/// Level for a given score: one level per 500 points, starting at 1
pub fn level_for_score(score: u64) -> u64 {
    score / POINTS_PER_LEVEL + 1
}

/// Goals plus cumulative score
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ledger {
    goals: Vec<Goal>,
    score: u64,
}

/// Result of recording one event through the ledger
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventReport {
    /// 1-based position of the goal
    pub index: usize,
    pub name: String,
    pub kind: GoalKind,
    pub outcome: RecordOutcome,
    /// Goal completion state after the event
    pub completed: bool,
    pub quote: String,
}

impl fmt::Display for EventReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.outcome.is_noop() {
            match self.kind {
                GoalKind::Checklist => write!(
                    f,
                    "You have already completed this goal the required number of times."
                )?,
                _ => write!(f, "You have already completed this goal.")?,
            }
        } else if self.outcome.bonus > 0 {
            write!(
                f,
                "Congratulations! You have earned {} points plus a bonus of {} points! Total: {} points!",
                self.outcome.base(),
                self.outcome.bonus,
                self.outcome.points
            )?;
        } else {
            write!(
                f,
                "Congratulations! You have earned {} points!",
                self.outcome.points
            )?;
        }

        if !self.quote.is_empty() {
            write!(f, "\n{}", self.quote)?;
        }
        Ok(())
    }
}

/// One row of the detailed goal listing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoalDetail {
    pub index: usize,
    pub completed: bool,
    pub details: String,
}

impl fmt::Display for GoalDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.completed { "[X]" } else { "[ ]" };
        write!(f, "{}. {} {}", self.index, mark, self.details)
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(goals: Vec<Goal>, score: u64) -> Self {
        Self { goals, score }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// Goal at a 1-based position
    pub fn get(&self, index: usize) -> Option<&Goal> {
        index.checked_sub(1).and_then(|i| self.goals.get(i))
    }

    pub fn current_level(&self) -> u64 {
        level_for_score(self.score)
    }

    /// Append an already-built goal and return its 1-based index
    pub fn push(&mut self, goal: Goal) -> usize {
        self.goals.push(goal);
        self.goals.len()
    }

    /// Validate a draft and append the resulting goal
    ///
    /// Returns the new goal's 1-based index. The ledger is untouched on error.
    pub fn create_goal(&mut self, draft: &GoalDraft) -> Result<usize> {
        let goal = draft.build()?;
        tracing::info!("Created {} '{}'", goal.kind(), goal.name());
        Ok(self.push(goal))
    }

    /// Record an event against the goal at a 1-based position
    pub fn record_event<Q>(&mut self, index: usize, quotes: &mut Q) -> Result<EventReport>
    where
        Q: QuoteSource + ?Sized,
    {
        let len = self.goals.len();
        if index == 0 || index > len {
            return Err(Error::OutOfRange { index, len });
        }

        let goal = &mut self.goals[index - 1];
        let outcome = goal.record_event();
        self.score = self.score.saturating_add(u64::from(outcome.points));

        tracing::info!(
            "Recorded event on '{}': +{} points (bonus {}), score now {}",
            goal.name(),
            outcome.points,
            outcome.bonus,
            self.score
        );

        Ok(EventReport {
            index,
            name: goal.name().to_string(),
            kind: goal.kind(),
            outcome,
            completed: goal.is_completed(),
            quote: quotes.pick(),
        })
    }

    /// `(index, name)` pairs in creation order
    pub fn list_names(&self) -> Vec<(usize, &str)> {
        self.goals
            .iter()
            .enumerate()
            .map(|(i, goal)| (i + 1, goal.name()))
            .collect()
    }

    pub fn list_details(&self) -> Vec<GoalDetail> {
        self.goals
            .iter()
            .enumerate()
            .map(|(i, goal)| GoalDetail {
                index: i + 1,
                completed: goal.is_completed(),
                details: goal.describe(),
            })
            .collect()
    }

    /// Write the score line and every goal line
    pub fn serialize_all<W: Write>(&self, writer: W) -> Result<()> {
        codec::write_ledger(self, writer)
    }

    pub fn to_text(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail
        let _ = codec::write_ledger(self, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Parse a whole ledger from a stream
    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        codec::read_ledger(reader)
    }

    /// Replace this ledger's goals and score with the stream's contents
    ///
    /// The stream is fully parsed before anything is replaced, so a corrupt
    /// stream leaves the current ledger exactly as it was.
    pub fn deserialize_all<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let loaded = codec::read_ledger(reader)?;
        *self = loaded;
        Ok(())
    }
}
