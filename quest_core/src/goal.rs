//! Goal model: the three goal variants and their event semantics.
//!
//! A goal is created once and then mutated only through [`Goal::record_event`].
//! The goal never touches the score itself; it reports what the event was
//! worth and the ledger applies it.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width of the checklist progress bar, in cells
pub const PROGRESS_BAR_WIDTH: usize = 20;

// ============================================================================
// Goal Kinds
// ============================================================================

/// The closed set of goal variants
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    Simple,
    Eternal,
    Checklist,
}

impl GoalKind {
    /// Tag used on each persisted line
    pub fn tag(self) -> &'static str {
        match self {
            GoalKind::Simple => "SimpleGoal",
            GoalKind::Eternal => "EternalGoal",
            GoalKind::Checklist => "ChecklistGoal",
        }
    }

    /// Parse a persisted line tag (exact match only)
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "SimpleGoal" => Some(GoalKind::Simple),
            "EternalGoal" => Some(GoalKind::Eternal),
            "ChecklistGoal" => Some(GoalKind::Checklist),
            _ => None,
        }
    }

    /// Human-readable label, as shown in menus
    pub fn label(self) -> &'static str {
        match self {
            GoalKind::Simple => "Simple Goal",
            GoalKind::Eternal => "Eternal Goal",
            GoalKind::Checklist => "Checklist Goal",
        }
    }
}

impl fmt::Display for GoalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GoalKind {
    type Err = Error;

    /// Accepts the menu number, the plain word, or the persisted tag
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "1" | "simple" | "simplegoal" => Ok(GoalKind::Simple),
            "2" | "eternal" | "eternalgoal" => Ok(GoalKind::Eternal),
            "3" | "checklist" | "checklistgoal" => Ok(GoalKind::Checklist),
            other => Err(Error::invalid(format!("unknown goal type '{}'", other))),
        }
    }
}

// ============================================================================
// Goal State
// ============================================================================

/// Variant-specific state carried by a goal
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GoalState {
    /// Fires once
    Simple { completed: bool },
    /// Fires forever, never completes
    Eternal,
    /// Fires `target` times; the event reaching `target` also pays `bonus`
    Checklist { target: u32, bonus: u32, progress: u32 },
}

/// Points awarded by a single recorded event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecordOutcome {
    /// Total points earned by this event, bonus included
    pub points: u32,
    /// Bonus share of `points` (0 when no bonus was paid)
    pub bonus: u32,
}

impl RecordOutcome {
    /// True when the goal was already finished and nothing was awarded
    pub fn is_noop(&self) -> bool {
        self.points == 0
    }

    /// Points excluding the bonus
    pub fn base(&self) -> u32 {
        self.points - self.bonus
    }
}

// ============================================================================
// Goal
// ============================================================================

/// A trackable objective
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Goal {
    name: String,
    description: String,
    base_points: u32,
    state: GoalState,
}

impl Goal {
    /// New simple goal, not yet completed
    pub fn simple(name: impl Into<String>, description: impl Into<String>, points: u32) -> Self {
        Self::restore_simple(name, description, points, false)
    }

    /// Simple goal with a known completion flag (used when loading)
    pub fn restore_simple(
        name: impl Into<String>,
        description: impl Into<String>,
        points: u32,
        completed: bool,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            base_points: points,
            state: GoalState::Simple { completed },
        }
    }

    pub fn eternal(name: impl Into<String>, description: impl Into<String>, points: u32) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            base_points: points,
            state: GoalState::Eternal,
        }
    }

    /// New checklist goal with no progress
    ///
    /// Fails with `InvalidInput` when `target` is zero.
    pub fn checklist(
        name: impl Into<String>,
        description: impl Into<String>,
        points: u32,
        target: u32,
        bonus: u32,
    ) -> Result<Self> {
        if target == 0 {
            return Err(Error::invalid("checklist target must be greater than zero"));
        }
        Ok(Self::restore_checklist(
            name,
            description,
            points,
            target,
            bonus,
            0,
        ))
    }

    /// Checklist goal with known progress (used when loading)
    ///
    /// Callers must have checked `0 < target` and `progress <= target`.
    pub fn restore_checklist(
        name: impl Into<String>,
        description: impl Into<String>,
        points: u32,
        target: u32,
        bonus: u32,
        progress: u32,
    ) -> Self {
        debug_assert!(target > 0 && progress <= target);
        Self {
            name: name.into(),
            description: description.into(),
            base_points: points,
            state: GoalState::Checklist {
                target,
                bonus,
                progress,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn base_points(&self) -> u32 {
        self.base_points
    }

    pub fn state(&self) -> &GoalState {
        &self.state
    }

    pub fn kind(&self) -> GoalKind {
        match self.state {
            GoalState::Simple { .. } => GoalKind::Simple,
            GoalState::Eternal => GoalKind::Eternal,
            GoalState::Checklist { .. } => GoalKind::Checklist,
        }
    }

    /// Record one event against this goal
    ///
    /// Events on a finished goal award nothing and leave it finished.
    pub fn record_event(&mut self) -> RecordOutcome {
        let base = self.base_points;
        match &mut self.state {
            GoalState::Simple { completed } => {
                if *completed {
                    RecordOutcome::default()
                } else {
                    *completed = true;
                    RecordOutcome {
                        points: base,
                        bonus: 0,
                    }
                }
            }
            GoalState::Eternal => RecordOutcome {
                points: base,
                bonus: 0,
            },
            GoalState::Checklist {
                target,
                bonus,
                progress,
            } => {
                if *progress >= *target {
                    *progress = *target;
                    return RecordOutcome::default();
                }

                *progress += 1;
                if *progress == *target {
                    RecordOutcome {
                        points: base.saturating_add(*bonus),
                        bonus: *bonus,
                    }
                } else {
                    RecordOutcome {
                        points: base,
                        bonus: 0,
                    }
                }
            }
        }
    }

    pub fn is_completed(&self) -> bool {
        match self.state {
            GoalState::Simple { completed } => completed,
            GoalState::Eternal => false,
            GoalState::Checklist {
                target, progress, ..
            } => progress >= target,
        }
    }

    /// Name and description, plus a progress bar for checklist goals
    pub fn describe(&self) -> String {
        let base = format!("{} ({})", self.name, self.description);
        match self.state {
            GoalState::Checklist {
                target, progress, ..
            } => format!(
                "{} -- Currently completed: {}",
                base,
                progress_bar(progress, target)
            ),
            _ => base,
        }
    }

    /// Single tagged persistence line for this goal
    pub fn serialize(&self) -> String {
        crate::codec::encode_goal(self)
    }

    /// Rebuild a goal from a line produced by [`Goal::serialize`]
    ///
    /// Errors carry line 0, since the line stands on its own.
    pub fn deserialize(line: &str) -> Result<Self> {
        crate::codec::decode_goal(line, 0)
    }
}

/// Render `[====      ] progress/target` with a fixed-width track
///
/// Filled cells are `progress / target * width` rounded half to even.
pub fn progress_bar(progress: u32, target: u32) -> String {
    let filled = if target == 0 {
        0
    } else {
        let ratio = f64::from(progress) / f64::from(target);
        ((ratio * PROGRESS_BAR_WIDTH as f64).round_ties_even() as usize).min(PROGRESS_BAR_WIDTH)
    };

    format!(
        "[{}{}] {}/{}",
        "=".repeat(filled),
        " ".repeat(PROGRESS_BAR_WIDTH - filled),
        progress,
        target
    )
}

// ============================================================================
// Goal Drafts
// ============================================================================

/// Raw goal creation parameters, as a host collects them from a user
#[derive(Clone, Debug, Default)]
pub struct GoalDraft {
    pub kind: String,
    pub name: String,
    pub description: String,
    pub points: String,
    pub target: Option<String>,
    pub bonus: Option<String>,
}

impl GoalDraft {
    /// Validate the draft and build the goal it describes
    pub fn build(&self) -> Result<Goal> {
        let kind: GoalKind = self.kind.parse()?;

        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::invalid("goal name is required"));
        }
        check_text_field("name", name)?;

        let description = self.description.trim();
        check_text_field("description", description)?;

        let points = parse_count("points", &self.points)?;

        match kind {
            GoalKind::Simple => Ok(Goal::simple(name, description, points)),
            GoalKind::Eternal => Ok(Goal::eternal(name, description, points)),
            GoalKind::Checklist => {
                let target = self
                    .target
                    .as_deref()
                    .ok_or_else(|| Error::invalid("checklist goals require a target"))?;
                let bonus = self
                    .bonus
                    .as_deref()
                    .ok_or_else(|| Error::invalid("checklist goals require a bonus"))?;

                Goal::checklist(
                    name,
                    description,
                    points,
                    parse_count("target", target)?,
                    parse_count("bonus", bonus)?,
                )
            }
        }
    }
}

/// Characters that would break the line format
const RESERVED_CHARS: [char; 4] = [',', ':', '\n', '\r'];

fn check_text_field(field: &str, value: &str) -> Result<()> {
    if let Some(c) = value.chars().find(|c| RESERVED_CHARS.contains(c)) {
        return Err(Error::invalid(format!(
            "{} must not contain {:?}",
            field, c
        )));
    }
    Ok(())
}

fn parse_count(field: &str, value: &str) -> Result<u32> {
    value.trim().parse::<u32>().map_err(|_| {
        Error::invalid(format!(
            "{} must be a non-negative whole number, got '{}'",
            field,
            value.trim()
        ))
    })
}
