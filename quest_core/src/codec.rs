//! Line-oriented text format for ledgers.
//!
//! ```text
//! <score>
//! <Tag>:<name>,<description>,<basePoints>[,<variant fields>]
//! ```
//!
//! | Tag             | Fields after basePoints         |
//! |-----------------|---------------------------------|
//! | `SimpleGoal`    | `completed` (`True` / `False`)  |
//! | `EternalGoal`   | none                            |
//! | `ChecklistGoal` | `target`, `bonus`, `progress`   |
//!
//! There is no escaping: names and descriptions may not contain `,` or `:`.
//! [`crate::GoalDraft`] enforces that before a goal ever reaches this module.

use crate::{Error, Goal, GoalKind, GoalState, Ledger, Result};
use std::io::{BufRead, Write};

/// Encode a goal as a single tagged line (no trailing newline)
pub fn encode_goal(goal: &Goal) -> String {
    let head = format!(
        "{}:{},{},{}",
        goal.kind().tag(),
        goal.name(),
        goal.description(),
        goal.base_points()
    );

    match goal.state() {
        GoalState::Simple { completed } => {
            format!("{},{}", head, if *completed { "True" } else { "False" })
        }
        GoalState::Eternal => head,
        GoalState::Checklist {
            target,
            bonus,
            progress,
        } => format!("{},{},{},{}", head, target, bonus, progress),
    }
}

/// Number of comma-separated fields each tag carries
fn arity(kind: GoalKind) -> usize {
    match kind {
        GoalKind::Simple => 4,
        GoalKind::Eternal => 3,
        GoalKind::Checklist => 6,
    }
}

/// Decode one goal line
///
/// `line_no` is only used for error reporting: 1-based counting the score line, or 0
/// for a line read on its own.
pub fn decode_goal(line: &str, line_no: usize) -> Result<Goal> {
    let (tag, rest) = line
        .split_once(':')
        .ok_or_else(|| Error::corrupt(line_no, "missing ':' after goal tag"))?;

    let kind = GoalKind::from_tag(tag.trim())
        .ok_or_else(|| Error::corrupt(line_no, format!("unknown goal tag '{}'", tag.trim())))?;

    let fields: Vec<&str> = rest.split(',').collect();
    if fields.len() != arity(kind) {
        return Err(Error::corrupt(
            line_no,
            format!(
                "{} expects {} fields, found {}",
                kind.tag(),
                arity(kind),
                fields.len()
            ),
        ));
    }

    let name = fields[0];
    let description = fields[1];
    let points = parse_int(fields[2], "points", line_no)?;

    match kind {
        GoalKind::Simple => {
            let completed = parse_bool(fields[3], line_no)?;
            Ok(Goal::restore_simple(name, description, points, completed))
        }
        GoalKind::Eternal => Ok(Goal::eternal(name, description, points)),
        GoalKind::Checklist => {
            let target = parse_int(fields[3], "target", line_no)?;
            let bonus = parse_int(fields[4], "bonus", line_no)?;
            let progress = parse_int(fields[5], "progress", line_no)?;

            if target == 0 {
                return Err(Error::corrupt(line_no, "checklist target must be positive"));
            }
            if progress > target {
                return Err(Error::corrupt(
                    line_no,
                    format!("checklist progress {} exceeds target {}", progress, target),
                ));
            }

            Ok(Goal::restore_checklist(
                name,
                description,
                points,
                target,
                bonus,
                progress,
            ))
        }
    }
}

fn parse_int(value: &str, field: &str, line_no: usize) -> Result<u32> {
    value.trim().parse().map_err(|_| {
        Error::corrupt(
            line_no,
            format!("{} is not a non-negative integer: '{}'", field, value.trim()),
        )
    })
}

fn parse_bool(value: &str, line_no: usize) -> Result<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(Error::corrupt(
            line_no,
            format!("expected True or False, found '{}'", value),
        ))
    }
}

/// Write the score line followed by one line per goal, in ledger order
pub fn write_ledger<W: Write>(ledger: &Ledger, mut writer: W) -> Result<()> {
    writeln!(writer, "{}", ledger.score())?;
    for goal in ledger.goals() {
        writeln!(writer, "{}", encode_goal(goal))?;
    }
    writer.flush()?;
    Ok(())
}

/// Parse a complete ledger from a stream
///
/// Nothing is returned unless every line parses.
pub fn read_ledger<R: BufRead>(reader: R) -> Result<Ledger> {
    let mut lines = reader.lines();

    let header = lines
        .next()
        .transpose()?
        .ok_or_else(|| Error::corrupt(1, "empty stream, expected score line"))?;
    let score: u64 = header
        .trim()
        .parse()
        .map_err(|_| Error::corrupt(1, format!("score is not an integer: '{}'", header.trim())))?;

    let mut goals = Vec::new();
    for (offset, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        goals.push(decode_goal(&line, offset + 2)?);
    }

    tracing::debug!("Decoded ledger with {} goals, score {}", goals.len(), score);
    Ok(Ledger::from_parts(goals, score))
}
