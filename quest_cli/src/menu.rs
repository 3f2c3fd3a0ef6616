//! Interactive text menu.
//!
//! Works on an in-memory ledger; option 4 and 5 save to and load from a
//! file the user names. Recorded events go to the event journal. Every error
//! is reported and the menu carries on. End of input quits.

use quest_core::{
    load_ledger, save_ledger, Error, EventRecord, EventSink, GoalDraft, Ledger, QuoteSource,
    Result,
};
use std::io::{BufRead, Write};
use std::path::PathBuf;

enum Flow {
    Continue,
    Quit,
}

/// Run the menu loop until the user quits or input ends
pub fn run<R, W, Q, S>(mut input: R, mut out: W, quotes: &mut Q, journal: &mut S) -> Result<Ledger>
where
    R: BufRead,
    W: Write,
    Q: QuoteSource + ?Sized,
    S: EventSink + ?Sized,
{
    let mut ledger = Ledger::new();

    loop {
        display_info(&ledger, &mut out)?;
        display_menu(&mut out)?;

        let Some(choice) = read_line(&mut input)? else {
            break;
        };

        let result = match choice.as_str() {
            "1" => create_goal(&mut ledger, &mut input, &mut out),
            "2" => list_names(&ledger, &mut out).map(|_| Flow::Continue),
            "3" => list_details(&ledger, &mut out).map(|_| Flow::Continue),
            "4" => save_goals(&ledger, &mut input, &mut out),
            "5" => load_goals(&mut ledger, &mut input, &mut out),
            "6" => record_event(&mut ledger, &mut input, &mut out, quotes, journal),
            "7" => Ok(Flow::Quit),
            _ => {
                writeln!(out, "Invalid choice. Please try again.")?;
                Ok(Flow::Continue)
            }
        };

        match result {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => {
                tracing::debug!("Menu action failed: {}", e);
                writeln!(out, "{}\n", e)?;
            }
        }
    }

    Ok(ledger)
}

/// Read one line; bytes that are not UTF-8 become U+FFFD
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = Vec::new();
    if input.read_until(b'\n', &mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&line).trim().to_string()))
}

fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, text: &str) -> Result<Option<String>> {
    write!(out, "{}", text)?;
    out.flush()?;
    read_line(input)
}

fn display_info<W: Write>(ledger: &Ledger, out: &mut W) -> Result<()> {
    writeln!(out, "You have {} points.", ledger.score())?;
    writeln!(out, "You are currently at Level {}!\n", ledger.current_level())?;
    Ok(())
}

fn display_menu<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "Menu Options:")?;
    writeln!(out, "1. Create New Goal")?;
    writeln!(out, "2. List Goal Names")?;
    writeln!(out, "3. List Goal Details")?;
    writeln!(out, "4. Save Goals")?;
    writeln!(out, "5. Load Goals")?;
    writeln!(out, "6. Record Event")?;
    writeln!(out, "7. Quit")?;
    write!(out, "Select a choice from the menu: ")?;
    out.flush()?;
    Ok(())
}

fn list_names<W: Write>(ledger: &Ledger, out: &mut W) -> Result<()> {
    if ledger.is_empty() {
        writeln!(out, "You have no goals yet.\n")?;
        return Ok(());
    }

    writeln!(out, "The goals are:")?;
    for (index, name) in ledger.list_names() {
        writeln!(out, "{}. {}", index, name)?;
    }
    writeln!(out)?;
    Ok(())
}

fn list_details<W: Write>(ledger: &Ledger, out: &mut W) -> Result<()> {
    if ledger.is_empty() {
        writeln!(out, "You have no goals yet.\n")?;
        return Ok(());
    }

    writeln!(out, "The goals are:")?;
    for detail in ledger.list_details() {
        writeln!(out, "{}", detail)?;
    }
    writeln!(out)?;
    Ok(())
}

fn create_goal<R: BufRead, W: Write>(
    ledger: &mut Ledger,
    input: &mut R,
    out: &mut W,
) -> Result<Flow> {
    writeln!(out, "The types of Goals are:")?;
    writeln!(out, "1. Simple Goal")?;
    writeln!(out, "2. Eternal Goal")?;
    writeln!(out, "3. Checklist Goal")?;

    let mut draft = GoalDraft::default();
    let questions: [(&str, &mut String); 4] = [
        ("Which type of goal would you like to create? ", &mut draft.kind),
        ("What is the name of your goal? ", &mut draft.name),
        ("What is a short description of it? ", &mut draft.description),
        (
            "What is the amount of points associated with this goal? ",
            &mut draft.points,
        ),
    ];
    for (question, field) in questions {
        match prompt(input, out, question)? {
            Some(answer) => *field = answer,
            None => return Ok(Flow::Quit),
        }
    }

    if draft.kind.parse::<quest_core::GoalKind>()? == quest_core::GoalKind::Checklist {
        let Some(target) = prompt(
            input,
            out,
            "How many times does this goal need to be accomplished for a bonus? ",
        )?
        else {
            return Ok(Flow::Quit);
        };
        let Some(bonus) = prompt(
            input,
            out,
            "What is the bonus for accomplishing it that many times? ",
        )?
        else {
            return Ok(Flow::Quit);
        };
        draft.target = Some(target);
        draft.bonus = Some(bonus);
    }

    ledger.create_goal(&draft)?;
    writeln!(out, "Goal created successfully!\n")?;
    Ok(Flow::Continue)
}

fn record_event<R, W, Q, S>(
    ledger: &mut Ledger,
    input: &mut R,
    out: &mut W,
    quotes: &mut Q,
    journal: &mut S,
) -> Result<Flow>
where
    R: BufRead,
    W: Write,
    Q: QuoteSource + ?Sized,
    S: EventSink + ?Sized,
{
    if ledger.is_empty() {
        writeln!(
            out,
            "No goals available to record. Please create a goal first.\n"
        )?;
        return Ok(Flow::Continue);
    }

    writeln!(out, "Which goal did you accomplish?")?;
    for (index, name) in ledger.list_names() {
        writeln!(out, "{}. {}", index, name)?;
    }

    let Some(answer) = prompt(input, out, "Enter the number of the goal: ")? else {
        return Ok(Flow::Quit);
    };
    let index: usize = answer
        .parse()
        .map_err(|_| Error::InvalidInput(format!("'{}' is not a goal number", answer)))?;

    let report = ledger.record_event(index, quotes)?;
    let event = EventRecord::from_report(&report, ledger.score(), chrono::Utc::now());
    if let Err(e) = journal.append(&event) {
        tracing::warn!("Failed to append event to journal: {}", e);
    }

    writeln!(out, "{}\n", report)?;
    Ok(Flow::Continue)
}

fn save_goals<R: BufRead, W: Write>(ledger: &Ledger, input: &mut R, out: &mut W) -> Result<Flow> {
    let Some(file) = prompt(input, out, "Enter filename to save to: ")? else {
        return Ok(Flow::Quit);
    };

    save_ledger(ledger, &PathBuf::from(file))?;
    writeln!(out, "Goals saved successfully!\n")?;
    Ok(Flow::Continue)
}

fn load_goals<R: BufRead, W: Write>(
    ledger: &mut Ledger,
    input: &mut R,
    out: &mut W,
) -> Result<Flow> {
    let Some(file) = prompt(input, out, "Enter filename to load from: ")? else {
        return Ok(Flow::Quit);
    };

    *ledger = load_ledger(&PathBuf::from(file))?;
    writeln!(out, "Goals loaded successfully!\n")?;
    Ok(Flow::Continue)
}
