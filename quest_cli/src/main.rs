mod menu;

use clap::{Parser, Subcommand};
use quest_core::rollup::{cleanup_processed_journals, journal_to_csv_and_archive};
use quest_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "quest")]
#[command(about = "Eternal Quest goal tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu (default)
    Menu,

    /// Create a new goal (simple, eternal, checklist)
    Create {
        /// Goal type
        kind: String,

        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Points awarded per event
        #[arg(long)]
        points: String,

        /// Required events (checklist only)
        #[arg(long)]
        target: Option<String>,

        /// One-time completion bonus (checklist only)
        #[arg(long)]
        bonus: Option<String>,
    },

    /// List goal names
    Names,

    /// List goals with completion state and progress
    Details,

    /// Record an event against a goal (1-based index)
    Record { index: usize },

    /// Show the current score
    Score,

    /// Show the current level
    Level,

    /// Show score and level
    Status,

    /// Save the goals to a file
    Save { destination: PathBuf },

    /// Load goals from a file, replacing the current ones
    Load { source: PathBuf },

    /// Show recorded events
    History,

    /// Roll up the event journal to CSV
    Rollup {
        /// Clean up processed journals after rollup
        #[arg(long)]
        cleanup: bool,
    },
}

/// Resolved file locations for one invocation
struct Paths {
    data_dir: PathBuf,
    ledger: PathBuf,
    journal: PathBuf,
}

fn main() -> Result<()> {
    quest_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| config.data.data_dir.clone());
    let paths = Paths {
        ledger: config.ledger_path(&data_dir),
        journal: config.journal_path(&data_dir),
        data_dir,
    };

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let mut quotes = RandomQuotes::new(config.motivation.quotes.clone());
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            let mut journal = JsonlJournal::new(&paths.journal);
            menu::run(stdin.lock(), stdout.lock(), &mut quotes, &mut journal)?;
            Ok(())
        }
        Commands::Create {
            kind,
            name,
            description,
            points,
            target,
            bonus,
        } => cmd_create(
            &paths,
            GoalDraft {
                kind,
                name,
                description,
                points,
                target,
                bonus,
            },
        ),
        Commands::Names => cmd_names(&paths),
        Commands::Details => cmd_details(&paths),
        Commands::Record { index } => cmd_record(&paths, index, &config),
        Commands::Score => {
            let ledger = load_or_default(&paths.ledger)?;
            println!("You have {} points.", ledger.score());
            Ok(())
        }
        Commands::Level => {
            let ledger = load_or_default(&paths.ledger)?;
            println!("You are currently at Level {}!", ledger.current_level());
            Ok(())
        }
        Commands::Status => {
            let ledger = load_or_default(&paths.ledger)?;
            print_status(&ledger);
            Ok(())
        }
        Commands::Save { destination } => cmd_save(&paths, &destination),
        Commands::Load { source } => cmd_load(&paths, &source),
        Commands::History => cmd_history(&paths),
        Commands::Rollup { cleanup } => cmd_rollup(&paths, cleanup),
    }
}

fn print_status(ledger: &Ledger) {
    println!("You have {} points.", ledger.score());
    println!("You are currently at Level {}!", ledger.current_level());
}

fn cmd_create(paths: &Paths, draft: GoalDraft) -> Result<()> {
    let mut ledger = load_or_default(&paths.ledger)?;
    let index = ledger.create_goal(&draft)?;
    save_ledger(&ledger, &paths.ledger)?;

    println!("✓ Goal created successfully! (#{})", index);
    Ok(())
}

fn cmd_names(paths: &Paths) -> Result<()> {
    let ledger = load_or_default(&paths.ledger)?;
    if ledger.is_empty() {
        println!("You have no goals yet.");
        return Ok(());
    }

    println!("The goals are:");
    for (index, name) in ledger.list_names() {
        println!("{}. {}", index, name);
    }
    Ok(())
}

fn cmd_details(paths: &Paths) -> Result<()> {
    let ledger = load_or_default(&paths.ledger)?;
    if ledger.is_empty() {
        println!("You have no goals yet.");
        return Ok(());
    }

    println!("The goals are:");
    for detail in ledger.list_details() {
        println!("{}", detail);
    }
    Ok(())
}

fn cmd_record(paths: &Paths, index: usize, config: &Config) -> Result<()> {
    let mut ledger = load_or_default(&paths.ledger)?;
    let mut quotes = RandomQuotes::new(config.motivation.quotes.clone());

    let report = ledger.record_event(index, &mut quotes)?;
    save_ledger(&ledger, &paths.ledger)?;

    // The ledger file is authoritative; a journal failure only loses history
    let event = EventRecord::from_report(&report, ledger.score(), chrono::Utc::now());
    if let Err(e) = JsonlJournal::new(&paths.journal).append(&event) {
        tracing::warn!("Failed to append event to journal {:?}: {}", paths.journal, e);
    }

    println!("{}", report);
    println!();
    print_status(&ledger);
    Ok(())
}

fn cmd_save(paths: &Paths, destination: &Path) -> Result<()> {
    let ledger = load_or_default(&paths.ledger)?;
    save_ledger(&ledger, destination)?;

    println!("✓ Goals saved to {}", destination.display());
    Ok(())
}

fn cmd_load(paths: &Paths, source: &Path) -> Result<()> {
    let ledger = load_ledger(source)?;
    save_ledger(&ledger, &paths.ledger)?;

    println!(
        "✓ Loaded {} goals from {}",
        ledger.len(),
        source.display()
    );

    // Journal scores belong to the replaced ledger; archive them and start fresh
    if paths.journal.exists() {
        let csv_path = paths.journal.with_extension("csv");
        let count = journal_to_csv_and_archive(&paths.journal, &csv_path)?;
        println!("  Archived {} earlier events to {}", count, csv_path.display());
    }
    print_status(&ledger);
    Ok(())
}

fn cmd_history(paths: &Paths) -> Result<()> {
    let events = read_events(&paths.journal)?;
    if events.is_empty() {
        println!("No events recorded yet.");
        return Ok(());
    }

    for event in &events {
        let bonus = if event.bonus > 0 {
            format!(" (bonus {})", event.bonus)
        } else {
            String::new()
        };
        println!(
            "{}  #{} {}  +{}{}  score {}",
            event.recorded_at.format("%Y-%m-%d %H:%M"),
            event.goal_index,
            event.goal_name,
            event.points,
            bonus,
            event.score_after
        );
    }
    Ok(())
}

fn cmd_rollup(paths: &Paths, cleanup: bool) -> Result<()> {
    if !paths.journal.exists() {
        println!("No event journal found - nothing to roll up.");
        return Ok(());
    }

    let csv_path = paths.journal.with_extension("csv");
    let count = journal_to_csv_and_archive(&paths.journal, &csv_path)?;

    println!("✓ Rolled up {} events to CSV", count);
    println!("  CSV: {}", csv_path.display());

    if cleanup {
        let cleaned = cleanup_processed_journals(&paths.data_dir)?;
        if cleaned > 0 {
            println!("✓ Cleaned up {} processed journals", cleaned);
        }
    }

    Ok(())
}
