use chrono::Utc;
use clap::{Parser, Subcommand};
use readvibe_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "readvibe")]
#[command(about = "Reading tracker with session validation and points", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a PDF book in the library
    Add {
        /// Path to the PDF file
        pdf: PathBuf,

        /// Book title (defaults to the file name)
        #[arg(long)]
        title: Option<String>,

        /// Book author
        #[arg(long, default_value = "Unknown")]
        author: String,
    },

    /// List registered books with progress
    Books,

    /// Remove a book from the library (the PDF file is kept)
    Remove {
        /// Book title or id prefix
        book: String,
    },

    /// Log a reading session
    Log {
        /// Book title or id prefix
        book: String,

        /// Page the session started on (1-based)
        #[arg(long)]
        start: u32,

        /// Page reached when the session ended
        #[arg(long)]
        end: u32,

        /// Minutes spent reading
        #[arg(long)]
        minutes: u32,

        /// Show the outcome without persisting anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Estimate reading time for a page span
    Estimate {
        /// Book title or id prefix
        book: String,

        /// First page of the span (1-based)
        #[arg(long)]
        start: u32,

        /// Page after the last page of the span
        #[arg(long)]
        end: u32,
    },

    /// Show cumulative statistics
    Stats,

    /// Show reward tier and goal eligibility
    Rewards,

    /// Set the reading speed used by the estimator
    Profile {
        /// Reading speed in words per minute
        #[arg(long)]
        wpm: u32,
    },

    /// Set page goals
    Goals {
        #[arg(long)]
        daily: Option<u32>,

        #[arg(long)]
        weekly: Option<u32>,

        #[arg(long)]
        monthly: Option<u32>,
    },

    /// Roll up WAL sessions to CSV
    Rollup {
        /// Clean up processed WAL files after rollup
        #[arg(long)]
        cleanup: bool,
    },
}

/// File layout within the data directory
struct DataPaths {
    account: PathBuf,
    wal_dir: PathBuf,
    wal: PathBuf,
    csv: PathBuf,
}

impl DataPaths {
    fn new(data_dir: &Path) -> Self {
        let wal_dir = data_dir.join("wal");
        Self {
            account: data_dir.join("account.json"),
            wal: wal_dir.join("reading_sessions.wal"),
            wal_dir,
            csv: data_dir.join("sessions.csv"),
        }
    }
}

fn main() -> Result<()> {
    readvibe_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let paths = DataPaths::new(&data_dir);

    match cli.command {
        Commands::Add { pdf, title, author } => cmd_add(&paths, &pdf, title, &author),
        Commands::Books => cmd_books(&paths),
        Commands::Remove { book } => cmd_remove(&paths, &book),
        Commands::Log {
            book,
            start,
            end,
            minutes,
            dry_run,
        } => cmd_log(&paths, &config, &book, start, end, minutes, dry_run),
        Commands::Estimate { book, start, end } => cmd_estimate(&paths, &book, start, end),
        Commands::Stats => cmd_stats(&paths),
        Commands::Rewards => cmd_rewards(&paths),
        Commands::Profile { wpm } => cmd_profile(&paths, wpm),
        Commands::Goals {
            daily,
            weekly,
            monthly,
        } => cmd_goals(&paths, daily, weekly, monthly),
        Commands::Rollup { cleanup } => cmd_rollup(&paths, cleanup),
    }
}

fn cmd_add(paths: &DataPaths, pdf: &Path, title: Option<String>, author: &str) -> Result<()> {
    let title = title.unwrap_or_else(|| library::title_from_path(pdf));
    let book = register_book(pdf, &title, author)?;

    let pages = book.pages;
    let id = book.id;
    AccountState::update(&paths.account, |state| {
        if state.books.iter().any(|b| b.pdf_path == book.pdf_path) {
            return Err(Error::Book(format!(
                "{} is already in the library",
                book.pdf_path.display()
            )));
        }
        state.books.push(book.clone());
        Ok(())
    })?;

    println!("✓ Added \"{}\" ({} pages)", title, pages);
    println!("  id: {}", id);
    Ok(())
}

fn cmd_books(paths: &DataPaths) -> Result<()> {
    let state = AccountState::load(&paths.account)?;

    if state.books.is_empty() {
        println!("No books yet. Add one with `readvibe add <pdf>`.");
        return Ok(());
    }

    for book in &state.books {
        let pct = if book.pages > 0 {
            (book.progress.current_page as f64 / book.pages as f64 * 100.0).min(100.0)
        } else {
            0.0
        };
        println!(
            "{}  {} — {} ({}/{} pages, {:.0}%)",
            &book.id.to_string()[..8],
            book.title,
            book.author,
            book.progress.current_page,
            book.pages,
            pct
        );
    }
    Ok(())
}

fn cmd_remove(paths: &DataPaths, book_key: &str) -> Result<()> {
    let mut removed_title = None;
    AccountState::update(&paths.account, |state| match state.remove_book(book_key) {
        Some(book) => {
            removed_title = Some(book.title);
            Ok(())
        }
        None => Err(Error::Book(format!("no book matches {:?}", book_key))),
    })?;

    if let Some(title) = removed_title {
        println!("✓ Removed \"{}\"", title);
    }
    Ok(())
}

fn cmd_log(
    paths: &DataPaths,
    config: &Config,
    book_key: &str,
    start: u32,
    end: u32,
    minutes: u32,
    dry_run: bool,
) -> Result<()> {
    let state = AccountState::load(&paths.account)?;
    let book = state
        .find_book(book_key)
        .ok_or_else(|| Error::Book(format!("no book matches {:?}", book_key)))?;

    if start < 1 || end > book.pages.saturating_add(1) {
        return Err(Error::Book(format!(
            "page range {}-{} is outside \"{}\" (1-{})",
            start, end, book.title, book.pages
        )));
    }

    let claim = SessionClaim {
        book_id: book.id,
        start_page: start,
        end_page: end,
        minutes_spent: minutes,
    };

    let source = PdfBook::open(&book.pdf_path)?;
    let outcome = evaluate_claim(&source, &claim, &state.profile, &config.validation);

    if let Some(estimate) = outcome.estimated_minutes {
        println!("Estimated time for the span: ~{:.1} min", estimate);
    } else {
        println!("No estimate available for the span");
    }

    if !outcome.accepted {
        println!("✗ Session rejected: reading time is inconsistent with the page content.");
        return Err(Error::Other("session rejected".into()));
    }

    if dry_run {
        println!(
            "✓ Plausible session: {} pages in {} min would earn {} points",
            claim.pages_read(),
            minutes,
            outcome.points_awarded
        );
        println!("\n[Dry run - not logging session]");
        return Ok(());
    }

    // Persist the session record first, then commit the ledger
    let session = ReadingSession {
        id: uuid::Uuid::new_v4(),
        book_id: claim.book_id,
        logged_at: Utc::now(),
        start_page: claim.start_page,
        end_page: claim.end_page,
        minutes_spent: claim.minutes_spent,
        points_awarded: outcome.points_awarded,
        estimated_minutes: outcome.estimated_minutes,
    };
    let mut sink = JsonlSink::new(&paths.wal);
    sink.append(&session)?;

    AccountState::update(&paths.account, |state| {
        let mut stats = state.stats.clone();
        let book = state
            .find_book_mut(book_key)
            .ok_or_else(|| Error::Book(format!("no book matches {:?}", book_key)))?;

        apply_session(&claim, &outcome, &mut stats, &mut book.progress)?;
        state.stats = stats;
        Ok(())
    })?;

    println!(
        "✓ Session logged! +{} points ({} pages in {} min)",
        outcome.points_awarded,
        claim.pages_read(),
        minutes
    );
    Ok(())
}

fn cmd_estimate(paths: &DataPaths, book_key: &str, start: u32, end: u32) -> Result<()> {
    let state = AccountState::load(&paths.account)?;
    let book = state
        .find_book(book_key)
        .ok_or_else(|| Error::Book(format!("no book matches {:?}", book_key)))?;

    if start < 1 || end < start {
        return Err(Error::Book(format!("invalid page range {}-{}", start, end)));
    }

    let source = PdfBook::open(&book.pdf_path)?;
    let total = estimate_range(
        &source,
        (start - 1) as usize,
        (end - 1) as usize,
        state.profile.words_per_minute,
    );

    if total > 0.0 {
        println!(
            "Pages {}-{} of \"{}\": ~{:.1} min at {} wpm",
            start,
            end,
            book.title,
            total,
            state.profile.words_per_minute
        );
    } else {
        println!(
            "No estimate available for pages {}-{} of \"{}\"",
            start, end, book.title
        );
    }
    Ok(())
}

fn cmd_stats(paths: &DataPaths) -> Result<()> {
    let state = AccountState::load(&paths.account)?;
    let stats = &state.stats;

    let speed = stats.total_pages as f64 / stats.total_time.max(1) as f64;

    println!("╭─────────────────────────────────────────╮");
    println!("│  READING STATS");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Total pages: {}", stats.total_pages);
    println!("  Total time:  {} min", stats.total_time);
    println!("  Speed:       {:.2} pages/min", speed);
    println!("  Points:      {}", stats.points);
    println!();
    println!(
        "  Weekly pages:  {}/{}",
        stats.weekly_pages, state.goals.weekly
    );
    println!(
        "  Monthly pages: {}/{}",
        stats.monthly_pages, state.goals.monthly
    );

    let recent = load_recent_sessions(&paths.wal, &paths.csv, 7)?;
    println!();
    println!(
        "  Last 7 days: {} sessions, {} pages",
        recent.len(),
        history::total_pages(&recent)
    );

    Ok(())
}

fn cmd_rewards(paths: &DataPaths) -> Result<()> {
    let state = AccountState::load(&paths.account)?;

    let tier = tier_for_points(state.stats.points);
    let report = GoalReport::evaluate(&state.stats, &state.goals);

    println!("╭─────────────────────────────────────────╮");
    println!("│  REWARDS");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  Tier: {} ({} points) — reward: {}",
        tier.name, state.stats.points, tier.reward
    );
    println!();
    println!(
        "  Weekly goal:  {} ({}/{})",
        if report.weekly_met { "✓ met" } else { "pending" },
        state.stats.weekly_pages,
        state.goals.weekly
    );
    println!(
        "  Monthly goal: {} ({}/{})",
        if report.monthly_met { "✓ met" } else { "pending" },
        state.stats.monthly_pages,
        state.goals.monthly
    );
    println!();

    if report.gift_card_eligible() {
        println!("  🎉 Eligible for a $5 Gift Card!");
    } else {
        println!(
            "  {} pages for weekly • {} pages for monthly",
            report.weekly_remaining, report.monthly_remaining
        );
    }

    Ok(())
}

fn cmd_profile(paths: &DataPaths, wpm: u32) -> Result<()> {
    if wpm == 0 {
        return Err(Error::Config("reading speed must be at least 1 wpm".into()));
    }

    AccountState::update(&paths.account, |state| {
        state.profile.words_per_minute = wpm;
        Ok(())
    })?;

    println!("✓ Reading speed set to {} wpm", wpm);
    Ok(())
}

fn cmd_goals(
    paths: &DataPaths,
    daily: Option<u32>,
    weekly: Option<u32>,
    monthly: Option<u32>,
) -> Result<()> {
    let state = AccountState::update(&paths.account, |state| {
        if let Some(daily) = daily {
            state.goals.daily = daily;
        }
        if let Some(weekly) = weekly {
            state.goals.weekly = weekly;
        }
        if let Some(monthly) = monthly {
            state.goals.monthly = monthly;
        }
        Ok(())
    })?;

    println!(
        "✓ Goals: {} daily, {} weekly, {} monthly (pages)",
        state.goals.daily, state.goals.weekly, state.goals.monthly
    );
    Ok(())
}

fn cmd_rollup(paths: &DataPaths, cleanup: bool) -> Result<()> {
    if !paths.wal.exists() {
        println!("No WAL file found - nothing to roll up.");
        return Ok(());
    }

    let count = csv_rollup::wal_to_csv_and_archive(&paths.wal, &paths.csv)?;

    println!("✓ Rolled up {} sessions to CSV", count);
    println!("  CSV: {}", paths.csv.display());

    if cleanup {
        let cleaned = csv_rollup::cleanup_processed_wals(&paths.wal_dir)?;
        if cleaned > 0 {
            println!("✓ Cleaned up {} processed WAL files", cleaned);
        }
    }

    Ok(())
}
