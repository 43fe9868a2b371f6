use std::process::ExitCode;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};

use docagent::cli::{Cli, Command, ConsoleProgress};
use docagent::db::{migrations, stats_repo};
use docagent::worker::JobStatus;
use docagent::{Agent, Config, ConfigError, Database, DirectoryScanner, WorkerPool};

fn main() -> ExitCode {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    if let Err(e) = docagent::logging::init(cli.json_logs) {
        eprintln!("warning: {}", e);
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> docagent::Result<ExitCode> {
    let config = cli.resolve_config()?;

    match cli.command {
        Command::Ingest { paths, verbose, .. } => ingest(&config, &paths, verbose),
        Command::Stats { limit } => {
            let db = open_database(&config)?;
            print_stats(&db, limit)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::InitDb => {
            let db = open_database(&config)?;
            let version = db.with_conn(migrations::applied_version)?;
            println!(
                "Database ready at schema version {} (latest {})",
                version,
                migrations::latest_version()
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn open_database(config: &Config) -> docagent::Result<Database> {
    let path = config.database_path().ok_or_else(|| ConfigError::Validation {
        message: "could not determine a database path; set database_path".to_string(),
    })?;
    info!(path = %path.display(), "Opening database");
    Ok(Database::open(&path)?)
}

fn ingest(config: &Config, paths: &[std::path::PathBuf], verbose: bool) -> docagent::Result<ExitCode> {
    let jobs = DirectoryScanner::expand(paths);
    if jobs.is_empty() {
        println!("No supported documents found");
        return Ok(ExitCode::SUCCESS);
    }

    let db = open_database(config)?;
    let agent = Arc::new(Agent::from_config(config, Arc::new(db))?);
    let worker_count = config.worker_count.min(jobs.len());
    let pool = WorkerPool::new(agent, worker_count, Arc::new(ConsoleProgress::new(verbose)))?;

    let shutdown = pool.shutdown_flag();
    if let Err(e) = ctrlc::set_handler(move || shutdown.store(true, Ordering::Relaxed)) {
        error!(error = %e, "Failed to install Ctrl-C handler");
    }

    // Never more jobs in flight than both channels can hold, so neither side blocks forever.
    let limit = worker_count * 2;
    let mut queue = jobs.into_iter();
    let mut in_flight = 0usize;
    let (mut saved, mut skipped, mut incomplete, mut failed) = (0usize, 0usize, 0usize, 0usize);

    loop {
        while in_flight < limit && !pool.is_shutdown() {
            match queue.next() {
                Some(job) => {
                    pool.submit(job)?;
                    in_flight += 1;
                }
                None => break,
            }
        }
        if in_flight == 0 {
            break;
        }

        match pool.recv_result_timeout(Duration::from_millis(100)) {
            Some(result) => {
                in_flight -= 1;
                match &result.status {
                    JobStatus::Skipped => skipped += 1,
                    JobStatus::Finished { .. } if result.is_saved() => saved += 1,
                    JobStatus::Finished { .. } => incomplete += 1,
                    JobStatus::Error(e) => {
                        failed += 1;
                        println!("==> {}: {}", result.source_path.display(), e);
                    }
                }
            }
            None if pool.is_shutdown() => {
                info!(in_flight, "Interrupted, waiting for running jobs");
                break;
            }
            None => {}
        }
    }

    pool.wait();

    println!(
        "\n{} saved, {} skipped as duplicates, {} incomplete, {} failed",
        saved, skipped, incomplete, failed
    );

    Ok(if failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn print_stats(db: &Database, limit: u32) -> docagent::Result<()> {
    let summary = stats_repo::summary(db)?;
    println!(
        "Documents: {} total, {} saved, {} in progress",
        summary.total_documents, summary.saved, summary.in_progress
    );
    if summary.stale > 0 {
        println!(
            "  {} abandoned (will be reprocessed on the next upload of the same file)",
            summary.stale
        );
    }
    for count in &summary.by_type {
        println!("  {:<16} {}", count.doc_type, count.count);
    }

    let invoices = stats_repo::recent_invoices(db, limit)?;
    if !invoices.is_empty() {
        println!("\nRecent invoices (total {:.2}):", stats_repo::invoice_total(db)?);
        for inv in invoices {
            println!(
                "  {:<24} {:<20} {:<10} {:>10.2}",
                inv.filename,
                inv.vendor.as_deref().unwrap_or("-"),
                inv.inv_date.as_deref().unwrap_or("-"),
                inv.total_amount
            );
        }
    }

    let resumes = stats_repo::recent_resumes(db, limit)?;
    if !resumes.is_empty() {
        println!("\nRecent resumes:");
        for r in resumes {
            println!("  {:<24} {:<24} {:>3}", r.filename, r.candidate_name, r.score);
        }
    }

    Ok(())
}
