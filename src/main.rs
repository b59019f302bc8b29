// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Load the URL list from a file or stdin
// 3. Run the concurrent checker over the batch
// 4. Write the split files, print the table or JSON, exit with proper code
//    (0 = all reachable, 1 = some unreachable, 2 = error)
//
// Ctrl-C cancels the batch instead of killing the process outright:
// finished checks are still reported, unstarted ones are abandoned.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod checker; // src/checker/ - the concurrent checking engine
mod cli; // src/cli.rs - command-line parsing
mod input; // src/input.rs - URL list loading
mod report; // src/report.rs - table/JSON/split-file rendering

use anyhow::Result;
use clap::Parser;
use std::time::Duration;

use checker::{CheckContext, CheckError, CheckResult, Checker};
use cli::Cli;

// The #[tokio::main] attribute transforms our async main into a real main
// function that sets up the tokio runtime
#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole anyhow context chain on one line
            eprintln!("Error: {e:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let urls = input::load_urls(cli.file.as_deref())?;
    if urls.is_empty() {
        eprintln!("no urls provided");
        return Ok(2);
    }

    // The checker normalizes these again, but clamping here keeps the
    // casts from negative flag values well-defined.
    let checker = Checker::new(
        cli.concurrency.max(1) as usize,
        Duration::from_secs(cli.timeout.max(0) as u64),
        cli.retries.max(0) as u32,
    );

    let ctx = match cli.deadline {
        Some(secs) => CheckContext::with_deadline(Duration::from_secs(secs)),
        None => CheckContext::new(),
    };

    // Ctrl-C cancels the batch; the drain below then finishes quickly and
    // whatever completed is still reported.
    {
        let ctx = ctx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                ctx.cancel();
            }
        });
    }

    println!("🔍 Checking {} url(s)...\n", urls.len());

    let (results, deadline_hit) = match checker.check(&ctx, &urls).await {
        Ok(results) => (results, false),
        Err(CheckError::DeadlineExceeded { results }) => (results, true),
    };

    report::write_split(&results, &cli.out_dir)?;
    print_results(&results, cli.json)?;

    if ctx.is_cancelled() {
        let finished = results.iter().filter(|r| r.attempts > 0).count();
        eprintln!("cancelled: {finished}/{} checks finished", results.len());
    }

    if deadline_hit {
        let finished = results.iter().filter(|r| r.attempts > 0).count();
        eprintln!(
            "check error: deadline exceeded ({finished}/{} checks finished)",
            results.len()
        );
        return Ok(2);
    }

    let unreachable = results.iter().filter(|r| !r.ok).count();
    if unreachable > 0 {
        Ok(1) // Exit code 1 = at least one URL unreachable
    } else {
        Ok(0) // Exit code 0 = all good
    }
}

// Prints the results either as a table or JSON
fn print_results(results: &[CheckResult], json: bool) -> Result<()> {
    if json {
        println!("{}", report::render_json(results)?);
    } else {
        print!("{}", report::render_table(results));
        print_summary(results);
    }
    Ok(())
}

fn print_summary(results: &[CheckResult]) {
    let reachable = results.iter().filter(|r| r.ok).count();

    println!();
    println!("📊 Summary:");
    println!("   ✅ Reachable: {reachable}");
    println!("   ❌ Unreachable: {}", results.len() - reachable);
    println!("   📋 Total: {}", results.len());
}
