//! PDF Merge CLI tool
//!
//! Merges the PDF files of a folder into one document, either through an
//! interactive menu or non-interactively with `--dir`.

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use pdf_merge::report::{self, ReportLine};
use pdf_merge::shell::{self, Outcome, TerminalPrompter};
use pdf_merge::{merge, Error, MergeOptions, OverwritePolicy, Selection};

/// PDF Merge - combine the PDFs of a folder into one file
#[derive(Parser)]
#[command(name = "pdf-merge")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Interactive menu
    pdf-merge

    # Merge every PDF in a folder into handouts/week-3.pdf
    pdf-merge --dir handouts --output week-3

    # Merge two files, keeping an existing output untouched
    pdf-merge --dir handouts --select intro.pdf --select quiz.pdf --no-clobber")]
struct Cli {
    /// Folder containing the PDFs; runs without prompts when given
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Merge only this file name (repeatable); requires --dir
    #[arg(short, long = "select", value_name = "NAME", requires = "dir")]
    select: Vec<String>,

    /// Output file name (.pdf is added if missing); blank for a timestamped name
    #[arg(short, long, requires = "dir")]
    output: Option<String>,

    /// Fail instead of replacing an existing output file
    #[arg(long)]
    no_clobber: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let overwrite = if cli.no_clobber {
        OverwritePolicy::Refuse
    } else {
        OverwritePolicy::Replace
    };

    let result = match cli.dir {
        Some(dir) => cmd_batch(dir, cli.select, cli.output.as_deref().unwrap_or(""), overwrite),
        None => cmd_interactive(overwrite),
    };

    if let Err(e) = result {
        report_error(&e);
        process::exit(e.exit_code());
    }
}

/// Merge without prompting
fn cmd_batch(
    dir: PathBuf,
    select: Vec<String>,
    output: &str,
    overwrite: OverwritePolicy,
) -> Result<(), Error> {
    let selection = if select.is_empty() {
        Selection::All
    } else {
        Selection::Chosen(select)
    };

    let options = MergeOptions {
        overwrite,
        ..MergeOptions::default()
    };

    let result = merge(&dir, &selection, output, &options)?;
    print_lines(&report::summarize(&result));
    Ok(())
}

/// Run the interactive menu
fn cmd_interactive(overwrite: OverwritePolicy) -> Result<(), Error> {
    let mut prompter = TerminalPrompter::new();

    match shell::run(&mut prompter, overwrite)? {
        Outcome::Exited => tracing::info!("exit chosen from menu"),
        // The prompter has already shown the summary
        Outcome::Merged(result) => tracing::info!(pages = result.page_count, "session finished"),
    }
    Ok(())
}

fn print_lines(lines: &[ReportLine]) {
    for line in lines {
        println!("{}", line);
    }
}

/// Print an error, including whatever per-file detail it carries
fn report_error(error: &Error) {
    if let Error::NothingMerged { failures, warnings } = error {
        for warning in warnings {
            eprintln!("Warning: {}", warning);
        }
        for line in report::failure_lines(failures) {
            eprintln!("{}", line);
        }
    }
    eprintln!("Error: {}", error);
}
