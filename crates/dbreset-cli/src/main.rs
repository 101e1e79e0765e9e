//! dbreset CLI
//!
//! Running with no arguments executes the entire reset-and-reimport
//! sequence against the current working directory.

use clap::Parser;
use dbreset_core::logging::{self, Profile};
use dbreset_core::{
    ExclusionSet, LauncherServiceManager, Layout, MysqlTools, ResetProcedure,
};
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "dbreset")]
#[command(
    about = "Reset the bundled database from its snapshot and re-import a full dump",
    long_about = None
)]
struct Cli {
    /// Base directory of the bundled stack (defaults to the current directory)
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Where to write the SQL dump (defaults to backup.sql in the base directory)
    #[arg(long)]
    dump_file: Option<PathBuf>,

    /// Exit immediately instead of waiting for a keypress
    #[arg(long)]
    no_pause: bool,

    /// Emit JSON logs instead of human-readable output
    #[arg(long)]
    json_logs: bool,
}

fn main() {
    let cli = Cli::parse();

    logging::init(if cli.json_logs {
        Profile::Production
    } else {
        Profile::Development
    });

    let exit_code = match run(&cli) {
        Ok(()) => {
            println!("Clean reset completed.");
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    if !cli.no_pause {
        pause();
    }

    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let base = match &cli.base_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };

    let mut layout = Layout::new(base);
    if let Some(dump_file) = &cli.dump_file {
        layout = layout.with_dump_file(dump_file.clone());
    }

    let exclusions = ExclusionSet::standard();
    let service = LauncherServiceManager::from_layout(&layout);
    let sql = MysqlTools::from_layout(&layout);

    let report = ResetProcedure::new(&layout, &exclusions, &service, &sql).run()?;

    for warning in &report.warnings {
        eprintln!("Warning: {}", warning);
    }

    Ok(())
}

fn pause() {
    print!("\nPress Enter to exit...");
    let _ = std::io::stdout().flush();
    let mut line = String::new();
    let _ = std::io::stdin().lock().read_line(&mut line);
}
