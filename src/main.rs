//! Binary entry point for the `unzipr` command-line tool.
//!
//! With a destination argument, extracts every entry; without one, parses
//! the archive and CRC-checks every entry without writing anything (a
//! dry-run / validation mode).

use std::fs;
use std::process::ExitCode;

use clap::Parser;

use unzipr::cli::args::Cli;
use unzipr::cli::constants::{report_error, set_display_level};
use unzipr::zip::{extract_entry, locate_eocd};

fn run(cli: &Cli) -> bool {
    set_display_level(cli.display_level());

    let data = match fs::read(&cli.archive) {
        Ok(data) => data,
        Err(e) => {
            report_error("error", &cli.archive.display().to_string(), &unzipr::ExtractError::Io(e));
            return false;
        }
    };

    let eocd = match locate_eocd(&data) {
        Ok(eocd) => eocd,
        Err(e) => {
            report_error("error", &cli.archive.display().to_string(), &e);
            return false;
        }
    };

    let entries = match unzipr::zip::central::read_central_directory(&data, &eocd) {
        Ok(entries) => entries,
        Err(e) => {
            report_error("error", &cli.archive.display().to_string(), &e);
            return false;
        }
    };

    unzipr::displaylevel!(3, "{} entries found in {}\n", entries.len(), cli.archive.display());

    match &cli.destination {
        Some(destination) => {
            let results = unzipr::zip::extract_all(&data, &entries, destination);
            let mut ok = true;
            for (index, outcome) in results {
                let name = String::from_utf8_lossy(entries[index].file_name).into_owned();
                match outcome {
                    Ok(path) => unzipr::displaylevel!(2, "{}\n", path.display()),
                    Err(e) => {
                        report_error("error", &name, &e);
                        ok = false;
                    }
                }
            }
            ok
        }
        None => {
            let mut ok = true;
            for entry in &entries {
                let name = String::from_utf8_lossy(entry.file_name).into_owned();
                if let Err(e) = extract_entry(&data, entry) {
                    report_error("error", &name, &e);
                    ok = false;
                }
            }
            ok
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if run(&cli) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
