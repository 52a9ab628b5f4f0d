//! Command-line argument definition.
//!
//! Invocation: `unzipr <zipfile> [destination_directory] [-v]...`.
//! With a destination, every entry is extracted into that directory,
//! creating intermediate directories as needed. Without one, the archive
//! is parsed and every entry's CRC-32 is checked, but nothing is written.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = super::constants::COMPRESSOR_NAME, version, about = "Extract ZIP archives")]
pub struct Cli {
    /// Path to the ZIP archive to read.
    pub archive: PathBuf,

    /// Directory to extract into. If omitted, the archive is only parsed
    /// and validated.
    pub destination: Option<PathBuf>,

    /// Increase verbosity. May be repeated (-v, -vv, -vvv).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Display level implied by the verbosity flags, on top of the default
    /// of 2 ("normal").
    pub fn display_level(&self) -> u32 {
        2 + self.verbose as u32
    }
}
