//! Command-line interface definitions.
//!
//! Two subcommands share a settings file and User-Agent override:
//!
//! ```sh
//! # CSV snapshot of every profile listed for a country
//! mathraining_harvest profiles --country 48 --pages 3 -o ./snapshots
//!
//! # Solved problems of one user, by category and points
//! mathraining_harvest histogram --url https://www.mathraining.be/users/1234
//! ```

use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML settings file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// User-Agent header sent with every request
    #[arg(long, global = true, env = "MATHRAINING_USER_AGENT")]
    pub user_agent: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Crawl country listing pages and snapshot every profile to CSV
    Profiles {
        /// Country identifier used by the listing filter
        #[arg(long)]
        country: Option<u32>,

        /// Number of listing pages to crawl
        #[arg(long)]
        pages: Option<u32>,

        /// Directory the CSV snapshot is written to
        #[arg(short, long, default_value = ".")]
        output_dir: String,

        /// Prefix of the snapshot file name
        #[arg(long)]
        dataset_name: Option<String>,

        /// Drop profiles listed more than once
        #[arg(long)]
        dedupe: bool,
    },

    /// Chart one profile's solved problems by category and point value
    Histogram {
        /// Mathraining profile URL (prompted for when omitted)
        #[arg(short, long)]
        url: Option<String>,

        /// Write the chart to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Also write the counts as JSON to this file
        #[arg(long)]
        json: Option<String>,
    },
}

/// Ask for a profile URL on stdin.
pub fn prompt_for_url() -> io::Result<String> {
    print!("Please enter the Mathraining profile URL: ");
    io::stdout().flush()?;
    read_url(io::stdin().lock())
}

fn read_url<R: BufRead>(mut input: R) -> io::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let url = line.trim();
    if url.is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "no profile URL given"));
    }
    Ok(url.to_string())
}
