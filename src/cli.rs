//! CLI argument parsing for the haulplan-worker binary.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "haulplan-worker", about = "HaulPlan trip planning worker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the worker server (default if no subcommand given)
    Serve,
    /// Plan a single trip from the command line and print the result as JSON
    Plan {
        /// Current driver location (free-text address)
        #[arg(long)]
        current: String,
        /// Pickup address
        #[arg(long)]
        pickup: String,
        /// Dropoff address
        #[arg(long)]
        dropoff: String,
        /// Cycle hours already used (0-70)
        #[arg(long, default_value_t = 0.0)]
        cycle_used: f64,
    },
}
