use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;
use crate::constants::DEFAULT_PORT;
use crate::utils::get_data_dir;

#[derive(Parser)]
#[command(name = "stockboard")]
#[command(about = "Stock observation board CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Directory holding one CSV file per company
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
    /// Show what the observation directory holds
    Status {
        /// Directory holding one CSV file per company
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
}

pub async fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, data_dir } => {
            commands::serve::run(port, data_dir.unwrap_or_else(get_data_dir)).await;
        }
        Commands::Status { data_dir } => {
            commands::status::run(data_dir.unwrap_or_else(get_data_dir));
        }
    }
}
