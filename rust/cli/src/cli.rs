//! Command-line argument types.

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "rentpoker",
    version,
    about = "Self-training no-limit hold'em ring game"
)]
pub struct RentpokerCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play a run of hands between agents
    Sim(SimArgs),
    /// Show the blind schedule for a table
    Blinds {
        #[arg(long)]
        players: Option<usize>,
        #[arg(long)]
        stack: Option<u32>,
        #[arg(long)]
        rebuys: Option<u32>,
        #[arg(long)]
        hands: Option<u64>,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SimArgs {
    /// Seats at the table (2-10)
    #[arg(long)]
    pub players: Option<usize>,
    /// Hand budget; also paces the blind levels
    #[arg(long)]
    pub hands: Option<u64>,
    #[arg(long)]
    pub stack: Option<u32>,
    /// Rebuys allowed per player
    #[arg(long)]
    pub rebuys: Option<u32>,
    #[arg(long)]
    pub seed: Option<u64>,
    /// learning or heuristic
    #[arg(long)]
    pub agent: Option<String>,
    /// Policy file to start from
    #[arg(long)]
    pub policy_in: Option<String>,
    /// Where to save the learned policies
    #[arg(long)]
    pub policy_out: Option<String>,
    /// JSONL event log
    #[arg(long)]
    pub events: Option<String>,
    /// Only print the final summary
    #[arg(long)]
    pub quiet: bool,
}
