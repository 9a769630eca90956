//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Answer relative-navigation queries (parent, first/next/previous sibling) against ordered trees
#[derive(Parser, Debug)]
#[command(name = "domnav")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (default: ./.domnav.toml if present)
    #[arg(short, long, global = true, env = "DOMNAV_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer all cases of the input
    Run {
        /// Case file (default: stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        input: Option<PathBuf>,
        /// Output file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Answer all cases and compare with an expected transcript
    Check {
        /// Case file (default: stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        input: Option<PathBuf>,
        /// Expected transcript
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        expected: PathBuf,
    },

    /// Show the tree of every case
    Tree {
        /// Case file (default: stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        input: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print effective configuration
    Show,
    /// Print a commented config template
    Template,
    /// Print config file locations
    Path,
}
