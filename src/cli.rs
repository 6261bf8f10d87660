//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ctfc challenge site compiler CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory (config lookup and challenge discovery)
    #[arg(short, long, default_value = "./")]
    pub root: PathBuf,

    /// Output root directory. Each challenge is written to <output>/<name>/
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file name (default: ctfc.toml)
    #[arg(short = 'C', long, default_value = "ctfc.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Apply directives and output a single challenge
    Compile {
        /// Path to the challenge source directory (e.g. pipeline/)
        source: PathBuf,
    },

    /// Discover and compile every challenge directory, then generate the homepage
    CompileAll,

    /// Serve a challenge with live directive processing
    Serve {
        /// Path to the challenge source directory (e.g. pipeline/)
        source: PathBuf,

        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[allow(unused)]
impl Cli {
    pub const fn is_compile(&self) -> bool {
        matches!(self.command, Commands::Compile { .. })
    }
    pub const fn is_compile_all(&self) -> bool {
        matches!(self.command, Commands::CompileAll)
    }
    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }
}
