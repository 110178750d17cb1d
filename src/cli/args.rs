//! Command-line argument parsing for motioncheck
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use crate::config::AnalysisConfig;
use clap::{Args as ClapArgs, Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

/// motioncheck - flag bones that move too fast in a baked animation
#[derive(Parser, Debug)]
#[command(name = "motioncheck")]
#[command(version)]
#[command(about = "Check bone motion speed in baked character animation", long_about = None)]
pub struct Args {
    /// Settings file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress everything except the report)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check every bone of every armature in a scene dump
    Check {
        /// Scene dump (JSON)
        scene: PathBuf,

        #[command(flatten)]
        options: CheckOptions,
    },

    /// Check a single bone
    Recheck {
        /// Scene dump (JSON)
        scene: PathBuf,

        /// Armature name
        #[arg(long)]
        armature: String,

        /// Bone name
        #[arg(long)]
        bone: String,

        #[command(flatten)]
        options: CheckOptions,
    },

    /// Display current settings
    Config {
        /// Write the settings file with defaults if it does not exist
        #[arg(long)]
        init: bool,
    },
}

/// Overrides applied on top of the settings file
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct CheckOptions {
    /// Violation threshold in distance per frame step
    #[arg(long)]
    pub max_speed: Option<f64>,

    /// Check every Nth frame
    #[arg(long)]
    pub frame_step: Option<i64>,

    /// Check all bones, not only the Roblox rig bones
    #[arg(long)]
    pub all_bones: bool,

    /// Check only selected armatures
    #[arg(long)]
    pub selected_only: bool,

    /// Print the problem registry as JSON
    #[arg(long)]
    pub json: bool,
}

impl CheckOptions {
    /// Merge overrides into a base config
    pub fn apply(&self, base: &AnalysisConfig) -> AnalysisConfig {
        let mut config = base.clone();
        if let Some(max_speed) = self.max_speed {
            config.max_speed = max_speed;
        }
        if let Some(frame_step) = self.frame_step {
            config.frame_step = frame_step;
        }
        if self.all_bones {
            config.roblox_bones_only = false;
        }
        if self.selected_only {
            config.selected_only = true;
        }
        config
    }
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Check if should show progress bars
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }

    /// Check if skipped units should be listed
    pub fn show_events(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }

    /// Default log level when RUST_LOG is not set
    pub fn log_level(&self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::Error,
            Verbosity::Normal => LevelFilter::Warn,
            Verbosity::Verbose => LevelFilter::Info,
            Verbosity::VeryVerbose => LevelFilter::Debug,
        }
    }
}
