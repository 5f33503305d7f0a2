//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for the RepCoach simulator.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// RepCoach - doctor persona simulator for medical rep training
///
/// Replays and scores conversations between a medical representative and a
/// simulated doctor persona.
#[derive(Parser, Debug)]
#[command(name = "repcoach")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, env = "REPCOACH_CONFIG", global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse the doctor persona catalog
    Personas {
        #[command(subcommand)]
        subcommand: PersonasSubcommand,
    },

    /// Score a finished transcript against a persona
    Evaluate {
        /// Transcript JSON: an array of {speaker, text} turns
        transcript: PathBuf,

        /// Persona id the conversation was held with
        #[arg(short, long)]
        persona: String,

        /// Phrase the representative was required to say (repeatable)
        #[arg(long = "must-say", value_name = "PHRASE")]
        must_say: Vec<String>,

        /// Phrase the representative must not say (repeatable)
        #[arg(long = "must-not-say", value_name = "PHRASE")]
        must_not_say: Vec<String>,

        /// Pretty-print the JSON report
        #[arg(long)]
        pretty: bool,
    },

    /// Replay representative turns through the tone engine
    Tone {
        /// Transcript JSON: an array of {speaker, text} turns
        transcript: PathBuf,

        /// Use the stateless quick path instead of the counter-based engine
        #[arg(long)]
        quick: bool,
    },

    /// Run a scripted conversation through a stored session
    Simulate {
        /// Script JSON: {"turns": [{"rep": ..., "reply": ...}]}
        script: PathBuf,

        /// Persona id to talk to
        #[arg(short, long)]
        persona: String,

        /// Store the session under this id (must not already exist)
        #[arg(long)]
        session_id: Option<String>,

        /// Phrase the representative was required to say (repeatable)
        #[arg(long = "must-say", value_name = "PHRASE")]
        must_say: Vec<String>,

        /// Phrase the representative must not say (repeatable)
        #[arg(long = "must-not-say", value_name = "PHRASE")]
        must_not_say: Vec<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Persona catalog subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum PersonasSubcommand {
    /// List persona ids with their name and baseline skepticism
    List,

    /// Print one persona profile as JSON
    Show {
        /// Persona id, e.g. doc_001
        id: String,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the current configuration
    Show,

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate,
}
