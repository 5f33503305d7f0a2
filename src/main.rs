//! RepCoach - doctor persona simulator
//!
//! This is the main entry point for the `repcoach` binary. It wires the
//! configuration, persona catalog and transcript store to the simulation
//! library and prints JSON results on stdout.

use std::fs;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use repcoach::cli::{Cli, Commands, ConfigSubcommand, PersonasSubcommand};
use repcoach::config::{self, CoachConfig};
use repcoach::error::Error;
use repcoach::evaluation::Evaluator;
use repcoach::lexicon::Lexicon;
use repcoach::logging;
use repcoach::persona::PersonaCatalog;
use repcoach::session::{ConversationScript, ConversationService, FileTranscriptStore};
use repcoach::tone::{decide_quick, QuickToneState, ToneEngine, ToneState};
use repcoach::transcript::{Speaker, Transcript};

fn main() {
    // Parse CLI arguments first (before logging, so we know verbosity)
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        match err.downcast_ref::<Error>() {
            Some(e) => {
                eprint!("{}", e.format_for_terminal());
                std::process::exit(e.exit_code());
            }
            None => {
                eprintln!("\x1b[31mError\x1b[0m: {:#}", err);
                std::process::exit(1);
            }
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // Config commands use minimal logging
    if let Commands::Config { subcommand } = &cli.command {
        logging::init_simple(tracing::Level::WARN)?;
        return handle_config_command(subcommand, cli.config.as_deref());
    }

    let config = CoachConfig::load(cli.config.as_deref())?;

    // The guards must be kept alive for the lifetime of the program
    let _log_guards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;
    debug!(version = env!("CARGO_PKG_VERSION"), "Starting RepCoach");

    let catalog = PersonaCatalog::load(config.persona_dir().as_deref())?;
    let lexicon = config.lexicon();

    match cli.command {
        Commands::Personas { subcommand } => handle_personas_command(&subcommand, &catalog),
        Commands::Evaluate {
            transcript,
            persona,
            must_say,
            must_not_say,
            pretty,
        } => {
            let transcript: Transcript = read_json(&transcript)?;
            let evaluation = Evaluator::new(&lexicon)
                .with_highlight_limit(config.evaluation.highlight_limit)
                .evaluate_for(&catalog, &persona, &transcript, &must_say, &must_not_say)?;
            print_json(&evaluation, pretty)
        }
        Commands::Tone { transcript, quick } => {
            let transcript: Transcript = read_json(&transcript)?;
            if quick {
                print_json(&replay_quick_tone(&lexicon, &transcript), true)
            } else {
                print_json(&replay_tone(&lexicon, &transcript), true)
            }
        }
        Commands::Simulate {
            script,
            persona,
            session_id,
            must_say,
            must_not_say,
        } => {
            let script: ConversationScript = read_json(&script)?;
            let store = FileTranscriptStore::new(config.transcript_dir());
            let turn_seconds = i64::try_from(config.conversation.turn_seconds).unwrap_or(i64::MAX);
            let service = ConversationService::new(&catalog, &store, &lexicon)
                .with_turn_seconds(turn_seconds)
                .with_highlight_limit(config.evaluation.highlight_limit);

            let record = service.start(&persona, session_id)?;
            let turns = service.replay(&record.session_id, &script)?;
            let evaluation = service.end(&record.session_id, &must_say, &must_not_say)?;

            info!(
                session = %record.session_id,
                dir = %store.dir().display(),
                turns = turns.len(),
                "Simulation finished"
            );
            print_json(
                &SimulationReport {
                    session_id: &record.session_id,
                    turns: &turns,
                    evaluation: &evaluation,
                },
                true,
            )
        }
        Commands::Config { .. } => unreachable!("handled above"),
    }
}

#[derive(Serialize)]
struct SimulationReport<'a> {
    session_id: &'a str,
    turns: &'a [repcoach::session::TurnOutcome],
    evaluation: &'a repcoach::evaluation::Evaluation,
}

/// One tone decision, tied to the representative turn that caused it.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToneStep<T: Serialize> {
    turn_index: usize,
    decision: T,
}

/// Carry the counter-based tone state across every representative turn.
fn replay_tone(lexicon: &Lexicon, transcript: &Transcript) -> Vec<ToneStep<repcoach::tone::ToneDecision>> {
    let engine = ToneEngine::new(lexicon);
    let mut state = ToneState::default();
    let mut last_persona = "";
    let mut steps = Vec::new();

    for turn in transcript.turns() {
        if turn.speaker == Speaker::Persona {
            last_persona = turn.text.as_str();
            continue;
        }
        if !turn.speaker.is_representative() {
            continue;
        }

        let decision = engine.decide(&state, last_persona, &turn.text);
        state = decision.state.clone();
        let cut = decision.cut_now;
        steps.push(ToneStep {
            turn_index: turn.index,
            decision,
        });
        if cut {
            break;
        }
    }
    steps
}

/// The stateless path only carries mood, pressure and skepticism forward.
fn replay_quick_tone(lexicon: &Lexicon, transcript: &Transcript) -> Vec<ToneStep<repcoach::tone::QuickDecision>> {
    let mut state = QuickToneState::default();
    let mut last_persona = "";
    let mut steps = Vec::new();

    for turn in transcript.turns() {
        if turn.speaker == Speaker::Persona {
            last_persona = turn.text.as_str();
            continue;
        }
        if !turn.speaker.is_representative() {
            continue;
        }

        let decision = decide_quick(lexicon, &state, last_persona, &turn.text);
        state = QuickToneState {
            mood: decision.mood,
            time_pressure: decision.time_pressure,
            skepticism: decision.skepticism,
        };
        steps.push(ToneStep {
            turn_index: turn.index,
            decision,
        });
    }
    steps
}

fn handle_personas_command(subcommand: &PersonasSubcommand, catalog: &PersonaCatalog) -> anyhow::Result<()> {
    match subcommand {
        PersonasSubcommand::List => {
            for persona in catalog.list() {
                println!(
                    "{:<10} {:<24} skepticism={:<6} knowledge={:<14} time={}s",
                    persona.id,
                    persona.display_name(),
                    persona.skepticism_level,
                    persona.knowledge_level,
                    persona.available_time_secs
                );
            }
        }
        PersonasSubcommand::Show { id } => {
            print_json(catalog.get(id)?, true)?;
        }
    }
    Ok(())
}

fn handle_config_command(subcommand: &ConfigSubcommand, config_path: Option<&str>) -> anyhow::Result<()> {
    match subcommand {
        ConfigSubcommand::Show => {
            let cfg = CoachConfig::load(config_path)?;
            println!("{}", toml::to_string_pretty(&cfg).map_err(Error::from)?);
        }
        ConfigSubcommand::Init { path, force } => {
            let written = config::init_config(path.as_deref(), *force)?;
            println!("Configuration written to {}", written.display());
        }
        ConfigSubcommand::Validate => {
            CoachConfig::load(config_path)?;
            println!("Configuration is valid.");
        }
    }

    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}
