//! Ability Stones - command line driver
//!
//! Runs scenario files against the in-memory world and inspects the stone
//! configuration.

use ability_stones::{
    abilities::AbilityCatalog,
    loader::{ConfigHandle, ScenarioLoader, StonesConfig},
    logging::{init_logging, VerbosityLevel},
    sim::ScenarioRunner,
};
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// Report format for `simulate`
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary
    Text,
    /// Full report as pretty-printed JSON
    Json,
}

#[derive(Parser)]
#[command(name = "stones")]
#[command(about = "Ability Stones - cooldown-gated item abilities", long_about = None)]
struct Cli {
    /// Verbosity level for log output (0=silent, 1=minimal, 2=normal, 3=verbose)
    #[arg(long, short = 'v', default_value = "normal", global = true)]
    verbosity: VerbosityLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a scenario file against a simulated world
    Simulate {
        /// Scenario file
        #[arg(value_name = "SCENARIO")]
        scenario: PathBuf,

        /// Stone configuration (TOML); built-in defaults when omitted
        #[arg(long, short = 'c', value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List the stone abilities with their configured cooldowns
    List {
        /// Stone configuration (TOML); built-in defaults when omitted
        #[arg(long, short = 'c', value_name = "CONFIG")]
        config: Option<PathBuf>,
    },

    /// Print the default configuration as TOML
    DefaultConfig,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<StonesConfig> {
    match path {
        Some(path) => StonesConfig::load_from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => Ok(StonesConfig::default()),
    }
}

fn simulate(scenario_path: &Path, config: Option<&Path>, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let scenario = ScenarioLoader::load_from_file(scenario_path)
        .with_context(|| format!("failed to load scenario {}", scenario_path.display()))?;
    tracing::info!(
        entities = scenario.entities.len(),
        directives = scenario.timeline.len(),
        "loaded scenario"
    );

    let mut runner = ScenarioRunner::new(config, &scenario);
    let report = runner.run(&scenario);

    match format {
        OutputFormat::Text => println!("{report}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn list(config: Option<&Path>) -> anyhow::Result<()> {
    let config = ConfigHandle::new(load_config(config)?);
    let catalog = AbilityCatalog::with_default_abilities(&config);

    println!("{:<10} {:<18} {:>8}", "STONE", "ABILITY", "COOLDOWN");
    for stone in catalog.stone_types() {
        let Some(handler) = catalog.handler_for(stone) else {
            continue;
        };
        println!(
            "{:<10} {:<18} {:>7}s",
            stone,
            handler.name(),
            handler.declared_cooldown().as_secs()
        );
    }
    Ok(())
}

fn default_config() -> anyhow::Result<()> {
    let rendered = StonesConfig::with_defaults().to_toml_string()?;
    print!("{rendered}");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    match cli.command {
        Commands::Simulate {
            scenario,
            config,
            format,
        } => simulate(&scenario, config.as_deref(), format),
        Commands::List { config } => list(config.as_deref()),
        Commands::DefaultConfig => default_config(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ability_stones::core::StoneType;

    #[test]
    fn test_every_stone_is_listed() {
        let config = ConfigHandle::default();
        let catalog = AbilityCatalog::with_default_abilities(&config);
        assert_eq!(catalog.stone_types(), StoneType::ALL.to_vec());
    }

    #[test]
    fn test_cli_verbosity_defaults_to_library_default() {
        let cli = Cli::try_parse_from(["stones", "list"]).unwrap();
        assert_eq!(cli.verbosity, VerbosityLevel::default());
    }

    #[test]
    fn test_cli_parses_simulate() {
        let cli = Cli::try_parse_from(["stones", "simulate", "demo.txt", "--format", "json", "-v", "3"]).unwrap();
        assert_eq!(cli.verbosity, VerbosityLevel::Verbose);
        assert!(matches!(
            cli.command,
            Commands::Simulate {
                format: OutputFormat::Json,
                ..
            }
        ));
    }
}
