//! Log verbosity and subscriber setup

use std::str::FromStr;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

/// How much the `stones` binary reports while it runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum VerbosityLevel {
    /// Errors only
    Silent = 0,
    /// Warnings (missing handlers, unfinished tasks)
    Minimal = 1,
    /// Per-directive outcomes (default)
    #[default]
    Normal = 2,
    /// Every activation decision and task
    Verbose = 3,
}

impl VerbosityLevel {
    pub fn level_filter(&self) -> LevelFilter {
        match self {
            VerbosityLevel::Silent => LevelFilter::ERROR,
            VerbosityLevel::Minimal => LevelFilter::WARN,
            VerbosityLevel::Normal => LevelFilter::INFO,
            VerbosityLevel::Verbose => LevelFilter::TRACE,
        }
    }
}

/// Accepts names or numbers: `silent`/`0` through `verbose`/`3`
impl FromStr for VerbosityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityLevel::Silent),
            "minimal" | "1" => Ok(VerbosityLevel::Minimal),
            "normal" | "2" => Ok(VerbosityLevel::Normal),
            "verbose" | "3" => Ok(VerbosityLevel::Verbose),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

/// Install a stderr subscriber; `RUST_LOG` overrides `verbosity`
pub fn init_logging(verbosity: VerbosityLevel) {
    let filter = EnvFilter::builder()
        .with_default_directive(verbosity.level_filter().into())
        .from_env_lossy();

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_numbers() {
        assert_eq!("verbose".parse::<VerbosityLevel>(), Ok(VerbosityLevel::Verbose));
        assert_eq!("1".parse::<VerbosityLevel>(), Ok(VerbosityLevel::Minimal));
        assert_eq!("SILENT".parse::<VerbosityLevel>(), Ok(VerbosityLevel::Silent));
        assert!("loud".parse::<VerbosityLevel>().is_err());
    }

    #[test]
    fn test_level_filters_are_ordered() {
        assert!(VerbosityLevel::Silent.level_filter() < VerbosityLevel::Verbose.level_filter());
        assert_eq!(VerbosityLevel::default().level_filter(), LevelFilter::INFO);
    }
}
