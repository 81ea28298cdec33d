//! Logging and tracing initialization.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Targets that receive the configured level; everything else logs at `warn`.
const SLIDETRACK_TARGETS: &[&str] = &[
    "slidetrack_cli",
    "slidetrack_common",
    "slidetrack_challenge_model",
    "slidetrack_image_buffer",
    "slidetrack_solver_core",
];

/// Filter directives for `config`, e.g. `warn,slidetrack_solver_core=debug`.
///
/// An unrecognized level falls back to `info`.
pub fn default_directives(config: &LoggingConfig) -> String {
    let level = config
        .level
        .trim()
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::INFO)
        .to_string()
        .to_lowercase();

    let mut directives = String::from("warn");
    for target in SLIDETRACK_TARGETS {
        directives.push_str(&format!(",{target}={level}"));
    }
    directives
}

/// Initialize the tracing subscriber with the given configuration.
///
/// `RUST_LOG` takes precedence over `config.level` when set. Logs go to
/// stderr so stdout stays reserved for JSON responses. Returns `false` if a
/// global subscriber was already installed.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config)));

    let builder = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    let installed = if config.json {
        tracing::subscriber::set_global_default(
            builder.json().with_current_span(false).finish(),
        )
    } else {
        tracing::subscriber::set_global_default(builder.compact().with_target(true).finish())
    };
    installed.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logging(level: &str) -> LoggingConfig {
        LoggingConfig {
            level: level.to_string(),
            ..LoggingConfig::default()
        }
    }

    #[test]
    fn test_directives_scope_level_to_own_crates() {
        let directives = default_directives(&logging("debug"));
        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("slidetrack_solver_core=debug"));
        assert!(directives.contains("slidetrack_cli=debug"));
        assert!(EnvFilter::try_new(&directives).is_ok());
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        let directives = default_directives(&logging("chatty"));
        assert!(directives.contains("slidetrack_image_buffer=info"));
        assert!(!directives.contains("chatty"));
    }

    #[test]
    fn test_level_is_case_insensitive() {
        assert!(default_directives(&logging(" TRACE ")).contains("slidetrack_common=trace"));
    }
}
