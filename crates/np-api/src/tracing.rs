//! Log output for the NursePrep server
//!
//! Development prints pretty, human-readable events from the study crates;
//! production writes JSON lines. `RUST_LOG` replaces the default directives
//! entirely (e.g. `RUST_LOG=np_srs=trace,sqlx=info`).

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Environment;

/// Our crates at debug, query logging from `sqlx` only when something is wrong
const DEVELOPMENT_DIRECTIVES: &str =
    "info,np_api=debug,np_db=debug,np_srs=debug,serv=debug,sqlx=warn,tower_http=debug";

/// Request spans stay on so every review and quiz submission is traceable
const PRODUCTION_DIRECTIVES: &str = "warn,np_api=info,np_db=info,serv=info,sqlx=warn,tower_http=info";

/// Default filter directives when `RUST_LOG` is not set
pub const fn default_directives(env: &Environment) -> &'static str {
    if env.is_development() {
        DEVELOPMENT_DIRECTIVES
    } else {
        PRODUCTION_DIRECTIVES
    }
}

fn env_filter(env: &Environment) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(env)))
}

/// Install the global subscriber for the given environment
pub fn init_tracing(env: &Environment) {
    let filter = env_filter(env);

    if env.is_development() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .pretty()
                    .with_filter(filter),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_target(true)
                    .with_filter(filter),
            )
            .init();
    }

    tracing::info!(environment = ?env, "Logging initialized");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives_parse() {
        for env in [Environment::Development, Environment::Production] {
            let directives = default_directives(&env);
            assert!(EnvFilter::try_new(directives).is_ok(), "{directives}");
        }
    }

    #[test]
    fn test_sqlx_is_quiet_everywhere() {
        for env in [Environment::Development, Environment::Production] {
            assert!(default_directives(&env).contains("sqlx=warn"));
        }
        assert!(default_directives(&Environment::Development).contains("np_srs=debug"));
        assert!(default_directives(&Environment::Production).starts_with("warn,np_api=info"));
    }
}
