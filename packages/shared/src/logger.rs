//! Logging setup utilities for the Huddle gateway.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build the default filter directive for the given crates.
///
/// Crate names are normalized the way `tracing` targets are written
/// (`huddle-server` becomes `huddle_server`).
pub fn default_directive(crate_names: &[&str], default_log_level: &str) -> String {
    let mut directives: Vec<String> = crate_names
        .iter()
        .map(|name| format!("{}={}", name.replace('-', "_"), default_log_level))
        .collect();
    // HTTP request spans from tower-http
    directives.push(format!("tower_http={}", default_log_level));
    directives.join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `crate_names` - Crates whose logs should be emitted (e.g. `["huddle-server"]`)
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use huddle_shared::logger::setup_logger;
///
/// setup_logger(&["huddle-server", env!("CARGO_CRATE_NAME")], "info");
/// ```
pub fn setup_logger(crate_names: &[&str], default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(crate_names, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_normalizes_crate_names() {
        // テスト項目: クレート名のハイフンがアンダースコアに変換される
        // given (前提条件):
        let crates = ["huddle-server", "server"];

        // when (操作):
        let directive = default_directive(&crates, "debug");

        // then (期待する結果):
        assert_eq!(directive, "huddle_server=debug,server=debug,tower_http=debug");
    }
}
