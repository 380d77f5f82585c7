use std::io::IsTerminal;
use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `SQL_CHAT_LOG=debug`.
pub const LOG_ENV_VAR: &str = "SQL_CHAT_LOG";

const DEFAULT_FILTER: &str = "info";

/// Installs the stderr subscriber. Safe to call more than once.
pub fn init() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .try_init();

        if installed.is_ok() {
            tracing::debug!("logging initialised");
        }
    });
}
