use std::sync::OnceLock;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_ENV_VAR: &str = "CLIPMENU_LOG";

static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "clipmenu_core=debug"
    } else {
        "clipmenu_core=warn"
    }
}

/// Installs the stderr subscriber. `CLIPMENU_LOG` overrides the level
/// picked from `verbose`.
pub fn init(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .try_init()?;

    install_panic_hook();
    Ok(())
}

fn install_panic_hook() {
    let _ = PANIC_HOOK_INSTALLED.get_or_init(|| {
        let prior = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let location = panic_info
                .location()
                .map(|l| format!("{}:{}", l.file(), l.line()))
                .unwrap_or_else(|| "unknown".to_string());
            let payload = panic_info
                .payload()
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic payload unavailable".to_string());
            tracing::error!(%location, %payload, "panic");
            prior(panic_info);
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::default_directive;

    #[test]
    fn verbose_switches_to_debug() {
        assert_eq!(default_directive(true), "clipmenu_core=debug");
        assert_eq!(default_directive(false), "clipmenu_core=warn");
    }
}
