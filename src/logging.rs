//! Diagnostic logging setup.
//!
//! Library code only emits `tracing` events. The binary installs a
//! stderr subscriber so stdout stays reserved for rendered output.

use tracing_subscriber::EnvFilter;

use crate::constants::ENV_LOG;
use crate::env::Env;

/// Build the filter directive for the subscriber.
///
/// An explicit `ATTENDEES_LOG` value wins. Otherwise `verbosity` (the
/// number of `-v` flags) selects warn, info, debug or trace.
pub fn filter_directive(env: &Env, verbosity: u8) -> String {
    if let Some(directive) = env.get(ENV_LOG) {
        return directive;
    }
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("attendees={level}")
}

/// Install the global stderr subscriber. Safe to call once per process;
/// later calls are ignored.
pub fn init(env: &Env, verbosity: u8) {
    let directive = filter_directive(env, verbosity);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("Warning: ignoring invalid {ENV_LOG} value '{directive}': {e}");
        EnvFilter::new("attendees=warn")
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        let env = Env::mock(Vec::<(&str, &str)>::new());
        assert_eq!(filter_directive(&env, 0), "attendees=warn");
        assert_eq!(filter_directive(&env, 1), "attendees=info");
        assert_eq!(filter_directive(&env, 2), "attendees=debug");
        assert_eq!(filter_directive(&env, 7), "attendees=trace");
    }

    #[test]
    fn env_directive_overrides_verbosity() {
        let env = Env::mock([("ATTENDEES_LOG", "reqwest=debug,attendees=trace")]);
        assert_eq!(filter_directive(&env, 0), "reqwest=debug,attendees=trace");
    }
}
