//! Worker-count resolution: explicit request, then env override, then CPU count.

use std::env;

/// Env override for the auto-resolved worker count, e.g. `PARMAP_WORKERS=4`.
/// Ignored when the caller passes an explicit count.
pub const WORKERS_ENV: &str = "PARMAP_WORKERS";

/// Number of available CPU cores, never below 1.
pub fn detected_cpus() -> usize {
    num_cpus::get().max(1)
}

/// Resolve the effective worker count. An explicit request always wins;
/// `PARMAP_WORKERS` is consulted next; otherwise the detected core count.
/// Values of 0 and 1 are valid and select the sequential path downstream.
pub fn resolve_workers(requested: Option<usize>) -> usize {
    if let Some(n) = requested {
        return n;
    }
    if let Ok(raw) = env::var(WORKERS_ENV) {
        if let Ok(n) = raw.trim().parse::<usize>() {
            return n;
        }
    }
    detected_cpus()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_request_wins() {
        assert_eq!(resolve_workers(Some(3)), 3);
        assert_eq!(resolve_workers(Some(0)), 0);
    }

    #[test]
    fn test_auto_resolves_to_cpus() {
        // No explicit request and (normally) no env override: core count.
        if env::var(WORKERS_ENV).is_err() {
            assert_eq!(resolve_workers(None), detected_cpus());
        }
        assert!(detected_cpus() >= 1);
    }

    #[test]
    fn test_env_override() {
        // Set and unset inside one test so the parallel test harness never
        // observes a half-configured environment from another test.
        env::set_var(WORKERS_ENV, "7");
        assert_eq!(resolve_workers(None), 7);
        env::set_var(WORKERS_ENV, "not-a-number");
        assert_eq!(resolve_workers(None), detected_cpus());
        env::remove_var(WORKERS_ENV);
    }
}
