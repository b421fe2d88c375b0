use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_u16(key: &str, default: u16) -> u16 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Rescheduling policy ───────────────────────────────────────

/// How `next_deposit` advances after a recorded execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReschedulePolicy {
    /// `execution time + interval`. The schedule drifts with actual
    /// execution times but never queues catch-up deposits after downtime.
    FromExecution,
    /// `previous next_deposit + interval`, stepped past the execution
    /// time. Occurrences stay on the original grid.
    FixedGrid,
}

impl Default for ReschedulePolicy {
    fn default() -> Self {
        ReschedulePolicy::FromExecution
    }
}

impl ReschedulePolicy {
    fn from_env_value(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "fixed-grid" => ReschedulePolicy::FixedGrid,
            "from-execution" => ReschedulePolicy::FromExecution,
            other => {
                if !other.is_empty() {
                    tracing::warn!(
                        "Unknown BYOB_RESCHEDULE_POLICY '{}' — using from-execution",
                        other
                    );
                }
                ReschedulePolicy::FromExecution
            }
        }
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub reschedule_policy: ReschedulePolicy,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: env_or("BYOB_HOST", "0.0.0.0"),
                port: env_u16("BYOB_PORT", 8080),
            },
            schedule: ScheduleConfig {
                reschedule_policy: ReschedulePolicy::from_env_value(&env_or(
                    "BYOB_RESCHEDULE_POLICY",
                    "",
                )),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_parses_known_values() {
        assert_eq!(
            ReschedulePolicy::from_env_value("fixed-grid"),
            ReschedulePolicy::FixedGrid
        );
        assert_eq!(
            ReschedulePolicy::from_env_value("from-execution"),
            ReschedulePolicy::FromExecution
        );
    }

    #[test]
    fn from_env_defaults_when_unset() {
        env::remove_var("BYOB_HOST");
        env::remove_var("BYOB_PORT");
        env::remove_var("BYOB_RESCHEDULE_POLICY");

        let config = Config::from_env();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(
            config.schedule.reschedule_policy,
            ReschedulePolicy::FromExecution
        );
    }

    #[test]
    fn policy_falls_back_on_unknown_values() {
        assert_eq!(
            ReschedulePolicy::from_env_value("hourly"),
            ReschedulePolicy::FromExecution
        );
        assert_eq!(
            ReschedulePolicy::from_env_value(""),
            ReschedulePolicy::FromExecution
        );
    }
}
