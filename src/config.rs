//! Session configuration loaded from environment variables

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Fixed timing constants of the match flow
#[derive(Debug, Clone, PartialEq)]
pub struct Timings {
    /// Interval between countdown ticks
    pub tick: Duration,
    /// How long the game-over screen stays up before the lobby reopens
    pub game_over_display: Duration,
    /// Players who have not answered by then are dropped from the match
    pub unresponsive_timeout: Duration,
    pub intro: Duration,
    /// Delay between round completion and the answer reveal
    pub reveal_delay: Duration,
    /// Delay between round completion and the between-rounds signal
    pub between_rounds_delay: Duration,
    /// Pause after the between-rounds signal before the next countdown
    pub next_round_delay: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(1000),
            game_over_display: Duration::from_millis(5000),
            unresponsive_timeout: Duration::from_millis(15000),
            intro: Duration::from_millis(4000),
            reveal_delay: Duration::from_millis(1000),
            between_rounds_delay: Duration::from_millis(6000),
            next_round_delay: Duration::from_millis(3000),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Participants needed before a match starts
    pub min_players: usize,
    pub round_count: u32,
    /// Seconds per round
    pub round_seconds: u32,
    /// Countdown ticks before each round
    pub countdown_seconds: u32,
    pub questions_csv: PathBuf,
    pub bind_addr: SocketAddr,
    pub timings: Timings,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_players: 3,
            round_count: 5,
            round_seconds: 12,
            countdown_seconds: 10,
            questions_csv: PathBuf::from("questions.csv"),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            timings: Timings::default(),
        }
    }
}

impl SessionConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let questions_csv = std::env::var("QUESTIONS_CSV")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.questions_csv);

        Self {
            min_players: env_parse("MIN_PLAYERS", defaults.min_players).max(1),
            round_count: env_parse("ROUND_COUNT", defaults.round_count),
            round_seconds: env_parse("ROUND_SECONDS", defaults.round_seconds).max(1),
            countdown_seconds: env_parse("COUNTDOWN_SECONDS", defaults.countdown_seconds),
            questions_csv,
            bind_addr: env_parse("BIND_ADDR", defaults.bind_addr),
            timings: defaults.timings,
        }
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Ignoring invalid {}={:?}, using default", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: &[&str] = &[
        "MIN_PLAYERS",
        "ROUND_COUNT",
        "ROUND_SECONDS",
        "COUNTDOWN_SECONDS",
        "QUESTIONS_CSV",
        "BIND_ADDR",
    ];

    fn clear_env() {
        for key in KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.min_players, 3);
        assert_eq!(config.round_count, 5);
        assert_eq!(config.round_seconds, 12);
        assert_eq!(config.timings.unresponsive_timeout, Duration::from_secs(15));
        assert_eq!(config.timings.intro, Duration::from_secs(4));
    }

    #[test]
    #[serial]
    fn test_from_env_reads_overrides() {
        clear_env();
        std::env::set_var("MIN_PLAYERS", "2");
        std::env::set_var("ROUND_COUNT", " 7 ");
        std::env::set_var("QUESTIONS_CSV", "/tmp/q.csv");

        let config = SessionConfig::from_env();
        assert_eq!(config.min_players, 2);
        assert_eq!(config.round_count, 7);
        assert_eq!(config.questions_csv, PathBuf::from("/tmp/q.csv"));
        assert_eq!(config.round_seconds, 12);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_values_fall_back() {
        clear_env();
        std::env::set_var("MIN_PLAYERS", "lots");
        std::env::set_var("BIND_ADDR", "nowhere");

        let config = SessionConfig::from_env();
        assert_eq!(config.min_players, 3);
        assert_eq!(config.bind_addr, SessionConfig::default().bind_addr);

        clear_env();
    }
}
