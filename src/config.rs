//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "pomodoro-widget")]
#[command(about = "A Pomodoro timer widget served to the browser")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Working phase duration in seconds
    #[arg(long, default_value = "1500")]
    pub pomodoro_time: u64,

    /// Short rest duration in seconds
    #[arg(long, default_value = "300")]
    pub short_rest_time: u64,

    /// Long rest duration in seconds
    #[arg(long, default_value = "900")]
    pub long_rest_time: u64,

    /// Working phases per long-rest cycle
    #[arg(short, long, default_value = "4")]
    pub cycles: u32,

    /// Countdown tick period in milliseconds
    #[arg(long, default_value = "1000")]
    pub tick_ms: u64,

    /// Also ring the terminal bell on audio cues
    #[arg(long)]
    pub bell: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Timer durations for a new session, normalized
    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig {
            pomodoro_time: self.pomodoro_time,
            short_rest_time: self.short_rest_time,
            long_rest_time: self.long_rest_time,
            cycles: self.cycles,
        }
        .normalized()
    }

    /// Scheduler period, never shorter than one millisecond
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

/// Durations (in seconds) and cycle length of a pomodoro session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub pomodoro_time: u64,
    pub short_rest_time: u64,
    pub long_rest_time: u64,
    pub cycles: u32,
}

impl TimerConfig {
    /// Clamp every duration to at least one second and `cycles` to at least one.
    ///
    /// A zero-length phase would hit zero on entry and flip phases forever.
    pub fn normalized(self) -> Self {
        Self {
            pomodoro_time: at_least_one("pomodoro_time", self.pomodoro_time),
            short_rest_time: at_least_one("short_rest_time", self.short_rest_time),
            long_rest_time: at_least_one("long_rest_time", self.long_rest_time),
            cycles: if self.cycles == 0 {
                warn!("cycles is 0, using 1");
                1
            } else {
                self.cycles
            },
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            pomodoro_time: 25 * 60,
            short_rest_time: 5 * 60,
            long_rest_time: 15 * 60,
            cycles: 4,
        }
    }
}

fn at_least_one(name: &str, seconds: u64) -> u64 {
    if seconds == 0 {
        warn!("{} is 0 seconds, using 1", name);
        1
    } else {
        seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_keeps_valid_values() {
        let config = TimerConfig {
            pomodoro_time: 10,
            short_rest_time: 2,
            long_rest_time: 5,
            cycles: 4,
        };
        assert_eq!(config.normalized(), config);
    }

    #[test]
    fn normalized_clamps_zeroes() {
        let config = TimerConfig {
            pomodoro_time: 0,
            short_rest_time: 0,
            long_rest_time: 0,
            cycles: 0,
        }
        .normalized();
        assert_eq!(config.pomodoro_time, 1);
        assert_eq!(config.short_rest_time, 1);
        assert_eq!(config.long_rest_time, 1);
        assert_eq!(config.cycles, 1);
    }

    #[test]
    fn cli_flags_map_to_timer_config() {
        let config = Config::try_parse_from([
            "pomodoro-widget",
            "--pomodoro-time",
            "10",
            "--short-rest-time",
            "2",
            "--long-rest-time",
            "5",
            "--cycles",
            "0",
            "--tick-ms",
            "0",
        ])
        .unwrap();

        let timer = config.timer_config();
        assert_eq!(timer.pomodoro_time, 10);
        assert_eq!(timer.cycles, 1);
        assert_eq!(config.tick_period(), Duration::from_millis(1));
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.log_level(), "info");
    }
}
