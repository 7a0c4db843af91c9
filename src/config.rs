use clap::Parser;
use std::time::Duration;
use tracing::warn;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_URL: &str = "http://example.com";
pub const DEFAULT_WORKERS: usize = 1;
pub const DEFAULT_DURATION: Duration = Duration::from_secs(10);

/// Raw command line, before negative values are corrected
#[derive(Debug, Parser)]
#[command(name = "load", version, about = "Closed-loop HTTP load generator")]
pub struct Args {
    /// URL to load test
    #[arg(long, default_value = DEFAULT_URL)]
    pub url: String,

    /// Number of concurrent workers
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub workers: i64,

    /// Test duration (e.g. 10s, 1m30s, 250ms; a bare number is seconds)
    #[arg(long, default_value = "10s", value_parser = parse_duration, allow_hyphen_values = true)]
    pub duration: SignedDuration,

    /// Print one line per request instead of the progress ticker
    #[arg(short, long)]
    pub verbose: bool,
}

/// A duration as typed by the user, which may carry a leading minus sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedDuration {
    pub negative: bool,
    pub magnitude: Duration,
}

impl SignedDuration {
    pub fn is_negative(&self) -> bool {
        self.negative && !self.magnitude.is_zero()
    }
}

impl From<Duration> for SignedDuration {
    fn from(magnitude: Duration) -> Self {
        SignedDuration { negative: false, magnitude }
    }
}

/// Validated run configuration, read-only once the run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub url: String,
    pub workers: usize,
    pub duration: Duration,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            url: DEFAULT_URL.to_string(),
            workers: DEFAULT_WORKERS,
            duration: DEFAULT_DURATION,
            verbose: false,
        }
    }
}

impl Config {
    /// Parse the process arguments. Exits with clap's usage message on bad input.
    pub fn parse() -> Result<Config, ConfigError> {
        Self::from_args(Args::parse())
    }

    /// Build a config from raw arguments. Negative worker counts and durations
    /// are replaced by their defaults; an unparseable URL is an error.
    pub fn from_args(args: Args) -> Result<Config, ConfigError> {
        Url::parse(&args.url).map_err(|source| ConfigError::InvalidUrl {
            url: args.url.clone(),
            source,
        })?;

        let duration = if args.duration.is_negative() {
            warn!("Duration cannot be negative. Defaulting to {:?}", DEFAULT_DURATION);
            DEFAULT_DURATION
        } else {
            args.duration.magnitude
        };

        let workers = match usize::try_from(args.workers) {
            Ok(workers) if workers > 0 => workers,
            _ => {
                warn!("Workers must be positive. Defaulting to {} worker", DEFAULT_WORKERS);
                DEFAULT_WORKERS
            }
        };

        Ok(Config { url: args.url, workers, duration, verbose: args.verbose })
    }
}

/// Parses durations like `10s`, `-5s`, `1m30s`, `1.5h` or `250ms`.
/// A bare number is taken as seconds.
pub fn parse_duration(input: &str) -> Result<SignedDuration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration(input.to_string());

    let trimmed = input.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    if body.is_empty() {
        return Err(invalid());
    }

    let is_number = |c: char| c.is_ascii_digit() || c == '.';

    // no unit is provided, use seconds
    if body.chars().all(is_number) {
        let secs: f64 = body.parse().map_err(|_| invalid())?;
        let magnitude = scaled(secs, NANOS_PER_SEC).ok_or_else(invalid)?;
        return Ok(SignedDuration { negative, magnitude });
    }

    let mut magnitude = Duration::ZERO;
    let mut rest = body;
    while !rest.is_empty() {
        let unit_start = rest.find(|c: char| !is_number(c)).ok_or_else(invalid)?;
        let (value_str, tail) = rest.split_at(unit_start);
        let value: f64 = value_str.parse().map_err(|_| invalid())?;

        let unit_end = tail.find(is_number).unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_end);
        let nanos_per_unit = match unit {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => NANOS_PER_SEC,
            "m" => 60.0 * NANOS_PER_SEC,
            "h" => 3600.0 * NANOS_PER_SEC,
            _ => return Err(invalid()),
        };

        let part = scaled(value, nanos_per_unit).ok_or_else(invalid)?;
        magnitude = magnitude.checked_add(part).ok_or_else(invalid)?;
        rest = next;
    }

    Ok(SignedDuration { negative, magnitude })
}

const NANOS_PER_SEC: f64 = 1e9;

fn scaled(value: f64, nanos_per_unit: f64) -> Option<Duration> {
    let nanos = (value * nanos_per_unit).round();
    if !nanos.is_finite() || nanos < 0.0 || nanos > u64::MAX as f64 {
        return None;
    }
    Some(Duration::from_nanos(nanos as u64))
}
