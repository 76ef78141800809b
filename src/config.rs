use std::path::PathBuf;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::warn;

use crate::{
    grid::{Grid, Probability},
    sim::Delay,
};

/// Interactive Game of Life on a 30x50 grid.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Args {
    /// Milliseconds between generations (10-1000).
    #[arg(short, long, default_value_t = 100)]
    pub delay: u64,

    /// Chance of a cell being alive when randomizing (0-1).
    #[arg(short, long, default_value_t = 0.3)]
    pub probability: f64,

    /// Seed for randomizing, for reproducible runs.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Start from a random grid instead of an empty one.
    #[arg(short, long)]
    pub random: bool,

    /// Write logs here. Logging is off otherwise.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Validated settings for the widget.
#[derive(Debug, Clone)]
pub struct Settings {
    pub delay: Delay,
    pub probability: Probability,
    pub seed: Option<u64>,
    pub random_start: bool,
}

impl Settings {
    pub fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }

    pub fn initial_grid(&self, rng: &mut ChaCha8Rng) -> Grid {
        if self.random_start {
            Grid::random_with(rng, self.probability)
        } else {
            Grid::empty()
        }
    }
}

impl From<&Args> for Settings {
    fn from(args: &Args) -> Self {
        let delay = Delay::from_millis(args.delay);
        if delay.as_millis() != args.delay {
            warn!(requested = args.delay, used = delay.as_millis(), "delay out of range, clamped");
        }

        let probability = Probability::new(args.probability);
        if probability.get() != args.probability {
            warn!(requested = args.probability, used = probability.get(), "probability out of range, clamped");
        }

        Settings {
            delay,
            probability,
            seed: args.seed,
            random_start: args.random,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            delay: Delay::default(),
            probability: Probability::default(),
            seed: None,
            random_start: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behavior() {
        let args = Args::parse_from(["life-widget"]);
        let settings = Settings::from(&args);

        assert_eq!(settings.delay, Delay::default());
        assert_eq!(settings.probability, Probability::default());
        assert!(!settings.random_start);
        assert_eq!(settings.initial_grid(&mut settings.rng()).population(), 0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let args = Args::parse_from(["life-widget", "--delay", "5", "--probability", "1.5"]);
        let settings = Settings::from(&args);

        assert_eq!(settings.delay, Delay::MIN);
        assert_eq!(settings.probability, Probability::ALWAYS);
    }

    #[test]
    fn seed_makes_random_start_reproducible() {
        let args = Args::parse_from(["life-widget", "--random", "--seed", "42"]);
        let settings = Settings::from(&args);

        let a = settings.initial_grid(&mut settings.rng());
        let b = settings.initial_grid(&mut settings.rng());
        assert_eq!(a, b);
        assert!(a.population() > 0);
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
