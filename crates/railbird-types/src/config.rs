//! Configuration types for the Railbird service.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;

/// Top-level configuration for one service instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Currency units granted on first authentication.
    pub starting_balance: u64,
    /// Minimum accepted stake per bet.
    pub min_stake: u64,
    /// Countdown timing.
    pub countdown: CountdownConfig,
    /// Race field and physics.
    pub race: RaceConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            starting_balance: constants::STARTING_BALANCE,
            min_stake: constants::MIN_STAKE,
            countdown: CountdownConfig::default(),
            race: RaceConfig::default(),
        }
    }
}

/// Countdown timing between all-ready and the race start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownConfig {
    /// Number of discrete ticks. The tick reaching zero starts the race.
    pub ticks: u8,
    /// Interval between ticks.
    pub interval: Duration,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            ticks: constants::COUNTDOWN_TICKS,
            interval: Duration::from_millis(constants::COUNTDOWN_INTERVAL_MS),
        }
    }
}

/// Race field and step-physics parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceConfig {
    /// Number of contestants.
    pub horses: u8,
    /// Finish threshold in distance units.
    pub finish_line: f64,
    /// Speed coefficient draw range `[speed_min, speed_max)`.
    pub speed_min: f64,
    pub speed_max: f64,
    /// Stumble: probability per step, and the fraction of the step kept.
    pub stumble_chance: f64,
    pub stumble_factor: f64,
    /// Burst: probability per step, and the extra-distance cap.
    pub burst_chance: f64,
    pub burst_max: f64,
    /// Interval between simulation steps.
    pub frame_interval: Duration,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            horses: constants::HORSE_COUNT,
            finish_line: constants::FINISH_LINE,
            speed_min: constants::SPEED_MIN,
            speed_max: constants::SPEED_MAX,
            stumble_chance: constants::STUMBLE_CHANCE,
            stumble_factor: constants::STUMBLE_FACTOR,
            burst_chance: constants::BURST_CHANCE,
            burst_max: constants::BURST_MAX,
            frame_interval: Duration::from_millis(constants::FRAME_INTERVAL_MS),
        }
    }
}
