//! System-wide constants for the Railbird engine.

/// Currency units granted to a profile on first authentication.
pub const STARTING_BALANCE: u64 = 100;

/// Minimum accepted stake per bet.
pub const MIN_STAKE: u64 = 3;

/// Number of contestants in a race.
pub const HORSE_COUNT: u8 = 5;

/// Distance a horse must cover to finish.
pub const FINISH_LINE: f64 = 800.0;

/// Lower bound of the per-horse speed coefficient draw.
pub const SPEED_MIN: f64 = 1.0;

/// Upper bound (exclusive) of the per-horse speed coefficient draw.
pub const SPEED_MAX: f64 = 4.0;

/// Per-step probability that a horse stumbles.
pub const STUMBLE_CHANCE: f64 = 0.03;

/// A stumbling horse keeps only this fraction of its step.
pub const STUMBLE_FACTOR: f64 = 0.2;

/// Per-step probability of a speed burst.
pub const BURST_CHANCE: f64 = 0.10;

/// Upper bound (exclusive) of the extra distance a burst adds.
pub const BURST_MAX: f64 = 5.0;

/// Discrete countdown ticks between all-ready and the race start.
pub const COUNTDOWN_TICKS: u8 = 3;

/// Milliseconds between countdown ticks.
pub const COUNTDOWN_INTERVAL_MS: u64 = 1000;

/// Milliseconds between race simulation steps (~20 fps).
pub const FRAME_INTERVAL_MS: u64 = 50;

/// Constant added to the total pool in the odds formula. Keeps payouts
/// bounded when the pool is small.
pub const POOL_TOTAL_OFFSET: u64 = 5;

/// Constant added to a horse's pool in the odds formula. Avoids division
/// by zero for an unbacked horse.
pub const POOL_HORSE_OFFSET: u64 = 1;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Railbird";
