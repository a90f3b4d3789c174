//! Stochastic race stepping.
//!
//! The simulator is generic over [`Rng`] so the service can feed it a
//! seeded `StdRng` derived from the match id, and tests can replay any
//! fixed seed deterministically.
//!
//! Per step, each horse independently draws an increment in `[0, speed)`,
//! may stumble (keeps 20% of the step) and may burst (up to 5 extra units).
//! Increments are never negative, so positions are monotone. After all
//! horses move, the first horse **in lane order** at or past the finish
//! line is latched as the winner — simultaneous crossings within one step
//! resolve to the lowest lane by explicit policy.

use rand::Rng;
use railbird_types::{Horse, RaceConfig, RaceRun};

/// Advances a [`RaceRun`] until exactly one winner is latched.
pub struct RaceSimulator {
    cfg: RaceConfig,
}

impl RaceSimulator {
    #[must_use]
    pub fn new(cfg: RaceConfig) -> Self {
        Self { cfg }
    }

    #[must_use]
    pub fn config(&self) -> &RaceConfig {
        &self.cfg
    }

    /// Start a run: one speed coefficient per horse, drawn independently
    /// and uniformly from `[speed_min, speed_max)`; all positions zero.
    pub fn start<R: Rng>(&self, rng: &mut R) -> RaceRun {
        let speeds = (0..self.cfg.horses)
            .map(|_| rng.gen_range(self.cfg.speed_min..self.cfg.speed_max))
            .collect();
        RaceRun::new(speeds, self.cfg.finish_line)
    }

    /// Advance every horse by one step and latch a winner if any horse is
    /// at or past the finish line.
    ///
    /// Returns the winner the moment it is latched. Once a run has a
    /// winner, further steps are no-ops returning `None`.
    pub fn step<R: Rng>(&self, run: &mut RaceRun, rng: &mut R) -> Option<Horse> {
        if run.winner.is_some() {
            return None;
        }

        for i in 0..run.horse_count() {
            let mut advance = rng.gen_range(0.0..run.speeds[i]);
            if rng.gen_bool(self.cfg.stumble_chance) {
                advance *= self.cfg.stumble_factor;
            }
            if rng.gen_bool(self.cfg.burst_chance) {
                advance += rng.gen_range(0.0..self.cfg.burst_max);
            }
            run.positions[i] += advance;
        }

        // Lane-order scan: ties within one step go to the lowest lane.
        for i in 0..run.horse_count() {
            if run.positions[i] >= run.finish_line {
                let winner = Horse(i as u8 + 1);
                run.winner = Some(winner);
                tracing::info!(%winner, position = run.positions[i], "winner latched");
                return Some(winner);
            }
        }
        None
    }

    /// Step until a winner is latched, invoking `on_frame` with the
    /// positions after every step (including the winning one).
    pub fn run_to_finish<R, F>(&self, run: &mut RaceRun, rng: &mut R, mut on_frame: F) -> Horse
    where
        R: Rng,
        F: FnMut(&[f64]),
    {
        loop {
            let winner = self.step(run, rng);
            on_frame(&run.positions);
            if let Some(winner) = winner {
                return winner;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use railbird_types::RaceConfig;

    fn sim() -> RaceSimulator {
        RaceSimulator::new(RaceConfig::default())
    }

    #[test]
    fn speeds_drawn_within_range() {
        let sim = sim();
        let mut rng = StdRng::seed_from_u64(1);
        let run = sim.start(&mut rng);
        assert_eq!(run.horse_count(), 5);
        for &speed in &run.speeds {
            assert!((1.0..4.0).contains(&speed), "speed {speed} out of range");
        }
    }

    #[test]
    fn any_fixed_seed_terminates_with_one_winner() {
        let sim = sim();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut run = sim.start(&mut rng);
            let mut frames = 0u32;
            let winner = sim.run_to_finish(&mut run, &mut rng, |_| frames += 1);
            assert!(winner.in_field(5), "seed {seed}: winner {winner} off field");
            assert_eq!(run.winner, Some(winner));
            assert!(frames > 0);
        }
    }

    #[test]
    fn positions_never_decrease() {
        let sim = sim();
        let mut rng = StdRng::seed_from_u64(42);
        let mut run = sim.start(&mut rng);
        let mut previous = run.positions.clone();
        while sim.step(&mut run, &mut rng).is_none() {
            for (before, after) in previous.iter().zip(&run.positions) {
                assert!(after >= before, "position regressed: {before} -> {after}");
            }
            previous.clone_from(&run.positions);
        }
    }

    #[test]
    fn same_seed_same_race() {
        let sim = sim();

        let mut rng_a = StdRng::seed_from_u64(7);
        let mut run_a = sim.start(&mut rng_a);
        let winner_a = sim.run_to_finish(&mut run_a, &mut rng_a, |_| {});

        let mut rng_b = StdRng::seed_from_u64(7);
        let mut run_b = sim.start(&mut rng_b);
        let winner_b = sim.run_to_finish(&mut run_b, &mut rng_b, |_| {});

        assert_eq!(winner_a, winner_b);
        assert_eq!(run_a.positions, run_b.positions);
    }

    #[test]
    fn tie_resolves_to_lowest_lane() {
        let sim = sim();
        let mut rng = StdRng::seed_from_u64(0);
        let mut run = sim.start(&mut rng);
        // Two horses already across the line before the step.
        run.positions[2] = 800.0;
        run.positions[4] = 950.0;

        let winner = sim.step(&mut run, &mut rng).unwrap();
        assert_eq!(winner, Horse(3), "lowest lane must win the tie");
    }

    #[test]
    fn steps_after_winner_are_noops() {
        let sim = sim();
        let mut rng = StdRng::seed_from_u64(3);
        let mut run = sim.start(&mut rng);
        let winner = sim.run_to_finish(&mut run, &mut rng, |_| {});

        let frozen = run.positions.clone();
        assert_eq!(sim.step(&mut run, &mut rng), None);
        assert_eq!(run.positions, frozen, "no-op step must not move horses");
        assert_eq!(run.winner, Some(winner));
    }
}
