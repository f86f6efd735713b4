#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting entity spawn
//! commands.
//!
//! The system accumulates [`Event::TimeAdvanced`] deltas against the game's
//! spawn interval and converts each elapsed interval into one
//! [`Command::SpawnEntity`], drawing the kind from the weighted spawn table
//! and the position from the configured placement rule. All randomness comes
//! from a seeded linear-congruential generator, so identical seeds and event
//! streams produce identical command streams.

use std::time::Duration;

use mood_arcade_core::{
    Command, EntityView, Epoch, Event, GamePhase, GridCoord, GridView, MotionRule, SpawnPlacement,
    SpawnRule, SpawnWeight, WorldPoint, WorldVec,
};

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;

/// Attempts made to find a floor tile before giving up for the interval.
const FLOOR_TILE_ATTEMPTS: u32 = 40;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Debug)]
pub struct Config {
    rule: SpawnRule,
    bounds_width: f32,
    bounds_height: f32,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration from the game's spawn rule and playfield.
    #[must_use]
    pub fn new(rule: SpawnRule, bounds_width: f32, bounds_height: f32, rng_seed: u64) -> Self {
        Self {
            rule,
            bounds_width,
            bounds_height,
            rng_seed,
        }
    }
}

/// Pure system that deterministically emits spawn commands while running.
#[derive(Debug)]
pub struct Spawning {
    rule: SpawnRule,
    bounds_width: f32,
    bounds_height: f32,
    current_interval: Duration,
    accumulator: Duration,
    rng_state: u64,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let current_interval = config.rule.interval;
        Self {
            rule: config.rule,
            bounds_width: config.bounds_width,
            bounds_height: config.bounds_height,
            current_interval,
            accumulator: Duration::ZERO,
            rng_state: config.rng_seed,
        }
    }

    /// Consumes events and immutable views to emit spawn commands.
    ///
    /// `maze` supplies the wall grid and tile length for games whose
    /// placement rule selects random floor tiles.
    pub fn handle(
        &mut self,
        events: &[Event],
        phase: GamePhase,
        epoch: Epoch,
        entities: &EntityView,
        maze: Option<(GridView<'_>, f32)>,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::PhaseChanged {
                phase: GamePhase::NotStarted,
            } = event
            {
                self.current_interval = self.rule.interval;
                self.accumulator = Duration::ZERO;
            }
        }

        if phase != GamePhase::Running {
            self.accumulator = Duration::ZERO;
            return;
        }

        if self.current_interval.is_zero() || self.rule.table.is_empty() {
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }

        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);

        let mut budget = self.spawn_budget(entities);
        while self.accumulator >= self.current_interval {
            self.accumulator -= self.current_interval;
            self.decay_interval();

            if budget == 0 {
                continue;
            }
            budget -= 1;

            let row = self.select_row();
            let Some(position) = self.select_position(maze) else {
                continue;
            };
            let velocity = self.select_velocity(&row);
            out.push(Command::SpawnEntity {
                epoch,
                kind: row.kind,
                position,
                velocity,
                lifecycle: row.lifecycle,
                radius: row.radius,
            });
        }
    }

    /// Number of spawns still allowed under the rule's active cap.
    fn spawn_budget(&self, entities: &EntityView) -> u32 {
        let Some(max_active) = self.rule.max_active else {
            return u32::MAX;
        };
        let active = entities
            .iter()
            .filter(|snapshot| {
                self.rule
                    .table
                    .iter()
                    .any(|row| row.kind == snapshot.kind)
            })
            .count();
        max_active.saturating_sub(active as u32)
    }

    fn decay_interval(&mut self) {
        if (self.rule.interval_decay - 1.0).abs() <= f32::EPSILON {
            return;
        }
        let shortened =
            Duration::from_secs_f64(self.current_interval.as_secs_f64() * f64::from(self.rule.interval_decay));
        self.current_interval = shortened.max(self.rule.interval_floor);
    }

    fn select_row(&mut self) -> SpawnWeight {
        let total: u64 = self.rule.table.iter().map(|row| u64::from(row.weight)).sum();
        debug_assert!(total > 0, "select_row requires positive weights");
        let mut roll = self.advance_rng() % total.max(1);
        for row in &self.rule.table {
            let weight = u64::from(row.weight);
            if roll < weight {
                return *row;
            }
            roll -= weight;
        }
        self.rule.table[self.rule.table.len() - 1]
    }

    fn select_position(&mut self, maze: Option<(GridView<'_>, f32)>) -> Option<WorldPoint> {
        match self.rule.placement {
            SpawnPlacement::UniformInset => {
                let margin = self.rule.margin;
                let x = margin + self.unit() * (self.bounds_width - 2.0 * margin).max(0.0);
                let y = margin + self.unit() * (self.bounds_height - 2.0 * margin).max(0.0);
                Some(WorldPoint::new(x, y))
            }
            SpawnPlacement::AtAnchor { anchor, spread } => {
                let x = anchor.x() + (self.unit() * 2.0 - 1.0) * spread.dx();
                let y = anchor.y() + (self.unit() * 2.0 - 1.0) * spread.dy();
                Some(WorldPoint::new(x, y))
            }
            SpawnPlacement::RandomFloorTile => {
                let (grid, tile_length) = maze?;
                let (columns, rows) = grid.dimensions();
                if columns == 0 || rows == 0 {
                    return None;
                }
                for _ in 0..FLOOR_TILE_ATTEMPTS {
                    let column = (self.advance_rng() % u64::from(columns)) as u32;
                    let row = (self.advance_rng() % u64::from(rows)) as u32;
                    let cell = GridCoord::new(column, row);
                    if grid.is_floor(cell) {
                        return Some(WorldPoint::new(
                            (cell.column() as f32 + 0.5) * tile_length,
                            (cell.row() as f32 + 0.5) * tile_length,
                        ));
                    }
                }
                None
            }
        }
    }

    fn select_velocity(&mut self, row: &SpawnWeight) -> WorldVec {
        let speed = row.speed.min + self.unit() * (row.speed.max - row.speed.min).max(0.0);
        match row.motion {
            MotionRule::Station => WorldVec::ZERO,
            MotionRule::Linear | MotionRule::Falling { .. } | MotionRule::Jittering { .. } => {
                WorldVec::new(0.0, speed)
            }
            MotionRule::Bouncing => {
                let sign = if self.advance_rng() & 1 == 0 { 1.0 } else { -1.0 };
                WorldVec::new(sign * speed, 0.0)
            }
        }
    }

    fn advance_rng(&mut self) -> u64 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        self.rng_state
    }

    /// Uniform sample in `0.0..1.0` drawn from the generator's high bits.
    fn unit(&mut self) -> f32 {
        (self.advance_rng() >> 11) as f32 / (1u64 << 53) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mood_arcade_core::{EntityKind, Lifecycle, SpeedRange};

    fn rule() -> SpawnRule {
        SpawnRule {
            interval: Duration::from_millis(500),
            interval_floor: Duration::from_millis(500),
            interval_decay: 1.0,
            placement: SpawnPlacement::UniformInset,
            margin: 24.0,
            table: vec![SpawnWeight {
                kind: EntityKind::Tear,
                weight: 1,
                lifecycle: Lifecycle::Persistent,
                motion: MotionRule::Linear,
                radius: 10.0,
                speed: SpeedRange::fixed(100.0),
                reward: 10,
                expiry_penalty: 0,
            }],
            max_active: None,
        }
    }

    #[test]
    fn non_running_phases_reset_the_accumulator() {
        let mut spawning = Spawning::new(Config::new(rule(), 360.0, 640.0, 0x1234));
        spawning.accumulator = Duration::from_secs(10);

        let mut out = Vec::new();
        spawning.handle(
            &[],
            GamePhase::Paused,
            Epoch::default(),
            &EntityView::default(),
            None,
            &mut out,
        );

        assert!(out.is_empty());
        assert_eq!(spawning.accumulator, Duration::ZERO);
    }

    #[test]
    fn interval_decay_respects_the_floor() {
        let mut decaying = rule();
        decaying.interval = Duration::from_millis(1000);
        decaying.interval_floor = Duration::from_millis(800);
        decaying.interval_decay = 0.5;
        let mut spawning = Spawning::new(Config::new(decaying, 360.0, 640.0, 1));

        spawning.decay_interval();
        assert_eq!(spawning.current_interval, Duration::from_millis(800));
        spawning.decay_interval();
        assert_eq!(spawning.current_interval, Duration::from_millis(800));
    }
}
