#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Mood Arcade.
//!
//! One [`World`] owns the entire mutable state of a single game session:
//! entities, the avatar, counters, the optional maze, and the phase machine.
//! Adapters and systems mutate it exclusively through [`apply`], which
//! broadcasts [`Event`] values describing what changed. Every game in the
//! catalog runs through this same simulation; only the [`GameConfig`] value
//! differs.

mod catalog;
mod grid;

pub use catalog::GameTitle;

use std::time::Duration;

use grid::WallGrid;
use mood_arcade_core::{
    AvatarRole, Command, EntityId, EntityKind, Epoch, Event, GameConfig, GamePhase, GridCoord,
    InputAxis, Lifecycle, MotionRule, PatrollerId, ResolutionOutcome, SimTime, TonicKind,
    WorldPoint, WorldVec, WELCOME_BANNER,
};

/// Upper bound on a single simulated step, bounding jumps after the host
/// suspends the frame loop.
const MAX_TICK: Duration = Duration::from_millis(250);

/// Terminal fade played by expired entities before removal.
const FADE_DURATION: Duration = Duration::from_millis(400);

/// Collision radius of launched arrows.
const ARROW_RADIUS: f32 = 6.0;

/// Extra slop added to pointer-press hit tests.
const PRESS_SLOP: f32 = 6.0;

/// Speed multiplier applied while the dash modifier is held.
const DASH_FACTOR: f32 = 1.6;

/// Margin kept between the walker avatar and the playfield edge.
const WALKER_INSET: f32 = 12.0;

/// Distance past the playfield at which escaped entities are dropped.
const ESCAPE_MARGIN: f32 = 40.0;

const JITTER_RNG_SEED: u64 = 0x6d6f_6f64_5f61_7263;
const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;

/// Transient HUD notices surfaced by maze interactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    /// A breather succeeded and relieved strain.
    Breathed,
    /// A breather was attempted too close to a patroller.
    UnsafeBreath,
    /// The avatar was caught by a patroller.
    Caught,
}

impl Notice {
    /// Player-facing text for the notice.
    #[must_use]
    pub const fn text(&self) -> &'static str {
        match self {
            Self::Breathed => "You breathed - calmer now",
            Self::UnsafeBreath => "Too close - not safe to breathe!",
            Self::Caught => "You were caught!",
        }
    }
}

/// How long HUD notices stay visible.
const NOTICE_DURATION: Duration = Duration::from_millis(1500);

/// Represents the authoritative Mood Arcade world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: GameConfig,
    phase: GamePhase,
    epoch: Epoch,
    clock: SimTime,
    axis: InputAxis,
    next_entity: u32,
    entities: Vec<Entity>,
    avatar: Avatar,
    score: i64,
    combo: u32,
    level: u32,
    lives: u32,
    strain: f32,
    maze: Option<MazeState>,
    notice: Option<(Notice, SimTime)>,
    fire_ready_at: SimTime,
    fallen: bool,
    rng_state: u64,
}

impl World {
    /// Creates a new world ready to run the provided game.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let maze = config
            .maze
            .as_ref()
            .map(|maze| MazeState::new(maze.map.as_slice(), maze.tile_length, &maze.patrollers));
        let mut world = Self {
            banner: WELCOME_BANNER,
            phase: GamePhase::NotStarted,
            epoch: Epoch::default(),
            clock: SimTime::ZERO,
            axis: InputAxis::default(),
            next_entity: 0,
            entities: Vec::new(),
            avatar: Avatar::at(start_position(&config)),
            score: 0,
            combo: 0,
            level: 1,
            lives: config.outcome.lives.unwrap_or(0),
            strain: 0.0,
            maze,
            notice: None,
            fire_ready_at: SimTime::ZERO,
            fallen: false,
            rng_state: JITTER_RNG_SEED,
            config,
        };
        world.reset_session();
        world
    }

    /// Resets every per-session value without bumping the epoch.
    fn reset_session(&mut self) {
        self.clock = SimTime::ZERO;
        self.axis = InputAxis::default();
        self.next_entity = 0;
        self.entities.clear();
        self.avatar = Avatar::at(start_position(&self.config));
        self.score = 0;
        self.combo = 0;
        self.level = 1;
        self.lives = self.config.outcome.lives.unwrap_or(0);
        self.strain = 0.0;
        self.notice = None;
        self.fire_ready_at = SimTime::ZERO;
        self.fallen = false;
        self.rng_state = JITTER_RNG_SEED;

        if let Some(maze_config) = self.config.maze.clone() {
            if let Some(maze) = self.maze.as_mut() {
                maze.reset(&maze_config.patrollers);
            }
            self.seed_pellets(&maze_config);
        }
    }

    /// Seeds one pellet entity on every floor tile not reserved for the
    /// avatar or a patroller spawn.
    fn seed_pellets(&mut self, maze_config: &mood_arcade_core::MazeConfig) {
        let Some(maze) = self.maze.as_ref() else {
            return;
        };
        let reserved: Vec<GridCoord> = maze_config
            .patrollers
            .iter()
            .map(|spawn| spawn.cell)
            .chain(std::iter::once(maze_config.avatar_start))
            .collect();
        let centers: Vec<WorldPoint> = maze
            .grid
            .floor_cells()
            .filter(|cell| !reserved.contains(cell))
            .map(|cell| maze.grid.center_of(cell))
            .collect();
        for center in centers {
            let id = self.allocate_entity_id();
            self.entities.push(Entity {
                id,
                kind: EntityKind::Pellet,
                position: center,
                velocity: WorldVec::ZERO,
                radius: 4.0,
                motion: MotionRule::Station,
                lifecycle: Lifecycle::Persistent,
                reward: maze_config.pellet_reward,
                expiry_penalty: 0,
                resolved: false,
                fade: None,
                jitter_elapsed: Duration::ZERO,
            });
        }
    }

    fn allocate_entity_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_entity);
        self.next_entity = self.next_entity.wrapping_add(1);
        id
    }

    fn post_notice(&mut self, notice: Notice) {
        self.notice = Some((notice, self.clock.deadline_after(NOTICE_DURATION)));
    }

    fn set_phase(&mut self, phase: GamePhase, out_events: &mut Vec<Event>) {
        if self.phase != phase {
            self.phase = phase;
            out_events.push(Event::PhaseChanged { phase });
        }
    }

    fn apply_score_delta(&mut self, delta: i64, out_events: &mut Vec<Event>) {
        if delta == 0 {
            return;
        }
        self.score += delta;
        out_events.push(Event::ScoreChanged {
            score: self.score,
            delta,
        });
        if let Some(stride) = self.config.scoring.level_stride {
            if stride > 0 && self.score > 0 {
                let level = (self.score / stride) as u32 + 1;
                if level > self.level {
                    self.level = level;
                    out_events.push(Event::LevelReached { level });
                }
            }
        }
    }

    fn break_combo(&mut self, out_events: &mut Vec<Event>) {
        if self.combo > 0 {
            out_events.push(Event::ComboBroken { streak: self.combo });
            self.combo = 0;
        }
    }

    fn change_strain(&mut self, delta: f32, out_events: &mut Vec<Event>) {
        let limit = self.config.outcome.strain_limit.unwrap_or(100.0);
        let updated = (self.strain + delta).clamp(0.0, limit);
        if (updated - self.strain).abs() > f32::EPSILON {
            self.strain = updated;
            out_events.push(Event::StrainChanged {
                strain: self.strain,
            });
        }
    }

    fn entity_index(&self, entity: EntityId) -> Option<usize> {
        self.entities.iter().position(|candidate| {
            candidate.id == entity && !candidate.resolved && candidate.fade.is_none()
        })
    }

    /// Resolves an entity through player interaction, applying its reward
    /// exactly once. A second resolution attempt is a guarded no-op.
    fn resolve_positive(&mut self, entity: EntityId, out_events: &mut Vec<Event>) {
        let Some(index) = self.entity_index(entity) else {
            return;
        };
        let removed = self.entities.remove(index);
        out_events.push(Event::EntityResolved {
            entity: removed.id,
            kind: removed.kind,
            outcome: ResolutionOutcome::Resolved,
        });
        self.combo += 1;
        self.apply_score_delta(removed.reward, out_events);
    }

    /// Removes an entity through interaction without any score effect.
    fn resolve_silent(&mut self, entity: EntityId, out_events: &mut Vec<Event>) {
        let Some(index) = self.entity_index(entity) else {
            return;
        };
        let removed = self.entities.remove(index);
        out_events.push(Event::EntityResolved {
            entity: removed.id,
            kind: removed.kind,
            outcome: ResolutionOutcome::Resolved,
        });
    }

    fn avatar_struck(&mut self, out_events: &mut Vec<Event>) {
        if self.config.outcome.lives.is_some() {
            self.lives = self.lives.saturating_sub(1);
        }
        self.avatar.invulnerable_until = self
            .clock
            .deadline_after(self.invulnerability_window());
        out_events.push(Event::AvatarStruck { lives: self.lives });
        self.break_combo(out_events);
    }

    fn invulnerability_window(&self) -> Duration {
        self.config
            .maze
            .as_ref()
            .map(|maze| maze.rules.invulnerability)
            .unwrap_or(Duration::from_millis(1500))
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.phase != GamePhase::Running {
            return;
        }

        let dt = dt.min(MAX_TICK);
        self.clock = self.clock.advanced_by(dt);
        out_events.push(Event::TimeAdvanced { dt });

        let seconds = dt.as_secs_f32();
        self.advance_avatar(seconds, out_events);
        self.advance_entities(dt, seconds);
        self.advance_patrollers(seconds, out_events);
        self.update_lifecycles(dt, out_events);
        self.resolve_contacts(out_events);
        self.check_outcome(out_events);
    }

    fn advance_avatar(&mut self, seconds: f32, out_events: &mut Vec<Event>) {
        let avatar_config = self.config.avatar;
        let bounds = self.config.bounds;
        match avatar_config.role {
            AvatarRole::Pointer => {}
            AvatarRole::Collector | AvatarRole::Shooter => {
                let step = self.axis.x() * avatar_config.speed * seconds;
                let moved = WorldPoint::new(
                    self.avatar.position.x() + step,
                    self.avatar.position.y(),
                );
                self.avatar.position = bounds.clamp(moved, avatar_config.radius);
            }
            AvatarRole::Walker => {
                self.advance_walker(seconds, out_events);
            }
            AvatarRole::Jumper => {
                let vy = self.avatar.velocity.dy() + avatar_config.gravity * seconds;
                self.avatar.velocity = WorldVec::new(
                    self.axis.x() * avatar_config.speed,
                    vy,
                );
                let mut x = self.avatar.position.x() + self.avatar.velocity.dx() * seconds;
                let y = self.avatar.position.y() + vy * seconds;
                // Horizontal screen wrap, the hopper convention.
                if x < 0.0 {
                    x += bounds.width();
                } else if x > bounds.width() {
                    x -= bounds.width();
                }
                self.avatar.position = WorldPoint::new(x, y);
                if y > bounds.height() + avatar_config.radius * 2.0 {
                    self.fallen = true;
                }
            }
        }
    }

    fn advance_walker(&mut self, seconds: f32, out_events: &mut Vec<Event>) {
        let Some(rules) = self.config.maze.as_ref().map(|maze| maze.rules) else {
            return;
        };
        let avatar_config = self.config.avatar;

        let breathing = self.clock < self.avatar.breathe_until;
        if !breathing {
            let x = self.axis.x();
            let y = self.axis.y();
            let magnitude = (x * x + y * y).sqrt();
            if magnitude > f32::EPSILON {
                let haste = if self.clock < self.avatar.haste_until {
                    rules.haste_factor
                } else {
                    1.0
                };
                let dash = if self.axis.dash() { DASH_FACTOR } else { 1.0 };
                let speed = avatar_config.speed * haste * dash;
                let step_x = x / magnitude * speed * seconds;
                let step_y = y / magnitude * speed * seconds;

                // Per-axis wall blocking keeps sliding along corridors possible.
                if let Some(maze) = self.maze.as_ref() {
                    let next_x =
                        WorldPoint::new(self.avatar.position.x() + step_x, self.avatar.position.y());
                    if !maze.grid.blocks(next_x) {
                        self.avatar.position = next_x;
                    }
                    let next_y =
                        WorldPoint::new(self.avatar.position.x(), self.avatar.position.y() + step_y);
                    if !maze.grid.blocks(next_y) {
                        self.avatar.position = next_y;
                    }
                }
            }
        }

        self.avatar.position = self.config.bounds.clamp(self.avatar.position, WALKER_INSET);

        // Patroller proximity accumulates strain; idle time decays it.
        let mut accumulated = 0.0;
        if let Some(maze) = self.maze.as_ref() {
            for patroller in &maze.patrollers {
                if self.clock < patroller.disabled_until {
                    continue;
                }
                let distance = patroller.position.distance_to(self.avatar.position);
                if distance < rules.proximity_radius {
                    accumulated +=
                        (1.0 - distance / rules.proximity_radius) * rules.proximity_rate * seconds;
                }
            }
        }
        let delta = accumulated - rules.strain_decay * seconds;
        self.change_strain(delta, out_events);
    }

    fn advance_entities(&mut self, dt: Duration, seconds: f32) {
        let bounds = self.config.bounds;
        let mut rng_state = self.rng_state;
        for entity in &mut self.entities {
            match entity.motion {
                MotionRule::Station => {}
                MotionRule::Linear | MotionRule::Falling { .. } => {
                    if let MotionRule::Falling { gravity } = entity.motion {
                        entity.velocity = WorldVec::new(
                            entity.velocity.dx(),
                            entity.velocity.dy() + gravity * seconds,
                        );
                    }
                    entity.position = entity.position.displaced(entity.velocity, seconds);
                }
                MotionRule::Bouncing => {
                    entity.position = entity.position.displaced(entity.velocity, seconds);
                    let left = entity.position.x() - entity.radius;
                    let right = entity.position.x() + entity.radius;
                    if left < 0.0 {
                        entity.velocity =
                            WorldVec::new(entity.velocity.dx().abs(), entity.velocity.dy());
                    } else if right > bounds.width() {
                        entity.velocity =
                            WorldVec::new(-entity.velocity.dx().abs(), entity.velocity.dy());
                    }
                }
                MotionRule::Jittering { interval, sway } => {
                    entity.jitter_elapsed = entity.jitter_elapsed.saturating_add(dt);
                    if !interval.is_zero() {
                        while entity.jitter_elapsed >= interval {
                            entity.jitter_elapsed -= interval;
                            rng_state = next_random(rng_state);
                            let unit = (rng_state >> 11) as f32 / (1u64 << 53) as f32;
                            entity.velocity =
                                WorldVec::new((unit * 2.0 - 1.0) * sway, entity.velocity.dy());
                        }
                    }
                    entity.position = entity.position.displaced(entity.velocity, seconds);
                }
            }
        }
        self.rng_state = rng_state;
    }

    fn advance_patrollers(&mut self, seconds: f32, out_events: &mut Vec<Event>) {
        let Some(maze_config) = self.config.maze.as_ref() else {
            return;
        };
        let lull_factor = maze_config.rules.lull_factor;
        let clock = self.clock;
        let Some(maze) = self.maze.as_mut() else {
            return;
        };
        let lulled = clock < maze.lull_until;

        for patroller in &mut maze.patrollers {
            if clock < patroller.disabled_until {
                continue;
            }
            let Some(target_cell) = patroller.next_step else {
                if !patroller.idle_reported {
                    patroller.idle_reported = true;
                    out_events.push(Event::PatrollerIdle {
                        patroller: patroller.id,
                        cell: patroller.cell,
                    });
                }
                continue;
            };

            let target = maze.grid.center_of(target_cell);
            let speed = patroller.speed * if lulled { lull_factor } else { 1.0 };
            let step = speed * seconds;
            let distance = patroller.position.distance_to(target);
            if distance <= step {
                patroller.position = target;
                patroller.cell = target_cell;
                patroller.next_step = None;
                patroller.idle_reported = true;
                out_events.push(Event::PatrollerIdle {
                    patroller: patroller.id,
                    cell: patroller.cell,
                });
            } else {
                let direction = WorldVec::towards(patroller.position, target);
                patroller.position = patroller.position.displaced(direction, step);
            }
        }
    }

    fn update_lifecycles(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let bounds = self.config.bounds;
        let miss_breaks_combo = self.config.scoring.miss_breaks_combo;

        // Countdown expiry: one penalty, then a short terminal fade.
        let mut expired: Vec<EntityId> = Vec::new();
        for entity in &mut self.entities {
            if entity.resolved {
                continue;
            }
            if let Lifecycle::Countdown(remaining) = entity.lifecycle {
                let remaining = remaining.saturating_sub(dt);
                entity.lifecycle = Lifecycle::Countdown(remaining);
                if remaining.is_zero() {
                    entity.resolved = true;
                    entity.fade = Some(FADE_DURATION);
                    expired.push(entity.id);
                }
            }
        }
        for id in expired {
            let Some(entity) = self.entities.iter().find(|entity| entity.id == id) else {
                continue;
            };
            let kind = entity.kind;
            let penalty = entity.expiry_penalty;
            out_events.push(Event::EntityResolved {
                entity: id,
                kind,
                outcome: ResolutionOutcome::Expired,
            });
            self.apply_score_delta(-penalty, out_events);
            self.break_combo(out_events);
        }

        // Fading entities advance toward removal.
        for entity in &mut self.entities {
            if let Some(fade) = entity.fade {
                entity.fade = Some(fade.saturating_sub(dt));
            }
        }
        self.entities
            .retain(|entity| entity.fade.map_or(true, |fade| !fade.is_zero()));

        // Escaped entities leave silently, at most costing the combo.
        let mut escapes: Vec<(EntityId, EntityKind, i64)> = Vec::new();
        self.entities.retain(|entity| {
            let escaped = entity.position.y() - entity.radius
                > bounds.height() + ESCAPE_MARGIN
                || entity.position.y() + entity.radius < -ESCAPE_MARGIN
                || entity.position.x() + entity.radius < -ESCAPE_MARGIN
                || entity.position.x() - entity.radius > bounds.width() + ESCAPE_MARGIN;
            if escaped && !entity.resolved {
                escapes.push((entity.id, entity.kind, entity.reward));
            }
            !escaped
        });
        for (id, kind, reward) in escapes {
            out_events.push(Event::EntityResolved {
                entity: id,
                kind,
                outcome: ResolutionOutcome::OutOfBounds,
            });
            if miss_breaks_combo && reward > 0 && !kind.is_projectile() {
                self.break_combo(out_events);
            }
        }
    }

    fn resolve_contacts(&mut self, out_events: &mut Vec<Event>) {
        match self.config.avatar.role {
            AvatarRole::Pointer => {}
            AvatarRole::Collector => self.resolve_collector_contacts(out_events),
            AvatarRole::Shooter => self.resolve_arrow_contacts(out_events),
            AvatarRole::Walker => self.resolve_walker_contacts(out_events),
            AvatarRole::Jumper => self.resolve_jumper_contacts(out_events),
        }
    }

    fn resolve_collector_contacts(&mut self, out_events: &mut Vec<Event>) {
        let avatar_config = self.config.avatar;
        let avatar = self.avatar.position;

        let mut caught: Vec<EntityId> = Vec::new();
        let mut hazards: Vec<EntityId> = Vec::new();
        for entity in &self.entities {
            if entity.resolved {
                continue;
            }
            let reach = avatar_config.radius + entity.radius;
            if entity.position.distance_to(avatar) >= reach {
                continue;
            }
            match entity.kind {
                EntityKind::Boulder => hazards.push(entity.id),
                EntityKind::Tear => caught.push(entity.id),
                _ => {}
            }
        }
        for id in caught {
            self.resolve_positive(id, out_events);
        }
        for id in hazards {
            self.resolve_silent(id, out_events);
            // Re-check per hazard so one burst cannot drain several lives.
            if self.clock >= self.avatar.invulnerable_until {
                self.avatar_struck(out_events);
            }
        }
    }

    fn resolve_arrow_contacts(&mut self, out_events: &mut Vec<Event>) {
        let mut hits: Vec<(EntityId, EntityId)> = Vec::new();
        for arrow in &self.entities {
            if arrow.resolved || arrow.kind != EntityKind::Arrow {
                continue;
            }
            let target = self
                .entities
                .iter()
                .filter(|entity| {
                    !entity.resolved
                        && matches!(entity.kind, EntityKind::Heart)
                        && entity.position.distance_to(arrow.position)
                            < entity.radius + arrow.radius
                })
                .min_by_key(|entity| entity.id);
            if let Some(target) = target {
                hits.push((arrow.id, target.id));
            }
        }
        for (arrow, target) in hits {
            self.resolve_positive(target, out_events);
            self.resolve_silent(arrow, out_events);
        }
    }

    fn resolve_walker_contacts(&mut self, out_events: &mut Vec<Event>) {
        let Some((rules, pellet_rebate)) = self
            .config
            .maze
            .as_ref()
            .map(|maze| (maze.rules, maze.pellet_strain_rebate))
        else {
            return;
        };
        let avatar_config = self.config.avatar;
        let avatar = self.avatar.position;

        let mut collected: Vec<(EntityId, EntityKind)> = Vec::new();
        for entity in &self.entities {
            if entity.resolved {
                continue;
            }
            let reach = avatar_config.radius + entity.radius;
            if entity.position.distance_to(avatar) < reach {
                collected.push((entity.id, entity.kind));
            }
        }
        for (id, kind) in collected {
            match kind {
                EntityKind::Pellet => {
                    self.resolve_positive(id, out_events);
                    self.change_strain(-pellet_rebate, out_events);
                }
                EntityKind::Tonic(tonic) => {
                    self.resolve_silent(id, out_events);
                    self.apply_tonic(tonic, &rules, out_events);
                }
                _ => {}
            }
        }

        // Patroller contact costs a life and resets positions.
        if self.clock >= self.avatar.invulnerable_until {
            let contact = self.maze.as_ref().and_then(|maze| {
                maze.patrollers
                    .iter()
                    .find(|patroller| {
                        self.clock >= patroller.disabled_until
                            && patroller.position.distance_to(avatar) < avatar_config.radius
                    })
                    .map(|patroller| patroller.id)
            });
            if contact.is_some() {
                self.avatar_struck(out_events);
                self.post_notice(Notice::Caught);
                self.avatar.position = start_position(&self.config);
                self.strain = rules.respawn_strain.min(
                    self.config.outcome.strain_limit.unwrap_or(f32::MAX),
                );
                out_events.push(Event::StrainChanged {
                    strain: self.strain,
                });
                let spawns = self
                    .config
                    .maze
                    .as_ref()
                    .map(|maze| maze.patrollers.clone())
                    .unwrap_or_default();
                if let Some(maze) = self.maze.as_mut() {
                    maze.reset_patroller_positions(&spawns);
                    for patroller in &maze.patrollers {
                        out_events.push(Event::PatrollerIdle {
                            patroller: patroller.id,
                            cell: patroller.cell,
                        });
                    }
                }
            }
        }
    }

    fn apply_tonic(
        &mut self,
        tonic: TonicKind,
        rules: &mood_arcade_core::MazeRules,
        out_events: &mut Vec<Event>,
    ) {
        match tonic {
            TonicKind::Haste => {
                self.avatar.haste_until = self.clock.deadline_after(rules.haste_duration);
            }
            TonicKind::Lull => {
                if let Some(maze) = self.maze.as_mut() {
                    maze.lull_until = self.clock.deadline_after(rules.lull_duration);
                }
            }
            TonicKind::Solace => {
                self.change_strain(-rules.solace_relief, out_events);
            }
            TonicKind::Hush => {
                let avatar = self.avatar.position;
                let deadline = self.clock.deadline_after(rules.hush_duration);
                if let Some(maze) = self.maze.as_mut() {
                    let nearest = maze
                        .patrollers
                        .iter_mut()
                        .min_by(|first, second| {
                            first
                                .position
                                .distance_to(avatar)
                                .total_cmp(&second.position.distance_to(avatar))
                        });
                    if let Some(patroller) = nearest {
                        patroller.disabled_until = deadline;
                    }
                }
            }
        }
    }

    fn resolve_jumper_contacts(&mut self, out_events: &mut Vec<Event>) {
        if self.avatar.velocity.dy() <= 0.0 {
            return;
        }
        let avatar_config = self.config.avatar;
        let avatar = self.avatar.position;
        let foot = avatar.y() + avatar_config.radius;

        let landing = self
            .entities
            .iter()
            .filter(|entity| {
                !entity.resolved
                    && matches!(entity.kind, EntityKind::Platform)
                    && (avatar.x() - entity.position.x()).abs() < entity.radius
                    && foot >= entity.position.y() - 4.0
                    && foot <= entity.position.y() + 10.0
            })
            .min_by_key(|entity| entity.id)
            .map(|entity| (entity.reward, entity.position.y()));

        if let Some((reward, surface)) = landing {
            self.avatar.velocity =
                WorldVec::new(self.avatar.velocity.dx(), -avatar_config.bounce_impulse);
            self.avatar.position =
                WorldPoint::new(avatar.x(), surface - avatar_config.radius - 1.0);
            self.combo += 1;
            self.apply_score_delta(reward, out_events);
        }
    }

    /// Evaluates terminal transitions. The win check runs first so that a
    /// tick satisfying both conditions resolves to `Won`.
    fn check_outcome(&mut self, out_events: &mut Vec<Event>) {
        let outcome = self.config.outcome;

        if let Some(win_score) = outcome.win_score {
            if self.score >= win_score {
                self.set_phase(GamePhase::Won, out_events);
                return;
            }
        }
        if let Some(survive_for) = outcome.survive_for {
            if self.clock.since_start() >= survive_for {
                self.set_phase(GamePhase::Won, out_events);
                return;
            }
        }

        if outcome.lives.is_some() && self.lives == 0 {
            self.set_phase(GamePhase::Lost, out_events);
            return;
        }
        if self.fallen {
            self.set_phase(GamePhase::Lost, out_events);
            return;
        }
        if let Some(limit) = outcome.strain_limit {
            if self.strain >= limit {
                self.set_phase(GamePhase::Lost, out_events);
                return;
            }
        }
        if let Some(loss_score) = outcome.loss_score {
            if self.score <= loss_score {
                self.set_phase(GamePhase::Lost, out_events);
            }
        }
    }

    fn pointer_press(&mut self, position: WorldPoint, out_events: &mut Vec<Event>) {
        let pressed = self
            .entities
            .iter_mut()
            .filter(|entity| {
                !entity.resolved
                    && entity.fade.is_none()
                    && entity.position.distance_to(position) < entity.radius + PRESS_SLOP
            })
            .min_by(|first, second| {
                first
                    .position
                    .distance_to(position)
                    .total_cmp(&second.position.distance_to(position))
            });

        let Some(entity) = pressed else {
            return;
        };
        // Blazes keep their expiry countdown while presses whittle strength.
        if let EntityKind::Blaze { strength } = entity.kind {
            if strength > 1 {
                entity.kind = EntityKind::Blaze {
                    strength: strength - 1,
                };
                return;
            }
            let id = entity.id;
            self.resolve_positive(id, out_events);
            return;
        }
        match entity.lifecycle {
            Lifecycle::HitPoints(left) if left > 1 => {
                entity.lifecycle = Lifecycle::HitPoints(left - 1);
            }
            Lifecycle::HitPoints(_) | Lifecycle::Countdown(_) | Lifecycle::Persistent => {
                let id = entity.id;
                self.resolve_positive(id, out_events);
            }
        }
    }

    fn launch_arrow(&mut self, toward: WorldPoint, out_events: &mut Vec<Event>) {
        let avatar_config = self.config.avatar;
        if avatar_config.role != AvatarRole::Shooter {
            return;
        }
        if self.clock < self.fire_ready_at {
            return;
        }
        self.fire_ready_at = self.clock.deadline_after(avatar_config.fire_cooldown);

        let origin = self.avatar.position;
        let velocity = WorldVec::towards(origin, toward).scaled(avatar_config.arrow_speed);
        if velocity == WorldVec::ZERO {
            return;
        }
        let id = self.allocate_entity_id();
        self.entities.push(Entity {
            id,
            kind: EntityKind::Arrow,
            position: origin,
            velocity,
            radius: ARROW_RADIUS,
            motion: MotionRule::Linear,
            lifecycle: Lifecycle::Persistent,
            reward: 0,
            expiry_penalty: 0,
            resolved: false,
            fade: None,
            jitter_elapsed: Duration::ZERO,
        });
        out_events.push(Event::EntitySpawned {
            entity: id,
            kind: EntityKind::Arrow,
            position: origin,
        });
    }

    fn breathe(&mut self, out_events: &mut Vec<Event>) {
        let Some(maze_config) = self.config.maze.as_ref() else {
            return;
        };
        let rules = maze_config.rules;
        self.avatar.breathe_until = self.clock.deadline_after(rules.breather_pause);

        let unsafe_breath = self.maze.as_ref().is_some_and(|maze| {
            maze.patrollers.iter().any(|patroller| {
                self.clock >= patroller.disabled_until
                    && patroller.position.distance_to(self.avatar.position) < rules.safety_radius
            })
        });
        if unsafe_breath {
            self.change_strain(rules.breather_penalty, out_events);
            self.post_notice(Notice::UnsafeBreath);
        } else {
            self.change_strain(-rules.breather_relief, out_events);
            self.post_notice(Notice::Breathed);
        }
    }

    fn spawn_entity(
        &mut self,
        epoch: Epoch,
        kind: EntityKind,
        position: WorldPoint,
        velocity: WorldVec,
        lifecycle: Lifecycle,
        radius: f32,
        out_events: &mut Vec<Event>,
    ) {
        if epoch != self.epoch || self.phase != GamePhase::Running {
            return;
        }
        let (margin, reward, expiry_penalty, motion) = self.spawn_parameters(kind, radius);
        let position = self.config.bounds.clamp(position, margin);
        let id = self.allocate_entity_id();
        self.entities.push(Entity {
            id,
            kind,
            position,
            velocity,
            radius,
            motion,
            lifecycle,
            reward,
            expiry_penalty,
            resolved: false,
            fade: None,
            jitter_elapsed: Duration::ZERO,
        });
        out_events.push(Event::EntitySpawned {
            entity: id,
            kind,
            position,
        });
    }

    /// Looks up the spawn-table row for the kind; rows carry the scoring and
    /// motion data the spawned entity inherits.
    fn spawn_parameters(&self, kind: EntityKind, radius: f32) -> (f32, i64, i64, MotionRule) {
        let Some(rule) = self.config.spawn.as_ref() else {
            return (radius, 0, 0, MotionRule::Station);
        };
        let row = rule.table.iter().find(|row| row.kind == kind);
        match row {
            Some(row) => (rule.margin.max(radius), row.reward, row.expiry_penalty, row.motion),
            None => (rule.margin.max(radius), 0, 0, MotionRule::Station),
        }
    }

    fn steer_patroller(
        &mut self,
        epoch: Epoch,
        id: PatrollerId,
        toward: GridCoord,
        out_events: &mut Vec<Event>,
    ) {
        if epoch != self.epoch || self.phase != GamePhase::Running {
            return;
        }
        let Some(maze) = self.maze.as_mut() else {
            return;
        };
        let step_is_floor = maze.grid.view().is_floor(toward);
        let Some(patroller) = maze
            .patrollers
            .iter_mut()
            .find(|patroller| patroller.id == id)
        else {
            return;
        };
        if step_is_floor && patroller.cell.manhattan_distance(toward) == 1 {
            patroller.next_step = Some(toward);
            patroller.idle_reported = false;
        } else if !patroller.idle_reported {
            patroller.idle_reported = true;
            out_events.push(Event::PatrollerIdle {
                patroller: patroller.id,
                cell: patroller.cell,
            });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Start => {
            if world.phase == GamePhase::NotStarted {
                world.set_phase(GamePhase::Running, out_events);
            }
        }
        Command::TogglePause => match world.phase {
            GamePhase::Running => world.set_phase(GamePhase::Paused, out_events),
            GamePhase::Paused => world.set_phase(GamePhase::Running, out_events),
            _ => {}
        },
        Command::Restart => {
            world.epoch = world.epoch.next();
            world.reset_session();
            world.set_phase(GamePhase::NotStarted, out_events);
        }
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SetAxis { axis } => world.axis = axis,
        Command::PointerPress { position } => {
            if world.phase == GamePhase::Running {
                world.pointer_press(position, out_events);
            }
        }
        Command::LaunchArrow { toward } => {
            if world.phase == GamePhase::Running {
                world.launch_arrow(toward, out_events);
            }
        }
        Command::Breathe => {
            if world.phase == GamePhase::Running {
                world.breathe(out_events);
            }
        }
        Command::SpawnEntity {
            epoch,
            kind,
            position,
            velocity,
            lifecycle,
            radius,
        } => world.spawn_entity(epoch, kind, position, velocity, lifecycle, radius, out_events),
        Command::SteerPatroller {
            epoch,
            patroller,
            toward,
        } => world.steer_patroller(epoch, patroller, toward, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{Notice, World};
    use mood_arcade_core::{
        AvatarRole, EntitySnapshot, EntityView, Epoch, GameConfig, GamePhase, GridView, Lifecycle,
        PatrollerSnapshot, PatrollerView, WorldPoint, WorldVec,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Current phase of the session.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        world.phase
    }

    /// Epoch token identifying the current session instance.
    #[must_use]
    pub fn epoch(world: &World) -> Epoch {
        world.epoch
    }

    /// Provides read-only access to the game configuration.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Captures a read-only view of the active entities.
    #[must_use]
    pub fn entity_view(world: &World) -> EntityView {
        let snapshots: Vec<EntitySnapshot> = world
            .entities
            .iter()
            .map(|entity| EntitySnapshot {
                id: entity.id,
                kind: entity.kind,
                position: entity.position,
                velocity: entity.velocity,
                radius: entity.radius,
                remaining: match entity.lifecycle {
                    Lifecycle::Countdown(remaining) => Some(remaining),
                    _ => None,
                },
                hits_left: match entity.lifecycle {
                    Lifecycle::HitPoints(left) => Some(left),
                    _ => None,
                },
                resolved: entity.resolved,
                fading: entity.fade.is_some(),
            })
            .collect();
        EntityView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of the maze patrollers.
    #[must_use]
    pub fn patroller_view(world: &World) -> PatrollerView {
        let snapshots: Vec<PatrollerSnapshot> = world
            .maze
            .as_ref()
            .map(|maze| {
                maze.patrollers
                    .iter()
                    .map(|patroller| PatrollerSnapshot {
                        id: patroller.id,
                        cell: patroller.cell,
                        position: patroller.position,
                        next_step: patroller.next_step,
                        disabled: world.clock < patroller.disabled_until,
                    })
                    .collect()
            })
            .unwrap_or_default();
        PatrollerView::from_snapshots(snapshots)
    }

    /// Exposes the maze wall grid, when the game has one.
    #[must_use]
    pub fn grid_view(world: &World) -> Option<GridView<'_>> {
        world.maze.as_ref().map(|maze| maze.grid.view())
    }

    /// Side length of a maze tile in world units, when the game has a maze.
    #[must_use]
    pub fn tile_length(world: &World) -> Option<f32> {
        world.maze.as_ref().map(|maze| maze.grid.tile_length())
    }

    /// Immutable representation of the avatar used for presentation.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct AvatarSnapshot {
        /// Control scheme and collision role.
        pub role: AvatarRole,
        /// Playfield position of the avatar's center.
        pub position: WorldPoint,
        /// Current velocity in world units per second.
        pub velocity: WorldVec,
        /// Collision radius in world units.
        pub radius: f32,
        /// Whether the post-hit immunity window is active.
        pub invulnerable: bool,
        /// Whether a breather currently freezes input.
        pub breathing: bool,
    }

    /// Captures the avatar state for presentation.
    #[must_use]
    pub fn avatar(world: &World) -> AvatarSnapshot {
        AvatarSnapshot {
            role: world.config.avatar.role,
            position: world.avatar.position,
            velocity: world.avatar.velocity,
            radius: world.config.avatar.radius,
            invulnerable: world.clock < world.avatar.invulnerable_until,
            breathing: world.clock < world.avatar.breathe_until,
        }
    }

    /// Counters shown on the HUD.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct HudSnapshot {
        /// Current score.
        pub score: i64,
        /// Current combo streak length.
        pub combo: u32,
        /// One-based level index.
        pub level: u32,
        /// Remaining lives, when the game tracks lives.
        pub lives: Option<u32>,
        /// Strain gauge value and limit, when the game tracks strain.
        pub strain: Option<(f32, f32)>,
        /// Remaining survival time, when the game is timed.
        pub time_left: Option<Duration>,
    }

    /// Captures the HUD counters.
    #[must_use]
    pub fn hud(world: &World) -> HudSnapshot {
        HudSnapshot {
            score: world.score,
            combo: world.combo,
            level: world.level,
            lives: world.config.outcome.lives.map(|_| world.lives),
            strain: world
                .config
                .outcome
                .strain_limit
                .map(|limit| (world.strain, limit)),
            time_left: world.config.outcome.survive_for.map(|survive_for| {
                survive_for.saturating_sub(world.clock.since_start())
            }),
        }
    }

    /// Currently visible HUD notice, if one is active.
    #[must_use]
    pub fn notice(world: &World) -> Option<Notice> {
        world
            .notice
            .and_then(|(notice, until)| (world.clock < until).then_some(notice))
    }
}

#[derive(Clone, Copy, Debug)]
struct Avatar {
    position: WorldPoint,
    velocity: WorldVec,
    haste_until: SimTime,
    invulnerable_until: SimTime,
    breathe_until: SimTime,
}

impl Avatar {
    fn at(position: WorldPoint) -> Self {
        Self {
            position,
            velocity: WorldVec::ZERO,
            haste_until: SimTime::ZERO,
            invulnerable_until: SimTime::ZERO,
            breathe_until: SimTime::ZERO,
        }
    }
}

#[derive(Clone, Debug)]
struct Entity {
    id: EntityId,
    kind: EntityKind,
    position: WorldPoint,
    velocity: WorldVec,
    radius: f32,
    motion: MotionRule,
    lifecycle: Lifecycle,
    reward: i64,
    expiry_penalty: i64,
    resolved: bool,
    fade: Option<Duration>,
    jitter_elapsed: Duration,
}

#[derive(Clone, Debug)]
struct Patroller {
    id: PatrollerId,
    position: WorldPoint,
    cell: GridCoord,
    next_step: Option<GridCoord>,
    speed: f32,
    disabled_until: SimTime,
    idle_reported: bool,
}

#[derive(Clone, Debug)]
struct MazeState {
    grid: WallGrid,
    patrollers: Vec<Patroller>,
    lull_until: SimTime,
}

impl MazeState {
    fn new(
        map: &[String],
        tile_length: f32,
        spawns: &[mood_arcade_core::PatrollerSpawn],
    ) -> Self {
        let grid = WallGrid::parse(map, tile_length);
        let patrollers = spawns
            .iter()
            .enumerate()
            .map(|(index, spawn)| Patroller {
                id: PatrollerId::new(index as u32),
                position: grid.center_of(spawn.cell),
                cell: spawn.cell,
                next_step: None,
                speed: spawn.speed,
                disabled_until: SimTime::ZERO,
                idle_reported: false,
            })
            .collect();
        Self {
            grid,
            patrollers,
            lull_until: SimTime::ZERO,
        }
    }

    fn reset(&mut self, spawns: &[mood_arcade_core::PatrollerSpawn]) {
        self.lull_until = SimTime::ZERO;
        self.reset_patroller_positions(spawns);
        for patroller in &mut self.patrollers {
            patroller.disabled_until = SimTime::ZERO;
        }
    }

    fn reset_patroller_positions(&mut self, spawns: &[mood_arcade_core::PatrollerSpawn]) {
        for (patroller, spawn) in self.patrollers.iter_mut().zip(spawns) {
            patroller.cell = spawn.cell;
            patroller.position = self.grid.center_of(spawn.cell);
            patroller.next_step = None;
            patroller.idle_reported = false;
        }
    }
}

fn start_position(config: &GameConfig) -> WorldPoint {
    match config.avatar.role {
        AvatarRole::Pointer => WorldPoint::new(
            config.bounds.width() / 2.0,
            config.bounds.height() / 2.0,
        ),
        AvatarRole::Collector => WorldPoint::new(
            config.bounds.width() / 2.0,
            config.bounds.height() - 40.0,
        ),
        AvatarRole::Shooter => WorldPoint::new(
            config.bounds.width() / 2.0,
            config.bounds.height() - 30.0,
        ),
        AvatarRole::Jumper => WorldPoint::new(
            config.bounds.width() / 2.0,
            config.bounds.height() - 80.0,
        ),
        AvatarRole::Walker => config
            .maze
            .as_ref()
            .map(|maze| {
                WallGrid::parse(&maze.map, maze.tile_length).center_of(maze.avatar_start)
            })
            .unwrap_or(WorldPoint::new(
                config.bounds.width() / 2.0,
                config.bounds.height() / 2.0,
            )),
    }
}

fn next_random(state: u64) -> u64 {
    state.wrapping_mul(RNG_MULTIPLIER).wrapping_add(RNG_INCREMENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mood_arcade_core::{
        AvatarConfig, Bounds, OutcomeRule, ScoreRule, SpawnPlacement, SpawnRule, SpawnWeight,
        SpeedRange,
    };

    fn heart_row(reward: i64, expiry_penalty: i64) -> SpawnWeight {
        SpawnWeight {
            kind: EntityKind::Heart,
            weight: 1,
            lifecycle: Lifecycle::Persistent,
            motion: MotionRule::Station,
            radius: 16.0,
            speed: SpeedRange::fixed(0.0),
            reward,
            expiry_penalty,
        }
    }

    fn pointer_config(outcome: OutcomeRule) -> GameConfig {
        GameConfig {
            bounds: Bounds::new(360.0, 640.0),
            avatar: AvatarConfig {
                role: AvatarRole::Pointer,
                speed: 0.0,
                radius: 0.0,
                gravity: 0.0,
                bounce_impulse: 0.0,
                fire_cooldown: Duration::ZERO,
                arrow_speed: 0.0,
            },
            spawn: Some(SpawnRule {
                interval: Duration::from_secs(1),
                interval_floor: Duration::from_secs(1),
                interval_decay: 1.0,
                placement: SpawnPlacement::UniformInset,
                margin: 24.0,
                table: vec![heart_row(10, 5)],
                max_active: None,
            }),
            scoring: ScoreRule {
                level_stride: Some(100),
                miss_breaks_combo: false,
            },
            outcome,
            maze: None,
        }
    }

    fn open_outcome() -> OutcomeRule {
        OutcomeRule {
            win_score: None,
            loss_score: None,
            lives: None,
            strain_limit: None,
            survive_for: None,
        }
    }

    fn started(config: GameConfig) -> (World, Vec<Event>) {
        let mut world = World::new(config);
        let mut events = Vec::new();
        apply(&mut world, Command::Start, &mut events);
        (world, events)
    }

    fn spawn_heart(
        world: &mut World,
        position: WorldPoint,
        lifecycle: Lifecycle,
        events: &mut Vec<Event>,
    ) -> EntityId {
        let before: Vec<EntityId> = query::entity_view(world)
            .iter()
            .map(|snapshot| snapshot.id)
            .collect();
        apply(
            world,
            Command::SpawnEntity {
                epoch: query::epoch(world),
                kind: EntityKind::Heart,
                position,
                velocity: WorldVec::ZERO,
                lifecycle,
                radius: 16.0,
            },
            events,
        );
        query::entity_view(world)
            .iter()
            .map(|snapshot| snapshot.id)
            .find(|id| !before.contains(id))
            .expect("spawn must add an entity")
    }

    fn tick(world: &mut World, millis: u64, events: &mut Vec<Event>) {
        apply(
            world,
            Command::Tick {
                dt: Duration::from_millis(millis),
            },
            events,
        );
    }

    fn score_of(world: &World) -> i64 {
        query::hud(world).score
    }

    #[test]
    fn positive_resolution_and_expiry_settle_to_expected_score() {
        let (mut world, mut events) = started(pointer_config(open_outcome()));

        let position = WorldPoint::new(100.0, 100.0);
        let _ = spawn_heart(&mut world, position, Lifecycle::Persistent, &mut events);
        apply(&mut world, Command::PointerPress { position }, &mut events);
        assert_eq!(score_of(&world), 10);

        let far = WorldPoint::new(300.0, 300.0);
        let _ = spawn_heart(
            &mut world,
            far,
            Lifecycle::Countdown(Duration::from_millis(100)),
            &mut events,
        );
        tick(&mut world, 200, &mut events);
        assert_eq!(score_of(&world), 5);
    }

    #[test]
    fn resolved_entities_never_score_twice() {
        let (mut world, mut events) = started(pointer_config(open_outcome()));

        let position = WorldPoint::new(120.0, 200.0);
        let _ = spawn_heart(&mut world, position, Lifecycle::Persistent, &mut events);
        apply(&mut world, Command::PointerPress { position }, &mut events);
        apply(&mut world, Command::PointerPress { position }, &mut events);

        assert_eq!(score_of(&world), 10);
        let resolutions = events
            .iter()
            .filter(|event| matches!(event, Event::EntityResolved { .. }))
            .count();
        assert_eq!(resolutions, 1);
    }

    #[test]
    fn expiry_applies_exactly_one_penalty_then_removes_within_the_fade() {
        let (mut world, mut events) = started(pointer_config(open_outcome()));

        let position = WorldPoint::new(180.0, 320.0);
        let _ = spawn_heart(
            &mut world,
            position,
            Lifecycle::Countdown(Duration::from_millis(50)),
            &mut events,
        );

        tick(&mut world, 100, &mut events);
        assert_eq!(score_of(&world), -5);
        assert_eq!(query::entity_view(&world).len(), 1, "fade still visible");

        tick(&mut world, 100, &mut events);
        tick(&mut world, 100, &mut events);
        tick(&mut world, 100, &mut events);
        tick(&mut world, 100, &mut events);
        assert_eq!(score_of(&world), -5, "penalty applied exactly once");
        assert!(query::entity_view(&world).is_empty(), "fade must end");
    }

    #[test]
    fn pressing_a_fading_entity_is_ignored() {
        let (mut world, mut events) = started(pointer_config(open_outcome()));

        let position = WorldPoint::new(180.0, 320.0);
        let _ = spawn_heart(
            &mut world,
            position,
            Lifecycle::Countdown(Duration::from_millis(50)),
            &mut events,
        );
        tick(&mut world, 100, &mut events);
        apply(&mut world, Command::PointerPress { position }, &mut events);

        assert_eq!(score_of(&world), -5, "late press must not mutate score");
    }

    #[test]
    fn blaze_strength_gates_resolution_behind_repeated_presses() {
        let mut config = pointer_config(open_outcome());
        if let Some(rule) = config.spawn.as_mut() {
            rule.table = vec![SpawnWeight {
                kind: EntityKind::Blaze { strength: 2 },
                weight: 1,
                lifecycle: Lifecycle::Countdown(Duration::from_secs(10)),
                motion: MotionRule::Station,
                radius: 20.0,
                speed: SpeedRange::fixed(0.0),
                reward: 20,
                expiry_penalty: 10,
            }];
        }
        let (mut world, mut events) = started(config);

        let position = WorldPoint::new(200.0, 200.0);
        let epoch = query::epoch(&world);
        apply(
            &mut world,
            Command::SpawnEntity {
                epoch,
                kind: EntityKind::Blaze { strength: 2 },
                position,
                velocity: WorldVec::ZERO,
                lifecycle: Lifecycle::Countdown(Duration::from_secs(10)),
                radius: 20.0,
            },
            &mut events,
        );

        apply(&mut world, Command::PointerPress { position }, &mut events);
        assert_eq!(score_of(&world), 0, "first press only weakens the blaze");
        apply(&mut world, Command::PointerPress { position }, &mut events);
        assert_eq!(score_of(&world), 20);
    }

    #[test]
    fn spawn_positions_are_clamped_into_the_margin() {
        let (mut world, mut events) = started(pointer_config(open_outcome()));

        let _ = spawn_heart(
            &mut world,
            WorldPoint::new(-500.0, 9000.0),
            Lifecycle::Persistent,
            &mut events,
        );

        let config = query::config(&world).clone();
        let margin = config.spawn.expect("pointer config spawns").margin;
        for snapshot in query::entity_view(&world).iter() {
            assert!(config.bounds.contains(snapshot.position, margin));
        }
    }

    #[test]
    fn loss_threshold_freezes_the_session_until_restart() {
        let (mut world, mut events) = started(pointer_config(OutcomeRule {
            loss_score: Some(-5),
            ..open_outcome()
        }));

        let _ = spawn_heart(
            &mut world,
            WorldPoint::new(100.0, 100.0),
            Lifecycle::Countdown(Duration::from_millis(50)),
            &mut events,
        );
        tick(&mut world, 100, &mut events);

        assert_eq!(query::phase(&world), GamePhase::Lost);
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::PhaseChanged { phase: GamePhase::Lost })));

        events.clear();
        tick(&mut world, 100, &mut events);
        assert!(
            events.is_empty(),
            "terminal sessions must not advance or mutate"
        );

        apply(&mut world, Command::Restart, &mut events);
        assert_eq!(query::phase(&world), GamePhase::NotStarted);
        assert_eq!(score_of(&world), 0);
        assert!(query::entity_view(&world).is_empty());
    }

    #[test]
    fn winning_takes_priority_over_simultaneous_loss() {
        let mut config = GameTitle::Moonfall.config();
        config.outcome = OutcomeRule {
            win_score: Some(10),
            loss_score: None,
            lives: Some(1),
            strain_limit: None,
            survive_for: None,
        };
        let (mut world, mut events) = started(config);

        let avatar = query::avatar(&world).position;
        // A tear and a boulder arrive in the same tick: the catch pushes the
        // score to the win threshold while the boulder drains the last life.
        let epoch = query::epoch(&world);
        apply(
            &mut world,
            Command::SpawnEntity {
                epoch,
                kind: EntityKind::Tear,
                position: avatar,
                velocity: WorldVec::ZERO,
                lifecycle: Lifecycle::Persistent,
                radius: 12.0,
            },
            &mut events,
        );
        let epoch = query::epoch(&world);
        apply(
            &mut world,
            Command::SpawnEntity {
                epoch,
                kind: EntityKind::Boulder,
                position: avatar,
                velocity: WorldVec::ZERO,
                lifecycle: Lifecycle::Persistent,
                radius: 16.0,
            },
            &mut events,
        );
        tick(&mut world, 16, &mut events);

        assert_eq!(query::phase(&world), GamePhase::Won);
    }

    #[test]
    fn pause_freezes_simulation_but_keeps_state_visible() {
        let (mut world, mut events) = started(pointer_config(open_outcome()));
        let _ = spawn_heart(
            &mut world,
            WorldPoint::new(50.0, 50.0),
            Lifecycle::Countdown(Duration::from_secs(5)),
            &mut events,
        );

        apply(&mut world, Command::TogglePause, &mut events);
        assert_eq!(query::phase(&world), GamePhase::Paused);

        events.clear();
        tick(&mut world, 500, &mut events);
        assert!(events.is_empty(), "paused ticks must be no-ops");
        assert_eq!(query::entity_view(&world).len(), 1);

        apply(&mut world, Command::TogglePause, &mut events);
        assert_eq!(query::phase(&world), GamePhase::Running);
    }

    #[test]
    fn stale_epoch_commands_cannot_touch_a_restarted_session() {
        let (mut world, mut events) = started(pointer_config(open_outcome()));
        let stale_epoch = query::epoch(&world);

        apply(&mut world, Command::Restart, &mut events);
        apply(&mut world, Command::Start, &mut events);
        assert_ne!(query::epoch(&world), stale_epoch);

        apply(
            &mut world,
            Command::SpawnEntity {
                epoch: stale_epoch,
                kind: EntityKind::Heart,
                position: WorldPoint::new(100.0, 100.0),
                velocity: WorldVec::ZERO,
                lifecycle: Lifecycle::Persistent,
                radius: 16.0,
            },
            &mut events,
        );

        assert!(
            query::entity_view(&world).is_empty(),
            "stale spawn leaked across the restart"
        );
    }

    #[test]
    fn escaped_collectibles_break_the_combo_silently() {
        let mut config = GameTitle::Teardrops.config();
        config.outcome = open_outcome();
        let (mut world, mut events) = started(config);

        // First tear lands in the bucket to open a streak.
        let avatar = query::avatar(&world).position;
        let epoch = query::epoch(&world);
        apply(
            &mut world,
            Command::SpawnEntity {
                epoch,
                kind: EntityKind::Tear,
                position: avatar,
                velocity: WorldVec::ZERO,
                lifecycle: Lifecycle::Persistent,
                radius: 14.0,
            },
            &mut events,
        );
        tick(&mut world, 16, &mut events);
        assert_eq!(query::hud(&world).combo, 1);
        let score_after_catch = score_of(&world);

        // Second tear falls past the bucket and leaves the playfield.
        let epoch = query::epoch(&world);
        apply(
            &mut world,
            Command::SpawnEntity {
                epoch,
                kind: EntityKind::Tear,
                position: WorldPoint::new(30.0, 620.0),
                velocity: WorldVec::new(0.0, 400.0),
                lifecycle: Lifecycle::Persistent,
                radius: 14.0,
            },
            &mut events,
        );
        events.clear();
        tick(&mut world, 250, &mut events);

        assert_eq!(score_of(&world), score_after_catch, "misses never score");
        assert_eq!(query::hud(&world).combo, 0);
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::ComboBroken { streak: 1 })));
    }

    #[test]
    fn walker_breather_freezes_input_and_clamps_strain_at_zero() {
        let (mut world, mut events) = started(GameTitle::Corridors.config());

        apply(&mut world, Command::Breathe, &mut events);

        let strain = query::hud(&world).strain.expect("strain tracked").0;
        assert!(strain.abs() < f32::EPSILON, "relief clamps at zero");
        assert!(query::avatar(&world).breathing);

        // Held input must not move the avatar while breathing.
        let before = query::avatar(&world).position;
        apply(
            &mut world,
            Command::SetAxis {
                axis: InputAxis::new(1.0, 0.0, false),
            },
            &mut events,
        );
        tick(&mut world, 100, &mut events);
        assert_eq!(query::avatar(&world).position, before);
    }

    #[test]
    fn jumper_bounces_instead_of_falling_through_platforms() {
        let (mut world, mut events) = started(GameTitle::Rooftops.config());

        let avatar = query::avatar(&world);
        let epoch = query::epoch(&world);
        apply(
            &mut world,
            Command::SpawnEntity {
                epoch,
                kind: EntityKind::Platform,
                position: WorldPoint::new(
                    avatar.position.x(),
                    avatar.position.y() + avatar.radius + 6.0,
                ),
                velocity: WorldVec::ZERO,
                lifecycle: Lifecycle::Persistent,
                radius: 28.0,
            },
            &mut events,
        );

        // Let gravity pull the avatar down onto the platform.
        tick(&mut world, 100, &mut events);
        tick(&mut world, 100, &mut events);

        let after = query::avatar(&world);
        assert!(
            after.velocity.dy() < 0.0,
            "landing must convert descent into ascent"
        );
        assert_eq!(score_of(&world), 10, "each bounce scores the platform");
    }

    #[test]
    fn tick_deltas_are_clamped_against_suspend_jumps() {
        let (mut world, mut events) = started(pointer_config(open_outcome()));
        let _ = spawn_heart(
            &mut world,
            WorldPoint::new(180.0, 100.0),
            Lifecycle::Countdown(Duration::from_secs(1)),
            &mut events,
        );

        // A huge delta may only consume MAX_TICK of countdown.
        tick(&mut world, 60_000, &mut events);
        let snapshot = query::entity_view(&world)
            .into_vec()
            .pop()
            .expect("entity survives the clamped tick");
        assert_eq!(
            snapshot.remaining,
            Some(Duration::from_millis(750)),
            "only the clamped delta may elapse"
        );
    }
}
