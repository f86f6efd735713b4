#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Mood Arcade engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.
//!
//! It also defines the [`GameConfig`] family: plain-data descriptions of a
//! single arcade game (spawn cadence, scoring table, win/loss thresholds,
//! optional maze). Every game in the catalog is one such value; the
//! simulation itself is written once.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Mood Arcade.";

/// Lifecycle phase of a single game session.
///
/// Transitions: `NotStarted → Running`, `Running ⇄ Paused`,
/// `Running → Won | Lost`. The terminal phases are exited only through an
/// explicit restart, which resets the session back to `NotStarted`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Session constructed but the start control has not been pressed.
    NotStarted,
    /// Simulation advances: spawning, motion, collisions, scoring.
    Running,
    /// Simulation frozen; render ticks continue so the frame stays visible.
    Paused,
    /// Terminal victory state.
    Won,
    /// Terminal defeat state.
    Lost,
}

impl GamePhase {
    /// Returns `true` for the `Won` and `Lost` end states.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    /// Returns `true` when ticks may mutate simulation state.
    #[must_use]
    pub const fn accepts_simulation(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Unique identifier assigned to a spawned entity.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a maze patroller.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PatrollerId(u32);

impl PatrollerId {
    /// Creates a new patroller identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Generation token identifying one world instance between restarts.
///
/// Commands fabricated by systems carry the epoch they observed; the world
/// rejects commands stamped with a stale epoch so that work queued against a
/// previous session can never mutate the next one.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Epoch(u64);

impl Epoch {
    /// Creates an epoch token with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the epoch.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Returns the epoch that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Simulated timestamp measured from session start.
///
/// Buff expiries and invulnerability windows are stored as `SimTime` values
/// so they pause together with the simulation clock.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SimTime(Duration);

impl SimTime {
    /// Timestamp of the session start.
    pub const ZERO: Self = Self(Duration::ZERO);

    /// Creates a timestamp from a duration since session start.
    #[must_use]
    pub const fn new(since_start: Duration) -> Self {
        Self(since_start)
    }

    /// Duration elapsed since session start.
    #[must_use]
    pub const fn since_start(&self) -> Duration {
        self.0
    }

    /// Returns this timestamp advanced by the provided delta.
    #[must_use]
    pub fn advanced_by(self, dt: Duration) -> Self {
        Self(self.0.saturating_add(dt))
    }

    /// Returns this timestamp pushed `window` into the future.
    #[must_use]
    pub fn deadline_after(self, window: Duration) -> Self {
        self.advanced_by(window)
    }
}

/// Continuous playfield position expressed in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new playfield position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate, growing rightwards.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate, growing downwards.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance_to(self, other: WorldPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns this position displaced by `velocity` over `seconds`.
    #[must_use]
    pub fn displaced(self, velocity: WorldVec, seconds: f32) -> Self {
        Self {
            x: self.x + velocity.dx() * seconds,
            y: self.y + velocity.dy() * seconds,
        }
    }
}

/// Continuous velocity or displacement expressed in world units per second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldVec {
    dx: f32,
    dy: f32,
}

impl WorldVec {
    /// The zero vector.
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    /// Creates a new vector from per-axis components.
    #[must_use]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn dx(&self) -> f32 {
        self.dx
    }

    /// Vertical component.
    #[must_use]
    pub const fn dy(&self) -> f32 {
        self.dy
    }

    /// Magnitude of the vector.
    #[must_use]
    pub fn length(&self) -> f32 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }

    /// Returns the vector scaled by the provided factor.
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            dx: self.dx * factor,
            dy: self.dy * factor,
        }
    }

    /// Returns a unit-length vector pointing from `from` towards `to`.
    ///
    /// Degenerates to the zero vector when the two points coincide.
    #[must_use]
    pub fn towards(from: WorldPoint, to: WorldPoint) -> Self {
        let dx = to.x() - from.x();
        let dy = to.y() - from.y();
        let length = (dx * dx + dy * dy).sqrt();
        if length <= f32::EPSILON {
            return Self::ZERO;
        }
        Self {
            dx: dx / length,
            dy: dy / length,
        }
    }
}

/// Axis-aligned playfield extent anchored at the origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    width: f32,
    height: f32,
}

impl Bounds {
    /// Creates a playfield extent with the provided dimensions.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Playfield width in world units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Playfield height in world units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Reports whether the position lies inside the playfield, shrunk on all
    /// sides by `inset`.
    #[must_use]
    pub fn contains(&self, position: WorldPoint, inset: f32) -> bool {
        position.x() >= inset
            && position.y() >= inset
            && position.x() <= self.width - inset
            && position.y() <= self.height - inset
    }

    /// Clamps the position to the playfield, shrunk on all sides by `inset`.
    #[must_use]
    pub fn clamp(&self, position: WorldPoint, inset: f32) -> WorldPoint {
        let max_x = (self.width - inset).max(inset);
        let max_y = (self.height - inset).max(inset);
        WorldPoint::new(
            position.x().clamp(inset, max_x),
            position.y().clamp(inset, max_y),
        )
    }
}

/// Location of a single maze tile expressed as column and row indices.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridCoord {
    column: u32,
    row: u32,
}

impl GridCoord {
    /// Creates a new grid tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two tile coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: GridCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }
}

/// Maze power-up effects applied when the avatar collects a tonic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TonicKind {
    /// Temporary avatar speed buff.
    Haste,
    /// Temporary patroller slowdown.
    Lull,
    /// Immediate strain rebate.
    Solace,
    /// Disables the nearest patroller for a window.
    Hush,
}

/// Discriminant selecting an entity's motion, collision, and render rules.
///
/// Each variant is matched exhaustively wherever behavior differs, so adding
/// a kind is a compile-time-checked enumeration rather than a scattered
/// string comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Pointer-press target extinguished after `strength` hits.
    Blaze {
        /// Remaining presses required at spawn time (1..=3).
        strength: u8,
    },
    /// Falling collectible caught by the collector.
    Tear,
    /// Falling hazard that costs a life on contact.
    Boulder,
    /// Stationary countdown target resolved by an arrow.
    Heart,
    /// Player projectile.
    Arrow,
    /// Bounce surface for the jumper role.
    Platform,
    /// Maze collectible worth score and a small strain rebate.
    Pellet,
    /// Maze power-up.
    Tonic(TonicKind),
}

impl EntityKind {
    /// Returns `true` for kinds launched by the avatar rather than spawned
    /// by the interval rule.
    #[must_use]
    pub const fn is_projectile(&self) -> bool {
        matches!(self, Self::Arrow)
    }
}

/// Removal rule governing an entity's time in the active set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Expires into a penalty when the countdown reaches zero.
    Countdown(Duration),
    /// Resolves after the provided number of successful interactions.
    HitPoints(u32),
    /// Removed only by resolution or by leaving the playfield.
    Persistent,
}

/// Terminal classification of a removed entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionOutcome {
    /// Resolved by player interaction; positive score effects applied.
    Resolved,
    /// Countdown elapsed; penalty applied.
    Expired,
    /// Left the playfield; no score effect.
    OutOfBounds,
}

/// Motion rule advanced every simulation tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum MotionRule {
    /// No movement.
    Station,
    /// Velocity integrates unchanged.
    Linear,
    /// Vertical acceleration accumulates on the velocity each tick.
    Falling {
        /// Downward acceleration in world units per second squared.
        gravity: f32,
    },
    /// Horizontal component reflects off the playfield sides.
    Bouncing,
    /// Horizontal component re-randomizes on a timer while falling.
    Jittering {
        /// Simulated time between horizontal re-randomizations.
        interval: Duration,
        /// Maximum magnitude of the randomized horizontal speed.
        sway: f32,
    },
}

/// Control scheme and collision role of the player-controlled actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AvatarRole {
    /// No body; pointer presses are the interaction.
    Pointer,
    /// Horizontally steered catcher near the bottom edge.
    Collector,
    /// Fixed anchor launching arrows toward the pointer.
    Shooter,
    /// Maze walker blocked by wall tiles.
    Walker,
    /// Gravity-bound hopper that bounces off platforms.
    Jumper,
}

/// Per-frame movement input gathered by the adapter, clamped to `-1.0..=1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputAxis {
    x: f32,
    y: f32,
    dash: bool,
}

impl InputAxis {
    /// Creates a clamped input axis snapshot.
    #[must_use]
    pub fn new(x: f32, y: f32, dash: bool) -> Self {
        Self {
            x: x.clamp(-1.0, 1.0),
            y: y.clamp(-1.0, 1.0),
            dash,
        }
    }

    /// Horizontal input in `-1.0..=1.0`, positive rightwards.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical input in `-1.0..=1.0`, positive downwards.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Whether the dash modifier is held.
    #[must_use]
    pub const fn dash(&self) -> bool {
        self.dash
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Begins the session from `NotStarted`.
    Start,
    /// Toggles between `Running` and `Paused`.
    TogglePause,
    /// Resets counters and entities, bumps the epoch, returns to `NotStarted`.
    Restart,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Replaces the held movement input for subsequent ticks.
    SetAxis {
        /// Clamped per-axis input snapshot.
        axis: InputAxis,
    },
    /// Reports a pointer press at the provided playfield position.
    PointerPress {
        /// Press position in world units.
        position: WorldPoint,
    },
    /// Requests that the shooter launch an arrow toward the position.
    LaunchArrow {
        /// Aim position in world units.
        toward: WorldPoint,
    },
    /// Requests a maze breather: a short input freeze that relieves strain
    /// when no patroller is nearby.
    Breathe,
    /// Requests that a new entity enter the playfield.
    SpawnEntity {
        /// Epoch observed by the system that fabricated the command.
        epoch: Epoch,
        /// Kind assigned to the new entity.
        kind: EntityKind,
        /// Spawn position in world units.
        position: WorldPoint,
        /// Initial velocity in world units per second.
        velocity: WorldVec,
        /// Removal rule for the new entity.
        lifecycle: Lifecycle,
        /// Collision radius in world units.
        radius: f32,
    },
    /// Requests that a patroller head toward the adjacent tile.
    SteerPatroller {
        /// Epoch observed by the system that fabricated the command.
        epoch: Epoch,
        /// Identifier of the patroller being steered.
        patroller: PatrollerId,
        /// Tile the patroller should step into next.
        toward: GridCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the session entered a new phase.
    PhaseChanged {
        /// Phase that became active after processing commands.
        phase: GamePhase,
    },
    /// Confirms that an entity entered the playfield.
    EntitySpawned {
        /// Identifier assigned to the new entity.
        entity: EntityId,
        /// Kind assigned to the new entity.
        kind: EntityKind,
        /// Position the entity occupies after spawning.
        position: WorldPoint,
    },
    /// Confirms that an entity left the active set.
    EntityResolved {
        /// Identifier of the removed entity.
        entity: EntityId,
        /// Kind of the removed entity.
        kind: EntityKind,
        /// Classification of the removal.
        outcome: ResolutionOutcome,
    },
    /// Reports a score mutation.
    ScoreChanged {
        /// Score after the mutation.
        score: i64,
        /// Signed delta applied by the mutation.
        delta: i64,
    },
    /// Reports that a negative event ended a combo streak.
    ComboBroken {
        /// Length of the streak that was lost.
        streak: u32,
    },
    /// Reports that the score crossed a level-stride boundary.
    LevelReached {
        /// One-based level index reached.
        level: u32,
    },
    /// Reports that the avatar took damage.
    AvatarStruck {
        /// Lives remaining after the hit.
        lives: u32,
    },
    /// Reports a change to the maze strain gauge.
    StrainChanged {
        /// Strain value after the change.
        strain: f32,
    },
    /// Announces that a patroller has no queued step and awaits steering.
    PatrollerIdle {
        /// Identifier of the idle patroller.
        patroller: PatrollerId,
        /// Tile the patroller currently occupies.
        cell: GridCoord,
    },
}

/// Immutable representation of a single entity's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntitySnapshot {
    /// Unique identifier assigned to the entity.
    pub id: EntityId,
    /// Kind discriminant selecting behavior and visuals.
    pub kind: EntityKind,
    /// Playfield position of the entity's center.
    pub position: WorldPoint,
    /// Current velocity in world units per second.
    pub velocity: WorldVec,
    /// Collision radius in world units.
    pub radius: f32,
    /// Remaining countdown for countdown lifecycles.
    pub remaining: Option<Duration>,
    /// Remaining interactions for hit-counter lifecycles.
    pub hits_left: Option<u32>,
    /// Whether the entity has already been resolved this session.
    pub resolved: bool,
    /// Whether the entity is playing its terminal fade animation.
    pub fading: bool,
}

/// Read-only snapshot describing all active entities.
#[derive(Clone, Debug, Default)]
pub struct EntityView {
    snapshots: Vec<EntitySnapshot>,
}

impl EntityView {
    /// Creates a new entity view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EntitySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EntitySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EntitySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single patroller's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatrollerSnapshot {
    /// Unique identifier assigned to the patroller.
    pub id: PatrollerId,
    /// Tile currently containing the patroller's center.
    pub cell: GridCoord,
    /// Continuous position of the patroller's center.
    pub position: WorldPoint,
    /// Queued step, if the patroller has been steered.
    pub next_step: Option<GridCoord>,
    /// Whether a hush tonic currently disables the patroller.
    pub disabled: bool,
}

/// Read-only snapshot describing all maze patrollers.
#[derive(Clone, Debug, Default)]
pub struct PatrollerView {
    snapshots: Vec<PatrollerSnapshot>,
}

impl PatrollerView {
    /// Creates a new patroller view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PatrollerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &PatrollerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<PatrollerSnapshot> {
        self.snapshots
    }
}

/// Read-only view into a dense wall/floor grid.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    walls: &'a [bool],
    columns: u32,
    rows: u32,
}

impl<'a> GridView<'a> {
    /// Captures a new grid view backed by the provided row-major wall flags.
    #[must_use]
    pub fn new(walls: &'a [bool], columns: u32, rows: u32) -> Self {
        Self {
            walls,
            columns,
            rows,
        }
    }

    /// Reports whether the tile lies within the grid.
    #[must_use]
    pub fn in_bounds(&self, cell: GridCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Reports whether the tile is a wall; out-of-bounds tiles count as walls.
    #[must_use]
    pub fn is_wall(&self, cell: GridCoord) -> bool {
        self.index(cell)
            .map_or(true, |index| self.walls.get(index).copied().unwrap_or(true))
    }

    /// Reports whether the tile is walkable floor.
    #[must_use]
    pub fn is_floor(&self, cell: GridCoord) -> bool {
        !self.is_wall(cell)
    }

    /// Provides the dimensions of the underlying grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: GridCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Inclusive range of spawn speeds sampled per entity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedRange {
    /// Minimum speed in world units per second.
    pub min: f32,
    /// Maximum speed in world units per second.
    pub max: f32,
}

impl SpeedRange {
    /// Creates a new inclusive speed range.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// A range that always yields the provided speed.
    #[must_use]
    pub const fn fixed(speed: f32) -> Self {
        Self {
            min: speed,
            max: speed,
        }
    }
}

/// Placement rule selecting where the spawn system positions new entities.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum SpawnPlacement {
    /// Uniform random position inside the playfield minus the rule's margin.
    UniformInset,
    /// Offset from a fixed anchor with a randomized spread per axis.
    AtAnchor {
        /// Anchor position in world units.
        anchor: WorldPoint,
        /// Maximum per-axis offset from the anchor.
        spread: WorldVec,
    },
    /// Uniform random floor tile of the maze grid.
    RandomFloorTile,
}

/// One row of a game's weighted spawn table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnWeight {
    /// Kind assigned to entities drawn from this row.
    pub kind: EntityKind,
    /// Relative selection weight among table rows.
    pub weight: u32,
    /// Removal rule assigned at spawn.
    pub lifecycle: Lifecycle,
    /// Motion rule advanced each tick.
    pub motion: MotionRule,
    /// Collision radius in world units.
    pub radius: f32,
    /// Initial speed range sampled at spawn.
    pub speed: SpeedRange,
    /// Score awarded when the entity resolves positively.
    pub reward: i64,
    /// Score deducted when the entity expires unresolved.
    pub expiry_penalty: i64,
}

/// Interval spawn rule for one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnRule {
    /// Simulated time between spawn attempts at session start.
    pub interval: Duration,
    /// Lower bound the interval may decay towards.
    pub interval_floor: Duration,
    /// Multiplier applied to the interval after each spawn (1.0 = fixed).
    pub interval_decay: f32,
    /// Placement rule for new entities.
    pub placement: SpawnPlacement,
    /// Margin kept between spawns and the playfield edge.
    pub margin: f32,
    /// Weighted table of spawnable kinds.
    pub table: Vec<SpawnWeight>,
    /// Optional cap on simultaneously active spawned entities.
    pub max_active: Option<u32>,
}

/// Scoring behavior shared by every kind in a game.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreRule {
    /// Score stride between level-up announcements, if the game levels.
    pub level_stride: Option<i64>,
    /// Whether an entity escaping the playfield breaks the combo.
    pub miss_breaks_combo: bool,
}

/// Win and loss thresholds evaluated at the end of each tick.
///
/// When several conditions hold in the same tick, the win check is evaluated
/// first.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRule {
    /// Score at or above which the session is won.
    pub win_score: Option<i64>,
    /// Score at or below which the session is lost.
    pub loss_score: Option<i64>,
    /// Starting lives; the session is lost when they reach zero.
    pub lives: Option<u32>,
    /// Strain gauge limit; the session is lost when strain reaches it.
    pub strain_limit: Option<f32>,
    /// Simulated survival time after which the session is won.
    pub survive_for: Option<Duration>,
}

/// Avatar construction parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AvatarConfig {
    /// Control scheme and collision role.
    pub role: AvatarRole,
    /// Base movement speed in world units per second.
    pub speed: f32,
    /// Collision radius in world units.
    pub radius: f32,
    /// Downward acceleration applied to the jumper role.
    pub gravity: f32,
    /// Upward impulse applied when the jumper lands on a platform.
    pub bounce_impulse: f32,
    /// Minimum simulated time between arrow launches for the shooter role.
    pub fire_cooldown: Duration,
    /// Speed of launched arrows in world units per second.
    pub arrow_speed: f32,
}

/// Tunable constants for the maze game.
///
/// The original near-duplicate builds disagreed on these values, so they are
/// configuration rather than behavior.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MazeRules {
    /// Immunity window granted after the avatar is caught.
    pub invulnerability: Duration,
    /// Strain value assigned when the avatar respawns after a catch.
    pub respawn_strain: f32,
    /// Strain removed by a successful breather.
    pub breather_relief: f32,
    /// Strain added when a breather is attempted too close to a patroller.
    pub breather_penalty: f32,
    /// Input freeze imposed while breathing.
    pub breather_pause: Duration,
    /// Distance under which a breather is unsafe.
    pub safety_radius: f32,
    /// Distance under which patroller proximity accumulates strain.
    pub proximity_radius: f32,
    /// Strain accumulated per second per patroller at zero distance.
    pub proximity_rate: f32,
    /// Passive strain decay per second.
    pub strain_decay: f32,
    /// Avatar speed multiplier granted by a haste tonic.
    pub haste_factor: f32,
    /// Duration of the haste buff.
    pub haste_duration: Duration,
    /// Patroller speed multiplier imposed by a lull tonic.
    pub lull_factor: f32,
    /// Duration of the lull effect.
    pub lull_duration: Duration,
    /// Duration the hush tonic disables the nearest patroller.
    pub hush_duration: Duration,
    /// Strain removed by a solace tonic.
    pub solace_relief: f32,
}

/// Starting cell and speed of one maze patroller.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatrollerSpawn {
    /// Tile the patroller occupies at session start.
    pub cell: GridCoord,
    /// Movement speed in world units per second.
    pub speed: f32,
}

/// Maze layout and rules for games with a wall grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MazeConfig {
    /// Row-major map rows; `#` marks a wall tile, anything else is floor.
    pub map: Vec<String>,
    /// Side length of a square tile in world units.
    pub tile_length: f32,
    /// Tile the avatar occupies at session start and after a catch.
    pub avatar_start: GridCoord,
    /// Patroller roster.
    pub patrollers: Vec<PatrollerSpawn>,
    /// Score awarded per collected pellet.
    pub pellet_reward: i64,
    /// Strain removed per collected pellet.
    pub pellet_strain_rebate: f32,
    /// Tunable gameplay constants.
    pub rules: MazeRules,
}

/// Complete plain-data description of one arcade game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Playfield extent in world units.
    pub bounds: Bounds,
    /// Avatar construction parameters.
    pub avatar: AvatarConfig,
    /// Interval spawn rule, absent for games without timed spawning.
    pub spawn: Option<SpawnRule>,
    /// Scoring behavior.
    pub scoring: ScoreRule,
    /// Win and loss thresholds.
    pub outcome: OutcomeRule,
    /// Maze layout, present only for grid games.
    pub maze: Option<MazeConfig>,
}

#[cfg(test)]
mod tests {
    use super::{
        Bounds, EntityId, EntityKind, Epoch, GamePhase, GridCoord, Lifecycle, PatrollerId,
        ResolutionOutcome, TonicKind, WorldPoint, WorldVec,
    };
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = GridCoord::new(1, 1);
        let destination = GridCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn bounds_contains_respects_inset() {
        let bounds = Bounds::new(360.0, 640.0);
        assert!(bounds.contains(WorldPoint::new(180.0, 320.0), 24.0));
        assert!(!bounds.contains(WorldPoint::new(10.0, 320.0), 24.0));
        assert!(!bounds.contains(WorldPoint::new(180.0, 630.0), 24.0));
    }

    #[test]
    fn bounds_clamp_pins_positions_to_inset_box() {
        let bounds = Bounds::new(360.0, 640.0);
        let clamped = bounds.clamp(WorldPoint::new(-50.0, 700.0), 12.0);
        assert_eq!(clamped, WorldPoint::new(12.0, 628.0));
    }

    #[test]
    fn towards_degenerates_to_zero_for_coincident_points() {
        let point = WorldPoint::new(42.0, 7.0);
        assert_eq!(WorldVec::towards(point, point), WorldVec::ZERO);
    }

    #[test]
    fn epoch_next_increments() {
        let epoch = Epoch::new(7);
        assert_eq!(epoch.next().get(), 8);
    }

    #[test]
    fn terminal_phases_reject_simulation() {
        assert!(GamePhase::Won.is_terminal());
        assert!(GamePhase::Lost.is_terminal());
        assert!(!GamePhase::Paused.accepts_simulation());
        assert!(GamePhase::Running.accepts_simulation());
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn entity_id_round_trips_through_bincode() {
        assert_round_trip(&EntityId::new(42));
    }

    #[test]
    fn patroller_id_round_trips_through_bincode() {
        assert_round_trip(&PatrollerId::new(3));
    }

    #[test]
    fn entity_kind_round_trips_through_bincode() {
        assert_round_trip(&EntityKind::Blaze { strength: 3 });
        assert_round_trip(&EntityKind::Tonic(TonicKind::Hush));
    }

    #[test]
    fn lifecycle_round_trips_through_bincode() {
        assert_round_trip(&Lifecycle::Countdown(std::time::Duration::from_secs(4)));
        assert_round_trip(&Lifecycle::HitPoints(2));
    }

    #[test]
    fn resolution_outcome_round_trips_through_bincode() {
        assert_round_trip(&ResolutionOutcome::Expired);
    }

    #[test]
    fn game_phase_round_trips_through_bincode() {
        assert_round_trip(&GamePhase::Paused);
    }

    #[test]
    fn grid_view_treats_out_of_bounds_as_wall() {
        let walls = [false, true, false, false];
        let view = super::GridView::new(&walls, 2, 2);
        assert!(view.is_floor(GridCoord::new(0, 0)));
        assert!(view.is_wall(GridCoord::new(1, 0)));
        assert!(view.is_wall(GridCoord::new(2, 0)));
        assert!(view.is_wall(GridCoord::new(0, 2)));
    }
}
