#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic patrol system that plans maze steps via breadth-first
//! search.
//!
//! Patrollers roam, they do not pursue: every few seconds of simulated time
//! each agent receives a freshly rolled random floor tile as its goal, and
//! the planner answers "which adjacent tile next?" with a full breadth-first
//! search from the agent's tile. The grids involved are small enough that a
//! complete search per step is cheap.

use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use mood_arcade_core::{
    Command, Epoch, Event, GamePhase, GridCoord, GridView, PatrollerId, PatrollerView,
};
use thiserror::Error;

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;

/// Attempts made to roll a fresh goal tile before waiting for the next call.
const GOAL_ATTEMPTS: u32 = 40;

/// Shortest simulated time a goal stays assigned before re-rolling.
const RETARGET_MIN: Duration = Duration::from_secs(2);

/// Widest simulated time a goal stays assigned before re-rolling.
const RETARGET_MAX: Duration = Duration::from_secs(4);

/// Reported when no next step exists for a start/goal pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum NoRoute {
    /// The start tile is a wall or lies outside the grid.
    #[error("start tile ({}, {}) is not walkable", .start.column(), .start.row())]
    StartBlocked {
        /// Offending start tile.
        start: GridCoord,
    },
    /// The goal tile is a wall or lies outside the grid.
    #[error("goal tile ({}, {}) is not walkable", .goal.column(), .goal.row())]
    GoalBlocked {
        /// Offending goal tile.
        goal: GridCoord,
    },
    /// No floor path connects the start to the goal.
    #[error("goal tile ({}, {}) is unreachable", .goal.column(), .goal.row())]
    Unreachable {
        /// Goal that could not be reached.
        goal: GridCoord,
    },
    /// The goal equals the start, so there is no onward step.
    #[error("goal equals start; no onward step exists")]
    NoOnwardStep,
}

/// Returns the tile to step into next on a shortest path from `start` to
/// `goal`.
///
/// Neighbors are enumerated in the fixed order **+x, −x, +y, −y**; among
/// equal-length paths the result is determined solely by that order, so
/// repeated calls on an unchanged grid return the same tile.
pub fn next_step(grid: GridView<'_>, start: GridCoord, goal: GridCoord) -> Result<GridCoord, NoRoute> {
    if !grid.in_bounds(start) || grid.is_wall(start) {
        return Err(NoRoute::StartBlocked { start });
    }
    if !grid.in_bounds(goal) || grid.is_wall(goal) {
        return Err(NoRoute::GoalBlocked { goal });
    }
    if start == goal {
        return Err(NoRoute::NoOnwardStep);
    }

    let (columns, rows) = grid.dimensions();
    let cell_count = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
    if cell_count == 0 {
        return Err(NoRoute::Unreachable { goal });
    }

    let index = |cell: GridCoord| -> usize {
        cell.row() as usize * columns as usize + cell.column() as usize
    };

    let mut predecessor: Vec<Option<GridCoord>> = vec![None; cell_count];
    let mut visited = vec![false; cell_count];
    visited[index(start)] = true;

    let mut queue = VecDeque::new();
    queue.push_back(start);

    'search: while let Some(cell) = queue.pop_front() {
        if cell == goal {
            break 'search;
        }
        for neighbor in neighbors(cell, columns, rows) {
            if grid.is_wall(neighbor) {
                continue;
            }
            let slot = index(neighbor);
            if visited[slot] {
                continue;
            }
            visited[slot] = true;
            predecessor[slot] = Some(cell);
            queue.push_back(neighbor);
        }
    }

    if !visited[index(goal)] {
        return Err(NoRoute::Unreachable { goal });
    }

    // Walk the predecessor chain from the goal back to the tile whose
    // predecessor is the start; that tile is the first step.
    let mut step = goal;
    loop {
        match predecessor[index(step)] {
            Some(previous) if previous == start => return Ok(step),
            Some(previous) => step = previous,
            None => return Err(NoRoute::Unreachable { goal }),
        }
    }
}

/// Enumerates 4-connected in-bounds neighbors in the documented +x, −x,
/// +y, −y order.
fn neighbors(cell: GridCoord, columns: u32, rows: u32) -> impl Iterator<Item = GridCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(column) = cell.column().checked_add(1) {
        if column < columns {
            candidates[count] = Some(GridCoord::new(column, cell.row()));
            count += 1;
        }
    }

    if let Some(column) = cell.column().checked_sub(1) {
        candidates[count] = Some(GridCoord::new(column, cell.row()));
        count += 1;
    }

    if let Some(row) = cell.row().checked_add(1) {
        if row < rows {
            candidates[count] = Some(GridCoord::new(cell.column(), row));
            count += 1;
        }
    }

    if let Some(row) = cell.row().checked_sub(1) {
        candidates[count] = Some(GridCoord::new(cell.column(), row));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}

/// Configuration parameters required to construct the patrol system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

#[derive(Clone, Copy, Debug)]
struct PlannedGoal {
    cell: GridCoord,
    expires_at: Duration,
}

/// Pure system that steers idle patrollers toward roaming goals.
#[derive(Debug)]
pub struct Patrol {
    elapsed: Duration,
    rng_state: u64,
    goals: BTreeMap<PatrollerId, PlannedGoal>,
}

impl Patrol {
    /// Creates a new patrol system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            elapsed: Duration::ZERO,
            rng_state: config.rng_seed,
            goals: BTreeMap::new(),
        }
    }

    /// Consumes events and immutable views to emit steering commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        phase: GamePhase,
        epoch: Epoch,
        patrollers: &PatrollerView,
        grid: Option<GridView<'_>>,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => {
                    self.elapsed = self.elapsed.saturating_add(*dt);
                }
                Event::PhaseChanged {
                    phase: GamePhase::NotStarted,
                } => {
                    self.elapsed = Duration::ZERO;
                    self.goals.clear();
                }
                _ => {}
            }
        }

        if phase != GamePhase::Running {
            return;
        }
        let Some(grid) = grid else {
            return;
        };

        for patroller in patrollers.iter() {
            if patroller.disabled || patroller.next_step.is_some() {
                continue;
            }

            let goal = self.current_goal(patroller.id, patroller.cell, grid);
            let Some(goal) = goal else {
                continue;
            };

            match next_step(grid, patroller.cell, goal) {
                Ok(step) => out.push(Command::SteerPatroller {
                    epoch,
                    patroller: patroller.id,
                    toward: step,
                }),
                // Unreachable or exhausted goals are dropped; the next call
                // rolls a fresh one.
                Err(_) => {
                    let _ = self.goals.remove(&patroller.id);
                }
            }
        }
    }

    /// Returns the patroller's active goal, rolling a new one when the old
    /// goal expired, was reached, or never existed.
    fn current_goal(
        &mut self,
        id: PatrollerId,
        cell: GridCoord,
        grid: GridView<'_>,
    ) -> Option<GridCoord> {
        let stale = match self.goals.get(&id) {
            Some(goal) => goal.expires_at <= self.elapsed || goal.cell == cell,
            None => true,
        };
        if stale {
            let cell = self.roll_goal(cell, grid)?;
            let window = self.roll_retarget_window();
            let _ = self.goals.insert(
                id,
                PlannedGoal {
                    cell,
                    expires_at: self.elapsed.saturating_add(window),
                },
            );
        }
        self.goals.get(&id).map(|goal| goal.cell)
    }

    /// Rolls a uniformly random floor tile distinct from the agent's tile.
    fn roll_goal(&mut self, current: GridCoord, grid: GridView<'_>) -> Option<GridCoord> {
        let (columns, rows) = grid.dimensions();
        if columns == 0 || rows == 0 {
            return None;
        }
        for _ in 0..GOAL_ATTEMPTS {
            let column = (self.advance_rng() % u64::from(columns)) as u32;
            let row = (self.advance_rng() % u64::from(rows)) as u32;
            let cell = GridCoord::new(column, row);
            if cell != current && grid.is_floor(cell) {
                return Some(cell);
            }
        }
        None
    }

    fn roll_retarget_window(&mut self) -> Duration {
        let span = RETARGET_MAX.saturating_sub(RETARGET_MIN);
        let millis = span.as_millis().max(1) as u64;
        RETARGET_MIN.saturating_add(Duration::from_millis(self.advance_rng() % millis))
    }

    fn advance_rng(&mut self) -> u64 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        self.rng_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walls(map: &[&str]) -> Vec<bool> {
        map.iter()
            .flat_map(|row| row.chars().map(|tile| tile == '#'))
            .collect()
    }

    #[test]
    fn neighbor_order_breaks_ties_towards_positive_x() {
        let cells = walls(&["...", "...", "..."]);
        let grid = GridView::new(&cells, 3, 3);
        // Both (1, 0) -> (2, 0) -> (2, 1) and (1, 0) -> (1, 1) -> (2, 1)
        // have length two; +x enumeration wins.
        let step = next_step(grid, GridCoord::new(1, 0), GridCoord::new(2, 1))
            .expect("goal is reachable");
        assert_eq!(step, GridCoord::new(2, 0));
    }

    #[test]
    fn start_on_wall_is_rejected() {
        let cells = walls(&["#.", ".."]);
        let grid = GridView::new(&cells, 2, 2);
        assert_eq!(
            next_step(grid, GridCoord::new(0, 0), GridCoord::new(1, 1)),
            Err(NoRoute::StartBlocked {
                start: GridCoord::new(0, 0)
            })
        );
    }

    #[test]
    fn goal_equal_to_start_has_no_onward_step() {
        let cells = walls(&["..", ".."]);
        let grid = GridView::new(&cells, 2, 2);
        assert_eq!(
            next_step(grid, GridCoord::new(0, 0), GridCoord::new(0, 0)),
            Err(NoRoute::NoOnwardStep)
        );
    }

    #[test]
    fn rolled_goals_avoid_the_current_tile() {
        let cells = walls(&["##", ".#"]);
        let grid = GridView::new(&cells, 2, 2);
        let mut patrol = Patrol::new(Config::new(9));
        // The only floor tile is the agent's own, so no goal can be rolled.
        assert_eq!(patrol.roll_goal(GridCoord::new(0, 1), grid), None);
    }
}
