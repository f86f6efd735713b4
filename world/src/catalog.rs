//! Configuration catalog instantiating each arcade game as a data value.
//!
//! The six games in the collection share one simulation; everything that
//! distinguishes them lives in the [`GameConfig`] values built here. Tuning
//! constants follow the original builds where those agreed and pick sensible
//! middles where near-duplicate builds disagreed.

use std::time::Duration;

use mood_arcade_core::{
    AvatarConfig, AvatarRole, Bounds, EntityKind, GameConfig, GridCoord, Lifecycle, MazeConfig,
    MazeRules, MotionRule, OutcomeRule, PatrollerSpawn, ScoreRule, SpawnPlacement, SpawnRule,
    SpawnWeight, SpeedRange, TonicKind, WorldPoint, WorldVec,
};

/// Portrait playfield shared by the non-maze games.
const PORTRAIT: Bounds = Bounds::new(360.0, 640.0);

/// Maze tile side length in world units.
const MAZE_TILE: f32 = 24.0;

/// The games shipped in the collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameTitle {
    /// Whack-a-fire clicker: press blazes before they flare out.
    Embers,
    /// Catch falling tears with a bucket.
    Teardrops,
    /// Shoot hearts before their glow fades.
    Heartshot,
    /// Collect pellets in a patrolled maze without being caught.
    Corridors,
    /// Bounce ever upward across drifting platforms.
    Rooftops,
    /// Dodge falling boulders until dawn.
    Moonfall,
}

impl GameTitle {
    /// Every title in catalog order.
    pub const ALL: [Self; 6] = [
        Self::Embers,
        Self::Teardrops,
        Self::Heartshot,
        Self::Corridors,
        Self::Rooftops,
        Self::Moonfall,
    ];

    /// Player-facing name of the game.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Embers => "Embers",
            Self::Teardrops => "Teardrops",
            Self::Heartshot => "Heartshot",
            Self::Corridors => "Corridors",
            Self::Rooftops => "Rooftops",
            Self::Moonfall => "Moonfall",
        }
    }

    /// Builds the full configuration for the game.
    #[must_use]
    pub fn config(&self) -> GameConfig {
        match self {
            Self::Embers => embers(),
            Self::Teardrops => teardrops(),
            Self::Heartshot => heartshot(),
            Self::Corridors => corridors(),
            Self::Rooftops => rooftops(),
            Self::Moonfall => moonfall(),
        }
    }
}

fn embers() -> GameConfig {
    let blaze = |strength: u8, radius: f32, reward: i64| SpawnWeight {
        kind: EntityKind::Blaze { strength },
        weight: if strength == 3 { 34 } else { 33 },
        lifecycle: Lifecycle::Countdown(Duration::from_millis(3800)),
        motion: MotionRule::Station,
        radius,
        speed: SpeedRange::fixed(0.0),
        reward,
        expiry_penalty: reward / 2,
    };

    GameConfig {
        bounds: PORTRAIT,
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
            interval: Duration::from_millis(900),
            interval_floor: Duration::from_millis(350),
            interval_decay: 0.985,
            placement: SpawnPlacement::UniformInset,
            margin: 32.0,
            table: vec![blaze(1, 18.0, 10), blaze(2, 22.0, 20), blaze(3, 26.0, 30)],
            max_active: None,
        }),
        scoring: ScoreRule {
            level_stride: Some(100),
            miss_breaks_combo: false,
        },
        outcome: OutcomeRule {
            win_score: Some(1000),
            loss_score: Some(-200),
            lives: None,
            strain_limit: None,
            survive_for: None,
        },
        maze: None,
    }
}

fn teardrops() -> GameConfig {
    GameConfig {
        bounds: PORTRAIT,
        avatar: AvatarConfig {
            role: AvatarRole::Collector,
            speed: 390.0,
            radius: 27.0,
            gravity: 0.0,
            bounce_impulse: 0.0,
            fire_cooldown: Duration::ZERO,
            arrow_speed: 0.0,
        },
        spawn: Some(SpawnRule {
            interval: Duration::from_millis(900),
            interval_floor: Duration::from_millis(900),
            interval_decay: 1.0,
            placement: SpawnPlacement::AtAnchor {
                anchor: WorldPoint::new(180.0, 90.0),
                spread: WorldVec::new(65.0, 12.0),
            },
            margin: 16.0,
            table: vec![SpawnWeight {
                kind: EntityKind::Tear,
                weight: 1,
                lifecycle: Lifecycle::Persistent,
                motion: MotionRule::Jittering {
                    interval: Duration::from_millis(250),
                    sway: 40.0,
                },
                radius: 14.0,
                speed: SpeedRange::new(130.0, 220.0),
                reward: 10,
                expiry_penalty: 0,
            }],
            max_active: None,
        }),
        scoring: ScoreRule {
            level_stride: Some(100),
            miss_breaks_combo: true,
        },
        outcome: OutcomeRule {
            win_score: Some(500),
            loss_score: None,
            lives: None,
            strain_limit: None,
            survive_for: None,
        },
        maze: None,
    }
}

fn heartshot() -> GameConfig {
    GameConfig {
        bounds: PORTRAIT,
        avatar: AvatarConfig {
            role: AvatarRole::Shooter,
            speed: 200.0,
            radius: 16.0,
            gravity: 0.0,
            bounce_impulse: 0.0,
            fire_cooldown: Duration::from_millis(400),
            arrow_speed: 420.0,
        },
        spawn: Some(SpawnRule {
            interval: Duration::from_millis(1100),
            interval_floor: Duration::from_millis(500),
            interval_decay: 0.98,
            placement: SpawnPlacement::UniformInset,
            margin: 40.0,
            table: vec![SpawnWeight {
                kind: EntityKind::Heart,
                weight: 1,
                lifecycle: Lifecycle::Countdown(Duration::from_millis(3000)),
                motion: MotionRule::Station,
                radius: 16.0,
                speed: SpeedRange::fixed(0.0),
                reward: 15,
                expiry_penalty: 5,
            }],
            max_active: None,
        }),
        scoring: ScoreRule {
            level_stride: Some(100),
            miss_breaks_combo: false,
        },
        outcome: OutcomeRule {
            win_score: Some(300),
            loss_score: Some(-100),
            lives: None,
            strain_limit: None,
            survive_for: None,
        },
        maze: None,
    }
}

/// Handcrafted corridor layout: `#` marks a wall tile.
const CORRIDOR_MAP: [&str; 21] = [
    "###############",
    "#.............#",
    "#.###.###.###.#",
    "#.#.#.#.#.#.#.#",
    "#.#.#.#.#.#.#.#",
    "#...#.....#...#",
    "###.#.###.#.###",
    "#.....#.#.....#",
    "#.#####.#####.#",
    "#.............#",
    "#.###.#.#.###.#",
    "#.#...#.#...#.#",
    "#.#.#####.#.#.#",
    "#.#.......#.#.#",
    "#.#########.#.#",
    "#.............#",
    "###.####.######",
    "#.............#",
    "#.###########.#",
    "#.............#",
    "###############",
];

fn corridors() -> GameConfig {
    let tonic = |kind: TonicKind| SpawnWeight {
        kind: EntityKind::Tonic(kind),
        weight: 25,
        lifecycle: Lifecycle::Persistent,
        motion: MotionRule::Station,
        radius: 8.0,
        speed: SpeedRange::fixed(0.0),
        reward: 0,
        expiry_penalty: 0,
    };

    GameConfig {
        bounds: Bounds::new(15.0 * MAZE_TILE, 21.0 * MAZE_TILE),
        avatar: AvatarConfig {
            role: AvatarRole::Walker,
            speed: 120.0,
            radius: 12.0,
            gravity: 0.0,
            bounce_impulse: 0.0,
            fire_cooldown: Duration::ZERO,
            arrow_speed: 0.0,
        },
        spawn: Some(SpawnRule {
            interval: Duration::from_millis(4000),
            interval_floor: Duration::from_millis(4000),
            interval_decay: 1.0,
            placement: SpawnPlacement::RandomFloorTile,
            margin: 0.0,
            table: vec![
                tonic(TonicKind::Haste),
                tonic(TonicKind::Lull),
                tonic(TonicKind::Solace),
                tonic(TonicKind::Hush),
            ],
            max_active: Some(3),
        }),
        scoring: ScoreRule {
            level_stride: None,
            miss_breaks_combo: false,
        },
        outcome: OutcomeRule {
            win_score: None,
            loss_score: None,
            lives: Some(3),
            strain_limit: Some(100.0),
            survive_for: None,
        },
        maze: Some(MazeConfig {
            map: CORRIDOR_MAP.iter().map(|row| (*row).to_owned()).collect(),
            tile_length: MAZE_TILE,
            avatar_start: GridCoord::new(1, 1),
            patrollers: vec![
                PatrollerSpawn {
                    cell: GridCoord::new(11, 3),
                    speed: 33.0,
                },
                PatrollerSpawn {
                    cell: GridCoord::new(12, 15),
                    speed: 38.0,
                },
                PatrollerSpawn {
                    cell: GridCoord::new(7, 9),
                    speed: 42.0,
                },
            ],
            pellet_reward: 10,
            pellet_strain_rebate: 1.0,
            rules: MazeRules {
                invulnerability: Duration::from_millis(1500),
                respawn_strain: 50.0,
                breather_relief: 20.0,
                breather_penalty: 10.0,
                breather_pause: Duration::from_millis(3000),
                safety_radius: 80.0,
                proximity_radius: 220.0,
                proximity_rate: 30.0,
                strain_decay: 1.2,
                haste_factor: 1.8,
                haste_duration: Duration::from_millis(5000),
                lull_factor: 0.6,
                lull_duration: Duration::from_millis(5000),
                hush_duration: Duration::from_millis(6000),
                solace_relief: 25.0,
            },
        }),
    }
}

fn rooftops() -> GameConfig {
    GameConfig {
        bounds: PORTRAIT,
        avatar: AvatarConfig {
            role: AvatarRole::Jumper,
            speed: 220.0,
            radius: 12.0,
            gravity: 600.0,
            bounce_impulse: 420.0,
            fire_cooldown: Duration::ZERO,
            arrow_speed: 0.0,
        },
        spawn: Some(SpawnRule {
            interval: Duration::from_millis(700),
            interval_floor: Duration::from_millis(700),
            interval_decay: 1.0,
            placement: SpawnPlacement::AtAnchor {
                anchor: WorldPoint::new(180.0, -10.0),
                spread: WorldVec::new(170.0, 0.0),
            },
            margin: 0.0,
            table: vec![SpawnWeight {
                kind: EntityKind::Platform,
                weight: 1,
                lifecycle: Lifecycle::Persistent,
                motion: MotionRule::Linear,
                radius: 28.0,
                speed: SpeedRange::fixed(55.0),
                reward: 10,
                expiry_penalty: 0,
            }],
            max_active: None,
        }),
        scoring: ScoreRule {
            level_stride: Some(100),
            miss_breaks_combo: false,
        },
        outcome: OutcomeRule {
            win_score: Some(500),
            loss_score: None,
            lives: None,
            strain_limit: None,
            survive_for: None,
        },
        maze: None,
    }
}

fn moonfall() -> GameConfig {
    GameConfig {
        bounds: PORTRAIT,
        avatar: AvatarConfig {
            role: AvatarRole::Collector,
            speed: 300.0,
            radius: 16.0,
            gravity: 0.0,
            bounce_impulse: 0.0,
            fire_cooldown: Duration::ZERO,
            arrow_speed: 0.0,
        },
        spawn: Some(SpawnRule {
            interval: Duration::from_millis(800),
            interval_floor: Duration::from_millis(300),
            interval_decay: 0.97,
            placement: SpawnPlacement::AtAnchor {
                anchor: WorldPoint::new(180.0, -20.0),
                spread: WorldVec::new(160.0, 0.0),
            },
            margin: 16.0,
            table: vec![
                SpawnWeight {
                    kind: EntityKind::Boulder,
                    weight: 70,
                    lifecycle: Lifecycle::Persistent,
                    motion: MotionRule::Falling { gravity: 140.0 },
                    radius: 16.0,
                    speed: SpeedRange::new(90.0, 170.0),
                    reward: 0,
                    expiry_penalty: 0,
                },
                SpawnWeight {
                    kind: EntityKind::Tear,
                    weight: 30,
                    lifecycle: Lifecycle::Persistent,
                    motion: MotionRule::Falling { gravity: 100.0 },
                    radius: 12.0,
                    speed: SpeedRange::new(80.0, 140.0),
                    reward: 10,
                    expiry_penalty: 0,
                },
            ],
            max_active: None,
        }),
        scoring: ScoreRule {
            level_stride: Some(100),
            miss_breaks_combo: false,
        },
        outcome: OutcomeRule {
            win_score: None,
            loss_score: None,
            lives: Some(3),
            strain_limit: None,
            survive_for: Some(Duration::from_secs(60)),
        },
        maze: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_title_builds_a_config() {
        for title in GameTitle::ALL {
            let config = title.config();
            assert!(config.bounds.width() > 0.0, "{} has no width", title.name());
            assert!(
                config.bounds.height() > 0.0,
                "{} has no height",
                title.name()
            );
        }
    }

    #[test]
    fn spawn_tables_carry_positive_weights() {
        for title in GameTitle::ALL {
            let config = title.config();
            let Some(spawn) = config.spawn else {
                continue;
            };
            assert!(!spawn.table.is_empty(), "{} spawns nothing", title.name());
            assert!(
                spawn.table.iter().all(|row| row.weight > 0),
                "{} has a zero-weight row",
                title.name()
            );
        }
    }

    #[test]
    fn corridor_map_is_rectangular_and_walled() {
        let width = CORRIDOR_MAP[0].len();
        for row in CORRIDOR_MAP {
            assert_eq!(row.len(), width);
        }
        assert!(CORRIDOR_MAP[0].chars().all(|tile| tile == '#'));
        assert!(CORRIDOR_MAP[20].chars().all(|tile| tile == '#'));
    }

    #[test]
    fn corridors_reserves_floor_for_avatar_and_patrollers() {
        let config = GameTitle::Corridors.config();
        let maze = config.maze.expect("corridors has a maze");
        let tile = |cell: GridCoord| {
            maze.map[cell.row() as usize]
                .chars()
                .nth(cell.column() as usize)
                .expect("cell inside map")
        };
        assert_ne!(tile(maze.avatar_start), '#');
        for patroller in &maze.patrollers {
            assert_ne!(tile(patroller.cell), '#');
        }
    }

    #[test]
    fn outcome_thresholds_are_internally_consistent() {
        for title in GameTitle::ALL {
            let outcome = title.config().outcome;
            if let (Some(win), Some(loss)) = (outcome.win_score, outcome.loss_score) {
                assert!(win > loss, "{} win at or below loss", title.name());
            }
        }
    }
}
