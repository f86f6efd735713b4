//! Scene population from world queries.
//!
//! Runs once per frame after the simulation step; everything here is a pure
//! read of the world followed by writes into the mutable [`Scene`].

use glam::Vec2;
use mood_arcade_core::{AvatarRole, EntityKind, GameConfig, GridCoord, WorldPoint};
use mood_arcade_rendering::{
    AvatarPresentation, Color, HudPresentation, MazePresentation, Overlay, Scene, SceneEntity,
    ScenePatroller, WallTile,
};
use mood_arcade_world::{query, World};

/// Background shared by every game in the collection.
pub(crate) const BACKGROUND: Color = Color::from_rgb_u8(0x1e, 0x29, 0x3b);

fn to_vec2(point: WorldPoint) -> Vec2 {
    Vec2::new(point.x(), point.y())
}

/// Rebuilds the scene's dynamic content from the world.
pub(crate) fn populate(world: &World, flash: Option<Color>, scene: &mut Scene) {
    let config = query::config(world);

    scene.entities.clear();
    for snapshot in query::entity_view(world).iter() {
        scene.entities.push(SceneEntity {
            kind: snapshot.kind,
            position: to_vec2(snapshot.position),
            radius: snapshot.radius,
            fading: snapshot.fading,
            urgency: snapshot
                .remaining
                .and_then(|remaining| initial_countdown(config, snapshot.kind).map(|initial| {
                    (remaining.as_secs_f32() / initial.as_secs_f32().max(f32::EPSILON))
                        .clamp(0.0, 1.0)
                })),
        });
    }

    let avatar = query::avatar(world);
    scene.avatar = (avatar.role != AvatarRole::Pointer).then_some(AvatarPresentation {
        role: avatar.role,
        position: to_vec2(avatar.position),
        radius: avatar.radius,
        flashing: avatar.invulnerable,
        breathing: avatar.breathing,
    });

    scene.maze = query::grid_view(world).map(|grid| {
        let (columns, rows) = grid.dimensions();
        let mut walls = Vec::new();
        for row in 0..rows {
            for column in 0..columns {
                if grid.is_wall(GridCoord::new(column, row)) {
                    walls.push(WallTile { column, row });
                }
            }
        }
        MazePresentation {
            columns,
            rows,
            tile_length: query::tile_length(world).unwrap_or(24.0),
            walls,
            patrollers: query::patroller_view(world)
                .iter()
                .map(|patroller| ScenePatroller {
                    position: to_vec2(patroller.position),
                    dimmed: patroller.disabled,
                })
                .collect(),
        }
    });

    let hud = query::hud(world);
    scene.hud = HudPresentation {
        score: hud.score,
        combo: hud.combo,
        level: hud.level,
        lives: hud.lives,
        strain: hud.strain,
        time_left_seconds: hud.time_left.map(|left| left.as_secs_f32()),
        notice: query::notice(world).map(|notice| notice.text()),
    };

    scene.overlay = Overlay::for_phase(query::phase(world));
    scene.flash = flash;
}

/// Countdown assigned at spawn for the kind, used to scale urgency rings.
fn initial_countdown(config: &GameConfig, kind: EntityKind) -> Option<std::time::Duration> {
    let rule = config.spawn.as_ref()?;
    rule.table
        .iter()
        .find(|row| row.kind == kind)
        .and_then(|row| match row.lifecycle {
            mood_arcade_core::Lifecycle::Countdown(initial) => Some(initial),
            _ => None,
        })
}
