//! Frame driver connecting the rendering backend to the simulation.
//!
//! The backend owns the frame clock; each frame it hands the driver a delta
//! and an input snapshot. The driver turns the input into commands, applies
//! them, lets the pure systems react to the tick's events with command
//! batches of their own, and finally repopulates the scene.

use std::time::Duration;

use glam::Vec2;
use mood_arcade_core::{AvatarRole, Command, Event, GamePhase, InputAxis, WorldPoint};
use mood_arcade_rendering::{Color, FrameInput, Scene};
use mood_arcade_system_patrol::Patrol;
use mood_arcade_system_spawning::Spawning;
use mood_arcade_world::{self as world, query, World};

use crate::presenter;

/// How long penalty flashes stay on screen.
const FLASH_DURATION: Duration = Duration::from_millis(150);

const FLASH_COLOR: Color = Color::new(0.94, 0.27, 0.27, 0.22);

pub(crate) struct Driver {
    world: World,
    spawning: Option<Spawning>,
    patrol: Option<Patrol>,
    events: Vec<Event>,
    commands: Vec<Command>,
    flash_left: Duration,
}

impl Driver {
    pub(crate) fn new(world: World, spawning: Option<Spawning>, patrol: Option<Patrol>) -> Self {
        Self {
            world,
            spawning,
            patrol,
            events: Vec::new(),
            commands: Vec::new(),
            flash_left: Duration::ZERO,
        }
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Advances the simulation by one frame and repopulates the scene.
    pub(crate) fn frame(&mut self, dt: Duration, input: FrameInput, scene: &mut Scene) {
        self.events.clear();
        self.gather_input_commands(&input);
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
        world::apply(&mut self.world, Command::Tick { dt }, &mut self.events);
        self.run_systems();

        self.flash_left = self.flash_left.saturating_sub(dt);
        if self.events.iter().any(|event| {
            matches!(
                event,
                Event::AvatarStruck { .. } | Event::ComboBroken { .. }
            )
        }) {
            self.flash_left = FLASH_DURATION;
        }
        let flash = (!self.flash_left.is_zero()).then_some(FLASH_COLOR);

        presenter::populate(&self.world, flash, scene);
    }

    fn gather_input_commands(&mut self, input: &FrameInput) {
        let phase = query::phase(&self.world);
        if input.start && phase == GamePhase::NotStarted {
            self.commands.push(Command::Start);
        }
        if input.pause_toggle {
            self.commands.push(Command::TogglePause);
        }
        if input.restart {
            self.commands.push(Command::Restart);
        }
        if input.breathe {
            self.commands.push(Command::Breathe);
        }

        self.commands.push(Command::SetAxis {
            axis: InputAxis::new(input.axis_x, input.axis_y, input.dash),
        });

        if input.press {
            if let Some(pointer) = input.pointer {
                let target = to_world_point(pointer);
                match query::config(&self.world).avatar.role {
                    AvatarRole::Shooter => {
                        self.commands.push(Command::LaunchArrow { toward: target });
                    }
                    _ => {
                        self.commands.push(Command::PointerPress { position: target });
                    }
                }
            }
        }
    }

    /// Pure systems observe this frame's events and respond with commands.
    fn run_systems(&mut self) {
        let phase = query::phase(&self.world);
        let epoch = query::epoch(&self.world);

        if let Some(spawning) = self.spawning.as_mut() {
            let entities = query::entity_view(&self.world);
            let maze = query::grid_view(&self.world)
                .and_then(|grid| query::tile_length(&self.world).map(|tile| (grid, tile)));
            spawning.handle(&self.events, phase, epoch, &entities, maze, &mut self.commands);
        }
        if let Some(patrol) = self.patrol.as_mut() {
            let patrollers = query::patroller_view(&self.world);
            let grid = query::grid_view(&self.world);
            patrol.handle(&self.events, phase, epoch, &patrollers, grid, &mut self.commands);
        }

        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }
}

fn to_world_point(position: Vec2) -> WorldPoint {
    WorldPoint::new(position.x, position.y)
}
