#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Mood Arcade.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature. Consumers that need sound playback can opt back
//! in by enabling `macroquad/audio` in their own `Cargo.toml` dependency
//! specification.
//!
//! Every game element has a primitive-shape rendering; the sprite atlas is
//! decoration layered on top. A missing or unloadable sprite silently falls
//! back to the primitive, so the adapter never fails a frame over assets.

mod sprites;

use anyhow::Result;
use glam::Vec2;
use macroquad::{
    input::{
        is_key_down, is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton,
    },
    shapes::{draw_circle, draw_circle_lines, draw_line, draw_rectangle, draw_rectangle_lines},
    text::{draw_text, measure_text},
};
use mood_arcade_core::{AvatarRole, EntityKind, TonicKind};
use mood_arcade_rendering::{
    AvatarPresentation, Color, FrameInput, Presentation, RenderingBackend, Scene, SceneEntity,
    ScenePatroller, SpriteKey,
};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use self::sprites::{DrawParams, SpriteAtlas};

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the render loop.
    quit_requested: bool,
    /// `Space` or `Enter` to start the session.
    start: bool,
    /// `P` toggles pause.
    pause_toggle: bool,
    /// `R` restarts the session.
    restart: bool,
    /// `B` attempts a maze breather.
    breathe: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            start: is_key_pressed(KeyCode::Space) || is_key_pressed(KeyCode::Enter),
            pause_toggle: is_key_pressed(KeyCode::P),
            restart: is_key_pressed(KeyCode::R),
            breathe: is_key_pressed(KeyCode::B),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    load_sprites: bool,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            load_sprites: true,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the
    /// display refresh rate or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures whether the backend should attempt to load sprite assets.
    #[must_use]
    pub fn with_sprite_loading(mut self, enabled: bool) -> Self {
        self.load_sprites = enabled;
        self
    }
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    render_accum: Duration,
}

impl FpsCounter {
    /// Records a rendered frame; once a second of wall time has passed the
    /// per-second and trailing ten-second averages are returned.
    fn record_frame(&mut self, frame: Duration, render: Duration) -> Option<(f32, f32, Duration)> {
        self.elapsed += frame;
        self.frames += 1;
        self.render_accum += render;
        self.frame_times.push_back(frame);
        self.window_duration += frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let per_second = self.frames as f32 / seconds.max(f32::EPSILON);
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let avg_render = if self.frames == 0 {
            Duration::ZERO
        } else {
            self.render_accum / self.frames
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.render_accum = Duration::ZERO;
        Some((per_second, trailing, avg_render))
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            load_sprites,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 540,
            window_height: 960,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let sprite_atlas = if load_sprites {
                SpriteAtlas::from_default_manifest().ok()
            } else {
                None
            };
            if let Some(atlas) = sprite_atlas.as_ref() {
                debug_assert!(atlas.contains(SpriteKey::AvatarBody));
                let _ = atlas.texture_count();
            }

            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = gather_frame_input(&metrics, keyboard);

                update_scene(frame_dt, frame_input, &mut scene);

                let render_start = Instant::now();
                draw_playfield(&scene, &metrics);
                draw_maze(&scene, &metrics, sprite_atlas.as_ref());
                draw_entities(&scene.entities, &metrics, sprite_atlas.as_ref());
                if let Some(avatar) = scene.avatar {
                    draw_avatar(&avatar, &metrics, sprite_atlas.as_ref());
                }
                draw_flash(&scene, &metrics);
                draw_hud(&scene, &metrics);
                draw_overlay(&scene, &metrics);
                let render_duration = render_start.elapsed();

                if show_fps {
                    if let Some((per_second, trailing, avg_render)) =
                        fps_counter.record_frame(frame_dt, render_duration)
                    {
                        println!(
                            "FPS: {:.2} (10s avg: {:.2}) | render: {:>6.2}ms",
                            per_second,
                            trailing,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Letterboxing transform between playfield units and screen pixels.
#[derive(Clone, Copy, Debug)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    playfield_width: f32,
    playfield_height: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let width = scene.playfield.width.max(f32::EPSILON);
        let height = scene.playfield.height.max(f32::EPSILON);
        let scale = (screen_width / width).min(screen_height / height).max(0.01);
        Self {
            scale,
            offset_x: (screen_width - width * scale) / 2.0,
            offset_y: (screen_height - height * scale) / 2.0,
            playfield_width: width,
            playfield_height: height,
        }
    }

    fn to_screen(&self, position: Vec2) -> (f32, f32) {
        (
            self.offset_x + position.x * self.scale,
            self.offset_y + position.y * self.scale,
        )
    }

    fn to_playfield(&self, screen_x: f32, screen_y: f32) -> Option<Vec2> {
        if self.scale <= f32::EPSILON {
            return None;
        }
        let x = (screen_x - self.offset_x) / self.scale;
        let y = (screen_y - self.offset_y) / self.scale;
        (x >= 0.0 && y >= 0.0 && x <= self.playfield_width && y <= self.playfield_height)
            .then_some(Vec2::new(x, y))
    }
}

fn gather_frame_input(metrics: &SceneMetrics, keyboard: KeyboardShortcuts) -> FrameInput {
    let mut axis_x = 0.0;
    let mut axis_y = 0.0;
    if is_key_down(KeyCode::Left) || is_key_down(KeyCode::A) {
        axis_x -= 1.0;
    }
    if is_key_down(KeyCode::Right) || is_key_down(KeyCode::D) {
        axis_x += 1.0;
    }
    if is_key_down(KeyCode::Up) || is_key_down(KeyCode::W) {
        axis_y -= 1.0;
    }
    if is_key_down(KeyCode::Down) || is_key_down(KeyCode::S) {
        axis_y += 1.0;
    }
    let dash = is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift);

    let (mouse_x, mouse_y) = mouse_position();
    let pointer = metrics.to_playfield(mouse_x, mouse_y);
    let press = is_mouse_button_pressed(MouseButton::Left);

    FrameInput {
        axis_x,
        axis_y,
        dash,
        pointer,
        press,
        start: keyboard.start,
        pause_toggle: keyboard.pause_toggle,
        restart: keyboard.restart,
        breathe: keyboard.breathe,
    }
}

pub(crate) fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

fn draw_playfield(scene: &Scene, metrics: &SceneMetrics) {
    let (x, y) = metrics.to_screen(Vec2::ZERO);
    draw_rectangle(
        x,
        y,
        metrics.playfield_width * metrics.scale,
        metrics.playfield_height * metrics.scale,
        to_macroquad_color(scene.playfield.background),
    );
}

fn draw_maze(scene: &Scene, metrics: &SceneMetrics, atlas: Option<&SpriteAtlas>) {
    let Some(maze) = scene.maze.as_ref() else {
        return;
    };
    let wall_color = to_macroquad_color(Color::from_rgb_u8(0x0f, 0x17, 0x2a));
    let tile = maze.tile_length * metrics.scale;
    for wall in &maze.walls {
        let (x, y) = metrics.to_screen(Vec2::new(
            wall.column as f32 * maze.tile_length,
            wall.row as f32 * maze.tile_length,
        ));
        draw_rectangle(x, y, tile, tile, wall_color);
    }
    for patroller in &maze.patrollers {
        draw_patroller(patroller, metrics, atlas);
    }
}

fn draw_patroller(patroller: &ScenePatroller, metrics: &SceneMetrics, atlas: Option<&SpriteAtlas>) {
    let (x, y) = metrics.to_screen(patroller.position);
    let size = 14.0 * metrics.scale;
    let alpha = if patroller.dimmed { 0.25 } else { 0.95 };
    let tint = Color::new(1.0, 1.0, 1.0, alpha);

    draw_sprite_or(atlas, SpriteKey::PatrollerBody, sprite_params(x, y, size, tint), || {
        let body = to_macroquad_color(Color::from_rgb_u8(0xb4, 0xc8, 0xff).with_alpha(alpha));
        draw_circle(x, y - size * 0.3, size, body);
        draw_rectangle(x - size, y - size * 0.3, size * 2.0, size * 1.3, body);
        let eye = to_macroquad_color(Color::from_rgb_u8(0x06, 0x20, 0x2a).with_alpha(alpha));
        draw_circle(x - size * 0.4, y - size * 0.4, size * 0.2, eye);
        draw_circle(x + size * 0.4, y - size * 0.4, size * 0.2, eye);
    });
}

fn draw_entities(entities: &[SceneEntity], metrics: &SceneMetrics, atlas: Option<&SpriteAtlas>) {
    for entity in entities {
        draw_entity(entity, metrics, atlas);
    }
}

fn draw_entity(entity: &SceneEntity, metrics: &SceneMetrics, atlas: Option<&SpriteAtlas>) {
    let (x, y) = metrics.to_screen(entity.position);
    let radius = entity.radius * metrics.scale;
    let alpha = if entity.fading { 0.35 } else { 1.0 };

    match entity.kind {
        EntityKind::Blaze { strength } => {
            let tint = Color::new(1.0, 1.0, 1.0, alpha);
            draw_sprite_or(atlas, SpriteKey::BlazeFlame, sprite_params(x, y, radius, tint), || {
                let outer =
                    to_macroquad_color(Color::from_rgb_u8(0xef, 0x44, 0x44).with_alpha(alpha));
                let core =
                    to_macroquad_color(Color::from_rgb_u8(0xfb, 0xbf, 0x24).with_alpha(alpha));
                draw_circle(x, y, radius, outer);
                draw_circle(x, y - radius * 0.15, radius * 0.55, core);
                // Remaining presses shown as stacked embers.
                for hit in 0..strength {
                    draw_circle(
                        x - radius * 0.5 + hit as f32 * radius * 0.5,
                        y + radius * 0.7,
                        radius * 0.12,
                        core,
                    );
                }
            });
            draw_urgency_ring(entity, x, y, radius);
        }
        EntityKind::Tear => {
            let tint = Color::new(1.0, 1.0, 1.0, alpha);
            draw_sprite_or(atlas, SpriteKey::TearDrop, sprite_params(x, y, radius, tint), || {
                let body =
                    to_macroquad_color(Color::from_rgb_u8(0x4f, 0xc3, 0xf7).with_alpha(alpha));
                let shine =
                    to_macroquad_color(Color::from_rgb_u8(0xb3, 0xe5, 0xfc).with_alpha(alpha));
                draw_circle(x, y, radius, body);
                draw_circle(x - radius * 0.3, y - radius * 0.3, radius * 0.3, shine);
            });
        }
        EntityKind::Boulder => {
            let body = to_macroquad_color(Color::from_rgb_u8(0x64, 0x74, 0x8b).with_alpha(alpha));
            let rim = to_macroquad_color(Color::from_rgb_u8(0x33, 0x41, 0x55).with_alpha(alpha));
            draw_circle(x, y, radius, body);
            draw_circle_lines(x, y, radius, 2.0, rim);
        }
        EntityKind::Heart => {
            let body = to_macroquad_color(Color::from_rgb_u8(0xec, 0x48, 0x99).with_alpha(alpha));
            draw_circle(x - radius * 0.35, y - radius * 0.25, radius * 0.5, body);
            draw_circle(x + radius * 0.35, y - radius * 0.25, radius * 0.5, body);
            draw_circle(x, y + radius * 0.25, radius * 0.6, body);
            draw_urgency_ring(entity, x, y, radius);
        }
        EntityKind::Arrow => {
            let shaft = to_macroquad_color(Color::from_rgb_u8(0xf8, 0xfa, 0xfc).with_alpha(alpha));
            draw_line(x, y + radius * 2.0, x, y - radius * 2.0, 2.0, shaft);
            draw_circle(x, y - radius * 2.0, radius * 0.6, shaft);
        }
        EntityKind::Platform => {
            let body = to_macroquad_color(Color::from_rgb_u8(0x22, 0xc5, 0x5e).with_alpha(alpha));
            draw_rectangle(
                x - radius,
                y - 4.0 * metrics.scale,
                radius * 2.0,
                8.0 * metrics.scale,
                body,
            );
        }
        EntityKind::Pellet => {
            let body = to_macroquad_color(Color::from_rgb_u8(0xfd, 0xe6, 0x8a).with_alpha(alpha));
            draw_circle(x, y, radius.max(2.0), body);
        }
        EntityKind::Tonic(kind) => {
            let body = to_macroquad_color(tonic_color(kind).with_alpha(alpha));
            draw_circle(x, y, radius, body);
        }
    }
}

fn draw_urgency_ring(entity: &SceneEntity, x: f32, y: f32, radius: f32) {
    if let Some(urgency) = entity.urgency {
        let ring = to_macroquad_color(Color::new(1.0, 1.0, 1.0, urgency.clamp(0.0, 1.0)));
        draw_circle_lines(x, y, radius + 3.0, 2.0, ring);
    }
}

fn tonic_color(kind: TonicKind) -> Color {
    match kind {
        TonicKind::Haste => Color::from_rgb_u8(0xf5, 0x9e, 0x0b),
        TonicKind::Lull => Color::from_rgb_u8(0x10, 0xb9, 0x81),
        TonicKind::Solace => Color::from_rgb_u8(0x60, 0xa5, 0xfa),
        TonicKind::Hush => Color::from_rgb_u8(0xa7, 0x8b, 0xfa),
    }
}

fn draw_avatar(avatar: &AvatarPresentation, metrics: &SceneMetrics, atlas: Option<&SpriteAtlas>) {
    let (x, y) = metrics.to_screen(avatar.position);
    let radius = avatar.radius * metrics.scale;
    let alpha = if avatar.flashing { 0.5 } else { 1.0 };

    match avatar.role {
        AvatarRole::Pointer => {}
        AvatarRole::Collector => {
            let body = to_macroquad_color(Color::from_rgb_u8(0x90, 0xca, 0xf9).with_alpha(alpha));
            let rim = to_macroquad_color(Color::from_rgb_u8(0x19, 0x76, 0xd2).with_alpha(alpha));
            draw_rectangle(x - radius, y - radius * 0.6, radius * 2.0, radius * 1.2, body);
            draw_rectangle_lines(
                x - radius,
                y - radius * 0.6,
                radius * 2.0,
                radius * 1.2,
                3.0,
                rim,
            );
        }
        AvatarRole::Shooter => {
            let body = to_macroquad_color(Color::from_rgb_u8(0xfb, 0x71, 0x85).with_alpha(alpha));
            draw_line(x, y - radius, x - radius, y + radius, 3.0, body);
            draw_line(x, y - radius, x + radius, y + radius, 3.0, body);
            draw_line(x - radius, y + radius, x + radius, y + radius, 3.0, body);
        }
        AvatarRole::Walker | AvatarRole::Jumper => {
            let tint = Color::new(1.0, 1.0, 1.0, alpha);
            draw_sprite_or(atlas, SpriteKey::AvatarBody, sprite_params(x, y, radius, tint), || {
                let body =
                    to_macroquad_color(Color::from_rgb_u8(0xb5, 0x65, 0x1d).with_alpha(alpha));
                let eye = to_macroquad_color(Color::from_rgb_u8(0xff, 0xff, 0xff).with_alpha(alpha));
                draw_circle(x, y, radius, body);
                draw_circle(x - radius * 0.35, y - radius * 0.3, radius * 0.22, eye);
                draw_circle(x + radius * 0.35, y - radius * 0.3, radius * 0.22, eye);
            });
            if avatar.breathing {
                let ring = to_macroquad_color(Color::from_rgb_u8(0x7d, 0xd3, 0xfc).with_alpha(0.8));
                draw_circle_lines(x, y, radius + 6.0, 2.0, ring);
            }
        }
    }
}

fn draw_flash(scene: &Scene, metrics: &SceneMetrics) {
    let Some(flash) = scene.flash else {
        return;
    };
    let (x, y) = metrics.to_screen(Vec2::ZERO);
    draw_rectangle(
        x,
        y,
        metrics.playfield_width * metrics.scale,
        metrics.playfield_height * metrics.scale,
        to_macroquad_color(flash),
    );
}

fn draw_hud(scene: &Scene, metrics: &SceneMetrics) {
    let hud = &scene.hud;
    let (left, top) = metrics.to_screen(Vec2::new(8.0, 8.0));
    let text_color = to_macroquad_color(Color::from_rgb_u8(0xe2, 0xe8, 0xf0));
    let font_size = (18.0 * metrics.scale).max(14.0);

    draw_text(
        &format!("Score: {}", hud.score),
        left,
        top + font_size,
        font_size,
        text_color,
    );
    if hud.combo > 1 {
        draw_text(
            &format!("Combo x{}", hud.combo),
            left,
            top + font_size * 2.2,
            font_size,
            text_color,
        );
    }
    if hud.level > 1 {
        draw_text(
            &format!("Level {}", hud.level),
            left,
            top + font_size * 3.4,
            font_size,
            text_color,
        );
    }

    if let Some(lives) = hud.lives {
        let heart = to_macroquad_color(Color::from_rgb_u8(0xef, 0x44, 0x44));
        for index in 0..lives {
            let (x, y) = metrics.to_screen(Vec2::new(
                metrics.playfield_width - 20.0 - index as f32 * 18.0,
                16.0,
            ));
            let size = 5.0 * metrics.scale;
            draw_circle(x - size * 0.6, y, size, heart);
            draw_circle(x + size * 0.6, y, size, heart);
            draw_rectangle(x - size, y, size * 2.0, size, heart);
        }
    }

    if let Some((strain, limit)) = hud.strain {
        let (x, y) = metrics.to_screen(Vec2::new(8.0, 28.0));
        let width = (metrics.playfield_width - 16.0) * metrics.scale;
        let height = 8.0 * metrics.scale;
        let track = to_macroquad_color(Color::from_rgb_u8(0xe2, 0xe8, 0xf0));
        let fill = to_macroquad_color(Color::from_rgb_u8(0xef, 0x44, 0x44));
        let border = to_macroquad_color(Color::from_rgb_u8(0x0f, 0x17, 0x2a));
        draw_rectangle(x, y, width, height, track);
        draw_rectangle(x, y, width * (strain / limit).clamp(0.0, 1.0), height, fill);
        draw_rectangle_lines(x, y, width, height, 1.5, border);
    }

    if let Some(seconds) = hud.time_left_seconds {
        let label = format!("{:.0}s", seconds.ceil());
        let size = measure_text(&label, None, font_size as u16, 1.0);
        let (x, y) = metrics.to_screen(Vec2::new(metrics.playfield_width / 2.0, 8.0));
        draw_text(&label, x - size.width / 2.0, y + font_size, font_size, text_color);
    }

    if let Some(notice) = hud.notice {
        let size = measure_text(notice, None, font_size as u16, 1.0);
        let (x, y) = metrics.to_screen(Vec2::new(metrics.playfield_width / 2.0, 48.0));
        let backdrop = to_macroquad_color(Color::new(0.0, 0.0, 0.0, 0.6));
        draw_rectangle(
            x - size.width / 2.0 - 8.0,
            y - font_size,
            size.width + 16.0,
            font_size * 1.6,
            backdrop,
        );
        draw_text(
            notice,
            x - size.width / 2.0,
            y + font_size * 0.2,
            font_size,
            to_macroquad_color(Color::from_rgb_u8(0xff, 0xff, 0xff)),
        );
    }
}

fn draw_overlay(scene: &Scene, metrics: &SceneMetrics) {
    let Some(overlay) = scene.overlay else {
        return;
    };
    let (x, y) = metrics.to_screen(Vec2::ZERO);
    let width = metrics.playfield_width * metrics.scale;
    let height = metrics.playfield_height * metrics.scale;
    draw_rectangle(x, y, width, height, to_macroquad_color(Color::new(0.0, 0.0, 0.0, 0.55)));

    let title_size = (28.0 * metrics.scale).max(18.0);
    let subtitle_size = (16.0 * metrics.scale).max(12.0);
    let title_color = to_macroquad_color(Color::from_rgb_u8(0xfd, 0xe6, 0x8a));
    let subtitle_color = to_macroquad_color(Color::from_rgb_u8(0xe2, 0xe8, 0xf0));

    let title = overlay.title();
    let measured = measure_text(title, None, title_size as u16, 1.0);
    draw_text(
        title,
        x + (width - measured.width) / 2.0,
        y + height * 0.45,
        title_size,
        title_color,
    );

    let subtitle = overlay.subtitle();
    let measured = measure_text(subtitle, None, subtitle_size as u16, 1.0);
    draw_text(
        subtitle,
        x + (width - measured.width) / 2.0,
        y + height * 0.45 + title_size * 1.4,
        subtitle_size,
        subtitle_color,
    );
}

fn sprite_params(x: f32, y: f32, radius: f32, tint: Color) -> DrawParams {
    DrawParams::new(
        Vec2::new(x - radius, y - radius),
        Vec2::new(radius * 2.0, radius * 2.0),
    )
    .with_tint(tint)
}

/// Draws the sprite when the atlas holds it, otherwise runs the primitive
/// fallback; asset problems never fail a frame.
fn draw_sprite_or<F>(atlas: Option<&SpriteAtlas>, key: SpriteKey, params: DrawParams, fallback: F)
where
    F: FnOnce(),
{
    let drawn = atlas.map_or(false, |atlas| atlas.draw(key, params).is_ok());
    if !drawn {
        fallback();
    }
}
