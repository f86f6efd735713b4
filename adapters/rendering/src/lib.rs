#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Mood Arcade adapters.
//!
//! The simulation never draws; adapters populate a [`Scene`] from world
//! queries each frame and hand it to a [`RenderingBackend`]. Everything here
//! is plain data so backends can be swapped without touching game logic.

use anyhow::Result as AnyResult;
use glam::Vec2;
use mood_arcade_core::{AvatarRole, EntityKind, GamePhase};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Returns the same color with the provided alpha.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Horizontal movement input in `-1.0..=1.0`, positive rightwards.
    pub axis_x: f32,
    /// Vertical movement input in `-1.0..=1.0`, positive downwards.
    pub axis_y: f32,
    /// Whether the dash modifier is held.
    pub dash: bool,
    /// Pointer position in playfield coordinates, when over the playfield.
    pub pointer: Option<Vec2>,
    /// Whether the primary action (press/fire) was triggered this frame.
    pub press: bool,
    /// Whether the start control was triggered this frame.
    pub start: bool,
    /// Whether the pause toggle was triggered this frame.
    pub pause_toggle: bool,
    /// Whether the restart control was triggered this frame.
    pub restart: bool,
    /// Whether the breather control was triggered this frame.
    pub breathe: bool,
}

/// Describes the playfield rectangle backends should letterbox and draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayfieldPresentation {
    /// Playfield width in world units.
    pub width: f32,
    /// Playfield height in world units.
    pub height: f32,
    /// Fill color of the playfield behind all content.
    pub background: Color,
}

impl PlayfieldPresentation {
    /// Creates a new playfield descriptor.
    ///
    /// Returns an error when either dimension is not positive.
    pub fn new(width: f32, height: f32, background: Color) -> Result<Self, RenderingError> {
        if width <= 0.0 || height <= 0.0 {
            return Err(RenderingError::InvalidPlayfield { width, height });
        }
        Ok(Self {
            width,
            height,
            background,
        })
    }
}

/// One entity drawn inside the playfield.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneEntity {
    /// Kind discriminant selecting the visual.
    pub kind: EntityKind,
    /// Center position in playfield coordinates.
    pub position: Vec2,
    /// Radius in world units.
    pub radius: f32,
    /// Whether the entity plays its terminal fade.
    pub fading: bool,
    /// Remaining countdown fraction in `0.0..=1.0`, for urgency rings.
    pub urgency: Option<f32>,
}

/// The player-controlled actor drawn inside the playfield.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AvatarPresentation {
    /// Role deciding the avatar's silhouette.
    pub role: AvatarRole,
    /// Center position in playfield coordinates.
    pub position: Vec2,
    /// Radius in world units.
    pub radius: f32,
    /// Whether the post-hit immunity flicker is active.
    pub flashing: bool,
    /// Whether the breather stillness pose is active.
    pub breathing: bool,
}

/// A single wall tile of the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WallTile {
    /// Zero-based column index of the tile.
    pub column: u32,
    /// Zero-based row index of the tile.
    pub row: u32,
}

/// One maze patroller drawn inside the playfield.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenePatroller {
    /// Center position in playfield coordinates.
    pub position: Vec2,
    /// Whether a hush effect currently dims the patroller.
    pub dimmed: bool,
}

/// Maze layout drawn beneath the entities.
#[derive(Clone, Debug, PartialEq)]
pub struct MazePresentation {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Side length of a square tile in world units.
    pub tile_length: f32,
    /// Wall tiles to fill.
    pub walls: Vec<WallTile>,
    /// Patrollers roaming the maze.
    pub patrollers: Vec<ScenePatroller>,
}

/// HUD counters drawn above the playfield.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct HudPresentation {
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
    /// Remaining survival seconds, when the game is timed.
    pub time_left_seconds: Option<f32>,
    /// Transient notice text, when one is active.
    pub notice: Option<&'static str>,
}

/// Logical names of the sprites a backend may load.
///
/// Backends that fail to load a sprite fall back to the primitive-shape
/// rendering of the same element; sprites are decoration, never a
/// requirement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    /// The player-controlled actor.
    AvatarBody,
    /// A maze patroller.
    PatrollerBody,
    /// A falling tear collectible.
    TearDrop,
    /// A blaze press target.
    BlazeFlame,
}

/// Full-screen overlay shown outside of active play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Overlay {
    /// Session has not started yet.
    StartPrompt,
    /// Session is paused.
    Paused,
    /// Session ended in victory.
    Won,
    /// Session ended in defeat.
    Lost,
}

impl Overlay {
    /// Headline text for the overlay.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::StartPrompt => "Press Space to start",
            Self::Paused => "Paused",
            Self::Won => "You made it!",
            Self::Lost => "Overwhelmed - game over",
        }
    }

    /// Supporting text for the overlay.
    #[must_use]
    pub const fn subtitle(&self) -> &'static str {
        match self {
            Self::StartPrompt => "Arrows/WASD move - click interacts",
            Self::Paused => "Press P to resume",
            Self::Won | Self::Lost => "Press R to restart",
        }
    }

    /// Maps a game phase to the overlay it requires, if any.
    #[must_use]
    pub const fn for_phase(phase: GamePhase) -> Option<Self> {
        match phase {
            GamePhase::NotStarted => Some(Self::StartPrompt),
            GamePhase::Paused => Some(Self::Paused),
            GamePhase::Won => Some(Self::Won),
            GamePhase::Lost => Some(Self::Lost),
            GamePhase::Running => None,
        }
    }
}

/// Scene description combining the playfield and its inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Playfield rectangle and background.
    pub playfield: PlayfieldPresentation,
    /// Entities drawn in spawn order.
    pub entities: Vec<SceneEntity>,
    /// Avatar, absent for pointer-controlled games.
    pub avatar: Option<AvatarPresentation>,
    /// Maze layout, present only for grid games.
    pub maze: Option<MazePresentation>,
    /// HUD counters.
    pub hud: HudPresentation,
    /// Overlay shown outside active play.
    pub overlay: Option<Overlay>,
    /// Transient full-screen flash, e.g. on a penalty.
    pub flash: Option<Color>,
}

impl Scene {
    /// Creates a scene containing only the playfield.
    #[must_use]
    pub fn empty(playfield: PlayfieldPresentation) -> Self {
        Self {
            playfield,
            entities: Vec::new(),
            avatar: None,
            maze: None,
            hud: HudPresentation::default(),
            overlay: None,
            flash: None,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Mood Arcade scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// per-frame input captured by the adapter, and may mutate the scene
    /// before it is rendered. The backend keeps calling it every frame, so
    /// drivers advance their simulation inside it.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Playfield dimensions must be positive to be drawable.
    InvalidPlayfield {
        /// Provided width that failed validation.
        width: f32,
        /// Provided height that failed validation.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPlayfield { width, height } => {
                write!(
                    f,
                    "playfield dimensions must be positive (received {width}x{height})"
                )
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playfield_creation_accepts_positive_dimensions() {
        let playfield = PlayfieldPresentation::new(360.0, 640.0, Color::from_rgb_u8(10, 10, 30))
            .expect("positive dimensions should succeed");

        assert_eq!(playfield.width, 360.0);
        assert_eq!(playfield.height, 640.0);
    }

    #[test]
    fn playfield_creation_rejects_degenerate_dimensions_without_panicking() {
        let error = PlayfieldPresentation::new(0.0, 640.0, Color::from_rgb_u8(0, 0, 0))
            .expect_err("zero width must be rejected");

        assert!(matches!(error, RenderingError::InvalidPlayfield { .. }));
    }

    #[test]
    fn lighten_moves_channels_towards_white() {
        let color = Color::from_rgb_u8(0, 128, 255).lighten(0.5);
        assert!(color.red > 0.49 && color.red < 0.51);
        assert!(color.blue > 0.99);
    }

    #[test]
    fn empty_scene_carries_no_content() {
        let playfield = PlayfieldPresentation::new(360.0, 640.0, Color::from_rgb_u8(0, 0, 0))
            .expect("valid playfield");
        let scene = Scene::empty(playfield);

        assert!(scene.entities.is_empty());
        assert!(scene.avatar.is_none());
        assert!(scene.maze.is_none());
        assert!(scene.overlay.is_none());
        assert!(scene.flash.is_none());
        assert_eq!(scene.hud, HudPresentation::default());
    }

    #[test]
    fn overlays_cover_every_non_running_phase() {
        assert_eq!(Overlay::for_phase(GamePhase::Running), None);
        for phase in [
            GamePhase::NotStarted,
            GamePhase::Paused,
            GamePhase::Won,
            GamePhase::Lost,
        ] {
            let overlay = Overlay::for_phase(phase).expect("non-running phases need overlays");
            assert!(!overlay.title().is_empty());
            assert!(!overlay.subtitle().is_empty());
        }
    }
}
