#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Mood Arcade experience.

mod driver;
mod presenter;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use mood_arcade_rendering::{Presentation, RenderingBackend, Scene};
use mood_arcade_rendering_macroquad::MacroquadBackend;
use mood_arcade_system_patrol::{self as patrol, Patrol};
use mood_arcade_system_spawning::{self as spawning, Spawning};
use mood_arcade_world::{query, GameTitle, World};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use driver::Driver;

/// Mood Arcade: six small games, one simulation.
#[derive(Debug, Parser)]
#[command(name = "mood-arcade", version, about)]
struct Args {
    /// Game to play.
    #[arg(long, value_enum, default_value_t = GameArg::Embers)]
    game: GameArg,

    /// Seed for spawn and patrol randomness; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Disable vertical sync.
    #[arg(long)]
    no_vsync: bool,

    /// Print frame timing metrics once per second.
    #[arg(long)]
    show_fps: bool,

    /// Skip sprite loading and always draw primitive shapes.
    #[arg(long)]
    no_sprites: bool,

    /// List the available games and exit.
    #[arg(long)]
    list: bool,
}

/// Command-line spelling of the game titles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum GameArg {
    /// Whack-a-fire clicker.
    Embers,
    /// Catch falling tears with a bucket.
    Teardrops,
    /// Shoot hearts before their glow fades.
    Heartshot,
    /// Collect pellets in a patrolled maze.
    Corridors,
    /// Bounce upward across drifting platforms.
    Rooftops,
    /// Dodge falling boulders until dawn.
    Moonfall,
}

impl GameArg {
    const fn title(self) -> GameTitle {
        match self {
            Self::Embers => GameTitle::Embers,
            Self::Teardrops => GameTitle::Teardrops,
            Self::Heartshot => GameTitle::Heartshot,
            Self::Corridors => GameTitle::Corridors,
            Self::Rooftops => GameTitle::Rooftops,
            Self::Moonfall => GameTitle::Moonfall,
        }
    }
}

/// Entry point for the Mood Arcade command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();

    if args.list {
        for title in GameTitle::ALL {
            println!("{}", title.name());
        }
        return Ok(());
    }

    let title = args.game.title();
    let config = title.config();

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().next_u64());
    let mut seeder = ChaCha8Rng::seed_from_u64(seed);
    let spawn_seed = seeder.next_u64();
    let patrol_seed = seeder.next_u64();

    let spawning = config.spawn.clone().map(|rule| {
        Spawning::new(spawning::Config::new(
            rule,
            config.bounds.width(),
            config.bounds.height(),
            spawn_seed,
        ))
    });
    let patrols = config
        .maze
        .is_some()
        .then(|| Patrol::new(patrol::Config::new(patrol_seed)));

    let world = World::new(config);
    println!("{} ({}, seed {seed})", query::welcome_banner(&world), title.name());

    let playfield = mood_arcade_rendering::PlayfieldPresentation::new(
        query::config(&world).bounds.width(),
        query::config(&world).bounds.height(),
        presenter::BACKGROUND,
    )?;
    let mut scene = Scene::empty(playfield);

    let mut driver = Driver::new(world, spawning, patrols);
    presenter::populate(driver.world(), None, &mut scene);

    let presentation = Presentation::new(
        format!("Mood Arcade - {}", title.name()),
        presenter::BACKGROUND.lighten(0.02),
        scene,
    );

    let backend = MacroquadBackend::new()
        .with_vsync(!args.no_vsync)
        .with_show_fps(args.show_fps)
        .with_sprite_loading(!args.no_sprites);

    backend.run(presentation, move |dt, input, scene| {
        driver.frame(dt, input, scene);
    })
}
