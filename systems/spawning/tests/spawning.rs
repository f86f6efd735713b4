use std::time::Duration;

use mood_arcade_core::{Command, EntityKind, Event, GamePhase};
use mood_arcade_system_spawning::{Config, Spawning};
use mood_arcade_world::{self as world, query, GameTitle};

fn spawning_for(game: &world::World, seed: u64) -> Spawning {
    let config = query::config(game);
    let rule = config.spawn.clone().expect("game has a spawn rule");
    Spawning::new(Config::new(
        rule,
        config.bounds.width(),
        config.bounds.height(),
        seed,
    ))
}

fn drive(game: &mut world::World, spawning: &mut Spawning, ticks: u32, dt: Duration) {
    let mut events = Vec::new();
    let mut commands = Vec::new();
    for _ in 0..ticks {
        events.clear();
        world::apply(game, Command::Tick { dt }, &mut events);
        spawning.handle(
            &events,
            query::phase(game),
            query::epoch(game),
            &query::entity_view(game),
            query::grid_view(game).and_then(|grid| {
                query::tile_length(game).map(|tile_length| (grid, tile_length))
            }),
            &mut commands,
        );
        for command in commands.drain(..) {
            world::apply(game, command, &mut events);
        }
    }
}

#[test]
fn emits_multiple_spawn_commands_for_large_dt() {
    let mut game = world::World::new(GameTitle::Teardrops.config());
    let mut events = Vec::new();
    world::apply(&mut game, Command::Start, &mut events);

    let mut spawning = spawning_for(&game, 0x1234_5678);
    let mut commands = Vec::new();
    spawning.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_millis(2700),
        }],
        GamePhase::Running,
        query::epoch(&game),
        &query::entity_view(&game),
        None,
        &mut commands,
    );

    assert_eq!(commands.len(), 3, "expected one spawn per elapsed interval");
    for command in &commands {
        match command {
            Command::SpawnEntity { kind, .. } => assert_eq!(*kind, EntityKind::Tear),
            other => panic!("unexpected command emitted: {other:?}"),
        }
    }
}

#[test]
fn spawned_positions_stay_inside_the_margin() {
    let mut game = world::World::new(GameTitle::Embers.config());
    let mut events = Vec::new();
    world::apply(&mut game, Command::Start, &mut events);

    let mut spawning = spawning_for(&game, 0x4d59_5df4);
    drive(&mut game, &mut spawning, 120, Duration::from_millis(100));

    let config = query::config(&game).clone();
    let margin = config.spawn.expect("embers spawns").margin;
    let view = query::entity_view(&game);
    assert!(!view.is_empty(), "twelve seconds must spawn something");
    for snapshot in view.iter() {
        assert!(
            config.bounds.contains(snapshot.position, margin),
            "{:?} spawned outside the margin",
            snapshot.position
        );
    }
}

#[test]
fn equal_seeds_spawn_identical_streams() {
    let run = |seed: u64| -> Vec<Command> {
        let game = world::World::new(GameTitle::Moonfall.config());
        let mut spawning = spawning_for(&game, seed);
        let mut commands = Vec::new();
        spawning.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_secs(8),
            }],
            GamePhase::Running,
            query::epoch(&game),
            &query::entity_view(&game),
            None,
            &mut commands,
        );
        commands
    };

    assert_eq!(run(42), run(42));
    assert_ne!(run(42), run(43));
}

#[test]
fn active_cap_limits_maze_tonics() {
    let mut game = world::World::new(GameTitle::Corridors.config());
    let mut events = Vec::new();
    world::apply(&mut game, Command::Start, &mut events);

    let mut spawning = spawning_for(&game, 7);
    drive(&mut game, &mut spawning, 300, Duration::from_millis(100));

    let tonics = query::entity_view(&game)
        .iter()
        .filter(|snapshot| matches!(snapshot.kind, EntityKind::Tonic(_)))
        .count();
    assert!(tonics <= 3, "cap of three tonics exceeded: {tonics}");
    assert!(tonics > 0, "thirty seconds must spawn at least one tonic");
}
