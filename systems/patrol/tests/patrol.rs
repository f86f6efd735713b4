use std::time::Duration;

use mood_arcade_core::{Command, Event, GamePhase, GridCoord, GridView};
use mood_arcade_system_patrol::{next_step, Config, NoRoute, Patrol};
use mood_arcade_world::{self as world, query, GameTitle};

fn walls(map: &[&str]) -> Vec<bool> {
    map.iter()
        .flat_map(|row| row.chars().map(|tile| tile == '#'))
        .collect()
}

const TEST_MAP: [&str; 5] = [
    "#####",
    "#...#",
    "#.#.#",
    "#...#",
    "#####",
];

#[test]
fn repeated_calls_return_the_same_step() {
    let cells = walls(&TEST_MAP);
    let grid = GridView::new(&cells, 5, 5);
    let start = GridCoord::new(1, 1);
    let goal = GridCoord::new(3, 3);

    let first = next_step(grid, start, goal).expect("goal is reachable");
    for _ in 0..10 {
        assert_eq!(next_step(grid, start, goal), Ok(first));
    }
}

#[test]
fn following_steps_reaches_the_goal_in_shortest_path_length() {
    let cells = walls(&TEST_MAP);
    let grid = GridView::new(&cells, 5, 5);
    let start = GridCoord::new(1, 1);
    let goal = GridCoord::new(3, 3);
    // Around the central wall: four steps either way.
    let shortest = 4;

    let mut current = start;
    let mut steps = 0;
    while current != goal {
        current = next_step(grid, current, goal).expect("route exists");
        steps += 1;
        assert!(steps <= shortest, "walked past the shortest path length");
    }
    assert_eq!(steps, shortest);
}

#[test]
fn wall_goals_report_no_route() {
    let cells = walls(&TEST_MAP);
    let grid = GridView::new(&cells, 5, 5);
    assert_eq!(
        next_step(grid, GridCoord::new(1, 1), GridCoord::new(2, 2)),
        Err(NoRoute::GoalBlocked {
            goal: GridCoord::new(2, 2)
        })
    );
}

#[test]
fn disconnected_goals_report_no_route() {
    let partitioned = ["#####", "#.#.#", "#####"];
    let cells = walls(&partitioned);
    let grid = GridView::new(&cells, 5, 3);
    assert_eq!(
        next_step(grid, GridCoord::new(1, 1), GridCoord::new(3, 1)),
        Err(NoRoute::Unreachable {
            goal: GridCoord::new(3, 1)
        })
    );
}

#[test]
fn planner_steers_idle_patrollers_through_the_world() {
    let mut game = world::World::new(GameTitle::Corridors.config());
    let mut events = Vec::new();
    world::apply(&mut game, Command::Start, &mut events);

    let mut patrol = Patrol::new(Config::new(0x5eed));
    let mut commands = Vec::new();

    events.clear();
    world::apply(
        &mut game,
        Command::Tick {
            dt: Duration::from_millis(16),
        },
        &mut events,
    );
    assert!(
        events
            .iter()
            .any(|event| matches!(event, Event::PatrollerIdle { .. })),
        "unsteered patrollers must report idle"
    );

    patrol.handle(
        &events,
        query::phase(&game),
        query::epoch(&game),
        &query::patroller_view(&game),
        query::grid_view(&game),
        &mut commands,
    );
    assert!(
        commands
            .iter()
            .any(|command| matches!(command, Command::SteerPatroller { .. })),
        "planner must steer every idle patroller"
    );

    for command in commands.drain(..) {
        world::apply(&mut game, command, &mut events);
    }

    let before: Vec<_> = query::patroller_view(&game)
        .iter()
        .map(|patroller| patroller.position)
        .collect();

    for _ in 0..20 {
        events.clear();
        world::apply(
            &mut game,
            Command::Tick {
                dt: Duration::from_millis(100),
            },
            &mut events,
        );
        patrol.handle(
            &events,
            query::phase(&game),
            query::epoch(&game),
            &query::patroller_view(&game),
            query::grid_view(&game),
            &mut commands,
        );
        for command in commands.drain(..) {
            world::apply(&mut game, command, &mut events);
        }
    }

    let after: Vec<_> = query::patroller_view(&game)
        .iter()
        .map(|patroller| patroller.position)
        .collect();
    assert_ne!(before, after, "patrollers should roam over two seconds");
    assert_eq!(query::phase(&game), GamePhase::Running);
}
