use neon_snake::config::{GridSize, SimulationConfig};
use neon_snake::input::Direction;
use neon_snake::simulation::{SnakeSimulation, SnakeState};
use neon_snake::snake::{Position, Snake};
use proptest::prelude::*;

fn direction() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

/// `None` steers towards the food; `Some` is a raw, possibly fatal, key press.
fn inputs(max_len: usize) -> impl Strategy<Value = Vec<Option<Direction>>> {
    prop::collection::vec(prop::option::weighted(0.15, direction()), 1..max_len)
}

fn config(dimension: u16) -> SimulationConfig {
    SimulationConfig {
        grid_size: GridSize::square(dimension),
        start: (1, 1),
        ..SimulationConfig::default()
    }
}

/// Greedy move towards the food that survives the next step, if one exists.
fn steer(simulation: &SnakeSimulation) -> Direction {
    let state = simulation.state();
    let grid = simulation.config().grid_size;
    let head = state.snake.head();

    let survives = |direction: Direction| {
        let next = head.offset(direction);
        !direction.is_reversal_of(state.facing)
            && next.is_within_bounds(grid)
            && !state.snake.collides_with(next, state.food == Some(next))
    };
    let distance = |direction: Direction| {
        let next = head.offset(direction);
        state
            .food
            .map_or(0, |food| (next.x - food.x).abs() + (next.y - food.y).abs())
    };

    Direction::ALL
        .into_iter()
        .filter(|direction| survives(*direction))
        .min_by_key(|direction| distance(*direction))
        .unwrap_or(state.facing)
}

fn play(simulation: &SnakeSimulation, input: Option<Direction>) -> Direction {
    input.unwrap_or_else(|| steer(simulation))
}

/// Perimeter cells of a rectangle in clockwise order (y grows downward).
fn ring(x0: i32, y0: i32, width: i32, height: i32) -> Vec<Position> {
    let (x1, y1) = (x0 + width - 1, y0 + height - 1);
    let mut cells = Vec::new();
    cells.extend((x0..=x1).map(|x| Position::new(x, y0)));
    cells.extend((y0 + 1..=y1).map(|y| Position::new(x1, y)));
    cells.extend((x0..x1).rev().map(|x| Position::new(x, y1)));
    cells.extend((y0 + 1..y1).rev().map(|y| Position::new(x0, y)));
    cells
}

fn towards(from: Position, to: Position) -> Option<Direction> {
    Direction::ALL
        .into_iter()
        .find(|direction| from.offset(*direction) == to)
}

proptest! {
    #[test]
    fn reversal_never_changes_facing(
        seed in any::<u64>(),
        inputs in inputs(80),
    ) {
        let mut simulation = SnakeSimulation::with_seed(config(8), seed);

        for choice in inputs {
            if simulation.is_terminal() {
                break;
            }
            let input = play(&simulation, choice);
            let facing = simulation.state().facing;
            let head = simulation.state().snake.head();

            let outcome = simulation.step(input);

            if input == facing.opposite() {
                prop_assert_eq!(outcome.snapshot.facing, facing);
                if outcome.snapshot.alive {
                    prop_assert_eq!(outcome.snapshot.body[0], head.offset(facing));
                }
            } else {
                prop_assert_eq!(outcome.snapshot.facing, input);
            }
        }
    }

    #[test]
    fn length_grows_only_when_eating(
        seed in any::<u64>(),
        inputs in inputs(200),
    ) {
        let mut simulation = SnakeSimulation::with_seed(config(6), seed);

        for choice in inputs {
            let input = play(&simulation, choice);
            let before = simulation.state().snake.len();
            let outcome = simulation.step(input);

            if outcome.terminated.is_some() && !outcome.ate_food {
                prop_assert_eq!(outcome.snapshot.body.len(), before);
            } else if !simulation.is_terminal() || outcome.ate_food {
                let expected = before + usize::from(outcome.ate_food);
                prop_assert_eq!(outcome.snapshot.body.len(), expected);
            }
        }
    }

    #[test]
    fn score_and_interval_are_monotonic(
        seed in any::<u64>(),
        inputs in inputs(200),
    ) {
        let mut simulation = SnakeSimulation::with_seed(config(5), seed);
        let mut last_score = 0;
        let mut last_interval = simulation.state().interval_ms;

        for choice in inputs {
            let input = play(&simulation, choice);
            let outcome = simulation.step(input);
            prop_assert!(outcome.snapshot.score >= last_score);
            prop_assert!(outcome.snapshot.interval_ms <= last_interval);
            prop_assert!(outcome.snapshot.interval_ms >= 50);
            prop_assert_eq!(outcome.snapshot.score, last_score + outcome.score_delta);
            last_score = outcome.snapshot.score;
            last_interval = outcome.snapshot.interval_ms;
        }
    }

    #[test]
    fn live_states_stay_in_bounds_with_food_off_the_body(
        seed in any::<u64>(),
        dimension in 3u16..10,
        inputs in inputs(250),
    ) {
        let config = config(dimension);
        let mut simulation = SnakeSimulation::with_seed(config, seed);

        for choice in inputs {
            let input = play(&simulation, choice);
            let outcome = simulation.step(input);
            if !outcome.snapshot.alive {
                break;
            }

            for segment in &outcome.snapshot.body {
                prop_assert!(segment.is_within_bounds(config.grid_size));
            }
            let food = outcome.snapshot.food;
            prop_assert!(food.is_some());
            if let Some(food) = food {
                prop_assert!(food.is_within_bounds(config.grid_size));
                prop_assert!(!outcome.snapshot.body.contains(&food));
            }

            let mut seen = outcome.snapshot.body.clone();
            seen.sort_by_key(|position| (position.x, position.y));
            seen.dedup();
            prop_assert_eq!(seen.len(), outcome.snapshot.body.len());
        }
    }

    #[test]
    fn chasing_the_tail_around_a_ring_never_collides(
        x0 in 0i32..4,
        y0 in 0i32..4,
        width in 2i32..6,
        height in 2i32..6,
        laps in 1usize..4,
    ) {
        let config = config(10);
        let cells = ring(x0, y0, width, height);
        let mut body = vec![cells[0]];
        body.extend(cells[1..].iter().rev());
        let length = body.len();

        let state = SnakeState {
            snake: Snake::from_segments(body).expect("ring is non-empty"),
            facing: Direction::Up,
            food: Some(Position::new(9, 9)),
            alive: true,
            termination: None,
            score: 0,
            interval_ms: config.initial_interval_ms,
        };
        let mut simulation = SnakeSimulation::from_state(config, state, 11);

        for _ in 0..laps * length {
            let head = simulation.state().snake.head();
            let tail = simulation.state().snake.tail();
            let direction = towards(head, tail);
            prop_assert!(direction.is_some());

            let outcome = simulation.step(direction.unwrap_or(Direction::Up));

            prop_assert!(outcome.snapshot.alive);
            prop_assert!(!outcome.ate_food);
            prop_assert_eq!(outcome.snapshot.body[0], tail);
            prop_assert_eq!(outcome.snapshot.body.len(), length);
        }
    }
}

#[test]
fn steered_play_grows_the_snake() {
    let mut grown_runs = 0;
    let mut longest = 0;

    for seed in 0..64 {
        let mut simulation = SnakeSimulation::with_seed(config(8), seed);
        let mut eaten = 0;
        for _ in 0..300 {
            if simulation.is_terminal() {
                break;
            }
            let input = steer(&simulation);
            if simulation.step(input).ate_food {
                eaten += 1;
            }
        }

        if eaten >= 3 {
            grown_runs += 1;
        }
        longest = longest.max(simulation.state().snake.len());
    }

    assert!(grown_runs >= 32, "only {grown_runs} of 64 runs ate three times");
    assert!(longest >= 7, "longest snake had {longest} segments");
}
