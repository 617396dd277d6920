use rand::Rng;

use crate::config::GridSize;
use crate::snake::{Position, Snake};

/// Picks a uniformly random cell that the snake does not occupy.
///
/// Returns `None` when the snake covers every cell of the grid.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    snake: &Snake,
) -> Option<Position> {
    if snake.len() >= bounds.total_cells() {
        return None;
    }

    let mut candidates = Vec::with_capacity(bounds.total_cells() - snake.len());
    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            let position = Position { x, y };
            if !snake.occupies(position) {
                candidates.push(position);
            }
        }
    }

    if candidates.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::config::GridSize;

    use super::spawn_position;
    use crate::snake::{Position, Snake};

    #[test]
    fn food_spawn_never_overlaps_snake() {
        let mut rng = StdRng::seed_from_u64(7);
        let snake = Snake::from_segments(vec![
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(2, 0),
        ])
        .expect("segments are non-empty");

        for _ in 0..100 {
            let food = spawn_position(
                &mut rng,
                GridSize {
                    width: 8,
                    height: 6,
                },
                &snake,
            )
            .expect("grid has free cells");
            assert!(!snake.occupies(food));
            assert!(food.is_within_bounds(GridSize {
                width: 8,
                height: 6,
            }));
        }
    }

    #[test]
    fn single_free_cell_is_always_chosen() {
        let mut rng = StdRng::seed_from_u64(11);
        let snake = Snake::from_segments(vec![
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(1, 1),
        ])
        .expect("segments are non-empty");

        let food = spawn_position(&mut rng, GridSize::square(2), &snake);

        assert_eq!(food, Some(Position::new(0, 1)));
    }

    #[test]
    fn full_grid_has_no_spawn() {
        let mut rng = StdRng::seed_from_u64(3);
        let snake = Snake::from_segments(vec![
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(1, 1),
            Position::new(0, 1),
        ])
        .expect("segments are non-empty");

        assert_eq!(spawn_position(&mut rng, GridSize::square(2), &snake), None);
    }

    #[test]
    fn spawn_reaches_every_free_cell() {
        let mut rng = StdRng::seed_from_u64(19);
        let snake = Snake::new(Position::new(1, 1));
        let mut seen = HashSet::new();

        for _ in 0..500 {
            if let Some(food) = spawn_position(&mut rng, GridSize::square(3), &snake) {
                seen.insert(food);
            }
        }

        assert_eq!(seen.len(), 8);
    }
}
