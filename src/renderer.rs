use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::config::{
    GridSize, Theme, BORDER_HALF_BLOCK, GLYPH_FOOD, GLYPH_SNAKE_BODY, GLYPH_SNAKE_HEAD_DOWN,
    GLYPH_SNAKE_HEAD_LEFT, GLYPH_SNAKE_HEAD_RIGHT, GLYPH_SNAKE_HEAD_UP, GLYPH_SNAKE_TAIL,
};
use crate::game::Phase;
use crate::input::Direction;
use crate::simulation::Snapshot;
use crate::snake::Position;
use crate::ui::hud::{render_hud, HudInfo};
use crate::ui::menu::{render_game_over_menu, render_pause_menu, render_start_menu};

/// Cells after which body segments stop fading.
const BODY_FADE_SEGMENTS: usize = 16;

/// Renders the full game frame from an immutable snapshot.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot, phase: Phase, hud_info: &HudInfo<'_>) {
    let area = frame.area();
    let play_area = render_hud(frame, area, snapshot, hud_info);
    let play_area = fit_grid(play_area, snapshot.grid);

    let theme = hud_info.theme;
    let block = Block::bordered()
        .border_set(BORDER_HALF_BLOCK)
        .border_style(Style::new().fg(theme.border_fg).bg(theme.border_bg))
        .style(Style::new().bg(theme.play_bg));

    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    render_food(frame, inner, snapshot, theme);
    render_snake(frame, inner, snapshot, theme);

    match phase {
        Phase::Start => render_start_menu(frame, play_area, hud_info),
        Phase::Paused => render_pause_menu(frame, play_area, theme),
        Phase::Over(reason) => render_game_over_menu(
            frame,
            play_area,
            snapshot.score,
            hud_info.high_score,
            reason,
            theme,
        ),
        Phase::Running => {}
    }
}

/// Shrinks `area` to the bordered grid, centered horizontally.
fn fit_grid(area: Rect, grid: GridSize) -> Rect {
    let width = grid.width.saturating_add(2).min(area.width);
    let height = grid.height.saturating_add(2).min(area.height);
    let x = area.x + (area.width - width) / 2;

    Rect::new(x, area.y, width, height)
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot, theme: &Theme) {
    let Some(food) = snapshot.food else {
        return;
    };
    let Some((x, y)) = logical_to_terminal(inner, snapshot.grid, food) else {
        return;
    };

    let buffer = frame.buffer_mut();
    buffer.set_string(
        x,
        y,
        GLYPH_FOOD,
        Style::new().fg(theme.food).bg(theme.play_bg),
    );
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot, theme: &Theme) {
    let last = snapshot.body.len().saturating_sub(1);

    let buffer = frame.buffer_mut();
    for (index, segment) in snapshot.body.iter().enumerate() {
        let Some((x, y)) = logical_to_terminal(inner, snapshot.grid, *segment) else {
            continue;
        };

        if index == 0 {
            buffer.set_string(
                x,
                y,
                head_glyph(snapshot.facing),
                Style::new()
                    .fg(theme.snake_head)
                    .bg(theme.play_bg)
                    .add_modifier(Modifier::BOLD),
            );
            continue;
        }

        if index == last {
            buffer.set_string(
                x,
                y,
                GLYPH_SNAKE_TAIL,
                Style::new().fg(theme.snake_tail).bg(theme.play_bg),
            );
            continue;
        }

        buffer.set_string(
            x,
            y,
            GLYPH_SNAKE_BODY,
            Style::new()
                .fg(body_color(theme, index))
                .bg(theme.play_bg),
        );
    }
}

/// Fades from the body color towards the tail color along the snake.
fn body_color(theme: &Theme, index: usize) -> Color {
    let (Color::Rgb(r0, g0, b0), Color::Rgb(r1, g1, b1)) = (theme.snake_body, theme.snake_tail)
    else {
        return theme.snake_body;
    };

    let step = index.min(BODY_FADE_SEGMENTS) as f32 / BODY_FADE_SEGMENTS as f32;
    let mix = |from: u8, to: u8| -> u8 {
        (f32::from(from) + (f32::from(to) - f32::from(from)) * step).round() as u8
    };

    Color::Rgb(mix(r0, r1), mix(g0, g1), mix(b0, b1))
}

fn head_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => GLYPH_SNAKE_HEAD_UP,
        Direction::Down => GLYPH_SNAKE_HEAD_DOWN,
        Direction::Left => GLYPH_SNAKE_HEAD_LEFT,
        Direction::Right => GLYPH_SNAKE_HEAD_RIGHT,
    }
}

fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x >= inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;
    use ratatui::style::Color;

    use crate::config::{GridSize, THEME_NEON};
    use crate::snake::Position;

    use super::{body_color, fit_grid, logical_to_terminal};

    #[test]
    fn positions_map_inside_the_inner_area() {
        let inner = Rect::new(2, 1, 20, 20);

        assert_eq!(
            logical_to_terminal(inner, GridSize::square(20), Position::new(0, 0)),
            Some((2, 1))
        );
        assert_eq!(
            logical_to_terminal(inner, GridSize::square(20), Position::new(19, 19)),
            Some((21, 20))
        );
        assert_eq!(
            logical_to_terminal(inner, GridSize::square(20), Position::new(20, 0)),
            None
        );
    }

    #[test]
    fn cells_outside_a_small_terminal_are_skipped() {
        let inner = Rect::new(0, 0, 5, 5);

        assert_eq!(
            logical_to_terminal(inner, GridSize::square(20), Position::new(7, 1)),
            None
        );
    }

    #[test]
    fn grid_is_centered_and_clamped() {
        let area = Rect::new(0, 0, 40, 10);

        assert_eq!(fit_grid(area, GridSize::square(20)), Rect::new(9, 0, 22, 10));
    }

    #[test]
    fn body_fades_towards_tail_color() {
        assert_eq!(body_color(&THEME_NEON, 0), THEME_NEON.snake_body);
        assert_eq!(body_color(&THEME_NEON, 100), THEME_NEON.snake_tail);
        assert!(matches!(body_color(&THEME_NEON, 8), Color::Rgb(0, 166, 166)));
    }
}
