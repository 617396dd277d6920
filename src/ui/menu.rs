use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};
use ratatui::Frame;

use crate::config::Theme;
use crate::simulation::Termination;
use crate::ui::hud::HudInfo;
use crate::wallet::{referral_link, WalletStatus};

/// Columns kept free on each side of the popup text.
const POPUP_PADDING: u16 = 2;

/// Draws the start screen, including the referral link for a connected wallet.
pub fn render_start_menu(frame: &mut Frame<'_>, area: Rect, info: &HudInfo<'_>) {
    let mut lines = vec![
        title_line("NEON SNAKE", info.theme.menu_title),
        Line::from(""),
        Line::from(format!("High score: {}", info.high_score)),
        Line::from(""),
        Line::from("[Enter] Start"),
        Line::from("[Space] Pause  [R] Reset"),
        Line::from("[C] Wallet  [Q] Quit"),
    ];
    if let WalletStatus::Connected { address, .. } = info.wallet {
        lines.push(Line::from(""));
        lines.push(Line::from("Invite a friend:"));
        lines.push(Line::from(referral_link(info.referral_origin, address)));
    }

    render_popup(frame, area, " start ", lines);
}

pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let lines = vec![
        title_line("PAUSED", theme.hud_score),
        Line::from(""),
        Line::from("[Space] Resume"),
        Line::from("[Q] Quit"),
    ];

    render_popup(frame, area, " pause ", lines);
}

/// Draws the end-of-game summary; a filled grid is reported as a win.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    score: u32,
    high_score: u32,
    reason: Termination,
    theme: &Theme,
) {
    let won = reason.is_win();
    let mut lines = vec![
        title_line(
            if won { "YOU WIN" } else { "GAME OVER" },
            banner_color(theme, won),
        ),
        Line::from(""),
        Line::from(cause_text(reason)),
        Line::from(format!("Score {score}  /  Best {high_score}")),
    ];
    if score > 0 && score >= high_score {
        lines.push(Line::from("New high score!").style(Style::default().fg(theme.food)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("[Enter] Play again  [Q] Quit"));

    render_popup(frame, area, if won { " victory " } else { " game over " }, lines);
}

/// Color for the banner title, picked by outcome.
fn banner_color(theme: &Theme, won: bool) -> Color {
    if won {
        theme.hud_score
    } else {
        theme.menu_alert
    }
}

fn title_line(text: &'static str, color: Color) -> Line<'static> {
    Line::from(text).style(Style::default().fg(color).add_modifier(Modifier::BOLD))
}

fn cause_text(reason: Termination) -> &'static str {
    match reason {
        Termination::WallCollision => "You hit the wall",
        Termination::SelfCollision => "You bit your own tail",
        Termination::GridFilled => "The grid is full",
    }
}

fn render_popup(frame: &mut Frame<'_>, area: Rect, title: &str, lines: Vec<Line<'_>>) {
    let popup = popup_rect(area, &lines);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(title)),
        popup,
    );
}

/// Centers a bordered box sized to `lines`, clamped to `area`.
fn popup_rect(area: Rect, lines: &[Line<'_>]) -> Rect {
    let text_width = lines.iter().map(Line::width).max().unwrap_or(0);
    let text_width = u16::try_from(text_width).unwrap_or(u16::MAX);
    let text_height = u16::try_from(lines.len()).unwrap_or(u16::MAX);

    let width = text_width
        .saturating_add(2 * POPUP_PADDING + 2)
        .min(area.width);
    let height = text_height.saturating_add(2).min(area.height);

    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
