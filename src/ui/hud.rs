use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::Theme;
use crate::simulation::Snapshot;
use crate::wallet::{short_address, WalletStatus};

const HUD_MARGIN_X: u16 = 1;
const SEPARATOR: &str = " │ ";
const ELLIPSIS: char = '…';
const FULL_LABELS: [&str; 4] = ["Length", "Tick", "Score", "Hi"];
const COMPACT_LABELS: [&str; 4] = ["L", "T", "S", "H"];

/// Supplemental values displayed by the HUD rows.
#[derive(Debug, Clone)]
pub struct HudInfo<'a> {
    pub high_score: u32,
    pub theme: &'a Theme,
    pub wallet: &'a WalletStatus,
    /// Most recent user-facing notice, if any.
    pub notice: Option<&'a str>,
    /// Origin used for the referral link on the start screen.
    pub referral_origin: &'a str,
}

/// Renders the three HUD rows and returns the remaining play area above them.
#[must_use]
pub fn render_hud(
    frame: &mut Frame<'_>,
    area: Rect,
    snapshot: &Snapshot,
    info: &HudInfo<'_>,
) -> Rect {
    let [play_area, score_area, wallet_area, notice_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let score_area = inset_horizontal(score_area, HUD_MARGIN_X);
    let wallet_area = inset_horizontal(wallet_area, HUD_MARGIN_X);
    let notice_area = inset_horizontal(notice_area, HUD_MARGIN_X);

    frame.render_widget(
        Paragraph::new(score_line(
            snapshot,
            info.high_score,
            usize::from(score_area.width),
            info.theme,
        ))
        .alignment(Alignment::Right),
        score_area,
    );

    frame.render_widget(
        Paragraph::new(wallet_line(info.wallet, info.theme)).alignment(Alignment::Right),
        wallet_area,
    );

    if let Some(notice) = info.notice {
        let text = truncate_to_width(notice, usize::from(notice_area.width));
        frame.render_widget(
            Paragraph::new(Line::from(text))
                .alignment(Alignment::Right)
                .style(Style::default().fg(info.theme.hud_muted)),
            notice_area,
        );
    }

    play_area
}

fn inset_horizontal(area: Rect, margin: u16) -> Rect {
    let total_margin = margin.saturating_mul(2);
    Rect {
        x: area.x.saturating_add(margin),
        y: area.y,
        width: area.width.saturating_sub(total_margin),
        height: area.height,
    }
}

fn score_line(
    snapshot: &Snapshot,
    high_score: u32,
    available_width: usize,
    theme: &Theme,
) -> Line<'static> {
    let values = [
        snapshot.body.len().to_string(),
        format!("{}ms", snapshot.interval_ms),
        snapshot.score.to_string(),
        high_score.to_string(),
    ];
    let labels = if score_line_width(&values, &FULL_LABELS) > available_width {
        COMPACT_LABELS
    } else {
        FULL_LABELS
    };

    let value_style = Style::default().fg(theme.hud_score);
    let highlight = snapshot.score > 0 && snapshot.score >= high_score;
    let mut spans = Vec::with_capacity(values.len() * 3);
    for (index, (label, value)) in labels.iter().zip(values).enumerate() {
        if index > 0 {
            spans.push(Span::raw(SEPARATOR));
        }
        spans.push(Span::styled(
            format!("{label}: "),
            Style::default().fg(theme.hud_muted),
        ));

        let style = if highlight && index >= 2 {
            value_style.add_modifier(Modifier::BOLD)
        } else {
            value_style
        };
        spans.push(Span::styled(value, style));
    }

    Line::from(spans)
}

fn score_line_width(values: &[String; 4], labels: &[&str; 4]) -> usize {
    let fields: usize = labels
        .iter()
        .zip(values)
        .map(|(label, value)| label.width() + 2 + value.width())
        .sum();
    fields + SEPARATOR.width() * (values.len() - 1)
}

fn wallet_line(status: &WalletStatus, theme: &Theme) -> Line<'static> {
    match status {
        WalletStatus::Connected { address, balance } => Line::from(vec![
            Span::styled(short_address(address), Style::default().fg(theme.hud_score)),
            Span::raw(SEPARATOR),
            Span::styled(format!("{balance} ETH"), Style::default().fg(theme.food)),
        ]),
        WalletStatus::Disconnected => Line::from(Span::styled(
            "[C] Connect wallet",
            Style::default().fg(theme.hud_muted),
        )),
        WalletStatus::Unavailable => Line::from(Span::styled(
            "No wallet provider installed",
            Style::default().fg(theme.menu_alert),
        )),
    }
}

/// Cuts `text` to at most `max_width` terminal columns, marking the cut.
fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_owned();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - ELLIPSIS.width().unwrap_or(1);
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > budget {
            break;
        }
        used += ch_width;
        out.push(ch);
    }
    out.push(ELLIPSIS);
    out
}
