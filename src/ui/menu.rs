use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Clear, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::collision::DeathReason;
use crate::config::{Difficulty, Theme};
use crate::phase::{MainMenuItem, MenuState};

const TITLE_HEIGHT: u16 = 5;
const BUTTON_HEIGHT: u16 = 3;
const BUTTON_SPACING: u16 = 1;
const BUTTON_MIN_WIDTH: u16 = 24;

/// Screen rectangles of the main-menu buttons, in [`MainMenuItem::ALL`] order.
///
/// Shared by drawing and mouse hit-testing so both agree on the geometry.
#[must_use]
pub fn main_menu_buttons(area: Rect) -> [Rect; 3] {
    let label_width = MainMenuItem::ALL
        .iter()
        .map(|item| item.label().width())
        .max()
        .unwrap_or(0);
    let width = u16::try_from(label_width + 8)
        .unwrap_or(u16::MAX)
        .max(BUTTON_MIN_WIDTH)
        .min(area.width);
    let x = area.x + (area.width - width) / 2;

    let mut buttons = [Rect::default(); 3];
    for (index, button) in buttons.iter_mut().enumerate() {
        let offset = TITLE_HEIGHT + (BUTTON_HEIGHT + BUTTON_SPACING) * index as u16;
        let y = area.y.saturating_add(offset);
        let height = BUTTON_HEIGHT.min(area.bottom().saturating_sub(y));
        *button = Rect {
            x,
            y: y.min(area.bottom()),
            width,
            height,
        };
    }

    buttons
}

/// Returns the main-menu button under a terminal cell, if any.
#[must_use]
pub fn main_menu_item_at(area: Rect, column: u16, row: u16) -> Option<MainMenuItem> {
    main_menu_buttons(area)
        .iter()
        .position(|button| {
            column >= button.x && column < button.right() && row >= button.y && row < button.bottom()
        })
        .map(|index| MainMenuItem::ALL[index])
}

/// Draws the title screen with its three buttons and the current settings.
pub fn render_main_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    menu: &MenuState,
    difficulty: Difficulty,
    high_score: u32,
    theme: &Theme,
) {
    let [title_row, _] =
        Layout::vertical([Constraint::Length(TITLE_HEIGHT), Constraint::Min(0)]).areas(area);
    frame.render_widget(
        Paragraph::new(vec![Line::from(""), Line::from("S N A K E")])
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(theme.menu_title)
                    .add_modifier(Modifier::BOLD),
            ),
        title_row,
    );

    let selected = menu.selected_item();
    for (item, button) in MainMenuItem::ALL.iter().zip(main_menu_buttons(area)) {
        let is_selected = *item == selected;
        let (border, text) = if is_selected {
            (
                Style::default().fg(theme.menu_highlight),
                Style::default()
                    .fg(theme.menu_highlight)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            (
                Style::default().fg(theme.menu_footer),
                Style::default().fg(theme.hud_score),
            )
        };
        let border_type = if is_selected {
            BorderType::Thick
        } else {
            BorderType::Plain
        };

        frame.render_widget(
            Paragraph::new(Line::from(item.label()))
                .alignment(Alignment::Center)
                .style(text)
                .block(
                    Block::bordered()
                        .border_type(border_type)
                        .border_style(border),
                ),
            button,
        );
    }

    let [_, footer_row] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(2)]).areas(area);
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(footer_row);
    frame.render_widget(
        Paragraph::new(format!(" Difficulty: {}", difficulty.label()))
            .style(Style::default().fg(theme.menu_highlight)),
        left,
    );
    frame.render_widget(
        Paragraph::new(format!("Best: {high_score} "))
            .alignment(Alignment::Right)
            .style(Style::default().fg(theme.hud_score)),
        right,
    );
}

/// Draws the difficulty list with speed and multiplier per preset.
pub fn render_difficulty_select(frame: &mut Frame<'_>, area: Rect, menu: &MenuState, theme: &Theme) {
    let popup = centered_popup(area, 70, 60);
    frame.render_widget(Clear, popup);

    let highlighted = menu.highlighted_difficulty();
    let mut lines = vec![Line::from("")];
    for (index, difficulty) in Difficulty::ALL.iter().enumerate() {
        let settings = difficulty.settings();
        let text = format!(
            "{}. {:<8} speed {:>2}  score x{}",
            index + 1,
            difficulty.label(),
            settings.speed,
            settings.score_multiplier
        );
        let style = if *difficulty == highlighted {
            Style::default()
                .fg(theme.menu_highlight)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(theme.hud_score)
        };
        lines.push(Line::styled(text, style));
    }
    lines.push(Line::from(""));
    lines.push(Line::styled(
        "[Up]/[Down] or [1]-[4] select",
        Style::default().fg(theme.menu_footer),
    ));
    lines.push(Line::styled(
        "[Enter] confirm  [Esc] back",
        Style::default().fg(theme.menu_footer),
    ));

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" select difficulty ")),
        popup,
    );
}

/// Draws the pause screen as a centered popup.
pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect, score: u32, theme: &Theme) {
    let popup = centered_popup(area, 60, 40);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::styled(
            "PAUSED",
            Style::default()
                .fg(theme.menu_title)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(format!("Score: {score}")),
        Line::from(""),
        Line::from("[Esc]/[P] Resume"),
        Line::from("[Q] Quit to menu"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" pause ")),
        popup,
    );
}

/// Values shown on the game-over screen.
#[derive(Debug, Clone, Copy)]
pub struct GameOverSummary {
    pub score: u32,
    pub high_score: u32,
    /// The round beat the previous best rather than tying it.
    pub new_record: bool,
    pub length: usize,
    pub difficulty: Difficulty,
    pub death_reason: Option<DeathReason>,
}

/// Draws the game-over screen as a centered popup.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    summary: GameOverSummary,
    theme: &Theme,
) {
    let popup = centered_popup(area, 70, 60);
    frame.render_widget(Clear, popup);

    let record_line = if summary.new_record {
        Line::styled(
            "NEW HIGH SCORE!",
            Style::default()
                .fg(theme.menu_highlight)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Line::from(format!("Best score: {}", summary.high_score))
    };

    let lines = vec![
        Line::styled(
            "GAME OVER",
            Style::default()
                .fg(theme.food)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(format!("Final score: {}", summary.score)),
        record_line,
        Line::from(format!("Snake length: {}", summary.length)),
        Line::from(format!("Difficulty: {}", summary.difficulty.label())),
        Line::from(death_reason_text(summary.death_reason)),
        Line::from(""),
        Line::from("[Enter] Play again"),
        Line::from("[Q] Return to menu"),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" game over ")),
        popup,
    );
}

/// Draws the short crash notice of the classic variant.
pub fn render_crash_notice(
    frame: &mut Frame<'_>,
    area: Rect,
    death_reason: Option<DeathReason>,
    theme: &Theme,
) {
    let popup = centered_popup(area, 60, 30);
    frame.render_widget(Clear, popup);

    frame.render_widget(
        Paragraph::new(vec![
            Line::styled(
                "OUCH!",
                Style::default()
                    .fg(theme.food)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::from(death_reason_text(death_reason)),
        ])
        .alignment(Alignment::Center)
        .block(Block::bordered()),
        popup,
    );
}

fn death_reason_text(death_reason: Option<DeathReason>) -> &'static str {
    match death_reason {
        Some(DeathReason::WallCollision) => "Cause: hit wall",
        Some(DeathReason::SelfCollision) => "Cause: hit yourself",
        None => "",
    }
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use crate::phase::MainMenuItem;

    use super::{main_menu_buttons, main_menu_item_at};

    const AREA: Rect = Rect {
        x: 0,
        y: 0,
        width: 80,
        height: 30,
    };

    #[test]
    fn buttons_are_stacked_and_centered() {
        let buttons = main_menu_buttons(AREA);

        assert_eq!(buttons[0], Rect::new(28, 5, 24, 3));
        assert_eq!(buttons[1], Rect::new(28, 9, 24, 3));
        assert_eq!(buttons[2], Rect::new(28, 13, 24, 3));
    }

    #[test]
    fn clicks_resolve_to_buttons() {
        assert_eq!(
            main_menu_item_at(AREA, 40, 6),
            Some(MainMenuItem::StartGame)
        );
        assert_eq!(main_menu_item_at(AREA, 28, 9), Some(MainMenuItem::Settings));
        assert_eq!(main_menu_item_at(AREA, 51, 15), Some(MainMenuItem::Quit));
    }

    #[test]
    fn clicks_between_or_beside_buttons_miss() {
        assert_eq!(main_menu_item_at(AREA, 40, 8), None);
        assert_eq!(main_menu_item_at(AREA, 27, 6), None);
        assert_eq!(main_menu_item_at(AREA, 52, 6), None);
        assert_eq!(main_menu_item_at(AREA, 40, 2), None);
    }
}
