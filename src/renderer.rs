use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::classic::{ClassicGame, MotionState};
use crate::config::{
    GridSize, Theme, CELL_COLUMNS, GLYPH_FOOD, GLYPH_SNAKE_BODY, GLYPH_SNAKE_HEAD,
};
use crate::game::GameSession;
use crate::phase::Phase;
use crate::snake::{Position, Snake};
use crate::ui::hud::{render_hud, HudField};
use crate::ui::menu::{
    render_crash_notice, render_difficulty_select, render_game_over_menu, render_main_menu,
    render_pause_menu, GameOverSummary,
};

/// Renders one arcade frame from immutable session state.
pub fn render(frame: &mut Frame<'_>, session: &GameSession, theme: &Theme) {
    let area = frame.area();
    let phase = session.phase();

    if !phase.shows_board() {
        if phase == Phase::DifficultySelect {
            render_difficulty_select(frame, area, session.menu(), theme);
        } else {
            render_main_menu(
                frame,
                area,
                session.menu(),
                session.difficulty(),
                session.high_score,
                theme,
            );
        }
        return;
    }

    let fields = [
        HudField::new("Score", "S", session.score).highlighted(),
        HudField::new("Best", "B", session.high_score),
        HudField::new("Difficulty", "D", session.difficulty().label()),
        HudField::new("Length", "L", session.snake.len()),
    ];
    let play_area = render_hud(frame, area, &fields, theme);
    render_board(
        frame,
        play_area,
        session.bounds(),
        &session.snake,
        session.food,
        theme,
    );

    match phase {
        Phase::Paused => render_pause_menu(frame, play_area, session.score, theme),
        Phase::GameOver => render_game_over_menu(
            frame,
            play_area,
            GameOverSummary {
                score: session.score,
                high_score: session.high_score,
                new_record: session.new_record,
                length: session.snake.len(),
                difficulty: session.difficulty(),
                death_reason: session.death_reason,
            },
            theme,
        ),
        _ => {}
    }
}

/// Renders one classic frame.
pub fn render_classic(frame: &mut Frame<'_>, game: &ClassicGame, theme: &Theme) {
    let hint = match game.state() {
        MotionState::Stopped => "arrows: go",
        MotionState::Moving => "p: stop",
        MotionState::Dead => "...",
    };
    let fields = [
        HudField::new("Score", "S", game.score).highlighted(),
        HudField::new("High Score", "H", game.high_score),
        HudField::new("Keys", "K", hint),
    ];

    let area = frame.area();
    let play_area = render_hud(frame, area, &fields, theme);
    render_board(
        frame,
        play_area,
        game.bounds(),
        &game.snake,
        game.food,
        theme,
    );

    if game.state() == MotionState::Dead {
        render_crash_notice(frame, play_area, game.death_reason, theme);
    }
}

/// Draws the bordered board centered in `area`.
fn render_board(
    frame: &mut Frame<'_>,
    area: Rect,
    bounds: GridSize,
    snake: &Snake,
    food: Position,
    theme: &Theme,
) {
    let board = board_rect(area, bounds);
    let block = Block::bordered().border_style(Style::new().fg(theme.border_fg));
    let inner = block.inner(board);
    frame.render_widget(block, board);

    render_background(frame, inner, bounds, theme);
    render_food(frame, inner, bounds, food, theme);
    render_snake(frame, inner, bounds, snake, theme);
}

/// Outer rectangle (border included) of a board for `bounds`, centered and clipped to `area`.
#[must_use]
pub fn board_rect(area: Rect, bounds: GridSize) -> Rect {
    let width = bounds
        .width
        .saturating_mul(CELL_COLUMNS)
        .saturating_add(2)
        .min(area.width);
    let height = bounds.height.saturating_add(2).min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_background(frame: &mut Frame<'_>, inner: Rect, bounds: GridSize, theme: &Theme) {
    let buffer = frame.buffer_mut();
    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            let Some((column, row)) = logical_to_terminal(inner, bounds, Position { x, y }) else {
                continue;
            };
            let bg = if (x + y) % 2 == 0 {
                theme.play_bg
            } else {
                theme.play_bg_alt
            };
            buffer.set_string(column, row, "  ", Style::new().bg(bg));
        }
    }
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, bounds: GridSize, food: Position, theme: &Theme) {
    let Some((x, y)) = logical_to_terminal(inner, bounds, food) else {
        return;
    };

    let buffer = frame.buffer_mut();
    buffer.set_string(x, y, GLYPH_FOOD, Style::new().fg(theme.food));
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, bounds: GridSize, snake: &Snake, theme: &Theme) {
    let buffer = frame.buffer_mut();

    // Tail first so the head wins when it overlaps a body cell after a crash.
    for segment in snake.body_excluding_head() {
        let Some((x, y)) = logical_to_terminal(inner, bounds, *segment) else {
            continue;
        };
        buffer.set_string(x, y, GLYPH_SNAKE_BODY, Style::new().fg(theme.snake_body));
    }

    if let Some((x, y)) = logical_to_terminal(inner, bounds, snake.head()) {
        buffer.set_string(
            x,
            y,
            GLYPH_SNAKE_HEAD,
            Style::new()
                .fg(theme.snake_head)
                .add_modifier(Modifier::BOLD),
        );
    }
}

/// Maps a grid cell to the terminal cell of its left column, or `None` when clipped.
#[must_use]
pub fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_COLUMNS)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_COLUMNS) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
