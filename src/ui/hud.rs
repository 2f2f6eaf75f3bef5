use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::config::Theme;

const SEPARATOR: &str = " │ ";

/// One labelled value on the status line.
#[derive(Debug, Clone)]
pub struct HudField {
    pub label: &'static str,
    pub short_label: &'static str,
    pub value: String,
    /// Drawn in the accent color instead of the muted one.
    pub highlight: bool,
}

impl HudField {
    #[must_use]
    pub fn new(label: &'static str, short_label: &'static str, value: impl ToString) -> Self {
        Self {
            label,
            short_label,
            value: value.to_string(),
            highlight: false,
        }
    }

    #[must_use]
    pub fn highlighted(mut self) -> Self {
        self.highlight = true;
        self
    }
}

/// Splits off a one-line HUD at the bottom and returns the remaining play area.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, fields: &[HudField], theme: &Theme) -> Rect {
    let [play_area, status_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    frame.render_widget(
        Paragraph::new(status_line(fields, usize::from(status_area.width), theme))
            .alignment(Alignment::Center),
        status_area,
    );

    play_area
}

/// Builds the status line, switching to short labels when the full one does not fit.
#[must_use]
pub fn status_line(fields: &[HudField], available_width: usize, theme: &Theme) -> Line<'static> {
    let compact = status_width(fields, false) > available_width;
    let mut spans = Vec::with_capacity(fields.len() * 3);

    for (index, field) in fields.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(SEPARATOR, Style::default().fg(theme.hud_muted)));
        }

        let label = if compact { field.short_label } else { field.label };
        let value_style = if field.highlight {
            Style::default()
                .fg(theme.hud_score)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.hud_score)
        };

        spans.push(Span::styled(
            format!("{label}: "),
            Style::default().fg(theme.hud_muted),
        ));
        spans.push(Span::styled(field.value.clone(), value_style));
    }

    Line::from(spans)
}

/// Display width of the status line in terminal columns.
#[must_use]
pub fn status_width(fields: &[HudField], compact: bool) -> usize {
    let separators = SEPARATOR.width() * fields.len().saturating_sub(1);
    let content: usize = fields
        .iter()
        .map(|field| {
            let label = if compact { field.short_label } else { field.label };
            label.width() + 2 + field.value.width()
        })
        .sum();

    separators + content
}

#[cfg(test)]
mod tests {
    use crate::config::THEME_CLASSIC;

    use super::{status_line, status_width, HudField};

    fn fields() -> Vec<HudField> {
        vec![
            HudField::new("Score", "S", 120),
            HudField::new("Best", "B", 300),
            HudField::new("Difficulty", "D", "Expert"),
        ]
    }

    #[test]
    fn width_counts_labels_values_and_separators() {
        // "Score: 120 │ Best: 300 │ Difficulty: Expert"
        assert_eq!(status_width(&fields(), false), 43);
        // "S: 120 │ B: 300 │ D: Expert"
        assert_eq!(status_width(&fields(), true), 27);
    }

    #[test]
    fn narrow_area_switches_to_short_labels() {
        let wide = status_line(&fields(), 80, &THEME_CLASSIC).to_string();
        let narrow = status_line(&fields(), 30, &THEME_CLASSIC).to_string();

        assert_eq!(wide, "Score: 120 │ Best: 300 │ Difficulty: Expert");
        assert_eq!(narrow, "S: 120 │ B: 300 │ D: Expert");
    }
}
