//! Drawing: grid snapshot → double-wide glyph rows, plus the pause overlay.

use crate::grid::SandGrid;
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// Each grid cell renders as a double-wide glyph, so the field is half the
/// terminal's columns. An odd terminal width leaves one spare column,
/// mirrored from the last cell so the edge doesn't look ragged.
pub fn field_dims_for_terminal(term_cols: u16, term_rows: u16) -> (u32, u32, bool) {
    let width = u32::from(term_cols / 2).max(1);
    let height = u32::from(term_rows).max(1);
    (width, height, term_cols % 2 == 1)
}

const OCCUPIED: &str = "\u{2588}\u{2588}";
const OCCUPIED_EDGE: &str = "\u{2588}";
const EMPTY: &str = "  ";
const EMPTY_EDGE: &str = " ";

/// Draw the whole field. The grid is a read-only snapshot view; the tick's
/// mutation has already completed by the time this runs.
pub fn draw(frame: &mut Frame, grid: &SandGrid, theme: &Theme, extend_edge: bool, paused: bool) {
    let area = frame.area();
    let sand_style = Style::default().fg(theme.sand).bg(theme.bg);
    let empty_style = Style::default().bg(theme.bg);

    let cells = grid.snapshot();
    let w = grid.width() as usize;
    let mut lines = Vec::with_capacity(grid.height() as usize);
    for row in cells.chunks_exact(w) {
        let mut spans = Vec::with_capacity(w + usize::from(extend_edge));
        for &occupied in row {
            spans.push(if occupied {
                Span::styled(OCCUPIED, sand_style)
            } else {
                Span::styled(EMPTY, empty_style)
            });
        }
        if extend_edge {
            let last = *row.last().unwrap_or(&false);
            spans.push(if last {
                Span::styled(OCCUPIED_EDGE, sand_style)
            } else {
                Span::styled(EMPTY_EDGE, empty_style)
            });
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).style(empty_style), area);

    if paused {
        draw_pause_overlay(frame, theme, area);
    }
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let text = " paused — p to resume, q to quit ";
    let w = text.chars().count() as u16;
    let rect = Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height / 2,
        width: w.min(area.width),
        height: 1.min(area.height),
    };
    let style = Style::default().fg(theme.accent).bg(theme.bg);
    frame.render_widget(Paragraph::new(Line::from(Span::styled(text, style))), rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_dims_halve_even_width() {
        assert_eq!(field_dims_for_terminal(80, 24), (40, 24, false));
    }

    #[test]
    fn test_field_dims_odd_width_extends_edge() {
        assert_eq!(field_dims_for_terminal(81, 24), (40, 24, true));
    }

    #[test]
    fn test_field_dims_never_zero() {
        assert_eq!(field_dims_for_terminal(1, 0), (1, 1, true));
        assert_eq!(field_dims_for_terminal(0, 1), (1, 1, false));
    }
}
