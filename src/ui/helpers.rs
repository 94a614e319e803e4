use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::BoatRecord;

/// Show an empty value as a dash so card rows keep their shape.
fn or_dash(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        "-"
    } else {
        trimmed
    }
}

/// Text lines for one record card in the list.
pub(crate) fn build_boat_card_lines(boat: &BoatRecord, selected: bool) -> Vec<Line<'static>> {
    let details = &boat.details;
    let label_style = Style::default().fg(Color::Gray);
    let heading = if selected {
        format!("▶ {}", or_dash(&details.owner_name))
    } else {
        or_dash(&details.owner_name).to_string()
    };

    vec![
        Line::from(vec![
            Span::styled(heading, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("  ({})", or_dash(&details.boat_name)),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        Line::from(Span::styled(
            or_dash(&details.owner_address).to_string(),
            label_style,
        )),
        Line::from(format!(
            "Builder: {}  Year: {}  Engine: {}  HP: {}",
            or_dash(&details.boat_builder),
            or_dash(&details.year_of_build),
            or_dash(&details.engine_make),
            or_dash(&details.horse_power),
        )),
        Line::from(format!(
            "RL: {}  RB: {}  RD: {}  TL: {}",
            or_dash(&details.register_length),
            or_dash(&details.register_breadth),
            or_dash(&details.register_depth),
            or_dash(&details.tonnage_length),
        )),
        Line::from(Span::styled(
            format!(
                "Created {}  Updated {}",
                or_dash(&boat.created_at),
                or_dash(&boat.updated_at)
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

/// First visible index so that `selected` stays inside a window of
/// `capacity` rows out of `len`.
pub(crate) fn scroll_start(selected: usize, capacity: usize, len: usize) -> usize {
    let capacity = capacity.max(1);
    let mut start = if selected >= capacity {
        selected + 1 - capacity
    } else {
        0
    };
    if start + capacity > len {
        start = len.saturating_sub(capacity);
    }
    start
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn scroll_window_tracks_selection() {
        assert_eq!(scroll_start(0, 3, 10), 0);
        assert_eq!(scroll_start(2, 3, 10), 0);
        assert_eq!(scroll_start(5, 3, 10), 3);
        assert_eq!(scroll_start(9, 3, 10), 7);
        assert_eq!(scroll_start(1, 5, 2), 0);
    }

    #[test]
    fn card_marks_selection_and_blanks() {
        let mut boat = BoatRecord::seed();
        boat.details.horse_power.clear();
        let lines = build_boat_card_lines(&boat, true);
        assert_eq!(lines.len(), 5);
        assert!(lines[0].to_string().starts_with("▶ John Oliver G. Virola"));
        assert!(lines[2].to_string().ends_with("HP: -"));
    }

    #[test]
    fn surface_error_reports_root_cause() {
        let err = Err::<(), _>(std::io::Error::other("disk full"))
            .context("failed to export")
            .unwrap_err();
        assert_eq!(surface_error(&err), "disk full");
    }

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(60, 50, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 20);
        assert_eq!(popup.x, 20);
        assert_eq!(popup.y, 10);
    }
}
