//! Stateless UI rendering for the offline board.

use super::app::App;
use block_four_rules::{Cell, Player, Position, SIDE};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const CELL_WIDTH: u16 = 4;

/// Renders the board, the supplies and the status line.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(9),    // Board
            Constraint::Length(3), // Status
            Constraint::Length(3), // Help
        ])
        .split(frame.area());

    let title = Paragraph::new("Block Four")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    draw_board(frame, chunks[1], app);

    let supply = app.game().supply();
    let status = Paragraph::new(app.status_message())
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Red {} | Blue {}", supply.red(), supply.blue())),
        );
    frame.render_widget(status, chunks[2]);

    let help = Paragraph::new("Arrows: Move | Enter: Place | U: Undo | R: Restart | Q: Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[3]);
}

fn draw_board(frame: &mut Frame, area: Rect, app: &App) {
    let side = SIDE as u16;
    let board_area = center_rect(area, side * CELL_WIDTH + 2, side + 2);
    let legal = app.game().legal_positions();

    let lines: Vec<Line> = (0..SIDE)
        .map(|row| {
            let spans: Vec<Span> = (0..SIDE)
                .filter_map(|col| Position::from_row_col(row, col))
                .map(|pos| cell_span(app, pos, legal.contains(&pos)))
                .collect();
            Line::from(spans)
        })
        .collect();

    let board = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(board, board_area);
}

fn cell_span(app: &App, pos: Position, legal: bool) -> Span<'static> {
    let (symbol, base_style) = match app.game().board().get(pos) {
        Cell::Occupied(Player::Red) => (
            " ●  ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Cell::Occupied(Player::Blue) => (
            " ●  ",
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
        Cell::Empty if legal => (" ·  ", Style::default().fg(Color::Green)),
        Cell::Empty => (" ·  ", Style::default().fg(Color::DarkGray)),
    };

    let style = if pos == app.cursor() {
        base_style.bg(Color::White).fg(Color::Black)
    } else {
        base_style
    };
    Span::styled(symbol, style)
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vert[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn test_draw_shows_status_and_supply() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let app = App::new();
        terminal.draw(|f| draw(f, &app)).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Block Four"));
        assert!(text.contains("Red 23 | Blue 24"));
        assert!(text.contains("RED places the center block"));
    }

    #[test]
    fn test_center_rect_fits() {
        let rect = center_rect(Rect::new(0, 0, 80, 20), 30, 9);
        assert_eq!((rect.width, rect.height), (30, 9));
        assert_eq!(rect.x, 25);
    }
}
