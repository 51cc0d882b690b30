//! Stateless UI rendering.

use crate::app::BoardView;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tictactoe_engine::{GameMode, Player, Position, Square};

const CELL_WIDTH: u16 = 9;
const BOARD_WIDTH: u16 = CELL_WIDTH * 3 + 2;
const BOARD_HEIGHT: u16 = 3 * 3 + 2;

/// Renders the whole screen.
pub fn draw(frame: &mut Frame, view: &BoardView, cursor: Position, mode: GameMode) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Title
            Constraint::Min(BOARD_HEIGHT),
            Constraint::Length(3),  // Status
            Constraint::Length(2),  // Help
        ])
        .split(frame.area());

    let mode_label = match mode {
        GameMode::TwoPlayers => "Two players",
        GameMode::VsComputer => "Vs computer",
    };
    let title = Paragraph::new(format!("Tic Tac Toe ({mode_label})"))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    draw_board(frame, chunks[1], view, cursor);

    let mut status = view.status.clone();
    if view.thinking {
        status.push_str(" (computer is thinking)");
    }
    if let Some(notice) = &view.notice {
        status = format!("{status} | {notice}");
    }
    let status = Paragraph::new(status)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[2]);

    let help = Paragraph::new("arrows move  enter/space/1-9 place  m mode  r restart  q quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[3]);
}

fn draw_board(frame: &mut Frame, area: Rect, view: &BoardView, cursor: Position) {
    let board_area = center_rect(area, BOARD_WIDTH, BOARD_HEIGHT);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(board_area);

    for (row, positions) in Position::ALL.chunks(3).enumerate() {
        draw_row(frame, rows[row * 2], view, cursor, positions);
        if row < 2 {
            let sep = Paragraph::new("─".repeat(BOARD_WIDTH as usize))
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(sep, rows[row * 2 + 1]);
        }
    }
}

fn draw_row(frame: &mut Frame, area: Rect, view: &BoardView, cursor: Position, positions: &[Position]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(CELL_WIDTH),
            Constraint::Length(1),
            Constraint::Length(CELL_WIDTH),
            Constraint::Length(1),
            Constraint::Length(CELL_WIDTH),
        ])
        .split(area);

    for (i, &pos) in positions.iter().enumerate() {
        draw_cell(frame, cols[i * 2], view, cursor, pos);
        if i < 2 {
            let sep = Paragraph::new(vec![Line::from("│"); 3])
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(sep, cols[i * 2 + 1]);
        }
    }
}

fn draw_cell(frame: &mut Frame, area: Rect, view: &BoardView, cursor: Position, pos: Position) {
    let (symbol, mut style) = match view.board.get(pos) {
        Square::Empty => (
            (pos.to_index() + 1).to_string(),
            Style::default().fg(Color::DarkGray),
        ),
        Square::Occupied(Player::X) => (
            "X".to_string(),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
        Square::Occupied(Player::O) => (
            "O".to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    };

    if view.highlight.is_some_and(|line| line.contains(pos)) {
        style = style.bg(Color::Green).fg(Color::Black);
    }
    if pos == cursor {
        style = style.bg(Color::White).fg(Color::Black);
    }

    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(format!(" {symbol} "), style)),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(area.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vert[1])[1]
}
