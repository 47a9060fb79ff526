//! Rendering for the terminal front-end
//!
//! The grid is drawn from the latest snapshot; the avatar sits on the
//! player's cell and collected cells go empty.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use weaver_core::{GameSnapshot, Mode, SessionPhase, END_WORD};

use crate::app::App;

const CELL_WIDTH: usize = 9;

pub fn draw(frame: &mut Frame, app: &App) {
    let [header, grid, messages, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(8),
        Constraint::Length(8),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_header(frame, header, app);
    draw_grid(frame, grid, app);
    draw_messages(frame, messages, app);
    draw_footer(frame, footer);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let status = match &app.snapshot {
        Some(snapshot) => {
            let mode = match snapshot.mode {
                Mode::Offline => "offline",
                Mode::Online => "online",
            };
            format!(
                "Score: {}   Collected: {}   Mode: {}",
                snapshot.score,
                snapshot.collected.len(),
                mode
            )
        }
        None => "Connecting...".to_string(),
    };
    let paragraph = Paragraph::new(status)
        .block(Block::default().borders(Borders::ALL).title("Spider Web"));
    frame.render_widget(paragraph, area);
}

fn draw_grid(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title("Web");
    let snapshot = match &app.snapshot {
        Some(snapshot) => snapshot,
        None => {
            let paragraph = Paragraph::new("Waiting for the layout server...").block(block);
            frame.render_widget(paragraph, area);
            return;
        }
    };

    if snapshot.phase == SessionPhase::Won {
        frame.render_widget(win_screen(snapshot).block(block), area);
        return;
    }

    let mut lines = Vec::with_capacity(snapshot.rows);
    for row in 0..snapshot.rows {
        let mut spans = Vec::with_capacity(snapshot.cols);
        for col in 0..snapshot.cols {
            let word = snapshot.words[row * snapshot.cols + col].as_deref();
            let is_player = snapshot.player.row == row && snapshot.player.col == col;
            spans.push(cell_span(word, is_player));
        }
        lines.push(Line::from(spans));
        // A blank line between rows keeps the cells readable
        lines.push(Line::from(""));
    }
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn cell_span(word: Option<&str>, is_player: bool) -> Span<'static> {
    let text = match (word, is_player) {
        (Some(word), _) => word,
        (None, true) => "@",
        (None, false) => "\u{00b7}",
    };
    let mut truncated: String = text.chars().take(CELL_WIDTH).collect();
    truncated = format!("{:^width$}", truncated, width = CELL_WIDTH);

    let style = if is_player {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else if word == Some(END_WORD) {
        Style::default().fg(Color::Magenta)
    } else if word.is_some() {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(truncated, style)
}

fn win_screen(snapshot: &GameSnapshot) -> Paragraph<'static> {
    let mut lines = vec![
        Line::from(Span::styled(
            "Congratulations!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Score - {}", snapshot.score)),
        Line::from(format!("Words: {}", snapshot.collected.join(", "))),
    ];
    if snapshot.mode == Mode::Offline {
        lines.push(Line::from(
            "What do these words have in common? Press g to guess.",
        ));
    }
    lines.push(Line::from("Press r to play again."));
    Paragraph::new(lines)
}

fn draw_messages(frame: &mut Frame, area: Rect, app: &App) {
    let width = area.width.saturating_sub(2).max(10) as usize;
    let mut text = String::new();
    for message in &app.messages {
        text.push_str(&textwrap::fill(message, width));
        text.push('\n');
    }
    if let Some(input) = &app.guess_input {
        text.push_str(&format!("Your guess: {}_", input));
    }
    let paragraph =
        Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Messages"));
    frame.render_widget(paragraph, area);
}

fn draw_footer(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(
        "arrows/wasd: move (press twice to confirm)   r: restart   g: guess   q: quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}
