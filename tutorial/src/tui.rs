use std::io;
use std::time::Duration;

use crossterm::{
    event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::warn;
use tutorial_tree::{Element, Event};
use tutorial_view as view;

use crate::Session;

#[derive(Error, Debug)]
pub enum TuiError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("terminal init failed")]
    TerminalInit,

    #[error("failed to enable raw mode")]
    EnableRawMode,
}

/// Interactive host: draws the session and feeds key presses back as clicks.
pub async fn tui(session: Session<'_>) -> Result<(), TuiError> {
    let mut terminal_session = TerminalSession::enter()?;
    let mut event_rx = spawn_crossterm_event_channel();
    let mut app = TuiApp::new(session);

    loop {
        terminal_session
            .terminal
            .draw(|frame| draw_ui(frame, &mut app))?;

        let Some(event) = event_rx.recv().await else {
            break;
        };
        if app.handle_event(event) {
            break;
        }
    }

    Ok(())
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn enter() -> Result<Self, TuiError> {
        enable_raw_mode().map_err(|_| TuiError::EnableRawMode)?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|_| TuiError::TerminalInit)?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|_| TuiError::TerminalInit)?;
        terminal.clear()?;

        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

fn spawn_crossterm_event_channel() -> mpsc::Receiver<CEvent> {
    let (tx, rx) = mpsc::channel(64);
    std::thread::spawn(move || {
        loop {
            let ready = crossterm::event::poll(Duration::from_millis(100)).unwrap_or(false);
            if !ready {
                if tx.is_closed() {
                    break;
                }
                continue;
            }
            if let Ok(evt) = crossterm::event::read() {
                if tx.blocking_send(evt).is_err() {
                    break;
                }
            }
        }
    });
    rx
}

#[derive(Debug, Clone)]
struct Row {
    depth: usize,
    line: view::Line,
    on_click: Option<Event>,
}

fn build_rows(elements: &[Element]) -> Vec<Row> {
    let mut out = Vec::new();
    for element in elements {
        build_rows_rec(element, 0, &mut out);
    }
    out
}

fn build_rows_rec(element: &Element, depth: usize, out: &mut Vec<Row>) {
    out.push(Row {
        depth,
        line: element.line(),
        on_click: element.on_click.clone(),
    });
    for child in &element.children {
        build_rows_rec(child, depth + 1, out);
    }
}

struct TuiApp<'a> {
    session: Session<'a>,
    rows: Vec<Row>,
    list_state: ListState,
    status: Option<String>,
}

impl<'a> TuiApp<'a> {
    fn new(session: Session<'a>) -> Self {
        let mut app = Self {
            session,
            rows: Vec::new(),
            list_state: ListState::default(),
            status: None,
        };
        app.refresh();
        app
    }

    /// Re-render after any state change, keeping the cursor where it was when possible.
    fn refresh(&mut self) {
        self.rows = build_rows(&self.session.render());
        let selected = self
            .list_state
            .selected()
            .filter(|row| self.is_clickable(*row))
            .or_else(|| self.next_clickable(0, 1));
        self.list_state.select(selected);
    }

    fn is_clickable(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .is_some_and(|row| row.on_click.is_some())
    }

    fn next_clickable(&self, from: usize, step: isize) -> Option<usize> {
        let mut row = from as isize;
        while row >= 0 && (row as usize) < self.rows.len() {
            if self.is_clickable(row as usize) {
                return Some(row as usize);
            }
            row += step;
        }
        None
    }

    fn handle_event(&mut self, event: CEvent) -> bool {
        let CEvent::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };
        if modifiers != KeyModifiers::NONE && modifiers != KeyModifiers::SHIFT {
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Enter | KeyCode::Char(' ') => self.click_selected(),
            KeyCode::Tab | KeyCode::Right => self.cycle_version(true),
            KeyCode::BackTab | KeyCode::Left => self.cycle_version(false),
            _ => {}
        }
        false
    }

    fn move_cursor(&mut self, step: isize) {
        let Some(current) = self.list_state.selected() else {
            return;
        };
        let from = current as isize + step;
        if from < 0 {
            return;
        }
        if let Some(next) = self.next_clickable(from as usize, step) {
            self.list_state.select(Some(next));
        }
    }

    fn click_selected(&mut self) {
        let Some(event) = self
            .list_state
            .selected()
            .and_then(|row| self.rows.get(row))
            .and_then(|row| row.on_click.clone())
        else {
            return;
        };
        self.status = match self.session.handle(&event) {
            Ok(()) => None,
            Err(err) => {
                warn!("{err}");
                Some(err.to_string())
            }
        };
        self.refresh();
    }

    fn cycle_version(&mut self, forward: bool) {
        if let Err(err) = self.session.cycle_version(forward) {
            warn!("{err}");
            self.status = Some(err.to_string());
        }
        self.list_state = ListState::default();
        self.refresh();
    }
}

fn draw_ui(frame: &mut ratatui::Frame<'_>, app: &mut TuiApp<'_>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(2),
                Constraint::Min(5),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(frame.area());

    draw_tabs(frame, layout[0], app);
    draw_main(frame, layout[1], app);
    draw_status(frame, layout[2], app);
}

fn draw_tabs(frame: &mut ratatui::Frame<'_>, area: Rect, app: &TuiApp<'_>) {
    let titles = app
        .session
        .versions()
        .iter()
        .map(|version| Line::from(vec![Span::styled(*version, Style::default())]))
        .collect::<Vec<_>>();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::BOTTOM).title("tutorial"))
        .select(app.session.version_index())
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn draw_main(frame: &mut ratatui::Frame<'_>, area: Rect, app: &mut TuiApp<'_>) {
    if app.rows.is_empty() {
        let para = Paragraph::new(Text::from("this version is empty"))
            .block(Block::default().borders(Borders::ALL).title(app.session.version()))
            .alignment(Alignment::Center);
        frame.render_widget(para, area);
        return;
    }

    let items = app
        .rows
        .iter()
        .map(|row| {
            let mut line = to_ratatui_line(&row.line);
            line.spans.insert(0, Span::raw("  ".repeat(row.depth)));
            ListItem::new(line)
        })
        .collect::<Vec<_>>();

    let widget = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(app.session.version()),
        )
        .highlight_symbol("▶ ")
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    frame.render_stateful_widget(widget, area, &mut app.list_state);
}

fn draw_status(frame: &mut ratatui::Frame<'_>, area: Rect, app: &TuiApp<'_>) {
    let hints = "←/→ versions  ↑/↓ move  Enter click  q quit";
    let status = app.status.clone().unwrap_or_default();

    let lines = vec![
        Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray))),
        Line::from(Span::styled(status, Style::default().fg(Color::Red))),
    ];

    let para = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::TOP))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    frame.render_widget(para, area);
}

fn to_ratatui_line(line: &view::Line) -> Line<'static> {
    let base = to_ratatui_style(&line.style);
    let spans = line
        .spans
        .iter()
        .map(|span| Span::styled(span.content.clone(), base.patch(to_ratatui_style(&span.style))))
        .collect::<Vec<_>>();
    Line::from(spans)
}

fn to_ratatui_style(style: &view::TextStyle) -> Style {
    let mut out = Style::default();
    if let Some(color) = style.foreground_color {
        out = out.fg(to_ratatui_color(color));
    }
    if style.is_bold {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.is_dim {
        out = out.add_modifier(Modifier::DIM);
    }
    if style.is_italic {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if style.is_underlined {
        out = out.add_modifier(Modifier::UNDERLINED);
    }
    out
}

fn to_ratatui_color(color: view::Color) -> Color {
    match color {
        view::Color::Black => Color::Black,
        view::Color::Red => Color::Red,
        view::Color::Green => Color::Green,
        view::Color::Yellow => Color::Yellow,
        view::Color::Blue => Color::Blue,
        view::Color::Magenta => Color::Magenta,
        view::Color::Cyan => Color::Cyan,
        view::Color::Gray => Color::Gray,
        view::Color::DarkGray => Color::DarkGray,
        view::Color::White => Color::White,
    }
}
