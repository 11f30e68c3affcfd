use crate::app::Session;
use crate::countdown::TickOutcome;
use crate::display::{countdown_text, progress_ratio, window_title};
use crate::form::Field;
use crate::models::{CycleStatus, NewCycle};
use crate::stats::{calculate_stats, cycle_duration};
use crate::utils::{format_ago, format_duration};
use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table},
    Frame, Terminal,
};
use std::io;
use std::time::Duration as StdDuration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub fn run_tui(session: &mut Session, initial: Option<NewCycle>) -> Result<()> {
    if let Some(new_cycle) = initial {
        session.start(new_cycle, Utc::now())?;
    }

    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_loop(&mut terminal, session);

    session.shutdown(Utc::now());

    // restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        SetTitle(crate::display::APP_TITLE)
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "tui loop failed");
        println!("{:?}", err)
    }

    Ok(())
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &mut Session,
) -> Result<()> {
    let mut title_revision = None;
    loop {
        let now = Utc::now();
        if let TickOutcome::Finished(id) = session.tick(now) {
            tracing::debug!(cycle_id = %id, "countdown reached zero");
            print!("\x07");
        }

        let revision = session.store().revision();
        if title_revision != Some(revision) {
            let store = session.store();
            let title = window_title(store.active_cycle(), store.amount_seconds_passed());
            execute!(terminal.backend_mut(), SetTitle(title))?;
            title_revision = Some(revision);
        }

        terminal.draw(|f| draw(f, session, now))?;

        if event::poll(StdDuration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if handle_key(session, key, Utc::now()) == Control::Quit {
                    return Ok(());
                }
            }
        }
    }
}

pub fn handle_key(session: &mut Session, key: KeyEvent, now: DateTime<Utc>) -> Control {
    if key.kind != KeyEventKind::Press {
        return Control::Continue;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Control::Quit;
    }

    // The form is disabled while a cycle runs, so keys act as commands.
    if !session.can_submit() {
        match key.code {
            KeyCode::Char('q') => return Control::Quit,
            KeyCode::Char('i') | KeyCode::Char('x') => {
                session.interrupt(now);
            }
            _ => {}
        }
        return Control::Continue;
    }

    match key.code {
        KeyCode::Esc => return Control::Quit,
        KeyCode::Enter => {
            session.submit(now);
        }
        KeyCode::Tab | KeyCode::BackTab => session.form.toggle_focus(),
        KeyCode::Up => session.form.step_minutes_up(),
        KeyCode::Down => session.form.step_minutes_down(),
        KeyCode::Right if session.form.focus == Field::Task => session.form.next_suggestion(),
        KeyCode::Backspace => session.form.backspace(),
        KeyCode::Char(c) => session.form.input(c),
        _ => {}
    }
    Control::Continue
}

pub fn draw(frame: &mut Frame, session: &Session, now: DateTime<Utc>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(6), // Form
            Constraint::Length(5), // Countdown
            Constraint::Min(0),    // History
            Constraint::Length(3), // Footer
        ])
        .split(frame.size());

    draw_header(frame, chunks[0], session);
    draw_form(frame, chunks[1], session);
    draw_countdown(frame, chunks[2], session);
    draw_history(frame, chunks[3], session, now);
    draw_footer(frame, chunks[4], session);
}

fn draw_header(frame: &mut Frame, area: Rect, session: &Session) {
    let store = session.store();
    let status_text = match store.active_cycle() {
        Some(cycle) => Span::styled(
            format!("FOCUS: {}", cycle.task),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::styled(
            "IDLE",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    };

    let stats = calculate_stats(store.cycles());
    let header_content = Line::from(vec![
        Span::styled(
            " Pomo ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        status_text,
        Span::raw(" | "),
        Span::raw(Local::now().format("%H:%M:%S").to_string()),
        Span::raw(format!(
            " | Finished: {} | Interrupted: {}",
            stats.finished, stats.interrupted
        )),
    ]);

    let header = Paragraph::new(header_content).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn draw_form(frame: &mut Frame, area: Rect, session: &Session) {
    let form = &session.form;
    let enabled = session.can_submit();

    let field_style = |field: Field| {
        if !enabled {
            Style::default().fg(Color::DarkGray)
        } else if form.focus == field {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default()
        }
    };

    let task_text = if form.task.is_empty() {
        "name your task".to_string()
    } else {
        form.task.clone()
    };

    let mut lines = vec![
        Line::from(vec![
            Span::raw("  I will work on  "),
            Span::styled(task_text, field_style(Field::Task)),
            Span::raw("  for  "),
            Span::styled(
                format!("{:>2}", form.minutes_amount),
                field_style(Field::MinutesAmount),
            ),
            Span::raw("  minutes."),
        ]),
        Line::raw(""),
    ];

    if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(
            format!("  {}", err),
            Style::default().fg(Color::Red),
        )));
    } else if enabled && !form.suggestions().is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  Suggestions (Right): {}", form.suggestions().join(", ")),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default()
        .title(Span::styled(
            " NEW CYCLE ",
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_countdown(frame: &mut Frame, area: Rect, session: &Session) {
    let store = session.store();
    let active = store.active_cycle();
    let elapsed = store.amount_seconds_passed();

    let block = Block::default()
        .title(Span::styled(
            " COUNTDOWN ",
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL);
    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner_area);

    let color = if active.is_some() {
        Color::Green
    } else {
        Color::DarkGray
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            countdown_text(active, elapsed),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        rows[0],
    );

    if rows[1].height > 0 {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color))
            .ratio(progress_ratio(active, elapsed));
        frame.render_widget(gauge, rows[1]);
    }
}

fn draw_history(frame: &mut Frame, area: Rect, session: &Session, now: DateTime<Utc>) {
    let rows: Vec<Row> = session
        .store()
        .cycles()
        .iter()
        .rev()
        .map(|cycle| {
            let status = cycle.status();
            let color = match status {
                CycleStatus::Active => Color::Yellow,
                CycleStatus::Interrupted => Color::Red,
                CycleStatus::Finished => Color::Green,
            };
            let ran = cycle_duration(cycle)
                .map(|d| format_duration(d.num_seconds()))
                .unwrap_or_else(|| "-".to_string());
            Row::new(vec![
                Cell::from(cycle.task.clone()),
                Cell::from(format!("{} min", cycle.minutes_amount)),
                Cell::from(ran),
                Cell::from(format_ago(cycle.start_date, now)),
                Cell::from(Span::styled(status.label(), Style::default().fg(color))),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(35),
        Constraint::Percentage(12),
        Constraint::Percentage(15),
        Constraint::Percentage(20),
        Constraint::Percentage(18),
    ];
    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["Task", "Duration", "Ran for", "Started", "Status"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .title(" HISTORY ")
                .borders(Borders::ALL),
        );
    frame.render_widget(table, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, session: &Session) {
    let text = if session.can_submit() {
        "Enter start | Tab switch field | Up/Down minutes | Esc quit"
    } else {
        "'i' interrupt | 'q' quit"
    };
    let help = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use chrono::{Duration, TimeZone};
    use ratatui::backend::TestBackend;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 1, 10, 0, 0).unwrap()
    }

    fn press(session: &mut Session, code: KeyCode, now: DateTime<Utc>) -> Control {
        handle_key(session, KeyEvent::new(code, KeyModifiers::NONE), now)
    }

    fn type_str(session: &mut Session, s: &str) {
        for c in s.chars() {
            press(session, KeyCode::Char(c), t0());
        }
    }

    fn screen(session: &Session, now: DateTime<Utc>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, session, now)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_typing_and_enter_starts_cycle() {
        let mut session = Session::new(&Config::default());
        type_str(&mut session, "Write report");
        press(&mut session, KeyCode::Tab, t0());
        press(&mut session, KeyCode::Down, t0());
        press(&mut session, KeyCode::Enter, t0());

        let active = session.store().active_cycle().unwrap();
        assert_eq!(active.task, "Write report");
        assert_eq!(active.minutes_amount, 20);
    }

    #[test]
    fn test_keys_are_commands_while_active() {
        let mut session = Session::new(&Config::default());
        type_str(&mut session, "a");
        press(&mut session, KeyCode::Enter, t0());

        type_str(&mut session, "bc");
        assert!(session.form.task.is_empty());

        let stop = t0() + Duration::seconds(30);
        assert_eq!(press(&mut session, KeyCode::Char('i'), stop), Control::Continue);
        assert!(session.store().active_cycle().is_none());
        assert_eq!(session.store().cycles()[0].interrupted_date, Some(stop));

        assert_eq!(press(&mut session, KeyCode::Char('q'), t0()), Control::Continue);
        assert_eq!(session.form.task, "q");
    }

    #[test]
    fn test_quit_keys() {
        let mut session = Session::new(&Config::default());
        assert_eq!(press(&mut session, KeyCode::Esc, t0()), Control::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(&mut session, ctrl_c, t0()), Control::Quit);
        assert!(session.form.task.is_empty());
    }

    #[test]
    fn test_draw_idle_shows_placeholder() {
        let session = Session::new(&Config::default());
        let text = screen(&session, t0());
        assert!(text.contains("IDLE"));
        assert!(text.contains("00:00"));
        assert!(text.contains("NEW CYCLE"));
    }

    #[test]
    fn test_draw_active_shows_remaining_and_history() {
        let mut session = Session::new(&Config::default());
        type_str(&mut session, "Write report");
        press(&mut session, KeyCode::Enter, t0());
        session.tick(t0() + Duration::seconds(90));

        let text = screen(&session, t0() + Duration::seconds(90));
        assert!(text.contains("FOCUS: Write report"));
        assert!(text.contains("23:30"));
        assert!(text.contains("In progress"));
    }

    #[test]
    fn test_draw_shows_validation_error() {
        let mut session = Session::new(&Config::default());
        press(&mut session, KeyCode::Enter, t0());
        let text = screen(&session, t0());
        assert!(text.contains("Give your task a name"));
    }
}
