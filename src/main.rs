mod app;
mod config;
mod deck;
mod event;
mod logging;
mod session;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use app::{App, AppScreen};
use config::Config;
use deck::LessonRef;
use deck::loader;
use event::{AppEvent, EventHandler};
use session::controller::Timings;
use session::selector::{PracticeMode, PreviewDirection};
use session::state::Verdict;
use ui::components::deck_preview::DeckPreview;
use ui::components::flashcard::Flashcard;
use ui::components::menu::ModeMenu;
use ui::components::progress_bar::ProgressBar;
use ui::components::report::ReportView;
use ui::layout::{REVIEW_HINTS, ReviewLayout, contains, pack_hint_lines};
use ui::motion;

#[derive(Parser)]
#[command(name = "deckr", version, about = "Terminal flashcard trainer")]
struct Cli {
    #[arg(short, long, help = "Practice a deck from a JSON file")]
    deck: Option<PathBuf>,

    #[arg(short, long, help = "Fetch the deck from a URL")]
    url: Option<String>,

    #[arg(short, long, help = "Practice a bundled deck by name")]
    bundled: Option<String>,

    #[arg(long, help = "Title shown during the session")]
    title: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Shuffle the deck when it is loaded")]
    shuffle: bool,

    #[arg(long, help = "Skip the loading pause and card animations")]
    no_delay: bool,

    #[arg(long, help = "List available decks and exit")]
    list: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if cli.shuffle {
        config.shuffle = true;
    }

    let lessons = lessons_for(&cli.deck, &cli.url, &cli.bundled, &config);
    if cli.list {
        for lesson in &lessons {
            println!("{lesson}");
        }
        return Ok(());
    }

    if let Err(err) = logging::init(&config.log_level) {
        eprintln!("warning: {err}");
    }

    let timings = if cli.no_delay {
        Timings::instant()
    } else {
        config.timings()
    };

    let mut app = App::new(config, lessons, timings);
    app.title_override = cli.title;

    enable_raw_mode()?;
    let (result, restored) = with_restore(|| run_terminal(&mut app), restore_terminal);

    if let Err(err) = result {
        tracing::error!(error = ?err, "deckr exited with an error");
        eprintln!("Error: {err:?}");
    }

    restored
}

fn run_terminal(app: &mut App) -> Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(33));

    run_app(&mut terminal, app, &events)
}

/// Undoes raw mode, mouse capture and the alternate screen. Valid after a
/// partial setup too.
fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(
        io::stdout(),
        DisableMouseCapture,
        LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;
    Ok(())
}

/// Runs `body`, then `restore` no matter how `body` ended.
fn with_restore<T>(
    body: impl FnOnce() -> Result<T>,
    restore: impl FnOnce() -> Result<()>,
) -> (Result<T>, Result<()>) {
    let result = body();
    (result, restore())
}

/// An explicit CLI source leads, followed by bundled decks and the user's
/// decks dir. Otherwise the configured default deck leads if it exists.
fn lessons_for(
    deck: &Option<PathBuf>,
    url: &Option<String>,
    bundled: &Option<String>,
    config: &Config,
) -> Vec<LessonRef> {
    let mut lessons = loader::available_lessons(&config.decks_dir());

    let explicit = deck
        .clone()
        .map(LessonRef::File)
        .or_else(|| url.clone().map(LessonRef::Url))
        .or_else(|| bundled.clone().map(LessonRef::Bundled));

    match explicit {
        Some(lesson) => {
            lessons.retain(|l| *l != lesson);
            lessons.insert(0, lesson);
        }
        None => {
            let default = LessonRef::Bundled(config.default_deck.clone());
            if let Some(idx) = lessons.iter().position(|l| *l == default) {
                lessons[..=idx].rotate_right(1);
            }
        }
    }
    lessons
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        let size = terminal.size()?;
        app.viewport = Rect::new(0, 0, size.width, size.height);
        let now = Instant::now();
        app.tick(now);
        terminal.draw(|frame| render(frame, app, now))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
            AppEvent::Tick | AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    let now = Instant::now();
    match app.screen {
        AppScreen::Selector => handle_selector_key(app, key, now),
        AppScreen::Review => handle_review_key(app, key, now),
        AppScreen::Report => handle_report_key(app, key, now),
    }
}

fn handle_selector_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Left | KeyCode::Char('h') => app.preview(PreviewDirection::Previous),
        KeyCode::Right | KeyCode::Char('l') => app.preview(PreviewDirection::Next),
        KeyCode::Up | KeyCode::Char('k') => app.selector.prev_mode(),
        KeyCode::Down | KeyCode::Char('j') => app.selector.next_mode(),
        KeyCode::Char('[') => app.cycle_lesson(false),
        KeyCode::Char(']') => app.cycle_lesson(true),
        KeyCode::Char('r') => app.retry_load(),
        KeyCode::Char('t') => app.cycle_theme(),
        KeyCode::Enter => {
            let mode = app.selector.selected_mode();
            app.launch(mode, now);
        }
        KeyCode::Char(ch) => {
            if let Some(mode) = PracticeMode::ALL.iter().find(|m| m.key() == ch) {
                app.launch(*mode, now);
            }
        }
        _ => {}
    }
}

fn handle_review_key(app: &mut App, key: KeyEvent, now: Instant) {
    if key.code == KeyCode::Esc {
        app.leave_review();
        return;
    }
    if app.review.as_ref().is_some_and(|r| r.is_loading()) {
        app.skip_loading(now);
        return;
    }
    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => app.flip(now),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('y') => app.judge(Verdict::Correct, now),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('n') => app.judge(Verdict::Wrong, now),
        _ => {}
    }
}

fn handle_report_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Char('r') => app.restart(now),
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => app.exit_report(),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.screen != AppScreen::Review {
        return;
    }
    let now = Instant::now();
    let layout = app.review_layout();
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if contains(layout.card, mouse.column, mouse.row) {
                app.drag_start(mouse.column);
            } else if contains(layout.wrong_button, mouse.column, mouse.row) {
                app.judge(Verdict::Wrong, now);
            } else if contains(layout.correct_button, mouse.column, mouse.row) {
                app.judge(Verdict::Correct, now);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => app.drag_move(mouse.column),
        MouseEventKind::Up(MouseButton::Left) => app.drag_release(mouse.column, now),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App, now: Instant) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Selector => render_selector(frame, app),
        AppScreen::Review => render_review(frame, app, now),
        AppScreen::Report => render_report(frame, app),
    }
}

fn header_line<'a>(app: &App, info: String) -> Paragraph<'a> {
    let colors = &app.theme.colors;
    Paragraph::new(Line::from(vec![
        Span::styled(
            " deckr ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info,
            Style::default()
                .fg(colors.text_muted())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()))
}

fn render_selector(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
            Constraint::Length(2),
        ])
        .split(area);

    let lesson_count = app.selector.lessons().len();
    let info = match app.selector.deck() {
        Some(deck) => format!(" {} | {} cards | {lesson_count} lessons", deck.title, deck.len()),
        None => format!(" {lesson_count} lessons"),
    };
    frame.render_widget(header_line(app, info), layout[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(layout[1]);
    frame.render_widget(DeckPreview::new(&app.selector, app.theme), body[0]);
    frame.render_widget(
        ModeMenu::new(app.selector.mode_selected, app.selector.can_launch(), app.theme),
        body[1],
    );

    if let Some(notice) = &app.notice {
        let notice = Paragraph::new(Line::from(Span::styled(
            format!("  {notice}"),
            Style::default().fg(colors.warning()),
        )));
        frame.render_widget(notice, layout[2]);
    }

    let hints = pack_hint_lines(
        &[
            "[\u{2190}/\u{2192}] Preview",
            "[1-3/Enter] Start",
            "[ [ / ] ] Lesson",
            "[r] Reload",
            "[t] Theme",
            "[q] Quit",
        ],
        layout[3].width as usize,
    );
    let footer = Paragraph::new(
        hints
            .into_iter()
            .map(|h| Line::from(Span::styled(h, Style::default().fg(colors.text_muted()))))
            .collect::<Vec<_>>(),
    );
    frame.render_widget(footer, layout[3]);
}

fn render_review(frame: &mut ratatui::Frame, app: &App, now: Instant) {
    let Some(review) = app.review.as_ref() else {
        return;
    };
    let colors = &app.theme.colors;
    let layout = ReviewLayout::new(frame.area());
    let timings = review.timings();

    let info = match review.state() {
        Some(state) => format!(
            " {} | \u{2713} {}  \u{2717} {} | {}%",
            review.title(),
            state.correct,
            state.wrong,
            state.accuracy()
        ),
        None => format!(" {}", review.title()),
    };
    frame.render_widget(header_line(app, info), layout.header);

    if review.is_loading() {
        let bar = ProgressBar::new("Preparing deck", review.loading_progress(now), app.theme)
            .caption(format!("{} cards", review.deck().len()));
        frame.render_widget(bar, layout.progress);
        let waiting = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                review.title().to_string(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Get ready... (any key to start)",
                Style::default().fg(colors.text_muted()),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(waiting, layout.card);
        return;
    }

    let (Some(state), Some(card)) = (review.state(), review.current_card()) else {
        return;
    };
    let total = review.deck().len();

    let fill = motion::progress_fill(review.last_transition(), review.progress(), timings, now);
    let progress = ProgressBar::new("Progress", fill, app.theme)
        .caption(format!("{} / {total}", state.judged()));
    frame.render_widget(progress, layout.progress);

    let card_motion = motion::card_motion(review.last_transition(), timings, now, layout.card.width);
    let drag = review.is_dragging().then(|| review.drag_offset());
    let stage = Rect::new(
        frame.area().x,
        layout.card.y,
        frame.area().width,
        layout.card.height,
    );
    let flashcard = Flashcard::new(card, state.face, layout.card, app.theme)
        .motion(card_motion)
        .dragging(drag)
        .position(state.cursor, total);
    frame.render_widget(flashcard, stage);

    let wrong = Paragraph::new(Line::from("\u{2717} Missed"))
        .alignment(Alignment::Center)
        .block(Block::bordered().border_style(Style::default().fg(colors.error())))
        .style(Style::default().fg(colors.error()));
    frame.render_widget(wrong, layout.wrong_button);
    let correct = Paragraph::new(Line::from("Knew \u{2713}"))
        .alignment(Alignment::Center)
        .block(Block::bordered().border_style(Style::default().fg(colors.success())))
        .style(Style::default().fg(colors.success()));
    frame.render_widget(correct, layout.correct_button);

    let hints = pack_hint_lines(&REVIEW_HINTS, layout.footer.width as usize);
    let footer = Paragraph::new(
        hints
            .into_iter()
            .map(|h| Line::from(Span::styled(h, Style::default().fg(colors.text_muted()))))
            .collect::<Vec<_>>(),
    );
    frame.render_widget(footer, layout.footer);
}

fn render_report(frame: &mut ratatui::Frame, app: &App) {
    if let Some(report) = app.report.as_ref() {
        let centered = ui::layout::centered_rect(60, 60, frame.area());
        frame.render_widget(ReportView::new(report, app.theme), centered);
    }
}
