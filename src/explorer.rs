//! Terminal timeline explorer using ratatui
//!
//! Full-screen interface: the rotating globe rendered as colored half-block
//! cells, the current event's narrated text with word-by-word reveal, the
//! transition year overlay, and the quiz and prediction screens.

use std::error::Error;
use std::io::stdout;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, MouseButton, MouseEvent, MouseEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::engine::Engine;
use crate::globe::{render_globe, Marker};
use crate::quiz::{
    PredictionScenario, PredictionStage, Quiz, QuizPhase, QuizQuestion, QUESTION_SECONDS,
};
use crate::surface::Surface;

/// Which screen the explorer is showing.
#[derive(Clone, Copy, PartialEq)]
enum Screen {
    Timeline,
    Quiz,
    Prediction,
}

struct Explorer {
    engine: Engine,
    surface: Surface,
    screen: Screen,
    quiz: Option<Quiz>,
    prediction: Option<PredictionStage>,
    questions: Vec<QuizQuestion>,
    scenarios: Vec<PredictionScenario>,
    show_help: bool,
    /// Message to display temporarily in the status bar.
    message: Option<String>,
}

impl Explorer {
    fn new(
        engine: Engine,
        surface: Surface,
        questions: Vec<QuizQuestion>,
        scenarios: Vec<PredictionScenario>,
    ) -> Self {
        Explorer {
            engine,
            surface,
            screen: Screen::Timeline,
            quiz: None,
            prediction: None,
            questions,
            scenarios,
            show_help: false,
            message: None,
        }
    }

    fn tick(&mut self, now: f64, dt: f64) {
        self.engine.tick(now, dt);
        if self.screen == Screen::Quiz {
            if let Some(quiz) = &mut self.quiz {
                quiz.tick(now);
                if quiz.is_finished() {
                    self.prediction =
                        Some(PredictionStage::new(self.scenarios.clone(), quiz.score()));
                    self.screen = Screen::Prediction;
                    self.quiz = None;
                }
            }
        }
    }

    fn start_quiz(&mut self, now: f64) {
        if !self.engine.all_visited() {
            let seen = self.engine.visited().iter().filter(|&&v| v).count();
            self.message = Some(format!(
                "Visit all events first ({}/{} seen)",
                seen,
                self.engine.timeline().len()
            ));
            return;
        }
        self.quiz = Some(Quiz::start(self.questions.clone(), now));
        self.screen = Screen::Quiz;
        self.message = None;
    }

    /// Returns true when the app should exit.
    fn handle_key(&mut self, code: KeyCode, now: f64) -> bool {
        match self.screen {
            Screen::Timeline => match code {
                KeyCode::Char('q') | KeyCode::Esc => return true,
                KeyCode::Char('?') => self.show_help = true,
                KeyCode::Left | KeyCode::Char('h') => self.engine.select_prev(now),
                KeyCode::Right | KeyCode::Char('l') => self.engine.select_next(now),
                KeyCode::Char(' ') => self.engine.skip_transition(now),
                KeyCode::Char('n') | KeyCode::Char('N') => {
                    let enabled = !self.engine.narration_enabled();
                    self.engine.set_narration_enabled(enabled, now);
                    self.message =
                        Some(if enabled { "Narration: ON" } else { "Narration: OFF" }.to_string());
                }
                KeyCode::Char('t') | KeyCode::Char('T') => self.start_quiz(now),
                _ => {}
            },
            Screen::Quiz => match code {
                KeyCode::Char('q') => return true,
                KeyCode::Esc => {
                    // Abandon the quiz; no partial score is kept.
                    self.quiz = None;
                    self.screen = Screen::Timeline;
                    self.message = Some("Quiz abandoned".to_string());
                }
                KeyCode::Char(c @ '1'..='9') => {
                    if let Some(quiz) = &mut self.quiz {
                        let choice = c as usize - '1' as usize;
                        quiz.answer(choice, now);
                    }
                }
                _ => {}
            },
            Screen::Prediction => match code {
                KeyCode::Char('q') => return true,
                KeyCode::Esc => {
                    self.screen = Screen::Timeline;
                    self.message = Some("Timeline resumed".to_string());
                }
                KeyCode::Enter => {
                    let complete = self
                        .prediction
                        .as_ref()
                        .map(|p| p.is_complete())
                        .unwrap_or(true);
                    if complete {
                        self.screen = Screen::Timeline;
                        self.message = Some("Timeline resumed".to_string());
                    }
                }
                KeyCode::Char(c @ '1'..='9') => {
                    if let Some(prediction) = &mut self.prediction {
                        prediction.choose(c as usize - '1' as usize);
                    }
                }
                _ => {}
            },
        }
        false
    }

    /// Pointer fallback for the on-screen arrows: left third is previous,
    /// right third is next, the middle skips.
    fn handle_click(&mut self, column: u16, width: u16, now: f64) {
        if self.screen != Screen::Timeline {
            return;
        }
        if column < width / 3 {
            self.engine.select_prev(now);
        } else if column >= width - width / 3 {
            self.engine.select_next(now);
        } else {
            self.engine.skip_transition(now);
        }
    }

    fn render(&mut self, f: &mut Frame, now: f64) {
        let size = f.area();
        match self.screen {
            Screen::Timeline => self.render_timeline(f, size, now),
            Screen::Quiz => self.render_quiz(f, size, now),
            Screen::Prediction => self.render_prediction(f, size),
        }
        if self.show_help {
            self.render_help(f, size);
        }
    }

    fn render_timeline(&mut self, f: &mut Frame, size: Rect, now: f64) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(10),
                Constraint::Length(7),
                Constraint::Length(1),
            ])
            .split(size);

        self.render_globe_cells(chunks[0], f.buffer_mut(), now);
        self.render_year_overlay(chunks[0], f.buffer_mut(), now);
        self.render_event_panel(chunks[1], f.buffer_mut(), now);
        self.render_status(chunks[2], f.buffer_mut(), now);
    }

    /// Draw the globe into the cell grid, two pixels per cell via the
    /// upper-half block.
    fn render_globe_cells(&self, area: Rect, buf: &mut Buffer, now: f64) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let (tilt, spin) = self.engine.orientation();
        let markers: Vec<Marker> = self
            .engine
            .timeline()
            .events()
            .iter()
            .map(|event| Marker {
                longitude_deg: event.longitude,
                latitude_deg: event.latitude,
                color: event.accent_color,
                emphasized: event.index == self.engine.selection().current_index,
            })
            .collect();
        let img = render_globe(
            &self.surface,
            tilt,
            spin,
            &markers,
            self.engine.comets(),
            now,
            area.width as usize,
            area.height as usize * 2,
        );

        for dy in 0..area.height {
            for dx in 0..area.width {
                let top = img.get_pixel(dx as u32, dy as u32 * 2).0;
                let bottom = img.get_pixel(dx as u32, dy as u32 * 2 + 1).0;
                buf.get_mut(area.x + dx, area.y + dy)
                    .set_char('▀')
                    .set_fg(Color::Rgb(top[0], top[1], top[2]))
                    .set_bg(Color::Rgb(bottom[0], bottom[1], bottom[2]));
            }
        }
    }

    /// Interpolated year readout while a transition runs.
    fn render_year_overlay(&self, area: Rect, buf: &mut Buffer, now: f64) {
        let Some(progress) = self.engine.transition_progress(now) else {
            return;
        };
        let year = self.engine.displayed_year(now);
        let label = format!("« {} »", year);
        let x = area.x + (area.width.saturating_sub(label.chars().count() as u16)) / 2;
        let accent = self.engine.current_event().accent_color;
        let style = Style::default()
            .fg(Color::Rgb(accent[0], accent[1], accent[2]))
            .add_modifier(Modifier::BOLD);
        buf.set_string(x, area.y + 1, &label, style);

        let bar_width = 16u16;
        let filled = (progress * bar_width as f64) as u16;
        let bar: String = (0..bar_width)
            .map(|i| if i < filled { '━' } else { '─' })
            .collect();
        let bar_x = area.x + (area.width.saturating_sub(bar_width)) / 2;
        buf.set_string(bar_x, area.y + 2, &bar, Style::default().fg(Color::DarkGray));
    }

    fn render_event_panel(&self, area: Rect, buf: &mut Buffer, now: f64) {
        let event = self.engine.current_event();
        let accent = Color::Rgb(
            event.accent_color[0],
            event.accent_color[1],
            event.accent_color[2],
        );
        let title = format!(" {} · {} · {} ", event.year, event.title, event.location);

        let mut lines: Vec<Line> = Vec::new();
        if self.engine.is_transitioning() {
            lines.push(Line::from(Span::styled(
                "· · ·",
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            let narrator = self.engine.narrator();
            let active = narrator.active_sentence();
            let blink_on = ((now * 2.5) as u64) % 2 == 0;
            for (i, sentence) in narrator.sentences().iter().enumerate() {
                if sentence.revealed_words == 0 && active != Some(i) {
                    continue;
                }
                let mut text = sentence.revealed_text();
                if !sentence.is_fully_revealed() && active == Some(i) && blink_on {
                    text.push('▌');
                }
                lines.push(Line::from(text));
            }
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default().borders(Borders::ALL).title(Span::styled(
                title,
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            )),
        );
        paragraph.render(area, buf);
    }

    fn render_status(&mut self, area: Rect, buf: &mut Buffer, now: f64) {
        let (index, total) = (
            self.engine.selection().current_index + 1,
            self.engine.timeline().len(),
        );
        let narration = if self.engine.narration_enabled() { "On" } else { "Off" };
        // Voice meter driven by mouth openness while speaking.
        let voice = if self.engine.is_speaking() {
            let levels = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
            let level = (self.engine.mouth_openness(now) * 7.0) as usize;
            format!(" ♪{}", levels[level.min(7)])
        } else {
            String::new()
        };
        let quiz_hint = if self.engine.all_visited() { "  T:Quiz" } else { "" };
        let msg = self
            .message
            .as_ref()
            .map(|m| format!(" | {}", m))
            .unwrap_or_default();

        let status = format!(
            " {} ({}/{}) | Narration:{}{}{} | ←/→:Navigate  Space:Skip  N:Narration{}  ?:Help  Q:Quit",
            self.engine.displayed_year(now),
            index,
            total,
            narration,
            voice,
            msg,
            quiz_hint,
        );
        buf.set_string(
            area.x,
            area.y,
            status,
            Style::default().fg(Color::Gray).bg(Color::Rgb(24, 24, 32)),
        );
    }

    fn render_quiz(&self, f: &mut Frame, size: Rect, now: f64) {
        let Some(quiz) = &self.quiz else {
            return;
        };
        let (number, total) = quiz.question_number();
        let question = quiz.current_question();

        let mut lines: Vec<Line> = vec![
            Line::from(Span::styled(
                question.prompt.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (i, choice) in question.choices.iter().enumerate() {
            let style = match quiz.phase() {
                QuizPhase::Revealed { .. } if i == question.answer => {
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
                }
                QuizPhase::Revealed { .. } if quiz.locked_choice() == Some(i) => {
                    Style::default().fg(Color::Red)
                }
                _ => Style::default(),
            };
            lines.push(Line::from(Span::styled(
                format!("  {}. {}", i + 1, choice),
                style,
            )));
        }
        lines.push(Line::from(""));

        match quiz.phase() {
            QuizPhase::Asking => {
                let remaining = quiz.seconds_remaining(now);
                let width = 24usize;
                let filled = ((remaining as f64 / QUESTION_SECONDS) * width as f64) as usize;
                let bar: String = (0..width)
                    .map(|i| if i < filled { '█' } else { '░' })
                    .collect();
                lines.push(Line::from(format!("  Time: {:>2}s  {}", remaining, bar)));
            }
            QuizPhase::Revealed { awarded, timed_out } => {
                let verdict = if timed_out {
                    "Time's up! +0 points".to_string()
                } else if awarded > 0 {
                    format!("Correct! +{} points", awarded)
                } else {
                    "Not quite. +0 points".to_string()
                };
                lines.push(Line::from(Span::styled(
                    format!("  {}", verdict),
                    Style::default().add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(format!("  {}", question.explanation)));
            }
            QuizPhase::Finished => {}
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  Score: {}", quiz.score()),
            Style::default().fg(Color::Yellow),
        )));

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Quiz — question {}/{} ", number, total));
        let inner = centered_rect(size, 64, 16);
        f.render_widget(Clear, inner);
        f.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
            inner,
        );
    }

    fn render_prediction(&self, f: &mut Frame, size: Rect) {
        let Some(prediction) = &self.prediction else {
            return;
        };
        let mut lines: Vec<Line> = vec![
            Line::from(Span::styled(
                format!("Final score: {} points", prediction.quiz_score()),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        if let Some(scenario) = prediction.current_scenario() {
            lines.push(Line::from(Span::styled(
                scenario.prompt.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            for (i, option) in scenario.options.iter().enumerate() {
                lines.push(Line::from(format!("  {}. {}", i + 1, option)));
            }
        } else {
            lines.push(Line::from("Your predictions are in:"));
            lines.push(Line::from(""));
            for (scenario, choice) in prediction.scenarios().iter().zip(prediction.choices()) {
                let picked = choice
                    .and_then(|c| scenario.options.get(c))
                    .map(|o| o.as_str())
                    .unwrap_or("(no answer)");
                lines.push(Line::from(format!("  {} — {}", scenario.prompt, picked)));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "  Enter: back to the timeline",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let inner = centered_rect(size, 68, 18);
        f.render_widget(Clear, inner);
        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title(" Predictions ")),
            inner,
        );
    }

    fn render_help(&self, f: &mut Frame, size: Rect) {
        let lines = vec![
            Line::from("  ←/→      previous / next event"),
            Line::from("  Space    skip the travel effect"),
            Line::from("  N        toggle narration"),
            Line::from("  T        start the quiz (after all events)"),
            Line::from("  click    left/right thirds navigate, middle skips"),
            Line::from("  Q/Esc    quit"),
            Line::from(""),
            Line::from("  any key closes this help"),
        ];
        let inner = centered_rect(size, 52, 12);
        f.render_widget(Clear, inner);
        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Help ")),
            inner,
        );
    }
}

fn centered_rect(size: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(size.width);
    let height = height.min(size.height);
    Rect {
        x: size.x + (size.width - width) / 2,
        y: size.y + (size.height - height) / 2,
        width,
        height,
    }
}

/// Run the terminal explorer until the user quits.
pub fn run_explorer(
    engine: Engine,
    surface: Surface,
    questions: Vec<QuizQuestion>,
    scenarios: Vec<PredictionScenario>,
) -> Result<(), Box<dyn Error>> {
    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut explorer = Explorer::new(engine, surface, questions, scenarios);
    let started = Instant::now();
    let mut last_now = 0.0;

    loop {
        let now = started.elapsed().as_secs_f64();
        let dt = now - last_now;
        last_now = now;

        explorer.tick(now, dt);
        terminal.draw(|f| explorer.render(f, now))?;

        if event::poll(Duration::from_millis(33))? {
            match event::read()? {
                Event::Key(key) => {
                    if explorer.show_help {
                        explorer.show_help = false;
                        continue;
                    }
                    if explorer.handle_key(key.code, started.elapsed().as_secs_f64()) {
                        break;
                    }
                }
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    column,
                    ..
                }) => {
                    let size = terminal.size()?;
                    explorer.handle_click(column, size.width, started.elapsed().as_secs_f64());
                }
                _ => {}
            }
        }
    }

    explorer.engine.teardown();

    // Cleanup
    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    Ok(())
}
