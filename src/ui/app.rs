use std::mem;

use anyhow::Result;
use chrono::Local;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, Wrap,
};
use ratatui::Frame;
use tracing::{info, warn};

use crate::engine::{EngineError, Registrar, ShutdownReport};
use crate::store::{save_registrar, DataPaths};

use super::forms::{FormKind, InputForm};
use super::helpers::{centered_rect, format_timestamp, surface_error};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Width of the command menu column.
const MENU_WIDTH: u16 = 34;

/// Commands offered on the main menu, in display order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MenuItem {
    AddCourse,
    AddStudent,
    Enroll,
    ProcessEnrollment,
    SortCourses,
    FindByPriority,
    Undo,
    Exit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 8] = [
        MenuItem::AddCourse,
        MenuItem::AddStudent,
        MenuItem::Enroll,
        MenuItem::ProcessEnrollment,
        MenuItem::SortCourses,
        MenuItem::FindByPriority,
        MenuItem::Undo,
        MenuItem::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::AddCourse => "Add Course",
            MenuItem::AddStudent => "Add Student",
            MenuItem::Enroll => "Enroll Student in Course",
            MenuItem::ProcessEnrollment => "Process Enrollment",
            MenuItem::SortCourses => "Sort Courses by Priority",
            MenuItem::FindByPriority => "Find Course by Priority",
            MenuItem::Undo => "Undo Last Action",
            MenuItem::Exit => "Exit",
        }
    }
}

/// Whether the menu has focus or a form is open on top of it.
enum Mode {
    Normal,
    Form(InputForm),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state: the registrar plus menu and form state.
pub struct App {
    registrar: Registrar,
    selected: usize,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(registrar: Registrar) -> Self {
        Self {
            registrar,
            selected: 0,
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn registrar(&self) -> &Registrar {
        &self.registrar
    }

    pub fn selected(&self) -> MenuItem {
        MenuItem::ALL[self.selected]
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    pub fn is_form_open(&self) -> bool {
        matches!(self.mode, Mode::Form(_))
    }

    /// Save the catalog and roster, then tear the registrar down.
    pub fn finish(self, paths: &DataPaths) -> Result<ShutdownReport> {
        save_registrar(paths, &self.registrar)?;
        Ok(self.registrar.shutdown())
    }

    /// Feed one key press through the state machine. Returns `Ok(true)` once
    /// the user asks to exit. Only fatal kernel errors come back as `Err`.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_menu_key(code, &mut exit)?,
            Mode::Form(form) => self.handle_form_key(code, form)?,
        };

        Ok(exit)
    }

    fn handle_menu_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => self.move_selection(1),
            KeyCode::Char(ch @ '1'..='8') => {
                self.selected = ch as usize - '1' as usize;
                return self.run_command(self.selected(), exit);
            }
            KeyCode::Enter => return self.run_command(self.selected(), exit),
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn move_selection(&mut self, offset: isize) {
        let total = MenuItem::ALL.len() as isize;
        self.selected = (self.selected as isize + offset).rem_euclid(total) as usize;
    }

    fn run_command(&mut self, item: MenuItem, exit: &mut bool) -> Result<Mode> {
        self.clear_status();
        match item {
            MenuItem::AddCourse => return Ok(Mode::Form(InputForm::new(FormKind::AddCourse))),
            MenuItem::AddStudent => return Ok(Mode::Form(InputForm::new(FormKind::AddStudent))),
            MenuItem::Enroll => return Ok(Mode::Form(InputForm::new(FormKind::Enroll))),
            MenuItem::FindByPriority => {
                return Ok(Mode::Form(InputForm::new(FormKind::FindByPriority)))
            }
            MenuItem::ProcessEnrollment => self.process_enrollment()?,
            MenuItem::SortCourses => {
                self.registrar.sort_courses();
                self.set_status("Courses sorted by priority.", StatusKind::Info);
            }
            MenuItem::Undo => match self.registrar.undo() {
                Some(entry) => self.set_status(format!("Undo: {entry}"), StatusKind::Info),
                None => self.set_status("No action to undo.", StatusKind::Info),
            },
            MenuItem::Exit => *exit = true,
        }
        Ok(Mode::Normal)
    }

    fn process_enrollment(&mut self) -> Result<()> {
        match self.registrar.process_next() {
            Ok(processed) => {
                let message = format!(
                    "Processed: {} in {} (requested {}).",
                    processed.enrollment.student.name,
                    processed.course.name,
                    format_timestamp(&processed.enrollment.requested_at)
                );
                self.set_status(message, StatusKind::Info);
            }
            Err(EngineError::EmptyQueue) => {
                self.set_status("Nothing to process.", StatusKind::Info);
            }
            Err(err) => self.report(err)?,
        }
        Ok(())
    }

    fn handle_form_key(&mut self, code: KeyCode, mut form: InputForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status(
                    format!("{} cancelled.", form.kind.title()),
                    StatusKind::Info,
                );
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.submit_form(&form) {
                Ok(Ok(message)) => {
                    self.set_status(message, StatusKind::Info);
                    keep_open = false;
                }
                Ok(Err(message)) => {
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
                Err(fatal) => return Err(fatal),
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::Form(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    /// Run the command behind `form`. The outer `Result` carries fatal
    /// errors only; the inner one is the success or failure message.
    fn submit_form(&mut self, form: &InputForm) -> Result<Result<String, String>> {
        let outcome = match form.kind {
            FormKind::AddCourse => {
                let (name, duration, priority) = match form.parse_course() {
                    Ok(values) => values,
                    Err(err) => return Ok(Err(surface_error(&err))),
                };
                self.registrar
                    .add_course(&name, duration, priority)
                    .map(|idx| {
                        format!("Course {} added.", self.registrar.courses()[idx].name)
                    })
            }
            FormKind::AddStudent => {
                let (name, id) = match form.parse_student() {
                    Ok(values) => values,
                    Err(err) => return Ok(Err(surface_error(&err))),
                };
                self.registrar
                    .add_student(&name, id)
                    .map(|idx| format!("Student {} added.", self.registrar.students()[idx]))
            }
            FormKind::Enroll => {
                let (student_id, course) = match form.parse_enrollment() {
                    Ok(values) => values,
                    Err(err) => return Ok(Err(surface_error(&err))),
                };
                self.registrar
                    .enroll(student_id, &course, Local::now())
                    .map(|pending| format!("Enrollment queued ({pending} pending)."))
            }
            FormKind::FindByPriority => {
                let priority = match form.parse_priority() {
                    Ok(value) => value,
                    Err(err) => return Ok(Err(surface_error(&err))),
                };
                self.registrar
                    .find_course_by_priority(priority)
                    .map(|idx| {
                        let course = &self.registrar.courses()[idx];
                        format!(
                            "Course found: {}, duration {} hours.",
                            course.name, course.duration
                        )
                    })
            }
        };

        match outcome {
            Ok(message) => Ok(Ok(message)),
            Err(err) if err.is_fatal() => Err(err.into()),
            Err(err) => Ok(Err(err.to_string())),
        }
    }

    /// Show a recoverable kernel error, or hand a fatal one back to the loop.
    fn report(&mut self, err: EngineError) -> Result<()> {
        if err.is_fatal() {
            return Err(err.into());
        }
        warn!(error = %err, "command failed");
        self.set_status(err.to_string(), StatusKind::Error);
        Ok(())
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(MENU_WIDTH), Constraint::Min(0)])
            .split(content_area);

        self.draw_menu(frame, columns[0]);
        self.draw_registers(frame, columns[1]);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        if let Mode::Form(form) = &self.mode {
            self.draw_form(frame, area, form);
        }
    }

    fn draw_menu(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = MenuItem::ALL
            .iter()
            .enumerate()
            .map(|(idx, item)| ListItem::new(format!("{}. {}", idx + 1, item.label())))
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title("Course Management")
                    .borders(Borders::ALL),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_registers(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);
        let lower = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Percentage(40),
                Constraint::Percentage(30),
            ])
            .split(rows[1]);

        self.draw_courses(frame, rows[0]);
        self.draw_students(frame, lower[0]);
        self.draw_queue(frame, lower[1]);
        self.draw_history(frame, lower[2]);
    }

    fn draw_courses(&self, frame: &mut Frame, area: Rect) {
        let title = if self.registrar.is_sorted() {
            "Courses (sorted by priority)"
        } else {
            "Courses"
        };
        let block = Block::default().title(title).borders(Borders::ALL);

        if self.registrar.courses().is_empty() {
            let message = Paragraph::new("No courses yet. Choose 'Add Course' to create one.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header = Row::new(["#", "Id", "Name", "Hours", "Priority"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows = self
            .registrar
            .courses()
            .iter()
            .enumerate()
            .map(|(idx, course)| {
                Row::new(vec![
                    Cell::from(idx.to_string()),
                    Cell::from(course.id.to_string()),
                    Cell::from(course.name.clone()),
                    Cell::from(course.duration.to_string()),
                    Cell::from(course.priority.to_string()),
                ])
            });
        let table = Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Length(6),
                Constraint::Min(12),
                Constraint::Length(6),
                Constraint::Length(9),
            ],
        )
        .header(header)
        .block(block);
        frame.render_widget(table, area);
    }

    fn draw_students(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .registrar
            .students()
            .iter()
            .map(|student| ListItem::new(student.to_string()))
            .collect();
        let list = List::new(items).block(Block::default().title("Students").borders(Borders::ALL));
        frame.render_widget(list, area);
    }

    fn draw_queue(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .registrar
            .queue()
            .iter()
            .map(|enrollment| {
                let course = self
                    .registrar
                    .course_by_id(enrollment.course_id)
                    .map(|course| course.name.as_str())
                    .unwrap_or("?");
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format_timestamp(&enrollment.requested_at),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::raw(format!(" {} -> {}", enrollment.student.name, course)),
                ]))
            })
            .collect();
        let title = format!("Pending enrollments ({})", self.registrar.queue().len());
        let list = List::new(items).block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(list, area);
    }

    fn draw_history(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .registrar
            .history()
            .iter()
            .map(|entry| ListItem::new(entry.to_string()))
            .collect();
        let list = List::new(items).block(Block::default().title("History").borders(Borders::ALL));
        frame.render_widget(list, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let text = match self.mode {
            Mode::Normal => "Up/Down or W/S to move • Enter or 1-8 to select • q to save and exit",
            Mode::Form(_) => "Enter to submit • Tab to switch field • Esc to cancel",
        };
        Line::from(Span::styled(text, Style::default().fg(Color::Gray)))
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, form: &InputForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(form.kind.title())
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = (0..form.fields.len())
            .map(|idx| form.build_line(idx))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        }

        let paragraph = Paragraph::new(lines);
        frame.render_widget(paragraph, inner);

        let cursor_x = inner.x + form.cursor_offset() as u16;
        let cursor_y = inner.y + form.active as u16;
        if cursor_x < inner.right() && cursor_y < inner.bottom() {
            frame.set_cursor_position((cursor_x, cursor_y));
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        let text = text.into();
        if kind == StatusKind::Info {
            info!(status = %text, "command completed");
        }
        self.status = Some(StatusMessage { text, kind });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;

    fn press(app: &mut App, keys: &[KeyCode]) {
        for key in keys {
            assert!(!app.handle_key(*key).unwrap());
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    fn add_course(app: &mut App, name: &str, duration: &str, priority: &str) {
        press(app, &[KeyCode::Char('1')]);
        type_text(app, name);
        press(app, &[KeyCode::Tab]);
        type_text(app, duration);
        press(app, &[KeyCode::Tab]);
        type_text(app, priority);
        press(app, &[KeyCode::Enter]);
    }

    #[test]
    fn menu_navigation_wraps() {
        let mut app = App::new(Registrar::new());
        press(&mut app, &[KeyCode::Up]);
        assert_eq!(app.selected(), MenuItem::Exit);
        press(&mut app, &[KeyCode::Char('s')]);
        assert_eq!(app.selected(), MenuItem::AddCourse);
    }

    #[test]
    fn course_form_adds_and_closes() {
        let mut app = App::new(Registrar::new());
        add_course(&mut app, "CS101", "40", "8");
        assert!(!app.is_form_open());
        assert_eq!(app.registrar().courses()[0].name, "CS101");
        assert_eq!(app.status_text(), Some("Course CS101 added."));
    }

    #[test]
    fn invalid_priority_keeps_form_open() {
        let mut app = App::new(Registrar::new());
        add_course(&mut app, "CS101", "40", "11");
        assert!(app.is_form_open());
        assert!(app.registrar().courses().is_empty());
        assert_eq!(app.status_text(), Some("Priority must be between 1 and 10."));
    }

    #[test]
    fn enroll_process_and_undo_through_the_menu() {
        let mut app = App::new(Registrar::new());
        add_course(&mut app, "CS101", "40", "8");

        press(&mut app, &[KeyCode::Char('2')]);
        type_text(&mut app, "Ana");
        press(&mut app, &[KeyCode::Tab]);
        type_text(&mut app, "1");
        press(&mut app, &[KeyCode::Enter]);

        press(&mut app, &[KeyCode::Char('3')]);
        type_text(&mut app, "1");
        press(&mut app, &[KeyCode::Tab]);
        type_text(&mut app, "CS101");
        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.registrar().queue().len(), 1);
        assert_eq!(app.registrar().history().len(), 1);

        press(&mut app, &[KeyCode::Char('4')]);
        assert_eq!(app.registrar().queue().len(), 0);
        assert_eq!(app.registrar().history().len(), 2);
        assert!(app.status_text().unwrap().starts_with("Processed: Ana in CS101"));

        press(&mut app, &[KeyCode::Char('7')]);
        assert_eq!(app.registrar().history().len(), 1);
        assert_eq!(app.status_text(), Some("Undo: Processed: Ana in CS101"));
    }

    #[test]
    fn empty_queue_and_history_are_reported() {
        let mut app = App::new(Registrar::new());
        press(&mut app, &[KeyCode::Char('4')]);
        assert_eq!(app.status_text(), Some("Nothing to process."));
        press(&mut app, &[KeyCode::Char('7')]);
        assert_eq!(app.status_text(), Some("No action to undo."));
    }

    #[test]
    fn find_by_priority_requires_sort() {
        let mut app = App::new(Registrar::new());
        add_course(&mut app, "CS101", "40", "8");
        add_course(&mut app, "MATH1", "30", "5");
        add_course(&mut app, "ART2", "20", "9");

        press(&mut app, &[KeyCode::Char('6')]);
        type_text(&mut app, "8");
        press(&mut app, &[KeyCode::Enter]);
        assert!(app.is_form_open());
        assert_eq!(
            app.status_text(),
            Some("Courses are not sorted by priority. Sort them first.")
        );
        press(&mut app, &[KeyCode::Esc]);

        press(&mut app, &[KeyCode::Char('5')]);
        press(&mut app, &[KeyCode::Char('6')]);
        type_text(&mut app, "8");
        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(
            app.status_text(),
            Some("Course found: CS101, duration 40 hours.")
        );
    }

    #[test]
    fn exit_via_menu_and_q() {
        let mut app = App::new(Registrar::new());
        assert!(app.handle_key(KeyCode::Char('8')).unwrap());
        let mut app = App::new(Registrar::new());
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn finish_saves_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path());
        let mut app = App::new(Registrar::new());
        add_course(&mut app, "CS101", "40", "8");

        let report = app.finish(&paths).unwrap();
        assert_eq!(report.courses, 1);
        assert_eq!(
            std::fs::read_to_string(&paths.courses).unwrap(),
            "CS101,40,8\n"
        );
    }

    #[test]
    fn renders_menu_and_open_form() {
        let mut app = App::new(Registrar::new());
        add_course(&mut app, "CS101", "40", "8");
        press(&mut app, &[KeyCode::Char('2')]);

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Course Management"));
        assert!(text.contains("CS101"));
        assert!(text.contains("Add Student"));
    }
}
