use anyhow::{anyhow, Context, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::MAX_NAME_CHARS;

/// Which menu command a form collects input for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FormKind {
    AddCourse,
    AddStudent,
    Enroll,
    FindByPriority,
}

impl FormKind {
    pub(crate) fn title(self) -> &'static str {
        match self {
            FormKind::AddCourse => "Add Course",
            FormKind::AddStudent => "Add Student",
            FormKind::Enroll => "Enroll Student",
            FormKind::FindByPriority => "Find Course by Priority",
        }
    }
}

/// Accepted characters for a field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FieldInput {
    /// Free text without commas, capped at the bounded name length.
    Name,
    /// Unsigned digits.
    Digits,
    /// Digits with an optional leading minus.
    SignedDigits,
}

#[derive(Clone, Debug)]
pub(crate) struct FormField {
    pub(crate) label: &'static str,
    pub(crate) value: String,
    pub(crate) input: FieldInput,
}

impl FormField {
    fn new(label: &'static str, input: FieldInput) -> Self {
        Self {
            label,
            value: String::new(),
            input,
        }
    }
}

/// Input state for one of the command forms: its fields, which one has focus
/// and the last validation error.
#[derive(Clone, Debug)]
pub(crate) struct InputForm {
    pub(crate) kind: FormKind,
    pub(crate) fields: Vec<FormField>,
    pub(crate) active: usize,
    pub(crate) error: Option<String>,
}

impl InputForm {
    pub(crate) fn new(kind: FormKind) -> Self {
        let fields = match kind {
            FormKind::AddCourse => vec![
                FormField::new("Name", FieldInput::Name),
                FormField::new("Duration (hours)", FieldInput::Digits),
                FormField::new("Priority (1-10)", FieldInput::Digits),
            ],
            FormKind::AddStudent => vec![
                FormField::new("Name", FieldInput::Name),
                FormField::new("Id", FieldInput::SignedDigits),
            ],
            FormKind::Enroll => vec![
                FormField::new("Student id", FieldInput::SignedDigits),
                FormField::new("Course name", FieldInput::Name),
            ],
            FormKind::FindByPriority => vec![FormField::new("Priority", FieldInput::Digits)],
        };
        Self {
            kind,
            fields,
            active: 0,
            error: None,
        }
    }

    /// Move focus to the next field, wrapping around.
    pub(crate) fn next_field(&mut self) {
        self.active = (self.active + 1) % self.fields.len();
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = (self.active + self.fields.len() - 1) % self.fields.len();
    }

    /// Append a character to the active field if the field accepts it.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        let field = &mut self.fields[self.active];
        let accepted = match field.input {
            FieldInput::Name => {
                !ch.is_control() && ch != ',' && field.value.chars().count() < MAX_NAME_CHARS
            }
            FieldInput::Digits => ch.is_ascii_digit(),
            FieldInput::SignedDigits => {
                ch.is_ascii_digit() || (ch == '-' && field.value.is_empty())
            }
        };
        if accepted {
            field.value.push(ch);
        }
        accepted
    }

    pub(crate) fn backspace(&mut self) {
        self.fields[self.active].value.pop();
    }

    fn value(&self, idx: usize) -> &str {
        self.fields[idx].value.trim()
    }

    fn required(&self, idx: usize) -> Result<&str> {
        let value = self.value(idx);
        if value.is_empty() {
            Err(anyhow!("{} is required.", self.fields[idx].label))
        } else {
            Ok(value)
        }
    }

    /// Name, duration and priority for the add-course command.
    pub(crate) fn parse_course(&self) -> Result<(String, u32, i32)> {
        let name = self.required(0)?.to_string();
        let duration = self
            .required(1)?
            .parse::<u32>()
            .context("Duration must be a whole number of hours.")?;
        let priority = self
            .required(2)?
            .parse::<i32>()
            .context("Priority must be a number between 1 and 10.")?;
        Ok((name, duration, priority))
    }

    /// Name and id for the add-student command.
    pub(crate) fn parse_student(&self) -> Result<(String, i64)> {
        let name = self.required(0)?.to_string();
        let id = self
            .required(1)?
            .parse::<i64>()
            .context("Id must be an integer.")?;
        Ok((name, id))
    }

    /// Student id and course name for the enroll command.
    pub(crate) fn parse_enrollment(&self) -> Result<(i64, String)> {
        let id = self
            .required(0)?
            .parse::<i64>()
            .context("Student id must be an integer.")?;
        let course = self.required(1)?.to_string();
        Ok((id, course))
    }

    pub(crate) fn parse_priority(&self) -> Result<i32> {
        self.required(0)?
            .parse::<i32>()
            .context("Priority must be an integer.")
    }

    /// Render a single field line, highlighting the focused one.
    pub(crate) fn build_line(&self, idx: usize) -> Line<'static> {
        let field = &self.fields[idx];
        let is_active = idx == self.active;

        let display = if field.value.is_empty() {
            "<required>".to_string()
        } else {
            field.value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if field.value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label)),
            Span::styled(display, style),
        ])
    }

    /// Display column where the cursor sits for the active field. Measured in
    /// terminal cells so wide characters push the cursor by two.
    pub(crate) fn cursor_offset(&self) -> usize {
        let field = &self.fields[self.active];
        Span::raw(format!("{}: {}", field.label, field.value)).width()
    }
}
