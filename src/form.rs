use crate::models::NewCycle;
use thiserror::Error;

pub const MIN_MINUTES: u32 = 1;
pub const MAX_MINUTES: u32 = 60;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Give your task a name")]
    EmptyTask,

    #[error("'{0}' is not a whole number of minutes")]
    InvalidMinutes(String),

    #[error("A cycle must last between {min} and {max} minutes (got {got})")]
    MinutesOutOfRange { min: u32, max: u32, got: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Task,
    MinutesAmount,
}

/// Raw, unvalidated input for a new cycle, as typed by the user.
#[derive(Debug, Clone)]
pub struct NewCycleForm {
    pub task: String,
    pub minutes_amount: String,
    pub focus: Field,
    pub error: Option<ValidationError>,
    suggestions: Vec<String>,
    suggestion_idx: Option<usize>,
    minutes_step: u32,
    default_minutes: u32,
}

impl NewCycleForm {
    pub fn new(default_minutes: u32, minutes_step: u32, suggestions: Vec<String>) -> Self {
        Self {
            task: String::new(),
            minutes_amount: default_minutes.to_string(),
            focus: Field::Task,
            error: None,
            suggestions,
            suggestion_idx: None,
            minutes_step: minutes_step.max(1),
            default_minutes,
        }
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn validate(&self) -> Result<NewCycle, ValidationError> {
        let task = self.task.trim();
        if task.is_empty() {
            return Err(ValidationError::EmptyTask);
        }
        let minutes_amount = parse_minutes(&self.minutes_amount)?;
        Ok(NewCycle {
            task: task.to_string(),
            minutes_amount,
        })
    }

    /// Validates and records the error for inline display.
    pub fn submit(&mut self) -> Option<NewCycle> {
        match self.validate() {
            Ok(cmd) => {
                self.error = None;
                Some(cmd)
            }
            Err(err) => {
                tracing::debug!(error = %err, "new cycle form rejected");
                self.error = Some(err);
                None
            }
        }
    }

    /// Validates and, on success, clears the form for the next cycle.
    pub fn take(&mut self) -> Result<NewCycle, ValidationError> {
        let new_cycle = self.validate()?;
        self.reset();
        Ok(new_cycle)
    }

    /// Back to a blank task with the default duration, ready for the next cycle.
    pub fn reset(&mut self) {
        self.task.clear();
        self.minutes_amount = self.default_minutes.to_string();
        self.focus = Field::Task;
        self.error = None;
        self.suggestion_idx = None;
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Field::Task => Field::MinutesAmount,
            Field::MinutesAmount => Field::Task,
        };
    }

    pub fn input(&mut self, c: char) {
        match self.focus {
            Field::Task => {
                self.task.push(c);
                self.suggestion_idx = None;
            }
            Field::MinutesAmount => {
                if c.is_ascii_digit() && self.minutes_amount.len() < 3 {
                    self.minutes_amount.push(c);
                }
            }
        }
        self.error = None;
    }

    pub fn backspace(&mut self) {
        match self.focus {
            Field::Task => {
                self.task.pop();
                self.suggestion_idx = None;
            }
            Field::MinutesAmount => {
                self.minutes_amount.pop();
            }
        }
        self.error = None;
    }

    pub fn step_minutes_up(&mut self) {
        let current = self.minutes_amount.trim().parse::<u32>().unwrap_or(0);
        let next = (current / self.minutes_step + 1) * self.minutes_step;
        self.minutes_amount = next.min(MAX_MINUTES).to_string();
        self.error = None;
    }

    pub fn step_minutes_down(&mut self) {
        let current = self.minutes_amount.trim().parse::<u32>().unwrap_or(0);
        let next = if current % self.minutes_step == 0 {
            current.saturating_sub(self.minutes_step)
        } else {
            current - current % self.minutes_step
        };
        self.minutes_amount = next.clamp(MIN_MINUTES, MAX_MINUTES).to_string();
        self.error = None;
    }

    /// Fills the task with the next suggestion that starts with what has been
    /// typed so far, wrapping around.
    pub fn next_suggestion(&mut self) {
        if self.suggestions.is_empty() {
            return;
        }
        let prefix = match self.suggestion_idx {
            Some(_) => String::new(),
            None => self.task.to_lowercase(),
        };
        let start = self.suggestion_idx.map_or(0, |i| i + 1);
        let len = self.suggestions.len();
        let found = (0..len)
            .map(|offset| (start + offset) % len)
            .find(|&i| self.suggestions[i].to_lowercase().starts_with(&prefix));
        if let Some(i) = found {
            self.task = self.suggestions[i].clone();
            self.suggestion_idx = Some(i);
            self.error = None;
        }
    }
}

/// Accepts a bare integer (minutes) or a humantime duration such as `25m` or
/// `1h`, which must land on whole minutes within the allowed range.
pub fn parse_minutes(raw: &str) -> Result<u32, ValidationError> {
    let raw = raw.trim();
    let minutes: i64 = match raw.parse::<i64>() {
        Ok(m) => m,
        Err(_) => {
            let duration = humantime::parse_duration(raw)
                .map_err(|_| ValidationError::InvalidMinutes(raw.to_string()))?;
            let secs = duration.as_secs();
            if secs % 60 != 0 || duration.subsec_nanos() != 0 {
                return Err(ValidationError::InvalidMinutes(raw.to_string()));
            }
            i64::try_from(secs / 60).unwrap_or(i64::MAX)
        }
    };

    if minutes < i64::from(MIN_MINUTES) || minutes > i64::from(MAX_MINUTES) {
        return Err(ValidationError::MinutesOutOfRange {
            min: MIN_MINUTES,
            max: MAX_MINUTES,
            got: minutes,
        });
    }
    Ok(minutes as u32)
}
