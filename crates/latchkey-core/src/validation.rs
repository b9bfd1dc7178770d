// ── Form validation ──
//
// Rules are evaluated in order and the first failure wins. Apart from
// `Required`, rules pass on an empty value so optional fields can still
// carry format rules.

use std::collections::BTreeMap;
use std::fmt;
use std::net::Ipv4Addr;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use strum::{Display, EnumString};

/// Built-in value formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Format {
    Ipv4,
    Port,
    /// `HH:MM`, 24-hour.
    Time,
    /// `YYYY-MM-DD`.
    Date,
}

impl Format {
    fn accepts(self, value: &str) -> bool {
        match self {
            Self::Ipv4 => value.parse::<Ipv4Addr>().is_ok(),
            Self::Port => value.parse::<u16>().is_ok_and(|p| p > 0),
            Self::Time => value.len() == 5 && NaiveTime::parse_from_str(value, "%H:%M").is_ok(),
            Self::Date => value.len() == 10 && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
        }
    }

    fn message(self, field: &str) -> String {
        match self {
            Self::Ipv4 => format!("{field} must be a valid IPv4 address"),
            Self::Port => format!("{field} must be a port between 1 and 65535"),
            Self::Time => format!("{field} must be a time in HH:MM format"),
            Self::Date => format!("{field} must be a date in YYYY-MM-DD format"),
        }
    }
}

pub type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

#[derive(Clone)]
pub enum Rule {
    Required,
    Pattern(Regex),
    /// Minimum length in characters.
    MinLength(usize),
    MaxLength(usize),
    /// Inclusive numeric range.
    Range { min: f64, max: f64 },
    Format(Format),
    Custom(Predicate),
    /// Apply the inner rule only when the condition holds.
    When(bool, Box<Rule>),
    /// Replace the inner rule's failure message.
    Message(Box<Rule>, String),
}

impl Rule {
    pub fn pattern(re: &str) -> Result<Self, regex::Error> {
        Regex::new(re).map(Self::Pattern)
    }

    pub fn custom(check: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(check))
    }

    pub fn when(condition: bool, rule: Self) -> Self {
        Self::When(condition, Box::new(rule))
    }

    pub fn with_message(self, message: impl Into<String>) -> Self {
        Self::Message(Box::new(self), message.into())
    }

    /// Check one value. The error is the message to show.
    pub fn check(&self, field: &str, value: &str) -> Result<(), String> {
        let trimmed = value.trim();
        if trimmed.is_empty() && !self.applies_to_empty() {
            return Ok(());
        }

        match self {
            Self::Required => {
                if trimmed.is_empty() {
                    return Err(format!("{field} is required"));
                }
            }
            Self::Pattern(re) => {
                if !re.is_match(value) {
                    return Err(format!("{field} is invalid"));
                }
            }
            Self::MinLength(min) => {
                if value.chars().count() < *min {
                    return Err(format!("{field} must be at least {min} characters"));
                }
            }
            Self::MaxLength(max) => {
                if value.chars().count() > *max {
                    return Err(format!("{field} must be at most {max} characters"));
                }
            }
            Self::Range { min, max } => {
                let Ok(n) = trimmed.parse::<f64>() else {
                    return Err(format!("{field} must be a number"));
                };
                if n < *min || n > *max {
                    return Err(format!("{field} must be between {min} and {max}"));
                }
            }
            Self::Format(format) => {
                if !format.accepts(trimmed) {
                    return Err(format.message(field));
                }
            }
            Self::Custom(check) => {
                if !check(value) {
                    return Err(format!("{field} is invalid"));
                }
            }
            Self::When(condition, rule) => {
                if *condition {
                    return rule.check(field, value);
                }
            }
            Self::Message(rule, message) => {
                return rule.check(field, value).map_err(|_| message.clone());
            }
        }
        Ok(())
    }

    fn applies_to_empty(&self) -> bool {
        match self {
            Self::Required => true,
            Self::When(_, rule) | Self::Message(rule, _) => rule.applies_to_empty(),
            _ => false,
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("Required"),
            Self::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Self::MinLength(n) => f.debug_tuple("MinLength").field(n).finish(),
            Self::MaxLength(n) => f.debug_tuple("MaxLength").field(n).finish(),
            Self::Range { min, max } => f
                .debug_struct("Range")
                .field("min", min)
                .field("max", max)
                .finish(),
            Self::Format(format) => f.debug_tuple("Format").field(format).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
            Self::When(cond, rule) => f.debug_tuple("When").field(cond).field(rule).finish(),
            Self::Message(rule, msg) => f.debug_tuple("Message").field(rule).field(msg).finish(),
        }
    }
}

/// Run `rules` against `value`, stopping at the first failure.
pub fn validate(field: &str, value: &str, rules: &[Rule]) -> Result<(), String> {
    rules.iter().try_for_each(|rule| rule.check(field, value))
}

/// Per-field results for one form.
#[derive(Debug, Clone, Default)]
pub struct FormValidator {
    errors: BTreeMap<String, String>,
    touched: BTreeMap<String, bool>,
}

impl FormValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and record one field. Returns whether it passed.
    pub fn validate_field(&mut self, field: &str, value: &str, rules: &[Rule]) -> bool {
        self.touched.insert(field.to_owned(), true);
        match validate(field, value, rules) {
            Ok(()) => {
                self.errors.remove(field);
                true
            }
            Err(message) => {
                self.errors.insert(field.to_owned(), message);
                false
            }
        }
    }

    /// Validate an optional input; `None` is treated as empty.
    pub fn validate_opt(&mut self, field: &str, value: Option<&str>, rules: &[Rule]) -> bool {
        self.validate_field(field, value.unwrap_or_default(), rules)
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.get(field).copied().unwrap_or(false)
    }

    /// The first recorded error as `(field, message)`.
    pub fn first_error(&self) -> Option<(&str, &str)> {
        self.errors
            .iter()
            .next()
            .map(|(f, m)| (f.as_str(), m.as_str()))
    }

    pub fn reset(&mut self) {
        self.errors.clear();
        self.touched.clear();
    }
}
