//! Identity template: a pattern plus independently randomized fields.

use chrono::{Days, NaiveDate};
use rand::Rng;
use thiserror::Error;

use crate::utils::constants::RANDOM_USER_AGENT_PATTERN;

const PLACEHOLDER: &str = "{}";

/// Errors from building an `IdentityTemplate`
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("pattern has {placeholders} placeholders but {fields} fields were given")]
    PlaceholderMismatch { placeholders: usize, fields: usize },

    #[error("field {index} has an empty range [{min}, {max})")]
    EmptyRange { index: usize, min: u32, max: u32 },

    #[error("field {index} starts at invalid year {year}")]
    InvalidYear { index: usize, year: i32 },
}

/// One numeric part of a version field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Fixed(u32),
    /// Uniform in `[min, max)`
    Random { min: u32, max: u32 },
}

impl Component {
    fn sample<R: Rng>(self, rng: &mut R) -> u32 {
        match self {
            Self::Fixed(value) => value,
            Self::Random { min, max } => rng.random_range(min..max),
        }
    }

    fn range(self) -> Option<(u32, u32)> {
        match self {
            Self::Fixed(_) => None,
            Self::Random { min, max } => Some((min, max)),
        }
    }
}

/// A value substituted for one `{}` of the pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityField {
    /// Always the same text
    Fixed(String),
    /// Integer uniform in `[min, max)`
    Number { min: u32, max: u32 },
    /// `major.minor`, each part fixed or random
    Version { major: Component, minor: Component },
    /// `YYYYMMDD`, January 1st of `from_year` plus `[0, within_days)` days
    Date { from_year: i32, within_days: u32 },
}

impl IdentityField {
    /// Version whose major part is pinned and minor part drawn from `[min, max)`
    #[must_use]
    pub const fn fixed_major(major: u32, min: u32, max: u32) -> Self {
        Self::Version {
            major: Component::Fixed(major),
            minor: Component::Random { min, max },
        }
    }

    /// Version whose major part is drawn from `[min, max)` and minor part pinned
    #[must_use]
    pub const fn fixed_minor(min: u32, max: u32, minor: u32) -> Self {
        Self::Version {
            major: Component::Random { min, max },
            minor: Component::Fixed(minor),
        }
    }

    fn render<R: Rng>(&self, rng: &mut R) -> String {
        match self {
            Self::Fixed(text) => text.clone(),
            Self::Number { min, max } => rng.random_range(*min..*max).to_string(),
            Self::Version { major, minor } => {
                format!("{}.{}", major.sample(rng), minor.sample(rng))
            }
            Self::Date {
                from_year,
                within_days,
            } => {
                // Year validated in `IdentityTemplate::new`
                let start = NaiveDate::from_ymd_opt(*from_year, 1, 1).unwrap_or_default();
                let offset = if *within_days == 0 {
                    0
                } else {
                    rng.random_range(0..*within_days)
                };
                start
                    .checked_add_days(Days::new(u64::from(offset)))
                    .unwrap_or(start)
                    .format("%Y%m%d")
                    .to_string()
            }
        }
    }

    fn validate(&self, index: usize) -> Result<(), IdentityError> {
        let ranges: Vec<(u32, u32)> = match self {
            Self::Fixed(_) => Vec::new(),
            Self::Number { min, max } => vec![(*min, *max)],
            Self::Version { major, minor } => major.range().into_iter().chain(minor.range()).collect(),
            Self::Date { from_year, .. } => {
                if NaiveDate::from_ymd_opt(*from_year, 1, 1).is_none() {
                    return Err(IdentityError::InvalidYear {
                        index,
                        year: *from_year,
                    });
                }
                Vec::new()
            }
        };

        match ranges.into_iter().find(|(min, max)| min >= max) {
            Some((min, max)) => Err(IdentityError::EmptyRange { index, min, max }),
            None => Ok(()),
        }
    }
}

/// Generator for browser identity strings
///
/// The pattern is split on `{}` once at construction; `generate` then draws
/// every field independently and interpolates them in declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityTemplate {
    literals: Vec<String>,
    fields: Vec<IdentityField>,
}

impl IdentityTemplate {
    /// Build a template, checking that every placeholder has a field
    /// and every random range is non-empty.
    pub fn new(pattern: &str, fields: Vec<IdentityField>) -> Result<Self, IdentityError> {
        let literals = split_pattern(pattern);
        let placeholders = literals.len() - 1;
        if placeholders != fields.len() {
            return Err(IdentityError::PlaceholderMismatch {
                placeholders,
                fields: fields.len(),
            });
        }
        for (index, field) in fields.iter().enumerate() {
            field.validate(index)?;
        }
        Ok(Self { literals, fields })
    }

    /// Firefox on macOS, e.g.
    /// `Mozilla/5.3 (Macintosh; Intel Mac OS X 10.17; rv:142.0) Gecko/20170412 Firefox/118.0`
    #[must_use]
    pub fn firefox_macos() -> Self {
        Self {
            literals: split_pattern(RANDOM_USER_AGENT_PATTERN),
            fields: vec![
                IdentityField::fixed_major(5, 0, 10),
                IdentityField::fixed_major(10, 15, 20),
                IdentityField::fixed_minor(100, 200, 0),
                IdentityField::Date {
                    from_year: 2010,
                    within_days: 365 * 14,
                },
                IdentityField::fixed_minor(100, 200, 0),
            ],
        }
    }

    #[must_use]
    pub fn fields(&self) -> &[IdentityField] {
        &self.fields
    }

    /// Generate an identity with the thread-local RNG
    #[must_use]
    pub fn generate(&self) -> String {
        self.generate_with(&mut rand::rng())
    }

    /// Generate an identity from a caller-supplied RNG
    pub fn generate_with<R: Rng>(&self, rng: &mut R) -> String {
        let mut out = String::with_capacity(self.literals.iter().map(String::len).sum::<usize>() + 32);
        for (literal, field) in self.literals.iter().zip(&self.fields) {
            out.push_str(literal);
            out.push_str(&field.render(rng));
        }
        if let Some(tail) = self.literals.last() {
            out.push_str(tail);
        }
        out
    }
}

impl Default for IdentityTemplate {
    fn default() -> Self {
        Self::firefox_macos()
    }
}

fn split_pattern(pattern: &str) -> Vec<String> {
    pattern.split(PLACEHOLDER).map(str::to_string).collect()
}
