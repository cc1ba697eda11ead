//! Time code parsing and formatting
//!
//! The inference service is asked for `MM:SS.mmm` but has been observed to
//! answer in several grammars. Grammars are tried in this order:
//!
//! 1. anything containing a dot: `[[HH:]MM:]SS.mmm`, the fraction being up to
//!    three millisecond digits
//! 2. `A:B:C` without a dot: minutes:seconds:milliseconds when `A < 60`,
//!    `B < 60` and `C >= 100`, hours:minutes:seconds otherwise
//! 3. `MM:SS`
//! 4. a bare number of seconds
//!
//! Rule 2 cannot tell `00:05:050` (5.05s) from 00h05m50s. That ambiguity is
//! kept as-is; the instruction contract asks for grammar 1 to avoid it.

use thiserror::Error;

/// Unrecognised time text
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid time code: {text:?}")]
pub struct TimeCodeError {
    pub text: String,
}

impl TimeCodeError {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

/// Time code parser for the grammars the inference service emits
pub struct TimeCodeParser;

impl TimeCodeParser {
    /// Parse time text to elapsed seconds, falling back to zero.
    ///
    /// Never fails: unrecognised text yields a zero-duration value.
    pub fn parse(text: &str) -> f64 {
        Self::try_parse(text).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Unrecognised time code, using 0");
            0.0
        })
    }

    /// Parse time text to elapsed seconds
    pub fn try_parse(text: &str) -> Result<f64, TimeCodeError> {
        let text = text.trim();

        if text.contains('.') {
            return Self::parse_fractional(text);
        }

        let parts: Vec<&str> = text.split(':').collect();
        match parts.as_slice() {
            [a, b, c] => Self::parse_triple(text, a, b, c),
            [minutes, seconds] => {
                let minutes = Self::integer(text, minutes)?;
                let seconds = Self::integer(text, seconds)?;
                Ok(Self::clock(text, &[(minutes, 60), (seconds, 1)])? as f64)
            }
            [bare] => Self::parse_bare(text, bare),
            _ => Err(TimeCodeError::new(text)),
        }
    }

    /// Parse `[[HH:]MM:]SS.mmm`
    fn parse_fractional(text: &str) -> Result<f64, TimeCodeError> {
        let Some((clock, fraction)) = text.rsplit_once('.') else {
            return Err(TimeCodeError::new(text));
        };

        if !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(TimeCodeError::new(text));
        }
        // Right-pad to three digits; anything past milliseconds is dropped
        let mut millis_text: String = fraction.chars().take(3).collect();
        while millis_text.len() < 3 {
            millis_text.push('0');
        }
        let millis: u64 = millis_text.parse().map_err(|_| TimeCodeError::new(text))?;

        let parts: Vec<&str> = clock.split(':').collect();
        let whole_seconds = match parts.as_slice() {
            [seconds] => Self::integer(text, seconds)?,
            [minutes, seconds] => Self::clock(
                text,
                &[(Self::integer(text, minutes)?, 60), (Self::integer(text, seconds)?, 1)],
            )?,
            [hours, minutes, seconds] => Self::clock(
                text,
                &[
                    (Self::integer(text, hours)?, 3600),
                    (Self::integer(text, minutes)?, 60),
                    (Self::integer(text, seconds)?, 1),
                ],
            )?,
            _ => return Err(TimeCodeError::new(text)),
        };

        Ok(whole_seconds as f64 + millis as f64 / 1000.0)
    }

    /// Parse the legacy `A:B:C` grammar, disambiguated by magnitude
    fn parse_triple(text: &str, a: &str, b: &str, c: &str) -> Result<f64, TimeCodeError> {
        let a = Self::integer(text, a)?;
        let b = Self::integer(text, b)?;
        let c = Self::integer(text, c)?;

        if a < 60 && b < 60 && c >= 100 {
            // minutes:seconds:milliseconds
            Ok((a * 60 + b) as f64 + c as f64 / 1000.0)
        } else {
            // hours:minutes:seconds
            Ok(Self::clock(text, &[(a, 3600), (b, 60), (c, 1)])? as f64)
        }
    }

    fn parse_bare(text: &str, bare: &str) -> Result<f64, TimeCodeError> {
        match bare.parse::<f64>() {
            Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => Ok(seconds),
            _ => Err(TimeCodeError::new(text)),
        }
    }

    /// Sum of `value * unit` over the fields; overflow is unrecognised text
    fn clock(text: &str, fields: &[(u64, u64)]) -> Result<u64, TimeCodeError> {
        fields
            .iter()
            .try_fold(0u64, |total, &(value, unit)| {
                value.checked_mul(unit).and_then(|part| total.checked_add(part))
            })
            .ok_or_else(|| TimeCodeError::new(text))
    }

    fn integer(text: &str, part: &str) -> Result<u64, TimeCodeError> {
        let part = part.trim();
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(TimeCodeError::new(text));
        }
        part.parse::<u64>().map_err(|_| TimeCodeError::new(text))
    }
}

/// Formats elapsed seconds as `HH:MM:SS.mmm`
pub struct TimeCodeFormatter;

impl TimeCodeFormatter {
    /// Format seconds, rounded to the nearest millisecond.
    ///
    /// Negative and non-finite input formats as zero.
    pub fn format(seconds: f64) -> String {
        let total_millis = if seconds.is_finite() && seconds > 0.0 {
            (seconds * 1000.0).round() as u64
        } else {
            0
        };

        let hours = total_millis / 3_600_000;
        let minutes = (total_millis % 3_600_000) / 60_000;
        let secs = (total_millis % 60_000) / 1000;
        let millis = total_millis % 1000;

        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
    }
}
