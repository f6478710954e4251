//! Timestamp formatting utilities
//!
//! `{Timestamp:<spec>}` placeholders take a date/time spec in the familiar
//! `yyyy-MM-dd HH:mm:ss.fff` notation. Specs are case-sensitive: `MM` is
//! the month and `mm` the minute, `d` and `D` are distinct standard
//! patterns. A spec is compiled once into a list of [`DatePart`]s and then
//! rendered for every message.
//!
//! The clock is a collaborator ([`Clock`]) so rendering can be tested
//! against a fixed instant.

use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDateTime, Timelike, Utc};
use std::fmt::Write;

/// Spec substituted when a `{Timestamp}` placeholder has none
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "yyyy-MM-dd HH:mm:ss.fff";

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

const DAY_NAMES: [&str; 7] = [
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall-clock time in the local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<FixedOffset>,
}

impl FixedClock {
    pub fn new(instant: DateTime<FixedOffset>) -> Self {
        Self { instant }
    }

    /// Treat a naive date/time as UTC
    pub fn from_naive(naive: NaiveDateTime) -> Self {
        Self {
            instant: naive.and_utc().fixed_offset(),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.instant
    }
}

/// One compiled element of a date/time spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatePart {
    Literal(String),
    /// `y` .. `yyyyy`
    Year(usize),
    /// `M` .. `MMMM`
    Month(usize),
    /// `d` .. `dddd`
    Day(usize),
    /// `H`, `HH`
    Hour24(usize),
    /// `h`, `hh`
    Hour12(usize),
    /// `m`, `mm`
    Minute(usize),
    /// `s`, `ss`
    Second(usize),
    /// `f` .. `fffffff` (`trim` for the `F` family)
    Fraction { digits: usize, trim: bool },
    /// `t`, `tt`
    AmPm(usize),
    /// `z`, `zz`, `zzz`
    Offset(usize),
    /// `K`
    OffsetK,
    /// `g`, `gg`
    Era,
}

/// A compiled date/time spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    spec: String,
    parts: Vec<DatePart>,
    universal: bool,
}

impl Default for DateFormat {
    fn default() -> Self {
        Self::parse(DEFAULT_TIMESTAMP_FORMAT)
    }
}

impl DateFormat {
    /// Compile a spec; never fails, unknown letters become literals
    pub fn parse(spec: &str) -> Self {
        let (pattern, universal) = match standard_pattern(spec) {
            Some((pattern, universal)) => (pattern, universal),
            None => (spec, false),
        };
        Self {
            spec: spec.to_string(),
            parts: parse_custom(pattern),
            universal,
        }
    }

    /// The spec as written by the user
    pub fn spec(&self) -> &str {
        &self.spec
    }

    pub fn parts(&self) -> &[DatePart] {
        &self.parts
    }

    #[must_use]
    pub fn format(&self, datetime: &DateTime<FixedOffset>) -> String {
        let datetime = if self.universal {
            datetime.with_timezone(&Utc).fixed_offset()
        } else {
            *datetime
        };

        let mut out = String::with_capacity(self.spec.len() + 16);
        for part in &self.parts {
            render_part(&mut out, part, &datetime);
        }
        out
    }
}

/// Expand a single-letter standard spec into its custom pattern
fn standard_pattern(spec: &str) -> Option<(&'static str, bool)> {
    let mut chars = spec.chars();
    let first = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let expanded = match first {
        'd' => ("MM/dd/yyyy", false),
        'D' => ("dddd, dd MMMM yyyy", false),
        'f' => ("dddd, dd MMMM yyyy HH:mm", false),
        'F' => ("dddd, dd MMMM yyyy HH:mm:ss", false),
        'g' => ("MM/dd/yyyy HH:mm", false),
        'G' => ("MM/dd/yyyy HH:mm:ss", false),
        'M' | 'm' => ("MMMM dd", false),
        'o' | 'O' => ("yyyy'-'MM'-'dd'T'HH':'mm':'ss'.'fffffffK", false),
        'r' | 'R' => ("ddd, dd MMM yyyy HH':'mm':'ss 'GMT'", true),
        's' => ("yyyy'-'MM'-'dd'T'HH':'mm':'ss", false),
        't' => ("HH:mm", false),
        'T' => ("HH:mm:ss", false),
        'u' => ("yyyy'-'MM'-'dd HH':'mm':'ss'Z'", true),
        'U' => ("dddd, dd MMMM yyyy HH:mm:ss", true),
        'y' | 'Y' => ("yyyy MMMM", false),
        _ => return None,
    };
    Some(expanded)
}

fn push_literal(parts: &mut Vec<DatePart>, text: &str) {
    if let Some(DatePart::Literal(last)) = parts.last_mut() {
        last.push_str(text);
    } else {
        parts.push(DatePart::Literal(text.to_string()));
    }
}

fn parse_custom(pattern: &str) -> Vec<DatePart> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut parts = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\'' | '"' => {
                // Quoted literal; an unterminated quote runs to the end
                let mut j = i + 1;
                let mut text = String::new();
                while j < chars.len() && chars[j] != c {
                    text.push(chars[j]);
                    j += 1;
                }
                push_literal(&mut parts, &text);
                i = j + 1;
            }
            '\\' => {
                if let Some(next) = chars.get(i + 1) {
                    push_literal(&mut parts, &next.to_string());
                }
                i += 2;
            }
            '%' => {
                i += 1;
            }
            'y' | 'M' | 'd' | 'H' | 'h' | 'm' | 's' | 'f' | 'F' | 't' | 'z' | 'g' => {
                let mut run = 1;
                while i + run < chars.len() && chars[i + run] == c {
                    run += 1;
                }
                let part = match c {
                    'y' => DatePart::Year(run.min(5)),
                    'M' => DatePart::Month(run.min(4)),
                    'd' => DatePart::Day(run.min(4)),
                    'H' => DatePart::Hour24(run.min(2)),
                    'h' => DatePart::Hour12(run.min(2)),
                    'm' => DatePart::Minute(run.min(2)),
                    's' => DatePart::Second(run.min(2)),
                    'f' => DatePart::Fraction {
                        digits: run.min(7),
                        trim: false,
                    },
                    'F' => DatePart::Fraction {
                        digits: run.min(7),
                        trim: true,
                    },
                    't' => DatePart::AmPm(run.min(2)),
                    'z' => DatePart::Offset(run.min(3)),
                    _ => DatePart::Era,
                };
                parts.push(part);
                i += run;
            }
            'K' => {
                parts.push(DatePart::OffsetK);
                i += 1;
            }
            other => {
                let mut buf = [0u8; 4];
                push_literal(&mut parts, other.encode_utf8(&mut buf));
                i += 1;
            }
        }
    }

    parts
}

fn render_part(out: &mut String, part: &DatePart, dt: &DateTime<FixedOffset>) {
    // Writing to a String cannot fail
    let _ = match part {
        DatePart::Literal(text) => {
            out.push_str(text);
            Ok(())
        }
        DatePart::Year(1) => write!(out, "{}", dt.year().rem_euclid(100)),
        DatePart::Year(2) => write!(out, "{:02}", dt.year().rem_euclid(100)),
        DatePart::Year(width) => write!(out, "{:0width$}", dt.year(), width = *width),
        DatePart::Month(1) => write!(out, "{}", dt.month()),
        DatePart::Month(2) => write!(out, "{:02}", dt.month()),
        DatePart::Month(3) => write!(out, "{}", &MONTH_NAMES[dt.month0() as usize][..3]),
        DatePart::Month(_) => write!(out, "{}", MONTH_NAMES[dt.month0() as usize]),
        DatePart::Day(1) => write!(out, "{}", dt.day()),
        DatePart::Day(2) => write!(out, "{:02}", dt.day()),
        DatePart::Day(3) => write!(
            out,
            "{}",
            &DAY_NAMES[dt.weekday().num_days_from_monday() as usize][..3]
        ),
        DatePart::Day(_) => write!(
            out,
            "{}",
            DAY_NAMES[dt.weekday().num_days_from_monday() as usize]
        ),
        DatePart::Hour24(1) => write!(out, "{}", dt.hour()),
        DatePart::Hour24(_) => write!(out, "{:02}", dt.hour()),
        DatePart::Hour12(width) => {
            let (_, hour) = dt.hour12();
            if *width == 1 {
                write!(out, "{}", hour)
            } else {
                write!(out, "{:02}", hour)
            }
        }
        DatePart::Minute(1) => write!(out, "{}", dt.minute()),
        DatePart::Minute(_) => write!(out, "{:02}", dt.minute()),
        DatePart::Second(1) => write!(out, "{}", dt.second()),
        DatePart::Second(_) => write!(out, "{:02}", dt.second()),
        DatePart::Fraction { digits, trim } => {
            // Leap-second nanos can exceed 999_999_999
            let nanos = dt.nanosecond().min(999_999_999) as u64;
            let value = nanos / 10u64.pow(9 - *digits as u32);
            let text = format!("{:0width$}", value, width = *digits);
            if *trim {
                out.push_str(text.trim_end_matches('0'));
            } else {
                out.push_str(&text);
            }
            Ok(())
        }
        DatePart::AmPm(width) => {
            let (is_pm, _) = dt.hour12();
            let marker = if is_pm { "PM" } else { "AM" };
            if *width == 1 {
                out.push_str(&marker[..1]);
            } else {
                out.push_str(marker);
            }
            Ok(())
        }
        DatePart::Offset(width) => {
            let seconds = dt.offset().local_minus_utc();
            let sign = if seconds < 0 { '-' } else { '+' };
            let hours = seconds.abs() / 3600;
            let minutes = (seconds.abs() % 3600) / 60;
            match width {
                1 => write!(out, "{}{}", sign, hours),
                2 => write!(out, "{}{:02}", sign, hours),
                _ => write!(out, "{}{:02}:{:02}", sign, hours, minutes),
            }
        }
        DatePart::OffsetK => {
            let seconds = dt.offset().local_minus_utc();
            let sign = if seconds < 0 { '-' } else { '+' };
            write!(
                out,
                "{}{:02}:{:02}",
                sign,
                seconds.abs() / 3600,
                (seconds.abs() % 3600) / 60
            )
        }
        DatePart::Era => {
            out.push_str(if dt.year() > 0 { "A.D." } else { "B.C." });
            Ok(())
        }
    };
}
