//! Output format patterns.
//!
//! Patterns use moment-style tokens (`YYYY-MM-DD HH:mm`) rather than
//! strftime. A pattern is accepted only when every character is part of a
//! recognized token or an allowed literal:
//!
//! - tokens: `YYYY YY Y Q MMMM MMM MM Mo M DDDD DDD DD Do D dddd ddd dd d E
//!   WW W GGGG HH H hh h kk k A a mm m ss s SSS SS S`
//! - literals: ASCII digits, whitespace, `- / : . _`, the letter `T`, and
//!   anything inside `[...]`
//!
//! Anything else (commas, parentheses, quotes, `+`, other letters) rejects
//! the whole pattern, which is how leftover call syntax such as
//! `year,-1,GETDATE()` is told apart from a format.

use std::fmt;

use chrono::{Datelike, NaiveDateTime, Timelike};

/// Pattern used when an expression has no format argument.
pub const DEFAULT_PATTERN: &str = "YYYY-MM-DD";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Year4,
    Year2,
    Year,
    Quarter,
    MonthName,
    MonthShort,
    Month2,
    MonthOrdinal,
    Month,
    DayOfYear3,
    DayOfYear,
    Day2,
    DayOrdinal,
    Day,
    WeekdayName,
    WeekdayShort,
    WeekdayMin,
    Weekday,
    IsoWeekday,
    IsoWeek2,
    IsoWeek,
    IsoWeekYear,
    Hour2,
    Hour,
    Hour12Padded,
    Hour12,
    Hour24Padded,
    Hour24,
    MeridiemUpper,
    MeridiemLower,
    Minute2,
    Minute,
    Second2,
    Second,
    Millis,
    Centis,
    Decis,
}

// Longest spelling of each letter first.
const TOKENS: &[(&str, Token)] = &[
    ("YYYY", Token::Year4),
    ("YY", Token::Year2),
    ("Y", Token::Year),
    ("Q", Token::Quarter),
    ("MMMM", Token::MonthName),
    ("MMM", Token::MonthShort),
    ("MM", Token::Month2),
    ("Mo", Token::MonthOrdinal),
    ("M", Token::Month),
    ("DDDD", Token::DayOfYear3),
    ("DDD", Token::DayOfYear),
    ("DD", Token::Day2),
    ("Do", Token::DayOrdinal),
    ("D", Token::Day),
    ("dddd", Token::WeekdayName),
    ("ddd", Token::WeekdayShort),
    ("dd", Token::WeekdayMin),
    ("d", Token::Weekday),
    ("E", Token::IsoWeekday),
    ("WW", Token::IsoWeek2),
    ("W", Token::IsoWeek),
    ("GGGG", Token::IsoWeekYear),
    ("HH", Token::Hour2),
    ("H", Token::Hour),
    ("hh", Token::Hour12Padded),
    ("h", Token::Hour12),
    ("kk", Token::Hour24Padded),
    ("k", Token::Hour24),
    ("A", Token::MeridiemUpper),
    ("a", Token::MeridiemLower),
    ("mm", Token::Minute2),
    ("m", Token::Minute),
    ("ss", Token::Second2),
    ("s", Token::Second),
    ("SSS", Token::Millis),
    ("SS", Token::Centis),
    ("S", Token::Decis),
];

const WEEKDAY_MIN: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum FormatItem {
    Token(Token),
    Literal(String),
}

/// A validated output pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatPattern {
    source: String,
    items: Vec<FormatItem>,
}

impl FormatPattern {
    /// Parse a pattern, returning `None` if it contains anything outside the
    /// accepted alphabet.
    pub fn parse(pattern: &str) -> Option<Self> {
        if pattern.is_empty() {
            return None;
        }

        let mut items = Vec::new();
        let mut rest = pattern;

        while let Some(c) = rest.chars().next() {
            if c == '[' {
                let close = rest.find(']')?;
                push_literal(&mut items, &rest[1..close]);
                rest = &rest[close + 1..];
                continue;
            }

            if let Some((spelling, token)) =
                TOKENS.iter().find(|(spelling, _)| rest.starts_with(*spelling))
            {
                items.push(FormatItem::Token(*token));
                rest = &rest[spelling.len()..];
                continue;
            }

            if is_literal_char(c) {
                let len = c.len_utf8();
                push_literal(&mut items, &rest[..len]);
                rest = &rest[len..];
                continue;
            }

            return None;
        }

        Some(Self { source: pattern.to_string(), items })
    }

    /// The pattern text as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Render a datetime with this pattern.
    #[must_use]
    pub fn render(&self, dt: &NaiveDateTime) -> String {
        Rendered { items: &self.items, dt }.to_string()
    }
}

impl Default for FormatPattern {
    fn default() -> Self {
        Self {
            source: DEFAULT_PATTERN.to_string(),
            items: vec![
                FormatItem::Token(Token::Year4),
                FormatItem::Literal("-".into()),
                FormatItem::Token(Token::Month2),
                FormatItem::Literal("-".into()),
                FormatItem::Token(Token::Day2),
            ],
        }
    }
}

impl fmt::Display for FormatPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn is_literal_char(c: char) -> bool {
    c.is_ascii_digit() || c.is_whitespace() || matches!(c, '-' | '/' | ':' | '.' | '_' | 'T')
}

fn push_literal(items: &mut Vec<FormatItem>, text: &str) {
    if let Some(FormatItem::Literal(last)) = items.last_mut() {
        last.push_str(text);
    } else {
        items.push(FormatItem::Literal(text.to_string()));
    }
}

struct Rendered<'a> {
    items: &'a [FormatItem],
    dt: &'a NaiveDateTime,
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in self.items {
            match item {
                FormatItem::Literal(text) => f.write_str(text)?,
                FormatItem::Token(token) => write_token(f, *token, self.dt)?,
            }
        }
        Ok(())
    }
}

fn write_token(f: &mut fmt::Formatter<'_>, token: Token, dt: &NaiveDateTime) -> fmt::Result {
    let hour = dt.hour();
    // leap seconds carry nanoseconds past 1e9
    let millis = (dt.nanosecond() / 1_000_000).min(999);

    match token {
        Token::Year4 => write!(f, "{:04}", dt.year()),
        Token::Year2 => write!(f, "{:02}", dt.year().rem_euclid(100)),
        Token::Year => write!(f, "{}", dt.year()),
        Token::Quarter => write!(f, "{}", dt.month0() / 3 + 1),
        Token::MonthName => write!(f, "{}", dt.format("%B")),
        Token::MonthShort => write!(f, "{}", dt.format("%b")),
        Token::Month2 => write!(f, "{:02}", dt.month()),
        Token::MonthOrdinal => write!(f, "{}", ordinal(dt.month())),
        Token::Month => write!(f, "{}", dt.month()),
        Token::DayOfYear3 => write!(f, "{:03}", dt.ordinal()),
        Token::DayOfYear => write!(f, "{}", dt.ordinal()),
        Token::Day2 => write!(f, "{:02}", dt.day()),
        Token::DayOrdinal => write!(f, "{}", ordinal(dt.day())),
        Token::Day => write!(f, "{}", dt.day()),
        Token::WeekdayName => write!(f, "{}", dt.format("%A")),
        Token::WeekdayShort => write!(f, "{}", dt.format("%a")),
        Token::WeekdayMin => {
            f.write_str(WEEKDAY_MIN[dt.weekday().num_days_from_sunday() as usize])
        }
        Token::Weekday => write!(f, "{}", dt.weekday().num_days_from_sunday()),
        Token::IsoWeekday => write!(f, "{}", dt.weekday().number_from_monday()),
        Token::IsoWeek2 => write!(f, "{:02}", dt.iso_week().week()),
        Token::IsoWeek => write!(f, "{}", dt.iso_week().week()),
        Token::IsoWeekYear => write!(f, "{:04}", dt.iso_week().year()),
        Token::Hour2 => write!(f, "{hour:02}"),
        Token::Hour => write!(f, "{hour}"),
        Token::Hour12Padded => write!(f, "{:02}", dt.hour12().1),
        Token::Hour12 => write!(f, "{}", dt.hour12().1),
        Token::Hour24Padded => write!(f, "{:02}", if hour == 0 { 24 } else { hour }),
        Token::Hour24 => write!(f, "{}", if hour == 0 { 24 } else { hour }),
        Token::MeridiemUpper => f.write_str(if hour < 12 { "AM" } else { "PM" }),
        Token::MeridiemLower => f.write_str(if hour < 12 { "am" } else { "pm" }),
        Token::Minute2 => write!(f, "{:02}", dt.minute()),
        Token::Minute => write!(f, "{}", dt.minute()),
        Token::Second2 => write!(f, "{:02}", dt.second()),
        Token::Second => write!(f, "{}", dt.second()),
        Token::Millis => write!(f, "{millis:03}"),
        Token::Centis => write!(f, "{:02}", millis / 10),
        Token::Decis => write!(f, "{}", millis / 100),
    }
}

fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
