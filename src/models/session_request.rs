//! What the user picked on the selection screen.
use std::fmt;

pub const DEFAULT_CARD_COUNT: u32 = 10;

/// Card selection strategy. Only the name matters on this side; the server
/// decides what "smart" means.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StudyMode {
    Normal,
    Smart,
    All,
}

impl StudyMode {
    /// Value sent as the `modo` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            StudyMode::Normal => "normal",
            StudyMode::Smart => "smart",
            StudyMode::All => "all",
        }
    }
}

impl fmt::Display for StudyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionRequest {
    pub category: String,
    pub mode: StudyMode,
    pub count: u32,
}

impl SessionRequest {
    pub fn new(category: impl Into<String>, mode: StudyMode, count: u32) -> Self {
        Self {
            category: category.into(),
            mode,
            count: if count == 0 { DEFAULT_CARD_COUNT } else { count },
        }
    }

    /// Reads the count field of the selection form. Blank, zero or
    /// unparseable input falls back to `default`.
    pub fn parse_count(input: &str, default: u32) -> u32 {
        match input.trim().parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => default,
        }
    }
}
