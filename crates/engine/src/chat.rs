//! Free-text questions about groups.
//!
//! Only three phrasings are understood:
//!
//! - "how much does user 2 owes in group Trip?"
//! - "who paid the most in Trip?"
//! - "show me the latest 3 expenses [in group Trip]"

use std::sync::LazyLock;

use regex::Regex;

// The patterns are literals covered by the tests below, building them cannot
// fail at runtime.
#[allow(clippy::expect_used)]
static USER_OWES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^.*user\s+([0-9]+)\s+owes\s+(?:in\s+group\s+|in\s+)(.+)$")
        .expect("invalid user-owes pattern")
});

#[allow(clippy::expect_used)]
static TOP_PAYER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^.*who\s+paid\s+the\s+most\s+(?:in\s+group\s+|in\s+)(.+)$")
        .expect("invalid top-payer pattern")
});

#[allow(clippy::expect_used)]
static LATEST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^.*latest\s+([0-9]+)\s+expenses(?:\s+in\s+(?:group\s+)?(.+))?$")
        .expect("invalid latest-expenses pattern")
});

/// Answer returned when a question matches none of the known phrasings.
pub const HELP_TEXT: &str = "Sorry, I can only answer queries like \u{201c}How much user X owes in group Y?\u{201d}, \
\u{201c}Who paid the most in group Y?\u{201d}, or \u{201c}Show me my latest N expenses.\u{201d}";

/// A recognized question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatQuery {
    /// `user` holds the id digits as written, leading zeros removed. It is
    /// kept as text so an id too large for [`crate::UserId`] still gets an answer.
    UserOwes { user: String, group: String },
    TopPayer { group: String },
    Latest { count: usize, group: Option<String> },
}

impl ChatQuery {
    /// Matches `text` against the known phrasings, in order.
    pub fn parse(text: &str) -> Option<Self> {
        let raw = text.trim();

        if let Some(caps) = USER_OWES.captures(raw) {
            return Some(Self::UserOwes {
                user: strip_leading_zeros(&caps[1]),
                group: clean_name(&caps[2]),
            });
        }

        if let Some(caps) = TOP_PAYER.captures(raw) {
            return Some(Self::TopPayer {
                group: clean_name(&caps[1]),
            });
        }

        if let Some(caps) = LATEST.captures(raw) {
            let count = caps[1].parse().unwrap_or(usize::MAX);
            return Some(Self::Latest {
                count,
                group: caps.get(2).map(|m| clean_name(m.as_str())),
            });
        }

        None
    }
}

fn strip_leading_zeros(digits: &str) -> String {
    match digits.trim_start_matches('0') {
        "" => "0".to_string(),
        rest => rest.to_string(),
    }
}

fn clean_name(value: &str) -> String {
    value
        .trim()
        .trim_end_matches(['?', '.', '!'])
        .trim()
        .to_string()
}
