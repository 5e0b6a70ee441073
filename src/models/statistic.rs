//! Dashboard statistic rows and their write payloads.
//!
//! Statistic values are persisted as text: the surrounding schema stores all
//! stat values generically as strings, and display code renders them as-is.
//! Numeric interpretation only happens at refresh time via [`parse_stat_value`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Count of property listings currently marked "For Sale".
pub const STAT_ACTIVE_LISTINGS: &str = "active_listings";
/// Count of all registered user profiles (buyers and agents).
pub const STAT_USERS_AGENTS: &str = "users_agents";
/// Count of all completed sale records.
pub const STAT_PROPERTIES_SOLD: &str = "properties_sold";

/// The statistics recomputed on every refresh pass.
pub const TRACKED_STATS: [&str; 3] = [STAT_ACTIVE_LISTINGS, STAT_USERS_AGENTS, STAT_PROPERTIES_SOLD];

/// One named statistic row as stored in `dashboard_stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DashboardStat {
    /// Store-assigned opaque identifier; empty on placeholder values.
    pub id: String,
    pub stat_name: String,
    pub stat_value: String,
    pub stat_change: i32,
    pub trend: Option<String>,
    pub compare_text: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl DashboardStat {
    /// Zero-value stand-in for a statistic that has no stored row yet, so
    /// display code never has to null-check.
    pub fn placeholder(name: &str) -> Self {
        Self {
            id: String::new(),
            stat_name: name.to_string(),
            stat_value: "0".to_string(),
            stat_change: 0,
            trend: None,
            compare_text: None,
            updated_at: None,
        }
    }
}

/// Insert payload for a statistic seen for the first time.
#[derive(Debug, Clone)]
pub struct NewStat {
    pub stat_name: String,
    pub stat_value: String,
    pub stat_change: i32,
    pub updated_at: DateTime<Utc>,
}

/// Partial update applied to an existing statistic row by id.
#[derive(Debug, Clone)]
pub struct StatUpdate {
    pub stat_value: String,
    pub stat_change: i32,
    pub updated_at: DateTime<Utc>,
}

/// Parse a stored stat value back to a number.
///
/// Tolerant of garbage: reads an optional sign and the leading digit run,
/// anything else (including trailing junk after the digits) is ignored and
/// an unparseable value counts as 0.
pub fn parse_stat_value(raw: &str) -> i64 {
    let trimmed = raw.trim();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let lead: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();
    lead.parse::<i64>().map(|n| sign * n).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_number() {
        assert_eq!(parse_stat_value("42"), 42);
        assert_eq!(parse_stat_value("0"), 0);
    }

    #[test]
    fn parse_negative_and_signed() {
        assert_eq!(parse_stat_value("-7"), -7);
        assert_eq!(parse_stat_value("+12"), 12);
    }

    #[test]
    fn parse_trailing_garbage_keeps_leading_digits() {
        assert_eq!(parse_stat_value("123abc"), 123);
        assert_eq!(parse_stat_value(" 50 units"), 50);
    }

    #[test]
    fn parse_garbage_defaults_to_zero() {
        assert_eq!(parse_stat_value(""), 0);
        assert_eq!(parse_stat_value("n/a"), 0);
        assert_eq!(parse_stat_value("--3"), 0);
    }

    #[test]
    fn placeholder_is_zero_valued() {
        let stat = DashboardStat::placeholder("foo");
        assert_eq!(stat.id, "");
        assert_eq!(stat.stat_name, "foo");
        assert_eq!(stat.stat_value, "0");
        assert_eq!(stat.stat_change, 0);
        assert!(stat.updated_at.is_none());
    }
}
