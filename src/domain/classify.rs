// src/domain/classify.rs

//! Display classifications derived from a program's raw fields.
//! Nothing here is persisted; every value is recomputed on demand.

use crate::domain::program::{CostCategory, GradeLevel, Program};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEADLINE_PLACEHOLDER: &str = "Refer to website";
pub const DEFAULT_CITY: &str = "Various";
pub const DEFAULT_STATE: &str = "Multiple States";

/// Selectivity assumed when a program publishes none.
pub const DEFAULT_SELECTIVITY: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrestigeTier {
    Elite,
    HighlySelective,
    Selective,
    Accessible,
}

impl PrestigeTier {
    /// Most to least selective; also the sort order.
    pub const ORDER: [PrestigeTier; 4] = [
        PrestigeTier::Elite,
        PrestigeTier::HighlySelective,
        PrestigeTier::Selective,
        PrestigeTier::Accessible,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "elite" => Some(PrestigeTier::Elite),
            "highly-selective" => Some(PrestigeTier::HighlySelective),
            "selective" => Some(PrestigeTier::Selective),
            "accessible" => Some(PrestigeTier::Accessible),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrestigeTier::Elite => "elite",
            PrestigeTier::HighlySelective => "highly-selective",
            PrestigeTier::Selective => "selective",
            PrestigeTier::Accessible => "accessible",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PrestigeTier::Elite => "Elite",
            PrestigeTier::HighlySelective => "Highly Selective",
            PrestigeTier::Selective => "Selective",
            PrestigeTier::Accessible => "Accessible",
        }
    }

    pub fn rank(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for PrestigeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Buckets a selectivity percentage. Boundaries belong to the more selective tier.
pub fn prestige_tier(selectivity_percent: Option<u8>) -> PrestigeTier {
    match selectivity_percent.unwrap_or(DEFAULT_SELECTIVITY) {
        0..=10 => PrestigeTier::Elite,
        11..=25 => PrestigeTier::HighlySelective,
        26..=50 => PrestigeTier::Selective,
        _ => PrestigeTier::Accessible,
    }
}

/// Typical accepting range for a single target grade.
const GRADE_RANGES: [(i64, &str); 7] = [
    (6, "Grades 6-8"),
    (7, "Grades 7-9"),
    (8, "Grades 8-10"),
    (9, "Grades 9-10"),
    (10, "Grades 10-11"),
    (11, "Grades 10-12"),
    (12, "Grades 11-12"),
];

fn grade_range_entry(grade: i64) -> Option<&'static str> {
    GRADE_RANGES
        .iter()
        .find(|(g, _)| *g == grade)
        .map(|(_, label)| *label)
}

pub fn grade_level_range(grade: Option<&GradeLevel>) -> String {
    match grade {
        None => "N/A".to_string(),
        Some(GradeLevel::Grade(n)) => grade_range_entry(*n)
            .map(str::to_string)
            .unwrap_or_else(|| n.to_string()),
        Some(GradeLevel::Range(r)) => format!("Grades {r}"),
    }
}

/// Inclusive bounds of the grades a program is shown as accepting.
pub fn grade_level_bounds(grade: &GradeLevel) -> Option<(i64, i64)> {
    match grade {
        GradeLevel::Grade(n) => {
            let label = grade_range_entry(*n)?;
            GradeLevel::Range(label.trim_start_matches("Grades ").to_string()).range_bounds()
        }
        GradeLevel::Range(_) => grade.range_bounds(),
    }
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part (`2026-03-01T00:00:00Z`).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Dates on the 1st or 15th were most likely filled in by hand, not sourced.
pub fn is_estimated_deadline(date: Option<&str>) -> bool {
    date.and_then(parse_date)
        .map(|d| d.day() == 1 || d.day() == 15)
        .unwrap_or(false)
}

pub fn format_deadline(date: Option<&str>) -> String {
    let Some(parsed) = date.and_then(parse_date) else {
        return DEADLINE_PLACEHOLDER.to_string();
    };
    if !(1900..=2030).contains(&parsed.year()) {
        return DEADLINE_PLACEHOLDER.to_string();
    }

    let formatted = parsed.format("%b %-d, %Y").to_string();
    if is_estimated_deadline(date) {
        format!("{formatted}*")
    } else {
        formatted
    }
}

/// Short date for start/end columns; falls back to the raw text.
pub fn format_date(date: Option<&str>) -> Option<String> {
    let raw = date?;
    Some(
        parse_date(raw)
            .map(|d| d.format("%b %-d, %Y").to_string())
            .unwrap_or_else(|| raw.to_string()),
    )
}

pub fn location_display(city: Option<&str>, state: Option<&str>) -> String {
    let city = city.map(str::trim).filter(|s| !s.is_empty());
    let state = state.map(str::trim).filter(|s| !s.is_empty());
    format!(
        "{}, {}",
        city.unwrap_or(DEFAULT_CITY),
        state.unwrap_or(DEFAULT_STATE)
    )
}

pub fn cost_category_label(cost: Option<&CostCategory>) -> String {
    cost.map(|c| c.label().to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

impl Program {
    pub fn prestige(&self) -> PrestigeTier {
        prestige_tier(self.selectivity_percent)
    }

    pub fn location(&self) -> String {
        location_display(self.location_city.as_deref(), self.location_state.as_deref())
    }

    pub fn grade_range_label(&self) -> String {
        grade_level_range(self.grade_level.as_ref())
    }

    pub fn deadline_label(&self) -> String {
        format_deadline(self.application_deadline.as_deref())
    }
}
