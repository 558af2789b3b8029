// src/domain/sort.rs

//! Orderings for the program table.
//!
//! All sorts are stable. Descending order reverses the comparator rather than
//! the output, so programs with equal keys keep their input order either way.

use crate::domain::classify::{parse_date, DEFAULT_SELECTIVITY};
use crate::domain::program::Program;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Name,
    Organization,
    Location,
    Cost,
    Prestige,
    Duration,
    Deadline,
    Selectivity,
}

impl SortKey {
    pub const ALL: [SortKey; 8] = [
        SortKey::Name,
        SortKey::Organization,
        SortKey::Location,
        SortKey::Cost,
        SortKey::Prestige,
        SortKey::Duration,
        SortKey::Deadline,
        SortKey::Selectivity,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "name" => Some(SortKey::Name),
            "organization" => Some(SortKey::Organization),
            "location" => Some(SortKey::Location),
            "cost" => Some(SortKey::Cost),
            "prestige" => Some(SortKey::Prestige),
            "duration" => Some(SortKey::Duration),
            "deadline" => Some(SortKey::Deadline),
            "selectivity" => Some(SortKey::Selectivity),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Organization => "organization",
            SortKey::Location => "location",
            SortKey::Cost => "cost",
            SortKey::Prestige => "prestige",
            SortKey::Duration => "duration",
            SortKey::Deadline => "deadline",
            SortKey::Selectivity => "selectivity",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Name => "Program",
            SortKey::Organization => "Organization",
            SortKey::Location => "Location",
            SortKey::Cost => "Cost",
            SortKey::Prestige => "Prestige",
            SortKey::Duration => "Duration",
            SortKey::Deadline => "Deadline",
            SortKey::Selectivity => "Selectivity",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Selecting a new key sorts ascending; re-selecting the current key flips direction.
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.flipped();
        } else {
            self.key = key;
            self.direction = SortDirection::Asc;
        }
    }

    /// The state a column header link should request.
    pub fn toggled(mut self, key: SortKey) -> Self {
        self.toggle(key);
        self
    }

    /// `sort` and `dir`; unknown values keep the default.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            key: params
                .get("sort")
                .and_then(|v| SortKey::parse(v))
                .unwrap_or_default(),
            direction: params
                .get("dir")
                .and_then(|v| SortDirection::parse(v))
                .unwrap_or_default(),
        }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("sort", self.key.as_str().to_string()),
            ("dir", self.direction.as_str().to_string()),
        ]
    }
}

/// Stand-in for a missing or unparseable deadline; sorts after every real date.
pub fn deadline_sentinel() -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX)
}

fn deadline_key(p: &Program) -> NaiveDate {
    p.application_deadline
        .as_deref()
        .and_then(parse_date)
        .unwrap_or_else(deadline_sentinel)
}

fn text_key(s: Option<&str>) -> String {
    s.unwrap_or("").to_lowercase()
}

/// Raw "city state" text; missing parts are empty so unlocated programs sort first.
fn location_key(p: &Program) -> String {
    let city = p.location_city.as_deref().unwrap_or("").trim();
    let state = p.location_state.as_deref().unwrap_or("").trim();
    format!("{city} {state}").trim().to_lowercase()
}

/// Unknown categories rank after every known one.
fn cost_key(p: &Program) -> usize {
    p.cost_category
        .as_ref()
        .and_then(|c| c.rank())
        .unwrap_or(usize::MAX)
}

pub fn compare(a: &Program, b: &Program, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => text_key(Some(&a.program_name)).cmp(&text_key(Some(&b.program_name))),
        SortKey::Organization => {
            text_key(Some(&a.organization_name)).cmp(&text_key(Some(&b.organization_name)))
        }
        SortKey::Location => location_key(a).cmp(&location_key(b)),
        SortKey::Cost => cost_key(a).cmp(&cost_key(b)),
        SortKey::Prestige => a.prestige().rank().cmp(&b.prestige().rank()),
        SortKey::Duration => a
            .duration_weeks
            .unwrap_or(0)
            .cmp(&b.duration_weeks.unwrap_or(0)),
        SortKey::Deadline => deadline_key(a).cmp(&deadline_key(b)),
        SortKey::Selectivity => a
            .selectivity_percent
            .unwrap_or(DEFAULT_SELECTIVITY)
            .cmp(&b.selectivity_percent.unwrap_or(DEFAULT_SELECTIVITY)),
    }
}

/// Sorts in place with `slice::sort_by`, which is stable.
pub fn sort_programs<T: AsRef<Program>>(programs: &mut [T], state: SortState) {
    programs.sort_by(|a, b| {
        let ord = compare(a.as_ref(), b.as_ref(), state.key);
        match state.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

impl AsRef<Program> for Program {
    fn as_ref(&self) -> &Program {
        self
    }
}
