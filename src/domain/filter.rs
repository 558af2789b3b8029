// src/domain/filter.rs

use crate::domain::classify::{grade_level_bounds, PrestigeTier};
use crate::domain::program::{CostCategory, GradeLevel, Program};
use std::collections::HashMap;

/// How the grade criterion is applied.
///
/// `Exact` compares the filter against a program's single target grade.
/// `Range` accepts a program when the grade lies inside its displayed range
/// ("Grades 10-12" for a grade-11 program). Both are kept because they disagree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GradeMode {
    #[default]
    Exact,
    Range,
}

impl GradeMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "exact" => Some(GradeMode::Exact),
            "range" => Some(GradeMode::Range),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GradeMode::Exact => "exact",
            GradeMode::Range => "range",
        }
    }
}

/// Active criteria. `None` / empty search means "no constraint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub search: String,
    pub cost: Option<CostCategory>,
    pub program_type: Option<String>,
    pub grade: Option<i64>,
    pub grade_mode: GradeMode,
    pub state: Option<String>,
    pub prestige: Option<PrestigeTier>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// "Clear all".
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty()
            && self.cost.is_none()
            && self.program_type.is_none()
            && self.grade.is_none()
            && self.state.is_none()
            && self.prestige.is_none()
    }

    /// Reads the query parameters used by the listing page and the search API.
    /// Empty values are treated as absent; unparseable grades are ignored.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let get = |key: &str| {
            params
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        Self {
            search: get("search").unwrap_or("").to_string(),
            cost: get("costCategory").map(CostCategory::parse),
            program_type: get("programType").map(str::to_string),
            grade: get("gradeLevel").and_then(|g| g.parse().ok()),
            grade_mode: get("gradeMode").and_then(GradeMode::parse).unwrap_or_default(),
            state: get("state").map(str::to_string),
            prestige: get("prestige").and_then(PrestigeTier::parse),
        }
    }

    /// Inverse of [`FilterState::from_params`]; only active criteria are emitted.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if !self.search.trim().is_empty() {
            out.push(("search", self.search.clone()));
        }
        if let Some(c) = &self.cost {
            out.push(("costCategory", c.as_str().to_string()));
        }
        if let Some(t) = &self.program_type {
            out.push(("programType", t.clone()));
        }
        if let Some(g) = self.grade {
            out.push(("gradeLevel", g.to_string()));
            if self.grade_mode != GradeMode::Exact {
                out.push(("gradeMode", self.grade_mode.as_str().to_string()));
            }
        }
        if let Some(s) = &self.state {
            out.push(("state", s.clone()));
        }
        if let Some(p) = self.prestige {
            out.push(("prestige", p.as_str().to_string()));
        }
        out
    }
}

/// True iff the program satisfies every active criterion.
pub fn matches(program: &Program, filter: &FilterState) -> bool {
    let search = filter.search.trim();
    if !search.is_empty()
        && !program
            .search_text()
            .to_lowercase()
            .contains(&search.to_lowercase())
    {
        return false;
    }

    if let Some(cost) = &filter.cost {
        if program.cost_category.as_ref() != Some(cost) {
            return false;
        }
    }

    if let Some(t) = &filter.program_type {
        if program.program_type.as_deref() != Some(t.as_str()) {
            return false;
        }
    }

    if let Some(grade) = filter.grade {
        if !grade_matches(program.grade_level.as_ref(), grade, filter.grade_mode) {
            return false;
        }
    }

    if let Some(state) = &filter.state {
        if program.location_state.as_deref() != Some(state.as_str()) {
            return false;
        }
    }

    if let Some(tier) = filter.prestige {
        if program.prestige() != tier {
            return false;
        }
    }

    true
}

fn grade_matches(level: Option<&GradeLevel>, grade: i64, mode: GradeMode) -> bool {
    match (mode, level) {
        (_, None) => false,
        (GradeMode::Exact, Some(GradeLevel::Grade(n))) => *n == grade,
        (GradeMode::Exact, Some(GradeLevel::Range(_))) => false,
        (GradeMode::Range, Some(level)) => grade_level_bounds(level)
            .map(|(lo, hi)| (lo..=hi).contains(&grade))
            .unwrap_or(false),
    }
}

/// Keeps matching programs in their input order.
pub fn filter_programs<'a>(programs: &'a [Program], filter: &FilterState) -> Vec<&'a Program> {
    programs.iter().filter(|p| matches(p, filter)).collect()
}
