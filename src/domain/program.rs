// src/domain/program.rs

use serde::{Deserialize, Serialize};
use std::fmt;

pub const UNKNOWN_ORGANIZATION: &str = "Unknown Organization";

/// Opaque program identifier. Sources hand us either integers (SQLite) or
/// strings (fixtures, Supabase uuids); we only ever compare them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProgramId {
    Int(i64),
    Text(String),
}

impl ProgramId {
    /// Compares against a raw path/query value without interpreting it.
    pub fn matches_param(&self, raw: &str) -> bool {
        self.to_string() == raw.trim()
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramId::Int(n) => write!(f, "{n}"),
            ProgramId::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Tuition/funding classification. Unrecognized values are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CostCategory {
    Free,
    FreePlusStipend,
    FreePlusScholarship,
    LowCost,
    Paid,
    Other(String),
}

impl CostCategory {
    /// Canonical display and sort order.
    pub const ORDER: [CostCategory; 5] = [
        CostCategory::Free,
        CostCategory::FreePlusStipend,
        CostCategory::FreePlusScholarship,
        CostCategory::LowCost,
        CostCategory::Paid,
    ];

    pub fn parse(raw: &str) -> Self {
        match raw {
            "FREE" => CostCategory::Free,
            "FREE_PLUS_STIPEND" => CostCategory::FreePlusStipend,
            "FREE_PLUS_SCHOLARSHIP" => CostCategory::FreePlusScholarship,
            "LOW_COST" => CostCategory::LowCost,
            "PAID" => CostCategory::Paid,
            other => CostCategory::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CostCategory::Free => "FREE",
            CostCategory::FreePlusStipend => "FREE_PLUS_STIPEND",
            CostCategory::FreePlusScholarship => "FREE_PLUS_SCHOLARSHIP",
            CostCategory::LowCost => "LOW_COST",
            CostCategory::Paid => "PAID",
            CostCategory::Other(s) => s,
        }
    }

    /// Position in [`CostCategory::ORDER`]; `None` for unrecognized categories.
    pub fn rank(&self) -> Option<usize> {
        Self::ORDER.iter().position(|c| c == self)
    }

    pub fn label(&self) -> &str {
        match self {
            CostCategory::Free => "Free",
            CostCategory::FreePlusStipend => "Free + Stipend",
            CostCategory::FreePlusScholarship => "Free + Scholarship",
            CostCategory::LowCost => "Low Cost",
            CostCategory::Paid => "Paid",
            CostCategory::Other(s) => s,
        }
    }

    pub fn is_free(&self) -> bool {
        matches!(
            self,
            CostCategory::Free | CostCategory::FreePlusStipend | CostCategory::FreePlusScholarship
        )
    }
}

impl From<String> for CostCategory {
    fn from(raw: String) -> Self {
        CostCategory::parse(&raw)
    }
}

impl From<CostCategory> for String {
    fn from(c: CostCategory) -> Self {
        c.as_str().to_string()
    }
}

impl fmt::Display for CostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target grade: a single grade (6-12) or a free-form range such as "9-11".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GradeLevel {
    Grade(i64),
    Range(String),
}

impl GradeLevel {
    /// Integer-looking strings become `Grade`, anything else non-empty a `Range`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.parse::<i64>() {
            Ok(n) => Some(GradeLevel::Grade(n)),
            Err(_) => Some(GradeLevel::Range(raw.to_string())),
        }
    }

    /// Inclusive bounds of a range string like "9-11" or "9 - 12".
    pub fn range_bounds(&self) -> Option<(i64, i64)> {
        match self {
            GradeLevel::Grade(n) => Some((*n, *n)),
            GradeLevel::Range(s) => {
                let (lo, hi) = s.split_once('-')?;
                let lo = lo.trim().parse::<i64>().ok()?;
                let hi = hi.trim().parse::<i64>().ok()?;
                Some((lo.min(hi), lo.max(hi)))
            }
        }
    }
}

impl fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradeLevel::Grade(n) => write!(f, "{n}"),
            GradeLevel::Range(s) => f.write_str(s),
        }
    }
}

/// The canonical, origin-agnostic program record.
/// Produced by [`crate::domain::normalize`] and only ever read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: ProgramId,
    pub program_name: String,
    pub organization_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selectivity_percent: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_level: Option<GradeLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_category: Option<CostCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_weeks: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub housing_provided: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_aid_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_url: Option<String>,
}

impl Program {
    /// Minimal record, mostly useful for building fixtures.
    pub fn new(id: ProgramId, program_name: impl Into<String>) -> Self {
        Self {
            id,
            program_name: program_name.into(),
            organization_name: UNKNOWN_ORGANIZATION.to_string(),
            organization_website: None,
            description: None,
            subject_area: None,
            program_type: None,
            selectivity_percent: None,
            grade_level: None,
            cost_category: None,
            cost_amount: None,
            duration_weeks: None,
            location_city: None,
            location_state: None,
            application_deadline: None,
            start_date: None,
            end_date: None,
            delivery_method: None,
            housing_provided: None,
            financial_aid_available: None,
            application_url: None,
        }
    }

    /// Text the free-text search runs against.
    pub fn search_text(&self) -> String {
        [
            self.program_name.as_str(),
            self.organization_name.as_str(),
            self.description.as_deref().unwrap_or(""),
            self.subject_area.as_deref().unwrap_or(""),
        ]
        .join(" ")
    }
}
