// src/domain/normalize.rs

//! Maps every raw program shape we ingest onto the canonical [`Program`].
//! This is the anti-corruption layer between the stores and the catalog engine.
//!
//! | origin            | raw type                           | organization comes from    |
//! |-------------------|------------------------------------|----------------------------|
//! | static JSON       | [`FixtureRecord`] (camelCase)      | flat fields, then `organization` |
//! | SQLite            | [`ProgramRow`] + [`OrganizationRow`] | `LEFT JOIN organizations` |
//! | Supabase          | [`DocumentRow`] (snake_case)       | `organizations` sub-object |

use crate::domain::program::{CostCategory, GradeLevel, Program, ProgramId, UNKNOWN_ORGANIZATION};
use serde::Deserialize;
use serde_json::Value;

/// Denormalized organization attached to a raw record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NestedOrganization {
    pub name: Option<String>,
    pub website: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// A record from the static JSON fallback file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureRecord {
    pub id: Option<ProgramId>,
    pub program_name: Option<String>,
    pub organization_name: Option<String>,
    pub organization: Option<NestedOrganization>,
    pub description: Option<String>,
    pub subject_area: Option<String>,
    pub program_type: Option<String>,
    pub selectivity_percent: Option<Value>,
    pub grade_level: Option<Value>,
    pub cost_category: Option<String>,
    pub cost_amount: Option<Value>,
    pub duration_weeks: Option<Value>,
    pub location_city: Option<String>,
    pub location_state: Option<String>,
    pub application_deadline: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub delivery_method: Option<String>,
    pub housing_provided: Option<bool>,
    pub financial_aid_available: Option<bool>,
    pub application_url: Option<String>,
}

/// A row of the `programs` table.
#[derive(Debug, Clone, Default)]
pub struct ProgramRow {
    pub id: i64,
    pub program_name: Option<String>,
    pub description: Option<String>,
    pub subject_area: Option<String>,
    pub program_type: Option<String>,
    pub selectivity_percent: Option<i64>,
    pub grade_level: Option<String>,
    pub cost_category: Option<String>,
    pub cost_amount: Option<String>,
    pub duration_weeks: Option<i64>,
    pub location_city: Option<String>,
    pub location_state: Option<String>,
    pub application_deadline: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub delivery_method: Option<String>,
    pub housing_provided: Option<bool>,
    pub financial_aid_available: Option<bool>,
    pub application_url: Option<String>,
}

/// Organization columns joined onto a [`ProgramRow`].
#[derive(Debug, Clone, Default)]
pub struct OrganizationRow {
    pub name: Option<String>,
    pub website: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// A Supabase `programs` row selected with `organizations(*)`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentRow {
    pub id: Option<ProgramId>,
    pub program_name: Option<String>,
    pub organization_name: Option<String>,
    pub organizations: Option<NestedOrganization>,
    pub description: Option<String>,
    pub subject_area: Option<String>,
    pub program_type: Option<String>,
    pub selectivity_percent: Option<Value>,
    pub grade_level: Option<Value>,
    pub cost_category: Option<String>,
    pub cost_amount: Option<Value>,
    pub duration_weeks: Option<Value>,
    pub location_city: Option<String>,
    pub location_state: Option<String>,
    pub application_deadline: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub delivery_method: Option<String>,
    pub housing_provided: Option<bool>,
    pub financial_aid_available: Option<bool>,
    pub application_url: Option<String>,
}

#[derive(Debug, Clone)]
pub enum RawProgram {
    Fixture(FixtureRecord),
    Relational(ProgramRow, Option<OrganizationRow>),
    Document(DocumentRow),
}

impl RawProgram {
    /// Identifier used when logging a dropped record.
    pub fn describe(&self) -> String {
        let id = match self {
            RawProgram::Fixture(r) => r.id.as_ref().map(ToString::to_string),
            RawProgram::Relational(r, _) => Some(r.id.to_string()),
            RawProgram::Document(r) => r.id.as_ref().map(ToString::to_string),
        };
        id.unwrap_or_else(|| "<no id>".to_string())
    }
}

/// Every origin is first flattened into this, then finished the same way.
#[derive(Default)]
struct Draft {
    id: Option<ProgramId>,
    program_name: Option<String>,
    organization_name: Option<String>,
    organization: NestedOrganization,
    description: Option<String>,
    subject_area: Option<String>,
    program_type: Option<String>,
    selectivity_percent: Option<i64>,
    grade_level: Option<GradeLevel>,
    cost_category: Option<String>,
    cost_amount: Option<String>,
    duration_weeks: Option<i64>,
    location_city: Option<String>,
    location_state: Option<String>,
    application_deadline: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    delivery_method: Option<String>,
    housing_provided: Option<bool>,
    financial_aid_available: Option<bool>,
    application_url: Option<String>,
}

/// Returns `None` for records without a usable program name.
pub fn normalize(raw: &RawProgram) -> Option<Program> {
    let draft = match raw {
        RawProgram::Fixture(r) => Draft {
            id: r.id.clone(),
            program_name: r.program_name.clone(),
            organization_name: r.organization_name.clone(),
            organization: r.organization.clone().unwrap_or_default(),
            description: r.description.clone(),
            subject_area: r.subject_area.clone(),
            program_type: r.program_type.clone(),
            selectivity_percent: r.selectivity_percent.as_ref().and_then(value_as_i64),
            grade_level: r.grade_level.as_ref().and_then(value_as_grade),
            cost_category: r.cost_category.clone(),
            cost_amount: r.cost_amount.as_ref().and_then(value_as_text),
            duration_weeks: r.duration_weeks.as_ref().and_then(value_as_i64),
            location_city: r.location_city.clone(),
            location_state: r.location_state.clone(),
            application_deadline: r.application_deadline.clone(),
            start_date: r.start_date.clone(),
            end_date: r.end_date.clone(),
            delivery_method: r.delivery_method.clone(),
            housing_provided: r.housing_provided,
            financial_aid_available: r.financial_aid_available,
            application_url: r.application_url.clone(),
        },
        RawProgram::Relational(r, org) => {
            let org = org.clone().unwrap_or_default();
            Draft {
                id: Some(ProgramId::Int(r.id)),
                program_name: r.program_name.clone(),
                organization_name: None,
                organization: NestedOrganization {
                    name: org.name,
                    website: org.website,
                    city: org.city,
                    state: org.state,
                },
                description: r.description.clone(),
                subject_area: r.subject_area.clone(),
                program_type: r.program_type.clone(),
                selectivity_percent: r.selectivity_percent,
                grade_level: r.grade_level.as_deref().and_then(GradeLevel::parse),
                cost_category: r.cost_category.clone(),
                cost_amount: r.cost_amount.clone(),
                duration_weeks: r.duration_weeks,
                location_city: r.location_city.clone(),
                location_state: r.location_state.clone(),
                application_deadline: r.application_deadline.clone(),
                start_date: r.start_date.clone(),
                end_date: r.end_date.clone(),
                delivery_method: r.delivery_method.clone(),
                housing_provided: r.housing_provided,
                financial_aid_available: r.financial_aid_available,
                application_url: r.application_url.clone(),
            }
        }
        RawProgram::Document(r) => Draft {
            id: r.id.clone(),
            program_name: r.program_name.clone(),
            organization_name: r.organization_name.clone(),
            organization: r.organizations.clone().unwrap_or_default(),
            description: r.description.clone(),
            subject_area: r.subject_area.clone(),
            program_type: r.program_type.clone(),
            selectivity_percent: r.selectivity_percent.as_ref().and_then(value_as_i64),
            grade_level: r.grade_level.as_ref().and_then(value_as_grade),
            cost_category: r.cost_category.clone(),
            cost_amount: r.cost_amount.as_ref().and_then(value_as_text),
            duration_weeks: r.duration_weeks.as_ref().and_then(value_as_i64),
            location_city: r.location_city.clone(),
            location_state: r.location_state.clone(),
            application_deadline: r.application_deadline.clone(),
            start_date: r.start_date.clone(),
            end_date: r.end_date.clone(),
            delivery_method: r.delivery_method.clone(),
            housing_provided: r.housing_provided,
            financial_aid_available: r.financial_aid_available,
            application_url: r.application_url.clone(),
        },
    };
    finish(draft)
}

/// Normalizes a batch, dropping (and logging) invalid records. Input order is kept.
pub fn normalize_all<'a, I>(raws: I) -> Vec<Program>
where
    I: IntoIterator<Item = &'a RawProgram>,
{
    let mut out = Vec::new();
    let mut dropped = 0usize;
    for raw in raws {
        match normalize(raw) {
            Some(p) => out.push(p),
            None => {
                dropped += 1;
                log::warn!("dropping program record {}: missing programName", raw.describe());
            }
        }
    }
    if dropped > 0 {
        log::info!("normalized {} programs ({} dropped)", out.len(), dropped);
    }
    out
}

fn finish(d: Draft) -> Option<Program> {
    let program_name = non_empty(d.program_name)?;
    let organization_name = non_empty(d.organization_name)
        .or_else(|| non_empty(d.organization.name.clone()))
        .unwrap_or_else(|| UNKNOWN_ORGANIZATION.to_string());
    let id = d
        .id
        .unwrap_or_else(|| ProgramId::Text(slugify(&program_name)));

    Some(Program {
        id,
        program_name,
        organization_name,
        organization_website: non_empty(d.organization.website.clone()),
        description: non_empty(d.description),
        subject_area: non_empty(d.subject_area),
        program_type: non_empty(d.program_type),
        selectivity_percent: d.selectivity_percent.map(|n| n.clamp(0, 100) as u8),
        grade_level: d.grade_level,
        cost_category: non_empty(d.cost_category).map(CostCategory::from),
        cost_amount: non_empty(d.cost_amount),
        duration_weeks: d.duration_weeks.and_then(|n| u32::try_from(n).ok()),
        location_city: non_empty(d.location_city).or_else(|| non_empty(d.organization.city)),
        location_state: non_empty(d.location_state).or_else(|| non_empty(d.organization.state)),
        application_deadline: non_empty(d.application_deadline),
        start_date: non_empty(d.start_date),
        end_date: non_empty(d.end_date),
        delivery_method: non_empty(d.delivery_method),
        housing_provided: d.housing_provided,
        financial_aid_available: d.financial_aid_available,
        application_url: non_empty(d.application_url),
    })
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn value_as_i64(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }
}

fn value_as_grade(v: &Value) -> Option<GradeLevel> {
    match v {
        Value::Number(n) => n.as_i64().map(GradeLevel::Grade),
        Value::String(s) => GradeLevel::parse(s),
        _ => None,
    }
}

fn value_as_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_record_prefers_flat_fields() {
        let raw: FixtureRecord = serde_json::from_str(
            r#"{
                "id": 3,
                "programName": "  Research Science Institute ",
                "organizationName": "CEE",
                "organization": {"name": "Ignored", "city": "Cambridge", "state": "MA"},
                "selectivityPercent": "3%",
                "gradeLevel": 11,
                "costCategory": "FREE",
                "durationWeeks": 6
            }"#,
        )
        .unwrap();

        let p = normalize(&RawProgram::Fixture(raw)).unwrap();
        assert_eq!(p.id, ProgramId::Int(3));
        assert_eq!(p.program_name, "Research Science Institute");
        assert_eq!(p.organization_name, "CEE");
        assert_eq!(p.location_city.as_deref(), Some("Cambridge"));
        assert_eq!(p.location_state.as_deref(), Some("MA"));
        assert_eq!(p.selectivity_percent, Some(3));
        assert_eq!(p.grade_level, Some(GradeLevel::Grade(11)));
        assert_eq!(p.cost_category, Some(CostCategory::Free));
        assert_eq!(p.duration_weeks, Some(6));
    }

    #[test]
    fn missing_program_name_is_dropped() {
        let blank = RawProgram::Fixture(FixtureRecord {
            program_name: Some("   ".into()),
            ..Default::default()
        });
        let absent = RawProgram::Relational(ProgramRow { id: 9, ..Default::default() }, None);
        let ok = RawProgram::Relational(
            ProgramRow {
                id: 10,
                program_name: Some("Kept".into()),
                ..Default::default()
            },
            None,
        );

        let out = normalize_all(&[blank, absent, ok]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].program_name, "Kept");
        assert_eq!(out[0].organization_name, UNKNOWN_ORGANIZATION);
    }

    #[test]
    fn relational_row_takes_organization_from_join() {
        let row = ProgramRow {
            id: 1,
            program_name: Some("Summer Math".into()),
            grade_level: Some("9-11".into()),
            cost_category: Some("SLIDING_SCALE".into()),
            selectivity_percent: Some(140),
            ..Default::default()
        };
        let org = OrganizationRow {
            name: Some("Math Org".into()),
            website: Some("https://math.example".into()),
            city: Some("Austin".into()),
            state: Some("TX".into()),
        };

        let p = normalize(&RawProgram::Relational(row, Some(org))).unwrap();
        assert_eq!(p.organization_name, "Math Org");
        assert_eq!(p.organization_website.as_deref(), Some("https://math.example"));
        assert_eq!(p.location_city.as_deref(), Some("Austin"));
        assert_eq!(p.grade_level, Some(GradeLevel::Range("9-11".into())));
        assert_eq!(p.cost_category, Some(CostCategory::Other("SLIDING_SCALE".into())));
        assert_eq!(p.selectivity_percent, Some(100));
    }

    #[test]
    fn document_row_reads_organizations_object() {
        let raw: DocumentRow = serde_json::from_str(
            r#"{
                "id": "6f1c",
                "program_name": "Girls Who Code",
                "organizations": {"name": "GWC", "website": "https://gwc.example", "state": "NY"},
                "grade_level": "10",
                "cost_amount": 0
            }"#,
        )
        .unwrap();

        let p = normalize(&RawProgram::Document(raw)).unwrap();
        assert_eq!(p.id, ProgramId::Text("6f1c".into()));
        assert_eq!(p.organization_name, "GWC");
        assert_eq!(p.location_state.as_deref(), Some("NY"));
        assert_eq!(p.location_city, None);
        assert_eq!(p.grade_level, Some(GradeLevel::Grade(10)));
        assert_eq!(p.cost_amount.as_deref(), Some("0"));
    }

    #[test]
    fn missing_id_falls_back_to_slug() {
        let raw = RawProgram::Fixture(FixtureRecord {
            program_name: Some("MIT Launch (Online)".into()),
            ..Default::default()
        });
        let p = normalize(&raw).unwrap();
        assert_eq!(p.id, ProgramId::Text("mit-launch-online".into()));
    }
}
