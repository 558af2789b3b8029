// src/domain/catalog.rs

use crate::domain::classify::PrestigeTier;
use crate::domain::filter::{filter_programs, FilterState};
use crate::domain::paginate::{paginate, Page, PageState};
use crate::domain::program::{CostCategory, GradeLevel, Program, ProgramId};
use crate::domain::sort::{sort_programs, SortState};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Everything a listing request needs, parsed from the query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogQuery {
    pub filter: FilterState,
    pub sort: SortState,
    pub page: PageState,
}

impl CatalogQuery {
    pub fn from_params(params: &HashMap<String, String>, default_page_size: usize) -> Self {
        Self {
            filter: FilterState::from_params(params),
            sort: SortState::from_params(params),
            page: PageState::from_params(params, default_page_size),
        }
    }

    /// Filter and sort params. Links built from these land on page 1.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut out = self.filter.to_params();
        out.extend(self.sort.to_params());
        out
    }
}

/// Comma separated `ids=` selection, as sent by the export links.
pub fn parse_ids(raw: Option<&str>) -> Vec<String> {
    raw.map(|ids| {
        ids.split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Filters and sorts the full list. The result borrows from `programs`.
pub fn filter_and_sort<'a>(
    programs: &'a [Program],
    filter: &FilterState,
    sort: SortState,
) -> Vec<&'a Program> {
    let mut found = filter_programs(programs, filter);
    sort_programs(&mut found, sort);
    found
}

/// filter -> sort -> paginate, recomputed from scratch on every call.
pub fn run_query(programs: &[Program], query: &CatalogQuery) -> Page<Program> {
    let ordered = filter_and_sort(programs, &query.filter, query.sort);
    paginate(&ordered, query.page.page_index, query.page.page_size).map(Program::clone)
}

/// Restricts an ordered result to an explicit selection, keeping result order.
pub fn select_ids<'a>(programs: Vec<&'a Program>, ids: &[String]) -> Vec<&'a Program> {
    if ids.is_empty() {
        return programs;
    }
    programs
        .into_iter()
        .filter(|p| ids.iter().any(|id| p.id.matches_param(id)))
        .collect()
}

pub fn find_program<'a>(programs: &'a [Program], raw_id: &str) -> Option<&'a Program> {
    programs.iter().find(|p| p.id.matches_param(raw_id))
}

/// Values offered by the filter dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub cost_categories: Vec<String>,
    pub program_types: Vec<String>,
    pub states: Vec<String>,
    pub grade_levels: Vec<i64>,
    pub prestige_tiers: Vec<String>,
}

pub fn filter_options(programs: &[Program]) -> FilterOptions {
    let mut costs: Vec<&CostCategory> = Vec::new();
    let mut types = BTreeSet::new();
    let mut states = BTreeSet::new();
    let mut grades = BTreeSet::new();
    let mut tiers = BTreeSet::new();

    for p in programs {
        if let Some(c) = &p.cost_category {
            if !costs.contains(&c) {
                costs.push(c);
            }
        }
        if let Some(t) = &p.program_type {
            types.insert(t.clone());
        }
        if let Some(s) = &p.location_state {
            states.insert(s.clone());
        }
        if let Some(GradeLevel::Grade(g)) = &p.grade_level {
            grades.insert(*g);
        }
        tiers.insert(p.prestige());
    }

    costs.sort_by_key(|c| (c.rank().unwrap_or(usize::MAX), c.as_str().to_string()));

    FilterOptions {
        cost_categories: costs.iter().map(|c| c.as_str().to_string()).collect(),
        program_types: types.into_iter().collect(),
        states: states.into_iter().collect(),
        grade_levels: grades.into_iter().collect(),
        prestige_tiers: tiers.into_iter().map(|t| t.as_str().to_string()).collect(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramStats {
    pub total_programs: usize,
    /// FREE, FREE_PLUS_STIPEND and FREE_PLUS_SCHOLARSHIP together.
    pub free_programs: usize,
    pub organizations: usize,
    pub states: usize,
    pub by_cost_category: BTreeMap<String, usize>,
    pub by_prestige: BTreeMap<String, usize>,
    pub by_program_type: BTreeMap<String, usize>,
}

pub fn compute_stats(programs: &[Program]) -> ProgramStats {
    let mut stats = ProgramStats {
        total_programs: programs.len(),
        ..Default::default()
    };
    let mut orgs = BTreeSet::new();
    let mut states = BTreeSet::new();

    for tier in PrestigeTier::ORDER {
        stats.by_prestige.insert(tier.as_str().to_string(), 0);
    }

    for p in programs {
        if p.cost_category.as_ref().is_some_and(CostCategory::is_free) {
            stats.free_programs += 1;
        }
        let cost = p
            .cost_category
            .as_ref()
            .map(|c| c.as_str().to_string())
            .unwrap_or_else(|| "UNKNOWN".to_string());
        *stats.by_cost_category.entry(cost).or_default() += 1;
        *stats
            .by_prestige
            .entry(p.prestige().as_str().to_string())
            .or_default() += 1;
        if let Some(t) = &p.program_type {
            *stats.by_program_type.entry(t.clone()).or_default() += 1;
        }
        orgs.insert(p.organization_name.to_lowercase());
        if let Some(s) = &p.location_state {
            states.insert(s.clone());
        }
    }

    stats.organizations = orgs.len();
    stats.states = states.len();
    stats
}
