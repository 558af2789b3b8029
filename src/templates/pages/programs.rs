// templates/pages/programs.rs
use crate::db::users::User;
use crate::domain::catalog::FilterOptions;
use crate::domain::filter::GradeMode;
use crate::domain::paginate::PAGE_SIZE_OPTIONS;
use crate::domain::{CatalogQuery, CostCategory, Page, PrestigeTier, Program, SortDirection, SortKey};
use crate::templates::{components::program_row, desktop_layout};
use maud::{html, Markup};

/// Columns whose header is a sort link.
const SORTABLE_COLUMNS: [SortKey; 7] = [
    SortKey::Name,
    SortKey::Organization,
    SortKey::Location,
    SortKey::Cost,
    SortKey::Prestige,
    SortKey::Duration,
    SortKey::Deadline,
];

pub struct ProgramsVm<'a> {
    pub viewer: Option<&'a User>,
    pub query: &'a CatalogQuery,
    pub page: &'a Page<Program>,
    pub options: &'a FilterOptions,
    /// Ids the viewer has favorited, in display form.
    pub favorites: &'a [String],
}

pub fn href(path: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let mut qs = url::form_urlencoded::Serializer::new(String::new());
    for (k, v) in params {
        qs.append_pair(k, v);
    }
    format!("{path}?{}", qs.finish())
}

fn listing_href(query: &CatalogQuery, page_index: usize) -> String {
    let mut params = query.to_params();
    params.push(("pageSize", query.page.page_size.to_string()));
    if page_index > 1 {
        params.push(("page", page_index.to_string()));
    }
    href("/", &params)
}

fn sort_header(query: &CatalogQuery, key: SortKey) -> Markup {
    let mut next = query.clone();
    next.sort = query.sort.toggled(key);
    let arrow = match (query.sort.key == key, query.sort.direction) {
        (false, _) => "",
        (true, SortDirection::Asc) => " ▲",
        (true, SortDirection::Desc) => " ▼",
    };
    html! {
        th { a href=(listing_href(&next, 1)) { (key.label()) (arrow) } }
    }
}

fn filter_form(vm: &ProgramsVm) -> Markup {
    let f = &vm.query.filter;
    html! {
        form method="get" action="/" class="card" style="display: flex; flex-wrap: wrap; gap: 0.75rem; align-items: end;" {
            label { "Search " input type="search" name="search" value=(f.search) placeholder="Name, organization, subject"; }
            label { "Cost "
                select name="costCategory" {
                    option value="" { "Any" }
                    @for c in &vm.options.cost_categories {
                        option value=(c) selected[f.cost.as_ref().map(CostCategory::as_str) == Some(c.as_str())] {
                            (CostCategory::parse(c).label())
                        }
                    }
                }
            }
            label { "Type "
                select name="programType" {
                    option value="" { "Any" }
                    @for t in &vm.options.program_types {
                        option value=(t) selected[f.program_type.as_deref() == Some(t.as_str())] { (t) }
                    }
                }
            }
            label { "Grade "
                select name="gradeLevel" {
                    option value="" { "Any" }
                    @for g in 6..=12i64 {
                        option value=(g) selected[f.grade == Some(g)] { (g) }
                    }
                }
                select name="gradeMode" {
                    option value="exact" selected[f.grade_mode == GradeMode::Exact] { "exactly" }
                    option value="range" selected[f.grade_mode == GradeMode::Range] { "within range" }
                }
            }
            label { "State "
                select name="state" {
                    option value="" { "Any" }
                    @for s in &vm.options.states {
                        option value=(s) selected[f.state.as_deref() == Some(s.as_str())] { (s) }
                    }
                }
            }
            label { "Prestige "
                select name="prestige" {
                    option value="" { "Any" }
                    @for tier in PrestigeTier::ORDER {
                        option value=(tier.as_str()) selected[f.prestige == Some(tier)] { (tier.label()) }
                    }
                }
            }
            label { "Sort "
                select name="sort" {
                    @for key in SortKey::ALL {
                        option value=(key.as_str()) selected[vm.query.sort.key == key] { (key.label()) }
                    }
                }
                select name="dir" {
                    option value="asc" selected[vm.query.sort.direction == SortDirection::Asc] { "ascending" }
                    option value="desc" selected[vm.query.sort.direction == SortDirection::Desc] { "descending" }
                }
            }
            label { "Per page "
                select name="pageSize" {
                    @for size in PAGE_SIZE_OPTIONS {
                        option value=(size) selected[vm.query.page.page_size == size] { (size) }
                    }
                }
            }
            button type="submit" { "Apply" }
            a href="/" { "Clear filters" }
        }
    }
}

/// Checked rows narrow the export to `ids`; with nothing checked the filtered set is exported.
fn export_form(query: &CatalogQuery) -> Markup {
    html! {
        form id="export-form" method="get" action="/export/csv" style="display: flex; gap: 0.5rem; margin-bottom: 1rem;" {
            @for (k, v) in query.to_params() {
                input type="hidden" name=(k) value=(v);
            }
            span class="muted" { "Export:" }
            button type="submit" formaction="/export/csv" { "CSV" }
            button type="submit" formaction="/export/json" { "JSON" }
            button type="submit" formaction="/export/xlsx" { "Excel" }
            button type="submit" formaction="/export/print" formtarget="_blank" { "Print" }
        }
    }
}

fn pager(query: &CatalogQuery, page: &Page<Program>) -> Markup {
    html! {
        nav class="pager" style="display: flex; gap: 1rem; align-items: center; margin-top: 1rem;" {
            @if page.has_previous() {
                a href=(listing_href(query, page.page_index - 1)) { "← Previous" }
            }
            span class="muted" { "Page " (page.page_index) " of " (page.total_pages) }
            @if page.has_next() {
                a href=(listing_href(query, page.page_index + 1)) { "Next →" }
            }
        }
    }
}

pub fn programs_page(vm: &ProgramsVm) -> Markup {
    let page = vm.page;
    let here = listing_href(vm.query, page.page_index);

    desktop_layout(
        "Programs",
        vm.viewer,
        html! {
            main {
                h1 { "Summer Programs" }
                (filter_form(vm))

                @if page.total_items == 0 {
                    p { "No programs match these filters." }
                } @else {
                    p class="muted" {
                        "Showing " (page.start_index + 1) "–" (page.end_index)
                        " of " (page.total_items) " programs"
                    }
                    (export_form(vm.query))

                    table {
                        thead {
                            tr {
                                th {}
                                @for key in SORTABLE_COLUMNS {
                                    (sort_header(vm.query, key))
                                }
                                th { "Grades" }
                                th {}
                            }
                        }
                        tbody {
                            @for program in &page.items {
                                @let favorite = vm.viewer.map(|_| {
                                    vm.favorites.iter().any(|id| program.id.matches_param(id))
                                });
                                (program_row(program, favorite, true, &here))
                            }
                        }
                    }
                    (pager(vm.query, page))
                }
            }
        },
    )
}
