pub mod export_csv;
pub mod export_json;
pub mod export_print;
pub mod export_xlsx;

pub use export_csv::programs_to_csv;
pub use export_json::programs_to_json;
pub use export_print::programs_to_print_html;
pub use export_xlsx::programs_to_xlsx;

use crate::domain::Program;

pub const MISSING: &str = "N/A";

/// Column headers shared by the CSV and XLSX exports.
pub const COLUMNS: [&str; 18] = [
    "Program Name",
    "Organization",
    "Location",
    "Subject Area",
    "Grade Level",
    "Duration (Weeks)",
    "Cost Category",
    "Cost Amount",
    "Application Deadline",
    "Start Date",
    "End Date",
    "Prestige",
    "Program Type",
    "Delivery Method",
    "Housing Provided",
    "Financial Aid",
    "Application URL",
    "Description",
];

fn text(v: Option<&str>) -> String {
    v.map(str::to_string).unwrap_or_else(|| MISSING.to_string())
}

fn yes_no(v: Option<bool>) -> String {
    match v {
        Some(true) => "Yes".to_string(),
        Some(false) => "No".to_string(),
        None => MISSING.to_string(),
    }
}

/// One export row, in [`COLUMNS`] order. Missing values become `N/A`.
pub fn export_row(p: &Program) -> [String; 18] {
    [
        p.program_name.clone(),
        p.organization_name.clone(),
        p.location(),
        text(p.subject_area.as_deref()),
        p.grade_level
            .as_ref()
            .map(|g| g.to_string())
            .unwrap_or_else(|| MISSING.to_string()),
        p.duration_weeks
            .map(|w| w.to_string())
            .unwrap_or_else(|| MISSING.to_string()),
        text(p.cost_category.as_ref().map(|c| c.as_str())),
        text(p.cost_amount.as_deref()),
        text(p.application_deadline.as_deref()),
        text(p.start_date.as_deref()),
        text(p.end_date.as_deref()),
        p.prestige().label().to_string(),
        text(p.program_type.as_deref()),
        text(p.delivery_method.as_deref()),
        yes_no(p.housing_provided),
        yes_no(p.financial_aid_available),
        text(p.application_url.as_deref()),
        text(p.description.as_deref()),
    ]
}
