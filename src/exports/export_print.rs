use crate::domain::classify::{cost_category_label, format_date};
use crate::domain::Program;
use maud::{html, Markup, PreEscaped, DOCTYPE};

const PRINT_CSS: &str = r#"
body { font-family: Georgia, serif; margin: 2rem; color: #111; }
h1 { font-size: 1.6rem; margin-bottom: 0.25rem; }
.summary { color: #555; margin-bottom: 1.5rem; }
.program { border: 1px solid #ccc; border-radius: 6px; padding: 1rem; margin-bottom: 1rem; page-break-inside: avoid; }
.program h2 { font-size: 1.2rem; margin: 0 0 0.25rem 0; }
.program .org { color: #444; margin: 0 0 0.75rem 0; }
.details { display: grid; grid-template-columns: 1fr 1fr; gap: 0.25rem 1.5rem; font-size: 0.9rem; }
.description { margin-top: 0.75rem; font-size: 0.9rem; }
.note { font-size: 0.8rem; color: #666; margin-top: 2rem; }
"#;

fn detail(label: &str, value: String) -> Markup {
    html! {
        div { strong { (label) ": " } (value) }
    }
}

/// Standalone, print-ready document; it opens the print dialog on load.
pub fn programs_to_print_html<P: AsRef<Program>>(programs: &[P]) -> String {
    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { "Summer Programs" }
                style { (PreEscaped(PRINT_CSS)) }
            }
            body onload="window.print()" {
                h1 { "Summer Programs" }
                p class="summary" { (programs.len()) " programs" }

                @for program in programs {
                    @let p = program.as_ref();
                    div class="program" {
                        h2 { (p.program_name) }
                        p class="org" { (p.organization_name) }
                        div class="details" {
                            (detail("Location", p.location()))
                            (detail("Grades", p.grade_range_label()))
                            (detail("Cost", cost_category_label(p.cost_category.as_ref())))
                            (detail("Deadline", p.deadline_label()))
                            (detail("Prestige", p.prestige().label().to_string()))
                            @if let (Some(start), Some(end)) = (format_date(p.start_date.as_deref()), format_date(p.end_date.as_deref())) {
                                (detail("Dates", format!("{start} - {end}")))
                            }
                            @if let Some(weeks) = p.duration_weeks {
                                (detail("Duration", format!("{weeks} weeks")))
                            }
                            @if let Some(subject) = &p.subject_area {
                                (detail("Subject", subject.clone()))
                            }
                            @if let Some(url) = &p.application_url {
                                (detail("Apply", url.clone()))
                            }
                        }
                        @if let Some(desc) = &p.description {
                            p class="description" { (desc) }
                        }
                    }
                }

                p class="note" { "* Estimated deadline. Confirm dates on the program website." }
            }
        }
    };
    markup.into_string()
}
