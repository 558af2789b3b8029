use crate::db::users::User;
use crate::domain::Program;
use crate::templates::pages::programs::href;
use crate::templates::{components::program_row, desktop_layout};
use maud::{html, Markup};

pub fn favorites_page(viewer: &User, programs: &[&Program]) -> Markup {
    let ids = programs
        .iter()
        .map(|p| p.id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let export = |path: &str| href(path, &[("ids", ids.clone())]);

    desktop_layout(
        "Favorites",
        Some(viewer),
        html! {
            main {
                h1 { "Your favorites" }
                @if programs.is_empty() {
                    p {
                        "Nothing saved yet. Use the ☆ next to a program on the "
                        a href="/" { "program list" }
                        " to keep it here."
                    }
                } @else {
                    p class="muted" {
                        (programs.len()) " saved · export as "
                        a href=(export("/export/csv")) { "CSV" } ", "
                        a href=(export("/export/json")) { "JSON" } ", "
                        a href=(export("/export/xlsx")) { "Excel" } " or "
                        a href=(export("/export/print")) target="_blank" { "print" }
                    }
                    table {
                        thead {
                            tr {
                                th {}
                                th { "Program" }
                                th { "Organization" }
                                th { "Location" }
                                th { "Cost" }
                                th { "Prestige" }
                                th { "Duration" }
                                th { "Deadline" }
                                th { "Grades" }
                                th {}
                            }
                        }
                        tbody {
                            @for program in programs {
                                (program_row(program, Some(true), false, "/favorites"))
                            }
                        }
                    }
                }
            }
        },
    )
}
