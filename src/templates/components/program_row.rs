use crate::domain::classify::cost_category_label;
use crate::domain::Program;
use maud::{html, Markup};

/// Star button that toggles the favorite and comes back to `next`.
pub fn favorite_button(program: &Program, is_favorite: bool, next: &str) -> Markup {
    html! {
        form method="post" action=(format!("/favorites/{}", program.id)) style="margin: 0;" {
            input type="hidden" name="next" value=(next);
            button type="submit" title=(if is_favorite { "Remove from favorites" } else { "Add to favorites" }) {
                @if is_favorite { "★" } @else { "☆" }
            }
        }
    }
}

/// One table row of the listing. `favorite` is `None` for anonymous visitors.
/// `selectable` adds the export checkbox bound to `#export-form`.
pub fn program_row(program: &Program, favorite: Option<bool>, selectable: bool, next: &str) -> Markup {
    html! {
        tr {
            td {
                @if selectable {
                    input type="checkbox" name="ids" value=(program.id) form="export-form";
                }
            }
            td {
                @match &program.application_url {
                    Some(url) => {
                        a href=(url) target="_blank" rel="noopener" { (program.program_name) }
                    }
                    None => { (program.program_name) }
                }
                @if let Some(subject) = &program.subject_area {
                    div class="muted" { (subject) }
                }
            }
            td { (program.organization_name) }
            td { (program.location()) }
            td { (cost_category_label(program.cost_category.as_ref())) }
            td { span class="badge" { (program.prestige().label()) } }
            td {
                @match program.duration_weeks {
                    Some(w) => (format!("{w} wk")),
                    None => "N/A",
                }
            }
            td { (program.deadline_label()) }
            td { (program.grade_range_label()) }
            td {
                @if let Some(is_favorite) = favorite {
                    (favorite_button(program, is_favorite, next))
                }
            }
        }
    }
}
