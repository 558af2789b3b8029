use crate::db::users::User;
use crate::domain::CostCategory;
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn suggest_page(viewer: Option<&User>, error: Option<&str>) -> Markup {
    desktop_layout(
        "Suggest a program",
        viewer,
        html! {
            main style="max-width: 640px;" {
                h1 { "Suggest a program" }
                p class="muted" { "Suggestions are published once a moderator approves them." }

                @if let Some(msg) = error {
                    p role="alert" style="color: #b91c1c;" { (msg) }
                }

                form method="post" action="/suggest" style="display: grid; gap: 0.75rem;" {
                    label { "Program name* " input type="text" name="program_name" required; }
                    label { "Organization* " input type="text" name="organization_name" required; }
                    label { "Website " input type="url" name="website" placeholder="https://"; }
                    label { "Description " textarea name="description" rows="4" {} }
                    label { "Cost "
                        select name="cost_category" {
                            option value="" { "Unknown" }
                            @for c in CostCategory::ORDER {
                                option value=(c.as_str()) { (c.label()) }
                            }
                        }
                    }
                    label { "State " input type="text" name="location_state" maxlength="2" placeholder="CA"; }
                    button type="submit" { "Submit suggestion" }
                }
            }
        },
    )
}

pub fn suggest_thanks_page(viewer: Option<&User>, program_name: &str) -> Markup {
    desktop_layout(
        "Thanks",
        viewer,
        html! {
            main {
                h1 { "Thanks for the suggestion" }
                p { strong { (program_name) } " is waiting for review." }
                p { a href="/" { "Back to programs" } }
            }
        },
    )
}
