use crate::db::suggestions::Suggestion;
use crate::db::users::User;
use crate::templates::{card, desktop_layout};
use maud::{html, Markup};

pub struct AdminVm<'a> {
    pub viewer: &'a User,
    pub pending: Vec<Suggestion>,
    pub reviewed: Vec<Suggestion>,
}

fn format_ts(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

fn pending_table(pending: &[Suggestion]) -> Markup {
    html! {
        @if pending.is_empty() {
            p class="muted" { "The queue is empty." }
        } @else {
            table {
                thead {
                    tr {
                        th { "Program" }
                        th { "Organization" }
                        th { "Cost" }
                        th { "State" }
                        th { "Submitted" }
                        th { "Decision" }
                    }
                }
                tbody {
                    @for s in pending {
                        tr {
                            td {
                                (s.program_name)
                                @if let Some(desc) = &s.description {
                                    div class="muted" { (desc) }
                                }
                            }
                            td {
                                @match &s.website {
                                    Some(url) => { a href=(url) target="_blank" rel="noopener" { (s.organization_name) } }
                                    None => { (s.organization_name) }
                                }
                            }
                            td { (s.cost_category.as_deref().unwrap_or("N/A")) }
                            td { (s.location_state.as_deref().unwrap_or("N/A")) }
                            td {
                                (format_ts(s.created_at))
                                div class="muted" { (s.submitter_email.as_deref().unwrap_or("anonymous")) }
                            }
                            td style="display: flex; gap: 0.5rem;" {
                                form method="post" action=(format!("/admin/suggestions/{}/approve", s.id)) style="margin: 0;" {
                                    button type="submit" { "Approve" }
                                }
                                form method="post" action=(format!("/admin/suggestions/{}/reject", s.id)) style="margin: 0;" {
                                    button type="submit" { "Reject" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn admin_page(vm: &AdminVm) -> Markup {
    desktop_layout(
        "Moderation",
        Some(vm.viewer),
        html! {
            main {
                h1 { "Moderation" }

                (card(&format!("Pending suggestions ({})", vm.pending.len()), pending_table(&vm.pending)))

                (card("Recently reviewed", html! {
                    @if vm.reviewed.is_empty() {
                        p class="muted" { "Nothing reviewed yet." }
                    } @else {
                        ul {
                            @for s in &vm.reviewed {
                                li {
                                    (s.program_name) " · " (s.organization_name) " · "
                                    span class="badge" { (s.status) }
                                    @if let Some(at) = s.reviewed_at {
                                        " " span class="muted" { (format_ts(at)) }
                                    }
                                }
                            }
                        }
                    }
                }))
            }
        },
    )
}
