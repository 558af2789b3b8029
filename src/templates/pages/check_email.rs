use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn check_email_page(email: &str) -> Markup {
    desktop_layout(
        "Check your email",
        None,
        html! {
            main class="container narrow" {
                h3 { "Check your email" }
                p {
                    "We sent a sign-in link to "
                    strong { (email) }
                    "."
                }
                p class="muted" {
                    "The link can be used once and expires shortly."
                }
                a href="/login" { "Try with a different email" }
            }
        },
    )
}
