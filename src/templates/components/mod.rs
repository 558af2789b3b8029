use maud::{html, Markup};

pub mod email_cta;
pub mod error;
pub mod program_row;

pub use email_cta::email_cta_form;
pub use error::error_page;
pub use program_row::{favorite_button, program_row};

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}
