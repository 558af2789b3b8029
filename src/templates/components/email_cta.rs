use maud::{html, Markup};

pub fn email_cta_form() -> Markup {
    html! {
        div class="email-cta-wrapper" {
            form method="post" action="/auth/request-link" class="email-cta" {
                label for="email" { "Email address" }
                " "
                input
                    type="email"
                    id="email"
                    name="email"
                    placeholder="you@domain.com"
                    autocomplete="email"
                    required;

                button type="submit" { "Send sign-in link" }

                p class="muted" {
                    "Sign in to save favorites. No password needed."
                }
            }
        }
    }
}
