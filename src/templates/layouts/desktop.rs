use crate::db::users::User;
use maud::{html, Markup, DOCTYPE};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #1f2937; }
header { display: flex; align-items: center; justify-content: space-between; padding: 0.75rem 1.5rem; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
header nav ul { display: flex; gap: 1rem; list-style: none; margin: 0; padding: 0; }
main { padding: 1.5rem; }
table { width: 100%; border-collapse: collapse; }
th, td { padding: 8px; border-bottom: 1px solid #e5e7eb; text-align: left; vertical-align: top; }
.card { border: 1px solid #e5e7eb; border-radius: 8px; padding: 1rem; margin-bottom: 1.5rem; }
.muted { color: #6b7280; font-size: 0.9em; }
.badge { display: inline-block; padding: 2px 8px; border-radius: 999px; background: #eef2ff; font-size: 0.8em; }
"#;

pub fn desktop_layout(title: &str, viewer: Option<&User>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " | Summer Programs" }
                style { (maud::PreEscaped(STYLE)) }
            }
            body {
                header {
                    a href="/" style="font-weight: 600; text-decoration: none;" { "Summer Programs" }
                    nav {
                        ul {
                            li { a href="/" { "Programs" } }
                            li { a href="/suggest" { "Suggest a program" } }
                            @if let Some(user) = viewer {
                                li { a href="/favorites" { "Favorites" } }
                                @if user.is_admin {
                                    li { a href="/admin" { "Moderation" } }
                                }
                            }
                        }
                    }
                    @match viewer {
                        Some(user) => {
                            form method="post" action="/logout" style="margin: 0;" {
                                span class="muted" { (user.email) " " }
                                button type="submit" { "Log out" }
                            }
                        }
                        None => {
                            a href="/login" { "Login" }
                        }
                    }
                }
                (content)
            }
        }
    }
}
