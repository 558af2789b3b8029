pub mod admin;
pub mod check_email;
pub mod favorites;
pub mod login;
pub mod programs;
pub mod suggest;

pub use admin::{admin_page, AdminVm};
pub use check_email::check_email_page;
pub use favorites::favorites_page;
pub use login::login_page;
pub use programs::{programs_page, ProgramsVm};
pub use suggest::{suggest_page, suggest_thanks_page};
