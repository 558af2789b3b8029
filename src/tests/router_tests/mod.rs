mod admin_tests;
mod api_tests;
mod auth_flow_tests;
mod export_tests;
mod favorites_tests;
mod listing_tests;
