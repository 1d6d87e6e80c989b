mod auth_tests;
mod events_tests;
