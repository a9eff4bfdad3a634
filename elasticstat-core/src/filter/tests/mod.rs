mod bulk_tests;
mod fixtures;
mod user_activity_tests;
