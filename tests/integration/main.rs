//! Integration tests driving the full router against in-memory SQLite.

mod helpers;

mod auth_test;
mod blog_test;
mod comment_test;
mod site_test;
mod taxonomy_test;
mod user_test;
