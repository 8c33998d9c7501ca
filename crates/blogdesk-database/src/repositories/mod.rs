//! Repository implementations for all BlogDesk entities.

pub mod blog;
pub mod category;
pub mod comment;
pub mod stats;
pub mod tag;
pub mod user;

pub use blog::{BlogFilter, BlogRepository};
pub use category::CategoryRepository;
pub use comment::CommentRepository;
pub use stats::StatsRepository;
pub use tag::TagRepository;
pub use user::UserRepository;

/// Whether `err` is a UNIQUE violation on `table.column`.
///
/// SQLite reports violations as `UNIQUE constraint failed: table.column`
/// rather than by constraint name.
pub(crate) fn is_unique_violation(err: &sqlx::Error, target: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation() && db_err.message().contains(target)
        }
        _ => false,
    }
}

/// Build a `LIKE` pattern matching `term` anywhere, escaping wildcards with `\`.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("rust"), "%rust%");
        assert_eq!(contains_pattern("100%_done"), "%100\\%\\_done%");
    }
}
