//! Repository implementations for all Lantern entities.

pub mod archive_job;
pub mod category;
pub mod file;
pub mod folder;

pub use archive_job::ArchiveJobRepository;
pub use category::CategoryRepository;
pub use file::FileRepository;
pub use folder::FolderRepository;

/// Escape LIKE wildcards in a user-supplied string. The result is meant
/// for use with an `ESCAPE '\'` clause.
pub(crate) fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Build a substring-match LIKE pattern from a search term.
pub(crate) fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}
