//! File-backed display surfaces.
//!
//! A surface is a plain-text file. New surfaces are created read-only with a
//! unique name; existing surfaces are edited atomically through a temporary
//! file in the same directory.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

const SURFACE_PREFIX: &str = "wiki-summary-";
const MAX_SUFFIX: usize = 10_000;

#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("surface is read-only: {0}")]
    ReadOnly(PathBuf),
    #[error("surface does not exist: {0}")]
    Missing(PathBuf),
    #[error("no free surface name for {0}")]
    Exhausted(String),
    #[error("surface io error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to replace surface: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Publish `contents` as a new, uniquely named, read-only surface for
/// `title` inside `dir`.
///
/// The text is written and synced to a temporary file first, so the surface
/// only ever appears complete. The first name is `wiki-summary-<slug>.txt`,
/// later ones get `-2`, `-3` ... appended. Names are claimed without
/// clobbering, so concurrent callers never receive the same file.
pub fn create_unique(dir: &Path, title: &str, contents: &[u8]) -> Result<PathBuf, SurfaceError> {
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    mark_read_only(tmp.path())?;

    let stem = format!("{}{}", SURFACE_PREFIX, slug(title));
    for n in 1..=MAX_SUFFIX {
        let name = if n == 1 {
            format!("{stem}.txt")
        } else {
            format!("{stem}-{n}.txt")
        };
        let path = dir.join(name);
        match tmp.persist_noclobber(&path) {
            Ok(_) => return Ok(path),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => tmp = e.file,
            Err(e) => return Err(e.into()),
        }
    }

    Err(SurfaceError::Exhausted(title.to_string()))
}

/// File-name-safe form of a title: lowercase, runs of anything other than
/// letters and digits folded into a single `_`.
pub fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    let trimmed = out.trim_end_matches('_');
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn mark_read_only(path: &Path) -> io::Result<()> {
    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_readonly(true);
    fs::set_permissions(path, permissions)
}

/// Whether this process may not write the surface at `path`.
///
/// Read-only permission bits count even where the process could write
/// anyway; otherwise the file is opened for writing (without truncating) and
/// a permission error means read-only.
pub fn is_read_only(path: &Path) -> Result<bool, SurfaceError> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(SurfaceError::Missing(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };
    if metadata.permissions().readonly() {
        return Ok(true);
    }

    match OpenOptions::new().write(true).open(path) {
        Ok(_) => Ok(false),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => Ok(true),
        Err(e) => Err(e.into()),
    }
}

/// Insert `text` into the surface at `path` at byte `offset` (end if `None`).
///
/// Symlinks are followed, so the file they point at is the one edited. The
/// offset is clamped to the content and moved back to a char boundary. The
/// surface is replaced in one rename, so a failure leaves it untouched.
/// Returns the byte offset the text was inserted at.
pub fn insert_at(path: &Path, offset: Option<usize>, text: &str) -> Result<usize, SurfaceError> {
    let path = match fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(SurfaceError::Missing(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };
    if is_read_only(&path)? {
        return Err(SurfaceError::ReadOnly(path));
    }

    let content = fs::read_to_string(&path)?;
    let at = floor_char_boundary(&content, offset.unwrap_or(content.len()));

    let mut updated = String::with_capacity(content.len() + text.len());
    updated.push_str(&content[..at]);
    updated.push_str(text);
    updated.push_str(&content[at..]);

    // canonical paths always have a parent
    let dir = path.parent().unwrap_or_else(|| Path::new("/"));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(updated.as_bytes())?;
    tmp.as_file().sync_all()?;
    fs::set_permissions(tmp.path(), fs::metadata(&path)?.permissions())?;
    tmp.persist(&path)?;

    Ok(at)
}

/// The word surrounding byte `offset` in `text`, if any.
///
/// An offset just past the end of a word still selects that word.
pub fn word_at(text: &str, offset: usize) -> Option<&str> {
    let at = floor_char_boundary(text, offset);

    let start = text[..at]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word_char(*c))
        .last()
        .map_or(at, |(i, _)| i);
    let end = text[at..]
        .char_indices()
        .find(|(_, c)| !is_word_char(*c))
        .map_or(text.len(), |(i, _)| at + i);

    (start < end).then(|| &text[start..end])
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '\''
}

fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut at = offset.min(text.len());
    while !text.is_char_boundary(at) {
        at -= 1;
    }
    at
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_folds_punctuation() {
        assert_eq!(slug("Haskell (programming language)"), "haskell_programming_language");
        assert_eq!(slug("  C++  "), "c");
        assert_eq!(slug("Zürich"), "zürich");
        assert_eq!(slug("!!!"), "untitled");
    }

    #[test]
    fn create_unique_never_reuses_a_name() {
        let dir = tempfile::tempdir().unwrap();
        let first = create_unique(dir.path(), "Emacs", b"one").unwrap();
        let second = create_unique(dir.path(), "Emacs", b"two").unwrap();
        let third = create_unique(dir.path(), "Emacs", b"three").unwrap();

        assert_eq!(first.file_name().unwrap(), "wiki-summary-emacs.txt");
        assert_eq!(second.file_name().unwrap(), "wiki-summary-emacs-2.txt");
        assert_eq!(third.file_name().unwrap(), "wiki-summary-emacs-3.txt");
        assert_eq!(fs::read_to_string(&first).unwrap(), "one");
        assert_eq!(fs::read_to_string(&third).unwrap(), "three");
    }

    #[test]
    fn create_unique_publishes_a_complete_read_only_file() {
        let dir = tempfile::tempdir().unwrap();

        let path = create_unique(dir.path(), "Emacs", b"Emacs is an editor.\n").unwrap();

        assert!(fs::metadata(&path).unwrap().permissions().readonly());
        assert_eq!(fs::read_to_string(&path).unwrap(), "Emacs is an editor.\n");
        // the temporary file was renamed, not left next to the surface
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, ["wiki-summary-emacs.txt"]);
    }

    #[test]
    fn create_unique_skips_names_taken_by_other_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("wiki-summary-emacs.txt"), "someone else").unwrap();

        let path = create_unique(dir.path(), "Emacs", b"mine").unwrap();

        assert_eq!(path.file_name().unwrap(), "wiki-summary-emacs-2.txt");
        assert_eq!(
            fs::read_to_string(dir.path().join("wiki-summary-emacs.txt")).unwrap(),
            "someone else"
        );
    }

    #[test]
    fn create_unique_makes_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let path = create_unique(&nested, "Emacs", b"x").unwrap();
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }

    #[test]
    fn insert_at_offset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "before|after").unwrap();

        let at = insert_at(&path, Some(7), "INSERTED").unwrap();

        assert_eq!(at, 7);
        assert_eq!(fs::read_to_string(&path).unwrap(), "before|INSERTEDafter");
    }

    #[test]
    fn insert_defaults_to_end_and_clamps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "abc").unwrap();

        insert_at(&path, None, "1").unwrap();
        insert_at(&path, Some(999), "2").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "abc12");
    }

    #[test]
    fn insert_respects_char_boundaries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "é").unwrap();

        let at = insert_at(&path, Some(1), "x").unwrap();

        assert_eq!(at, 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "xé");
    }

    #[test]
    fn insert_refuses_read_only_surface() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locked.txt");
        fs::write(&path, "original").unwrap();
        mark_read_only(&path).unwrap();

        let err = insert_at(&path, None, "more").unwrap_err();

        assert!(matches!(err, SurfaceError::ReadOnly(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    }

    #[cfg(unix)]
    #[test]
    fn insert_through_symlink_edits_the_link_target() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real.txt");
        let link = dir.path().join("link.txt");
        fs::write(&real, "real ").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        insert_at(&link, None, "INSERTED").unwrap();

        assert_eq!(fs::read_to_string(&real).unwrap(), "real INSERTED");
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    }

    #[test]
    fn is_read_only_for_writable_and_locked_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "text").unwrap();

        assert!(!is_read_only(&path).unwrap());
        mark_read_only(&path).unwrap();
        assert!(is_read_only(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "text");
    }

    #[test]
    fn insert_into_missing_surface() {
        let dir = tempfile::tempdir().unwrap();
        let err = insert_at(&dir.path().join("gone.txt"), None, "x").unwrap_err();
        assert!(matches!(err, SurfaceError::Missing(_)));
    }

    #[test]
    fn word_at_finds_surrounding_word() {
        let text = "see Haskell for details";
        assert_eq!(word_at(text, 6), Some("Haskell"));
        assert_eq!(word_at(text, 4), Some("Haskell"));
        assert_eq!(word_at(text, 11), Some("Haskell"));
        assert_eq!(word_at(text, 0), Some("see"));
        assert_eq!(word_at(text, 999), Some("details"));
    }

    #[test]
    fn word_at_whitespace_has_no_word() {
        assert_eq!(word_at("a  b", 2), None);
        assert_eq!(word_at("", 0), None);
    }
}
