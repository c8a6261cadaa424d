use std::cell::RefCell;
use std::fs;
use std::io::{self, ErrorKind, Stderr, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::errors::{PodNoteError, PodNoteResult};

pub const NOTE_EXTENSION: &str = ".md";

/// Destination for a rendered note.
#[cfg_attr(test, mockall::automock)]
pub trait NoteSink {
    /// Insert at the cursor of the active document
    fn insert_at_cursor(&self, text: &str) -> PodNoteResult<()>;

    /// Create a new note at `path`; never overwrites
    fn create_note(&self, path: &str, text: &str) -> PodNoteResult<()>;
}

/// A document open for editing, with an optional 1-based cursor line.
/// Without a line the cursor sits at the end of the document.
#[derive(Debug, Clone)]
pub struct ActiveDocument {
    pub path: PathBuf,
    pub line: Option<usize>,
}

/// Writes notes into a directory tree on disk.
pub struct FileSink {
    root: PathBuf,
    active: Option<ActiveDocument>,
}

impl FileSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            active: None,
        }
    }

    /// Fully written temp file beside `target`, ready to be renamed into place
    fn staged(target: &Path, text: &str) -> PodNoteResult<NamedTempFile> {
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(text.as_bytes())?;
        staged.as_file().sync_all()?;
        Ok(staged)
    }

    pub fn with_active_document(mut self, active: Option<ActiveDocument>) -> Self {
        self.active = active;
        self
    }

    /// Byte offset of the start of `line`, clamped to the end of `content`
    fn cursor_offset(content: &str, line: Option<usize>) -> usize {
        match line {
            None => content.len(),
            Some(0) | Some(1) => 0,
            Some(n) => content
                .match_indices('\n')
                .nth(n - 2)
                .map(|(i, _)| i + 1)
                .unwrap_or(content.len()),
        }
    }
}

impl NoteSink for FileSink {
    fn insert_at_cursor(&self, text: &str) -> PodNoteResult<()> {
        let active = self.active.as_ref().ok_or(PodNoteError::NoActiveDocument)?;

        let mut content = match fs::read_to_string(&active.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PodNoteError::NoActiveDocument);
            }
            Err(e) => return Err(e.into()),
        };

        let mut offset = Self::cursor_offset(&content, active.line);
        if offset == content.len() && !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
            offset = content.len();
        }
        content.insert_str(offset, text);

        let staged = Self::staged(&active.path, &content)?;
        staged
            .as_file()
            .set_permissions(fs::metadata(&active.path)?.permissions())?;
        staged.persist(&active.path).map_err(|e| e.error)?;

        tracing::info!(path = %active.path.display(), "inserted podcast note");
        Ok(())
    }

    fn create_note(&self, path: &str, text: &str) -> PodNoteResult<()> {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Self::staged(&full_path, text)?
            .persist_noclobber(&full_path)
            .map_err(|e| match e.error.kind() {
                ErrorKind::AlreadyExists => {
                    PodNoteError::NoteAlreadyExists(full_path.display().to_string())
                }
                _ => PodNoteError::Io(e.error),
            })?;

        tracing::info!(path = %full_path.display(), "created podcast note");
        Ok(())
    }
}

/// Prints what would be delivered instead of touching any file.
pub struct StdoutSink;

impl NoteSink for StdoutSink {
    fn insert_at_cursor(&self, text: &str) -> PodNoteResult<()> {
        println!("[DRY RUN] Would insert at cursor:\n");
        println!("{}", text);
        Ok(())
    }

    fn create_note(&self, path: &str, text: &str) -> PodNoteResult<()> {
        println!("[DRY RUN] Would create {}:\n", path);
        println!("{}", text);
        Ok(())
    }
}

/// One-line messages for the user.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    fn progress(&self, message: &str);
    fn error(&self, message: &str);
}

/// Writes every notice to one stream, stderr by default, so stdout only
/// carries note output.
pub struct ConsoleNotifier<W: Write = Stderr> {
    out: RefCell<W>,
}

impl ConsoleNotifier {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> ConsoleNotifier<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    fn write_line(&self, message: &str) {
        if let Err(e) = writeln!(self.out.borrow_mut(), "{}", message) {
            tracing::debug!(error = %e, "could not write notice");
        }
    }
}

impl<W: Write> Notifier for ConsoleNotifier<W> {
    fn progress(&self, message: &str) {
        self.write_line(message);
    }

    fn error(&self, message: &str) {
        self.write_line(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn active(dir: &TempDir, content: &str, line: Option<usize>) -> ActiveDocument {
        let path = dir.path().join("daily.md");
        fs::write(&path, content).unwrap();
        ActiveDocument { path, line }
    }

    #[test]
    fn test_insert_without_active_document() {
        let dir = TempDir::new().unwrap();
        let sink = FileSink::new(dir.path());

        assert!(matches!(
            sink.insert_at_cursor("text"),
            Err(PodNoteError::NoActiveDocument)
        ));
    }

    #[test]
    fn test_insert_into_missing_file() {
        let dir = TempDir::new().unwrap();
        let sink = FileSink::new(dir.path()).with_active_document(Some(ActiveDocument {
            path: dir.path().join("gone.md"),
            line: None,
        }));

        assert!(matches!(
            sink.insert_at_cursor("text"),
            Err(PodNoteError::NoActiveDocument)
        ));
    }

    #[test]
    fn test_insert_at_end_by_default() {
        let dir = TempDir::new().unwrap();
        let doc = active(&dir, "line 1\nline 2\n", None);
        let path = doc.path.clone();

        FileSink::new(dir.path())
            .with_active_document(Some(doc))
            .insert_at_cursor("NOTE\n")
            .unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "line 1\nline 2\nNOTE\n");
    }

    #[test]
    fn test_insert_at_line() {
        let dir = TempDir::new().unwrap();
        let doc = active(&dir, "line 1\nline 2\nline 3", Some(2));
        let path = doc.path.clone();

        FileSink::new(dir.path())
            .with_active_document(Some(doc))
            .insert_at_cursor("NOTE\n")
            .unwrap();

        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "line 1\nNOTE\nline 2\nline 3"
        );
    }

    #[test]
    fn test_insert_past_end_starts_new_line() {
        let dir = TempDir::new().unwrap();
        let doc = active(&dir, "a\nb", Some(9));
        let path = doc.path.clone();

        FileSink::new(dir.path())
            .with_active_document(Some(doc))
            .insert_at_cursor("NOTE\n")
            .unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "a\nb\nNOTE\n");
    }

    #[test]
    fn test_insert_at_end_without_trailing_newline() {
        let dir = TempDir::new().unwrap();
        let doc = active(&dir, "a", None);
        let path = doc.path.clone();

        FileSink::new(dir.path())
            .with_active_document(Some(doc))
            .insert_at_cursor("NOTE")
            .unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "a\nNOTE");
    }

    #[test]
    fn test_insert_into_empty_document() {
        let dir = TempDir::new().unwrap();
        let doc = active(&dir, "", Some(4));
        let path = doc.path.clone();

        FileSink::new(dir.path())
            .with_active_document(Some(doc))
            .insert_at_cursor("NOTE\n")
            .unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "NOTE\n");
    }

    #[test]
    fn test_insert_leaves_no_staging_files() {
        let dir = TempDir::new().unwrap();
        let doc = active(&dir, "line 1\n", None);

        FileSink::new(dir.path())
            .with_active_document(Some(doc))
            .insert_at_cursor("NOTE\n")
            .unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["daily.md"]);
    }

    #[test]
    fn test_cursor_offset_clamps() {
        assert_eq!(FileSink::cursor_offset("a\nb", Some(1)), 0);
        assert_eq!(FileSink::cursor_offset("a\nb", Some(2)), 2);
        assert_eq!(FileSink::cursor_offset("a\nb", Some(9)), 3);
        assert_eq!(FileSink::cursor_offset("", Some(3)), 0);
    }

    #[test]
    fn test_create_note_makes_folders() {
        let dir = TempDir::new().unwrap();
        let sink = FileSink::new(dir.path());

        sink.create_note("Podcasts/Ep 1.md", "# Ep 1").unwrap();

        let written = fs::read_to_string(dir.path().join("Podcasts").join("Ep 1.md")).unwrap();
        assert_eq!(written, "# Ep 1");
    }

    #[test]
    fn test_create_note_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let sink = FileSink::new(dir.path());
        sink.create_note("Ep 1.md", "first").unwrap();

        let err = sink.create_note("Ep 1.md", "second").unwrap_err();

        assert!(matches!(err, PodNoteError::NoteAlreadyExists(_)));
        assert_eq!(fs::read_to_string(dir.path().join("Ep 1.md")).unwrap(), "first");
        // The refused attempt leaves nothing behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_console_notifier_keeps_notices_together() {
        let notifier = ConsoleNotifier::new(Vec::new());

        notifier.progress("Loading Podcast Info");
        notifier.error("The URL is invalid.");

        let written = String::from_utf8(notifier.out.into_inner()).unwrap();
        assert_eq!(written, "Loading Podcast Info\nThe URL is invalid.\n");
    }
}
