//! Presenters: put a summary onto a display surface.

use crate::fill::fill;
use crate::summary::Summary;
use crate::surface::{self, SurfaceError};
use colored::Colorize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Where a summary ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presented {
    /// The surface that received the text
    pub surface: PathBuf,
    /// The reflowed text as written
    pub text: String,
}

/// Accepts summary text and displays it.
pub trait Presenter: Send + Sync {
    fn present(&self, summary: &Summary) -> Result<Presented, SurfaceError>;
}

/// Writes each summary to a fresh, uniquely named, read-only surface.
#[derive(Debug, Clone)]
pub struct NewSurface {
    output_dir: PathBuf,
    fill_column: usize,
}

impl NewSurface {
    pub fn new(output_dir: impl Into<PathBuf>, fill_column: usize) -> Self {
        Self {
            output_dir: output_dir.into(),
            fill_column,
        }
    }
}

impl Presenter for NewSurface {
    fn present(&self, summary: &Summary) -> Result<Presented, SurfaceError> {
        let text = fill(&summary.text, self.fill_column);
        let contents = format!("{text}\n");
        let path = surface::create_unique(&self.output_dir, &summary.title, contents.as_bytes())?;

        tracing::info!(surface = %path.display(), "summary written");
        Ok(Presented {
            surface: path,
            text,
        })
    }
}

/// Inserts summaries into an existing surface chosen when the lookup began.
#[derive(Debug, Clone)]
pub struct InsertInto {
    target: PathBuf,
    offset: Option<usize>,
    fill_column: usize,
}

impl InsertInto {
    /// `offset` is the byte insertion point; `None` appends.
    pub fn new(target: impl Into<PathBuf>, offset: Option<usize>, fill_column: usize) -> Self {
        Self {
            target: target.into(),
            offset,
            fill_column,
        }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Fail early, before any network traffic, if the target cannot be edited
    pub fn check_writable(&self) -> Result<(), SurfaceError> {
        if surface::is_read_only(&self.target)? {
            return Err(SurfaceError::ReadOnly(self.target.clone()));
        }
        Ok(())
    }
}

impl Presenter for InsertInto {
    fn present(&self, summary: &Summary) -> Result<Presented, SurfaceError> {
        let mut text = fill(&summary.text, self.fill_column);
        text.push('\n');

        let at = surface::insert_at(&self.target, self.offset, &text)?;

        tracing::info!(surface = %self.target.display(), offset = at, "summary inserted");
        Ok(Presented {
            surface: self.target.clone(),
            text,
        })
    }
}

/// Bring a presented summary into view, from its start.
pub fn view(summary: &Summary, presented: &Presented, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", format!("=== {} ===", summary.title).bold())?;
    writeln!(out, "{}\n", presented.surface.display().to_string().dimmed())?;
    writeln!(out, "{}", presented.text.trim_end())?;
    writeln!(out)
}
