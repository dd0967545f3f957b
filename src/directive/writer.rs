//! Filesystem seam for the directive applier.
//!
//! [`HostWriter`] performs real writes: user-scope targets are replaced
//! atomically through a temporary file in the same directory, system-scope
//! targets go through the configured privilege-escalation prefix
//! (`sudo tee`). [`DryRunWriter`] stages writes in memory so a dry run can
//! layer several directives on one file without touching the disk.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::model::WriteScope;
use crate::error::{KioskError, Result};
use crate::shell::{execute, shell_quote, CommandOptions};

/// Read and write access to directive targets.
pub trait FileWriter {
    /// Current contents of `path`, or `None` if it does not exist.
    fn read(&self, path: &Path) -> Result<Option<String>>;

    /// Replace the contents of `path`, creating parent directories.
    fn write(&self, path: &Path, contents: &str, scope: WriteScope) -> Result<()>;
}

/// Writes to the real filesystem.
#[derive(Debug, Clone)]
pub struct HostWriter {
    elevate: Vec<String>,
}

impl HostWriter {
    /// Writer that prefixes privileged operations with `elevate` (e.g. `["sudo"]`).
    pub fn new(elevate: Vec<String>) -> Self {
        Self { elevate }
    }

    /// Writer that never escalates; system-scope writes are performed directly.
    pub fn direct() -> Self {
        Self {
            elevate: Vec::new(),
        }
    }

    fn elevated(&self, command: &str) -> String {
        let mut parts: Vec<String> = self.elevate.iter().map(|p| shell_quote(p)).collect();
        parts.push(command.to_string());
        parts.join(" ")
    }

    fn write_atomic(&self, path: &Path, contents: &str) -> Result<()> {
        let denied = |e: std::io::Error| {
            if e.kind() == ErrorKind::PermissionDenied {
                KioskError::WriteDenied {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            } else {
                KioskError::Io(e)
            }
        };

        // Symlinked targets are rewritten at their destination.
        let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let parent = target.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).map_err(denied)?;

        let mut tmp = NamedTempFile::new_in(parent).map_err(denied)?;
        tmp.write_all(contents.as_bytes()).map_err(denied)?;
        tmp.as_file().sync_all().map_err(denied)?;
        if let Ok(meta) = fs::metadata(&target) {
            fs::set_permissions(tmp.path(), meta.permissions()).map_err(denied)?;
        }
        tmp.persist(&target).map_err(|e| denied(e.error))?;

        if let Ok(dir) = fs::File::open(parent) {
            let _ = dir.sync_all();
        }
        Ok(())
    }

    fn write_privileged(&self, path: &Path, contents: &str) -> Result<()> {
        let quoted = shell_quote(&path.to_string_lossy());
        let parent = path
            .parent()
            .map(|p| shell_quote(&p.to_string_lossy()))
            .unwrap_or_else(|| ".".to_string());

        let command = format!(
            "{} && {} > /dev/null",
            self.elevated(&format!("mkdir -p {}", parent)),
            self.elevated(&format!("tee {}", quoted))
        );
        let result = execute(&command, &CommandOptions::with_stdin(contents))?;
        if result.success {
            Ok(())
        } else {
            Err(KioskError::WriteDenied {
                path: path.to_path_buf(),
                message: result.stderr.trim().to_string(),
            })
        }
    }
}

impl Default for HostWriter {
    fn default() -> Self {
        Self::new(vec!["sudo".to_string()])
    }
}

impl FileWriter for HostWriter {
    fn read(&self, path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == ErrorKind::PermissionDenied && !self.elevate.is_empty() => {
                let command = self.elevated(&format!("cat {}", shell_quote(&path.to_string_lossy())));
                let result =
                    execute(&command, &CommandOptions::default())?.into_checked(&command)?;
                Ok(Some(result.stdout))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, path: &Path, contents: &str, scope: WriteScope) -> Result<()> {
        match scope {
            WriteScope::System if !self.elevate.is_empty() => {
                tracing::debug!("Privileged write to {}", path.display());
                self.write_privileged(path, contents)
            }
            _ => {
                tracing::debug!("Atomic write to {}", path.display());
                self.write_atomic(path, contents)
            }
        }
    }
}

/// A write that a dry run would have performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedWrite {
    pub path: PathBuf,
    pub scope: WriteScope,
    pub bytes: usize,
}

/// Stages writes in memory on top of a reader.
///
/// Reads see earlier staged writes, so directives evaluated later in the
/// same dry run observe the planned state.
pub struct DryRunWriter<W: FileWriter> {
    inner: W,
    staged: RefCell<BTreeMap<PathBuf, String>>,
    log: RefCell<Vec<StagedWrite>>,
}

impl<W: FileWriter> DryRunWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            staged: RefCell::new(BTreeMap::new()),
            log: RefCell::new(Vec::new()),
        }
    }

    /// Writes recorded so far, in order.
    pub fn staged_writes(&self) -> Vec<StagedWrite> {
        self.log.borrow().clone()
    }

    /// Planned contents of `path`, if a write was staged for it.
    pub fn staged_contents(&self, path: &Path) -> Option<String> {
        self.staged.borrow().get(path).cloned()
    }
}

impl<W: FileWriter> FileWriter for DryRunWriter<W> {
    fn read(&self, path: &Path) -> Result<Option<String>> {
        if let Some(contents) = self.staged.borrow().get(path) {
            return Ok(Some(contents.clone()));
        }
        self.inner.read(path)
    }

    fn write(&self, path: &Path, contents: &str, scope: WriteScope) -> Result<()> {
        tracing::info!("[dry-run] would write {} ({} bytes)", path.display(), contents.len());
        self.staged
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_string());
        self.log.borrow_mut().push(StagedWrite {
            path: path.to_path_buf(),
            scope,
            bytes: contents.len(),
        });
        Ok(())
    }
}
