use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::language::LanguageCode;

pub const CONTENT_DIR: &str = "obs";
/// A destination holding more than this many `*.txt` files is left alone.
pub const POPULATED_THRESHOLD: usize = 5;

const FILE_MODE: u32 = 0o644;
const DIR_MODE: u32 = 0o755;

/// Every path one import touches, derived from the pages root.
#[derive(Debug, Clone)]
pub struct DestinationWorkspace {
    pub pages_dir: PathBuf,
    pub source: LanguageCode,
    pub destination: LanguageCode,
}

impl DestinationWorkspace {
    pub fn new(pages_dir: impl Into<PathBuf>, source: LanguageCode, destination: LanguageCode) -> Self {
        Self {
            pages_dir: pages_dir.into(),
            source,
            destination,
        }
    }

    pub fn namespace_dir(&self) -> PathBuf {
        self.pages_dir.join(self.destination.as_str())
    }

    pub fn destination_dir(&self) -> PathBuf {
        self.namespace_dir().join(CONTENT_DIR)
    }

    pub fn source_dir(&self) -> PathBuf {
        self.pages_dir.join(self.source.as_str()).join(CONTENT_DIR)
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.pages_dir.join("templates")
    }

    pub fn obs_templates_dir(&self) -> PathBuf {
        self.templates_dir().join("obs3").join(CONTENT_DIR)
    }

    pub fn admin_dir(&self) -> PathBuf {
        self.pages_dir.join("en").join("uwadmin")
    }

    pub fn status_dir(&self) -> PathBuf {
        self.admin_dir()
            .join(self.destination.as_str())
            .join(CONTENT_DIR)
    }
}

#[derive(Debug)]
pub enum Validation {
    Ready(DestinationWorkspace),
    NamespaceNotFound,
    SourceNotFound,
    AlreadyPopulated,
}

/// Checks the namespace, then the source, then the idempotency guard.
pub fn validate(workspace: DestinationWorkspace) -> anyhow::Result<Validation> {
    let namespace_dir = workspace.namespace_dir();
    if !namespace_dir.is_dir() {
        tracing::info!(dir = %namespace_dir.display(), "destination namespace not found");
        return Ok(Validation::NamespaceNotFound);
    }

    let source_dir = workspace.source_dir();
    if !source_dir.is_dir() {
        tracing::info!(dir = %source_dir.display(), "source content not found");
        return Ok(Validation::SourceNotFound);
    }

    let destination_dir = workspace.destination_dir();
    if destination_dir.is_dir() {
        let existing = count_text_files(&destination_dir)?;
        if existing > POPULATED_THRESHOLD {
            tracing::info!(
                dir = %destination_dir.display(),
                existing,
                "destination already populated"
            );
            return Ok(Validation::AlreadyPopulated);
        }
    }

    Ok(Validation::Ready(workspace))
}

/// True when `name` can be joined onto a directory without leaving it.
pub fn is_path_component(name: &str) -> bool {
    !(name.is_empty() || name == "." || name == ".." || name.contains('/') || name.contains('\\'))
}

pub fn count_text_files(dir: &Path) -> anyhow::Result<usize> {
    let mut count = 0_usize;
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("read dir: {}", dir.display()))?
    {
        let path = entry
            .with_context(|| format!("read dir entry: {}", dir.display()))?
            .path();
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        if !hidden && path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("txt") {
            count += 1;
        }
    }
    Ok(count)
}

pub fn write_text_file(path: &Path, text: &str) -> anyhow::Result<()> {
    std::fs::write(path, text).with_context(|| format!("write: {}", path.display()))?;
    set_mode(path, FILE_MODE)
}

pub fn copy_file(from: &Path, to: &Path) -> anyhow::Result<()> {
    std::fs::copy(from, to)
        .with_context(|| format!("copy {} -> {}", from.display(), to.display()))?;
    set_mode(to, FILE_MODE)
}

/// Creates `dir` and any missing parents (mode 0755 on Unix).
pub fn create_dir(dir: &Path) -> anyhow::Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt as _;
        std::fs::DirBuilder::new()
            .recursive(true)
            .mode(DIR_MODE)
            .create(dir)
            .with_context(|| format!("create dir: {}", dir.display()))?;
    }
    #[cfg(not(unix))]
    std::fs::create_dir_all(dir).with_context(|| format!("create dir: {}", dir.display()))?;
    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt as _;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .with_context(|| format!("chmod {mode:o}: {}", path.display()))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> anyhow::Result<()> {
    Ok(())
}
