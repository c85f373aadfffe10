use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{atlas::metadata::SpriteSheetArtifact, foundation::error::CaptureResult};

/// Destination for finished artifacts (a download, a directory, a test buffer).
pub trait ArtifactSink {
    /// Persist one named file.
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> CaptureResult<()>;
}

/// Writes files into a directory, creating it on first use.
///
/// Each file is written to a temporary sibling and renamed into place, so readers never observe a
/// half-written sheet.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Sink rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for DirectorySink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> CaptureResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;

        let dest = self.dir.join(file_name);
        let tmp = self.dir.join(format!(".{file_name}.partial"));
        let mut guard = PartialFileGuard(Some(tmp.clone()));
        std::fs::write(&tmp, bytes).with_context(|| format!("write '{}'", tmp.display()))?;
        std::fs::rename(&tmp, &dest)
            .with_context(|| format!("move '{}' into place", dest.display()))?;
        guard.0 = None;

        tracing::debug!(path = %dest.display(), bytes = bytes.len(), "artifact written");
        Ok(())
    }
}

struct PartialFileGuard(Option<PathBuf>);

impl Drop for PartialFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemoryArtifactSink {
    files: Vec<(String, Vec<u8>)>,
}

impl InMemoryArtifactSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Saved files in save order.
    pub fn files(&self) -> &[(String, Vec<u8>)] {
        &self.files
    }

    /// Bytes of the most recent file saved under `name`.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.files
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, b)| b.as_slice())
    }
}

impl ArtifactSink for InMemoryArtifactSink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> CaptureResult<()> {
        self.files.push((file_name.to_string(), bytes.to_vec()));
        Ok(())
    }
}

/// Save an artifact's image, then its metadata.
pub fn persist_artifact<S: ArtifactSink + ?Sized>(
    sink: &mut S,
    artifact: &SpriteSheetArtifact,
) -> CaptureResult<()> {
    sink.save(&artifact.image_file_name(), &artifact.png)?;
    sink.save(
        &artifact.metadata_file_name(),
        artifact.metadata_json()?.as_bytes(),
    )?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/output/sink.rs"]
mod tests;
