use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::delegate::aws::{AwsDelegate, PublishedLayer};
use crate::error::{LayerError, LayerResult};
use crate::interrupt;
use crate::layer::{LayerName, LayerRequest};
use crate::stage::StagingArea;

/// A zip of the staging root. The file is removed when this is dropped.
#[derive(Debug)]
pub struct ArchiveArtifact {
    path: PathBuf,
}

impl ArchiveArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ArchiveArtifact {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "failed to remove archive")
            }
        }
    }
}

/// Zip the whole staging root into `<workspace>/<layer>.zip`.
pub fn archive(area: &StagingArea, name: &LayerName) -> LayerResult<ArchiveArtifact> {
    let path = area.workspace().join(name.archive_file_name());
    let artifact = ArchiveArtifact { path };
    let failure = |reason: String| LayerError::ArchiveFailure {
        path: artifact.path.display().to_string(),
        reason,
    };

    let entries =
        write_zip(area.root(), artifact.path()).map_err(|err| failure(format!("{err:#}")))?;

    // Writers can swallow errors; trust the filesystem, not the return value.
    let metadata = fs::metadata(artifact.path())
        .map_err(|err| failure(format!("archive is missing after writing ({err})")))?;
    if !metadata.is_file() {
        return Err(failure("archive path is not a regular file".into()));
    }
    tracing::info!(
        path = %artifact.path().display(),
        entries,
        bytes = metadata.len(),
        "created layer archive"
    );
    Ok(artifact)
}

/// Archive the staged packages and publish them as a new layer version.
pub fn publish(
    area: &StagingArea,
    request: &LayerRequest,
    region: &str,
    compatible_tag: &str,
    aws: &AwsDelegate,
) -> LayerResult<PublishedLayer> {
    let artifact = archive(area, &request.name)?;
    interrupt::check()?;
    tracing::info!(
        layer = %request.name,
        %region,
        runtime = compatible_tag,
        "publishing layer version"
    );
    aws.publish_layer_version(
        request.name.as_str(),
        artifact.path(),
        compatible_tag,
        region,
    )
}

fn write_zip(root: &Path, dest: &Path) -> Result<usize> {
    let file =
        File::create(dest).with_context(|| format!("failed to create {}", dest.display()))?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let base = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut count = 0;

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        let name = entry_name(root, entry.path())?;
        let options = with_mode(base, &entry)?;
        let file_type = entry.file_type();

        if file_type.is_dir() {
            zip.add_directory(format!("{name}/"), options)?;
        } else if file_type.is_symlink() {
            let target = fs::read_link(entry.path())
                .with_context(|| format!("failed to read link {}", entry.path().display()))?;
            zip.add_symlink(name, target.to_string_lossy().into_owned(), options)?;
        } else {
            zip.start_file(name, options)?;
            let mut source = File::open(entry.path())
                .with_context(|| format!("failed to open {}", entry.path().display()))?;
            io::copy(&mut source, &mut zip)
                .with_context(|| format!("failed to compress {}", entry.path().display()))?;
        }
        count += 1;
    }

    let mut writer = zip.finish().context("failed to finalize zip")?;
    io::Write::flush(&mut writer).context("failed to flush zip")?;
    Ok(count)
}

/// Archive entry names are root-relative and always `/`-separated.
fn entry_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .with_context(|| format!("{} escapes {}", path.display(), root.display()))?;
    let parts = relative
        .components()
        .map(|part| part.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    Ok(parts.join("/"))
}

#[cfg(unix)]
fn with_mode(options: SimpleFileOptions, entry: &walkdir::DirEntry) -> Result<SimpleFileOptions> {
    use std::os::unix::fs::PermissionsExt;
    let metadata = entry.metadata()?;
    Ok(options.unix_permissions(metadata.permissions().mode() & 0o7777))
}

#[cfg(not(unix))]
fn with_mode(options: SimpleFileOptions, _entry: &walkdir::DirEntry) -> Result<SimpleFileOptions> {
    Ok(options)
}
