use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tempfile::TempDir;

use crate::error::{LayerError, LayerResult};
use crate::layer::{LayerRequest, Runtime};
use crate::tools::Tools;
use crate::util::process::{self, CommandSpec};

const WORKSPACE_PREFIX: &str = "layergen-";
const LAYER_ROOT: &str = "layer";

/// A per-invocation staging tree.
///
/// Layout: `<workspace>/layer/<runtime dir>/...` is what gets archived, the
/// archive itself is written next to `layer/`. Dropping the area removes the
/// whole workspace, archive included.
#[derive(Debug)]
pub struct StagingArea {
    workspace: TempDir,
    root: PathBuf,
    runtime_dir: PathBuf,
}

impl StagingArea {
    pub fn create(runtime: Runtime) -> LayerResult<Self> {
        Self::create_in(&std::env::temp_dir(), runtime)
    }

    pub fn create_in(parent: &Path, runtime: Runtime) -> LayerResult<Self> {
        let workspace = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(parent)
            .with_context(|| format!("failed to create staging directory in {}", parent.display()))?;
        let root = workspace.path().join(LAYER_ROOT);
        let runtime_dir = root.join(runtime.staging_dir());
        fs::create_dir_all(&runtime_dir)?;
        if runtime == Runtime::Nodejs {
            fs::create_dir_all(runtime_dir.join("node_modules"))?;
        }
        tracing::debug!(path = %workspace.path().display(), "created staging area");
        Ok(Self {
            workspace,
            root,
            runtime_dir,
        })
    }

    pub fn workspace(&self) -> &Path {
        self.workspace.path()
    }

    /// Directory whose contents end up in the archive.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn runtime_dir(&self) -> &Path {
        &self.runtime_dir
    }
}

/// Create a fresh staging area and install the request's packages into it.
pub fn stage(request: &LayerRequest, tools: &Tools) -> LayerResult<StagingArea> {
    let area = StagingArea::create(request.runtime)?;
    install(&area, request, tools)?;
    Ok(area)
}

pub fn install(area: &StagingArea, request: &LayerRequest, tools: &Tools) -> LayerResult<()> {
    let spec = installer_command(tools.installer(request.runtime), area, request);
    tracing::info!(
        installer = request.runtime.installer(),
        packages = %request.packages.join(" "),
        "installing packages"
    );
    let output = process::run(&spec)?;
    if !output.success() {
        return Err(LayerError::InstallFailure {
            tool: request.runtime.installer(),
            code: output.code(),
            output: output.combined_text(),
        });
    }
    Ok(())
}

fn installer_command(program: &Path, area: &StagingArea, request: &LayerRequest) -> CommandSpec {
    let target_flag = match request.runtime {
        Runtime::Nodejs => "--prefix",
        Runtime::Python => "--target",
    };
    CommandSpec::new(program)
        .arg("install")
        .arg(target_flag)
        .arg(area.runtime_dir())
        .args(&request.packages)
}
