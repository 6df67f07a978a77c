use std::env;
use std::path::{Path, PathBuf};

use crate::config::LayergenConfig;
use crate::error::{LayerError, LayerResult};
use crate::layer::Runtime;

/// An external executable the tool depends on.
#[derive(Copy, Clone, Debug)]
pub struct ToolSpec {
    pub name: &'static str,
    pub hint: &'static str,
}

pub const AWS: ToolSpec = ToolSpec {
    name: "aws",
    hint: "Please install the AWS CLI before running this tool.",
};
pub const PIP: ToolSpec = ToolSpec {
    name: "pip",
    hint: "Please install pip before running this tool.",
};
pub const NPM: ToolSpec = ToolSpec {
    name: "npm",
    hint: "Please install npm before running this tool.",
};

/// Resolved paths of every required executable, checked in declaration order.
#[derive(Clone, Debug)]
pub struct Tools {
    pub aws: PathBuf,
    pub pip: PathBuf,
    pub npm: PathBuf,
}

impl Tools {
    pub fn resolve(config: &LayergenConfig) -> LayerResult<Self> {
        Ok(Self {
            aws: resolve_tool(AWS, config)?,
            pip: resolve_tool(PIP, config)?,
            npm: resolve_tool(NPM, config)?,
        })
    }

    pub fn installer(&self, runtime: Runtime) -> &Path {
        match runtime {
            Runtime::Nodejs => &self.npm,
            Runtime::Python => &self.pip,
        }
    }
}

pub fn env_override_key(name: &str) -> String {
    format!("LAYERGEN_BIN_{}", name.replace('-', "_").to_uppercase())
}

/// Resolve a tool by env override, then config, then PATH.
pub fn resolve_tool(tool: ToolSpec, config: &LayergenConfig) -> LayerResult<PathBuf> {
    let env_override = env::var_os(env_override_key(tool.name)).map(PathBuf::from);
    resolve_tool_with(tool, env_override, config)
}

fn resolve_tool_with(
    tool: ToolSpec,
    env_override: Option<PathBuf>,
    config: &LayergenConfig,
) -> LayerResult<PathBuf> {
    let unmet = || LayerError::UnmetDependency {
        tool: tool.name,
        hint: tool.hint,
    };

    if let Some(path) = env_override {
        if path.is_file() {
            return Ok(path);
        }
        tracing::warn!(
            env_key = %env_override_key(tool.name),
            path = %path.display(),
            "override points to a missing file"
        );
        return Err(unmet());
    }

    if let Some(path) = config
        .tools
        .entry(tool.name)
        .and_then(|entry| entry.path.as_ref())
    {
        if path.is_file() {
            return Ok(path.clone());
        }
        tracing::warn!(tool = tool.name, path = %path.display(), "configured path does not exist");
        return Err(unmet());
    }

    which::which(tool.name).map_err(|error| {
        tracing::debug!(tool = tool.name, %error, "not found on PATH");
        unmet()
    })
}
