use std::ffi::OsString;
use std::path::Path;

use serde::Deserialize;

use crate::error::{LayerError, LayerResult};
use crate::region::RegionSource;
use crate::util::json;
use crate::util::process::{self, CommandOutput, CommandSpec};

const TOOL_NAME: &str = "aws";

/// Thin wrapper over the `aws` CLI; every call blocks until the child exits.
pub struct AwsDelegate {
    program: OsString,
}

/// The parts of `publish-layer-version` output we report back.
#[derive(Debug, Default, Deserialize)]
pub struct PublishedLayer {
    #[serde(rename = "Version")]
    pub version: Option<u64>,
    #[serde(rename = "LayerVersionArn")]
    pub layer_version_arn: Option<String>,
}

impl AwsDelegate {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self) -> CommandSpec {
        CommandSpec::new(self.program.clone())
    }

    fn exec(&self, spec: CommandSpec) -> LayerResult<CommandOutput> {
        process::run(&spec)
    }

    pub fn caller_identity(&self) -> LayerResult<()> {
        let output = self.exec(self.command().args(["sts", "get-caller-identity"]))?;
        if output.success() {
            return Ok(());
        }
        let stderr = output.stderr_text();
        let detail = if stderr.is_empty() {
            format!("`{TOOL_NAME} sts get-caller-identity` exited with {}", output.code())
        } else {
            stderr
        };
        Err(LayerError::NotAuthenticated { detail })
    }

    pub fn publish_layer_version(
        &self,
        layer_name: &str,
        archive: &Path,
        compatible_runtime: &str,
        region: &str,
    ) -> LayerResult<PublishedLayer> {
        let mut zip_file = OsString::from("fileb://");
        zip_file.push(archive.as_os_str());
        let spec = self
            .command()
            .args(["lambda", "publish-layer-version", "--layer-name", layer_name])
            .arg("--zip-file")
            .arg(zip_file)
            .args(["--compatible-runtimes", compatible_runtime])
            .args(["--region", region])
            .args(["--output", "json"]);
        let output = self.exec(spec)?;
        if !output.success() {
            return Err(LayerError::PublishFailure {
                message: failure_message(&output),
            });
        }
        match json::parse_stdout::<PublishedLayer>(TOOL_NAME, &output.stdout) {
            Ok(published) => Ok(published),
            Err(error) => {
                tracing::warn!(%error, "publish succeeded but its output could not be read");
                Ok(PublishedLayer::default())
            }
        }
    }

    /// Raw `list-layers` JSON, unparsed.
    pub fn list_layers(&self, region: &str) -> LayerResult<String> {
        let spec = self
            .command()
            .args(["lambda", "list-layers", "--region", region, "--output", "json"]);
        let output = self.exec(spec)?;
        if !output.success() {
            return Err(LayerError::ListFailure {
                message: failure_message(&output),
            });
        }
        Ok(output.stdout_text())
    }

    pub fn delete_layer_version(
        &self,
        layer_name: &str,
        version: u64,
        region: &str,
    ) -> LayerResult<()> {
        let spec = self
            .command()
            .args(["lambda", "delete-layer-version", "--layer-name", layer_name])
            .arg("--version-number")
            .arg(version.to_string())
            .args(["--region", region]);
        let output = self.exec(spec)?;
        if output.success() {
            return Ok(());
        }
        Err(LayerError::DeleteFailure {
            message: failure_message(&output),
        })
    }
}

impl RegionSource for AwsDelegate {
    fn configured_region(&self) -> Option<String> {
        let spec = self.command().args(["configure", "get", "region"]);
        match self.exec(spec) {
            Ok(output) if output.success() => Some(output.stdout_text()),
            Ok(output) => {
                tracing::debug!(code = output.code(), "`aws configure get region` failed");
                None
            }
            Err(error) => {
                tracing::debug!(%error, "could not query aws configuration");
                None
            }
        }
    }
}

fn failure_message(output: &CommandOutput) -> String {
    let stderr = output.stderr_text();
    if stderr.is_empty() {
        format!("`{TOOL_NAME}` exited with code {}", output.code())
    } else {
        stderr
    }
}
