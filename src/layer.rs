use std::fmt;

use crate::error::{LayerError, LayerResult};

/// A Lambda layer name: ASCII letters, digits and dashes only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerName(String);

impl LayerName {
    pub fn parse(raw: &str) -> LayerResult<Self> {
        let valid = !raw.is_empty()
            && raw
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-');
        if !valid {
            return Err(LayerError::InvalidLayerName(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn archive_file_name(&self) -> String {
        format!("{}.zip", self.0)
    }
}

impl fmt::Display for LayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Runtime {
    Nodejs,
    Python,
}

impl Runtime {
    /// Directory under the staging root that Lambda loads for this runtime.
    pub fn staging_dir(self) -> &'static str {
        match self {
            Runtime::Nodejs => "nodejs",
            Runtime::Python => "python",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Runtime::Nodejs => "Node.js 20.x",
            Runtime::Python => "Python 3.12",
        }
    }

    pub fn default_compatible_tag(self) -> &'static str {
        match self {
            Runtime::Nodejs => "nodejs20.x",
            Runtime::Python => "python3.12",
        }
    }

    pub fn installer(self) -> &'static str {
        match self {
            Runtime::Nodejs => "npm",
            Runtime::Python => "pip",
        }
    }
}

#[derive(Clone, Debug)]
pub struct LayerRequest {
    pub name: LayerName,
    pub runtime: Runtime,
    pub packages: Vec<String>,
    pub region: Option<String>,
}

impl LayerRequest {
    /// Build a request from raw CLI input; `packages` is whitespace separated.
    pub fn new(
        name: &str,
        runtime: Runtime,
        packages: &str,
        region: Option<String>,
    ) -> LayerResult<Self> {
        let name = LayerName::parse(name)?;
        let packages = split_packages(packages);
        if packages.is_empty() {
            return Err(LayerError::InvalidPackages);
        }
        Ok(Self {
            name,
            runtime,
            packages,
            region,
        })
    }
}

fn split_packages(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}
