use thiserror::Error;

/// Failures surfaced by the layer commands.
///
/// Components return these instead of exiting; `main` decides the status code.
#[derive(Debug, Error)]
pub enum LayerError {
    #[error("{tool} was not found. {hint}")]
    UnmetDependency { tool: &'static str, hint: &'static str },
    #[error("Please sign in to the AWS CLI before running this tool ({detail})")]
    NotAuthenticated { detail: String },
    #[error("layer name `{0}` is invalid: it can only contain letters, numbers, and dashes")]
    InvalidLayerName(String),
    #[error("no packages given; pass at least one package name to --packages")]
    InvalidPackages,
    #[error("missing required value for {0} (stdin is not a terminal, so it cannot be prompted)")]
    MissingInput(&'static str),
    #[error(
        "No AWS region specified. Please pass --region, set AWS_DEFAULT_REGION or configure your AWS CLI."
    )]
    RegionUnresolved,
    #[error("`{tool} install` failed with exit code {code}:\n{output}")]
    InstallFailure {
        tool: &'static str,
        code: i32,
        output: String,
    },
    #[error("Zip file {path} was not created: {reason}")]
    ArchiveFailure { path: String, reason: String },
    #[error("publishing layer failed: {message}")]
    PublishFailure { message: String },
    #[error("Error deleting the layer: {message}")]
    DeleteFailure { message: String },
    #[error("Error listing layers: {message}")]
    ListFailure { message: String },
    #[error("interrupted; staged files were removed")]
    Interrupted,
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Tool(#[from] anyhow::Error),
}

impl LayerError {
    pub fn code(&self) -> &'static str {
        match self {
            LayerError::UnmetDependency { .. } => "unmet-dependency",
            LayerError::NotAuthenticated { .. } => "not-authenticated",
            LayerError::InvalidLayerName(_) => "invalid-layer-name",
            LayerError::InvalidPackages => "invalid-packages",
            LayerError::MissingInput(_) => "missing-input",
            LayerError::RegionUnresolved => "region-unresolved",
            LayerError::InstallFailure { .. } => "install-failure",
            LayerError::ArchiveFailure { .. } => "archive-failure",
            LayerError::PublishFailure { .. } => "publish-failure",
            LayerError::DeleteFailure { .. } => "delete-failure",
            LayerError::ListFailure { .. } => "list-failure",
            LayerError::Interrupted => "interrupted",
            LayerError::Io(_) => "io",
            LayerError::Tool(_) => "tool",
        }
    }
}

pub type LayerResult<T> = Result<T, LayerError>;
