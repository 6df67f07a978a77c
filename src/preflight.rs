use crate::config::LayergenConfig;
use crate::delegate::aws::AwsDelegate;
use crate::error::LayerResult;
use crate::tools::Tools;

/// Resolve `aws`, `pip` and `npm`, then confirm the AWS session is signed in.
///
/// Nothing is retried. The first missing tool wins.
pub fn ensure_ready(config: &LayergenConfig) -> LayerResult<Tools> {
    let tools = Tools::resolve(config)?;
    tracing::debug!(
        aws = %tools.aws.display(),
        pip = %tools.pip.display(),
        npm = %tools.npm.display(),
        "resolved tools"
    );
    AwsDelegate::new(&tools.aws).caller_identity()?;
    tracing::debug!("aws session is authenticated");
    Ok(tools)
}
