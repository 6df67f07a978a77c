use crate::cli::DeleteArgs;
use crate::config;
use crate::delegate::aws::AwsDelegate;
use crate::error::{LayerError, LayerResult};
use crate::layer::LayerName;
use crate::preflight;
use crate::prompt::Prompter;
use crate::region::resolve_region;

pub fn run(args: DeleteArgs) -> LayerResult<()> {
    let mut prompter = Prompter::stdio();
    let name = prompter.value(
        "--layer-name",
        "Enter the AWS Lambda Layer name",
        args.layer_name,
    )?;
    let version = prompter.parsed(
        "--version-number",
        "Enter the version number to delete",
        args.version_number,
        |raw| raw.parse::<u64>().ok().filter(|version| *version >= 1),
    )?;

    let config = config::load()?;
    let tools = preflight::ensure_ready(&config)?;
    let name = LayerName::parse(&name)?;
    let aws = AwsDelegate::new(&tools.aws);
    let region =
        resolve_region(args.region.as_deref(), &aws).ok_or(LayerError::RegionUnresolved)?;

    aws.delete_layer_version(name.as_str(), version, &region)?;
    println!("Layer {name} version {version} has been deleted.");
    Ok(())
}
