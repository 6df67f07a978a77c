use crate::cli::ListArgs;
use crate::config;
use crate::delegate::aws::AwsDelegate;
use crate::error::{LayerError, LayerResult};
use crate::preflight;
use crate::region::resolve_region;

pub fn run(args: ListArgs) -> LayerResult<()> {
    let config = config::load()?;
    let tools = preflight::ensure_ready(&config)?;
    let aws = AwsDelegate::new(&tools.aws);
    let region =
        resolve_region(args.region.as_deref(), &aws).ok_or(LayerError::RegionUnresolved)?;

    let raw = aws.list_layers(&region)?;
    println!("{}", raw.trim_end());
    Ok(())
}
