use clap::ValueEnum;

use crate::cli::{CreateArgs, RuntimeArg};
use crate::config;
use crate::delegate::aws::{AwsDelegate, PublishedLayer};
use crate::error::{LayerError, LayerResult};
use crate::interrupt;
use crate::layer::{LayerRequest, Runtime};
use crate::preflight;
use crate::prompt::Prompter;
use crate::publish;
use crate::region::resolve_region;
use crate::stage;

pub fn run(args: CreateArgs) -> LayerResult<()> {
    let mut prompter = Prompter::stdio();
    let name = prompter.value(
        "--layer-name",
        "Enter the AWS Lambda Layer name",
        args.layer_name,
    )?;
    let runtime: Runtime = prompter
        .parsed(
            "--runtime",
            "Select the runtime (nodejs, python)",
            args.runtime,
            |raw| RuntimeArg::from_str(raw, true).ok(),
        )?
        .into();
    let packages = prompter.value(
        "--packages",
        "Enter the packages you want to include (space-separated)",
        args.packages,
    )?;

    // Prompts keep the default SIGINT behaviour; from here on an interrupt
    // unwinds so the staging area is dropped.
    interrupt::install_handler()?;
    let config = config::load()?;
    let tools = preflight::ensure_ready(&config)?;
    let request = LayerRequest::new(&name, runtime, &packages, args.region)?;
    println!("You selected {}", runtime.label());

    let aws = AwsDelegate::new(&tools.aws);
    let region = resolve_region(request.region.as_deref(), &aws);

    println!(
        "Installing {} with {}...",
        request.packages.join(" "),
        runtime.installer()
    );
    // Staging does not need a region; publishing does.
    let area = stage::stage(&request, &tools)?;
    let region = region.ok_or(LayerError::RegionUnresolved)?;
    let published = publish::publish(
        &area,
        &request,
        &region,
        config.compatible_tag(runtime),
        &aws,
    )?;
    drop(area);

    println!("{}", confirmation(&request, &published));
    Ok(())
}

fn confirmation(request: &LayerRequest, published: &PublishedLayer) -> String {
    let mut line = format!(
        "Layer {} has been successfully created and uploaded to AWS Lambda!",
        request.name
    );
    if let Some(version) = published.version {
        line.push_str(&format!(" (version {version}"));
        if let Some(arn) = &published.layer_version_arn {
            line.push_str(&format!(", {arn}"));
        }
        line.push(')');
    }
    line
}
