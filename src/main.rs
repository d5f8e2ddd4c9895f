use clap::Parser;
use kube::Client;
use tracing::error;

use kube_data_collector::cli::Cli;
use kube_data_collector::collector::{collect_resource, collect_resource_kinds};
use kube_data_collector::config::CollectorConfig;
use kube_data_collector::kinds::{KindSpec, ResourceRef};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.resources.is_empty() && cli.kinds.is_none() {
        error!("Must specify at least one kind/name resource or --kinds");
        std::process::exit(1);
    }

    // --output wins; otherwise the configured base directory is required.
    let base_directory = match &cli.output {
        Some(dir) => dir.clone(),
        None => CollectorConfig::resolve(None)?.base_directory,
    };

    let client = Client::try_default().await?;
    let collect_logs = !cli.no_logs;

    for res in &cli.resources {
        let resource = ResourceRef::parse(res, cli.namespace.as_deref())
            .map_err(|e| anyhow::anyhow!("Failed to parse resource '{}': {}", res, e))?;
        collect_resource(&client, &resource, &base_directory, collect_logs).await;
    }

    if let Some(kinds) = &cli.kinds {
        let specs = kinds
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(KindSpec::parse)
            .collect::<anyhow::Result<Vec<_>>>()?;
        collect_resource_kinds(&client, &specs, &base_directory, cli.namespace.as_deref()).await;
    }

    Ok(())
}
