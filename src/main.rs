use std::io::Write;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use prometheus_client::registry::Registry;
use tracing_subscriber::EnvFilter;

use systemdstats_exporter::cli::Cli;
use systemdstats_exporter::collector::{self, ScrapeCollector};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let settings = cli.settings();
    let collectors =
        collector::build_enabled(&settings, &cli.enable_collector, &cli.disable_collector)
            .context("failed to set up collectors")?;
    tracing::info!(
        collectors = collectors.len(),
        proc_root = %settings.proc_root.display(),
        "exporter starting"
    );

    let mut registry = Registry::default();
    registry.register_collector(Box::new(ScrapeCollector::new(collectors)));

    // Each pass is one scrape: encoding drives every enabled collector.
    loop {
        let mut exposition = String::new();
        prometheus_client::encoding::text::encode(&mut exposition, &registry)
            .context("failed to encode metrics")?;
        print!("{exposition}");
        std::io::stdout()
            .flush()
            .context("failed to write exposition")?;

        if cli.once {
            break;
        }
        thread::sleep(Duration::from_secs(cli.interval_secs));
    }
    Ok(())
}
