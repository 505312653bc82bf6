mod cli;

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use canary::fips::{self, probe};
use canary::{
    Config, ConfigLoader, EchoService, FipsService, HelloService, Overrides, Runner,
    SystemProvider, server,
};
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Echo(args) => {
            let config = load(config_path, &args.overrides())?;
            server::run(config, Arc::new(EchoService::new())).await?;
        }
        Commands::Hello(args) => {
            let config = load(config_path, &args.overrides())?;
            server::run(config, Arc::new(HelloService)).await?;
        }
        Commands::Fips(args) => {
            let config = load(config_path, &args.overrides())?;
            let provider = Arc::new(SystemProvider::from_config(&config.fips));

            // Fail fast before binding; every request re-runs the probe.
            let mut out = String::new();
            let result = probe::run(provider.as_ref(), &mut out);
            if args.probe {
                print!("{out}");
                std::io::stdout().flush()?;
            }
            match result {
                Ok(report) if args.probe => {
                    info!(fips_mode = report.fips_mode, "FIPS probe passed");
                    return Ok(ExitCode::SUCCESS);
                }
                Ok(report) => info!(fips_mode = report.fips_mode, "FIPS probe passed at startup"),
                Err(violation) => fips::fatal(&violation),
            }

            server::run(config, Arc::new(FipsService::new(provider))).await?;
        }
        Commands::Sync(args) => {
            let mut config = load(config_path, &args.overrides())?;
            args.apply(&mut config.sync);
            let runner = Runner::from_config(&config.sync)?;

            let stop = Arc::new(AtomicBool::new(false));
            let mut watch = tokio::task::spawn_blocking({
                let stop = Arc::clone(&stop);
                move || runner.run(&stop)
            });

            let runs = tokio::select! {
                joined = &mut watch => joined.context("sync runner panicked")??,
                _ = tokio::signal::ctrl_c() => {
                    info!("Stopping watcher");
                    stop.store(true, Ordering::Relaxed);
                    watch.await.context("sync runner panicked")??
                }
            };
            info!(runs, "Sync runner stopped");
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn load(config_path: Option<&Path>, overrides: &Overrides) -> Result<Config> {
    ConfigLoader::default()
        .load(config_path, overrides)
        .context("failed to load configuration")
}
