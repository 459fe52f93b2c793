use std::path::PathBuf;

use clap::Parser;
use common::{config::Settings, plot::render_script, util::SystemRunner};
use eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter,
    fmt::{layer, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

mod sweep;

const MODULES: &[&str] = &["fio_latency_sweep", "common", "fio", "fio_latency"];

/// Measure fio mean latency over a range of I/O depths and plot it
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Name of the test
    #[arg(long)]
    name: String,
    /// Path to the file or block device to test
    #[arg(long)]
    filename: String,
    /// Path to save the output graph
    #[arg(long)]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or("warn".to_owned());
    let args = Cli::parse();
    let file_appender = tracing_appender::rolling::never(".", "log.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let mut env_filter = EnvFilter::new("");
    for module in MODULES {
        env_filter = env_filter.add_directive(format!("{module}={log_level}").parse()?);
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            layer()
                .with_writer(std::io::stderr)
                .with_timer(ChronoLocal::new("%v %k:%M:%S %z".to_owned()))
                .compact(),
        )
        .with(layer().with_writer(non_blocking).with_ansi(false))
        .init();

    if let Err(err) = run(args).await {
        error!("{err:#?}");
        return Err(err);
    }
    Ok(())
}

async fn run(args: Cli) -> Result<()> {
    let settings = Settings::load().await?;
    let runner = SystemRunner;

    let progress = ProgressBar::new(2 * settings.io_depths.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner:.green} [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let spec = sweep::run_sweep(
        &runner,
        &settings,
        &args.name,
        &args.filename,
        &args.output,
        &progress,
    )
    .await?;

    let script = spec.build_script(&settings.plot);
    render_script(
        &runner,
        &settings.plot.program,
        &settings.plot.script_file,
        &script,
    )
    .await?;
    info!("Plot written to {}", spec.output().display());
    Ok(())
}
