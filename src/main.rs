use clap::Parser;
use malloc_bench::{run_harness, HarnessArgs};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = HarnessArgs::parse();
    let summary = run_harness(&args)?;
    println!("{summary}");

    Ok(())
}
