use clap::Parser;
use dependabot_merger::{Config, DependabotMerger, Sleep};

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = Config::parse();
    let merger = DependabotMerger::new(&config, Box::new(Sleep))?;
    merger.run().await?;

    Ok(())
}
