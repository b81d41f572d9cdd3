use clap::Parser;

use packagebusters::api::server::run_server;
use packagebusters::config::Settings;
use packagebusters::logging::init_logging;

#[derive(Parser)]
#[command(name = "packagebusters")]
#[command(
    version,
    about = "Lists the Poetry dependencies used across a GitLab group tree"
)]
struct Cli {
    #[command(flatten)]
    settings: Settings,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _logging_guard = init_logging(cli.settings.log_format)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run_server(cli.settings))
}
