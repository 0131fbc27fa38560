use clap::Parser;
use color_eyre::Result;
use contact_tui::{
    app::App,
    cli::{Cli, Cmd},
    config::Config,
    errors, logging,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    errors::init()?;
    let _log_guard = logging::init()?;
    let config = Config::new()?;

    match args.cmd.unwrap_or_default() {
        Cmd::Run {
            tick_rate,
            frame_rate,
        } => {
            let mut app = App::new(config, tick_rate, frame_rate)?;
            app.run().await?;
        }
        Cmd::Schema { toml } => println!("{}", config.schema_text(toml)?),
    }
    Ok(())
}
