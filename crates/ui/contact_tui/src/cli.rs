use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "contact", version, about = "Contact form in the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Run the interactive form (default)
    Run {
        /// Ticks per second, overrides `ui.tick_rate`
        #[arg(short, long, value_name = "FLOAT")]
        tick_rate: Option<f64>,
        /// Frames per second, overrides `ui.frame_rate`
        #[arg(short, long, value_name = "FLOAT")]
        frame_rate: Option<f64>,
    },
    /// Print the effective form schema
    Schema {
        /// TOML instead of JSON
        #[arg(long)]
        toml: bool,
    },
}

impl Default for Cmd {
    fn default() -> Self {
        Cmd::Run {
            tick_rate: None,
            frame_rate: None,
        }
    }
}
