//! voicelab - play a demo song through the default audio device
//!
//! Run with: cargo run -- [arpeggio|groove|loonboon] [--headless]
//!
//! Logging goes to stderr and is filtered by `RUST_LOG` (default `warn`).

mod app;
mod ui;

use app::{Song, Voicelab};
use color_eyre::eyre::{bail, Result as EyreResult};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: voicelab [arpeggio|groove|loonboon] [--headless]";

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut song = Song::Arpeggio;
    let mut headless = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--headless" => headless = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            name => match Song::from_name(name) {
                Some(choice) => song = choice,
                None => bail!("unknown argument `{name}`\n{USAGE}"),
            },
        }
    }

    Voicelab::new(song).headless(headless).run()
}
