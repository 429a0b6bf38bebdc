use std::io::{self, IsTerminal, Read};

use anyhow::{Result, anyhow};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "layout-analyzer",
    version,
    about = "Detect text regions, background, borders and effects in an image"
)]
struct Cli {
    /// Raw image file to analyze instead of base64 text on stdin
    #[arg(short = 'd', long = "data")]
    data: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long = "pretty")]
    pretty: bool,

    /// Read extra settings from a local TOML file
    #[arg(short = 'r', long = "read-settings")]
    read_settings: Option<String>,

    /// Run the HTTP server instead of a single analysis
    #[arg(long = "server")]
    server: bool,

    /// Server listen address (overrides settings [server].addr)
    #[arg(long = "addr", requires = "server")]
    addr: Option<String>,

    /// Enable verbose logging
    #[arg(long = "verbose")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    layout_analyzer::logging::init(cli.verbose)?;

    if cli.server {
        let settings_path = cli.read_settings.as_deref().map(std::path::Path::new);
        let settings = layout_analyzer::settings::load_settings(settings_path)?;
        let addr = cli.addr.unwrap_or_else(|| settings.server_addr.clone());
        return layout_analyzer::server::run_server(settings, addr).await;
    }

    let input = if cli.data.is_some() {
        None
    } else {
        if io::stdin().is_terminal() {
            return Err(anyhow!("pipe base64 image text to stdin or pass --data <file>"));
        }
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|err| anyhow!("stdin must be base64 text: {}", err))?;
        Some(buffer)
    };

    let output = layout_analyzer::run(
        layout_analyzer::Config {
            data: cli.data,
            settings_path: cli.read_settings,
            pretty: cli.pretty,
        },
        input,
    )?;

    println!("{}", output);
    Ok(())
}
