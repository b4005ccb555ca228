mod commands;
mod terminal;

use commands::{CommandLine, scan};
use osprobe_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging()?;

    let cfg = Config {
        quiet: commands.quiet,
    };
    let scan_cfg = commands.scan_config()?;

    print::header("starting scanner", cfg.quiet);
    scan::scan(&commands.range, &scan_cfg, &cfg).await
}
