use clap::Parser;
use color_eyre::Result;
use devlens::{
    cli::Cli,
    config::Config,
    export,
    logging::init_tracing,
    trace::Replayer,
    Diagnostics,
};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use tracing::info;

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing("info");

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;

    let diagnostics = Diagnostics::new(&config);
    diagnostics.performance().start_manual();

    let report = {
        let mut replayer = Replayer::new(&diagnostics);
        if cli.trace == Path::new("-") {
            replayer.replay(io::stdin().lock())?
        } else {
            replayer.replay(BufReader::new(File::open(&cli.trace)?))?
        }
    };
    diagnostics.performance().stop();

    info!(
        events = report.events,
        unmatched = report.unmatched_completions,
        "trace replayed"
    );

    if cli.stdout {
        println!("{}", export::render(&diagnostics, cli.target, cli.format)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&diagnostics.summary())?);
        let path = export::export_to_file(
            &diagnostics,
            cli.target,
            cli.format,
            cli.export_dir.as_deref(),
        )?;
        println!("Exported to {}", path.display());
    }

    Ok(())
}
