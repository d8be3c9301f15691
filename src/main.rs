use anyhow::Result;
use clap::Parser;
use report_column_editor::{cli, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    logging::init_logging(args.verbose);
    cli::run(args).await
}
