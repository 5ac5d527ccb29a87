//! CLI entry point for the photo-mosaic builder

use clap::Parser;
use tessera::io::cli::{Cli, MosaicApp};

fn main() -> tessera::Result<()> {
    let cli = Cli::parse();
    cli.init_logging();
    let app = MosaicApp::new(cli);
    app.run()?;
    Ok(())
}
