//! Replays a JSON-lines editing script and prints the resulting schema preview.

use std::fs::File;
use std::io::{self, BufReader};

use anyhow::Context;
use clap::Parser;
use schema_builder_core::list_types;
use schema_builder_session::logging::init_tracing;
use schema_builder_session::{replay, Cli, EditorSession};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.session_config();
    init_tracing(&config.log)?;

    if cli.list_types {
        println!("{}", serde_json::to_string_pretty(list_types())?);
        return Ok(());
    }

    let mut session = EditorSession::new(&config);
    let applied = match &cli.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            replay(&mut session, BufReader::new(file))?
        }
        None => replay(&mut session, io::stdin().lock())?,
    };
    info!(
        applied,
        nodes = session.tree().node_count(),
        "session replayed"
    );

    println!("{}", session.preview_text()?);
    Ok(())
}
