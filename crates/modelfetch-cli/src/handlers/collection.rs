//! Collection command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// List the model identifiers of a collection, one per line.
pub async fn execute(ctx: &CliContext, source: &str, public: bool) -> Result<()> {
    let identifiers = ctx
        .resolver()
        .expand(source, !public)
        .await
        .map_err(CliError::from)?;

    if identifiers.is_empty() {
        eprintln!("Collection contains no models.");
        return Ok(());
    }
    for identifier in identifiers {
        println!("{identifier}");
    }
    Ok(())
}
