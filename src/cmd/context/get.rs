//! List all known contexts.
use std::io::Write;

use anyhow::Result;

use crate::Globals;

/// List all known contexts, sorted by name.
pub async fn run(globals: &Globals, out: &mut dyn Write) -> Result<i32> {
    let config = globals.access.starting_config().await?;
    let mut formatter = globals.formatter.context_list();

    for (name, context) in &config.contexts {
        formatter.append(name, context, config.current_context == *name)?;
    }

    formatter.finish(out)?;
    Ok(0)
}
