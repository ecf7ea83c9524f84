//! Show connection details for the current context.
use std::io::Write;

use anyhow::Result;

use crate::config::Connection;
use crate::Globals;

/// Show connection details for the current context.
pub async fn run(globals: &Globals, out: &mut dyn Write) -> Result<i32> {
    let access = globals.access.as_ref();
    let config = access.starting_config().await?;
    let path = access.default_filename().display().to_string();
    let connection = Connection::resolve(&config, &path)?;
    globals.formatter.connection(out, &connection)?;
    Ok(0)
}
