//! Format output to JSON.
use std::io::Write;

use anyhow::Result;

use super::FormatterStrategy;
use crate::config::Connection;
use crate::config::Context;

/// Format output to JSON.
pub struct JsonFormatter;

impl FormatterStrategy for JsonFormatter {
    fn connection(&self, out: &mut dyn Write, connection: &Connection) -> Result<()> {
        print_json(out, connection)
    }

    fn context_list(&self) -> Box<dyn super::ContextList> {
        Box::<ContextList>::default()
    }
}

/// Pretty print a serialisable value as JSON.
fn print_json<V>(out: &mut dyn Write, value: &V) -> Result<()>
where
    V: serde::Serialize,
{
    let value = serde_json::to_string_pretty(value)?;
    writeln!(out, "{}", value)?;
    Ok(())
}

/// Pretty print an list of context information.
#[derive(Default)]
struct ContextList(Vec<ContextInfo>);

impl super::ContextList for ContextList {
    fn append(&mut self, name: &str, entry: &Context, active: bool) -> Result<()> {
        self.0.push(ContextInfo {
            name: name.to_string(),
            active,
            context: entry.clone(),
        });
        Ok(())
    }

    fn finish(&mut self, out: &mut dyn Write) -> Result<()> {
        print_json(out, &self.0)
    }
}

/// Container for context entries to list.
#[derive(serde::Serialize)]
struct ContextInfo {
    name: String,
    active: bool,
    context: Context,
}
