//! Format output for easy consumption by people interacting with `pulsarctl`.
use std::io::Write;

use anyhow::Result;

use super::ContextList;
use super::FormatterStrategy;
use crate::config::Connection;

mod context;

/// Format output for easy consumption by people interacting with `pulsarctl`.
pub struct HumanFormatter;

impl FormatterStrategy for HumanFormatter {
    fn connection(&self, out: &mut dyn Write, connection: &Connection) -> Result<()> {
        self::context::show(out, connection)
    }

    fn context_list(&self) -> Box<dyn ContextList> {
        Box::new(self::context::ContextList::new())
    }
}
