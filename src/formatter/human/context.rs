//! Format `pulsarctl` contexts and connections.
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;

use crate::config::Connection;
use crate::config::Context;

/// Format a list of [`Context`] objects into a table.
pub struct ContextList {
    table: comfy_table::Table,
}

impl ContextList {
    pub fn new() -> ContextList {
        let mut table = comfy_table::Table::new();
        table.set_header(vec![
            "CURRENT",
            "NAME",
            "BROKER SERVICE URL",
            "BOOKIE SERVICE URL",
        ]);
        ContextList { table }
    }
}

impl crate::formatter::ContextList for ContextList {
    fn append(&mut self, name: &str, context: &Context, active: bool) -> Result<()> {
        self.table.add_row(vec![
            if active { "*" } else { "" },
            name,
            context.admin_service_url.as_str(),
            context.bookie_service_url.as_str(),
        ]);
        Ok(())
    }

    fn finish(&mut self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "{}", self.table)?;
        Ok(())
    }
}

/// Format the [`Connection`] for users to inspect.
pub fn show(out: &mut dyn Write, connection: &Connection) -> Result<()> {
    writeln!(out, "Context: {}", connection.context)?;
    writeln!(out, "  Admin Service URL: {}", connection.admin_service_url)?;
    writeln!(out, "  Bookie Service URL: {}", connection.bookie_service_url)?;
    writeln!(out)?;
    writeln!(out, "Authentication:")?;
    writeln!(out, "  Token: {}", set_or_not(&connection.token))?;
    writeln!(out, "  Token File: {}", path_or_not_set(&connection.token_file))?;
    writeln!(
        out,
        "  Client Certificate: {}",
        file_or_inline(&connection.client_certificate, &connection.client_certificate_data)
    )?;
    writeln!(
        out,
        "  Client Key: {}",
        file_or_inline(&connection.client_key, &connection.client_key_data)
    )?;
    writeln!(out)?;
    writeln!(out, "TLS:")?;
    writeln!(
        out,
        "  Trusted Certificates: {}",
        path_or_not_set(&connection.tls_trust_certs_file_path)
    )?;
    writeln!(
        out,
        "  Allow Insecure Connection: {}",
        connection.tls_allow_insecure_connection
    )?;
    Ok(())
}

/// Report on the set status of an optional value (set vs not set).
fn set_or_not<T>(value: &Option<T>) -> &'static str {
    match value.is_some() {
        true => "Set",
        false => "Not Set",
    }
}

fn path_or_not_set(value: &Option<PathBuf>) -> String {
    match value {
        Some(path) => path.display().to_string(),
        None => String::from("Not Set"),
    }
}

/// Inline data takes priority over files.
fn file_or_inline(path: &Option<PathBuf>, data: &Option<String>) -> String {
    match (path, data) {
        (_, Some(_)) => String::from("Inline"),
        (path, None) => path_or_not_set(path),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Connection;
    use crate::config::Context;
    use crate::formatter::ContextList as _;

    #[test]
    fn list_marks_active_context() {
        let mut list = super::ContextList::new();
        let context = Context {
            user: String::new(),
            admin_service_url: String::from("http://broker:8080"),
            bookie_service_url: String::from("http://bookie:8080"),
        };
        list.append("a", &context, false).expect("row to be added");
        list.append("b", &context, true).expect("row to be added");

        let mut out = Vec::new();
        list.finish(&mut out).expect("table to be written");
        let out = String::from_utf8(out).expect("output to be UTF-8");
        assert!(out.contains("BROKER SERVICE URL"));
        let active = out
            .lines()
            .find(|line| line.contains(" b "))
            .expect("row for b");
        assert!(active.contains('*'));
        let inactive = out
            .lines()
            .find(|line| line.contains(" a "))
            .expect("row for a");
        assert!(!inactive.contains('*'));
    }

    #[test]
    fn show_hides_secrets() {
        let connection = Connection {
            context: String::from("prod"),
            admin_service_url: String::from("http://broker:8080"),
            bookie_service_url: String::from("http://bookie:8080"),
            client_certificate_data: Some(String::from("-----BEGIN CERTIFICATE-----")),
            token: Some(String::from("secret")),
            ..Default::default()
        };
        let mut out = Vec::new();
        super::show(&mut out, &connection).expect("connection to be shown");
        let out = String::from_utf8(out).expect("output to be UTF-8");
        assert!(out.contains("Context: prod"));
        assert!(out.contains("Token: Set"));
        assert!(out.contains("Client Certificate: Inline"));
        assert!(out.contains("Client Key: Not Set"));
        assert!(!out.contains("secret"));
    }
}
