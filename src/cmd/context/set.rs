//! Create a context or update fields of an existing one.
use std::io::Write;
use std::path::Path;

use anyhow::Context as _;
use anyhow::Result;
use clap::Args;

use crate::config::modify_config;
use crate::config::AuthInfo;
use crate::config::Context;
use crate::errors::EmptyContextName;
use crate::Globals;

/// Admin service URL of new contexts.
pub const DEFAULT_ADMIN_SERVICE_URL: &str = "http://localhost:8080";

/// Bookie service URL of new contexts.
pub const DEFAULT_BOOKIE_SERVICE_URL: &str = "http://localhost:8080";

/// Arguments to create or update a context.
///
/// Options that are not given, or are given an empty value, leave existing fields unchanged.
#[derive(Args, Debug, Default)]
pub struct SetArgs {
    /// Name of the context to create or update.
    pub name: String,

    /// URL of the Pulsar admin service.
    #[arg(long = "admin-service-url", short = 's')]
    pub admin_service_url: Option<String>,

    /// URL of the BookKeeper admin service.
    #[arg(long = "bookie-service-url")]
    pub bookie_service_url: Option<String>,

    /// Path to the client certificate for TLS authentication.
    #[arg(long = "client-certificate")]
    pub client_certificate: Option<String>,

    /// Path to the client private key for TLS authentication.
    #[arg(long = "client-key")]
    pub client_key: Option<String>,

    /// Store the client certificate and key in the configuration instead of their paths.
    #[arg(long = "embed-certs")]
    pub embed_certs: bool,

    /// Accept untrusted TLS certificates from the cluster.
    #[arg(
        long = "tls-allow-insecure",
        num_args = 0..=1,
        default_missing_value = "true",
    )]
    pub tls_allow_insecure: Option<bool>,

    /// Path to the trusted TLS certificates bundle.
    #[arg(long = "tls-trust-cert-path")]
    pub tls_trust_cert_path: Option<String>,

    /// Bearer token to authenticate with.
    #[arg(long = "token")]
    pub token: Option<String>,

    /// Path to a file containing the bearer token to authenticate with.
    #[arg(long = "token-file")]
    pub token_file: Option<String>,
}

/// Create a context or update fields of an existing one, then make it the current context.
pub async fn run(globals: &Globals, args: &SetArgs, out: &mut dyn Write) -> Result<i32> {
    if args.name.is_empty() {
        anyhow::bail!(EmptyContextName);
    }

    let access = globals.access.as_ref();
    let mut config = access.starting_config().await?;
    let existing = config.contexts.get(&args.name).cloned();
    let created = existing.is_none();
    let mut context = existing.unwrap_or_else(|| Context {
        user: String::new(),
        admin_service_url: DEFAULT_ADMIN_SERVICE_URL.to_string(),
        bookie_service_url: DEFAULT_BOOKIE_SERVICE_URL.to_string(),
    });
    let mut auth = config
        .auth_infos
        .get(&args.name)
        .cloned()
        .unwrap_or_default();

    let cwd = std::env::current_dir().context("unable to determine the working directory")?;
    apply(args, &cwd, &mut context, &mut auth);
    if args.embed_certs {
        embed_certs(&mut auth).await?;
    }

    config.contexts.insert(args.name.clone(), context);
    config.auth_infos.insert(args.name.clone(), auth);
    config.current_context = args.name.clone();
    modify_config(access, &config).await?;

    let action = if created { "created" } else { "modified" };
    writeln!(out, "Context \"{}\" {}.", args.name, action)?;
    Ok(0)
}

/// Copy the given options over the context and auth info.
///
/// Relative file paths are made absolute against `cwd`.
fn apply(args: &SetArgs, cwd: &Path, context: &mut Context, auth: &mut AuthInfo) {
    update(&mut context.admin_service_url, &args.admin_service_url);
    update(&mut context.bookie_service_url, &args.bookie_service_url);
    update(&mut auth.token, &args.token);

    update_path(&mut auth.client_certificate, &args.client_certificate, cwd);
    update_path(&mut auth.client_key, &args.client_key, cwd);
    update_path(&mut auth.tls_trust_certs_file_path, &args.tls_trust_cert_path, cwd);
    update_path(&mut auth.token_file, &args.token_file, cwd);

    if let Some(insecure) = args.tls_allow_insecure {
        auth.tls_allow_insecure_connection = insecure;
    }
}

/// Replace the client certificate and key paths with the content of the files.
async fn embed_certs(auth: &mut AuthInfo) -> Result<()> {
    let pairs = [
        (&mut auth.client_certificate, &mut auth.client_certificate_data),
        (&mut auth.client_key, &mut auth.client_key_data),
    ];
    for (path, data) in pairs {
        if path.is_empty() {
            continue;
        }
        *data = tokio::fs::read_to_string(path.as_str())
            .await
            .with_context(|| format!("unable to read file to embed at '{}'", path))?;
        path.clear();
    }
    Ok(())
}

fn update(field: &mut String, value: &Option<String>) {
    match value.as_deref() {
        None | Some("") => (),
        Some(value) => *field = value.to_string(),
    }
}

fn update_path(field: &mut String, value: &Option<String>, cwd: &Path) {
    let value = match value.as_deref() {
        None | Some("") => return,
        Some(value) => value,
    };
    *field = cwd.join(value).to_string_lossy().into_owned();
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::apply;
    use super::embed_certs;
    use super::SetArgs;
    use crate::config::AuthInfo;
    use crate::config::Context;

    #[test]
    fn empty_values_keep_fields() {
        let args = SetArgs {
            name: String::from("ctx1"),
            admin_service_url: Some(String::new()),
            bookie_service_url: Some(String::from("http://bookie:8083")),
            ..Default::default()
        };
        let mut context = Context {
            user: String::new(),
            admin_service_url: String::from("http://broker:8080"),
            bookie_service_url: String::from("http://localhost:8080"),
        };
        let mut auth = AuthInfo {
            token: String::from("keep"),
            ..Default::default()
        };
        apply(&args, Path::new("/work"), &mut context, &mut auth);
        assert_eq!(context.admin_service_url, "http://broker:8080");
        assert_eq!(context.bookie_service_url, "http://bookie:8083");
        assert_eq!(auth.token, "keep");
        assert!(!auth.tls_allow_insecure_connection);
    }

    #[test]
    fn paths_made_absolute() {
        let args = SetArgs {
            name: String::from("ctx1"),
            token_file: Some(String::from("tokens/admin.jwt")),
            tls_trust_cert_path: Some(String::from("/etc/ssl/ca.pem")),
            tls_allow_insecure: Some(true),
            ..Default::default()
        };
        let mut context = Context::default();
        let mut auth = AuthInfo::default();
        apply(&args, Path::new("/work"), &mut context, &mut auth);
        assert_eq!(auth.token_file, "/work/tokens/admin.jwt");
        assert_eq!(auth.tls_trust_certs_file_path, "/etc/ssl/ca.pem");
        assert!(auth.tls_allow_insecure_connection);
    }

    #[tokio::test]
    async fn embed_reads_files() {
        let tmp = tempfile::tempdir().expect("temp dir to be created");
        let cert = tmp.path().join("client.pem");
        std::fs::write(&cert, "-----BEGIN CERTIFICATE-----\n").expect("cert to be written");
        let mut auth = AuthInfo {
            client_certificate: cert.display().to_string(),
            ..Default::default()
        };
        embed_certs(&mut auth).await.expect("certs to be embedded");
        assert_eq!(auth.client_certificate, "");
        assert_eq!(auth.client_certificate_data, "-----BEGIN CERTIFICATE-----\n");
        assert_eq!(auth.client_key_data, "");
    }
}
