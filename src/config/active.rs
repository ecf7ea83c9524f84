//! Resolve the active context into the settings needed to reach a cluster.
use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;
use serde::Serializer;

use super::Config;
use crate::errors::ConnectionInvalid;
use crate::errors::CurrentContextNotSet;
use crate::errors::NotFound;

/// Connection settings for the cluster selected by the current context.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Connection {
    /// Name of the context the connection was resolved from.
    pub context: String,

    pub admin_service_url: String,
    pub bookie_service_url: String,

    pub client_certificate: Option<PathBuf>,
    #[serde(serialize_with = "redact")]
    pub client_certificate_data: Option<String>,
    pub client_key: Option<PathBuf>,
    #[serde(serialize_with = "redact")]
    pub client_key_data: Option<String>,

    pub tls_allow_insecure_connection: bool,
    pub tls_trust_certs_file_path: Option<PathBuf>,

    #[serde(serialize_with = "redact")]
    pub token: Option<String>,
    pub token_file: Option<PathBuf>,
}

impl Connection {
    /// Resolve the current context of a configuration.
    ///
    /// Credentials come from the auth info named by the context, or named as the
    /// context itself when it names none. Missing credentials are not an error.
    /// `source` names the file reported in errors about missing entries.
    pub fn resolve(config: &Config, source: &str) -> Result<Connection> {
        let name = config.current_context.as_str();
        if name.is_empty() {
            anyhow::bail!(CurrentContextNotSet);
        }
        let context = config
            .contexts
            .get(name)
            .ok_or_else(|| NotFound::context(name, source))?;

        let user = match context.user.as_str() {
            "" => name,
            user => user,
        };
        let auth = config.auth_infos.get(user).cloned().unwrap_or_default();
        let invalid = |reason: &str| ConnectionInvalid {
            context: name.to_string(),
            reason: reason.to_string(),
        };
        if !auth.token.is_empty() && !auth.token_file.is_empty() {
            let error = invalid("the token and token file can not be specified at the same time");
            anyhow::bail!(error);
        }
        let has_token = !auth.token.is_empty() || !auth.token_file.is_empty();
        if has_token && !auth.tls_trust_certs_file_path.is_empty() {
            let error = invalid("the token and tls can not be specified at the same time");
            anyhow::bail!(error);
        }

        Ok(Connection {
            context: name.to_string(),
            admin_service_url: context.admin_service_url.clone(),
            bookie_service_url: context.bookie_service_url.clone(),
            client_certificate: non_empty(&auth.client_certificate).map(PathBuf::from),
            client_certificate_data: non_empty(&auth.client_certificate_data),
            client_key: non_empty(&auth.client_key).map(PathBuf::from),
            client_key_data: non_empty(&auth.client_key_data),
            tls_allow_insecure_connection: auth.tls_allow_insecure_connection,
            tls_trust_certs_file_path: non_empty(&auth.tls_trust_certs_file_path)
                .map(PathBuf::from),
            token: non_empty(&auth.token),
            token_file: non_empty(&auth.token_file).map(PathBuf::from),
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    match value {
        "" => None,
        value => Some(value.to_string()),
    }
}

/// Serialise secrets as a marker that they are set, never their value.
fn redact<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        None => serializer.serialize_none(),
        Some(_) => serializer.serialize_some("<redacted>"),
    }
}
