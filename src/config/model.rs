//! In-memory representation of the persisted `pulsarctl` configuration.
use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

/// Root of the persisted configuration: named contexts and credentials.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Credential bundles, keyed by name.
    #[serde(default, rename = "auth-info", deserialize_with = "nullable")]
    pub auth_infos: BTreeMap<String, AuthInfo>,

    /// Connection profiles, keyed by name.
    #[serde(default, deserialize_with = "nullable")]
    pub contexts: BTreeMap<String, Context>,

    /// Name of the active context, empty when none is selected.
    #[serde(default, rename = "current-context", deserialize_with = "nullable")]
    pub current_context: String,
}

impl Config {
    /// Create an empty configuration.
    pub fn new() -> Config {
        Config::default()
    }
}

/// A named bundle of credentials used to talk to a cluster.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct AuthInfo {
    /// Path to a client certificate file for TLS.
    #[serde(default, rename = "client-certificate", skip_serializing_if = "String::is_empty")]
    pub client_certificate: String,

    /// PEM-encoded client certificate, overrides `client_certificate`.
    #[serde(
        default,
        rename = "client-certificate-data",
        skip_serializing_if = "String::is_empty"
    )]
    pub client_certificate_data: String,

    /// Path to a client key file for TLS.
    #[serde(default, rename = "client-key", skip_serializing_if = "String::is_empty")]
    pub client_key: String,

    /// PEM-encoded client key, overrides `client_key`.
    #[serde(default, rename = "client-key-data", skip_serializing_if = "String::is_empty")]
    pub client_key_data: String,

    /// Absolute path of the file this entry was loaded from.
    ///
    /// Never persisted: it is stamped on every load and routes write-backs.
    #[serde(skip)]
    pub location_of_origin: PathBuf,

    /// Accept untrusted TLS certificates from the cluster.
    #[serde(
        default,
        rename = "tls-allow-insecure-connection",
        skip_serializing_if = "is_false"
    )]
    pub tls_allow_insecure_connection: bool,

    /// Path to a bundle of trusted TLS certificates.
    #[serde(
        default,
        rename = "tls-trust-certs-file-path",
        skip_serializing_if = "String::is_empty"
    )]
    pub tls_trust_certs_file_path: String,

    /// Bearer token for authentication.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,

    /// Path to a file containing a bearer token.
    #[serde(default, rename = "tokenFile", skip_serializing_if = "String::is_empty")]
    pub token_file: String,
}

impl AuthInfo {
    /// Mutable references to every field holding a file path.
    ///
    /// These are the fields the path resolver anchors to the originating file.
    pub fn file_references_mut(&mut self) -> [&mut String; 4] {
        [
            &mut self.client_certificate,
            &mut self.client_key,
            &mut self.token_file,
            &mut self.tls_trust_certs_file_path,
        ]
    }
}

/// A named connection profile selecting a cluster and the credentials to use.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Context {
    /// Name of the [`AuthInfo`] used by this context.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user: String,

    /// URL of the broker admin REST service.
    #[serde(default, rename = "admin-service-url")]
    pub admin_service_url: String,

    /// URL of the bookie admin REST service.
    #[serde(default, rename = "bookie-service-url")]
    pub bookie_service_url: String,
}

fn is_false(value: &bool) -> bool {
    !value
}

/// Treat explicit YAML `null`s as the default value.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let value = Option::<T>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}
