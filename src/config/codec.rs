//! Encode and decode configuration files.
use std::io::ErrorKind;
use std::path::Path;

use anyhow::Context as _;
use anyhow::Result;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use super::Config;

/// Errors reading or writing configuration files.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unable to create the directory that will hold a configuration file.
    #[error("unable to create configuration directory '{0}'")]
    // (path,)
    CreateDir(String),

    /// The configuration document is not valid YAML for the expected model.
    #[error("unable to decode configuration document")]
    Decode,

    /// Unable to encode the configuration into a document.
    #[error("unable to encode configuration document")]
    Encode,

    /// Configuration file not found at the given path.
    #[error("configuration file not found at '{0}'")]
    // (path,)
    NotFound(String),

    /// Unable to read configuration file at the given path.
    #[error("unable to read configuration file at '{0}'")]
    // (path,)
    Read(String),

    /// Unable to write configuration file at the given path.
    #[error("unable to write configuration file at '{0}'")]
    // (path,)
    Write(String),
}

/// Check if an error was caused by a configuration file not existing.
pub fn is_not_found(error: &anyhow::Error) -> bool {
    error
        .chain()
        .any(|cause| matches!(cause.downcast_ref::<Error>(), Some(Error::NotFound(_))))
}

/// Decode a configuration document.
///
/// Empty (or blank) documents decode to an empty configuration.
pub fn decode(data: &[u8]) -> Result<Config> {
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(Config::new());
    }
    let config = serde_yaml::from_slice(data).context(Error::Decode)?;
    Ok(config)
}

/// Encode a configuration into a YAML document.
pub fn encode(config: &Config) -> Result<Vec<u8>> {
    let document = serde_yaml::to_string(config).context(Error::Encode)?;
    Ok(document.into_bytes())
}

/// Load a configuration file and stamp the origin of its entries.
///
/// A missing file is reported as [`Error::NotFound`] so callers can tell it apart.
pub async fn load_from_file(path: &Path) -> Result<Config> {
    let display = path.display().to_string();
    let data = match tokio::fs::read(path).await {
        Ok(data) => data,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            return Err(anyhow::anyhow!(Error::NotFound(display)));
        }
        Err(error) => return Err(error).context(Error::Read(display)),
    };

    let mut config =
        decode(&data).with_context(|| format!("invalid configuration file at '{}'", display))?;
    for auth in config.auth_infos.values_mut() {
        auth.location_of_origin = path.to_path_buf();
    }
    Ok(config)
}

/// Write a configuration to file, replacing any existing content.
///
/// Missing parent directories are created.
/// New files are only accessible by the owner since they can embed credentials.
pub async fn write_to_file(config: &Config, path: &Path) -> Result<()> {
    let display = path.display().to_string();
    let buffer = encode(config)?;
    ensure_parent_dir(path).await?;

    let mut options = OpenOptions::new();
    options.create(true).truncate(true).write(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options
        .open(path)
        .await
        .with_context(|| Error::Write(display.clone()))?;
    file.write_all(&buffer)
        .await
        .with_context(|| Error::Write(display.clone()))?;
    file.flush().await.with_context(|| Error::Write(display))
}

/// Create the parent directory of a path, if it does not exist.
pub async fn ensure_parent_dir(path: &Path) -> Result<()> {
    let parent = match path.parent() {
        None => return Ok(()),
        Some(parent) if parent.as_os_str().is_empty() => return Ok(()),
        Some(parent) => parent,
    };
    if parent.exists() {
        return Ok(());
    }

    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o755);
    builder
        .create(parent)
        .await
        .with_context(|| Error::CreateDir(parent.display().to_string()))
}
