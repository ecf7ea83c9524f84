//! Errors reported to users by `pulsarctl` commands.

/// A named configuration entry does not exist.
#[derive(Debug, thiserror::Error)]
pub enum NotFound {
    /// No auth info with the given name exists.
    #[error("no auth info exists with the name \"{name}\" in {path}")]
    AuthInfo { name: String, path: String },

    /// No context with the given name exists.
    #[error("no context exists with the name \"{name}\" in {path}")]
    Context { name: String, path: String },
}

impl NotFound {
    /// Error for a missing auth info.
    pub fn auth_info<N, P>(name: N, path: P) -> NotFound
    where
        N: Into<String>,
        P: Into<String>,
    {
        NotFound::AuthInfo {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Error for a missing context.
    pub fn context<N, P>(name: N, path: P) -> NotFound
    where
        N: Into<String>,
        P: Into<String>,
    {
        NotFound::Context {
            name: name.into(),
            path: path.into(),
        }
    }

    /// The name of the entry we failed to find.
    pub fn name(&self) -> &str {
        match self {
            NotFound::AuthInfo { name, .. } => name,
            NotFound::Context { name, .. } => name,
        }
    }
}

/// Renaming a context would replace an existing one.
#[derive(Debug, thiserror::Error)]
#[error("cannot rename the context \"{old}\", the context \"{new}\" already exists in {path}")]
pub struct AlreadyExists {
    pub old: String,
    pub new: String,
    pub path: String,
}

/// A context name is required but an empty one was given.
#[derive(Debug, thiserror::Error)]
#[error("empty context names are not allowed")]
pub struct EmptyContextName;

/// The command needs a current context but none is selected.
#[derive(Debug, thiserror::Error)]
#[error("current context is not set")]
pub struct CurrentContextNotSet;

/// The active context can't be used to connect to a cluster.
#[derive(Debug, thiserror::Error)]
#[error("invalid connection settings for context \"{context}\": {reason}")]
pub struct ConnectionInvalid {
    pub context: String,
    pub reason: String,
}
