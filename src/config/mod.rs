//! Layered `pulsarctl` configuration: loading, merging and writing back contexts.
//!
//! Configuration can be spread across several files. Entries are loaded from all of them
//! and changes are written back to the file each entry came from.
mod access;
mod active;
mod loading;
mod merge;
mod model;
mod modify;

pub mod codec;
pub mod lock;
pub mod paths;

pub use self::access::ConfigAccess;
pub use self::access::PathOptions;
pub use self::active::Connection;
pub use self::loading::recommended_home_file;
pub use self::loading::Error as LoadingError;
pub use self::loading::LoadingRules;
pub use self::loading::CONFIG_PATH_ENV_VAR;
pub use self::merge::merge_layered;
pub use self::merge::overlay_maps_prefer_existing;
pub use self::merge::overlay_scalars;
pub use self::model::AuthInfo;
pub use self::model::Config;
pub use self::model::Context;
pub use self::modify::modify_config;
pub use self::modify::ConsistencyError;
