//! Merge configurations loaded from several files into one.
//!
//! The policy is asymmetric on purpose: map entries (contexts and auth infos) are
//! never overwritten once present, while scalar fields are overwritten by any
//! non-empty value.
use super::Config;

/// Copy non-empty scalar fields of `src` over `dst`.
pub fn overlay_scalars(dst: &mut Config, src: &Config) {
    if !src.current_context.is_empty() {
        dst.current_context = src.current_context.clone();
    }
}

/// Copy map entries of `src` into `dst` unless `dst` already has an entry with that name.
///
/// Colliding entries are never merged field by field: the existing record is kept whole.
pub fn overlay_maps_prefer_existing(dst: &mut Config, src: &Config) {
    for (name, auth) in &src.auth_infos {
        dst.auth_infos
            .entry(name.clone())
            .or_insert_with(|| auth.clone());
    }
    for (name, context) in &src.contexts {
        dst.contexts
            .entry(name.clone())
            .or_insert_with(|| context.clone());
    }
}

/// Merge `src` on top of `dst` with the map/scalar policy described above.
pub fn overlay(dst: &mut Config, src: &Config) {
    overlay_maps_prefer_existing(dst, src);
    overlay_scalars(dst, src);
}

/// Merge configurations listed in precedence order (highest priority first).
///
/// Map entries come from the first configuration that defines them and
/// the scalar fields from the first configuration that sets them.
pub fn merge_layered(configs: &[Config]) -> Config {
    // Maps favour the first config, scalars favour the last one.
    let mut maps = Config::new();
    for config in configs {
        overlay(&mut maps, config);
    }

    // Same merge in reverse order so scalars favour the first config.
    let mut scalars = Config::new();
    for config in configs.iter().rev() {
        overlay(&mut scalars, config);
    }

    let mut merged = Config::new();
    overlay(&mut merged, &maps);
    overlay(&mut merged, &scalars);
    merged
}

#[cfg(test)]
mod tests {
    use super::merge_layered;
    use super::overlay_maps_prefer_existing;
    use super::overlay_scalars;
    use crate::config::Config;
    use crate::config::Context;

    fn context(url: &str) -> Context {
        Context {
            user: String::new(),
            admin_service_url: url.to_string(),
            bookie_service_url: String::from("http://localhost:8080"),
        }
    }

    #[test]
    fn scalars_ignore_empty_values() {
        let mut dst = Config::new();
        dst.current_context = String::from("keep");
        overlay_scalars(&mut dst, &Config::new());
        assert_eq!(dst.current_context, "keep");
    }

    #[test]
    fn maps_keep_existing_entries() {
        let mut dst = Config::new();
        dst.contexts.insert("x".into(), context("http://first:8080"));
        let mut src = Config::new();
        src.contexts.insert("x".into(), context("http://second:8080"));
        src.contexts.insert("y".into(), context("http://second:8080"));

        overlay_maps_prefer_existing(&mut dst, &src);
        assert_eq!(dst.contexts["x"].admin_service_url, "http://first:8080");
        assert_eq!(dst.contexts["y"].admin_service_url, "http://second:8080");
    }

    #[test]
    fn precedence_across_three_files() {
        let mut first = Config::new();
        first.current_context = String::from("a");
        first.contexts.insert("x".into(), context("http://first:8080"));
        let mut second = Config::new();
        second.current_context = String::from("b");
        let mut third = Config::new();
        third.contexts.insert("x".into(), context("http://third:8080"));
        third.contexts.insert("z".into(), context("http://third:8080"));

        let merged = merge_layered(&[first, second, third]);
        assert_eq!(merged.current_context, "a");
        assert_eq!(merged.contexts["x"], context("http://first:8080"));
        assert_eq!(merged.contexts["z"], context("http://third:8080"));
    }

    #[test]
    fn current_context_from_first_file_setting_it() {
        let first = Config::new();
        let mut second = Config::new();
        second.current_context = String::from("b");
        let mut third = Config::new();
        third.current_context = String::from("c");

        let merged = merge_layered(&[first, second, third]);
        assert_eq!(merged.current_context, "b");
    }

    #[test]
    fn nothing_to_merge() {
        let merged = merge_layered(&[]);
        assert_eq!(merged, Config::new());
    }
}
