//! Build metadata and plugin API version accessors.
//! Includes the version.rs generated by the build script.

include!(concat!(env!("OUT_DIR"), "/version.rs"));

/// Plugin API version from `[package.metadata]`, with a stable fallback
pub fn get_api_version() -> u32 {
    PLUGIN_API_VERSION.parse().unwrap_or(20250727)
}

/// Build time string from the build script (UTC)
pub fn build_time() -> &'static str {
    BUILD_TIME
}

/// Short git hash captured by the build script
pub fn git_hash() -> &'static str {
    GIT_HASH
}

/// Plugins built against an API at or below ours are accepted
pub fn is_api_compatible(plugin_api_version: u32) -> bool {
    plugin_api_version <= get_api_version()
}

/// Long version line for `--version`
pub fn long_version() -> String {
    format!(
        "{} (plugin api {}, built {}, git {})",
        env!("CARGO_PKG_VERSION"),
        get_api_version(),
        build_time(),
        git_hash()
    )
}
