//! Race configuration loading.

use std::path::{Path, PathBuf};

use bt_core::RaceConfig;
use figment::Figment;
use figment::providers::{Env, Format, Json, Toml};

/// Loads the race configuration from default locations, optionally
/// overlaid with a specific file.
///
/// Missing fields fall back to [`RaceConfig::default`].
#[expect(
    clippy::result_large_err,
    reason = "figment::Error is large but only returned at startup"
)]
pub fn load_from(config_path: Option<&Path>) -> Result<RaceConfig, figment::Error> {
    let mut figment = Figment::new();

    // Load from default config location
    if let Some(config_dir) = dirs_config_path() {
        figment = figment.merge(Toml::file(config_dir.join("config.toml")));
    }

    // Load from specified config file
    if let Some(path) = config_path {
        figment = if is_json(path) {
            figment.merge(Json::file(path))
        } else {
            figment.merge(Toml::file(path))
        };
    }

    // Load from environment variables (BIATHLON_*)
    figment = figment.merge(Env::prefixed("BIATHLON_"));

    figment.extract()
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Returns the platform-specific config directory for biathlon.
///
/// On Linux: `~/.config/biathlon`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("biathlon"))
}
