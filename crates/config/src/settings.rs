//! Service-level tunables loaded from a RON file.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Error;

/// Environment variable that overrides the settings file location.
pub const SETTINGS_ENV: &str = "OVERLAY_SETTINGS";

/// Display geometry used when the platform cannot report one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallbackDisplay {
    pub width_px: i32,
    pub height_px: i32,
    pub density: f32,
}

impl Default for FallbackDisplay {
    fn default() -> Self {
        Self {
            width_px: 1080,
            height_px: 1920,
            density: 1.0,
        }
    }
}

/// Tunables for the overlay service. Every field has a default, so an empty
/// file `()` is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Snap animation tick interval.
    pub snap_interval_ms: u64,
    /// Squared pointer travel (px²) below which a move is not a drag.
    pub drag_threshold_px2: f32,
    /// Per-axis distance (px) under which a snap animation has converged.
    pub snap_converge_px: i32,
    /// Tag used for the service wake lock.
    pub wake_lock_tag: String,
    /// Display metrics used when the platform reports none.
    pub fallback_display: FallbackDisplay,
    /// Status bar height used for the default start offset.
    pub status_bar_height_dp: i32,
    /// Duration of the `turnScreenOff` wake-lock pulse.
    pub screen_off_pulse_ms: u64,
    /// Restart the overlay after a device boot.
    pub restart_on_boot: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            snap_interval_ms: 25,
            drag_threshold_px2: 25.0,
            snap_converge_px: 2,
            wake_lock_tag: "overlay_window:WakeLock".to_string(),
            fallback_display: FallbackDisplay::default(),
            status_bar_height_dp: 25,
            screen_off_pulse_ms: 1000,
            restart_on_boot: false,
        }
    }
}

impl Settings {
    /// Parse settings from RON text.
    pub fn from_ron(text: &str) -> Result<Self, Error> {
        let settings: Self = ron::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from `path`.
    pub fn load_from_path(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|e| Error::Read {
            path: Some(path.to_path_buf()),
            message: e.to_string(),
        })?;
        Self::from_ron(&text).map_err(|e| e.with_path(path.to_path_buf()))
    }

    /// Resolve and load settings.
    ///
    /// Policy:
    /// 1) `explicit` when provided (must exist).
    /// 2) `$OVERLAY_SETTINGS` when set (must exist).
    /// 3) `~/.config/overlay/settings.ron` when it exists.
    /// 4) Defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, Error> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }
        if let Some(path) = env::var_os(SETTINGS_ENV)
            && !path.is_empty()
        {
            return Self::load_from_path(Path::new(&path));
        }
        let preferred = default_settings_path();
        if preferred.exists() {
            return Self::load_from_path(&preferred);
        }
        debug!(path = %preferred.display(), "no settings file, using defaults");
        Ok(Self::default())
    }

    fn validate(&self) -> Result<(), Error> {
        if self.snap_interval_ms == 0 {
            return Err(Error::Invalid("snap_interval_ms must be > 0".into()));
        }
        if self.snap_converge_px < 1 {
            return Err(Error::Invalid("snap_converge_px must be >= 1".into()));
        }
        if self.drag_threshold_px2 < 0.0 {
            return Err(Error::Invalid("drag_threshold_px2 must be >= 0".into()));
        }
        if self.fallback_display.density <= 0.0 {
            return Err(Error::Invalid("fallback_display.density must be > 0".into()));
        }
        Ok(())
    }
}

/// Preferred settings location (`~/.config/overlay/settings.ron`).
pub fn default_settings_path() -> PathBuf {
    let mut p = PathBuf::from(env::var_os("HOME").unwrap_or_default());
    p.push(".config");
    p.push("overlay");
    p.push("settings.ron");
    p
}
