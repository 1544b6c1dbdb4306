/*
 * This file is part of Fanctl.
 *
 * Copyright (C) 2026 Fanctl contributors
 *
 * Fanctl is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Fanctl is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Fanctl. If not, see <https://www.gnu.org/licenses/>.
 */

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_hwmon_dir() -> PathBuf {
    PathBuf::from("/sys/class/hwmon/hwmon2")
}

fn default_channels() -> Vec<u32> {
    vec![1, 2, 5]
}

fn default_refresh_ms() -> u64 {
    300
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SavedConfig {
    /// Controller chip directory, e.g. /sys/class/hwmon/hwmon2.
    #[serde(default = "default_hwmon_dir")]
    pub hwmon_dir: PathBuf,
    /// Ordered channel ids; pwm<N>/pwm<N>_enable/fan<N>_input per id.
    #[serde(default = "default_channels")]
    pub channels: Vec<u32>,
    /// Idle refresh interval in milliseconds.
    #[serde(default = "default_refresh_ms")]
    pub refresh_ms: u64,
}

impl Default for SavedConfig {
    fn default() -> Self {
        Self {
            hwmon_dir: default_hwmon_dir(),
            channels: default_channels(),
            refresh_ms: default_refresh_ms(),
        }
    }
}

impl SavedConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }
}

pub fn config_path() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&xdg).join("fanctl").join("config.json");
    }
    if let Ok(home) = env::var("HOME") {
        return Path::new(&home)
            .join(".config")
            .join("fanctl")
            .join("config.json");
    }
    PathBuf::from("/etc/fanctl/config.json")
}

pub fn validate_config(cfg: &SavedConfig) -> Result<(), String> {
    if cfg.channels.is_empty() {
        return Err("channels must not be empty".to_string());
    }
    let mut seen = std::collections::HashSet::new();
    for &ch in &cfg.channels {
        if !seen.insert(ch) {
            return Err(format!("duplicate channel {}", ch));
        }
    }
    if cfg.refresh_ms < 50 || cfg.refresh_ms > 5000 {
        return Err(format!(
            "refresh_ms {} out of range (50..=5000)",
            cfg.refresh_ms
        ));
    }
    Ok(())
}

pub fn load_saved_config() -> Option<SavedConfig> {
    let path = config_path();
    let data = fs::read_to_string(&path).ok()?;
    let cfg: SavedConfig = serde_json::from_str(&data).ok()?;
    validate_config(&cfg).ok()?;
    Some(cfg)
}

/// The effective startup configuration: the saved file when present and
/// valid, the defaults otherwise.
pub fn load_config() -> SavedConfig {
    load_saved_config().unwrap_or_default()
}
