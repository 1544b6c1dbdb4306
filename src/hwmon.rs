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

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde_json::json;
use thiserror::Error;

use crate::logger;

pub const DUTY_MIN: i64 = 0;
pub const DUTY_MAX: i64 = 255;

#[derive(Error, Debug)]
pub enum ControlError {
    #[error("no root privileges")]
    NotPrivileged,
    #[error("write to {path} failed: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One integer-valued sysfs node, identified by absolute path.
/// A value, not an owned resource: the kernel owns the file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControlNode {
    path: PathBuf,
}

impl ControlNode {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the node's trimmed content as a base-10 integer. Any failure
    /// (missing file, permission, non-numeric content) yields `None`;
    /// hwmon nodes can legitimately disappear at runtime.
    pub fn read_int(&self) -> Option<i64> {
        read_trimmed(&self.path).ok()?.parse().ok()
    }

    /// Overwrite the node's entire content with the decimal rendering of
    /// `value`. No retries; the caller surfaces failure to the operator.
    pub fn write_int(&self, value: i64) -> io::Result<()> {
        fs::write(&self.path, value.to_string())
    }
}

fn read_trimmed<P: AsRef<Path>>(p: P) -> io::Result<String> {
    let mut s = String::new();
    fs::File::open(p)?.read_to_string(&mut s)?;
    Ok(s.trim().to_string())
}

/// The pwmN_enable codes. Anything outside the known range reads as
/// `Off` for display purposes; restore writes back raw snapshot values,
/// so an exotic code survives a session untouched.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PwmMode {
    Off,
    Manual,
    Auto,
    AutoHw,
}

impl PwmMode {
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            1 => PwmMode::Manual,
            2 => PwmMode::Auto,
            3 => PwmMode::AutoHw,
            _ => PwmMode::Off,
        }
    }

    pub fn as_raw(self) -> i64 {
        match self {
            PwmMode::Off => 0,
            PwmMode::Manual => 1,
            PwmMode::Auto => 2,
            PwmMode::AutoHw => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PwmMode::Off => "OFF/unk",
            PwmMode::Manual => "MANUAL",
            PwmMode::Auto => "AUTO",
            PwmMode::AutoHw => "AUTO_HWP",
        }
    }
}

/// A logical fan/pump control unit: pwmN (duty), pwmN_enable (mode) and
/// fanN_input (tach, read-only, may be absent) under one chip directory.
#[derive(Debug, Clone)]
pub struct Channel {
    id: u32,
    duty: ControlNode,
    mode: ControlNode,
    tach: ControlNode,
}

impl Channel {
    pub fn new(dir: &Path, id: u32) -> Self {
        Self {
            id,
            duty: ControlNode::new(dir.join(format!("pwm{}", id))),
            mode: ControlNode::new(dir.join(format!("pwm{}_enable", id))),
            tach: ControlNode::new(dir.join(format!("fan{}_input", id))),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn duty_node(&self) -> &ControlNode {
        &self.duty
    }

    pub fn mode_node(&self) -> &ControlNode {
        &self.mode
    }

    pub fn duty(&self) -> Option<u8> {
        self.duty
            .read_int()
            .map(|v| v.clamp(DUTY_MIN, DUTY_MAX) as u8)
    }

    pub fn mode(&self) -> Option<PwmMode> {
        self.mode.read_int().map(PwmMode::from_raw)
    }

    pub fn tach(&self) -> Option<u64> {
        self.tach.read_int().and_then(|v| u64::try_from(v).ok())
    }

    /// Apply a signed step to the current duty. Reads the live value
    /// first (an absent duty counts as 0), clamps the result to 0..=255
    /// and issues the manual-then-duty write pair as one unit: writing
    /// pwmN alone does not switch the board out of auto control.
    pub fn set_duty_delta(&self, delta: i64, privileged: bool) -> Result<u8, ControlError> {
        let current = self.duty().map(i64::from).unwrap_or(0);
        let target = (current + delta).clamp(DUTY_MIN, DUTY_MAX);
        if !privileged {
            return Err(ControlError::NotPrivileged);
        }
        self.mode
            .write_int(PwmMode::Manual.as_raw())
            .map_err(|source| ControlError::Write {
                path: self.mode.path().to_path_buf(),
                source,
            })?;
        self.duty
            .write_int(target)
            .map_err(|source| ControlError::Write {
                path: self.duty.path().to_path_buf(),
                source,
            })?;
        logger::log_event(
            "pwm_write",
            json!({
                "channel": self.id,
                "previous": current,
                "written": target,
            }),
        );
        Ok(target as u8)
    }

    /// Flip between manual and firmware auto control. Manual switches to
    /// Auto; any other observed mode (including unreadable) switches to
    /// Manual, matching how a board in an unknown state is taken over.
    pub fn toggle_mode(&self, privileged: bool) -> Result<PwmMode, ControlError> {
        let next = match self.mode() {
            Some(PwmMode::Manual) => PwmMode::Auto,
            _ => PwmMode::Manual,
        };
        if !privileged {
            return Err(ControlError::NotPrivileged);
        }
        self.mode
            .write_int(next.as_raw())
            .map_err(|source| ControlError::Write {
                path: self.mode.path().to_path_buf(),
                source,
            })?;
        logger::log_event(
            "mode_toggle",
            json!({ "channel": self.id, "mode": next.as_raw() }),
        );
        Ok(next)
    }
}

/// The configured hwmon chip directory and its fixed, ordered channel
/// set. The directory is external mutable state shared with the kernel
/// and other processes; nothing here assumes exclusive ownership.
#[derive(Debug, Clone)]
pub struct Controller {
    dir: PathBuf,
    channels: Vec<Channel>,
}

impl Controller {
    pub fn new(dir: PathBuf, ids: &[u32]) -> Self {
        let channels = ids.iter().map(|&id| Channel::new(&dir, id)).collect();
        Self { dir, channels }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn exists(&self) -> bool {
        self.dir.is_dir()
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Chip name from the sysfs `name` node, e.g. "nct6798".
    pub fn chip_name(&self) -> Option<String> {
        read_trimmed(self.dir.join("name")).ok().filter(|s| !s.is_empty())
    }
}
