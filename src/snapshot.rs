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

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::hwmon::{ControlNode, Controller};
use crate::logger;

/// The pre-session value of every node a session may mutate: the duty
/// and mode nodes of each configured channel, never the tach. Immutable
/// once captured; restore always writes these original values, not
/// anything derived from later session state.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    entries: BTreeMap<PathBuf, i64>,
}

impl Snapshot {
    /// Read duty and mode of every channel. A node that cannot be read
    /// is omitted: there is nothing to restore for it. A missing
    /// controller directory yields an empty snapshot.
    pub fn capture(controller: &Controller) -> Self {
        let mut entries = BTreeMap::new();
        if !controller.exists() {
            return Self { entries };
        }
        for ch in controller.channels() {
            for node in [ch.duty_node(), ch.mode_node()] {
                if let Some(val) = node.read_int() {
                    entries.insert(node.path().to_path_buf(), val);
                }
            }
        }
        logger::log_event("snapshot_capture", json!({ "nodes": entries.len() }));
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, path: &Path) -> Option<i64> {
        self.entries.get(path).copied()
    }

    /// Write every captured pair back, best effort: a board in a
    /// degraded state should get as much of its original configuration
    /// back as possible, so individual failures never stop the walk.
    /// Plain overwrites, so restoring twice equals restoring once.
    /// Returns the number of failed writes.
    pub fn restore(&self) -> usize {
        let mut failed = 0;
        for (path, val) in &self.entries {
            let node = ControlNode::new(path.clone());
            if let Err(e) = node.write_int(*val) {
                failed += 1;
                logger::log_event(
                    "restore_failed",
                    json!({ "path": path.display().to_string(), "value": val, "error": e.to_string() }),
                );
            }
        }
        logger::log_event(
            "restore",
            json!({ "nodes": self.entries.len(), "failed": failed }),
        );
        failed
    }
}

/// Ties the restore to scope exit. Runs on normal return, on an error
/// bubbling out of the event loop, and on panic unwind; the Ctrl-C
/// handler turns an interrupt into a loop exit so the same drop path
/// covers it. An un-trappable SIGKILL is the one path this cannot close.
#[derive(Debug)]
pub struct RestoreGuard {
    snapshot: Snapshot,
}

impl RestoreGuard {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }
}

impl Drop for RestoreGuard {
    fn drop(&mut self) {
        self.snapshot.restore();
    }
}
