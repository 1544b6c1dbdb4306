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

use std::time::{Duration, Instant};

use crate::hwmon::{Controller, PwmMode};
use crate::snapshot::Snapshot;

/// One refreshed line of telemetry for a channel. Values are a snapshot
/// in time; the kernel and the board may change them between ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRow {
    pub id: u32,
    pub duty: Option<u8>,
    pub mode: Option<PwmMode>,
    pub tach: Option<u64>,
}

pub struct App {
    pub controller: Controller,
    /// The original baseline captured before any mutation. The manual
    /// reset always restores from this, never from a re-snapshot.
    pub snapshot: Snapshot,
    pub privileged: bool,
    pub rows: Vec<ChannelRow>,
    pub selected: usize,
    pub status: String,
    pub chip_name: Option<String>,
    pub last_refresh: Instant,
    pub refresh_interval: Duration,
    pub force_redraw: bool,
}

impl App {
    pub fn new(
        controller: Controller,
        snapshot: Snapshot,
        privileged: bool,
        refresh_interval: Duration,
    ) -> Self {
        let chip_name = controller.chip_name();
        Self {
            controller,
            snapshot,
            privileged,
            rows: Vec::new(),
            selected: 0,
            status: String::new(),
            chip_name,
            last_refresh: Instant::now() - refresh_interval,
            refresh_interval,
            force_redraw: true,
        }
    }

    pub fn controller_missing(&self) -> bool {
        !self.controller.exists()
    }

    pub fn channel_count(&self) -> usize {
        self.controller.channels().len()
    }

    /// Selected channel id, for status messages.
    pub fn selected_id(&self) -> u32 {
        self.controller.channels()[self.selected].id()
    }

    /// Re-read duty, mode and tach for every channel. Values are never
    /// cached across ticks; this is the only place the render data is
    /// produced, so the draw step itself performs no hardware I/O.
    pub fn refresh(&mut self) {
        self.rows = self
            .controller
            .channels()
            .iter()
            .map(|ch| ChannelRow {
                id: ch.id(),
                duty: ch.duty(),
                mode: ch.mode(),
                tach: ch.tach(),
            })
            .collect();
        self.last_refresh = Instant::now();
        self.force_redraw = true;
    }

    pub fn idle_refresh_due(&self) -> bool {
        self.last_refresh.elapsed() >= self.refresh_interval
    }

    pub fn select_next(&mut self) {
        if self.channel_count() > 0 {
            self.selected = (self.selected + 1) % self.channel_count();
        }
    }

    pub fn select_prev(&mut self) {
        let n = self.channel_count();
        if n > 0 {
            self.selected = (self.selected + n - 1) % n;
        }
    }
}
