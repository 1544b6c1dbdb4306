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

use crate::app::App;
use crate::hwmon::ControlError;

/// Step the selected channel's duty by `delta` (clamped to 0..=255).
/// The status message distinguishes a missing privilege from a failed
/// write so the operator knows whether retrying can help.
pub fn adjust_duty(app: &mut App, delta: i64) {
    let id = app.selected_id();
    let result = app.controller.channels()[app.selected].set_duty_delta(delta, app.privileged);
    match result {
        Ok(_) => app.status.clear(),
        Err(ControlError::NotPrivileged) => {
            app.status = "No root privileges: PWM changes are ignored.".to_string();
        }
        Err(ControlError::Write { .. }) => {
            app.status = format!("Failed to write pwm{} (permissions?)", id);
        }
    }
}

/// Toggle the selected channel between manual and firmware auto control.
pub fn toggle_mode(app: &mut App) {
    let id = app.selected_id();
    let result = app.controller.channels()[app.selected].toggle_mode(app.privileged);
    match result {
        Ok(_) => app.status.clear(),
        Err(ControlError::NotPrivileged) => {
            app.status = "No root privileges: mode changes are ignored.".to_string();
        }
        Err(ControlError::Write { .. }) => {
            app.status = format!("Failed to write pwm{}_enable (permissions?)", id);
        }
    }
}

/// Write the original baseline back and keep the session running. The
/// baseline is the startup snapshot; there is deliberately no way to
/// re-snapshot mid-session.
pub fn reset_to_baseline(app: &mut App) {
    if !app.privileged {
        app.status = "No root privileges: restore not possible.".to_string();
        return;
    }
    if app.snapshot.is_empty() {
        app.status = "Nothing to restore.".to_string();
        return;
    }
    let failed = app.snapshot.restore();
    if failed == 0 {
        app.status = "Original controller settings restored.".to_string();
    } else {
        app.status = format!("Restore incomplete: {} node(s) failed.", failed);
    }
}
