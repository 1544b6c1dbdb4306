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

use crossterm::event::{KeyCode, KeyEvent};

use crate::app::App;
use crate::handlers;

pub const FINE_STEP: i64 = 8;
pub const COARSE_STEP: i64 = 32;

/// Apply one key to the session. Returns Ok(true) when the session
/// should terminate; the restore guard in main runs on that path.
pub fn handle_key_event(app: &mut App, key_event: KeyEvent) -> anyhow::Result<bool> {
    let KeyEvent { code, .. } = key_event;

    // Degraded start: the controller directory was never there. Only
    // quit keys are accepted and nothing is ever written.
    if app.controller_missing() {
        return Ok(matches!(
            code,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
        ));
    }

    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
        KeyCode::Esc => {
            // Cancel: put the board back immediately, then leave. The
            // guard repeats the restore on the way out; plain
            // overwrites make that a no-op.
            if app.privileged && !app.snapshot.is_empty() {
                app.snapshot.restore();
            }
            return Ok(true);
        }
        KeyCode::Tab | KeyCode::Down => app.select_next(),
        KeyCode::BackTab | KeyCode::Up => app.select_prev(),
        KeyCode::Left | KeyCode::Char('-') => handlers::adjust_duty(app, -FINE_STEP),
        KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => {
            handlers::adjust_duty(app, FINE_STEP)
        }
        KeyCode::PageDown => handlers::adjust_duty(app, -COARSE_STEP),
        KeyCode::PageUp => handlers::adjust_duty(app, COARSE_STEP),
        KeyCode::Char('a') | KeyCode::Char('A') => handlers::toggle_mode(app),
        KeyCode::Char('r') | KeyCode::Char('R') => handlers::reset_to_baseline(app),
        _ => {}
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::{key, read_node, test_app, test_app_missing, FakeChip};

    #[test]
    fn test_quit_keys_terminate() {
        let chip = FakeChip::new(&[(1, Some(120), Some(2), None)]);
        let mut app = test_app(&chip, true);
        assert!(handle_key_event(&mut app, key(KeyCode::Char('q'))).unwrap());
        assert!(handle_key_event(&mut app, key(KeyCode::Char('Q'))).unwrap());
    }

    #[test]
    fn test_cancel_restores_before_terminating() {
        let chip = FakeChip::new(&[(1, Some(120), Some(2), None)]);
        let mut app = test_app(&chip, true);
        handle_key_event(&mut app, key(KeyCode::Right)).unwrap();
        assert_eq!(read_node(chip.dir(), "pwm1"), Some(128));

        assert!(handle_key_event(&mut app, key(KeyCode::Esc)).unwrap());
        assert_eq!(read_node(chip.dir(), "pwm1"), Some(120));
        assert_eq!(read_node(chip.dir(), "pwm1_enable"), Some(2));
    }

    #[test]
    fn test_selection_keys() {
        let chip = FakeChip::new(&[
            (1, Some(0), Some(2), None),
            (2, Some(0), Some(2), None),
            (5, Some(0), Some(2), None),
        ]);
        let mut app = test_app(&chip, true);
        handle_key_event(&mut app, key(KeyCode::Tab)).unwrap();
        assert_eq!(app.selected_id(), 2);
        handle_key_event(&mut app, key(KeyCode::Down)).unwrap();
        assert_eq!(app.selected_id(), 5);
        handle_key_event(&mut app, key(KeyCode::Tab)).unwrap();
        assert_eq!(app.selected_id(), 1);
        handle_key_event(&mut app, key(KeyCode::BackTab)).unwrap();
        assert_eq!(app.selected_id(), 5);
        handle_key_event(&mut app, key(KeyCode::Up)).unwrap();
        assert_eq!(app.selected_id(), 2);
    }

    #[test]
    fn test_fine_and_coarse_steps() {
        let chip = FakeChip::new(&[(1, Some(100), Some(2), None)]);
        let mut app = test_app(&chip, true);
        handle_key_event(&mut app, key(KeyCode::Right)).unwrap();
        assert_eq!(read_node(chip.dir(), "pwm1"), Some(108));
        handle_key_event(&mut app, key(KeyCode::Char('-'))).unwrap();
        assert_eq!(read_node(chip.dir(), "pwm1"), Some(100));
        handle_key_event(&mut app, key(KeyCode::PageUp)).unwrap();
        assert_eq!(read_node(chip.dir(), "pwm1"), Some(132));
        handle_key_event(&mut app, key(KeyCode::PageDown)).unwrap();
        assert_eq!(read_node(chip.dir(), "pwm1"), Some(100));
    }

    #[test]
    fn test_toggle_and_reset_keys() {
        let chip = FakeChip::new(&[(1, Some(120), Some(2), None)]);
        let mut app = test_app(&chip, true);
        handle_key_event(&mut app, key(KeyCode::Char('a'))).unwrap();
        assert_eq!(read_node(chip.dir(), "pwm1_enable"), Some(1));
        let quit = handle_key_event(&mut app, key(KeyCode::Char('r'))).unwrap();
        assert!(!quit, "manual reset keeps the session running");
        assert_eq!(read_node(chip.dir(), "pwm1_enable"), Some(2));
        assert_eq!(read_node(chip.dir(), "pwm1"), Some(120));
    }

    #[test]
    fn test_unmapped_key_is_ignored() {
        let chip = FakeChip::new(&[(1, Some(120), Some(2), None)]);
        let mut app = test_app(&chip, true);
        assert!(!handle_key_event(&mut app, key(KeyCode::Char('x'))).unwrap());
        assert_eq!(read_node(chip.dir(), "pwm1"), Some(120));
    }

    #[test]
    fn test_missing_controller_accepts_only_quit() {
        let mut app = test_app_missing(true);
        assert!(!handle_key_event(&mut app, key(KeyCode::Right)).unwrap());
        assert!(!handle_key_event(&mut app, key(KeyCode::Char('a'))).unwrap());
        assert!(!handle_key_event(&mut app, key(KeyCode::Char('r'))).unwrap());
        assert!(handle_key_event(&mut app, key(KeyCode::Char('q'))).unwrap());
        assert!(handle_key_event(&mut app, key(KeyCode::Esc)).unwrap());
    }
}
