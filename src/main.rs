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

mod app;
mod config;
mod events;
mod handlers;
mod hwmon;
mod logger;
mod snapshot;
mod ui;

#[cfg(test)]
mod test_utils;

use std::io::stdout;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::Terminal;
use serde_json::json;

use app::App;
use events::handle_key_event;
use hwmon::Controller;
use snapshot::{RestoreGuard, Snapshot};
use ui::ui;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

fn main() -> anyhow::Result<()> {
    // Optional logging to /etc/fanctl/logs.json
    let args: Vec<String> = std::env::args().collect();
    let logging_enabled = args.iter().any(|a| a == "--logging");
    if logging_enabled {
        logger::init_logging();
        logger::log_event("startup", json!({ "args": args }));
    }

    let cfg = config::load_config();
    let privileged = unsafe { libc::geteuid() } == 0;
    let controller = Controller::new(cfg.hwmon_dir.clone(), &cfg.channels);

    // Capture before any mutation is possible. The guard restores when
    // it goes out of scope: normal quit, cancel, an error bubbling up,
    // and panic unwind all end here. A caught interrupt flips the
    // `running` flag and exits the loop onto the same path. Errors are
    // returned rather than exit()ed so the guard always runs.
    let snapshot = Snapshot::capture(&controller);
    let _guard = RestoreGuard::new(snapshot.clone());

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    // Terminal init
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;

    let mut session = App::new(controller, snapshot, privileged, cfg.refresh_interval());
    let res = run_app(&mut terminal, &mut session, &running);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        logger::log_event("fatal_error", json!({ "error": err.to_string() }));
        return Err(err);
    }
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    running: &AtomicBool,
) -> anyhow::Result<()> {
    app.refresh();

    loop {
        // draw only when something changed; the redraw flag is set by
        // every refresh
        if app.force_redraw {
            terminal.draw(|f| ui(f, app))?;
            app.force_redraw = false;
        }

        // short poll keeps the loop responsive to keys and to the
        // interrupt flag without spinning a core
        if event::poll(POLL_INTERVAL).unwrap_or(false) {
            if let Event::Key(key_event) = event::read()? {
                if handle_key_event(app, key_event)? {
                    return Ok(());
                }
                // any input: re-read all channels and redraw now
                app.refresh();
            }
        }

        if !running.load(Ordering::SeqCst) {
            logger::log_event("interrupted", json!({}));
            return Ok(());
        }

        // idle: re-read on the configured interval so values moved by
        // the board or other writers stay visible
        if app.idle_refresh_due() {
            app.refresh();
        }
    }
}
