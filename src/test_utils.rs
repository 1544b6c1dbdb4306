/*
 * Test utilities and mock helpers for Fanctl
 *
 * This module provides a fake hwmon chip directory backed by a tempdir
 * plus small helpers shared across the unit test modules.
 */

#[cfg(test)]
pub mod test_utils {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tempfile::TempDir;

    use crate::app::App;
    use crate::hwmon::Controller;
    use crate::snapshot::Snapshot;

    /// A fake chip directory. Specs are `(id, duty, mode, tach)`; a
    /// `None` leaves the corresponding node file absent, mimicking
    /// hardware that does not expose it.
    pub struct FakeChip {
        tmp: TempDir,
        controller: Controller,
    }

    impl FakeChip {
        pub fn new(specs: &[(u32, Option<i64>, Option<i64>, Option<i64>)]) -> Self {
            let tmp = TempDir::new().unwrap();
            fs::write(tmp.path().join("name"), "nct6798\n").unwrap();
            for &(id, duty, mode, tach) in specs {
                if let Some(v) = duty {
                    fs::write(tmp.path().join(format!("pwm{}", id)), v.to_string()).unwrap();
                }
                if let Some(v) = mode {
                    fs::write(tmp.path().join(format!("pwm{}_enable", id)), v.to_string())
                        .unwrap();
                }
                if let Some(v) = tach {
                    fs::write(tmp.path().join(format!("fan{}_input", id)), v.to_string())
                        .unwrap();
                }
            }
            let ids: Vec<u32> = specs.iter().map(|s| s.0).collect();
            let controller = Controller::new(tmp.path().to_path_buf(), &ids);
            Self { tmp, controller }
        }

        pub fn dir(&self) -> &Path {
            self.tmp.path()
        }

        pub fn controller(&self) -> &Controller {
            &self.controller
        }
    }

    pub fn write_node(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    pub fn read_node(dir: &Path, name: &str) -> Option<i64> {
        fs::read_to_string(dir.join(name))
            .ok()?
            .trim()
            .parse()
            .ok()
    }

    /// Replace a node with a directory so both reads and writes fail,
    /// regardless of the uid the tests run under.
    pub fn break_node(dir: &Path, name: &str) {
        let p = dir.join(name);
        let _ = fs::remove_file(&p);
        fs::create_dir(&p).unwrap();
    }

    pub fn test_app(chip: &FakeChip, privileged: bool) -> App {
        let snapshot = Snapshot::capture(chip.controller());
        App::new(
            chip.controller().clone(),
            snapshot,
            privileged,
            Duration::from_millis(300),
        )
    }

    pub fn test_app_missing(privileged: bool) -> App {
        let controller = Controller::new(PathBuf::from("/nonexistent/fanctl"), &[1, 2, 5]);
        let snapshot = Snapshot::capture(&controller);
        App::new(controller, snapshot, privileged, Duration::from_millis(300))
    }

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }
}
