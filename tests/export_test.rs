use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};
use jmena::catalog::SetTag;
use jmena::{App, AppConfig, AppEvent, AppOptions};

mod common;

fn pump_until(app: &mut App, rx: &Receiver<AppEvent>, mut done: impl FnMut(&App) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !done(app) {
        assert!(Instant::now() < deadline, "timed out waiting for app state");
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => {
                let mut next = Some(event);
                while let Some(e) = next {
                    next = app.event(&e);
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(e) => panic!("event channel closed: {}", e),
        }
    }
}

#[test]
fn csv_export_writes_selected_series() {
    let data = common::data_root(&[("Jan", 500)], &[]);
    common::write_series(data.path(), SetTag::Simple, 0, "Jan", 500, &[(1950, 10)]);
    let export = tempfile::tempdir().expect("export dir");

    let (tx, rx) = mpsc::channel();
    let mut config = AppConfig::default();
    config.export.directory = Some(export.path().to_path_buf());
    let options = AppOptions::new(data.path().to_path_buf());
    let mut app = App::with_config(options, config, tx).expect("app");

    app.event(&AppEvent::LoadCatalogs);
    pump_until(&mut app, &rx, |app| app.catalog().ready());
    app.event(&AppEvent::Key(KeyEvent::from(KeyCode::Enter)));
    pump_until(&mut app, &rx, |app| app.series().len() == 1);

    app.event(&AppEvent::Key(KeyEvent::from(KeyCode::Char('d'))));
    let path = export.path().join("jmena.csv");
    assert!(app.notice().unwrap_or_default().contains("Uloženo"));
    let content = std::fs::read_to_string(&path).expect("export written");
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("Rok narození,Jan"));
    assert!(content.contains("1950,10"));
}

#[test]
fn export_without_resolved_series_reports_failure() {
    let data = common::data_root(&[("Jan", 500)], &[]);
    let (tx, _rx) = mpsc::channel();
    let options = AppOptions::new(PathBuf::from(data.path()));
    let mut app = App::with_config(options, AppConfig::default(), tx).expect("app");

    app.event(&AppEvent::Key(KeyEvent::from(KeyCode::Char('d'))));
    assert!(app.notice().unwrap_or_default().contains("nezdařil"));
}
