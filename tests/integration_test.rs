use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};
use jmena::catalog::{SelectionKey, SetTag};
use jmena::chart_data::bind_chart_series;
use jmena::{App, AppConfig, AppEvent, AppOptions, InputMode};

mod common;

fn app_for(root: PathBuf) -> (App, Receiver<AppEvent>) {
    let (tx, rx) = mpsc::channel();
    let app = App::with_config(AppOptions::new(root), AppConfig::default(), tx).expect("app");
    (app, rx)
}

fn press(app: &mut App, code: KeyCode) {
    let follow_up = app.event(&AppEvent::Key(KeyEvent::from(code)));
    assert!(follow_up.is_none() || matches!(follow_up, Some(AppEvent::Exit)));
}

/// Drain worker events into the app until the condition holds.
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

fn load_catalogs(app: &mut App, rx: &Receiver<AppEvent>) {
    app.event(&AppEvent::LoadCatalogs);
    pump_until(app, rx, |app| app.catalog().ready());
}

fn key(id: u32) -> SelectionKey {
    SelectionKey {
        id,
        set: SetTag::Simple,
    }
}

#[test]
fn starts_in_normal_mode_with_empty_state() {
    let dir = common::data_root(&[], &[]);
    let (app, _rx) = app_for(dir.path().to_path_buf());
    assert_eq!(app.mode(), InputMode::Normal);
    assert!(app.selection().is_empty());
    assert!(app.series().is_empty());
    assert!(!app.catalog().ready());
}

#[test]
fn full_workflow_select_and_chart() {
    let dir = common::data_root(&[("Jan", 500), ("Marie", 300)], &[]);
    common::write_series(dir.path(), SetTag::Simple, 0, "Jan", 500, &[(1950, 10), (2000, 40)]);
    common::write_series(dir.path(), SetTag::Simple, 1, "Marie", 300, &[(1960, 25)]);
    let (mut app, rx) = app_for(dir.path().to_path_buf());
    load_catalogs(&mut app, &rx);

    // View sorted by frequency: Jan first.
    assert_eq!(app.view()[0].display_name, "Jan");

    // Select Marie first, then Jan.
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Up);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.selection().entries(), &[key(1), key(0)]);

    pump_until(&mut app, &rx, |app| app.series().len() == 2);
    let bound = bind_chart_series(app.selection(), app.series());
    // Legend follows selection order, not completion order.
    assert_eq!(bound[0].name, "Marie");
    assert_eq!(bound[1].name, "Jan");
    assert!(bound.iter().all(|s| s.visible));
}

#[test]
fn deselecting_while_fetch_pending_discards_the_result() {
    let dir = common::data_root(&[("Jan", 500)], &[]);
    common::write_series(dir.path(), SetTag::Simple, 0, "Jan", 500, &[(1950, 10)]);
    let (mut app, rx) = app_for(dir.path().to_path_buf());
    load_catalogs(&mut app, &rx);

    // Select then immediately deselect, before draining the worker's reply.
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Enter);
    assert!(app.selection().is_empty());

    let event = rx.recv_timeout(Duration::from_secs(10)).expect("worker reply");
    assert!(matches!(event, AppEvent::SeriesLoaded(_)));
    app.event(&event);
    assert!(app.series().is_empty());

    // Re-selecting fetches again and the series lands this time.
    press(&mut app, KeyCode::Enter);
    pump_until(&mut app, &rx, |app| app.series().contains(key(0)));
}

#[test]
fn low_frequency_name_is_selectable_but_hidden() {
    let dir = common::data_root(&[("Zoe", 19)], &[]);
    common::write_series(dir.path(), SetTag::Simple, 0, "Zoe", 19, &[(2001, 19)]);
    let (mut app, rx) = app_for(dir.path().to_path_buf());
    load_catalogs(&mut app, &rx);

    press(&mut app, KeyCode::Enter);
    assert!(app.notice().is_some(), "advisory shown on first selection");
    pump_until(&mut app, &rx, |app| app.series().contains(key(0)));

    let bound = bind_chart_series(app.selection(), app.series());
    assert_eq!(bound.len(), 1);
    assert!(!bound[0].visible);
}

#[test]
fn missing_series_resource_stays_absent_and_is_not_refetched() {
    let dir = common::data_root(&[("Jan", 500)], &[]);
    // No series file for Jan.
    let (mut app, rx) = app_for(dir.path().to_path_buf());
    load_catalogs(&mut app, &rx);

    press(&mut app, KeyCode::Enter);
    assert!(app.series().in_flight(key(0)));
    pump_until(&mut app, &rx, |app| !app.series().in_flight(key(0)));
    assert!(app.series().is_empty());
    // The failed key stays out of future fetch plans while selected.
    assert!(app.series().reconcile(app.selection().entries()).is_empty());
}

#[test]
fn set_toggles_rebuild_view_and_drop_selection() {
    let dir = common::data_root(&[("Jan", 500)], &[("Anna Marie", 450)]);
    common::write_series(dir.path(), SetTag::Complex, 0, "Anna Marie", 450, &[(1990, 12)]);
    let (mut app, rx) = app_for(dir.path().to_path_buf());
    load_catalogs(&mut app, &rx);
    assert_eq!(app.view().len(), 1);

    press(&mut app, KeyCode::Char('2'));
    assert_eq!(app.view().len(), 2);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter);
    pump_until(&mut app, &rx, |app| app.series().len() == 1);

    press(&mut app, KeyCode::Char('2'));
    assert!(app.selection().is_empty());
    assert!(app.series().is_empty(), "evicted with its selection entry");
}
