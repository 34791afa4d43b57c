//! jmena: browse Czech first-name frequency statistics (1900–2023) in the terminal.
//!
//! The application is driven by a single event loop over [`AppEvent`]. Input
//! and resize events come from the terminal; catalog and series fetches run on
//! worker threads that report back through the same channel, so all state is
//! mutated in one place.

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

pub mod cache;
pub mod catalog;
pub mod chart_data;
pub mod chart_export;
pub mod cli;
pub mod config;
pub mod embed;
pub mod filter;
pub mod picker;
pub mod selection;
pub mod series;
pub mod source;
pub mod widgets;

pub use cache::CacheManager;
pub use config::{AppConfig, ConfigManager, Theme};

use catalog::{NameCatalog, NameRecord, SelectionKey, SetTag};
use chart_data::{all_series_settled, bind_chart_series, VISIBILITY_FLOOR};
use chart_export::EXPORT_STEM;
use embed::{HeightReporter, REPOST_DELAYS_MS};
use picker::PickerState;
use selection::{SelectionStore, ToggleOutcome};
use series::{parse_series_json, NameSeries, SeriesCache};
use source::{data_source, DataSource};
use widgets::chart::ChartWidget;
use widgets::controls::ControlsBar;
use widgets::picker::PickerWidget;
use widgets::text_input::{TextInput, TextInputEvent};

pub const APP_NAME: &str = "jmena";

/// Delay before the single series-fetch retry.
const FETCH_RETRY_DELAY: Duration = Duration::from_millis(250);

/// Events processed by the application event loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Start loading both candidate lists on worker threads.
    LoadCatalogs,
    CatalogLoaded(SetTag, Vec<NameRecord>),
    CatalogFailed(SetTag, String),
    SeriesLoaded(Box<NameSeries>),
    SeriesFailed(SelectionKey, String),
    /// Start a height report cycle once the first layout has settled.
    ReportHeight,
    /// Scheduled re-post of the rendered height (host embedding).
    PostHeight,
    Exit,
    Crash(String),
}

/// Which pane owns keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Searching,
}

/// Startup options resolved from CLI arguments and config.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    pub data_root: PathBuf,
    pub max_badges: Option<usize>,
    pub embed_sink: Option<PathBuf>,
    pub embed_id: Option<String>,
    pub debug: bool,
}

impl AppOptions {
    pub fn new(data_root: PathBuf) -> Self {
        Self {
            data_root,
            ..Self::default()
        }
    }

    pub fn with_max_badges(mut self, max_badges: Option<usize>) -> Self {
        self.max_badges = max_badges;
        self
    }

    pub fn with_embed(mut self, sink: Option<PathBuf>, id: Option<String>) -> Self {
        self.embed_sink = sink;
        self.embed_id = id;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

pub struct App {
    sender: Sender<AppEvent>,
    source: DataSource,
    config: AppConfig,
    theme: Theme,
    cache: Option<CacheManager>,
    catalog: NameCatalog,
    /// Merged, frequency-sorted candidate view; rebuilt on catalog or toggle
    /// changes, never on keystrokes.
    view: Vec<NameRecord>,
    selection: SelectionStore,
    series: SeriesCache,
    picker: PickerState,
    mode: InputMode,
    notice: Option<String>,
    show_help: bool,
    max_badges: usize,
    embed: Option<HeightReporter>,
    height_requested: bool,
    last_height: u16,
    debug: bool,
    events_seen: u64,
    fetches_started: u64,
}

impl App {
    pub fn new(options: AppOptions, sender: Sender<AppEvent>) -> Result<Self> {
        let config = AppConfig::load(APP_NAME)?;
        Self::with_config(options, config, sender)
    }

    /// Construct with an explicit config, bypassing the user config file.
    pub fn with_config(
        options: AppOptions,
        config: AppConfig,
        sender: Sender<AppEvent>,
    ) -> Result<Self> {
        let theme = Theme::from_config(&config.theme)?;
        let cache = CacheManager::new(APP_NAME).ok();
        // The configured root only applies when no explicit root was given.
        let root = if options.data_root.as_os_str() == "." {
            config
                .data
                .root
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or_else(|| options.data_root.clone())
        } else {
            options.data_root.clone()
        };
        let source = data_source(&root);

        let mut search = TextInput::new().with_theme(&theme).with_history("search");
        if let Some(cache) = &cache {
            search.load_history(cache);
        }

        let max_badges = options.max_badges.unwrap_or(config.display.max_badges);
        let embed = options
            .embed_sink
            .clone()
            .or_else(|| config.embed.height_sink.clone())
            .map(|sink| {
                let id = options
                    .embed_id
                    .clone()
                    .or_else(|| config.embed.id.clone())
                    .unwrap_or_else(|| APP_NAME.to_string());
                HeightReporter::new(id, sink)
            });

        Ok(Self {
            sender,
            source,
            config,
            theme,
            cache,
            catalog: NameCatalog::new(),
            view: Vec::new(),
            selection: SelectionStore::new(),
            series: SeriesCache::new(),
            picker: PickerState::new(search),
            mode: InputMode::Normal,
            notice: None,
            show_help: false,
            max_badges,
            embed,
            height_requested: false,
            last_height: 0,
            debug: options.debug,
            events_seen: 0,
            fetches_started: 0,
        })
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn series(&self) -> &SeriesCache {
        &self.series
    }

    pub fn catalog(&self) -> &NameCatalog {
        &self.catalog
    }

    pub fn view(&self) -> &[NameRecord] {
        &self.view
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// How long the terminal event poll blocks each loop iteration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.config.performance.event_poll_interval_ms)
    }

    /// Process one event. The returned event, if any, is fed back into the
    /// loop (staged work, so the UI renders between steps).
    pub fn event(&mut self, event: &AppEvent) -> Option<AppEvent> {
        self.events_seen += 1;
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Resize(_, rows) => {
                self.last_height = *rows;
                self.report_height();
                None
            }
            AppEvent::LoadCatalogs => {
                self.spawn_catalog_loads();
                None
            }
            AppEvent::CatalogLoaded(set, records) => {
                self.catalog.install(*set, records.clone());
                self.rebuild_view();
                None
            }
            AppEvent::CatalogFailed(set, error) => {
                self.catalog.mark_failed(*set, error.clone());
                if self.debug {
                    eprintln!("catalog {} failed: {}", set.catalog_resource(), error);
                }
                self.notice = Some(format!("Seznam jmen se nepodařilo načíst: {}", error));
                None
            }
            AppEvent::SeriesLoaded(series) => {
                self.series
                    .insert_if_selected((**series).clone(), self.selection.entries());
                None
            }
            AppEvent::SeriesFailed(key, error) => {
                // Non-fatal: the series simply never appears. The name can be
                // deselected and re-selected to retry.
                self.series.mark_failed(*key);
                if self.debug {
                    eprintln!("series {} failed: {}", DataSource::series_resource(*key), error);
                }
                None
            }
            AppEvent::ReportHeight => {
                self.report_height();
                None
            }
            AppEvent::PostHeight => {
                if let Some(reporter) = &self.embed {
                    if let Err(e) = reporter.post(self.last_height) {
                        if self.debug {
                            eprintln!("height report failed: {}", e);
                        }
                    }
                }
                None
            }
            AppEvent::Exit | AppEvent::Crash(_) => None,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Option<AppEvent> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(AppEvent::Exit);
        }
        if self.show_help {
            self.show_help = false;
            return None;
        }
        match self.mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Searching => self.handle_search_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: &KeyEvent) -> Option<AppEvent> {
        match key.code {
            KeyCode::Char('q') => return Some(AppEvent::Exit),
            KeyCode::Char('?') | KeyCode::F(1) => self.show_help = true,
            KeyCode::Char('/') => {
                self.mode = InputMode::Searching;
                self.picker.search.set_focused(true);
            }
            KeyCode::Char('1') => self.toggle_set(SetTag::Simple),
            KeyCode::Char('2') => self.toggle_set(SetTag::Complex),
            KeyCode::Up => self.picker.move_up(1),
            KeyCode::Down => self.picker.move_down(1),
            KeyCode::PageUp => self.picker.page_up(),
            KeyCode::PageDown => self.picker.page_down(),
            KeyCode::Home => self.picker.move_home(),
            KeyCode::End => self.picker.move_end(),
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_at_cursor(),
            KeyCode::Backspace => self.pop_last_selected(),
            KeyCode::Char('c') => {
                self.selection.clear();
                self.sync_series();
            }
            KeyCode::Char('x') => {
                self.selection.trim_to(self.max_badges);
                self.sync_series();
            }
            KeyCode::Char('e') => self.export_png(),
            KeyCode::Char('d') => self.export_csv(),
            KeyCode::Esc => self.notice = None,
            _ => {}
        }
        None
    }

    fn handle_search_key(&mut self, key: &KeyEvent) -> Option<AppEvent> {
        // List navigation stays available while typing; plain Up/Down moves
        // the cursor, Ctrl+Up/Down walks the search history.
        if !key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Up => {
                    self.picker.move_up(1);
                    return None;
                }
                KeyCode::Down => {
                    self.picker.move_down(1);
                    return None;
                }
                KeyCode::PageUp => {
                    self.picker.page_up();
                    return None;
                }
                KeyCode::PageDown => {
                    self.picker.page_down();
                    return None;
                }
                _ => {}
            }
        }

        match self.picker.search.handle_key(key, self.cache.as_ref()) {
            TextInputEvent::Submit => self.toggle_at_cursor(),
            TextInputEvent::Cancel => {
                self.mode = InputMode::Normal;
                self.picker.search.set_focused(false);
            }
            TextInputEvent::BackspaceOnEmpty => self.pop_last_selected(),
            TextInputEvent::Changed => {
                let view = std::mem::take(&mut self.view);
                self.picker.refilter(&view);
                self.view = view;
            }
            TextInputEvent::None => {}
        }
        None
    }

    /// Flip a candidate set on or off. Turning a set off removes its entries
    /// from the selection first, so cache reconciliation evicts their series.
    fn toggle_set(&mut self, set: SetTag) {
        let show = !self.catalog.show(set);
        self.catalog.set_show(set, show);
        if !show {
            self.selection.remove_set(set);
        }
        self.rebuild_view();
        self.sync_series();
    }

    fn toggle_at_cursor(&mut self) {
        let Some(view_idx) = self.picker.selected_view_index() else {
            return;
        };
        let record = self.view[view_idx].clone();
        let key = record.key();
        if self.selection.toggle(key) == ToggleOutcome::Added
            && record.frequency < VISIBILITY_FLOOR
            && self.selection.first_advisory(key)
        {
            self.notice = Some(format!(
                "Jméno {} má méně než 20 výskytů, křivka se nezobrazí",
                record.display_name
            ));
        }
        self.sync_series();
    }

    fn pop_last_selected(&mut self) {
        if self.selection.pop_last().is_some() {
            self.sync_series();
        }
    }

    fn rebuild_view(&mut self) {
        self.view = self.catalog.merged_view();
        let view = std::mem::take(&mut self.view);
        self.picker.refilter(&view);
        self.view = view;
    }

    /// Reconcile the series cache against the selection: evict deselected
    /// entries and start a worker fetch per missing one.
    fn sync_series(&mut self) {
        let plan = self.series.reconcile(self.selection.entries());
        self.series.apply_evictions(&plan, self.selection.entries());
        for key in plan.to_fetch {
            self.series.mark_in_flight(key);
            self.fetches_started += 1;
            let source = self.source.clone();
            let sender = self.sender.clone();
            std::thread::spawn(move || {
                let event = match fetch_series_with_retry(&source, key) {
                    Ok(series) => AppEvent::SeriesLoaded(Box::new(series)),
                    Err(e) => AppEvent::SeriesFailed(key, e.to_string()),
                };
                let _ = sender.send(event);
            });
        }
    }

    fn spawn_catalog_loads(&self) {
        for set in SetTag::ALL {
            let source = self.source.clone();
            let sender = self.sender.clone();
            std::thread::spawn(move || {
                let event = match fetch_catalog(&source, set) {
                    Ok(records) => AppEvent::CatalogLoaded(set, records),
                    Err(e) => AppEvent::CatalogFailed(set, e.to_string()),
                };
                let _ = sender.send(event);
            });
        }
    }

    /// Post the current height and schedule the re-posts, debounced so resize
    /// bursts produce one cycle.
    fn report_height(&mut self) {
        let Some(reporter) = &mut self.embed else {
            return;
        };
        if !reporter.start_cycle() {
            return;
        }
        let _ = reporter.post(self.last_height);
        let sender = self.sender.clone();
        std::thread::spawn(move || {
            let mut elapsed = 0u64;
            for delay in REPOST_DELAYS_MS {
                std::thread::sleep(Duration::from_millis(delay - elapsed));
                elapsed = delay;
                if sender.send(AppEvent::PostHeight).is_err() {
                    break;
                }
            }
        });
    }

    fn export_dir(&self) -> PathBuf {
        self.config
            .export
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn export_png(&mut self) {
        let bound = bind_chart_series(&self.selection, &self.series);
        let path = self.export_dir().join(format!("{}.png", EXPORT_STEM));
        match chart_export::write_chart_png(&path, &bound) {
            Ok(()) => self.notice = Some(format!("Uloženo: {}", path.display())),
            Err(e) => self.notice = Some(format!("Export se nezdařil: {}", e)),
        }
    }

    fn export_csv(&mut self) {
        let bound = bind_chart_series(&self.selection, &self.series);
        let path = self.export_dir().join(format!("{}.csv", EXPORT_STEM));
        match chart_export::write_chart_csv(&path, &bound) {
            Ok(()) => self.notice = Some(format!("Uloženo: {}", path.display())),
            Err(e) => self.notice = Some(format!("Export se nezdařil: {}", e)),
        }
    }

    fn render_help(&self, area: Rect, buf: &mut Buffer) {
        let mut lines = vec![
            Line::from("/        hledat jméno"),
            Line::from("↑/↓      pohyb v seznamu"),
            Line::from("Enter    vybrat / zrušit jméno"),
            Line::from("Backspace  odebrat poslední vybrané"),
        ];
        for (n, set) in SetTag::ALL.iter().enumerate() {
            lines.push(Line::from(format!("{}        {}", n + 1, set.label())));
        }
        lines.extend([
            Line::from("c        zrušit výběr"),
            Line::from("x        ponechat jen viditelné štítky"),
            Line::from("e / d    export PNG / CSV"),
            Line::from("q        konec"),
        ]);
        let width = u16::min(44, area.width);
        let height = (lines.len() as u16 + 2).min(area.height);
        let popup = Rect {
            x: area.x + (area.width.saturating_sub(width)) / 2,
            y: area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        };
        Clear.render(popup, buf);
        Paragraph::new(lines)
            .block(
                Block::default()
                    .title("Nápověda")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.get("panel_border_active"))),
            )
            .style(Style::default().fg(self.theme.get("text_primary")))
            .render(popup, buf);
    }
}

fn fetch_catalog(source: &DataSource, set: SetTag) -> Result<Vec<NameRecord>> {
    let text = source.fetch_catalog(set)?;
    catalog::parse_catalog_tsv(&text, set)
}

fn fetch_series_once(source: &DataSource, key: SelectionKey) -> Result<NameSeries> {
    let text = source.fetch_series(key)?;
    parse_series_json(key, &text)
}

/// Fetch a series with a single delayed retry. Failures after the retry are
/// reported and the key is skipped until it is re-selected.
fn fetch_series_with_retry(source: &DataSource, key: SelectionKey) -> Result<NameSeries> {
    match fetch_series_once(source, key) {
        Ok(series) => Ok(series),
        Err(_) => {
            std::thread::sleep(FETCH_RETRY_DELAY);
            fetch_series_once(source, key)
        }
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.last_height = area.height;
        // The host needs the height even when the terminal never resizes, so
        // the first frame kicks off one report cycle.
        if self.embed.is_some() && !self.height_requested {
            self.height_requested = true;
            let _ = self.sender.send(AppEvent::ReportHeight);
        }

        let constraints = if self.notice.is_some() {
            vec![
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
        } else {
            vec![Constraint::Min(3), Constraint::Length(1)]
        };
        let rows = Layout::vertical(constraints).split(area);
        let body = rows[0];
        let controls_area = rows[rows.len() - 1];

        let [picker_area, chart_area] =
            Layout::horizontal([Constraint::Length(40), Constraint::Min(20)]).areas(body);

        let bound = bind_chart_series(&self.selection, &self.series);
        let loading = !all_series_settled(&self.selection, &self.series);

        let view = std::mem::take(&mut self.view);
        let mut picker = PickerWidget {
            state: &mut self.picker,
            view: &view,
            catalog: &self.catalog,
            selection: &self.selection,
            theme: &self.theme,
            max_badges: self.max_badges,
            focused: self.mode == InputMode::Searching,
        };
        (&mut picker).render(picker_area, buf);
        self.view = view;

        let chart = ChartWidget {
            series: &bound,
            theme: &self.theme,
            selection_empty: self.selection.is_empty(),
            loading,
            legend: self.config.display.legend,
        };
        (&chart).render(chart_area, buf);

        if self.notice.is_some() {
            let notice_area = rows[1];
            if let Some(notice) = &self.notice {
                Paragraph::new(notice.as_str())
                    .style(
                        Style::default()
                            .fg(self.theme.get("warning"))
                            .add_modifier(Modifier::BOLD),
                    )
                    .render(notice_area, buf);
            }
        }

        let debug_status = self
            .debug
            .then(|| format!("ev {} fetch {}", self.events_seen, self.fetches_started));
        let controls = ControlsBar {
            catalog: &self.catalog,
            theme: &self.theme,
            selection_count: self.selection.len(),
            searching: self.mode == InputMode::Searching,
            debug_status,
        };
        (&controls).render(controls_area, buf);

        if self.show_help {
            self.render_help(body, buf);
        }
    }
}
