//! Single-line text input wrapping tui-textarea, with persistent history.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use tui_textarea::{CursorMove, Input, Key, TextArea};

use crate::cache::{add_to_history, CacheManager};
use crate::config::Theme;

/// Event emitted by the input after handling a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInputEvent {
    None,
    Changed,
    Submit,
    Cancel,
    /// Backspace pressed while the input was already empty.
    BackspaceOnEmpty,
}

pub struct TextInput {
    textarea: TextArea<'static>,
    value: String,
    history_id: Option<String>,
    history: Vec<String>,
    history_index: Option<usize>,
    history_temp: Option<String>,
    history_loaded: bool,
    text_color: Option<Color>,
    focused: bool,
}

impl TextInput {
    pub fn new() -> Self {
        let mut textarea = TextArea::default();
        textarea.set_cursor_line_style(Style::default());

        Self {
            textarea,
            value: String::new(),
            history_id: None,
            history: Vec::new(),
            history_index: None,
            history_temp: None,
            history_loaded: false,
            text_color: None,
            focused: false,
        }
    }

    pub fn with_theme(mut self, theme: &Theme) -> Self {
        self.text_color = Some(theme.get("text_primary"));
        self.apply_style();
        self
    }

    /// Enable persistent history under the given id
    pub fn with_history(mut self, history_id: impl Into<String>) -> Self {
        self.history_id = Some(history_id.into());
        self
    }

    fn apply_style(&mut self) {
        let mut style = Style::default();
        if let Some(color) = self.text_color {
            style = style.fg(color);
        }
        self.textarea.set_style(style);
        self.textarea.set_cursor_line_style(Style::default());
    }

    fn sync_from_textarea(&mut self) {
        self.value = self.textarea.lines().first().cloned().unwrap_or_default();
    }

    fn sync_to_textarea(&mut self) {
        let single_line = self.value.replace(['\n', '\r'], " ");
        self.textarea = TextArea::new(vec![single_line]);
        self.apply_style();
        let focused = self.focused;
        self.set_focused(focused);
        self.textarea.move_cursor(CursorMove::End);
    }

    /// Show or hide the cursor. An unfocused input renders its cursor with the
    /// text style, which hides it.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if focused {
            self.textarea
                .set_cursor_style(Style::default().add_modifier(Modifier::REVERSED));
        } else {
            let style = self.textarea.style();
            self.textarea.set_cursor_style(style);
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: String) {
        self.value = value;
        self.sync_to_textarea();
    }

    pub fn clear(&mut self) {
        self.textarea = TextArea::default();
        self.apply_style();
        let focused = self.focused;
        self.set_focused(focused);
        self.value.clear();
        self.history_index = None;
        self.history_temp = None;
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn load_history(&mut self, cache: &CacheManager) {
        if self.history_loaded {
            return;
        }
        if let Some(ref history_id) = self.history_id {
            if let Ok(history) = cache.load_history(history_id) {
                self.history = history;
            }
            self.history_loaded = true;
        }
    }

    /// Record the current value in history and persist it.
    pub fn save_to_history(&mut self, cache: &CacheManager) {
        if let Some(history_id) = self.history_id.clone() {
            if !self.value.is_empty() {
                add_to_history(&mut self.history, self.value.clone());
                if let Err(e) = cache.save_history(&history_id, &self.history) {
                    eprintln!("Warning: could not save search history: {}", e);
                }
            }
        }
    }

    fn navigate_history_up(&mut self, cache: Option<&CacheManager>) {
        if self.history_id.is_none() {
            return;
        }
        if !self.history_loaded {
            match cache {
                Some(cache) => self.load_history(cache),
                None => return,
            }
        }
        if self.history.is_empty() {
            return;
        }

        if self.history_index.is_none() {
            self.history_temp = Some(self.value.clone());
        }
        let new_index = match self.history_index {
            Some(i) if i > 0 => i - 1,
            Some(i) => i,
            None => self.history.len() - 1,
        };
        self.history_index = Some(new_index);
        if let Some(entry) = self.history.get(new_index).cloned() {
            self.value = entry;
            self.sync_to_textarea();
        }
    }

    fn navigate_history_down(&mut self) {
        let Some(current) = self.history_index else {
            return;
        };
        if current + 1 >= self.history.len() {
            if let Some(temp) = self.history_temp.take() {
                self.value = temp;
                self.sync_to_textarea();
            }
            self.history_index = None;
        } else {
            self.history_index = Some(current + 1);
            if let Some(entry) = self.history.get(current + 1).cloned() {
                self.value = entry;
                self.sync_to_textarea();
            }
        }
    }

    /// Handle a key event, reporting whether the value changed
    pub fn handle_key(&mut self, event: &KeyEvent, cache: Option<&CacheManager>) -> TextInputEvent {
        match event.code {
            KeyCode::Enter => {
                if let Some(cache) = cache {
                    self.save_to_history(cache);
                }
                return TextInputEvent::Submit;
            }
            KeyCode::Esc => return TextInputEvent::Cancel,
            KeyCode::Backspace if self.value.is_empty() => {
                return TextInputEvent::BackspaceOnEmpty;
            }
            KeyCode::Up if self.history_id.is_some() => {
                self.navigate_history_up(cache);
                return TextInputEvent::Changed;
            }
            KeyCode::Down if self.history_id.is_some() => {
                self.navigate_history_down();
                return TextInputEvent::Changed;
            }
            _ => {}
        }

        let input = key_event_to_input(event);
        if matches!(input.key, Key::Char('\n') | Key::Char('\r')) {
            return TextInputEvent::None;
        }
        let before = self.value.clone();
        self.textarea.input(input);
        self.sync_from_textarea();
        if self.history_index.is_some() {
            self.history_index = None;
            self.history_temp = None;
        }
        if self.value != before {
            TextInputEvent::Changed
        } else {
            TextInputEvent::None
        }
    }
}

fn key_event_to_input(event: &KeyEvent) -> Input {
    let key = match event.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Enter => Key::Enter,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Delete => Key::Delete,
        KeyCode::Tab => Key::Tab,
        KeyCode::Esc => Key::Esc,
        _ => Key::Null,
    };
    Input {
        key,
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
        alt: event.modifiers.contains(KeyModifiers::ALT),
        shift: event.modifiers.contains(KeyModifiers::SHIFT),
    }
}

impl Default for TextInput {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for &TextInput {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        self.textarea.render(area, buf);
        // tui-textarea underlines the cursor line; strip that for a one-line box.
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                let cell = &mut buf[(x, y)];
                let style = cell.style().remove_modifier(Modifier::UNDERLINED);
                cell.set_style(style);
            }
        }
    }
}
