use std::{cell::Cell, rc::Rc};

use color_eyre::Result;
use contact_form::SelectOption;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Margin, Position, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph},
};
use tracing::debug;

use crate::{
    action::Action,
    components::Component,
    listeners::{ClickListeners, ListenerGuard},
    tui::{EventResponse, Frame},
};

/// Dropdown replacement for a select field.
///
/// Emits nothing by itself. A chosen option is parked until the owner picks
/// it up with [`CustomSelect::take_choice`].
///
/// Navigation:
/// - Enter/Space/Down: open
/// - Up/Down: move highlight while open
/// - Enter/Space: choose highlighted option
/// - Esc or a click outside: close
pub struct CustomSelect {
    title: String,
    options: Vec<SelectOption>,
    active_id: i64,
    highlighted: usize,
    scroll: usize,
    expanded: Rc<Cell<bool>>,
    // Header plus open list, read by the outside-click listener.
    area: Rc<Cell<Rect>>,
    header_area: Rect,
    list_area: Option<Rect>,
    border_style: Style,
    chosen: Option<SelectOption>,
    guard: Option<ListenerGuard>,
}

impl CustomSelect {
    pub fn new(title: impl Into<String>, options: Vec<SelectOption>, active_id: i64) -> Self {
        let highlighted = options
            .iter()
            .position(|o| o.selection_id == active_id)
            .unwrap_or(0);
        Self {
            title: title.into(),
            options,
            active_id,
            highlighted,
            scroll: 0,
            expanded: Rc::new(Cell::new(false)),
            area: Rc::new(Cell::new(Rect::default())),
            header_area: Rect::default(),
            list_area: None,
            border_style: Style::default(),
            chosen: None,
            guard: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.expanded.get()
    }

    pub fn is_mounted(&self) -> bool {
        self.guard.is_some()
    }

    pub fn active_id(&self) -> i64 {
        self.active_id
    }

    pub fn highlighted(&self) -> Option<&SelectOption> {
        self.options.get(self.highlighted)
    }

    pub fn set_active(&mut self, selection_id: i64) {
        self.active_id = selection_id;
        if !self.is_open() {
            if let Some(index) = self.active_index() {
                self.highlighted = index;
            }
        }
    }

    pub fn set_border_style(&mut self, style: Style) {
        self.border_style = style;
    }

    pub fn open(&mut self) {
        self.highlighted = self.active_index().unwrap_or(0);
        self.expanded.set(true);
    }

    pub fn close(&mut self) {
        self.expanded.set(false);
    }

    pub fn toggle(&mut self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn take_choice(&mut self) -> Option<SelectOption> {
        self.chosen.take()
    }

    fn active_index(&self) -> Option<usize> {
        self.options
            .iter()
            .position(|o| o.selection_id == self.active_id)
    }

    fn active_label(&self) -> &str {
        self.active_index()
            .and_then(|i| self.options.get(i))
            .map(|o| o.label.as_str())
            .unwrap_or_default()
    }

    fn move_highlight(&mut self, forward: bool) {
        if self.options.is_empty() {
            return;
        }
        let len = self.options.len();
        self.highlighted = if forward {
            (self.highlighted + 1) % len
        } else {
            (self.highlighted + len - 1) % len
        };
    }

    fn choose(&mut self, index: usize) {
        if let Some(option) = self.options.get(index) {
            debug!(
                selection_id = option.selection_id,
                title = %self.title,
                "option chosen"
            );
            self.active_id = option.selection_id;
            self.highlighted = index;
            self.chosen = Some(option.clone());
        }
        self.close();
    }

    fn ensure_visible(&mut self, rows: usize) {
        let rows = rows.max(1);
        if self.highlighted < self.scroll {
            self.scroll = self.highlighted;
        } else if self.highlighted >= self.scroll + rows {
            self.scroll = self.highlighted + 1 - rows;
        }
    }
}

impl Component for CustomSelect {
    fn mount(&mut self, listeners: &ClickListeners) {
        let expanded = Rc::clone(&self.expanded);
        let area = Rc::clone(&self.area);
        self.guard = Some(listeners.register(move |mouse: &MouseEvent| {
            if !expanded.get() || !matches!(mouse.kind, MouseEventKind::Down(_)) {
                return;
            }
            if !area.get().contains(Position::new(mouse.column, mouse.row)) {
                expanded.set(false);
            }
        }));
    }

    fn unmount(&mut self) {
        self.guard = None;
        self.close();
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        let consumed = match (key.code, self.is_open()) {
            (KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Down, false) => {
                self.open();
                true
            }
            (KeyCode::Enter | KeyCode::Char(' '), true) => {
                self.choose(self.highlighted);
                true
            }
            (KeyCode::Up, true) => {
                self.move_highlight(false);
                true
            }
            (KeyCode::Down, true) => {
                self.move_highlight(true);
                true
            }
            (KeyCode::Esc, true) => {
                self.close();
                true
            }
            _ => false,
        };
        Ok(consumed.then_some(EventResponse::Stop(Action::Update)))
    }

    fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Result<Option<EventResponse<Action>>> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Ok(None);
        }
        let pos = Position::new(mouse.column, mouse.row);
        if self.header_area.contains(pos) {
            self.toggle();
            return Ok(Some(EventResponse::Stop(Action::Update)));
        }
        let Some(list) = self.list_area.filter(|_| self.is_open()) else {
            return Ok(None);
        };
        let inner = list.inner(Margin::new(1, 1));
        if inner.contains(pos) {
            let index = self.scroll + usize::from(pos.y - inner.y);
            self.choose(index);
            return Ok(Some(EventResponse::Stop(Action::Update)));
        }
        // Border of the open list.
        Ok(list
            .contains(pos)
            .then_some(EventResponse::Stop(Action::Update)))
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        self.header_area = area;
        let marker = if self.is_open() { "▴" } else { "▾" };
        let header = Paragraph::new(Line::from(vec![
            Span::raw(self.active_label().to_string()),
            Span::raw(" "),
            Span::styled(marker, Style::default().fg(Color::DarkGray)),
        ]))
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(self.border_style)
                .title(self.title.as_str()),
        );
        f.render_widget(header, area);

        if !self.is_open() {
            self.list_area = None;
            self.area.set(area);
            return Ok(());
        }

        let below = f.area().bottom().saturating_sub(area.bottom());
        let wanted = u16::try_from(self.options.len())
            .unwrap_or(u16::MAX)
            .saturating_add(2);
        let list = Rect::new(area.x, area.bottom(), area.width, wanted.min(below));
        if list.height < 3 {
            self.list_area = None;
            self.area.set(area);
            return Ok(());
        }

        let rows = usize::from(list.height - 2);
        self.ensure_visible(rows);
        let lines: Vec<Line> = self
            .options
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(rows)
            .map(|(index, option)| {
                let cursor = if index == self.highlighted { "> " } else { "  " };
                let style = if option.selection_id == self.active_id {
                    Style::default().fg(Color::Black).bg(Color::White).bold()
                } else {
                    Style::default().fg(Color::White)
                };
                Line::from(vec![
                    Span::raw(cursor),
                    Span::styled(option.label.clone(), style),
                ])
            })
            .collect();

        f.render_widget(Clear, list);
        f.render_widget(
            Paragraph::new(lines).block(Block::bordered().border_style(self.border_style)),
            list,
        );
        self.list_area = Some(list);
        self.area.set(area.union(list));
        Ok(())
    }
}
