//! Contact form page.
//!
//! Renders every field of a [`FormController`] in display order, a submit
//! button and the form-level error banner. Text fields are edited through
//! `tui-input`; select fields use [`CustomSelect`].
//!
//! Every edit goes through the controller (`handle_update_field`) followed by
//! a full validation pass, so the borders always reflect the latest snapshot.

use color_eyre::Result;
use contact_form::{
    FieldInput, FieldKind, FieldStatus, FormController, FormSchema, InputEvent, SubmitEvent,
    SubmitOutcome, Submitter,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Flex, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};
use tracing::{info, warn};
use tui_input::{Input, InputRequest};

use crate::{
    action::Action,
    components::{select::CustomSelect, Component},
    listeners::ClickListeners,
    tui::{EventResponse, Frame},
};

pub const ERROR_BANNER: &str = "Please populate all the fields correctly and try again";
pub const SUCCESS_NOTICE: &str = "Continue now";

const CRIMSON: Color = Color::Rgb(220, 20, 60);

enum Slot {
    Editor {
        name: String,
        kind: FieldKind,
        input: Input,
    },
    Dropdown {
        name: String,
        select: CustomSelect,
    },
}

impl Slot {
    fn name(&self) -> &str {
        match self {
            Slot::Editor { name, .. } | Slot::Dropdown { name, .. } => name,
        }
    }

    fn height(&self) -> u16 {
        match self {
            Slot::Editor {
                kind: FieldKind::Multiline,
                ..
            } => 6,
            _ => 3,
        }
    }
}

pub struct ContactFormView {
    controller: FormController,
    title: String,
    description: Option<String>,
    slots: Vec<Slot>,
    // Index into `slots`; `slots.len()` is the submit button.
    focus: usize,
    field_areas: Vec<Rect>,
    button_area: Rect,
    notice: Option<String>,
}

impl ContactFormView {
    pub fn new(schema: &FormSchema, submitter: impl Submitter + Send + 'static) -> Result<Self> {
        let controller = FormController::from_schema(schema, submitter)?;
        let slots = controller
            .registry()
            .iter()
            .map(|(name, field)| match &field.options {
                Some(options) if field.kind == FieldKind::Select => Slot::Dropdown {
                    name: name.to_string(),
                    select: CustomSelect::new(
                        field.placeholder.clone().unwrap_or_else(|| name.to_string()),
                        options.clone(),
                        field.selection_id,
                    ),
                },
                _ => Slot::Editor {
                    name: name.to_string(),
                    kind: field.kind,
                    input: Input::new(field.value.clone()),
                },
            })
            .collect();
        Ok(Self {
            controller,
            title: schema.title.clone(),
            description: schema.description.clone(),
            slots,
            focus: 0,
            field_areas: Vec::new(),
            button_area: Rect::default(),
            notice: None,
        })
    }

    pub fn controller(&self) -> &FormController {
        &self.controller
    }

    /// Name of the focused field, `None` when the submit button has focus.
    pub fn focused_field(&self) -> Option<&str> {
        self.slots.get(self.focus).map(Slot::name)
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    fn focused_kind(&self) -> Option<FieldKind> {
        match self.slots.get(self.focus) {
            Some(Slot::Editor { kind, .. }) => Some(*kind),
            _ => None,
        }
    }

    fn button_index(&self) -> usize {
        self.slots.len()
    }

    fn set_focus(&mut self, index: usize) {
        if index == self.focus {
            return;
        }
        if let Some(Slot::Dropdown { select, .. }) = self.slots.get_mut(self.focus) {
            select.close();
        }
        self.focus = index.min(self.button_index());
    }

    fn focus_next(&mut self) {
        let next = (self.focus + 1) % (self.button_index() + 1);
        self.set_focus(next);
    }

    fn focus_prev(&mut self) {
        let count = self.button_index() + 1;
        self.set_focus((self.focus + count - 1) % count);
    }

    fn edit(&mut self, index: usize, request: InputRequest) -> Result<bool> {
        let Some(Slot::Editor { name, input, .. }) = self.slots.get_mut(index) else {
            return Ok(false);
        };
        let Some(changed) = input.handle(request) else {
            return Ok(false);
        };
        if changed.value {
            let event = InputEvent::new(name.clone(), input.value());
            self.controller.handle_update_field(event)?;
            self.controller.handle_validate_all_fields();
        }
        Ok(true)
    }

    fn apply_choice(&mut self, index: usize) -> Result<()> {
        let Some(Slot::Dropdown { name, select }) = self.slots.get_mut(index) else {
            return Ok(());
        };
        let Some(option) = select.take_choice() else {
            return Ok(());
        };
        let input = FieldInput::selection(name.clone(), option);
        self.controller.handle_update_field(input)?;
        self.controller.handle_validate_all_fields();
        Ok(())
    }

    fn submit(&mut self) {
        let mut event = SubmitEvent::new();
        self.notice = match self.controller.try_submit(&mut event) {
            SubmitOutcome::Submitted => Some(SUCCESS_NOTICE.to_string()),
            SubmitOutcome::Blocked => None,
            SubmitOutcome::Failed(err) => {
                warn!(%err, "submit failed");
                Some(format!("Submission failed: {err}"))
            }
        };
    }

    fn status_style(&self, name: &str, focused: bool) -> Style {
        match self.controller.classify(name) {
            FieldStatus::Valid => Style::default().fg(Color::Green),
            FieldStatus::Error => Style::default().fg(Color::Red),
            FieldStatus::None if focused => Style::default().fg(Color::Yellow),
            FieldStatus::None => Style::default().fg(Color::DarkGray),
        }
    }
}

fn input_request(key: KeyEvent) -> Option<InputRequest> {
    use InputRequest::*;
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('w') if ctrl => Some(DeletePrevWord),
        KeyCode::Char('u') if ctrl => Some(DeleteLine),
        KeyCode::Char('a') if ctrl => Some(GoToStart),
        KeyCode::Char('e') if ctrl => Some(GoToEnd),
        KeyCode::Char(c) if !ctrl => Some(InsertChar(c)),
        KeyCode::Backspace => Some(DeletePrevChar),
        KeyCode::Delete => Some(DeleteNextChar),
        KeyCode::Left => Some(GoToPrevChar),
        KeyCode::Right => Some(GoToNextChar),
        KeyCode::Home => Some(GoToStart),
        KeyCode::End => Some(GoToEnd),
        _ => None,
    }
}

/// Characters a paste contributes to a field of `kind`. Only multiline
/// fields keep line breaks; elsewhere a break becomes a space.
fn paste_chars(text: &str, kind: FieldKind) -> impl Iterator<Item = char> + '_ {
    text.chars().filter(|c| *c != '\r').filter_map(move |c| match c {
        '\n' if kind == FieldKind::Multiline => Some('\n'),
        '\n' => Some(' '),
        c if c.is_control() => None,
        c => Some(c),
    })
}

/// Break `text` into rows: one per line, each cut into `width`-char pieces.
fn wrap_chars(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    for line in text.split('\n') {
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            rows.push(String::new());
            continue;
        }
        rows.extend(chars.chunks(width).map(|chunk| chunk.iter().collect::<String>()));
    }
    rows
}

/// Column and row of the char at `cursor` in the layout `wrap_chars` produces.
fn wrapped_cursor(text: &str, cursor: usize, width: usize) -> (usize, usize) {
    let width = width.max(1);
    let (mut col, mut row) = (0, 0);
    for c in text.chars().take(cursor) {
        if c == '\n' {
            col = 0;
            row += 1;
        } else {
            col += 1;
            if col == width {
                col = 0;
                row += 1;
            }
        }
    }
    (col, row)
}

impl Component for ContactFormView {
    fn init(&mut self) -> Result<()> {
        info!(
            title = %self.title,
            fields = self.slots.len(),
            "contact form ready"
        );
        Ok(())
    }

    fn mount(&mut self, listeners: &ClickListeners) {
        for slot in &mut self.slots {
            if let Slot::Dropdown { select, .. } = slot {
                select.mount(listeners);
            }
        }
    }

    fn unmount(&mut self) {
        for slot in &mut self.slots {
            if let Slot::Dropdown { select, .. } = slot {
                select.unmount();
            }
        }
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(EventResponse::Stop(Action::Submit)));
        }

        let focus = self.focus;
        if let Some(Slot::Dropdown { select, .. }) = self.slots.get_mut(focus) {
            if let Some(response) = select.handle_key_events(key)? {
                self.apply_choice(focus)?;
                return Ok(Some(response));
            }
        }

        match key.code {
            KeyCode::Tab => return Ok(Some(EventResponse::Stop(Action::FocusNext))),
            KeyCode::BackTab => return Ok(Some(EventResponse::Stop(Action::FocusPrev))),
            KeyCode::Enter if focus == self.button_index() => {
                return Ok(Some(EventResponse::Stop(Action::Submit)));
            }
            KeyCode::Enter if self.focused_kind() == Some(FieldKind::Multiline) => {
                if self.edit(focus, InputRequest::InsertChar('\n'))? {
                    return Ok(Some(EventResponse::Stop(Action::Update)));
                }
                return Ok(None);
            }
            KeyCode::Enter if focus < self.button_index() => {
                return Ok(Some(EventResponse::Stop(Action::FocusNext)));
            }
            _ => {}
        }

        if let Some(request) = input_request(key) {
            if self.edit(focus, request)? {
                return Ok(Some(EventResponse::Stop(Action::Update)));
            }
        }
        Ok(None)
    }

    fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Result<Option<EventResponse<Action>>> {
        // Open dropdown lists overlap the fields below them.
        let mut hit = None;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if let Slot::Dropdown { select, .. } = slot {
                if let Some(response) = select.handle_mouse_events(mouse)? {
                    hit = Some((index, response));
                    break;
                }
            }
        }
        if let Some((index, response)) = hit {
            self.set_focus(index);
            self.apply_choice(index)?;
            return Ok(Some(response));
        }

        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Ok(None);
        }
        let pos = Position::new(mouse.column, mouse.row);
        if let Some(index) = self.field_areas.iter().position(|r| r.contains(pos)) {
            self.set_focus(index);
            return Ok(Some(EventResponse::Stop(Action::Update)));
        }
        if self.button_area.contains(pos) {
            self.set_focus(self.button_index());
            return Ok(Some(EventResponse::Stop(Action::Submit)));
        }
        Ok(None)
    }

    fn handle_paste(&mut self, text: String) -> Result<Option<EventResponse<Action>>> {
        let focus = self.focus;
        let Some(kind) = self.focused_kind() else {
            return Ok(None);
        };
        for c in paste_chars(&text, kind) {
            self.edit(focus, InputRequest::InsertChar(c))?;
        }
        Ok(Some(EventResponse::Stop(Action::Update)))
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Submit => self.submit(),
            Action::FocusNext => self.focus_next(),
            Action::FocusPrev => self.focus_prev(),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let mut constraints = vec![Constraint::Length(2)];
        constraints.extend(self.slots.iter().map(|s| Constraint::Length(s.height())));
        constraints.extend([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ]);
        let rows = Layout::vertical(constraints).split(area);
        let field_count = self.slots.len();

        let mut header = vec![Line::from(self.title.as_str()).bold()];
        if let Some(description) = &self.description {
            header.push(Line::from(description.as_str()).fg(Color::DarkGray));
        }
        f.render_widget(Paragraph::new(header), rows[0]);

        let focus = self.focus;
        let mut field_areas = Vec::with_capacity(field_count);
        let mut dropdowns = Vec::new();
        for index in 0..field_count {
            let rect = rows[index + 1];
            field_areas.push(rect);
            let focused = index == focus;
            let style = self.status_style(self.slots[index].name(), focused);
            let Some(field) = self.controller.registry().get(self.slots[index].name()) else {
                continue;
            };
            let placeholder = field.placeholder.clone().unwrap_or_default();
            let selection_id = field.selection_id;

            match &mut self.slots[index] {
                Slot::Editor { name, kind, input } => {
                    let block = Block::bordered()
                        .border_type(BorderType::Rounded)
                        .border_style(style)
                        .title(name.as_str());
                    let inner = block.inner(rect);
                    let width = usize::from(inner.width.max(1));

                    let (text, cursor) = if *kind == FieldKind::Multiline {
                        let lines: Vec<Line> = if input.value().is_empty() {
                            vec![Line::from(placeholder).fg(Color::DarkGray)]
                        } else {
                            wrap_chars(input.value(), width)
                                .into_iter()
                                .map(Line::from)
                                .collect()
                        };
                        let (col, row) = wrapped_cursor(input.value(), input.cursor(), width);
                        let x = u16::try_from(col).unwrap_or(0);
                        let y = u16::try_from(row).unwrap_or(0);
                        (Paragraph::new(lines), Position::new(inner.x + x, inner.y + y))
                    } else {
                        let scroll = input.visual_scroll(width);
                        let line = if input.value().is_empty() {
                            Line::from(placeholder).fg(Color::DarkGray)
                        } else {
                            Line::from(input.value())
                        };
                        let x = u16::try_from(input.visual_cursor().saturating_sub(scroll))
                            .unwrap_or(0);
                        (
                            Paragraph::new(line).scroll((0, u16::try_from(scroll).unwrap_or(0))),
                            Position::new(inner.x + x, inner.y),
                        )
                    };
                    f.render_widget(text.block(block), rect);
                    if focused && inner.contains(cursor) {
                        f.set_cursor_position(cursor);
                    }
                }
                Slot::Dropdown { select, .. } => {
                    select.set_active(selection_id);
                    select.set_border_style(style);
                    dropdowns.push((index, rect));
                }
            }
        }
        self.field_areas = field_areas;

        let banner_row = rows[field_count + 1];
        if self.controller.show_error_banner() {
            f.render_widget(
                Paragraph::new(ERROR_BANNER)
                    .centered()
                    .style(Style::default().fg(Color::White).bg(CRIMSON)),
                banner_row,
            );
        }

        let [button] = Layout::horizontal([Constraint::Length(16)])
            .flex(Flex::Center)
            .areas(rows[field_count + 2]);
        let mut button_style = Style::default().add_modifier(Modifier::BOLD);
        if focus == self.button_index() {
            button_style = button_style.add_modifier(Modifier::REVERSED);
        }
        f.render_widget(
            Paragraph::new(self.controller.submit_label())
                .centered()
                .style(button_style)
                .block(Block::bordered().border_type(BorderType::Rounded)),
            button,
        );
        self.button_area = button;

        if let Some(notice) = &self.notice {
            f.render_widget(
                Paragraph::new(notice.as_str()).centered().fg(Color::Green),
                rows[field_count + 3],
            );
        }

        let status = Line::from(vec![
            Span::raw(format!("form dirty: {}", self.controller.is_form_dirty())),
            Span::raw("   "),
            Span::raw(format!("all valid: {}", self.controller.all_fields_valid())),
            Span::raw("   "),
            Span::raw("Tab: next  Ctrl+S: submit  Esc: quit"),
        ])
        .fg(Color::DarkGray);
        f.render_widget(Paragraph::new(status), rows[field_count + 4]);

        // Dropdowns last so an open list is drawn over the fields below it.
        for (index, rect) in dropdowns {
            if let Some(Slot::Dropdown { select, .. }) = self.slots.get_mut(index) {
                select.draw(f, rect)?;
            }
        }
        Ok(())
    }
}
