use color_eyre::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::layout::Rect;

use crate::{
    action::Action,
    listeners::ClickListeners,
    tui::{Event, EventResponse, Frame},
};

pub mod contact_form;
pub mod select;

/// `Component` is a visual and interactive element of the user interface.
///
/// Components are mounted once with the app's click listeners, receive
/// events and actions from the main loop and draw themselves into the area
/// they are given. `unmount` must release everything `mount` registered.
pub trait Component {
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    fn mount(&mut self, _listeners: &ClickListeners) {}

    fn unmount(&mut self) {}

    fn handle_events(&mut self, event: Event) -> Result<Option<EventResponse<Action>>> {
        let r = match event {
            Event::Key(key_event) => self.handle_key_events(key_event)?,
            Event::Mouse(mouse_event) => self.handle_mouse_events(mouse_event)?,
            Event::Paste(text) => self.handle_paste(text)?,
            _ => None,
        };
        Ok(r)
    }

    fn handle_key_events(&mut self, _key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        Ok(None)
    }

    fn handle_mouse_events(
        &mut self,
        _mouse: MouseEvent,
    ) -> Result<Option<EventResponse<Action>>> {
        Ok(None)
    }

    fn handle_paste(&mut self, _text: String) -> Result<Option<EventResponse<Action>>> {
        Ok(None)
    }

    fn update(&mut self, _action: Action) -> Result<Option<Action>> {
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()>;
}
