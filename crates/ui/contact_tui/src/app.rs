use color_eyre::Result;
use contact_form::LogSubmitter;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEventKind};
use ratatui::prelude::Rect;
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::{
    action::Action,
    components::{contact_form::ContactFormView, Component},
    config::Config,
    listeners::ClickListeners,
    tui::{Event, EventResponse, Tui},
};

pub struct App {
    pub config: Config,
    pub form: ContactFormView,
    pub listeners: ClickListeners,
    pub tick_rate: f64,
    pub frame_rate: f64,
    pub should_quit: bool,
    pub should_suspend: bool,
}

impl App {
    pub fn new(config: Config, tick_rate: Option<f64>, frame_rate: Option<f64>) -> Result<Self> {
        let form = ContactFormView::new(&config.schema(), LogSubmitter)?;
        Ok(Self {
            tick_rate: tick_rate.unwrap_or(config.ui.tick_rate),
            frame_rate: frame_rate.unwrap_or(config.ui.frame_rate),
            config,
            form,
            listeners: ClickListeners::new(),
            should_quit: false,
            should_suspend: false,
        })
    }

    fn terminal(&self) -> Result<Tui> {
        Ok(Tui::new()?
            .tick_rate(self.tick_rate)
            .frame_rate(self.frame_rate)
            .mouse(self.config.ui.mouse))
    }

    pub async fn run(&mut self) -> Result<()> {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

        let mut tui = self.terminal()?;
        tui.enter()?;

        self.form.init()?;
        self.form.mount(&self.listeners);

        loop {
            if let Some(e) = tui.next().await {
                // Capture phase: document-level listeners see clicks first.
                if let Event::Mouse(mouse) = &e {
                    if matches!(mouse.kind, MouseEventKind::Down(_)) {
                        self.listeners.dispatch(mouse);
                    }
                }

                let stop_event_propagation = match self.form.handle_events(e.clone()) {
                    Ok(Some(EventResponse::Continue(action))) => {
                        action_tx.send(action).ok();
                        false
                    }
                    Ok(Some(EventResponse::Stop(action))) => {
                        action_tx.send(action).ok();
                        true
                    }
                    Ok(None) => false,
                    Err(err) => {
                        error!(%err, "form rejected event");
                        false
                    }
                };

                if !stop_event_propagation {
                    match e {
                        Event::Quit => action_tx.send(Action::Quit)?,
                        Event::Tick => action_tx.send(Action::Tick)?,
                        Event::Render => action_tx.send(Action::Render)?,
                        Event::Resize(x, y) => action_tx.send(Action::Resize(x, y))?,
                        Event::Key(key) => {
                            if let Some(action) = global_key_action(key) {
                                action_tx.send(action)?;
                            }
                        }
                        _ => {}
                    }
                }
            }

            while let Ok(action) = action_rx.try_recv() {
                if action != Action::Tick && action != Action::Render {
                    debug!("{action:?}");
                }
                match action {
                    Action::Quit => self.should_quit = true,
                    Action::Suspend => self.should_suspend = true,
                    Action::Resume => self.should_suspend = false,
                    Action::Error(ref msg) => error!("{msg}"),
                    Action::Resize(w, h) => {
                        tui.resize(Rect::new(0, 0, w, h))?;
                        self.render(&mut tui, &action_tx)?;
                    }
                    Action::Render => self.render(&mut tui, &action_tx)?,
                    _ => {}
                }

                if let Some(action) = self.form.update(action.clone())? {
                    action_tx.send(action)?
                };
            }

            if self.should_suspend {
                tui.suspend()?;
                action_tx.send(Action::Resume)?;
                tui.resume()?;
            } else if self.should_quit {
                tui.stop()?;
                break;
            }
        }

        self.form.unmount();
        tui.exit()?;
        Ok(())
    }

    fn render(&mut self, tui: &mut Tui, action_tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        tui.draw(|f| {
            let area = f.area();
            if let Err(err) = self.form.draw(f, area) {
                action_tx
                    .send(Action::Error(format!("Failed to draw: {err:?}")))
                    .ok();
            }
        })?;
        Ok(())
    }
}

/// Keys handled by the app when the form did not consume them.
fn global_key_action(key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => Some(Action::Quit),
        KeyCode::Char('z') if ctrl => Some(Action::Suspend),
        KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventKind, KeyEventState};

    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn global_keys() {
        assert_eq!(
            global_key_action(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(
            global_key_action(key(KeyCode::Char('z'), KeyModifiers::CONTROL)),
            Some(Action::Suspend)
        );
        assert_eq!(global_key_action(key(KeyCode::Char('c'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn cli_rates_override_config() {
        let app = App::new(Config::default(), Some(12.0), None).expect("app");
        assert_eq!(app.tick_rate, 12.0);
        assert_eq!(app.frame_rate, 30.0);
    }
}
