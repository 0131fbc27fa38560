//! Document-level click listeners.
//!
//! The app loop hands every mouse-down event to [`ClickListeners::dispatch`]
//! before any component sees it (capture phase). Registering returns a
//! [`ListenerGuard`]; dropping the guard removes the listener, so a component
//! that keeps its guard in a field cannot outlive its registration.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use crossterm::event::MouseEvent;
use tracing::trace;

type Listener = Box<dyn FnMut(&MouseEvent)>;

#[derive(Default)]
struct ListenerTable {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
    dispatching: bool,
    // Guards dropped while a dispatch is running.
    removed: Vec<u64>,
}

impl ListenerTable {
    /// Detach a listener. The closure is handed back so the caller can drop
    /// it after releasing the table borrow.
    fn remove(&mut self, id: u64) -> Option<Listener> {
        if self.dispatching {
            self.removed.push(id);
            return None;
        }
        let index = self.entries.iter().position(|(entry, _)| *entry == id)?;
        Some(self.entries.remove(index).1)
    }
}

#[derive(Clone, Default)]
pub struct ClickListeners {
    table: Rc<RefCell<ListenerTable>>,
}

impl ClickListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, listener: impl FnMut(&MouseEvent) + 'static) -> ListenerGuard {
        let mut table = self.table.borrow_mut();
        let id = table.next_id;
        table.next_id += 1;
        table.entries.push((id, Box::new(listener)));
        trace!(id, "click listener registered");
        ListenerGuard {
            id,
            table: Rc::downgrade(&self.table),
        }
    }

    /// Call every registered listener with `event`.
    ///
    /// Listeners may register or drop guards while running; those changes
    /// take effect once the dispatch finishes.
    pub fn dispatch(&self, event: &MouseEvent) {
        let mut running: Vec<(u64, Listener)> = {
            let mut table = self.table.borrow_mut();
            table.dispatching = true;
            std::mem::take(&mut table.entries)
        };
        for (_, listener) in running.iter_mut() {
            listener(event);
        }
        let mut table = self.table.borrow_mut();
        let removed = std::mem::take(&mut table.removed);
        let (mut kept, dropped): (Vec<_>, Vec<_>) = running
            .into_iter()
            .partition(|(id, _)| !removed.contains(id));
        kept.append(&mut table.entries);
        table.entries = kept;
        table.dispatching = false;
        drop(table);
        drop(dropped);
    }

    pub fn len(&self) -> usize {
        self.table.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps a listener registered for as long as it lives.
#[must_use = "dropping the guard removes the listener"]
pub struct ListenerGuard {
    id: u64,
    table: Weak<RefCell<ListenerTable>>,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let Some(shared) = self.table.upgrade() else {
            return;
        };
        let listener = shared.borrow_mut().remove(self.id);
        drop(listener);
        trace!(id = self.id, "click listener removed");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use crossterm::event::{KeyModifiers, MouseButton, MouseEventKind};

    use super::*;

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn guard_drop_removes_listener() {
        let listeners = ClickListeners::new();
        let hits = Rc::new(Cell::new(0));
        let seen = Rc::clone(&hits);
        let guard = listeners.register(move |_| seen.set(seen.get() + 1));
        assert_eq!(listeners.len(), 1);

        listeners.dispatch(&click(1, 1));
        drop(guard);
        listeners.dispatch(&click(1, 1));

        assert_eq!(hits.get(), 1);
        assert!(listeners.is_empty());
    }

    #[test]
    fn guard_outliving_registry_is_harmless() {
        let listeners = ClickListeners::new();
        let guard = listeners.register(|_| {});
        drop(listeners);
        drop(guard);
    }

    #[test]
    fn guard_dropped_during_dispatch_is_removed_afterwards() {
        let listeners = ClickListeners::new();
        let slot: Rc<RefCell<Option<ListenerGuard>>> = Rc::new(RefCell::new(None));
        let inner = Rc::clone(&slot);
        let guard = listeners.register(move |_| {
            inner.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(guard);

        listeners.dispatch(&click(0, 0));
        assert!(listeners.is_empty());
    }

    #[test]
    fn listener_sees_coordinates() {
        let listeners = ClickListeners::new();
        let last = Rc::new(Cell::new((0, 0)));
        let seen = Rc::clone(&last);
        let _guard = listeners.register(move |m| seen.set((m.column, m.row)));
        listeners.dispatch(&click(7, 3));
        assert_eq!(last.get(), (7, 3));
    }
}
