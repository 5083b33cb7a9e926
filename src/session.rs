// Copyright (c) 2026 rezky_nightky

//! The one piece of process-wide state: a weak pointer to the engine that
//! currently owns the screen, so an interrupt can restore the terminal.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use crate::runtime::ColorMode;
use crate::terminal::restore_terminal_best_effort;

static ACTIVE: Registry = Registry::new();

#[derive(Debug)]
pub struct Session {
    pub mode: ColorMode,
}

impl Session {
    pub fn new(mode: ColorMode) -> Arc<Self> {
        Arc::new(Self { mode })
    }

    fn restore(&self) {
        tracing::info!(mode = ?self.mode, "restoring terminal after interrupt");
        restore_terminal_best_effort();
    }
}

struct Registry {
    slot: Mutex<Option<Weak<Session>>>,
}

impl Registry {
    const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Weak<Session>>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn register(&self, session: &Arc<Session>) {
        *self.slot() = Some(Arc::downgrade(session));
    }

    fn unregister(&self, session: &Arc<Session>) {
        let mut slot = self.slot();
        if slot.as_ref().is_some_and(|w| points_at(w, session)) {
            *slot = None;
        }
    }

    #[cfg(test)]
    fn is_active(&self, session: &Arc<Session>) -> bool {
        self.slot().as_ref().is_some_and(|w| points_at(w, session))
    }

    fn live(&self) -> Option<Arc<Session>> {
        self.slot().as_ref().and_then(Weak::upgrade)
    }

    fn restore_live(&self) -> bool {
        match self.live() {
            Some(session) => {
                session.restore();
                true
            }
            None => false,
        }
    }
}

fn points_at(weak: &Weak<Session>, session: &Arc<Session>) -> bool {
    std::ptr::eq(weak.as_ptr(), Arc::as_ptr(session))
}

pub fn register(session: &Arc<Session>) {
    ACTIVE.register(session);
}

/// Clears the slot, but only if it still points at `session`.
pub fn unregister(session: &Arc<Session>) {
    ACTIVE.unregister(session);
}

#[cfg(test)]
pub fn is_active(session: &Arc<Session>) -> bool {
    ACTIVE.is_active(session)
}

/// Called from the interrupt path. Restores the terminal only when an
/// engine owns the screen; the menu leaves nothing to undo. Returns whether
/// a live engine was found.
pub fn restore_active() -> bool {
    ACTIVE.restore_live()
}
