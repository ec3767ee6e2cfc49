use std::fmt;

use indexmap::IndexMap;

use crate::core::types::ListenerId;

/// Synchronous callbacks invoked with the object that changed.
///
/// Listeners receive a shared reference, so they can read the new state but
/// cannot mutate the notifier while the notification is in flight.
pub struct UpdateListeners<S: ?Sized> {
    listeners: IndexMap<ListenerId, Box<dyn FnMut(&S)>>,
}

impl<S: ?Sized> Default for UpdateListeners<S> {
    fn default() -> Self {
        Self {
            listeners: IndexMap::new(),
        }
    }
}

impl<S: ?Sized> fmt::Debug for UpdateListeners<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateListeners")
            .field("len", &self.listeners.len())
            .finish()
    }
}

impl<S: ?Sized> UpdateListeners<S> {
    pub fn add(&mut self, listener: Box<dyn FnMut(&S)>) -> ListenerId {
        let id = ListenerId::next();
        self.listeners.insert(id, listener);
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        self.listeners.shift_remove(&id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Invokes every listener once, in registration order.
    pub fn notify(&mut self, subject: &S) {
        for listener in self.listeners.values_mut() {
            listener(subject);
        }
    }
}

/// Argument-less callbacks, used for gesture-end notifications.
#[derive(Default)]
pub struct CallbackSet {
    callbacks: IndexMap<ListenerId, Box<dyn FnMut()>>,
}

impl fmt::Debug for CallbackSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSet")
            .field("len", &self.callbacks.len())
            .finish()
    }
}

impl CallbackSet {
    pub fn add(&mut self, callback: Box<dyn FnMut()>) -> ListenerId {
        let id = ListenerId::next();
        self.callbacks.insert(id, callback);
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        self.callbacks.shift_remove(&id).is_some()
    }

    pub fn call_all(&mut self) {
        for callback in self.callbacks.values_mut() {
            callback();
        }
    }
}
