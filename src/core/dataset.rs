use std::fmt;

use crate::core::listeners::UpdateListeners;
use crate::core::types::{DatasetId, ListenerId};

/// Accessor signature shared by stacking, projection and entity building:
/// `(datum, index, dataset) -> value`.
pub type Accessor<'a, T, V> = dyn Fn(&T, usize, &Dataset<T>) -> V + 'a;

/// Ordered data bound to one or more plots.
pub struct Dataset<T> {
    id: DatasetId,
    data: Vec<T>,
    listeners: UpdateListeners<Dataset<T>>,
}

impl<T: fmt::Debug> fmt::Debug for Dataset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dataset")
            .field("id", &self.id)
            .field("data", &self.data)
            .field("listeners", &self.listeners)
            .finish()
    }
}

impl<T> Default for Dataset<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> Dataset<T> {
    #[must_use]
    pub fn new(data: Vec<T>) -> Self {
        Self {
            id: DatasetId::next(),
            data,
            listeners: UpdateListeners::default(),
        }
    }

    #[must_use]
    pub fn id(&self) -> DatasetId {
        self.id
    }

    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Replaces the data and notifies listeners.
    pub fn set_data(&mut self, data: Vec<T>) {
        self.data = data;
        self.dispatch_update();
    }

    pub fn on_update<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&Dataset<T>) + 'static,
    {
        self.listeners.add(Box::new(listener))
    }

    pub fn off_update(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    fn dispatch_update(&mut self) {
        let mut listeners = std::mem::take(&mut self.listeners);
        listeners.notify(self);
        self.listeners = listeners;
    }
}
