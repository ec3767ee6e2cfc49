//! Shared scale engine: provider registries, auto-domain bookkeeping and
//! update notification.
//!
//! Concrete scales ([`LinearScale`](crate::core::LinearScale),
//! [`TimeScale`](crate::core::TimeScale),
//! [`CategoryScale`](crate::core::CategoryScale)) embed a [`ScaleCore`] and
//! implement the type-specific parts of [`Scale`]: how a set of values reduces
//! to an extent and how a new domain is derived from the providers.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use crate::core::listeners::UpdateListeners;
use crate::core::providers::{ExtentProvider, ProviderRegistry};
use crate::core::types::{ListenerId, ProviderId, ScaleId};
use crate::error::{ChartError, ChartResult};

/// State every scale kind carries regardless of its domain type.
#[derive(Debug)]
pub struct ScaleCore<D> {
    id: ScaleId,
    included_values: ProviderRegistry<D>,
    padding_exceptions: ProviderRegistry<D>,
    auto_domain_automatically: bool,
}

impl<D> Default for ScaleCore<D> {
    fn default() -> Self {
        Self {
            id: ScaleId::next(),
            included_values: ProviderRegistry::default(),
            padding_exceptions: ProviderRegistry::default(),
            auto_domain_automatically: true,
        }
    }
}

impl<D> ScaleCore<D> {
    #[must_use]
    pub fn id(&self) -> ScaleId {
        self.id
    }

    #[must_use]
    pub fn included_values(&self) -> &ProviderRegistry<D> {
        &self.included_values
    }

    #[must_use]
    pub fn padding_exceptions(&self) -> &ProviderRegistry<D> {
        &self.padding_exceptions
    }

    /// `false` once a domain was assigned manually.
    #[must_use]
    pub fn is_auto_domain(&self) -> bool {
        self.auto_domain_automatically
    }

    pub(crate) fn set_auto_domain(&mut self, enabled: bool) {
        self.auto_domain_automatically = enabled;
    }
}

/// Bidirectional data-to-pixel mapping with provider-driven auto-domain.
pub trait Scale: Sized {
    type Value: Clone;

    fn core(&self) -> &ScaleCore<Self::Value>;

    fn core_mut(&mut self) -> &mut ScaleCore<Self::Value>;

    fn listeners_mut(&mut self) -> &mut UpdateListeners<Self>;

    /// Forward transform. `None` when the value cannot be placed (e.g. a
    /// category outside the domain or a non-finite number).
    fn project(&self, value: &Self::Value) -> Option<f64>;

    fn range(&self) -> (f64, f64);

    /// Stores a new range without notifying listeners.
    fn store_range(&mut self, range: (f64, f64));

    /// Type-specific reduction of `values` to the extent they occupy:
    /// `[min, max]` for continuous kinds, unique values for discrete ones.
    fn extent_of_values(&self, values: &[Self::Value]) -> Vec<Self::Value>;

    /// Recomputes the domain from the registered providers and stores it.
    ///
    /// Returns `true` when the stored domain changed.
    fn recompute_domain(&mut self) -> bool;

    fn id(&self) -> ScaleId {
        self.core().id()
    }

    /// Assigns the pixel range (the layout hook) and notifies on change.
    fn set_range(&mut self, range: (f64, f64)) {
        if self.range() == range {
            return;
        }
        self.store_range(range);
        self.dispatch_update();
    }

    /// Returns the scale to automatic mode and recomputes its domain.
    fn auto_domain(&mut self) {
        self.core_mut().set_auto_domain(true);
        if self.recompute_domain() {
            self.dispatch_update();
        }
    }

    /// Recomputes the domain unless a manual domain is in effect.
    ///
    /// Consumers call this after the values behind one of their providers
    /// changed.
    fn auto_domain_if_automatic(&mut self) {
        if self.core().is_auto_domain() {
            self.auto_domain();
        }
    }

    fn add_included_values_provider<P>(&mut self, provider: P) -> ProviderId
    where
        P: ExtentProvider<Self::Value> + 'static,
    {
        let id = self.core_mut().included_values.insert(Box::new(provider));
        self.auto_domain_if_automatic();
        id
    }

    fn remove_included_values_provider(&mut self, id: ProviderId) -> bool {
        let removed = self.core_mut().included_values.remove(id);
        if removed {
            self.auto_domain_if_automatic();
        }
        removed
    }

    /// Registers values that must stay inside the domain without receiving
    /// padding (e.g. a bar baseline).
    fn add_padding_exceptions_provider<P>(&mut self, provider: P) -> ProviderId
    where
        P: ExtentProvider<Self::Value> + 'static,
    {
        let id = self
            .core_mut()
            .padding_exceptions
            .insert(Box::new(provider));
        self.auto_domain_if_automatic();
        id
    }

    fn remove_padding_exceptions_provider(&mut self, id: ProviderId) -> bool {
        let removed = self.core_mut().padding_exceptions.remove(id);
        if removed {
            self.auto_domain_if_automatic();
        }
        removed
    }

    fn on_update<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&Self) + 'static,
    {
        self.listeners_mut().add(Box::new(listener))
    }

    fn off_update(&mut self, id: ListenerId) -> bool {
        self.listeners_mut().remove(id)
    }

    /// Invokes every update listener once with the current state.
    fn dispatch_update(&mut self) {
        let mut listeners = std::mem::take(self.listeners_mut());
        listeners.notify(self);
        *self.listeners_mut() = listeners;
    }
}

/// Scale shared between the consumers that contribute to and read from it.
pub type SharedScale<S> = Rc<RefCell<S>>;

#[must_use]
pub fn shared<S: Scale>(scale: S) -> SharedScale<S> {
    Rc::new(RefCell::new(scale))
}

/// Re-auto-domains `target` whenever `source` notifies an update.
///
/// A scale that is mid-update is borrowed for the whole notification, so a
/// cycle of linked scales stops at the first scale it revisits instead of
/// recursing forever; the skipped update is logged at trace level.
///
/// `source` stays mutably borrowed while it notifies, so providers of
/// `target` must not borrow `source`; snapshot what they need from its
/// update listeners instead.
pub fn link_auto_domain<A, B>(
    source: &SharedScale<A>,
    target: &SharedScale<B>,
) -> ChartResult<ListenerId>
where
    A: Scale + 'static,
    B: Scale + 'static,
{
    let weak_target = Rc::downgrade(target);
    let mut source = source.try_borrow_mut().map_err(|_| {
        ChartError::InvalidConfiguration(
            "cannot link auto-domain while the source scale is updating".to_owned(),
        )
    })?;
    let source_id = source.id();
    Ok(source.on_update(move |_| {
        let Some(target) = weak_target.upgrade() else {
            return;
        };
        match target.try_borrow_mut() {
            Ok(mut target) => target.auto_domain_if_automatic(),
            Err(_) => trace!(
                source = source_id.get(),
                "skipping re-entrant auto-domain of a scale that is mid-update"
            ),
        }
    }))
}
