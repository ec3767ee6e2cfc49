use std::fmt;

use indexmap::IndexMap;

use crate::core::types::ProviderId;

/// A consumer's contribution to a scale's auto-computed domain.
///
/// Plots, gridlines and stacked layouts all register through this one
/// protocol; the scale never learns what kind of consumer sits behind it.
pub trait ExtentProvider<D> {
    /// Values (in domain space) the provider currently needs visible.
    fn values(&self) -> Vec<D>;
}

impl<D, F> ExtentProvider<D> for F
where
    F: Fn() -> Vec<D>,
{
    fn values(&self) -> Vec<D> {
        self()
    }
}

/// Providers keyed by the token handed out at registration time.
pub struct ProviderRegistry<D> {
    providers: IndexMap<ProviderId, Box<dyn ExtentProvider<D>>>,
}

impl<D> Default for ProviderRegistry<D> {
    fn default() -> Self {
        Self {
            providers: IndexMap::new(),
        }
    }
}

impl<D> fmt::Debug for ProviderRegistry<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<D> ProviderRegistry<D> {
    pub fn insert(&mut self, provider: Box<dyn ExtentProvider<D>>) -> ProviderId {
        let id = ProviderId::next();
        self.providers.insert(id, provider);
        id
    }

    /// Returns `true` when a provider was registered under `id`.
    pub fn remove(&mut self, id: ProviderId) -> bool {
        self.providers.shift_remove(&id).is_some()
    }

    #[must_use]
    pub fn contains(&self, id: ProviderId) -> bool {
        self.providers.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Concatenation of every provider's current values.
    #[must_use]
    pub fn all_values(&self) -> Vec<D> {
        self.providers
            .values()
            .flat_map(|provider| provider.values())
            .collect()
    }
}
