//! Tracks which individual the operator is currently classifying.

use crate::series::{SeriesProvider, TimeSeriesPoint};
use crate::types::IdentityId;

/// Holds the active identity and scopes series lookups to it.
///
/// Selecting an identity never touches pending clicks or stored intervals.
#[derive(Debug)]
pub struct IdentitySelector<P> {
    provider: P,
    active: Option<IdentityId>,
}

impl<P: SeriesProvider> IdentitySelector<P> {
    pub const fn new(provider: P) -> Self {
        Self {
            provider,
            active: None,
        }
    }

    /// Makes `identity` the active one, returning the previous selection.
    pub fn select(&mut self, identity: IdentityId) -> Option<IdentityId> {
        tracing::debug!(%identity, "identity selected");
        self.active.replace(identity)
    }

    /// Whether the provider has data for `identity`.
    pub fn is_known(&self, identity: &IdentityId) -> bool {
        self.provider.contains(identity)
    }

    pub const fn active(&self) -> Option<&IdentityId> {
        self.active.as_ref()
    }

    /// Points for the active identity; empty when nothing is selected.
    pub fn active_series(&self) -> Vec<TimeSeriesPoint> {
        self.active
            .as_ref()
            .map(|identity| self.provider.series(identity))
            .unwrap_or_default()
    }

    /// Every identity the provider can offer.
    pub fn identities(&self) -> Vec<IdentityId> {
        self.provider.identities()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::series::InMemorySeries;
    use crate::types::Timestamp;

    fn point(identity: &str, secs: f64) -> TimeSeriesPoint {
        TimeSeriesPoint {
            identity: IdentityId::new(identity).unwrap(),
            timestamp: Timestamp::from_epoch_seconds(secs).unwrap(),
            value: secs * 2.0,
        }
    }

    fn selector() -> IdentitySelector<InMemorySeries> {
        IdentitySelector::new(InMemorySeries::new([
            point("R3", 1.0),
            point("R4", 2.0),
            point("R3", 3.0),
        ]))
    }

    #[test]
    fn nothing_selected_initially() {
        let selector = selector();
        assert!(selector.active().is_none());
        assert!(selector.active_series().is_empty());
    }

    #[test]
    fn active_series_follows_selection() {
        let mut selector = selector();
        let r3 = IdentityId::new("R3").unwrap();
        let r4 = IdentityId::new("R4").unwrap();

        assert_eq!(selector.select(r3.clone()), None);
        assert_eq!(
            selector.active_series(),
            vec![point("R3", 1.0), point("R3", 3.0)]
        );

        assert_eq!(selector.select(r4), Some(r3));
        assert_eq!(selector.active_series(), vec![point("R4", 2.0)]);
    }

    #[test]
    fn known_identities_come_from_provider() {
        let selector = selector();
        assert!(selector.is_known(&IdentityId::new("R4").unwrap()));
        assert!(!selector.is_known(&IdentityId::new("R5").unwrap()));
        assert_eq!(selector.identities().len(), 2);
    }
}
