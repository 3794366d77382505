//! The ledger of energy transfers made during one allocation run, and reductions over it.
use crate::id::NodeID;
use crate::network::path::Route;
use crate::position::Position;
use crate::source_type::SourceType;
use crate::units::Energy;

/// A single movement of energy from a surplus region to a deficit region
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRecord {
    /// The region supplying the energy
    pub source_id: NodeID,
    /// The region receiving the energy
    pub target_id: NodeID,
    /// The type of the supplying region
    pub source_type: SourceType,
    /// Energy taken from the source
    pub supplied: Energy,
    /// Energy remaining after transmission losses
    pub delivered: Energy,
    /// The nodes the energy travelled through, from source to target
    pub route: Route,
    /// The position of each node on the route
    pub path: Vec<Position>,
}

impl TransferRecord {
    /// Energy lost in transmission
    pub fn loss(&self) -> Energy {
        self.supplied - self.delivered
    }

    /// Whether the energy came from a renewable source
    pub fn is_renewable(&self) -> bool {
        self.source_type.is_renewable()
    }
}

/// The transfers made during one allocation run, in the order they were made
pub type Ledger = Vec<TransferRecord>;

/// Aggregate figures for a ledger
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LedgerSummary {
    /// Number of transfers made
    pub transfers: usize,
    /// Total energy taken from sources
    pub total_supplied: Energy,
    /// Energy taken from renewable sources
    pub renewable: Energy,
    /// Energy taken from non-renewable sources
    pub non_renewable: Energy,
    /// Total energy which reached its target
    pub total_delivered: Energy,
    /// Total energy lost in transmission
    pub loss: Energy,
}

impl LedgerSummary {
    /// Summarise the given transfer records
    pub fn new(ledger: &[TransferRecord]) -> Self {
        let (renewable, non_renewable): (Vec<_>, Vec<_>) =
            ledger.iter().partition(|record| record.is_renewable());
        let total_supplied = ledger.iter().map(|record| record.supplied).sum();
        let total_delivered = ledger.iter().map(|record| record.delivered).sum();

        Self {
            transfers: ledger.len(),
            total_supplied,
            renewable: renewable.iter().map(|record| record.supplied).sum(),
            non_renewable: non_renewable.iter().map(|record| record.supplied).sum(),
            total_delivered,
            loss: total_supplied - total_delivered,
        }
    }

    /// The fraction of supplied energy which came from renewable sources (0 if nothing moved)
    pub fn renewable_share(&self) -> f64 {
        if self.total_supplied.value() <= 0.0 {
            return 0.0;
        }

        (self.renewable / self.total_supplied).value()
    }

    /// The fraction of supplied energy which came from non-renewable sources (0 if nothing moved)
    pub fn non_renewable_share(&self) -> f64 {
        if self.total_supplied.value() <= 0.0 {
            return 0.0;
        }

        (self.non_renewable / self.total_supplied).value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    fn record(source_type: SourceType, supplied: f64, delivered: f64) -> TransferRecord {
        TransferRecord {
            source_id: "S".into(),
            target_id: "T".into(),
            source_type,
            supplied: Energy(supplied),
            delivered: Energy(delivered),
            route: Route::direct(&"S".into(), &"T".into(), true),
            path: vec![Position::new(0.0, 0.0), Position::new(1.0, 1.0)],
        }
    }

    #[test]
    fn test_summary() {
        let ledger = vec![
            record(SourceType::Solar, 300.0, 299.0),
            record(SourceType::Coal, 100.0, 99.5),
        ];
        let summary = LedgerSummary::new(&ledger);
        assert_eq!(summary.transfers, 2);
        assert_eq!(summary.total_supplied, Energy(400.0));
        assert_eq!(summary.renewable, Energy(300.0));
        assert_eq!(summary.non_renewable, Energy(100.0));
        assert_eq!(summary.total_delivered, Energy(398.5));
        assert_eq!(summary.loss, Energy(1.5));
        assert_approx_eq!(f64, summary.renewable_share(), 0.75);
        assert_approx_eq!(f64, summary.non_renewable_share(), 0.25);
    }

    #[test]
    fn test_summary_empty() {
        let summary = LedgerSummary::new(&[]);
        assert_eq!(summary, LedgerSummary::default());
        assert_eq!(summary.renewable_share(), 0.0);
        assert_eq!(summary.non_renewable_share(), 0.0);
    }

    #[test]
    fn test_record_loss() {
        let record = record(SourceType::Wind, 100.0, 99.85);
        assert_approx_eq!(f64, record.loss().value(), 0.15, epsilon = 1e-9);
        assert!(record.is_renewable());
    }
}
