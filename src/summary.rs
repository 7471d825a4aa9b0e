// ===============================
// src/summary.rs
// ===============================
use std::sync::Arc;

use crate::coerce;
use crate::config::SheetRange;
use crate::domain::SummaryMetrics;
use crate::error::Result;
use crate::store::SheetStore;

/// Verbatim label/value pairs from the summary range; no coercion.
pub struct SummaryReader {
    store: Arc<dyn SheetStore>,
    range: SheetRange,
}

impl SummaryReader {
    pub fn new(store: Arc<dyn SheetStore>, range: SheetRange) -> Self {
        Self { store, range }
    }

    pub async fn read(&self) -> Result<Vec<(String, String)>> {
        let rows = self.store.get(&self.range.qualified()).await?;
        Ok(rows
            .iter()
            .map(|r| (coerce::cell(r, 0).to_string(), coerce::cell(r, 1).to_string()))
            .collect())
    }
}

impl SummaryMetrics {
    /// Rows 2..=4 of the summary block hold investment, profit and ROI.
    /// Row 1 is the block header.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let value = |i: usize| pairs.get(i).map(|(_, v)| v.clone());
        Self {
            total_investment: value(1).unwrap_or_else(|| "0".into()),
            potential_profit: value(2).unwrap_or_else(|| "0".into()),
            potential_roi: value(3).map(|v| format!("{v}%")).unwrap_or_else(|| "0%".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn pairs_are_verbatim_and_ordered() {
        let store = MemoryStore::new().with_sheet(
            "Resumen",
            &[
                &["Concepto", "Valor"],
                &["Inversión Total", "125,00 €"],
                &["Beneficio Potencial", "80,50 €"],
                &["ROI Potencial", "64.4"],
                &["Sólo etiqueta"],
            ],
        );
        let reader = SummaryReader::new(Arc::new(store), SheetRange::new("Resumen", "A1:B8"));
        let pairs = reader.read().await.unwrap();
        assert_eq!(pairs.len(), 5);
        assert_eq!(pairs[1], ("Inversión Total".to_string(), "125,00 €".to_string()));
        assert_eq!(pairs[4].1, "");

        let m = SummaryMetrics::from_pairs(&pairs);
        assert_eq!(m.total_investment, "125,00 €");
        assert_eq!(m.potential_profit, "80,50 €");
        assert_eq!(m.potential_roi, "64.4%");
    }

    #[test]
    fn short_summary_falls_back_to_zero() {
        let m = SummaryMetrics::from_pairs(&[("Concepto".into(), "Valor".into())]);
        assert_eq!(m.total_investment, "0");
        assert_eq!(m.potential_profit, "0");
        assert_eq!(m.potential_roi, "0%");
    }
}
