use serde::{Deserialize, Serialize};

/// One fee line flagged by the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedFee {
    pub description: String,
    /// Dollar amount when one could be parsed off the fee line
    pub amount: Option<f64>,
    /// Whether the fee looks disputable rather than a pass-through charge
    pub is_questionable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Aggregate counts over a report's detected fees.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_fees: usize,
    pub questionable_fees: usize,
}

/// Structured findings for one analyzed document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeReport {
    pub detected_fees: Vec<DetectedFee>,
    /// Sum of amounts across questionable fees
    pub potential_savings: f64,
    pub summary: ReportSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub bill_type: String,
}

impl FeeReport {
    /// Build a report from detected fees, computing savings and summary.
    pub fn from_fees(fees: Vec<DetectedFee>, bill_type: &str, provider: Option<String>) -> Self {
        let potential_savings = fees
            .iter()
            .filter(|f| f.is_questionable)
            .filter_map(|f| f.amount)
            .sum();
        let summary = ReportSummary {
            total_fees: fees.len(),
            questionable_fees: fees.iter().filter(|f| f.is_questionable).count(),
        };
        Self {
            detected_fees: fees,
            potential_savings,
            summary,
            provider,
            bill_type: bill_type.to_string(),
        }
    }
}
