//! Regex fee scanner implementing the analysis collaborator interface

use regex::Regex;
use tracing::debug;

use billbox_core::{DetectedFee, FeeReport};
use billbox_pipeline::{AnalysisFailure, FeeAnalyzer};

use crate::{detect, patterns};

/// How far past a fee phrase to look for its dollar amount, in bytes.
const AMOUNT_WINDOW: usize = 100;

pub struct PatternAnalyzer {
    bill_type: Option<String>,
    provider_hint: Option<String>,
    general: Vec<Regex>,
    categories: Vec<(&'static str, Vec<Regex>)>,
    amount: Regex,
    provider: Regex,
}

impl PatternAnalyzer {
    /// Build a scanner. With no bill category the scanner detects one per
    /// document from the text; the provider hint overrides provider
    /// detection from the text.
    pub fn new(bill_type: Option<&str>, provider_hint: Option<String>) -> Self {
        let compile = |phrases: &[&str]| {
            phrases
                .iter()
                .map(|p| Regex::new(p).expect("static fee pattern"))
                .collect::<Vec<_>>()
        };
        let categories = patterns::CATEGORIES
            .iter()
            .map(|&category| (category, compile(patterns::for_bill_type(category))))
            .collect();

        Self {
            bill_type: bill_type.map(str::to_owned),
            provider_hint,
            general: compile(patterns::GENERAL),
            categories,
            amount: Regex::new(patterns::AMOUNT).expect("static amount pattern"),
            provider: Regex::new(patterns::PROVIDER).expect("static provider pattern"),
        }
    }

    fn category_patterns(&self, bill_type: &str) -> &[Regex] {
        self.categories
            .iter()
            .find(|(category, _)| *category == bill_type)
            .map(|(_, compiled)| compiled.as_slice())
            .unwrap_or(&[])
    }

    fn detect_provider(&self, text: &str) -> Option<String> {
        if let Some(hint) = &self.provider_hint {
            return Some(hint.clone());
        }
        self.provider
            .find(text)
            .map(|m| m.as_str().to_string())
    }

    /// Dollar amount within the window after a fee phrase, if any.
    fn amount_near(&self, text: &str, from: usize) -> Option<f64> {
        let m = self.amount.find(&text[from..])?;
        if m.start() > AMOUNT_WINDOW {
            return None;
        }
        m.as_str().trim_start_matches('$').parse().ok()
    }

    fn is_questionable(&self, description: &str, provider: Option<&str>) -> (bool, Option<String>) {
        let lower = description.to_lowercase();

        if let Some(provider) = provider {
            for known in patterns::KNOWN_FEES {
                if known.provider.eq_ignore_ascii_case(provider)
                    && known.questionable
                    && similar(&lower, &known.name.to_lowercase())
                {
                    return (
                        true,
                        Some(format!(
                            "This is a known questionable fee commonly added by {provider}."
                        )),
                    );
                }
            }
        }

        for keyword in patterns::QUESTIONABLE_KEYWORDS {
            if lower.contains(keyword) {
                return (
                    true,
                    Some(format!(
                        "Fees described as \"{keyword}\" often exceed the actual cost they claim to cover."
                    )),
                );
            }
        }

        (false, None)
    }
}

impl FeeAnalyzer for PatternAnalyzer {
    fn analyze(&self, text: &str) -> Result<FeeReport, AnalysisFailure> {
        let provider = self.detect_provider(text);
        let bill_type = match &self.bill_type {
            Some(t) => t.clone(),
            None => detect::detect_bill_type(text, provider.as_deref())
                .unwrap_or("general")
                .to_string(),
        };
        let mut fees: Vec<DetectedFee> = Vec::new();

        for pattern in self.general.iter().chain(self.category_patterns(&bill_type)) {
            for m in pattern.find_iter(text) {
                let description = m.as_str().to_string();
                if fees
                    .iter()
                    .any(|f| f.description.eq_ignore_ascii_case(&description))
                {
                    continue;
                }

                let amount = self.amount_near(text, m.end());
                let (questionable, reason) =
                    self.is_questionable(&description, provider.as_deref());

                fees.push(DetectedFee {
                    description,
                    amount,
                    is_questionable: questionable,
                    reason,
                });
            }
        }

        debug!(
            bill_type = %bill_type,
            fees = fees.len(),
            provider = provider.as_deref().unwrap_or("unknown"),
            "fee scan complete"
        );
        Ok(FeeReport::from_fees(fees, &bill_type, provider))
    }
}

/// Word-overlap similarity (Jaccard over whitespace tokens).
fn similar(a: &str, b: &str) -> bool {
    let wa: std::collections::HashSet<&str> = a.split_whitespace().collect();
    let wb: std::collections::HashSet<&str> = b.split_whitespace().collect();
    if wa.is_empty() || wb.is_empty() {
        return false;
    }
    let intersection = wa.intersection(&wb).count();
    let union = wa.union(&wb).count();
    intersection as f64 / union as f64 >= 0.7
}
