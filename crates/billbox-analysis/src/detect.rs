//! Bill category detection from document text
//!
//! Resolution order: a recognized service provider maps straight to its
//! category; otherwise category hint phrases are counted across the text
//! and the highest-scoring category wins. Documents matching nothing stay
//! undetected and the scanner falls back to general patterns only.

use regex::Regex;

/// Provider name fragment to bill category. Checked in order; providers
/// that sell several services (e.g. Comcast) resolve to their primary one.
const PROVIDER_CATEGORIES: &[(&str, &str)] = &[
    ("at&t mobility", "mobile"),
    ("verizon wireless", "mobile"),
    ("verizon", "mobile"),
    ("at&t", "mobile"),
    ("t-mobile", "mobile"),
    ("sprint", "mobile"),
    ("cricket", "mobile"),
    ("boost mobile", "mobile"),
    ("comcast", "internet"),
    ("xfinity", "internet"),
    ("spectrum", "internet"),
    ("cox", "internet"),
    ("centurylink", "internet"),
    ("frontier", "internet"),
    ("optimum", "internet"),
    ("pg&e", "utility"),
    ("duke energy", "utility"),
    ("national grid", "utility"),
    ("coned", "utility"),
    ("chase", "credit_card"),
    ("citi", "credit_card"),
    ("capital one", "credit_card"),
    ("american express", "credit_card"),
    ("discover", "credit_card"),
    ("dish", "cable_tv"),
    ("directv", "cable_tv"),
    ("state farm", "insurance"),
    ("allstate", "insurance"),
    ("geico", "insurance"),
    ("progressive", "insurance"),
    ("blue cross", "insurance"),
    ("anthem", "insurance"),
    ("aetna", "insurance"),
];

/// Hint phrases scored per category when no provider resolves the type.
const CATEGORY_HINTS: &[(&str, &[&str])] = &[
    (
        "mobile",
        &[
            r"(?i)wireless|mobile|cell|data plan|minutes|texts",
            r"(?i)roaming|international call|long distance",
        ],
    ),
    (
        "internet",
        &[
            r"(?i)internet|broadband|wifi|bandwidth|fiber",
            r"(?i)mbps|gbps|download|upload|data usage",
        ],
    ),
    (
        "utility",
        &[
            r"(?i)electricity|gas|water|sewage|utility",
            r"(?i)kilowatt|kwh|meter reading|therms|gallons",
        ],
    ),
    (
        "credit_card",
        &[
            r"(?i)credit card|card ?member|cardholder|payment due",
            r"(?i)minimum payment|credit limit|available credit|apr|interest rate",
        ],
    ),
    (
        "cable_tv",
        &[
            r"(?i)cable tv|television|channel|broadcast",
            r"(?i)premium channel|bundle|dvr|on demand|set[\s\-]*top box",
        ],
    ),
    (
        "insurance",
        &[
            r"(?i)insurance|policy|coverage|deductible|premium",
            r"(?i)claim|beneficiary|insured|underwriting",
        ],
    ),
];

/// Detect the bill category, preferring the provider when one is known.
pub fn detect_bill_type(text: &str, provider: Option<&str>) -> Option<&'static str> {
    if let Some(provider) = provider {
        let provider = provider.to_lowercase();
        for (name, category) in PROVIDER_CATEGORIES {
            if provider.contains(name) {
                return Some(category);
            }
        }
    }

    let mut best: Option<(&'static str, usize)> = None;
    for (category, hints) in CATEGORY_HINTS {
        let score: usize = hints
            .iter()
            .map(|p| {
                Regex::new(p)
                    .expect("static category hint")
                    .find_iter(text)
                    .count()
            })
            .sum();
        if score > 0 && best.map_or(true, |(_, s)| score > s) {
            best = Some((category, score));
        }
    }
    best.map(|(category, _)| category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_wins_over_hints() {
        // Insurance wording, but the provider pins the category.
        let detected = detect_bill_type("premium coverage statement", Some("Verizon Wireless"));
        assert_eq!(detected, Some("mobile"));
    }

    #[test]
    fn test_detects_cable_bill_from_text() {
        let text = "Monthly television service\n\
                    Premium channel package ........ $24.99\n\
                    DVR service ........ $9.99\n\
                    Set-top box rental ........ $7.50\n";
        assert_eq!(detect_bill_type(text, None), Some("cable_tv"));
    }

    #[test]
    fn test_detects_insurance_bill_from_text() {
        let text = "Auto policy renewal\n\
                    Premium ........ $112.00\n\
                    Deductible: $500\n\
                    Coverage period: 01/01 - 06/30\n";
        assert_eq!(detect_bill_type(text, None), Some("insurance"));
    }

    #[test]
    fn test_unrecognizable_text_is_undetected() {
        assert_eq!(detect_bill_type("lorem ipsum dolor sit amet", None), None);
    }
}
