//! Fee phrase patterns and known-fee tables by bill category

/// General fee phrases seen across bill types.
pub const GENERAL: &[&str] = &[
    r"(?i)(administrative|admin)[\s\-]*(fee|charge)",
    r"(?i)(service|maintenance)[\s\-]*(fee|charge)",
    r"(?i)(processing|transaction)[\s\-]*(fee|charge)",
    r"(?i)(regulatory|compliance)[\s\-]*(fee|charge)",
    r"(?i)(convenience|payment)[\s\-]*(fee|charge)",
    r"(?i)(late|overdue|penalty)[\s\-]*(fee|charge)",
    r"(?i)(paper|billing|statement)[\s\-]*(fee|charge)",
    r"(?i)(access|connection)[\s\-]*(fee|charge)",
];

pub const MOBILE: &[&str] = &[
    r"(?i)(line|device|equipment)[\s\-]*(fee|charge)",
    r"(?i)(activation|deactivation)[\s\-]*(fee|charge)",
    r"(?i)(data|usage|overage)[\s\-]*(fee|charge)",
    r"(?i)(roaming|international)[\s\-]*(fee|charge)",
    r"(?i)(911|emergency)[\s\-]*(fee|charge)",
];

pub const INTERNET: &[&str] = &[
    r"(?i)(modem|router|equipment)[\s\-]*(rental|lease|fee|charge)",
    r"(?i)(installation|setup)[\s\-]*(fee|charge)",
    r"(?i)(data|bandwidth|usage)[\s\-]*(fee|charge)",
    r"(?i)(network|infrastructure)[\s\-]*(fee|charge)",
];

pub const UTILITY: &[&str] = &[
    r"(?i)(meter|reading|service)[\s\-]*(fee|charge)",
    r"(?i)(delivery|transportation)[\s\-]*(fee|charge)",
    r"(?i)(environmental|green|renewable)[\s\-]*(fee|charge)",
    r"(?i)(fuel|energy|adjustment)[\s\-]*(fee|charge)",
];

pub const CREDIT_CARD: &[&str] = &[
    r"(?i)(annual|membership)[\s\-]*(fee|charge)",
    r"(?i)(cash[\s\-]*advance|balance[\s\-]*transfer)[\s\-]*(fee|charge)",
    r"(?i)(foreign[\s\-]*transaction|currency[\s\-]*conversion)[\s\-]*(fee|charge)",
    r"(?i)(over[\s\-]*limit|returned[\s\-]*payment)[\s\-]*(fee|charge)",
];

pub const CABLE_TV: &[&str] = &[
    r"(?i)(broadcast[\s\-]*tv|regional[\s\-]*sports)[\s\-]*(fee|charge|surcharge)",
    r"(?i)(hd[\s\-]*technology|dvr[\s\-]*service)[\s\-]*(fee|charge)",
    r"(?i)(set[\s\-]*top[\s\-]*box|receiver)[\s\-]*(rental|lease|fee|charge)",
];

pub const INSURANCE: &[&str] = &[
    r"(?i)policy[\s\-]*(fee|charge)",
    r"(?i)(installment|monthly[\s\-]*payment)[\s\-]*(fee|charge)",
    r"(?i)(underwriting|inspection)[\s\-]*(fee|charge)",
];

/// Every supported bill category.
pub const CATEGORIES: &[&str] = &[
    "mobile",
    "internet",
    "utility",
    "credit_card",
    "cable_tv",
    "insurance",
];

/// Phrases for the given bill category (general phrases always apply).
pub fn for_bill_type(bill_type: &str) -> &'static [&'static str] {
    match bill_type {
        "mobile" => MOBILE,
        "internet" => INTERNET,
        "utility" => UTILITY,
        "credit_card" => CREDIT_CARD,
        "cable_tv" => CABLE_TV,
        "insurance" => INSURANCE,
        _ => &[],
    }
}

/// Service provider names recognized in bill text.
pub const PROVIDER: &str = r"(?i)(AT&T|Verizon|T-Mobile|Sprint|Comcast|Xfinity|Spectrum|Cox|CenturyLink|Frontier|Optimum|PG&E|Duke Energy|DirecTV|Dish|State Farm|Allstate|Geico|Progressive|Anthem|Aetna)";

/// Dollar amount following a fee phrase.
pub const AMOUNT: &str = r"\$?(\d+\.\d{2})";

/// A provider add-on charge with a reputation.
pub struct KnownFee {
    pub provider: &'static str,
    pub name: &'static str,
    pub questionable: bool,
}

/// Known recurring add-on charges by provider.
pub const KNOWN_FEES: &[KnownFee] = &[
    KnownFee { provider: "AT&T", name: "Administrative Fee", questionable: true },
    KnownFee { provider: "AT&T", name: "Regulatory Cost Recovery Charge", questionable: true },
    KnownFee { provider: "AT&T", name: "Federal Universal Service Charge", questionable: false },
    KnownFee { provider: "Verizon", name: "Administrative Charge", questionable: true },
    KnownFee { provider: "Verizon", name: "Regulatory Charge", questionable: true },
    KnownFee { provider: "Comcast", name: "Broadcast TV Fee", questionable: true },
    KnownFee { provider: "Comcast", name: "Regional Sports Fee", questionable: true },
    KnownFee { provider: "Comcast", name: "Equipment Rental Fee", questionable: true },
    KnownFee { provider: "Spectrum", name: "Broadcast TV Surcharge", questionable: true },
    KnownFee { provider: "Spectrum", name: "WiFi Service Fee", questionable: true },
];

/// Keywords marking fees that commonly exist to pad revenue.
pub const QUESTIONABLE_KEYWORDS: &[&str] = &[
    "administrative",
    "admin",
    "regulatory",
    "recovery",
    "compliance",
    "maintenance",
    "paper",
    "billing",
    "statement",
    "convenience",
    "processing",
    "infrastructure",
];
