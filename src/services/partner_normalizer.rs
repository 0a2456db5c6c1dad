use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{NormalizedPartner, PartnerAudit};

/// Inputs shorter than this skip the substring exclusion check. Short legitimate
/// names collide too easily with longer excluded phrases.
pub const SUBSTRING_EXCLUSION_MIN_LEN: usize = 20;

/// Cleaned names with more tokens than this read as descriptions, not entities.
pub const MAX_NAME_TOKENS: usize = 4;

/// Regulators, boilerplate, distributors, financing terms and standards bodies.
/// Matched against the lowercased, trimmed mention.
static EXCLUDED_PARTNERS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // Regulators and government
        "fda",
        "food and drug administration",
        "sec",
        "securities and exchange commission",
        "ftc",
        "federal trade commission",
        "doj",
        "department of justice",
        "dod",
        "department of defense",
        "department of energy",
        "cfius",
        "european commission",
        "u.s. government",
        "us government",
        "federal government",
        "government",
        "government agencies",
        "centers for medicare & medicaid services",
        "cms",
        // Generic boilerplate
        "customers",
        "key customers",
        "multiple customers",
        "enterprise customers",
        "partners",
        "various partners",
        "strategic partners",
        "ecosystem partners",
        "channel partners",
        "undisclosed",
        "undisclosed partner",
        "undisclosed customer",
        "not disclosed",
        "various",
        "none",
        "n/a",
        "suppliers",
        "vendors",
        "hyperscalers",
        "cloud providers",
        "system integrators",
        "oems",
        "resellers",
        "distributors",
        // Distributors, unless the filing calls them strategic
        "arrow electronics",
        "avnet",
        "ingram micro",
        "td synnex",
        "wpg holdings",
        // Financial and M&A terms
        "merger",
        "acquisition",
        "joint venture",
        "credit facility",
        "revolving credit facility",
        "term loan",
        "senior notes",
        "share repurchase",
        "bond offering",
        "underwriters",
        // Standards bodies
        "ieee",
        "jedec",
        "pci-sig",
        "3gpp",
        "w3c",
        "international organization for standardization",
    ]
    .into_iter()
    .collect()
});

/// Lowercased alias -> canonical name
static PARTNER_ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("microsoft", "Microsoft"),
        ("msft", "Microsoft"),
        ("microsoft corp", "Microsoft"),
        ("microsoft corp.", "Microsoft"),
        ("microsoft corporation", "Microsoft"),
        ("microsoft azure", "Microsoft"),
        ("azure", "Microsoft"),
        ("nvidia", "NVIDIA"),
        ("nvda", "NVIDIA"),
        ("nvidia corp", "NVIDIA"),
        ("nvidia corporation", "NVIDIA"),
        ("openai", "OpenAI"),
        ("open ai", "OpenAI"),
        ("anthropic", "Anthropic"),
        ("xai", "xAI"),
        ("x.ai", "xAI"),
        ("mistral", "Mistral AI"),
        ("mistral ai", "Mistral AI"),
        ("amazon", "Amazon"),
        ("amazon.com", "Amazon"),
        ("amzn", "Amazon"),
        ("aws", "Amazon Web Services"),
        ("amazon web services", "Amazon Web Services"),
        ("google", "Google"),
        ("alphabet", "Google"),
        ("googl", "Google"),
        ("google cloud", "Google"),
        ("gcp", "Google"),
        ("meta", "Meta"),
        ("meta platforms", "Meta"),
        ("facebook", "Meta"),
        ("apple", "Apple"),
        ("apple inc", "Apple"),
        ("oracle", "Oracle"),
        ("oracle corp", "Oracle"),
        ("oracle corporation", "Oracle"),
        ("oci", "Oracle"),
        ("ibm", "IBM"),
        ("international business machines", "IBM"),
        ("intel", "Intel"),
        ("intel corp", "Intel"),
        ("amd", "AMD"),
        ("advanced micro devices", "AMD"),
        ("broadcom", "Broadcom"),
        ("avgo", "Broadcom"),
        ("qualcomm", "Qualcomm"),
        ("arm", "Arm"),
        ("arm holdings", "Arm"),
        ("tsmc", "TSMC"),
        ("taiwan semiconductor", "TSMC"),
        ("taiwan semiconductor manufacturing", "TSMC"),
        ("taiwan semiconductor manufacturing company", "TSMC"),
        ("samsung", "Samsung"),
        ("samsung electronics", "Samsung"),
        ("sk hynix", "SK Hynix"),
        ("hynix", "SK Hynix"),
        ("micron", "Micron"),
        ("micron technology", "Micron"),
        ("asml", "ASML"),
        ("foxconn", "Foxconn"),
        ("hon hai", "Foxconn"),
        ("dell", "Dell"),
        ("dell technologies", "Dell"),
        ("hpe", "HPE"),
        ("hewlett packard enterprise", "HPE"),
        ("cisco", "Cisco"),
        ("cisco systems", "Cisco"),
        ("salesforce", "Salesforce"),
        ("sap", "SAP"),
        ("sap se", "SAP"),
        ("servicenow", "ServiceNow"),
        ("snowflake", "Snowflake"),
        ("databricks", "Databricks"),
        ("palantir", "Palantir"),
        ("coreweave", "CoreWeave"),
        ("accenture", "Accenture"),
    ]
    .into_iter()
    .collect()
});

/// Leading action words that mark a description rather than a counterparty
const DESCRIPTION_PREFIXES: [&str; 6] = ["pending", "continued", "enhanced", "expanded", "new", "ongoing"];

static PARENTHETICAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)").expect("valid parenthetical regex"));

static LEGAL_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[\s,]+(inc|corp|corporation|llc|ltd|plc|ag|nv|n\.v|sa|s\.a|limited)\.?$")
        .expect("valid legal suffix regex")
});

static DEAL_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+(collaborations?|partnerships?|deals?|agreements?|acquisitions?|transactions?)$")
        .expect("valid deal suffix regex")
});

/// Map a raw partner mention to its canonical company name, or `None` when the
/// mention is noise. Pure and deterministic.
pub fn normalize_partner_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let lower = trimmed.to_lowercase();

    if lower.is_empty() || EXCLUDED_PARTNERS.contains(lower.as_str()) {
        return None;
    }

    if lower.chars().count() >= SUBSTRING_EXCLUSION_MIN_LEN
        && EXCLUDED_PARTNERS
            .iter()
            .any(|term| lower.contains(term) || term.contains(lower.as_str()))
    {
        return None;
    }

    if let Some(canonical) = PARTNER_ALIASES.get(lower.as_str()) {
        return Some((*canonical).to_string());
    }

    let cleaned = strip_decorations(trimmed);

    if cleaned.split_whitespace().count() > MAX_NAME_TOKENS {
        return None;
    }

    let starts_with_description = cleaned
        .split_whitespace()
        .next()
        .map(|first| DESCRIPTION_PREFIXES.contains(&first.to_lowercase().as_str()))
        .unwrap_or(false);
    if starts_with_description {
        return None;
    }

    if cleaned.is_empty() {
        return None;
    }

    // cleanup can expose a known alias ("Nvidia Inc." -> "nvidia")
    match PARTNER_ALIASES.get(cleaned.to_lowercase().as_str()) {
        Some(canonical) => Some((*canonical).to_string()),
        None => Some(cleaned),
    }
}

/// Remove parenthetical asides, then legal and deal-descriptor suffixes until
/// none remain ("Acme Corp. deal" -> "Acme").
fn strip_decorations(name: &str) -> String {
    let mut current = PARENTHETICAL_RE.replace_all(name, "").trim().to_string();
    loop {
        let without_deal = DEAL_SUFFIX_RE.replace(&current, "");
        let without_legal = LEGAL_SUFFIX_RE.replace(without_deal.trim(), "");
        let next = without_legal.trim().trim_end_matches(',').trim().to_string();
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Normalize a batch of raw mentions and summarize what survived.
pub fn audit_partner_names(names: &[String]) -> PartnerAudit {
    let results: Vec<NormalizedPartner> = names
        .iter()
        .map(|raw| NormalizedPartner {
            raw: raw.clone(),
            canonical: normalize_partner_name(raw),
        })
        .collect();

    let kept = results.iter().filter(|r| r.canonical.is_some()).count();
    let canonical_names: BTreeSet<String> = results
        .iter()
        .filter_map(|r| r.canonical.clone())
        .collect();

    PartnerAudit {
        discarded: results.len() - kept,
        kept,
        canonical_names: canonical_names.into_iter().collect(),
        results,
    }
}
