//! Pre-compiled pattern tables for each discovery type.

use casedraft_core::DiscoveryKind;
use lazy_static::lazy_static;
use regex::Regex;

/// Pattern set driving section isolation and the structured pass for one
/// discovery type.
pub struct TypePatterns {
    /// Headings that open the substantive section
    pub headings: Vec<Regex>,
    /// Looser fallback used when no heading matches
    pub loose_heading: Regex,
    /// Structured item patterns, tried in order per line; group 1 is the
    /// number, group 2 the trailing text
    pub items: Vec<Regex>,
    /// Whether to keep only the longest contiguous numeric run
    pub longest_run: bool,
}

lazy_static! {
    static ref RFP_PATTERNS: TypePatterns = TypePatterns {
        headings: vec![
            Regex::new(r"(?im)^\s*(?:REQUESTS?|DEMANDS?)\s+FOR\s+(?:PRODUCTION|INSPECTION)").unwrap(),
        ],
        loose_heading: Regex::new(r"(?i)PRODUCTION").unwrap(),
        items: vec![
            Regex::new(r"(?i)^REQUEST\s+FOR\s+PRODUCTION\s+NO\.?\s*(\d+)\s*[.:]?\s*(.*)$").unwrap(),
            Regex::new(r"(?i)^DEMAND\s+FOR\s+PRODUCTION\s+NO\.?\s*(\d+)\s*[.:]?\s*(.*)$").unwrap(),
            Regex::new(r"(?i)^REQUEST\s+NO\.?\s*(\d+)\s*[.:]?\s*(.*)$").unwrap(),
        ],
        // Definitions sections tend to contain their own numbered lists;
        // the real requests form the longest consecutive run.
        longest_run: true,
    };

    static ref SPECIAL_ROG_PATTERNS: TypePatterns = TypePatterns {
        headings: vec![
            Regex::new(r"(?im)^\s*SPECIAL\s+INTERROGATOR(?:Y|IES)").unwrap(),
        ],
        loose_heading: Regex::new(r"(?i)INTERROGATOR").unwrap(),
        items: vec![
            Regex::new(r"(?i)^SPECIAL\s+INTERROGATORY\s+NO\.?\s*(\d+(?:\.\d+)?)\s*[.:]?\s*(.*)$").unwrap(),
            Regex::new(r"(?i)^INTERROGATORY\s+NO\.?\s*(\d+(?:\.\d+)?)\s*[.:]?\s*(.*)$").unwrap(),
        ],
        longest_run: false,
    };

    static ref FORM_ROG_PATTERNS: TypePatterns = TypePatterns {
        headings: vec![
            Regex::new(r"(?im)^\s*FORM\s+INTERROGATOR(?:Y|IES)").unwrap(),
        ],
        loose_heading: Regex::new(r"(?i)INTERROGATOR").unwrap(),
        items: vec![
            Regex::new(r"(?i)^FORM\s+INTERROGATORY\s+NO\.?\s*(\d+(?:\.\d+)?)\s*[.:]?\s*(.*)$").unwrap(),
            // Judicial Council forms list items as bare dotted numbers
            Regex::new(r"^(\d+\.\d+)\s+(.*)$").unwrap(),
        ],
        longest_run: false,
    };

    static ref RFA_PATTERNS: TypePatterns = TypePatterns {
        headings: vec![
            Regex::new(r"(?im)^\s*REQUESTS?\s+FOR\s+ADMISSIONS?").unwrap(),
        ],
        loose_heading: Regex::new(r"(?i)ADMISSION").unwrap(),
        items: vec![
            Regex::new(r"(?i)^REQUEST\s+FOR\s+ADMISSION\s+NO\.?\s*(\d+)\s*[.:]?\s*(.*)$").unwrap(),
            Regex::new(r"(?i)^ADMISSION\s+NO\.?\s*(\d+)\s*[.:]?\s*(.*)$").unwrap(),
        ],
        longest_run: false,
    };
}

/// Look up the pattern set for a discovery type.
pub fn patterns_for(kind: DiscoveryKind) -> &'static TypePatterns {
    match kind {
        DiscoveryKind::RequestsForProduction => &RFP_PATTERNS,
        DiscoveryKind::SpecialInterrogatories => &SPECIAL_ROG_PATTERNS,
        DiscoveryKind::FormInterrogatories => &FORM_ROG_PATTERNS,
        DiscoveryKind::RequestsForAdmission => &RFA_PATTERNS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfp_item_pattern_variants() {
        let patterns = patterns_for(DiscoveryKind::RequestsForProduction);
        for line in [
            "REQUEST FOR PRODUCTION NO. 1: All documents.",
            "Demand for Production No. 1. All documents.",
            "REQUEST NO.1: All documents.",
        ] {
            assert!(
                patterns.items.iter().any(|re| re.is_match(line)),
                "no pattern matched: {line}"
            );
        }
    }

    #[test]
    fn test_dotted_form_interrogatory_number() {
        let patterns = patterns_for(DiscoveryKind::FormInterrogatories);
        let caps = patterns.items[1].captures("6.4 State the name of each...").unwrap();
        assert_eq!(&caps[1], "6.4");
    }

    #[test]
    fn test_heading_is_line_anchored() {
        let patterns = patterns_for(DiscoveryKind::RequestsForProduction);
        let text = "preamble\nREQUESTS FOR PRODUCTION OF DOCUMENTS\nbody";
        assert!(patterns.headings[0].is_match(text));
    }
}
