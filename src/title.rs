//! Guest / school extraction from the free-text title sent by the tracking tool.
//!
//! Handled shapes:
//! - `Interview Jean Dupont - Sciences Po`
//! - `L'interro Sophie Martin (HEC)`
//! - `Interview Jean Dupont Sciences Po`
//! - `C'est quoi Pierre Durand`
//! - `Marc Lambert - École 42`

use once_cell::sync::Lazy;
use regex::Regex;

/// Two or more capitalized words ("Jean Dupont", "Émile Zola").
const NAME: &str = r"\p{Lu}\p{Ll}+(?:\s+\p{Lu}\p{Ll}+)+";
/// Same, but taking as few words as the rest of the pattern allows.
const NAME_SHORTEST: &str = r"\p{Lu}\p{Ll}+(?:\s+\p{Lu}\p{Ll}+)+?";
const LEAD_INS: &str = r"(?i:interview|l['’]interview|l['’]interro|c['’]est quoi|audrey t['’]explique)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    NameThenSeparator,
    LeadInNameSchool,
    NameAnywhere,
}

struct TitlePattern {
    rule: Rule,
    regex: Regex,
    has_school: bool,
}

static PATTERNS: Lazy<Vec<TitlePattern>> = Lazy::new(|| {
    let build = |rule, src: String, has_school| TitlePattern {
        rule,
        regex: Regex::new(&src).expect("title pattern compiles"),
        has_school,
    };
    vec![
        build(Rule::NameThenSeparator, format!(r"^(?:.*?\s)?({NAME})\s*[-–(]\s*([^)]+)"), true),
        build(Rule::LeadInNameSchool, format!(r"^{LEAD_INS}\s+({NAME_SHORTEST})\s+(.+)$"), true),
        build(Rule::NameAnywhere, format!(r"({NAME})"), false),
    ]
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTitle {
    pub guest: String,
    pub school: String,
}

/// Splits a title into guest and school. Never fails: when no rule applies the
/// whole (trimmed) title becomes the guest.
pub fn parse_title(title: &str) -> ParsedTitle {
    let title = title.trim();
    if title.is_empty() {
        return ParsedTitle::default();
    }

    for pattern in PATTERNS.iter() {
        let Some(caps) = pattern.regex.captures(title) else { continue };
        let guest = caps.get(1).map(|m| m.as_str().trim().to_string()).unwrap_or_default();
        let school = if pattern.has_school {
            caps.get(2)
                .map(|m| m.as_str().replace(['(', ')'], "").trim().to_string())
                .unwrap_or_default()
        } else {
            String::new()
        };
        tracing::debug!(rule = ?pattern.rule, %guest, %school, "title parsed");
        return ParsedTitle { guest, school };
    }

    tracing::debug!(%title, "no title rule matched, using title as guest");
    ParsedTitle { guest: title.to_string(), school: String::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(guest: &str, school: &str) -> ParsedTitle {
        ParsedTitle { guest: guest.into(), school: school.into() }
    }

    #[test]
    fn lead_in_then_name_then_school() {
        assert_eq!(parse_title("Interview Jean Dupont Sciences Po"), parsed("Jean Dupont", "Sciences Po"));
    }

    #[test]
    fn name_dash_school_with_accented_capital() {
        assert_eq!(parse_title("Marc Lambert - École 42"), parsed("Marc Lambert", "École 42"));
    }

    #[test]
    fn parenthesised_school_is_stripped() {
        assert_eq!(parse_title("L'interro Sophie Martin (HEC)"), parsed("Sophie Martin", "HEC"));
    }

    #[test]
    fn lead_in_prefix_before_separator() {
        assert_eq!(parse_title("Interview Jean Dupont - Sciences Po"), parsed("Jean Dupont", "Sciences Po"));
    }

    #[test]
    fn en_dash_separator() {
        assert_eq!(parse_title("Chloé Durand – ESSEC"), parsed("Chloé Durand", "ESSEC"));
    }

    #[test]
    fn name_only() {
        assert_eq!(parse_title("C'est quoi Pierre Durand"), parsed("Pierre Durand", ""));
    }

    #[test]
    fn curly_apostrophe_lead_in() {
        assert_eq!(parse_title("Audrey t’explique Léa Petit Sorbonne"), parsed("Léa Petit", "Sorbonne"));
    }

    #[test]
    fn no_match_keeps_trimmed_title() {
        assert_eq!(parse_title("  tournage plateau  "), parsed("tournage plateau", ""));
    }

    #[test]
    fn empty_and_blank_titles() {
        assert_eq!(parse_title(""), ParsedTitle::default());
        assert_eq!(parse_title("   "), ParsedTitle::default());
    }

    #[test]
    fn single_capitalized_word_is_not_a_name() {
        assert_eq!(parse_title("interview Dupont"), parsed("interview Dupont", ""));
    }
}
