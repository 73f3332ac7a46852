use std::{fmt::Display, sync::OnceLock};

use regex::Regex;
use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// e.g. `J70`
    Airway,
    /// SID or STAR base name, e.g. `HHOWE4`
    Procedure,
    /// waypoint or navaid
    Fix,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TokenKind::Airway => "airway",
            TokenKind::Procedure => "procedure",
            TokenKind::Fix => "fix",
        })
    }
}

fn airway_regex() -> &'static Regex {
    static AIRWAY_RE: OnceLock<Regex> = OnceLock::new();
    AIRWAY_RE.get_or_init(|| Regex::new(r"(?i)^[A-Z]\d+$").unwrap())
}

pub fn classify(token: &str) -> TokenKind {
    if airway_regex().is_match(token) {
        TokenKind::Airway
    } else if token.ends_with(|c: char| c.is_ascii_digit()) {
        TokenKind::Procedure
    } else {
        TokenKind::Fix
    }
}

/// Splits a route into tokens.
///
/// A composite SID code (`HHOWE4.LNCON`) in first position and a composite STAR
/// code (`BOBTA.TPGUN2`) in last position are split into their two parts, the
/// same as if they had been separated by whitespace. A missing half is kept as an
/// empty token, so `HHOWE4.` still reaches the SID with an empty transition.
pub fn tokenize(route: &str) -> Vec<&str> {
    let raw = route.split_whitespace().collect::<Vec<_>>();
    let last = raw.len().saturating_sub(1);

    raw.into_iter()
        .enumerate()
        .flat_map(|(i, token)| {
            let composite = token.split_once('.').filter(|(left, right)| {
                (i == 0 && classify(left) == TokenKind::Procedure)
                    || (i == last && classify(right) == TokenKind::Procedure)
            });
            match composite {
                Some((left, right)) => vec![left, right],
                None => vec![token],
            }
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::{classify, tokenize, TokenKind};

    #[test]
    fn test_classify() {
        assert_eq!(classify("J70"), TokenKind::Airway);
        assert_eq!(classify("Q480"), TokenKind::Airway);
        assert_eq!(classify("v16"), TokenKind::Airway);
        assert_eq!(classify("HHOWE4"), TokenKind::Procedure);
        assert_eq!(classify("TPGUN2"), TokenKind::Procedure);
        assert_eq!(classify("KZ1"), TokenKind::Procedure);
        assert_eq!(classify("HOXIE"), TokenKind::Fix);
        assert_eq!(classify("LVZ"), TokenKind::Fix);
        assert_eq!(classify("J"), TokenKind::Fix);
        assert_eq!(classify("4"), TokenKind::Procedure);
        assert_eq!(classify("HHOWE4.LNCON"), TokenKind::Fix);
        assert_eq!(classify(""), TokenKind::Fix);
    }

    #[test]
    fn test_classify_markers() {
        for kind in [TokenKind::Airway, TokenKind::Procedure, TokenKind::Fix] {
            let marker = kind.to_string();
            assert_eq!(classify(&marker), TokenKind::Fix);
            assert_eq!(classify(&classify(&marker).to_string()), TokenKind::Fix);
        }
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("  HOXIE J70\tLVZ \n"),
            vec!["HOXIE", "J70", "LVZ"]
        );
        assert_eq!(
            tokenize("HHOWE4.LNCON HOXIE J70 LVZ BOBTA.TPGUN2"),
            vec!["HHOWE4", "LNCON", "HOXIE", "J70", "LVZ", "BOBTA", "TPGUN2"]
        );
        assert_eq!(tokenize("BOBTA.TPGUN2"), vec!["BOBTA", "TPGUN2"]);
        // only procedure codes at either end are composite
        assert_eq!(
            tokenize("LNCON.HOXIE HOXIE.J70 LVZ"),
            vec!["LNCON.HOXIE", "HOXIE.J70", "LVZ"]
        );
        assert_eq!(tokenize("HHOWE4. HOXIE"), vec!["HHOWE4", "", "HOXIE"]);
        assert_eq!(tokenize("LVZ .TPGUN2"), vec!["LVZ", "", "TPGUN2"]);
        assert_eq!(tokenize("."), vec!["."]);
        assert!(tokenize("   ").is_empty());
    }
}
