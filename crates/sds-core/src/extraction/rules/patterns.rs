//! Regex construction for field rules.

use std::collections::HashSet;

use regex::Regex;

use super::ValueShape;

/// Marker that ends a section: the next `<digits>. ` heading or end of text.
pub const SECTION_END: &str = r"(?:\d+\. |\z)";

/// Start of a line or page, allowing indentation. Needs multi-line mode.
pub const LINE_START: &str = r"(?:^|\f)[ \t]*";

/// Optional numeric prefix of a section heading, e.g. `4. ` or `4 .`.
pub const HEADING_PREFIX: &str = r"(?:\d+\s*\.\s*)?";

/// Build the regex source for one label synonym.
///
/// The label is matched literally except that any run of whitespace inside
/// it accepts any run of whitespace in the text.
pub fn label_pattern(label: &str) -> String {
    let body = label
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");

    match label.trim_start().chars().next() {
        Some(c) if c.is_alphanumeric() => format!(r"\b{}", body),
        _ => body,
    }
}

/// Build an alternation over label synonyms, longest first so that a label
/// that is a prefix of another never shadows it.
pub fn label_alternation<S: AsRef<str>>(labels: &[S]) -> String {
    let mut labels: Vec<&str> = labels
        .iter()
        .map(|l| l.as_ref())
        .filter(|l| !l.trim().is_empty())
        .collect();
    labels.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    let mut seen = HashSet::new();
    labels.retain(|l| seen.insert(*l));

    let parts: Vec<String> = labels.into_iter().map(label_pattern).collect();
    format!("(?:{})", parts.join("|"))
}

/// Build the regex source for a rule. Capture group 1 holds the value.
pub fn rule_pattern<S: AsRef<str>>(labels: &[S], shape: ValueShape) -> String {
    let labels = label_alternation(labels);
    match shape {
        ValueShape::Line => format!(r"(?i){}\s*:\s*(.+)", labels),
        ValueShape::Digits => format!(r"(?i){}\s*:\s*(\d+)", labels),
        ValueShape::Section => format!(
            r"(?ims){}{}{}(.+?){}",
            LINE_START, HEADING_PREFIX, labels, SECTION_END
        ),
        ValueShape::Keyword => format!(
            r"(?is){}{}(.+?){}",
            HEADING_PREFIX, labels, SECTION_END
        ),
    }
}

/// Compile a rule.
pub fn compile_rule<S: AsRef<str>>(
    labels: &[S],
    shape: ValueShape,
) -> Result<Regex, regex::Error> {
    Regex::new(&rule_pattern(labels, shape))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_pattern_escapes_and_relaxes_whitespace() {
        assert_eq!(label_pattern("Nº ONU"), r"\bNº\s+ONU");
        assert_eq!(label_pattern("(UN) No."), r"\(UN\)\s+No\.");
    }

    #[test]
    fn test_alternation_prefers_longer_labels() {
        let alt = label_alternation(&["Classe", "Classe de risco"]);
        assert_eq!(alt, r"(?:\bClasse\s+de\s+risco|\bClasse)");
    }

    #[test]
    fn test_alternation_skips_blank_labels() {
        let alt = label_alternation(&["", "  ", "Classe"]);
        assert_eq!(alt, r"(?:\bClasse)");
    }

    #[test]
    fn test_line_rule_crosses_label_whitespace() {
        let re = compile_rule(&["Nome do produto"], ValueShape::Line).unwrap();
        let caps = re.captures("NOME   DO\tPRODUTO: Acetona").unwrap();
        assert_eq!(&caps[1], "Acetona");
    }

    #[test]
    fn test_section_heading_must_start_a_line() {
        let re = compile_rule(&["PRIMEIROS SOCORROS"], ValueShape::Section).unwrap();
        let text = "2. PERIGOS\nEm caso de exposição ver primeiros socorros\n3. COMPOSIÇÃO\n\
                    x\n  4. PRIMEIROS SOCORROS\nLavar os olhos.\n5. COMBATE";
        let caps = re.captures(text).unwrap();
        assert_eq!(caps[1].trim(), "Lavar os olhos.");
    }

    #[test]
    fn test_keyword_rule_matches_mid_line() {
        let re = compile_rule(&["FUGAS ACIDENTAIS"], ValueShape::Keyword).unwrap();
        let caps = re.captures("Em caso de fugas acidentais: conter.\n7. X").unwrap();
        assert_eq!(caps[1].trim(), ": conter.");
    }

    #[test]
    fn test_section_rule_stops_at_next_heading() {
        let re = compile_rule(&["PRIMEIROS SOCORROS"], ValueShape::Section).unwrap();
        let caps = re
            .captures("4. PRIMEIROS SOCORROS\nfoo bar\n5. MEDIDAS")
            .unwrap();
        assert_eq!(caps[1].trim(), "foo bar");
    }
}
