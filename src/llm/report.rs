//! Parsed grading report.
//!
//! The grader asks for five markdown sections but models vary in how they
//! mark them up (`## Strengths`, `1. **Strengths**:`, `**Overall Score**: 7/10`).
//! [`GradeReport::parse`] normalizes those into [`RubricSection`]s and
//! [`GradeReport::render`] always emits all five headings in rubric order.

use std::collections::HashMap;
use std::fmt;

/// Placeholder body for a section the model left out.
pub const MISSING_SECTION: &str = "_Not provided._";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RubricSection {
    Strengths,
    AreasForImprovement,
    RoleFit,
    Communication,
    Score,
}

impl RubricSection {
    /// Rubric order.
    pub const ALL: [RubricSection; 5] = [
        RubricSection::Strengths,
        RubricSection::AreasForImprovement,
        RubricSection::RoleFit,
        RubricSection::Communication,
        RubricSection::Score,
    ];

    pub fn heading(&self) -> &'static str {
        match self {
            RubricSection::Strengths => "Strengths",
            RubricSection::AreasForImprovement => "Areas for Improvement",
            RubricSection::RoleFit => "Role Fit",
            RubricSection::Communication => "Communication",
            RubricSection::Score => "Score",
        }
    }

    /// Lower-case heading spellings accepted by the parser.
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            RubricSection::Strengths => &["strengths", "strength"],
            RubricSection::AreasForImprovement => &[
                "areas for improvement",
                "improvement areas",
                "areas of improvement",
                "improvements",
            ],
            RubricSection::RoleFit => &["role fit", "technical/role fit", "technical fit"],
            RubricSection::Communication => &["communication"],
            RubricSection::Score => &["score", "overall score", "final score"],
        }
    }

    fn from_heading(text: &str) -> Option<Self> {
        let key = text.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|section| section.aliases().contains(&key.as_str()))
    }
}

impl fmt::Display for RubricSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}

// ---------------------------------------------------------------------------
// GradeReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradeReport {
    /// Text the model wrote before its first recognised heading.
    preamble: String,
    sections: HashMap<RubricSection, String>,
}

impl GradeReport {
    /// Split a model reply into rubric sections.  Text under an unrecognised
    /// heading stays with the section before it.
    pub fn parse(text: &str) -> Self {
        let mut report = GradeReport::default();
        let mut current: Option<RubricSection> = None;
        let mut preamble = Vec::new();
        let mut bodies: HashMap<RubricSection, Vec<String>> = HashMap::new();

        for line in text.lines() {
            if let Some((section, inline)) = match_heading(line) {
                current = Some(section);
                let body = bodies.entry(section).or_default();
                if !inline.is_empty() {
                    body.push(inline);
                }
                continue;
            }
            match current {
                Some(section) => bodies.entry(section).or_default().push(line.to_string()),
                None => preamble.push(line.to_string()),
            }
        }

        report.preamble = join_trimmed(&preamble);
        for (section, lines) in bodies {
            let body = join_trimmed(&lines);
            if !body.is_empty() {
                report.sections.insert(section, body);
            }
        }
        report
    }

    pub fn section(&self, section: RubricSection) -> Option<&str> {
        self.sections.get(&section).map(String::as_str)
    }

    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    /// Numeric score on the 1–10 scale, if the score section carries one.
    pub fn score(&self) -> Option<f32> {
        self.section(RubricSection::Score).and_then(extract_score)
    }

    /// Markdown with every rubric heading present, in rubric order.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.preamble.is_empty() {
            out.push_str(&self.preamble);
            out.push_str("\n\n");
        }
        for section in RubricSection::ALL {
            out.push_str("## ");
            out.push_str(section.heading());
            out.push_str("\n\n");
            out.push_str(self.section(section).unwrap_or(MISSING_SECTION));
            out.push_str("\n\n");
        }
        out.truncate(out.trim_end().len());
        out
    }
}

impl fmt::Display for GradeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Recognise a heading line, returning its section and any text that follows
/// the heading on the same line (`**Score**: 7/10` → `7/10`).
fn match_heading(line: &str) -> Option<(RubricSection, String)> {
    let mut s = line.trim();
    if s.is_empty() {
        return None;
    }
    s = s.trim_start_matches('#').trim_start();
    s = s.strip_prefix("- ").unwrap_or(s);
    // Numbering may sit inside or outside the emphasis: `**1. X:**`, `1. **X**`.
    s = strip_list_number(s.trim_start_matches(['*', '_']));
    s = s.trim_start_matches(['*', '_']);

    let (head, rest) = match s.split_once(':') {
        Some((head, rest)) => (head, rest),
        None => (s, ""),
    };
    let head: String = head.chars().filter(|c| !matches!(c, '*' | '_')).collect();
    let section = RubricSection::from_heading(&head)?;
    let inline = rest.trim().trim_start_matches(['*', '_']).trim().to_string();
    Some((section, inline))
}

/// `"3. Foo"` / `"3) Foo"` → `"Foo"`.
fn strip_list_number(s: &str) -> &str {
    let digits = s.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return s;
    }
    match s[digits..].strip_prefix(['.', ')']) {
        Some(rest) => rest.trim_start(),
        None => s,
    }
}

fn join_trimmed(lines: &[String]) -> String {
    lines.join("\n").trim().to_string()
}

/// Prefer an `N/10` form; otherwise take the first number in range.
fn extract_score(text: &str) -> Option<f32> {
    let numbers = numbers_with_tail(text);
    numbers
        .iter()
        .find(|(_, tail)| {
            let tail = tail.trim_start();
            tail.strip_prefix('/')
                .is_some_and(|t| t.trim_start().starts_with("10"))
        })
        .or_else(|| numbers.first())
        .map(|(n, _)| *n)
        .filter(|n| (0.0..=10.0).contains(n))
}

/// Every decimal number in `text` together with the text after it.
fn numbers_with_tail(text: &str) -> Vec<(f32, &str)> {
    let bytes = text.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i + 1 < bytes.len() && bytes[i] == b'.' && bytes[i + 1].is_ascii_digit() {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
        }
        if let Ok(n) = text[start..i].parse::<f32>() {
            found.push((n, &text[i..]));
        }
    }
    found
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const TYPICAL: &str = "\
Here is my evaluation.

1. **Strengths**: Structured approach.
Clear requirements gathering.

2. **Areas for Improvement**:
- Quantify trade-offs.

3. **Technical/Role Fit**: Solid.

4. **Communication**: Good pacing.

5. **Overall Score**: 7/10";

    #[test]
    fn parses_numbered_bold_headings() {
        let report = GradeReport::parse(TYPICAL);
        assert_eq!(report.preamble(), "Here is my evaluation.");
        assert_eq!(
            report.section(RubricSection::Strengths),
            Some("Structured approach.\nClear requirements gathering.")
        );
        assert_eq!(
            report.section(RubricSection::AreasForImprovement),
            Some("- Quantify trade-offs.")
        );
        assert_eq!(report.section(RubricSection::RoleFit), Some("Solid."));
        assert_eq!(report.score(), Some(7.0));
    }

    #[test]
    fn parses_markdown_headings() {
        let text = "## Strengths\nGood.\n\n## Communication\nClear.\n\n### Score\n8.5 / 10";
        let report = GradeReport::parse(text);
        assert_eq!(report.section(RubricSection::Strengths), Some("Good."));
        assert_eq!(report.section(RubricSection::Communication), Some("Clear."));
        assert_eq!(report.score(), Some(8.5));
    }

    #[test]
    fn render_always_has_all_five_headings() {
        let report = GradeReport::parse("## Strengths\nGood.");
        let rendered = report.render();
        for section in RubricSection::ALL {
            assert!(
                rendered.contains(&format!("## {}", section.heading())),
                "missing {section}"
            );
        }
        assert_eq!(rendered.matches(MISSING_SECTION).count(), 4);
    }

    #[test]
    fn render_keeps_rubric_order() {
        let text = "**Score**: 6\n**Strengths**: A\n**Communication**: B";
        let rendered = GradeReport::parse(text).render();
        let pos = |h: &str| rendered.find(h).unwrap();
        assert!(pos("## Strengths") < pos("## Areas for Improvement"));
        assert!(pos("## Communication") < pos("## Score"));
    }

    #[test]
    fn unstructured_reply_becomes_preamble() {
        let report = GradeReport::parse("The candidate did fine overall.");
        assert_eq!(report.preamble(), "The candidate did fine overall.");
        assert!(report.render().starts_with("The candidate did fine overall."));
        assert_eq!(report.score(), None);
    }

    #[test]
    fn score_prefers_out_of_ten_form() {
        let report = GradeReport::parse("## Score\nOn a 1-10 scale: 6/10");
        assert_eq!(report.score(), Some(6.0));
    }

    #[test]
    fn out_of_range_score_is_ignored() {
        let report = GradeReport::parse("## Score\n85");
        assert_eq!(report.score(), None);
    }

    #[test]
    fn parses_numbers_inside_bold_headings() {
        let text = "\
**1. Strengths:** Clear structure.

**2. Areas for Improvement:** Quantify.

**3. Role Fit:** Strong.

**4. Communication:** Concise.

**5. Score:** 7/10";
        let report = GradeReport::parse(text);
        assert_eq!(report.preamble(), "");
        assert_eq!(
            report.section(RubricSection::Strengths),
            Some("Clear structure.")
        );
        assert_eq!(
            report.section(RubricSection::AreasForImprovement),
            Some("Quantify.")
        );
        assert_eq!(report.section(RubricSection::Score), Some("7/10"));
        assert_eq!(report.score(), Some(7.0));
        assert!(!report.render().contains(MISSING_SECTION));
    }

    #[test]
    fn heading_match_is_exact_not_prefix() {
        assert!(match_heading("Strengthsfinder results").is_none());
        assert!(match_heading("Communication skills were weak.").is_none());
        assert_eq!(
            match_heading("- **Communication:** concise"),
            Some((RubricSection::Communication, "concise".to_string()))
        );
    }
}
