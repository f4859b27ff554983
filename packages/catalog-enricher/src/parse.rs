//! Split free-form generated text into content fields.
//!
//! A section starts at a heading line carrying the field's number and
//! heading keyword, in any of the shapes models produce:
//!
//! ```text
//! **1. Captivating Headline or Tagline:**
//! ## 2. Sensory Introduction
//! 3. Key Features or Ingredients (Bullet Points or Icons):
//! **4. How to Use:** Apply to clean skin.
//! ```
//!
//! The body runs to the next section heading of any field. Numbered lines
//! that are not section headings (how-to steps) stay in the body. Fields
//! without a recognisable marker are left out; that is not an error.

use std::collections::BTreeMap;

use regex::Regex;
use tracing::debug;

use crate::fields::ContentField;

#[derive(Debug, Clone, Copy)]
struct Heading {
    field: ContentField,
    start: usize,
    /// Start of the text following the heading keyword on the same line.
    rest: usize,
    end: usize,
}

/// Extract the requested text fields from `text`.
pub fn parse_sections(text: &str, fields: &[ContentField]) -> BTreeMap<ContentField, String> {
    let text = text.replace("\r\n", "\n");
    let headings = find_headings(&text);
    let mut parsed = BTreeMap::new();

    for field in fields.iter().copied().filter(|f| f.is_text()) {
        let body = section_body(&text, &headings, field).or_else(|| fallback_body(&text, &headings, field));
        match body {
            Some(body) => {
                parsed.insert(field, body);
            }
            None => debug!(field = %field, "No section found in generated text"),
        }
    }

    parsed
}

fn heading_pattern(field: ContentField) -> Option<Regex> {
    let number = field.section_number()?;
    let keyword = regex::escape(field.heading_keyword()?);
    Regex::new(&format!(
        r"(?im)^[ \t]*(?:#+[ \t]*)?(?:\*+[ \t]*)?{number}\.[ \t]*{keyword}(?P<rest>[^\n]*)$"
    ))
    .ok()
}

/// Every section heading in `text`, ordered by position.
fn find_headings(text: &str) -> Vec<Heading> {
    let mut headings: Vec<Heading> = ContentField::TEXT
        .into_iter()
        .filter_map(|field| heading_pattern(field).map(|re| (field, re)))
        .flat_map(|(field, re)| {
            re.captures_iter(text)
                .filter_map(|caps| {
                    let whole = caps.get(0)?;
                    let rest = caps.name("rest")?;
                    Some(Heading {
                        field,
                        start: whole.start(),
                        rest: rest.start(),
                        end: whole.end(),
                    })
                })
                .collect::<Vec<_>>()
        })
        .collect();
    headings.sort_by_key(|h| h.start);
    headings
}

fn section_body(text: &str, headings: &[Heading], field: ContentField) -> Option<String> {
    let (i, heading) = headings
        .iter()
        .enumerate()
        .find(|(_, h)| h.field == field)?;
    let stop = headings.get(i + 1).map_or(text.len(), |next| next.start);
    let rest = &text[heading.rest..heading.end];

    join_body(inline_text(rest), &text[heading.end..stop])
}

/// Text on the heading line after the label terminator.
fn inline_text(rest: &str) -> &str {
    if let Some((_, after)) = rest.split_once(':') {
        after.trim().trim_start_matches('*').trim()
    } else if let Some(pos) = rest.rfind("**") {
        rest[pos + 2..].trim()
    } else {
        ""
    }
}

/// Literal column header anywhere on a line, case-insensitive.
fn fallback_body(text: &str, headings: &[Heading], field: ContentField) -> Option<String> {
    let re = Regex::new(&format!(r"(?i){}(?P<rest>[^\n]*)", regex::escape(field.column()))).ok()?;
    let rest = re.captures(text)?.name("rest")?;

    let inline = rest
        .as_str()
        .trim()
        .trim_start_matches([':', '*'])
        .trim();

    let body_start = (rest.end() + 1).min(text.len());
    let stop = fallback_stop(text, headings, body_start);
    debug!(field = %field, "Using column-header fallback");
    join_body(inline, &text[body_start..stop])
}

fn fallback_stop(text: &str, headings: &[Heading], from: usize) -> usize {
    let next_heading = headings
        .iter()
        .map(|h| h.start)
        .find(|start| *start >= from)
        .unwrap_or(text.len());

    let next_marker = Regex::new(r"(?m)^[ \t]*(?:\d+\.|\*\*)")
        .ok()
        .and_then(|re| re.find_at(text, from).map(|m| m.start()))
        .unwrap_or(text.len());

    next_heading.min(next_marker)
}

fn join_body(inline: &str, body: &str) -> Option<String> {
    let body = body.trim();
    let joined = match (inline.is_empty(), body.is_empty()) {
        (true, true) => return None,
        (false, true) => inline.to_string(),
        (true, false) => body.to_string(),
        (false, false) => format!("{inline}\n{body}"),
    };
    Some(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = "\
**1. Captivating Headline or Tagline:**
Шепотът на нощта

**2. Sensory Introduction (1–2 sentences):**
Топъл аромат на ванилия.

**4. How to Use (Optional but useful):**
1. Нанесете върху китките.
2. Изчакайте да изсъхне.
";

    #[test]
    fn test_bold_headings() {
        let parsed = parse_sections(
            REPLY,
            &[
                ContentField::Headline,
                ContentField::SensoryIntro,
                ContentField::HowToUse,
            ],
        );

        assert_eq!(parsed[&ContentField::Headline], "Шепотът на нощта");
        assert_eq!(parsed[&ContentField::SensoryIntro], "Топъл аромат на ванилия.");
        assert_eq!(
            parsed[&ContentField::HowToUse],
            "1. Нанесете върху китките.\n2. Изчакайте да изсъхне."
        );
    }

    #[test]
    fn test_only_requested_fields_returned() {
        let parsed = parse_sections(REPLY, &[ContentField::SensoryIntro, ContentField::Video]);
        assert_eq!(parsed.len(), 1);
        assert!(parsed.contains_key(&ContentField::SensoryIntro));
    }

    #[test]
    fn test_missing_marker_is_left_out() {
        let parsed = parse_sections(REPLY, &[ContentField::TechSpecs, ContentField::Headline]);
        assert!(!parsed.contains_key(&ContentField::TechSpecs));
        assert!(parsed.contains_key(&ContentField::Headline));
    }

    #[test]
    fn test_inline_and_markdown_heading_shapes() {
        let text = "## 1. Captivating Headline\nBold & bright\n\n\
                    **5. Emotional or Lifestyle Hook:** For the fearless.\n\
                    6. Tech Specs or Product Facts:\n- 100 ml\n- France\r\n";
        let parsed = parse_sections(
            text,
            &[
                ContentField::Headline,
                ContentField::EmotionalHook,
                ContentField::TechSpecs,
            ],
        );

        assert_eq!(parsed[&ContentField::Headline], "Bold & bright");
        assert_eq!(parsed[&ContentField::EmotionalHook], "For the fearless.");
        assert_eq!(parsed[&ContentField::TechSpecs], "- 100 ml\n- France");
    }

    #[test]
    fn test_heading_match_is_case_insensitive() {
        let parsed = parse_sections("**1. CAPTIVATING HEADLINE:** Glow", &[ContentField::Headline]);
        assert_eq!(parsed[&ContentField::Headline], "Glow");
    }

    #[test]
    fn test_empty_body_rejected() {
        let text = "**1. Captivating Headline:**\n\n**2. Sensory Introduction:**\nSoft.";
        let parsed = parse_sections(text, &[ContentField::Headline, ContentField::SensoryIntro]);
        assert!(!parsed.contains_key(&ContentField::Headline));
        assert_eq!(parsed[&ContentField::SensoryIntro], "Soft.");
    }

    #[test]
    fn test_column_header_fallback() {
        // Number missing, so only the literal column header identifies it.
        let text = "Intro\nthe 6. tech specs or product facts are\n100 ml bottle\n**Other**\nignored";
        let parsed = parse_sections(text, &[ContentField::TechSpecs]);
        assert_eq!(parsed[&ContentField::TechSpecs], "are\n100 ml bottle");
    }

    #[test]
    fn test_column_header_fallback_after_non_ascii_text() {
        // Lowercasing İ changes its byte length; offsets must come from the original text.
        let parsed = parse_sections("İİİ 6. tech specs or product facts: 100 ml\n", &[ContentField::TechSpecs]);
        assert_eq!(parsed[&ContentField::TechSpecs], "100 ml");
    }
}
