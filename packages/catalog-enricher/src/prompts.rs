//! Prompts sent to the generative text service.
//!
//! Both prompts ask for numbered sections so [`crate::parse`] can split the
//! reply back into fields. Neither asks for links; media comes from search.

use crate::fields::ContentField;

const NO_LINKS: &str =
    "Do NOT include any image URLs or video links as I will handle those separately.";

/// Prompt for all six description sections of one product.
pub fn full_description_prompt(product: &str, language: &str) -> String {
    let mut prompt = format!(
        "Write a detailed product description for this beauty/perfume product in {language} \
         language following this structure:\n\n\
         Best Description Structure for Beauty & Perfume Products\n\n"
    );

    for field in ContentField::TEXT {
        push_section(&mut prompt, field, language);
    }

    prompt.push_str(&format!(
        "Product: {product}\n\n\
         Please write ONLY the product description in {language}, with each section \
         labeled by its numbered heading. {NO_LINKS}"
    ));
    prompt
}

/// Prompt for only the given text fields. Non-text fields are ignored.
pub fn missing_fields_prompt(product: &str, fields: &[ContentField], language: &str) -> String {
    let mut prompt = format!(
        "Generate content for this beauty/perfume product in {language} language: {product}\n\n\
         Please provide ONLY the following sections that are missing:\n\n"
    );

    for field in fields.iter().copied().filter(|f| f.is_text()) {
        push_section(&mut prompt, field, language);
    }

    prompt.push_str(&format!(
        "Please write each section clearly separated and labeled. \
         Write ONLY in {language} language.\n{NO_LINKS}\n"
    ));
    prompt
}

fn push_section(prompt: &mut String, field: ContentField, language: &str) {
    if let Some(instruction) = field.instruction(language) {
        prompt.push_str(&format!("**{}:**\n{instruction}\n\n", field.column()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_prompt_lists_only_requested_text_fields() {
        let prompt = missing_fields_prompt(
            "Coach Dreams (L) EDP 90ml",
            &[ContentField::Image2, ContentField::Headline, ContentField::TechSpecs],
            "Bulgarian",
        );

        assert!(prompt.contains("Coach Dreams (L) EDP 90ml"));
        assert!(prompt.contains("**1. Captivating Headline or Tagline:**"));
        assert!(prompt.contains("**6. Tech Specs or Product Facts:**"));
        assert!(!prompt.contains("Sensory Introduction"));
        assert!(!prompt.contains("Image 2"));
        assert!(prompt.contains("Do NOT include any image URLs or video links"));
    }

    #[test]
    fn test_full_description_prompt_has_every_section() {
        let prompt = full_description_prompt("Lalique Satine", "English");
        for field in ContentField::TEXT {
            assert!(prompt.contains(field.column()), "missing {}", field);
        }
        assert!(prompt.contains("in English"));
        assert!(prompt.contains("Product: Lalique Satine"));
    }
}
