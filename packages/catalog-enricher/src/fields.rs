//! The fixed set of content fields a catalog row carries.
//!
//! Field order matters: [`ContentField::ALL`] lists image slots 1–5, the
//! video slot, then the six numbered marketing sections. Everything that
//! talks about "ascending field order" means this order.

use std::fmt;

use serde::{Serialize, Serializer};

/// Identity column holding the stable product identifier.
pub const ID_COLUMN: &str = "ID";

/// Identity column holding the brand.
pub const BRAND_COLUMN: &str = "Brand";

/// Identity column holding the product line / name.
pub const LINE_COLUMN: &str = "Line";

/// What kind of content a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Image,
    Video,
    Text,
}

/// One of the twelve enriched columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentField {
    Image1,
    Image2,
    Image3,
    Image4,
    Image5,
    Video,
    Headline,
    SensoryIntro,
    KeyFeatures,
    HowToUse,
    EmotionalHook,
    TechSpecs,
}

impl ContentField {
    pub const ALL: [ContentField; 12] = [
        ContentField::Image1,
        ContentField::Image2,
        ContentField::Image3,
        ContentField::Image4,
        ContentField::Image5,
        ContentField::Video,
        ContentField::Headline,
        ContentField::SensoryIntro,
        ContentField::KeyFeatures,
        ContentField::HowToUse,
        ContentField::EmotionalHook,
        ContentField::TechSpecs,
    ];

    pub const IMAGES: [ContentField; 5] = [
        ContentField::Image1,
        ContentField::Image2,
        ContentField::Image3,
        ContentField::Image4,
        ContentField::Image5,
    ];

    pub const TEXT: [ContentField; 6] = [
        ContentField::Headline,
        ContentField::SensoryIntro,
        ContentField::KeyFeatures,
        ContentField::HowToUse,
        ContentField::EmotionalHook,
        ContentField::TechSpecs,
    ];

    /// Exact column header used by the catalog spreadsheet.
    pub fn column(self) -> &'static str {
        match self {
            ContentField::Image1 => "Image 1",
            ContentField::Image2 => "Image 2",
            ContentField::Image3 => "Image 3",
            ContentField::Image4 => "Image 4",
            ContentField::Image5 => "Image 5",
            ContentField::Video => "Video",
            ContentField::Headline => "1. Captivating Headline or Tagline",
            ContentField::SensoryIntro => "2. Sensory Introduction (1–2 sentences)",
            ContentField::KeyFeatures => "3. Key Features or Ingredients (Bullet Points or Icons)",
            ContentField::HowToUse => "4. How to Use (Optional but useful)",
            ContentField::EmotionalHook => "5. Emotional or Lifestyle Hook",
            ContentField::TechSpecs => "6. Tech Specs or Product Facts",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            ContentField::Image1
            | ContentField::Image2
            | ContentField::Image3
            | ContentField::Image4
            | ContentField::Image5 => FieldKind::Image,
            ContentField::Video => FieldKind::Video,
            _ => FieldKind::Text,
        }
    }

    pub fn is_text(self) -> bool {
        self.kind() == FieldKind::Text
    }

    pub fn is_image(self) -> bool {
        self.kind() == FieldKind::Image
    }

    /// 1-based image slot, for image fields.
    pub fn image_slot(self) -> Option<usize> {
        Self::IMAGES.iter().position(|f| *f == self).map(|i| i + 1)
    }

    /// Image field for a 1-based slot.
    pub fn image(slot: usize) -> Option<ContentField> {
        slot.checked_sub(1).and_then(|i| Self::IMAGES.get(i).copied())
    }

    /// Section number (1–6) of a marketing text field.
    pub fn section_number(self) -> Option<usize> {
        Self::TEXT.iter().position(|f| *f == self).map(|i| i + 1)
    }

    /// Short heading used as the section marker in generated text.
    ///
    /// Generated headings often drop the parenthetical of the column name,
    /// so matching keys on this prefix rather than the full header.
    pub fn heading_keyword(self) -> Option<&'static str> {
        match self {
            ContentField::Headline => Some("Captivating Headline"),
            ContentField::SensoryIntro => Some("Sensory Introduction"),
            ContentField::KeyFeatures => Some("Key Features"),
            ContentField::HowToUse => Some("How to Use"),
            ContentField::EmotionalHook => Some("Emotional or Lifestyle Hook"),
            ContentField::TechSpecs => Some("Tech Specs"),
            _ => None,
        }
    }

    /// Writing instruction for a text field, phrased for `language`.
    pub fn instruction(self, language: &str) -> Option<String> {
        let text = match self {
            ContentField::Headline => format!(
                "Write a brief, poetic or powerful phrase that evokes the essence of the product in {language}."
            ),
            ContentField::SensoryIntro => format!(
                "Describe the experience of using the product, focusing on the feel, scent, effect, or vibe in {language} (1-2 sentences)."
            ),
            ContentField::KeyFeatures => format!(
                "Present the top 4–6 features as bullet points, focusing on performance, quality, and what sets it apart in {language}."
            ),
            ContentField::HowToUse => format!("Provide simple step-by-step instructions in {language}."),
            ContentField::EmotionalHook => format!(
                "Show the identity or vibe the user taps into by using this product in {language}."
            ),
            ContentField::TechSpecs => format!(
                "Include size/volume, longevity, origin, certifications in {language}."
            ),
            _ => return None,
        };
        Some(text)
    }

    /// Look a field up by its column header.
    pub fn from_column(column: &str) -> Option<ContentField> {
        let column = column.trim();
        Self::ALL.iter().copied().find(|f| f.column() == column)
    }
}

impl fmt::Display for ContentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Serialized as the column header.
impl Serialize for ContentField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.column())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_field_order() {
        let mut sorted = ContentField::ALL;
        sorted.sort();
        assert_eq!(sorted, ContentField::ALL);
        assert_eq!(ContentField::ALL.len(), 12);
    }

    #[test]
    fn test_image_slots_round_trip() {
        for slot in 1..=5 {
            let field = ContentField::image(slot).unwrap();
            assert_eq!(field.image_slot(), Some(slot));
            assert!(field.is_image());
        }
        assert_eq!(ContentField::image(0), None);
        assert_eq!(ContentField::image(6), None);
        assert_eq!(ContentField::Video.image_slot(), None);
    }

    #[test]
    fn test_text_fields_have_prompt_metadata() {
        for field in ContentField::TEXT {
            assert!(field.is_text());
            assert!(field.heading_keyword().is_some());
            assert!(field.instruction("Bulgarian").unwrap().contains("Bulgarian"));
            let n = field.section_number().unwrap();
            assert!(field.column().starts_with(&format!("{}.", n)));
        }
        assert!(ContentField::Video.instruction("Bulgarian").is_none());
    }

    #[test]
    fn test_from_column() {
        assert_eq!(ContentField::from_column(" Image 4 "), Some(ContentField::Image4));
        assert_eq!(
            ContentField::from_column("6. Tech Specs or Product Facts"),
            Some(ContentField::TechSpecs)
        );
        assert_eq!(ContentField::from_column("Price"), None);
    }

    #[test]
    fn test_serializes_as_column_header() {
        let json = serde_json::to_string(&[ContentField::Image2, ContentField::HowToUse]).unwrap();
        assert_eq!(json, r#"["Image 2","4. How to Use (Optional but useful)"]"#);
    }
}
