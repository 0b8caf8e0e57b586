//! LLM prompt for invoice field extraction

use invoicer_domain::{Chunk, Field};

/// Builds the extraction prompt from retrieved context
pub struct PromptBuilder {
    context: Vec<String>,
}

impl PromptBuilder {
    /// Create a new prompt builder from context passages
    pub fn new(context: Vec<String>) -> Self {
        Self { context }
    }

    /// Create a prompt builder from retrieved chunks, keeping their order
    pub fn from_chunks<'a>(chunks: impl IntoIterator<Item = &'a Chunk>) -> Self {
        Self::new(chunks.into_iter().map(|c| c.text.clone()).collect())
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str("Fields to extract (JSON object with these exact keys):\n");
        for field in Field::ALL {
            prompt.push_str("- ");
            prompt.push_str(field.name());
            prompt.push('\n');
        }
        prompt.push('\n');

        prompt.push_str(EXTRACTION_RULES);
        prompt.push_str("\n\n");

        prompt.push_str("Content (may contain OCR noise):\n");
        prompt.push_str(&self.context.join("\n\n"));
        prompt.push('\n');

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = "You are an invoice data extractor. Extract ONLY the requested fields from the content below.
If a field is not unambiguously present, return an empty string for it.";

const EXTRACTION_RULES: &str = r#"Rules:
- Output must be ONE single JSON object, with no extra text.
- Remove currency symbols (R$, $, etc.) and thousands separators; keep the decimal point.
- Dates in dd/mm/yyyy format when possible.
- "Description" must be the main description of the item or service (if there are several, concatenate them briefly).
- Numbers: use only digits and the decimal point (e.g. 1234.56).
- Email must be a valid address; phone number digits only (with country and area codes if present).
- Address on a single line."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_every_field_exactly() {
        let prompt = PromptBuilder::new(vec!["text".to_string()]).build();

        for field in Field::ALL {
            assert!(
                prompt.contains(&format!("- {}\n", field.name())),
                "missing field {}",
                field
            );
        }
    }

    #[test]
    fn test_prompt_rules() {
        let prompt = PromptBuilder::new(Vec::new()).build();

        assert!(prompt.contains("ONE single JSON object"));
        assert!(prompt.contains("dd/mm/yyyy"));
        assert!(prompt.contains("digits only"));
        assert!(prompt.contains("empty string"));
        assert!(prompt.contains("Remove currency symbols"));
    }

    #[test]
    fn test_context_joined_with_blank_line() {
        let prompt = PromptBuilder::new(vec!["first".to_string(), "second".to_string()]).build();
        assert!(prompt.contains("first\n\nsecond"));
        assert!(prompt.ends_with("second\n"));
    }

    #[test]
    fn test_empty_context_still_valid() {
        let prompt = PromptBuilder::new(Vec::new()).build();
        assert!(prompt.contains("Content (may contain OCR noise):\n"));
        assert!(prompt.contains("Invoice no."));
    }

    #[test]
    fn test_from_chunks_keeps_order() {
        let chunks = vec![
            Chunk { text: "B".to_string(), page: 2, index: 1, offset: 0 },
            Chunk { text: "A".to_string(), page: 1, index: 0, offset: 0 },
        ];
        let prompt = PromptBuilder::from_chunks(&chunks).build();
        assert!(prompt.contains("B\n\nA"));
    }
}
