//! Prompt construction for template and agent extraction flows

use crate::types::{AgentProfile, DocumentType, Template};

const GENERAL_PROMPT: &str = "Analyze this document and extract all relevant information. Return the data as a clean JSON object with descriptive field names. Focus on:
- Text content (both typed and handwritten)
- Names, dates, numbers, addresses
- Any structured data like tables or forms
- Key-value pairs and labeled information

Please ensure all text is accurately transcribed, including handwritten content.";

const HANDWRITTEN_PROMPT: &str = "This document contains handwritten text. Please carefully analyze and transcribe all handwritten content with high accuracy. Pay special attention to:
- Cursive and printed handwriting
- Numbers and dates
- Names and signatures
- Form fields that are filled in by hand

Return the extracted data as a JSON object with clear field names representing the handwritten content.";

const INVOICE_PROMPT: &str = "This is an invoice or receipt document. Extract the following information and return as JSON:
- vendor_name: Company/vendor name
- invoice_number: Invoice or receipt number
- date: Invoice date
- due_date: Due date (if present)
- total_amount: Total amount
- subtotal: Subtotal (if present)
- tax_amount: Tax amount
- currency: Currency
- items: List of line items with description, quantity, unit_price
- customer_info: Customer name and address
- vendor_address: Vendor address

Ensure all monetary values are extracted as numbers.";

const FORM_PROMPT: &str = "This document appears to be a form with labeled fields. Extract all filled-in information and return as JSON. Focus on:
- Field labels and their corresponding values
- Checkboxes and their states (checked/unchecked)
- Dropdown selections
- Text areas and input fields
- Dates, signatures, and stamps

Structure the JSON with field labels as keys and filled values as values.";

/// The predefined prompt text for a document classification.
pub fn predefined_prompt(document_type: DocumentType) -> &'static str {
    match document_type {
        DocumentType::General => GENERAL_PROMPT,
        DocumentType::Handwritten => HANDWRITTEN_PROMPT,
        DocumentType::Invoice => INVOICE_PROMPT,
        DocumentType::Form => FORM_PROMPT,
    }
}

/// Build the full prompt for a template run.
///
/// A non-empty custom prompt replaces the predefined text. Field mappings
/// append a hint block in mapping order, and the prompt always closes with
/// the JSON-only instruction.
pub fn build_template_prompt(template: &Template) -> String {
    let base = match &template.custom_prompt {
        Some(text) if !text.trim().is_empty() => text.as_str(),
        _ => predefined_prompt(template.document_type),
    };

    let mut prompt = base.to_string();
    if !template.mappings.is_empty() {
        prompt.push_str("\n\nPlease ensure the JSON contains these specific fields:");
        for mapping in &template.mappings {
            prompt.push_str("\n- ");
            prompt.push_str(&mapping.label);
            if let Some(example) = &mapping.example {
                prompt.push_str(" (example: ");
                prompt.push_str(example);
                prompt.push(')');
            }
        }
    }
    prompt.push_str("\n\nReturn only valid JSON format.");
    prompt
}

/// Build the prompt for an agent run over one attachment.
///
/// Exactly one of three shapes is produced, in precedence order:
/// document-extraction specialist, the agent's own system prompt, or a
/// basic analysis prompt. `inline_content` carries indexed text when the
/// attachment cannot be sent as a binary payload.
pub fn build_agent_prompt(
    agent: &AgentProfile,
    context_label: &str,
    filename: &str,
    inline_content: Option<&str>,
) -> String {
    if agent.document_extraction {
        let mut prompt = format!(
            "You are a professional data extraction specialist working with an enterprise records system.\n\n{context_label}\n\nDocument: {filename}"
        );
        if let Some(content) = inline_content {
            prompt.push_str("\n\nDocument content:\n");
            prompt.push_str(content);
        }
        prompt.push_str(
            "\n\nPlease analyze this document and extract structured information in JSON format that would be relevant for this record.\n\nRequirements:\n- Return ONLY valid JSON format\n- Use descriptive field names that could map to record fields\n- Group related information logically\n- If information is not found, use null or empty values\n- Focus on data that would be useful for the specified model\n\nExtract key information such as:\n- Document metadata (type, title, date, etc.)\n- Contact information (names, emails, phones, addresses)\n- Financial data (amounts, dates, currencies)\n- Any structured data relevant to the model\n- Main content summary",
        );
        prompt
    } else if let Some(system) = agent.system_prompt.as_deref().filter(|s| !s.trim().is_empty()) {
        let mut prompt = format!("{system}\n\n{context_label}\n\nDocument: {filename}");
        if let Some(content) = inline_content {
            prompt.push_str("\n\nDocument content:\n");
            prompt.push_str(content);
        }
        prompt
    } else {
        let mut prompt = format!(
            "Extract information from this document: {filename}\n\nContext: {context_label}"
        );
        if let Some(content) = inline_content {
            prompt.push_str("\n\nDocument content:\n");
            prompt.push_str(content);
        }
        prompt.push_str(
            "\n\nPlease extract relevant information and return it in a clear and structured format.",
        );
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldKind, FieldMapping};

    fn template_with(custom: Option<&str>, mappings: Vec<FieldMapping>) -> Template {
        Template {
            name: "t".into(),
            target_model: "expense".into(),
            document_type: DocumentType::Invoice,
            model: "gemini-2.0-flash".into(),
            custom_prompt: custom.map(String::from),
            mappings,
        }
    }

    fn mapping(label: &str, example: Option<&str>) -> FieldMapping {
        FieldMapping {
            label: label.into(),
            target_field: None,
            kind: FieldKind::Simple,
            example: example.map(String::from),
            default_value: None,
        }
    }

    #[test]
    fn test_custom_prompt_takes_precedence() {
        let template = template_with(Some("Read the receipt."), vec![]);
        let prompt = build_template_prompt(&template);
        assert!(prompt.starts_with("Read the receipt."));
        assert!(!prompt.contains("invoice or receipt document"));
    }

    #[test]
    fn test_blank_custom_prompt_falls_back_to_predefined() {
        let template = template_with(Some("   "), vec![]);
        let prompt = build_template_prompt(&template);
        assert!(prompt.starts_with("This is an invoice or receipt document."));
    }

    #[test]
    fn test_field_hints_in_mapping_order() {
        let template = template_with(
            None,
            vec![
                mapping("total_amount", Some("123.45")),
                mapping("vendor_name", None),
            ],
        );
        let prompt = build_template_prompt(&template);
        let hints = prompt
            .find("Please ensure the JSON contains these specific fields:")
            .unwrap();
        let total = prompt.find("- total_amount (example: 123.45)").unwrap();
        let vendor = prompt.find("- vendor_name").unwrap();
        assert!(hints < total && total < vendor);
        assert!(prompt.ends_with("Return only valid JSON format."));
    }

    #[test]
    fn test_no_hint_block_without_mappings() {
        let template = template_with(None, vec![]);
        let prompt = build_template_prompt(&template);
        assert!(!prompt.contains("specific fields"));
        assert!(prompt.ends_with("Return only valid JSON format."));
    }

    #[test]
    fn test_agent_prompt_shapes() {
        let mut agent = AgentProfile {
            name: "a".into(),
            model: "gpt-4o".into(),
            document_extraction: true,
            system_prompt: Some("You are terse.".into()),
        };

        // Document-extraction wins over the system prompt.
        let prompt = build_agent_prompt(&agent, "expense", "scan.pdf", None);
        assert!(prompt.starts_with("You are a professional data extraction specialist"));
        assert!(prompt.contains("Document: scan.pdf"));
        assert!(!prompt.contains("You are terse."));

        agent.document_extraction = false;
        let prompt = build_agent_prompt(&agent, "expense", "scan.pdf", Some("hello"));
        assert!(prompt.starts_with("You are terse."));
        assert!(prompt.contains("Document content:\nhello"));

        agent.system_prompt = None;
        let prompt = build_agent_prompt(&agent, "expense", "scan.pdf", None);
        assert!(prompt.starts_with("Extract information from this document: scan.pdf"));
        assert!(prompt.contains("Context: expense"));
    }
}
