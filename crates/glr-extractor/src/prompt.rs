//! Prompt construction for the two model calls

use glr_domain::traits::CompletionRequest;
use glr_domain::{ExtractedData, ExtractionField};
use serde_json::{Map, Value};

/// Builds the field-extraction request (model call #1)
pub struct ExtractionPromptBuilder<'a> {
    report_text: &'a str,
    fields: &'a [ExtractionField],
}

impl<'a> ExtractionPromptBuilder<'a> {
    /// Create a builder over the combined evidence text
    pub fn new(report_text: &'a str) -> Self {
        Self {
            report_text,
            fields: &ExtractionField::ALL,
        }
    }

    /// Restrict the keys the model is asked for
    pub fn with_fields(mut self, fields: &'a [ExtractionField]) -> Self {
        self.fields = fields;
        self
    }

    /// System prompt naming every requested key and the value rules
    pub fn system_prompt(&self) -> String {
        let fields_list = self
            .fields
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let mut prompt = String::new();
        prompt.push_str(EXTRACTION_ROLE);
        prompt.push_str(&format!(
            "You MUST output a single JSON object with exactly these string keys:\n{}\n\n",
            fields_list
        ));
        prompt.push_str(EXTRACTION_RULES);
        prompt
    }

    /// User prompt carrying the report text
    pub fn user_prompt(&self) -> String {
        format!(
            "### REPORT TEXT ###\n{}\n\nNow output ONLY the JSON object described in the instructions.",
            self.report_text
        )
    }

    /// Build the request in JSON-object response mode
    pub fn build(&self, temperature: f32) -> CompletionRequest {
        CompletionRequest::new(self.system_prompt(), self.user_prompt(), temperature).json_object()
    }
}

const EXTRACTION_ROLE: &str = "You are an insurance-claims information-extraction engine.\n\
Your job is to build a structured JSON object capturing ALL relevant details.\n";

const EXTRACTION_RULES: &str = r#"STRICT RULES ABOUT VALUES:
1. Every non-empty value MUST be an exact contiguous substring of the REPORT TEXT.
2. If multiple candidates exist, choose the best one, but copy it exactly.
3. NEVER return 'N/A' or invented values in the JSON. Use empty string "" if not found.
"#;

/// Builds the template rewrite request (model call #2)
pub struct ReportPromptBuilder<'a> {
    template_text: &'a str,
    data: &'a ExtractedData,
}

impl<'a> ReportPromptBuilder<'a> {
    /// Create a builder over the template text and extracted data
    pub fn new(template_text: &'a str, data: &'a ExtractedData) -> Self {
        Self { template_text, data }
    }

    /// User prompt: the data as pretty JSON, then the template
    pub fn user_prompt(&self) -> String {
        format!(
            "### EXTRACTED DATA (JSON) ###\n{}\n\n\
             ### GENERAL LOSS REPORT TEMPLATE TEXT ###\n{}\n\n\
             Return the FINAL completed General Loss Report as plain text.",
            data_to_json(self.data),
            self.template_text
        )
    }

    /// Build the request in plain-text mode
    pub fn build(&self, temperature: f32) -> CompletionRequest {
        CompletionRequest::new(REPORT_INSTRUCTIONS, self.user_prompt(), temperature)
    }
}

const REPORT_INSTRUCTIONS: &str = "You are an experienced field adjuster writing a final 'General Loss Report'.\n\
Transform the TEMPLATE into a FINAL completed report using the JSON object.\n\
- Replace placeholders like [DATE_LOSS], [INSURED_NAME] with exact JSON values.\n\
- Use *_NARRATIVE fields to write the full narrative sections.\n\
- Do not ignore non-empty JSON fields.\n\
- Output plain text only.";

/// Render extracted data as pretty JSON, `NotFound` as `""`
pub fn data_to_json(data: &ExtractedData) -> String {
    let map: Map<String, Value> = data
        .iter()
        .map(|(field, value)| (field.as_str().to_string(), Value::String(value.as_wire_str().to_string())))
        .collect();
    serde_json::to_string_pretty(&Value::Object(map)).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glr_domain::traits::ResponseFormat;
    use glr_domain::FieldValue;

    #[test]
    fn test_extraction_prompt_names_every_field() {
        let builder = ExtractionPromptBuilder::new("text");
        let system = builder.system_prompt();
        for field in ExtractionField::ALL {
            assert!(system.contains(field.as_str()), "missing {}", field);
        }
        assert!(system.contains("exact contiguous substring"));
        assert!(system.contains("NEVER return 'N/A'"));
    }

    #[test]
    fn test_extraction_prompt_field_subset() {
        let fields = [ExtractionField::ClaimNumber];
        let system = ExtractionPromptBuilder::new("text").with_fields(&fields).system_prompt();
        assert!(system.contains("CLAIM_NUMBER"));
        assert!(!system.contains("INSURED_NAME"));
    }

    #[test]
    fn test_extraction_request_shape() {
        let request = ExtractionPromptBuilder::new("=== REPORT: a.pdf | PAGE 1 ===\nJane Doe").build(0.0);
        assert_eq!(request.temperature, 0.0);
        assert_eq!(request.response_format, ResponseFormat::JsonObject);
        assert!(request.user.contains("### REPORT TEXT ###"));
        assert!(request.user.contains("Jane Doe"));
    }

    #[test]
    fn test_report_request_shape() {
        let mut data = ExtractedData::not_found();
        data.set(ExtractionField::InsuredName, FieldValue::from_text("Jane Doe"));

        let request = ReportPromptBuilder::new("Insured: [INSURED_NAME]", &data).build(0.1);
        assert_eq!(request.response_format, ResponseFormat::Text);
        assert!(request.system.contains("field adjuster"));
        assert!(request.user.contains("\"INSURED_NAME\": \"Jane Doe\""));
        assert!(request.user.contains("\"CLAIM_NUMBER\": \"\""));
        assert!(request.user.contains("Insured: [INSURED_NAME]"));

        let data_pos = request.user.find("EXTRACTED DATA").unwrap();
        let template_pos = request.user.find("TEMPLATE TEXT").unwrap();
        assert!(data_pos < template_pos);
    }

    #[test]
    fn test_data_json_is_complete() {
        let json: Value = serde_json::from_str(&data_to_json(&ExtractedData::not_found())).unwrap();
        assert_eq!(json.as_object().unwrap().len(), ExtractionField::ALL.len());
    }

    #[test]
    fn test_data_json_keeps_field_order() {
        let json: Value = serde_json::from_str(&data_to_json(&ExtractedData::not_found())).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        let expected: Vec<&str> = ExtractionField::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(keys, expected);

        let text = data_to_json(&ExtractedData::not_found());
        assert!(text.find("\"INSURED_NAME\"").unwrap() < text.find("\"DATE_LOSS\"").unwrap());
        assert!(text.find("\"DWELLING_NARRATIVE\"").unwrap() < text.find("\"SALVAGE_NARRATIVE\"").unwrap());
    }
}
