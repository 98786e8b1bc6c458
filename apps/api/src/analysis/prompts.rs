// Analysis LLM prompt templates.
// All prompts for the analysis module are defined here.

pub const COMPARISON_SYSTEM: &str = "\
You are an AI assistant that compares CGM data with manually logged blood sugar levels \
to identify discrepancies and suggest potential actions.";

pub const COMPARISON_PROMPT_TEMPLATE: &str = r#"CGM Value: {cgm_value}
Manual Log Value: {manual_log_value}
Timestamp: {timestamp}

Analyze the provided CGM value and manual log value. Determine if there is a significant discrepancy between the two values. Consider that some variance is normal due to differences in measurement techniques and timing. If a discrepancy is detected, provide a clear explanation of the potential reasons for the discrepancy. Finally, suggest an action based on the comparison, such as retesting, consulting a healthcare professional, or adjusting insulin dosage.

OUTPUT SCHEMA (return exactly this structure):
{
  "discrepancyDetected": true | false,
  "discrepancyExplanation": "string",
  "suggestedAction": "string"
}

RULES:
1. discrepancyDetected must be a JSON boolean, never a string
2. All three fields are required
3. Return ONLY the JSON object — nothing else, no code fences."#;

pub const TREND_SUMMARY_SYSTEM: &str = "\
You are an AI assistant specializing in analyzing blood sugar data and providing \
summaries and recommendations.";

pub const TREND_SUMMARY_PROMPT_TEMPLATE: &str = r#"Analyze the following blood sugar data over the specified period:
Period: {period}
Data:
{data}

Provide a summary of the blood sugar trends, highlighting any patterns, high or low values, and potential issues. Also give recommendations based on the blood sugar trends, including whether the user should consult a doctor.

OUTPUT SCHEMA (return exactly this structure):
{
  "summary": "string",
  "recommendations": "string"
}

Return ONLY the JSON object — nothing else, no code fences."#;
