/// Terms an answer must not expose to end users.
pub const FORBIDDEN_TERMS: [&str; 4] = ["json", "api", "apis", "spreadsheet"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardrailDecision {
    Allow,
    Degrade { reason_code: &'static str, fallback_path: &'static str },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerGuardrail {
    pub block_payloads: bool,
    pub block_technical_terms: bool,
}

impl Default for AnswerGuardrail {
    fn default() -> Self {
        Self { block_payloads: true, block_technical_terms: true }
    }
}

impl AnswerGuardrail {
    pub fn evaluate(&self, answer: &str) -> GuardrailDecision {
        if self.block_payloads && contains_object_literal(answer) {
            return GuardrailDecision::Degrade {
                reason_code: "raw_payload_in_answer",
                fallback_path: "apology_template",
            };
        }

        if self.block_technical_terms && contains_forbidden_term(answer) {
            return GuardrailDecision::Degrade {
                reason_code: "technical_term_in_answer",
                fallback_path: "apology_template",
            };
        }

        GuardrailDecision::Allow
    }
}

// `{` followed (after whitespace) by a quote is the start of a JSON object.
fn contains_object_literal(answer: &str) -> bool {
    answer
        .match_indices('{')
        .any(|(index, _)| answer[index + 1..].trim_start().starts_with('"'))
}

fn contains_forbidden_term(answer: &str) -> bool {
    answer
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .any(|word| FORBIDDEN_TERMS.iter().any(|term| word.eq_ignore_ascii_case(term)))
}
