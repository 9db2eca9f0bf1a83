//! Template sources. Names double as the Tera template names.

use carelens_core::models::request::TaskKind;

pub const NUTRITION_ANALYSIS: &str = "\
Patient Profile:
- Age: {{ age }}
- Gender: {{ gender }}
- Condition: {{ condition }}
- Ingredients: {{ ingredients }}

Response Guidelines:
1. Be concise. Keep the whole answer under 200 words.
2. Use professional language.
3. Structure in points.

Provide:
- Health impact of ingredients
- Risks and benefits
- Dietary recommendations
";

pub const MEDICAL_CHAT: &str = "\
Medical Assistance Request:
User Query: {{ message }}

Response Guidelines:
1. Be concise. Keep the whole answer under 150 words.
2. Use professional language.
3. Structure in points.

Guidelines:
- Provide factual information
- Avoid diagnosis
- Recommend consultation if serious
";

pub const HEALTH_CHAT: &str = "\
Health Assistance Request:
User Query: {{ message }}

Response Guidelines:
1. Be concise. Keep the whole answer under 150 words.
2. Use professional language.
3. Structure in points.

Guidelines:
- Provide factual information
- Avoid diagnosis
- Recommend consultation if serious
";

pub const HEALTH_REPORT_ANALYSIS: &str = "\
Patient Profile:
- Age: {{ age }}
- Gender: {{ gender }}
- Condition: {{ condition }}
- Report Text: {{ report_text }}

User Query: {{ query }}

Response Guidelines:
- Be concise and direct. Keep the whole answer under 250 words.
- Use professional medical language.
- Structure your response in clear points.

Relevance Check:
- Before answering, compare the topic of the report text with the user query.
- If the query concerns a different test, organ, or condition than the report covers \
(for example, a urine test report with a question about an eye exam), do not answer \
the query from this report.
- Instead, state that the report does not match the question, name what the report \
actually covers, and ask for the relevant report.
- If the user query is \"{{ not_provided }}\", skip this check.

Required Information:
1. Key findings from the health report.
2. Risks and benefits for the patient.
3. Recommendations based on findings.
";

pub const SENTIMENT_EXPLANATION: &str = "\
Based on the statement '{{ transcript }}' with a {{ label }} sentiment, \
explain in 5-10 lines how the user feels and possible reasons for their emotions. \
Sentiment scores: Positive {{ positive }}%, Negative {{ negative }}%, Neutral {{ neutral }}%.";

/// System turn that opens every framed conversation.
pub const SYSTEM_PROMPT: &str = "You are a helpful, friendly AI assistant. \
Provide clear, concise, and accurate responses to user questions.";

pub fn source(kind: TaskKind) -> &'static str {
    match kind {
        TaskKind::NutritionAnalysis => NUTRITION_ANALYSIS,
        TaskKind::MedicalChat => MEDICAL_CHAT,
        TaskKind::HealthChat => HEALTH_CHAT,
        TaskKind::HealthReportAnalysis => HEALTH_REPORT_ANALYSIS,
        TaskKind::SentimentExplanation => SENTIMENT_EXPLANATION,
    }
}

pub const ALL: [TaskKind; 5] = [
    TaskKind::NutritionAnalysis,
    TaskKind::MedicalChat,
    TaskKind::HealthChat,
    TaskKind::HealthReportAnalysis,
    TaskKind::SentimentExplanation,
];
