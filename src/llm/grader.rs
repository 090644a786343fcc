//! Post-session evaluation: one stateless LLM call over the full transcript.

use std::sync::Arc;

use crate::console::Console;
use crate::llm::client::{ChatClient, ChatMessage, LlmError};
use crate::llm::persona::InterviewType;
use crate::llm::report::GradeReport;

/// Evaluation prompt sent as a single user message.
pub fn build_prompt(transcript_text: &str, interview_type: InterviewType) -> String {
    let kind = interview_type.label();
    format!(
        "\
You are a Senior Hiring Manager evaluating a candidate's mock interview.

Interview Type: {kind}

Transcript:
{transcript}

Please provide a structured evaluation using exactly these five sections:
1. **Strengths**: What did the candidate do well?
2. **Areas for Improvement**: Specific actionable advice.
3. **Role Fit**: How well did they demonstrate the required skills for a '{kind}' role?
4. **Communication**: Clarity and pacing.
5. **Score**: An overall score from 1-10, written as N/10.

Format the output in Markdown.",
        transcript = transcript_text.trim_end(),
    )
}

pub struct Grader {
    client: Arc<dyn ChatClient>,
    console: Console,
}

impl Grader {
    pub fn new(client: Arc<dyn ChatClient>, console: Console) -> Self {
        Self { client, console }
    }

    /// Grade a `ROLE: content` transcript, returning the parsed report.
    pub async fn try_grade(
        &self,
        transcript_text: &str,
        interview_type: InterviewType,
    ) -> Result<GradeReport, LlmError> {
        self.console.notice("Generating Feedback...");
        let prompt = build_prompt(transcript_text, interview_type);
        let reply = self.client.complete(&[ChatMessage::user(prompt)]).await?;
        let report = GradeReport::parse(&reply);
        log::info!("grader: report parsed, score={:?}", report.score());
        Ok(report)
    }

    /// Rendered report, or an inline error string when the call fails.
    pub async fn grade(&self, transcript_text: &str, interview_type: InterviewType) -> String {
        match self.try_grade(transcript_text, interview_type).await {
            Ok(report) => report.render(),
            Err(e) => {
                log::error!("grader: {e}");
                format!("Error generating grade: {e}")
            }
        }
    }
}
