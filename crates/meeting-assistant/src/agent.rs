//! Meeting Assistant Service
//!
//! Owns the provider and executors, and builds one agent per transcript run.
//! Run state is created fresh for each call, threaded into the tool adapters
//! as a shared handle, and discarded with the report; nothing lives at
//! module scope.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::mpsc;

use agent_core::{
    Agent, AgentBuilder, AgentEvent, Conversation, LlmProvider, Message, RunReport,
    ToolInvocation,
};

use crate::MEETING_ASSISTANT_PROMPT;
use crate::document::{CalendarExecutor, DecisionRecordExecutor, Executor, IncidentExecutor};
use crate::error::Result;
use crate::state::{RunState, SharedState, shared};
use crate::svckit::{CalendarReminderTool, DecisionRecordTool, IncidentReportTool};

/// Report returned after one transcript run
#[derive(Clone, Debug, Serialize)]
pub struct TranscriptReport {
    /// Run identifier
    pub run_id: String,

    /// The model's closing summary
    pub summary: String,

    /// Tool invocations in call order
    pub tool_calls: Vec<ToolInvocation>,

    /// Executor result mappings accumulated in run state
    pub results: Vec<serde_json::Value>,

    /// Final state snapshot
    pub state: serde_json::Value,
}

/// The meeting assistant service
pub struct MeetingAssistant {
    provider: Arc<dyn LlmProvider>,
    calendar: Arc<dyn Executor>,
    incident: Arc<dyn Executor>,
    decision: Arc<dyn Executor>,
    model: String,
    max_iterations: usize,
}

impl MeetingAssistant {
    /// Create with explicit executors
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        calendar: Arc<dyn Executor>,
        incident: Arc<dyn Executor>,
        decision: Arc<dyn Executor>,
    ) -> Self {
        Self {
            provider,
            calendar,
            incident,
            decision,
            model: agent_core::provider::GenerationOptions::default().model,
            max_iterations: 10,
        }
    }

    /// Create with the document executors, persisting under `output_dir`
    /// when one is given
    pub fn with_document_executors(
        provider: Arc<dyn LlmProvider>,
        output_dir: Option<PathBuf>,
    ) -> Self {
        let (calendar, incident, decision): (
            Arc<dyn Executor>,
            Arc<dyn Executor>,
            Arc<dyn Executor>,
        ) = match output_dir {
            Some(dir) => (
                Arc::new(CalendarExecutor::with_output_dir(&dir)),
                Arc::new(IncidentExecutor::with_output_dir(&dir)),
                Arc::new(DecisionRecordExecutor::with_output_dir(&dir)),
            ),
            None => (
                Arc::new(CalendarExecutor::new()),
                Arc::new(IncidentExecutor::new()),
                Arc::new(DecisionRecordExecutor::new()),
            ),
        };

        Self::new(provider, calendar, incident, decision)
    }

    /// Override the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the reasoning-loop iteration cap
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Model identifier this service generates with
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Names of the tools every built agent carries
    pub fn tool_names() -> [&'static str; 3] {
        [
            crate::svckit::CALENDAR_TOOL_NAME,
            crate::svckit::INCIDENT_TOOL_NAME,
            crate::svckit::DECISION_TOOL_NAME,
        ]
    }

    /// Build an agent bound to one run's shared state
    fn build_agent(&self, state: &SharedState, run_state: &RunState) -> Result<Agent> {
        let date_context = date_context(run_state);

        let agent = AgentBuilder::new()
            .provider(self.provider.clone())
            .instructions(MEETING_ASSISTANT_PROMPT)
            .instructions_fn(move || date_context.clone())
            .tool(CalendarReminderTool::new(self.calendar.clone(), state.clone()))
            .tool(IncidentReportTool::new(self.incident.clone(), state.clone()))
            .tool(DecisionRecordTool::new(self.decision.clone(), state.clone()))
            .model(self.model.clone())
            .max_iterations(self.max_iterations)
            .build()?;

        Ok(agent)
    }

    /// Process a transcript and return the structured report
    pub async fn process_transcript(&self, transcript: &str) -> Result<TranscriptReport> {
        let run_state = RunState::for_today();
        let state = shared(run_state.clone());
        let agent = self.build_agent(&state, &run_state)?;

        let mut conversation = Conversation::new();
        conversation.push(Message::user(transcript_prompt(transcript)));

        let report = agent.run(&mut conversation).await?;
        Ok(finish(report, &state).await)
    }

    /// Process a transcript, emitting run events (text deltas, tool calls,
    /// state snapshots) over the channel while the run is in flight
    pub async fn process_transcript_streaming(
        &self,
        transcript: &str,
        events: mpsc::Sender<AgentEvent>,
    ) -> Result<TranscriptReport> {
        let run_state = RunState::for_today();
        let state = shared(run_state.clone());
        let agent = self.build_agent(&state, &run_state)?;

        let mut conversation = Conversation::new();
        conversation.push(Message::user(transcript_prompt(transcript)));

        let report = agent.run_streaming(&mut conversation, events).await?;
        Ok(finish(report, &state).await)
    }
}

async fn finish(report: RunReport, state: &SharedState) -> TranscriptReport {
    let state = state.lock().await;
    TranscriptReport {
        run_id: report.run_id,
        summary: report.output,
        tool_calls: report.tool_invocations,
        results: state.tool_results.clone(),
        state: state.snapshot(),
    }
}

fn transcript_prompt(transcript: &str) -> String {
    format!("Process this meeting transcript:\n\n{}", transcript)
}

/// Date context injected as dynamic instructions, so reminder dates resolve
/// against the run's own calendar
fn date_context(state: &RunState) -> String {
    let current_day = Utc::now().format("%A");
    format!(
        "**CURRENT DATE/TIME CONTEXT:**\n- Today is {}, {}\n- One week from now: {}",
        current_day, state.current_date, state.one_week_from_now
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::provider::{
        Completion, CompletionStream, GenerationOptions, StreamChunk,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedProvider {
        script: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(script: Vec<&str>) -> Self {
            Self {
                script: Mutex::new(script.into_iter().map(String::from).collect()),
            }
        }

        fn next_content(&self) -> String {
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                "out of script".into()
            } else {
                script.remove(0)
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn health_check(&self) -> agent_core::Result<bool> {
            Ok(true)
        }

        async fn complete(
            &self,
            _messages: &[Message],
            options: &GenerationOptions,
        ) -> agent_core::Result<Completion> {
            Ok(Completion {
                content: self.next_content(),
                model: options.model.clone(),
                usage: None,
                finish_reason: None,
            })
        }

        async fn complete_stream(
            &self,
            _messages: &[Message],
            _options: &GenerationOptions,
        ) -> agent_core::Result<CompletionStream> {
            let chunks = vec![
                Ok(StreamChunk {
                    delta: self.next_content(),
                    done: false,
                    usage: None,
                }),
                Ok(StreamChunk {
                    delta: String::new(),
                    done: true,
                    usage: None,
                }),
            ];
            Ok(Box::pin(futures::stream::iter(chunks)))
        }
    }

    const CALENDAR_CALL: &str = "```tool\n{\"tool\": \"create_calendar_reminder\", \"arguments\": {\"meeting_title\": \"Sprint Planning\", \"meeting_type\": \"planning\", \"meeting_summary\": \"Planned the sprint.\", \"key_points\": [\"API redesign\"], \"action_items\": [{\"task\": \"Write docs\", \"owner\": \"Alice\"}], \"reminder_date\": \"2025-06-10\"}}\n```";

    fn assistant(script: Vec<&str>) -> MeetingAssistant {
        MeetingAssistant::with_document_executors(
            Arc::new(ScriptedProvider::new(script)),
            None,
        )
    }

    #[tokio::test]
    async fn test_process_transcript_accumulates_results() {
        let assistant = assistant(vec![CALENDAR_CALL, "Processed your meeting."]);
        let report = assistant
            .process_transcript("Sprint planning notes ...")
            .await
            .unwrap();

        assert_eq!(report.summary, "Processed your meeting.");
        assert_eq!(report.tool_calls.len(), 1);
        assert_eq!(report.tool_calls[0].name, "create_calendar_reminder");
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0]["type"], "calendar_reminder");
        assert!(report.state["current_tool"].is_null());
    }

    #[tokio::test]
    async fn test_streaming_emits_state_snapshot() {
        let assistant = assistant(vec![CALENDAR_CALL, "Done."]);
        let (tx, mut rx) = mpsc::channel(64);

        let report = assistant
            .process_transcript_streaming("Sprint planning notes ...", tx)
            .await
            .unwrap();
        assert_eq!(report.summary, "Done.");

        let mut saw_snapshot = false;
        while let Ok(event) = rx.try_recv() {
            if let AgentEvent::StateSnapshot { snapshot } = event {
                saw_snapshot = true;
                assert_eq!(snapshot["tool_results"].as_array().unwrap().len(), 1);
            }
        }
        assert!(saw_snapshot);
    }

    #[tokio::test]
    async fn test_plain_answer_produces_empty_results() {
        let assistant = assistant(vec!["Nothing actionable in this transcript."]);
        let report = assistant.process_transcript("hello world").await.unwrap();

        assert!(report.tool_calls.is_empty());
        assert!(report.results.is_empty());
    }
}
