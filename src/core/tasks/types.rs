use crate::{
    core::models::AnalysisResult,
    gemini::SuggestionKind,
};

/// Completions delivered from worker threads to the UI loop. Errors cross
/// the channel as display strings; the typed taxonomy lives in the gateway.
/// Each completion carries the generation of the request that produced it so
/// the session can drop replies that raced a newer request.
#[derive(Debug, Clone)]
pub enum TaskResult {
    AnalysisDone {
        generation: u64,
        result: Result<AnalysisResult, String>,
    },
    SuggestionDone {
        generation: u64,
        kind: SuggestionKind,
        result: Result<String, String>,
    },
}

impl TaskResult {
    pub fn task_type(&self) -> &'static str {
        match self {
            TaskResult::AnalysisDone { .. } => "analysis",
            TaskResult::SuggestionDone { .. } => "suggestion",
        }
    }
}
