use std::{
    sync::{
        mpsc,
        Arc,
    },
    thread,
};

use tokio::runtime::Runtime;

use super::TaskResult;
use crate::{
    capture::CapturedImage,
    core::models::AnalysisResult,
    gemini::{
        GeminiClient,
        GeminiConfig,
        SuggestionKind,
    },
};

/// Runs the gateway calls off the UI thread. Work is spawned on plain OS
/// threads that block on the shared tokio runtime; completions come back
/// over an mpsc channel drained once per frame by `poll_results`.
pub struct TaskManager {
    runtime: Arc<Runtime>,
    receiver: mpsc::Receiver<TaskResult>,
    sender: mpsc::Sender<TaskResult>,
}

impl TaskManager {
    pub fn new() -> Self {
        let runtime = Arc::new(Runtime::new().expect("Failed to create TaskManager runtime"));
        let (sender, receiver) = mpsc::channel();

        Self { runtime, receiver, sender }
    }

    pub fn poll_results(&mut self) -> Vec<TaskResult> {
        let mut results = Vec::new();

        while let Ok(result) = self.receiver.try_recv() {
            results.push(result);
        }

        results
    }

    fn task_context(&self) -> (mpsc::Sender<TaskResult>, Arc<Runtime>) {
        (self.sender.clone(), self.runtime.clone())
    }

    /// One outbound request per call; a correction re-analyzes from scratch.
    pub fn analyze_meal(
        &self,
        config: GeminiConfig,
        image: CapturedImage,
        correction: Option<String>,
        generation: u64,
    ) {
        let (sender, runtime) = self.task_context();

        thread::spawn(move || {
            let result = runtime.block_on(async {
                GeminiClient::new(config)
                    .analyze_meal(&image, correction.as_deref())
                    .await
                    .map_err(|e| e.to_string())
            });

            let _ = sender.send(TaskResult::AnalysisDone { generation, result });
        });
    }

    pub fn fetch_suggestion(
        &self,
        config: GeminiConfig,
        analysis: AnalysisResult,
        kind: SuggestionKind,
        generation: u64,
    ) {
        let (sender, runtime) = self.task_context();

        thread::spawn(move || {
            let result = runtime.block_on(async {
                GeminiClient::new(config)
                    .fetch_suggestion(&analysis, kind)
                    .await
                    .map_err(|e| e.to_string())
            });

            let _ = sender.send(TaskResult::SuggestionDone { generation, kind, result });
        });
    }
}
