use crate::{
    capture::CapturedImage,
    core::models::AnalysisResult,
    gemini::SuggestionKind,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub text: String,
}

/// The user-visible state of one analysis session, with one transition per
/// user action. Rendering reads this; nothing in here knows about egui.
///
/// Requests are not cancellable once dispatched, so every begin_* returns a
/// generation number and the matching finish_* applies only if that number
/// is still current. A reply that raced a newer image or a newer request is
/// dropped silently.
#[derive(Debug, Default)]
pub struct Session {
    image: Option<CapturedImage>,
    analysis: Option<AnalysisResult>,
    suggestion: Option<Suggestion>,
    error: Option<String>,
    analyzing: bool,
    suggesting: bool,
    meal_saved: bool,
    analysis_generation: u64,
    suggestion_generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new image discards everything derived from the previous one,
    /// including any reply still in flight.
    pub fn set_image(&mut self, image: CapturedImage) {
        self.image = Some(image);
        self.analysis = None;
        self.suggestion = None;
        self.error = None;
        self.meal_saved = false;
        self.analyzing = false;
        self.suggesting = false;
        self.analysis_generation += 1;
        self.suggestion_generation += 1;
    }

    pub fn begin_analysis(&mut self) -> u64 {
        self.analyzing = true;
        self.error = None;
        self.suggestion = None;
        self.meal_saved = false;
        self.analysis_generation += 1;
        self.analysis_generation
    }

    /// Returns whether the completion was applied.
    pub fn finish_analysis(
        &mut self,
        generation: u64,
        result: Result<AnalysisResult, String>,
    ) -> bool {
        if generation != self.analysis_generation {
            return false;
        }
        self.analyzing = false;
        match result {
            Ok(analysis) => self.analysis = Some(analysis),
            Err(message) => self.error = Some(message),
        }
        true
    }

    pub fn begin_suggestion(&mut self) -> u64 {
        self.suggesting = true;
        self.error = None;
        self.suggestion = None;
        self.suggestion_generation += 1;
        self.suggestion_generation
    }

    pub fn finish_suggestion(
        &mut self,
        generation: u64,
        kind: SuggestionKind,
        result: Result<String, String>,
    ) -> bool {
        if generation != self.suggestion_generation {
            return false;
        }
        self.suggesting = false;
        match result {
            Ok(text) => self.suggestion = Some(Suggestion { kind, text }),
            Err(message) => self.error = Some(message),
        }
        true
    }

    /// UX latch only: stops the same analysis being saved twice in a row.
    /// The history store itself accepts duplicates.
    pub fn mark_saved(&mut self) {
        self.meal_saved = true;
    }

    pub fn can_analyze(&self) -> bool {
        self.image.is_some() && !self.analyzing
    }

    pub fn can_save(&self) -> bool {
        self.analysis.is_some() && self.image.is_some() && !self.meal_saved && !self.analyzing
    }

    pub fn can_request_suggestion(&self) -> bool {
        self.analysis.is_some() && !self.suggesting && !self.analyzing
    }

    pub fn image(&self) -> Option<&CapturedImage> {
        self.image.as_ref()
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn suggestion(&self) -> Option<&Suggestion> {
        self.suggestion.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    pub fn is_suggesting(&self) -> bool {
        self.suggesting
    }

    pub fn meal_saved(&self) -> bool {
        self.meal_saved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> CapturedImage {
        CapturedImage::new(vec![0u8; 4], "image/png")
    }

    fn result(note: &str) -> AnalysisResult {
        AnalysisResult {
            food_items: Vec::new(),
            diabetic_note: note.to_string(),
            clarification_question: None,
        }
    }

    #[test]
    fn analysis_round_trip() {
        let mut session = Session::new();
        session.set_image(image());
        assert!(session.can_analyze());

        let generation = session.begin_analysis();
        assert!(session.is_analyzing());
        assert!(!session.can_analyze());

        assert!(session.finish_analysis(generation, Ok(result("note"))));
        assert!(!session.is_analyzing());
        assert_eq!(session.analysis().unwrap().diabetic_note, "note");
        assert!(session.can_save());
    }

    #[test]
    fn stale_analysis_reply_is_discarded() {
        let mut session = Session::new();
        session.set_image(image());
        let first = session.begin_analysis();
        let second = session.begin_analysis();

        assert!(!session.finish_analysis(first, Ok(result("stale"))));
        assert!(session.analysis().is_none());
        assert!(session.is_analyzing());

        assert!(session.finish_analysis(second, Ok(result("fresh"))));
        assert_eq!(session.analysis().unwrap().diabetic_note, "fresh");
    }

    #[test]
    fn new_image_invalidates_in_flight_analysis() {
        let mut session = Session::new();
        session.set_image(image());
        let generation = session.begin_analysis();

        session.set_image(image());
        assert!(!session.finish_analysis(generation, Ok(result("stale"))));
        assert!(session.analysis().is_none());
        assert!(!session.is_analyzing());
    }

    #[test]
    fn analysis_failure_sets_error_and_clears_flag() {
        let mut session = Session::new();
        session.set_image(image());
        let generation = session.begin_analysis();
        assert!(session.finish_analysis(generation, Err("Analysis failed: boom".into())));
        assert_eq!(session.error(), Some("Analysis failed: boom"));
        assert!(session.analysis().is_none());
        assert!(session.can_analyze());
    }

    #[test]
    fn save_latch_blocks_second_save_until_new_analysis() {
        let mut session = Session::new();
        session.set_image(image());
        let generation = session.begin_analysis();
        session.finish_analysis(generation, Ok(result("note")));

        assert!(session.can_save());
        session.mark_saved();
        assert!(!session.can_save());

        // A re-analysis releases the latch.
        let generation = session.begin_analysis();
        session.finish_analysis(generation, Ok(result("again")));
        assert!(session.can_save());
    }

    #[test]
    fn suggestion_flow_and_staleness() {
        let mut session = Session::new();
        session.set_image(image());
        let generation = session.begin_analysis();
        session.finish_analysis(generation, Ok(result("note")));

        let first = session.begin_suggestion();
        assert!(!session.can_request_suggestion());
        let second = session.begin_suggestion();

        assert!(!session.finish_suggestion(first, SuggestionKind::Alternative, Ok("old".into())));
        assert!(session.suggestion().is_none());

        assert!(session.finish_suggestion(second, SuggestionKind::DayPlan, Ok("plan".into())));
        let suggestion = session.suggestion().unwrap();
        assert_eq!(suggestion.kind, SuggestionKind::DayPlan);
        assert_eq!(suggestion.text, "plan");
    }

    #[test]
    fn new_analysis_clears_previous_suggestion() {
        let mut session = Session::new();
        session.set_image(image());
        let generation = session.begin_analysis();
        session.finish_analysis(generation, Ok(result("note")));
        let generation = session.begin_suggestion();
        session.finish_suggestion(generation, SuggestionKind::Alternative, Ok("swap".into()));
        assert!(session.suggestion().is_some());

        session.begin_analysis();
        assert!(session.suggestion().is_none());
    }
}
