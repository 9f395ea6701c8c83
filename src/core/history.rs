use crate::{
    capture::CapturedImage,
    core::models::{
        AnalysisResult,
        Meal,
    },
};

/// In-memory, process-lifetime list of saved meals, most recent first.
/// Prepend-only apart from a full clear; saved meals are never touched
/// again. Duplicates are allowed — the "already saved" latch that stops
/// double saves belongs to the session state, not to this store.
#[derive(Debug, Default)]
pub struct MealHistory {
    meals: Vec<Meal>,
}

impl MealHistory {
    pub fn new() -> Self {
        Self { meals: Vec::new() }
    }

    /// Stamps the current time, attaches the image and prepends the meal.
    pub fn save(&mut self, analysis: AnalysisResult, image: CapturedImage) -> &Meal {
        self.meals.insert(0, Meal::new(analysis, image));
        &self.meals[0]
    }

    /// Irreversible.
    pub fn clear(&mut self) {
        self.meals = Vec::new();
    }

    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.meals.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(note: &str) -> AnalysisResult {
        AnalysisResult {
            food_items: Vec::new(),
            diabetic_note: note.to_string(),
            clarification_question: None,
        }
    }

    fn image() -> CapturedImage {
        CapturedImage::new(vec![1, 2, 3], "image/png")
    }

    #[test]
    fn save_prepends() {
        let mut history = MealHistory::new();
        history.save(result("a"), image());
        history.save(result("b"), image());
        history.save(result("c"), image());

        let notes: Vec<&str> =
            history.meals().iter().map(|m| m.analysis.diabetic_note.as_str()).collect();
        assert_eq!(notes, vec!["c", "b", "a"]);
    }

    #[test]
    fn save_returns_the_new_meal() {
        let mut history = MealHistory::new();
        let meal = history.save(result("a"), image());
        assert_eq!(meal.analysis.diabetic_note, "a");
        assert_eq!(meal.image.bytes(), &[1, 2, 3]);
    }

    #[test]
    fn duplicates_are_allowed() {
        let mut history = MealHistory::new();
        history.save(result("same"), image());
        history.save(result("same"), image());
        assert_eq!(history.len(), 2);
        assert_ne!(history.meals()[0].id, history.meals()[1].id);
    }

    #[test]
    fn clear_empties_regardless_of_size() {
        let mut history = MealHistory::new();
        assert!(history.is_empty());
        history.clear();
        assert!(history.is_empty());

        for i in 0..5 {
            history.save(result(&i.to_string()), image());
        }
        history.clear();
        assert!(history.is_empty());
    }
}
