use serde_json::{
    json,
    Value,
};

use crate::core::models::AnalysisResult;

pub mod api;

pub use api::GeminiClient;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
}

impl GeminiConfig {
    /// Settings take precedence over the environment; a missing key is not
    /// an error here — it surfaces when a request is attempted.
    pub fn resolve(settings_key: &str, settings_model: &str) -> Self {
        let api_key = if settings_key.trim().is_empty() {
            std::env::var(API_KEY_ENV).ok().filter(|key| !key.trim().is_empty())
        } else {
            Some(settings_key.trim().to_string())
        };

        let model = if settings_model.trim().is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            settings_model.trim().to_string()
        };

        Self { api_key, model }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    Alternative,
    DayPlan,
}

impl SuggestionKind {
    pub fn title(&self) -> &'static str {
        match self {
            SuggestionKind::Alternative => "Suggested improvement",
            SuggestionKind::DayPlan => "Plan for the rest of today",
        }
    }
}

/// Which meal of the day the analyzed plate counts as, by local hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    pub fn from_hour(hour: u32) -> Self {
        if hour < 11 {
            MealSlot::Breakfast
        } else if hour < 16 {
            MealSlot::Lunch
        } else {
            MealSlot::Dinner
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
        }
    }
}

pub const ANALYSIS_INSTRUCTION: &str = "You are a nutrition assistant for people with diabetes. \
Analyze the photographed meal.\n\
1. Identify every food item as precisely as possible.\n\
2. Estimate each item's weight in grams.\n\
3. Work out the nutrient values. Break the carbohydrates down in detail: \
'carbohydrates_grams' (total), 'sugar_grams', 'fiber_grams', 'starch_grams' and \
'sugar_alcohol_grams'. Set a value to 0 when it does not apply.\n\
4. Add a dedicated note for diabetics weighing up the bread units (BE), fat-protein units \
(FPE), sugar content and anything else relevant.\n\
5. When the user supplies a correction (for example \"that is whole-grain rice\"), you must \
treat that correction as the truth, overriding what the image suggests.\n\
6. If anything is unclear, ask a 'clarification_question'.\n\
Make sure your reply is exclusively JSON matching the schema.";

pub const COACH_INSTRUCTION: &str = "You are a helpful, motivating nutrition coach \
specialized in diabetes. Keep your language simple, positive and easy to follow.";

pub fn analysis_prompt(correction: Option<&str>) -> String {
    match correction {
        Some(correction) => format!(
            "Re-analyze the food in this picture. You must take the following correction \
             from the user into account: \"{}\"",
            correction
        ),
        None => {
            "Analyze the food in this picture and return the nutrition information.".to_string()
        }
    }
}

/// One line of `name (~Ng)` entries, the shape both suggestion prompts use.
pub fn meal_summary(analysis: &AnalysisResult) -> String {
    analysis
        .food_items
        .iter()
        .map(|item| format!("{} (~{:.0}g)", item.name, item.weight_grams))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn suggestion_prompt(analysis: &AnalysisResult, kind: SuggestionKind, hour: u32) -> String {
    let summary = meal_summary(analysis);
    match kind {
        SuggestionKind::Alternative => format!(
            "The analyzed meal consists of: {}. Give me one or two concrete, actionable \
             suggestions for making this meal healthier for a diabetic next time. Focus on \
             swapping ingredients or changing the preparation. Format your reply with \
             markdown (e.g. **bold** for headings, bullet points).",
            summary
        ),
        SuggestionKind::DayPlan => format!(
            "The analyzed meal ({}) was just eaten as {}. Put together a simple, balanced \
             meal plan for the remaining meals of today that suits a diabetic. Include a \
             rough BE and FPE estimate for each suggested meal. Format your reply with \
             markdown (e.g. **bold** for headings, bullet points).",
            summary,
            MealSlot::from_hour(hour).label()
        ),
    }
}

/// Response schema sent with every analysis request, mirroring the data
/// model in `core::models`. The service enforces it; parsing stays strict
/// anyway.
pub fn analysis_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "food_items": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "weight_grams": { "type": "NUMBER" },
                        "nutrients": {
                            "type": "OBJECT",
                            "properties": {
                                "calories": { "type": "NUMBER" },
                                "carbohydrates_grams": { "type": "NUMBER" },
                                "sugar_grams": { "type": "NUMBER" },
                                "fiber_grams": { "type": "NUMBER" },
                                "starch_grams": { "type": "NUMBER" },
                                "sugar_alcohol_grams": { "type": "NUMBER" },
                                "protein_grams": { "type": "NUMBER" },
                                "fat_grams": { "type": "NUMBER" },
                            },
                            "required": [
                                "calories",
                                "carbohydrates_grams",
                                "protein_grams",
                                "fat_grams",
                            ],
                        },
                    },
                    "required": ["name", "weight_grams", "nutrients"],
                },
            },
            "diabetic_note": { "type": "STRING" },
            "clarification_question": { "type": "STRING" },
        },
        "required": ["food_items", "diabetic_note"],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{
        FoodItem,
        Nutrients,
    };

    fn analysis() -> AnalysisResult {
        let nutrients = Nutrients {
            calories: 100.0,
            carbohydrates_grams: 20.0,
            sugar_grams: 0.0,
            fiber_grams: 0.0,
            starch_grams: 0.0,
            sugar_alcohol_grams: 0.0,
            protein_grams: 3.0,
            fat_grams: 1.0,
        };
        AnalysisResult {
            food_items: vec![
                FoodItem {
                    name: "Rice".to_string(),
                    weight_grams: 150.4,
                    nutrients: nutrients.clone(),
                },
                FoodItem { name: "Egg".to_string(), weight_grams: 51.6, nutrients },
            ],
            diabetic_note: "note".to_string(),
            clarification_question: None,
        }
    }

    #[test]
    fn meal_slot_buckets() {
        assert_eq!(MealSlot::from_hour(0), MealSlot::Breakfast);
        assert_eq!(MealSlot::from_hour(10), MealSlot::Breakfast);
        assert_eq!(MealSlot::from_hour(11), MealSlot::Lunch);
        assert_eq!(MealSlot::from_hour(15), MealSlot::Lunch);
        assert_eq!(MealSlot::from_hour(16), MealSlot::Dinner);
        assert_eq!(MealSlot::from_hour(23), MealSlot::Dinner);
    }

    #[test]
    fn summary_rounds_weights() {
        assert_eq!(meal_summary(&analysis()), "Rice (~150g), Egg (~52g)");
    }

    #[test]
    fn correction_is_quoted_in_the_prompt() {
        let prompt = analysis_prompt(Some("that is whole-grain rice"));
        assert!(prompt.contains("\"that is whole-grain rice\""));
        assert!(prompt.starts_with("Re-analyze"));

        let plain = analysis_prompt(None);
        assert!(!plain.contains("correction"));
    }

    #[test]
    fn day_plan_prompt_names_the_slot() {
        let prompt = suggestion_prompt(&analysis(), SuggestionKind::DayPlan, 9);
        assert!(prompt.contains("as breakfast"));
        assert!(prompt.contains("Rice (~150g)"));

        let prompt = suggestion_prompt(&analysis(), SuggestionKind::Alternative, 9);
        assert!(prompt.contains("one or two concrete"));
    }

    #[test]
    fn schema_requires_the_contract_fields() {
        let schema = analysis_response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required, vec!["food_items", "diabetic_note"]);

        let nutrient_required = &schema["properties"]["food_items"]["items"]["properties"]
            ["nutrients"]["required"];
        assert!(nutrient_required.as_array().unwrap().len() == 4);
    }

    #[test]
    fn config_prefers_settings_over_default_model() {
        let config = GeminiConfig::resolve("key-from-settings", "");
        assert_eq!(config.api_key.as_deref(), Some("key-from-settings"));
        assert_eq!(config.model, DEFAULT_MODEL);

        let config = GeminiConfig::resolve("k", "gemini-2.5-pro");
        assert_eq!(config.model, "gemini-2.5-pro");
    }
}
