use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};
use uuid::Uuid;

use crate::{
    capture::CapturedImage,
    core::NutrilensError,
};

/// Nutrient breakdown for a single identified food item, in grams except for
/// calories. The detail fields (sugar, fiber, starch, sugar alcohols) are
/// optional on the wire and default to zero. Values are taken from the
/// service as-is; nothing here checks that the numbers are plausible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nutrients {
    pub calories: f64,
    pub carbohydrates_grams: f64,
    #[serde(default)]
    pub sugar_grams: f64,
    #[serde(default)]
    pub fiber_grams: f64,
    #[serde(default)]
    pub starch_grams: f64,
    #[serde(default)]
    pub sugar_alcohol_grams: f64,
    pub protein_grams: f64,
    pub fat_grams: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    pub weight_grams: f64,
    pub nutrients: Nutrients,
}

/// One completed analysis of a meal photo. Item order is the model's
/// reporting order and is kept for display. A result can carry both a
/// clarification question and a populated item list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub food_items: Vec<FoodItem>,
    pub diabetic_note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarification_question: Option<String>,
}

impl AnalysisResult {
    /// Parses the raw reply text. Any structural mismatch (unparseable text,
    /// missing `food_items` or `diabetic_note`) is a `MalformedResponse`;
    /// partial results are never produced.
    pub fn from_json(text: &str) -> Result<Self, NutrilensError> {
        serde_json::from_str(text).map_err(|e| NutrilensError::MalformedResponse(e.to_string()))
    }

    /// An absent question and an empty one both mean "no clarification
    /// needed".
    pub fn needs_clarification(&self) -> bool {
        self.clarification_question
            .as_deref()
            .map(str::trim)
            .is_some_and(|q| !q.is_empty())
    }
}

/// A saved analysis: the result plus its source image and save timestamp.
/// Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    pub id: Uuid,
    pub saved_at: DateTime<Utc>,
    pub image: CapturedImage,
    #[serde(flatten)]
    pub analysis: AnalysisResult,
}

impl Meal {
    pub fn new(analysis: AnalysisResult, image: CapturedImage) -> Self {
        Self { id: Uuid::new_v4(), saved_at: Utc::now(), image, analysis }
    }

    pub fn format_saved_at(&self) -> String {
        self.saved_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string()
    }

    pub fn food_names(&self) -> String {
        self.analysis
            .food_items
            .iter()
            .map(|item| item.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
