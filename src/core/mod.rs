pub mod errors;
pub mod history;
pub mod markup;
pub mod models;
pub mod state;
pub mod tasks;
pub mod units;

pub use errors::NutrilensError;
pub use history::MealHistory;
pub use models::{
    AnalysisResult,
    FoodItem,
    Meal,
    Nutrients,
};
pub use state::Session;
