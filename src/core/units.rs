use crate::core::models::FoodItem;

/// Grams of carbohydrate per bread-equivalent unit.
pub const BE_FACTOR: f64 = 12.0;

/// Weighted fat/protein kilocalories per fat-protein-equivalent unit.
pub const FPE_FACTOR: f64 = 100.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MealTotals {
    pub be: f64,
    pub fpe: f64,
    pub calories: f64,
}

/// Missing inputs count as zero; negative inputs are accepted as-is.
pub fn bread_equivalent(carbohydrates_grams: Option<f64>) -> f64 {
    carbohydrates_grams.unwrap_or(0.0) / BE_FACTOR
}

pub fn fat_protein_equivalent(fat_grams: Option<f64>, protein_grams: Option<f64>) -> f64 {
    (fat_grams.unwrap_or(0.0) * 9.0 + protein_grams.unwrap_or(0.0) * 4.0) / FPE_FACTOR
}

pub fn item_bread_equivalent(item: &FoodItem) -> f64 {
    bread_equivalent(Some(item.nutrients.carbohydrates_grams))
}

pub fn item_fat_protein_equivalent(item: &FoodItem) -> f64 {
    fat_protein_equivalent(Some(item.nutrients.fat_grams), Some(item.nutrients.protein_grams))
}

/// Sum of the per-item conversions. An empty slice yields all zeros.
pub fn totals(items: &[FoodItem]) -> MealTotals {
    items.iter().fold(MealTotals::default(), |mut acc, item| {
        acc.be += item_bread_equivalent(item);
        acc.fpe += item_fat_protein_equivalent(item);
        acc.calories += item.nutrients.calories;
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Nutrients;

    fn item(calories: f64, carbs: f64, fat: f64, protein: f64) -> FoodItem {
        FoodItem {
            name: "test".to_string(),
            weight_grams: 100.0,
            nutrients: Nutrients {
                calories,
                carbohydrates_grams: carbs,
                sugar_grams: 0.0,
                fiber_grams: 0.0,
                starch_grams: 0.0,
                sugar_alcohol_grams: 0.0,
                protein_grams: protein,
                fat_grams: fat,
            },
        }
    }

    #[test]
    fn bread_equivalent_divides_by_factor() {
        assert_eq!(bread_equivalent(Some(24.0)), 24.0 / BE_FACTOR);
        assert_eq!(bread_equivalent(Some(0.0)), 0.0);
    }

    #[test]
    fn missing_inputs_are_zero() {
        assert_eq!(bread_equivalent(None), 0.0);
        assert_eq!(fat_protein_equivalent(None, None), 0.0);
        assert_eq!(fat_protein_equivalent(Some(10.0), None), 90.0 / FPE_FACTOR);
        assert_eq!(fat_protein_equivalent(None, Some(10.0)), 40.0 / FPE_FACTOR);
    }

    #[test]
    fn fat_protein_formula() {
        let fpe = fat_protein_equivalent(Some(9.0), Some(4.0));
        assert!((fpe - (9.0 * 9.0 + 4.0 * 4.0) / FPE_FACTOR).abs() < 1e-12);
    }

    // The worked example from the dosing convention: carbs 30, fat 9,
    // protein 4 with divisors 12 and 10 give 2.5 BE and 9.7 FPE.
    #[test]
    fn reference_example_with_local_factors() {
        let be = 30.0 / 12.0;
        let fpe: f64 = (9.0 * 9.0 + 4.0 * 4.0) / 10.0;
        assert_eq!(be, 2.5);
        assert!((fpe - 9.7).abs() < 1e-12);
    }

    #[test]
    fn empty_sequence_totals_zero() {
        assert_eq!(totals(&[]), MealTotals::default());
    }

    #[test]
    fn totals_sum_per_item_conversions() {
        let a = item(100.0, 24.0, 9.0, 4.0);
        let b = item(50.0, 12.0, 0.0, 10.0);
        let t = totals(&[a.clone(), b.clone()]);

        let expected_be = item_bread_equivalent(&a) + item_bread_equivalent(&b);
        let expected_fpe = item_fat_protein_equivalent(&a) + item_fat_protein_equivalent(&b);
        assert!((t.be - expected_be).abs() < 1e-12);
        assert!((t.fpe - expected_fpe).abs() < 1e-12);
        assert_eq!(t.calories, 150.0);

        // Order of summation is irrelevant.
        let reversed = totals(&[b, a]);
        assert!((t.be - reversed.be).abs() < 1e-12);
        assert!((t.fpe - reversed.fpe).abs() < 1e-12);
    }

    #[test]
    fn negative_values_are_not_clamped() {
        let t = totals(&[item(0.0, -12.0, 0.0, 0.0)]);
        assert_eq!(t.be, -1.0);
    }

    // Parsing a reply and deriving totals must agree with applying the
    // formulas to the source grams by hand.
    #[test]
    fn parsed_reply_totals_match_manual_sums() {
        let text = r#"{
            "food_items": [
                {"name": "Rice", "weight_grams": 150.0,
                 "nutrients": {"calories": 195.0, "carbohydrates_grams": 42.0,
                               "protein_grams": 4.0, "fat_grams": 0.4}},
                {"name": "Chicken", "weight_grams": 120.0,
                 "nutrients": {"calories": 198.0, "carbohydrates_grams": 0.0,
                               "protein_grams": 37.2, "fat_grams": 4.3}}
            ],
            "diabetic_note": "n"
        }"#;
        let result = crate::core::models::AnalysisResult::from_json(text).unwrap();
        let t = totals(&result.food_items);

        let manual_be = 42.0 / BE_FACTOR + 0.0 / BE_FACTOR;
        let manual_fpe =
            (0.4 * 9.0 + 4.0 * 4.0) / FPE_FACTOR + (4.3 * 9.0 + 37.2 * 4.0) / FPE_FACTOR;
        assert!((t.be - manual_be).abs() < 1e-12);
        assert!((t.fpe - manual_fpe).abs() < 1e-12);
        assert_eq!(t.calories, 393.0);
    }
}
