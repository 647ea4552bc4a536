use serde::Deserialize;

use super::types::MealCategory;

#[derive(Debug, Default, Deserialize)]
pub struct MealsQuery {
    pub category: Option<MealCategory>,
    pub featured: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GroceriesQuery {
    pub category: Option<String>,
}
