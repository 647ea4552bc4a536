use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::types::{Grocery, Meal, MealCategory, MealType};

/// Read-only product catalog. Seeded in memory at startup; an optional
/// JSON file (`CATALOG_SEED`) replaces the built-in data without a code
/// change.
#[derive(Debug)]
pub struct Catalog {
    meals: Vec<Meal>,
    groceries: Vec<Grocery>,
}

#[derive(Debug, Deserialize)]
struct CatalogSeed {
    meals: Vec<Meal>,
    groceries: Vec<Grocery>,
}

impl Catalog {
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let seed: CatalogSeed = serde_json::from_str(&raw)?;
        info!(
            path = %path.as_ref().display(),
            meals = seed.meals.len(),
            groceries = seed.groceries.len(),
            "catalog loaded from seed file"
        );
        Ok(Self {
            meals: seed.meals,
            groceries: seed.groceries,
        })
    }

    pub fn list_meals(&self, category: Option<MealCategory>, featured: Option<bool>) -> Vec<&Meal> {
        self.meals
            .iter()
            .filter(|m| category.map_or(true, |c| m.category == c))
            .filter(|m| featured.map_or(true, |f| m.featured == f))
            .collect()
    }

    pub fn get_meal(&self, id: &str) -> Option<&Meal> {
        self.meals.iter().find(|m| m.id == id)
    }

    pub fn list_groceries(&self, category: Option<&str>) -> Vec<&Grocery> {
        self.groceries
            .iter()
            .filter(|g| category.map_or(true, |c| g.category == c))
            .collect()
    }

    pub fn get_grocery(&self, id: &str) -> Option<&Grocery> {
        self.groceries.iter().find(|g| g.id == id)
    }

    pub fn seeded() -> Self {
        let meal = |id: &str,
                    name: &str,
                    description: &str,
                    price: f64,
                    category: MealCategory,
                    kind: MealType,
                    featured: bool,
                    available: bool| Meal {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            price,
            image: format!("/images/meals/{id}.jpg"),
            category,
            kind,
            featured,
            available,
        };
        let grocery = |id: &str,
                       name: &str,
                       description: &str,
                       price: f64,
                       category: &str,
                       pack_size: &str| Grocery {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            price,
            image: format!("/images/groceries/{id}.jpg"),
            category: category.into(),
            pack_size: pack_size.into(),
            available: true,
        };

        Self {
            meals: vec![
                meal(
                    "veg-1",
                    "Veg Thali",
                    "Dal, two sabzis, rice, rotis and pickle",
                    11.99,
                    MealCategory::LunchBox,
                    MealType::Vegetarian,
                    true,
                    true,
                ),
                meal(
                    "chicken-1",
                    "Chicken Curry Meal",
                    "Home-style chicken curry with rice and rotis",
                    12.99,
                    MealCategory::LunchBox,
                    MealType::Chicken,
                    true,
                    true,
                ),
                meal(
                    "egg-1",
                    "Egg Curry Meal",
                    "Boiled-egg masala with jeera rice",
                    10.49,
                    MealCategory::LunchBox,
                    MealType::Egg,
                    false,
                    true,
                ),
                meal(
                    "veg-2",
                    "Paneer Butter Masala",
                    "Paneer in a tomato-cashew gravy, with naan",
                    13.49,
                    MealCategory::CloudKitchen,
                    MealType::Vegetarian,
                    false,
                    true,
                ),
                meal(
                    "chicken-2",
                    "Chicken Biryani",
                    "Dum-cooked biryani with raita",
                    14.99,
                    MealCategory::CloudKitchen,
                    MealType::Chicken,
                    true,
                    true,
                ),
                meal(
                    "egg-2",
                    "Egg Biryani",
                    "Biryani rice layered with masala eggs",
                    11.99,
                    MealCategory::CloudKitchen,
                    MealType::Egg,
                    false,
                    false,
                ),
                meal(
                    "chicken-3",
                    "Party Chicken Platter",
                    "Per-plate chicken spread for party orders",
                    12.99,
                    MealCategory::PartyOrders,
                    MealType::Chicken,
                    false,
                    true,
                ),
                meal(
                    "veg-3",
                    "Party Veg Platter",
                    "Per-plate vegetarian spread for party orders",
                    11.49,
                    MealCategory::PartyOrders,
                    MealType::Vegetarian,
                    false,
                    true,
                ),
            ],
            groceries: vec![
                grocery(
                    "gr-1",
                    "Basmati Rice",
                    "Aged long-grain basmati",
                    18.99,
                    "staples",
                    "5 kg",
                ),
                grocery(
                    "gr-2",
                    "Toor Dal",
                    "Split pigeon peas",
                    4.49,
                    "staples",
                    "1 kg",
                ),
                grocery(
                    "gr-3",
                    "Garam Masala",
                    "House spice blend",
                    2.99,
                    "spices",
                    "100 g",
                ),
                grocery(
                    "gr-4",
                    "Pure Ghee",
                    "Clarified butter",
                    9.99,
                    "dairy",
                    "500 ml",
                ),
                grocery(
                    "gr-5",
                    "Whole Wheat Atta",
                    "Stone-ground chapati flour",
                    12.49,
                    "staples",
                    "5 kg",
                ),
            ],
        }
    }
}
