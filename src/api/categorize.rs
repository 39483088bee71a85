use axum::{Json, extract::Query};
use serde::{Deserialize, Serialize};

use crate::category::{Category, auto_categorize};

#[derive(Debug, Deserialize)]
pub struct CategorizeQuery {
    #[serde(default)]
    pub platform: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryGuess {
    category: Category,
}

/// Guess the category for `?platform=`.
///
/// A missing or unrecognised platform is categorized as [Category::Other].
pub async fn get_category_guess(Query(query): Query<CategorizeQuery>) -> Json<CategoryGuess> {
    Json(CategoryGuess {
        category: auto_categorize(&query.platform),
    })
}
