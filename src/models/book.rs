//! Book model for the inventory view

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub available_quantity: i64,
    #[serde(default)]
    pub total_quantity: i64,
}

/// `GET /books` response body
#[derive(Debug, Deserialize)]
pub struct BookListResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub books: Vec<Book>,
}

/// Body of inventory mutations (`DELETE /books/{id}`)
#[derive(Debug, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,
}
