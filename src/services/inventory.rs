//! Book inventory for the admin inventory page

use crate::{
    api::ApiClient,
    endpoints,
    models::book::{ActionResponse, Book, BookListResponse},
};

const HEADERS: [&str; 6] = ["ID", "Title", "Author", "ISBN", "Available", "Total"];

#[derive(Clone)]
pub struct InventoryService {
    api: ApiClient,
}

impl InventoryService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Books matching `query`, or all books when it is blank.
    ///
    /// `None` when the list could not be loaded; the failure is logged and the
    /// caller keeps showing whatever it showed before.
    pub async fn load_books(&self, query: Option<&str>) -> Option<Vec<Book>> {
        let endpoint = match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => format!("{}?q={}", endpoints::INVENTORY_BOOKS, urlencoding::encode(q)),
            None => endpoints::INVENTORY_BOOKS.to_string(),
        };

        let body: BookListResponse = match self.api.get(&endpoint).await {
            Ok(response) => match response.json().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::error!("Error loading books: {}", e);
                    return None;
                }
            },
            Err(e) => {
                tracing::error!("Error loading books: {}", e);
                return None;
            }
        };

        if !body.success {
            tracing::warn!("Book list request was not successful");
            return None;
        }

        Some(body.books)
    }

    /// Delete a book; `true` when the server reports success
    pub async fn delete_book(&self, id: i64) -> bool {
        let response = match self.api.delete(&endpoints::inventory_book(id)).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Error deleting book: {}", e);
                return false;
            }
        };

        match response.json::<ActionResponse>().await {
            Ok(body) => {
                if body.success {
                    tracing::info!("Deleted book {}", id);
                }
                body.success
            }
            Err(e) => {
                tracing::error!("Error deleting book: {}", e);
                false
            }
        }
    }
}

/// Render books as a plain text table
pub fn render_table(books: &[Book]) -> String {
    if books.is_empty() {
        return "No books found".to_string();
    }

    let rows: Vec<[String; 6]> = books
        .iter()
        .map(|book| {
            [
                book.id.to_string(),
                book.title.clone().unwrap_or_default(),
                book.author.clone().unwrap_or_default(),
                book.isbn.clone().unwrap_or_default(),
                book.available_quantity.to_string(),
                book.total_quantity.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[String]| {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    let separator = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-+-");

    let mut lines = vec![format_row(&header[..]), separator];
    lines.extend(rows.iter().map(|row| format_row(&row[..])));
    lines.join("\n")
}
