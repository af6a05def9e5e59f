//! Static map of backend REST paths

// Auth
pub const AUTH_BASE: &str = "/api/auth";
pub const LOGIN: &str = "/api/auth/login";
pub const REGISTER: &str = "/api/auth/register";
pub const LOGOUT: &str = "/api/auth/logout";
pub const CHECK_AUTH: &str = "/api/auth/check-auth";
pub const ME: &str = "/api/auth/me";

// Books
pub const BOOKS: &str = "/api/books";
pub const BOOK_SEARCH: &str = "/api/books/search";

// Users
pub const USERS: &str = "/api/users";
pub const USER_PROFILE: &str = "/api/users/profile";

// Borrowing
pub const BORROW: &str = "/api/borrow";
pub const RETURN: &str = "/api/return";
pub const BORROW_HISTORY: &str = "/api/borrow/history";

// Admin
pub const ADMIN_STATS: &str = "/api/admin/stats";
pub const ADMIN_USERS: &str = "/api/admin/users";
pub const ADMIN_BOOKS: &str = "/api/admin/books";

/// Book list served to the admin inventory page
pub const INVENTORY_BOOKS: &str = "/books";

pub fn book(id: &str) -> String {
    format!("{}/{}", BOOKS, id)
}

pub fn user(id: &str) -> String {
    format!("{}/{}", USERS, id)
}

pub fn inventory_book(id: i64) -> String {
    format!("{}/{}", INVENTORY_BOOKS, id)
}

/// Full URL of `endpoint` on the backend at `base_url`.
///
/// A trailing slash on the base is dropped so paths never double up.
pub fn api_url(base_url: &str, endpoint: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), endpoint)
}
