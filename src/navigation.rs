//! Navigation seam between the session guard and whatever shows pages

use parking_lot::RwLock;

/// Page host: moves the visitor to another page and shows blocking notices
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Leave the current page for `path`
    fn navigate(&self, path: &str);

    /// Show a notice the visitor has to acknowledge
    fn notify(&self, message: &str);
}

/// Navigator for the console: keeps the current location and prints changes
#[derive(Debug)]
pub struct ConsoleNavigator {
    location: RwLock<String>,
}

impl ConsoleNavigator {
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            location: RwLock::new(start.into()),
        }
    }

    pub fn location(&self) -> String {
        self.location.read().clone()
    }
}

impl Navigator for ConsoleNavigator {
    fn navigate(&self, path: &str) {
        tracing::debug!("Navigating to {}", path);
        *self.location.write() = path.to_string();
        println!("-> {}", path);
    }

    fn notify(&self, message: &str) {
        println!("[!] {}", message);
    }
}
