//! Library portal console
//!
//! One process is one browser tab: it owns the session storage, the cookie
//! jar and the current location.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lms_portal::{
    config::{AppConfig, PagesConfig},
    models::{Registration, Role},
    navigation::{ConsoleNavigator, Navigator},
    services::inventory::render_table,
    session::MemorySessionStore,
    AppState,
};

const HELP: &str = "\
commands:
  login <username> <password>
  register <username> <password> [field=value ...]
  logout
  whoami                 cached user
  me                     user according to the server (cached)
  check                  is the session alive
  open <page>            landing | admin | student | inventory
  home                   go to the dashboard of your role
  books [query]          list books (inventory page)
  delete <id>            delete a book (inventory page)
  where                  current location
  help
  quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("lms_portal={}", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::info!(
        "Starting library portal v{} against {}",
        env!("CARGO_PKG_VERSION"),
        config.api.base_url
    );

    let navigator = Arc::new(ConsoleNavigator::new(config.pages.landing.clone()));
    let state = AppState::new(
        config,
        Arc::new(MemorySessionStore::new()),
        navigator.clone(),
    )?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", HELP);

    loop {
        let Some(line) = prompt(&mut lines, "> ").await? else {
            break;
        };
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let args: Vec<&str> = words.collect();

        match command {
            "quit" | "exit" => break,
            "help" => println!("{}", HELP),
            "where" => println!("{}", navigator.location()),
            _ => run(&state, &navigator, &mut lines, command, &args).await?,
        }
    }

    Ok(())
}

async fn run(
    state: &AppState,
    navigator: &ConsoleNavigator,
    lines: &mut Lines<BufReader<Stdin>>,
    command: &str,
    args: &[&str],
) -> anyhow::Result<()> {
    let guard = &state.services.auth;
    let pages = &state.config.pages;

    match (command, args) {
        ("login", [username, password]) => match guard.login(username, password).await {
            Ok(user) => {
                println!("Welcome, {} ({})", user.username, user.role);
                guard.redirect_based_on_role().await;
            }
            Err(e) => println!("Login failed: {}", e.message()),
        },
        ("register", [username, password, fields @ ..]) => {
            let mut registration = Registration::new(*username, *password);
            for field in fields {
                let Some((name, value)) = field.split_once('=') else {
                    println!("Ignoring field without '=': {}", field);
                    continue;
                };
                registration = registration.with_field(name, value);
            }
            match guard.register(&registration).await {
                Ok(Some(user)) => println!("Registered {}; you can now log in", user.username),
                Ok(None) => println!("Registered {}; you can now log in", username),
                Err(e) => println!("Registration failed: {}", e.message()),
            }
        }
        ("logout", []) => {
            guard.handle_logout().await;
        }
        ("whoami", []) => match guard.cached_user() {
            Some(user) => println!("{} ({})", user.username, user.role),
            None => println!("Not logged in"),
        },
        ("me", []) => match guard.remember_current_user().await {
            Some(user) => println!("{} ({}), id {}", user.username, user.role, user.id),
            None => println!("No current user"),
        },
        ("check", []) => println!("authenticated: {}", guard.is_authenticated().await),
        ("open", ["landing"]) => navigator.navigate(&pages.landing),
        ("open", [page]) => {
            let Some((path, role)) = page_target(pages, page) else {
                println!("Unknown page: {}", page);
                return Ok(());
            };
            navigator.navigate(&path);
            if guard.require_auth(role.as_ref()).await && path == pages.book_inventory {
                show_books(state, None).await;
            }
        }
        ("home", []) => guard.redirect_based_on_role().await,
        ("books", query) => {
            if on_inventory(state, navigator) {
                let query = query.join(" ");
                show_books(state, Some(query.as_str())).await;
            }
        }
        ("delete", [id]) => {
            if !on_inventory(state, navigator) {
                return Ok(());
            }
            let Ok(id) = id.parse::<i64>() else {
                println!("Not a book id: {}", id);
                return Ok(());
            };
            let answer = prompt(lines, "Are you sure you want to delete this book? [y/N] ").await?;
            if matches!(answer.as_deref().map(str::trim), Some("y" | "Y" | "yes")) {
                if state.services.inventory.delete_book(id).await {
                    show_books(state, None).await;
                } else {
                    println!("Book {} was not deleted", id);
                }
            }
        }
        _ => println!("Unknown command or wrong arguments; try 'help'"),
    }

    Ok(())
}

/// Path of a protected page and the role it requires
fn page_target(pages: &PagesConfig, name: &str) -> Option<(String, Option<Role>)> {
    match name {
        "admin" => Some((pages.admin_dashboard.clone(), Some(Role::Admin))),
        "student" => Some((pages.student_dashboard.clone(), Some(Role::Student))),
        "inventory" => Some((pages.book_inventory.clone(), Some(Role::Admin))),
        _ => None,
    }
}

fn on_inventory(state: &AppState, navigator: &ConsoleNavigator) -> bool {
    if navigator.location() == state.config.pages.book_inventory {
        return true;
    }
    println!("Open the inventory page first: open inventory");
    false
}

/// Print the book list; on failure the previous listing stays the last one shown
async fn show_books(state: &AppState, query: Option<&str>) {
    match state.services.inventory.load_books(query).await {
        Some(books) => println!("{}", render_table(&books)),
        None => println!("Could not load books"),
    }
}

async fn prompt(
    lines: &mut Lines<BufReader<Stdin>>,
    text: &str,
) -> std::io::Result<Option<String>> {
    print!("{}", text);
    std::io::stdout().flush()?;
    lines.next_line().await
}
