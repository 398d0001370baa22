//! Terminal front end for a routine session
//!
//! Lines starting with `/` are commands; anything else is a chat message.

use std::sync::Arc;

use anyhow::{Context, Result};
use routine_relay::client::{
    Catalog, Command, FileStorage, HttpRelayClient, Outcome, ProductId, Session,
};
use routine_relay::config::ClientConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const HELP: &str = "commands: /category <name>, /toggle <id>, /remove <id>, /details <id>, /selected, /routine, /quit";

enum Input {
    Command(Command),
    ListSelected,
    Help,
    Quit,
}

fn parse_input(line: &str) -> Option<Input> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Some(Input::Command(Command::SendChat(line.to_string())));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    // A command whose id does not parse falls back to the help line
    let with_id = |build: fn(ProductId) -> Command| match arg.parse() {
        Ok(id) => Input::Command(build(id)),
        Err(_) => Input::Help,
    };

    match name {
        "category" => Some(Input::Command(Command::SelectCategory(arg.to_string()))),
        "toggle" => Some(with_id(Command::ToggleProduct)),
        "remove" => Some(with_id(Command::RemoveProduct)),
        "details" => Some(with_id(Command::ShowDetails)),
        "routine" => Some(Input::Command(Command::GenerateRoutine)),
        "selected" => Some(Input::ListSelected),
        "quit" | "exit" => Some(Input::Quit),
        _ => Some(Input::Help),
    }
}

fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Products { visible, selected } => {
            if visible.is_empty() {
                println!("Select a category to view products");
            }
            for product in visible {
                let mark = if selected.contains(&product.id) { "*" } else { " " };
                println!("[{}] {:>3}  {} — {}", mark, product.id, product.brand, product.name);
            }
        }
        Outcome::Details(product) => {
            println!("{}\n  {}\n  {}", product.name, product.brand, product.description);
        }
        Outcome::Chat(lines) => {
            for line in lines {
                println!("{}", line.render());
            }
        }
        Outcome::Ignored => {}
    }
}

async fn load_catalog(config: &ClientConfig) -> Catalog {
    match tokio::fs::read_to_string(&config.catalog_path).await {
        Ok(raw) => Catalog::from_json(&raw).unwrap_or_else(|err| {
            tracing::warn!(path = %config.catalog_path.display(), error = %err, "catalog unreadable");
            Catalog::default()
        }),
        Err(err) => {
            tracing::warn!(path = %config.catalog_path.display(), error = %err, "catalog missing");
            Catalog::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let config = ClientConfig::from_env();
    let storage = FileStorage::open(&config.state_dir).context("opening state directory")?;
    let transport = HttpRelayClient::new(config.gateway_url.clone())?;
    let catalog = load_catalog(&config).await;

    let mut session = Session::restore(catalog, Arc::new(storage), Arc::new(transport));

    for line in session.history() {
        println!("{}", line.render());
    }
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_input(&line) {
            None => continue,
            Some(Input::Quit) => break,
            Some(Input::Help) => {
                println!("{}", HELP);
                continue;
            }
            Some(Input::ListSelected) => {
                let selected = session.selected();
                if selected.is_empty() {
                    println!("No products selected");
                }
                for product in selected {
                    println!("  {:>3}  {}", product.id, product.name);
                }
                continue;
            }
            Some(Input::Command(command)) => command,
        };

        if matches!(command, Command::SendChat(_) | Command::GenerateRoutine) {
            println!("Bot: …thinking…");
        }
        match session.dispatch(command).await {
            Ok(outcome) => print_outcome(&outcome),
            Err(err) => eprintln!("could not save conversation state: {}", err),
        }
    }

    Ok(())
}
