//! Interactive terminal dashboard for short.io link statistics.
//!
//! Talks to the forwarding endpoint (see the `shortio-dash` binary), caching
//! every response durably so revisited views render without network calls.
//!
//! # Usage
//!
//! ```bash
//! # Against the local forwarding endpoint
//! cargo run --bin dash
//!
//! # Against a deployed endpoint
//! cargo run --bin dash -- --endpoint https://track.example.com/shortio-api
//! ```
//!
//! # Environment Variables
//!
//! - `GATEWAY_ENDPOINT`: forwarding endpoint URL
//! - `STORAGE_PATH`: durable session/cache file
//!
//! # Features
//!
//! - **Domain and link statistics**: click totals, time series, breakdowns
//! - **Reporting periods**: named presets and custom date ranges
//! - **Durable cache**: revisits render instantly; refresh bypasses on demand
//! - **Interactive Prompts**: navigation with selection menus
//! - **Colored Output**: terminal-friendly formatting using `colored` crate

use shortio_dash::application::controller::ViewController;
use shortio_dash::application::presenter::{ChartUpdate, chart_updates};
use shortio_dash::application::services::{ApiGateway, ResponseCache, Session};
use shortio_dash::config;
use shortio_dash::domain::entities::StatsPayload;
use shortio_dash::domain::navigation::View;
use shortio_dash::domain::period::Preset;
use shortio_dash::infrastructure::http::ReqwestTransport;
use shortio_dash::infrastructure::storage::FileStore;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use colored::*;
use dialoguer::{Input, Select, theme::ColorfulTheme};
use std::sync::Arc;
use std::time::Duration;

/// Terminal dashboard for short.io statistics.
#[derive(Parser)]
#[command(name = "dash")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Forwarding endpoint URL (overrides GATEWAY_ENDPOINT)
    #[arg(long)]
    endpoint: Option<String>,

    /// Durable session/cache file (overrides STORAGE_PATH)
    #[arg(long)]
    storage: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = config::load_from_env()?;
    if let Some(endpoint) = cli.endpoint {
        config.gateway_endpoint = endpoint;
    }
    if let Some(storage) = cli.storage {
        config.storage_path = storage;
    }

    let store = Arc::new(FileStore::open(&config.storage_path).await?);
    let transport = Arc::new(ReqwestTransport::new(
        &config.gateway_endpoint,
        Duration::from_secs(config.upstream_timeout_seconds),
    )?);
    let gateway = Arc::new(ApiGateway::new(transport, ResponseCache::new(store.clone())));
    let session = Session::new(store);

    let mut controller = ViewController::new(gateway, session);
    controller.init().await;

    loop {
        render(&controller);
        if !step(&mut controller).await? {
            break;
        }
    }

    println!("{}", "Bye.".dimmed());
    Ok(())
}

/// Prints the current view: breadcrumbs, error banner, and content.
fn render(controller: &ViewController) {
    println!();
    let trail: Vec<String> = controller
        .breadcrumbs()
        .iter()
        .map(|c| c.label().to_string())
        .collect();
    println!("{}", trail.join(" > ").bold());

    if let Some(error) = controller.session().last_error() {
        println!("{} {}", "Error:".red().bold(), error.red());
    }
    if let Some(at) = controller.session().last_retrieved() {
        println!(
            "{}",
            format!("Data retrieved {}", at.format("%Y-%m-%d %H:%M:%S UTC")).dimmed()
        );
    }

    match controller.view() {
        View::ApiKeyEntry => {
            println!("Enter your short.io API key to get started.");
        }
        View::DomainList => {
            println!("{}", "Your Domains".cyan().bold());
            if controller.domains().is_empty() {
                println!("  (no domains)");
            }
            for domain in controller.domains() {
                println!("  {}", domain.hostname);
            }
        }
        View::DomainDetail => {
            println!(
                "{} {}",
                "Period:".cyan(),
                controller.period().to_string().bold()
            );
            if let Some(stats) = controller.domain_stats() {
                render_stats(stats);
            }
            if let Some(page) = controller.link_page() {
                println!("{}", "Links".cyan().bold());
                for link in &page.links {
                    println!("  {}", link.display_path());
                }
                if let Some(count) = page.count {
                    println!("{}", format!("  ({count} total)").dimmed());
                }
            }
        }
        View::LinkDetail => {
            println!(
                "{} {}",
                "Period:".cyan(),
                controller.period().to_string().bold()
            );
            if let Some(link) = controller.link_info() {
                if let Some(short_url) = &link.short_url {
                    println!("{} {}", "Short URL:".cyan(), short_url);
                }
                if let Some(original) = &link.original_url {
                    println!("{} {}", "Destination:".cyan(), original);
                }
            }
            if let Some(stats) = controller.link_stats() {
                render_stats(stats);
            }
        }
    }
}

fn render_stats(stats: &StatsPayload) {
    println!(
        "{} {}   {} {}",
        "Total clicks:".cyan(),
        stats.total_clicks.to_string().bold(),
        "Human clicks:".cyan(),
        stats.human_clicks.to_string().bold()
    );
    if let Some(links) = stats.total_links {
        println!("{} {}", "Links:".cyan(), links);
    }

    for update in chart_updates(stats) {
        match update {
            ChartUpdate::Line { slot, series } => {
                println!("{}", slot.title().cyan().bold());
                let max = series.iter().map(|(_, n)| *n).max().unwrap_or(1).max(1);
                for (date, count) in series {
                    println!("  {date}  {:<30} {count}", gauge(count, max));
                }
            }
            ChartUpdate::Bar { slot, series } => {
                println!("{}", slot.title().cyan().bold());
                let max = series.iter().map(|(_, n)| *n).max().unwrap_or(1).max(1);
                for (label, count) in series {
                    println!("  {label:<24} {:<30} {count}", gauge(count, max));
                }
            }
            ChartUpdate::Clear(_) => {}
        }
    }
}

/// Fixed-width proportional bar.
fn gauge(value: u64, max: u64) -> String {
    const WIDTH: u64 = 30;
    let filled = (value * WIDTH).div_ceil(max).min(WIDTH) as usize;
    "#".repeat(filled)
}

/// Prompts for and executes one action. Returns `false` to quit.
async fn step(controller: &mut ViewController) -> Result<bool> {
    match controller.view() {
        View::ApiKeyEntry => step_api_key(controller).await,
        View::DomainList => step_domain_list(controller).await,
        View::DomainDetail => step_domain_detail(controller).await,
        View::LinkDetail => step_link_detail(controller).await,
    }
}

async fn step_api_key(controller: &mut ViewController) -> Result<bool> {
    let choice = Select::with_theme(&ColorfulTheme::default())
        .items(&["Enter API key", "Quit"])
        .default(0)
        .interact()?;

    if choice == 1 {
        return Ok(false);
    }

    let key: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("API key (sk_...)")
        .interact_text()?;
    // Validation errors land in the banner; just re-render.
    let _ = controller.submit_credential(&key).await;
    Ok(true)
}

async fn step_domain_list(controller: &mut ViewController) -> Result<bool> {
    let mut items: Vec<String> = controller
        .domains()
        .iter()
        .map(|d| d.hostname.clone())
        .collect();
    let first_extra = items.len();
    items.push("Refresh".to_string());
    items.push("Log out".to_string());
    items.push("Quit".to_string());

    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Open a domain")
        .items(&items)
        .default(0)
        .interact()?;

    if choice < first_extra {
        let domain = controller.domains()[choice].clone();
        controller.select_domain(&domain.id, &domain.hostname).await;
    } else {
        match choice - first_extra {
            0 => controller.refresh().await,
            1 => controller.go_home().await,
            _ => return Ok(false),
        }
    }
    Ok(true)
}

async fn step_domain_detail(controller: &mut ViewController) -> Result<bool> {
    let page = controller.link_page();
    let links: Vec<(String, String)> = page
        .map(|p| {
            p.links
                .iter()
                .map(|l| (l.id.clone(), l.display_path()))
                .collect()
        })
        .unwrap_or_default();
    let next_cursor = page.and_then(|p| p.next_page_token.clone());

    let mut items: Vec<String> = links.iter().map(|(_, path)| path.clone()).collect();
    let first_extra = items.len();
    if next_cursor.is_some() {
        items.push("Next page".to_string());
    }
    items.push("Change period".to_string());
    items.push("Refresh".to_string());
    items.push("Back to domains".to_string());
    items.push("Log out".to_string());
    items.push("Quit".to_string());

    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Open a link")
        .items(&items)
        .default(0)
        .interact()?;

    if choice < first_extra {
        let (id, _) = links[choice].clone();
        controller.select_link(&id).await;
        return Ok(true);
    }

    let mut extra = choice - first_extra;
    if let Some(cursor) = next_cursor {
        if extra == 0 {
            controller.request_next_page(&cursor).await;
            return Ok(true);
        }
        extra -= 1;
    }
    match extra {
        0 => choose_period(controller).await?,
        1 => controller.refresh().await,
        2 => controller.load_domains(false).await,
        3 => controller.go_home().await,
        _ => return Ok(false),
    }
    Ok(true)
}

async fn step_link_detail(controller: &mut ViewController) -> Result<bool> {
    let items = [
        "Change period",
        "Refresh",
        "Back to domain",
        "Back to domains",
        "Log out",
        "Quit",
    ];
    let choice = Select::with_theme(&ColorfulTheme::default())
        .items(&items)
        .default(0)
        .interact()?;

    match choice {
        0 => choose_period(controller).await?,
        1 => controller.refresh().await,
        2 => controller.jump(View::DomainDetail).await,
        3 => controller.load_domains(false).await,
        4 => controller.go_home().await,
        _ => return Ok(false),
    }
    Ok(true)
}

async fn choose_period(controller: &mut ViewController) -> Result<()> {
    let mut items: Vec<String> = Preset::ALL.iter().map(|p| p.as_str().to_string()).collect();
    items.push("custom range".to_string());

    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Reporting period")
        .items(&items)
        .default(3)
        .interact()?;

    if let Some(preset) = Preset::ALL.get(choice) {
        controller.set_period_preset(*preset).await;
    } else {
        let start = prompt_date("Start date (YYYY-MM-DD)")?;
        let end = prompt_date("End date (YYYY-MM-DD)")?;
        // A reversed or incomplete range lands in the error banner.
        let _ = controller.apply_custom_period(start, end).await;
    }
    Ok(())
}

fn prompt_date(prompt: &str) -> Result<Option<NaiveDate>> {
    let raw: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(raw.trim().parse().ok())
}
