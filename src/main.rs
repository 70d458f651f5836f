use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, Weak};

use async_trait::async_trait;
use tracing::{info, Level};

use scout_admin::boot::{bootstrap, PagePresence};
use scout_admin::console::AdminConsole;
use scout_admin::model::{PropertyStatus, SchedulerConfig, SearchFilters, Site};
use scout_admin::notify::{Banner, Kind};
use scout_admin::store::ConfigStore;
use scout_admin::view::{ConfirmGate, ReloadHook, StatsRefresher, StatusPrompt};

/// Terminal front end: confirmation and status prompts on stdin.
struct Terminal;

#[async_trait]
impl ConfirmGate for Terminal {
    async fn confirm(&self, message: &str) -> bool {
        let message = message.to_string();
        tokio::task::spawn_blocking(move || {
            println!("{message}");
            matches!(
                read_line("(o/n) > ").as_deref().map(str::trim),
                Some("o" | "oui" | "y" | "yes")
            )
        })
        .await
        .unwrap_or(false)
    }
}

#[async_trait]
impl StatusPrompt for Terminal {
    async fn choose_status(
        &self,
        current: PropertyStatus,
        options: &[PropertyStatus],
    ) -> Option<String> {
        let labels = options
            .iter()
            .map(|s| s.label())
            .collect::<Vec<_>>()
            .join(", ");
        tokio::task::spawn_blocking(move || {
            println!("Nouveau statut ({labels}) [{current}]");
            let line = read_line("> ")?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .await
        .ok()
        .flatten()
    }
}

/// Full-view reload: re-fetch whatever the backend owns.
struct ViewReload(Weak<AdminConsole>);

#[async_trait]
impl ReloadHook for ViewReload {
    async fn reload(&self) {
        if let Some(console) = self.0.upgrade() {
            console.refresh_status().await;
            console.load_stats().await;
            println!("(vue rechargée)");
        }
    }
}

/// Dashboard stats callback for the maintenance actions.
struct StatsReload(Weak<AdminConsole>);

#[async_trait]
impl StatsRefresher for StatsReload {
    async fn refresh(&self) {
        if let Some(console) = self.0.upgrade() {
            console.load_stats().await;
        }
    }
}

fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    io::stdout().flush().ok();
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line),
    }
}

fn kind_tag(kind: Kind) -> &'static str {
    match kind {
        Kind::Info => "info",
        Kind::Success => "ok",
        Kind::Warning => "attention",
        Kind::Error => "erreur",
    }
}

/// Prints banners as they appear; fades and removals stay silent on a
/// scrollback terminal.
fn print_new_banners(seen: &Mutex<u64>, banners: &[Banner]) {
    let mut last_id = seen.lock().unwrap();
    let threshold = *last_id;
    for banner in banners.iter().filter(|b| b.id > threshold) {
        println!("[{}] {}", kind_tag(banner.kind), banner.message);
        *last_id = banner.id;
    }
}

const HELP: &str = "\
Commandes:
  scrape                         lancer un scraping complet
  email                          envoyer un email de test
  optimize | cleanup | reset     maintenance de la base
  start | stop | status          planificateur
  stats                          recharger les statistiques
  search [min] [max] [dpe] [lieu]   recherche (- pour ignorer un champ)
  site <id> on|off               activer/désactiver un site
  addsite <id> <nom> <url> [timeout]
  edit <id>                      changer le statut d'une annonce
  config <intervalle> <heure> <on|off>
  quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let base_url =
        std::env::var("SCOUT_API_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string());
    let config_dir = std::env::var("SCOUT_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(".scout-admin"));

    info!("🏠 Scout Admin - console d'administration");
    info!("Backend: {base_url}");

    let console = Arc::new(AdminConsole::new(
        &base_url,
        ConfigStore::new(config_dir),
        Arc::new(Terminal),
        Arc::new(Terminal),
    )?);

    let seen = Mutex::new(0u64);
    console
        .notifier()
        .set_renderer(move |banners| print_new_banners(&seen, banners));
    console.set_reload_hook(Arc::new(ViewReload(Arc::downgrade(&console))));
    console.register_stats_refresher(Arc::new(StatsReload(Arc::downgrade(&console))));

    let _poller = bootstrap(
        &console,
        PagePresence {
            scheduler: true,
            dashboard: true,
        },
    )
    .await;

    println!("{HELP}");
    loop {
        let Some(line) = tokio::task::spawn_blocking(|| read_line("scout> ")).await? else {
            break;
        };
        let args: Vec<&str> = line.split_whitespace().collect();
        match args.as_slice() {
            [] => {}
            ["quit" | "exit" | "q"] => break,
            ["help" | "?"] => println!("{HELP}"),
            ["scrape"] => console.scrape_all().await,
            ["email"] => console.test_email().await,
            ["optimize"] => console.optimize_db().await,
            ["cleanup"] => console.cleanup_db().await,
            ["reset"] => console.reset_db().await,
            ["start"] => console.start_scheduler().await,
            ["stop"] => console.stop_scheduler().await,
            ["status"] => {
                console.refresh_status().await;
                console.with_views(|v| println!("{}", v.status.render()));
            }
            ["stats"] => console.load_stats().await,
            ["search", rest @ ..] => {
                let filters = SearchFilters {
                    price_min: rest.first().and_then(|s| s.parse().ok()),
                    price_max: rest.get(1).and_then(|s| s.parse().ok()),
                    dpe_max: field(rest.get(2)),
                    location: field(rest.get(3)),
                    status: String::new(),
                };
                console.do_search(filters).await;
                console.with_views(|v| println!("{}", v.results.render()));
            }
            ["site", id, flag @ ("on" | "off")] => {
                console.toggle_site(id, *flag == "on").await;
            }
            ["addsite", id, name, url, rest @ ..] => {
                console
                    .add_site(Site {
                        id: id.to_string(),
                        name: name.to_string(),
                        url: url.to_string(),
                        timeout: rest.first().and_then(|s| s.parse().ok()).unwrap_or(30),
                        enabled: true,
                    })
                    .await;
            }
            ["edit", id] => console.edit_property(id).await,
            ["config", interval, report_time, flag @ ("on" | "off")] => {
                let Ok(interval) = interval.parse() else {
                    println!("intervalle invalide");
                    continue;
                };
                console
                    .save_scheduler(SchedulerConfig {
                        interval,
                        report_time: report_time.to_string(),
                        notifications: *flag == "on",
                    })
                    .await;
            }
            _ => println!("commande inconnue (help pour la liste)"),
        }
    }

    Ok(())
}

/// "-" and absence both mean an empty filter field.
fn field(arg: Option<&&str>) -> String {
    match arg {
        Some(&"-") | None => String::new(),
        Some(s) => s.to_string(),
    }
}
