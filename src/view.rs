//! Explicit view state for every region the console mutates, each updated
//! through its own render function, plus the async trait seams that replace
//! blocking browser primitives (confirm/prompt) and ambient coupling.

use async_trait::async_trait;

use crate::model::{PropertyStatus, SchedulerConfig, SchedulerStatus};

/// A user-triggered control. `press` enters the Pending state (disabled,
/// busy label); `settle` restores it unconditionally.
#[derive(Debug, Clone)]
pub struct Control {
    label: String,
    busy_label: String,
    enabled: bool,
}

impl Control {
    pub fn new(label: impl Into<String>, busy_label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            busy_label: busy_label.into(),
            enabled: true,
        }
    }

    pub fn press(&mut self) {
        self.enabled = false;
    }

    pub fn settle(&mut self) {
        self.enabled = true;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Label currently shown: the busy one while pending.
    pub fn display_label(&self) -> &str {
        if self.enabled {
            &self.label
        } else {
            &self.busy_label
        }
    }
}

/// Scheduler status display fields.
#[derive(Debug, Default)]
pub struct StatusView {
    pub running: String,
    pub last_run: String,
    pub next_run: String,
}

impl StatusView {
    pub fn apply(&mut self, status: &SchedulerStatus) {
        self.running = if status.running { "En cours" } else { "Arrêté" }.to_string();
        self.last_run = status.last_run.clone();
        self.next_run = status.next_run.clone();
    }

    pub fn render(&self) -> String {
        format!(
            "État: {}\nDernière exécution: {}\nProchaine exécution: {}",
            self.running, self.last_run, self.next_run
        )
    }
}

/// Latest rendered search fragment.
#[derive(Debug, Default)]
pub struct ResultsView {
    html: Option<String>,
}

impl ResultsView {
    pub fn set(&mut self, fragment: String) {
        self.html = Some(fragment);
    }

    pub fn render(&self) -> &str {
        self.html.as_deref().unwrap_or("")
    }
}

/// Scheduler preferences form, loaded from the durable store at bootstrap.
#[derive(Debug, Default)]
pub struct SchedulerForm {
    pub config: SchedulerConfig,
}

/// All regions the controllers touch. Each action exclusively owns its
/// control for the duration of one run.
#[derive(Debug)]
pub struct Views {
    pub scrape: Control,
    pub test_email: Control,
    pub optimize: Control,
    pub cleanup: Control,
    pub reset: Control,
    pub start_scheduler: Control,
    pub stop_scheduler: Control,
    pub add_site: Control,
    pub search: Control,
    pub status: StatusView,
    pub results: ResultsView,
    pub scheduler_form: SchedulerForm,
}

impl Views {
    pub fn new() -> Self {
        Self {
            scrape: Control::new("Scraper Maintenant", "Scraping..."),
            test_email: Control::new("Envoyer un email de test", "Envoi..."),
            optimize: Control::new("Optimiser", "Optimisation..."),
            cleanup: Control::new("Nettoyer les doublons", "Nettoyage..."),
            reset: Control::new("Tout réinitialiser", "Réinitialisation..."),
            start_scheduler: Control::new("Démarrer", "Démarrage..."),
            stop_scheduler: Control::new("Arrêter", "Arrêt..."),
            add_site: Control::new("Ajouter le site", "Ajout..."),
            search: Control::new("Rechercher", "Recherche..."),
            status: StatusView::default(),
            results: ResultsView::default(),
            scheduler_form: SchedulerForm::default(),
        }
    }
}

impl Default for Views {
    fn default() -> Self {
        Self::new()
    }
}

/// Gate in front of destructive actions. Answering no must keep the
/// controller in Idle with zero network calls.
#[async_trait]
pub trait ConfirmGate: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
}

/// Replacement-status picker for the property edit flow. `None` means the
/// user cancelled.
#[async_trait]
pub trait StatusPrompt: Send + Sync {
    async fn choose_status(
        &self,
        current: PropertyStatus,
        options: &[PropertyStatus],
    ) -> Option<String>;
}

/// Registered dashboard callback, invoked by maintenance actions instead of
/// probing for an ambient stats loader.
#[async_trait]
pub trait StatsRefresher: Send + Sync {
    async fn refresh(&self);
}

/// Full-view reload requested by actions that change persisted server
/// records; implementations fire after the 1 s grace delay.
#[async_trait]
pub trait ReloadHook: Send + Sync {
    async fn reload(&self);
}
