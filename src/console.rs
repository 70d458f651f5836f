//! Action controllers: one method per user-triggered operation, all sharing
//! the same lifecycle. Pending disables the triggering control and swaps in
//! its busy label; Settled restores it unconditionally once the call
//! resolves. Destructive actions pass the confirm gate before any request.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use serde_json::{json, Value};
use tracing::info;

use crate::api::ApiClient;
use crate::model::{Property, PropertyStatus, SchedulerConfig, SchedulerStatus, SearchFilters, Site};
use crate::notify::NotificationCenter;
use crate::render::render_results;
use crate::store::ConfigStore;
use crate::view::{ConfirmGate, Control, ReloadHook, StatsRefresher, StatusPrompt, Views};

/// Grace delay before the full-view reload that follows a server-side
/// record change.
pub const RELOAD_DELAY: Duration = Duration::from_millis(1000);

pub struct AdminConsole {
    api: ApiClient,
    notifier: NotificationCenter,
    views: Mutex<Views>,
    store: ConfigStore,
    confirm: Arc<dyn ConfirmGate>,
    prompt: Arc<dyn StatusPrompt>,
    reload: Mutex<Option<Arc<dyn ReloadHook>>>,
    stats: Mutex<Option<Arc<dyn StatsRefresher>>>,
}

impl AdminConsole {
    pub fn new(
        base_url: impl Into<String>,
        store: ConfigStore,
        confirm: Arc<dyn ConfirmGate>,
        prompt: Arc<dyn StatusPrompt>,
    ) -> Result<Self> {
        let notifier = NotificationCenter::new();
        let api = ApiClient::new(base_url, notifier.clone())?;
        Ok(Self {
            api,
            notifier,
            views: Mutex::new(Views::new()),
            store,
            confirm,
            prompt,
            reload: Mutex::new(None),
            stats: Mutex::new(None),
        })
    }

    pub fn notifier(&self) -> &NotificationCenter {
        &self.notifier
    }

    /// Runs `f` against the view state under the lock.
    pub fn with_views<R>(&self, f: impl FnOnce(&mut Views) -> R) -> R {
        f(&mut self.views.lock().unwrap())
    }

    /// Registers the hook fired when a server-side record change warrants a
    /// full view reload.
    pub fn set_reload_hook(&self, hook: Arc<dyn ReloadHook>) {
        *self.reload.lock().unwrap() = Some(hook);
    }

    /// Registers the dashboard's stats-refresh callback. Maintenance actions
    /// only refresh stats when one is registered.
    pub fn register_stats_refresher(&self, refresher: Arc<dyn StatsRefresher>) {
        *self.stats.lock().unwrap() = Some(refresher);
    }

    // ---- actions ----

    /// Full scrape across all sources.
    pub async fn scrape_all(&self) {
        self.press(|v| &mut v.scrape);
        let result = self
            .api
            .post("/api/scrape", Some(json!({"source": "all"})))
            .await;
        self.settle(|v| &mut v.scrape);

        match result.filter(ApiClient::succeeded) {
            Some(payload) => {
                let found = payload.get("new").and_then(Value::as_u64).unwrap_or(0);
                self.notifier
                    .success(format!("{found} nouvelle(s) propriété(s) trouvée(s)"));
                self.schedule_reload();
            }
            None => self.notifier.error("Erreur lors du scraping"),
        }
    }

    pub async fn test_email(&self) {
        self.press(|v| &mut v.test_email);
        let result = self.api.post("/api/alerts/test", None).await;
        self.settle(|v| &mut v.test_email);

        if result.as_ref().is_some_and(ApiClient::succeeded) {
            self.notifier.success("Email de test envoyé avec succès");
        } else {
            self.notifier.error("Erreur lors de l'envoi de l'email");
        }
    }

    pub async fn optimize_db(&self) {
        self.press(|v| &mut v.optimize);
        let result = self.api.post("/api/db/optimize", None).await;
        self.settle(|v| &mut v.optimize);

        if result.as_ref().is_some_and(ApiClient::succeeded) {
            self.notifier.success("Base de données optimisée!");
            self.refresh_stats().await;
        } else {
            self.notifier.error("Erreur lors de l'optimisation");
        }
    }

    pub async fn cleanup_db(&self) {
        if !self
            .confirm
            .confirm("Ceci supprimera les doublons. Continuer?")
            .await
        {
            return;
        }

        self.press(|v| &mut v.cleanup);
        let result = self.api.post("/api/db/cleanup", None).await;
        self.settle(|v| &mut v.cleanup);

        match result.filter(ApiClient::succeeded) {
            Some(payload) => {
                let message = ApiClient::server_message(&payload)
                    .unwrap_or("Nettoyage effectué!")
                    .to_string();
                self.notifier.success(message);
                self.refresh_stats().await;
            }
            None => self.notifier.error("Erreur lors du nettoyage"),
        }
    }

    pub async fn reset_db(&self) {
        if !self
            .confirm
            .confirm("⚠️ ATTENTION: Ceci supprimera TOUTES les données!\n\nÊtes-vous vraiment sûr?")
            .await
        {
            return;
        }

        self.press(|v| &mut v.reset);
        let result = self.api.post("/api/db/reset", None).await;
        self.settle(|v| &mut v.reset);

        if result.as_ref().is_some_and(ApiClient::succeeded) {
            self.notifier.success("Base de données réinitialisée!");
            self.schedule_reload();
        } else {
            self.notifier.error("Erreur lors de la réinitialisation");
        }
    }

    pub async fn start_scheduler(&self) {
        self.press(|v| &mut v.start_scheduler);
        let result = self.api.post("/api/scheduler/start", None).await;
        self.settle(|v| &mut v.start_scheduler);

        if result.as_ref().is_some_and(ApiClient::succeeded) {
            self.notifier.success("Planificateur démarré");
        } else {
            self.notifier.error("Erreur lors du démarrage du planificateur");
        }
    }

    pub async fn stop_scheduler(&self) {
        if !self.confirm.confirm("Êtes-vous sûr?").await {
            return;
        }

        self.press(|v| &mut v.stop_scheduler);
        let result = self.api.post("/api/scheduler/stop", None).await;
        self.settle(|v| &mut v.stop_scheduler);

        match result.filter(ApiClient::succeeded) {
            Some(payload) => {
                let message = ApiClient::server_message(&payload)
                    .unwrap_or("Planificateur arrêté")
                    .to_string();
                self.notifier.success(message);
                self.refresh_status().await;
            }
            None => self.notifier.error("Erreur lors de l'arrêt du planificateur"),
        }
    }

    pub async fn toggle_site(&self, site_id: &str, enabled: bool) {
        let result = self
            .api
            .put(&format!("/api/sites/{site_id}"), json!({"enabled": enabled}))
            .await;

        match result.filter(ApiClient::succeeded) {
            Some(payload) => {
                let message = ApiClient::server_message(&payload)
                    .unwrap_or("Site mis à jour")
                    .to_string();
                self.notifier.success(message);
            }
            None => self.notifier.error("Erreur lors de la mise à jour du site"),
        }
    }

    pub async fn add_site(&self, site: Site) {
        if site.id.trim().is_empty() || site.name.trim().is_empty() || site.url.trim().is_empty() {
            self.notifier.error("Tous les champs sont requis");
            return;
        }

        self.press(|v| &mut v.add_site);
        let result = self.api.post("/api/sites/new", Some(json!(site))).await;
        self.settle(|v| &mut v.add_site);

        match result.filter(ApiClient::succeeded) {
            Some(payload) => {
                let message = ApiClient::server_message(&payload)
                    .unwrap_or("Site ajouté")
                    .to_string();
                self.notifier.success(message);
                self.schedule_reload();
            }
            None => self.notifier.error("Erreur lors de l'ajout du site"),
        }
    }

    /// Submits a search and rewrites the results region. Success renders,
    /// it does not notify.
    pub async fn do_search(&self, filters: SearchFilters) {
        self.press(|v| &mut v.search);
        let result = self.api.post("/api/search", Some(json!(filters))).await;
        self.settle(|v| &mut v.search);

        match result.filter(ApiClient::succeeded) {
            Some(payload) => {
                let properties: Vec<Property> = payload
                    .get("properties")
                    .cloned()
                    .and_then(|v| serde_json::from_value(v).ok())
                    .unwrap_or_default();
                let fragment = render_results(&properties);
                self.with_views(|v| v.results.set(fragment));
            }
            None => self.notifier.error("Erreur lors de la recherche"),
        }
    }

    /// Fetches a property, asks for a replacement status, and updates it.
    /// A cancelled prompt or a value outside the closed set issues no
    /// second call.
    pub async fn edit_property(&self, id: &str) {
        let fetched = self
            .api
            .get(&format!("/api/property/{id}"))
            .await
            .filter(ApiClient::succeeded);
        let Some(payload) = fetched else {
            self.notifier.error("Erreur lors de la mise à jour");
            return;
        };

        let property: Property = match payload
            .get("property")
            .cloned()
            .map(serde_json::from_value)
        {
            Some(Ok(property)) => property,
            _ => {
                self.notifier.error("Erreur lors de la mise à jour");
                return;
            }
        };

        let current = property.editing_status();
        let choice = self.prompt.choose_status(current, &PropertyStatus::ALL).await;
        let Some(status) = choice.as_deref().and_then(PropertyStatus::parse) else {
            return;
        };

        let result = self
            .api
            .post(
                &format!("/api/property/{id}"),
                Some(json!({"status": status.label()})),
            )
            .await;

        if result.as_ref().is_some_and(ApiClient::succeeded) {
            self.notifier.success("Propriété mise à jour");
            self.schedule_reload();
        } else {
            self.notifier.error("Erreur lors de la mise à jour");
        }
    }

    /// Persists scheduler preferences locally; nothing goes to the backend.
    pub async fn save_scheduler(&self, config: SchedulerConfig) {
        match self.store.save(&config).await {
            Ok(()) => {
                self.with_views(|v| v.scheduler_form.config = config);
                self.notifier.success("Configuration enregistrée");
            }
            Err(err) => {
                self.notifier.error(format!("Erreur: {err}"));
            }
        }
    }

    /// One status fetch without touching the view; the poller applies its
    /// own sequencing before writing.
    pub async fn fetch_status(&self) -> Option<SchedulerStatus> {
        let payload = self.api.get("/api/scheduler/status").await?;
        serde_json::from_value(payload).ok()
    }

    pub fn apply_status(&self, status: &SchedulerStatus) {
        self.with_views(|v| v.status.apply(status));
    }

    /// Immediate fetch-and-apply, used at bootstrap and after a stop.
    pub async fn refresh_status(&self) {
        if let Some(status) = self.fetch_status().await {
            self.apply_status(&status);
        }
    }

    /// Dashboard statistics are only logged by this layer.
    pub async fn load_stats(&self) {
        if let Some(payload) = self.api.get("/api/stats").await {
            info!(stats = %payload, "dashboard stats");
        }
    }

    pub async fn load_scheduler_form(&self) {
        if let Some(config) = self.store.load().await {
            self.with_views(|v| v.scheduler_form.config = config);
        }
    }

    // ---- shared transitions ----

    fn press(&self, pick: fn(&mut Views) -> &mut Control) {
        self.with_views(|v| pick(v).press());
    }

    fn settle(&self, pick: fn(&mut Views) -> &mut Control) {
        self.with_views(|v| pick(v).settle());
    }

    fn schedule_reload(&self) {
        let Some(hook) = self.reload.lock().unwrap().clone() else {
            return;
        };
        tokio::spawn(async move {
            tokio::time::sleep(RELOAD_DELAY).await;
            hook.reload().await;
        });
    }

    async fn refresh_stats(&self) {
        let refresher = self.stats.lock().unwrap().clone();
        if let Some(refresher) = refresher {
            refresher.refresh().await;
        }
    }
}
