//! Transient status banners. Every call to [`NotificationCenter::notify`]
//! produces an independent banner with its own two-phase dismissal timer:
//! visible for 3 s, faded for a further 300 ms, then gone.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::debug;

/// How long a banner stays fully visible.
pub const VISIBLE: Duration = Duration::from_millis(3000);
/// How long the faded banner lingers before removal.
pub const FADE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Kind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl Kind {
    pub fn css_class(&self) -> &'static str {
        match self {
            Kind::Info => "notification-info",
            Kind::Success => "notification-success",
            Kind::Warning => "notification-warning",
            Kind::Error => "notification-error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Banner {
    pub id: u64,
    pub message: String,
    pub kind: Kind,
    pub faded: bool,
}

type Renderer = Box<dyn Fn(&[Banner]) + Send + Sync>;

struct Inner {
    banners: Mutex<Vec<Banner>>,
    renderer: Mutex<Option<Renderer>>,
    next_id: AtomicU64,
}

/// Cheap-to-clone handle; all clones share the same banner stack.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<Inner>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                banners: Mutex::new(Vec::new()),
                renderer: Mutex::new(None),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Registers the single render function for the notification region.
    /// It is invoked with the full banner stack on every change.
    pub fn set_renderer(&self, renderer: impl Fn(&[Banner]) + Send + Sync + 'static) {
        *self.inner.renderer.lock().unwrap() = Some(Box::new(renderer));
        self.render();
    }

    /// Appends a banner and schedules its dismissal. Must run inside a tokio
    /// runtime; the dismissal timers live on the runtime clock.
    pub fn notify(&self, message: impl Into<String>, kind: Kind) {
        let message = message.into();
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(kind = ?kind, %message, "notification");

        self.inner.banners.lock().unwrap().push(Banner {
            id,
            message,
            kind,
            faded: false,
        });
        self.render();

        let center = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(VISIBLE).await;
            center.fade(id);
            tokio::time::sleep(FADE).await;
            center.remove(id);
        });
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(message, Kind::Info);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(message, Kind::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(message, Kind::Error);
    }

    /// Snapshot of the currently live banners, newest last.
    pub fn active(&self) -> Vec<Banner> {
        self.inner.banners.lock().unwrap().clone()
    }

    fn fade(&self, id: u64) {
        let mut banners = self.inner.banners.lock().unwrap();
        if let Some(banner) = banners.iter_mut().find(|b| b.id == id) {
            banner.faded = true;
        }
        drop(banners);
        self.render();
    }

    fn remove(&self, id: u64) {
        self.inner.banners.lock().unwrap().retain(|b| b.id != id);
        self.render();
    }

    fn render(&self) {
        let renderer = self.inner.renderer.lock().unwrap();
        if let Some(renderer) = renderer.as_ref() {
            let banners = self.inner.banners.lock().unwrap().clone();
            renderer(&banners);
        }
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}
