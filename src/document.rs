use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, warn};

/// How long a notification stays up before the fire-and-forget timer
/// removes it.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// Anchors the markup is known to carry. Writes to anything else are
/// defensive no-ops.
pub const ANCHORS: &[&str] = &[
    "languages-grid",
    "featured-texts-grid",
    "main-content",
    "text-detail",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Default)]
struct State {
    regions: HashMap<String, String>,
    notifications: Vec<Notification>,
    next_notification_id: u64,
    loader_visible: bool,
    menu_open: bool,
    open_dropdowns: HashSet<String>,
}

/// In-memory stand-in for the page: named regions that fragments land in,
/// a notification center, a loader flag, and menu/dropdown state.
pub struct Document {
    state: Arc<Mutex<State>>,
}

impl Document {
    pub fn new() -> Self {
        let mut state = State::default();
        for anchor in ANCHORS {
            state.regions.insert((*anchor).to_string(), String::new());
        }
        Document {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn set_region(&self, anchor: &str, html: String) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        match state.regions.get_mut(anchor) {
            Some(region) => *region = html,
            None => warn!(anchor, "render target missing"),
        }
    }

    pub fn append_region(&self, anchor: &str, html: &str) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        match state.regions.get_mut(anchor) {
            Some(region) => region.push_str(html),
            None => warn!(anchor, "render target missing"),
        }
    }

    pub fn region(&self, anchor: &str) -> Option<String> {
        self.state.lock().ok()?.regions.get(anchor).cloned()
    }

    pub fn notify_success(&self, message: &str) -> u64 {
        self.notify(NotificationKind::Success, message)
    }

    pub fn notify_error(&self, message: &str) -> u64 {
        self.notify(NotificationKind::Error, message)
    }

    fn notify(&self, kind: NotificationKind, message: &str) -> u64 {
        let id = {
            let Ok(mut state) = self.state.lock() else {
                return 0;
            };
            state.next_notification_id += 1;
            let id = state.next_notification_id;
            state.notifications.push(Notification {
                id,
                kind,
                message: message.to_string(),
            });
            id
        };

        // Fixed-delay, fire-and-forget removal. The timer still fires when
        // the notification was already dismissed; dismissal by id is
        // idempotent so the late removal is a no-op.
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            tokio::time::sleep(NOTIFICATION_TTL).await;
            dismiss_in(&state, id);
        });

        id
    }

    /// Removes a notification. Returns false when it was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        dismiss_in(&self.state, id)
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.state
            .lock()
            .map(|state| state.notifications.clone())
            .unwrap_or_default()
    }

    pub fn show_loader(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.loader_visible = true;
        }
    }

    pub fn hide_loader(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.loader_visible = false;
        }
    }

    pub fn loader_visible(&self) -> bool {
        self.state
            .lock()
            .map(|state| state.loader_visible)
            .unwrap_or(false)
    }

    pub fn toggle_menu(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.menu_open = !state.menu_open;
            debug!(open = state.menu_open, "mobile menu toggled");
        }
    }

    pub fn close_menu(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.menu_open = false;
        }
    }

    pub fn menu_open(&self) -> bool {
        self.state
            .lock()
            .map(|state| state.menu_open)
            .unwrap_or(false)
    }

    pub fn toggle_dropdown(&self, id: &str) {
        if let Ok(mut state) = self.state.lock() {
            if !state.open_dropdowns.remove(id) {
                state.open_dropdowns.insert(id.to_string());
            }
        }
    }

    pub fn dropdown_open(&self, id: &str) -> bool {
        self.state
            .lock()
            .map(|state| state.open_dropdowns.contains(id))
            .unwrap_or(false)
    }

    /// Assembles the full page: the embedded shell with every region slot
    /// filled, plus current notifications and the loader.
    pub fn render_page(&self) -> String {
        let Ok(state) = self.state.lock() else {
            return String::new();
        };

        let mut page = include_str!("../assets/shell.html").to_string();
        for anchor in ANCHORS {
            let slot = format!("{{{{{}}}}}", anchor);
            let content = state.regions.get(*anchor).map(String::as_str).unwrap_or("");
            page = page.replace(&slot, content);
        }

        let notifications: String = state
            .notifications
            .iter()
            .map(|n| {
                let class = match n.kind {
                    NotificationKind::Success => "success",
                    NotificationKind::Error => "error",
                };
                format!(
                    "<div class=\"notification notification-{} show\">{}</div>\n",
                    class,
                    crate::view::escape(&n.message)
                )
            })
            .collect();
        page = page.replace("{{notifications}}", &notifications);

        let loader = if state.loader_visible {
            "<div class=\"page-loader\"><div class=\"loader-spinner\"></div><p>Loading...</p></div>\n"
        } else {
            ""
        };
        page.replace("{{loader}}", loader)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn dismiss_in(state: &Mutex<State>, id: u64) -> bool {
    let Ok(mut state) = state.lock() else {
        return false;
    };
    let before = state.notifications.len();
    state.notifications.retain(|n| n.id != id);
    state.notifications.len() != before
}
