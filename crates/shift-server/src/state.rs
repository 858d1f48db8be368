use shift_core::classifier::EventRouter;
use shift_core::clock::Clock;
use shift_core::desk::IncidentDesk;
use shift_core::platform::ChatPlatform;
use shift_core::timeline::TimelineStore;
use std::sync::Arc;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub desk: Arc<IncidentDesk>,
    pub events: Arc<EventRouter>,
    pub store: Arc<TimelineStore>,
    pub clock: Arc<dyn Clock>,
    /// Request signing secret. `None` disables signature checks.
    pub signing_secret: Option<Arc<str>>,
    /// Bearer token for `/api/*`. `None` leaves those routes open.
    pub api_token: Option<Arc<str>>,
}

/// Everything needed to assemble an [`AppState`].
pub struct StateParts {
    pub platform: Arc<dyn ChatPlatform>,
    pub store: Arc<TimelineStore>,
    pub clock: Arc<dyn Clock>,
    pub slash_command: String,
    pub notifications_channel: String,
    pub capture_all_messages: bool,
    pub signing_secret: Option<String>,
    pub api_token: Option<String>,
}

impl AppState {
    pub fn new(parts: StateParts) -> Self {
        let desk = IncidentDesk::new(
            parts.platform.clone(),
            parts.store.clone(),
            parts.clock.clone(),
            parts.slash_command,
            parts.notifications_channel,
        );
        let events = EventRouter::new(
            parts.store.clone(),
            parts.platform,
            parts.capture_all_messages,
        );
        Self {
            desk: Arc::new(desk),
            events: Arc::new(events),
            store: parts.store,
            clock: parts.clock,
            signing_secret: parts
                .signing_secret
                .filter(|s| !s.is_empty())
                .map(Arc::from),
            api_token: parts.api_token.filter(|t| !t.is_empty()).map(Arc::from),
        }
    }
}
