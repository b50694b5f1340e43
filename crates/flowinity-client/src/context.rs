//! Session wiring: one instance of every store, sharing one API client and
//! one local storage handle.

use std::sync::Arc;

use tracing::info;

use flowinity_api::{ApiClient, HttpTransport, Transport};
use flowinity_store::LocalStorage;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::router::{Navigation, Router};
use crate::stores::{AppStore, ChatStore, MessagesStore, TypingTracker, UserStore};

pub struct AppContext {
    pub config: ClientConfig,
    pub storage: Arc<LocalStorage>,
    pub api: ApiClient,
    pub app: Arc<AppStore>,
    pub users: Arc<UserStore>,
    pub messages: Arc<MessagesStore>,
    pub typing: Arc<TypingTracker>,
    pub chats: Arc<ChatStore>,
    pub router: Router,
}

impl AppContext {
    /// Assemble a session over an explicit storage and transport.
    pub fn new(config: ClientConfig, storage: Arc<LocalStorage>, transport: Arc<dyn Transport>) -> Self {
        let api = ApiClient::new(transport);
        let app = Arc::new(AppStore::new());
        let users = Arc::new(UserStore::new(
            api.clone(),
            storage.clone(),
            app.clone(),
            config.default_language.clone(),
        ));
        let messages = Arc::new(MessagesStore::new(api.clone()));
        let typing = Arc::new(TypingTracker::new());
        let chats = Arc::new(ChatStore::new(
            api.clone(),
            storage.clone(),
            app.clone(),
            users.clone(),
            messages.clone(),
            typing.clone(),
        ));

        Self {
            config,
            storage,
            api,
            app,
            users,
            messages,
            typing,
            chats,
            router: Router::default(),
        }
    }

    /// Open local storage and the HTTP transport described by `config`.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let storage = match &config.data_dir {
            Some(dir) => LocalStorage::open_in_dir(dir)?,
            None => LocalStorage::open_default()?,
        };
        let transport = HttpTransport::new(config.api_url.clone(), config.request_timeout)?;
        info!(api_url = %config.api_url, "client context ready");
        Ok(Self::new(config, Arc::new(storage), Arc::new(transport)))
    }

    /// Load the session user, then the chat list.
    pub async fn init(&self) -> Result<()> {
        self.users.init().await?;
        self.chats.init().await?;
        Ok(())
    }

    /// Resolve a navigation against the current session.
    pub fn navigate(&self, path: &str) -> Navigation {
        self.router.navigate(path, self.users.has_session())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use flowinity_api::testing::MockTransport;

    use super::*;
    use crate::stores::{Badge, RailMode};

    fn context(mock: Arc<MockTransport>) -> AppContext {
        let storage = Arc::new(LocalStorage::open_in_memory().unwrap());
        AppContext::new(ClientConfig::default(), storage, mock)
    }

    #[tokio::test]
    async fn test_init_loads_user_then_chats() {
        let mock = Arc::new(MockTransport::new());
        mock.respond(
            "GetUser",
            json!({
                "currentUser": { "id": 1, "username": "me", "language": "nl" },
                "trackedUsers": [],
                "blockedUsers": []
            }),
        );
        mock.respond(
            "Chats",
            json!({ "chats": [{ "id": 2, "type": "group", "name": "Team", "unread": 3 }], "userEmoji": [] }),
        );
        let ctx = context(mock.clone());

        assert!(matches!(ctx.navigate("/communications/2"), Navigation::Redirect(_)));

        ctx.init().await.unwrap();

        let order: Vec<&str> = mock.calls().iter().map(|call| call.operation).collect();
        assert_eq!(order, vec!["GetUser", "Chats"]);
        assert_eq!(ctx.app.locale(), "nl");
        assert_eq!(ctx.app.badge(RailMode::Chat), Some(Badge::Count(3)));
        assert!(matches!(ctx.navigate("/communications/2"), Navigation::Proceed(_)));
    }

    #[tokio::test]
    async fn test_user_failure_stops_init() {
        let mock = Arc::new(MockTransport::new());
        mock.fail("GetUser", "unauthorized");
        let ctx = context(mock.clone());

        assert!(ctx.init().await.is_err());
        assert!(mock.calls_to("Chats").is_empty());
    }

    #[test]
    fn test_from_config_uses_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            data_dir: Some(dir.path().to_path_buf()),
            ..ClientConfig::default()
        };
        let ctx = AppContext::from_config(config).unwrap();
        assert!(ctx.storage.path().is_some());
        assert!(!ctx.users.has_session());
    }
}
