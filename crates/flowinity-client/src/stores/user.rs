//! Session user state: the signed-in account, the users it tracks and the
//! users it has blocked.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use flowinity_api::documents::user::{UpdateUserInput, UpdateUserVariables};
use flowinity_api::documents::{GetUser, UpdateUser};
use flowinity_api::{ApiClient, NoVariables};
use flowinity_shared::{BlockedUser, Notification, PartialUser, User, UserId};
use flowinity_store::{LocalStorage, StorageKey};

use crate::error::Result;
use crate::stores::app::AppStore;

#[derive(Debug, Default)]
struct UserState {
    user: Option<User>,
    tracked: Vec<PartialUser>,
    blocked: Vec<BlockedUser>,
    token: Option<String>,
}

pub struct UserStore {
    api: ApiClient,
    storage: Arc<LocalStorage>,
    app: Arc<AppStore>,
    default_language: String,
    state: Mutex<UserState>,
    updating: AtomicBool,
}

/// Clears the busy flag when an update leaves scope, however it leaves.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl UserStore {
    /// Build the store and pick up the auth token left in local storage, if
    /// any. The token is handed to the API client straight away.
    pub fn new(
        api: ApiClient,
        storage: Arc<LocalStorage>,
        app: Arc<AppStore>,
        default_language: impl Into<String>,
    ) -> Self {
        let token = match storage.get_item(StorageKey::Token) {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read stored token");
                None
            }
        };
        api.set_token(token.clone());

        Self {
            api,
            storage,
            app,
            default_language: default_language.into(),
            state: Mutex::new(UserState {
                token,
                ..UserState::default()
            }),
            updating: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, UserState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the session: cached snapshot first, then the authoritative copy
    /// from the API. A corrupt snapshot is ignored; a failed fetch is not.
    pub async fn init(&self) -> Result<()> {
        if let Some(cached) = self.storage.load_or_default::<Option<User>>(StorageKey::UserStore) {
            debug!(user_id = %cached.id, "hydrated user from cache");
            self.lock().user = Some(cached);
        }

        let data = self.api.execute::<GetUser>(&NoVariables {}).await?;

        let language = data
            .current_user
            .as_ref()
            .and_then(|user| user.language.clone())
            .filter(|language| !language.is_empty())
            .unwrap_or_else(|| self.default_language.clone());

        let snapshot = data.current_user.clone();
        {
            let mut state = self.lock();
            state.user = data.current_user;
            state.tracked = data.tracked_users;
            state.blocked = data.blocked_users;
        }

        if let Err(e) = self.storage.set_json(StorageKey::UserStore, &snapshot) {
            warn!(error = %e, "Failed to persist user snapshot");
        }
        self.app.set_locale(language);

        info!(
            user_id = ?snapshot.as_ref().map(|user| user.id),
            "session user loaded"
        );
        Ok(())
    }

    /// Submit the editable fields of the loaded user. Skipped while another
    /// submission is in flight and when no user is loaded.
    pub async fn update_user(&self) -> Result<()> {
        if self
            .updating
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("user update already in flight, skipping");
            return Ok(());
        }
        let _busy = BusyGuard(&self.updating);

        let Some(input) = self.lock().user.as_ref().map(UpdateUserInput::from_user) else {
            return Ok(());
        };

        self.api
            .execute::<UpdateUser>(&UpdateUserVariables { input })
            .await?;
        Ok(())
    }

    pub fn is_updating(&self) -> bool {
        self.updating.load(Ordering::Acquire)
    }

    /// Edit the loaded user in place. Returns `false` when there is no user.
    pub fn modify_user(&self, edit: impl FnOnce(&mut User)) -> bool {
        match self.lock().user.as_mut() {
            Some(user) => {
                edit(user);
                true
            }
            None => false,
        }
    }

    pub fn user(&self) -> Option<User> {
        self.lock().user.clone()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.lock().user.as_ref().map(|user| user.id)
    }

    pub fn tracked(&self) -> Vec<PartialUser> {
        self.lock().tracked.clone()
    }

    pub fn blocked(&self) -> Vec<BlockedUser> {
        self.lock().blocked.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.lock().token.clone()
    }

    /// Replace the auth token, persisting it and handing it to the API client.
    pub fn set_token(&self, token: Option<String>) -> Result<()> {
        match &token {
            Some(value) => self.storage.set_item(StorageKey::Token, value)?,
            None => {
                self.storage.remove_item(StorageKey::Token)?;
            }
        }
        self.api.set_token(token.clone());
        self.lock().token = token;
        Ok(())
    }

    pub fn gold(&self) -> bool {
        self.lock().user.as_ref().is_some_and(User::is_gold)
    }

    /// Tracked users by id. The session user's own entry is rebuilt from the
    /// live account so local edits show up without a refetch.
    pub fn users(&self) -> HashMap<UserId, PartialUser> {
        let state = self.lock();
        state
            .tracked
            .iter()
            .map(|tracked| match &state.user {
                Some(user) if user.id == tracked.id => (tracked.id, user.to_partial()),
                _ => (tracked.id, tracked.clone()),
            })
            .collect()
    }

    pub fn unread_notifications(&self) -> Vec<Notification> {
        self.lock()
            .user
            .as_ref()
            .map(|user| {
                user.notifications
                    .iter()
                    .filter(|notification| !notification.dismissed)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Display name for a user: nickname when set, username otherwise.
    pub fn get_name(&self, user: Option<&PartialUser>) -> Option<String> {
        let user = user?;
        Some(
            user.nickname
                .as_deref()
                .filter(|nickname| !nickname.is_empty())
                .unwrap_or(&user.username)
                .to_string(),
        )
    }

    /// Whether a session exists, either loaded or left behind in storage.
    pub fn has_session(&self) -> bool {
        if self.lock().user.is_some() {
            return true;
        }
        self.storage
            .contains(StorageKey::UserStore)
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to probe stored session");
                false
            })
    }
}
