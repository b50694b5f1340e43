//! Message pages per conversation.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use flowinity_api::documents::messages::{MessagesInput, MessagesVariables};
use flowinity_api::documents::Messages;
use flowinity_api::{ApiClient, ApiError};
use flowinity_shared::{AssociationId, Message};

/// Messages are held newest first, the order the API returns them in.
pub struct MessagesStore {
    api: ApiClient,
    pages: Mutex<HashMap<AssociationId, Vec<Message>>>,
}

impl MessagesStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            pages: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<AssociationId, Vec<Message>>> {
        self.pages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch the newest page for a conversation without committing it.
    pub async fn fetch_newest(&self, association_id: AssociationId) -> Result<Vec<Message>, ApiError> {
        let data = self
            .api
            .execute::<Messages>(&MessagesVariables {
                input: MessagesInput::newest(association_id),
            })
            .await?;
        debug!(%association_id, count = data.messages.len(), "fetched messages");
        Ok(data.messages)
    }

    /// Replace the held page for a conversation.
    pub fn commit(&self, association_id: AssociationId, messages: Vec<Message>) {
        self.lock().insert(association_id, messages);
    }

    /// Add a message that arrived live, ahead of the held page.
    pub fn push_newest(&self, association_id: AssociationId, message: Message) {
        self.lock().entry(association_id).or_default().insert(0, message);
    }

    pub fn messages(&self, association_id: AssociationId) -> Vec<Message> {
        self.lock().get(&association_id).cloned().unwrap_or_default()
    }

    /// The message drawn directly before the one at `index`, which in a
    /// newest-first list is the entry after it.
    pub fn predecessor(&self, association_id: AssociationId, index: usize) -> Option<Message> {
        self.lock()
            .get(&association_id)?
            .get(index.checked_add(1)?)
            .cloned()
    }
}
