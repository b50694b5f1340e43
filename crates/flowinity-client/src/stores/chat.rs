//! Chat list, selection, read state and the local caches that go with them
//! (drafts, trusted domains, recently used emoji, member sidebar).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{debug, info, warn};

use flowinity_api::documents::chats::{ReadChatVariables, TypingVariables};
use flowinity_api::documents::{CancelTyping, Chats, ReadChat, Typing};
use flowinity_api::{ApiClient, NoVariables};
use flowinity_shared::chat::sort_by_recency;
use flowinity_shared::constants::{
    DELETED_USER, GROUP_NAME_MEMBERS, INHERIT_COLOR, NO_CHAT_TITLE, UNKNOWN_CHAT, UNNAMED_GROUP,
};
use flowinity_shared::permissions::grants_any;
use flowinity_shared::{
    should_merge, AssociationId, Chat, ChatEmoji, ChatId, ChatPermission, ChatRank, Message,
};
use flowinity_store::{LocalStorage, StorageKey};

use crate::error::Result;
use crate::stores::app::{AppStore, Badge, RailMode};
use crate::stores::messages::MessagesStore;
use crate::stores::typing::{Typer, TypingTracker};
use crate::stores::user::UserStore;

/// Panel toggles of the chat view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiOptions {
    pub member_sidebar: bool,
    pub search_sidebar: bool,
    pub search: String,
    pub pin_sidebar: bool,
}

#[derive(Debug, Default)]
struct ChatState {
    chats: Vec<Chat>,
    selected: Option<AssociationId>,
    trusted_domains: Vec<String>,
    drafts: HashMap<AssociationId, String>,
    emoji: Vec<ChatEmoji>,
    recent_emoji: HashMap<String, u64>,
    loading: bool,
    ready: Option<AssociationId>,
    // Last total pushed to the rail badge.
    badge_total: u64,
}

impl ChatState {
    fn selected_chat(&self) -> Option<&Chat> {
        let selected = self.selected?;
        self.chats
            .iter()
            .find(|chat| chat.association_id() == Some(selected))
    }
}

pub struct ChatStore {
    api: ApiClient,
    storage: Arc<LocalStorage>,
    app: Arc<AppStore>,
    users: Arc<UserStore>,
    messages: Arc<MessagesStore>,
    typing: Arc<TypingTracker>,
    state: Mutex<ChatState>,
    ui: Mutex<UiOptions>,
    // Bumped by every `set_chat`; a fetch whose number is no longer current
    // is discarded.
    generation: AtomicU64,
}

impl ChatStore {
    pub fn new(
        api: ApiClient,
        storage: Arc<LocalStorage>,
        app: Arc<AppStore>,
        users: Arc<UserStore>,
        messages: Arc<MessagesStore>,
        typing: Arc<TypingTracker>,
    ) -> Self {
        let member_sidebar = match storage.get_item(StorageKey::MemberList) {
            Ok(Some(value)) => value == "true",
            Ok(None) => true,
            Err(e) => {
                warn!(error = %e, "Failed to read member sidebar preference");
                true
            }
        };

        Self {
            api,
            storage,
            app,
            users,
            messages,
            typing,
            state: Mutex::new(ChatState::default()),
            ui: Mutex::new(UiOptions {
                member_sidebar,
                search_sidebar: false,
                search: String::new(),
                pin_sidebar: false,
            }),
            generation: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ChatState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_ui(&self) -> MutexGuard<'_, UiOptions> {
        self.ui.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) {
        if let Err(e) = self.storage.set_json(key, value) {
            warn!(%key, error = %e, "Failed to persist cache");
        }
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Hydrate the local caches, then replace the chat list and emoji catalog
    /// with the server's. Each cache is read independently; a corrupt one is
    /// logged and left empty.
    pub async fn init(&self) -> Result<()> {
        let mut cached: Vec<Chat> = self.storage.load_or_default(StorageKey::ChatStore);
        sort_by_recency(&mut cached);
        let trusted_domains: Vec<String> = self.storage.load_or_default(StorageKey::TrustedDomains);
        let drafts: HashMap<AssociationId, String> = self.storage.load_or_default(StorageKey::Drafts);
        let recent_emoji: HashMap<String, u64> = self.storage.load_or_default(StorageKey::Emoji);

        {
            let mut state = self.lock();
            state.chats = cached;
            state.trusted_domains = trusted_domains;
            state.drafts = drafts;
            state.recent_emoji = recent_emoji;
        }
        self.sync_badge();

        let data = self.api.execute::<Chats>(&NoVariables {}).await?;
        let count = data.chats.len();
        {
            let mut state = self.lock();
            state.chats = data.chats;
            state.emoji = data.user_emoji;
            self.persist(StorageKey::ChatStore, &state.chats);
        }
        self.sync_badge();

        info!(count, "chats loaded");
        Ok(())
    }

    /// Swap in a fresh chat list, e.g. after a realtime update.
    pub fn replace_chats(&self, chats: Vec<Chat>) {
        {
            let mut state = self.lock();
            state.chats = chats;
            self.persist(StorageKey::ChatStore, &state.chats);
        }
        self.sync_badge();
    }

    /// Set one chat's unread counter. Returns `false` for an unknown chat.
    pub fn set_unread(&self, chat_id: ChatId, unread: u64) -> bool {
        let found = {
            let mut state = self.lock();
            match state.chats.iter_mut().find(|chat| chat.id == chat_id) {
                Some(chat) => {
                    chat.unread = unread;
                    true
                }
                None => false,
            }
        };
        if found {
            self.sync_badge();
        }
        found
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn chats(&self) -> Vec<Chat> {
        self.lock().chats.clone()
    }

    pub fn emoji(&self) -> Vec<ChatEmoji> {
        self.lock().emoji.clone()
    }

    pub fn selected_association(&self) -> Option<AssociationId> {
        self.lock().selected
    }

    pub fn selected_chat(&self) -> Option<Chat> {
        self.lock().selected_chat().cloned()
    }

    /// The chat with `id`, or an "Unknown Chat" placeholder.
    pub fn lookup_chat(&self, id: ChatId) -> Chat {
        self.lock()
            .chats
            .iter()
            .find(|chat| chat.id == id)
            .cloned()
            .unwrap_or_else(|| Chat::placeholder(UNKNOWN_CHAT))
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Association whose messages finished loading last.
    pub fn ready(&self) -> Option<AssociationId> {
        self.lock().ready
    }

    pub fn unread(&self) -> u64 {
        self.lock().chats.iter().map(|chat| chat.unread).sum()
    }

    /// Display title for a chat.
    ///
    /// Direct chats use the other party's name. Groups still carrying the
    /// default name are titled after up to three other members, with a
    /// count of the rest.
    pub fn chat_name(&self, chat: Option<&Chat>) -> String {
        let Some(chat) = chat else {
            return NO_CHAT_TITLE.to_string();
        };

        if chat.is_direct() {
            return self
                .users
                .get_name(chat.recipient.as_ref())
                .unwrap_or_else(|| DELETED_USER.to_string());
        }

        if chat.name != UNNAMED_GROUP {
            return chat.name.clone();
        }

        let me = self.users.user_id();
        let known = self.users.users();
        let names: Vec<String> = chat
            .users
            .iter()
            .filter(|member| match (member.user_id, me) {
                (Some(member), Some(me)) => member != me,
                _ => true,
            })
            .map(|member| {
                member
                    .user_id
                    .and_then(|id| self.users.get_name(known.get(&id)))
                    .unwrap_or_else(|| DELETED_USER.to_string())
            })
            .collect();

        let shown = names.len().min(GROUP_NAME_MEMBERS);
        let mut title = names[..shown].join(", ");
        let remaining = names.len() - shown;
        if remaining > 0 {
            title.push_str(&format!(", +{remaining} others"));
        }
        title
    }

    /// Whether the message at `index` of the selected conversation folds
    /// into the one drawn before it.
    pub fn merge(&self, message: &Message, index: usize) -> bool {
        let previous = self
            .selected_association()
            .and_then(|association_id| self.messages.predecessor(association_id, index));
        should_merge(message, previous.as_ref())
    }

    /// Color of the first listed rank that has one.
    pub fn get_color(rank_ids: &[String], ranks: &[ChatRank]) -> String {
        rank_ids
            .iter()
            .filter_map(|id| ranks.iter().find(|rank| &rank.id == id))
            .find_map(|rank| rank.color.as_deref().filter(|color| !color.is_empty()))
            .unwrap_or(INHERIT_COLOR)
            .to_string()
    }

    /// Whether the session user holds any of `requested` in `chat` (the
    /// selected chat when `None`). Group owners pass every check.
    pub fn has_permission(&self, requested: &[ChatPermission], chat: Option<&Chat>) -> bool {
        let selected;
        let chat = match chat {
            Some(chat) => chat,
            None => {
                selected = self.selected_chat();
                match selected.as_ref() {
                    Some(chat) => chat,
                    None => return false,
                }
            }
        };

        let granted = chat
            .association
            .as_ref()
            .map(|association| association.permissions.as_slice())
            .unwrap_or_default();
        if grants_any(granted, requested) {
            return true;
        }

        let member = chat.association.as_ref().and_then(|association| association.user_id);
        chat.is_group() && member.is_some() && member == chat.user_id
    }

    // -----------------------------------------------------------------------
    // Selection and read state
    // -----------------------------------------------------------------------

    /// Open a conversation: select it, fetch its newest messages, mark it
    /// read. If another `set_chat` starts before the fetch completes, this
    /// call's result is dropped.
    ///
    /// The page is committed and marked ready before `ReadChat` is sent, so an
    /// error from the read leaves the conversation open.
    pub async fn set_chat(&self, association_id: AssociationId) -> Result<()> {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        let chat = {
            let mut state = self.lock();
            state.loading = true;
            state.selected = Some(association_id);
            state.selected_chat().cloned()
        };
        self.app.set_title(self.chat_name(chat.as_ref()));

        let fetched = self.messages.fetch_newest(association_id).await;

        if self.generation.load(Ordering::Acquire) != generation {
            debug!(%association_id, "discarding stale message page");
            return Ok(());
        }

        let messages = match fetched {
            Ok(messages) => messages,
            Err(e) => {
                self.lock().loading = false;
                return Err(e.into());
            }
        };

        self.messages.commit(association_id, messages);
        {
            let mut state = self.lock();
            state.ready = Some(association_id);
            state.loading = false;
        }

        self.read_chat(None).await
    }

    /// Mark a conversation read, `association_id` or the selected one. Does
    /// nothing while the window is unfocused.
    ///
    /// Clears the unread counter of every chat in the list when a chat is
    /// selected, not only the one being read.
    pub async fn read_chat(&self, association_id: Option<AssociationId>) -> Result<()> {
        if !self.app.has_focus() {
            debug!("window not focused, not marking read");
            return Ok(());
        }

        let target = {
            let mut state = self.lock();
            if state.selected_chat().is_some() {
                for chat in state.chats.iter_mut() {
                    chat.unread = 0;
                }
            }
            association_id.or(state.selected)
        };
        self.sync_badge();

        let Some(target) = target else {
            return Ok(());
        };
        self.api
            .execute::<ReadChat>(&ReadChatVariables::new(target))
            .await?;
        Ok(())
    }

    /// Push the unread total to the chat rail badge when it changed.
    fn sync_badge(&self) {
        let total = {
            let mut state = self.lock();
            let total: u64 = state.chats.iter().map(|chat| chat.unread).sum();
            if total == state.badge_total {
                return;
            }
            state.badge_total = total;
            total
        };
        self.app.set_badge(RailMode::Chat, Badge::for_unread(total));
    }

    // -----------------------------------------------------------------------
    // Typing
    // -----------------------------------------------------------------------

    pub async fn start_typing(&self) -> Result<()> {
        let Some(input) = self.selected_association() else {
            return Ok(());
        };
        self.api.execute::<Typing>(&TypingVariables { input }).await?;
        Ok(())
    }

    pub async fn cancel_typing(&self) -> Result<()> {
        let Some(input) = self.selected_association() else {
            return Ok(());
        };
        self.api
            .execute::<CancelTyping>(&TypingVariables { input })
            .await?;
        Ok(())
    }

    /// Users typing in the selected chat.
    pub fn current_typers(&self) -> Vec<Typer> {
        match self.selected_chat() {
            Some(chat) => self.typing.for_chat(chat.id),
            None => Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // UI options and local caches
    // -----------------------------------------------------------------------

    pub fn ui_options(&self) -> UiOptions {
        self.lock_ui().clone()
    }

    pub fn set_member_sidebar(&self, open: bool) {
        let mut ui = self.lock_ui();
        if ui.member_sidebar == open {
            return;
        }
        ui.member_sidebar = open;
        let value = if open { "true" } else { "false" };
        if let Err(e) = self.storage.set_item(StorageKey::MemberList, value) {
            warn!(error = %e, "Failed to persist member sidebar preference");
        }
    }

    pub fn set_search_sidebar(&self, open: bool) {
        self.lock_ui().search_sidebar = open;
    }

    pub fn set_search(&self, search: impl Into<String>) {
        self.lock_ui().search = search.into();
    }

    pub fn set_pin_sidebar(&self, open: bool) {
        self.lock_ui().pin_sidebar = open;
    }

    pub fn draft(&self, association_id: AssociationId) -> Option<String> {
        self.lock().drafts.get(&association_id).cloned()
    }

    /// Store the unsent text of a conversation. Empty text drops the draft.
    pub fn set_draft(&self, association_id: AssociationId, text: impl Into<String>) {
        let text = text.into();
        let mut state = self.lock();
        if text.is_empty() {
            state.drafts.remove(&association_id);
        } else {
            state.drafts.insert(association_id, text);
        }
        self.persist(StorageKey::Drafts, &state.drafts);
    }

    pub fn recent_emoji(&self) -> HashMap<String, u64> {
        self.lock().recent_emoji.clone()
    }

    /// Count one use of an emoji.
    pub fn record_emoji(&self, name: &str) -> u64 {
        let mut state = self.lock();
        let uses = {
            let count = state.recent_emoji.entry(name.to_string()).or_insert(0);
            *count += 1;
            *count
        };
        self.persist(StorageKey::Emoji, &state.recent_emoji);
        uses
    }

    pub fn trusted_domains(&self) -> Vec<String> {
        self.lock().trusted_domains.clone()
    }

    /// Allow embeds from `domain`. Returns `false` if it was already trusted.
    pub fn trust_domain(&self, domain: &str) -> bool {
        let domain = domain.trim().to_ascii_lowercase();
        let mut state = self.lock();
        if domain.is_empty() || state.trusted_domains.contains(&domain) {
            return false;
        }
        state.trusted_domains.push(domain);
        self.persist(StorageKey::TrustedDomains, &state.trusted_domains);
        true
    }

    pub fn untrust_domain(&self, domain: &str) -> bool {
        let domain = domain.trim().to_ascii_lowercase();
        let mut state = self.lock();
        let before = state.trusted_domains.len();
        state.trusted_domains.retain(|trusted| trusted != &domain);
        if state.trusted_domains.len() == before {
            return false;
        }
        self.persist(StorageKey::TrustedDomains, &state.trusted_domains);
        true
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};

    use flowinity_api::testing::MockTransport;
    use flowinity_shared::{ChatAssociation, ChatType, MessageId, UserId};

    use super::*;

    struct Harness {
        mock: Arc<MockTransport>,
        storage: Arc<LocalStorage>,
        app: Arc<AppStore>,
        users: Arc<UserStore>,
        typing: Arc<TypingTracker>,
        chats: ChatStore,
    }

    fn harness_with(storage: Arc<LocalStorage>) -> Harness {
        let mock = Arc::new(MockTransport::new());
        let api = ApiClient::new(mock.clone());
        let app = Arc::new(AppStore::new());
        let users = Arc::new(UserStore::new(api.clone(), storage.clone(), app.clone(), "en"));
        let messages = Arc::new(MessagesStore::new(api.clone()));
        let typing = Arc::new(TypingTracker::new());
        let chats = ChatStore::new(
            api,
            storage.clone(),
            app.clone(),
            users.clone(),
            messages,
            typing.clone(),
        );
        Harness {
            mock,
            storage,
            app,
            users,
            typing,
            chats,
        }
    }

    fn harness() -> Harness {
        harness_with(Arc::new(LocalStorage::open_in_memory().unwrap()))
    }

    fn open_dir(dir: &Path) -> Arc<LocalStorage> {
        Arc::new(LocalStorage::open_in_dir(dir).unwrap())
    }

    /// Signed in as user 1, tracking users 2..=6 named A..E.
    async fn sign_in(h: &Harness) {
        h.mock.respond(
            "GetUser",
            json!({
                "currentUser": { "id": 1, "username": "me" },
                "trackedUsers": [
                    { "id": 1, "username": "me" },
                    { "id": 2, "username": "A" },
                    { "id": 3, "username": "B" },
                    { "id": 4, "username": "C" },
                    { "id": 5, "username": "D" },
                    { "id": 6, "username": "x", "nickname": "E" }
                ],
                "blockedUsers": []
            }),
        );
        h.users.init().await.unwrap();
    }

    fn chat_json(id: i64, association: i64, unread: u64) -> Value {
        json!({
            "id": id,
            "type": "group",
            "name": format!("chat {id}"),
            "userId": 99,
            "association": { "id": association, "chatId": id, "userId": 1, "permissions": [] },
            "unread": unread,
            "_redisSortDate": id * 10
        })
    }

    fn respond_chats(h: &Harness, chats: Vec<Value>) {
        h.mock.respond("Chats", json!({ "chats": chats, "userEmoji": [] }));
    }

    fn group_with_members(name: &str, member_ids: &[i64]) -> Chat {
        let users: Vec<Value> = member_ids
            .iter()
            .enumerate()
            .map(|(i, id)| json!({ "id": i + 100, "userId": id }))
            .collect();
        serde_json::from_value(json!({
            "id": 1,
            "type": "group",
            "name": name,
            "users": users
        }))
        .unwrap()
    }

    fn message(id: i64, user: i64, minute: u32, second: u32) -> Message {
        Message {
            id: MessageId(id),
            chat_id: ChatId(1),
            user_id: Some(UserId(user)),
            content: Some("hi".into()),
            message_type: None,
            reply_id: None,
            edited: false,
            pinned: false,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, minute, second).unwrap(),
        }
    }

    fn message_json(m: &Message) -> Value {
        serde_json::to_value(m).unwrap()
    }

    // -- naming --------------------------------------------------------------

    #[tokio::test]
    async fn test_chat_name_variants() {
        let h = harness();
        sign_in(&h).await;

        assert_eq!(h.chats.chat_name(None), "Communications");

        let four_others = group_with_members("Unnamed Group", &[1, 2, 3, 4, 5]);
        assert_eq!(h.chats.chat_name(Some(&four_others)), "A, B, C, +1 others");

        let two_others = group_with_members("Unnamed Group", &[2, 1, 3]);
        assert_eq!(h.chats.chat_name(Some(&two_others)), "A, B");

        let with_unknown = group_with_members("Unnamed Group", &[6, 42]);
        assert_eq!(h.chats.chat_name(Some(&with_unknown)), "E, Deleted User");

        let named = group_with_members("Book Club", &[2, 3]);
        assert_eq!(h.chats.chat_name(Some(&named)), "Book Club");

        let mut direct = Chat {
            chat_type: ChatType::Direct,
            ..Chat::default()
        };
        assert_eq!(h.chats.chat_name(Some(&direct)), "Deleted User");
        direct.recipient = Some(flowinity_shared::PartialUser {
            id: UserId(2),
            username: "alice".into(),
            nickname: Some("Al".into()),
            ..Default::default()
        });
        assert_eq!(h.chats.chat_name(Some(&direct)), "Al");
    }

    #[tokio::test]
    async fn test_lookup_chat_placeholder() {
        let h = harness();
        respond_chats(&h, vec![chat_json(3, 30, 0)]);
        h.chats.init().await.unwrap();

        assert_eq!(h.chats.lookup_chat(ChatId(3)).name, "chat 3");
        assert_eq!(h.chats.lookup_chat(ChatId(4)).name, "Unknown Chat");
    }

    // -- init and caches -----------------------------------------------------

    #[tokio::test]
    async fn test_init_hydrates_caches_and_fetches() {
        let h = harness();
        h.storage
            .set_json(StorageKey::TrustedDomains, &vec!["example.com"])
            .unwrap();
        h.storage.set_item(StorageKey::Drafts, r#"{"30":"half a thought"}"#).unwrap();
        h.storage.set_item(StorageKey::Emoji, r#"{"smile":3}"#).unwrap();
        h.mock.respond(
            "Chats",
            json!({
                "chats": [chat_json(3, 30, 2), chat_json(4, 40, 5)],
                "userEmoji": [{ "id": "e1", "name": "blob", "icon": "blob.png", "chatId": 3 }]
            }),
        );

        h.chats.init().await.unwrap();

        assert_eq!(h.chats.chats().len(), 2);
        assert_eq!(h.chats.emoji()[0].name.as_deref(), Some("blob"));
        assert_eq!(h.chats.trusted_domains(), vec!["example.com".to_string()]);
        assert_eq!(h.chats.draft(AssociationId(30)).as_deref(), Some("half a thought"));
        assert_eq!(h.chats.recent_emoji()["smile"], 3);
        assert_eq!(h.chats.unread(), 7);
        assert_eq!(h.app.badge(RailMode::Chat), Some(Badge::Count(7)));

        let persisted: Vec<Chat> = h.storage.get_json(StorageKey::ChatStore).unwrap().unwrap();
        assert_eq!(persisted.len(), 2);
    }

    #[tokio::test]
    async fn test_cached_chats_sorted_when_offline() {
        let h = harness();
        h.storage
            .set_json(
                StorageKey::ChatStore,
                &json!([
                    { "id": 1, "_redisSortDate": "100" },
                    { "id": 2, "_redisSortDate": "300" },
                    { "id": 3, "_redisSortDate": "100" },
                    { "id": 4 }
                ]),
            )
            .unwrap();
        h.mock.fail("Chats", "offline");

        assert!(h.chats.init().await.is_err());

        let ids: Vec<i64> = h.chats.chats().iter().map(|chat| chat.id.0).collect();
        assert_eq!(ids, vec![2, 3, 1, 4]);
    }

    #[tokio::test]
    async fn test_init_keeps_chats_with_null_fields() {
        let h = harness();
        let mut sparse = chat_json(3, 30, 0);
        sparse["name"] = Value::Null;
        sparse["unread"] = Value::Null;
        respond_chats(&h, vec![sparse, chat_json(4, 40, 5)]);

        h.chats.init().await.unwrap();

        assert_eq!(h.chats.chats().len(), 2);
        assert_eq!(h.chats.lookup_chat(ChatId(3)).unread, 0);
        assert_eq!(h.chats.unread(), 5);
    }

    #[tokio::test]
    async fn test_corrupt_cache_does_not_block_others() {
        let h = harness();
        h.storage.set_item(StorageKey::Drafts, "[broken").unwrap();
        h.storage.set_item(StorageKey::Emoji, r#"{"wave":1}"#).unwrap();
        respond_chats(&h, vec![]);

        h.chats.init().await.unwrap();
        assert!(h.chats.draft(AssociationId(1)).is_none());
        assert_eq!(h.chats.recent_emoji()["wave"], 1);
    }

    #[tokio::test]
    async fn test_emoji_cache_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        {
            let h = harness_with(open_dir(dir.path()));
            respond_chats(&h, vec![]);
            h.chats.init().await.unwrap();
            h.chats.record_emoji("smile");
            assert_eq!(h.chats.record_emoji("smile"), 2);
            h.chats.record_emoji("wave");
        }

        let h = harness_with(open_dir(dir.path()));
        respond_chats(&h, vec![]);
        h.chats.init().await.unwrap();
        let recent = h.chats.recent_emoji();
        assert_eq!(recent["smile"], 2);
        assert_eq!(recent["wave"], 1);
    }

    #[test]
    fn test_drafts_and_trusted_domains_persist() {
        let h = harness();
        h.chats.set_draft(AssociationId(5), "hello");
        assert!(h.chats.trust_domain("Example.com"));
        assert!(!h.chats.trust_domain("example.com"));

        let drafts: HashMap<AssociationId, String> =
            h.storage.get_json(StorageKey::Drafts).unwrap().unwrap();
        assert_eq!(drafts[&AssociationId(5)], "hello");
        let domains: Vec<String> = h.storage.get_json(StorageKey::TrustedDomains).unwrap().unwrap();
        assert_eq!(domains, vec!["example.com".to_string()]);

        h.chats.set_draft(AssociationId(5), "");
        assert!(h.chats.draft(AssociationId(5)).is_none());
        assert!(h.chats.untrust_domain("example.com"));
        assert!(!h.chats.untrust_domain("example.com"));
    }

    #[test]
    fn test_member_sidebar_preference() {
        let h = harness();
        assert!(h.chats.ui_options().member_sidebar);

        h.chats.set_member_sidebar(false);
        assert_eq!(
            h.storage.get_item(StorageKey::MemberList).unwrap().as_deref(),
            Some("false")
        );

        let reopened = harness_with(h.storage.clone());
        assert!(!reopened.chats.ui_options().member_sidebar);

        reopened.chats.set_search("needle");
        reopened.chats.set_pin_sidebar(true);
        let ui = reopened.chats.ui_options();
        assert_eq!(ui.search, "needle");
        assert!(ui.pin_sidebar);
        assert!(!ui.search_sidebar);
    }

    // -- selection -----------------------------------------------------------

    #[tokio::test]
    async fn test_set_chat_commits_and_reads() {
        let h = harness();
        respond_chats(&h, vec![chat_json(3, 30, 4), chat_json(4, 40, 6)]);
        h.chats.init().await.unwrap();
        h.mock.respond("Messages", json!({ "messages": [] }));
        h.mock.respond("ReadChat", json!({ "readChat": true }));

        h.chats.set_chat(AssociationId(30)).await.unwrap();

        assert_eq!(h.chats.selected_association(), Some(AssociationId(30)));
        assert_eq!(h.chats.selected_chat().unwrap().id, ChatId(3));
        assert_eq!(h.chats.ready(), Some(AssociationId(30)));
        assert!(!h.chats.is_loading());
        assert_eq!(h.app.title(), "chat 3");

        // Every chat is cleared, not only the one read.
        assert_eq!(h.chats.unread(), 0);
        assert_eq!(h.app.badge(RailMode::Chat), Some(Badge::Count(0)));

        let reads = h.mock.calls_to("ReadChat");
        assert_eq!(reads.len(), 1);
        assert_eq!(reads[0].variables["input"]["associationId"], 30);
    }

    #[tokio::test]
    async fn test_set_chat_discards_stale_page() {
        let h = harness();
        respond_chats(&h, vec![chat_json(5, 5, 0), chat_json(7, 7, 0)]);
        h.chats.init().await.unwrap();
        h.mock.respond("ReadChat", json!({ "readChat": true }));

        let slow = h.mock.defer("Messages");
        let fast = h.mock.defer("Messages");
        let stale = message(1, 2, 0, 0);
        let fresh = message(2, 3, 0, 0);
        let stale_reply = json!({ "messages": [message_json(&stale)] });
        let fresh_reply = json!({ "messages": [message_json(&fresh)] });

        let (first, second, _) = tokio::join!(
            h.chats.set_chat(AssociationId(5)),
            h.chats.set_chat(AssociationId(7)),
            async move {
                fast.send(fresh_reply).unwrap();
                tokio::task::yield_now().await;
                slow.send(stale_reply).unwrap();
            }
        );
        first.unwrap();
        second.unwrap();

        assert_eq!(h.chats.selected_association(), Some(AssociationId(7)));
        assert_eq!(h.chats.ready(), Some(AssociationId(7)));
        assert!(!h.chats.is_loading());
        assert_eq!(h.chats.messages.messages(AssociationId(7)), vec![fresh]);
        assert!(h.chats.messages.messages(AssociationId(5)).is_empty());

        let reads = h.mock.calls_to("ReadChat");
        assert_eq!(reads.len(), 1);
        assert_eq!(reads[0].variables["input"]["associationId"], 7);
    }

    #[tokio::test]
    async fn test_set_chat_failure_clears_loading() {
        let h = harness();
        h.mock.fail("Messages", "offline");
        assert!(h.chats.set_chat(AssociationId(9)).await.is_err());
        assert!(!h.chats.is_loading());
        assert!(h.chats.ready().is_none());
        assert_eq!(h.app.title(), "Communications");
    }

    #[tokio::test]
    async fn test_set_chat_keeps_page_when_read_fails() {
        let h = harness();
        respond_chats(&h, vec![chat_json(3, 30, 4)]);
        h.chats.init().await.unwrap();
        let first = message(1, 2, 0, 0);
        h.mock.respond("Messages", json!({ "messages": [message_json(&first)] }));
        h.mock.fail("ReadChat", "offline");

        assert!(h.chats.set_chat(AssociationId(30)).await.is_err());

        assert_eq!(h.chats.messages.messages(AssociationId(30)), vec![first]);
        assert_eq!(h.chats.ready(), Some(AssociationId(30)));
        assert!(!h.chats.is_loading());
        assert_eq!(h.mock.calls_to("ReadChat").len(), 1);
    }

    #[tokio::test]
    async fn test_read_chat_requires_focus() {
        let h = harness();
        respond_chats(&h, vec![chat_json(3, 30, 4)]);
        h.chats.init().await.unwrap();
        h.app.set_focus(false);

        h.chats.read_chat(Some(AssociationId(30))).await.unwrap();
        assert!(h.mock.calls_to("ReadChat").is_empty());
        assert_eq!(h.chats.unread(), 4);
    }

    #[tokio::test]
    async fn test_read_chat_without_selection_keeps_counters() {
        let h = harness();
        respond_chats(&h, vec![chat_json(3, 30, 4)]);
        h.chats.init().await.unwrap();
        h.mock.respond("ReadChat", json!({ "readChat": true }));

        h.chats.read_chat(Some(AssociationId(30))).await.unwrap();
        assert_eq!(h.mock.calls_to("ReadChat").len(), 1);
        assert_eq!(h.chats.unread(), 4);

        h.chats.read_chat(None).await.unwrap();
        assert_eq!(h.mock.calls_to("ReadChat").len(), 1);
    }

    #[tokio::test]
    async fn test_badge_overflow_and_updates() {
        let h = harness();
        respond_chats(&h, vec![chat_json(3, 30, 600), chat_json(4, 40, 500)]);
        h.chats.init().await.unwrap();
        assert_eq!(h.app.badge(RailMode::Chat), Some(Badge::Overflow));

        assert!(h.chats.set_unread(ChatId(4), 1));
        assert_eq!(h.app.badge(RailMode::Chat), Some(Badge::Count(601)));
        assert!(!h.chats.set_unread(ChatId(99), 1));

        h.chats.replace_chats(Vec::new());
        assert_eq!(h.app.badge(RailMode::Chat), Some(Badge::Count(0)));
    }

    // -- messages ------------------------------------------------------------

    #[tokio::test]
    async fn test_merge_uses_selected_conversation() {
        let h = harness();
        respond_chats(&h, vec![chat_json(1, 10, 0)]);
        h.chats.init().await.unwrap();
        h.mock.respond("ReadChat", json!({ "readChat": true }));

        let newest = message(4, 2, 10, 0);
        let close = message(3, 2, 6, 0);
        let far = message(2, 2, 0, 0);
        h.mock.respond(
            "Messages",
            json!({ "messages": [message_json(&newest), message_json(&close), message_json(&far)] }),
        );
        h.chats.set_chat(AssociationId(10)).await.unwrap();

        // 4 minutes after its predecessor.
        assert!(h.chats.merge(&newest, 0));
        // 6 minutes after its predecessor.
        assert!(!h.chats.merge(&close, 1));
        // Oldest message has no predecessor.
        assert!(!h.chats.merge(&far, 2));

        let mut other_author = newest.clone();
        other_author.user_id = Some(UserId(3));
        assert!(!h.chats.merge(&other_author, 0));

        let mut reply = newest.clone();
        reply.reply_id = Some(MessageId(3));
        assert!(!h.chats.merge(&reply, 0));
    }

    #[test]
    fn test_merge_without_selection() {
        let h = harness();
        let m = message(1, 2, 0, 0);
        assert!(!h.chats.merge(&m, 0));
    }

    // -- ranks and permissions -----------------------------------------------

    #[test]
    fn test_get_color() {
        let ranks = vec![
            ChatRank {
                id: "a".into(),
                color: None,
                ..Default::default()
            },
            ChatRank {
                id: "b".into(),
                color: Some("#ff0000".into()),
                ..Default::default()
            },
            ChatRank {
                id: "c".into(),
                color: Some("#00ff00".into()),
                ..Default::default()
            },
        ];
        let ids = |ids: &[&str]| ids.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(ChatStore::get_color(&ids(&["a", "c", "b"]), &ranks), "#00ff00");
        assert_eq!(ChatStore::get_color(&ids(&["a"]), &ranks), "inherit");
        assert_eq!(ChatStore::get_color(&[], &ranks), "inherit");
        assert_eq!(ChatStore::get_color(&ids(&["missing", "b"]), &ranks), "#ff0000");
    }

    fn chat_with(
        chat_type: ChatType,
        owner: Option<i64>,
        member: Option<i64>,
        permissions: Vec<ChatPermission>,
    ) -> Chat {
        Chat {
            chat_type,
            user_id: owner.map(UserId),
            association: Some(ChatAssociation {
                user_id: member.map(UserId),
                permissions,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_has_permission() {
        let h = harness();

        let admin = chat_with(ChatType::Group, Some(9), Some(1), vec![ChatPermission::Admin]);
        assert!(h.chats.has_permission(&[ChatPermission::SendMessages], Some(&admin)));
        assert!(!h.chats.has_permission(&[ChatPermission::Trusted], Some(&admin)));

        let trusted = chat_with(ChatType::Group, Some(9), Some(1), vec![ChatPermission::Trusted]);
        assert!(h.chats.has_permission(&[ChatPermission::Trusted], Some(&trusted)));
        assert!(!h.chats.has_permission(&[ChatPermission::Embeds], Some(&trusted)));

        let owner = chat_with(ChatType::Group, Some(1), Some(1), vec![]);
        assert!(h.chats.has_permission(&[ChatPermission::Trusted], Some(&owner)));

        let direct_owner = chat_with(ChatType::Direct, Some(1), Some(1), vec![]);
        assert!(!h.chats.has_permission(&[ChatPermission::Embeds], Some(&direct_owner)));

        let unowned = chat_with(ChatType::Group, None, None, vec![]);
        assert!(!h.chats.has_permission(&[ChatPermission::Embeds], Some(&unowned)));

        // Nothing selected.
        assert!(!h.chats.has_permission(&[ChatPermission::Embeds], None));
    }

    // -- typing --------------------------------------------------------------

    #[tokio::test]
    async fn test_typing_mutations_follow_selection() {
        let h = harness();
        h.chats.start_typing().await.unwrap();
        assert!(h.mock.calls_to("Typing").is_empty());

        respond_chats(&h, vec![chat_json(3, 30, 0)]);
        h.chats.init().await.unwrap();
        h.mock.respond("Messages", json!({ "messages": [] }));
        h.mock.respond("ReadChat", json!({ "readChat": true }));
        h.mock.respond("Typing", json!({ "typing": null }));
        h.mock.respond("CancelTyping", json!({ "cancelTyping": null }));
        h.chats.set_chat(AssociationId(30)).await.unwrap();

        h.chats.start_typing().await.unwrap();
        h.chats.cancel_typing().await.unwrap();
        assert_eq!(h.mock.calls_to("Typing")[0].variables, json!({ "input": 30 }));
        assert_eq!(h.mock.calls_to("CancelTyping").len(), 1);

        let expires = Utc::now() + chrono::Duration::seconds(30);
        h.typing.on_typing(ChatId(3), UserId(2), expires);
        h.typing.on_typing(ChatId(4), UserId(5), expires);
        let typers = h.chats.current_typers();
        assert_eq!(typers.len(), 1);
        assert_eq!(typers[0].user_id, UserId(2));
    }
}
