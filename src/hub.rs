use crate::accounts::AccountStore;
use crate::channel::ChannelLog;
use crate::coach::{CoachPanel, Ticket};
use crate::errors::{StoreError, VitaliError, VitaliResult};
use crate::journal::{self, HealthLogDraft};
use crate::media::{self, Playback};
use crate::models::{
    Account, AccountView, ChannelMessage, Credentials, DashboardResponse, HealthLogEntry, IdSource,
    ProfileUpdate, Registration, SessionResponse, VideoEntry, VideoRequest,
};
use crate::session::Session;
use crate::stats::build_dashboard;
use crate::storage::Storage;
use crate::views::{self, Screen, View};
use std::sync::Arc;
use tracing::{error, info};

/// Everything one running UI instance works with: the stores, the session and the view.
pub struct Hub {
    ids: IdSource,
    pub(crate) accounts: AccountStore,
    channel: ChannelLog,
    pub(crate) session: Session,
    coach: CoachPanel,
    view: View,
}

impl Hub {
    /// Loads both blobs. An unreadable blob wipes all persisted state and boots from scratch.
    pub async fn boot<S: Storage + 'static>(storage: Arc<S>) -> Result<Self, StoreError> {
        match Self::open(Arc::clone(&storage)).await {
            Err(StoreError::Corrupt { key, source }) => {
                error!(key, "persisted state is unreadable, resetting all stored data: {source}");
                storage.clear().await?;
                Self::open(storage).await
            }
            other => other,
        }
    }

    async fn open<S: Storage + 'static>(storage: Arc<S>) -> Result<Self, StoreError> {
        let accounts = AccountStore::open(storage.clone()).await?;
        let channel = ChannelLog::open(storage).await?;
        info!(
            accounts = accounts.list().len(),
            messages = channel.all().len(),
            "state loaded"
        );
        Ok(Self {
            ids: IdSource::default(),
            accounts,
            channel,
            session: Session::default(),
            coach: CoachPanel::default(),
            view: View::default(),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    pub fn snapshot(&self) -> SessionResponse {
        let account = self.session.active();
        SessionResponse {
            account: account.map(AccountView::from),
            screen: views::resolve(&self.session, self.view),
            nav: account.map(views::nav_items).unwrap_or_default(),
        }
    }

    pub fn navigate(&mut self, view: View) -> Screen {
        let screen = views::resolve(&self.session, view);
        if let Screen::App(resolved) = screen {
            self.view = resolved;
        }
        screen
    }

    pub fn login(&mut self, credentials: &Credentials) -> VitaliResult<AccountView> {
        let previous = self.active_id();
        let result = self
            .session
            .login(&self.accounts, credentials)
            .map(AccountView::from);
        self.after_session_change(previous);
        result
    }

    pub async fn register(&mut self, registration: Registration) -> VitaliResult<AccountView> {
        let previous = self.active_id();
        let result = self
            .session
            .register(&mut self.accounts, &self.ids, registration)
            .await
            .map(AccountView::from);
        self.after_session_change(previous);
        result
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.coach.reset();
    }

    fn active_id(&self) -> Option<String> {
        self.session.active().map(|account| account.id.clone())
    }

    /// The coach conversation belongs to one account; it is dropped whenever the active
    /// account changes or the session clears.
    fn after_session_change(&mut self, previous: Option<String>) {
        let current = self.session.active().map(|account| account.id.as_str());
        if current != previous.as_deref() {
            self.coach.reset();
        }
    }

    /// Re-reads the active account after the store changed.
    pub(crate) fn refresh_session(&mut self) {
        let previous = self.active_id();
        self.session.refresh(&self.accounts);
        self.after_session_change(previous);
    }

    /// The single write path for account changes: persist the whole set, then mirror into
    /// the session.
    pub(crate) async fn sync_account(&mut self, account: Account) -> Result<(), StoreError> {
        self.accounts.upsert(account).await?;
        self.refresh_session();
        Ok(())
    }

    pub async fn update_profile(&mut self, update: ProfileUpdate) -> VitaliResult<AccountView> {
        let mut account = self.session.require()?.clone();
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(VitaliError::missing("name"));
            }
            account.name = name;
        }
        if let Some(avatar) = update.avatar {
            account.avatar = avatar;
        }
        if let Some(target_weight) = update.target_weight {
            account.target_weight = target_weight;
        }
        if let Some(preferences) = update.preferences {
            account.preferences = preferences;
        }
        let view = AccountView::from(&account);
        self.sync_account(account).await?;
        Ok(view)
    }

    pub fn journal(&self) -> VitaliResult<&[HealthLogEntry]> {
        Ok(&self.session.require()?.logs)
    }

    pub async fn log_vitals(&mut self, draft: HealthLogDraft) -> VitaliResult<HealthLogEntry> {
        let mut account = self.session.require()?.clone();
        let entry = draft.submit()?;
        journal::append(&mut account.logs, entry.clone());
        self.sync_account(account).await?;
        Ok(entry)
    }

    pub fn dashboard(&self) -> VitaliResult<DashboardResponse> {
        Ok(build_dashboard(self.session.require()?))
    }

    pub fn videos(&self) -> VitaliResult<&[VideoEntry]> {
        Ok(&self.session.require()?.videos)
    }

    pub async fn add_video(&mut self, request: VideoRequest) -> VitaliResult<VideoEntry> {
        let mut account = self.session.require()?.clone();
        let entry = media::new_entry(&self.ids, request)?;
        account.videos.push(entry.clone());
        self.sync_account(account).await?;
        Ok(entry)
    }

    pub fn playback(&self, video_id: &str) -> VitaliResult<Playback> {
        let video = self
            .videos()?
            .iter()
            .find(|video| video.id == video_id)
            .ok_or_else(|| VitaliError::VideoNotFound(video_id.to_string()))?;
        Ok(media::resolve_playback(&video.url))
    }

    pub fn messages(&self, code: &str) -> VitaliResult<Vec<ChannelMessage>> {
        self.session.require()?;
        Ok(self.channel.filter(code))
    }

    pub async fn send_message(&mut self, text: &str, code: &str) -> VitaliResult<ChannelMessage> {
        let sender = self.session.require()?;
        self.channel.send(&self.ids, sender, text, code).await
    }

    pub fn coach(&self) -> VitaliResult<&CoachPanel> {
        self.session.require()?;
        Ok(&self.coach)
    }

    /// Opens a coach request and returns what the gateway needs: the ticket, the trimmed
    /// question and the latest journal entry.
    pub fn begin_advice(
        &mut self,
        question: &str,
    ) -> VitaliResult<(Ticket, String, Option<HealthLogEntry>)> {
        let latest = journal::latest(&self.session.require()?.logs).cloned();
        let (ticket, question) = self.coach.begin(question)?;
        Ok((ticket, question, latest))
    }

    pub fn finish_advice(&mut self, ticket: Ticket, answer: String) {
        self.coach.finish(ticket, answer);
    }

    pub fn preferences(&self) -> VitaliResult<Vec<String>> {
        Ok(self.session.require()?.preferences.clone())
    }
}
