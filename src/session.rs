use crate::accounts::AccountStore;
use crate::errors::{VitaliError, VitaliResult};
use crate::models::{
    Account, Credentials, DEFAULT_AVATAR, DEFAULT_TARGET_WEIGHT, IdSource, Registration, Role,
};
use tracing::{info, warn};

/// The account the running UI instance is signed in as.
///
/// Holds a copy; after the store changes, call [`Session::refresh`] so the copy never goes stale.
#[derive(Debug, Default, Clone)]
pub struct Session {
    active: Option<Account>,
}

impl Session {
    pub fn active(&self) -> Option<&Account> {
        self.active.as_ref()
    }

    pub fn require(&self) -> VitaliResult<&Account> {
        self.active.as_ref().ok_or(VitaliError::NotSignedIn)
    }

    pub fn require_admin(&self) -> VitaliResult<&Account> {
        let account = self.require()?;
        if !account.is_admin() {
            return Err(VitaliError::Forbidden("administrator role required".to_string()));
        }
        Ok(account)
    }

    pub fn login(&mut self, store: &AccountStore, credentials: &Credentials) -> VitaliResult<&Account> {
        let Some(account) = store.authenticate(&credentials.username, &credentials.password) else {
            warn!(username = %credentials.username, "login rejected");
            self.active = None;
            return Err(VitaliError::InvalidCredentials);
        };
        info!(id = %account.id, "signed in");
        Ok(self.active.insert(account.clone()))
    }

    pub fn logout(&mut self) {
        if let Some(account) = self.active.take() {
            info!(id = %account.id, "signed out");
        }
    }

    pub async fn register(
        &mut self,
        store: &mut AccountStore,
        ids: &IdSource,
        registration: Registration,
    ) -> VitaliResult<&Account> {
        let Registration {
            username,
            password,
            name,
        } = registration;
        for (field, value) in [("username", &username), ("password", &password), ("name", &name)] {
            if value.trim().is_empty() {
                return Err(VitaliError::missing(field));
            }
        }
        if store.find_by_username(&username).is_some() {
            warn!(%username, "registration rejected, username taken");
            return Err(VitaliError::UsernameTaken(username));
        }

        let account = Account {
            id: ids.next_id(),
            username,
            password,
            name,
            avatar: DEFAULT_AVATAR.to_string(),
            target_weight: DEFAULT_TARGET_WEIGHT,
            preferences: Vec::new(),
            role: Role::User,
            logs: Vec::new(),
            videos: Vec::new(),
        };
        store.upsert(account.clone()).await?;
        info!(id = %account.id, username = %account.username, "account registered");
        Ok(self.active.insert(account))
    }

    /// Re-reads the active account from the store, clearing the session if it was removed.
    pub fn refresh(&mut self, store: &AccountStore) {
        let Some(current) = self.active.as_ref() else {
            return;
        };
        match store.find(&current.id) {
            Some(fresh) => self.active = Some(fresh.clone()),
            None => {
                warn!(id = %current.id, "active account no longer exists, signing out");
                self.active = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{AccountRepository, MemoryStore};
    use std::sync::Arc;

    async fn store() -> (Arc<MemoryStore>, AccountStore) {
        let repo = Arc::new(MemoryStore::new());
        let store = AccountStore::open(repo.clone()).await.unwrap();
        (repo, store)
    }

    fn registration(username: &str) -> Registration {
        Registration {
            username: username.to_string(),
            password: "pw".to_string(),
            name: "Runner".to_string(),
        }
    }

    #[tokio::test]
    async fn login_requires_exact_match() {
        let (_, store) = store().await;
        let mut session = Session::default();

        let bad = Credentials {
            username: "ADMIN".to_string(),
            password: "password".to_string(),
        };
        assert!(matches!(
            session.login(&store, &bad),
            Err(VitaliError::InvalidCredentials)
        ));
        assert!(session.active().is_none());

        let good = Credentials {
            username: "admin".to_string(),
            password: "password".to_string(),
        };
        assert_eq!(session.login(&store, &good).unwrap().username, "admin");
    }

    #[tokio::test]
    async fn register_creates_user_and_signs_in() {
        let (repo, mut store) = store().await;
        let mut session = Session::default();
        let ids = IdSource::default();

        let account = session
            .register(&mut store, &ids, registration("ana"))
            .await
            .unwrap()
            .clone();

        assert_eq!(account.role, Role::User);
        assert_eq!(account.target_weight, DEFAULT_TARGET_WEIGHT);
        assert!(account.logs.is_empty() && account.videos.is_empty());
        assert_eq!(session.active(), Some(&account));
        assert_eq!(repo.load_accounts().await.unwrap().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn duplicate_username_never_mutates_store() {
        let (repo, mut store) = store().await;
        let mut session = Session::default();
        let ids = IdSource::default();
        session.register(&mut store, &ids, registration("ana")).await.unwrap();
        session.logout();
        let before = repo.load_accounts().await.unwrap();

        let err = session
            .register(&mut store, &ids, registration("ana"))
            .await
            .unwrap_err();

        assert!(matches!(err, VitaliError::UsernameTaken(name) if name == "ana"));
        assert_eq!(repo.load_accounts().await.unwrap(), before);
        assert_eq!(store.list().len(), 2);
        assert!(session.active().is_none());

        // case-sensitive: a different casing is a different username
        assert!(session.register(&mut store, &ids, registration("Ana")).await.is_ok());
    }

    #[tokio::test]
    async fn incomplete_registration_is_rejected() {
        let (_, mut store) = store().await;
        let mut session = Session::default();
        let mut form = registration("ana");
        form.name = "  ".to_string();

        let err = session
            .register(&mut store, &IdSource::default(), form)
            .await
            .unwrap_err();
        assert!(matches!(err, VitaliError::Validation(_)));
        assert_eq!(store.list().len(), 1);
    }

    #[tokio::test]
    async fn refresh_tracks_store_and_clears_when_removed() {
        let (_, mut store) = store().await;
        let mut session = Session::default();
        let id = session
            .register(&mut store, &IdSource::default(), registration("ana"))
            .await
            .unwrap()
            .id
            .clone();

        let mut edited = store.find(&id).unwrap().clone();
        edited.name = "Renamed".to_string();
        store.upsert(edited).await.unwrap();
        session.refresh(&store);
        assert_eq!(session.require().unwrap().name, "Renamed");

        store.remove(&id).await.unwrap();
        session.refresh(&store);
        assert!(session.active().is_none());
    }
}
