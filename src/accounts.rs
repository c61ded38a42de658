use crate::errors::StoreError;
use crate::models::Account;
use crate::storage::AccountRepository;
use std::sync::Arc;
use tracing::{info, warn};

/// What `AccountStore::remove` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    Protected,
    Missing,
}

/// In-memory account set mirrored to its repository on every change.
pub struct AccountStore {
    repo: Arc<dyn AccountRepository>,
    accounts: Vec<Account>,
}

impl AccountStore {
    /// Loads the persisted set, seeding the bootstrap administrator when nothing is stored.
    pub async fn open(repo: Arc<dyn AccountRepository>) -> Result<Self, StoreError> {
        let accounts = match repo.load_accounts().await? {
            Some(accounts) => accounts,
            None => {
                let seeded = vec![Account::bootstrap()];
                repo.save_accounts(&seeded).await?;
                info!("seeded bootstrap account");
                seeded
            }
        };
        Ok(Self { repo, accounts })
    }

    pub fn list(&self) -> &[Account] {
        &self.accounts
    }

    pub fn find(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    pub fn find_by_username(&self, username: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.username == username)
    }

    /// Exact, case-sensitive match on both username and password.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<&Account> {
        self.accounts
            .iter()
            .find(|account| account.username == username && account.password == password)
    }

    pub async fn upsert(&mut self, account: Account) -> Result<(), StoreError> {
        let mut next = self.accounts.clone();
        match next.iter_mut().find(|existing| existing.id == account.id) {
            Some(slot) => *slot = account,
            None => next.push(account),
        }
        self.sync(next).await
    }

    pub async fn remove(&mut self, id: &str) -> Result<Removal, StoreError> {
        let Some(account) = self.find(id) else {
            return Ok(Removal::Missing);
        };
        if account.is_bootstrap() {
            warn!(id, "refusing to remove bootstrap account");
            return Ok(Removal::Protected);
        }
        let next = self
            .accounts
            .iter()
            .filter(|account| account.id != id)
            .cloned()
            .collect();
        self.sync(next).await?;
        info!(id, "account removed");
        Ok(Removal::Removed)
    }

    /// Persists the whole set and adopts it once the write succeeded.
    async fn sync(&mut self, next: Vec<Account>) -> Result<(), StoreError> {
        self.repo.save_accounts(&next).await?;
        self.accounts = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BOOTSTRAP_ID, Role};
    use crate::storage::MemoryStore;

    fn account(id: &str, username: &str) -> Account {
        Account {
            id: id.to_string(),
            username: username.to_string(),
            password: "secret".to_string(),
            name: username.to_uppercase(),
            avatar: String::new(),
            target_weight: 70.0,
            preferences: Vec::new(),
            role: Role::User,
            logs: Vec::new(),
            videos: Vec::new(),
        }
    }

    #[tokio::test]
    async fn first_open_seeds_and_persists_bootstrap() {
        let repo = Arc::new(MemoryStore::new());
        let store = AccountStore::open(repo.clone()).await.unwrap();

        assert_eq!(store.list().len(), 1);
        assert_eq!(store.list()[0].id, BOOTSTRAP_ID);
        assert_eq!(store.list()[0].role, Role::Admin);
        let persisted = repo.load_accounts().await.unwrap().unwrap();
        assert_eq!(persisted, store.list());
    }

    #[tokio::test]
    async fn upsert_replaces_by_id_and_appends_new() {
        let repo = Arc::new(MemoryStore::new());
        let mut store = AccountStore::open(repo.clone()).await.unwrap();

        store.upsert(account("1", "ana")).await.unwrap();
        let mut renamed = account("1", "ana");
        renamed.name = "Ana Maria".to_string();
        store.upsert(renamed).await.unwrap();
        store.upsert(account("2", "bo")).await.unwrap();

        let ids: Vec<_> = store.list().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, [BOOTSTRAP_ID, "1", "2"]);
        assert_eq!(store.find("1").unwrap().name, "Ana Maria");
        assert_eq!(repo.load_accounts().await.unwrap().unwrap(), store.list());
    }

    #[tokio::test]
    async fn bootstrap_cannot_be_removed() {
        let repo = Arc::new(MemoryStore::new());
        let mut store = AccountStore::open(repo).await.unwrap();

        assert_eq!(store.remove(BOOTSTRAP_ID).await.unwrap(), Removal::Protected);
        assert_eq!(store.list().len(), 1);
    }

    #[tokio::test]
    async fn remove_drops_exactly_one_account() {
        let repo = Arc::new(MemoryStore::new());
        let mut store = AccountStore::open(repo.clone()).await.unwrap();
        store.upsert(account("1", "ana")).await.unwrap();
        store.upsert(account("2", "bo")).await.unwrap();

        assert_eq!(store.remove("1").await.unwrap(), Removal::Removed);
        assert_eq!(store.remove("1").await.unwrap(), Removal::Missing);

        let ids: Vec<_> = store.list().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, [BOOTSTRAP_ID, "2"]);
        assert_eq!(repo.load_accounts().await.unwrap().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn authenticate_is_case_sensitive() {
        let repo = Arc::new(MemoryStore::new());
        let store = AccountStore::open(repo).await.unwrap();

        assert!(store.authenticate("admin", "password").is_some());
        assert!(store.authenticate("Admin", "password").is_none());
        assert!(store.authenticate("admin", "Password").is_none());
    }
}
