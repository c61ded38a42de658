use crate::accounts::Removal;
use crate::errors::{VitaliError, VitaliResult};
use crate::hub::Hub;
use crate::models::{AccountView, AdminEdit, AdminOverview, Role};
use tracing::info;

impl Hub {
    pub fn admin_overview(&self) -> VitaliResult<AdminOverview> {
        self.session.require_admin()?;
        let accounts = self.accounts.list();
        Ok(AdminOverview {
            accounts: accounts.iter().map(AccountView::from).collect(),
            total_accounts: accounts.len(),
            total_logs: accounts.iter().map(|account| account.logs.len()).sum(),
        })
    }

    /// Edits display name, target weight and role. Username and password stay untouched.
    pub async fn admin_edit(&mut self, id: &str, edit: AdminEdit) -> VitaliResult<AccountView> {
        let admin_id = self.session.require_admin()?.id.clone();
        let mut account = self
            .accounts
            .find(id)
            .cloned()
            .ok_or_else(|| VitaliError::AccountNotFound(id.to_string()))?;

        if account.is_bootstrap() && edit.role == Some(Role::User) {
            return Err(VitaliError::BootstrapProtected);
        }
        if let Some(name) = edit.name {
            if name.trim().is_empty() {
                return Err(VitaliError::missing("name"));
            }
            account.name = name;
        }
        if let Some(target_weight) = edit.target_weight {
            account.target_weight = target_weight;
        }
        if let Some(role) = edit.role {
            account.role = role;
        }

        let view = AccountView::from(&account);
        self.sync_account(account).await?;
        info!(admin = %admin_id, target = id, "account edited");
        Ok(view)
    }

    /// Deletes an account. Removing the signed-in account signs it out.
    pub async fn admin_delete(&mut self, id: &str) -> VitaliResult<()> {
        self.session.require_admin()?;
        match self.accounts.remove(id).await? {
            Removal::Removed => {
                self.refresh_session();
                Ok(())
            }
            Removal::Protected => Err(VitaliError::BootstrapProtected),
            Removal::Missing => Err(VitaliError::AccountNotFound(id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::VitaliError;
    use crate::hub::Hub;
    use crate::models::{AdminEdit, BOOTSTRAP_ID, Credentials, Registration, Role};
    use crate::storage::{AccountRepository, MemoryStore};
    use crate::views::{Screen, View};
    use std::sync::Arc;

    fn admin() -> Credentials {
        Credentials {
            username: "admin".to_string(),
            password: "password".to_string(),
        }
    }

    async fn hub_with_user(storage: Arc<MemoryStore>) -> (Hub, String) {
        let mut hub = Hub::boot(storage).await.unwrap();
        let user = hub
            .register(Registration {
                username: "ana".to_string(),
                password: "pw".to_string(),
                name: "Ana".to_string(),
            })
            .await
            .unwrap();
        hub.logout();
        hub.login(&admin()).unwrap();
        (hub, user.id)
    }

    #[tokio::test]
    async fn only_admins_reach_the_console() {
        let mut hub = Hub::boot(Arc::new(MemoryStore::new())).await.unwrap();
        assert!(matches!(hub.admin_overview(), Err(VitaliError::NotSignedIn)));
        hub.register(Registration {
            username: "bo".to_string(),
            password: "pw".to_string(),
            name: "Bo".to_string(),
        })
        .await
        .unwrap();
        assert!(matches!(hub.admin_overview(), Err(VitaliError::Forbidden(_))));
        assert!(matches!(
            hub.admin_delete(BOOTSTRAP_ID).await,
            Err(VitaliError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn bootstrap_deletion_is_rejected_without_change() {
        let storage = Arc::new(MemoryStore::new());
        let (mut hub, _) = hub_with_user(storage.clone()).await;
        let before = storage.load_accounts().await.unwrap();

        assert!(matches!(
            hub.admin_delete(BOOTSTRAP_ID).await,
            Err(VitaliError::BootstrapProtected)
        ));
        assert_eq!(storage.load_accounts().await.unwrap(), before);
    }

    #[tokio::test]
    async fn deleting_a_user_removes_only_that_account() {
        let storage = Arc::new(MemoryStore::new());
        let (mut hub, user_id) = hub_with_user(storage.clone()).await;

        hub.admin_delete(&user_id).await.unwrap();

        let overview = hub.admin_overview().unwrap();
        assert_eq!(overview.total_accounts, 1);
        assert_eq!(overview.accounts[0].id, BOOTSTRAP_ID);
        assert!(matches!(
            hub.admin_delete(&user_id).await,
            Err(VitaliError::AccountNotFound(_))
        ));
    }

    #[tokio::test]
    async fn deleting_the_active_account_clears_the_session() {
        let storage = Arc::new(MemoryStore::new());
        let (mut hub, user_id) = hub_with_user(storage).await;
        hub.admin_edit(
            &user_id,
            AdminEdit {
                role: Some(Role::Admin),
                ..AdminEdit::default()
            },
        )
        .await
        .unwrap();
        hub.logout();
        hub.login(&Credentials {
            username: "ana".to_string(),
            password: "pw".to_string(),
        })
        .unwrap();

        hub.admin_delete(&user_id).await.unwrap();

        assert!(hub.session().active().is_none());
        assert_eq!(hub.snapshot().screen, Screen::Auth);
    }

    #[tokio::test]
    async fn self_deletion_drops_the_coach_conversation() {
        let (mut hub, user_id) = hub_with_user(Arc::new(MemoryStore::new())).await;
        hub.admin_edit(
            &user_id,
            AdminEdit {
                role: Some(Role::Admin),
                ..AdminEdit::default()
            },
        )
        .await
        .unwrap();
        hub.logout();
        hub.login(&Credentials {
            username: "ana".to_string(),
            password: "pw".to_string(),
        })
        .unwrap();
        let (ticket, _, _) = hub.begin_advice("ana secret").unwrap();
        hub.finish_advice(ticket, "x".to_string());

        hub.admin_delete(&user_id).await.unwrap();
        hub.login(&admin()).unwrap();

        let transcript = hub.coach().unwrap().transcript();
        assert_eq!(transcript.len(), 1);
        assert!(transcript.iter().all(|m| m.content != "ana secret"));
    }

    #[tokio::test]
    async fn bootstrap_cannot_be_demoted() {
        let (mut hub, _) = hub_with_user(Arc::new(MemoryStore::new())).await;
        let err = hub
            .admin_edit(
                BOOTSTRAP_ID,
                AdminEdit {
                    role: Some(Role::User),
                    ..AdminEdit::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, VitaliError::BootstrapProtected));
        assert!(hub.session().require().unwrap().is_admin());
    }

    #[tokio::test]
    async fn editing_self_refreshes_the_session() {
        let (mut hub, _) = hub_with_user(Arc::new(MemoryStore::new())).await;
        hub.admin_edit(
            BOOTSTRAP_ID,
            AdminEdit {
                name: Some("ROOT".to_string()),
                target_weight: Some(82.0),
                ..AdminEdit::default()
            },
        )
        .await
        .unwrap();

        let active = hub.session().require().unwrap();
        assert_eq!(active.name, "ROOT");
        assert_eq!(active.target_weight, 82.0);
        assert_eq!(active.username, "admin");
    }

    #[tokio::test]
    async fn demoted_admin_loses_admin_view() {
        let (mut hub, user_id) = hub_with_user(Arc::new(MemoryStore::new())).await;
        hub.admin_edit(
            &user_id,
            AdminEdit {
                role: Some(Role::Admin),
                ..AdminEdit::default()
            },
        )
        .await
        .unwrap();
        hub.logout();
        hub.login(&Credentials {
            username: "ana".to_string(),
            password: "pw".to_string(),
        })
        .unwrap();
        assert_eq!(hub.navigate(View::Admin), Screen::App(View::Admin));

        hub.admin_edit(
            &user_id,
            AdminEdit {
                role: Some(Role::User),
                ..AdminEdit::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(hub.snapshot().screen, Screen::App(View::Dashboard));
        assert!(matches!(hub.admin_overview(), Err(VitaliError::Forbidden(_))));
    }
}
