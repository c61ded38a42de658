use crate::models::Account;
use crate::session::Session;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Dashboard,
    Recipes,
    Coach,
    Comm,
    Games,
    Vault,
    Admin,
}

impl View {
    pub const ALL: [View; 7] = [
        View::Dashboard,
        View::Recipes,
        View::Coach,
        View::Comm,
        View::Games,
        View::Vault,
        View::Admin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Recipes => "recipes",
            View::Coach => "coach",
            View::Comm => "comm",
            View::Games => "games",
            View::Vault => "vault",
            View::Admin => "admin",
        }
    }

    fn label(self) -> &'static str {
        match self {
            View::Dashboard => "Vitals",
            View::Recipes => "Fuel",
            View::Coach => "Coach",
            View::Comm => "Chat",
            View::Games => "Train",
            View::Vault => "Vault",
            View::Admin => "Root",
        }
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|view| view.as_str() == value)
            .ok_or_else(|| format!("unknown view `{value}`"))
    }
}

/// What the UI should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", content = "view", rename_all = "lowercase")]
pub enum Screen {
    Auth,
    App(View),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub view: View,
    pub label: &'static str,
}

/// Gates a requested view on the session: no account means the auth screen, and only
/// administrators reach the admin view.
pub fn resolve(session: &Session, requested: View) -> Screen {
    match session.active() {
        None => Screen::Auth,
        Some(account) if requested == View::Admin && !account.is_admin() => {
            Screen::App(View::Dashboard)
        }
        Some(_) => Screen::App(requested),
    }
}

pub fn nav_items(account: &Account) -> Vec<NavItem> {
    View::ALL
        .into_iter()
        .filter(|view| *view != View::Admin || account.is_admin())
        .map(|view| NavItem {
            view,
            label: view.label(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::AccountStore;
    use crate::models::{Credentials, Role};
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    async fn admin_session() -> Session {
        let store = AccountStore::open(Arc::new(MemoryStore::new())).await.unwrap();
        let mut session = Session::default();
        session
            .login(
                &store,
                &Credentials {
                    username: "admin".to_string(),
                    password: "password".to_string(),
                },
            )
            .unwrap();
        session
    }

    #[test]
    fn no_session_always_routes_to_auth() {
        let session = Session::default();
        for view in View::ALL {
            assert_eq!(resolve(&session, view), Screen::Auth);
        }
    }

    #[tokio::test]
    async fn admin_reaches_admin_view() {
        let session = admin_session().await;
        assert_eq!(resolve(&session, View::Admin), Screen::App(View::Admin));
        assert_eq!(resolve(&session, View::Vault), Screen::App(View::Vault));
    }

    #[test]
    fn nav_hides_admin_for_users() {
        let mut account = Account::bootstrap();
        assert_eq!(nav_items(&account).len(), 7);
        account.role = Role::User;
        let items = nav_items(&account);
        assert_eq!(items.len(), 6);
        assert!(items.iter().all(|item| item.view != View::Admin));
        assert_eq!(items[0].label, "Vitals");
    }

    #[test]
    fn parses_view_names() {
        assert_eq!("comm".parse::<View>(), Ok(View::Comm));
        assert!("root".parse::<View>().is_err());
    }
}
