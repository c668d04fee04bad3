use cfg_if::cfg_if;
use leptos::*;
use serde::{Deserialize, Serialize};

use crate::{api::bearer, error::*};

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Judge,
    #[default]
    Viewer,
}

/// Store user information
///
/// update only if user login/logout/refresh token
#[derive(Debug, Default, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct TokenInfo {
    pub token: String,
    pub role: Role,
}

#[cfg(target_arch = "wasm32")]
const TOKEN_INFO_KEY: &str = "token_info";

fn restore() -> Option<TokenInfo> {
    cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        use gloo::storage::{SessionStorage, Storage};
        SessionStorage::get(TOKEN_INFO_KEY).ok()
    } else {
        None
    }
    }
}

/// Session storage rejections (quota, disabled storage) surface as
/// browser errors.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn storage_error(err: impl std::fmt::Display) -> Error {
    ErrorKind::Browser.context(format!("session storage: {err}"))
}

fn persist(info: Option<&TokenInfo>) -> Result<()> {
    cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        use gloo::storage::{SessionStorage, Storage};
        match info {
            Some(info) => SessionStorage::set(TOKEN_INFO_KEY, info)
                .map_err(storage_error),
            None => {
                SessionStorage::delete(TOKEN_INFO_KEY);
                Ok(())
            }
        }
    } else {
        let _ = info;
        Ok(())
    }
    }
}

/// The bearer credential, held opaquely. Authentication itself happens
/// elsewhere; this only carries what the REST collaborator needs.
#[derive(Clone, Copy)]
pub struct Session {
    info: RwSignal<Option<TokenInfo>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            info: create_rw_signal(restore()),
        }
    }

    pub fn login(&self, info: TokenInfo) {
        if let Err(err) = persist(Some(&info)) {
            tracing::warn!(%err, "could not persist session");
        }
        self.info.set(Some(info));
    }

    pub fn logout(&self) {
        if let Err(err) = persist(None) {
            tracing::warn!(%err, "could not persist session");
        }
        self.info.set(None);
    }

    pub fn token(&self) -> Option<String> {
        self.info.with(|info| info.as_ref().map(|i| i.token.clone()))
    }

    pub fn role(&self) -> Option<Role> {
        self.info.with(|info| info.as_ref().map(|i| i.role))
    }

    /// Authorization header value, when logged in.
    pub fn bearer(&self) -> Option<String> {
        self.token().map(|token| bearer(&token))
    }

    pub fn is_authenticated(&self) -> bool {
        self.info.with(Option::is_some)
    }
}

pub fn provide_session() {
    provide_context(Session::new());
}

pub fn use_session() -> Session {
    expect_context()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn login_logout() {
        let rt = create_runtime();
        let session = Session::new();
        assert!(!session.is_authenticated());
        assert_eq!(session.bearer(), None);

        session.login(TokenInfo {
            token: "t0ken".to_owned(),
            role: Role::Admin,
        });
        assert_eq!(session.bearer().as_deref(), Some("Bearer t0ken"));
        assert_eq!(session.role(), Some(Role::Admin));

        session.logout();
        assert!(!session.is_authenticated());
        rt.dispose();
    }

    #[test]
    fn storage_rejection_is_a_browser_error() {
        let err = storage_error("quota exceeded");
        assert_eq!(err.kind, ErrorKind::Browser);
        assert!(err.context.contains("quota exceeded"));
    }
}
