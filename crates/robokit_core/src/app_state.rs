//! crates/robokit_core/src/app_state.rs
//!
//! The application state shared by every screen: the signed-in account, the cart,
//! the current page and the auth modal. State only changes through `reduce`;
//! `SessionController` performs the I/O around it.

use crate::domain::{AuthSession, Course, CourseId, Credentials, User};
use crate::ports::{AuthService, PortResult, SessionStore};
use std::sync::Arc;
use tracing::{info, warn};

//=========================================================================================
// State and Actions
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Admin,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub user: Option<User>,
    /// `Some` while the auth modal is open.
    pub auth_modal: Option<AuthMode>,
    pub cart: Vec<Course>,
    pub page: Page,
    /// True until the persisted session has been checked.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            user: None,
            auth_modal: None,
            cart: Vec::new(),
            page: Page::Home,
            loading: true,
        }
    }
}

impl AppState {
    pub fn is_in_cart(&self, id: CourseId) -> bool {
        self.cart.iter().any(|c| c.id == id)
    }

    pub fn cart_total(&self) -> f64 {
        self.cart.iter().map(Course::effective_price).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The persisted session was checked at startup.
    SessionRestored(Option<User>),
    LoggedIn(User),
    LoggedOut,
    OpenAuthModal(AuthMode),
    CloseAuthModal,
    AddToCart(Course),
    RemoveFromCart(CourseId),
    Navigate(Page),
}

/// Computes the next state. Pure.
pub fn reduce(mut state: AppState, action: Action) -> AppState {
    match action {
        Action::SessionRestored(user) => {
            if user.as_ref().is_some_and(User::is_admin) {
                state.page = Page::Admin;
            }
            state.user = user;
            state.loading = false;
        }
        Action::LoggedIn(user) => {
            if user.is_admin() {
                state.page = Page::Admin;
            }
            state.user = Some(user);
            state.auth_modal = None;
        }
        Action::LoggedOut => {
            state.user = None;
            state.cart.clear();
            state.page = Page::Home;
        }
        Action::OpenAuthModal(mode) => state.auth_modal = Some(mode),
        Action::CloseAuthModal => state.auth_modal = None,
        Action::AddToCart(course) => {
            // Anonymous shoppers are asked to sign in first.
            if state.user.is_none() {
                state.auth_modal = Some(AuthMode::Login);
            } else if !state.is_in_cart(course.id) {
                state.cart.push(course);
            }
        }
        Action::RemoveFromCart(id) => state.cart.retain(|c| c.id != id),
        Action::Navigate(page) => state.page = page,
    }
    state
}

//=========================================================================================
// Session Controller
//=========================================================================================

/// Drives the auth collaborator and the session store, feeding results into `reduce`.
pub struct SessionController {
    auth: Arc<dyn AuthService>,
    store: Arc<dyn SessionStore>,
    state: AppState,
}

impl SessionController {
    pub fn new(auth: Arc<dyn AuthService>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            auth,
            store,
            state: AppState::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) {
        let current = std::mem::take(&mut self.state);
        self.state = reduce(current, action);
    }

    /// Restores the persisted session, keeping it only if the backend still accepts it.
    pub async fn restore(&mut self) -> &AppState {
        let restored = match (self.store.token(), self.store.user()) {
            (Some(_), Some(user)) => match self.auth.verify().await {
                Ok(()) => {
                    info!("Restored session for {}", user.handle);
                    Some(user)
                }
                Err(e) => {
                    warn!("Persisted session rejected, clearing it: {}", e);
                    if let Err(e) = self.store.clear() {
                        warn!("Failed to clear session store: {}", e);
                    }
                    None
                }
            },
            _ => None,
        };
        self.dispatch(Action::SessionRestored(restored));
        &self.state
    }

    pub async fn login(&mut self, credentials: &Credentials) -> PortResult<User> {
        let AuthSession { token, user } = self.auth.login(credentials).await?;
        self.store.save(&AuthSession {
            token,
            user: user.clone(),
        })?;
        info!("Logged in as {} ({})", user.handle, user.role.as_str());
        self.dispatch(Action::LoggedIn(user.clone()));
        Ok(user)
    }

    /// Signs out. Local state and the store are cleared even if the backend call fails.
    pub async fn logout(&mut self) {
        if self.state.user.as_ref().is_some_and(User::is_admin) {
            if let Err(e) = self.auth.logout().await {
                warn!("Backend logout failed: {}", e);
            }
        }
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear session store: {}", e);
        }
        self.dispatch(Action::LoggedOut);
    }
}
