use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::{SubscriptionId, Subscribers};
use crate::entity::User;
use crate::error::{PlotlineError, Result};
use crate::storage::{keys, Persistence};

/// Simulated round-trip for login and signup.
pub const DEFAULT_LOGIN_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    /// A login or signup delay is in flight.
    Authenticating,
    Authenticated(User),
}

/// Caller-side check for the login form. The store itself accepts anything.
pub fn validate_credentials(email: &str, password: &str) -> Result<()> {
    if email.is_empty() || password.is_empty() {
        return Err(PlotlineError::InvalidCredentials);
    }
    Ok(())
}

/// Caller-side check for the signup form.
pub fn validate_signup(name: &str, email: &str, password: &str) -> Result<()> {
    if name.is_empty() {
        return Err(PlotlineError::InvalidCredentials);
    }
    validate_credentials(email, password)
}

/// Holds the signed-in user and mirrors it to the `user` key.
///
/// There is no credential check: any login or signup succeeds once the
/// simulated delay elapses, unless the caller cancels it first.
pub struct SessionStore {
    state: SessionState,
    persistence: Persistence,
    delay: Duration,
    subscribers: Subscribers<SessionState>,
}

impl SessionStore {
    pub fn new(persistence: Persistence) -> Self {
        Self::with_delay(persistence, DEFAULT_LOGIN_DELAY)
    }

    /// Restore any persisted user and use `delay` for login/signup.
    pub fn with_delay(persistence: Persistence, delay: Duration) -> Self {
        let state = match persistence.load::<User>(keys::USER) {
            Some(user) => {
                tracing::debug!(user = %user.id, "restored session");
                SessionState::Authenticated(user)
            }
            None => SessionState::Anonymous,
        };

        Self {
            state,
            persistence,
            delay,
            subscribers: Subscribers::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current_user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Authenticating)
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&SessionState) + Send + 'static,
    ) -> SubscriptionId {
        self.subscribers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Sign in as `email`. The password is not checked.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User> {
        self.login_with_cancel(email, password, &CancellationToken::new())
            .await
    }

    pub async fn login_with_cancel(
        &mut self,
        email: &str,
        _password: &str,
        cancel: &CancellationToken,
    ) -> Result<User> {
        self.authenticate(User::from_email(email.to_string()), cancel)
            .await
    }

    /// Create an account for `name`/`email` and sign in as it.
    pub async fn signup(&mut self, name: &str, email: &str, password: &str) -> Result<User> {
        self.signup_with_cancel(name, email, password, &CancellationToken::new())
            .await
    }

    pub async fn signup_with_cancel(
        &mut self,
        name: &str,
        email: &str,
        _password: &str,
        cancel: &CancellationToken,
    ) -> Result<User> {
        self.authenticate(User::new(name.to_string(), email.to_string()), cancel)
            .await
    }

    /// Forget the current user, in memory and on disk.
    pub fn logout(&mut self) {
        self.persistence.clear(keys::USER);
        self.set_state(SessionState::Anonymous);
        tracing::info!("logged out");
    }

    async fn authenticate(&mut self, user: User, cancel: &CancellationToken) -> Result<User> {
        let previous = std::mem::replace(&mut self.state, SessionState::Authenticating);
        self.subscribers.notify(&self.state);

        let delay = self.delay;
        let mut pending = PendingAuth {
            store: self,
            previous: Some(previous),
        };

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("authentication cancelled");
                return Err(PlotlineError::Cancelled);
            }
            _ = tokio::time::sleep(delay) => {}
        }

        pending.previous = None;
        pending.store.persistence.save(keys::USER, &user);
        tracing::info!(user = %user.id, email = %user.email, "authenticated");
        pending
            .store
            .set_state(SessionState::Authenticated(user.clone()));
        Ok(user)
    }

    fn set_state(&mut self, state: SessionState) {
        self.state = state;
        self.subscribers.notify(&self.state);
    }
}

/// Restores the pre-login state unless the login completes, whether the call
/// was cancelled or its future was dropped mid-delay.
struct PendingAuth<'a> {
    store: &'a mut SessionStore,
    previous: Option<SessionState>,
}

impl Drop for PendingAuth<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            tracing::debug!("authentication abandoned, restoring session state");
            self.store.set_state(previous);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};
    use std::sync::{Arc, Mutex};

    fn store_with(backend: Arc<MemoryStore>) -> SessionStore {
        SessionStore::new(Persistence::new(backend))
    }

    #[test]
    fn test_validate_credentials() {
        assert!(validate_credentials("a@b.c", "pw").is_ok());
        assert!(matches!(
            validate_credentials("", "pw"),
            Err(PlotlineError::InvalidCredentials)
        ));
        assert!(matches!(
            validate_credentials("a@b.c", ""),
            Err(PlotlineError::InvalidCredentials)
        ));
        assert!(validate_signup("", "a@b.c", "pw").is_err());
        assert!(validate_signup("Frank", "a@b.c", "pw").is_ok());
    }

    #[test]
    fn test_starts_anonymous() {
        let store = store_with(Arc::new(MemoryStore::new()));
        assert_eq!(store.state(), &SessionState::Anonymous);
        assert!(store.current_user().is_none());
        assert!(!store.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_waits_for_delay_then_succeeds() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = store_with(backend.clone());

        let start = tokio::time::Instant::now();
        let user = store.login("paul@arrakis.org", "secret").await.unwrap();

        assert!(start.elapsed() >= DEFAULT_LOGIN_DELAY);
        assert_eq!(user.name, "paul");
        assert_eq!(store.current_user(), Some(&user));
        assert!(!store.is_loading());
        assert!(backend.get(keys::USER).unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_reports_loading_while_in_flight() {
        let mut store = store_with(Arc::new(MemoryStore::new()));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        store.subscribe(move |state| sink.lock().unwrap().push(state.clone()));

        let user = store.login("paul@arrakis.org", "secret").await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![SessionState::Authenticating, SessionState::Authenticated(user)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_signup_uses_supplied_name() {
        let mut store = store_with(Arc::new(MemoryStore::new()));

        let user = store
            .signup("Paul Atreides", "paul@arrakis.org", "secret")
            .await
            .unwrap();

        assert_eq!(user.name, "Paul Atreides");
        assert_eq!(user.email, "paul@arrakis.org");
        assert_eq!(store.current_user().map(|u| u.name.as_str()), Some("Paul Atreides"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_login_restores_previous_state() {
        let mut store = store_with(Arc::new(MemoryStore::new()));
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            trigger.cancel();
        });

        let result = store
            .login_with_cancel("paul@arrakis.org", "secret", &cancel)
            .await;

        assert!(matches!(result, Err(PlotlineError::Cancelled)));
        assert_eq!(store.state(), &SessionState::Anonymous);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_relogin_keeps_existing_user() {
        let mut store = store_with(Arc::new(MemoryStore::new()));
        let first = store.login("paul@arrakis.org", "secret").await.unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = store
            .login_with_cancel("chani@arrakis.org", "secret", &cancel)
            .await;

        assert!(result.is_err());
        assert_eq!(store.current_user(), Some(&first));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_login_restores_previous_state() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = store_with(backend.clone());
        let first = store.login("paul@arrakis.org", "secret").await.unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(move |state| sink.lock().unwrap().push(state.clone()));

        // Gives up long before the login delay elapses
        let result = tokio::time::timeout(
            Duration::from_millis(10),
            store.login("chani@arrakis.org", "secret"),
        )
        .await;

        assert!(result.is_err());
        assert!(!store.is_loading());
        assert_eq!(store.current_user(), Some(&first));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                SessionState::Authenticating,
                SessionState::Authenticated(first.clone())
            ]
        );
        assert_eq!(store_with(backend).current_user(), Some(&first));
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_survives_restart() {
        let backend = Arc::new(MemoryStore::new());
        let user = {
            let mut store = store_with(backend.clone());
            store.login("paul@arrakis.org", "secret").await.unwrap()
        };

        let store = store_with(backend);
        assert_eq!(store.current_user(), Some(&user));
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_clears_persisted_user() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = store_with(backend.clone());
        store.login("paul@arrakis.org", "secret").await.unwrap();

        store.logout();

        assert_eq!(store.state(), &SessionState::Anonymous);
        assert_eq!(backend.get(keys::USER).unwrap(), None);
        assert!(store_with(backend).current_user().is_none());
    }

    #[test]
    fn test_corrupt_user_record_starts_anonymous() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(keys::USER, "{\"id\": 42").unwrap();

        let store = store_with(backend);
        assert_eq!(store.state(), &SessionState::Anonymous);
    }
}
