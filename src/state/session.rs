//! Session state container

use crate::api::adapter::SharedAdapter;
use crate::api::error::ApiError;
use crate::models::{CreateUserRequest, User};

pub struct SessionState {
    adapter: SharedAdapter,
    current_user: Option<User>,
    initialized: bool,
}

impl SessionState {
    pub fn new(adapter: SharedAdapter) -> Self {
        Self {
            adapter,
            current_user: None,
            initialized: false,
        }
    }

    /// Restore the session from stored tokens. Idempotent; later calls are
    /// no-ops.
    pub async fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.current_user = self.adapter.current_user().await;
        self.initialized = true;
    }

    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
        remember: bool,
    ) -> Result<&User, ApiError> {
        let user = self.adapter.login(username, password, remember).await?;
        self.initialized = true;
        Ok(self.current_user.insert(user))
    }

    pub async fn register(&mut self, request: &CreateUserRequest) -> Result<&User, ApiError> {
        let user = self.adapter.register(request).await?;
        self.initialized = true;
        Ok(self.current_user.insert(user))
    }

    pub fn logout(&mut self) {
        self.adapter.logout();
        self.current_user = None;
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user.is_some()
    }
}
