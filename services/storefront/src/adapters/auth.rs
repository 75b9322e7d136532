//! services/storefront/src/adapters/auth.rs
//!
//! Implements the `AuthService` port against `/api/admin/auth`. The adapter does not
//! persist anything itself; the session controller decides what goes into the store.

use super::http::ApiClient;
use super::wire::{LoginBody, LoginRecord, ProfileRecord};
use async_trait::async_trait;
use reqwest::Method;
use robokit_core::domain::{AuthSession, Credentials, User};
use robokit_core::ports::{AuthService, PortResult};

#[derive(Clone)]
pub struct HttpAuthService {
    api: ApiClient,
}

impl HttpAuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, credentials: &Credentials) -> PortResult<AuthSession> {
        let path = "/api/admin/auth/login";
        let builder = self.api.request(Method::POST, path).json(&LoginBody {
            user: &credentials.user,
            password: &credentials.password,
        });
        let record: LoginRecord = self.api.send(path, builder).await?;
        record.to_domain()
    }

    async fn verify(&self) -> PortResult<()> {
        let path = "/api/admin/auth/verify";
        let builder = self.api.request(Method::GET, path);
        self.api.send_unit(path, builder).await
    }

    async fn logout(&self) -> PortResult<()> {
        let path = "/api/admin/auth/logout";
        let builder = self.api.request(Method::POST, path);
        self.api.send_unit(path, builder).await
    }

    async fn profile(&self) -> PortResult<User> {
        let path = "/api/admin/auth/profile";
        let builder = self.api.request(Method::GET, path);
        let record: ProfileRecord = self.api.send(path, builder).await?;
        record.to_domain()
    }
}
