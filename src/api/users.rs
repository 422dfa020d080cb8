//! User endpoints and a caching front for them.

use async_trait::async_trait;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use super::client::ApiClient;
use super::query_cache::{query_key, QueryCache};
use crate::error::DashboardError;
use crate::preferences::UserPatch;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    /// Patch that records this user as the signed-in identity.
    pub fn to_patch(&self) -> UserPatch {
        UserPatch {
            id: Some(self.id.clone()),
            name: Some(self.name.clone()),
            email: Some(self.email.clone()),
            is_authenticated: Some(true),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterData {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPage {
    pub users: Vec<User>,
    pub total: u64,
}

const CURRENT_USER_STALE_MINUTES: i64 = 5;
const USERS_STALE_MINUTES: i64 = 2;

#[async_trait]
pub trait UserApi: Send + Sync {
    async fn current_user(&self) -> Result<User, DashboardError>;
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse, DashboardError>;
    async fn register(&self, data: &RegisterData) -> Result<AuthResponse, DashboardError>;
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, DashboardError>;
    async fn list_users(&self, page: u32, limit: u32) -> Result<UserPage, DashboardError>;
}

#[async_trait]
impl UserApi for ApiClient {
    async fn current_user(&self) -> Result<User, DashboardError> {
        self.get("/user/me").await
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse, DashboardError> {
        self.post("/auth/login", credentials).await
    }

    async fn register(&self, data: &RegisterData) -> Result<AuthResponse, DashboardError> {
        self.post("/auth/register", data).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, DashboardError> {
        self.patch("/user/profile", update).await
    }

    async fn list_users(&self, page: u32, limit: u32) -> Result<UserPage, DashboardError> {
        self.get(&format!("/users?page={}&limit={}", page, limit))
            .await
    }
}

/// Wraps a [`UserApi`] with a [`QueryCache`]: reads are served from cache
/// while fresh, writes refresh or invalidate the affected keys.
pub struct UserService<A: UserApi> {
    api: A,
    cache: QueryCache,
}

impl<A: UserApi> UserService<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            cache: QueryCache::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn current_key() -> Vec<String> {
        query_key(["user", "current"])
    }

    pub async fn current_user(&mut self) -> Result<User, DashboardError> {
        if let Some(user) = self.cache.get::<User>(&Self::current_key()) {
            return Ok(user);
        }
        let user = self.api.current_user().await?;
        self.cache.set(
            Self::current_key(),
            &user,
            TimeDelta::minutes(CURRENT_USER_STALE_MINUTES),
        );
        Ok(user)
    }

    pub async fn users(&mut self, page: u32, limit: u32) -> Result<UserPage, DashboardError> {
        let key = query_key(["users".to_string(), page.to_string(), limit.to_string()]);
        if let Some(cached) = self.cache.get::<UserPage>(&key) {
            return Ok(cached);
        }
        let fetched = self.api.list_users(page, limit).await?;
        self.cache
            .set(key, &fetched, TimeDelta::minutes(USERS_STALE_MINUTES));
        Ok(fetched)
    }

    pub async fn login(
        &mut self,
        credentials: &LoginCredentials,
    ) -> Result<AuthResponse, DashboardError> {
        match self.api.login(credentials).await {
            Ok(auth) => {
                log::info!("Login successful for {}", auth.user.email);
                self.cache.set(
                    Self::current_key(),
                    &auth.user,
                    TimeDelta::minutes(CURRENT_USER_STALE_MINUTES),
                );
                Ok(auth)
            }
            Err(e) => {
                log::error!("Login failed: {}", e);
                Err(e)
            }
        }
    }

    pub async fn register(&mut self, data: &RegisterData) -> Result<AuthResponse, DashboardError> {
        match self.api.register(data).await {
            Ok(auth) => {
                log::info!("Registration successful for {}", auth.user.email);
                self.cache.set(
                    Self::current_key(),
                    &auth.user,
                    TimeDelta::minutes(CURRENT_USER_STALE_MINUTES),
                );
                Ok(auth)
            }
            Err(e) => {
                log::error!("Registration failed: {}", e);
                Err(e)
            }
        }
    }

    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> Result<User, DashboardError> {
        match self.api.update_profile(update).await {
            Ok(user) => {
                self.cache.set(
                    Self::current_key(),
                    &user,
                    TimeDelta::minutes(CURRENT_USER_STALE_MINUTES),
                );
                self.cache.invalidate(&query_key(["users"]));
                Ok(user)
            }
            Err(e) => {
                log::error!("Profile update failed: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeApi {
        calls: AtomicUsize,
        reject_login: bool,
    }

    fn ana() -> User {
        User {
            id: "u1".into(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            avatar: None,
        }
    }

    #[async_trait]
    impl UserApi for FakeApi {
        async fn current_user(&self) -> Result<User, DashboardError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ana())
        }

        async fn login(&self, _: &LoginCredentials) -> Result<AuthResponse, DashboardError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.reject_login {
                return Err(DashboardError::Unauthorized);
            }
            Ok(AuthResponse {
                user: ana(),
                token: "t0k".into(),
            })
        }

        async fn register(&self, data: &RegisterData) -> Result<AuthResponse, DashboardError> {
            Ok(AuthResponse {
                user: User {
                    name: data.name.clone(),
                    email: data.email.clone(),
                    ..ana()
                },
                token: "new".into(),
            })
        }

        async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, DashboardError> {
            Ok(User {
                name: update.name.clone().unwrap_or_else(|| "Ana".into()),
                ..ana()
            })
        }

        async fn list_users(&self, page: u32, _limit: u32) -> Result<UserPage, DashboardError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(UserPage {
                users: vec![ana()],
                total: page as u64,
            })
        }
    }

    #[tokio::test]
    async fn test_current_user_served_from_cache() {
        let mut service = UserService::new(FakeApi::default());
        service.current_user().await.unwrap();
        service.current_user().await.unwrap();
        assert_eq!(service.api().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_login_primes_current_user() {
        let mut service = UserService::new(FakeApi::default());
        let auth = service
            .login(&LoginCredentials {
                email: "ana@example.com".into(),
                password: "pw".into(),
            })
            .await
            .unwrap();
        assert_eq!(auth.token, "t0k");
        assert_eq!(service.current_user().await.unwrap(), ana());
        assert_eq!(service.api().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_login_propagates() {
        let mut service = UserService::new(FakeApi {
            reject_login: true,
            ..FakeApi::default()
        });
        let err = service
            .login(&LoginCredentials {
                email: "x".into(),
                password: "y".into(),
            })
            .await
            .unwrap_err();
        assert!(err.requires_user_action());
    }

    #[tokio::test]
    async fn test_profile_update_invalidates_user_lists() {
        let mut service = UserService::new(FakeApi::default());
        service.users(1, 10).await.unwrap();
        service.users(1, 10).await.unwrap();
        assert_eq!(service.api().calls.load(Ordering::SeqCst), 1);

        let updated = service
            .update_profile(&ProfileUpdate {
                name: Some("Ana B".into()),
                ..ProfileUpdate::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.name, "Ana B");
        assert_eq!(service.current_user().await.unwrap().name, "Ana B");

        service.users(1, 10).await.unwrap();
        assert_eq!(service.api().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_register_primes_cache() {
        let mut service = UserService::new(FakeApi::default());
        service
            .register(&RegisterData {
                name: "Bo".into(),
                email: "bo@example.com".into(),
                password: "pw".into(),
            })
            .await
            .unwrap();
        assert_eq!(service.current_user().await.unwrap().name, "Bo");
    }

    #[test]
    fn test_user_patch_marks_authenticated() {
        let patch = ana().to_patch();
        assert_eq!(patch.is_authenticated, Some(true));
        assert_eq!(patch.email.as_deref(), Some("ana@example.com"));
    }
}
