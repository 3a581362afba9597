//! In-memory session provider used by tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::Result;
use crate::models::OwnerId;

use super::SessionProvider;

#[derive(Default)]
pub struct MemorySessions {
    users: RwLock<HashMap<String, (String, OwnerId)>>,
    sessions: RwLock<HashMap<String, OwnerId>>,
}

impl MemorySessions {
    pub async fn add_user(&self, email: &str, password: &str) -> OwnerId {
        let id = Uuid::new_v4();
        self.users
            .write()
            .await
            .insert(email.to_lowercase(), (password.to_string(), id));
        id
    }
}

#[async_trait]
impl SessionProvider for MemorySessions {
    async fn current_user(&self, token: &str) -> Result<Option<OwnerId>> {
        Ok(self.sessions.read().await.get(token).copied())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Option<String>> {
        let users = self.users.read().await;
        match users.get(&email.trim().to_lowercase()) {
            Some((stored, id)) if stored == password => {
                let token = Uuid::new_v4().simple().to_string();
                self.sessions.write().await.insert(token.clone(), *id);
                Ok(Some(token))
            }
            _ => Ok(None),
        }
    }

    async fn sign_out(&self, token: &str) -> Result<()> {
        self.sessions.write().await.remove(token);
        Ok(())
    }
}
