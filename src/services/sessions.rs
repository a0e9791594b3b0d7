//! Redis-backed session store

use redis::{AsyncCommands, Client};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::session::Session,
};

#[derive(Clone)]
pub struct SessionStore {
    client: Client,
}

fn session_key(id: Uuid) -> String {
    format!("session:{}", id)
}

impl SessionStore {
    /// Open the client and check the server answers
    pub async fn new(url: &str) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?;

        let store = Self { client };
        store.ping().await?;
        Ok(store)
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to get Redis connection: {}", e)))
    }

    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection().await?;
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection test failed: {}", e)))?;
        Ok(())
    }

    /// Store a session until it expires
    pub async fn put(&self, session: &Session, ttl_seconds: u64) -> AppResult<()> {
        let mut conn = self.connection().await?;
        let payload = serde_json::to_string(session)
            .map_err(|e| AppError::Internal(format!("Failed to encode session: {}", e)))?;

        conn.set_ex::<_, _, ()>(session_key(session.id), payload, ttl_seconds)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store session in Redis: {}", e)))?;
        Ok(())
    }

    /// Load a session. None once it expired or was signed out.
    pub async fn get(&self, id: Uuid) -> AppResult<Option<Session>> {
        let mut conn = self.connection().await?;
        let payload: Option<String> = conn
            .get(session_key(id))
            .await
            .map_err(|e| AppError::Internal(format!("Failed to get session from Redis: {}", e)))?;

        payload
            .map(|p| {
                serde_json::from_str(&p)
                    .map_err(|e| AppError::Internal(format!("Corrupt session {}: {}", id, e)))
            })
            .transpose()
    }

    pub async fn remove(&self, id: Uuid) -> AppResult<()> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(session_key(id))
            .await
            .map_err(|e| AppError::Internal(format!("Failed to delete session from Redis: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced() {
        let id = Uuid::nil();
        assert_eq!(
            session_key(id),
            "session:00000000-0000-0000-0000-000000000000"
        );
    }
}
