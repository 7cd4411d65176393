use std::{
    collections::HashMap,
    sync::{Arc, Mutex as StdMutex},
    time::{Duration, Instant},
};

use kurdmed_core::{
    domain::{chat::ChatView, common::generate_session_token, identity::IdentitySession},
    infrastructure::{identity::FirebaseIdentityProvider, llm::GeminiLLMClient},
};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

pub type KurdMedChatView = ChatView<GeminiLLMClient>;
pub type KurdMedIdentitySession = IdentitySession<FirebaseIdentityProvider>;

#[derive(Debug, Clone, Copy)]
pub struct SessionLimits {
    pub idle_ttl: Duration,
    pub max_sessions: usize,
}

/// Signed-in state of one device, reachable only with its session token.
#[derive(Clone)]
pub struct DeviceSession {
    token: String,
    pub identity: KurdMedIdentitySession,
    pub chat: Arc<Mutex<KurdMedChatView>>,
    last_seen: Arc<StdMutex<Instant>>,
}

impl DeviceSession {
    pub fn token(&self) -> &str {
        &self.token
    }

    fn touch(&self) {
        let mut last_seen = self.last_seen.lock().unwrap_or_else(|e| e.into_inner());
        *last_seen = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        self.last_seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .elapsed()
    }
}

type Sessions = HashMap<String, DeviceSession>;

#[derive(Clone)]
pub struct DeviceSessions {
    sessions: Arc<RwLock<Sessions>>,
    identity_provider: Arc<FirebaseIdentityProvider>,
    chat_model: Arc<GeminiLLMClient>,
    limits: SessionLimits,
}

impl DeviceSessions {
    pub fn new(
        identity_provider: Arc<FirebaseIdentityProvider>,
        chat_model: Arc<GeminiLLMClient>,
        limits: SessionLimits,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            identity_provider,
            chat_model,
            limits,
        }
    }

    /// Fresh identity state, not yet attached to any device.
    pub fn identity(&self) -> KurdMedIdentitySession {
        IdentitySession::new(self.identity_provider.clone())
    }

    /// Stores a signed-in identity for `device_id` under a new token,
    /// replacing the device's previous session.
    pub async fn bind(&self, device_id: &str, identity: KurdMedIdentitySession) -> DeviceSession {
        let session = DeviceSession {
            token: generate_session_token(),
            identity,
            chat: Arc::new(Mutex::new(ChatView::new(self.chat_model.clone()))),
            last_seen: Arc::new(StdMutex::new(Instant::now())),
        };

        let previous = {
            let mut sessions = self.sessions.write().await;
            self.evict(&mut sessions);
            sessions.insert(device_id.to_string(), session.clone())
        };
        if let Some(previous) = previous {
            previous.identity.sign_out();
        }

        self.forget_on_sign_out(device_id.to_string(), &session);
        debug!(device_id, "Device session bound");

        session
    }

    /// Looks a session up without creating one. The token must match and the
    /// session must not have been idle longer than the configured limit.
    pub async fn get(&self, device_id: &str, token: &str) -> Option<DeviceSession> {
        let session = self.sessions.read().await.get(device_id).cloned()?;
        if session.token != token {
            return None;
        }

        if session.idle_for() > self.limits.idle_ttl {
            self.remove(device_id, token).await;
            return None;
        }

        session.touch();
        Some(session)
    }

    async fn remove(&self, device_id: &str, token: &str) {
        let mut sessions = self.sessions.write().await;
        if sessions
            .get(device_id)
            .is_some_and(|session| session.token == token)
        {
            sessions.remove(device_id);
            debug!(device_id, "Device session removed");
        }
    }

    fn evict(&self, sessions: &mut Sessions) {
        let before = sessions.len();
        sessions.retain(|_, session| session.idle_for() <= self.limits.idle_ttl);

        while sessions.len() >= self.limits.max_sessions.max(1) {
            let Some(oldest) = sessions
                .iter()
                .max_by_key(|(_, session)| session.idle_for())
                .map(|(device_id, _)| device_id.clone())
            else {
                break;
            };
            sessions.remove(&oldest);
        }

        if sessions.len() < before {
            info!(evicted = before - sessions.len(), "Evicted device sessions");
        }
    }

    fn forget_on_sign_out(&self, device_id: String, session: &DeviceSession) {
        let mut updates = session.identity.subscribe();
        let this = self.clone();
        let token = session.token.clone();

        tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                if updates.borrow_and_update().is_none() {
                    this.remove(&device_id, &token).await;
                    break;
                }
            }
        });
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sessions(limits: SessionLimits) -> DeviceSessions {
        DeviceSessions::new(
            Arc::new(FirebaseIdentityProvider::new(
                String::new(),
                "http://127.0.0.1:9".to_string(),
            )),
            Arc::new(GeminiLLMClient::new(
                String::new(),
                "gemini-2.5-flash".to_string(),
                "http://127.0.0.1:9".to_string(),
            )),
            limits,
        )
    }

    fn roomy() -> SessionLimits {
        SessionLimits {
            idle_ttl: Duration::from_secs(3600),
            max_sessions: 100,
        }
    }

    #[tokio::test]
    async fn test_lookup_needs_matching_token_and_creates_nothing() {
        let sessions = sessions(roomy());

        assert!(sessions.get("device-a", "anything").await.is_none());
        assert_eq!(sessions.len().await, 0);

        let bound = sessions.bind("device-a", sessions.identity()).await;
        let found = sessions.get("device-a", bound.token()).await.unwrap();
        assert!(Arc::ptr_eq(&bound.chat, &found.chat));

        assert!(sessions.get("device-a", "guessed-token").await.is_none());
        assert!(sessions.get("device-b", bound.token()).await.is_none());
        assert_eq!(sessions.len().await, 1);
    }

    #[tokio::test]
    async fn test_rebinding_replaces_previous_token() {
        let sessions = sessions(roomy());

        let first = sessions.bind("device-a", sessions.identity()).await;
        let second = sessions.bind("device-a", sessions.identity()).await;

        assert_ne!(first.token(), second.token());
        assert!(sessions.get("device-a", first.token()).await.is_none());
        assert!(sessions.get("device-a", second.token()).await.is_some());
    }

    #[tokio::test]
    async fn test_capacity_evicts_least_recently_used() {
        let sessions = sessions(SessionLimits {
            idle_ttl: Duration::from_secs(3600),
            max_sessions: 2,
        });

        let pause = || std::thread::sleep(Duration::from_millis(2));

        let a = sessions.bind("device-a", sessions.identity()).await;
        pause();
        let b = sessions.bind("device-b", sessions.identity()).await;
        pause();
        sessions.get("device-a", a.token()).await.unwrap();
        pause();
        let c = sessions.bind("device-c", sessions.identity()).await;

        assert_eq!(sessions.len().await, 2);
        assert!(sessions.get("device-b", b.token()).await.is_none());
        assert!(sessions.get("device-a", a.token()).await.is_some());
        assert!(sessions.get("device-c", c.token()).await.is_some());
    }

    #[tokio::test]
    async fn test_idle_sessions_expire() {
        let sessions = sessions(SessionLimits {
            idle_ttl: Duration::ZERO,
            max_sessions: 100,
        });

        let bound = sessions.bind("device-a", sessions.identity()).await;
        std::thread::sleep(Duration::from_millis(5));

        assert!(sessions.get("device-a", bound.token()).await.is_none());
        assert_eq!(sessions.len().await, 0);
    }

    #[tokio::test]
    async fn test_sign_out_forgets_device() {
        let sessions = sessions(roomy());
        let identity = sessions.identity();
        let bound = sessions.bind("device-a", identity.clone()).await;

        identity.sign_out();

        for _ in 0..100 {
            if sessions.len().await == 0 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(sessions.len().await, 0);
        assert!(sessions.get("device-a", bound.token()).await.is_none());
    }
}
