//! Live session storage.
//!
//! Each session lives in its own slot: the persona resolved at start (cached
//! so a generated secret stays fixed) and the session behind an async mutex.
//! The mutex doubles as the turn lock; it is held across the backend round
//! trip so a turn is serialized end to end. Sessions never share the lock.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, MutexGuard, TryLockError};
use vaultbreak_domain::{GameSession, Persona, SessionId};

use crate::infrastructure::ports::WalletCapability;

pub struct SessionSlot {
    id: SessionId,
    persona: Persona,
    wallet: WalletCapability,
    session: Mutex<GameSession>,
}

impl SessionSlot {
    pub fn new(session: GameSession, persona: Persona, wallet: WalletCapability) -> Self {
        Self {
            id: session.id(),
            persona,
            wallet,
            session: Mutex::new(session),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn wallet(&self) -> &WalletCapability {
        &self.wallet
    }

    /// Take the turn lock without waiting. Fails while another turn holds it.
    pub fn try_lock(&self) -> Result<MutexGuard<'_, GameSession>, TryLockError> {
        self.session.try_lock()
    }

    /// Wait for the turn lock.
    pub async fn lock(&self) -> MutexGuard<'_, GameSession> {
        self.session.lock().await
    }
}

/// Sessions by id. Terminal sessions are removed once their result has been
/// handed back.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<SessionId, Arc<SessionSlot>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, slot: SessionSlot) -> Arc<SessionSlot> {
        let slot = Arc::new(slot);
        self.sessions.insert(slot.id(), Arc::clone(&slot));
        slot
    }

    pub fn get(&self, id: SessionId) -> Option<Arc<SessionSlot>> {
        self.sessions.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn remove(&self, id: SessionId) -> Option<Arc<SessionSlot>> {
        self.sessions.remove(&id).map(|(_, slot)| slot)
    }

    /// Snapshot of the live slots. The map is not locked while callers
    /// work through it.
    pub fn slots(&self) -> Vec<Arc<SessionSlot>> {
        self.sessions
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
