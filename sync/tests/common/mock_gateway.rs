//! Mock implementation of [`tbot_core::ChatGateway`] for integration tests.
//!
//! Records every call so tests can assert on rendered notices and lock
//! transitions without hitting Discord. Lock state is kept per thread and
//! updated by `set_locked`, so the `!locked` reconciliation guard is
//! observable. Fetch and create failures can be toggled to simulate a
//! missing guild/thread or a platform outage.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tbot_core::{ChatGateway, Result, TbotError, ThreadNotice, ThreadRef, ThreadState};

/// One recorded gateway call.
#[derive(Debug, Clone)]
#[allow(dead_code)] // fields kept for assertions across test binaries
pub enum GatewayCall {
    CreateThread {
        channel_id: i64,
        name: String,
    },
    DeleteThread {
        thread_id: i64,
    },
    AddMember {
        thread_id: i64,
        user_id: i64,
    },
    Notice {
        thread_id: i64,
        notice: ThreadNotice,
    },
    SetLocked {
        thread_id: i64,
        locked: bool,
        reason: String,
    },
    DisableClose {
        thread_id: i64,
        message_id: i64,
        ticket_id: String,
    },
}

pub struct MockGateway {
    calls: Mutex<Vec<GatewayCall>>,
    locked: Mutex<HashMap<i64, bool>>,
    next_thread_id: AtomicI64,
    fail_fetch: AtomicBool,
    fail_create: AtomicBool,
}

#[allow(dead_code)]
impl MockGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            locked: Mutex::new(HashMap::new()),
            next_thread_id: AtomicI64::new(1000),
            fail_fetch: AtomicBool::new(false),
            fail_create: AtomicBool::new(false),
        })
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    /// All rendered notices, in order.
    pub fn notices(&self) -> Vec<ThreadNotice> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::Notice { notice, .. } => Some(notice),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn set_thread_locked(&self, thread_id: i64, locked: bool) {
        self.locked.lock().unwrap().insert(thread_id, locked);
    }

    pub fn thread_locked(&self, thread_id: i64) -> bool {
        self.locked
            .lock()
            .unwrap()
            .get(&thread_id)
            .copied()
            .unwrap_or(false)
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ChatGateway for MockGateway {
    async fn create_private_thread(
        &self,
        server_id: i64,
        channel_id: i64,
        name: &str,
    ) -> Result<ThreadRef> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(TbotError::Gateway("thread creation failed".to_string()));
        }
        let thread_id = self.next_thread_id.fetch_add(1, Ordering::SeqCst);
        self.record(GatewayCall::CreateThread {
            channel_id,
            name: name.to_string(),
        });
        Ok(ThreadRef {
            server_id,
            thread_id,
        })
    }

    async fn delete_thread(&self, thread: &ThreadRef) -> Result<()> {
        self.record(GatewayCall::DeleteThread {
            thread_id: thread.thread_id,
        });
        Ok(())
    }

    async fn add_thread_member(&self, thread: &ThreadRef, user_id: i64) -> Result<()> {
        self.record(GatewayCall::AddMember {
            thread_id: thread.thread_id,
            user_id,
        });
        Ok(())
    }

    async fn fetch_thread(&self, server_id: i64, thread_id: i64) -> Result<ThreadState> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(TbotError::ThreadNotFound {
                server_id,
                thread_id,
            });
        }
        Ok(ThreadState {
            thread: ThreadRef {
                server_id,
                thread_id,
            },
            locked: self.thread_locked(thread_id),
        })
    }

    async fn send_notice(&self, thread: &ThreadRef, notice: &ThreadNotice) -> Result<()> {
        self.record(GatewayCall::Notice {
            thread_id: thread.thread_id,
            notice: notice.clone(),
        });
        Ok(())
    }

    async fn set_locked(&self, thread: &ThreadRef, locked: bool, reason: &str) -> Result<()> {
        self.set_thread_locked(thread.thread_id, locked);
        self.record(GatewayCall::SetLocked {
            thread_id: thread.thread_id,
            locked,
            reason: reason.to_string(),
        });
        Ok(())
    }

    async fn disable_close_control(
        &self,
        thread: &ThreadRef,
        message_id: i64,
        ticket_id: &str,
    ) -> Result<()> {
        self.record(GatewayCall::DisableClose {
            thread_id: thread.thread_id,
            message_id,
            ticket_id: ticket_id.to_string(),
        });
        Ok(())
    }
}
