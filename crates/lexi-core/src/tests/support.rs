//! Store and service doubles shared by the test modules

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lexi_define::{DefineError, DefineRequest, DefineService};
use lexi_types::{DefineConfig, DefineResult};
use tokio::sync::Notify;

use crate::store::{KeyValueStore, MemoryStore, StoreError};

/// Memory store whose operations can be made to fail on demand
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_get: AtomicBool,
    pub fail_set: AtomicBool,
    pub fail_remove: AtomicBool,
    pub gets: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn check(flag: &AtomicBool, op: &str) -> Result<(), StoreError> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Backend(format!("simulated {op} failure")));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.fail_get, "get")?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        Self::check(&self.fail_set, "set")?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        Self::check(&self.fail_remove, "remove")?;
        self.inner.remove(key).await
    }

    async fn remove_many(&self, keys: &[String]) -> Result<(), StoreError> {
        Self::check(&self.fail_remove, "remove_many")?;
        self.inner.remove_many(keys).await
    }
}

pub fn definition(word: &str) -> DefineResult {
    DefineResult {
        word: word.to_string(),
        result: format!("Definition of {word}."),
        actual_length: 3,
        status: "ok".to_string(),
        config: DefineConfig {
            tone: "neutral".to_string(),
            context: "none".to_string(),
            effective_lang: "en".to_string(),
        },
    }
}

/// Define service answering with a canned definition of the requested word
#[derive(Default)]
pub struct ScriptedService {
    pub calls: AtomicUsize,
    pub requests: Mutex<Vec<DefineRequest>>,
    failure: Option<(u16, Option<String>)>,
    /// When set, the first call waits here before answering
    hold_first: Option<Arc<Notify>>,
}

impl ScriptedService {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(status: u16, message: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            failure: Some((status, message.map(str::to_string))),
            ..Self::default()
        })
    }

    pub fn holding_first(gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            hold_first: Some(gate),
            ..Self::default()
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DefineService for ScriptedService {
    async fn define(&self, request: &DefineRequest) -> Result<DefineResult, DefineError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if call == 0 {
            if let Some(gate) = &self.hold_first {
                gate.notified().await;
            }
        }

        match &self.failure {
            Some((status, message)) => Err(DefineError::Service {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(definition(&request.word)),
        }
    }
}
