use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kanal::{AsyncReceiver, AsyncSender};
use lexi_config::Config;
use lexi_core::{MemoryStore, Repository};
use lexi_define::{DefineError, DefineRequest, DefineService};
use lexi_types::{AppEvent, DefineConfig, DefineResult};
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::events::run_backend;
use crate::state::Backend;

/// Answers every request with a short definition of the requested word
#[derive(Default)]
pub struct EchoService {
    pub calls: AtomicUsize,
}

impl EchoService {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DefineService for EchoService {
    async fn define(&self, request: &DefineRequest) -> Result<DefineResult, DefineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(DefineResult {
            word: request.word.clone(),
            result: format!("{} means something.", request.word),
            actual_length: 3,
            status: "ok".to_string(),
            config: DefineConfig {
                tone: "neutral".to_string(),
                context: "none".to_string(),
                effective_lang: "en".to_string(),
            },
        })
    }
}

/// A backend loop running on an in-memory store
pub struct Harness {
    pub to_app: AsyncSender<AppEvent>,
    pub from_app: AsyncReceiver<AppEvent>,
    pub service: Arc<EchoService>,
    pub repository: Arc<Repository>,
    pub task: JoinHandle<anyhow::Result<()>>,
}

impl Harness {
    pub async fn start() -> Self {
        let service = Arc::new(EchoService::default());
        let backend = Backend::with_parts(
            Arc::new(MemoryStore::new()),
            service.clone(),
            &Config::default(),
        )
        .await;
        let repository = backend.repository().clone();

        let (to_app, app_rx) = kanal::bounded_async(64);
        let (app_tx, from_app) = kanal::bounded_async(256);
        let task = tokio::spawn(run_backend(backend, app_rx, app_tx));

        let harness = Self {
            to_app,
            from_app,
            service,
            repository,
            task,
        };
        harness
            .expect(|e| matches!(e, AppEvent::BackendReady))
            .await;
        harness
    }

    pub async fn send(&self, event: AppEvent) {
        self.to_app.send(event).await.unwrap();
    }

    /// Skip events until one matches, failing after a short wait
    pub async fn expect(&self, predicate: impl Fn(&AppEvent) -> bool) -> AppEvent {
        loop {
            let event = timeout(Duration::from_secs(2), self.from_app.recv())
                .await
                .expect("timed out waiting for app event")
                .expect("app channel closed");
            if predicate(&event) {
                return event;
            }
        }
    }
}
