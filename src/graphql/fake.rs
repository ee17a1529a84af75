use super::{Transport, TransportError, Variables};
use async_trait::async_trait;
use serde_json::Value;
use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

type Handler = Box<dyn Fn(&Variables) -> Result<Value, TransportError> + Send + Sync>;

pub struct FakeTransport {
    handler: Handler,
    delay: Option<Duration>,
    calls: Mutex<Vec<Variables>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeTransport {
    pub fn new(
        handler: impl Fn(&Variables) -> Result<Value, TransportError> + Send + Sync + 'static,
    ) -> Self {
        FakeTransport {
            handler: Box::new(handler),
            delay: None,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub fn pages(pages: Vec<Result<Value, TransportError>>) -> Self {
        let pages = Mutex::new(VecDeque::from(pages));

        FakeTransport::new(move |_| {
            pages
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Malformed("no more pages".to_owned())))
        })
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Variables> {
        self.calls.lock().unwrap().clone()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn execute(&self, _query: &str, variables: &Variables) -> Result<Value, TransportError> {
        self.calls.lock().unwrap().push(variables.clone());

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        (self.handler)(variables)
    }
}
