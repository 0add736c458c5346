//! Shared test scheduler.
//!
//! `MockScheduler` hands out scripted replies and records every call so tests
//! can assert on exactly what reached the scheduler.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use drill_core::Card;
use word_drill_client::{GuardTiming, Scheduler, SchedulerError, StudySession};

/// One scripted answer to `fetch_next_card`.
#[derive(Debug, Clone)]
pub enum Reply {
    Card(Card),
    Empty,
    Error,
}

#[derive(Default)]
pub struct MockScheduler {
    replies: Mutex<VecDeque<Reply>>,
    /// Returned once the script runs out; `None` means an empty queue.
    fallback: Mutex<Option<Card>>,
    submits: Mutex<Vec<(String, bool)>>,
    deletes: Mutex<Vec<String>>,
    fetches: AtomicUsize,
    fail_submit: AtomicBool,
    fail_delete: AtomicBool,
    latency: Mutex<Duration>,
    fetch_latency: Mutex<Duration>,
}

impl MockScheduler {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        let scheduler = Self::default();
        *scheduler.replies.lock().unwrap() = replies.into();
        Arc::new(scheduler)
    }

    /// Keep returning `card` after the script is exhausted.
    pub fn repeat(&self, card: Card) {
        *self.fallback.lock().unwrap() = Some(card);
    }

    pub fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = latency;
    }

    pub fn set_fetch_latency(&self, latency: Duration) {
        *self.fetch_latency.lock().unwrap() = latency;
    }

    pub fn fail_submits(&self) {
        self.fail_submit.store(true, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self) {
        self.fail_delete.store(true, Ordering::SeqCst);
    }

    pub fn submits(&self) -> Vec<(String, bool)> {
        self.submits.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn latency(&self) -> Duration {
        *self.latency.lock().unwrap()
    }
}

#[async_trait]
impl Scheduler for MockScheduler {
    async fn fetch_next_card(&self) -> Result<Option<Card>, SchedulerError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let reply = self.replies.lock().unwrap().pop_front();
        let fetch_latency = *self.fetch_latency.lock().unwrap();
        tokio::time::sleep(fetch_latency).await;
        match reply {
            Some(Reply::Card(card)) => Ok(Some(card)),
            Some(Reply::Empty) => Ok(None),
            Some(Reply::Error) => Err(SchedulerError::Network("connection refused".to_string())),
            None => Ok(self.fallback.lock().unwrap().clone()),
        }
    }

    async fn submit_verdict(&self, card_id: &str, correct: bool) -> Result<(), SchedulerError> {
        self.submits.lock().unwrap().push((card_id.to_string(), correct));
        tokio::time::sleep(self.latency()).await;
        if self.fail_submit.load(Ordering::SeqCst) {
            return Err(SchedulerError::Backend {
                status: 500,
                message: "boom".to_string(),
            });
        }
        Ok(())
    }

    async fn delete_card(&self, card_id: &str) -> Result<(), SchedulerError> {
        self.deletes.lock().unwrap().push(card_id.to_string());
        tokio::time::sleep(self.latency()).await;
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(SchedulerError::Network("connection reset".to_string()));
        }
        Ok(())
    }
}

pub fn card(id: &str, word: &str) -> Card {
    Card {
        translation: Some(format!("{word} (translation)")),
        definition: Some(format!("definition of {word}")),
        ..Card::new(id, word)
    }
}

/// A session whose first card is already loaded.
pub async fn session_with(scheduler: &Arc<MockScheduler>) -> StudySession<MockScheduler> {
    let session = StudySession::new(scheduler.clone(), GuardTiming::default());
    session.load_next_card().await;
    session
}
