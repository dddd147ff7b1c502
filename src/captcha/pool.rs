//! Pre-generation pool.
//!
//! Keeps a bounded queue of ready challenges filled by a background worker so
//! callers rarely pay the generation cost on the request path.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;

use tracing::debug;

use super::generator::SliderCaptchaGenerator;
use super::result::SliderChallenge;

pub struct ChallengePool {
    generator: Arc<SliderCaptchaGenerator>,
    queue: Arc<Mutex<VecDeque<SliderChallenge>>>,
    condvar: Arc<Condvar>,
    capacity: usize,
}

fn lock(queue: &Mutex<VecDeque<SliderChallenge>>) -> MutexGuard<'_, VecDeque<SliderChallenge>> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ChallengePool {
    /// Creates an empty pool holding at most `capacity` ready challenges.
    #[must_use]
    pub fn new(generator: SliderCaptchaGenerator, capacity: usize) -> Self {
        Self {
            generator: Arc::new(generator),
            queue: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            condvar: Arc::new(Condvar::new()),
            capacity,
        }
    }

    /// Starts the background worker that refills the queue.
    ///
    /// The worker sleeps while the queue is full and wakes whenever a
    /// challenge is taken.
    pub fn start_worker(&self) {
        let generator = self.generator.clone();
        let queue = self.queue.clone();
        let condvar = self.condvar.clone();
        let capacity = self.capacity;

        thread::spawn(move || {
            loop {
                let mut ready = lock(&queue);
                while ready.len() >= capacity {
                    ready = condvar.wait(ready).unwrap_or_else(PoisonError::into_inner);
                }
                drop(ready);

                let challenge = generator.generate();
                let mut ready = lock(&queue);
                ready.push_back(challenge);
                debug!(ready = ready.len(), "Pooled slider challenge");
            }
        });
    }

    /// Takes a ready challenge, generating one on demand if the queue is empty.
    #[must_use]
    pub fn take(&self) -> SliderChallenge {
        let mut ready = lock(&self.queue);
        if let Some(challenge) = ready.pop_front() {
            self.condvar.notify_one();
            return challenge;
        }
        drop(ready);

        self.generator.generate()
    }

    /// Number of challenges currently ready.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.queue).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
