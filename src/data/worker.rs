//! Enemy generation workers
//!
//! Generation is asynchronous from the engine's point of view: it submits a
//! request tagged with a token and polls for responses on later updates.
//! The engine owns the tokens and decides whether a response is still
//! wanted; workers just answer.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;

use super::loader::Language;
use super::provider::{fallback_enemy, generate_or_fallback, EnemyContent, EnemyProvider, ProviderError};

/// A request for one enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRequest {
    pub token: u64,
    pub level: u32,
    pub language: Language,
}

/// A finished request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResponse {
    pub token: u64,
    pub content: EnemyContent,
}

/// Something that turns requests into responses, eventually
pub trait Generator {
    fn submit(&mut self, request: GenerationRequest);
    /// Next finished response, if any
    fn poll(&mut self) -> Option<GenerationResponse>;
}

// ============================================================================
// Threaded
// ============================================================================

/// Runs every request on its own short-lived thread. The provider is shared
/// behind a mutex, so requests are served one at a time.
pub struct ThreadedGenerator {
    provider: Arc<Mutex<Box<dyn EnemyProvider>>>,
    tx: Sender<GenerationResponse>,
    rx: Receiver<GenerationResponse>,
}

impl ThreadedGenerator {
    pub fn new(provider: Box<dyn EnemyProvider>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { provider: Arc::new(Mutex::new(provider)), tx, rx }
    }
}

impl Generator for ThreadedGenerator {
    fn submit(&mut self, request: GenerationRequest) {
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("enemy-gen-{}", request.token))
            .spawn(move || {
                let content = {
                    let mut provider = provider.lock();
                    generate_or_fallback(provider.as_mut(), request.level, request.language)
                };
                // The engine may have gone away; nothing to do then
                let _ = tx.send(GenerationResponse { token: request.token, content });
            });
        if let Err(e) = spawned {
            log::warn!("Failed to spawn generation thread: {}. Using fallback.", e);
            let content = fallback_enemy(request.level, request.language);
            let _ = self.tx.send(GenerationResponse { token: request.token, content });
        }
    }

    fn poll(&mut self) -> Option<GenerationResponse> {
        match self.rx.try_recv() {
            Ok(response) => Some(response),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::warn!("{}", ProviderError::Disconnected);
                None
            }
        }
    }
}

// ============================================================================
// Inline
// ============================================================================

/// Answers each request during `submit`; the response is handed out on the
/// next `poll`. Deterministic, used by tests and benchmarks.
pub struct InlineGenerator {
    provider: Box<dyn EnemyProvider>,
    ready: VecDeque<GenerationResponse>,
}

impl InlineGenerator {
    pub fn new(provider: Box<dyn EnemyProvider>) -> Self {
        Self { provider, ready: VecDeque::new() }
    }
}

impl Generator for InlineGenerator {
    fn submit(&mut self, request: GenerationRequest) {
        let content = generate_or_fallback(self.provider.as_mut(), request.level, request.language);
        self.ready.push_back(GenerationResponse { token: request.token, content });
    }

    fn poll(&mut self) -> Option<GenerationResponse> {
        self.ready.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::{fallback_enemy, FallbackProvider};
    use std::time::{Duration, Instant};

    #[test]
    fn test_inline_round_trip() {
        let mut gen = InlineGenerator::new(Box::new(FallbackProvider));
        assert!(gen.poll().is_none());
        gen.submit(GenerationRequest { token: 7, level: 2, language: Language::En });
        let response = gen.poll().unwrap();
        assert_eq!(response.token, 7);
        assert_eq!(response.content, fallback_enemy(2, Language::En));
        assert!(gen.poll().is_none());
    }

    #[test]
    fn test_threaded_delivers() {
        let mut gen = ThreadedGenerator::new(Box::new(FallbackProvider));
        gen.submit(GenerationRequest { token: 1, level: 4, language: Language::Zh });
        gen.submit(GenerationRequest { token: 2, level: 5, language: Language::Zh });

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut tokens = Vec::new();
        while tokens.len() < 2 && Instant::now() < deadline {
            match gen.poll() {
                Some(r) => tokens.push(r.token),
                None => thread::sleep(Duration::from_millis(5)),
            }
        }
        tokens.sort_unstable();
        assert_eq!(tokens, vec![1, 2]);
    }
}
