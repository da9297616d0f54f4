// libsuica/src/transport/mock.rs

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::transport::traits::Transport;
use crate::{Error, Result};

#[derive(Debug, Default)]
struct MockState {
    sent: Vec<Vec<u8>>,
    responses: VecDeque<Vec<u8>>,
    resets: usize,
}

/// Mock transport for tests. It records sent payloads and returns queued
/// responses in order.
///
/// Clones share one state, so a test can keep a clone for inspection after
/// handing another to the hardware backend.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// No queued responses; every receive times out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock answering with `responses`, in order.
    pub fn with_responses(responses: impl IntoIterator<Item = Vec<u8>>) -> Self {
        let mock = Self::new();
        for resp in responses {
            mock.push_response(resp);
        }
        mock
    }

    /// Queue one more raw response frame.
    pub fn push_response(&self, resp: Vec<u8>) {
        self.lock().responses.push_back(resp);
    }

    /// Everything sent so far, oldest first.
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.lock().sent.clone()
    }

    /// Responses not consumed yet.
    pub fn pending_responses(&self) -> usize {
        self.lock().responses.len()
    }

    /// How many times `reset` was called.
    pub fn reset_count(&self) -> usize {
        self.lock().resets
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for MockTransport {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        self.lock().sent.push(data.to_vec());
        Ok(())
    }

    fn receive(&mut self, _timeout_ms: u64) -> Result<Vec<u8>> {
        self.lock().responses.pop_front().ok_or(Error::Timeout)
    }

    fn reset(&mut self) -> Result<()> {
        // Queued responses survive a reset so tests can seed replies before
        // the session starts.
        self.lock().resets += 1;
        Ok(())
    }
}
