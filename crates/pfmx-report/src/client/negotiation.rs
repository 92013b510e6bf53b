//! Per-client memory of which endpoint variant answered last.

use std::sync::{Mutex, PoisonError};

use crate::endpoint::EndpointCandidate;

pub(super) struct Negotiated {
    feed: &'static str,
    enabled: bool,
    slot: Mutex<Option<EndpointCandidate>>,
}

impl Negotiated {
    pub(super) fn new(feed: &'static str, enabled: bool) -> Self {
        Self {
            feed,
            enabled,
            slot: Mutex::new(None),
        }
    }

    pub(super) fn current(&self) -> Option<EndpointCandidate> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Moves the remembered candidate, if it is still on offer, to the front.
    pub(super) fn prioritise(&self, mut candidates: Vec<EndpointCandidate>) -> Vec<EndpointCandidate> {
        if !self.enabled {
            return candidates;
        }
        if let Some(known) = self.current() {
            if let Some(pos) = candidates.iter().position(|c| *c == known) {
                let known = candidates.remove(pos);
                candidates.insert(0, known);
            }
        }
        candidates
    }

    pub(super) fn remember(&self, candidate: &EndpointCandidate) {
        if !self.enabled {
            return;
        }
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref() != Some(candidate) {
            tracing::info!(
                feed = self.feed,
                method = candidate.method.as_str(),
                url = %candidate.url,
                encoding = ?candidate.encoding,
                "negotiated upstream endpoint"
            );
            *slot = Some(candidate.clone());
        }
    }

    /// Drops the remembered candidate if it is the one that just failed.
    pub(super) fn forget(&self, candidate: &EndpointCandidate) {
        if !self.enabled {
            return;
        }
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref() == Some(candidate) {
            tracing::debug!(feed = self.feed, url = %candidate.url, "cached endpoint failed, re-probing");
            *slot = None;
        }
    }
}
