//! Parallel nonce search (multi-threaded CPU).

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::difficulty::meets_target;
use crate::{ForgeProof, Miner, WorkError};

/// Sentinel meaning "no nonce found yet".
const NOT_FOUND: u64 = u64::MAX;

/// Searches the nonce space on every rayon thread.
///
/// Thread `i` tries nonces `i, i + n, i + 2n, …` for `n` threads. The first
/// thread to hit the target wins, so the returned nonce is valid but not
/// necessarily the lowest valid nonce.
pub struct WorkGenerator {
    miner: Miner,
    cancel: Arc<AtomicBool>,
}

impl WorkGenerator {
    pub fn new(miner: Miner) -> Self {
        Self {
            miner,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share an externally owned cancel flag.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Handle that stops an in-flight [`generate`](Self::generate) when set.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn miner(&self) -> &Miner {
        &self.miner
    }

    /// Find a nonce whose hash value is below `target`.
    pub fn generate(&self, data: &[u8], target: u64) -> Result<ForgeProof, WorkError> {
        if target == 0 {
            return Err(WorkError::UnreachableTarget);
        }

        let found = AtomicU64::new(NOT_FOUND);
        let num_threads = rayon::current_num_threads().max(1);
        let stride = num_threads as u64;
        debug!(threads = num_threads, target, "starting parallel nonce search");

        (0..num_threads).into_par_iter().for_each(|thread_id| {
            let mut input = Vec::with_capacity(data.len() + 8);
            input.extend_from_slice(data);
            input.extend_from_slice(&[0u8; 8]);

            let mut nonce = thread_id as u64;
            loop {
                if found.load(Ordering::Relaxed) != NOT_FOUND
                    || self.cancel.load(Ordering::Relaxed)
                {
                    return;
                }

                let hash = self.miner.hash_input(&mut input, nonce);
                if meets_target(&hash, target) {
                    let _ = found.compare_exchange(
                        NOT_FOUND,
                        nonce,
                        Ordering::AcqRel,
                        Ordering::Relaxed,
                    );
                    return;
                }

                nonce = match nonce.checked_add(stride) {
                    Some(next) if next != NOT_FOUND => next,
                    _ => return,
                };
            }
        });

        let nonce = found.load(Ordering::Acquire);
        if nonce == NOT_FOUND {
            return Err(WorkError::Cancelled);
        }

        let hash = self.miner.hash_nonce(data, nonce);
        info!(nonce, %hash, "forge proof found");
        Ok(ForgeProof {
            nonce,
            hash,
            difficulty_target: target,
        })
    }
}
