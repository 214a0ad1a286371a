//! Parallel scan of a read pool against the skim index.
//!
//! A fixed set of worker threads is spawned once per scan session. Work
//! travels as contiguous read-index ranges over a shared channel; each
//! worker owns reusable scratch buffers and sends its finished batch back
//! over a completion channel. The master writes every read's result slot
//! exactly once, so an N-thread scan is bit-identical to a single-threaded
//! one. Closing the work channel is the only shutdown signal, and it is
//! sent only after every batch completed; a worker never abandons a batch
//! mid-flight.

use std::sync::mpsc::{channel, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::{Context, Result};
use log::debug;

use super::hasher::{HashRecord, HashTransformer};
use super::index::SkimIndex;
use super::matcher::{find_adaptor_right_clip, AdaptorHit, HitGroup, SkimMatch};
use crate::error::SkimError;
use crate::params::SkimParams;
use crate::readpool::ReadPool;

/// Default number of reads handed to a worker per batch.
pub const DEFAULT_BATCH_SIZE: usize = 1024;

/// Drives adaptor scans of whole read pools, single- or multi-threaded.
pub struct SkimScanner<'a> {
    index: &'a SkimIndex,
    pool: &'a ReadPool,
    params: &'a SkimParams,
}

/// Per-worker scratch, reused across every read and batch the worker sees.
#[derive(Default)]
struct ScanScratch {
    hashes: Vec<HashRecord>,
    matches: Vec<SkimMatch>,
    groups: Vec<HitGroup>,
}

impl<'a> SkimScanner<'a> {
    pub fn new(index: &'a SkimIndex, pool: &'a ReadPool, params: &'a SkimParams) -> Self {
        Self {
            index,
            pool,
            params,
        }
    }

    /// Scan every read for adaptor hits. `num_threads == 0` means one
    /// thread per CPU. Results are indexed by read id.
    pub fn find_adaptor_clips(
        &self,
        num_threads: usize,
        batch_size: usize,
    ) -> Result<Vec<Option<AdaptorHit>>> {
        if batch_size == 0 {
            return Err(SkimError::Internal("batch size must be nonzero".into()).into());
        }
        let threads = if num_threads == 0 {
            num_cpus::get()
        } else {
            num_threads
        };
        let total = self.pool.size();
        let transformer = HashTransformer::new(self.params)?;
        if threads <= 1 || total <= batch_size {
            let mut scratch = ScanScratch::default();
            let mut results = Vec::with_capacity(total);
            for rid in 0..total as u32 {
                results.push(self.scan_one(rid, &transformer, &mut scratch)?);
            }
            return Ok(results);
        }

        let batches: Vec<(usize, usize)> = (0..total)
            .step_by(batch_size)
            .map(|from| (from, (from + batch_size).min(total)))
            .collect();
        debug!(
            "skim scan: {} reads in {} batches on {} threads",
            total,
            batches.len(),
            threads
        );

        let mut results: Vec<Option<AdaptorHit>> = vec![None; total];

        type BatchResult = (usize, std::result::Result<Vec<Option<AdaptorHit>>, SkimError>);

        let (work_tx, work_rx) = channel::<(usize, usize)>();
        let work_rx = Arc::new(Mutex::new(work_rx));
        let (done_tx, done_rx) = channel::<BatchResult>();

        thread::scope(|scope| -> Result<()> {
            for _ in 0..threads {
                let work_rx = Arc::clone(&work_rx);
                let done_tx = done_tx.clone();
                let transformer = &transformer;
                scope.spawn(move || {
                    let mut scratch = ScanScratch::default();
                    loop {
                        // Block until a batch arrives or the channel closes.
                        let job = next_job(&work_rx);
                        let Some((from, to)) = job else {
                            break;
                        };
                        let scan_batch = |scratch: &mut ScanScratch| {
                            let mut batch = Vec::with_capacity(to - from);
                            for rid in from..to {
                                batch.push(self.scan_one(rid as u32, transformer, scratch)?);
                            }
                            Ok(batch)
                        };
                        if done_tx.send((from, scan_batch(&mut scratch))).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(done_tx);

            for &b in &batches {
                work_tx
                    .send(b)
                    .context("skim scan: worker pool rejected batch")?;
            }
            // Channel closed: the only shutdown signal the workers get.
            drop(work_tx);

            for _ in 0..batches.len() {
                let (from, batch) = done_rx
                    .recv()
                    .context("skim scan: worker pool hung up before completion")?;
                let batch = batch?;
                if from + batch.len() > results.len() {
                    return Err(SkimError::ThreadRange {
                        got: from + batch.len(),
                        size: results.len(),
                    }
                    .into());
                }
                for (offset, r) in batch.into_iter().enumerate() {
                    results[from + offset] = r;
                }
            }
            Ok(())
        })?;

        Ok(results)
    }

    fn scan_one(
        &self,
        rid: u32,
        transformer: &HashTransformer,
        scratch: &mut ScanScratch,
    ) -> std::result::Result<Option<AdaptorHit>, SkimError> {
        find_adaptor_right_clip(
            self.index,
            transformer,
            self.pool,
            rid,
            self.params,
            &mut scratch.hashes,
            &mut scratch.matches,
            &mut scratch.groups,
        )
    }
}

fn next_job(work_rx: &Arc<Mutex<Receiver<(usize, usize)>>>) -> Option<(usize, usize)> {
    let guard = match work_rx.lock() {
        Ok(g) => g,
        Err(_) => return None,
    };
    guard.recv().ok()
}
