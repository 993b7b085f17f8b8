use rayon::prelude::*;

use crate::{
    eval::evaluator::{Evaluator, PageFrame},
    eval::fingerprint::{FrameFingerprint, fingerprint_frame},
    foundation::error::{StageError, StageResult},
    scene::model::Page,
};

#[derive(Clone, Debug, Default)]
pub struct SampleThreading {
    pub parallel: bool,
    pub threads: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SampledFrame {
    pub fingerprint: FrameFingerprint,
    pub frame: PageFrame,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct SampleStats {
    pub frames_total: u64,
    /// Frames that paint exactly like the frame before them.
    pub frames_static: u64,
    /// Distinct fingerprints across the run.
    pub frames_unique: u64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SampleReport {
    pub frames: Vec<SampledFrame>,
    pub stats: SampleStats,
}

/// Evaluate `page` at each scroll position, in order.
pub fn sample_frames(
    page: &Page,
    positions: &[f64],
    threading: &SampleThreading,
) -> StageResult<SampleReport> {
    let evaluator = Evaluator::new(page.clone())?;
    sample_with(&evaluator, positions, threading)
}

#[tracing::instrument(skip(evaluator, positions), fields(positions = positions.len()))]
pub fn sample_with(
    evaluator: &Evaluator,
    positions: &[f64],
    threading: &SampleThreading,
) -> StageResult<SampleReport> {
    if positions.is_empty() {
        return Err(StageError::evaluation("sample positions must be non-empty"));
    }
    if let Some(bad) = positions.iter().find(|y| !y.is_finite()) {
        return Err(StageError::evaluation(format!(
            "sample position {bad} is not finite"
        )));
    }

    let sample_one = |y: &f64| -> StageResult<SampledFrame> {
        let frame = evaluator.eval_page(*y)?;
        Ok(SampledFrame {
            fingerprint: fingerprint_frame(&frame),
            frame,
        })
    };

    let frames = if threading.parallel {
        let pool = build_thread_pool(threading.threads)?;
        pool.install(|| {
            positions
                .par_iter()
                .map(sample_one)
                .collect::<StageResult<Vec<_>>>()
        })?
    } else {
        positions
            .iter()
            .map(sample_one)
            .collect::<StageResult<Vec<_>>>()?
    };

    let stats = stats_for(&frames);
    tracing::debug!(?stats, "sampled frames");
    Ok(SampleReport { frames, stats })
}

fn stats_for(frames: &[SampledFrame]) -> SampleStats {
    let frames_static = frames
        .windows(2)
        .filter(|pair| pair[0].fingerprint == pair[1].fingerprint)
        .count();
    let unique = frames
        .iter()
        .map(|f| f.fingerprint)
        .collect::<std::collections::HashSet<_>>()
        .len();
    SampleStats {
        frames_total: frames.len() as u64,
        frames_static: frames_static as u64,
        frames_unique: unique as u64,
    }
}

/// `steps + 1` evenly spaced positions from the top of the page to its last scroll offset.
pub fn even_positions(page: &Page, steps: usize) -> Vec<f64> {
    let max = page.max_scroll(page.viewport);
    if steps == 0 {
        return vec![0.0];
    }
    (0..=steps)
        .map(|i| max * i as f64 / steps as f64)
        .collect()
}

fn build_thread_pool(threads: Option<usize>) -> StageResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(StageError::config(
            "sample threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| StageError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
