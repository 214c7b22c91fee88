/*!
Parallel brute-force seed search.

Each worker thread owns a contiguous slice of the candidate seed range,
seeds a fresh [`Generator`] per candidate, and checks whether the
observations appear anywhere in the generator's output as a contiguous
*subsequence* — the candidate doesn't have to reproduce the
observations starting at draw zero, since the observer may have missed
however many draws happened before it started watching.
*/

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::registry::Factory;
use crate::types::{divide_labor, SeedCandidate};

/// Tracks how far each worker has progressed through its assigned
/// range, so a caller can poll [`crate::Untwister::get_status`] while a
/// run is in flight.
#[derive(Debug, Default)]
pub(crate) struct Progress {
	per_worker: Vec<AtomicU32>,
}

impl Progress {
	fn new(workers: usize) -> Self {
		Progress { per_worker: (0..workers).map(|_| AtomicU32::new(0)).collect() }
	}

	/// Total seeds examined so far across every worker.
	pub(crate) fn total(&self) -> u64 {
		self.per_worker.iter().map(|counter| counter.load(Ordering::Relaxed) as u64).sum()
	}

	/// Per-worker seeds examined so far, in worker-id order.
	pub(crate) fn per_worker(&self) -> Vec<u32> {
		self.per_worker.iter().map(|counter| counter.load(Ordering::Relaxed)).collect()
	}
}

/// Runs the subsequence match for a single candidate seed, returning
/// how much of `observations` it reproduced, as a fraction in
/// `[0.0, 100.0]`, and stopping early once a full match is confirmed.
///
/// `matched` never resets on a miss: once the generator's output has
/// produced `observations[0..matched]` in order, a draw that doesn't
/// equal `observations[matched]` is just a gap (an observation the
/// watcher missed) rather than a failed attempt, so the candidate is
/// still judged on whether the remaining observations show up
/// somewhere later in its output, not contiguously.
fn score_candidate(generator: &mut dyn crate::generator::Generator, seed: u32, observations: &[u32], depth: u32) -> f64 {
	generator.seed(seed);
	let mut matched = 0usize;
	let target_len = observations.len();
	for _ in 0..depth {
		let word = generator.next();
		if word == observations[matched] {
			matched += 1;
			if matched == target_len {
				break;
			}
		}
	}
	matched as f64 / target_len as f64 * 100.0
}

fn worker_loop(
	generator_name: String,
	observations: Arc<Vec<u32>>,
	lo: u32,
	hi: u32,
	depth: u32,
	min_confidence: f64,
	cancelled: Arc<AtomicBool>,
	progress: Arc<Progress>,
	worker_index: usize,
) -> Vec<SeedCandidate> {
	let factory = Factory::new();
	let mut found = Vec::new();
	for seed in lo..hi {
		if cancelled.load(Ordering::Relaxed) {
			break;
		}
		let mut generator = factory.instance(&generator_name).expect("registered name");
		let confidence = score_candidate(generator.as_mut(), seed, &observations, depth);
		if confidence >= min_confidence {
			found.push(SeedCandidate { seed, confidence });
		}
		progress.per_worker[worker_index].fetch_add(1, Ordering::Relaxed);
		if confidence == 100.0 {
			// A full match: tell every other worker this run is settled.
			// Cooperative only — workers already past their next check
			// finish their current candidate before noticing.
			cancelled.store(true, Ordering::Relaxed);
		}
	}
	found
}

/// A brute-force run that has been launched but not yet joined, so a
/// caller can read [`Progress`] concurrently while the worker threads
/// are still running.
pub(crate) struct InFlight {
	handles: Vec<JoinHandle<Vec<SeedCandidate>>>,
	pub(crate) progress: Arc<Progress>,
}

impl InFlight {
	/// Blocks until every worker has joined (naturally or via
	/// cancellation) and returns the aggregated, seed-ordered results.
	pub(crate) fn join(self) -> Vec<SeedCandidate> {
		let mut results = Vec::new();
		for handle in self.handles {
			let found = handle.join().expect("worker thread panicked");
			results.extend(found);
		}
		results.sort_by(|a, b| a.seed.cmp(&b.seed));
		results
	}
}

/// Drives a parallel brute-force seed search over `[lo, hi)`.
pub(crate) struct Bruteforcer {
	generator_name: String,
	observations: Arc<Vec<u32>>,
	threads: u32,
	depth: u32,
	min_confidence: f64,
}

impl Bruteforcer {
	pub(crate) fn new(generator_name: String, observations: Vec<u32>, threads: u32, depth: u32, min_confidence: f64) -> Self {
		Bruteforcer { generator_name, observations: Arc::new(observations), threads, depth, min_confidence }
	}

	/// Spawns `self.threads` worker threads over `[lo, hi)` and returns
	/// immediately with a handle a caller can both poll for progress and
	/// later join. The `starting -> running` transition in
	/// [`crate::Untwister`] happens once this call returns, since every
	/// worker has been launched and `progress` is already sized for
	/// every one of them.
	pub(crate) fn launch(&self, lo: u32, hi: u32, cancelled: Arc<AtomicBool>) -> InFlight {
		let units = divide_labor(lo, hi, self.threads);
		let progress = Arc::new(Progress::new(units.len()));

		let handles: Vec<_> = units
			.iter()
			.enumerate()
			.map(|(i, unit)| {
				let generator_name = self.generator_name.clone();
				let observations = Arc::clone(&self.observations);
				let depth = self.depth;
				let min_confidence = self.min_confidence;
				let cancelled = Arc::clone(&cancelled);
				let progress = Arc::clone(&progress);
				let unit = *unit;
				thread::spawn(move || worker_loop(generator_name, observations, unit.lo, unit.hi, depth, min_confidence, cancelled, progress, i))
			})
			.collect();

		InFlight { handles, progress }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::generator::{Generator, Mt19937};

	fn samples(seed: u32, n: usize) -> Vec<u32> {
		let mut gen = Mt19937::new();
		gen.seed(seed);
		(0..n).map(|_| gen.next()).collect()
	}

	fn run(searcher: &Bruteforcer, lo: u32, hi: u32) -> Vec<SeedCandidate> {
		let cancelled = Arc::new(AtomicBool::new(false));
		searcher.launch(lo, hi, cancelled).join()
	}

	#[test]
	fn finds_seed_with_full_confidence() {
		let observations = samples(1, 10);
		let searcher = Bruteforcer::new("mt19937".to_string(), observations, 4, 2000, 100.0);
		let found = run(&searcher, 0, 8);
		assert!(found.iter().any(|c| c.seed == 1 && c.confidence == 100.0));
	}

	#[test]
	fn tolerates_dropped_leading_observations() {
		let mut gen = Mt19937::new();
		gen.seed(42);
		let _dropped: Vec<u32> = (0..5).map(|_| gen.next()).collect();
		let observations: Vec<u32> = (0..10).map(|_| gen.next()).collect();

		let searcher = Bruteforcer::new("mt19937".to_string(), observations, 2, 2000, 80.0);
		let found = run(&searcher, 40, 45);
		assert!(found.iter().any(|c| c.seed == 42 && c.confidence == 100.0));
	}

	#[test]
	fn reports_no_match_outside_the_search_range() {
		let observations = samples(9999, 10);
		let searcher = Bruteforcer::new("mt19937".to_string(), observations, 2, 2000, 100.0);
		let found = run(&searcher, 0, 10);
		assert!(found.is_empty());
	}

	#[test]
	fn progress_is_sized_per_worker_as_soon_as_the_run_is_launched() {
		let observations = samples(1, 10);
		let searcher = Bruteforcer::new("mt19937".to_string(), observations, 4, 2000, 100.0);
		let cancelled = Arc::new(AtomicBool::new(false));
		let in_flight = searcher.launch(0, 100, cancelled);
		assert_eq!(in_flight.progress.per_worker().len(), 4);
		in_flight.join();
	}
}
