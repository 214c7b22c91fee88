/*!
The public façade: [`Untwister`] holds configuration and observations,
and drives the brute-forcer and state inferrer on behalf of a caller.

This is the only type most callers touch directly; [`crate::generator`],
[`crate::bruteforce`] and [`crate::infer`] exist to be driven by it, not
to be used standalone.
*/

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Mutex;
use std::sync::Arc;

use crate::bruteforce::{Bruteforcer, InFlight};
use crate::error::{Error, Result};
use crate::infer::Inferrer;
use crate::registry::Factory;
use crate::types::{InferredState, SeedCandidate};

/// How many consecutive outputs [`Untwister::generate_sample_from_seed`]
/// returns. Matches the reference implementation's hard-coded sample
/// length; see `DESIGN.md` for the associated fixed bug (the original
/// pre-sized its output buffer to this count and then appended that
/// many more, yielding twice as many entries with the first half
/// zeroed — this crate returns exactly the generated values).
const REFERENCE_SAMPLE_LEN: u32 = 10;

const STATE_IDLE: u8 = 0;
const STATE_STARTING: u8 = 1;
const STATE_RUNNING: u8 = 2;
const STATE_COMPLETED: u8 = 3;

/// Session configuration, guarded by a single mutex since it's only
/// ever touched outside of an active run (enforced by the run-state
/// machine, not by this lock).
struct Config {
	prng: String,
	depth: u32,
	min_confidence: f64,
	threads: u32,
	observations: Vec<u32>,
}

/// Holds configuration (chosen PRNG, depth, confidence threshold,
/// thread count, observations) for one seed-recovery session and
/// drives [`crate::bruteforce`] and [`crate::infer`] against it.
///
/// A session is reusable across runs, but only one run — brute-force or
/// inference — may be active at a time; see the run-state machine on
/// [`Untwister::bruteforce`].
pub struct Untwister {
	factory: Factory,
	config: Mutex<Config>,
	run_state: AtomicU8,
	progress: Mutex<Option<Arc<crate::bruteforce::Progress>>>,
}

impl Untwister {
	/// Creates a session targeting the PRNG family registered as `prng`.
	///
	/// `initial_observation_capacity` pre-reserves space in the
	/// observation buffer; it does not add any observations. Fails with
	/// [`Error::UnknownGenerator`] if `prng` isn't registered.
	///
	/// # Examples
	///
	/// ```
	/// let session = untwister::Untwister::new("mt19937", None).unwrap();
	/// assert_eq!(session.prng(), "mt19937");
	/// ```
	pub fn new(prng: &str, initial_observation_capacity: Option<usize>) -> Result<Self> {
		let factory = Factory::new();
		if !factory.is_supported(prng) {
			return Err(Error::UnknownGenerator { name: prng.to_string() });
		}
		Ok(Untwister {
			factory,
			config: Mutex::new(Config {
				prng: prng.to_string(),
				depth: 1000,
				min_confidence: 100.0,
				threads: default_thread_count(),
				observations: Vec::with_capacity(initial_observation_capacity.unwrap_or(0)),
			}),
			run_state: AtomicU8::new(STATE_IDLE),
			progress: Mutex::new(None),
		})
	}

	/// The registered name of every PRNG family a session can select.
	pub fn supported_prngs() -> &'static [&'static str] {
		Factory::new().names()
	}

	/// Whether `name` is a family [`Untwister::new`] will accept.
	pub fn is_supported(name: &str) -> bool {
		Factory::new().is_supported(name)
	}

	/// Appends an observed output to the session.
	///
	/// Observations may only be appended while the session is `idle`;
	/// they're treated as immutable for the duration of a run.
	pub fn add_observation(&self, value: u32) -> Result<()> {
		self.with_idle_config_mut(|config| config.observations.push(value))
	}

	/// The currently selected PRNG family.
	pub fn prng(&self) -> String {
		self.config.lock().unwrap().prng.clone()
	}

	/// Selects a different PRNG family. Fails with
	/// [`Error::UnknownGenerator`] if `name` isn't registered.
	pub fn set_prng(&self, name: &str) -> Result<()> {
		if !self.factory.is_supported(name) {
			return Err(Error::UnknownGenerator { name: name.to_string() });
		}
		self.with_idle_config_mut(|config| config.prng = name.to_string())
	}

	/// Maximum `next()` calls per candidate seed during brute-force.
	pub fn depth(&self) -> u32 {
		self.config.lock().unwrap().depth
	}

	/// Sets the brute-force search depth. Must be at least the number
	/// of observations currently held; validated eagerly.
	pub fn set_depth(&self, depth: u32) -> Result<()> {
		let observation_count = self.config.lock().unwrap().observations.len();
		if (depth as usize) < observation_count {
			return Err(Error::InvalidConfiguration {
				reason: format!("depth {depth} is smaller than the {observation_count} observations already held"),
			});
		}
		self.with_idle_config_mut(|config| config.depth = depth)
	}

	/// Minimum match percentage a candidate must reach to be returned.
	pub fn min_confidence(&self) -> f64 {
		self.config.lock().unwrap().min_confidence
	}

	/// Sets the confidence threshold. Must lie in `[0.0, 100.0]`.
	pub fn set_min_confidence(&self, min_confidence: f64) -> Result<()> {
		if !(0.0..=100.0).contains(&min_confidence) {
			return Err(Error::InvalidConfiguration { reason: format!("min_confidence {min_confidence} is outside [0, 100]") });
		}
		self.with_idle_config_mut(|config| config.min_confidence = min_confidence)
	}

	/// Number of worker threads a brute-force run spawns.
	pub fn threads(&self) -> u32 {
		self.config.lock().unwrap().threads
	}

	/// Sets the worker thread count. Must be nonzero.
	pub fn set_threads(&self, threads: u32) -> Result<()> {
		if threads == 0 {
			return Err(Error::InvalidConfiguration { reason: "threads must be at least 1".to_string() });
		}
		self.with_idle_config_mut(|config| config.threads = threads)
	}

	/// Number of `u32` words the selected PRNG's internal state holds.
	pub fn state_size(&self) -> u32 {
		let prng = self.config.lock().unwrap().prng.clone();
		self.factory.instance(&prng).expect("registered name").state_size()
	}

	/// Whether enough observations are held to attempt
	/// [`Untwister::infer_state`] (strictly more than the generator's
	/// state size).
	pub fn can_infer_state(&self) -> bool {
		let config = self.config.lock().unwrap();
		let state_size = self.factory.instance(&config.prng).expect("registered name").state_size();
		config.observations.len() > state_size as usize
	}

	/// Whether a brute-force run is currently in its `running` phase.
	pub fn is_running(&self) -> bool {
		self.run_state.load(Ordering::Relaxed) == STATE_RUNNING
	}

	/// Whether the most recent run has finished but the session hasn't
	/// yet reset to `idle` (a narrow window visible only to a concurrent
	/// poller racing the call that's about to return).
	pub fn is_completed(&self) -> bool {
		self.run_state.load(Ordering::Relaxed) == STATE_COMPLETED
	}

	/// Per-worker seeds-examined counters for the run in progress.
	///
	/// Fails with [`Error::NotRunning`] if the session is `idle` or
	/// `completed`. Counters are advisory: monotonically non-decreasing,
	/// but not guaranteed exactly current.
	pub fn get_status(&self) -> Result<Vec<u32>> {
		let state = self.run_state.load(Ordering::Relaxed);
		if state != STATE_STARTING && state != STATE_RUNNING {
			return Err(Error::NotRunning);
		}
		let progress = self.progress.lock().unwrap();
		Ok(progress.as_ref().map(|p| p.per_worker()).unwrap_or_default())
	}

	/// Searches the seed interval `[lo, hi)` in parallel across
	/// [`Untwister::threads`] workers, returning every candidate seed
	/// whose match percentage meets [`Untwister::min_confidence`].
	///
	/// Fails with [`Error::InvalidRange`] if `hi <= lo`, with
	/// [`Error::InvalidConfiguration`] if no observations are held, and
	/// with [`Error::AlreadyRunning`] if another run is already
	/// `starting` or `running`. The session returns to `idle` before
	/// this call returns, whether it succeeds or fails after the run
	/// state was claimed.
	pub fn bruteforce(&self, lo: u32, hi: u32) -> Result<Vec<SeedCandidate>> {
		if hi <= lo {
			return Err(Error::InvalidRange { lo, hi });
		}

		self.claim_idle()?;

		let (generator_name, observations, threads, depth, min_confidence) = {
			let config = self.config.lock().unwrap();
			(config.prng.clone(), config.observations.clone(), config.threads, config.depth, config.min_confidence)
		};
		if observations.is_empty() {
			self.run_state.store(STATE_IDLE, Ordering::Relaxed);
			return Err(Error::InvalidConfiguration { reason: "cannot bruteforce with zero observations".to_string() });
		}
		if (depth as usize) < observations.len() {
			self.run_state.store(STATE_IDLE, Ordering::Relaxed);
			return Err(Error::InvalidConfiguration {
				reason: format!("depth {depth} is smaller than the {} observations held", observations.len()),
			});
		}
		log::debug!("bruteforce[{generator_name}] starting: range=[{lo}, {hi}) threads={threads} depth={depth}");

		let cancelled = Arc::new(AtomicBool::new(false));
		let bruteforcer = Bruteforcer::new(generator_name, observations, threads, depth, min_confidence);
		let in_flight: InFlight = bruteforcer.launch(lo, hi, Arc::clone(&cancelled));

		*self.progress.lock().unwrap() = Some(Arc::clone(&in_flight.progress));
		self.run_state.store(STATE_RUNNING, Ordering::Relaxed);

		let results = in_flight.join();

		self.run_state.store(STATE_COMPLETED, Ordering::Relaxed);
		log::debug!("bruteforce completed: {} candidate(s) met the confidence threshold", results.len());
		*self.progress.lock().unwrap() = None;
		self.run_state.store(STATE_IDLE, Ordering::Relaxed);

		Ok(results)
	}

	/// Slides the selected PRNG's state-sized window across the
	/// observations, returning the best-scoring state (and, if a
	/// perfect-match window's state could be reversed, the seed that
	/// produces it).
	///
	/// Fails with [`Error::InsufficientObservations`] if
	/// [`Untwister::can_infer_state`] is `false`.
	pub fn infer_state(&self) -> Result<InferredState> {
		self.claim_idle()?;

		let (generator_name, observations) = {
			let config = self.config.lock().unwrap();
			(config.prng.clone(), config.observations.clone())
		};
		let state_size = self.factory.instance(&generator_name).expect("registered name").state_size();
		if observations.len() <= state_size as usize {
			self.run_state.store(STATE_IDLE, Ordering::Relaxed);
			return Err(Error::InsufficientObservations { have: observations.len(), state_size });
		}

		self.run_state.store(STATE_RUNNING, Ordering::Relaxed);
		log::debug!("infer_state[{generator_name}] starting: {} observations, state_size={state_size}", observations.len());

		let inferrer = Inferrer::new(generator_name);
		let result = inferrer.infer_state(&observations);

		self.run_state.store(STATE_COMPLETED, Ordering::Relaxed);
		log::debug!("infer_state completed: confidence={:.1} seed_recovered={}", result.confidence, result.seed.is_some());
		self.run_state.store(STATE_IDLE, Ordering::Relaxed);

		Ok(result)
	}

	/// Generates [`REFERENCE_SAMPLE_LEN`] outputs from a fresh instance
	/// of the selected PRNG seeded with `seed`, for confirming a
	/// recovered seed actually reproduces what was observed.
	pub fn generate_sample_from_seed(&self, seed: u32) -> Vec<u32> {
		let prng = self.config.lock().unwrap().prng.clone();
		let mut generator = self.factory.instance(&prng).expect("registered name");
		generator.seed(seed);
		(0..REFERENCE_SAMPLE_LEN).map(|_| generator.next()).collect()
	}

	/// Installs the session's observations as the selected PRNG's
	/// internal state and emits [`Untwister::depth`] further outputs.
	///
	/// Fails with [`Error::InvalidConfiguration`] if the observation
	/// count doesn't exactly match the generator's state size.
	pub fn generate_sample_from_state(&self) -> Result<Vec<u32>> {
		let (prng, observations, depth) = {
			let config = self.config.lock().unwrap();
			(config.prng.clone(), config.observations.clone(), config.depth)
		};
		let mut generator = self.factory.instance(&prng).expect("registered name");
		let state_size = generator.state_size() as usize;
		if observations.len() != state_size {
			return Err(Error::InvalidConfiguration {
				reason: format!("generate_sample_from_state needs exactly {state_size} observations, have {}", observations.len()),
			});
		}
		generator.set_state(&observations);
		Ok((0..depth).map(|_| generator.next()).collect())
	}

	/// Atomically claims the `idle -> starting` transition, failing with
	/// [`Error::AlreadyRunning`] if another run already holds it.
	fn claim_idle(&self) -> Result<()> {
		self.run_state
			.compare_exchange(STATE_IDLE, STATE_STARTING, Ordering::Relaxed, Ordering::Relaxed)
			.map(|_| ())
			.map_err(|_| Error::AlreadyRunning)
	}

	/// Runs `f` against the configuration while idle, rejecting the
	/// mutation with [`Error::AlreadyRunning`] otherwise (observations
	/// and configuration are only mutable between runs).
	fn with_idle_config_mut(&self, f: impl FnOnce(&mut Config)) -> Result<()> {
		if self.run_state.load(Ordering::Relaxed) != STATE_IDLE {
			return Err(Error::AlreadyRunning);
		}
		f(&mut self.config.lock().unwrap());
		Ok(())
	}
}

fn default_thread_count() -> u32 {
	std::thread::available_parallelism().map(|n| n.get() as u32).unwrap_or(1)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::generator::Generator;

	fn seeded_session(prng: &str, seed: u32, count: usize) -> Untwister {
		let session = Untwister::new(prng, None).unwrap();
		let mut generator = Factory::new().instance(prng).unwrap();
		generator.seed(seed);
		for _ in 0..count {
			session.add_observation(generator.next()).unwrap();
		}
		session
	}

	#[test]
	fn unknown_prng_is_rejected_at_construction() {
		assert_eq!(Untwister::new("not-a-real-prng", None).unwrap_err(), Error::UnknownGenerator { name: "not-a-real-prng".to_string() });
	}

	#[test]
	fn bruteforce_recovers_a_known_seed() {
		let session = seeded_session("mt19937", 1, 10);
		let found = session.bruteforce(0, 100).unwrap();
		assert_eq!(found, vec![SeedCandidate { seed: 1, confidence: 100.0 }]);
	}

	#[test]
	fn empty_observations_are_rejected() {
		let session = Untwister::new("mt19937", None).unwrap();
		let err = session.bruteforce(0, 10).unwrap_err();
		assert_eq!(err, Error::InvalidConfiguration { reason: "cannot bruteforce with zero observations".to_string() });
	}

	#[test]
	fn invalid_range_is_rejected() {
		let session = seeded_session("mt19937", 1, 10);
		assert_eq!(session.bruteforce(5, 5).unwrap_err(), Error::InvalidRange { lo: 5, hi: 5 });
	}

	#[test]
	fn threads_exceeding_the_range_still_partitions_correctly() {
		let session = seeded_session("mt19937", 1, 10);
		session.set_threads(64).unwrap();
		let found = session.bruteforce(0, 2).unwrap();
		assert_eq!(found, vec![SeedCandidate { seed: 1, confidence: 100.0 }]);
	}

	#[test]
	fn zero_threads_is_rejected() {
		let session = Untwister::new("mt19937", None).unwrap();
		assert_eq!(session.set_threads(0).unwrap_err(), Error::InvalidConfiguration { reason: "threads must be at least 1".to_string() });
	}

	#[test]
	fn out_of_range_confidence_is_rejected() {
		let session = Untwister::new("mt19937", None).unwrap();
		assert!(session.set_min_confidence(-1.0).is_err());
		assert!(session.set_min_confidence(100.1).is_err());
		assert!(session.set_min_confidence(50.0).is_ok());
	}

	#[test]
	fn depth_below_observation_count_is_rejected() {
		let session = seeded_session("mt19937", 1, 10);
		assert!(session.set_depth(5).is_err());
		assert!(session.set_depth(5000).is_ok());
	}

	#[test]
	fn get_status_fails_when_idle_or_completed() {
		let session = Untwister::new("mt19937", None).unwrap();
		assert_eq!(session.get_status().unwrap_err(), Error::NotRunning);
	}

	#[test]
	fn can_infer_state_requires_more_observations_than_state_size() {
		let session = Untwister::new("mt19937", None).unwrap();
		assert!(!session.can_infer_state());
		for _ in 0..625 {
			session.add_observation(0).unwrap();
		}
		assert!(session.can_infer_state());
	}

	#[test]
	fn infer_state_recovers_seed_from_a_clean_run() {
		let session = seeded_session("mt19937", 7, 700);
		let result = session.infer_state().unwrap();
		assert_eq!(result.confidence, 100.0);
		assert_eq!(result.seed, Some(7));
	}

	#[test]
	fn insufficient_observations_are_rejected() {
		let session = seeded_session("mt19937", 7, 10);
		assert_eq!(session.infer_state().unwrap_err(), Error::InsufficientObservations { have: 10, state_size: 624 });
	}

	#[test]
	fn generate_sample_from_seed_returns_exactly_the_reference_length() {
		let session = Untwister::new("mt19937", None).unwrap();
		let sample = session.generate_sample_from_seed(42);
		assert_eq!(sample.len(), REFERENCE_SAMPLE_LEN as usize);
		assert!(sample.iter().any(|&word| word != 0));
	}

	#[test]
	fn round_trip_law_sample_from_seed_feeds_back_into_bruteforce() {
		let seed = 0xDEADBEEFu32;
		let probe = Untwister::new("mt19937", None).unwrap();
		let sample = probe.generate_sample_from_seed(seed);

		let session = Untwister::new("mt19937", None).unwrap();
		for value in sample {
			session.add_observation(value).unwrap();
		}
		let found = session.bruteforce(seed, seed + 1).unwrap();
		assert_eq!(found, vec![SeedCandidate { seed, confidence: 100.0 }]);
	}

	#[test]
	fn generate_sample_from_state_requires_exact_state_size() {
		let session = Untwister::new("mt19937", None).unwrap();
		session.add_observation(1).unwrap();
		assert!(session.generate_sample_from_state().is_err());
	}

	#[test]
	fn already_running_is_rejected_while_idle_config_is_mutated_elsewhere() {
		// Claim the idle->starting transition directly to simulate a
		// concurrent run, then confirm mutation attempts are rejected.
		let session = Untwister::new("mt19937", None).unwrap();
		session.claim_idle().unwrap();
		assert_eq!(session.add_observation(1).unwrap_err(), Error::AlreadyRunning);
		assert_eq!(session.bruteforce(0, 10).unwrap_err(), Error::AlreadyRunning);
	}
}
