/*!
Sliding-window internal-state inference.

Unlike [`crate::bruteforce`], this doesn't search seed space at all: it
slides a `state_size`-wide window across the observed outputs, installs
each window as a candidate internal state, and scores it by how well
the generator then predicts the observations on either side of the
window. The window with the highest score wins; a perfect score
additionally triggers an attempt at recovering the seed that produced
it.
*/

use crate::generator::Generator;
use crate::registry::Factory;
use crate::types::InferredState;

/// How many candidate seeds [`Generator::reverse_to_seed`] is allowed
/// to try once a window predicts every surrounding observation
/// exactly, mirroring the brute-force retry budget used elsewhere.
const SEED_REVERSAL_BUDGET: u32 = 10_000;

/// Counts how many of `predictions` appear, in order, among the
/// observations starting at `observations[start]` and moving by
/// `step` (`1` for forward, `-1` for backward).
///
/// As in [`crate::bruteforce`]'s subsequence match, a miss doesn't
/// reset anything: `predictions` is walked once regardless of how
/// many of its entries actually land, so a handful of observations the
/// watcher dropped don't disqualify an otherwise-correct state.
fn count_matches_along(observations: &[u32], start: i64, step: i64, predictions: &[u32]) -> u32 {
	let mut matched = 0u32;
	let mut obs_index = start;
	for &predicted in predictions {
		if obs_index < 0 || obs_index as usize >= observations.len() {
			break;
		}
		if observations[obs_index as usize] == predicted {
			matched += 1;
			obs_index += step;
		}
	}
	matched
}

/// Drives sliding-window state inference for a single registered PRNG
/// family.
pub(crate) struct Inferrer {
	generator_name: String,
}

impl Inferrer {
	pub(crate) fn new(generator_name: String) -> Self {
		Inferrer { generator_name }
	}

	/// Slides a `state_size`-wide window across `observations`,
	/// returning the best-scoring state, its confidence in
	/// `[0.0, 100.0]`, and the seed that produces it if a perfect
	/// match allowed [`Generator::reverse_to_seed`] to succeed.
	///
	/// Callers are expected to have already checked
	/// `observations.len() > state_size`; this only iterates offsets
	/// that leave at least one observation on either side of the
	/// window to score against.
	pub(crate) fn infer_state(&self, observations: &[u32]) -> InferredState {
		let factory = Factory::new();
		let probe = factory.instance(&self.generator_name).expect("registered name");
		let state_size = probe.state_size() as usize;
		let total_outside = observations.len() - state_size;

		let mut best_state = Vec::new();
		let mut best_score = 0.0f64;
		let mut best_seed = None;

		for offset in 0..total_outside {
			let window = &observations[offset..offset + state_size];
			let mut generator = factory.instance(&self.generator_name).expect("registered name");
			generator.set_state(window);
			generator.set_evidence(observations);
			let forward_evidence = &observations[..offset];
			let backward_evidence = &observations[offset + state_size..];
			generator.tune(forward_evidence, backward_evidence);

			let forward_len = total_outside - offset;
			let predictions_forward = generator.predict_forward(forward_len as u32);
			let predictions_backward = generator.predict_backward(offset as u32);

			let forward_matches = count_matches_along(observations, (offset + state_size) as i64, 1, &predictions_forward);
			let backward_matches = count_matches_along(observations, offset as i64 - 1, -1, &predictions_backward);
			let matched = forward_matches + backward_matches;

			let score = matched as f64 * 100.0 / total_outside as f64;

			// Only reverse when this offset is about to become the
			// recorded best, so a later perfect-match offset can't
			// clobber the seed attached to an earlier tied winner (ties
			// go to the lowest offset, per the tie-break rule).
			if score > best_score {
				best_score = score;
				best_state = generator.get_state();
				best_seed = if matched as usize == total_outside {
					generator.reverse_to_seed(SEED_REVERSAL_BUDGET)
				} else {
					None
				};
			}
		}

		InferredState { state: best_state, confidence: best_score, seed: best_seed }
	}
}
