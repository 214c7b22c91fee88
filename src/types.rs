/*!
Plain data returned from the bruteforce and state-inference searches.
*/

/// A candidate seed found by [`crate::bruteforce`], together with how
/// much of the observation sequence it actually reproduced.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeedCandidate {
	/// The candidate seed value.
	pub seed: u32,
	/// Fraction of the observation sequence this seed reproduced as a
	/// contiguous subsequence, in `[0.0, 100.0]`.
	pub confidence: f64,
}

/// The result of sliding-window state inference: the best internal
/// state found across every window offset, how well it predicted the
/// surrounding observations, and the seed that produced it, if
/// reversal was possible.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InferredState {
	/// The recovered internal state words.
	pub state: Vec<u32>,
	/// Fraction of the forward and backward evidence this state
	/// predicted correctly, in `[0.0, 100.0]`.
	pub confidence: f64,
	/// The seed that produces this state, if [`Generator::reverse_to_seed`](crate::generator::Generator::reverse_to_seed)
	/// succeeded for it.
	pub seed: Option<u32>,
}

/// One worker's share of a seed range, assigned by [`divide_labor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WorkUnit {
	/// First seed in this worker's range, inclusive.
	pub lo: u32,
	/// Last seed in this worker's range, exclusive.
	pub hi: u32,
}

/// Splits the seed range `[lo, hi)` into `threads` contiguous, roughly
/// equal chunks, in increasing order. The first `leftover` chunks get
/// one extra seed so every seed in the range is covered exactly once.
pub(crate) fn divide_labor(lo: u32, hi: u32, threads: u32) -> Vec<WorkUnit> {
	let total = (hi - lo) as u64;
	let threads = threads as u64;
	let work = total / threads;
	let leftover = total % threads;

	let mut units = Vec::with_capacity(threads as usize);
	let mut cursor = lo as u64;
	for i in 0..threads {
		let size = if i < leftover { work + 1 } else { work };
		if size == 0 {
			continue;
		}
		let start = cursor;
		let end = cursor + size;
		units.push(WorkUnit { lo: start as u32, hi: end as u32 });
		cursor = end;
	}
	units
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn divides_labor_without_gaps_or_overlaps() {
		let units = divide_labor(0, 100, 3);
		assert_eq!(units, vec![
			WorkUnit { lo: 0, hi: 34 },
			WorkUnit { lo: 34, hi: 67 },
			WorkUnit { lo: 67, hi: 100 },
		]);
	}

	#[test]
	fn exact_division_gives_equal_chunks() {
		let units = divide_labor(0, 9, 3);
		assert_eq!(units, vec![
			WorkUnit { lo: 0, hi: 3 },
			WorkUnit { lo: 3, hi: 6 },
			WorkUnit { lo: 6, hi: 9 },
		]);
	}

	#[test]
	fn more_threads_than_work_drops_empty_units() {
		let units = divide_labor(0, 2, 5);
		assert_eq!(units, vec![
			WorkUnit { lo: 0, hi: 1 },
			WorkUnit { lo: 1, hi: 2 },
		]);
	}

	#[cfg(feature = "serde")]
	#[test]
	fn seed_candidate_round_trips_through_json() {
		let candidate = SeedCandidate { seed: 42, confidence: 87.5 };
		let json = serde_json::to_string(&candidate).unwrap();
		let restored: SeedCandidate = serde_json::from_str(&json).unwrap();
		assert_eq!(candidate, restored);
	}

	#[cfg(feature = "serde")]
	#[test]
	fn inferred_state_round_trips_through_json() {
		let state = InferredState { state: vec![1, 2, 3], confidence: 100.0, seed: Some(7) };
		let json = serde_json::to_string(&state).unwrap();
		let restored: InferredState = serde_json::from_str(&json).unwrap();
		assert_eq!(state, restored);
	}
}
