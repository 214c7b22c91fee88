/*!
The PRNG abstraction every crackable generator implements.

A [`Generator`] is a single, exclusively-owned instance of some target
runtime's pseudorandom number generator. Workers in the [brute-forcer](crate::bruteforce)
and the [state inferrer](crate::infer) each construct their own via the
[registry](crate::registry) and never share one across threads.

Backward prediction and seed reversal are capability-gated rather than
branching on the generator's name: callers ask [`Generator::supports_backward`]
before requesting [`Generator::predict_backward`], and tolerate
[`Generator::reverse_to_seed`] returning `None` for families that can't be
inverted (see [`mod@wordpress`]).
*/

mod mt19937;
mod glibc;
mod java;
mod wordpress;

pub use self::mt19937::{Mt19937, Python, Ruby, Php};
pub use self::glibc::GlibcRand;
pub use self::java::JavaRandom;
pub use self::wordpress::WordPressRand;

/// A single instance of a target runtime's pseudorandom number generator.
///
/// Implementations are never shared across threads; each worker constructs
/// its own via the [registry](crate::registry::Factory).
pub trait Generator: Send {
	/// The registered identifier for this generator family.
	fn name(&self) -> &'static str;

	/// Reinitializes the generator deterministically from `seed`.
	fn seed(&mut self, seed: u32);

	/// Returns the next output word, mutating internal state.
	fn next(&mut self) -> u32;

	/// Number of `u32` words in the internal state.
	fn state_size(&self) -> u32;

	/// Returns a snapshot of the internal state.
	///
	/// `set_state(get_state())` followed by `k` calls to `next()` must
	/// reproduce the same `k` outputs the original instance would have.
	fn get_state(&self) -> Vec<u32>;

	/// Installs `state` as the internal state.
	///
	/// `state.len()` must equal [`state_size`](Generator::state_size).
	fn set_state(&mut self, state: &[u32]);

	/// Returns the next `n` outputs without mutating the externally
	/// observable state.
	///
	/// The default implementation snapshots via [`get_state`](Generator::get_state),
	/// draws `n` values, and restores the snapshot. This is correct
	/// whenever a fresh `next()` call is what actually comes after the
	/// installed state. The Mersenne Twister family overrides this: its
	/// `set_state` installs a whole window as the generator's *next* N
	/// outputs (so that `get_state`/`set_state` round-trip exactly), which
	/// means the outputs that come right after that window only appear
	/// once a twist has produced the block beyond it — see
	/// `mt19937::Engine::predict_beyond_current_block`.
	fn predict_forward(&mut self, n: u32) -> Vec<u32> {
		let snapshot = self.get_state();
		let out = (0..n).map(|_| self.next()).collect();
		self.set_state(&snapshot);
		out
	}

	/// Whether [`predict_backward`](Generator::predict_backward) and
	/// [`reverse_to_seed`](Generator::reverse_to_seed) (where applicable)
	/// are meaningful for this generator.
	///
	/// Families whose forward transform can't be inverted (WordPress's
	/// hash-chained construction) return `false`; callers must not call
	/// `predict_backward` expecting anything but an empty vector.
	fn supports_backward(&self) -> bool {
		false
	}

	/// Returns the `n` outputs immediately preceding the current state,
	/// most recent first.
	///
	/// Only meaningful when [`supports_backward`](Generator::supports_backward)
	/// returns `true`; otherwise returns an empty vector.
	fn predict_backward(&mut self, _n: u32) -> Vec<u32> {
		Vec::new()
	}

	/// Supplies the full observation set to generators whose state can't
	/// be uniquely pinned down from a raw window alone.
	///
	/// Default is a no-op; overridden only by tunable generators.
	fn set_evidence(&mut self, _evidence: &[u32]) {}

	/// Supplies the observations surrounding a candidate window so a
	/// tunable generator can disambiguate its installed state.
	///
	/// Default is a no-op; overridden only by tunable generators.
	fn tune(&mut self, _forward_evidence: &[u32], _backward_evidence: &[u32]) {}

	/// Attempts to invert the current state back to the seed that would
	/// have produced it, trying at most `max_tries` candidates.
	///
	/// Returns `Some(seed)` on success. Families without a meaningful
	/// notion of seed reversal (WordPress) always return `None`.
	fn reverse_to_seed(&mut self, _max_tries: u32) -> Option<u32> {
		None
	}
}

//----------------------------------------------------------------
// Shared bit-twiddling helpers used by more than one generator family.

/// Inverts `y ^= y >> shift` (as used by MT19937 tempering and GLIBC's
/// output shift) given only the result.
///
/// Five iterations is enough to converge for every shift width used in
/// this crate (7, 11, 15, 18): each iteration recovers one more
/// `shift`-sized chunk of the original value starting from the
/// untouched high bits.
pub(crate) fn undo_xor_shift_right(y: u32, shift: u32) -> u32 {
	let mut x = y;
	for _ in 0..5 {
		x = y ^ (x >> shift);
	}
	x
}

/// Inverts `y ^= (y << shift) & mask` given only the result.
pub(crate) fn undo_xor_shift_left_mask(y: u32, shift: u32, mask: u32) -> u32 {
	let mut x = y;
	for _ in 0..5 {
		x = y ^ ((x << shift) & mask);
	}
	x
}
