/*!
Error types for seed recovery and state inference.

The error set is closed: every fallible public function in this crate
returns [`Result<T>`](Result), and every variant of [`Error`] carries the
data needed to format a precise message without the caller needing to
go digging.
*/

/// Everything that can go wrong while configuring or driving a [`crate::Untwister`] session.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum Error {
	/// `bruteforce`/`infer_state` asked for a PRNG name the [registry](crate::registry) doesn't know.
	#[error("unknown PRNG `{name}`")]
	UnknownGenerator {
		/// The name that failed to resolve.
		name: String,
	},

	/// `bruteforce` was called while a run was already `starting` or `running`.
	#[error("bruteforce is already in progress")]
	AlreadyRunning,

	/// `get_status` was called while the session is `idle` or `completed`.
	#[error("bruteforce is not running, no status")]
	NotRunning,

	/// `infer_state` was called with `observations.len() <= state_size`.
	#[error("not enough observations to infer state: have {have}, need more than {state_size}")]
	InsufficientObservations {
		/// Number of observations currently held by the session.
		have: usize,
		/// The generator's declared state size.
		state_size: u32,
	},

	/// `bruteforce(lo, hi)` was called with `hi <= lo`.
	#[error("invalid seed range [{lo}, {hi})")]
	InvalidRange {
		/// Lower bound, inclusive.
		lo: u32,
		/// Upper bound, exclusive.
		hi: u32,
	},

	/// A configuration value is out of its valid domain.
	#[error("invalid configuration: {reason}")]
	InvalidConfiguration {
		/// Human-readable explanation of what was invalid.
		reason: String,
	},
}

/// Crate-wide result alias: every fallible public function returns this.
pub type Result<T> = core::result::Result<T, Error>;
