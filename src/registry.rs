/*!
Maps a PRNG family's registered name to a fresh [`Generator`] instance.

The registry is stateless and immutable after construction: it owns no
generator instances itself, only the knowledge of how to build one.
*/

use crate::error::{Error, Result};
use crate::generator::{GlibcRand, Generator, JavaRandom, Mt19937, Php, Python, Ruby, WordPressRand};

/// Builds fresh [`Generator`] instances by registered name.
///
/// `Factory` carries no state beyond the fixed list of families this
/// crate knows how to construct, so it's cheap to clone or share and
/// never needs synchronization even though a [`crate::Untwister`]
/// session hands out a fresh generator per worker thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Factory;

/// The registered name of every PRNG family this crate supports, in
/// the order [`Factory::names`] returns them.
pub const SUPPORTED: &[&str] = &["mt19937", "python", "ruby", "php", "java", "glibc", "wordpress"];

impl Factory {
	/// Creates a new factory. There is no configuration to provide.
	pub fn new() -> Self {
		Factory
	}

	/// The registered name of every PRNG family this crate supports.
	pub fn names(&self) -> &'static [&'static str] {
		SUPPORTED
	}

	/// Whether `name` is a family this factory can construct.
	pub fn is_supported(&self, name: &str) -> bool {
		SUPPORTED.contains(&name)
	}

	/// Builds a fresh, unseeded generator for `name`.
	pub fn instance(&self, name: &str) -> Result<Box<dyn Generator>> {
		let generator: Box<dyn Generator> = match name {
			"mt19937" => Box::new(Mt19937::new()),
			"python" => Box::new(Python::new()),
			"ruby" => Box::new(Ruby::new()),
			"php" => Box::new(Php::new()),
			"java" => Box::new(JavaRandom::new()),
			"glibc" => Box::new(GlibcRand::new()),
			"wordpress" => Box::new(WordPressRand::new()),
			_ => {
				return Err(Error::UnknownGenerator { name: name.to_string() });
			}
		};
		Ok(generator)
	}
}
