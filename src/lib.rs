/*!
Recovers the seed and/or internal state of a pseudorandom number
generator from a short run of its observed outputs.

Given a handful of integers suspected to have come from a known PRNG
family, this crate answers two questions:

1. **Seed recovery** — which seed, out of a bounded candidate interval,
   reproduces the observed sequence? See [`Untwister::bruteforce`].
2. **State inference** — if enough consecutive outputs were observed to
   fill the generator's internal state, what is that state, and can it
   be reversed back to a seed? See [`Untwister::infer_state`].

# Quick Start

```
use untwister::generator::Generator;

let session = untwister::Untwister::new("mt19937", None).unwrap();

// Ten observed outputs, known (for this example) to come from seed 1.
let mut probe = untwister::generator::Mt19937::new();
probe.seed(1);
for _ in 0..10 {
    session.add_observation(probe.next()).unwrap();
}

let found = session.bruteforce(0, 100).unwrap();
assert_eq!(found[0].seed, 1);
assert_eq!(found[0].confidence, 100.0);
```

# Supported PRNG families

Mersenne Twister MT19937, and the Python, Ruby, and PHP runtimes that
embed their own variant of it; `java.util.Random`'s 48-bit LCG; GLIBC's
`rand()`; and a non-reversible WordPress `wp_rand()` placeholder. See
[`generator`] for the per-family notes and [`Untwister::supported_prngs`]
for the registered names.

This is not a cryptanalytic attack on cryptographically secure
generators, not a randomness-quality test suite, and has no network or
persistence surface — see `SPEC_FULL.md` for the full scope statement.
*/

#![deny(unsafe_code)]

pub mod generator;

mod bruteforce;
mod error;
mod infer;
mod registry;
mod session;
mod types;

pub use self::error::{Error, Result};
pub use self::registry::Factory;
pub use self::session::Untwister;
pub use self::types::{InferredState, SeedCandidate};
