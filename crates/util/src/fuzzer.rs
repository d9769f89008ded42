//! Seeded random text generation for diff and patch property tests.

use std::sync::Mutex;

use rand::{rngs::OsRng, Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// Deterministic generator of diff inputs.
///
/// Wraps xoshiro256** so a failing case can be replayed from its seed. The
/// generators are text-shaped: random strings over a caller-chosen alphabet,
/// and small edit scripts applied to them, which is what the diff and patch
/// invariants want to chew on.
///
/// # Examples
///
/// ```
/// use dmp_util::fuzzer::Fuzzer;
///
/// let fuzzer = Fuzzer::new(Some([42u8; 32]));
/// let base = fuzzer.text(24, "abc\n");
/// let edited = fuzzer.edit(&base, 3, "abc\n");
/// assert_eq!(base.chars().count(), 24);
/// assert!(edited.chars().all(|c| "abc\n".contains(c)));
/// ```
pub struct Fuzzer {
    /// Seed the PRNG was initialized with; print it to replay a failure.
    pub seed: [u8; 32],
    rng: Mutex<Xoshiro256StarStar>,
}

impl Fuzzer {
    /// Seeded construction is reproducible; `None` draws a seed from `OsRng`.
    pub fn new(seed: Option<[u8; 32]>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            let mut bytes = [0u8; 32];
            OsRng.fill_bytes(&mut bytes);
            bytes
        });
        Self {
            seed,
            rng: Mutex::new(Xoshiro256StarStar::from_seed(seed)),
        }
    }

    /// Uniform integer in `[min, max]`.
    pub fn int(&self, min: usize, max: usize) -> usize {
        self.rng.lock().unwrap().gen_range(min..=max)
    }

    /// True with the given probability.
    pub fn chance(&self, probability: f64) -> bool {
        self.rng.lock().unwrap().gen_bool(probability)
    }

    /// Random text of `len` characters drawn from `alphabet`.
    pub fn text(&self, len: usize, alphabet: &str) -> String {
        let chars: Vec<char> = alphabet.chars().collect();
        let mut rng = self.rng.lock().unwrap();
        (0..len)
            .map(|_| chars[rng.gen_range(0..chars.len())])
            .collect()
    }

    /// Derive an edited copy of `text`: `edits` random span deletions, run
    /// insertions and single-character replacements, with inserted characters
    /// drawn from `alphabet`.
    pub fn edit(&self, text: &str, edits: usize, alphabet: &str) -> String {
        let alphabet: Vec<char> = alphabet.chars().collect();
        let mut out: Vec<char> = text.chars().collect();
        for _ in 0..edits {
            match self.int(0, 2) {
                0 if !out.is_empty() => {
                    // Delete a short span.
                    let start = self.int(0, out.len() - 1);
                    let len = self.int(1, 5).min(out.len() - start);
                    out.drain(start..start + len);
                }
                1 => {
                    // Insert a short run.
                    let at = self.int(0, out.len());
                    for _ in 0..self.int(1, 5) {
                        out.insert(at, alphabet[self.int(0, alphabet.len() - 1)]);
                    }
                }
                _ if !out.is_empty() => {
                    // Replace one character.
                    let at = self.int(0, out.len() - 1);
                    out[at] = alphabet[self.int(0, alphabet.len() - 1)];
                }
                _ => out.push(alphabet[self.int(0, alphabet.len() - 1)]),
            }
        }
        out.into_iter().collect()
    }
}
