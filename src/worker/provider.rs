//! Joke sources

use crate::error::{JokeError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::Path;

/// Jokes handed out when no joke file is configured
const BUILTIN_JOKES: &[&str] = &[
    "Why do programmers prefer dark mode? Because light attracts bugs.",
    "There are 10 kinds of people: those who understand binary and those who don't.",
    "A SQL query walks into a bar, walks up to two tables and asks: can I join you?",
    "Why did the developer go broke? Because he used up all his cache.",
    "How many programmers does it take to change a light bulb? None, that's a hardware problem.",
    "I would tell you a UDP joke, but you might not get it.",
    "Knock knock. Race condition. Who's there?",
    "To understand recursion, you must first understand recursion.",
    "The best thing about a boolean is that even if you are wrong, you are only off by a bit.",
    "Why do Java developers wear glasses? Because they don't C#.",
];

/// Something that produces the next joke to log
pub trait JokeProvider: Send {
    fn next_joke(&mut self) -> Result<String>;
}

impl<F> JokeProvider for F
where
    F: FnMut() -> Result<String> + Send,
{
    fn next_joke(&mut self) -> Result<String> {
        self()
    }
}

/// Random pick from a fixed list of jokes
pub struct JokeService {
    jokes: Vec<String>,
    rng: StdRng,
}

impl JokeService {
    /// Create a service over the given jokes
    pub fn new(jokes: Vec<String>) -> Result<Self> {
        Self::with_rng(jokes, StdRng::from_entropy())
    }

    /// Service over the built-in jokes
    pub fn builtin() -> Self {
        Self {
            jokes: BUILTIN_JOKES.iter().map(|s| s.to_string()).collect(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic service for reproducible picks
    pub fn with_seed(jokes: Vec<String>, seed: u64) -> Result<Self> {
        Self::with_rng(jokes, StdRng::seed_from_u64(seed))
    }

    fn with_rng(jokes: Vec<String>, rng: StdRng) -> Result<Self> {
        if jokes.is_empty() {
            return Err(JokeError::EmptySource);
        }
        Ok(Self { jokes, rng })
    }

    /// Load jokes from a text file, one per line
    ///
    /// Blank lines and lines starting with `#` are skipped.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| JokeError::load(path.to_string_lossy(), e))?;

        let jokes = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();

        Self::new(jokes)
    }

    /// Built-in jokes unless a joke file is given
    pub fn from_config(jokes_file: Option<&Path>) -> Result<Self> {
        match jokes_file {
            Some(path) => Self::from_file(path),
            None => Ok(Self::builtin()),
        }
    }

    /// Number of jokes available
    pub fn len(&self) -> usize {
        self.jokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jokes.is_empty()
    }
}

impl JokeProvider for JokeService {
    fn next_joke(&mut self) -> Result<String> {
        self.jokes
            .choose(&mut self.rng)
            .cloned()
            .ok_or(JokeError::EmptySource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_always_succeeds() {
        let mut service = JokeService::builtin();
        assert_eq!(service.len(), BUILTIN_JOKES.len());
        for _ in 0..50 {
            let joke = service.next_joke().unwrap();
            assert!(BUILTIN_JOKES.contains(&joke.as_str()));
        }
    }

    #[test]
    fn test_seeded_picks_are_reproducible() {
        let jokes: Vec<String> = (0..20).map(|i| format!("joke {}", i)).collect();
        let mut a = JokeService::with_seed(jokes.clone(), 7).unwrap();
        let mut b = JokeService::with_seed(jokes, 7).unwrap();
        for _ in 0..10 {
            assert_eq!(a.next_joke().unwrap(), b.next_joke().unwrap());
        }
    }

    #[test]
    fn test_empty_list_rejected() {
        assert!(matches!(
            JokeService::new(Vec::new()),
            Err(JokeError::EmptySource)
        ));
    }

    #[test]
    fn test_from_file_skips_blanks_and_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# my jokes").unwrap();
        writeln!(file, "  first joke  ").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "second joke").unwrap();

        let mut service = JokeService::from_file(file.path()).unwrap();
        assert_eq!(service.len(), 2);
        let joke = service.next_joke().unwrap();
        assert!(joke == "first joke" || joke == "second joke");
    }

    #[test]
    fn test_from_file_with_only_comments_is_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# nothing here").unwrap();
        assert!(matches!(
            JokeService::from_file(file.path()),
            Err(JokeError::EmptySource)
        ));
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = JokeService::from_config(Some(dir.path().join("missing.txt").as_path()));
        assert!(matches!(result, Err(JokeError::Load { .. })));
    }

    #[test]
    fn test_closure_is_a_provider() {
        let mut count = 0;
        let mut provider = move || {
            count += 1;
            Ok::<_, JokeError>(format!("call {}", count))
        };
        assert_eq!(provider.next_joke().unwrap(), "call 1");
        assert_eq!(provider.next_joke().unwrap(), "call 2");
    }
}
