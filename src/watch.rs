//! The list of process names the sampler follows.

/// Names watched when neither the config file nor the CLI provides a list.
pub const DEFAULT_WATCH: &[&str] = &["gnome-shell", "python3", "stress-ng", "ollama"];

/// Exact-match list of process names, fixed for the life of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchList {
    names: Vec<String>,
}

impl WatchList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Whole-name comparison; `python3.11` does not match `python3`.
    pub fn matches(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for WatchList {
    fn default() -> Self {
        Self::new(DEFAULT_WATCH.iter().copied())
    }
}
