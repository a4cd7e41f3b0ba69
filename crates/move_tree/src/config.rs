//! Search configuration

/// Default number of plies searched below the root
pub const DEFAULT_SEARCH_DEPTH: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Plies searched below the root
    pub max_search_depth: u32,
    /// Break ties between equally scored root moves at random
    pub random: bool,
    /// Seed for the random tie-break; `None` seeds from the OS
    pub seed: Option<u64>,
    /// Threads splitting the root moves; `0` means one per CPU
    pub workers: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_search_depth: DEFAULT_SEARCH_DEPTH,
            random: false,
            seed: None,
            workers: 1,
        }
    }
}

impl SearchConfig {
    /// Worker thread count with `0` resolved to the CPU count
    pub fn effective_workers(&self) -> usize {
        match self.workers {
            0 => num_cpus::get().max(1),
            n => n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.max_search_depth, 4);
        assert!(!config.random);
        assert_eq!(config.effective_workers(), 1);
    }

    #[test]
    fn test_zero_workers_means_all_cpus() {
        let config = SearchConfig {
            workers: 0,
            ..SearchConfig::default()
        };
        assert!(config.effective_workers() >= 1);
    }
}
