use crate::error::{Error, Result};
use crate::executor::PanicStrategy;

pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 5;

const MAX_THREADS: usize = 1024;
const MIN_STACK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` or `Some(0)` falls back to the host's hardware concurrency.
    pub num_threads: Option<usize>,
    pub max_recursion_depth: usize,
    pub stack_size: Option<usize>,
    pub thread_name_prefix: String,
    pub panic_strategy: PanicStrategy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_threads: None,
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
            stack_size: Some(2 * 1024 * 1024),
            thread_name_prefix: "nestpool-worker".to_string(),
            panic_strategy: PanicStrategy::default(),
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(n) = self.num_threads {
            if n > MAX_THREADS {
                return Err(Error::config(format!(
                    "num_threads too large (max {})",
                    MAX_THREADS
                )));
            }
        }

        if let Some(size) = self.stack_size {
            if size < MIN_STACK_SIZE {
                return Err(Error::config(format!(
                    "stack_size must be at least {} bytes",
                    MIN_STACK_SIZE
                )));
            }
        }

        if self.thread_name_prefix.is_empty() {
            return Err(Error::config("thread_name_prefix must not be empty"));
        }

        Ok(())
    }

    pub fn worker_threads(&self) -> usize {
        match self.num_threads {
            Some(n) if n > 0 => n,
            _ => num_cpus::get().max(1),
        }
    }
}

#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn num_threads(mut self, n: usize) -> Self {
        self.config.num_threads = Some(n);
        self
    }

    pub fn max_recursion_depth(mut self, depth: usize) -> Self {
        self.config.max_recursion_depth = depth;
        self
    }

    pub fn stack_size(mut self, size: usize) -> Self {
        self.config.stack_size = Some(size);
        self
    }

    pub fn thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    pub fn panic_strategy(mut self, strategy: PanicStrategy) -> Self {
        self.config.panic_strategy = strategy;
        self
    }

    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_recursion_depth, 5);
        assert!(config.num_threads.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_threads_falls_back_to_hardware() {
        let config = Config::builder().num_threads(0).build().unwrap();
        assert_eq!(config.worker_threads(), num_cpus::get().max(1));
        assert!(config.worker_threads() >= 1);
    }

    #[test]
    fn test_explicit_threads() {
        let config = Config::builder().num_threads(3).build().unwrap();
        assert_eq!(config.worker_threads(), 3);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::builder().num_threads(4096).build().is_err());
        assert!(Config::builder().stack_size(1024).build().is_err());
        assert!(Config::builder().thread_name_prefix("").build().is_err());
    }

    #[test]
    fn test_zero_depth_is_allowed() {
        let config = Config::builder().max_recursion_depth(0).build().unwrap();
        assert_eq!(config.max_recursion_depth, 0);
    }
}
