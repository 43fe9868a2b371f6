use std::time::Duration;

use crate::config::Config;

/// Loop limits for one ingest run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub max_steps: usize,
    pub preview_chars: usize,
    pub step_delay: Duration,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_steps: config.agent.max_steps,
            preview_chars: config.agent.preview_chars,
            step_delay: Duration::from_millis(config.agent.step_delay_ms),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
