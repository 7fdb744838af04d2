//! Runtime configuration for the settlement engine.

use serde::{Deserialize, Serialize};

/// Attempt budget for one optimistic transaction before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 25;

/// Text written to `endMessage` when the final round completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndMessages {
    /// Appended to the winner's user name.
    pub win_suffix: String,
    /// Used verbatim on an exact score tie.
    pub draw: String,
}

impl Default for EndMessages {
    fn default() -> Self {
        Self {
            win_suffix: " wins!".to_string(),
            draw: "Draw!".to_string(),
        }
    }
}

impl EndMessages {
    pub fn win(&self, user_name: &str) -> String {
        format!("{}{}", user_name, self.win_suffix)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementConfig {
    pub max_attempts: u32,
    pub messages: EndMessages,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            messages: EndMessages::default(),
        }
    }
}

impl SettlementConfig {
    /// Overrides the attempt budget. Zero is raised to one so a transaction
    /// always reads the document at least once.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_messages(mut self, messages: EndMessages) -> Self {
        self.messages = messages;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SettlementConfig::default();
        assert_eq!(config.max_attempts, 25);
        assert_eq!(config.messages.win("Alice"), "Alice wins!");
        assert_eq!(config.messages.draw, "Draw!");
    }

    #[test]
    fn test_zero_attempts_clamped() {
        let config = SettlementConfig::default().with_max_attempts(0);
        assert_eq!(config.max_attempts, 1);
    }
}
