use std::collections::HashMap;

/// Maps an event description code to the human-readable level stored
/// alongside each event row.
pub trait LevelResolver: Send + Sync {
    fn level(&self, description_code: u32) -> String;
}

impl<F> LevelResolver for F
where
    F: Fn(u32) -> String + Send + Sync,
{
    fn level(&self, description_code: u32) -> String {
        self(description_code)
    }
}

/// Range-based levels: codes below 1000 are informational, below 2000
/// warnings, everything else errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLevels;

impl LevelResolver for DefaultLevels {
    fn level(&self, description_code: u32) -> String {
        match description_code {
            0..=999 => "info",
            1000..=1999 => "warning",
            _ => "error",
        }
        .to_string()
    }
}

/// Explicit code table with a fallback for unregistered codes.
#[derive(Debug, Clone)]
pub struct LevelTable {
    levels: HashMap<u32, String>,
    fallback: String,
}

impl LevelTable {
    pub fn new() -> Self {
        Self {
            levels: HashMap::new(),
            fallback: "unknown".to_string(),
        }
    }

    /// Register the level for a code, replacing any previous entry.
    pub fn with_level(mut self, description_code: u32, level: impl Into<String>) -> Self {
        self.levels.insert(description_code, level.into());
        self
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelResolver for LevelTable {
    fn level(&self, description_code: u32) -> String {
        self.levels
            .get(&description_code)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_levels() {
        assert_eq!(DefaultLevels.level(10), "info");
        assert_eq!(DefaultLevels.level(1500), "warning");
        assert_eq!(DefaultLevels.level(2000), "error");
    }

    #[test]
    fn test_level_table_fallback() {
        let table = LevelTable::new()
            .with_level(7, "critical")
            .with_fallback("n/a");
        assert_eq!(table.level(7), "critical");
        assert_eq!(table.level(8), "n/a");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |code: u32| format!("L{}", code);
        assert_eq!(resolver.level(3), "L3");
    }
}
