//! User settings bag with a defaults layer.
//!
//! Mirrors the host's settings-store convention: handlers seed defaults
//! during `defaults()`, the host writes user choices on top, and reads fall
//! through user value → default → zero value. Reading never mutates.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Int(i64),
    Str(String),
    Bool(bool),
}

/// String-keyed, typed-value settings store.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    user: HashMap<String, Value>,
    defaults: HashMap<String, Value>,
}

impl Settings {
    /// An empty bag with no defaults seeded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a user-chosen integer value.
    pub fn set_int(&mut self, key: &str, value: i64) {
        self.user.insert(key.to_string(), Value::Int(value));
    }

    /// Record a default integer value. Does not disturb user values.
    pub fn set_default_int(&mut self, key: &str, value: i64) {
        self.defaults.insert(key.to_string(), Value::Int(value));
    }

    /// Integer at `key`: user value, else default, else 0.
    pub fn int(&self, key: &str) -> i64 {
        match self.user.get(key).or_else(|| self.defaults.get(key)) {
            Some(Value::Int(v)) => *v,
            _ => 0,
        }
    }

    /// Record a user-chosen string value.
    pub fn set_string(&mut self, key: &str, value: &str) {
        self.user
            .insert(key.to_string(), Value::Str(value.to_string()));
    }

    /// Record a default string value.
    pub fn set_default_string(&mut self, key: &str, value: &str) {
        self.defaults
            .insert(key.to_string(), Value::Str(value.to_string()));
    }

    /// String at `key`: user value, else default, else `""`.
    pub fn string(&self, key: &str) -> &str {
        match self.user.get(key).or_else(|| self.defaults.get(key)) {
            Some(Value::Str(v)) => v.as_str(),
            _ => "",
        }
    }

    /// Record a user-chosen boolean value.
    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.user.insert(key.to_string(), Value::Bool(value));
    }

    /// Record a default boolean value.
    pub fn set_default_bool(&mut self, key: &str, value: bool) {
        self.defaults.insert(key.to_string(), Value::Bool(value));
    }

    /// Boolean at `key`: user value, else default, else `false`.
    pub fn bool(&self, key: &str) -> bool {
        match self.user.get(key).or_else(|| self.defaults.get(key)) {
            Some(Value::Bool(v)) => *v,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_values_shadow_defaults() {
        let mut settings = Settings::new();
        settings.set_default_int("H264.Profile", 2);
        assert_eq!(settings.int("H264.Profile"), 2);

        settings.set_int("H264.Profile", 0);
        assert_eq!(settings.int("H264.Profile"), 0);
    }

    #[test]
    fn missing_keys_read_as_zero_values() {
        let settings = Settings::new();
        assert_eq!(settings.int("H264.Level"), 0);
        assert_eq!(settings.string("preset"), "");
        assert!(!settings.bool("lookahead"));
    }

    #[test]
    fn seeding_defaults_twice_is_idempotent() {
        let mut settings = Settings::new();
        settings.set_default_int("H264.Profile", 2);
        settings.set_default_int("H264.Profile", 2);
        assert_eq!(settings.int("H264.Profile"), 2);
    }

    #[test]
    fn type_mismatch_reads_as_zero_value() {
        let mut settings = Settings::new();
        settings.set_string("H264.Profile", "high");
        assert_eq!(settings.int("H264.Profile"), 0);
    }
}
