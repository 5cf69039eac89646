//! Configuration access port trait.
//!
//! Typed getters return `Ok(None)` for an absent key and `Err` with a
//! human-readable reason when the key is present but malformed.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_uint(&self, section: &str, key: &str) -> Result<Option<u64>, String>;
    fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, String>;
    /// Section names present in the source, lower-cased.
    fn sections(&self) -> Vec<String>;
}
