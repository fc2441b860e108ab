/// Response cache - raw input text to generated reply
pub trait ResponseCache: Send + Sync {
    /// Look up a reply; a hit counts as a use of the entry
    fn get(&self, key: &str) -> Option<String>;

    /// Store a reply, evicting as the implementation sees fit
    fn set(&self, key: &str, value: &str);
}
