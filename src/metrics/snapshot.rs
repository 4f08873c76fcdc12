/// Counts captured from an LRU-K cache at a single instant.
///
/// `total_entries == size + history_size` always holds for a snapshot taken
/// under one lock acquisition.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LrukStats {
    /// Admitted entries (what `len()` reports).
    pub size: usize,
    /// Maximum admitted entries.
    pub capacity: usize,
    /// Accesses required for admission.
    pub k: usize,
    /// Tracked keys not yet admitted.
    pub history_size: usize,
    /// Every key the cache currently tracks.
    pub total_entries: usize,
}
