use xxhash_rust::xxh64::xxh64;

/// Diff renders in full below this many operations.
pub const WARN_OPERATIONS: usize = 10_000;
/// Above this many operations the table is never rendered.
pub const REJECT_OPERATIONS: usize = 20_000;

/// Size classification of a computed diff, derived from its operation count.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    /// Render the full table immediately.
    #[default]
    Normal,
    /// Withhold the table behind a fallback card; the user may force-load.
    WarnLargeLoadable,
    /// Never render the table; only "view current" and "download patch" remain.
    RejectedTooLarge,
}

pub fn classify_size(operation_count: usize) -> SizeTier {
    if operation_count <= WARN_OPERATIONS {
        SizeTier::Normal
    } else if operation_count <= REJECT_OPERATIONS {
        SizeTier::WarnLargeLoadable
    } else {
        SizeTier::RejectedTooLarge
    }
}

/// Per-file render gate for oversized diffs.
///
/// `force_load` is an explicit user override that only applies in the
/// warn tier and resets whenever the focused file changes. Identity is the
/// xxh64 of the repo-relative path so the flag survives content refreshes
/// of the same file.
#[derive(Debug, Default)]
pub struct DiffGate {
    file_identity: u64,
    force_load: bool,
}

impl DiffGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the gate at a file; a different file resets the override.
    pub fn focus_file(&mut self, path: &str) {
        let identity = xxh64(path.as_bytes(), 0);
        if identity != self.file_identity {
            self.file_identity = identity;
            self.force_load = false;
        }
    }

    /// User asked to render anyway. Only reachable from the warn tier;
    /// the reject tier has no override path.
    pub fn request_force_load(&mut self, tier: SizeTier) {
        if tier == SizeTier::WarnLargeLoadable {
            self.force_load = true;
        }
    }

    pub fn force_load(&self) -> bool {
        self.force_load
    }

    /// Whether the full diff table should be rendered at the given tier.
    pub fn should_render(&self, tier: SizeTier) -> bool {
        match tier {
            SizeTier::Normal => true,
            SizeTier::WarnLargeLoadable => self.force_load,
            SizeTier::RejectedTooLarge => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_boundaries_are_inclusive() {
        assert_eq!(classify_size(0), SizeTier::Normal);
        assert_eq!(classify_size(10_000), SizeTier::Normal);
        assert_eq!(classify_size(10_001), SizeTier::WarnLargeLoadable);
        assert_eq!(classify_size(20_000), SizeTier::WarnLargeLoadable);
        assert_eq!(classify_size(20_001), SizeTier::RejectedTooLarge);
    }

    #[test]
    fn force_load_only_renders_warn_tier() {
        let mut gate = DiffGate::new();
        gate.focus_file("src/big.rs");

        assert!(gate.should_render(SizeTier::Normal));
        assert!(!gate.should_render(SizeTier::WarnLargeLoadable));

        gate.request_force_load(SizeTier::WarnLargeLoadable);
        assert!(gate.should_render(SizeTier::WarnLargeLoadable));

        // No override path past the reject threshold.
        gate.request_force_load(SizeTier::RejectedTooLarge);
        assert!(!gate.should_render(SizeTier::RejectedTooLarge));
    }

    #[test]
    fn force_load_ignored_outside_warn_tier() {
        let mut gate = DiffGate::new();
        gate.request_force_load(SizeTier::Normal);
        assert!(!gate.force_load());
        gate.request_force_load(SizeTier::RejectedTooLarge);
        assert!(!gate.force_load());
    }

    #[test]
    fn changing_file_resets_override() {
        let mut gate = DiffGate::new();
        gate.focus_file("a.txt");
        gate.request_force_load(SizeTier::WarnLargeLoadable);
        assert!(gate.force_load());

        // Refocusing the same file keeps the override.
        gate.focus_file("a.txt");
        assert!(gate.force_load());

        gate.focus_file("b.txt");
        assert!(!gate.force_load());
    }
}
