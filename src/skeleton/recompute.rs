/// Selects which derived bone transforms a recomputation pass refreshes.
///
/// The two output arrays are rewritten by every pass regardless of the flags,
/// from whatever totals are cached after the selected fields were refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecomputeFlags {
    /// Refresh `total_bind_transform`.
    pub bind: bool,
    /// Refresh `total_transform`.
    pub full: bool,
    /// Refresh `total_bind_transform_inverse` (after `bind`, if both are set).
    pub inverse_bind: bool,
}

impl RecomputeFlags {
    pub const ALL: Self = Self {
        bind: true,
        full: true,
        inverse_bind: true,
    };

    /// Animated pose changed, rest pose untouched.
    pub const FULL_ONLY: Self = Self {
        bind: false,
        full: true,
        inverse_bind: false,
    };

    /// Rest pose changed: bind totals and their inverses.
    pub const BIND_ONLY: Self = Self {
        bind: true,
        full: false,
        inverse_bind: true,
    };

    /// Only rewrite the output arrays from cached totals.
    pub const OUTPUT_ONLY: Self = Self {
        bind: false,
        full: false,
        inverse_bind: false,
    };
}

impl Default for RecomputeFlags {
    fn default() -> Self {
        Self::ALL
    }
}
