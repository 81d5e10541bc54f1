//! Codec configuration.

/// Which values a path may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathElements {
    /// Only vertices and edges (the default).
    #[default]
    GraphOnly,
    /// Any value, including nested paths.
    Any,
}

/// Configuration for a [`Codec`](crate::Codec).
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Maximum container nesting accepted by encode and decode (default: 128)
    pub max_depth: usize,

    /// Policy applied to path elements on encode and decode
    pub path_elements: PathElements,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self { max_depth: 128, path_elements: PathElements::GraphOnly }
    }
}

impl CodecConfig {
    /// Set the maximum nesting depth.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the path element policy.
    #[must_use]
    pub const fn with_path_elements(mut self, policy: PathElements) -> Self {
        self.path_elements = policy;
        self
    }
}
