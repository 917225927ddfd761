/// Controls shape registry behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// When true, checking an unknown name returns `ShapeError::NoShape`.
    pub fail_on_missing_shape: bool,
    /// Maximum number of distinct names the registry accepts.
    pub max_shapes: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            fail_on_missing_shape: false,
            max_shapes: 4096,
        }
    }
}
