/// Limits applied to a single evaluation.
///
/// Both limits are off by default: evaluation depth is then bounded only by
/// available memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluatorOptions {
    /// Maximum number of frames alive at once.
    pub max_frames: Option<usize>,

    /// Maximum number of dispatch steps for the whole evaluation.
    ///
    /// A method whose body calls itself never terminates on its own; this is
    /// the only way to bound it.
    pub max_steps: Option<usize>,
}
