use crate::values::ValueMode;

/// Errors produced while turning user input or construction parameters into picker state.
///
/// None of these are fatal. Input errors are swallowed by the controllers and the edit is
/// simply dropped; configuration errors are returned from the constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PickerError {
    /// Malformed hex or numeric text.
    #[error("invalid color text {input:?}: {reason}")]
    Parse { input: String, reason: &'static str },
    /// A channel, degree or percentage outside of its valid range.
    #[error("{channel} value {value} is out of range 0..={max}")]
    Range {
        channel: &'static str,
        value: u32,
        max: u32,
    },
    /// A keystroke rejected by the input filter of the current value mode.
    #[error("input {input:?} is not accepted in {mode} mode")]
    Validation { input: String, mode: ValueMode },
    /// Invalid construction parameters.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl PickerError {
    pub(crate) fn parse(input: impl Into<String>, reason: &'static str) -> Self {
        Self::Parse {
            input: input.into(),
            reason,
        }
    }
}

pub type Result<T, E = PickerError> = std::result::Result<T, E>;
