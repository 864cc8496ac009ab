use thiserror::Error;

pub type Result<T> = std::result::Result<T, VbeError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VbeError {
    #[error("failed to set VBE mode {mode:#05x} (status {status:#06x})")]
    ModeSet { mode: u16, status: u16 },

    #[error("failed to query the current VBE mode (status {status:#06x})")]
    ModeQuery { status: u16 },

    #[error("VBE mode {0:#05x} has no supported banked drawing layout")]
    UnsupportedMode(u16),

    #[error("invalid framebuffer layout: {0}")]
    InvalidLayout(&'static str),
}
