use thiserror::Error;

/// Top-level error type for the simulator.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("invalid cache policy: {0}")]
    InvalidPolicy(String),

    #[error("cache inconsistency at address {addr:#010x}: {detail}")]
    Inconsistency { addr: u32, detail: String },

    #[error("illegal memory access operation '{0}'")]
    IllegalOperation(char),

    #[error("illegal access class '{0}'")]
    IllegalAccessClass(char),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for `Result` with [`SimError`].
pub type SimResult<T> = Result<T, SimError>;
