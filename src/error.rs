use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidSetting {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Software (xonxoff) and hardware (rtscts) flow control cannot both be enabled")]
    ConflictingFlowControl,
}

pub type Result<T> = std::result::Result<T, Error>;
