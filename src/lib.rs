//! Reads the bytes a serial sensor has buffered and prints them.
//!
//! The defaults match a Pixy camera wired to UART1 of a BeagleBone Black
//! (`/dev/ttyO1`, 38400 8N1, no flow control, 1 s read timeout).

pub mod config;
pub mod error;
pub mod format;
pub mod listener;
pub mod logger;
pub mod stream;

pub use config::{LineArgs, LineSettings, BAUD_RATE, DEVICE, TIMEOUT};
pub use error::{Error, Result};
pub use format::ByteFormat;
pub use listener::{PendingRead, SerialPortListener};
pub use stream::ByteStream;
