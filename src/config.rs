use std::{fmt, time::Duration};

use clap::{Args, ValueEnum};
use serialport::{DataBits, FlowControl, Parity, SerialPortBuilder, StopBits};

use crate::error::{Error, Result};

/// UART1 on the BeagleBone Black. Rx is P9_26, Tx is P9_24.
pub static DEVICE: &str = "/dev/ttyO1";
pub const BAUD_RATE: u32 = 38400;
pub const TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ParityArg {
    None,
    Odd,
    Even,
}

impl From<ParityArg> for Parity {
    fn from(p: ParityArg) -> Self {
        match p {
            ParityArg::None => Parity::None,
            ParityArg::Odd => Parity::Odd,
            ParityArg::Even => Parity::Even,
        }
    }
}

/// Line configuration as accepted on the command line. Every flag defaults
/// to the fixed configuration the sensor is wired for.
#[derive(Args, Debug, Clone)]
pub struct LineArgs {
    /// Serial device path
    #[arg(short, long, default_value = DEVICE)]
    pub device: String,

    /// Baud rate
    #[arg(short, long, default_value_t = BAUD_RATE)]
    pub baud: u32,

    /// Bits per byte
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u8).range(5..=8))]
    pub data_bits: u8,

    #[arg(long, value_enum, default_value_t = ParityArg::None)]
    pub parity: ParityArg,

    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub stop_bits: u8,

    /// Read timeout in milliseconds
    #[arg(long, default_value_t = TIMEOUT.as_millis() as u64)]
    pub timeout_ms: u64,

    /// Enable software (XON/XOFF) flow control
    #[arg(long)]
    pub xonxoff: bool,

    /// Enable hardware (RTS/CTS) flow control
    #[arg(long)]
    pub rtscts: bool,
}

impl LineArgs {
    pub fn settings(&self) -> Result<LineSettings> {
        if self.device.trim().is_empty() {
            return Err(Error::InvalidSetting {
                field: "device",
                value: self.device.clone(),
                reason: "path cannot be empty".to_string(),
            });
        }
        if self.baud == 0 {
            return Err(Error::InvalidSetting {
                field: "baud",
                value: self.baud.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.xonxoff && self.rtscts {
            return Err(Error::ConflictingFlowControl);
        }

        Ok(LineSettings {
            device: self.device.clone(),
            baud_rate: self.baud,
            data_bits: data_bits(self.data_bits)?,
            parity: self.parity.into(),
            stop_bits: stop_bits(self.stop_bits)?,
            timeout: Duration::from_millis(self.timeout_ms),
            xonxoff: self.xonxoff,
            rtscts: self.rtscts,
        })
    }
}

fn data_bits(n: u8) -> Result<DataBits> {
    match n {
        5 => Ok(DataBits::Five),
        6 => Ok(DataBits::Six),
        7 => Ok(DataBits::Seven),
        8 => Ok(DataBits::Eight),
        _ => Err(Error::InvalidSetting {
            field: "data_bits",
            value: n.to_string(),
            reason: "must be between 5 and 8".to_string(),
        }),
    }
}

fn stop_bits(n: u8) -> Result<StopBits> {
    match n {
        1 => Ok(StopBits::One),
        2 => Ok(StopBits::Two),
        _ => Err(Error::InvalidSetting {
            field: "stop_bits",
            value: n.to_string(),
            reason: "must be 1 or 2".to_string(),
        }),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSettings {
    pub device: String,
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub timeout: Duration,
    pub xonxoff: bool,
    pub rtscts: bool,
}

impl Default for LineSettings {
    fn default() -> Self {
        LineSettings {
            device: DEVICE.to_string(),
            baud_rate: BAUD_RATE,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            timeout: TIMEOUT,
            xonxoff: false,
            rtscts: false,
        }
    }
}

impl LineSettings {
    pub fn flow_control(&self) -> FlowControl {
        match (self.xonxoff, self.rtscts) {
            (true, _) => FlowControl::Software,
            (false, true) => FlowControl::Hardware,
            (false, false) => FlowControl::None,
        }
    }

    /// Builder with every setting applied. Works for both `serialport` and
    /// `tokio_serial` since the latter opens the same builder type.
    pub fn builder(&self) -> SerialPortBuilder {
        serialport::new(&self.device, self.baud_rate)
            .data_bits(self.data_bits)
            .parity(self.parity)
            .stop_bits(self.stop_bits)
            .flow_control(self.flow_control())
            .timeout(self.timeout)
    }
}

impl fmt::Display for LineSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = match self.data_bits {
            DataBits::Five => 5,
            DataBits::Six => 6,
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        };
        let parity = match self.parity {
            Parity::None => 'N',
            Parity::Odd => 'O',
            Parity::Even => 'E',
        };
        let stop = match self.stop_bits {
            StopBits::One => 1,
            StopBits::Two => 2,
        };
        write!(
            f,
            "{} {} {}{}{} timeout={:?} flow={:?}",
            self.device,
            self.baud_rate,
            bits,
            parity,
            stop,
            self.timeout,
            self.flow_control()
        )
    }
}
