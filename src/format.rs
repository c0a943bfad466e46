use clap::ValueEnum;

/// How a single byte is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ByteFormat {
    #[default]
    Decimal,
    Hex,
    /// Printable ASCII as-is, anything else escaped
    Char,
}

impl ByteFormat {
    pub fn render(self, byte: u8) -> String {
        match self {
            ByteFormat::Decimal => byte.to_string(),
            ByteFormat::Hex => format!("{:#04x}", byte),
            ByteFormat::Char => std::ascii::escape_default(byte).to_string(),
        }
    }
}
