use anyhow::Context;
use clap::Parser;
use read_pixy::{logger, ByteFormat, LineArgs, SerialPortListener};

/// Open the port, print how many bytes are buffered, print each of them and close.
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    line: LineArgs,

    /// How each byte is printed
    #[arg(short, long, value_enum, default_value_t = ByteFormat::Decimal)]
    format: ByteFormat,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose);

    let settings = cli.line.settings()?;
    let mut listener = SerialPortListener::open(&settings)
        .with_context(|| format!("failed to open {}", settings.device))?;
    println!("{}", listener.is_open());

    let n = listener.bytes_waiting()?;
    println!("{n}");

    let bytes = listener.read_exact_or_timeout(n)?;
    if bytes.len() < n {
        tracing::warn!("Expected {} bytes, got {}", n, bytes.len());
    }
    for b in &bytes {
        println!("{}", cli.format.render(*b));
    }

    listener.close();
    Ok(())
}
