use anyhow::Context;
use clap::Parser;
use read_pixy::{logger, ByteFormat, ByteStream, LineArgs};
use tokio_serial::SerialPortBuilderExt;
use tracing::info;

/// Keep printing bytes from the port as they arrive, until ^C.
#[derive(Parser, Debug)]
struct Cli {
    #[command(flatten)]
    line: LineArgs,

    #[arg(short, long, value_enum, default_value_t = ByteFormat::Decimal)]
    format: ByteFormat,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose);

    let settings = cli.line.settings()?;
    #[allow(unused_mut)]
    let mut port = settings
        .builder()
        .open_native_async()
        .with_context(|| format!("failed to open {}", settings.device))?;

    #[cfg(unix)]
    port.set_exclusive(false)
        .context("failed to release exclusive access to the port")?;

    info!("Ready to read from {}", settings);
    let mut stream = ByteStream::new(port);
    loop {
        tokio::select! {
            chunk = stream.next_chunk() => match chunk? {
                Some(chunk) => chunk
                    .iter()
                    .for_each(|b| println!("{}", cli.format.render(*b))),
                None => {
                    info!("Port reported end of input");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    info!("Read {} bytes in total", stream.bytes_seen());
    Ok(())
}
