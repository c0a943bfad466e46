use clap::Parser;
use read_pixy::logger;
use serialport::{SerialPortInfo, SerialPortType, UsbPortInfo};

/// List the serial ports available on this host.
#[derive(Parser, Debug)]
struct Cli {
    #[arg(short, long)]
    verbose: bool,
}

fn describe(port: &SerialPortInfo) -> String {
    match &port.port_type {
        SerialPortType::UsbPort(UsbPortInfo {
            vid, pid, product, ..
        }) => match product {
            Some(product) => format!("{} usb {:04x}:{:04x} ({product})", port.port_name, vid, pid),
            None => format!("{} usb {:04x}:{:04x}", port.port_name, vid, pid),
        },
        SerialPortType::PciPort => format!("{} pci", port.port_name),
        SerialPortType::BluetoothPort => format!("{} bluetooth", port.port_name),
        SerialPortType::Unknown => port.port_name.clone(),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose);

    let ports = serialport::available_ports()?;
    tracing::debug!("Found {} ports", ports.len());
    if ports.is_empty() {
        println!("No serial ports found");
    }
    ports.iter().for_each(|p| println!("{}", describe(p)));
    Ok(())
}
