//! E22 register query utility
//! Puts the module into configuration mode, reads its registers and prints them

use e22_config::device::{Mode, ModePins, Module, ModuleConfig};
use embedded_hal::digital::OutputPin;
use e22_config::format::{dump_frame, RegisterSnapshot};
use e22_config::serial::{SerialPort, Transport};
use std::env;
use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter};

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} <port> [<m0_gpio> <m1_gpio>] [--json <file>]", program);
    eprintln!("Example: {} /dev/ttyS0 22 27 --json module.json", program);
    eprintln!("\nWithout GPIO numbers the M0/M1 pins are assumed to be wired");
    eprintln!("for configuration mode already.");
    std::process::exit(1);
}

struct Args {
    config: ModuleConfig,
    json: Option<String>,
}

fn parse_args() -> anyhow::Result<Args> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("e22-query");

    let mut positional = Vec::new();
    let mut json = None;
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => match iter.next() {
                Some(path) => json = Some(path.clone()),
                None => usage(program),
            },
            "-h" | "--help" => usage(program),
            _ => positional.push(arg.as_str()),
        }
    }

    let mut config = match positional.as_slice() {
        [port] | [port, _, _] => ModuleConfig::new(*port),
        _ => usage(program),
    };
    if let [_, m0, m1] = positional.as_slice() {
        config = config.with_gpio(m0.parse()?, m1.parse()?);
    }

    Ok(Args { config, json })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let format_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(format_layer)
        .init();

    let args = parse_args()?;
    let config = args.config;

    tracing::info!("E22 Register Query");
    tracing::info!("Port: {}", config.port);

    let mut port = SerialPort::open(&config.port, config.serial.clone())?;
    port.clear_input()?;

    match config.gpio_pins() {
        Some((m0, m1)) => {
            tracing::info!("Mode pins: M0=gpio{} M1=gpio{}", m0, m1);
            let pins = ModePins::sysfs(m0, m1)?;
            query(Module::new(port, pins).with_settle(config.settle), args.json.as_deref()).await
        }
        None => {
            let pins = ModePins::strapped();
            query(Module::new(port, pins).with_settle(config.settle), args.json.as_deref()).await
        }
    }
}

async fn query<T: Transport, M0: OutputPin, M1: OutputPin>(
    mut module: Module<T, M0, M1>,
    json: Option<&str>,
) -> anyhow::Result<()> {
    module.enter_mode(Mode::Configuration).await?;

    let result = read_and_report(&mut module, json).await;

    // Hand the module back to normal operation even when the query failed
    if let Err(e) = module.enter_mode(Mode::Transparent).await {
        tracing::warn!("Failed to restore transparent mode: {}", e);
    }

    result
}

async fn read_and_report<T: Transport, M0: OutputPin, M1: OutputPin>(
    module: &mut Module<T, M0, M1>,
    json: Option<&str>,
) -> anyhow::Result<()> {
    let frame = module.read_configuration().await?;
    println!("{}", dump_frame(&frame));

    match module.read_pid().await {
        Ok(pid) => println!("PID: {:02X?}", pid),
        Err(e) => tracing::warn!("Could not read product information: {}", e),
    }

    if let Some(path) = json {
        let snapshot = RegisterSnapshot::from_frame(&frame)?;
        snapshot.save_json(path)?;
        tracing::info!("Saved register snapshot to: {}", path);
    }

    Ok(())
}
