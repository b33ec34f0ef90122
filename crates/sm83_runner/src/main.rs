use anyhow::Context;
use sm83_runner::{RunConfig, Runner};

const USAGE: &str = "Usage: sm83_runner <rom_path> [max_cycles] [--trace]";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut trace = false;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--trace" => trace = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let Some(rom_path) = positional.next() else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };
    let max_cycles = match positional.next() {
        Some(value) => value
            .parse()
            .with_context(|| format!("invalid max_cycles '{value}'"))?,
        None => sm83_runner::DEFAULT_MAX_CYCLES,
    };

    let rom =
        std::fs::read(&rom_path).with_context(|| format!("failed to read ROM '{rom_path}'"))?;
    log::info!("Running '{}' ({} bytes)", rom_path, rom.len());

    let config = RunConfig::builder()
        .max_cycles(max_cycles)
        .trace(trace)
        .build();
    let report = Runner::new(&rom)
        .run(&config)
        .with_context(|| format!("CPU stopped while running '{rom_path}'"))?;

    print!("{}", report.serial);
    if !report.serial.is_empty() && !report.serial.ends_with('\n') {
        println!();
    }
    println!(
        "{}: {} after {} steps / {} cycles",
        rom_path, report.outcome, report.steps, report.cycles
    );

    if !report.outcome.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
