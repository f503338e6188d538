use anyhow::{anyhow, Context, Result};
use breadboard::circuits::build_computer;
use breadboard::config::SimConfig;
use breadboard::netlist::Netlist;
use breadboard::programs::Program;
use breadboard::sim::{LatchMode, Simulator};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::info;

/// Runs a program on the breadboard computer and prints what it shows on the display
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// program to load, see --list
    #[arg(short, long)]
    program: Option<String>,

    /// maximum number of clock ticks
    #[arg(short, long, default_value_t = 100_000)]
    cycles: u64,

    /// YAML or JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// clock speed, 0 steps the clock manually once per tick
    #[arg(short, long)]
    speed: Option<u32>,

    /// let the RAM accept writes to address 0 and writes of 0
    #[arg(long)]
    no_ram_fix: bool,

    /// latches follow their input while write-enable is high
    #[arg(long)]
    level_latches: bool,

    /// write the netlist as a graphviz file
    #[arg(long)]
    dot: Option<PathBuf>,

    #[arg(long)]
    log_level: Option<String>,

    /// log a bus or register whenever it changes: bus, a, a_shadow, b or mar
    #[arg(long)]
    probe: Vec<String>,

    /// list the available programs
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.list {
        for program in Program::iter() {
            println!("{}", program);
        }
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => SimConfig::from_file(path)
            .with_context(|| format!("could not load config `{}`", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(speed) = args.speed {
        config.clock_speed = speed;
    }
    if args.no_ram_fix {
        config.ram_fix_mode = false;
    }
    if args.level_latches {
        config.latch_mode = LatchMode::LevelSensitive;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }
    let program = args
        .program
        .or_else(|| config.program.clone())
        .unwrap_or_else(|| Program::Fibonacci.to_string());
    let parsed: Program = program.parse().map_err(|_| {
        let known: Vec<_> = Program::iter().map(|p| p.to_string()).collect();
        anyhow!("unknown program `{}`, try one of {}", program, known.join(", "))
    })?;
    config.program = Some(program);
    config.validate().context("invalid configuration")?;
    breadboard::init_logging(&config.log_level);

    let mut netlist = Netlist::new();
    let computer = build_computer(&mut netlist).context("could not wire the computer")?;
    info!(
        terminals = netlist.terminal_count(),
        components = netlist.component_count(),
        connections = netlist.connection_count(),
        "Built computer"
    );
    if let Some(path) = &args.dot {
        netlist
            .dump_dot(path)
            .with_context(|| format!("could not write file `{}`", path.display()))?;
    }

    let running = Arc::new(AtomicBool::new(true));
    let handler_running = running.clone();
    ctrlc::set_handler(move || handler_running.store(false, Ordering::SeqCst))
        .context("could not set the Ctrl-C handler")?;

    let manual = config.clock_speed == 0;
    let mut sim = Simulator::new(netlist, config);
    for name in &args.probe {
        let terminals = computer
            .terminals(name)
            .ok_or_else(|| anyhow!("nothing named `{}` to probe", name))?;
        sim.probe(name.as_str(), terminals);
    }
    colour::cyan_ln!("Running {}", parsed);

    let mut ticks = 0;
    while ticks < args.cycles && running.load(Ordering::SeqCst) {
        let tick = sim.tick(manual)?;
        ticks += 1;
        if let Some(value) = tick.output {
            colour::green_ln!("{:>3}  {:08b}", value, value);
        }
        if tick.halted {
            colour::yellow_ln!("Halted after {} ticks", ticks);
            return Ok(());
        }
    }
    if running.load(Ordering::SeqCst) {
        colour::yellow_ln!("Stopped after {} ticks", ticks);
    } else {
        colour::yellow_ln!("Interrupted after {} ticks", ticks);
    }
    Ok(())
}
