use breadboard::circuits::{build_computer, Computer};
use breadboard::config::SimConfig;
use breadboard::netlist::Netlist;
use breadboard::programs::Program;
use breadboard::sim::{LatchMode, Simulator};

fn computer(program: Program) -> (Simulator, Computer) {
    computer_with(program, SimConfig::default())
}

fn computer_with(program: Program, config: SimConfig) -> (Simulator, Computer) {
    let mut netlist = Netlist::new();
    let computer = build_computer(&mut netlist).unwrap();
    let mut sim = Simulator::new(netlist, config);
    sim.load_program(program);
    (sim, computer)
}

/// Runs until the clock halts or `max_ticks` ticks pass, returns the values shown and whether
/// it halted.
fn run(sim: &mut Simulator, max_ticks: usize) -> (Vec<u8>, bool) {
    let mut shown = Vec::new();
    for _ in 0..max_ticks {
        let tick = sim.step().unwrap();
        shown.extend(tick.output);
        if tick.halted {
            return (shown, true);
        }
    }
    (shown, false)
}

#[test]
fn test_fibonacci() {
    let (mut sim, _) = computer(Program::Fibonacci);
    let (shown, halted) = run(&mut sim, 2000);
    assert_eq!(
        shown,
        vec![0, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144, 233]
    );
    assert!(halted);
    assert_eq!(sim.clock().state(), false);

    // A halted clock stays put.
    let tick = sim.step().unwrap();
    assert_eq!(tick.toggled, false);
    assert_eq!(sim.machine().display_value(), 233);
}

#[test]
fn test_add() {
    let (mut sim, _) = computer(Program::Add);
    assert_eq!(run(&mut sim, 200), (vec![6], true));
}

#[test]
fn test_multiples_of_three() {
    let (mut sim, _) = computer(Program::MultiplesOfThree);
    let (shown, halted) = run(&mut sim, 400);
    assert!(!halted);
    assert_eq!(&shown[..5], &[3, 6, 9, 12, 15]);
}

#[test]
fn test_conditionals() {
    let (mut sim, _) = computer(Program::Conditionals);
    let (shown, halted) = run(&mut sim, 1000);
    assert!(!halted);
    // 240 + 20 carries and clamps to 255, the count goes down from there.
    assert_eq!(
        &shown[..16],
        &[0, 20, 40, 60, 80, 100, 120, 140, 160, 180, 200, 220, 240, 235, 215, 195]
    );
}

#[test]
fn test_multiply() {
    let config = SimConfig {
        ram_fix_mode: false,
        ..Default::default()
    };
    let (mut sim, _) = computer_with(Program::Multiply, config);
    assert_eq!(run(&mut sim, 2000), (vec![8], true));
}

#[test]
fn test_multiply_with_ram_fix_never_ends() {
    // Storing 0 into the loop counter is dropped, so the loop never ends.
    let (mut sim, _) = computer(Program::Multiply);
    assert_eq!(run(&mut sim, 1500), (vec![], false));
    assert_eq!(sim.ram(14), Some(1));
}

#[test]
fn test_settled_circuit_is_a_fixed_point() {
    let (mut sim, computer) = computer(Program::Fibonacci);
    for _ in 0..37 {
        sim.step().unwrap();
    }
    let machine = sim.machine().clone();
    let bus = computer.bus.value(sim.netlist());
    let a = computer.a.value(sim.netlist());

    assert_eq!(sim.resimulate(), Ok(false));
    assert_eq!(sim.settle(), Ok(1));
    assert_eq!(sim.machine(), &machine);
    assert_eq!(computer.bus.value(sim.netlist()), bus);
    assert_eq!(computer.a.value(sim.netlist()), a);
}

#[test]
fn test_halt_outlasts_resume() {
    let (mut sim, _) = computer(Program::Add);
    assert_eq!(run(&mut sim, 200).1, true);

    // HLT is still decoded, so the clock halts again on the next tick.
    sim.load_program(Program::Add);
    sim.clock_mut().resume();
    sim.clock_mut().set_speed(1);
    let tick = sim.step().unwrap();
    assert_eq!(tick.toggled, false);
    assert!(tick.halted);
}

#[test]
fn test_ram_edit_is_seen_by_the_machine() {
    let (mut sim, _) = computer(Program::Add);
    // 2 + 5 instead of 2 + 4.
    assert_eq!(sim.poke_ram_bit(15, 7), Some(true));
    assert_eq!(run(&mut sim, 200), (vec![7], true));
}

#[test]
fn test_level_sensitive_latches_still_fetch() {
    let mut netlist = Netlist::new();
    let computer = build_computer(&mut netlist).unwrap();
    let config = SimConfig {
        latch_mode: LatchMode::LevelSensitive,
        ..Default::default()
    };
    let mut sim = Simulator::new(netlist, config);
    sim.load_program(Program::Add);
    sim.settle().unwrap();
    // MI is high on the first micro step, the address register follows the bus right away.
    assert_eq!(computer.mar.value(sim.netlist()), 0);
    assert_eq!(sim.machine().control_word().to_string(), "MI CO");
}
