use std::path::PathBuf;

use once_cell::sync::OnceCell;
use sm83::{Bus, CpuError};

use super::*;

/// Build a 32 KiB ROM image with code blocks at the given addresses.
fn rom(blocks: &[(u16, &[u8])]) -> Vec<u8> {
    let mut image = vec![0u8; ROM_SIZE];
    for (addr, bytes) in blocks {
        let start = *addr as usize;
        image[start..start + bytes.len()].copy_from_slice(bytes);
    }
    image
}

/// Prints the NUL-terminated string at 0x0111 over serial, then spins.
fn serial_printer(message: &[u8]) -> Vec<u8> {
    #[rustfmt::skip]
    let code: &[u8] = &[
        0x21, 0x11, 0x01, // 0100 LD HL,$0111
        0x2A,             // 0103 LD A,(HL+)
        0xB7,             // 0104 OR A
        0x28, 0x08,       // 0105 JR Z,$010F
        0xE0, 0x01,       // 0107 LDH ($01),A
        0x3E, 0x81,       // 0109 LD A,$81
        0xE0, 0x02,       // 010B LDH ($02),A
        0x18, 0xF4,       // 010D JR $0103
        0x18, 0xFE,       // 010F JR $010F
    ];
    let mut text = message.to_vec();
    text.push(0);
    rom(&[(0x0100, code), (0x0111, &text)])
}

fn quick() -> RunConfig {
    RunConfig::builder().max_cycles(200_000).build()
}

#[test]
fn config_defaults() {
    let config = RunConfig::default();
    assert_eq!(config.max_cycles, DEFAULT_MAX_CYCLES);
    assert!(!config.trace);
    assert!(config.stop_on_serial);
}

#[test]
fn serial_passed_line_ends_the_run() {
    let mut runner = Runner::new(&serial_printer(b"cpu test\nPassed\n"));
    let report = runner.run(&quick()).expect("run");
    assert_eq!(report.outcome, Outcome::Passed);
    assert_eq!(report.serial, "cpu test\nPassed\n");
    assert_eq!(runner.bus().serial_output(), b"cpu test\nPassed\n");
    assert!(report.cycles < 200_000);
}

#[test]
fn serial_failed_line_is_a_failure() {
    let mut runner = Runner::new(&serial_printer(b"Failed #3\n"));
    let report = runner.run(&quick()).expect("run");
    assert_eq!(report.outcome, Outcome::Failed);
    assert!(!report.outcome.is_success());
}

#[test]
fn serial_stop_can_be_disabled() {
    let mut runner = Runner::new(&serial_printer(b"Passed\n"));
    let config = RunConfig::builder()
        .max_cycles(50_000)
        .stop_on_serial(false)
        .build();
    let report = runner.run(&config).expect("run");
    assert_eq!(report.outcome, Outcome::Timeout);
    assert_eq!(report.serial, "Passed\n");
    assert!(report.cycles >= 50_000);
}

#[test]
fn serial_outcome_waits_for_a_complete_line() {
    assert_eq!(serial_outcome(b""), None);
    assert_eq!(serial_outcome(b"Pass"), None);
    assert_eq!(serial_outcome(b"Passed"), None);
    assert_eq!(serial_outcome(b"01-special\n\n\nPassed\n"), Some(Outcome::Passed));
    assert_eq!(serial_outcome(b"Passed all tests\n"), Some(Outcome::Passed));
    assert_eq!(serial_outcome(b"Failed #2\n"), Some(Outcome::Failed));
    assert_eq!(serial_outcome(b"Failed\n\n"), Some(Outcome::Failed));
    assert_eq!(serial_outcome(b"running\n"), None);
}

#[rustfmt::skip]
const FIBONACCI: &[u8] = &[
    0x06, 3,  // LD B,3
    0x0E, 5,  // LD C,5
    0x16, 8,  // LD D,8
    0x1E, 13, // LD E,13
    0x26, 21, // LD H,21
    0x2E, 34, // LD L,34
];

#[test]
fn mooneye_pass_signature() {
    let mut code = FIBONACCI.to_vec();
    code.push(0x40); // LD B,B
    let mut runner = Runner::new(&rom(&[(0x0100, &code)]));
    let report = runner.run(&quick()).expect("run");
    assert_eq!(report.outcome, Outcome::Passed);
    assert_eq!(report.steps, 6);
    assert_eq!(runner.cpu().registers().pc(), 0x010C);
}

#[test]
fn mooneye_fail_signature() {
    #[rustfmt::skip]
    let code: &[u8] = &[
        0x06, 0x42, 0x48, 0x50, 0x58, 0x60, 0x68, // B=$42, LD C,B .. LD L,B
        0x40,
    ];
    let mut runner = Runner::new(&rom(&[(0x0100, code)]));
    let report = runner.run(&quick()).expect("run");
    assert_eq!(report.outcome, Outcome::Failed);
}

#[test]
fn plain_ld_b_b_is_not_a_result() {
    // LD B,B with post-boot registers, then spin.
    let mut runner = Runner::new(&rom(&[(0x0100, &[0x40, 0x18, 0xFE])]));
    let report = runner.run(&RunConfig::builder().max_cycles(1_000).build()).expect("run");
    assert_eq!(report.outcome, Outcome::Timeout);
}

#[test]
fn illegal_opcode_aborts_with_cpu_error() {
    let mut runner = Runner::new(&rom(&[(0x0100, &[0x00, 0xD3])]));
    let err = runner.run(&quick()).expect_err("must lock");
    assert_eq!(
        err.downcast_ref::<CpuError>(),
        Some(&CpuError::IllegalOpcode {
            opcode: 0xD3,
            pc: 0x0101
        })
    );
    assert!(runner.cpu().is_locked());
}

#[test]
fn timer_interrupt_wakes_halt_and_returns() {
    #[rustfmt::skip]
    let main: &[u8] = &[
        0x3E, 0x04, // 0100 LD A,$04
        0xE0, 0xFF, // 0102 LDH ($FF),A   IE = timer
        0x3E, 0xF0, // 0104 LD A,$F0
        0xE0, 0x05, // 0106 LDH ($05),A   TIMA = $F0
        0x3E, 0x05, // 0108 LD A,$05
        0xE0, 0x07, // 010A LDH ($07),A   TAC = enabled, 16 cycles
        0xFB,       // 010C EI
        0x76,       // 010D HALT
        0x40,       // 010E LD B,B
    ];
    let mut handler = FIBONACCI.to_vec();
    handler.push(0xD9); // RETI
    let mut runner = Runner::new(&rom(&[(0x0100, main), (0x0050, &handler)]));

    let report = runner.run(&quick()).expect("run");
    assert_eq!(report.outcome, Outcome::Passed);
    assert_eq!(runner.cpu().registers().pc(), 0x010E);
    assert!(runner.cpu().ime());
    assert_eq!(runner.bus_mut().read8(0xFF0F) & 0x04, 0);
    // 16 increments of 16 cycles overflow TIMA once; TMA is 0.
    assert!(report.cycles >= 256);
}

#[test]
fn trace_mode_runs_the_same_program() {
    let mut runner = Runner::new(&serial_printer(b"Passed\n"));
    let config = RunConfig::builder().max_cycles(200_000).trace(true).build();
    let report = runner.run(&config).expect("run");
    assert_eq!(report.outcome, Outcome::Passed);
}

static BLARGG_DIR: OnceCell<Option<PathBuf>> = OnceCell::new();

/// Locate blargg's `cpu_instrs/individual` ROMs, from the workspace root or
/// the crate directory.
fn blargg_dir() -> Option<&'static PathBuf> {
    BLARGG_DIR
        .get_or_init(|| {
            let candidates = [
                PathBuf::from("assets/roms/gb_tests/blargg/cpu_instrs/individual"),
                PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                    .join("../../assets/roms/gb_tests/blargg/cpu_instrs/individual"),
            ];
            candidates.into_iter().find(|path| path.is_dir())
        })
        .as_ref()
}

#[test]
#[ignore = "needs blargg cpu_instrs ROMs under assets/"]
fn blargg_cpu_instrs_individual() {
    let dir = blargg_dir().expect("blargg cpu_instrs/individual directory not found");
    let mut roms: Vec<PathBuf> = std::fs::read_dir(dir)
        .expect("read ROM directory")
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "gb"))
        .collect();
    roms.sort();
    assert!(!roms.is_empty(), "no .gb files in {}", dir.display());

    let mut failures = Vec::new();
    for path in &roms {
        let data = std::fs::read(path).expect("read ROM");
        let report = Runner::new(&data)
            .run(&RunConfig::default())
            .unwrap_or_else(|err| panic!("{}: {err:#}", path.display()));
        if !report.outcome.is_success() {
            failures.push(format!("{}: {}\n{}", path.display(), report.outcome, report.serial));
        }
    }
    assert!(failures.is_empty(), "{}", failures.join("\n"));
}
