//! LS-8 program runner.
//!
//! Loads a program written as one 8-digit binary literal per line and runs it to
//! completion.
//!
//! # Usage
//! ```text
//! ls8 <program.ls8> [OPTIONS]
//! ```
//!
//! # Options
//! - `-t, --trace`: Print machine state before every instruction (also `LS8_TRACE=1`)
//! - `-q, --quiet-log`: Drop timestamps and level tags from log lines
//!
//! # Exit status
//! `0` when the program halts, `1` on usage or load errors and on faults.

use ls8::virtual_machine::output::StdOutput;
use ls8::virtual_machine::program::Program;
use ls8::virtual_machine::vm::{RunState, VM};
use ls8::{error, info, utils, warn};
use std::env;
use std::process;

/// Environment variable that turns tracing on without the flag.
const TRACE_ENV: &str = "LS8_TRACE";

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage(&args[0]);
        process::exit(if args.len() < 2 { 1 } else { 0 });
    }

    let program_path = &args[1];
    let mut trace = env::var(TRACE_ENV).is_ok_and(|v| v == "1" || v == "true");

    for arg in &args[2..] {
        match arg.as_str() {
            "--trace" | "-t" => trace = true,
            "--quiet-log" | "-q" => utils::log::set_plain(),
            other => {
                error!("Unexpected argument: {}\n", other);
                print_usage(&args[0]);
                process::exit(1);
            }
        }
    }

    let program = Program::from_file(program_path).unwrap_or_else(|e| {
        error!("Failed to load {}: {}", program_path, e);
        process::exit(1);
    });
    if program.is_empty() {
        warn!("{} contains no instructions", program_path);
    }

    let mut vm = VM::new(program).with_trace(trace);
    match vm.run(&mut StdOutput) {
        Ok(RunState::Halted) => {
            if trace {
                info!("Halted after {} instructions", vm.steps());
            }
        }
        Ok(state) => {
            error!("Run ended in unexpected state {:?}", state);
            process::exit(1);
        }
        Err(e) if e.is_internal() => {
            error!("Interpreter bug: {}", e);
            process::exit(1);
        }
        Err(e) => {
            error!("Faulted after {} instructions: {}", vm.steps(), e);
            process::exit(1);
        }
    }
}

const USAGE: &str = "\
LS-8 Emulator

USAGE:
    {program} <program.ls8> [OPTIONS]

ARGS:
    <program.ls8>    Program file, one 8-digit binary literal per line

OPTIONS:
    -t, --trace        Print machine state before every instruction
    -q, --quiet-log    Drop timestamps and level tags from log lines
    -h, --help         Print this help message

ENVIRONMENT:
    LS8_TRACE=1        Same as --trace

EXAMPLES:
    {program} programs/mult.ls8
    {program} programs/call.ls8 --trace
";

fn print_usage(program: &str) {
    info!("{}", USAGE.replace("{program}", program));
}
