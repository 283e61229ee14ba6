/*!
 * tinyheap - Driver
 *
 * Runs a sequence of heap operations given on the command line and prints
 * the outcome of each one:
 *
 *   tinyheap alloc:2 alloc:128 free:0 dump
 *
 * Operations:
 * - alloc:<bytes>   allocate, printing the address or "null"
 * - free:<address>  free the block starting at address
 * - dump            print the address-ordered block report
 * - stats           print usage statistics
 * - teardown        release the arena
 * - init:<bytes>    reinitialize with a new size
 */

use miette::{miette, IntoDiagnostic, Result};
use serde_json::json;
use std::str::FromStr;
use tinyheap::core::types::{Address, ByteCount, Size};
use tinyheap::{init_tracing, span_operation, Heap, HeapConfig};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Alloc(ByteCount),
    Free(Address),
    Dump,
    Stats,
    Teardown,
    Init(Size),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Alloc(_) => "alloc",
            Command::Free(_) => "free",
            Command::Dump => "dump",
            Command::Stats => "stats",
            Command::Teardown => "teardown",
            Command::Init(_) => "init",
        }
    }
}

impl FromStr for Command {
    type Err = miette::Report;

    fn from_str(s: &str) -> Result<Self> {
        let (op, arg) = match s.split_once(':') {
            Some((op, arg)) => (op, Some(arg)),
            None => (s, None),
        };

        match (op, arg) {
            ("alloc", _) => Ok(Command::Alloc(
                required(op, arg, "byte count")?.parse::<ByteCount>().into_diagnostic()?,
            )),
            ("free", _) => Ok(Command::Free(
                required(op, arg, "address")?.parse::<Address>().into_diagnostic()?,
            )),
            ("init", _) => Ok(Command::Init(
                required(op, arg, "size")?.parse::<Size>().into_diagnostic()?,
            )),
            ("dump", None) => Ok(Command::Dump),
            ("stats", None) => Ok(Command::Stats),
            ("teardown", None) => Ok(Command::Teardown),
            _ => Err(miette!("Unknown operation '{}'", s)),
        }
    }
}

fn required<'a>(op: &str, arg: Option<&'a str>, what: &str) -> Result<&'a str> {
    arg.ok_or_else(|| miette!("'{}' needs a {} argument, e.g. {}:16", op, what, op))
}

fn run(heap: &mut Heap, command: Command, json_output: bool) -> Result<()> {
    let span = span_operation(command.name());
    let _entered = span.enter();

    let outcome = execute(heap, command, json_output);
    match &outcome {
        Ok(()) => span.record_result(true),
        Err(e) => span.record_error(&e.to_string()),
    }
    outcome
}

fn execute(heap: &mut Heap, command: Command, json_output: bool) -> Result<()> {
    match command {
        Command::Alloc(nb_bytes) => {
            let address = heap.allocate(nb_bytes)?;
            if json_output {
                println!("{}", json!({ "op": "alloc", "bytes": nb_bytes, "address": address }));
            } else {
                match address {
                    Some(addr) => println!("alloc {} -> @{}", nb_bytes, addr),
                    None => println!("alloc {} -> null", nb_bytes),
                }
            }
        }
        Command::Free(address) => {
            heap.free(address)?;
            if json_output {
                println!("{}", json!({ "op": "free", "address": address }));
            } else {
                println!("free @{}", address);
            }
        }
        Command::Dump => {
            let report = heap.inspect()?;
            if json_output {
                println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
            } else {
                println!("{}", report);
            }
        }
        Command::Stats => {
            let stats = heap.stats();
            if json_output {
                println!("{}", serde_json::to_string_pretty(&stats).into_diagnostic()?);
            } else {
                println!(
                    "{} / {} bytes allocated ({:.1}%, pressure {}), {} free blocks, largest {} bytes, fragmentation {:.2}",
                    stats.allocated_bytes,
                    stats.total_size,
                    stats.usage_percentage,
                    stats.memory_pressure(),
                    stats.free_blocks,
                    stats.largest_free_block,
                    stats.fragmentation()
                );
            }
        }
        Command::Teardown => heap.teardown(),
        Command::Init(size) => heap.reinitialize(size),
    }
    Ok(())
}

fn main() -> Result<()> {
    let config = HeapConfig::from_env()?;
    init_tracing(config.trace_json);

    let commands = std::env::args()
        .skip(1)
        .map(|arg| arg.parse::<Command>())
        .collect::<Result<Vec<_>>>()?;

    info!(size = config.size, operations = commands.len(), "tinyheap starting");

    let mut heap = Heap::from_config(&config);
    for command in commands {
        run(&mut heap, command, config.json_output)?;
    }

    Ok(())
}
