use crate::debugger::Debugger;
use mipsim_simulator::config::Config;
use mipsim_simulator::hex::HexProgram;
use mipsim_simulator::Processor;
use std::error::Error;
use std::path::PathBuf;
use structopt::StructOpt;

#[macro_use]
extern crate log;

mod debugger;

/// An interactive debugger for the MIPS simulator
#[derive(StructOpt)]
struct CliArgs {
    /// Memory size in bytes
    #[structopt(long, short = "m", default_value = "16777216")]
    memory_size: usize,

    /// Program file: one 32-bit instruction word per line, in hex
    #[structopt(parse(from_os_str))]
    file_path: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Setup logging and parse CLI args
    env_logger::init();
    let args = CliArgs::from_args();

    // Load the program
    let program = HexProgram::from_path(&args.file_path)?;
    info!("Loaded {} instruction words", program.words.len());

    // Setup the processor and debugger
    let mut processor = Processor::new(Config {
        memory_size: args.memory_size,
        ..Config::default()
    });
    processor.load_program(&program.words)?;
    let mut debugger = Debugger::new(processor);

    debugger.run()?;

    Ok(())
}
