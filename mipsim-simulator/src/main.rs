use mipsim_simulator::config::Config;
use mipsim_simulator::hex::HexProgram;
use mipsim_simulator::Processor;
use std::error::Error;
use std::path::PathBuf;
use structopt::StructOpt;

#[macro_use]
extern crate log;

/// A MIPS processor simulator
#[derive(StructOpt)]
struct CliArgs {
    /// Memory size in bytes
    #[structopt(long, short = "m", default_value = "16777216")]
    memory_size: usize,

    /// Stop a runaway program after this many executed instructions
    #[structopt(long, default_value = "100000")]
    step_limit: u64,

    /// Print the processor state after the program halts
    #[structopt(long)]
    dump_state: bool,

    /// Program file: one 32-bit instruction word per line, in hex
    #[structopt(parse(from_os_str))]
    file_path: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = CliArgs::from_args();

    let program = HexProgram::from_path(&args.file_path)?;
    if program.words.is_empty() {
        warn!("{} contains no instructions", args.file_path.display());
    }
    info!("Loaded {} instruction words", program.words.len());

    let mut processor = Processor::new(Config {
        memory_size: args.memory_size,
        step_limit: args.step_limit,
        ..Config::default()
    });
    processor.load_program(&program.words)?;

    processor.run()?;

    if args.dump_state {
        println!("{}", processor.dump_state());
    }

    Ok(())
}
