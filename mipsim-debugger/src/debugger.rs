use mipsim_simulator::Processor;
use std::io;
use std::io::{BufRead, Write};

pub struct Debugger {
    pub processor: Processor,
    pub trace: bool,
}

impl Debugger {
    pub fn new(processor: Processor) -> Self {
        Self {
            processor,
            trace: false,
        }
    }

    /// Read commands from stdin until the session ends
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();

        loop {
            print!("(mipsim) ");
            io::stdout().flush()?;

            let line = match lines.next() {
                Some(line) => line?,
                None => break,
            };

            if !self.run_command(&line) {
                break;
            }
        }

        Ok(())
    }

    /// Run a command. Returns true if the session should continue, else false.
    pub fn run_command(&mut self, command: &str) -> bool {
        let command: Vec<_> = command.trim().split(' ').collect();

        match command.as_slice() {
            ["trace", enabled] => match *enabled {
                "on" => {
                    self.trace = true;
                    eprintln!("Instruction tracing is ON");
                }
                "off" => {
                    self.trace = false;
                    eprintln!("Instruction tracing is OFF");
                }
                _ => eprintln!("Unknown input"),
            },
            ["step"] | ["s"] => return self.step_once(),
            ["run"] => {
                let step_limit = self.processor.config().step_limit;

                while self.processor.running {
                    if self.processor.stats().instructions_executed >= step_limit {
                        eprintln!("Step limit of {} instructions reached", step_limit);
                        break;
                    }
                    if !self.step_once() {
                        return false;
                    }
                }
            }
            ["state"] => eprintln!("{}", self.processor.dump_state()),
            ["memory", address, length] => self.dump_memory(address, length),
            ["exit"] => return false,
            _ => eprintln!("Unknown input"),
        }

        true
    }

    /// Execute one instruction. Returns false if the session should end.
    fn step_once(&mut self) -> bool {
        if self.trace {
            match self.processor.peek_instruction() {
                Ok(instruction) => eprintln!(
                    "0x{:08x}: {}",
                    self.processor.program_counter(),
                    instruction
                ),
                Err(error) => {
                    eprintln!("Error: {}", error);
                    return false;
                }
            }
        }

        if let Err(error) = self.processor.step() {
            eprintln!("Error: {}", error);
            return false;
        }

        if !self.processor.running {
            eprintln!("Program halted");
            return false;
        }

        true
    }

    fn dump_memory(&mut self, address: &str, length: &str) {
        let address = u32::from_str_radix(address.trim_start_matches("0x"), 16);
        let length = length.parse::<usize>();

        match (address, length) {
            (Ok(address), Ok(length)) => match self.processor.dump_memory(address, length) {
                Ok(dump) => eprint!("{}", dump),
                Err(error) => eprintln!("Error: {}", error),
            },
            _ => eprintln!("Usage: memory <hex-address> <length>"),
        }
    }
}
