use crate::cache::{Cache, CacheStats};
use crate::config::Config;
use crate::instruction::Instruction;
use crate::memory::{Memory, MemoryError};
use crate::registers::Registers;
use mipsim_types::constants::*;
use std::fmt;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// A MIPS processor
#[derive(Debug)]
pub struct Processor {
    pub(crate) config: Config,
    pub(crate) registers: Registers,
    pub(crate) program_counter: u32,
    pub(crate) memory: Memory,
    pub(crate) cache: Cache,
    pub(crate) stats: ProcessorStats,
    pub running: bool,
}

impl Processor {
    pub fn new(config: Config) -> Self {
        let mut processor = Processor {
            registers: Registers::new(),
            program_counter: config.text_offset,
            memory: Memory::with_size(config.memory_size),
            cache: Cache::new(),
            stats: ProcessorStats::default(),
            running: true,
            config,
        };

        // The stack grows down from the last word of memory
        let stack_start = (processor.memory.size() as u32).saturating_sub(4) & !3;
        processor.registers.set(REG_SP, stack_start);

        processor
    }

    /// Write the program into the text segment and reset the program counter
    pub fn load_program(&mut self, words: &[u32]) -> Result<(), MemoryError> {
        info!(
            "Loading {} instruction words at 0x{:08x}",
            words.len(),
            self.config.text_offset
        );

        for (i, word) in words.iter().enumerate() {
            let address = self.config.text_offset + (i * 4) as u32;
            trace!("0x{:08x} <- 0x{:08x}", address, word);
            self.memory.write_word(address, *word)?;
        }

        self.program_counter = self.config.text_offset;
        Ok(())
    }

    /// Fetch the instruction at the program counter, through the cache
    pub fn fetch_instruction(&mut self) -> Result<Instruction, MemoryError> {
        let word = self.cache.read_word(&mut self.memory, self.program_counter)?;
        Ok(Instruction(word))
    }

    /// The instruction at the program counter, read from memory without
    /// touching the cache or its statistics. Stores still sitting in the
    /// cache are not visible here.
    pub fn peek_instruction(&self) -> Result<Instruction, MemoryError> {
        let word = self.memory.read_word(self.program_counter)?;
        Ok(Instruction(word))
    }

    /// Fetch and execute one instruction
    pub fn step(&mut self) -> Result<(), ProcessorError> {
        let instruction = self.fetch_instruction()?;
        trace!("0x{:08x}: {}", self.program_counter, instruction);

        self.execute(instruction)?;
        self.stats.instructions_executed += 1;
        Ok(())
    }

    /// Execute instructions until the program halts or the step limit is hit
    pub fn run(&mut self) -> Result<(), ProcessorError> {
        while self.running {
            if self.stats.instructions_executed >= self.config.step_limit {
                warn!(
                    "Stopping after {} executed instructions",
                    self.stats.instructions_executed
                );
                break;
            }

            self.step()?;
        }

        Ok(())
    }

    pub fn execute(&mut self, instruction: Instruction) -> Result<(), ProcessorError> {
        match instruction.op_code() {
            OP_R_TYPE => match instruction.function() {
                FUNCTION_SLL => self.op_sll(instruction),
                FUNCTION_SRL => self.op_srl(instruction),
                FUNCTION_JR => self.op_jr(instruction),
                FUNCTION_SYSCALL => self.op_syscall()?,
                FUNCTION_ADD => self.op_add(instruction),
                FUNCTION_SUB => self.op_sub(instruction),
                FUNCTION_AND => self.op_and(instruction),
                FUNCTION_OR => self.op_or(instruction),
                FUNCTION_SLT => self.op_slt(instruction),
                _ => return Err(ProcessorError::InvalidInstruction(instruction.0)),
            },
            OP_J => self.op_j(instruction),
            OP_JAL => self.op_jal(instruction),
            OP_BEQ => self.op_beq(instruction),
            OP_BNE => self.op_bne(instruction),
            OP_ADDI => self.op_addi(instruction),
            OP_SLTI => self.op_slti(instruction),
            OP_LW => self.op_lw(instruction)?,
            OP_SW => self.op_sw(instruction)?,
            _ => return Err(ProcessorError::InvalidInstruction(instruction.0)),
        }

        Ok(())
    }

    pub(crate) fn advance_program_counter(&mut self) {
        self.program_counter = self.program_counter.wrapping_add(4);
    }

    pub(crate) fn jump_to(&mut self, address: u32) {
        self.program_counter = address;
        self.stats.branches_taken += 1;
    }

    /// Get the value of a register
    pub fn register(&self, register: u8) -> u32 {
        self.registers.get(register)
    }

    pub fn program_counter(&self) -> u32 {
        self.program_counter
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stats(&self) -> &ProcessorStats {
        &self.stats
    }

    pub fn cache_stats(&self) -> &CacheStats {
        self.cache.stats()
    }

    /// Read a memory word, flushing the cache first so stores are visible
    pub fn read_memory(&mut self, address: u32) -> Result<u32, MemoryError> {
        self.cache.flush(&mut self.memory)?;
        self.memory.read_word(address)
    }

    /// Write a memory word through the cache
    pub fn write_memory(&mut self, address: u32, value: u32) -> Result<(), MemoryError> {
        self.cache.write_word(&mut self.memory, address, value)
    }

    /// Dump a memory range, flushing the cache first so stores are visible
    pub fn dump_memory(&mut self, start: u32, length: usize) -> Result<String, MemoryError> {
        self.cache.flush(&mut self.memory)?;
        Ok(self.memory.dump(start, length))
    }

    /// Render the program counter, registers, and statistics
    pub fn dump_state(&self) -> String {
        let mut result = String::new();

        result.push_str("=== Processor state ===\n");
        result.push_str(&format!("PC: 0x{:08x}\n", self.program_counter));
        result.push_str(&format!("HI: 0x{:08x}\n", self.registers.hi_register));
        result.push_str(&format!("LO: 0x{:08x}\n", self.registers.lo_register));
        result.push_str("\n=== Registers ===\n");

        for register in 0..32u8 {
            let value = self.registers.get(register);
            result.push_str(&format!(
                "{}: 0x{:08x} ({})\n",
                REGISTER_NAMES[register as usize], value, value as i32
            ));
        }

        result.push_str(&format!("\n=== Statistics ===\n{}\n", self.stats));
        result.push_str(&format!("\n=== Cache ===\n{}\n", self.cache.stats()));

        result
    }
}

/// Execution statistics
#[derive(Debug, Clone, Default)]
pub struct ProcessorStats {
    pub instructions_executed: u64,
    pub branches_taken: u64,
    pub loads_executed: u64,
    pub stores_executed: u64,
}

impl Display for ProcessorStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "instructions executed: {}", self.instructions_executed)?;
        writeln!(f, "branches taken: {}", self.branches_taken)?;
        writeln!(f, "loads executed: {}", self.loads_executed)?;
        write!(f, "stores executed: {}", self.stores_executed)
    }
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),
    #[error("invalid instruction 0x{0:08x}")]
    InvalidInstruction(u32),
    #[error("unknown syscall operation {0}")]
    UnknownSyscall(u32),
    #[error("i/o error during syscall: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
pub(crate) fn test_processor() -> Processor {
    Processor::new(Config {
        memory_size: 0x8000,
        text_offset: 0x1000,
        step_limit: 1000,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state() {
        let processor = test_processor();

        assert_eq!(processor.program_counter(), 0x1000);
        assert_eq!(processor.register(0), 0);
        assert_eq!(processor.register(REG_SP), 0x8000 - 4);
        assert!(processor.running);
    }

    #[test]
    fn load_program_resets_the_program_counter() {
        let mut processor = test_processor();
        processor.program_counter = 0x2000;

        processor.load_program(&[0x20080001, 0x0000000C]).unwrap();
        assert_eq!(processor.program_counter(), 0x1000);
        assert_eq!(processor.read_memory(0x1000).unwrap(), 0x20080001);
        assert_eq!(processor.read_memory(0x1004).unwrap(), 0x0000000C);
    }

    #[test]
    fn load_program_outside_memory_fails() {
        let mut processor = Processor::new(Config {
            memory_size: 0x1000,
            text_offset: 0x0FFC,
            step_limit: 1000,
        });

        assert!(processor.load_program(&[1, 2]).is_err());
    }

    #[test]
    fn invalid_op_code_is_an_error() {
        let mut processor = test_processor();

        match processor.execute(Instruction(0xFC000000)) {
            Err(ProcessorError::InvalidInstruction(0xFC000000)) => {}
            other => panic!("expected InvalidInstruction, got {:?}", other),
        }
    }

    #[test]
    fn invalid_function_code_is_an_error() {
        let mut processor = test_processor();

        assert!(matches!(
            processor.execute(Instruction(0x0000003F)),
            Err(ProcessorError::InvalidInstruction(_))
        ));
    }

    #[test]
    fn run_halts_on_exit_syscall() {
        let mut processor = test_processor();
        // addi $v0, $zero, 10; syscall
        processor.load_program(&[0x2002000A, 0x0000000C]).unwrap();

        processor.run().unwrap();
        assert!(!processor.running);
        assert_eq!(processor.stats().instructions_executed, 2);
    }

    #[test]
    fn run_respects_the_step_limit() {
        let mut processor = test_processor();
        // j back to the program start, forever
        processor.load_program(&[0x08000400]).unwrap();

        processor.run().unwrap();
        assert!(processor.running);
        assert_eq!(processor.stats().instructions_executed, 1000);
        assert_eq!(processor.stats().branches_taken, 1000);
    }

    #[test]
    fn fetch_outside_memory_is_an_error() {
        let mut processor = Processor::new(Config {
            memory_size: 0x1000,
            text_offset: 0x0FFC,
            step_limit: 1000,
        });
        // A single noop at the last word of memory
        processor.load_program(&[0x00000000]).unwrap();

        processor.step().unwrap();
        assert!(matches!(
            processor.step(),
            Err(ProcessorError::Memory(MemoryError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn dump_state_lists_registers_and_stats() {
        let processor = test_processor();
        let dump = processor.dump_state();

        assert!(dump.contains("PC: 0x00001000"));
        assert!(dump.contains("$sp: 0x00007ffc"));
        assert!(dump.contains("instructions executed: 0"));
        assert!(dump.contains("hit rate: 0.00%"));
    }
}
