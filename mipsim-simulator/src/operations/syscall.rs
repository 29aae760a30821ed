use crate::processor::ProcessorError;
use crate::Processor;
use mipsim_types::constants::*;
use std::io;
use std::io::Write;

impl Processor {
    /// Handle a syscall operation
    pub(crate) fn op_syscall(&mut self) -> Result<(), ProcessorError> {
        match self.registers.get(REG_V0) {
            SYSCALL_PRINT_INT => self.syscall_print_int()?,
            SYSCALL_PRINT_STR => self.syscall_print_str()?,
            SYSCALL_EXIT => self.syscall_exit(),
            SYSCALL_PRINT_CHAR => self.syscall_print_char()?,
            operation => return Err(ProcessorError::UnknownSyscall(operation)),
        }

        self.advance_program_counter();
        Ok(())
    }

    /// Print an integer
    fn syscall_print_int(&mut self) -> Result<(), ProcessorError> {
        trace!("PRINT_INT");
        let value = self.registers.get(REG_A0) as i32;
        Self::print(value.to_string().as_bytes())
    }

    /// Print a null-terminated string
    fn syscall_print_str(&mut self) -> Result<(), ProcessorError> {
        trace!("PRINT_STR");
        let address = self.registers.get(REG_A0);

        // Pending stores must be visible before reading memory directly
        self.cache.flush(&mut self.memory)?;
        let bytes = self.memory.read_str(address)?;

        Self::print(&bytes)
    }

    /// Print a single character
    fn syscall_print_char(&mut self) -> Result<(), ProcessorError> {
        trace!("PRINT_CHAR");
        let value = self.registers.get(REG_A0);
        Self::print(&[value as u8])
    }

    /// Halt the processor
    fn syscall_exit(&mut self) {
        trace!("EXIT");
        self.running = false;
    }

    fn print(bytes: &[u8]) -> Result<(), ProcessorError> {
        let stdout = io::stdout();
        let mut stdout = stdout.lock();
        stdout.write_all(bytes)?;
        stdout.flush()?;
        Ok(())
    }
}
