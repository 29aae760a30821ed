use crate::instruction::Instruction;
use crate::math::add_unsigned;
use crate::processor::ProcessorError;
use crate::Processor;

impl Processor {
    /// Branch on equal
    pub(crate) fn op_beq(&mut self, instruction: Instruction) {
        let s_value = self.registers.get(instruction.s_register());
        let t_value = self.registers.get(instruction.t_register());

        if s_value == t_value {
            self.jump_to(self.branch_target(instruction));
        } else {
            self.advance_program_counter();
        }
    }

    /// Branch on not equal
    pub(crate) fn op_bne(&mut self, instruction: Instruction) {
        let s_value = self.registers.get(instruction.s_register());
        let t_value = self.registers.get(instruction.t_register());

        if s_value != t_value {
            self.jump_to(self.branch_target(instruction));
        } else {
            self.advance_program_counter();
        }
    }

    /// The target of a taken branch: the offset is in words, relative to
    /// the instruction after the branch
    fn branch_target(&self, instruction: Instruction) -> u32 {
        let offset = (instruction.immediate() as i32) << 2;
        add_unsigned(self.program_counter.wrapping_add(4), offset)
    }

    /// Add immediate. Overflows wrap
    pub(crate) fn op_addi(&mut self, instruction: Instruction) {
        let value = add_unsigned(
            self.registers.get(instruction.s_register()),
            instruction.immediate() as i32,
        );
        self.registers.set(instruction.t_register(), value);
        self.advance_program_counter()
    }

    /// Set on less than immediate (signed)
    pub(crate) fn op_slti(&mut self, instruction: Instruction) {
        let s_value = self.registers.get(instruction.s_register()) as i32;
        let value = (s_value < instruction.immediate() as i32) as u32;
        self.registers.set(instruction.t_register(), value);
        self.advance_program_counter();
    }

    /// Load word
    pub(crate) fn op_lw(&mut self, instruction: Instruction) -> Result<(), ProcessorError> {
        let base = self.registers.get(instruction.s_register());
        let address = add_unsigned(base, instruction.immediate() as i32);
        let value = self.cache.read_word(&mut self.memory, address)?;

        self.registers.set(instruction.t_register(), value);
        self.stats.loads_executed += 1;
        self.advance_program_counter();
        Ok(())
    }

    /// Store word
    pub(crate) fn op_sw(&mut self, instruction: Instruction) -> Result<(), ProcessorError> {
        let base = self.registers.get(instruction.s_register());
        let address = add_unsigned(base, instruction.immediate() as i32);
        let value = self.registers.get(instruction.t_register());

        self.cache.write_word(&mut self.memory, address, value)?;
        self.stats.stores_executed += 1;
        self.advance_program_counter();
        Ok(())
    }
}
