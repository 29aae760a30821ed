use crate::instruction::Instruction;
use crate::Processor;

impl Processor {
    /// Shift left logical
    pub(crate) fn op_sll(&mut self, instruction: Instruction) {
        if instruction.0 == 0 {
            // noop
            self.advance_program_counter();
            return;
        }

        let value = self.registers.get(instruction.t_register()) << instruction.shift_amount();
        self.registers.set(instruction.d_register(), value);
        self.advance_program_counter()
    }

    /// Shift right logical
    pub(crate) fn op_srl(&mut self, instruction: Instruction) {
        let value = self.registers.get(instruction.t_register()) >> instruction.shift_amount();
        self.registers.set(instruction.d_register(), value);
        self.advance_program_counter()
    }

    /// Jump register
    pub(crate) fn op_jr(&mut self, instruction: Instruction) {
        let address = self.registers.get(instruction.s_register());
        self.jump_to(address);
    }

    /// Add. Overflows wrap
    pub(crate) fn op_add(&mut self, instruction: Instruction) {
        let a = self.registers.get(instruction.s_register());
        let b = self.registers.get(instruction.t_register());
        self.registers
            .set(instruction.d_register(), a.wrapping_add(b));
        self.advance_program_counter();
    }

    /// Subtract. Overflows wrap
    pub(crate) fn op_sub(&mut self, instruction: Instruction) {
        let a = self.registers.get(instruction.s_register());
        let b = self.registers.get(instruction.t_register());
        self.registers
            .set(instruction.d_register(), a.wrapping_sub(b));
        self.advance_program_counter();
    }

    /// Bitwise and
    pub(crate) fn op_and(&mut self, instruction: Instruction) {
        let a = self.registers.get(instruction.s_register());
        let b = self.registers.get(instruction.t_register());
        self.registers.set(instruction.d_register(), a & b);
        self.advance_program_counter();
    }

    /// Bitwise or
    pub(crate) fn op_or(&mut self, instruction: Instruction) {
        let a = self.registers.get(instruction.s_register());
        let b = self.registers.get(instruction.t_register());
        self.registers.set(instruction.d_register(), a | b);
        self.advance_program_counter();
    }

    /// Set on less than (signed)
    pub(crate) fn op_slt(&mut self, instruction: Instruction) {
        let a = self.registers.get(instruction.s_register()) as i32;
        let b = self.registers.get(instruction.t_register()) as i32;
        self.registers
            .set(instruction.d_register(), (a < b) as u32);
        self.advance_program_counter();
    }
}
