use crate::instruction::Instruction;
use crate::Processor;
use mipsim_types::constants::REG_RA;

impl Processor {
    /// Jump
    pub(crate) fn op_j(&mut self, instruction: Instruction) {
        self.jump_to(instruction.real_address(self.program_counter));
    }

    /// Jump and link
    pub(crate) fn op_jal(&mut self, instruction: Instruction) {
        self.registers
            .set(REG_RA, self.program_counter.wrapping_add(4));
        self.jump_to(instruction.real_address(self.program_counter));
    }
}

#[cfg(test)]
mod tests {
    use crate::instruction::Instruction;
    use crate::processor::test_processor;
    use mipsim_types::constants::REG_RA;

    #[test]
    fn j_jumps_within_the_region() {
        let mut processor = test_processor();

        // j 0x2000
        processor.execute(Instruction(0x08000800)).unwrap();
        assert_eq!(processor.program_counter(), 0x2000);
        assert_eq!(processor.stats().branches_taken, 1);
    }

    #[test]
    fn jal_links_the_return_address() {
        let mut processor = test_processor();

        // jal 0x2000
        processor.execute(Instruction(0x0C000800)).unwrap();
        assert_eq!(processor.program_counter(), 0x2000);
        assert_eq!(processor.register(REG_RA), 0x1004);
    }
}
