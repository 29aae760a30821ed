use mipsim_types::constants::*;
use std::fmt;
use std::fmt::{Display, Formatter};

/// A MIPS instruction
#[derive(Copy, Clone, Debug)]
pub struct Instruction(pub u32);

impl Instruction {
    /// Get the operation code
    pub fn op_code(&self) -> u8 {
        ((self.0 & 0xFC000000) >> 26) as u8
    }

    /// Get the s register (for R and I type instructions)
    pub fn s_register(&self) -> u8 {
        ((self.0 & 0x03E00000) >> 21) as u8
    }

    /// Get the t register (for R and I type instructions)
    pub fn t_register(&self) -> u8 {
        ((self.0 & 0x001F0000) >> 16) as u8
    }

    /// Get the d register (for R type instructions)
    pub fn d_register(&self) -> u8 {
        ((self.0 & 0x0000F800) >> 11) as u8
    }

    /// Get the shift amount (for R type instructions)
    pub fn shift_amount(&self) -> u8 {
        ((self.0 & 0x000007C0) >> 6) as u8
    }

    /// Get the ALU function (for R type instructions)
    pub fn function(&self) -> u8 {
        (self.0 & 0x0000003F) as u8
    }

    /// Get the immediate value (for I type instructions)
    pub fn immediate(&self) -> i16 {
        (self.0 & 0x0000FFFF) as i16
    }

    /// Get the pseudo address (for J type instructions)
    pub fn pseudo_address(&self) -> u32 {
        self.0 & 0x03FFFFFF
    }

    /// Get the jump target: the pseudo address placed in the current
    /// 256MB region
    pub fn real_address(&self, program_counter: u32) -> u32 {
        (program_counter & 0xF0000000) | (self.pseudo_address() << 2)
    }

    fn disassemble(&self) -> String {
        let dst = |name: &str| {
            format!(
                "{} {}, {}, {}",
                name,
                Register(self.d_register()),
                Register(self.s_register()),
                Register(self.t_register())
            )
        };
        let shift = |name: &str| {
            format!(
                "{} {}, {}, {}",
                name,
                Register(self.d_register()),
                Register(self.t_register()),
                self.shift_amount()
            )
        };
        let sti = |name: &str| {
            format!(
                "{} {}, {}, {}",
                name,
                Register(self.s_register()),
                Register(self.t_register()),
                self.immediate()
            )
        };
        let tsi = |name: &str| {
            format!(
                "{} {}, {}, {}",
                name,
                Register(self.t_register()),
                Register(self.s_register()),
                self.immediate()
            )
        };
        let tis = |name: &str| {
            format!(
                "{} {}, {}({})",
                name,
                Register(self.t_register()),
                self.immediate(),
                Register(self.s_register())
            )
        };

        match self.op_code() {
            OP_R_TYPE => match self.function() {
                FUNCTION_SLL if self.0 == 0 => "noop".to_string(),
                FUNCTION_SLL => shift("sll"),
                FUNCTION_SRL => shift("srl"),
                FUNCTION_JR => format!("jr {}", Register(self.s_register())),
                FUNCTION_SYSCALL => "syscall".to_string(),
                FUNCTION_ADD => dst("add"),
                FUNCTION_SUB => dst("sub"),
                FUNCTION_AND => dst("and"),
                FUNCTION_OR => dst("or"),
                FUNCTION_SLT => dst("slt"),
                _ => format!("unknown (0x{:08x})", self.0),
            },
            OP_J => format!("j 0x{:08x}", self.pseudo_address() << 2),
            OP_JAL => format!("jal 0x{:08x}", self.pseudo_address() << 2),
            OP_BEQ => sti("beq"),
            OP_BNE => sti("bne"),
            OP_ADDI => tsi("addi"),
            OP_SLTI => tsi("slti"),
            OP_LW => tis("lw"),
            OP_SW => tis("sw"),
            _ => format!("unknown (0x{:08x})", self.0),
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.disassemble())
    }
}

/// Pretty-print the register using its name
struct Register(u8);

impl Display for Register {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        assert!(self.0 < 32);

        f.write_str(REGISTER_NAMES[self.0 as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_r_type_fields() {
        // add $at, $v0, $v1
        let instruction = Instruction(0x00430820);

        assert_eq!(instruction.op_code(), OP_R_TYPE);
        assert_eq!(instruction.function(), FUNCTION_ADD);
        assert_eq!(instruction.s_register(), 2);
        assert_eq!(instruction.t_register(), 3);
        assert_eq!(instruction.d_register(), 1);
    }

    #[test]
    fn decode_i_type_fields() {
        // addi $at, $v0, 100
        let instruction = Instruction(0x20410064);

        assert_eq!(instruction.op_code(), OP_ADDI);
        assert_eq!(instruction.s_register(), 2);
        assert_eq!(instruction.t_register(), 1);
        assert_eq!(instruction.immediate(), 100);
    }

    #[test]
    fn immediate_is_sign_extended() {
        // bne $t3, $t4, -5
        let instruction = Instruction(0x156CFFFB);

        assert_eq!(instruction.op_code(), OP_BNE);
        assert_eq!(instruction.immediate(), -5);
    }

    #[test]
    fn jump_target_stays_in_region() {
        // j 0x00400010
        let instruction = Instruction(0x08100004);

        assert_eq!(instruction.pseudo_address(), 0x00100004);
        assert_eq!(instruction.real_address(0x00400020), 0x00400010);
    }

    #[test]
    fn disassembly() {
        assert_eq!(Instruction(0x00430820).to_string(), "add $at, $v0, $v1");
        assert_eq!(Instruction(0x20410064).to_string(), "addi $at, $v0, 100");
        assert_eq!(Instruction(0x156CFFFB).to_string(), "bne $t3, $t4, -5");
        assert_eq!(Instruction(0x8C690004).to_string(), "lw $t1, 4($v1)");
        assert_eq!(Instruction(0xAC680004).to_string(), "sw $t0, 4($v1)");
        assert_eq!(Instruction(0x0000000C).to_string(), "syscall");
        assert_eq!(Instruction(0x00000000).to_string(), "noop");
        assert_eq!(Instruction(0xFFFFFFFF).to_string(), "unknown (0xffffffff)");
    }
}
