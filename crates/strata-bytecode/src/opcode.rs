//! Opcode table for the low-level representation
//!
//! The numeric values are the real stack-machine opcode numbers, so a lowered
//! method can be handed to a class file writer without any translation. Only
//! the instructions this toolchain emits or passes through are listed.

/// Bytecode opcode enumeration
///
/// Opcodes are organized into categories:
/// - Constants (0x00-0x12)
/// - Local Variables (0x15-0x3A, 0x84)
/// - Stack Manipulation (0x57-0x5F)
/// - Arithmetic (0x60-0x77)
/// - Conversions (0x85-0x93)
/// - Comparison (0x94-0x98)
/// - Control Flow (0x99-0xA7, 0xC6-0xC7)
/// - Returns (0xAC-0xB1)
/// - Fields & Invocation (0xB2-0xB9)
/// - Objects (0xBB-0xC1)
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Opcode {
    // ===== Constants (0x00-0x12) =====
    /// No operation
    Nop = 0x00,
    /// Push the null reference
    AconstNull = 0x01,
    /// Push int constant -1
    IconstM1 = 0x02,
    /// Push int constant 0
    Iconst0 = 0x03,
    /// Push int constant 1
    Iconst1 = 0x04,
    /// Push int constant 2
    Iconst2 = 0x05,
    /// Push int constant 3
    Iconst3 = 0x06,
    /// Push int constant 4
    Iconst4 = 0x07,
    /// Push int constant 5
    Iconst5 = 0x08,
    /// Push long constant 0
    Lconst0 = 0x09,
    /// Push long constant 1
    Lconst1 = 0x0A,
    /// Push float constant 0.0
    Fconst0 = 0x0B,
    /// Push float constant 1.0
    Fconst1 = 0x0C,
    /// Push float constant 2.0
    Fconst2 = 0x0D,
    /// Push double constant 0.0
    Dconst0 = 0x0E,
    /// Push double constant 1.0
    Dconst1 = 0x0F,
    /// Push byte-range int (operand: int)
    Bipush = 0x10,
    /// Push short-range int (operand: int)
    Sipush = 0x11,
    /// Push constant from the pool (operand: int, long, float, double or string)
    Ldc = 0x12,

    // ===== Local Variables (0x15-0x3A, 0x84) =====
    /// Load int local (operand: slot)
    Iload = 0x15,
    /// Load long local (operand: slot)
    Lload = 0x16,
    /// Load float local (operand: slot)
    Fload = 0x17,
    /// Load double local (operand: slot)
    Dload = 0x18,
    /// Load reference local (operand: slot)
    Aload = 0x19,
    /// Store int local (operand: slot)
    Istore = 0x36,
    /// Store long local (operand: slot)
    Lstore = 0x37,
    /// Store float local (operand: slot)
    Fstore = 0x38,
    /// Store double local (operand: slot)
    Dstore = 0x39,
    /// Store reference local (operand: slot)
    Astore = 0x3A,
    /// Increment int local (operands: slot, increment)
    Iinc = 0x84,

    // ===== Stack Manipulation (0x57-0x5F) =====
    /// Pop one stack word
    Pop = 0x57,
    /// Pop two stack words
    Pop2 = 0x58,
    /// Duplicate the top stack word
    Dup = 0x59,
    /// Duplicate the top two stack words
    Dup2 = 0x5C,
    /// Swap the top two stack words
    Swap = 0x5F,

    // ===== Arithmetic (0x60-0x77) =====
    /// Int addition
    Iadd = 0x60,
    /// Long addition
    Ladd = 0x61,
    /// Float addition
    Fadd = 0x62,
    /// Double addition
    Dadd = 0x63,
    /// Int subtraction
    Isub = 0x64,
    /// Long subtraction
    Lsub = 0x65,
    /// Float subtraction
    Fsub = 0x66,
    /// Double subtraction
    Dsub = 0x67,
    /// Int multiplication
    Imul = 0x68,
    /// Long multiplication
    Lmul = 0x69,
    /// Float multiplication
    Fmul = 0x6A,
    /// Double multiplication
    Dmul = 0x6B,
    /// Int division
    Idiv = 0x6C,
    /// Long division
    Ldiv = 0x6D,
    /// Float division
    Fdiv = 0x6E,
    /// Double division
    Ddiv = 0x6F,
    /// Int remainder
    Irem = 0x70,
    /// Long remainder
    Lrem = 0x71,
    /// Float remainder
    Frem = 0x72,
    /// Double remainder
    Drem = 0x73,
    /// Int negation
    Ineg = 0x74,
    /// Long negation
    Lneg = 0x75,
    /// Float negation
    Fneg = 0x76,
    /// Double negation
    Dneg = 0x77,

    // ===== Conversions (0x85-0x93) =====
    /// Widen int to long
    I2l = 0x85,
    /// Convert int to float
    I2f = 0x86,
    /// Widen int to double
    I2d = 0x87,
    /// Narrow long to int
    L2i = 0x88,
    /// Convert long to float
    L2f = 0x89,
    /// Convert long to double
    L2d = 0x8A,
    /// Convert float to int
    F2i = 0x8B,
    /// Convert float to long
    F2l = 0x8C,
    /// Widen float to double
    F2d = 0x8D,
    /// Convert double to int
    D2i = 0x8E,
    /// Convert double to long
    D2l = 0x8F,
    /// Narrow double to float
    D2f = 0x90,
    /// Narrow int to byte
    I2b = 0x91,
    /// Narrow int to char
    I2c = 0x92,
    /// Narrow int to short
    I2s = 0x93,

    // ===== Comparison (0x94-0x98) =====
    /// Compare longs
    Lcmp = 0x94,
    /// Compare floats (NaN yields -1)
    Fcmpl = 0x95,
    /// Compare floats (NaN yields 1)
    Fcmpg = 0x96,
    /// Compare doubles (NaN yields -1)
    Dcmpl = 0x97,
    /// Compare doubles (NaN yields 1)
    Dcmpg = 0x98,

    // ===== Control Flow (0x99-0xA7, 0xC6-0xC7) =====
    /// Jump if int is zero (operand: label)
    Ifeq = 0x99,
    /// Jump if int is non-zero (operand: label)
    Ifne = 0x9A,
    /// Jump if int is negative (operand: label)
    Iflt = 0x9B,
    /// Jump if int is non-negative (operand: label)
    Ifge = 0x9C,
    /// Jump if int is positive (operand: label)
    Ifgt = 0x9D,
    /// Jump if int is non-positive (operand: label)
    Ifle = 0x9E,
    /// Jump if ints are equal (operand: label)
    IfIcmpeq = 0x9F,
    /// Jump if ints differ (operand: label)
    IfIcmpne = 0xA0,
    /// Jump if a < b (operand: label)
    IfIcmplt = 0xA1,
    /// Jump if a >= b (operand: label)
    IfIcmpge = 0xA2,
    /// Jump if a > b (operand: label)
    IfIcmpgt = 0xA3,
    /// Jump if a <= b (operand: label)
    IfIcmple = 0xA4,
    /// Jump if references are equal (operand: label)
    IfAcmpeq = 0xA5,
    /// Jump if references differ (operand: label)
    IfAcmpne = 0xA6,
    /// Unconditional jump (operand: label)
    Goto = 0xA7,
    /// Jump if reference is null (operand: label)
    Ifnull = 0xC6,
    /// Jump if reference is not null (operand: label)
    Ifnonnull = 0xC7,

    // ===== Returns (0xAC-0xB1) =====
    /// Return int
    Ireturn = 0xAC,
    /// Return long
    Lreturn = 0xAD,
    /// Return float
    Freturn = 0xAE,
    /// Return double
    Dreturn = 0xAF,
    /// Return reference
    Areturn = 0xB0,
    /// Return void
    Return = 0xB1,

    // ===== Fields & Invocation (0xB2-0xB9) =====
    /// Read static field (operands: owner, name, descriptor)
    Getstatic = 0xB2,
    /// Write static field (operands: owner, name, descriptor)
    Putstatic = 0xB3,
    /// Read instance field (operands: owner, name, descriptor)
    Getfield = 0xB4,
    /// Write instance field (operands: owner, name, descriptor)
    Putfield = 0xB5,
    /// Virtual dispatch (operands: owner, name, descriptor, interface)
    Invokevirtual = 0xB6,
    /// Constructor, private or super call (operands: owner, name, descriptor, interface)
    Invokespecial = 0xB7,
    /// Static call (operands: owner, name, descriptor, interface)
    Invokestatic = 0xB8,
    /// Interface dispatch (operands: owner, name, descriptor, interface)
    Invokeinterface = 0xB9,

    // ===== Objects (0xBB-0xC1) =====
    /// Allocate an uninitialized object (operand: internal name)
    New = 0xBB,
    /// Push the length of an array
    Arraylength = 0xBE,
    /// Throw the exception on top of the stack
    Athrow = 0xBF,
    /// Check a reference against a type (operand: internal name)
    Checkcast = 0xC0,
    /// Test a reference against a type (operand: internal name)
    Instanceof = 0xC1,
}

impl Opcode {
    /// Decode an opcode from its numeric value
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            // Constants
            0x00 => Some(Self::Nop),
            0x01 => Some(Self::AconstNull),
            0x02 => Some(Self::IconstM1),
            0x03 => Some(Self::Iconst0),
            0x04 => Some(Self::Iconst1),
            0x05 => Some(Self::Iconst2),
            0x06 => Some(Self::Iconst3),
            0x07 => Some(Self::Iconst4),
            0x08 => Some(Self::Iconst5),
            0x09 => Some(Self::Lconst0),
            0x0A => Some(Self::Lconst1),
            0x0B => Some(Self::Fconst0),
            0x0C => Some(Self::Fconst1),
            0x0D => Some(Self::Fconst2),
            0x0E => Some(Self::Dconst0),
            0x0F => Some(Self::Dconst1),
            0x10 => Some(Self::Bipush),
            0x11 => Some(Self::Sipush),
            0x12 => Some(Self::Ldc),

            // Local Variables
            0x15 => Some(Self::Iload),
            0x16 => Some(Self::Lload),
            0x17 => Some(Self::Fload),
            0x18 => Some(Self::Dload),
            0x19 => Some(Self::Aload),
            0x36 => Some(Self::Istore),
            0x37 => Some(Self::Lstore),
            0x38 => Some(Self::Fstore),
            0x39 => Some(Self::Dstore),
            0x3A => Some(Self::Astore),
            0x84 => Some(Self::Iinc),

            // Stack Manipulation
            0x57 => Some(Self::Pop),
            0x58 => Some(Self::Pop2),
            0x59 => Some(Self::Dup),
            0x5C => Some(Self::Dup2),
            0x5F => Some(Self::Swap),

            // Arithmetic
            0x60 => Some(Self::Iadd),
            0x61 => Some(Self::Ladd),
            0x62 => Some(Self::Fadd),
            0x63 => Some(Self::Dadd),
            0x64 => Some(Self::Isub),
            0x65 => Some(Self::Lsub),
            0x66 => Some(Self::Fsub),
            0x67 => Some(Self::Dsub),
            0x68 => Some(Self::Imul),
            0x69 => Some(Self::Lmul),
            0x6A => Some(Self::Fmul),
            0x6B => Some(Self::Dmul),
            0x6C => Some(Self::Idiv),
            0x6D => Some(Self::Ldiv),
            0x6E => Some(Self::Fdiv),
            0x6F => Some(Self::Ddiv),
            0x70 => Some(Self::Irem),
            0x71 => Some(Self::Lrem),
            0x72 => Some(Self::Frem),
            0x73 => Some(Self::Drem),
            0x74 => Some(Self::Ineg),
            0x75 => Some(Self::Lneg),
            0x76 => Some(Self::Fneg),
            0x77 => Some(Self::Dneg),

            // Conversions
            0x85 => Some(Self::I2l),
            0x86 => Some(Self::I2f),
            0x87 => Some(Self::I2d),
            0x88 => Some(Self::L2i),
            0x89 => Some(Self::L2f),
            0x8A => Some(Self::L2d),
            0x8B => Some(Self::F2i),
            0x8C => Some(Self::F2l),
            0x8D => Some(Self::F2d),
            0x8E => Some(Self::D2i),
            0x8F => Some(Self::D2l),
            0x90 => Some(Self::D2f),
            0x91 => Some(Self::I2b),
            0x92 => Some(Self::I2c),
            0x93 => Some(Self::I2s),

            // Comparison
            0x94 => Some(Self::Lcmp),
            0x95 => Some(Self::Fcmpl),
            0x96 => Some(Self::Fcmpg),
            0x97 => Some(Self::Dcmpl),
            0x98 => Some(Self::Dcmpg),

            // Control Flow
            0x99 => Some(Self::Ifeq),
            0x9A => Some(Self::Ifne),
            0x9B => Some(Self::Iflt),
            0x9C => Some(Self::Ifge),
            0x9D => Some(Self::Ifgt),
            0x9E => Some(Self::Ifle),
            0x9F => Some(Self::IfIcmpeq),
            0xA0 => Some(Self::IfIcmpne),
            0xA1 => Some(Self::IfIcmplt),
            0xA2 => Some(Self::IfIcmpge),
            0xA3 => Some(Self::IfIcmpgt),
            0xA4 => Some(Self::IfIcmple),
            0xA5 => Some(Self::IfAcmpeq),
            0xA6 => Some(Self::IfAcmpne),
            0xA7 => Some(Self::Goto),
            0xC6 => Some(Self::Ifnull),
            0xC7 => Some(Self::Ifnonnull),

            // Returns
            0xAC => Some(Self::Ireturn),
            0xAD => Some(Self::Lreturn),
            0xAE => Some(Self::Freturn),
            0xAF => Some(Self::Dreturn),
            0xB0 => Some(Self::Areturn),
            0xB1 => Some(Self::Return),

            // Fields & Invocation
            0xB2 => Some(Self::Getstatic),
            0xB3 => Some(Self::Putstatic),
            0xB4 => Some(Self::Getfield),
            0xB5 => Some(Self::Putfield),
            0xB6 => Some(Self::Invokevirtual),
            0xB7 => Some(Self::Invokespecial),
            0xB8 => Some(Self::Invokestatic),
            0xB9 => Some(Self::Invokeinterface),

            // Objects
            0xBB => Some(Self::New),
            0xBE => Some(Self::Arraylength),
            0xBF => Some(Self::Athrow),
            0xC0 => Some(Self::Checkcast),
            0xC1 => Some(Self::Instanceof),

            _ => None,
        }
    }

    /// Numeric opcode value
    #[inline]
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Canonical upper-case mnemonic
    pub fn name(self) -> &'static str {
        match self {
            Self::Nop => "NOP",
            Self::AconstNull => "ACONST_NULL",
            Self::IconstM1 => "ICONST_M1",
            Self::Iconst0 => "ICONST_0",
            Self::Iconst1 => "ICONST_1",
            Self::Iconst2 => "ICONST_2",
            Self::Iconst3 => "ICONST_3",
            Self::Iconst4 => "ICONST_4",
            Self::Iconst5 => "ICONST_5",
            Self::Lconst0 => "LCONST_0",
            Self::Lconst1 => "LCONST_1",
            Self::Fconst0 => "FCONST_0",
            Self::Fconst1 => "FCONST_1",
            Self::Fconst2 => "FCONST_2",
            Self::Dconst0 => "DCONST_0",
            Self::Dconst1 => "DCONST_1",
            Self::Bipush => "BIPUSH",
            Self::Sipush => "SIPUSH",
            Self::Ldc => "LDC",
            Self::Iload => "ILOAD",
            Self::Lload => "LLOAD",
            Self::Fload => "FLOAD",
            Self::Dload => "DLOAD",
            Self::Aload => "ALOAD",
            Self::Istore => "ISTORE",
            Self::Lstore => "LSTORE",
            Self::Fstore => "FSTORE",
            Self::Dstore => "DSTORE",
            Self::Astore => "ASTORE",
            Self::Iinc => "IINC",
            Self::Pop => "POP",
            Self::Pop2 => "POP2",
            Self::Dup => "DUP",
            Self::Dup2 => "DUP2",
            Self::Swap => "SWAP",
            Self::Iadd => "IADD",
            Self::Ladd => "LADD",
            Self::Fadd => "FADD",
            Self::Dadd => "DADD",
            Self::Isub => "ISUB",
            Self::Lsub => "LSUB",
            Self::Fsub => "FSUB",
            Self::Dsub => "DSUB",
            Self::Imul => "IMUL",
            Self::Lmul => "LMUL",
            Self::Fmul => "FMUL",
            Self::Dmul => "DMUL",
            Self::Idiv => "IDIV",
            Self::Ldiv => "LDIV",
            Self::Fdiv => "FDIV",
            Self::Ddiv => "DDIV",
            Self::Irem => "IREM",
            Self::Lrem => "LREM",
            Self::Frem => "FREM",
            Self::Drem => "DREM",
            Self::Ineg => "INEG",
            Self::Lneg => "LNEG",
            Self::Fneg => "FNEG",
            Self::Dneg => "DNEG",
            Self::I2l => "I2L",
            Self::I2f => "I2F",
            Self::I2d => "I2D",
            Self::L2i => "L2I",
            Self::L2f => "L2F",
            Self::L2d => "L2D",
            Self::F2i => "F2I",
            Self::F2l => "F2L",
            Self::F2d => "F2D",
            Self::D2i => "D2I",
            Self::D2l => "D2L",
            Self::D2f => "D2F",
            Self::I2b => "I2B",
            Self::I2c => "I2C",
            Self::I2s => "I2S",
            Self::Lcmp => "LCMP",
            Self::Fcmpl => "FCMPL",
            Self::Fcmpg => "FCMPG",
            Self::Dcmpl => "DCMPL",
            Self::Dcmpg => "DCMPG",
            Self::Ifeq => "IFEQ",
            Self::Ifne => "IFNE",
            Self::Iflt => "IFLT",
            Self::Ifge => "IFGE",
            Self::Ifgt => "IFGT",
            Self::Ifle => "IFLE",
            Self::IfIcmpeq => "IF_ICMPEQ",
            Self::IfIcmpne => "IF_ICMPNE",
            Self::IfIcmplt => "IF_ICMPLT",
            Self::IfIcmpge => "IF_ICMPGE",
            Self::IfIcmpgt => "IF_ICMPGT",
            Self::IfIcmple => "IF_ICMPLE",
            Self::IfAcmpeq => "IF_ACMPEQ",
            Self::IfAcmpne => "IF_ACMPNE",
            Self::Goto => "GOTO",
            Self::Ifnull => "IFNULL",
            Self::Ifnonnull => "IFNONNULL",
            Self::Ireturn => "IRETURN",
            Self::Lreturn => "LRETURN",
            Self::Freturn => "FRETURN",
            Self::Dreturn => "DRETURN",
            Self::Areturn => "ARETURN",
            Self::Return => "RETURN",
            Self::Getstatic => "GETSTATIC",
            Self::Putstatic => "PUTSTATIC",
            Self::Getfield => "GETFIELD",
            Self::Putfield => "PUTFIELD",
            Self::Invokevirtual => "INVOKEVIRTUAL",
            Self::Invokespecial => "INVOKESPECIAL",
            Self::Invokestatic => "INVOKESTATIC",
            Self::Invokeinterface => "INVOKEINTERFACE",
            Self::New => "NEW",
            Self::Arraylength => "ARRAYLENGTH",
            Self::Athrow => "ATHROW",
            Self::Checkcast => "CHECKCAST",
            Self::Instanceof => "INSTANCEOF",
        }
    }

    /// Look an opcode up by its mnemonic
    pub fn from_name(name: &str) -> Option<Self> {
        let opcode = match name {
            "NOP" => Self::Nop,
            "ACONST_NULL" => Self::AconstNull,
            "ICONST_M1" => Self::IconstM1,
            "ICONST_0" => Self::Iconst0,
            "ICONST_1" => Self::Iconst1,
            "ICONST_2" => Self::Iconst2,
            "ICONST_3" => Self::Iconst3,
            "ICONST_4" => Self::Iconst4,
            "ICONST_5" => Self::Iconst5,
            "LCONST_0" => Self::Lconst0,
            "LCONST_1" => Self::Lconst1,
            "FCONST_0" => Self::Fconst0,
            "FCONST_1" => Self::Fconst1,
            "FCONST_2" => Self::Fconst2,
            "DCONST_0" => Self::Dconst0,
            "DCONST_1" => Self::Dconst1,
            "BIPUSH" => Self::Bipush,
            "SIPUSH" => Self::Sipush,
            "LDC" => Self::Ldc,
            "ILOAD" => Self::Iload,
            "LLOAD" => Self::Lload,
            "FLOAD" => Self::Fload,
            "DLOAD" => Self::Dload,
            "ALOAD" => Self::Aload,
            "ISTORE" => Self::Istore,
            "LSTORE" => Self::Lstore,
            "FSTORE" => Self::Fstore,
            "DSTORE" => Self::Dstore,
            "ASTORE" => Self::Astore,
            "IINC" => Self::Iinc,
            "POP" => Self::Pop,
            "POP2" => Self::Pop2,
            "DUP" => Self::Dup,
            "DUP2" => Self::Dup2,
            "SWAP" => Self::Swap,
            "IADD" => Self::Iadd,
            "LADD" => Self::Ladd,
            "FADD" => Self::Fadd,
            "DADD" => Self::Dadd,
            "ISUB" => Self::Isub,
            "LSUB" => Self::Lsub,
            "FSUB" => Self::Fsub,
            "DSUB" => Self::Dsub,
            "IMUL" => Self::Imul,
            "LMUL" => Self::Lmul,
            "FMUL" => Self::Fmul,
            "DMUL" => Self::Dmul,
            "IDIV" => Self::Idiv,
            "LDIV" => Self::Ldiv,
            "FDIV" => Self::Fdiv,
            "DDIV" => Self::Ddiv,
            "IREM" => Self::Irem,
            "LREM" => Self::Lrem,
            "FREM" => Self::Frem,
            "DREM" => Self::Drem,
            "INEG" => Self::Ineg,
            "LNEG" => Self::Lneg,
            "FNEG" => Self::Fneg,
            "DNEG" => Self::Dneg,
            "I2L" => Self::I2l,
            "I2F" => Self::I2f,
            "I2D" => Self::I2d,
            "L2I" => Self::L2i,
            "L2F" => Self::L2f,
            "L2D" => Self::L2d,
            "F2I" => Self::F2i,
            "F2L" => Self::F2l,
            "F2D" => Self::F2d,
            "D2I" => Self::D2i,
            "D2L" => Self::D2l,
            "D2F" => Self::D2f,
            "I2B" => Self::I2b,
            "I2C" => Self::I2c,
            "I2S" => Self::I2s,
            "LCMP" => Self::Lcmp,
            "FCMPL" => Self::Fcmpl,
            "FCMPG" => Self::Fcmpg,
            "DCMPL" => Self::Dcmpl,
            "DCMPG" => Self::Dcmpg,
            "IFEQ" => Self::Ifeq,
            "IFNE" => Self::Ifne,
            "IFLT" => Self::Iflt,
            "IFGE" => Self::Ifge,
            "IFGT" => Self::Ifgt,
            "IFLE" => Self::Ifle,
            "IF_ICMPEQ" => Self::IfIcmpeq,
            "IF_ICMPNE" => Self::IfIcmpne,
            "IF_ICMPLT" => Self::IfIcmplt,
            "IF_ICMPGE" => Self::IfIcmpge,
            "IF_ICMPGT" => Self::IfIcmpgt,
            "IF_ICMPLE" => Self::IfIcmple,
            "IF_ACMPEQ" => Self::IfAcmpeq,
            "IF_ACMPNE" => Self::IfAcmpne,
            "GOTO" => Self::Goto,
            "IFNULL" => Self::Ifnull,
            "IFNONNULL" => Self::Ifnonnull,
            "IRETURN" => Self::Ireturn,
            "LRETURN" => Self::Lreturn,
            "FRETURN" => Self::Freturn,
            "DRETURN" => Self::Dreturn,
            "ARETURN" => Self::Areturn,
            "RETURN" => Self::Return,
            "GETSTATIC" => Self::Getstatic,
            "PUTSTATIC" => Self::Putstatic,
            "GETFIELD" => Self::Getfield,
            "PUTFIELD" => Self::Putfield,
            "INVOKEVIRTUAL" => Self::Invokevirtual,
            "INVOKESPECIAL" => Self::Invokespecial,
            "INVOKESTATIC" => Self::Invokestatic,
            "INVOKEINTERFACE" => Self::Invokeinterface,
            "NEW" => Self::New,
            "ARRAYLENGTH" => Self::Arraylength,
            "ATHROW" => Self::Athrow,
            "CHECKCAST" => Self::Checkcast,
            "INSTANCEOF" => Self::Instanceof,
            _ => return None,
        };
        Some(opcode)
    }

    /// Check if the opcode transfers control to a label operand
    pub fn is_jump(self) -> bool {
        matches!(
            self,
            Self::Ifeq
                | Self::Ifne
                | Self::Iflt
                | Self::Ifge
                | Self::Ifgt
                | Self::Ifle
                | Self::IfIcmpeq
                | Self::IfIcmpne
                | Self::IfIcmplt
                | Self::IfIcmpge
                | Self::IfIcmpgt
                | Self::IfIcmple
                | Self::IfAcmpeq
                | Self::IfAcmpne
                | Self::Goto
                | Self::Ifnull
                | Self::Ifnonnull
        )
    }

    /// Check if the opcode is one of the invoke instructions
    pub fn is_invoke(self) -> bool {
        matches!(
            self,
            Self::Invokevirtual | Self::Invokespecial | Self::Invokestatic | Self::Invokeinterface
        )
    }

    /// Check if the opcode reads or writes a field
    pub fn is_field_access(self) -> bool {
        matches!(
            self,
            Self::Getstatic | Self::Putstatic | Self::Getfield | Self::Putfield
        )
    }

    /// Check if the opcode returns from the method
    pub fn is_return(self) -> bool {
        matches!(
            self,
            Self::Ireturn
                | Self::Lreturn
                | Self::Freturn
                | Self::Dreturn
                | Self::Areturn
                | Self::Return
        )
    }

    /// Check if execution never falls through to the next instruction
    pub fn is_terminator(self) -> bool {
        self.is_return() || matches!(self, Self::Goto | Self::Athrow)
    }

    /// Stack effect as `(pops, pushes)` counted in stack words
    ///
    /// Long and double values take two words. Returns `None` for opcodes
    /// whose effect depends on their operands (invokes, field access, `LDC`).
    pub fn stack_effect(self) -> Option<(u16, u16)> {
        let effect = match self {
            Self::Nop | Self::Iinc | Self::Goto | Self::Return => (0, 0),
            Self::AconstNull
            | Self::IconstM1
            | Self::Iconst0
            | Self::Iconst1
            | Self::Iconst2
            | Self::Iconst3
            | Self::Iconst4
            | Self::Iconst5
            | Self::Fconst0
            | Self::Fconst1
            | Self::Fconst2
            | Self::Bipush
            | Self::Sipush
            | Self::Iload
            | Self::Fload
            | Self::Aload
            | Self::New => (0, 1),
            Self::Lconst0 | Self::Lconst1 | Self::Dconst0 | Self::Dconst1 => (0, 2),
            Self::Lload | Self::Dload => (0, 2),
            Self::Istore | Self::Fstore | Self::Astore => (1, 0),
            Self::Lstore | Self::Dstore => (2, 0),
            Self::Pop => (1, 0),
            Self::Pop2 => (2, 0),
            Self::Dup => (1, 2),
            Self::Dup2 => (2, 4),
            Self::Swap => (2, 2),
            Self::Iadd
            | Self::Isub
            | Self::Imul
            | Self::Idiv
            | Self::Irem
            | Self::Fadd
            | Self::Fsub
            | Self::Fmul
            | Self::Fdiv
            | Self::Frem => (2, 1),
            Self::Ladd
            | Self::Lsub
            | Self::Lmul
            | Self::Ldiv
            | Self::Lrem
            | Self::Dadd
            | Self::Dsub
            | Self::Dmul
            | Self::Ddiv
            | Self::Drem => (4, 2),
            Self::Ineg | Self::Fneg => (1, 1),
            Self::Lneg | Self::Dneg => (2, 2),
            Self::I2f | Self::F2i | Self::I2b | Self::I2c | Self::I2s => (1, 1),
            Self::I2l | Self::I2d | Self::F2l | Self::F2d => (1, 2),
            Self::L2i | Self::L2f | Self::D2i | Self::D2f => (2, 1),
            Self::L2d | Self::D2l => (2, 2),
            Self::Lcmp | Self::Dcmpl | Self::Dcmpg => (4, 1),
            Self::Fcmpl | Self::Fcmpg => (2, 1),
            Self::Ifeq
            | Self::Ifne
            | Self::Iflt
            | Self::Ifge
            | Self::Ifgt
            | Self::Ifle
            | Self::Ifnull
            | Self::Ifnonnull => (1, 0),
            Self::IfIcmpeq
            | Self::IfIcmpne
            | Self::IfIcmplt
            | Self::IfIcmpge
            | Self::IfIcmpgt
            | Self::IfIcmple
            | Self::IfAcmpeq
            | Self::IfAcmpne => (2, 0),
            Self::Ireturn | Self::Freturn | Self::Areturn => (1, 0),
            Self::Lreturn | Self::Dreturn => (2, 0),
            Self::Arraylength | Self::Checkcast | Self::Instanceof => (1, 1),
            Self::Athrow => (1, 0),
            Self::Ldc
            | Self::Getstatic
            | Self::Putstatic
            | Self::Getfield
            | Self::Putfield
            | Self::Invokevirtual
            | Self::Invokespecial
            | Self::Invokestatic
            | Self::Invokeinterface => return None,
        };
        Some(effect)
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_roundtrip() {
        for byte in 0..=u8::MAX {
            if let Some(opcode) = Opcode::from_u8(byte) {
                assert_eq!(opcode.to_u8(), byte, "Failed roundtrip for {:?}", opcode);
                assert_eq!(Opcode::from_name(opcode.name()), Some(opcode));
            }
        }
    }

    #[test]
    fn test_invalid_opcode() {
        assert_eq!(Opcode::from_u8(0xCA), None);
        assert_eq!(Opcode::from_u8(0xFF), None);
        assert_eq!(Opcode::from_name("iadd"), None);
        assert_eq!(Opcode::from_name("JSR"), None);
    }

    #[test]
    fn test_opcode_values() {
        assert_eq!(Opcode::Nop as u8, 0);
        assert_eq!(Opcode::Ldc as u8, 18);
        assert_eq!(Opcode::Aload as u8, 25);
        assert_eq!(Opcode::Iadd as u8, 96);
        assert_eq!(Opcode::Ladd as u8, 97);
        assert_eq!(Opcode::I2l as u8, 133);
        assert_eq!(Opcode::I2s as u8, 147);
        assert_eq!(Opcode::Goto as u8, 167);
        assert_eq!(Opcode::Return as u8, 177);
        assert_eq!(Opcode::Invokevirtual as u8, 182);
        assert_eq!(Opcode::Invokeinterface as u8, 185);
        assert_eq!(Opcode::New as u8, 187);
    }

    #[test]
    fn test_opcode_names() {
        assert_eq!(Opcode::Nop.name(), "NOP");
        assert_eq!(Opcode::IfIcmpge.name(), "IF_ICMPGE");
        assert_eq!(Opcode::I2c.to_string(), "I2C");
        assert_eq!(Opcode::Invokestatic.name(), "INVOKESTATIC");
    }

    #[test]
    fn test_jump_detection() {
        assert!(Opcode::Goto.is_jump());
        assert!(Opcode::Ifeq.is_jump());
        assert!(Opcode::IfAcmpne.is_jump());
        assert!(Opcode::Ifnonnull.is_jump());
        assert!(!Opcode::Return.is_jump());
        assert!(!Opcode::Invokevirtual.is_jump());
    }

    #[test]
    fn test_terminator_detection() {
        assert!(Opcode::Return.is_terminator());
        assert!(Opcode::Areturn.is_terminator());
        assert!(Opcode::Goto.is_terminator());
        assert!(Opcode::Athrow.is_terminator());
        assert!(!Opcode::Ifeq.is_terminator());
        assert!(!Opcode::Iadd.is_terminator());
    }

    #[test]
    fn test_stack_effects() {
        assert_eq!(Opcode::Iadd.stack_effect(), Some((2, 1)));
        assert_eq!(Opcode::Ladd.stack_effect(), Some((4, 2)));
        assert_eq!(Opcode::I2l.stack_effect(), Some((1, 2)));
        assert_eq!(Opcode::D2i.stack_effect(), Some((2, 1)));
        assert_eq!(Opcode::Nop.stack_effect(), Some((0, 0)));
        assert_eq!(Opcode::Ldc.stack_effect(), None);
        assert_eq!(Opcode::Invokevirtual.stack_effect(), None);
        assert_eq!(Opcode::Getfield.stack_effect(), None);
    }
}
