//! Instruction selection tables
//!
//! Each table maps static types (or a constant value) to exactly one
//! instruction. Anything a table does not list is an error, never a guess.

use strata_bytecode::{JvmType, Opcode};
use strata_xmir::DataValue;

use crate::ast::OpcodeNode;
use crate::error::{CompileError, CompileResult};

/// Addition for the declared operand type
pub fn add(ty: &JvmType) -> CompileResult<Opcode> {
    match ty {
        JvmType::Long => Ok(Opcode::Ladd),
        t if t.is_int_like() => Ok(Opcode::Iadd),
        other => Err(CompileError::unsupported(format!(
            "addition of {} operands",
            other
        ))),
    }
}

/// Primitive conversion between two types
///
/// Identity converts with `NOP`. The twelve pairs among int, long, float and
/// double have a dedicated instruction, as do the narrowings from int to
/// byte, char and short.
pub fn conversion(from: &JvmType, to: &JvmType) -> CompileResult<Opcode> {
    use JvmType::*;

    if from == to {
        return Ok(Opcode::Nop);
    }
    let opcode = match (from, to) {
        (Int, Long) => Opcode::I2l,
        (Int, Float) => Opcode::I2f,
        (Int, Double) => Opcode::I2d,
        (Long, Int) => Opcode::L2i,
        (Long, Float) => Opcode::L2f,
        (Long, Double) => Opcode::L2d,
        (Float, Int) => Opcode::F2i,
        (Float, Long) => Opcode::F2l,
        (Float, Double) => Opcode::F2d,
        (Double, Int) => Opcode::D2i,
        (Double, Long) => Opcode::D2l,
        (Double, Float) => Opcode::D2f,
        (Int, Byte) => Opcode::I2b,
        (Int, Char) => Opcode::I2c,
        (Int, Short) => Opcode::I2s,
        _ => {
            return Err(CompileError::UnsupportedConversion {
                from: from.descriptor(),
                to: to.descriptor(),
            })
        }
    };
    Ok(opcode)
}

/// Invoke instruction for a call shape
pub fn invoke(is_static: bool, interfaced: bool) -> Opcode {
    match (is_static, interfaced) {
        (true, _) => Opcode::Invokestatic,
        (false, true) => Opcode::Invokeinterface,
        (false, false) => Opcode::Invokevirtual,
    }
}

/// Load of a local of the given type
pub fn load(ty: &JvmType) -> CompileResult<Opcode> {
    match ty {
        JvmType::Long => Ok(Opcode::Lload),
        JvmType::Float => Ok(Opcode::Fload),
        JvmType::Double => Ok(Opcode::Dload),
        JvmType::Array(_) | JvmType::Object(_) => Ok(Opcode::Aload),
        t if t.is_int_like() => Ok(Opcode::Iload),
        _ => Err(CompileError::unsupported("load of a void local")),
    }
}

/// Store into a local of the given type
pub fn store(ty: &JvmType) -> CompileResult<Opcode> {
    match ty {
        JvmType::Long => Ok(Opcode::Lstore),
        JvmType::Float => Ok(Opcode::Fstore),
        JvmType::Double => Ok(Opcode::Dstore),
        JvmType::Array(_) | JvmType::Object(_) => Ok(Opcode::Astore),
        t if t.is_int_like() => Ok(Opcode::Istore),
        _ => Err(CompileError::unsupported("store of a void value")),
    }
}

/// Push an int constant with the shortest form
pub fn push_int(value: i32) -> OpcodeNode {
    let opcode = match value {
        -1 => Opcode::IconstM1,
        0 => Opcode::Iconst0,
        1 => Opcode::Iconst1,
        2 => Opcode::Iconst2,
        3 => Opcode::Iconst3,
        4 => Opcode::Iconst4,
        5 => Opcode::Iconst5,
        v if i8::try_from(v).is_ok() => Opcode::Bipush,
        v if i16::try_from(v).is_ok() => Opcode::Sipush,
        _ => Opcode::Ldc,
    };
    match opcode {
        Opcode::Bipush | Opcode::Sipush | Opcode::Ldc => {
            OpcodeNode::new(opcode).with_operand(DataValue::Int(i64::from(value)))
        }
        _ => OpcodeNode::new(opcode),
    }
}

pub fn push_long(value: i64) -> OpcodeNode {
    match value {
        0 => OpcodeNode::new(Opcode::Lconst0),
        1 => OpcodeNode::new(Opcode::Lconst1),
        v => OpcodeNode::new(Opcode::Ldc).with_operand(DataValue::Long(v)),
    }
}

pub fn push_float(value: f32) -> OpcodeNode {
    // bit comparison keeps -0.0 on LDC
    if value.to_bits() == 0.0f32.to_bits() {
        OpcodeNode::new(Opcode::Fconst0)
    } else if value == 1.0 {
        OpcodeNode::new(Opcode::Fconst1)
    } else if value == 2.0 {
        OpcodeNode::new(Opcode::Fconst2)
    } else {
        OpcodeNode::new(Opcode::Ldc).with_operand(DataValue::Float(value))
    }
}

pub fn push_double(value: f64) -> OpcodeNode {
    if value.to_bits() == 0.0f64.to_bits() {
        OpcodeNode::new(Opcode::Dconst0)
    } else if value == 1.0 {
        OpcodeNode::new(Opcode::Dconst1)
    } else {
        OpcodeNode::new(Opcode::Ldc).with_operand(DataValue::Double(value))
    }
}

pub fn push_string(value: impl Into<String>) -> OpcodeNode {
    OpcodeNode::new(Opcode::Ldc).with_operand(DataValue::Str(value.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NUMERIC: [JvmType; 4] = [JvmType::Int, JvmType::Long, JvmType::Float, JvmType::Double];

    #[test]
    fn test_conversion_table_is_complete() {
        let mut mapped = 0;
        for from in &NUMERIC {
            for to in &NUMERIC {
                let opcode = conversion(from, to).unwrap();
                if from == to {
                    assert_eq!(opcode, Opcode::Nop);
                } else {
                    mapped += 1;
                }
            }
        }
        assert_eq!(mapped, 12);
        assert_eq!(conversion(&JvmType::Int, &JvmType::Byte).unwrap(), Opcode::I2b);
        assert_eq!(conversion(&JvmType::Int, &JvmType::Char).unwrap(), Opcode::I2c);
        assert_eq!(conversion(&JvmType::Int, &JvmType::Short).unwrap(), Opcode::I2s);
    }

    #[test]
    fn test_conversion_widening_and_narrowing() {
        assert_eq!(conversion(&JvmType::Int, &JvmType::Long).unwrap(), Opcode::I2l);
        assert_eq!(conversion(&JvmType::Double, &JvmType::Int).unwrap(), Opcode::D2i);
    }

    #[test]
    fn test_conversion_unmapped() {
        let err = conversion(&JvmType::Float, &JvmType::Byte).unwrap_err();
        match err {
            CompileError::UnsupportedConversion { from, to } => {
                assert_eq!(from, "F");
                assert_eq!(to, "B");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(conversion(&JvmType::Long, &JvmType::Short).is_err());
        assert!(conversion(&JvmType::object("java/lang/String"), &JvmType::Int).is_err());
    }

    #[test]
    fn test_add() {
        assert_eq!(add(&JvmType::Int).unwrap(), Opcode::Iadd);
        assert_eq!(add(&JvmType::Short).unwrap(), Opcode::Iadd);
        assert_eq!(add(&JvmType::Long).unwrap(), Opcode::Ladd);
        assert!(matches!(
            add(&JvmType::Double),
            Err(CompileError::UnsupportedOperation { .. })
        ));
        assert!(add(&JvmType::object("java/lang/String")).is_err());
    }

    #[test]
    fn test_invoke() {
        assert_eq!(invoke(false, false), Opcode::Invokevirtual);
        assert_eq!(invoke(false, true), Opcode::Invokeinterface);
        assert_eq!(invoke(true, false), Opcode::Invokestatic);
        assert_eq!(invoke(true, true), Opcode::Invokestatic);
    }

    #[test]
    fn test_load_store() {
        assert_eq!(load(&JvmType::Boolean).unwrap(), Opcode::Iload);
        assert_eq!(load(&JvmType::Double).unwrap(), Opcode::Dload);
        assert_eq!(load(&JvmType::object("Foo")).unwrap(), Opcode::Aload);
        assert_eq!(store(&JvmType::Long).unwrap(), Opcode::Lstore);
        assert!(load(&JvmType::Void).is_err());
        assert!(store(&JvmType::Void).is_err());
    }

    #[test]
    fn test_push_int_forms() {
        assert_eq!(push_int(-1), OpcodeNode::new(Opcode::IconstM1));
        assert_eq!(push_int(5), OpcodeNode::new(Opcode::Iconst5));
        assert_eq!(
            push_int(-128),
            OpcodeNode::new(Opcode::Bipush).with_operand(DataValue::Int(-128))
        );
        assert_eq!(push_int(300).opcode(), Opcode::Sipush);
        assert_eq!(
            push_int(100_000),
            OpcodeNode::new(Opcode::Ldc).with_operand(DataValue::Int(100_000))
        );
    }

    #[test]
    fn test_push_wide_and_float_forms() {
        assert_eq!(push_long(1).opcode(), Opcode::Lconst1);
        assert_eq!(push_long(7).opcode(), Opcode::Ldc);
        assert_eq!(push_float(2.0).opcode(), Opcode::Fconst2);
        assert_eq!(push_float(-0.0).opcode(), Opcode::Ldc);
        assert_eq!(push_double(0.0).opcode(), Opcode::Dconst0);
        assert_eq!(push_double(0.5).opcode(), Opcode::Ldc);
        assert_eq!(push_string("baz").operands(), &[DataValue::Str("baz".to_string())]);
    }
}
