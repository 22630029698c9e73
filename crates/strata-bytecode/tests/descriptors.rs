//! Descriptor parsing and opcode table consistency

use strata_bytecode::types::{argument_types, return_type};
use strata_bytecode::{DescriptorError, JvmType, MethodDescriptor, Opcode};

#[test]
fn test_method_descriptor_with_mixed_params() {
    let desc = MethodDescriptor::parse("(IJ[Ljava/lang/String;D)Ljava/lang/Object;").unwrap();
    assert_eq!(
        desc.params,
        vec![
            JvmType::Int,
            JvmType::Long,
            JvmType::Array(Box::new(JvmType::object("java/lang/String"))),
            JvmType::Double,
        ]
    );
    assert_eq!(desc.ret, JvmType::object("java.lang.Object"));
    assert_eq!(desc.params_size(), 6);
    assert_eq!(desc.to_string(), "(IJ[Ljava/lang/String;D)Ljava/lang/Object;");
}

#[test]
fn test_free_functions_agree_with_parse() {
    assert_eq!(argument_types("(ZC)V").unwrap(), vec![JvmType::Boolean, JvmType::Char]);
    assert_eq!(return_type("()J").unwrap(), JvmType::Long);
}

#[test]
fn test_rejected_descriptors() {
    assert!(matches!(MethodDescriptor::parse(""), Err(DescriptorError::Empty)));
    assert!(matches!(
        MethodDescriptor::parse("I"),
        Err(DescriptorError::NotAMethod { .. })
    ));
    assert!(matches!(
        MethodDescriptor::parse("(V)V"),
        Err(DescriptorError::VoidParameter { .. })
    ));
    assert!(matches!(
        MethodDescriptor::parse("(Ljava/lang/String)V"),
        Err(DescriptorError::UnterminatedClassName { .. })
    ));
    assert!(JvmType::from_descriptor("II").is_err());
}

#[test]
fn test_type_names() {
    assert_eq!(JvmType::from_name("long").unwrap(), JvmType::Long);
    assert_eq!(JvmType::from_name("J").unwrap(), JvmType::Long);
    assert_eq!(
        JvmType::from_name("int[]").unwrap(),
        JvmType::Array(Box::new(JvmType::Int))
    );
    assert_eq!(JvmType::from_name("a.b.C").unwrap(), JvmType::object("a/b/C"));
    assert_eq!(JvmType::object("a/b/C").descriptor(), "La/b/C;");
}

#[test]
fn test_every_byte_round_trips_through_name() {
    for byte in 0..=u8::MAX {
        if let Some(op) = Opcode::from_u8(byte) {
            assert_eq!(op.to_u8(), byte);
            assert_eq!(Opcode::from_name(op.name()), Some(op));
            if op.is_terminator() {
                assert!(op.is_return() || op == Opcode::Goto || op == Opcode::Athrow);
            }
        }
    }
}
