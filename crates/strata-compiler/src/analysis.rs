//! Operand stack and local frame limits of a lowered body
//!
//! Follows every path from the first instruction, tracking stack depth in
//! words. A jump to an undefined label, an underflow or two paths reaching
//! the same instruction at different depths make the result unknown.

use rustc_hash::FxHashMap;
use strata_bytecode::{JvmType, MethodDescriptor, Opcode};
use strata_xmir::DataValue;

use crate::ast::{Instruction, OpcodeNode};

/// Maximum operand stack depth, or `None` if it cannot be determined
pub fn max_stack(instructions: &[Instruction]) -> Option<u16> {
    let mut targets: FxHashMap<&str, usize> = FxHashMap::default();
    for (index, instruction) in instructions.iter().enumerate() {
        if let Instruction::Label(label) = instruction {
            if targets.insert(label.id(), index).is_some() {
                return None;
            }
        }
    }

    let mut depths: Vec<Option<u32>> = vec![None; instructions.len()];
    let mut worklist = Vec::new();
    if !instructions.is_empty() {
        depths[0] = Some(0);
        worklist.push(0);
    }

    let mut max: u32 = 0;
    while let Some(index) = worklist.pop() {
        let depth = depths[index]?;
        let (next_depth, successors) = match &instructions[index] {
            Instruction::Label(_) => (depth, vec![index + 1]),
            Instruction::Opcode(op) => {
                let (pops, pushes) = stack_effect(op)?;
                let remaining = depth.checked_sub(u32::from(pops))?;
                let mut successors = Vec::with_capacity(2);
                if op.opcode().is_jump() {
                    successors.push(*targets.get(op.target()?)?);
                }
                if !op.opcode().is_terminator() {
                    successors.push(index + 1);
                }
                (remaining + u32::from(pushes), successors)
            }
        };
        max = max.max(next_depth);
        for successor in successors {
            if successor >= instructions.len() {
                continue;
            }
            match depths[successor] {
                Some(seen) if seen != next_depth => return None,
                Some(_) => {}
                None => {
                    depths[successor] = Some(next_depth);
                    worklist.push(successor);
                }
            }
        }
    }
    u16::try_from(max).ok()
}

/// Local slots used: the parameter frame or the highest slot touched
pub fn max_locals(instructions: &[Instruction], frame_size: u16) -> u16 {
    instructions
        .iter()
        .filter_map(Instruction::as_opcode)
        .filter_map(|op| {
            let width = match op.opcode() {
                Opcode::Iload
                | Opcode::Fload
                | Opcode::Aload
                | Opcode::Istore
                | Opcode::Fstore
                | Opcode::Astore
                | Opcode::Iinc => 1,
                Opcode::Lload | Opcode::Dload | Opcode::Lstore | Opcode::Dstore => 2,
                _ => return None,
            };
            let slot = op.operands().first()?.as_i64()?;
            let slot = u16::try_from(slot).ok()?;
            Some(slot.saturating_add(width))
        })
        .fold(frame_size, u16::max)
}

/// `(pops, pushes)` including effects that depend on operands
fn stack_effect(op: &OpcodeNode) -> Option<(u16, u16)> {
    if let Some(effect) = op.opcode().stack_effect() {
        return Some(effect);
    }
    let operands = op.operands();
    match op.opcode() {
        Opcode::Ldc => match operands.first()? {
            DataValue::Long(_) | DataValue::Double(_) => Some((0, 2)),
            _ => Some((0, 1)),
        },
        Opcode::Invokevirtual
        | Opcode::Invokespecial
        | Opcode::Invokestatic
        | Opcode::Invokeinterface => {
            let descriptor = MethodDescriptor::parse(operands.get(2)?.as_str()?).ok()?;
            let receiver = u16::from(op.opcode() != Opcode::Invokestatic);
            Some((descriptor.params_size() + receiver, descriptor.ret.size()))
        }
        Opcode::Getstatic | Opcode::Putstatic | Opcode::Getfield | Opcode::Putfield => {
            let descriptor = operands.get(2)?.as_str()?;
            let size = JvmType::from_descriptor(descriptor).ok()?.size();
            match op.opcode() {
                Opcode::Getstatic => Some((0, size)),
                Opcode::Putstatic => Some((size, 0)),
                Opcode::Getfield => Some((1, size)),
                _ => Some((1 + size, 0)),
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::LabelNode;

    fn op(opcode: Opcode) -> Instruction {
        Instruction::from(opcode)
    }

    #[test]
    fn test_straight_line() {
        let body: Vec<Instruction> = vec![
            OpcodeNode::slot(Opcode::Lload, 1).into(),
            OpcodeNode::slot(Opcode::Lload, 3).into(),
            op(Opcode::Ladd),
            op(Opcode::Lreturn),
        ];
        assert_eq!(max_stack(&body), Some(4));
        assert_eq!(max_locals(&body, 1), 5);
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(max_stack(&[]), Some(0));
        assert_eq!(max_locals(&[], 2), 2);
    }

    #[test]
    fn test_invoke_effects() {
        let body: Vec<Instruction> = vec![
            OpcodeNode::slot(Opcode::Aload, 0).into(),
            OpcodeNode::new(Opcode::Ldc)
                .with_operand(DataValue::Double(2.5))
                .into(),
            op(Opcode::Iconst1),
            OpcodeNode::invoke(Opcode::Invokevirtual, "Foo", "f", "(DI)J", false).into(),
            op(Opcode::Pop2),
            op(Opcode::Return),
        ];
        assert_eq!(max_stack(&body), Some(4));
    }

    #[test]
    fn test_branches_must_agree() {
        // if (local1 == 0) push 1 else push 2; both paths reach "join" with depth 1
        let body: Vec<Instruction> = vec![
            OpcodeNode::slot(Opcode::Iload, 1).into(),
            OpcodeNode::jump(Opcode::Ifeq, "else").into(),
            op(Opcode::Iconst1),
            OpcodeNode::jump(Opcode::Goto, "join").into(),
            LabelNode::new("else").into(),
            op(Opcode::Iconst2),
            LabelNode::new("join").into(),
            op(Opcode::Ireturn),
        ];
        assert_eq!(max_stack(&body), Some(1));

        let mismatched: Vec<Instruction> = vec![
            OpcodeNode::slot(Opcode::Iload, 1).into(),
            OpcodeNode::jump(Opcode::Ifeq, "join").into(),
            op(Opcode::Iconst1),
            LabelNode::new("join").into(),
            op(Opcode::Return),
        ];
        assert_eq!(max_stack(&mismatched), None);
    }

    #[test]
    fn test_gives_up() {
        let undefined: Vec<Instruction> = vec![OpcodeNode::jump(Opcode::Goto, "nowhere").into()];
        assert_eq!(max_stack(&undefined), None);

        let underflow = vec![op(Opcode::Iadd)];
        assert_eq!(max_stack(&underflow), None);
    }
}
