//! Statement Compilation Tests
//!
//! Tests for statement lowering:
//! - Sequences and blocks
//! - Assignment typing and slot reuse
//! - Print descriptors
//! - Assert and sleep

mod common;

use common::{compile, compile_error, execute, output, run};
use strand_codegen::bytecode::{Instruction, InvokeKind, MemberRef};
use strand_codegen::types::SlotKind;
use strand_codegen::{CodegenError, OperandType};
use strand_syntax::build::*;
use strand_syntax::{Node, NodeKind};

fn println_descriptors(tree: &Node) -> Vec<String> {
    let compilation = compile(tree);
    compilation
        .program()
        .instructions
        .iter()
        .filter_map(|i| match i {
            Instruction::Invoke {
                kind: InvokeKind::Virtual,
                method,
            } if method.name == "println" => Some(method.descriptor.clone()),
            _ => None,
        })
        .collect()
}

// ===== Sequence and Block Tests =====

#[test]
fn test_sequence_runs_in_order() {
    let tree = seq([print(int(1)), print(int(2)), print(int(3))]);
    assert_eq!(output(&tree), ["1", "2", "3"]);
}

#[test]
fn test_empty_program() {
    let compilation = compile(&seq(Vec::new()));
    let program = compilation.program();
    assert_eq!(program.instructions, [Instruction::Return]);
    assert_eq!(program.max_stack, 0);
    assert_eq!(program.max_locals, 0);
}

#[test]
fn test_block_unwraps_its_body() {
    let tree = block(seq([print(int(1)), print(int(2))]));
    assert_eq!(output(&tree), ["1", "2"]);
    assert_eq!(output(&Node::new(NodeKind::Block)), Vec::<String>::new());
}

#[test]
fn test_block_with_right_child_is_malformed() {
    let tree = Node::binary(NodeKind::Block, print(int(1)), print(int(2)));
    assert!(matches!(
        compile_error(&tree),
        CodegenError::Structural { .. }
    ));
}

#[test]
fn test_expression_in_statement_position() {
    let err = compile_error(&seq([print(int(1)), add(int(1), int(2))]));
    assert!(matches!(
        err,
        CodegenError::UnexpectedNode {
            context: "statement",
            ..
        }
    ));
}

// ===== Assignment Tests =====

#[test]
fn test_assignment_declares_then_reuses_slot() {
    let tree = seq([
        assign("x", int(5)),
        assign("y", string("s")),
        assign("x", int(6)),
        print(ident("x")),
    ]);
    let compilation = compile(&tree);
    let program = compilation.program();

    let stores: Vec<(SlotKind, u16)> = program
        .instructions
        .iter()
        .filter_map(|i| match i {
            Instruction::Store { kind, slot } => Some((*kind, *slot)),
            _ => None,
        })
        .collect();
    assert_eq!(
        stores,
        [(SlotKind::Int, 0), (SlotKind::Reference, 1), (SlotKind::Int, 0)]
    );
    assert_eq!(program.max_locals, 2);
    assert_eq!(run(program).output, ["6"]);
}

#[test]
fn test_retyping_a_variable_fails() {
    let tree = seq([assign("x", int(5)), assign("x", string("text"))]);
    match compile_error(&tree) {
        CodegenError::TypeMismatch {
            expected, actual, ..
        } => {
            assert_eq!(expected, OperandType::Int.to_string());
            assert_eq!(actual, OperandType::Reference.to_string());
        }
        other => panic!("expected a type mismatch, got {other}"),
    }
}

#[test]
fn test_assignment_target_must_be_identifier() {
    let tree = Node::binary(NodeKind::Assign, int(1), int(2));
    assert!(matches!(
        compile_error(&tree),
        CodegenError::Structural { .. }
    ));
}

#[test]
fn test_self_reference_before_declaration() {
    let err = compile_error(&assign("x", add(ident("x"), int(1))));
    assert!(matches!(err, CodegenError::UnknownVariable(_)));
}

#[test]
fn test_locals_are_recorded() {
    let compilation = compile(&seq([assign("a", float("1.0")), assign("b", boolean(true))]));
    let locals = &compilation.program().locals;

    assert_eq!(locals.len(), 2);
    assert_eq!(locals[0].name, "a");
    assert_eq!(locals[0].ty, OperandType::Float);
    assert_eq!(locals[1].slot, 1);
    assert_eq!(locals[1].ty, OperandType::Boolean);
}

// ===== Print Tests =====

#[test]
fn test_print_descriptors() {
    let tree = seq([
        print(boolean(true)),
        print(character('c')),
        print(int(1)),
        print(cast(NodeKind::CastByte, int(1))),
        print(cast(NodeKind::CastShort, int(1))),
        print(float("1.0")),
        print(string("s")),
    ]);
    assert_eq!(
        println_descriptors(&tree),
        ["(Z)V", "(C)V", "(I)V", "(I)V", "(I)V", "(F)V", "(Ljava/lang/Object;)V"]
    );
}

#[test]
fn test_print_fetches_stream_first() {
    let compilation = compile(&print(int(1)));
    let program = compilation.program();
    assert_eq!(
        program.instructions[0],
        Instruction::GetStatic(MemberRef::new(
            "java/lang/System",
            "out",
            "Ljava/io/PrintStream;"
        ))
    );
    assert_eq!(program.max_stack, 2);
}

#[test]
fn test_print_long_is_unsupported() {
    let err = compile_error(&print(cast(NodeKind::CastLong, int(1))));
    assert!(matches!(
        err,
        CodegenError::UnsupportedPrintType {
            ty: OperandType::Long,
            ..
        }
    ));

    let err = compile_error(&print(cast(NodeKind::CastDouble, int(1))));
    assert!(matches!(err, CodegenError::UnsupportedPrintType { .. }));
}

// ===== Assert Tests =====

#[test]
fn test_failing_assert_throws() {
    let outcome = execute(&seq([assert(int(0)), print(string("unreachable"))]));
    assert_eq!(outcome.thrown.as_deref(), Some("java/lang/AssertionError"));
    assert!(outcome.output.is_empty());
}

#[test]
fn test_passing_assert_skips_throw() {
    let outcome = execute(&seq([assert(int(1)), print(string("after"))]));
    assert_eq!(outcome.thrown, None);
    assert_eq!(outcome.output, ["after"]);
}

#[test]
fn test_assert_layout() {
    let compilation = compile(&assert(equal(int(1), int(1))));
    let program = compilation.program();

    assert!(program.instructions.contains(&Instruction::Throw));
    assert!(program.instructions.iter().any(|i| matches!(
        i,
        Instruction::New { class } if class == "java/lang/AssertionError"
    )));
    assert_eq!(program.max_stack, 3);
}

#[test]
fn test_assert_requires_int_category() {
    let err = compile_error(&assert(string("no")));
    assert!(matches!(err, CodegenError::TypeMismatch { .. }));
}

// ===== Sleep Tests =====

#[test]
fn test_sleep_widens_to_long() {
    let outcome = execute(&seq([assign("ms", int(250)), sleep(ident("ms"))]));
    assert_eq!(outcome.sleeps, [250]);
}

#[test]
fn test_sleep_rejects_float() {
    let err = compile_error(&sleep(float("1.5")));
    assert!(matches!(err, CodegenError::TypeMismatch { .. }));
}

#[test]
fn test_sleep_requires_duration() {
    let err = compile_error(&Node::new(NodeKind::Sleep));
    assert!(matches!(err, CodegenError::Structural { .. }));
}
