//! Statement compilation to bytecode
//!
//! Statements leave the type stack exactly as they found it.

use crate::bytecode::{Constant, InvokeKind, ZeroTest};
use crate::compiler::context::CompileContext;
use crate::compiler::control_flow::ControlFlowCompiler;
use crate::compiler::expr::ExprCompiler;
use crate::error::{CodegenError, CodegenResult};
use crate::types::{Conversion, OperandType};
use strand_syntax::{Node, NodeKind};
use tracing::{debug, trace};

const THREAD: &str = "java/lang/Thread";
const PRINT_STREAM: &str = "java/io/PrintStream";
const ASSERTION_ERROR: &str = "java/lang/AssertionError";
const ASSERTION_MESSAGE: &str = "Assertion failed";

pub struct StmtCompiler;

impl StmtCompiler {
    pub fn compile(cx: &mut CompileContext<'_>, node: &Node) -> CodegenResult<()> {
        trace!(node = %node, "compile statement");

        match node.kind {
            NodeKind::Sequence => Self::compile_sequence(cx, node),
            NodeKind::Block => Self::compile_block(cx, node),
            NodeKind::Assign => Self::compile_assign(cx, node),
            NodeKind::Print => Self::compile_print(cx, node),
            NodeKind::Assert => Self::compile_assert(cx, node),
            NodeKind::Sleep => Self::compile_sleep(cx, node),
            NodeKind::Multitask => Self::compile_multitask(cx, node),
            NodeKind::If => ControlFlowCompiler::compile_if(cx, node),
            NodeKind::IfElse => ControlFlowCompiler::compile_if_else(cx, node),
            NodeKind::Loop => ControlFlowCompiler::compile_loop(cx, node),
            _ => Err(CodegenError::unexpected(node, "statement")),
        }
    }

    fn compile_sequence(cx: &mut CompileContext<'_>, node: &Node) -> CodegenResult<()> {
        if let Some(first) = node.left() {
            Self::compile(cx, first)?;
        }
        if let Some(rest) = node.right() {
            Self::compile(cx, rest)?;
        }
        Ok(())
    }

    fn compile_block(cx: &mut CompileContext<'_>, node: &Node) -> CodegenResult<()> {
        if node.right().is_some() {
            return Err(CodegenError::structural(node, "block with a right child"));
        }
        match node.left() {
            Some(body) => Self::compile(cx, body),
            None => Ok(()),
        }
    }

    fn compile_assign(cx: &mut CompileContext<'_>, node: &Node) -> CodegenResult<()> {
        let target = node
            .left()
            .ok_or_else(|| CodegenError::structural(node, "assignment without a target"))?;
        if target.kind != NodeKind::Identifier {
            return Err(CodegenError::structural(
                node,
                format!("assignment target must be an identifier, found {}", target.kind),
            ));
        }
        let name = target
            .value()
            .ok_or_else(|| CodegenError::structural(target, "identifier without a name"))?;
        let value = node
            .right()
            .ok_or_else(|| CodegenError::structural(node, "assignment without a value"))?;

        ExprCompiler::compile(cx, value)?;
        let ty = cx.types.pop(node)?;

        let slot = match cx.symbols.lookup(name) {
            Some(symbol) if symbol.ty != ty => {
                return Err(CodegenError::type_mismatch(target, symbol.ty, ty));
            }
            Some(symbol) => symbol.slot,
            None => cx.symbols.declare(name, ty)?,
        };

        let kind = ty.slot_kind().map_err(|e| e.located(node))?;
        cx.code.emit_store(kind, slot);
        Ok(())
    }

    fn compile_print(cx: &mut CompileContext<'_>, node: &Node) -> CodegenResult<()> {
        let value = operand(node, "print without a value")?;

        cx.code
            .emit_get_static("java/lang/System", "out", "Ljava/io/PrintStream;");
        cx.types.push(OperandType::Reference);

        ExprCompiler::compile(cx, value)?;
        let ty = cx.types.pop(node)?;
        let descriptor = print_descriptor(ty).ok_or_else(|| CodegenError::UnsupportedPrintType {
            ty,
            node: node.to_string(),
        })?;
        cx.types.pop(node)?;

        cx.code
            .emit_invoke(InvokeKind::Virtual, PRINT_STREAM, "println", descriptor);
        Ok(())
    }

    fn compile_assert(cx: &mut CompileContext<'_>, node: &Node) -> CodegenResult<()> {
        let condition = operand(node, "assert without a condition")?;

        ExprCompiler::compile(cx, condition)?;
        cx.types.pop_int_category(node)?;

        let ok = cx.code.new_label();
        cx.code.emit_conditional_jump(ZeroTest::Ne, ok);

        cx.code.emit_new(ASSERTION_ERROR);
        cx.types.push(OperandType::Reference);
        cx.code.emit_dup();
        cx.types.push(OperandType::Reference);
        cx.push_constant(
            Constant::String(ASSERTION_MESSAGE.to_string()),
            OperandType::Reference,
        );

        cx.code.emit_invoke(
            InvokeKind::Special,
            ASSERTION_ERROR,
            "<init>",
            "(Ljava/lang/Object;)V",
        );
        cx.types.pop(node)?;
        cx.types.pop(node)?;

        cx.code.emit_throw();
        cx.types.pop(node)?;

        cx.code.emit_label(ok);
        Ok(())
    }

    fn compile_sleep(cx: &mut CompileContext<'_>, node: &Node) -> CodegenResult<()> {
        let millis = operand(node, "sleep without a duration")?;

        ExprCompiler::compile(cx, millis)?;
        cx.types.pop_int_category(node)?;
        cx.code.emit_conversion(Conversion::I2L);
        cx.types.push(OperandType::Long);

        cx.code
            .emit_invoke(InvokeKind::Static, THREAD, "sleep", "(J)V");
        cx.types.pop(node)?;
        Ok(())
    }

    /// Start a new thread running the named task unit.
    fn compile_multitask(cx: &mut CompileContext<'_>, node: &Node) -> CodegenResult<()> {
        let task = node
            .value()
            .ok_or_else(|| CodegenError::structural(node, "multitask without a unit name"))?;

        match node.left() {
            Some(body) => cx.session.compile_inline_task(task, body)?,
            None => {
                let resolved = cx.session.resolve_task(task, node)?;
                if !resolved.has_default_constructor {
                    return Err(CodegenError::InvalidTaskUnit {
                        name: task.to_string(),
                        reason: "no zero-argument constructor".to_string(),
                    });
                }
                if !resolved.runnable {
                    return Err(CodegenError::InvalidTaskUnit {
                        name: task.to_string(),
                        reason: "not runnable".to_string(),
                    });
                }
            }
        }
        debug!(unit = %cx.unit_name, task, "spawn");

        cx.code.emit_new(THREAD);
        cx.types.push(OperandType::Reference);
        cx.code.emit_dup();
        cx.types.push(OperandType::Reference);

        cx.code.emit_new(task);
        cx.types.push(OperandType::Reference);
        cx.code.emit_dup();
        cx.types.push(OperandType::Reference);
        cx.code
            .emit_invoke(InvokeKind::Special, task, "<init>", "()V");
        cx.types.pop(node)?;

        cx.code.emit_invoke(
            InvokeKind::Special,
            THREAD,
            "<init>",
            "(Ljava/lang/Runnable;)V",
        );
        cx.types.pop(node)?;
        cx.types.pop(node)?;

        cx.code
            .emit_invoke(InvokeKind::Virtual, THREAD, "start", "()V");
        cx.types.pop(node)?;
        Ok(())
    }
}

fn operand<'a>(node: &'a Node, message: &str) -> CodegenResult<&'a Node> {
    node.left()
        .ok_or_else(|| CodegenError::structural(node, message))
}

/// Descriptor of the `println` overload taking a value of type `ty`.
pub fn print_descriptor(ty: OperandType) -> Option<&'static str> {
    match ty {
        OperandType::Boolean => Some("(Z)V"),
        OperandType::Char => Some("(C)V"),
        OperandType::Byte | OperandType::Short | OperandType::Int => Some("(I)V"),
        OperandType::Float => Some("(F)V"),
        OperandType::Reference => Some("(Ljava/lang/Object;)V"),
        _ => None,
    }
}
