//! Expression compilation to bytecode
//!
//! Each call compiles one expression subtree and leaves exactly one new
//! entry on the type stack.

use crate::bytecode::Constant;
use crate::compiler::context::CompileContext;
use crate::compiler::control_flow::ControlFlowCompiler;
use crate::error::{CodegenError, CodegenResult};
use crate::types::{ArithOp, OperandType};
use strand_syntax::{Node, NodeKind};
use tracing::trace;

pub struct ExprCompiler;

impl ExprCompiler {
    pub fn compile(cx: &mut CompileContext<'_>, node: &Node) -> CodegenResult<()> {
        trace!(node = %node, depth = cx.types.depth(), "compile expression");

        match node.kind {
            NodeKind::Identifier => Self::compile_identifier(cx, node),

            NodeKind::LiteralBoolean
            | NodeKind::LiteralCharacter
            | NodeKind::LiteralInteger
            | NodeKind::LiteralFloat
            | NodeKind::LiteralString => Self::compile_literal(cx, node),

            NodeKind::Add => Self::compile_binop(cx, node, ArithOp::Add),
            NodeKind::Subtract => Self::compile_binop(cx, node, ArithOp::Sub),
            NodeKind::Multiply => Self::compile_binop(cx, node, ArithOp::Mul),
            NodeKind::Divide => Self::compile_binop(cx, node, ArithOp::Div),
            NodeKind::Modulo => Self::compile_binop(cx, node, ArithOp::Rem),

            NodeKind::CastChar => Self::compile_cast(cx, node, OperandType::Char),
            NodeKind::CastByte => Self::compile_cast(cx, node, OperandType::Byte),
            NodeKind::CastShort => Self::compile_cast(cx, node, OperandType::Short),
            NodeKind::CastInt => Self::compile_cast(cx, node, OperandType::Int),
            NodeKind::CastLong => Self::compile_cast(cx, node, OperandType::Long),
            NodeKind::CastFloat => Self::compile_cast(cx, node, OperandType::Float),
            NodeKind::CastDouble => Self::compile_cast(cx, node, OperandType::Double),

            NodeKind::And
            | NodeKind::Or
            | NodeKind::Not
            | NodeKind::Equal
            | NodeKind::Less
            | NodeKind::Greater => ControlFlowCompiler::compile_boolean(cx, node),

            NodeKind::Sequence
            | NodeKind::Block
            | NodeKind::Assign
            | NodeKind::If
            | NodeKind::IfElse
            | NodeKind::Loop
            | NodeKind::Assert
            | NodeKind::Print
            | NodeKind::Multitask
            | NodeKind::Sleep => Err(CodegenError::unexpected(node, "expression")),
        }
    }

    fn compile_identifier(cx: &mut CompileContext<'_>, node: &Node) -> CodegenResult<()> {
        let name = node
            .value()
            .ok_or_else(|| CodegenError::structural(node, "identifier without a name"))?;
        let symbol = cx
            .symbols
            .lookup(name)
            .ok_or_else(|| CodegenError::UnknownVariable(name.to_string()))?;
        let kind = symbol.ty.slot_kind().map_err(|e| e.located(node))?;

        cx.code.emit_load(kind, symbol.slot);
        cx.types.push(symbol.ty);
        Ok(())
    }

    fn compile_literal(cx: &mut CompileContext<'_>, node: &Node) -> CodegenResult<()> {
        let raw = node
            .value()
            .ok_or_else(|| CodegenError::structural(node, "literal without a value"))?;
        let (constant, ty) = Self::parse_literal(node, raw)?;
        cx.push_constant(constant, ty);
        Ok(())
    }

    /// The constant and type a literal node denotes.
    pub fn parse_literal(node: &Node, raw: &str) -> CodegenResult<(Constant, OperandType)> {
        let invalid = || CodegenError::structural(node, format!("invalid literal {raw:?}"));

        match node.kind {
            NodeKind::LiteralBoolean => match raw {
                "true" => Ok((Constant::Int(1), OperandType::Boolean)),
                "false" => Ok((Constant::Int(0), OperandType::Boolean)),
                _ => Err(invalid()),
            },
            NodeKind::LiteralCharacter => {
                let mut chars = raw.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => {
                        let unit = u16::try_from(u32::from(c)).map_err(|_| {
                            CodegenError::structural(
                                node,
                                format!("character {c:?} does not fit in 16 bits"),
                            )
                        })?;
                        Ok((Constant::Int(i32::from(unit)), OperandType::Char))
                    }
                    _ => Err(invalid()),
                }
            }
            NodeKind::LiteralInteger => raw
                .trim()
                .parse::<i32>()
                .map(|v| (Constant::Int(v), OperandType::Int))
                .map_err(|_| invalid()),
            NodeKind::LiteralFloat => match raw.trim().parse::<f32>() {
                Ok(v) if v.is_finite() => Ok((Constant::Float(v), OperandType::Float)),
                _ => Err(invalid()),
            },
            NodeKind::LiteralString => Ok((
                Constant::String(raw.to_string()),
                OperandType::Reference,
            )),
            _ => Err(CodegenError::unexpected(node, "literal")),
        }
    }

    fn compile_binop(cx: &mut CompileContext<'_>, node: &Node, op: ArithOp) -> CodegenResult<()> {
        let (left, right) = Self::operands(node)?;
        Self::compile_arithmetic(cx, node, op, left, right)
    }

    /// Compile `left op right` with both operands of one type.
    ///
    /// No implicit promotion: operands of different types need an explicit
    /// cast.
    pub fn compile_arithmetic(
        cx: &mut CompileContext<'_>,
        node: &Node,
        op: ArithOp,
        left: &Node,
        right: &Node,
    ) -> CodegenResult<()> {
        Self::compile(cx, left)?;
        Self::compile(cx, right)?;

        let rhs = cx.types.pop(node)?;
        let lhs = cx.types.pop(node)?;
        if lhs != rhs {
            return Err(CodegenError::type_mismatch(node, lhs, rhs));
        }

        let family = lhs.arithmetic_family().map_err(|e| e.located(node))?;
        cx.code.emit_arithmetic(op, family);
        cx.types.push(lhs);
        Ok(())
    }

    fn compile_cast(
        cx: &mut CompileContext<'_>,
        node: &Node,
        target: OperandType,
    ) -> CodegenResult<()> {
        let operand = node
            .left()
            .ok_or_else(|| CodegenError::structural(node, "cast without an operand"))?;
        Self::compile(cx, operand)?;

        let from = cx.types.pop(node)?;
        let conversion = from.conversion_to(target).map_err(|e| e.located(node))?;
        cx.code.emit_conversion(conversion);
        cx.types.push(target);
        Ok(())
    }

    pub(crate) fn operands(node: &Node) -> CodegenResult<(&Node, &Node)> {
        let left = node
            .left()
            .ok_or_else(|| CodegenError::structural(node, "missing left operand"))?;
        let right = node
            .right()
            .ok_or_else(|| CodegenError::structural(node, "missing right operand"))?;
        Ok((left, right))
    }
}
