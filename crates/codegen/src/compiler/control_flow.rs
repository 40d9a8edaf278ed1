//! Conditional and loop lowering
//!
//! Every branching construct goes through one primitive: compile a
//! condition, branch past the then arm on a test against zero, place labels.
//! Boolean and comparison operators are described as a [`Conditional`] and
//! lowered through the same path, so no synthetic syntax nodes are created.

use crate::bytecode::{Constant, ZeroTest};
use crate::compiler::context::CompileContext;
use crate::compiler::expr::ExprCompiler;
use crate::compiler::stmt::StmtCompiler;
use crate::error::{CodegenError, CodegenResult};
use crate::types::{ArithOp, OperandType};
use strand_syntax::{Node, NodeKind};

/// The value a conditional tests against zero.
#[derive(Debug, Clone, Copy)]
enum Condition<'a> {
    Value(&'a Node),
    /// `left - right`, used by the comparison operators.
    Difference { left: &'a Node, right: &'a Node },
}

#[derive(Debug, Clone, Copy)]
enum Arm<'a> {
    /// Leaves nothing on the stack.
    Statement(&'a Node),
    /// Leaves one integer-category value.
    Value(&'a Node),
    Constant(i32),
}

impl Arm<'_> {
    fn is_statement(&self) -> bool {
        matches!(self, Arm::Statement(_))
    }
}

#[derive(Debug, Clone, Copy)]
struct Conditional<'a> {
    origin: &'a Node,
    condition: Condition<'a>,
    then_arm: Arm<'a>,
    else_arm: Option<Arm<'a>>,
    /// Test under which control skips the then arm.
    branch_to_else: ZeroTest,
}

pub struct ControlFlowCompiler;

impl ControlFlowCompiler {
    /// `if (cond) then`
    pub fn compile_if(cx: &mut CompileContext<'_>, node: &Node) -> CodegenResult<()> {
        let condition = required(node, node.left(), "if without a condition")?;
        let then_branch = required(node, node.right(), "if without a then statement")?;

        Self::compile_conditional(
            cx,
            Conditional {
                origin: node,
                condition: Condition::Value(condition),
                then_arm: Arm::Statement(then_branch),
                else_arm: None,
                branch_to_else: ZeroTest::Eq,
            },
        )
    }

    /// `if (cond) then else otherwise`; the right child holds both branches.
    pub fn compile_if_else(cx: &mut CompileContext<'_>, node: &Node) -> CodegenResult<()> {
        let condition = required(node, node.left(), "if-else without a condition")?;
        let branches = required(node, node.right(), "if-else without branches")?;
        if branches.kind != NodeKind::Sequence {
            return Err(CodegenError::structural(
                node,
                format!("if-else branches must be a sequence, found {}", branches.kind),
            ));
        }
        let then_branch = required(node, branches.left(), "if-else without a then statement")?;
        let else_branch = required(node, branches.right(), "if-else without an else statement")?;

        Self::compile_conditional(
            cx,
            Conditional {
                origin: node,
                condition: Condition::Value(condition),
                then_arm: Arm::Statement(then_branch),
                else_arm: Some(Arm::Statement(else_branch)),
                branch_to_else: ZeroTest::Eq,
            },
        )
    }

    /// Pre-test loop: the body runs while the condition is non-zero.
    pub fn compile_loop(cx: &mut CompileContext<'_>, node: &Node) -> CodegenResult<()> {
        let condition = required(node, node.left(), "loop without a condition")?;
        let body = required(node, node.right(), "loop without a body")?;

        let top = cx.code.new_label();
        let end = cx.code.new_label();

        cx.code.emit_label(top);
        ExprCompiler::compile(cx, condition)?;
        cx.types.pop_int_category(node)?;
        cx.code.emit_conditional_jump(ZeroTest::Eq, end);

        StmtCompiler::compile(cx, body)?;
        cx.code.emit_jump(top);
        cx.code.emit_label(end);
        Ok(())
    }

    /// Lower a boolean or comparison operator to a conditional leaving 0 or 1.
    pub fn compile_boolean(cx: &mut CompileContext<'_>, node: &Node) -> CodegenResult<()> {
        let conditional = match node.kind {
            NodeKind::And => {
                let (left, right) = ExprCompiler::operands(node)?;
                Conditional {
                    origin: node,
                    condition: Condition::Value(left),
                    then_arm: Arm::Value(right),
                    else_arm: Some(Arm::Constant(0)),
                    branch_to_else: ZeroTest::Eq,
                }
            }
            NodeKind::Or => {
                let (left, right) = ExprCompiler::operands(node)?;
                Conditional {
                    origin: node,
                    condition: Condition::Value(left),
                    then_arm: Arm::Value(right),
                    else_arm: Some(Arm::Constant(1)),
                    branch_to_else: ZeroTest::Ne,
                }
            }
            NodeKind::Not => {
                let operand = required(node, node.left(), "not without an operand")?;
                Conditional {
                    origin: node,
                    condition: Condition::Value(operand),
                    then_arm: Arm::Constant(0),
                    else_arm: Some(Arm::Constant(1)),
                    branch_to_else: ZeroTest::Eq,
                }
            }
            NodeKind::Equal => Self::comparison(node, ZeroTest::Ne)?,
            NodeKind::Less => Self::comparison(node, ZeroTest::Ge)?,
            NodeKind::Greater => Self::comparison(node, ZeroTest::Le)?,
            _ => return Err(CodegenError::unexpected(node, "boolean operator")),
        };

        Self::compile_conditional(cx, conditional)
    }

    fn comparison(node: &Node, branch_to_else: ZeroTest) -> CodegenResult<Conditional<'_>> {
        let (left, right) = ExprCompiler::operands(node)?;
        Ok(Conditional {
            origin: node,
            condition: Condition::Difference { left, right },
            then_arm: Arm::Constant(1),
            else_arm: Some(Arm::Constant(0)),
            branch_to_else,
        })
    }

    fn compile_conditional(cx: &mut CompileContext<'_>, c: Conditional<'_>) -> CodegenResult<()> {
        match c.condition {
            Condition::Value(value) => ExprCompiler::compile(cx, value)?,
            Condition::Difference { left, right } => {
                ExprCompiler::compile_arithmetic(cx, c.origin, ArithOp::Sub, left, right)?
            }
        }
        cx.types.pop_int_category(c.origin)?;

        let yields_value = !c.then_arm.is_statement();
        let end = cx.code.new_label();

        match c.else_arm {
            None => {
                cx.code.emit_conditional_jump(c.branch_to_else, end);
                Self::compile_arm(cx, c.origin, c.then_arm)?;
            }
            Some(else_arm) => {
                if else_arm.is_statement() == yields_value {
                    return Err(CodegenError::structural(
                        c.origin,
                        "conditional arms disagree on producing a value",
                    ));
                }
                let otherwise = cx.code.new_label();
                cx.code.emit_conditional_jump(c.branch_to_else, otherwise);
                Self::compile_arm(cx, c.origin, c.then_arm)?;
                cx.code.emit_jump(end);
                cx.code.emit_label(otherwise);
                Self::compile_arm(cx, c.origin, else_arm)?;
            }
        }

        cx.code.emit_label(end);
        if yields_value {
            cx.types.push(OperandType::Boolean);
        }
        Ok(())
    }

    /// Compile one arm. Value arms are popped here; the caller pushes the
    /// joined result once both arms are done.
    fn compile_arm(cx: &mut CompileContext<'_>, origin: &Node, arm: Arm<'_>) -> CodegenResult<()> {
        match arm {
            Arm::Statement(statement) => StmtCompiler::compile(cx, statement),
            Arm::Value(value) => {
                ExprCompiler::compile(cx, value)?;
                cx.types.pop_int_category(origin)?;
                Ok(())
            }
            Arm::Constant(value) => {
                cx.push_constant(Constant::Int(value), OperandType::Boolean);
                cx.types.pop(origin)?;
                Ok(())
            }
        }
    }
}

fn required<'a>(node: &Node, child: Option<&'a Node>, message: &str) -> CodegenResult<&'a Node> {
    child.ok_or_else(|| CodegenError::structural(node, message))
}
