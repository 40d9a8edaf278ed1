//! Test support: a small interpreter for compiled units
//!
//! Runs a unit's instruction stream on a real value stack so tests can check
//! what the emitted jump graphs compute, not just which instructions appear.

#![allow(dead_code)]

use strand_codegen::bytecode::{Constant, Instruction, InvokeKind, Unit};
use strand_codegen::types::{ArithOp, Conversion, NumericFamily};
use strand_codegen::{Compilation, CompilerConfig, Session};
use strand_syntax::Node;

const STEP_LIMIT: usize = 100_000;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(String),
    Object(String),
    Stream,
}

impl Value {
    fn int(&self) -> i32 {
        match self {
            Value::Int(v) => *v,
            other => panic!("expected int on the stack, found {other:?}"),
        }
    }

    fn render(&self) -> String {
        match self {
            Value::Int(v) => v.to_string(),
            Value::Long(v) => v.to_string(),
            Value::Float(v) => format!("{v:?}"),
            Value::Double(v) => format!("{v:?}"),
            Value::Str(s) => s.clone(),
            Value::Object(class) => format!("{class}@object"),
            Value::Stream => "System.out".to_string(),
        }
    }
}

/// Observable effects of running one unit.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Outcome {
    pub output: Vec<String>,
    pub spawned: Vec<String>,
    pub sleeps: Vec<i64>,
    pub thrown: Option<String>,
    pub max_depth: usize,
    /// Stack left when the run stopped; expression probes read it.
    pub stack: Vec<Value>,
}

pub fn run(unit: &Unit) -> Outcome {
    let labels = unit.label_offsets();
    let mut locals: Vec<Option<Value>> = vec![None; usize::from(unit.max_locals)];
    let mut stack: Vec<Value> = Vec::new();
    let mut outcome = Outcome::default();
    let mut bound_task: Option<String> = None;
    let mut pc = 0;
    let mut steps = 0;

    while pc < unit.instructions.len() {
        steps += 1;
        assert!(steps < STEP_LIMIT, "unit {} did not terminate", unit.name);

        let mut next = pc + 1;
        match &unit.instructions[pc] {
            Instruction::Push(constant) => stack.push(match constant {
                Constant::Int(v) => Value::Int(*v),
                Constant::Long(v) => Value::Long(*v),
                Constant::Float(v) => Value::Float(*v),
                Constant::Double(v) => Value::Double(*v),
                Constant::String(s) => Value::Str(s.clone()),
            }),
            Instruction::Dup => {
                let top = stack.last().cloned().expect("dup on empty stack");
                stack.push(top);
            }
            Instruction::Load { slot, .. } => {
                let value = locals[usize::from(*slot)]
                    .clone()
                    .unwrap_or_else(|| panic!("load of unset slot {slot}"));
                stack.push(value);
            }
            Instruction::Store { slot, .. } => {
                locals[usize::from(*slot)] = Some(stack.pop().expect("store on empty stack"));
            }
            Instruction::Arith { op, family } => {
                let rhs = stack.pop().expect("missing right operand");
                let lhs = stack.pop().expect("missing left operand");
                match arithmetic(*op, *family, lhs, rhs) {
                    Some(value) => stack.push(value),
                    None => {
                        outcome.thrown = Some("java/lang/ArithmeticException".to_string());
                        break;
                    }
                }
            }
            Instruction::Convert(conversion) => {
                let value = stack.pop().expect("convert on empty stack");
                stack.push(convert(*conversion, value));
            }
            Instruction::JumpIf { test, target } => {
                let value = stack.pop().expect("branch on empty stack").int();
                if test.holds(i64::from(value)) {
                    next = labels[target];
                }
            }
            Instruction::Jump { target } => next = labels[target],
            Instruction::Label(_) => {}
            Instruction::New { class } => stack.push(Value::Object(class.clone())),
            Instruction::GetStatic(_) => stack.push(Value::Stream),
            Instruction::Invoke { kind, method } => {
                match (kind, method.owner.as_str(), method.name.as_str()) {
                    (InvokeKind::Virtual, "java/io/PrintStream", "println") => {
                        let value = stack.pop().expect("println without a value");
                        let line = match (method.descriptor.as_str(), &value) {
                            ("(Z)V", Value::Int(v)) => (*v != 0).to_string(),
                            ("(C)V", Value::Int(v)) => char::from_u32(*v as u32)
                                .map(String::from)
                                .unwrap_or_default(),
                            _ => value.render(),
                        };
                        assert_eq!(stack.pop(), Some(Value::Stream));
                        outcome.output.push(line);
                    }
                    (InvokeKind::Static, "java/lang/Thread", "sleep") => {
                        match stack.pop() {
                            Some(Value::Long(millis)) => outcome.sleeps.push(millis),
                            other => panic!("sleep expects a long, found {other:?}"),
                        }
                    }
                    (InvokeKind::Special, "java/lang/Thread", "<init>") => {
                        match stack.pop() {
                            Some(Value::Object(task)) => bound_task = Some(task),
                            other => panic!("thread needs a runnable, found {other:?}"),
                        }
                        stack.pop().expect("thread constructor without receiver");
                    }
                    (InvokeKind::Virtual, "java/lang/Thread", "start") => {
                        stack.pop().expect("start without receiver");
                        outcome
                            .spawned
                            .push(bound_task.take().expect("start before constructor"));
                    }
                    (InvokeKind::Special, "java/lang/AssertionError", "<init>") => {
                        stack.pop().expect("assertion message");
                        stack.pop().expect("assertion receiver");
                    }
                    (InvokeKind::Special, _, "<init>") => {
                        stack.pop().expect("constructor receiver");
                    }
                    other => panic!("unknown call {other:?}"),
                }
            }
            Instruction::Throw => {
                match stack.pop() {
                    Some(Value::Object(class)) => outcome.thrown = Some(class),
                    other => panic!("throw of {other:?}"),
                }
                break;
            }
            Instruction::Return => break,
        }

        outcome.max_depth = outcome.max_depth.max(stack.len());
        pc = next;
    }

    outcome.stack = stack;
    outcome
}

fn arithmetic(op: ArithOp, family: NumericFamily, lhs: Value, rhs: Value) -> Option<Value> {
    Some(match (family, lhs, rhs) {
        (NumericFamily::Int, Value::Int(a), Value::Int(b)) => Value::Int(match op {
            ArithOp::Add => a.wrapping_add(b),
            ArithOp::Sub => a.wrapping_sub(b),
            ArithOp::Mul => a.wrapping_mul(b),
            ArithOp::Div => a.checked_div(b)?,
            ArithOp::Rem => a.checked_rem(b)?,
        }),
        (NumericFamily::Long, Value::Long(a), Value::Long(b)) => Value::Long(match op {
            ArithOp::Add => a.wrapping_add(b),
            ArithOp::Sub => a.wrapping_sub(b),
            ArithOp::Mul => a.wrapping_mul(b),
            ArithOp::Div => a.checked_div(b)?,
            ArithOp::Rem => a.checked_rem(b)?,
        }),
        (NumericFamily::Float, Value::Float(a), Value::Float(b)) => Value::Float(match op {
            ArithOp::Add => a + b,
            ArithOp::Sub => a - b,
            ArithOp::Mul => a * b,
            ArithOp::Div => a / b,
            ArithOp::Rem => a % b,
        }),
        (NumericFamily::Double, Value::Double(a), Value::Double(b)) => Value::Double(match op {
            ArithOp::Add => a + b,
            ArithOp::Sub => a - b,
            ArithOp::Mul => a * b,
            ArithOp::Div => a / b,
            ArithOp::Rem => a % b,
        }),
        (family, lhs, rhs) => panic!("{family:?} arithmetic on {lhs:?} and {rhs:?}"),
    })
}

fn convert(conversion: Conversion, value: Value) -> Value {
    match (conversion, value) {
        (Conversion::Identity, v) => v,
        (Conversion::I2L, Value::Int(v)) => Value::Long(i64::from(v)),
        (Conversion::I2F, Value::Int(v)) => Value::Float(v as f32),
        (Conversion::I2D, Value::Int(v)) => Value::Double(f64::from(v)),
        (Conversion::I2B, Value::Int(v)) => Value::Int(i32::from(v as i8)),
        (Conversion::I2C, Value::Int(v)) => Value::Int(i32::from(v as u16)),
        (Conversion::I2S, Value::Int(v)) => Value::Int(i32::from(v as i16)),
        (Conversion::L2I, Value::Long(v)) => Value::Int(v as i32),
        (Conversion::L2F, Value::Long(v)) => Value::Float(v as f32),
        (Conversion::L2D, Value::Long(v)) => Value::Double(v as f64),
        (Conversion::F2I, Value::Float(v)) => Value::Int(v as i32),
        (Conversion::F2L, Value::Float(v)) => Value::Long(v as i64),
        (Conversion::F2D, Value::Float(v)) => Value::Double(f64::from(v)),
        (Conversion::D2I, Value::Double(v)) => Value::Int(v as i32),
        (Conversion::D2L, Value::Double(v)) => Value::Long(v as i64),
        (Conversion::D2F, Value::Double(v)) => Value::Float(v as f32),
        (conversion, value) => panic!("{conversion:?} applied to {value:?}"),
    }
}

/// Compile `tree` as a program with a default session.
pub fn compile(tree: &Node) -> Compilation {
    Session::default()
        .compile_program(tree)
        .unwrap_or_else(|e| panic!("compilation failed: {e}"))
}

pub fn compile_with(config: CompilerConfig, tree: &Node) -> Compilation {
    Session::new(config)
        .compile_program(tree)
        .unwrap_or_else(|e| panic!("compilation failed: {e}"))
}

/// Compile and run the program unit.
pub fn execute(tree: &Node) -> Outcome {
    run(compile(tree).program())
}

/// Printed lines of the program unit.
pub fn output(tree: &Node) -> Vec<String> {
    execute(tree).output
}

/// Compile `tree` expecting failure.
pub fn compile_error(tree: &Node) -> strand_codegen::CodegenError {
    match Session::default().compile_program(tree) {
        Ok(_) => panic!("compilation of {tree} unexpectedly succeeded"),
        Err(e) => e,
    }
}
