//! Elementwise op execution
//!
//! Two execution styles share the same kernels: [`execute_ops`] walks the
//! descriptor op list directly (fallback backend), while [`CompiledPlan`]
//! lowers the list once at load time into a flat step sequence (portable
//! and accelerated backends).

use crate::backend::GraphBuffer;
use crate::descriptor::{GraphDescriptor, GraphOp};
use crate::error::{BackendError, Result};

#[derive(Debug, Clone, Copy)]
enum Kernel {
    Copy,
    Scale(f32),
    Offset(f32),
    Relu,
}

impl Kernel {
    fn apply(self, src: &[f32], dst: &mut [f32]) {
        match self {
            Kernel::Copy => dst.copy_from_slice(src),
            Kernel::Scale(factor) => {
                for (d, s) in dst.iter_mut().zip(src) {
                    *d = s * factor;
                }
            }
            Kernel::Offset(amount) => {
                for (d, s) in dst.iter_mut().zip(src) {
                    *d = s + amount;
                }
            }
            Kernel::Relu => {
                for (d, s) in dst.iter_mut().zip(src) {
                    *d = s.max(0.0);
                }
            }
        }
    }
}

fn lower(op: &GraphOp) -> Kernel {
    match *op {
        GraphOp::Copy { .. } => Kernel::Copy,
        GraphOp::Scale { factor, .. } => Kernel::Scale(factor),
        GraphOp::Offset { amount, .. } => Kernel::Offset(amount),
        GraphOp::Relu { .. } => Kernel::Relu,
    }
}

fn apply_step(kernel: Kernel, input: usize, output: usize, inputs: &[GraphBuffer], outputs: &[GraphBuffer]) {
    inputs[input].with_read(|src| outputs[output].with_write(|dst| kernel.apply(src, dst)));
}

/// Interpret the op list directly over the given buffers
///
/// Buffer indices are assumed valid; descriptor validation at load time
/// guarantees this for graphs that came through the loader.
pub fn execute_ops(ops: &[GraphOp], inputs: &[GraphBuffer], outputs: &[GraphBuffer]) -> Result<()> {
    for (index, op) in ops.iter().enumerate() {
        if op.input() >= inputs.len() || op.output() >= outputs.len() {
            return Err(BackendError::invalid_op(index, "buffer index out of range"));
        }
        apply_step(lower(op), op.input(), op.output(), inputs, outputs);
    }
    Ok(())
}

/// Op list lowered into a flat step sequence at load time
pub struct CompiledPlan {
    steps: Vec<(Kernel, usize, usize)>,
}

impl CompiledPlan {
    /// Lower a validated descriptor's op list
    pub fn compile(descriptor: &GraphDescriptor) -> Result<Self> {
        descriptor.validate()?;
        let steps = descriptor
            .ops
            .iter()
            .map(|op| (lower(op), op.input(), op.output()))
            .collect();
        Ok(Self { steps })
    }

    /// Number of lowered steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the plan has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Execute the plan over the given buffers
    pub fn execute(&self, inputs: &[GraphBuffer], outputs: &[GraphBuffer]) -> Result<()> {
        for &(kernel, input, output) in &self.steps {
            if input >= inputs.len() || output >= outputs.len() {
                return Err(BackendError::invalid_op(input, "buffer index out of range"));
            }
            apply_step(kernel, input, output, inputs, outputs);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::BufferSpec;

    fn buffers(sizes: &[usize]) -> Vec<GraphBuffer> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| GraphBuffer::new(format!("b{i}"), size))
            .collect()
    }

    #[test]
    fn scale_and_offset_ops_apply_in_order() {
        let inputs = buffers(&[3]);
        let outputs = buffers(&[3, 3]);
        inputs[0].write(&[1.0, -2.0, 3.0]).unwrap();

        let ops = vec![
            GraphOp::Scale {
                input: 0,
                output: 0,
                factor: 2.0,
            },
            GraphOp::Offset {
                input: 0,
                output: 1,
                amount: 10.0,
            },
        ];
        execute_ops(&ops, &inputs, &outputs).unwrap();
        assert_eq!(outputs[0].to_vec(), vec![2.0, -4.0, 6.0]);
        assert_eq!(outputs[1].to_vec(), vec![11.0, 8.0, 13.0]);
    }

    #[test]
    fn relu_clamps_negative_values() {
        let inputs = buffers(&[4]);
        let outputs = buffers(&[4]);
        inputs[0].write(&[-1.0, 0.0, 2.5, -0.5]).unwrap();
        execute_ops(&[GraphOp::Relu { input: 0, output: 0 }], &inputs, &outputs).unwrap();
        assert_eq!(outputs[0].to_vec(), vec![0.0, 0.0, 2.5, 0.0]);
    }

    #[test]
    fn compiled_plan_matches_interpreter() {
        let descriptor = GraphDescriptor {
            inputs: vec![BufferSpec {
                name: "x".into(),
                size: 2,
            }],
            outputs: vec![BufferSpec {
                name: "y".into(),
                size: 2,
            }],
            ops: vec![GraphOp::Scale {
                input: 0,
                output: 0,
                factor: -1.0,
            }],
            weights: None,
        };
        let plan = CompiledPlan::compile(&descriptor).unwrap();
        assert_eq!(plan.len(), 1);

        let inputs = buffers(&[2]);
        let outputs = buffers(&[2]);
        inputs[0].write(&[4.0, -4.0]).unwrap();
        plan.execute(&inputs, &outputs).unwrap();
        assert_eq!(outputs[0].to_vec(), vec![-4.0, 4.0]);
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let inputs = buffers(&[2]);
        let outputs = buffers(&[2]);
        let err = execute_ops(&[GraphOp::Copy { input: 5, output: 0 }], &inputs, &outputs).unwrap_err();
        assert!(matches!(err, BackendError::InvalidOp { .. }));
    }
}
