//! Graph artifact loading
//!
//! Reads the per-backend descriptor from the artifact directory, allocates
//! the declared buffers, and streams the optional weights file in chunks so
//! callers can observe loading progress.

use crate::backend::GraphBuffer;
use crate::descriptor::GraphDescriptor;
use crate::error::{BackendError, Result};
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

/// Default chunk size for streaming weight data
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// A fully loaded graph: parsed descriptor, allocated buffers, weight data
#[derive(Debug)]
pub struct LoadedGraph {
    /// The parsed and validated descriptor
    pub descriptor: GraphDescriptor,
    /// Input buffers, one per descriptor input spec
    pub inputs: Vec<GraphBuffer>,
    /// Output buffers, one per descriptor output spec
    pub outputs: Vec<GraphBuffer>,
    /// Weight values from the sidecar file, empty when the graph has none
    pub weights: Vec<f32>,
}

/// Load the artifact at `location` for the named backend
///
/// Progress is reported as `(loaded_bytes, total_bytes)` where the total
/// covers descriptor plus weights. Calls are monotonically non-decreasing
/// and the final call reports `loaded == total`.
///
/// # Errors
///
/// - [`BackendError::DescriptorMissing`] when `graph_<name>.json` is absent
/// - [`BackendError::DescriptorParse`] on malformed JSON
/// - [`BackendError::InvalidOp`] when the op list fails validation
/// - [`BackendError::WeightSizeMismatch`] when the weights file is not a
///   whole number of f32 values
pub fn load_graph(
    location: &Path,
    backend_name: &str,
    chunk_size: usize,
    mut progress: Option<&mut dyn FnMut(u64, u64)>,
) -> Result<LoadedGraph> {
    let descriptor_path = location.join(GraphDescriptor::file_name(backend_name));
    if !descriptor_path.is_file() {
        return Err(BackendError::DescriptorMissing(descriptor_path));
    }

    let descriptor_bytes = fs::read(&descriptor_path)?;
    let descriptor: GraphDescriptor = serde_json::from_slice(&descriptor_bytes)?;
    descriptor.validate()?;

    let weights_path = descriptor.weights.as_ref().map(|rel| location.join(rel));
    let weights_len = match &weights_path {
        Some(path) => fs::metadata(path)?.len(),
        None => 0,
    };

    let total = descriptor_bytes.len() as u64 + weights_len;
    let mut loaded = descriptor_bytes.len() as u64;
    if let Some(cb) = progress.as_deref_mut() {
        cb(loaded, total);
    }

    let weights = match weights_path {
        Some(path) => {
            let bytes = read_chunked(&path, chunk_size, &mut loaded, total, &mut progress)?;
            if bytes.len() % std::mem::size_of::<f32>() != 0 {
                return Err(BackendError::WeightSizeMismatch {
                    len: bytes.len(),
                    elem: std::mem::size_of::<f32>(),
                });
            }
            bytemuck::pod_collect_to_vec::<u8, f32>(&bytes)
        }
        None => Vec::new(),
    };

    let inputs = descriptor
        .inputs
        .iter()
        .map(|spec| GraphBuffer::new(spec.name.clone(), spec.size))
        .collect();
    let outputs = descriptor
        .outputs
        .iter()
        .map(|spec| GraphBuffer::new(spec.name.clone(), spec.size))
        .collect();

    tracing::debug!(
        backend = backend_name,
        descriptor_bytes = descriptor_bytes.len(),
        weight_bytes = weights.len() * std::mem::size_of::<f32>(),
        ops = descriptor.ops.len(),
        "graph_loaded"
    );

    Ok(LoadedGraph {
        descriptor,
        inputs,
        outputs,
        weights,
    })
}

/// Read `path` in `chunk_size` pieces, advancing the progress counter after
/// each chunk
fn read_chunked(
    path: &Path,
    chunk_size: usize,
    loaded: &mut u64,
    total: u64,
    progress: &mut Option<&mut dyn FnMut(u64, u64)>,
) -> Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    let mut chunk = vec![0u8; chunk_size.max(1)];
    loop {
        let n = file.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..n]);
        *loaded += n as u64;
        if let Some(cb) = progress.as_deref_mut() {
            cb(*loaded, total);
        }
    }
    Ok(bytes)
}
