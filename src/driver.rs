//! The Meta-Tree Driver: walks a built tree once, streaming every leaf's
//! bytes to every currently-active ancestor scope, and emits one finalized
//! artifact per node on the way back out.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{info, trace};

use crate::error::Result;
use crate::path::Component;
use crate::scope::{HasherScope, Metainfo};
use crate::tree::TreeNode;

/// Read buffer size for streaming leaf file bytes. Independent of any
/// scope's piece length; `HasherScope::absorb` handles arbitrary chunking.
const READ_BUFFER: usize = 64 * 1024;

/// Per-run settings that every scope in the tree shares.
pub struct RunConfig {
    pub announce: String,
    pub creation_date: i64,
    pub target_for: Box<dyn Fn(&[Component]) -> PathBuf>,
}

/// Walk `node`, producing one finalized `Metainfo` per tree node (file and
/// directory alike), via `on_artifact`. `active` is the stack of scopes
/// whose subtree currently contains `node`; it is empty only for the very
/// first call.
pub fn visit(
    node: &TreeNode,
    config: &RunConfig,
    active: &mut Vec<HasherScope>,
    on_artifact: &mut dyn FnMut(Metainfo) -> Result<()>,
) -> Result<()> {
    let root_name = active
        .first()
        .map(|scope| scope.root_name().to_vec())
        .unwrap_or_else(|| node.path()[0].clone());

    let target = (config.target_for)(node.path());
    let scope = HasherScope::new(root_name, target, config.announce.clone(), node.size(), config.creation_date);
    active.push(scope);

    let result = (|| -> Result<()> {
        match node {
            TreeNode::Leaf { location, path, size } => {
                stream_leaf(location, path, *size, active)?;
            }
            TreeNode::Branch { children, .. } => {
                for child in children {
                    visit(child, config, active, on_artifact)?;
                }
            }
        }
        Ok(())
    })();

    let finished = active.pop().expect("scope pushed above");
    result?;

    info!(path = %crate::path::join_display(node.path()), pieces = finished.piece_count(), "finalized artifact");
    on_artifact(finished.finalize())
}

/// Stream one leaf file's bytes to every active scope, recording the file
/// entry in each scope's manifest under that scope's relative path.
fn stream_leaf(location: &Path, path: &[Component], size: u64, active: &mut [HasherScope]) -> Result<()> {
    let full_len = path.len();

    for (i, scope) in active.iter_mut().enumerate() {
        let root_depth = i + 1;
        let relative = if root_depth == full_len {
            vec![path[full_len - 1].clone()]
        } else {
            path[root_depth..full_len].to_vec()
        };
        scope.append_file(size, relative);
    }

    trace!(path = %crate::path::join_display(path), size, "streaming leaf");

    let mut file = File::open(location)?;
    let mut buffer = [0u8; READ_BUFFER];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        for scope in active.iter_mut() {
            scope.absorb(&buffer[..read]);
        }
    }

    Ok(())
}
