//! Source patching — small rewrites applied to the fetched tree.
//!
//! Three operations cover everything the recipes need: an exact-substring
//! replace that fails loudly when the pattern is gone, an unconditional
//! append, and a whole-file write for generated descriptors.

pub mod uwp;

use std::path::PathBuf;

/// One patch operation against a file in the fetched source tree.
#[derive(Debug, Clone)]
pub enum PatchOp {
    /// Replace every occurrence of an exact substring. Errors when neither
    /// `find` nor `replace` is present in the file, so upstream format
    /// drift surfaces instead of silently doing nothing.
    Replace {
        file: PathBuf,
        find: String,
        replace: String,
    },
    /// Append raw text. Unconditional: a second application duplicates the
    /// block. Recipes run once per working folder.
    Append { file: PathBuf, text: String },
    /// Write a file, replacing any previous contents.
    Write { file: PathBuf, contents: String },
}

/// Outcome of a single patch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Applied,
    /// The replacement text was already in place; nothing changed.
    AlreadyApplied,
}

/// Apply one patch operation.
pub fn apply_op(op: &PatchOp) -> Result<PatchOutcome, String> {
    match op {
        PatchOp::Replace {
            file,
            find,
            replace,
        } => {
            let content = std::fs::read_to_string(file)
                .map_err(|e| format!("cannot read {}: {}", file.display(), e))?;
            if content.contains(find.as_str()) {
                let patched = content.replace(find.as_str(), replace);
                std::fs::write(file, patched)
                    .map_err(|e| format!("cannot write {}: {}", file.display(), e))?;
                Ok(PatchOutcome::Applied)
            } else if content.contains(replace.as_str()) {
                Ok(PatchOutcome::AlreadyApplied)
            } else {
                Err(format!(
                    "pattern not found in {}: \"{}\"",
                    file.display(),
                    find
                ))
            }
        }
        PatchOp::Append { file, text } => {
            use std::io::Write;
            let mut f = std::fs::OpenOptions::new()
                .append(true)
                .open(file)
                .map_err(|e| format!("cannot open {}: {}", file.display(), e))?;
            f.write_all(text.as_bytes())
                .map_err(|e| format!("cannot append to {}: {}", file.display(), e))?;
            Ok(PatchOutcome::Applied)
        }
        PatchOp::Write { file, contents } => {
            if let Some(parent) = file.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("cannot create {}: {}", parent.display(), e))?;
            }
            std::fs::write(file, contents)
                .map_err(|e| format!("cannot write {}: {}", file.display(), e))?;
            Ok(PatchOutcome::Applied)
        }
    }
}

/// Apply a set of patch operations in order. The first failure aborts.
pub fn apply_all(ops: &[PatchOp]) -> Result<Vec<PatchOutcome>, String> {
    let mut outcomes = Vec::with_capacity(ops.len());
    for op in ops {
        outcomes.push(apply_op(op)?);
    }
    Ok(outcomes)
}
