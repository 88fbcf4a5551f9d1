use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced an artifact: the subcommand, its parameters and input files.
pub struct Payload {
    pub command: &'static str,
    pub params: Value,
    pub inputs: Vec<String>,
}

impl Payload {
    pub fn new(command: &'static str, params: Value) -> Self {
        Self {
            command,
            params,
            inputs: Vec::new(),
        }
    }

    pub fn with_input<P: AsRef<Path>>(mut self, input: P) -> Self {
        self.inputs.push(input.as_ref().display().to_string());
        self
    }
}

/// Record `payload` in `<stem>.provenance.json` beside `artifact`.
pub fn write_sidecar(artifact: &Path, payload: Payload) -> Result<PathBuf> {
    let path = sidecar_path(artifact);
    let mut doc = block(payload.params);
    doc["command"] = json!(payload.command);
    doc["inputs"] = json!(payload.inputs);
    doc["outputs"] = json!([artifact.display().to_string()]);
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Revision, library version and `params`, with no files attached.
pub fn block(params: Value) -> Value {
    json!({
        "code_rev": code_rev(),
        "version": polycover::VERSION,
        "params": params,
        "inputs": [],
        "outputs": []
    })
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let stem = artifact
        .file_stem()
        .map_or_else(|| "artifact".into(), |s| s.to_string_lossy());
    artifact.with_file_name(format!("{stem}.provenance.json"))
}

/// `GIT_COMMIT` (build time, then run time), else `git rev-parse HEAD`.
fn code_rev() -> String {
    option_env!("GIT_COMMIT")
        .map(str::to_string)
        .filter(|rev| !rev.is_empty())
        .or_else(|| std::env::var("GIT_COMMIT").ok().filter(|rev| !rev.is_empty()))
        .or_else(git_head)
        .unwrap_or_else(|| "unknown".to_string())
}

fn git_head() -> Option<String> {
    let output = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let rev = String::from_utf8(output.stdout).ok()?;
    Some(rev.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sidecar_sits_beside_artifact() {
        assert_eq!(
            sidecar_path(Path::new("runs/a/hops.json")),
            Path::new("runs/a/hops.provenance.json")
        );
        assert_eq!(
            sidecar_path(Path::new("reduced")),
            Path::new("reduced.provenance.json")
        );
    }

    #[test]
    fn sidecar_records_command_inputs_and_outputs() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("reduced.json");
        let payload = Payload::new("reduce", json!({"components_after": 3})).with_input("union.json");
        let path = write_sidecar(&artifact, payload).unwrap();
        let doc: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(doc["command"], "reduce");
        assert_eq!(doc["inputs"], json!(["union.json"]));
        assert_eq!(doc["outputs"][0], artifact.display().to_string());
        assert_eq!(doc["params"]["components_after"], 3);
        assert_eq!(doc["version"], polycover::VERSION);
    }

    #[test]
    fn report_block_has_no_files() {
        let doc = block(json!({}));
        assert_eq!(doc["outputs"], json!([]));
        assert!(doc["code_rev"].is_string());
    }
}
