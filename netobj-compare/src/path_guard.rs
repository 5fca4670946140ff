use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Refuse to write the plan over one of the snapshots being compared.
pub fn ensure_output_not_same(output: &Path, inputs: &[&Path]) -> Result<()> {
    let target = comparable(output)
        .with_context(|| format!("failed to resolve plan path {}", output.display()))?;

    for input in inputs {
        let source = comparable(input)
            .with_context(|| format!("failed to resolve snapshot path {}", input.display()))?;
        if source == target {
            bail!(
                "refusing to overwrite snapshot {} with the provisioning plan",
                input.display()
            );
        }
    }
    Ok(())
}

fn comparable(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return path
            .canonicalize()
            .with_context(|| format!("canonicalize {}", path.display()));
    }
    // Not written yet; `..` components are left as-is.
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir().context("current_dir")?.join(path))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::ensure_output_not_same;

    #[test]
    fn rejects_plan_over_snapshot() {
        let dir = tempdir().expect("tempdir");
        let snapshot = dir.path().join("a.json");
        fs::write(&snapshot, "{}").expect("write");

        let err = ensure_output_not_same(&snapshot, &[&snapshot]).expect_err("same path");
        assert!(err.to_string().contains("refusing to overwrite snapshot"));
    }

    #[test]
    fn accepts_new_plan_path() {
        let dir = tempdir().expect("tempdir");
        let snapshot = dir.path().join("a.json");
        fs::write(&snapshot, "{}").expect("write");

        ensure_output_not_same(&dir.path().join("plan.json"), &[&snapshot]).expect("distinct");
    }
}
