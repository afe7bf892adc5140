use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaseClass {
    AnalysisSuccess,
    LexicalError,
    SyntaxError,
    SemanticError,
}

impl CaseClass {
    pub fn expected_exit_code(self) -> i32 {
        match self {
            Self::AnalysisSuccess => 0,
            Self::LexicalError | Self::SyntaxError | Self::SemanticError => 1,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BenchConfig {
    pub enabled: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExpectedOutcome {
    pub exit_code: i32,
    /// Diagnostic codes in report order, lexical diagnostics first.
    #[serde(default)]
    pub codes: Vec<String>,
    pub tree_file: Option<String>,
    pub report_file: Option<String>,
    pub message_contains_file: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CaseSpec {
    pub class: CaseClass,
    #[serde(default)]
    pub bench: BenchConfig,
    pub expected: ExpectedOutcome,
}

#[derive(Debug, Clone)]
pub struct Case {
    pub name: String,
    pub dir: PathBuf,
    pub program_path: PathBuf,
    pub spec: CaseSpec,
}

impl Case {
    pub fn read_text(&self, relative_path: &str) -> Result<String> {
        fs::read_to_string(self.dir.join(relative_path))
            .with_context(|| format!("Reading {} fixture file {}", self.name, relative_path))
    }

    pub fn source(&self) -> Result<String> {
        fs::read_to_string(&self.program_path)
            .with_context(|| format!("Reading {}", self.program_path.display()))
    }
}

pub fn load_cases(programs_dir: &Path) -> Result<Vec<Case>> {
    let mut cases = Vec::new();

    for entry in
        fs::read_dir(programs_dir).with_context(|| format!("Reading {}", programs_dir.display()))?
    {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }

        let case_path = path.join("case.yaml");
        if !case_path.exists() {
            continue;
        }

        let program_path = path.join("program.expr");
        ensure!(
            program_path.exists(),
            "Missing program.expr for case {}",
            path.display()
        );

        let case_name = path
            .file_name()
            .and_then(|value| value.to_str())
            .map(str::to_string)
            .with_context(|| format!("Invalid case directory name {}", path.display()))?;
        let case_raw = fs::read_to_string(&case_path)
            .with_context(|| format!("Reading {}", case_path.display()))?;
        let spec: CaseSpec = serde_yaml::from_str(&case_raw)
            .with_context(|| format!("Parsing {}", case_path.display()))?;
        ensure!(
            spec.expected.exit_code == spec.class.expected_exit_code(),
            "Case {case_name} expects exit code {}, but its class implies {}",
            spec.expected.exit_code,
            spec.class.expected_exit_code()
        );
        if spec.bench.enabled {
            ensure!(
                !spec.bench.tags.is_empty(),
                "Case {case_name} has bench enabled but no tags"
            );
        }

        cases.push(Case {
            name: case_name,
            dir: path,
            program_path,
            spec,
        });
    }

    ensure!(
        !cases.is_empty(),
        "No test cases found in {}",
        programs_dir.display()
    );
    cases.sort_by(|left, right| left.name.cmp(&right.name));
    Ok(cases)
}

/// Cases marked for benchmarking, as `(name, program path)` pairs.
pub fn bench_workloads(programs_dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    Ok(load_cases(programs_dir)?
        .into_iter()
        .filter(|case| case.spec.bench.enabled)
        .map(|case| (case.name, case.program_path))
        .collect())
}

pub fn normalize_output(output: &str) -> String {
    output.replace("\r\n", "\n").trim_end().to_string()
}

pub struct CommandOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Runs `binary` with `args` followed by the case's program path.
pub fn run_binary(binary: &Path, args: &[&str], case: &Case) -> Result<CommandOutput> {
    let output = Command::new(binary)
        .args(args)
        .arg(&case.program_path)
        .env_remove("RUST_LOG")
        .env_remove("EXPRLANG_MAX_DEPTH")
        .env_remove("EXPRLANG_MAX_OPERATORS")
        .output()
        .with_context(|| format!("Running {} for {}", binary.display(), case.name))?;
    Ok(CommandOutput {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}
