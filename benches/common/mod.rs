use std::fs;
use std::path::{Path, PathBuf};

use exprlang::ast::Node;
use exprlang::{lexer, parser};

pub fn workloads() -> Vec<(String, PathBuf)> {
    test_support::bench_workloads(Path::new("tests/programs"))
        .unwrap_or_else(|err| panic!("load bench workloads: {err:#}"))
}

pub fn load_source(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|err| panic!("read {}: {err}", path.display()))
}

pub fn load_tree(source: &str, label: &str) -> Node {
    parser::parse_tokens(&lexer::tokenize(source)).unwrap_or_else(|err| panic!("parse {label}: {err}"))
}
