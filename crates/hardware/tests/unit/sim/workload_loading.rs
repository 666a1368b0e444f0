//! Workload Loading Tests — JSON files on disk.

use o3sim_core::common::types::OpClass;
use o3sim_core::common::SimError;
use o3sim_core::config::Config;
use o3sim_core::sim::Workload;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn loads_workload_from_file() {
    let mut file = NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"{{ "insts": [
            {{ "op": "IntMult", "dests": [7] }},
            {{ "op": "MemRead", "srcs": [7], "dests": [8], "pc": 4096 }}
        ] }}"#
    )
    .expect("write workload");

    let workload = Workload::from_file(file.path()).expect("load workload");
    assert_eq!(workload.insts.len(), 2);
    assert_eq!(workload.insts[1].op, OpClass::MemRead);
    assert_eq!(workload.insts[1].pc, 4096);
    workload.validate(&Config::default()).expect("valid");
}

#[test]
fn missing_file_is_io_error() {
    let err = Workload::from_file(std::path::Path::new("/nonexistent/workload.json"))
        .expect_err("must fail");
    assert!(matches!(err, SimError::Io(_)));
}

#[test]
fn garbage_file_is_parse_error() {
    let mut file = NamedTempFile::new().expect("temp file");
    write!(file, "not json at all").expect("write");
    let err = Workload::from_file(file.path()).expect_err("must fail");
    assert!(matches!(err, SimError::Parse(_)));
}
