use std::fs;
use tempfile::tempdir;

use chainlist_cli::commands::inspect;
use chainlist_core::{List, ListConfig, ListError};

fn dump_of(items: &[&[u8]]) -> Vec<u8> {
    let mut list: List<Vec<u8>> = List::with_config(ListConfig::seeded(9));
    list.append_all(items.iter().map(|i| i.to_vec())).unwrap();
    list.set_meter(|el| el.len());
    list.dump_to_bytes().unwrap().to_vec()
}

#[test]
fn inspect_valid_dump() {
    let report = inspect::inspect_bytes(&dump_of(&[b"ab", b"cde"])).unwrap();
    assert!(report.is_valid());
    assert_eq!(report.header.count, 2);
    assert_eq!(report.header.total_len, 5);
    assert!(!report.header.is_fixed());
    assert_eq!(report.restored, 2);
}

#[test]
fn inspect_reports_terminator_damage() {
    let mut dump = dump_of(&[b"ab", b"cd"]);
    let last = dump.len() - 1;
    dump[last] ^= 0x01;

    let report = inspect::inspect_bytes(&dump).unwrap();
    assert!(!report.is_valid());
    assert!(matches!(report.error, Some(ListError::TerminatorMismatch { .. })));
    assert_eq!(report.restored, 2);
}

#[test]
fn inspect_reports_unknown_version() {
    let mut dump = dump_of(&[b"ab"]);
    dump[0..2].copy_from_slice(&7u16.to_be_bytes());

    let report = inspect::inspect_bytes(&dump).unwrap();
    assert_eq!(report.header.version, 7);
    assert_eq!(report.header.count, 1);
    assert!(!report.is_valid());
    assert_eq!(report.error, Some(ListError::UnsupportedVersion(7)));
    assert_eq!(report.restored, 0);

    let td = tempdir().unwrap();
    let path = td.path().join("v7.chl");
    fs::write(&path, &dump).unwrap();
    inspect::execute(path.to_str().unwrap()).unwrap();
}

#[test]
fn inspect_short_file_fails() {
    assert!(inspect::inspect_bytes(&[0, 1, 2]).is_err());
}

#[test]
fn inspect_execute_on_file() {
    let td = tempdir().unwrap();
    let path = td.path().join("d.chl");
    fs::write(&path, dump_of(&[b"x"])).unwrap();
    inspect::execute(path.to_str().unwrap()).unwrap();
}
