use std::io;
use std::path::PathBuf;

use quill::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::ConfigError("invalid config".to_string());
    assert_eq!(err.to_string(), "Configuration error: invalid config");

    let err = Error::MergeTypeConflict { left: "sequence", right: "mapping" };
    assert_eq!(err.to_string(), "Cannot merge mapping into sequence");

    let err = Error::AmbiguousNameError { candidates: vec!["a".into(), "b".into()] };
    assert_eq!(err.to_string(), "Cannot determine project name, candidates: a, b");

    let err = Error::UnsupportedFormatError { path: PathBuf::from("setup.py") };
    assert_eq!(err.to_string(), "Unsupported file format: 'setup.py'");
}
