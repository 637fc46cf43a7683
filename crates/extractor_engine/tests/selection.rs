use std::fs;
use std::path::PathBuf;

use extractor_engine::{load_selection, SelectionError};
use tempfile::TempDir;

#[test]
fn explicit_files_keep_argument_order_and_content() {
    let temp = TempDir::new().unwrap();
    let b = temp.path().join("b.pdf");
    let a = temp.path().join("a.pdf");
    fs::write(&b, b"bbb").unwrap();
    fs::write(&a, b"a").unwrap();

    let files = load_selection(&[b, a]).unwrap();

    let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["b.pdf", "a.pdf"]);
    assert_eq!(files[0].content.as_ref(), b"bbb");
    assert_eq!(files[1].content.len(), 1);
}

#[test]
fn explicit_non_pdf_file_is_not_filtered() {
    let temp = TempDir::new().unwrap();
    let notes = temp.path().join("notes.txt");
    fs::write(&notes, b"plain").unwrap();

    let files = load_selection(&[notes]).unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "notes.txt");
}

#[test]
fn directory_contributes_sorted_pdfs_only() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("zeta.pdf"), b"z").unwrap();
    fs::write(temp.path().join("Alpha.PDF"), b"a").unwrap();
    fs::write(temp.path().join("readme.md"), b"r").unwrap();
    fs::create_dir(temp.path().join("nested.pdf")).unwrap();
    fs::write(temp.path().join("nested.pdf").join("inner.pdf"), b"i").unwrap();

    let files = load_selection(&[temp.path().to_path_buf()]).unwrap();

    let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha.PDF", "zeta.pdf"]);
}

#[test]
fn missing_path_is_an_error() {
    let temp = TempDir::new().unwrap();
    let missing: PathBuf = temp.path().join("gone.pdf");

    let err = load_selection(&[missing.clone()]).unwrap_err();

    assert!(matches!(err, SelectionError::Missing(ref path) if *path == missing));
    assert!(err.to_string().contains("gone.pdf"));
}

#[test]
fn empty_input_gives_empty_selection() {
    assert!(load_selection(&[]).unwrap().is_empty());
}
