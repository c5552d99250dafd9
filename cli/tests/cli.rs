//! Tests running the built `docxtext` binary.

use std::io::{Cursor, Write};
use std::process::Command;

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn docxtext() -> Command {
    Command::new(env!("CARGO_BIN_EXE_docxtext"))
}

fn build_docx(document: &str) -> Vec<u8> {
    let mut buffer = Vec::new();
    let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
    zip.start_file("word/document.xml", SimpleFileOptions::default())
        .unwrap();
    zip.write_all(document.as_bytes()).unwrap();
    zip.finish().unwrap();
    buffer
}

#[test]
fn test_no_arguments_prints_usage() {
    let output = docxtext().output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"), "stdout: {}", stdout);
}

#[test]
fn test_prints_extracted_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hello.docx");
    std::fs::write(
        &path,
        build_docx(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>Hello, </w:t></w:r><w:r><w:t>world!</w:t></w:r></w:p></w:body></w:document>"#,
        ),
    )
    .unwrap();

    let output = docxtext().arg(&path).output().unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Hello, world!\n");
}

#[test]
fn test_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.docx");
    let out = dir.path().join("out.txt");
    std::fs::write(
        &input,
        build_docx(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:t>saved</w:t></w:document>"#,
        ),
    )
    .unwrap();

    let status = docxtext().arg(&input).arg("-o").arg(&out).status().unwrap();

    assert!(status.success());
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "saved");
}

#[test]
fn test_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = docxtext()
        .arg(dir.path().join("missing.docx"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Cannot open archive"), "stderr: {}", stderr);
}

#[test]
fn test_malformed_body_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.docx");
    std::fs::write(&path, build_docx("<w:document")).unwrap();

    let output = docxtext().arg(&path).output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Malformed document content"), "stderr: {}", stderr);
}
