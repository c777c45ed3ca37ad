//! Integration tests for rendering certificates from a `.docx` template.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use cert_model::EligibleAttendee;
use cert_render::{
    MAIN_DOCUMENT_PART, RenderError, RenderOptions, Template, render_certificates,
};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;
const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#;

fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}<w:sectPr/></w:body></w:document>"#
    )
}

fn write_template(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("template.docx");
    let file = File::create(&path).expect("create template");
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    for (name, contents) in [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        (MAIN_DOCUMENT_PART, document_xml(body)),
        ("word/styles.xml", STYLES.to_string()),
    ] {
        zip.start_file(name, options).expect("start entry");
        zip.write_all(contents.as_bytes()).expect("write entry");
    }
    zip.finish().expect("finish template");
    path
}

fn read_part(path: &Path, part: &str) -> String {
    let mut archive = zip::ZipArchive::new(File::open(path).expect("open output")).expect("zip");
    let mut file = archive.by_name(part).expect("part present");
    let mut contents = String::new();
    file.read_to_string(&mut contents).expect("read part");
    contents
}

fn attendee(first: &str, last: &str, email: &str, reference: usize) -> EligibleAttendee {
    EligibleAttendee {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        duration_minutes: 45,
        specialty: "Nurse/Midwife".to_string(),
        country: "香港特別行政區".to_string(),
        reference,
    }
}

const FULL_BODY: &str = "<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>Presented to &lt;&lt;first_name&gt;&gt; </w:t></w:r>\
<w:r><w:t>&lt;&lt;last_name&gt;&gt;</w:t></w:r></w:p>\
<w:tbl><w:tr><w:tc><w:p><w:r><w:t>Ref: &lt;&lt;ref&gt;&gt;</w:t></w:r></w:p></w:tc></w:tr></w:tbl>";

#[test]
fn renders_one_certificate_with_all_tokens_replaced() {
    let dir = TempDir::new().expect("temp dir");
    let template = write_template(dir.path(), FULL_BODY);
    let options = RenderOptions::new(dir.path().join("out/docx"));
    let mut attendees = vec![attendee("mary ann", "chan", "mary@example.org", 7)];

    let report = render_certificates(&template, &mut attendees, &options).expect("render");

    let expected = dir.path().join("out/docx/01_Mary Ann_CHAN.docx");
    assert_eq!(report.written_paths(), vec![expected.as_path()]);
    assert!(!report.has_failures());
    assert_eq!(attendees[0].first_name, "Mary Ann");
    assert_eq!(attendees[0].last_name, "CHAN");

    let xml = read_part(&expected, MAIN_DOCUMENT_PART);
    assert!(xml.contains("Presented to Mary Ann CHAN"));
    assert!(xml.contains("Ref: 01"));
    assert!(!xml.contains("&lt;&lt;"));
    assert_eq!(read_part(&expected, "word/styles.xml"), STYLES);
}

#[test]
fn missing_token_fails_every_attendee_and_writes_nothing() {
    let dir = TempDir::new().expect("temp dir");
    let template = write_template(
        dir.path(),
        "<w:p><w:r><w:t>&lt;&lt;first_name&gt;&gt; &lt;&lt;ref&gt;&gt;</w:t></w:r></w:p>",
    );
    let output_dir = dir.path().join("docx");
    let options = RenderOptions::new(&output_dir);
    let mut attendees = vec![
        attendee("mary", "chan", "mary@example.org", 1),
        attendee("peter", "wong", "peter@example.org", 2),
    ];

    let report = render_certificates(&template, &mut attendees, &options).expect("render");

    assert!(report.written_paths().is_empty());
    assert_eq!(report.failure_count(), 2);
    for (outcome, err) in report.failures() {
        assert!(
            matches!(err, RenderError::TemplateMismatch { missing } if missing == &vec!["<<last_name>>".to_string()]),
            "unexpected error for {}: {err}",
            outcome.email
        );
    }
    assert_eq!(fs::read_dir(&output_dir).expect("output dir").count(), 0);
}

#[test]
fn sequence_comes_from_list_position_not_reference() {
    let dir = TempDir::new().expect("temp dir");
    let template = write_template(dir.path(), FULL_BODY);
    let options = RenderOptions::new(dir.path().join("docx"));
    let mut attendees = vec![
        attendee("ann", "lee", "ann@example.org", 5),
        attendee("bob", "ho", "bob@example.org", 9),
    ];

    let report = render_certificates(&template, &mut attendees, &options).expect("render");

    let names: Vec<String> = report
        .written_paths()
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["01_Ann_LEE.docx", "02_Bob_HO.docx"]);

    // Each certificate starts from the pristine template.
    let second = read_part(report.written_paths()[1], MAIN_DOCUMENT_PART);
    assert!(second.contains("Presented to Bob HO"));
    assert!(second.contains("Ref: 02"));
    assert!(!second.contains("Ann"));
}

#[test]
fn rendering_twice_yields_identical_paths() {
    let dir = TempDir::new().expect("temp dir");
    let template = write_template(dir.path(), FULL_BODY);
    let options = RenderOptions::new(dir.path().join("docx"));
    let mut attendees = vec![
        attendee("mary ann", "chan", "mary@example.org", 1),
        attendee("PETER", "Wong", "peter@example.org", 2),
    ];

    let first: Vec<PathBuf> = render_certificates(&template, &mut attendees, &options)
        .expect("first render")
        .written_paths()
        .into_iter()
        .map(Path::to_path_buf)
        .collect();
    let second: Vec<PathBuf> = render_certificates(&template, &mut attendees, &options)
        .expect("second render")
        .written_paths()
        .into_iter()
        .map(Path::to_path_buf)
        .collect();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn unreadable_template_is_a_per_attendee_failure() {
    let dir = TempDir::new().expect("temp dir");
    let template = dir.path().join("not-a-docx.docx");
    fs::write(&template, b"plain text").expect("write file");
    let options = RenderOptions::new(dir.path().join("docx"));
    let mut attendees = vec![attendee("mary", "chan", "mary@example.org", 1)];

    let report = render_certificates(&template, &mut attendees, &options).expect("render");

    let (_, err) = report.failures().next().expect("one failure");
    assert!(matches!(err, RenderError::MalformedTemplate { .. }));
    assert!(err.is_template_problem());
}

#[test]
fn template_without_main_document_is_reported() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("empty.docx");
    let mut zip = zip::ZipWriter::new(File::create(&path).expect("create"));
    zip.start_file("[Content_Types].xml", SimpleFileOptions::default())
        .expect("start entry");
    zip.write_all(CONTENT_TYPES.as_bytes()).expect("write entry");
    zip.finish().expect("finish");

    let err = Template::load(&path).expect_err("no main part");

    assert!(matches!(
        err,
        RenderError::MissingDocumentPart {
            part: MAIN_DOCUMENT_PART,
            ..
        }
    ));
}

#[test]
fn unwritable_output_directory_aborts_the_batch() {
    let dir = TempDir::new().expect("temp dir");
    let template = write_template(dir.path(), FULL_BODY);
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"file in the way").expect("write blocker");
    let options = RenderOptions::new(blocker.join("docx"));
    let mut attendees = vec![attendee("mary", "chan", "mary@example.org", 1)];

    let err = render_certificates(&template, &mut attendees, &options).expect_err("fatal");

    assert!(matches!(err, RenderError::OutputDirectory { .. }));
}
