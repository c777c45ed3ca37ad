//! End-to-end runs of the generate pipeline against temp directories.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use cert_cli::pipeline::{
    CERTIFICATE_DIR, PipelineError, PipelineOptions, check_template, run_pipeline,
};
use cert_cli::types::CertificateStatus;
use cert_model::{EligibilityRules, PlaceholderTokens, SummaryFormat};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

const HEADER: &str = "已出席,使用者名稱（原始名稱）,名字,姓氏,電子郵件地址,出席時間（分鐘）,Specialty,國家/地區名稱";

fn write_export(dir: &Path, rows: &[&str]) -> PathBuf {
    let mut body = String::from("\u{feff}報告產生時間,2024-05-01\n\n觀眾詳細資訊\n");
    body.push_str(HEADER);
    body.push('\n');
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    let path = dir.join("attendance.csv");
    fs::write(&path, body).expect("write export");
    path
}

fn write_template(dir: &Path, paragraphs: &[&str]) -> PathBuf {
    let body: String = paragraphs
        .iter()
        .map(|text| format!("<w:p><w:r><w:t xml:space=\"preserve\">{text}</w:t></w:r></w:p>"))
        .collect();
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );
    let path = dir.join("template.docx");
    let mut zip = zip::ZipWriter::new(File::create(&path).expect("create template"));
    zip.start_file("word/document.xml", SimpleFileOptions::default())
        .expect("start entry");
    zip.write_all(document.as_bytes()).expect("write entry");
    zip.finish().expect("finish template");
    path
}

fn options(dir: &Path, csv_path: PathBuf, template_path: PathBuf) -> PipelineOptions {
    PipelineOptions {
        csv_path,
        template_path,
        output_root: dir.join("certs"),
        summary_format: SummaryFormat::Csv,
        rules: EligibilityRules::default(),
        tokens: PlaceholderTokens::default(),
        dry_run: false,
    }
}

const COMPLETE_TEMPLATE: [&str; 2] = [
    "This certifies that &lt;&lt;first_name&gt;&gt; &lt;&lt;last_name&gt;&gt;",
    "Certificate no. &lt;&lt;ref&gt;&gt;",
];

#[test]
fn generates_summary_and_certificates() {
    let dir = TempDir::new().expect("temp dir");
    let csv = write_export(
        dir.path(),
        &[
            "是,mary,mary ann,chan,mary@example.org,20,Nurse/Midwife,香港特別行政區",
            "是,peter,peter,wong,peter@example.org,60,Doctor,香港特別行政區",
            "是,mary,mary ann,chan,mary@example.org,15,Nurse/Midwife,香港特別行政區",
            "是,kit,kit,lam,kit@example.org,31,Nurse/Midwife,香港特別行政區",
        ],
    );
    let template = write_template(dir.path(), &COMPLETE_TEMPLATE);

    let result = run_pipeline(&options(dir.path(), csv, template)).expect("pipeline");

    assert!(!result.has_errors());
    assert_eq!(result.records, 4);
    assert_eq!(result.stats.gated_rows, 1);
    assert_eq!(result.written_count(), 2);

    let summary = fs::read_to_string(dir.path().join("certs/eligible_attendees.csv"))
        .expect("summary written");
    assert!(summary.contains("mary ann,chan,mary@example.org,35,Nurse/Midwife,香港特別行政區,1"));
    assert!(summary.contains("kit,lam,kit@example.org,31,Nurse/Midwife,香港特別行政區,2"));

    let certificates = dir.path().join("certs").join(CERTIFICATE_DIR);
    let mut names: Vec<String> = fs::read_dir(&certificates)
        .expect("certificate dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["01_Mary Ann_CHAN.docx", "02_Kit_LAM.docx"]);

    let mut archive = zip::ZipArchive::new(
        File::open(certificates.join("01_Mary Ann_CHAN.docx")).expect("open certificate"),
    )
    .expect("zip");
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .expect("main part")
        .read_to_string(&mut xml)
        .expect("read part");
    assert!(xml.contains("This certifies that Mary Ann CHAN"));
    assert!(xml.contains("Certificate no. 01"));
    assert!(!xml.contains("&lt;&lt;"));
}

#[test]
fn template_missing_a_token_fails_every_attendee() {
    let dir = TempDir::new().expect("temp dir");
    let csv = write_export(
        dir.path(),
        &["是,mary,mary,chan,mary@example.org,45,Nurse/Midwife,香港特別行政區"],
    );
    let template = write_template(dir.path(), &["&lt;&lt;first_name&gt;&gt; &lt;&lt;ref&gt;&gt;"]);

    let result = run_pipeline(&options(dir.path(), csv, template)).expect("pipeline");

    assert!(result.has_errors());
    assert_eq!(result.written_count(), 0);
    match &result.attendees[0].certificate {
        CertificateStatus::Failed(reason) => assert!(reason.contains("<<last_name>>")),
        other => panic!("unexpected status: {other:?}"),
    }
}

#[test]
fn export_without_detail_section_is_fatal() {
    let dir = TempDir::new().expect("temp dir");
    let csv = dir.path().join("attendance.csv");
    fs::write(&csv, "主題,網路研討會\n").expect("write export");
    let template = write_template(dir.path(), &COMPLETE_TEMPLATE);

    let err = run_pipeline(&options(dir.path(), csv, template)).expect_err("no data");

    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::NoAttendeeData { .. })
    ));
    assert!(!dir.path().join("certs").exists());
}

#[test]
fn no_eligible_attendees_is_fatal() {
    let dir = TempDir::new().expect("temp dir");
    let csv = write_export(
        dir.path(),
        &["是,peter,peter,wong,peter@example.org,60,Doctor,香港特別行政區"],
    );
    let template = write_template(dir.path(), &COMPLETE_TEMPLATE);

    let err = run_pipeline(&options(dir.path(), csv, template)).expect_err("none eligible");

    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::NoEligibleAttendees { records: 1 })
    ));
}

#[test]
fn dry_run_writes_nothing() {
    let dir = TempDir::new().expect("temp dir");
    let csv = write_export(
        dir.path(),
        &["是,mary,mary ann,chan,mary@example.org,45,Nurse/Midwife,香港特別行政區"],
    );
    let template = write_template(dir.path(), &COMPLETE_TEMPLATE);
    let options = PipelineOptions {
        dry_run: true,
        ..options(dir.path(), csv, template)
    };

    let result = run_pipeline(&options).expect("pipeline");

    assert_eq!(result.attendees.len(), 1);
    assert_eq!(result.attendees[0].name, "mary ann chan");
    assert!(matches!(
        result.attendees[0].certificate,
        CertificateStatus::Skipped
    ));
    assert!(result.summary_path.is_none());
    assert!(!dir.path().join("certs").exists());
}

#[test]
fn check_template_lists_missing_tokens() {
    let dir = TempDir::new().expect("temp dir");
    let template = write_template(dir.path(), &["&lt;&lt;ref&gt;&gt; &lt;&lt;first_name&gt;&gt;"]);

    let check = check_template(&template, &PlaceholderTokens::default()).expect("check");

    assert_eq!(check.present, vec!["<<first_name>>", "<<ref>>"]);
    assert_eq!(check.missing, vec!["<<last_name>>"]);
    assert!(!check.is_complete());
}
