//! Minimal single-sheet XLSX workbook.
//!
//! Strings are written inline (`t="inlineStr"`) so the package needs no
//! shared-string table or style sheet.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use zip::write::SimpleFileOptions;

use cert_model::EligibleAttendee;
use cert_model::columns::SUMMARY_COLUMNS;

use crate::error::{OutputError, Result};

const SHEET_NAME: &str = "Eligible Attendees";
const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PACKAGE_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const WORKSHEET_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const WORKBOOK_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const WORKSHEET_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
const RELS_TYPE: &str = "application/vnd.openxmlformats-package.relationships+xml";

pub(crate) const SHEET_PART: &str = "xl/worksheets/sheet1.xml";

enum Cell<'a> {
    Text(&'a str),
    Number(u64),
}

type XmlWriter = Writer<Vec<u8>>;
type PartResult<T> = std::result::Result<T, String>;

pub(crate) fn write_workbook(path: &Path, attendees: &[EligibleAttendee]) -> Result<()> {
    let parts = [
        ("[Content_Types].xml", content_types()),
        ("_rels/.rels", root_relationships()),
        ("xl/workbook.xml", workbook()),
        ("xl/_rels/workbook.xml.rels", workbook_relationships()),
        (SHEET_PART, worksheet(attendees)),
    ];

    let file = File::create(path).map_err(|err| OutputError::io(path, err))?;
    let mut zip = zip::ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default();
    for (name, xml) in parts {
        let xml = xml.map_err(|err| OutputError::workbook(path, err))?;
        zip.start_file(name, options)
            .map_err(|err| OutputError::workbook(path, err))?;
        zip.write_all(&xml).map_err(|err| OutputError::io(path, err))?;
    }
    let mut inner = zip.finish().map_err(|err| OutputError::workbook(path, err))?;
    inner.flush().map_err(|err| OutputError::io(path, err))?;
    Ok(())
}

fn new_part() -> PartResult<XmlWriter> {
    let mut xml = Writer::new(Vec::new());
    emit(&mut xml, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    Ok(xml)
}

fn content_types() -> PartResult<Vec<u8>> {
    let mut xml = new_part()?;
    let mut root = BytesStart::new("Types");
    root.push_attribute(("xmlns", CONTENT_TYPES_NS));
    emit(&mut xml, Event::Start(root))?;

    let mut rels = BytesStart::new("Default");
    rels.push_attribute(("Extension", "rels"));
    rels.push_attribute(("ContentType", RELS_TYPE));
    emit(&mut xml, Event::Empty(rels))?;
    let mut plain = BytesStart::new("Default");
    plain.push_attribute(("Extension", "xml"));
    plain.push_attribute(("ContentType", "application/xml"));
    emit(&mut xml, Event::Empty(plain))?;

    for (part, content_type) in [
        ("/xl/workbook.xml", WORKBOOK_TYPE),
        ("/xl/worksheets/sheet1.xml", WORKSHEET_TYPE),
    ] {
        let mut item = BytesStart::new("Override");
        item.push_attribute(("PartName", part));
        item.push_attribute(("ContentType", content_type));
        emit(&mut xml, Event::Empty(item))?;
    }

    emit(&mut xml, Event::End(BytesEnd::new("Types")))?;
    Ok(xml.into_inner())
}

fn relationships(target_type: &str, target: &str) -> PartResult<Vec<u8>> {
    let mut xml = new_part()?;
    let mut root = BytesStart::new("Relationships");
    root.push_attribute(("xmlns", PACKAGE_REL_NS));
    emit(&mut xml, Event::Start(root))?;
    let mut rel = BytesStart::new("Relationship");
    rel.push_attribute(("Id", "rId1"));
    rel.push_attribute(("Type", target_type));
    rel.push_attribute(("Target", target));
    emit(&mut xml, Event::Empty(rel))?;
    emit(&mut xml, Event::End(BytesEnd::new("Relationships")))?;
    Ok(xml.into_inner())
}

fn root_relationships() -> PartResult<Vec<u8>> {
    relationships(OFFICE_DOCUMENT_REL, "xl/workbook.xml")
}

fn workbook_relationships() -> PartResult<Vec<u8>> {
    relationships(WORKSHEET_REL, "worksheets/sheet1.xml")
}

fn workbook() -> PartResult<Vec<u8>> {
    let mut xml = new_part()?;
    let mut root = BytesStart::new("workbook");
    root.push_attribute(("xmlns", MAIN_NS));
    root.push_attribute(("xmlns:r", REL_NS));
    emit(&mut xml, Event::Start(root))?;
    emit(&mut xml, Event::Start(BytesStart::new("sheets")))?;
    let mut sheet = BytesStart::new("sheet");
    sheet.push_attribute(("name", SHEET_NAME));
    sheet.push_attribute(("sheetId", "1"));
    sheet.push_attribute(("r:id", "rId1"));
    emit(&mut xml, Event::Empty(sheet))?;
    emit(&mut xml, Event::End(BytesEnd::new("sheets")))?;
    emit(&mut xml, Event::End(BytesEnd::new("workbook")))?;
    Ok(xml.into_inner())
}

fn worksheet(attendees: &[EligibleAttendee]) -> PartResult<Vec<u8>> {
    let mut xml = new_part()?;
    let mut root = BytesStart::new("worksheet");
    root.push_attribute(("xmlns", MAIN_NS));
    emit(&mut xml, Event::Start(root))?;
    emit(&mut xml, Event::Start(BytesStart::new("sheetData")))?;

    let header: Vec<Cell<'_>> = SUMMARY_COLUMNS.iter().map(|name| Cell::Text(name)).collect();
    write_row(&mut xml, 1, &header)?;
    for (index, attendee) in attendees.iter().enumerate() {
        let cells = [
            Cell::Text(&attendee.first_name),
            Cell::Text(&attendee.last_name),
            Cell::Text(&attendee.email),
            Cell::Number(attendee.duration_minutes),
            Cell::Text(&attendee.specialty),
            Cell::Text(&attendee.country),
            Cell::Number(attendee.reference as u64),
        ];
        write_row(&mut xml, index + 2, &cells)?;
    }

    emit(&mut xml, Event::End(BytesEnd::new("sheetData")))?;
    emit(&mut xml, Event::End(BytesEnd::new("worksheet")))?;
    Ok(xml.into_inner())
}

fn write_row(xml: &mut XmlWriter, row: usize, cells: &[Cell<'_>]) -> PartResult<()> {
    let row_number = row.to_string();
    let mut start = BytesStart::new("row");
    start.push_attribute(("r", row_number.as_str()));
    emit(xml, Event::Start(start))?;

    for (column, cell) in cells.iter().enumerate() {
        let reference = format!("{}{row}", column_name(column));
        let mut c = BytesStart::new("c");
        c.push_attribute(("r", reference.as_str()));
        match cell {
            Cell::Text(text) => {
                c.push_attribute(("t", "inlineStr"));
                emit(xml, Event::Start(c))?;
                emit(xml, Event::Start(BytesStart::new("is")))?;
                let mut t = BytesStart::new("t");
                if text.trim().len() < text.len() {
                    t.push_attribute(("xml:space", "preserve"));
                }
                emit(xml, Event::Start(t))?;
                emit(xml, Event::Text(BytesText::new(text)))?;
                emit(xml, Event::End(BytesEnd::new("t")))?;
                emit(xml, Event::End(BytesEnd::new("is")))?;
            }
            Cell::Number(value) => {
                emit(xml, Event::Start(c))?;
                let value = value.to_string();
                emit(xml, Event::Start(BytesStart::new("v")))?;
                emit(xml, Event::Text(BytesText::new(&value)))?;
                emit(xml, Event::End(BytesEnd::new("v")))?;
            }
        }
        emit(xml, Event::End(BytesEnd::new("c")))?;
    }

    emit(xml, Event::End(BytesEnd::new("row")))?;
    Ok(())
}

fn emit(xml: &mut XmlWriter, event: Event<'_>) -> PartResult<()> {
    xml.write_event(event).map_err(|err| err.to_string())
}

/// Spreadsheet column name for a 0-based index: `0 -> A`, `26 -> AA`.
fn column_name(index: usize) -> String {
    let mut name = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        name.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names_follow_spreadsheet_lettering() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(6), "G");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(701), "ZZ");
        assert_eq!(column_name(702), "AAA");
    }

    #[test]
    fn rows_mix_inline_strings_and_numbers() {
        let mut xml = Writer::new(Vec::new());
        write_row(&mut xml, 2, &[Cell::Text("a&b"), Cell::Number(45)]).expect("row");
        let xml = String::from_utf8(xml.into_inner()).expect("utf-8");
        assert_eq!(
            xml,
            r#"<row r="2"><c r="A2" t="inlineStr"><is><t>a&amp;b</t></is></c><c r="B2"><v>45</v></c></row>"#
        );
    }
}
