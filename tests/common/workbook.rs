//! Minimal `.xlsx` writer for loader tests.
//!
//! Produces just enough of an Office Open XML package for calamine to read:
//! content types, the workbook and its relationships, one part per sheet and
//! a shared-string table. Cells are given as `Some("text")`, numbers written
//! as `Num`, or left out entirely.

use std::io::Write;
use std::path::Path;
use zip::write::{ExtendedFileOptions, FileOptions};
use zip::CompressionMethod;

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

#[derive(Debug, Clone, Copy)]
pub enum Cell<'a> {
    Text(&'a str),
    Num(f64),
    Blank,
}

/// A worksheet as rows of cells; an empty row leaves a gap in the sheet.
pub struct SheetSpec<'a> {
    pub name: &'a str,
    pub rows: Vec<Vec<Cell<'a>>>,
}

/// Write a workbook containing `sheets`, in order, to `path`.
pub fn write_xlsx(path: &Path, sheets: &[SheetSpec<'_>]) -> anyhow::Result<()> {
    let mut strings: Vec<String> = Vec::new();
    let sheet_parts: Vec<String> = sheets
        .iter()
        .map(|sheet| sheet_xml(sheet, &mut strings))
        .collect();

    let file = std::fs::File::create(path)?;
    let mut zip = zip::ZipWriter::new(file);
    let options = || FileOptions::<ExtendedFileOptions>::default().compression_method(CompressionMethod::Stored);

    zip.start_file("[Content_Types].xml", options())?;
    zip.write_all(content_types(sheets.len()).as_bytes())?;

    zip.start_file("_rels/.rels", options())?;
    zip.write_all(
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_NS}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
        )
        .as_bytes(),
    )?;

    zip.start_file("xl/workbook.xml", options())?;
    zip.write_all(workbook_xml(sheets).as_bytes())?;

    zip.start_file("xl/_rels/workbook.xml.rels", options())?;
    zip.write_all(workbook_rels(sheets.len()).as_bytes())?;

    for (i, part) in sheet_parts.iter().enumerate() {
        zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options())?;
        zip.write_all(part.as_bytes())?;
    }

    zip.start_file("xl/sharedStrings.xml", options())?;
    zip.write_all(shared_strings_xml(&strings).as_bytes())?;

    zip.finish()?;
    Ok(())
}

fn content_types(sheet_count: usize) -> String {
    let overrides: String = (1..=sheet_count)
        .map(|i| {
            format!(
                r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>{overrides}</Types>"#
    )
}

fn workbook_xml(sheets: &[SheetSpec<'_>]) -> String {
    let entries: String = sheets
        .iter()
        .enumerate()
        .map(|(i, sheet)| {
            format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape(sheet.name),
                i + 1,
                i + 1
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="{MAIN_NS}" xmlns:r="{REL_NS}"><sheets>{entries}</sheets></workbook>"#
    )
}

fn workbook_rels(sheet_count: usize) -> String {
    let mut rels: String = (1..=sheet_count)
        .map(|i| {
            format!(
                r#"<Relationship Id="rId{i}" Type="{REL_NS}/worksheet" Target="worksheets/sheet{i}.xml"/>"#
            )
        })
        .collect();
    rels.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="{REL_NS}/sharedStrings" Target="sharedStrings.xml"/>"#,
        sheet_count + 1
    ));
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
    )
}

fn sheet_xml(sheet: &SheetSpec<'_>, strings: &mut Vec<String>) -> String {
    let mut data = String::new();
    for (r, row) in sheet.rows.iter().enumerate() {
        if row.iter().all(|c| matches!(c, Cell::Blank)) {
            continue;
        }
        let row_number = r + 1;
        data.push_str(&format!(r#"<row r="{row_number}">"#));
        for (c, cell) in row.iter().enumerate() {
            let reference = format!("{}{row_number}", column_letter(c));
            match cell {
                Cell::Blank => {}
                Cell::Text(text) => {
                    let index = strings.len();
                    strings.push(text.to_string());
                    data.push_str(&format!(r#"<c r="{reference}" t="s"><v>{index}</v></c>"#));
                }
                Cell::Num(n) => {
                    data.push_str(&format!(r#"<c r="{reference}"><v>{n}</v></c>"#));
                }
            }
        }
        data.push_str("</row>");
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="{MAIN_NS}" xmlns:r="{REL_NS}"><sheetData>{data}</sheetData></worksheet>"#
    )
}

fn shared_strings_xml(strings: &[String]) -> String {
    let items: String = strings
        .iter()
        .map(|s| format!(r#"<si><t xml:space="preserve">{}</t></si>"#, escape(s)))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="{MAIN_NS}" count="{n}" uniqueCount="{n}">{items}</sst>"#,
        n = strings.len()
    )
}

// Single letters are enough for test sheets.
fn column_letter(index: usize) -> char {
    (b'A' + index as u8) as char
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
