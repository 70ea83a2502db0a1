//! Document builders for decoder tests.

use std::io::Write;
use std::path::Path;

use docx_rs::{Docx, Paragraph, Run};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// One paragraph per entry, one run per string.
pub fn write_docx(path: &Path, paragraphs: &[&[&str]]) {
    let mut docx = Docx::new();
    for runs in paragraphs {
        let mut para = Paragraph::new();
        for run in *runs {
            para = para.add_run(Run::new().add_text(*run));
        }
        docx = docx.add_paragraph(para);
    }
    let file = std::fs::File::create(path).unwrap();
    docx.build().pack(file).unwrap();
}

/// Slide XML with one text shape per entry. Text is inserted unescaped.
pub fn slide_xml(shapes: &[&[&str]]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree>"#,
    );
    for paragraphs in shapes {
        xml.push_str("<p:sp><p:nvSpPr/><p:txBody><a:bodyPr/>");
        for para in *paragraphs {
            xml.push_str(&format!("<a:p><a:r><a:t>{para}</a:t></a:r></a:p>"));
        }
        xml.push_str("</p:txBody></p:sp>");
    }
    xml.push_str("</p:spTree></p:cSld></p:sld>");
    xml
}

/// A zip holding `ppt/slides/slide<n>.xml` entries plus a layout entry.
pub fn write_pptx(path: &Path, slides: &[(u32, String)]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    zip.start_file("ppt/slideLayouts/slideLayout1.xml", options)
        .unwrap();
    zip.write_all(slide_xml(&[&["Layout placeholder"]]).as_bytes())
        .unwrap();
    for (number, xml) in slides {
        zip.start_file(format!("ppt/slides/slide{number}.xml"), options)
            .unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

/// One page per entry; `None` produces a page with no text operators.
pub fn write_pdf(path: &Path, pages: &[Option<&str>]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let operations = match text {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
            None => vec![],
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// Shell-script stand-ins for `pdftoppm` and `tesseract` in `dir`.
///
/// The renderer writes `<prefix>.png`; the recognizer checks its input
/// exists and prints `recognized`.
#[cfg(unix)]
pub fn stub_ocr_tools(dir: &Path, recognized: &str) -> studybuddy_core::settings::OcrSettings {
    use std::os::unix::fs::PermissionsExt;

    let write_script = |name: &str, body: String| {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    };

    let pdftoppm = write_script(
        "pdftoppm",
        "for last; do :; done\nprintf png > \"$last.png\"\n".to_string(),
    );
    let tesseract = write_script(
        "tesseract",
        format!("[ -f \"$1\" ] || exit 2\necho '{recognized}'\n"),
    );

    studybuddy_core::settings::OcrSettings {
        pdftoppm,
        tesseract,
        timeout_secs: 10,
        ..studybuddy_core::settings::OcrSettings::default()
    }
}
