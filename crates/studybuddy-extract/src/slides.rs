//! PowerPoint decks (`.pptx`).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Text of every text-bearing shape, slides in numeric order.
///
/// Paragraphs of one shape are joined with `\n`, and so are shapes.
///
/// Order follows the `slideN.xml` entry names, not the `sldIdLst` in
/// `ppt/presentation.xml`, so slides moved after creation keep their
/// original position.
pub fn extract(path: &Path) -> Result<String> {
    let file = File::open(path).with_context(|| format!("cannot read {}", path.display()))?;
    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("invalid pptx archive {}", path.display()))?;

    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    slides.sort_unstable();

    let mut shapes = Vec::new();
    for (_, name) in slides {
        let mut xml = String::new();
        archive
            .by_name(&name)
            .with_context(|| format!("missing slide entry {name}"))?
            .read_to_string(&mut xml)
            .with_context(|| format!("cannot read slide entry {name}"))?;
        shapes.extend(shape_texts(&xml).with_context(|| format!("malformed slide {name}"))?);
    }
    Ok(shapes.join("\n"))
}

/// `ppt/slides/slide12.xml` → 12.
fn slide_number(entry: &str) -> Option<u32> {
    entry
        .strip_prefix("ppt/slides/slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Text of each top-level `p:sp` shape that has a text body.
fn shape_texts(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);

    let mut shapes = Vec::new();
    let mut group_depth = 0usize;
    let mut in_shape = false;
    let mut has_body = false;
    let mut in_text = false;
    let mut paragraphs: Vec<String> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"grpSp" => group_depth += 1,
                b"sp" if group_depth == 0 => {
                    in_shape = true;
                    has_body = false;
                    paragraphs.clear();
                }
                b"txBody" if in_shape => has_body = true,
                b"p" if in_shape && has_body => paragraphs.push(String::new()),
                b"t" if in_shape && has_body => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"p" if in_shape && has_body => paragraphs.push(String::new()),
                b"br" if in_shape && has_body => {
                    if let Some(last) = paragraphs.last_mut() {
                        last.push('\n');
                    }
                }
                _ => {}
            },
            Event::Text(t) if in_text => {
                if let Some(last) = paragraphs.last_mut() {
                    last.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"grpSp" => group_depth = group_depth.saturating_sub(1),
                b"sp" if in_shape && group_depth == 0 => {
                    if has_body {
                        shapes.push(paragraphs.join("\n"));
                    }
                    in_shape = false;
                }
                b"t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(shapes)
}
