//! Office Open XML presentation writer.
//!
//! Every slide is drawn on a blank layout with explicit text boxes so the
//! configured fonts and sizes apply directly to each run, independent of
//! any theme defaults.

use crate::config::FormattingConfig;
use crate::error::DeckError;
use crate::output::{Deck, Slide, SlideContent, SlideImage};
use crate::writer::templates::*;
use crate::writer::DocumentWriter;
use quick_xml::escape::escape;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

// 16:9 slide, in EMU (914400 per inch).
const SLIDE_CX: u64 = 12_192_000;
const SLIDE_CY: u64 = 6_858_000;
const MARGIN: u64 = 609_600;
const BULLET_INDENT: u64 = 342_900;

/// Position and size of a shape, in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rect {
    x: u64,
    y: u64,
    cx: u64,
    cy: u64,
}

const TITLE_SLIDE_BOX: Rect = Rect {
    x: MARGIN,
    y: 2_286_000,
    cx: SLIDE_CX - 2 * MARGIN,
    cy: 1_828_800,
};
const SLIDE_TITLE_BOX: Rect = Rect {
    x: MARGIN,
    y: 304_800,
    cx: SLIDE_CX - 2 * MARGIN,
    cy: 1_143_000,
};
const BODY_BOX: Rect = Rect {
    x: MARGIN,
    y: 1_600_200,
    cx: SLIDE_CX - 2 * MARGIN,
    cy: 4_800_600,
};
// With a picture the body keeps the left side and the picture is fitted
// into the right-hand frame.
const BODY_BOX_WITH_IMAGE: Rect = Rect {
    x: MARGIN,
    y: 1_600_200,
    cx: 6_400_800,
    cy: 4_800_600,
};
const IMAGE_FRAME: Rect = Rect {
    x: 7_315_200,
    y: 1_600_200,
    cx: 4_267_200,
    cy: 4_572_000,
};

/// Writes a [`Deck`] as a `.pptx` package.
#[derive(Debug, Clone, Copy, Default)]
pub struct PptxWriter;

impl DocumentWriter for PptxWriter {
    fn render(&self, deck: &Deck, formatting: &FormattingConfig) -> Result<Vec<u8>, DeckError> {
        build_package(deck, formatting).map_err(|e| DeckError::RenderFailed {
            detail: e.to_string(),
        })
    }

    fn extension(&self) -> &'static str {
        "pptx"
    }
}

fn build_package(deck: &Deck, fmt: &FormattingConfig) -> zip::result::ZipResult<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let xml = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    // Pictures are already compressed.
    let media = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    let total = deck.total_slides();

    put(&mut zip, "[Content_Types].xml", content_types(deck).as_bytes(), xml)?;
    put(&mut zip, "_rels/.rels", ROOT_RELS.as_bytes(), xml)?;
    put(&mut zip, "docProps/core.xml", core_props(&deck.topic).as_bytes(), xml)?;
    put(&mut zip, "docProps/app.xml", APP_PROPS.as_bytes(), xml)?;
    put(&mut zip, "ppt/presentation.xml", presentation(total).as_bytes(), xml)?;
    put(
        &mut zip,
        "ppt/_rels/presentation.xml.rels",
        presentation_rels(total).as_bytes(),
        xml,
    )?;
    put(&mut zip, "ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER.as_bytes(), xml)?;
    put(
        &mut zip,
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        SLIDE_MASTER_RELS.as_bytes(),
        xml,
    )?;
    put(&mut zip, "ppt/slideLayouts/slideLayout1.xml", SLIDE_LAYOUT.as_bytes(), xml)?;
    put(
        &mut zip,
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        SLIDE_LAYOUT_RELS.as_bytes(),
        xml,
    )?;
    put(&mut zip, "ppt/theme/theme1.xml", THEME.as_bytes(), xml)?;

    // Slide 1 is the title slide.
    put(&mut zip, "ppt/slides/slide1.xml", title_slide(&deck.topic, fmt).as_bytes(), xml)?;
    put(
        &mut zip,
        "ppt/slides/_rels/slide1.xml.rels",
        slide_rels(None).as_bytes(),
        xml,
    )?;

    for (i, slide) in deck.slides.iter().enumerate() {
        let n = i + 2;
        let media_name = slide
            .image
            .as_ref()
            .map(|img| format!("image{}.{}", n, img.kind.extension()));

        put(
            &mut zip,
            &format!("ppt/slides/slide{n}.xml"),
            content_slide(slide, fmt).as_bytes(),
            xml,
        )?;
        put(
            &mut zip,
            &format!("ppt/slides/_rels/slide{n}.xml.rels"),
            slide_rels(media_name.as_deref()).as_bytes(),
            xml,
        )?;
        if let (Some(img), Some(name)) = (&slide.image, &media_name) {
            put(&mut zip, &format!("ppt/media/{name}"), &img.bytes, media)?;
        }
    }

    let bytes = zip.finish()?.into_inner();
    debug!("Packaged {} slides into {} bytes", total, bytes.len());
    Ok(bytes)
}

fn put(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    name: &str,
    data: &[u8],
    options: SimpleFileOptions,
) -> zip::result::ZipResult<()> {
    zip.start_file(name, options)?;
    zip.write_all(data)?;
    Ok(())
}

// ── Package parts ────────────────────────────────────────────────────────

fn content_types(deck: &Deck) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);

    let mut extensions: Vec<&str> = deck
        .slides
        .iter()
        .filter_map(|s| s.image.as_ref().map(|img| img.kind.extension()))
        .collect();
    extensions.sort_unstable();
    extensions.dedup();
    for ext in extensions {
        xml.push_str(&format!(
            r#"<Default Extension="{ext}" ContentType="image/{ext}"/>"#
        ));
    }

    let overrides = [
        ("/ppt/presentation.xml", CT_PRESENTATION),
        ("/ppt/slideMasters/slideMaster1.xml", CT_SLIDE_MASTER),
        ("/ppt/slideLayouts/slideLayout1.xml", CT_SLIDE_LAYOUT),
        ("/ppt/theme/theme1.xml", CT_THEME),
        ("/docProps/core.xml", CT_CORE_PROPS),
        ("/docProps/app.xml", CT_EXTENDED_PROPS),
    ];
    for (part, ct) in overrides {
        xml.push_str(&format!(r#"<Override PartName="{part}" ContentType="{ct}"/>"#));
    }
    for n in 1..=deck.total_slides() {
        xml.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="{CT_SLIDE}"/>"#
        ));
    }
    xml.push_str("</Types>");
    xml
}

fn core_props(topic: &str) -> String {
    format!(
        concat!(
            "{}",
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            "<dc:title>{}</dc:title><dc:creator>edgequake-deck</dc:creator>",
            "</cp:coreProperties>"
        ),
        XML_DECL,
        xml_text(topic)
    )
}

fn presentation(total_slides: usize) -> String {
    let mut xml = format!(
        r#"{XML_DECL}<p:presentation xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" saveSubsetFonts="1">"#
    );
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);
    xml.push_str("<p:sldIdLst>");
    for n in 1..=total_slides {
        xml.push_str(&format!(
            r#"<p:sldId id="{}" r:id="rId{}"/>"#,
            255 + n,
            n + 1
        ));
    }
    xml.push_str("</p:sldIdLst>");
    xml.push_str(&format!(r#"<p:sldSz cx="{SLIDE_CX}" cy="{SLIDE_CY}"/>"#));
    xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
    xml.push_str("</p:presentation>");
    xml
}

/// rId1 is the master, rId2..=rId(n+1) the slides, rId(n+2) the theme.
fn presentation_rels(total_slides: usize) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
    xml.push_str(&relationship(
        "rId1",
        REL_SLIDE_MASTER,
        "slideMasters/slideMaster1.xml",
    ));
    for n in 1..=total_slides {
        xml.push_str(&relationship(
            &format!("rId{}", n + 1),
            REL_SLIDE,
            &format!("slides/slide{n}.xml"),
        ));
    }
    xml.push_str(&relationship(
        &format!("rId{}", total_slides + 2),
        REL_THEME,
        "theme/theme1.xml",
    ));
    xml.push_str("</Relationships>");
    xml
}

fn slide_rels(media_name: Option<&str>) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
    xml.push_str(&relationship(
        "rId1",
        REL_SLIDE_LAYOUT,
        "../slideLayouts/slideLayout1.xml",
    ));
    if let Some(name) = media_name {
        xml.push_str(&relationship("rId2", REL_IMAGE, &format!("../media/{name}")));
    }
    xml.push_str("</Relationships>");
    xml
}

fn relationship(id: &str, rel_type: &str, target: &str) -> String {
    format!(r#"<Relationship Id="{id}" Type="{rel_type}" Target="{target}"/>"#)
}

// ── Slides ───────────────────────────────────────────────────────────────

fn title_slide(topic: &str, fmt: &FormattingConfig) -> String {
    let paragraph = format!(
        r#"<a:p><a:pPr algn="ctr"/>{}</a:p>"#,
        run(topic, fmt.title_slide_font_size, &fmt.title_font, true)
    );
    slide_xml(&text_box(2, "Title", TITLE_SLIDE_BOX, "ctr", &paragraph))
}

fn content_slide(slide: &Slide, fmt: &FormattingConfig) -> String {
    let mut shapes = String::new();

    let title = format!(
        "<a:p>{}</a:p>",
        run(
            slide.title.as_str(),
            fmt.slide_title_font_size,
            &fmt.title_font,
            true
        )
    );
    shapes.push_str(&text_box(2, "Title", SLIDE_TITLE_BOX, "b", &title));

    let body_box = if slide.image.is_some() {
        BODY_BOX_WITH_IMAGE
    } else {
        BODY_BOX
    };
    shapes.push_str(&text_box(
        3,
        "Content",
        body_box,
        "t",
        &body_paragraphs(&slide.content, fmt),
    ));

    if let Some(ref img) = slide.image {
        shapes.push_str(&picture(4, img));
    }

    slide_xml(&shapes)
}

fn body_paragraphs(content: &SlideContent, fmt: &FormattingConfig) -> String {
    let size = fmt.body_font_size;
    let font = fmt.body_font.as_str();

    if content.is_empty() {
        // A text body needs at least one paragraph.
        return format!(
            r#"<a:p><a:endParaRPr lang="en-US" sz="{}" dirty="0"/></a:p>"#,
            size * 100
        );
    }

    match content {
        SlideContent::Bullets(points) => points
            .iter()
            .map(|point| {
                format!(
                    concat!(
                        r#"<a:p><a:pPr marL="{indent}" indent="-{indent}">"#,
                        r#"<a:buFont typeface="Arial"/><a:buChar char="•"/></a:pPr>{run}</a:p>"#
                    ),
                    indent = BULLET_INDENT,
                    run = run(point, size, font, false)
                )
            })
            .collect(),
        SlideContent::Paragraph(text) => {
            let runs: Vec<String> = text.lines().map(|line| run(line, size, font, false)).collect();
            format!("<a:p>{}</a:p>", runs.join("<a:br/>"))
        }
    }
}

fn slide_xml(shapes: &str) -> String {
    format!(
        concat!(
            r#"{decl}<p:sld xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}">"#,
            r#"<p:cSld><p:spTree>"#,
            r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
            r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
            "{shapes}",
            r#"</p:spTree></p:cSld>"#,
            r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#,
            r#"</p:sld>"#
        ),
        decl = XML_DECL,
        a = NS_A,
        r = NS_R,
        p = NS_P,
        shapes = shapes
    )
}

fn text_box(id: u32, name: &str, rect: Rect, anchor: &str, paragraphs: &str) -> String {
    format!(
        concat!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name} {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#,
            r#"<p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#,
            r#"<p:txBody><a:bodyPr wrap="square" anchor="{anchor}"><a:normAutofit/></a:bodyPr><a:lstStyle/>"#,
            "{paragraphs}",
            r#"</p:txBody></p:sp>"#
        ),
        id = id,
        name = name,
        x = rect.x,
        y = rect.y,
        cx = rect.cx,
        cy = rect.cy,
        anchor = anchor,
        paragraphs = paragraphs
    )
}

fn run(text: &str, size_pt: u32, font: &str, bold: bool) -> String {
    let font = xml_text(font);
    format!(
        concat!(
            r#"<a:r><a:rPr lang="en-US" sz="{sz}"{b} dirty="0">"#,
            r#"<a:latin typeface="{font}"/><a:cs typeface="{font}"/></a:rPr>"#,
            "<a:t>{text}</a:t></a:r>"
        ),
        sz = size_pt * 100,
        b = if bold { r#" b="1""# } else { "" },
        font = font,
        text = xml_text(text)
    )
}

fn picture(id: u32, img: &SlideImage) -> String {
    let rect = fit_into(img.width, img.height, IMAGE_FRAME);
    format!(
        concat!(
            r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Picture {id}"/>"#,
            r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#,
            r#"<p:blipFill><a:blip r:embed="rId2"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#,
            r#"<p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#
        ),
        id = id,
        x = rect.x,
        y = rect.y,
        cx = rect.cx,
        cy = rect.cy
    )
}

/// Largest rect with the picture's aspect ratio that fits in `frame`,
/// centred inside it.
fn fit_into(width: u32, height: u32, frame: Rect) -> Rect {
    let (w, h) = (u64::from(width.max(1)), u64::from(height.max(1)));
    let (cx, cy) = if w * frame.cy > h * frame.cx {
        (frame.cx, h * frame.cx / w)
    } else {
        (w * frame.cy / h, frame.cy)
    };
    Rect {
        x: frame.x + (frame.cx - cx) / 2,
        y: frame.y + (frame.cy - cy) / 2,
        cx,
        cy,
    }
}

/// Escape for element text or attribute values, dropping characters XML 1.0
/// cannot represent.
fn xml_text(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .filter(|&c| matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..))
        .collect();
    escape(cleaned.as_str()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{ImageKind, SlideTitle};
    use image::{DynamicImage, ImageFormat, RgbImage};
    use quick_xml::events::Event;
    use quick_xml::Reader;
    use std::io::Read;
    use zip::ZipArchive;

    fn deck(contents: Vec<SlideContent>) -> Deck {
        let titles = (1..=contents.len())
            .map(|i| SlideTitle::new(format!("Slide Title {i}")).unwrap())
            .collect();
        Deck::from_parts("Renewable Energy", titles, contents)
    }

    fn render(deck: &Deck, fmt: &FormattingConfig) -> ZipArchive<Cursor<Vec<u8>>> {
        let bytes = PptxWriter.render(deck, fmt).unwrap();
        ZipArchive::new(Cursor::new(bytes)).unwrap()
    }

    fn read_part(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
        let mut s = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut s).unwrap();
        s
    }

    /// Text of every `<a:t>` in document order.
    fn texts(xml: &str) -> Vec<String> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);
        let mut in_t = false;
        let mut out = Vec::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) if e.name().as_ref() == b"a:t" => in_t = true,
                Event::End(e) if e.name().as_ref() == b"a:t" => in_t = false,
                Event::Text(t) if in_t => out.push(t.unescape().unwrap().into_owned()),
                Event::Eof => break,
                _ => {}
            }
        }
        out
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn writes_one_part_per_slide() {
        let d = deck(vec![
            SlideContent::Bullets(vec!["a".into()]),
            SlideContent::Bullets(vec!["b".into()]),
        ]);
        let mut archive = render(&d, &FormattingConfig::default());
        let names: Vec<String> = archive.file_names().map(str::to_string).collect();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/slides/slide3.xml",
            "ppt/theme/theme1.xml",
        ] {
            assert!(names.iter().any(|n| n == part), "missing {part}");
        }
        assert!(!names.iter().any(|n| n == "ppt/slides/slide4.xml"));

        let pres = read_part(&mut archive, "ppt/presentation.xml");
        assert_eq!(pres.matches("<p:sldId ").count(), 3);
    }

    #[test]
    fn title_slide_shows_topic() {
        let d = deck(vec![SlideContent::Bullets(vec!["x".into()])]);
        let mut archive = render(&d, &FormattingConfig::default());
        let slide1 = read_part(&mut archive, "ppt/slides/slide1.xml");
        assert_eq!(texts(&slide1), vec!["Renewable Energy"]);
        assert!(slide1.contains(r#"sz="4000""#));
    }

    #[test]
    fn bullets_keep_order_and_fonts() {
        let d = deck(vec![SlideContent::Bullets(vec![
            "Point A".into(),
            "Point B".into(),
        ])]);
        let fmt = FormattingConfig {
            body_font: "Georgia".into(),
            body_font_size: 18,
            ..FormattingConfig::default()
        };
        let mut archive = render(&d, &fmt);
        let slide2 = read_part(&mut archive, "ppt/slides/slide2.xml");
        assert_eq!(texts(&slide2), vec!["Slide Title 1", "Point A", "Point B"]);
        assert_eq!(slide2.matches(r#"<a:buChar char="•"/>"#).count(), 2);
        assert!(slide2.contains(r#"sz="1800""#));
        assert!(slide2.contains(r#"<a:latin typeface="Georgia"/>"#));
        assert!(slide2.contains(r#"sz="3000""#));
    }

    #[test]
    fn paragraph_lines_become_breaks() {
        let d = deck(vec![SlideContent::Paragraph("Line one\nLine two".into())]);
        let mut archive = render(&d, &FormattingConfig::default());
        let slide2 = read_part(&mut archive, "ppt/slides/slide2.xml");
        assert!(slide2.contains("<a:br/>"));
        assert!(!slide2.contains("buChar"));
        assert_eq!(texts(&slide2), vec!["Slide Title 1", "Line one", "Line two"]);
    }

    #[test]
    fn empty_body_is_still_valid() {
        let d = deck(vec![SlideContent::Bullets(vec![])]);
        let mut archive = render(&d, &FormattingConfig::default());
        let slide2 = read_part(&mut archive, "ppt/slides/slide2.xml");
        assert!(slide2.contains("<a:endParaRPr"));
        assert_eq!(texts(&slide2), vec!["Slide Title 1"]);
    }

    #[test]
    fn escapes_markup_characters() {
        let d = Deck::from_parts(
            "R&D <2024>",
            vec![SlideTitle::new("Q&A").unwrap()],
            vec![SlideContent::Bullets(vec!["a < b & \"c\"".into()])],
        );
        let mut archive = render(&d, &FormattingConfig::default());
        let slide1 = read_part(&mut archive, "ppt/slides/slide1.xml");
        assert!(slide1.contains("R&amp;D &lt;2024&gt;"));
        assert_eq!(texts(&slide1), vec!["R&D <2024>"]);
        let slide2 = read_part(&mut archive, "ppt/slides/slide2.xml");
        assert_eq!(texts(&slide2), vec!["Q&A", "a < b & \"c\""]);
        let core = read_part(&mut archive, "docProps/core.xml");
        assert!(core.contains("<dc:title>R&amp;D &lt;2024&gt;</dc:title>"));
    }

    #[test]
    fn drops_xml_invalid_characters() {
        assert_eq!(xml_text("a\u{1}b\u{FFFF}c"), "abc");
    }

    #[test]
    fn image_is_embedded() {
        let mut d = deck(vec![
            SlideContent::Bullets(vec!["a".into()]),
            SlideContent::Bullets(vec!["b".into()]),
        ]);
        d.slides[1].image = Some(SlideImage {
            bytes: png(40, 20),
            kind: ImageKind::Png,
            width: 40,
            height: 20,
            source_url: None,
        });
        let mut archive = render(&d, &FormattingConfig::default());
        assert!(archive.by_name("ppt/media/image3.png").is_ok());
        let rels = read_part(&mut archive, "ppt/slides/_rels/slide3.xml.rels");
        assert!(rels.contains("../media/image3.png"));
        let slide3 = read_part(&mut archive, "ppt/slides/slide3.xml");
        assert!(slide3.contains(r#"r:embed="rId2""#));
        let slide2 = read_part(&mut archive, "ppt/slides/slide2.xml");
        assert!(!slide2.contains("<p:pic>"));
        let types = read_part(&mut archive, "[Content_Types].xml");
        assert!(types.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));
    }

    #[test]
    fn fit_preserves_aspect_ratio() {
        let wide = fit_into(2000, 1000, IMAGE_FRAME);
        assert_eq!(wide.cx, IMAGE_FRAME.cx);
        assert_eq!(wide.cy, IMAGE_FRAME.cx / 2);
        assert!(wide.y > IMAGE_FRAME.y);

        let tall = fit_into(1000, 4000, IMAGE_FRAME);
        assert_eq!(tall.cy, IMAGE_FRAME.cy);
        assert_eq!(tall.cx, IMAGE_FRAME.cy / 4);
        assert!(tall.x + tall.cx <= IMAGE_FRAME.x + IMAGE_FRAME.cx);
    }
}
