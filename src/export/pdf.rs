//! Minimal PDF 1.4 writer for exported responses.
//!
//! Single standard font (Helvetica, WinAnsi), A4 pages, fixed margins. Text
//! outside Latin-1 is replaced with `?`.

use std::io::Write;

const MM: f32 = 72.0 / 25.4;
const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const MARGIN: f32 = 20.0 * MM;
const TITLE_Y: f32 = 20.0 * MM;
const GENERATED_Y: f32 = 30.0 * MM;
const CONTENT_Y: f32 = 45.0 * MM;
const LINE_HEIGHT_FACTOR: f32 = 1.15;

pub const TITLE_SIZE: f32 = 16.0;
pub const META_SIZE: f32 = 10.0;
pub const BODY_SIZE: f32 = 12.0;

/// Helvetica advance widths for 0x20..=0x7E, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 0x20
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0x30
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // 0x40
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 0x50
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // 0x60
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 0x70
];
const FALLBACK_WIDTH: u16 = 556;

/// Printable width between the left and right margins, in points.
pub fn printable_width() -> f32 {
    PAGE_WIDTH - 2.0 * MARGIN
}

fn char_width(c: char, size: f32) -> f32 {
    let units = match c as u32 {
        code @ 0x20..=0x7E => HELVETICA_WIDTHS[(code - 0x20) as usize],
        _ => FALLBACK_WIDTH,
    };
    f32::from(units) * size / 1000.0
}

/// Rendered width of `text` at `size` points.
pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().map(|c| char_width(c, size)).sum()
}

/// Breaks `text` into lines no wider than `max_width`.
///
/// Explicit newlines are kept, blank lines survive as empty lines, and words
/// longer than a line are split between characters.
pub fn wrap_text(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r').replace('\t', "    ");
        let mut line = String::new();

        for word in paragraph.split(' ') {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", line, word)
            };
            if text_width(&candidate, size) <= max_width {
                line = candidate;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            for c in word.chars() {
                if !line.is_empty() && text_width(&line, size) + char_width(c, size) > max_width {
                    lines.push(std::mem::take(&mut line));
                }
                line.push(c);
            }
        }
        lines.push(line);
    }

    lines
}

struct TextLine {
    text: String,
    size: f32,
    x: f32,
    /// Distance of the baseline from the top edge.
    top: f32,
}

/// Title, generated-on line and word-wrapped body laid out over A4 pages.
pub struct PdfDocument {
    pages: Vec<Vec<TextLine>>,
}

impl PdfDocument {
    pub fn new(title: &str, generated_on: &str, content: &str) -> Self {
        let mut current = vec![
            TextLine {
                text: title.to_string(),
                size: TITLE_SIZE,
                x: MARGIN,
                top: TITLE_Y,
            },
            TextLine {
                text: generated_on.to_string(),
                size: META_SIZE,
                x: MARGIN,
                top: GENERATED_Y,
            },
        ];

        let line_height = BODY_SIZE * LINE_HEIGHT_FACTOR;
        let bottom = PAGE_HEIGHT - MARGIN;
        let mut pages = Vec::new();
        let mut top = CONTENT_Y;

        for text in wrap_text(content, BODY_SIZE, printable_width()) {
            if top > bottom {
                pages.push(std::mem::take(&mut current));
                top = MARGIN + BODY_SIZE;
            }
            current.push(TextLine {
                text,
                size: BODY_SIZE,
                x: MARGIN,
                top,
            });
            top += line_height;
        }
        pages.push(current);

        Self { pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serializes the document: header, objects, xref table and trailer.
    pub fn to_bytes(&self) -> Vec<u8> {
        // Objects 1..=3 are the catalog, page tree and font; each page then
        // takes two consecutive ids (page, content stream).
        let page_ids: Vec<usize> = (0..self.pages.len()).map(|i| 4 + 2 * i).collect();
        let kids = page_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");

        let mut objects: Vec<Vec<u8>> = vec![
            b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids,
                self.pages.len()
            )
            .into_bytes(),
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_vec(),
        ];

        for (page, id) in self.pages.iter().zip(&page_ids) {
            objects.push(
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                     /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                    PAGE_WIDTH,
                    PAGE_HEIGHT,
                    id + 1
                )
                .into_bytes(),
            );

            let stream = content_stream(page);
            let mut object = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
            object.extend_from_slice(&stream);
            object.extend_from_slice(b"\nendstream");
            objects.push(object);
        }

        let mut buf: Vec<u8> = Vec::new();
        buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        let mut offsets = Vec::with_capacity(objects.len());
        for (index, body) in objects.iter().enumerate() {
            offsets.push(buf.len());
            buf.extend_from_slice(format!("{} 0 obj\n", index + 1).as_bytes());
            buf.extend_from_slice(body);
            buf.extend_from_slice(b"\nendobj\n");
        }

        let xref_offset = buf.len();
        buf.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
        buf.extend_from_slice(b"0000000000 65535 f \n");
        for offset in offsets {
            buf.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        buf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                objects.len() + 1,
                xref_offset
            )
            .as_bytes(),
        );
        buf
    }
}

fn content_stream(lines: &[TextLine]) -> Vec<u8> {
    let mut stream = Vec::new();
    for line in lines.iter().filter(|line| !line.text.is_empty()) {
        // Writes into a Vec<u8> cannot fail.
        let _ = write!(
            stream,
            "BT /F1 {} Tf {:.2} {:.2} Td (",
            line.size,
            line.x,
            PAGE_HEIGHT - line.top
        );
        stream.extend_from_slice(&encode_text(&line.text));
        stream.extend_from_slice(b") Tj ET\n");
    }
    stream
}

/// WinAnsi bytes for a PDF literal string, with `\`, `(` and `)` escaped.
fn encode_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '(' | ')' => {
                out.push(b'\\');
                out.push(c as u8);
            }
            ' '..='~' => out.push(c as u8),
            '\u{A0}'..='\u{FF}' => out.push(c as u32 as u8),
            _ => out.push(b'?'),
        }
    }
    out
}

/// Renders a complete PDF for one exported response.
pub fn render_pdf(title: &str, generated_on: &str, content: &str) -> Vec<u8> {
    PdfDocument::new(title, generated_on, content).to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_respects_printable_width() {
        let text = "word ".repeat(200);
        let lines = wrap_text(&text, BODY_SIZE, printable_width());
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, BODY_SIZE) <= printable_width());
        }
    }

    #[test]
    fn wrap_keeps_explicit_breaks_and_splits_long_words() {
        let lines = wrap_text("first\n\nsecond", BODY_SIZE, printable_width());
        assert_eq!(lines, vec!["first", "", "second"]);

        let long = "x".repeat(500);
        let lines = wrap_text(&long, BODY_SIZE, printable_width());
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), long);
    }

    #[test]
    fn long_content_paginates() {
        let content = "line\n".repeat(200);
        let doc = PdfDocument::new("Title", "Generated on: now", &content);
        assert!(doc.page_count() > 1);

        let bytes = doc.to_bytes();
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains(&format!("/Count {}", doc.page_count())));
    }

    #[test]
    fn special_characters_are_escaped() {
        assert_eq!(encode_text("a(b)\\c"), b"a\\(b\\)\\\\c".to_vec());
        assert_eq!(encode_text("café ✓"), vec![b'c', b'a', b'f', 0xE9, b' ', b'?']);
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let bytes = render_pdf("T", "G", "body");
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let xref_at: usize = text
            .rsplit("startxref\n")
            .next()
            .and_then(|tail| tail.lines().next())
            .and_then(|n| n.parse().ok())
            .unwrap();
        assert!(bytes[xref_at..].starts_with(b"xref"));

        let xref = String::from_utf8_lossy(&bytes[xref_at..]).into_owned();
        let first_entry = xref.lines().nth(3).unwrap();
        let offset: usize = first_entry[..10].parse().unwrap();
        assert!(bytes[offset..].starts_with(b"1 0 obj"));
    }
}
