use crate::{
    refs::{ObjectReferences, RefType},
    Error, Pt,
};
use owned_ttf_parser::{AsFaceRef, Face, GlyphId, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Finish, Name, Pdf, Str,
};

/// Metrics for one of the standard non-embedded fonts, in units of a
/// 1000-unit em square. Widths cover the printable ASCII range (0x20..=0x7E);
/// everything else falls back to the `?` entry.
struct CoreMetrics {
    ascender: i16,
    descender: i16,
    widths: [u16; 95],
}

const HELVETICA: CoreMetrics = CoreMetrics {
    ascender: 718,
    descender: -207,
    widths: [
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // !"#$%&'()*+,-./
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
        278, 278, 584, 584, 584, 556, 1015, // :;<=>?@
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, // A-P
        778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // Q-Z
        278, 278, 278, 469, 556, 333, // [\]^_`
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, // a-p
        556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // q-z
        334, 260, 334, 584, // {|}~
    ],
};

const TIMES_ROMAN: CoreMetrics = CoreMetrics {
    ascender: 683,
    descender: -217,
    widths: [
        250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278, // !"#$%&'()*+,-./
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500, // 0-9
        278, 278, 564, 564, 564, 444, 921, // :;<=>?@
        722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722, 556, // A-P
        722, 667, 556, 611, 722, 722, 944, 722, 722, 611, // Q-Z
        333, 278, 333, 469, 500, 333, // [\]^_`
        444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500, 500, // a-p
        500, 333, 389, 278, 500, 500, 722, 500, 500, 444, // q-z
        480, 200, 480, 541, // {|}~
    ],
};

const COURIER: CoreMetrics = CoreMetrics {
    ascender: 629,
    descender: -157,
    widths: [600; 95],
};

/// One of the standard fonts every PDF viewer provides. These are never
/// embedded in the generated document; their metrics are compiled in, so
/// text can be measured and paginated without any font file on disk.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BuiltinFont {
    Helvetica,
    TimesRoman,
    Courier,
}

impl BuiltinFont {
    /// The PostScript base font name written into the PDF
    pub fn base_name(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::TimesRoman => "Times-Roman",
            BuiltinFont::Courier => "Courier",
        }
    }

    fn metrics(&self) -> &'static CoreMetrics {
        match self {
            BuiltinFont::Helvetica => &HELVETICA,
            BuiltinFont::TimesRoman => &TIMES_ROMAN,
            BuiltinFont::Courier => &COURIER,
        }
    }

    fn width(&self, ch: char) -> u16 {
        let widths = &self.metrics().widths;
        let index = ch as u32;
        if (0x20..=0x7e).contains(&index) {
            widths[index as usize - 0x20]
        } else {
            widths['?' as usize - 0x20]
        }
    }
}

pub(crate) enum FontSource {
    Builtin(BuiltinFont),
    Embedded(OwnedFace),
}

/// A font usable on a document: either one of the built-in core fonts, or a
/// parsed TTF/OTF face which will be embedded in its entirety in the
/// generated PDF (large fonts may dramatically increase the size of the
/// output).
///
/// Documents share fonts between themselves and their probe clones by
/// reference counting, so copying a font table is cheap.
pub struct Font {
    pub(crate) source: FontSource,
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if
    /// the font could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, Error> {
        let face = OwnedFace::from_vec(bytes, 0)?;

        Ok(Font {
            source: FontSource::Embedded(face),
        })
    }

    /// Use one of the built-in core fonts
    pub fn builtin(which: BuiltinFont) -> Font {
        Font {
            source: FontSource::Builtin(which),
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.source, FontSource::Builtin(_))
    }

    fn units_per_em(&self) -> f32 {
        match &self.source {
            FontSource::Builtin(_) => 1000.0,
            FontSource::Embedded(face) => face.as_face_ref().units_per_em() as f32,
        }
    }

    fn ascender(&self) -> f32 {
        match &self.source {
            FontSource::Builtin(builtin) => builtin.metrics().ascender as f32,
            FontSource::Embedded(face) => face.as_face_ref().ascender() as f32,
        }
    }

    fn descender(&self) -> f32 {
        match &self.source {
            FontSource::Builtin(builtin) => builtin.metrics().descender as f32,
            FontSource::Embedded(face) => face.as_face_ref().descender() as f32,
        }
    }

    fn line_gap(&self) -> f32 {
        match &self.source {
            FontSource::Builtin(_) => 0.0,
            FontSource::Embedded(face) => face.as_face_ref().line_gap() as f32,
        }
    }

    /// Calculate the ascent (distance from the baseline to the top of the font) for the given font size
    pub fn ascent(&self, size: Pt) -> Pt {
        size / self.units_per_em() * self.ascender()
    }

    /// Calculate the descent (distance from the baseline to the bottom of the font) for the given font size.
    /// Note: this is usually negative
    pub fn descent(&self, size: Pt) -> Pt {
        size / self.units_per_em() * self.descender()
    }

    /// Calculate the leading (extra space between lines) for the given font size
    pub fn leading(&self, size: Pt) -> Pt {
        size / self.units_per_em() * self.line_gap()
    }

    /// Calculate the default line height of the font for the given size. The returned value is
    /// how much to vertically offset a second row of text below a first row of text.
    pub fn line_height(&self, size: Pt) -> Pt {
        let scaling: Pt = size / self.units_per_em();
        let leading: Pt = scaling * self.line_gap();
        let ascent: Pt = scaling * self.ascender();
        let descent: Pt = scaling * self.descender();
        leading + ascent - descent
    }

    /// Calculate the horizontal advance of a single character at the given
    /// font size. Characters the font has no glyph for are measured as the
    /// replacement character (falling back to `?`).
    pub fn advance(&self, ch: char, size: Pt) -> Pt {
        match &self.source {
            FontSource::Builtin(builtin) => size / 1000.0 * builtin.width(ch) as f32,
            FontSource::Embedded(face) => {
                let face = face.as_face_ref();
                let gid = self.glyph_or_replacement(face, ch);
                size / self.units_per_em() * face.glyph_hor_advance(gid).unwrap_or_default() as f32
            }
        }
    }

    /// Calculate the width of a string of text at the given font size
    pub fn width_of(&self, text: &str, size: Pt) -> Pt {
        text.chars().map(|ch| self.advance(ch, size)).sum()
    }

    fn glyph_or_replacement(&self, face: &Face, ch: char) -> GlyphId {
        face.glyph_index(ch)
            .or_else(|| face.glyph_index('\u{FFFD}'))
            .or_else(|| face.glyph_index('?'))
            .unwrap_or(GlyphId(0))
    }

    /// The glyph id used to render a character, for embedded fonts. Built-in
    /// fonts are written with a standard encoding and have no glyph ids here.
    pub(crate) fn glyph_id(&self, ch: char) -> Option<u16> {
        match &self.source {
            FontSource::Builtin(_) => None,
            FontSource::Embedded(face) => {
                Some(self.glyph_or_replacement(face.as_face_ref(), ch).0)
            }
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, index: usize, writer: &mut Pdf) {
        match &self.source {
            FontSource::Builtin(builtin) => {
                let font_id = refs.gen(RefType::Font(index));
                let mut font = writer.type1_font(font_id);
                font.base_font(Name(builtin.base_name().as_bytes()));
                font.encoding_predefined(Name(b"WinAnsiEncoding"));
            }
            FontSource::Embedded(face) => self.write_embedded(face, refs, index, writer),
        }
    }

    fn write_embedded(
        &self,
        face: &OwnedFace,
        refs: &mut ObjectReferences,
        index: usize,
        writer: &mut Pdf,
    ) {
        let face_ref = face.as_face_ref();
        let scaling = 1000.0 / face_ref.units_per_em() as f32;

        let font_data_id = refs.gen(RefType::FontData(index));
        writer
            .stream(font_data_id, face.as_slice())
            .pair(Name(b"Length1"), face.as_slice().len() as i32);

        let descriptor_id = refs.gen(RefType::FontDescriptor(index));
        let mut descriptor = writer.font_descriptor(descriptor_id);
        descriptor.name(Name(format!("F{index}").as_bytes()));

        let mut flags = FontFlags::empty();
        if face_ref.is_monospaced() {
            flags.set(FontFlags::FIXED_PITCH, true);
        }
        if face_ref.is_italic() {
            flags.set(FontFlags::ITALIC, true);
        }
        descriptor.flags(flags);

        let bbox = face_ref.global_bounding_box();
        descriptor.bbox(pdf_writer::Rect {
            x1: bbox.x_min as f32 * scaling,
            y1: bbox.y_min as f32 * scaling,
            x2: bbox.x_max as f32 * scaling,
            y2: bbox.y_max as f32 * scaling,
        });
        descriptor.italic_angle(face_ref.italic_angle().unwrap_or_default());
        descriptor.ascent(face_ref.ascender() as f32 * scaling);
        descriptor.descent(face_ref.descender() as f32 * scaling);
        descriptor.leading(face_ref.line_gap() as f32 * scaling);
        descriptor.cap_height(
            face_ref
                .capital_height()
                .map(|h| h as f32 * scaling)
                .unwrap_or(1000.0),
        );
        descriptor.stem_v(80.0);
        descriptor.font_file2(font_data_id);
        descriptor.finish();

        let cid_font_id = refs.gen(RefType::CidFont(index));
        let mut cid_font = writer.cid_font(cid_font_id);
        cid_font.subtype(CidFontType::Type2);
        cid_font.base_font(Name(format!("F{index}").as_bytes()));
        cid_font.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid_font.font_descriptor(descriptor_id);

        // with an Identity cid-to-gid map, cids are glyph ids, so the width
        // array is just every glyph's advance in order
        let glyph_widths: Vec<f32> = (0..face_ref.number_of_glyphs())
            .map(|gid| {
                face_ref
                    .glyph_hor_advance(GlyphId(gid))
                    .unwrap_or_default() as f32
                    * scaling
            })
            .collect();
        let mut widths = cid_font.widths();
        widths.consecutive(0, glyph_widths);
        widths.finish();

        cid_font.cid_to_gid_map_predefined(Name(b"Identity"));
        cid_font.finish();

        let to_unicode_id = self.write_to_unicode(face_ref, refs, index, writer);

        let font_id = refs.gen(RefType::Font(index));
        let mut font = writer.type0_font(font_id);
        font.base_font(Name(format!("F{index}").as_bytes()));
        font.encoding_predefined(Name(b"Identity-H"));
        font.descendant_font(cid_font_id);
        font.to_unicode(to_unicode_id);
    }

    fn write_to_unicode(
        &self,
        face: &Face,
        refs: &mut ObjectReferences,
        index: usize,
        writer: &mut Pdf,
    ) -> pdf_writer::Ref {
        let id = refs.gen(RefType::ToUnicode(index));

        // map every glyph back to the first codepoint that produces it
        let mut glyphs: Vec<(u16, char)> = Vec::new();
        if let Some(cmap) = face.tables().cmap {
            let mut seen: std::collections::HashMap<u16, char> = std::collections::HashMap::new();
            for subtable in cmap.subtables.into_iter().filter(|table| table.is_unicode()) {
                subtable.codepoints(|codepoint: u32| {
                    if let Ok(ch) = char::try_from(codepoint) {
                        if let Some(gid) = subtable.glyph_index(codepoint).filter(|gid| gid.0 > 0) {
                            seen.entry(gid.0).or_insert(ch);
                        }
                    }
                });
            }
            glyphs = seen.into_iter().collect();
            glyphs.sort_by_key(|&(gid, _)| gid);
        }

        let mut map: String = r#"/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo
<< /Registry (Adobe)
/Ordering (UCS) /Supplement 0 >> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
"#
        .replace("\r\n", "\n");

        for block in glyphs.chunks(100) {
            map.push_str(&format!("{} beginbfchar\n", block.len()));
            for &(gid, ch) in block {
                let ch: u32 = ch.into();
                map.push_str(&format!("<{gid:04x}> <{ch:04x}>\n"));
            }
            map.push_str("endbfchar\n");
        }

        map.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            map.as_bytes(),
            miniz_oxide::deflate::CompressionLevel::DefaultCompression as u8,
        );
        let mut stream = writer.stream(id, compressed.as_slice());
        stream.filter(pdf_writer::Filter::FlateDecode);

        id
    }
}
