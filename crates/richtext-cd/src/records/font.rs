use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};

use crate::enums::{decode_set, encode_set, EnumValue};
use crate::error::Result;
use crate::schema::{IntWidth, Schema};
use crate::view::{StructView, StructViewMut};

crate::cd_enum! {
    /// Standard font faces. Values from 5 up index the document's font table.
    pub enum FontFace: u8 {
        Roman = 0,
        Swiss = 1,
        Unicode = 2,
        UserInterface = 3,
        Typewriter = 4,
    }
}

crate::cd_enum! {
    /// Character attributes. The effect styles share the `0x80` bit.
    pub enum FontStyle: u8 {
        Bold = 0x01,
        Italic = 0x02,
        Underline = 0x04,
        Strikeout = 0x08,
        Superscript = 0x10,
        Subscript = 0x20,
        Effect = 0x80,
        Shadow = 0x80,
        Emboss = 0x90,
        Extrude = 0xA0,
    }
}

/// Packed font identifier: face, attributes, color and point size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FontId {
    pub face: u8,
    pub attrib: u8,
    pub color: u8,
    pub point_size: u8,
}

impl FontId {
    pub fn schema() -> Result<Arc<Schema>> {
        static SCHEMA: OnceLock<Result<Arc<Schema>>> = OnceLock::new();
        SCHEMA
            .get_or_init(|| {
                Schema::structure("FONTID")
                    .enumeration::<FontFace>("face", IntWidth::W1)
                    .flags::<FontStyle>("attrib", IntWidth::W1)
                    .u8("color")
                    .u8("point_size")
                    .build()
            })
            .clone()
    }

    pub fn read(view: &StructView<'_>) -> Result<FontId> {
        Ok(FontId {
            face: view.get_u8("face")?,
            attrib: view.get_u8("attrib")?,
            color: view.get_u8("color")?,
            point_size: view.get_u8("point_size")?,
        })
    }

    pub fn write(&self, view: &mut StructViewMut<'_>) -> Result<()> {
        view.set_raw("face", u64::from(self.face))?;
        view.set_raw("attrib", u64::from(self.attrib))?;
        view.set_raw("color", u64::from(self.color))?;
        view.set_raw("point_size", u64::from(self.point_size))
    }

    pub fn face(&self) -> EnumValue<FontFace> {
        EnumValue::from_raw(u64::from(self.face))
    }

    pub fn styles(&self) -> BTreeSet<FontStyle> {
        decode_set(u64::from(self.attrib))
    }

    /// Replaces the attribute byte with `styles`; unknown bits are cleared.
    pub fn set_styles(&mut self, styles: impl IntoIterator<Item = FontStyle>) {
        self.attrib = encode_set(styles) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_id_is_four_bytes() {
        assert_eq!(FontId::schema().unwrap().size(), 4);
    }

    #[test]
    fn overlapping_styles_decode_to_every_full_match() {
        let font = FontId {
            attrib: 0x91,
            ..FontId::default()
        };
        let styles = font.styles();
        assert_eq!(
            styles,
            BTreeSet::from([
                FontStyle::Bold,
                FontStyle::Superscript,
                FontStyle::Effect,
                FontStyle::Shadow,
                FontStyle::Emboss,
            ])
        );
        assert!(!styles.contains(&FontStyle::Extrude));
    }

    #[test]
    fn face_keeps_font_table_index() {
        let font = FontId {
            face: 12,
            ..FontId::default()
        };
        assert_eq!(font.face(), EnumValue::Raw(12));
        assert_eq!(font.face().known(), None);
    }
}
