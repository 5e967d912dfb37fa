use crate::codec::ByteStringCodec;
use crate::error::Result;
use crate::record::Record;
use crate::records::{cd_record, FontId};
use crate::registry::SIG_CD_TEXT;
use crate::schema::Schema;
use crate::signature::HeaderKind;
use crate::variable::{extract_string, write_string};

/// A run of text in one font. The text fills the variable region.
#[derive(Debug)]
pub struct CdText {
    record: Record,
}

cd_record!(CdText, {
    let font_id = FontId::schema()?;
    Schema::record("CDTEXT", HeaderKind::Word, SIG_CD_TEXT)
        .nested("font_id", font_id)
        .build()
});

impl CdText {
    pub fn font_id(&self) -> Result<FontId> {
        FontId::read(&self.record.nested("font_id")?)
    }

    pub fn set_font_id(&mut self, font: &FontId) -> Result<()> {
        let mut view = self.record.view_mut();
        let mut nested = view.nested_mut("font_id")?;
        font.write(&mut nested)
    }

    pub fn text(&self, codec: &dyn ByteStringCodec) -> Result<String> {
        extract_string(&self.record, 0, self.record.variable_len(), codec)
    }

    pub fn set_text(&mut self, codec: &dyn ByteStringCodec, text: &str) -> Result<()> {
        let old_len = self.record.variable_len();
        write_string(&mut self.record, 0, old_len, text, codec, |_, _| Ok(()))
    }
}
