use std::collections::BTreeSet;

use crate::codec::{ByteStringCodec, Codecs};
use crate::enums::EnumValue;
use crate::error::Result;
use crate::record::Record;
use crate::records::cd_record;
use crate::registry::{SIG_ACTION_FORMULA, SIG_ACTION_MODIFYFIELD};
use crate::schema::{IntWidth, Schema};
use crate::signature::HeaderKind;
use crate::variable::{extract_formula, extract_string, write_formula, write_string};

crate::cd_enum! {
    pub enum ModifyOperation: u16 {
        Replace = 1,
        Append = 2,
    }
}

crate::cd_enum! {
    pub enum ActionFormulaFlags: u32 {
        NewCopy = 0x0001,
        SelectDocument = 0x0002,
    }
}

/// Agent action setting a field. The variable region holds the field name
/// followed by the value.
#[derive(Debug)]
pub struct CdActionModifyField {
    record: Record,
}

cd_record!(
    CdActionModifyField,
    Schema::record("CDACTIONMODIFYFIELD", HeaderKind::Word, SIG_ACTION_MODIFYFIELD)
        .u16("flags")
        .enumeration::<ModifyOperation>("operation", IntWidth::W2)
        .u16("field_name_len")
        .u16("value_len")
        .build()
);

impl CdActionModifyField {
    pub fn operation(&self) -> Result<EnumValue<ModifyOperation>> {
        self.record.get_enum_value("operation")
    }

    pub fn set_operation(&mut self, operation: ModifyOperation) -> Result<()> {
        self.record.set_enum("operation", operation)
    }

    pub fn field_name(&self, codec: &dyn ByteStringCodec) -> Result<String> {
        let len = self.record.get_len("field_name_len")?;
        extract_string(&self.record, 0, len, codec)
    }

    pub fn value(&self, codec: &dyn ByteStringCodec) -> Result<String> {
        let offset = self.record.get_len("field_name_len")?;
        let len = self.record.get_len("value_len")?;
        extract_string(&self.record, offset, len, codec)
    }

    pub fn set_field_name(&mut self, codec: &dyn ByteStringCodec, name: &str) -> Result<()> {
        let old_len = self.record.get_len("field_name_len")?;
        write_string(&mut self.record, 0, old_len, name, codec, |record, len| {
            record.set_raw("field_name_len", len as u64)
        })
    }

    pub fn set_value(&mut self, codec: &dyn ByteStringCodec, value: &str) -> Result<()> {
        let offset = self.record.get_len("field_name_len")?;
        let old_len = self.record.get_len("value_len")?;
        write_string(&mut self.record, offset, old_len, value, codec, |record, len| {
            record.set_raw("value_len", len as u64)
        })
    }
}

/// Agent action running a compiled formula.
#[derive(Debug)]
pub struct CdActionFormula {
    record: Record,
}

cd_record!(
    CdActionFormula,
    Schema::record("CDACTIONFORMULA", HeaderKind::Word, SIG_ACTION_FORMULA)
        .flags::<ActionFormulaFlags>("flags", IntWidth::W4)
        .u16("formula_len")
        .build()
);

impl CdActionFormula {
    pub fn flags(&self) -> Result<BTreeSet<ActionFormulaFlags>> {
        self.record.get_flags("flags")
    }

    pub fn set_flags(&mut self, flags: impl IntoIterator<Item = ActionFormulaFlags>) -> Result<()> {
        self.record.set_flags("flags", flags)
    }

    pub fn formula(&self, codecs: &Codecs) -> Result<String> {
        let len = self.record.get_len("formula_len")?;
        extract_formula(&self.record, 0, len, codecs)
    }

    pub fn set_formula(&mut self, codecs: &Codecs, formula: &str) -> Result<()> {
        let old_len = self.record.get_len("formula_len")?;
        write_formula(&mut self.record, 0, old_len, formula, codecs, |record, len| {
            record.set_raw("formula_len", len as u64)
        })
    }
}
