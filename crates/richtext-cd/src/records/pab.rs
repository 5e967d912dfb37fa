use crate::error::Result;
use crate::record::Record;
use crate::records::cd_record;
use crate::registry::SIG_CD_PABREFERENCE;
use crate::schema::Schema;
use crate::signature::HeaderKind;

/// Switches following paragraphs to a previously defined paragraph style.
#[derive(Debug)]
pub struct CdPabReference {
    record: Record,
}

cd_record!(
    CdPabReference,
    Schema::record("CDPABREFERENCE", HeaderKind::Byte, SIG_CD_PABREFERENCE)
        .u16("pab_id")
        .build()
);

impl CdPabReference {
    pub fn pab_id(&self) -> Result<u16> {
        self.record.view().get_u16("pab_id")
    }

    pub fn set_pab_id(&mut self, pab_id: u16) -> Result<()> {
        self.record.set_raw("pab_id", u64::from(pab_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::CdRecord;

    #[test]
    fn byte_header_layout() {
        let mut pab = CdPabReference::allocate().unwrap();
        pab.set_pab_id(0x0203).unwrap();
        assert_eq!(pab.record().as_bytes(), &[0x6F, 4, 0x03, 0x02]);
        let again = CdPabReference::wrap(pab.into_record().into_bytes()).unwrap();
        assert_eq!(again.pab_id().unwrap(), 0x0203);
    }
}
