//! Record type constants and the registry mapping them to type identifiers.
//!
//! Constants are only unique within an area, and even there several record
//! types share a value (`SIG_CD_BITMAP` and `SIG_ACTION_MODIFYFIELD` are
//! both `0xFF82`). Lookups therefore return sets.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use serde::Serialize;

use crate::signature::{HeaderKind, Signature, BYTE_RECORD_LENGTH, LONG_RECORD_LENGTH, WORD_RECORD_LENGTH};

/// Where a record constant is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Area {
    /// Composite (rich text) item records.
    Composite,
    /// Agent and rule actions.
    Action,
    /// Agent search queries.
    Query,
    /// Frameset design elements.
    Frameset,
    /// Navigator (view-map) layout records.
    ViewmapLayout,
}

/// Symbolic identifier of a record type, such as `"CDTEXT"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RecordTypeId(pub &'static str);

impl std::fmt::Display for RecordTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

// Composite records.
pub const SIG_CD_PARAGRAPH: u16 = 109 | BYTE_RECORD_LENGTH;
pub const SIG_CD_PABDEFINITION: u16 = 110 | WORD_RECORD_LENGTH;
pub const SIG_CD_PABREFERENCE: u16 = 111 | BYTE_RECORD_LENGTH;
pub const SIG_CD_TEXT: u16 = 112 | WORD_RECORD_LENGTH;
pub const SIG_CD_HEADER: u16 = 142 | WORD_RECORD_LENGTH;
pub const SIG_CD_LINKEXPORT2: u16 = 146 | WORD_RECORD_LENGTH;
pub const SIG_CD_BITMAPHEADER: u16 = 97 | LONG_RECORD_LENGTH;
pub const SIG_CD_BITMAPSEGMENT: u16 = 98 | LONG_RECORD_LENGTH;
pub const SIG_CD_COLORTABLE: u16 = 99 | LONG_RECORD_LENGTH;
pub const SIG_CD_GRAPHIC: u16 = 153 | LONG_RECORD_LENGTH;
pub const SIG_CD_PMMETASEG: u16 = 100 | LONG_RECORD_LENGTH;
pub const SIG_CD_WINMETASEG: u16 = 101 | LONG_RECORD_LENGTH;
pub const SIG_CD_MACMETASEG: u16 = 102 | LONG_RECORD_LENGTH;
pub const SIG_CD_CGMMETA: u16 = 103 | LONG_RECORD_LENGTH;
pub const SIG_CD_PMMETAHEADER: u16 = 104 | LONG_RECORD_LENGTH;
pub const SIG_CD_WINMETAHEADER: u16 = 105 | LONG_RECORD_LENGTH;
pub const SIG_CD_MACMETAHEADER: u16 = 106 | LONG_RECORD_LENGTH;
pub const SIG_CD_TABLEBEGIN: u16 = 163 | BYTE_RECORD_LENGTH;
pub const SIG_CD_TABLECELL: u16 = 164 | BYTE_RECORD_LENGTH;
pub const SIG_CD_TABLEEND: u16 = 165 | BYTE_RECORD_LENGTH;
pub const SIG_CD_STYLENAME: u16 = 188 | BYTE_RECORD_LENGTH;
pub const SIG_CD_DOCUMENT: u16 = 128 | BYTE_RECORD_LENGTH;
pub const SIG_CD_METAFILE: u16 = 129 | WORD_RECORD_LENGTH;
pub const SIG_CD_BITMAP: u16 = 130 | WORD_RECORD_LENGTH;
pub const SIG_CD_FONTTABLE: u16 = 131 | WORD_RECORD_LENGTH;
pub const SIG_CD_LINK: u16 = 132 | BYTE_RECORD_LENGTH;
pub const SIG_CD_LINKEXPORT: u16 = 133 | BYTE_RECORD_LENGTH;
pub const SIG_CD_KEYWORD: u16 = 134 | WORD_RECORD_LENGTH;
pub const SIG_CD_LINK2: u16 = 136 | WORD_RECORD_LENGTH;
pub const SIG_CD_CGM: u16 = 137 | WORD_RECORD_LENGTH;
pub const SIG_CD_TIFF: u16 = 138 | LONG_RECORD_LENGTH;
pub const SIG_CD_FIELD: u16 = 138 | WORD_RECORD_LENGTH;
pub const SIG_CD_PATTERNTABLE: u16 = 152 | LONG_RECORD_LENGTH;
pub const SIG_CD_HOTSPOTBEGIN: u16 = 169 | WORD_RECORD_LENGTH;
pub const SIG_CD_HOTSPOTEND: u16 = 170 | BYTE_RECORD_LENGTH;
pub const SIG_CD_BUTTON: u16 = 171 | WORD_RECORD_LENGTH;
pub const SIG_CD_BAR: u16 = 172 | WORD_RECORD_LENGTH;
pub const SIG_CD_V4HOTSPOTBEGIN: u16 = 173 | WORD_RECORD_LENGTH;
pub const SIG_CD_V4HOTSPOTEND: u16 = 174 | BYTE_RECORD_LENGTH;
pub const SIG_CD_EXT_FIELD: u16 = 176 | WORD_RECORD_LENGTH;
pub const SIG_CD_LSOBJECT: u16 = 177 | WORD_RECORD_LENGTH;
pub const SIG_CD_HTMLHEADER: u16 = 178 | WORD_RECORD_LENGTH;
pub const SIG_CD_HTMLSEGMENT: u16 = 179 | WORD_RECORD_LENGTH;
pub const SIG_CD_LAYOUT: u16 = 183 | BYTE_RECORD_LENGTH;
pub const SIG_CD_LAYOUTTEXT: u16 = 184 | BYTE_RECORD_LENGTH;
pub const SIG_CD_LAYOUTEND: u16 = 185 | BYTE_RECORD_LENGTH;
pub const SIG_CD_LAYOUTFIELD: u16 = 186 | BYTE_RECORD_LENGTH;
pub const SIG_CD_PABHIDE: u16 = 187 | WORD_RECORD_LENGTH;
pub const SIG_CD_BEGIN: u16 = 221 | BYTE_RECORD_LENGTH;
pub const SIG_CD_END: u16 = 222 | BYTE_RECORD_LENGTH;

// Actions.
pub const SIG_ACTION_HEADER: u16 = 129 | BYTE_RECORD_LENGTH;
pub const SIG_ACTION_MODIFYFIELD: u16 = 130 | WORD_RECORD_LENGTH;
pub const SIG_ACTION_REPLY: u16 = 131 | WORD_RECORD_LENGTH;
pub const SIG_ACTION_FORMULA: u16 = 132 | WORD_RECORD_LENGTH;
pub const SIG_ACTION_LOTUSSCRIPT: u16 = 133 | WORD_RECORD_LENGTH;
pub const SIG_ACTION_SENDMAIL: u16 = 134 | WORD_RECORD_LENGTH;
pub const SIG_ACTION_DBCOPY: u16 = 135 | WORD_RECORD_LENGTH;
pub const SIG_ACTION_DELETE: u16 = 136 | BYTE_RECORD_LENGTH;
pub const SIG_ACTION_BYFORM: u16 = 137 | WORD_RECORD_LENGTH;
pub const SIG_ACTION_MARKREAD: u16 = 138 | BYTE_RECORD_LENGTH;
pub const SIG_ACTION_MARKUNREAD: u16 = 139 | BYTE_RECORD_LENGTH;
pub const SIG_ACTION_MOVETOFOLDER: u16 = 140 | WORD_RECORD_LENGTH;
pub const SIG_ACTION_COPYTOFOLDER: u16 = 141 | WORD_RECORD_LENGTH;
pub const SIG_ACTION_REMOVEFROMFOLDER: u16 = 142 | WORD_RECORD_LENGTH;
pub const SIG_ACTION_NEWSLETTER: u16 = 143 | WORD_RECORD_LENGTH;
pub const SIG_ACTION_RUNAGENT: u16 = 144 | WORD_RECORD_LENGTH;
pub const SIG_ACTION_SENDDOCUMENT: u16 = 145 | BYTE_RECORD_LENGTH;
pub const SIG_ACTION_FORMULAONLY: u16 = 146 | WORD_RECORD_LENGTH;
pub const SIG_ACTION_JAVAAGENT: u16 = 147 | WORD_RECORD_LENGTH;
pub const SIG_ACTION_JAVA: u16 = 148 | WORD_RECORD_LENGTH;

// Queries.
pub const SIG_QUERY_HEADER: u16 = 129 | BYTE_RECORD_LENGTH;
pub const SIG_QUERY_TEXTTERM: u16 = 130 | WORD_RECORD_LENGTH;
pub const SIG_QUERY_BYFIELD: u16 = 131 | WORD_RECORD_LENGTH;
pub const SIG_QUERY_BYDATE: u16 = 132 | WORD_RECORD_LENGTH;
pub const SIG_QUERY_BYAUTHOR: u16 = 133 | WORD_RECORD_LENGTH;
pub const SIG_QUERY_FORMULA: u16 = 134 | WORD_RECORD_LENGTH;
pub const SIG_QUERY_BYFORM: u16 = 135 | WORD_RECORD_LENGTH;
pub const SIG_QUERY_BYFOLDER: u16 = 136 | WORD_RECORD_LENGTH;
pub const SIG_QUERY_USESFORM: u16 = 137 | WORD_RECORD_LENGTH;
pub const SIG_QUERY_TOPIC: u16 = 138 | WORD_RECORD_LENGTH;

// Framesets.
pub const SIG_CD_FRAMESETHEADER: u16 = 1 | WORD_RECORD_LENGTH;
pub const SIG_CD_FRAMESET: u16 = 2 | WORD_RECORD_LENGTH;
pub const SIG_CD_FRAME: u16 = 3 | WORD_RECORD_LENGTH;

// View-map layout.
pub const SIG_CD_VMHEADER: u16 = 112 | BYTE_RECORD_LENGTH;
pub const SIG_CD_VMBITMAP: u16 = 113 | BYTE_RECORD_LENGTH;
pub const SIG_CD_VMRECT: u16 = 114 | BYTE_RECORD_LENGTH;
pub const SIG_CD_VMPOLYGON_BYTE: u16 = 115 | BYTE_RECORD_LENGTH;
pub const SIG_CD_VMPOLYLINE_BYTE: u16 = 116 | BYTE_RECORD_LENGTH;
pub const SIG_CD_VMREGION: u16 = 117 | BYTE_RECORD_LENGTH;
pub const SIG_CD_VMACTION: u16 = 118 | BYTE_RECORD_LENGTH;
pub const SIG_CD_VMELLIPSE: u16 = 119 | BYTE_RECORD_LENGTH;
pub const SIG_CD_VMRNDRECT: u16 = 121 | BYTE_RECORD_LENGTH;
pub const SIG_CD_VMBUTTON: u16 = 122 | BYTE_RECORD_LENGTH;
pub const SIG_CD_VMACTION_2: u16 = 123 | WORD_RECORD_LENGTH;
pub const SIG_CD_VMTEXTBOX: u16 = 124 | WORD_RECORD_LENGTH;
pub const SIG_CD_VMPOLYGON: u16 = 126 | WORD_RECORD_LENGTH;
pub const SIG_CD_VMPOLYLINE: u16 = 127 | WORD_RECORD_LENGTH;
pub const SIG_CD_VMPOLYRGN: u16 = 128 | WORD_RECORD_LENGTH;
pub const SIG_CD_VMCIRCLE: u16 = 129 | WORD_RECORD_LENGTH;

type Builtin = (&'static str, Area, HeaderKind, u16);

const BUILTIN: &[Builtin] = &[
    ("CDPARAGRAPH", Area::Composite, HeaderKind::Byte, SIG_CD_PARAGRAPH),
    ("CDPABDEFINITION", Area::Composite, HeaderKind::Word, SIG_CD_PABDEFINITION),
    ("CDPABREFERENCE", Area::Composite, HeaderKind::Byte, SIG_CD_PABREFERENCE),
    ("CDTEXT", Area::Composite, HeaderKind::Word, SIG_CD_TEXT),
    ("CDHEADER", Area::Composite, HeaderKind::Word, SIG_CD_HEADER),
    ("CDLINKEXPORT2", Area::Composite, HeaderKind::Word, SIG_CD_LINKEXPORT2),
    ("CDBITMAPHEADER", Area::Composite, HeaderKind::Long, SIG_CD_BITMAPHEADER),
    ("CDBITMAPSEGMENT", Area::Composite, HeaderKind::Long, SIG_CD_BITMAPSEGMENT),
    ("CDCOLORTABLE", Area::Composite, HeaderKind::Long, SIG_CD_COLORTABLE),
    ("CDGRAPHIC", Area::Composite, HeaderKind::Long, SIG_CD_GRAPHIC),
    ("CDPMMETASEG", Area::Composite, HeaderKind::Long, SIG_CD_PMMETASEG),
    ("CDWINMETASEG", Area::Composite, HeaderKind::Long, SIG_CD_WINMETASEG),
    ("CDMACMETASEG", Area::Composite, HeaderKind::Long, SIG_CD_MACMETASEG),
    ("CDCGMMETA", Area::Composite, HeaderKind::Long, SIG_CD_CGMMETA),
    ("CDPMMETAHEADER", Area::Composite, HeaderKind::Long, SIG_CD_PMMETAHEADER),
    ("CDWINMETAHEADER", Area::Composite, HeaderKind::Long, SIG_CD_WINMETAHEADER),
    ("CDMACMETAHEADER", Area::Composite, HeaderKind::Long, SIG_CD_MACMETAHEADER),
    ("CDTABLEBEGIN", Area::Composite, HeaderKind::Byte, SIG_CD_TABLEBEGIN),
    ("CDTABLECELL", Area::Composite, HeaderKind::Byte, SIG_CD_TABLECELL),
    ("CDTABLEEND", Area::Composite, HeaderKind::Byte, SIG_CD_TABLEEND),
    ("CDSTYLENAME", Area::Composite, HeaderKind::Byte, SIG_CD_STYLENAME),
    ("CDDOCUMENT", Area::Composite, HeaderKind::Byte, SIG_CD_DOCUMENT),
    ("CDMETAFILE", Area::Composite, HeaderKind::Word, SIG_CD_METAFILE),
    ("CDBITMAP", Area::Composite, HeaderKind::Word, SIG_CD_BITMAP),
    ("CDFONTTABLE", Area::Composite, HeaderKind::Word, SIG_CD_FONTTABLE),
    ("CDLINK", Area::Composite, HeaderKind::Byte, SIG_CD_LINK),
    ("CDLINKEXPORT", Area::Composite, HeaderKind::Byte, SIG_CD_LINKEXPORT),
    ("CDKEYWORD", Area::Composite, HeaderKind::Word, SIG_CD_KEYWORD),
    ("CDLINK2", Area::Composite, HeaderKind::Word, SIG_CD_LINK2),
    ("CDCGM", Area::Composite, HeaderKind::Word, SIG_CD_CGM),
    ("CDTIFF", Area::Composite, HeaderKind::Long, SIG_CD_TIFF),
    ("CDFIELD", Area::Composite, HeaderKind::Word, SIG_CD_FIELD),
    ("CDPATTERNTABLE", Area::Composite, HeaderKind::Long, SIG_CD_PATTERNTABLE),
    ("CDHOTSPOTBEGIN", Area::Composite, HeaderKind::Word, SIG_CD_HOTSPOTBEGIN),
    ("CDHOTSPOTEND", Area::Composite, HeaderKind::Byte, SIG_CD_HOTSPOTEND),
    ("CDBUTTON", Area::Composite, HeaderKind::Word, SIG_CD_BUTTON),
    ("CDBAR", Area::Composite, HeaderKind::Word, SIG_CD_BAR),
    ("CDV4HOTSPOTBEGIN", Area::Composite, HeaderKind::Word, SIG_CD_V4HOTSPOTBEGIN),
    ("CDV4HOTSPOTEND", Area::Composite, HeaderKind::Byte, SIG_CD_V4HOTSPOTEND),
    ("CDEXT_FIELD", Area::Composite, HeaderKind::Word, SIG_CD_EXT_FIELD),
    ("CDLSOBJECT", Area::Composite, HeaderKind::Word, SIG_CD_LSOBJECT),
    ("CDHTMLHEADER", Area::Composite, HeaderKind::Word, SIG_CD_HTMLHEADER),
    ("CDHTMLSEGMENT", Area::Composite, HeaderKind::Word, SIG_CD_HTMLSEGMENT),
    ("CDLAYOUT", Area::Composite, HeaderKind::Byte, SIG_CD_LAYOUT),
    ("CDLAYOUTTEXT", Area::Composite, HeaderKind::Byte, SIG_CD_LAYOUTTEXT),
    ("CDLAYOUTEND", Area::Composite, HeaderKind::Byte, SIG_CD_LAYOUTEND),
    ("CDLAYOUTFIELD", Area::Composite, HeaderKind::Byte, SIG_CD_LAYOUTFIELD),
    ("CDPABHIDE", Area::Composite, HeaderKind::Word, SIG_CD_PABHIDE),
    ("CDBEGINRECORD", Area::Composite, HeaderKind::Byte, SIG_CD_BEGIN),
    ("CDENDRECORD", Area::Composite, HeaderKind::Byte, SIG_CD_END),
    ("CDACTIONHEADER", Area::Action, HeaderKind::Byte, SIG_ACTION_HEADER),
    ("CDACTIONMODIFYFIELD", Area::Action, HeaderKind::Word, SIG_ACTION_MODIFYFIELD),
    ("CDACTIONREPLY", Area::Action, HeaderKind::Word, SIG_ACTION_REPLY),
    ("CDACTIONFORMULA", Area::Action, HeaderKind::Word, SIG_ACTION_FORMULA),
    ("CDACTIONLOTUSSCRIPT", Area::Action, HeaderKind::Word, SIG_ACTION_LOTUSSCRIPT),
    ("CDACTIONSENDMAIL", Area::Action, HeaderKind::Word, SIG_ACTION_SENDMAIL),
    ("CDACTIONDBCOPY", Area::Action, HeaderKind::Word, SIG_ACTION_DBCOPY),
    ("CDACTIONDELETE", Area::Action, HeaderKind::Byte, SIG_ACTION_DELETE),
    ("CDACTIONBYFORM", Area::Action, HeaderKind::Word, SIG_ACTION_BYFORM),
    ("CDACTIONREADMARKS", Area::Action, HeaderKind::Byte, SIG_ACTION_MARKREAD),
    ("CDACTIONUNREADMARKS", Area::Action, HeaderKind::Byte, SIG_ACTION_MARKUNREAD),
    ("CDACTIONMOVETOFOLDER", Area::Action, HeaderKind::Word, SIG_ACTION_MOVETOFOLDER),
    ("CDACTIONCOPYTOFOLDER", Area::Action, HeaderKind::Word, SIG_ACTION_COPYTOFOLDER),
    ("CDACTIONREMOVEFROMFOLDER", Area::Action, HeaderKind::Word, SIG_ACTION_REMOVEFROMFOLDER),
    ("CDACTIONNEWSLETTER", Area::Action, HeaderKind::Word, SIG_ACTION_NEWSLETTER),
    ("CDACTIONRUNAGENT", Area::Action, HeaderKind::Word, SIG_ACTION_RUNAGENT),
    ("CDACTIONSENDDOCUMENT", Area::Action, HeaderKind::Byte, SIG_ACTION_SENDDOCUMENT),
    ("CDACTIONFORMULAONLY", Area::Action, HeaderKind::Word, SIG_ACTION_FORMULAONLY),
    ("CDACTIONJAVAAGENT", Area::Action, HeaderKind::Word, SIG_ACTION_JAVAAGENT),
    ("CDACTIONJAVA", Area::Action, HeaderKind::Word, SIG_ACTION_JAVA),
    ("CDQUERYHEADER", Area::Query, HeaderKind::Byte, SIG_QUERY_HEADER),
    ("CDQUERYTEXTTERM", Area::Query, HeaderKind::Word, SIG_QUERY_TEXTTERM),
    ("CDQUERYBYFIELD", Area::Query, HeaderKind::Word, SIG_QUERY_BYFIELD),
    ("CDQUERYBYDATE", Area::Query, HeaderKind::Word, SIG_QUERY_BYDATE),
    ("CDQUERYBYAUTHOR", Area::Query, HeaderKind::Word, SIG_QUERY_BYAUTHOR),
    ("CDQUERYFORMULA", Area::Query, HeaderKind::Word, SIG_QUERY_FORMULA),
    ("CDQUERYBYFORM", Area::Query, HeaderKind::Word, SIG_QUERY_BYFORM),
    ("CDQUERYBYFOLDER", Area::Query, HeaderKind::Word, SIG_QUERY_BYFOLDER),
    ("CDQUERYUSESFORM", Area::Query, HeaderKind::Word, SIG_QUERY_USESFORM),
    ("CDQUERYTOPIC", Area::Query, HeaderKind::Word, SIG_QUERY_TOPIC),
    ("CDFRAMESETHEADER", Area::Frameset, HeaderKind::Word, SIG_CD_FRAMESETHEADER),
    ("CDFRAMESET", Area::Frameset, HeaderKind::Word, SIG_CD_FRAMESET),
    ("CDFRAME", Area::Frameset, HeaderKind::Word, SIG_CD_FRAME),
    ("VIEWMAP_HEADER_RECORD", Area::ViewmapLayout, HeaderKind::Byte, SIG_CD_VMHEADER),
    ("VIEWMAP_BITMAP_RECORD", Area::ViewmapLayout, HeaderKind::Byte, SIG_CD_VMBITMAP),
    ("VIEWMAP_RECT_RECORD", Area::ViewmapLayout, HeaderKind::Byte, SIG_CD_VMRECT),
    ("VIEWMAP_POLYGON_RECORD_BYTE", Area::ViewmapLayout, HeaderKind::Byte, SIG_CD_VMPOLYGON_BYTE),
    ("VIEWMAP_POLYLINE_RECORD_BYTE", Area::ViewmapLayout, HeaderKind::Byte, SIG_CD_VMPOLYLINE_BYTE),
    ("VIEWMAP_REGION_RECORD", Area::ViewmapLayout, HeaderKind::Byte, SIG_CD_VMREGION),
    ("VIEWMAP_ACTION_RECORD", Area::ViewmapLayout, HeaderKind::Byte, SIG_CD_VMACTION),
    ("VIEWMAP_ELLIPSE_RECORD", Area::ViewmapLayout, HeaderKind::Byte, SIG_CD_VMELLIPSE),
    ("VIEWMAP_RNDRECT_RECORD", Area::ViewmapLayout, HeaderKind::Byte, SIG_CD_VMRNDRECT),
    ("VIEWMAP_BUTTON_RECORD", Area::ViewmapLayout, HeaderKind::Byte, SIG_CD_VMBUTTON),
    ("VIEWMAP_ACTION_RECORD_2", Area::ViewmapLayout, HeaderKind::Word, SIG_CD_VMACTION_2),
    ("VIEWMAP_TEXTBOX_RECORD", Area::ViewmapLayout, HeaderKind::Word, SIG_CD_VMTEXTBOX),
    ("VIEWMAP_POLYGON_RECORD", Area::ViewmapLayout, HeaderKind::Word, SIG_CD_VMPOLYGON),
    ("VIEWMAP_POLYLINE_RECORD", Area::ViewmapLayout, HeaderKind::Word, SIG_CD_VMPOLYLINE),
    ("VIEWMAP_POLYRGN_RECORD", Area::ViewmapLayout, HeaderKind::Word, SIG_CD_VMPOLYRGN),
    ("VIEWMAP_CIRCLE_RECORD", Area::ViewmapLayout, HeaderKind::Word, SIG_CD_VMCIRCLE),
];

/// One registered record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordTypeEntry {
    pub id: RecordTypeId,
    pub area: Area,
    pub kind: HeaderKind,
    /// Type value as [`Signature::read`] reports it.
    pub constant: u16,
}

/// Maps type constants to the record types that use them.
#[derive(Debug, Clone, Default)]
pub struct RecordTypeRegistry {
    entries: Vec<RecordTypeEntry>,
    by_constant: BTreeMap<u16, Vec<usize>>,
}

impl RecordTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog of the record types known to this crate, built on first use.
    pub fn builtin() -> &'static RecordTypeRegistry {
        static BUILTIN_REGISTRY: OnceLock<RecordTypeRegistry> = OnceLock::new();
        BUILTIN_REGISTRY.get_or_init(|| {
            let mut registry = RecordTypeRegistry::new();
            for (id, area, kind, constant) in BUILTIN {
                registry.register(RecordTypeId(*id), *area, *kind, *constant);
            }
            registry
        })
    }

    /// Adds a record type. Byte-header constants keep only their low byte.
    pub fn register(&mut self, id: RecordTypeId, area: Area, kind: HeaderKind, constant: u16) {
        let constant = match kind {
            HeaderKind::Byte => constant & 0x00FF,
            HeaderKind::Word | HeaderKind::Long => constant,
        };
        let index = self.entries.len();
        self.entries.push(RecordTypeEntry {
            id,
            area,
            kind,
            constant,
        });
        self.by_constant.entry(constant).or_default().push(index);
    }

    pub fn entries(&self) -> &[RecordTypeEntry] {
        &self.entries
    }

    pub fn entry(&self, id: RecordTypeId) -> Option<&RecordTypeEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    fn matching(&self, constant: u16) -> impl Iterator<Item = &RecordTypeEntry> {
        self.by_constant
            .get(&constant)
            .into_iter()
            .flatten()
            .map(|index| &self.entries[*index])
    }

    /// Every record type using `constant`, in any area.
    pub fn types_for_constant(&self, constant: u16) -> BTreeSet<RecordTypeId> {
        self.matching(constant).map(|entry| entry.id).collect()
    }

    pub fn types_for_constant_in(&self, constant: u16, area: Area) -> BTreeSet<RecordTypeId> {
        self.matching(constant)
            .filter(|entry| entry.area == area)
            .map(|entry| entry.id)
            .collect()
    }

    /// Record types matching both the type value and the header shape.
    pub fn types_for_signature(&self, signature: &Signature) -> BTreeSet<RecordTypeId> {
        self.matching(signature.type_value)
            .filter(|entry| entry.kind == signature.kind)
            .map(|entry| entry.id)
            .collect()
    }
}

/// [`RecordTypeRegistry::types_for_constant`] on the built-in catalog.
pub fn types_for_constant(constant: u16) -> BTreeSet<RecordTypeId> {
    RecordTypeRegistry::builtin().types_for_constant(constant)
}
