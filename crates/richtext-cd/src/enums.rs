//! Named constants over stored integers.
//!
//! The record format keeps adding flag bits and enum values, so decoding is
//! never allowed to fail on a value it does not know. Single-valued fields
//! decode to at most one constant; flag fields decode to the constants whose
//! bits are all set. The raw integer is always reachable next to the typed
//! view, and it is the only way to preserve unknown bits across a write.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::{RecordError, Result};

/// A family of named constants backed by an unsigned integer.
///
/// Implemented by [`cd_enum!`](crate::cd_enum).
pub trait CdEnum: Copy + Eq + Ord + std::hash::Hash + std::fmt::Debug + 'static {
    /// Name of the family, used in errors and diagnostics.
    const NAME: &'static str;

    /// Every constant, in declaration order.
    fn all() -> &'static [Self];

    /// Underlying value.
    fn value(self) -> u64;

    /// Symbolic name.
    fn name(self) -> &'static str;
}

/// Declares a [`CdEnum`] together with its values.
///
/// ```
/// richtext_cd::cd_enum! {
///     /// Paragraph alignment.
///     pub enum Align: u16 {
///         Left = 0,
///         Right = 1,
///         Center = 3,
///     }
/// }
///
/// use richtext_cd::CdEnum;
/// assert_eq!(Align::Center.value(), 3);
/// assert_eq!(richtext_cd::decode_single::<Align>(1), Some(Align::Right));
/// assert_eq!(richtext_cd::decode_single::<Align>(2), None);
/// ```
#[macro_export]
macro_rules! cd_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $raw:ty {
            $( $(#[$vmeta:meta])* $variant:ident = $value:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::CdEnum for $name {
            const NAME: &'static str = stringify!($name);

            fn all() -> &'static [Self] {
                &[$( $name::$variant ),+]
            }

            fn value(self) -> u64 {
                match self {
                    $( $name::$variant => (($value) as $raw) as u64 ),+
                }
            }

            fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => stringify!($variant) ),+
                }
            }
        }
    };
}

#[inline]
fn has_all_bits(raw: u64, value: u64) -> bool {
    value != 0 && raw & value == value
}

/// Finds the constant whose value equals `raw`.
pub fn decode_single<E: CdEnum>(raw: u64) -> Option<E> {
    let found = E::all().iter().copied().find(|c| c.value() == raw);
    if found.is_none() {
        tracing::trace!(enumeration = E::NAME, raw, "no constant for stored value");
    }
    found
}

/// Collects every constant whose bits are all present in `raw`.
///
/// Zero-valued constants never match, and unknown bits are ignored.
pub fn decode_set<E: CdEnum>(raw: u64) -> BTreeSet<E> {
    E::all()
        .iter()
        .copied()
        .filter(|c| has_all_bits(raw, c.value()))
        .collect()
}

/// ORs the values of `constants` together, starting from zero.
pub fn encode_set<E: CdEnum>(constants: impl IntoIterator<Item = E>) -> u64 {
    constants.into_iter().fold(0, |acc, c| acc | c.value())
}

/// A single-valued field that keeps values with no matching constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumValue<E> {
    Known(E),
    Raw(u64),
}

impl<E: CdEnum> EnumValue<E> {
    pub fn from_raw(raw: u64) -> Self {
        match decode_single::<E>(raw) {
            Some(known) => EnumValue::Known(known),
            None => EnumValue::Raw(raw),
        }
    }

    pub fn raw(&self) -> u64 {
        match self {
            EnumValue::Known(known) => known.value(),
            EnumValue::Raw(raw) => *raw,
        }
    }

    pub fn known(&self) -> Option<E> {
        match self {
            EnumValue::Known(known) => Some(*known),
            EnumValue::Raw(_) => None,
        }
    }
}

/// One named value of an [`EnumSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnumConstant {
    pub name: &'static str,
    pub value: u64,
}

/// Type-erased constant table attached to a schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSpec {
    pub name: &'static str,
    pub constants: Vec<EnumConstant>,
}

impl EnumSpec {
    /// Builds the table of a [`CdEnum`].
    pub fn of<E: CdEnum>() -> Self {
        Self {
            name: E::NAME,
            constants: E::all()
                .iter()
                .map(|c| EnumConstant {
                    name: c.name(),
                    value: c.value(),
                })
                .collect(),
        }
    }

    pub fn decode_single(&self, raw: u64) -> Option<&EnumConstant> {
        self.constants.iter().find(|c| c.value == raw)
    }

    pub fn decode_set(&self, raw: u64) -> Vec<&EnumConstant> {
        self.constants
            .iter()
            .filter(|c| has_all_bits(raw, c.value))
            .collect()
    }

    /// Looks up a constant by name.
    pub fn value_of(&self, name: &str) -> Result<u64> {
        self.constants
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value)
            .ok_or_else(|| RecordError::UnknownConstant {
                enumeration: self.name,
                name: name.to_string(),
            })
    }

    /// ORs the named constants together.
    pub fn encode_set<'n>(&self, names: impl IntoIterator<Item = &'n str>) -> Result<u64> {
        names
            .into_iter()
            .try_fold(0, |acc, name| Ok(acc | self.value_of(name)?))
    }
}
