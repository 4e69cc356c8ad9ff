//! Member descriptors returned by the type model.

use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::Ty;

bitflags! {
    /// Member modifiers.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct MemberFlags: u8 {
        /// Visible to binding expressions. Inaccessible members are
        /// reported by the provider but never selected.
        const ACCESSIBLE = 1 << 0;
        /// Belongs to the type rather than to an instance.
        const STATIC = 1 << 1;
        /// Property: the value lives in an observable cell that change
        /// listeners can attach to. Reading it is a monitoring point.
        const OBSERVABLE = 1 << 2;
        /// Property: cannot be the target of a dynamic binding.
        const READ_ONLY = 1 << 3;
    }
}

/// Host identifier of a method or constructor.
///
/// The emitter passes it through untouched; only the runtime interprets it.
#[cfg_attr(feature = "image", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct MethodId(u32);

impl MethodId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        MethodId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodId({})", self.0)
    }
}

/// Host identifier of a static field.
#[cfg_attr(feature = "image", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct FieldId(u32);

impl FieldId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        FieldId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldId({})", self.0)
    }
}

/// A method, static method or constructor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodInfo {
    pub id: MethodId,
    pub owner: Ty,
    pub name: Rc<str>,
    pub params: SmallVec<[Ty; 4]>,
    /// Return type; the owner type for constructors.
    pub ret: Ty,
    pub flags: MemberFlags,
}

impl MethodInfo {
    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub fn is_accessible(&self) -> bool {
        self.flags.contains(MemberFlags::ACCESSIBLE)
    }
}

/// An instance property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyInfo {
    pub owner: Ty,
    pub name: Rc<str>,
    /// Type of the property's value (not of its observable cell).
    pub ty: Ty,
    pub flags: MemberFlags,
}

impl PropertyInfo {
    #[inline]
    pub fn is_observable(&self) -> bool {
        self.flags.contains(MemberFlags::OBSERVABLE)
    }

    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.flags.contains(MemberFlags::READ_ONLY)
    }
}

/// A static field, including enum constants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldInfo {
    pub id: FieldId,
    pub owner: Ty,
    pub name: Rc<str>,
    pub ty: Ty,
}
