//! The type descriptor.

use std::fmt;

use vela_ir::NumRank;

/// Handle of a host class in the type model.
#[cfg_attr(feature = "image", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ClassId(u32);

impl ClassId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        ClassId(raw)
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

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({})", self.0)
    }
}

/// Host primitive kinds.
#[cfg_attr(feature = "image", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Prim {
    Boolean,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl Prim {
    pub const ALL: [Prim; 8] = [
        Prim::Boolean,
        Prim::Char,
        Prim::Byte,
        Prim::Short,
        Prim::Int,
        Prim::Long,
        Prim::Float,
        Prim::Double,
    ];

    /// Position in the promotion ranking. `char`, `byte` and `short` are
    /// unranked and promote like strings and objects do.
    pub const fn rank(self) -> Option<NumRank> {
        match self {
            Prim::Boolean => Some(NumRank::Boolean),
            Prim::Int => Some(NumRank::Int),
            Prim::Long => Some(NumRank::Long),
            Prim::Float => Some(NumRank::Float),
            Prim::Double => Some(NumRank::Double),
            Prim::Char | Prim::Byte | Prim::Short => None,
        }
    }

    /// The primitive a promotion rank computes in.
    pub const fn of_rank(rank: NumRank) -> Prim {
        match rank {
            NumRank::Boolean => Prim::Boolean,
            NumRank::Int => Prim::Int,
            NumRank::Long => Prim::Long,
            NumRank::Float => Prim::Float,
            NumRank::Double => Prim::Double,
        }
    }

    pub const fn is_numeric(self) -> bool {
        !matches!(self, Prim::Boolean)
    }

    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            Prim::Char | Prim::Byte | Prim::Short | Prim::Int | Prim::Long
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            Prim::Boolean => "boolean",
            Prim::Char => "char",
            Prim::Byte => "byte",
            Prim::Short => "short",
            Prim::Int => "int",
            Prim::Long => "long",
            Prim::Float => "float",
            Prim::Double => "double",
        }
    }

    pub const fn boxed_name(self) -> &'static str {
        match self {
            Prim::Boolean => "Boolean",
            Prim::Char => "Character",
            Prim::Byte => "Byte",
            Prim::Short => "Short",
            Prim::Int => "Integer",
            Prim::Long => "Long",
            Prim::Float => "Float",
            Prim::Double => "Double",
        }
    }

    /// Parse a primitive or boxed type name.
    pub fn from_name(name: &str) -> Option<Ty> {
        Prim::ALL.iter().find_map(|&p| {
            if p.name() == name {
                Some(Ty::Prim(p))
            } else if p.boxed_name() == name {
                Some(Ty::Boxed(p))
            } else {
                None
            }
        })
    }
}

/// A type descriptor.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Ty {
    /// Result of a method with no value.
    Void,
    /// Type of the `null` literal; assignable to every reference type.
    Null,
    Prim(Prim),
    Boxed(Prim),
    Str,
    /// The root reference type.
    Object,
    Class(ClassId),
}

impl Ty {
    pub const BOOLEAN: Ty = Ty::Prim(Prim::Boolean);
    pub const INT: Ty = Ty::Prim(Prim::Int);
    pub const LONG: Ty = Ty::Prim(Prim::Long);
    pub const FLOAT: Ty = Ty::Prim(Prim::Float);
    pub const DOUBLE: Ty = Ty::Prim(Prim::Double);

    /// Whether values of this type are references (and so may be null).
    pub const fn is_reference(self) -> bool {
        matches!(
            self,
            Ty::Null | Ty::Boxed(_) | Ty::Str | Ty::Object | Ty::Class(_)
        )
    }

    pub const fn is_primitive(self) -> bool {
        matches!(self, Ty::Prim(_))
    }

    /// Primitive behind a primitive or boxed type.
    pub const fn primitive(self) -> Option<Prim> {
        match self {
            Ty::Prim(p) | Ty::Boxed(p) => Some(p),
            _ => None,
        }
    }

    /// Promotion rank; boxed types rank like their primitive.
    pub const fn rank(self) -> Option<NumRank> {
        match self.primitive() {
            Some(p) => p.rank(),
            None => None,
        }
    }

    pub const fn is_boolean(self) -> bool {
        matches!(self, Ty::Prim(Prim::Boolean) | Ty::Boxed(Prim::Boolean))
    }

    pub const fn is_numeric(self) -> bool {
        match self.primitive() {
            Some(p) => p.is_numeric(),
            None => false,
        }
    }
}
