//! Member modifier flags

use std::fmt;
use std::ops::BitOr;

/// Member visibility derived from [`Modifiers`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Visible everywhere
    Public,
    /// Visible to subclasses
    Protected,
    /// Visible to the declaring type only
    Private,
    /// Visible inside the declaring package (no explicit modifier)
    Package,
}

/// Modifier flags for members and types (bitflags)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u16);

impl Modifiers {
    /// No modifiers (package visibility)
    pub const NONE: Self = Self(0x0000);
    /// `public`
    pub const PUBLIC: Self = Self(0x0001);
    /// `private`
    pub const PRIVATE: Self = Self(0x0002);
    /// `protected`
    pub const PROTECTED: Self = Self(0x0004);
    /// `static`
    pub const STATIC: Self = Self(0x0008);
    /// `final`
    pub const FINAL: Self = Self(0x0010);
    /// `synchronized`
    pub const SYNCHRONIZED: Self = Self(0x0020);
    /// `volatile`
    pub const VOLATILE: Self = Self(0x0040);
    /// `transient`
    pub const TRANSIENT: Self = Self(0x0080);
    /// `native`
    pub const NATIVE: Self = Self(0x0100);
    /// `abstract`
    pub const ABSTRACT: Self = Self(0x0400);
    /// Compiler generated
    pub const SYNTHETIC: Self = Self(0x1000);

    const NAMES: [(Self, &'static str); 11] = [
        (Self::PUBLIC, "public"),
        (Self::PROTECTED, "protected"),
        (Self::PRIVATE, "private"),
        (Self::ABSTRACT, "abstract"),
        (Self::STATIC, "static"),
        (Self::FINAL, "final"),
        (Self::TRANSIENT, "transient"),
        (Self::VOLATILE, "volatile"),
        (Self::SYNCHRONIZED, "synchronized"),
        (Self::NATIVE, "native"),
        (Self::SYNTHETIC, "synthetic"),
    ];

    /// Create from raw bits
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Get raw bits
    pub const fn bits(&self) -> u16 {
        self.0
    }

    /// Check if all flags of `other` are set
    pub const fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Union of flags
    pub const fn union(&self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Remove flags
    pub const fn difference(&self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Resolved visibility
    pub const fn visibility(&self) -> Visibility {
        if self.contains(Self::PUBLIC) {
            Visibility::Public
        } else if self.contains(Self::PROTECTED) {
            Visibility::Protected
        } else if self.contains(Self::PRIVATE) {
            Visibility::Private
        } else {
            Visibility::Package
        }
    }

    /// `public` flag set
    pub const fn is_public(&self) -> bool {
        self.contains(Self::PUBLIC)
    }

    /// `private` flag set
    pub const fn is_private(&self) -> bool {
        self.contains(Self::PRIVATE)
    }

    /// `protected` flag set
    pub const fn is_protected(&self) -> bool {
        self.contains(Self::PROTECTED)
    }

    /// `static` flag set
    pub const fn is_static(&self) -> bool {
        self.contains(Self::STATIC)
    }

    /// `final` flag set
    pub const fn is_final(&self) -> bool {
        self.contains(Self::FINAL)
    }
}

impl BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str(" ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Modifiers({:#06x}: {})", self.0, self)
    }
}
