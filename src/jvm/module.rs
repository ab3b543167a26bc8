//! The `Module` attribute: Java Platform Module System descriptors.

use bitflags::bitflags;

use super::references::{ClassRef, ModuleRef, PackageRef};

bitflags! {
    /// A module's own flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Flags: u16 {
        /// The module is open (`open module`).
        const OPEN = 0x0020;
        /// Not explicitly declared in source.
        const SYNTHETIC = 0x1000;
        /// Implicitly declared by the compiler.
        const MANDATED = 0x8000;
    }
}

bitflags! {
    /// A `requires` directive's flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RequireFlags: u16 {
        /// `requires transitive`.
        const TRANSITIVE = 0x0020;
        /// Required at compile time but not retained at run time.
        const STATIC_PHASE = 0x0040;
        /// Not explicitly declared in source.
        const SYNTHETIC = 0x1000;
        /// Implicitly declared by the compiler.
        const MANDATED = 0x8000;
    }
}

bitflags! {
    /// An `exports` directive's flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ExportFlags: u16 {
        /// Not explicitly declared in source.
        const SYNTHETIC = 0x1000;
        /// Implicitly declared by the compiler.
        const MANDATED = 0x8000;
    }
}

bitflags! {
    /// An `opens` directive's flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenFlags: u16 {
        /// Not explicitly declared in source.
        const SYNTHETIC = 0x1000;
        /// Implicitly declared by the compiler.
        const MANDATED = 0x8000;
    }
}

/// A module `requires` directive.
#[derive(Debug, Clone)]
pub struct Require {
    /// The required module.
    pub module: ModuleRef,
    /// The directive's flags.
    pub flags: RequireFlags,
    /// The required module's version, if recorded.
    pub version: Option<String>,
}

/// A module `exports` directive.
#[derive(Debug, Clone)]
pub struct Export {
    /// The exported package.
    pub package: PackageRef,
    /// The directive's flags.
    pub flags: ExportFlags,
    /// Modules this package is exported to, or all modules if empty.
    pub to: Vec<ModuleRef>,
}

/// A module `opens` directive.
#[derive(Debug, Clone)]
pub struct Open {
    /// The opened package.
    pub package: PackageRef,
    /// The directive's flags.
    pub flags: OpenFlags,
    /// Modules this package is opened to, or all modules if empty.
    pub to: Vec<ModuleRef>,
}

/// A module `provides` directive.
#[derive(Debug, Clone)]
pub struct Provide {
    /// The service interface provided.
    pub service: ClassRef,
    /// The classes implementing the service.
    pub with: Vec<ClassRef>,
}

/// A JPMS module descriptor, as recorded in a `module-info.class`'s
/// `Module` attribute.
#[derive(Debug, Clone)]
pub struct Module {
    /// The module's name.
    pub name: String,
    /// The module's own flags.
    pub flags: Flags,
    /// The module's version string, if recorded.
    pub version: Option<String>,
    /// This module's `requires` directives.
    pub requires: Vec<Require>,
    /// This module's `exports` directives.
    pub exports: Vec<Export>,
    /// This module's `opens` directives.
    pub opens: Vec<Open>,
    /// Service interfaces this module consumes via `uses`.
    pub uses: Vec<ClassRef>,
    /// This module's `provides` directives.
    pub provides: Vec<Provide>,
}
