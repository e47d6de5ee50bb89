//! Reference-kind vocabulary and the per-symbol tables.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::SymbolKind;

/// A navigation request against one occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceKind {
    Definition,
    Declarations,
    Usages,
    CallsMade,
    Callees,
    Callers,
    Parameters,
    Locals,
    Overrides,
    OverriddenBy,
    Implements,
    ImplementedBy,
    ReturnType,
    Reads,
    Writes,
    Type,
    InheritsFrom,
    InheritedBy,
    Initializer,
    InnerTypes,
    EnumConstants,
    Constructors,
    Fields,
    Methods,
}

use ReferenceKind::*;

const COMMON: &[ReferenceKind] = &[Definition, Declarations, Usages];

const CONSTRUCTOR: &[ReferenceKind] = &[
    Definition,
    Declarations,
    Usages,
    CallsMade,
    Callees,
    Callers,
    Parameters,
    Locals,
];

const METHOD: &[ReferenceKind] = &[
    Definition,
    Declarations,
    Usages,
    CallsMade,
    Callees,
    Callers,
    Parameters,
    Locals,
    Overrides,
    OverriddenBy,
    Implements,
    ImplementedBy,
    ReturnType,
];

const VARIABLE: &[ReferenceKind] = &[Definition, Declarations, Usages, Reads, Writes, Type];

const TYPE: &[ReferenceKind] = &[
    Definition,
    Declarations,
    Usages,
    InheritsFrom,
    InheritedBy,
    Initializer,
    InnerTypes,
    Constructors,
    Fields,
    Methods,
];

const ENUM: &[ReferenceKind] = &[
    Definition,
    Declarations,
    Usages,
    InheritsFrom,
    Initializer,
    InnerTypes,
    EnumConstants,
    Constructors,
    Fields,
    Methods,
];

const INITIALIZER: &[ReferenceKind] = &[Definition, Declarations, Usages, Locals];

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 24] = [
        Definition,
        Declarations,
        Usages,
        CallsMade,
        Callees,
        Callers,
        Parameters,
        Locals,
        Overrides,
        OverriddenBy,
        Implements,
        ImplementedBy,
        ReturnType,
        Reads,
        Writes,
        Type,
        InheritsFrom,
        InheritedBy,
        Initializer,
        InnerTypes,
        EnumConstants,
        Constructors,
        Fields,
        Methods,
    ];

    /// Kinds exposed by a symbol kind, in display order
    pub fn supported_by(symbol: SymbolKind) -> &'static [ReferenceKind] {
        match symbol {
            SymbolKind::Type => TYPE,
            SymbolKind::Enum => ENUM,
            SymbolKind::EnumConstant => COMMON,
            SymbolKind::Method => METHOD,
            SymbolKind::Constructor => CONSTRUCTOR,
            SymbolKind::Variable => VARIABLE,
            SymbolKind::Initializer => INITIALIZER,
        }
    }

    pub fn is_supported_by(&self, symbol: SymbolKind) -> bool {
        Self::supported_by(symbol).contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Definition => "definition",
            Declarations => "declarations",
            Usages => "usages",
            CallsMade => "calls-made",
            Callees => "callees",
            Callers => "callers",
            Parameters => "parameters",
            Locals => "locals",
            Overrides => "overrides",
            OverriddenBy => "overridden-by",
            Implements => "implements",
            ImplementedBy => "implemented-by",
            ReturnType => "return-type",
            Reads => "reads",
            Writes => "writes",
            Type => "type",
            InheritsFrom => "inherits-from",
            InheritedBy => "inherited-by",
            Initializer => "initializer",
            InnerTypes => "inner-types",
            EnumConstants => "enum-constants",
            Constructors => "constructors",
            Fields => "fields",
            Methods => "methods",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Definition => "Definition",
            Declarations => "Declarations",
            Usages => "Usages",
            CallsMade => "Calls made",
            Callees => "Callees",
            Callers => "Callers",
            Parameters => "Parameters",
            Locals => "Local variables",
            Overrides => "Overrides",
            OverriddenBy => "Overridden by",
            Implements => "Implements",
            ImplementedBy => "Implemented by",
            ReturnType => "Return type",
            Reads => "Reads",
            Writes => "Writes",
            Type => "Type",
            InheritsFrom => "Inherits from",
            InheritedBy => "Inherited by",
            Initializer => "Initializers",
            InnerTypes => "Inner types",
            EnumConstants => "Enum constants",
            Constructors => "Constructors",
            Fields => "Fields",
            Methods => "Methods",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Navigation request scoped to a whole file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileReferenceKind {
    Imports,
    Types,
    Constructors,
    Methods,
}

impl FileReferenceKind {
    pub const ALL: [FileReferenceKind; 4] = [
        FileReferenceKind::Imports,
        FileReferenceKind::Types,
        FileReferenceKind::Constructors,
        FileReferenceKind::Methods,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileReferenceKind::Imports => "imports",
            FileReferenceKind::Types => "types",
            FileReferenceKind::Constructors => "constructors",
            FileReferenceKind::Methods => "methods",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileReferenceKind::Imports => "Import",
            FileReferenceKind::Types => "Type",
            FileReferenceKind::Constructors => "Constructor",
            FileReferenceKind::Methods => "Method",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

impl fmt::Display for FileReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_set_extends_constructor_set() {
        let ctor = ReferenceKind::supported_by(SymbolKind::Constructor);
        let method = ReferenceKind::supported_by(SymbolKind::Method);
        assert!(ctor.iter().all(|k| method.contains(k)));
        assert_eq!(method.len(), ctor.len() + 5);
    }

    #[test]
    fn test_every_kind_has_the_common_three() {
        for symbol in SymbolKind::ALL {
            for common in COMMON {
                assert!(common.is_supported_by(symbol), "{} lacks {}", symbol, common);
            }
        }
    }

    #[test]
    fn test_enum_has_no_inherited_by() {
        assert!(!InheritedBy.is_supported_by(SymbolKind::Enum));
        assert!(EnumConstants.is_supported_by(SymbolKind::Enum));
        assert!(!EnumConstants.is_supported_by(SymbolKind::Type));
    }

    #[test]
    fn test_tags_parse_back() {
        for kind in ReferenceKind::ALL {
            assert_eq!(ReferenceKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ReferenceKind::parse("overridden_by"), None);
        assert_eq!(FileReferenceKind::parse("imports"), Some(FileReferenceKind::Imports));
    }
}
