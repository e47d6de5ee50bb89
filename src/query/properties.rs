//! Fixed property sets per symbol kind.

use std::collections::BTreeMap;

use crate::graph::Occurrence;
use crate::model::{Modifiers, SymbolKind};

fn flag(modifiers: Modifiers, flag: Modifiers) -> String {
    modifiers.contains(flag).to_string()
}

/// Label-to-value map describing an occurrence's symbol
pub fn properties(occurrence: &Occurrence) -> BTreeMap<String, String> {
    let details = &occurrence.details;
    let mut props = BTreeMap::new();
    let mut put = |label: &str, value: String| {
        props.insert(label.to_string(), value);
    };

    match occurrence.symbol_kind {
        SymbolKind::Variable | SymbolKind::Method => {
            put("isFinal", flag(details.modifiers, Modifiers::FINAL));
            put("isStatic", flag(details.modifiers, Modifiers::STATIC));
            put("name", details.name.clone());
            put("qualifiedName", details.qualified_name.clone());
            put("type", details.qualified_type.clone());
        }
        SymbolKind::Constructor | SymbolKind::Enum => {
            put("name", details.name.clone());
            put("qualifiedName", details.qualified_name.clone());
        }
        SymbolKind::Type => {
            put("isAbstract", flag(details.modifiers, Modifiers::ABSTRACT));
            put("isFinal", flag(details.modifiers, Modifiers::FINAL));
            put("isStatic", flag(details.modifiers, Modifiers::STATIC));
            put("name", details.name.clone());
            put("qualifiedName", details.qualified_name.clone());
        }
        SymbolKind::EnumConstant => {
            put("name", details.name.clone());
            put("qualifiedName", details.qualified_name.clone());
            put("value", details.value.clone().unwrap_or_default());
        }
        SymbolKind::Initializer => {
            put("kind", details.name.clone());
        }
    }
    props
}
