//! Override, implement and inherit edge discovery.
//!
//! Walks a declaring class's ancestor lattice: the single superclass chain
//! and the DAG of interfaces reachable from its own interface list. A visited
//! set keeps diamond-shaped interface graphs from reporting an ancestor twice.

use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

use crate::binding::{MethodBinding, Supertypes};
use crate::identity::{entity_hash, keys};
use crate::model::RelationKind;

/// Name plus erased parameter list; the only inputs to override matching
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSignature {
    pub name: String,
    pub parameter_types: Vec<String>,
}

impl MethodSignature {
    pub fn of(method: &MethodBinding) -> Self {
        Self {
            name: method.name.clone(),
            parameter_types: method.parameter_types.clone(),
        }
    }
}

/// What the collector needs to know about an ancestor type
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TypeShape {
    pub qualified_name: String,
    pub is_interface: bool,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    /// Declared methods, constructors excluded
    pub methods: Vec<MethodSignature>,
}

impl TypeShape {
    pub fn declares(&self, signature: &MethodSignature) -> bool {
        self.methods.iter().any(|m| m == signature)
    }
}

/// Lookup of ancestor types by erased qualified name
///
/// Types outside the indexed sources (the JDK, dependencies) are absent and
/// end the ascent along that path.
pub trait TypeHierarchy: Sync {
    fn type_shape(&self, qualified_name: &str) -> Option<&TypeShape>;
}

/// A directed edge between two entity hashes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub kind: RelationKind,
    pub from_hash: i64,
    pub to_hash: i64,
}

/// Collect OVERRIDE and IMPLEMENT edges for one method
///
/// Every class ancestor declaring a method with the same signature yields an
/// OVERRIDE edge; ascent does not stop at the first match. Every interface
/// reachable from the declaring class's interface list that declares it
/// yields an IMPLEMENT edge.
pub fn collect_method_relations(
    method: &MethodBinding,
    supertypes: &Supertypes,
    hierarchy: &dyn TypeHierarchy,
) -> Vec<Relation> {
    let signature = MethodSignature::of(method);
    let method_hash = entity_hash(&keys::method_key(method));
    let mut relations = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();

    let mut next = supertypes.superclass.clone();
    while let Some(ancestor) = next.take() {
        if ancestor.is_empty() || !visited.insert(ancestor.clone()) {
            break;
        }
        let Some(shape) = hierarchy.type_shape(&ancestor) else {
            break;
        };
        if !shape.is_interface && shape.declares(&signature) {
            relations.push(Relation {
                kind: RelationKind::Override,
                from_hash: ancestor_method_hash(&ancestor, method),
                to_hash: method_hash,
            });
        }
        next = shape.superclass.clone();
    }

    let mut queue: VecDeque<String> = supertypes.interfaces.iter().cloned().collect();
    while let Some(interface) = queue.pop_front() {
        if interface.is_empty() || !visited.insert(interface.clone()) {
            continue;
        }
        let Some(shape) = hierarchy.type_shape(&interface) else {
            continue;
        };
        if shape.declares(&signature) {
            relations.push(Relation {
                kind: RelationKind::Implement,
                from_hash: ancestor_method_hash(&interface, method),
                to_hash: method_hash,
            });
        }
        queue.extend(shape.interfaces.iter().cloned());
    }

    relations
}

/// INHERIT edges (base -> derived) for a type declaration
///
/// Unresolved supertypes produce no edge.
pub fn collect_inherit_relations(derived: &str, supertypes: &Supertypes) -> Vec<Relation> {
    let derived_hash = entity_hash(derived);
    supertypes
        .superclass
        .iter()
        .chain(supertypes.interfaces.iter())
        .filter(|base| !base.is_empty())
        .map(|base| Relation {
            kind: RelationKind::Inherit,
            from_hash: entity_hash(base),
            to_hash: derived_hash,
        })
        .collect()
}

fn ancestor_method_hash(ancestor: &str, method: &MethodBinding) -> i64 {
    let mut inherited = method.clone();
    inherited.declaring.name = ancestor.to_string();
    entity_hash(&keys::method_key(&inherited))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{DeclaringType, TypeName};
    use crate::model::Modifiers;
    use std::collections::HashMap;

    struct MapHierarchy(HashMap<String, TypeShape>);

    impl TypeHierarchy for MapHierarchy {
        fn type_shape(&self, qualified_name: &str) -> Option<&TypeShape> {
            self.0.get(qualified_name)
        }
    }

    fn m() -> MethodSignature {
        MethodSignature {
            name: "m".to_string(),
            parameter_types: vec!["int".to_string()],
        }
    }

    fn shape(
        name: &str,
        is_interface: bool,
        superclass: Option<&str>,
        interfaces: &[&str],
        declares_m: bool,
    ) -> (String, TypeShape) {
        (
            name.to_string(),
            TypeShape {
                qualified_name: name.to_string(),
                is_interface,
                superclass: superclass.map(str::to_string),
                interfaces: interfaces.iter().map(|s| s.to_string()).collect(),
                methods: if declares_m { vec![m()] } else { Vec::new() },
            },
        )
    }

    fn method_in(class: &str) -> MethodBinding {
        MethodBinding {
            name: "m".to_string(),
            declaring: DeclaringType::top_level(class),
            parameter_types: vec!["int".to_string()],
            return_type: TypeName::plain("void"),
            is_constructor: false,
            modifiers: Modifiers::PUBLIC,
        }
    }

    fn hash_of(class: &str) -> i64 {
        entity_hash(&keys::method_key(&method_in(class)))
    }

    fn edges(relations: &[Relation], kind: RelationKind) -> HashSet<i64> {
        relations
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| r.from_hash)
            .collect()
    }

    #[test]
    fn test_override_and_implement_completeness() {
        // C extends B implements I1, I2; I1 extends I0; I2 extends I0
        let hierarchy = MapHierarchy(HashMap::from([
            shape("p.B", false, None, &[], true),
            shape("p.I0", true, None, &[], true),
            shape("p.I1", true, None, &["p.I0"], true),
            shape("p.I2", true, None, &["p.I0"], true),
        ]));
        let supertypes = Supertypes {
            superclass: Some("p.B".to_string()),
            interfaces: vec!["p.I1".to_string(), "p.I2".to_string()],
        };
        let relations = collect_method_relations(&method_in("p.C"), &supertypes, &hierarchy);

        assert_eq!(edges(&relations, RelationKind::Override), HashSet::from([hash_of("p.B")]));
        assert_eq!(
            edges(&relations, RelationKind::Implement),
            HashSet::from([hash_of("p.I1"), hash_of("p.I0"), hash_of("p.I2")])
        );
        assert_eq!(relations.len(), 4, "I0 reachable twice but reported once");
        assert!(relations.iter().all(|r| r.to_hash == hash_of("p.C")));
    }

    #[test]
    fn test_ascent_checks_every_class_ancestor() {
        // C extends B extends A, both declare m
        let hierarchy = MapHierarchy(HashMap::from([
            shape("p.A", false, None, &[], true),
            shape("p.B", false, Some("p.A"), &[], true),
        ]));
        let supertypes = Supertypes {
            superclass: Some("p.B".to_string()),
            interfaces: Vec::new(),
        };
        let relations = collect_method_relations(&method_in("p.C"), &supertypes, &hierarchy);
        assert_eq!(
            edges(&relations, RelationKind::Override),
            HashSet::from([hash_of("p.A"), hash_of("p.B")])
        );
    }

    #[test]
    fn test_superclass_interfaces_are_not_implement_targets() {
        let hierarchy = MapHierarchy(HashMap::from([
            shape("p.B", false, None, &["p.I"], false),
            shape("p.I", true, None, &[], true),
        ]));
        let supertypes = Supertypes {
            superclass: Some("p.B".to_string()),
            interfaces: Vec::new(),
        };
        let relations = collect_method_relations(&method_in("p.C"), &supertypes, &hierarchy);
        assert!(relations.is_empty());
    }

    #[test]
    fn test_signature_mismatch_and_unknown_ancestors() {
        let mut other = shape("p.B", false, Some("java.lang.Object"), &[], false);
        other.1.methods.push(MethodSignature {
            name: "m".to_string(),
            parameter_types: vec!["long".to_string()],
        });
        let hierarchy = MapHierarchy(HashMap::from([other]));
        let supertypes = Supertypes {
            superclass: Some("p.B".to_string()),
            interfaces: vec!["java.lang.Runnable".to_string()],
        };
        let relations = collect_method_relations(&method_in("p.C"), &supertypes, &hierarchy);
        assert!(relations.is_empty());
    }

    #[test]
    fn test_cyclic_hierarchy_terminates() {
        let hierarchy = MapHierarchy(HashMap::from([
            shape("p.A", false, Some("p.B"), &[], true),
            shape("p.B", false, Some("p.A"), &[], true),
        ]));
        let supertypes = Supertypes {
            superclass: Some("p.A".to_string()),
            interfaces: Vec::new(),
        };
        let relations = collect_method_relations(&method_in("p.C"), &supertypes, &hierarchy);
        assert_eq!(relations.len(), 2);
    }

    #[test]
    fn test_inherit_edges_skip_unresolved() {
        let supertypes = Supertypes {
            superclass: Some("zoo.Animal".to_string()),
            interfaces: vec!["".to_string(), "zoo.Pet".to_string()],
        };
        let relations = collect_inherit_relations("zoo.Dog", &supertypes);
        assert_eq!(relations.len(), 2);
        assert!(relations.iter().all(|r| r.kind == RelationKind::Inherit));
        assert_eq!(relations[0].from_hash, entity_hash("zoo.Animal"));
        assert_eq!(relations[0].to_hash, entity_hash("zoo.Dog"));
    }
}
