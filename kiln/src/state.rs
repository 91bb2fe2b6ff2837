//! Per-module compilation state.
//!
//! One [`ModuleState`] lives for exactly one module transform. Nothing
//! here is process-wide: parallel hosts hand each module its own state.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use kiln_ast::{Expr, ImportSpecifier, Item, Module};
use kiln_css::ClassNames;

use crate::TransformOptions;

/// Module specifier that opts a file into the pass.
pub const RUNTIME_MODULE: &str = "@kiln/runtime";

/// Recorded when the runtime import is seen. Presence means the module
/// opted in; `styled_local` is the local name the user bound `styled` to.
pub struct RuntimeImport {
    pub styled_local: Option<String>,
}

pub struct ModuleState<'a> {
    pub runtime_import: Option<RuntimeImport>,
    /// Sheet string -> hoisted identifier, in first-use order.
    pub sheets: IndexMap<String, String>,
    pub class_names: ClassNames,
    pub options: &'a TransformOptions,
    pub styled_sites: usize,
    pub css_prop_sites: usize,
}

impl<'a> ModuleState<'a> {
    pub fn new(options: &'a TransformOptions) -> Self {
        ModuleState {
            runtime_import: None,
            sheets: IndexMap::new(),
            class_names: ClassNames::new(),
            options,
            styled_sites: 0,
            css_prop_sites: 0,
        }
    }

    pub fn styled_local(&self) -> Option<&str> {
        self.runtime_import
            .as_ref()
            .and_then(|import| import.styled_local.as_deref())
    }
}

/// Snapshot of module-scope bindings, taken once before walking call
/// sites so the evaluator can resolve references while the walker holds
/// mutable borrows into the tree.
pub struct Bindings {
    locals: HashMap<String, Expr>,
    imports: HashMap<String, (String, String)>,
    names: HashSet<String>,
}

impl Bindings {
    pub fn collect(module: &Module) -> Self {
        let mut locals = HashMap::new();
        let mut imports = HashMap::new();
        let mut names = HashSet::new();
        for item in &module.body {
            match item {
                Item::Var(decl) | Item::ExportVar(decl) => {
                    locals.insert(decl.name.clone(), decl.init.clone());
                    names.insert(decl.name.clone());
                }
                Item::Import(import) => {
                    for spec in &import.specifiers {
                        let (local, imported) = match spec {
                            ImportSpecifier::Default { local } => (local, "default".to_string()),
                            ImportSpecifier::Namespace { local } => (local, "*".to_string()),
                            ImportSpecifier::Named { imported, local } => {
                                (local, imported.clone())
                            }
                        };
                        imports.insert(local.clone(), (import.source.clone(), imported));
                        names.insert(local.clone());
                    }
                }
                _ => {}
            }
        }
        Bindings {
            locals,
            imports,
            names,
        }
    }

    pub fn local(&self, name: &str) -> Option<&Expr> {
        self.locals.get(name)
    }

    pub fn import(&self, name: &str) -> Option<(&str, &str)> {
        self.imports
            .get(name)
            .map(|(source, imported)| (source.as_str(), imported.as_str()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}
