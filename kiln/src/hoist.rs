//! Module-level sheet hoisting.
//!
//! Each unique rule string gets exactly one `const _sN = "…";` per
//! module, inserted after the leading import declarations in first-use
//! order.

use kiln_ast::{Expr, Item, Module, VarDecl, VarKind};

use crate::state::ModuleState;

/// Resolves sheet strings to hoisted identifiers, allocating new ones on
/// first use.
pub fn idents_for(state: &mut ModuleState, sheets: &[String]) -> Vec<String> {
    sheets
        .iter()
        .map(|sheet| {
            if let Some(ident) = state.sheets.get(sheet) {
                return ident.clone();
            }
            let ident = format!("_s{}", state.sheets.len());
            tracing::trace!(ident = %ident, "hoisted sheet");
            state.sheets.insert(sheet.clone(), ident.clone());
            ident
        })
        .collect()
}

pub fn insert_hoisted(module: &mut Module, state: &ModuleState) {
    let at = module.leading_imports();
    for (offset, (sheet, ident)) in state.sheets.iter().enumerate() {
        module.body.insert(
            at + offset,
            Item::Var(VarDecl {
                kind: VarKind::Const,
                name: ident.clone(),
                init: Expr::Str(sheet.clone()),
            }),
        );
    }
}
