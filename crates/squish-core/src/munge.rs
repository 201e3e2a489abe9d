//! Short-name assignment over the scope tree.
//!
//! Parents are assigned before children so that a child's exclusion set
//! can be computed from final ancestor names. The global scope never
//! receives assignments, and a protected scope ends its entire subtree's
//! processing (its descendants keep their names too).

use crate::error::Error;
use crate::names::{ONES, THREES, TWOS};
use crate::scope::{ScopeId, ScopeTree, GLOBAL_SCOPE};

pub(crate) fn munge(tree: &mut ScopeTree) -> Result<(), Error> {
    munge_scope(tree, GLOBAL_SCOPE)
}

fn munge_scope(tree: &mut ScopeTree, id: ScopeId) -> Result<(), Error> {
    if !tree.scope(id).munge_allowed {
        return Ok(());
    }

    if tree.scope(id).parent.is_some() {
        let mut pool = 1;
        let mut free = free_symbols(tree, id, &ONES);
        if free.is_empty() {
            pool = 2;
            free = free_symbols(tree, id, &TWOS);
        }
        if free.is_empty() {
            pool = 3;
            free = free_symbols(tree, id, &THREES);
        }
        if free.is_empty() {
            return Err(Error::SymbolPoolExhausted);
        }

        // Names are handed out in declaration order, shortest first.
        // Hand-out consumes the free list front to back; assigning a name
        // makes it "in use" for every later recomputation.
        for slot in 0..tree.scope(id).idents.len() {
            if free.is_empty() {
                pool += 1;
                free = match pool {
                    2 => free_symbols(tree, id, &TWOS),
                    3 => free_symbols(tree, id, &THREES),
                    _ => return Err(Error::SymbolPoolExhausted),
                };
                if free.is_empty() {
                    return Err(Error::SymbolPoolExhausted);
                }
            }

            let ident = &tree.scope(id).idents[slot];
            let munged = if ident.munge_eligible {
                free.remove(0)
            } else {
                // Pinned names keep their spot and stay in the exclusion
                // set of every descendant.
                ident.name.clone()
            };
            tree.scope_mut(id).idents[slot].munged = Some(munged);
        }
    }

    for child in tree.scope(id).children.clone() {
        munge_scope(tree, child)?;
    }
    Ok(())
}

/// Pool candidates not already occupied by this scope or any ancestor,
/// in pool order.
fn free_symbols(tree: &ScopeTree, id: ScopeId, pool: &[String]) -> Vec<String> {
    let used = tree.names_in_use(id);
    pool.iter()
        .filter(|name| !used.contains(name.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assigns_in_declaration_order() {
        let mut tree = ScopeTree::new();
        tree.scope_mut(GLOBAL_SCOPE).declare("f");
        let f = tree.add_scope(0, GLOBAL_SCOPE, 3);
        tree.scope_mut(f).declare("first");
        tree.scope_mut(f).declare("second");

        munge(&mut tree).expect("should munge");
        assert_eq!(tree.scope(f).idents[0].munged.as_deref(), Some("a"));
        assert_eq!(tree.scope(f).idents[1].munged.as_deref(), Some("b"));
    }

    #[test]
    fn test_global_scope_untouched() {
        let mut tree = ScopeTree::new();
        tree.scope_mut(GLOBAL_SCOPE).declare("longGlobalName");
        munge(&mut tree).expect("should munge");
        assert_eq!(tree.scope(GLOBAL_SCOPE).idents[0].munged, None);
    }

    #[test]
    fn test_short_names_are_excluded_not_reused() {
        let mut tree = ScopeTree::new();
        tree.scope_mut(GLOBAL_SCOPE).declare("a");
        let f = tree.add_scope(0, GLOBAL_SCOPE, 3);
        tree.scope_mut(f).declare("local");

        munge(&mut tree).expect("should munge");
        // "a" is taken by the global, so the local starts at "b".
        assert_eq!(tree.scope(f).idents[0].munged.as_deref(), Some("b"));
    }

    #[test]
    fn test_own_original_names_are_excluded() {
        let mut tree = ScopeTree::new();
        let f = tree.add_scope(0, GLOBAL_SCOPE, 3);
        tree.scope_mut(f).declare("a");
        tree.scope_mut(f).declare("b");

        munge(&mut tree).expect("should munge");
        // The scope's own originals occupy their names up front, so the
        // first assignments skip past them.
        assert_eq!(tree.scope(f).idents[0].munged.as_deref(), Some("c"));
        assert_eq!(tree.scope(f).idents[1].munged.as_deref(), Some("d"));
    }

    #[test]
    fn test_pinned_identifier_keeps_name_and_blocks_it() {
        let mut tree = ScopeTree::new();
        let f = tree.add_scope(0, GLOBAL_SCOPE, 3);
        let pinned = tree.scope_mut(f).declare("c");
        tree.scope_mut(f).idents[pinned].munge_eligible = false;
        let inner = tree.add_scope(1, f, 9);
        tree.scope_mut(inner).declare("one");
        tree.scope_mut(inner).declare("two");
        tree.scope_mut(inner).declare("three");

        munge(&mut tree).expect("should munge");
        assert_eq!(tree.scope(f).idents[pinned].munged.as_deref(), Some("c"));
        let inner_names: Vec<_> = tree
            .scope(inner)
            .idents
            .iter()
            .map(|i| i.munged.clone().unwrap())
            .collect();
        // "c" is occupied by the pinned ancestor name.
        assert_eq!(inner_names, vec!["a", "b", "d"]);
    }

    #[test]
    fn test_pool_escalation_mid_scope() {
        let mut tree = ScopeTree::new();
        let f = tree.add_scope(0, GLOBAL_SCOPE, 3);
        for i in 0..53 {
            tree.scope_mut(f).declare(&format!("local{i}"));
        }

        munge(&mut tree).expect("should munge");
        assert_eq!(tree.scope(f).idents[0].munged.as_deref(), Some("a"));
        assert_eq!(tree.scope(f).idents[51].munged.as_deref(), Some("Z"));
        // The 1-character pool holds 52 names; the 53rd spills into the
        // 2-character pool.
        assert_eq!(tree.scope(f).idents[52].munged.as_deref(), Some("aa"));
    }

    #[test]
    fn test_protected_scope_and_subtree_skipped() {
        let mut tree = ScopeTree::new();
        let f = tree.add_scope(0, GLOBAL_SCOPE, 3);
        tree.scope_mut(f).declare("outerlocal");
        let inner = tree.add_scope(1, f, 9);
        tree.scope_mut(inner).declare("innerlocal");
        tree.protect(inner);

        munge(&mut tree).expect("should munge");
        assert_eq!(tree.scope(f).idents[0].munged, None);
        assert_eq!(tree.scope(inner).idents[0].munged, None);
    }

    #[test]
    fn test_sibling_scopes_reuse_names() {
        let mut tree = ScopeTree::new();
        let f = tree.add_scope(0, GLOBAL_SCOPE, 3);
        tree.scope_mut(f).declare("x1");
        let g = tree.add_scope(0, GLOBAL_SCOPE, 9);
        tree.scope_mut(g).declare("x2");

        munge(&mut tree).expect("should munge");
        assert_eq!(tree.scope(f).idents[0].munged.as_deref(), Some("a"));
        assert_eq!(tree.scope(g).idents[0].munged.as_deref(), Some("a"));
    }
}
