//! The scope tree: an arena of lexical scopes addressed by index.
//!
//! One node for the global program plus one per function. Parent/child
//! links are indices into the arena, which keeps the tree trivially
//! mutable during the build pass while the walker also holds a scope
//! stack. Scopes are additionally addressable by the token offset right
//! after their parameter list's `(`; the two analysis passes and the
//! emitter replay the stream against that shared index.

use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;

pub type ScopeId = usize;

/// The global scope is always node 0 and is indexed at token offset 0.
pub const GLOBAL_SCOPE: ScopeId = 0;

/// A declared name and its renaming state.
#[derive(Debug, Clone)]
pub struct Identifier {
    pub name: String,
    /// Set by the muncher. Pinned identifiers get their original name
    /// here so the mapping report shows every symbol.
    pub munged: Option<String>,
    pub refcount: u32,
    pub munge_eligible: bool,
}

impl Identifier {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            munged: None,
            refcount: 0,
            munge_eligible: true,
        }
    }

    /// The name this identifier is emitted under.
    pub fn output_name(&self) -> &str {
        self.munged.as_deref().unwrap_or(&self.name)
    }
}

/// One lexical scope. `idents` keeps declaration order; `by_name` is a
/// lookup into it.
#[derive(Debug)]
pub struct Scope {
    pub brace_nesting: i32,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    pub idents: Vec<Identifier>,
    by_name: FxHashMap<String, usize>,
    pub hints: FxHashMap<String, String>,
    /// Cleared when `eval`, `with` or a conditional comment forces the
    /// containing top-level scope to keep its names.
    pub munge_allowed: bool,
    pub var_statement_count: u32,
}

impl Scope {
    fn new(brace_nesting: i32, parent: Option<ScopeId>) -> Self {
        Self {
            brace_nesting,
            parent,
            children: Vec::new(),
            idents: Vec::new(),
            by_name: FxHashMap::default(),
            hints: FxHashMap::default(),
            munge_allowed: true,
            var_statement_count: 0,
        }
    }

    /// Declare `name`, returning the index of its (possibly pre-existing)
    /// entry. Declaration is idempotent per scope.
    pub fn declare(&mut self, name: &str) -> usize {
        if let Some(&slot) = self.by_name.get(name) {
            return slot;
        }
        let slot = self.idents.len();
        self.idents.push(Identifier::new(name));
        self.by_name.insert(name.to_string(), slot);
        slot
    }

    pub fn local(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }
}

/// The arena plus the offset index shared by both passes and the emitter.
#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    index: FxHashMap<usize, ScopeId>,
}

impl ScopeTree {
    pub fn new() -> Self {
        let mut index = FxHashMap::default();
        index.insert(0, GLOBAL_SCOPE);
        Self {
            // The global scope sits below every real brace.
            scopes: vec![Scope::new(-1, None)],
            index,
        }
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id]
    }

    pub fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id]
    }

    /// Create a function scope and key it at `offset` in the shared index.
    pub fn add_scope(&mut self, brace_nesting: i32, parent: ScopeId, offset: usize) -> ScopeId {
        let id = self.scopes.len();
        self.scopes.push(Scope::new(brace_nesting, Some(parent)));
        self.scopes[parent].children.push(id);
        self.index.insert(offset, id);
        id
    }

    /// The scope keyed at a token offset, if the build pass put one there.
    pub fn scope_at(&self, offset: usize) -> Option<ScopeId> {
        self.index.get(&offset).copied()
    }

    /// Resolve a name outward through the scope chain.
    pub fn resolve(&self, mut scope: ScopeId, name: &str) -> Option<(ScopeId, usize)> {
        loop {
            if let Some(slot) = self.scopes[scope].local(name) {
                return Some((scope, slot));
            }
            scope = self.scopes[scope].parent?;
        }
    }

    /// Disable renaming for the highest scope below global that contains
    /// `scope`. Protection covers the whole subtree because the muncher
    /// stops at a protected scope. No-op for the global scope, whose
    /// symbols are never renamed anyway.
    pub fn protect(&mut self, mut scope: ScopeId) {
        if scope == GLOBAL_SCOPE {
            return;
        }
        while let Some(parent) = self.scopes[scope].parent {
            if parent == GLOBAL_SCOPE {
                break;
            }
            scope = parent;
        }
        self.scopes[scope].munge_allowed = false;
    }

    /// Output names occupied by `scope` and all its ancestors.
    pub fn names_in_use(&self, mut scope: ScopeId) -> FxHashSet<String> {
        let mut used = FxHashSet::default();
        loop {
            for ident in &self.scopes[scope].idents {
                used.insert(ident.output_name().to_string());
            }
            match self.scopes[scope].parent {
                Some(parent) => scope = parent,
                None => return used,
            }
        }
    }

    /// The identifier mapping report: one `munged: original` line per
    /// identifier in declaration order, children indented one tab per
    /// nesting level.
    pub fn full_mapping(&self) -> String {
        let mut out = String::new();
        self.write_mapping(GLOBAL_SCOPE, "", &mut out);
        out
    }

    fn write_mapping(&self, scope: ScopeId, prefix: &str, out: &mut String) {
        for ident in &self.scopes[scope].idents {
            out.push_str(prefix);
            out.push_str(ident.output_name());
            out.push_str(": ");
            out.push_str(&ident.name);
            out.push('\n');
        }
        let child_prefix = format!("\t{prefix}");
        for &child in &self.scopes[scope].children {
            self.write_mapping(child, &child_prefix, out);
        }
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}
