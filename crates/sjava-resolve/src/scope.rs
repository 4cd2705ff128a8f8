use std::sync::Arc;

use crate::{MethodSymbol, SymbolError, SymbolTable, VariableSymbol};

/// Handle of a scope inside a [`ScopeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub usize);

/// One block's declarations.
#[derive(Debug, Clone)]
pub struct Scope {
    /// The enclosing scope, `None` for the global scope
    parent: Option<ScopeId>,
    variables: SymbolTable<VariableSymbol>,
    /// Shared with duplicates of the tree until one of them declares a routine
    methods: Arc<SymbolTable<MethodSymbol>>,
}

impl Scope {
    fn new(parent: Option<ScopeId>) -> Self {
        Self {
            parent,
            variables: SymbolTable::new(),
            methods: Arc::new(SymbolTable::new()),
        }
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn variables(&self) -> &SymbolTable<VariableSymbol> {
        &self.variables
    }

    pub fn methods(&self) -> &SymbolTable<MethodSymbol> {
        &self.methods
    }
}

/// The chain of scopes from the global scope to the innermost open block.
///
/// Scopes live in an arena and refer to their parent by [`ScopeId`]. Blocks
/// nest strictly, so the open scopes always form a stack: pushing appends a
/// child of the current scope and popping drops the current scope.
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    /// Creates a tree holding only an empty global scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(None)],
            current: ScopeId(0),
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn current(&self) -> ScopeId {
        self.current
    }

    /// Number of open scopes, the global scope included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    /// Opens a child of the current scope and makes it current.
    pub fn push_scope(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(Some(self.current)));
        self.current = id;
        log::trace!("Opened scope {:?}", id);
        id
    }

    /// Discards the current scope and returns to its parent. The global
    /// scope is never popped; `None` is returned instead.
    pub fn pop_scope(&mut self) -> Option<ScopeId> {
        let parent = self.scope(self.current).parent?;
        let closed = self.current;
        self.scopes.truncate(closed.0);
        self.current = parent;
        log::trace!("Closed scope {:?}", closed);
        Some(closed)
    }

    /// Declares a variable in `scope`.
    pub fn add_variable(&mut self, scope: ScopeId, name: &str, symbol: VariableSymbol) -> Result<(), SymbolError> {
        self.scopes[scope.0].variables.insert(name, symbol)
    }

    /// Declares a routine in `scope`. If the method table is shared with a
    /// duplicate, this scope gets its own copy first.
    pub fn add_method(&mut self, scope: ScopeId, name: &str, symbol: MethodSymbol) -> Result<(), SymbolError> {
        Arc::make_mut(&mut self.scopes[scope.0].methods).insert(name, symbol)
    }

    /// Walks from `scope` outward and returns the first scope whose
    /// variable table holds `name`.
    fn declaring_scope(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scope(id);
            if scope.variables.contains(name) {
                return Some(id);
            }
            current = scope.parent;
        }
        None
    }

    /// Looks `name` up starting at `scope`; the innermost declaration wins.
    pub fn lookup_variable(&self, scope: ScopeId, name: &str) -> Result<&VariableSymbol, SymbolError> {
        match self.declaring_scope(scope, name) {
            Some(id) => self.scope(id).variables.get(name),
            None => Err(SymbolError::NotFound {
                name: name.to_string(),
            }),
        }
    }

    pub fn lookup_variable_mut(&mut self, scope: ScopeId, name: &str) -> Result<&mut VariableSymbol, SymbolError> {
        match self.declaring_scope(scope, name) {
            Some(id) => self.scopes[id.0].variables.get_mut(name),
            None => Err(SymbolError::NotFound {
                name: name.to_string(),
            }),
        }
    }

    /// Looks up a routine starting at `scope` and walking outward.
    pub fn lookup_method(&self, scope: ScopeId, name: &str) -> Result<&MethodSymbol, SymbolError> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scope(id);
            if let Ok(method) = scope.methods.get(name) {
                return Ok(method);
            }
            current = scope.parent;
        }
        Err(SymbolError::NotFound {
            name: name.to_string(),
        })
    }

    /// The global routine declared `ordinal`-th, counting from zero.
    pub fn method_at(&self, ordinal: usize) -> Option<(&str, &MethodSymbol)> {
        self.scope(self.root()).methods.get_index(ordinal)
    }

    /// Starts a fresh tree from the global scope.
    ///
    /// The new global scope owns copies of the variables, so marking one of
    /// them initialized leaves this tree untouched. The routine table is
    /// shared rather than copied.
    pub fn duplicate(&self) -> ScopeTree {
        let global = self.scope(self.root());
        ScopeTree {
            scopes: vec![Scope {
                parent: None,
                variables: global.variables.clone(),
                methods: Arc::clone(&global.methods),
            }],
            current: ScopeId(0),
        }
    }
}
