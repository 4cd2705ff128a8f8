use indexmap::IndexMap;
use sjava_syntax::VarType;

use crate::SymbolError;

/// Ordered mapping from name to symbol.
///
/// Entries keep their insertion order, which is what gives routine
/// parameters their positions and routines their declaration ordinals.
/// Inserting a name twice into the same table fails; shadowing happens
/// across tables, never within one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable<S> {
    symbols: IndexMap<String, S>,
}

impl<S> Default for SymbolTable<S> {
    fn default() -> Self {
        Self {
            symbols: IndexMap::new(),
        }
    }
}

impl<S> SymbolTable<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a symbol, rejecting names already present in this table.
    pub fn insert(&mut self, name: impl Into<String>, symbol: S) -> Result<(), SymbolError> {
        let name = name.into();
        if self.symbols.contains_key(&name) {
            return Err(SymbolError::AlreadyDeclared { name });
        }
        self.symbols.insert(name, symbol);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&S, SymbolError> {
        self.symbols.get(name).ok_or_else(|| SymbolError::NotFound {
            name: name.to_string(),
        })
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut S, SymbolError> {
        self.symbols.get_mut(name).ok_or_else(|| SymbolError::NotFound {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// The entry inserted `index`-th, counting from zero.
    pub fn get_index(&self, index: usize) -> Option<(&str, &S)> {
        self.symbols
            .get_index(index)
            .map(|(name, symbol)| (name.as_str(), symbol))
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &S)> + '_ {
        self.symbols.iter().map(|(name, symbol)| (name.as_str(), symbol))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// A declared variable or routine parameter.
///
/// Attributes are fixed by the constructor. The only later change is
/// [`mark_initialized`](Self::mark_initialized), which is idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableSymbol {
    ty: VarType,
    is_final: bool,
    is_initialized: bool,
}

impl VariableSymbol {
    pub fn new(ty: VarType, is_final: bool, is_initialized: bool) -> Self {
        Self {
            ty,
            is_final,
            is_initialized,
        }
    }

    /// A declaration without an initializer.
    pub fn uninitialized(ty: VarType) -> Self {
        Self::new(ty, false, false)
    }

    /// A non-final declaration with an initializer.
    pub fn initialized(ty: VarType) -> Self {
        Self::new(ty, false, true)
    }

    /// A routine parameter. Parameters always hold the caller's value.
    pub fn parameter(ty: VarType, is_final: bool) -> Self {
        Self::new(ty, is_final, true)
    }

    pub fn ty(&self) -> VarType {
        self.ty
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    pub fn is_initialized(&self) -> bool {
        self.is_initialized
    }

    pub fn mark_initialized(&mut self) {
        self.is_initialized = true;
    }
}

/// A declared routine. Routines never return a value, so the symbol only
/// records the ordered parameter list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodSymbol {
    params: SymbolTable<VariableSymbol>,
}

impl MethodSymbol {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter. Fails if the name is already used by an earlier
    /// parameter of the same routine.
    pub fn add_parameter(&mut self, name: impl Into<String>, param: VariableSymbol) -> Result<(), SymbolError> {
        self.params.insert(name, param)
    }

    pub fn parameters(&self) -> &SymbolTable<VariableSymbol> {
        &self.params
    }

    /// Parameter types by position.
    pub fn parameter_types(&self) -> Vec<VarType> {
        self.params.iter().map(|(_, param)| param.ty()).collect()
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut table = SymbolTable::new();
        table.insert("a", VariableSymbol::uninitialized(VarType::Int)).unwrap();
        let error = table
            .insert("a", VariableSymbol::initialized(VarType::Double))
            .unwrap_err();
        assert_eq!(error, SymbolError::AlreadyDeclared { name: "a".into() });
        expect!["`a` is already declared in this scope"].assert_eq(&error.to_string());

        // The first declaration is untouched
        assert_eq!(table.get("a").unwrap().ty(), VarType::Int);
    }

    #[test]
    fn test_missing_name() {
        let mut table: SymbolTable<VariableSymbol> = SymbolTable::new();
        assert_eq!(table.get("x"), Err(SymbolError::NotFound { name: "x".into() }));
        assert!(table.get_mut("x").is_err());
        assert!(!table.contains("x"));
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut table = SymbolTable::new();
        for name in ["zeta", "alpha", "mid"] {
            table.insert(name, MethodSymbol::new()).unwrap();
        }
        let names: Vec<_> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(table.get_index(1).map(|(name, _)| name), Some("alpha"));
        assert!(table.get_index(3).is_none());
    }

    #[test]
    fn test_mark_initialized_is_idempotent() {
        let mut symbol = VariableSymbol::uninitialized(VarType::Boolean);
        assert!(!symbol.is_initialized());
        symbol.mark_initialized();
        symbol.mark_initialized();
        assert!(symbol.is_initialized());
        assert!(!symbol.is_final());
    }

    #[test]
    fn test_method_parameters() {
        let mut method = MethodSymbol::new();
        method
            .add_parameter("s", VariableSymbol::parameter(VarType::String, true))
            .unwrap();
        method
            .add_parameter("n", VariableSymbol::parameter(VarType::Int, false))
            .unwrap();
        assert!(method
            .add_parameter("s", VariableSymbol::parameter(VarType::Char, false))
            .is_err());

        assert_eq!(method.arity(), 2);
        assert_eq!(method.parameter_types(), vec![VarType::String, VarType::Int]);
        let s = method.parameters().get("s").unwrap();
        assert!(s.is_final() && s.is_initialized());
    }
}
