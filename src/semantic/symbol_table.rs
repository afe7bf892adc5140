use std::fmt;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::token::Span;
use crate::types::DataType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub data_type: DataType,
    /// Where the name was declared.
    pub span: Span,
    pub used: bool,
    pub initialized: bool,
}

impl Symbol {
    pub fn new(name: impl Into<String>, data_type: DataType, span: Span) -> Self {
        Self {
            name: name.into(),
            data_type,
            span,
            used: false,
            initialized: false,
        }
    }

    pub fn mark_used(&mut self) {
        self.used = true;
    }

    pub fn mark_initialized(&mut self) {
        self.initialized = true;
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (line {}, column {})",
            self.name, self.data_type, self.span.line, self.span.column
        )?;
        if !self.used {
            f.write_str(" [UNUSED]")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Variable '{name}' already declared at line {}, column {}", .previous.line, .previous.column)]
pub struct DuplicateDeclaration {
    pub name: String,
    pub previous: Span,
}

#[derive(Debug, Clone, Default)]
struct Scope {
    symbols: Vec<Symbol>,
    index: FxHashMap<String, usize>,
}

impl Scope {
    fn get(&self, name: &str) -> Option<&Symbol> {
        self.index.get(name).map(|&slot| &self.symbols[slot])
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        let slot = *self.index.get(name)?;
        self.symbols.get_mut(slot)
    }
}

/// Stack of scopes, innermost last. The global scope is created up front and
/// is never popped.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Pops the innermost scope. Leaving the global scope does nothing.
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Declares `name` in the current scope. Only the current scope is checked
    /// for duplicates, so inner scopes may shadow outer names.
    pub fn declare(
        &mut self,
        name: &str,
        data_type: DataType,
        span: Span,
    ) -> Result<(), DuplicateDeclaration> {
        let scope = self.current_mut();
        if let Some(existing) = scope.get(name) {
            return Err(DuplicateDeclaration {
                name: name.to_string(),
                previous: existing.span,
            });
        }
        scope.index.insert(name.to_string(), scope.symbols.len());
        scope.symbols.push(Symbol::new(name, data_type, span));
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
    }

    /// Every live symbol, outermost scope first, in declaration order.
    pub fn all_symbols(&self) -> Vec<&Symbol> {
        self.scopes
            .iter()
            .flat_map(|scope| scope.symbols.iter())
            .collect()
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn len(&self) -> usize {
        self.scopes.iter().map(|scope| scope.symbols.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn current_mut(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (level, scope) in self.scopes.iter().enumerate().rev() {
            writeln!(f, "Scope {level}:")?;
            if scope.symbols.is_empty() {
                writeln!(f, "  (empty)")?;
            }
            for symbol in &scope.symbols {
                writeln!(f, "  {symbol}")?;
            }
        }
        Ok(())
    }
}
