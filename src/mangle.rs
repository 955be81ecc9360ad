//! Reversible symbol mangling for `var`, `let` and `const` declarations.
//!
//! A symbol is laid out as
//!
//! ```text
//! _ZJ0 <kind> <len> <name> <type>
//! ```
//!
//! - `kind` is `v` (var), `l` (let) or `c` (const).
//! - `name` is the escaped declaration name and `len` its length in bytes. Escaping maps `_` to `__` and
//!   `::` to `_N`, so `a::_b` and `a_::b` stay distinct.
//! - `type` is self-delimiting: one code character per primitive (from the `quix_core` primitive table),
//!   `A<len>_<elem>` for arrays, `S<n>_` / `U<n>_` followed by `n` fields (`<len><name><type>`) for inline
//!   structs and unions, and `N<len><name>` for named types.
//!
//! Because every part is self-delimiting, symbols can be concatenated and walked with [`demangle_prefix`].
//!
//! ## Examples
//! ```rust
//! use quixcc::mangle::{demangle, mangle};
//! use quix_syntax::diagnostics::Diagnostics;
//! use quix_syntax::parser;
//!
//! let root = parser::parse_source("const a::b_c: array<u8, 4>;", &mut Diagnostics::new()).unwrap();
//! let symbol = mangle(&root.body.stmts[0]).unwrap();
//! assert_eq!(symbol, "_ZJ0c7a_Nb__cA4_h");
//! assert_eq!(demangle(&symbol).unwrap().name(), Some("a::b_c"));
//! ```

use std::fmt;

use quix_core::lang::types;
use quix_syntax::ast::{AstNode, Binding, BindingKind, Root, Stmt, Type, TypeField};
use quix_syntax::diagnostics::ManglingError;
use quix_syntax::location::Location;

/// Scheme tag every symbol starts with.
pub const SCHEME_PREFIX: &str = "_ZJ0";

/// Deepest type nesting [`demangle`] accepts.
pub const MAX_TYPE_DEPTH: usize = 256;

// ============================================================================
// SYMBOLS
// ============================================================================

/// The mangled view of a declaration: kind, name and type, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    pub kind: BindingKind,
    pub name: String,
    pub ty: Type,
}

impl Symbol {
    /// Extract the symbol of a `var`/`let`/`const` declaration, looking through `pub`.
    pub fn from_stmt(stmt: &Stmt) -> Result<Self, ManglingError> {
        if let Stmt::Export(export) = stmt {
            return Self::from_stmt(&export.decl);
        }
        let (kind, binding) = stmt
            .as_binding()
            .ok_or_else(|| ManglingError::Unsupported(stmt.kind_name()))?;
        Ok(Self {
            kind,
            name: binding.name.clone(),
            ty: binding.ty.clone(),
        })
    }

    /// Rebuild a declaration with no initializer and an unknown location.
    pub fn into_stmt(self) -> Stmt {
        Stmt::binding(
            self.kind,
            Binding {
                name: self.name,
                ty: self.ty,
                init: None,
                loc: Location::UNKNOWN,
            },
        )
    }

    pub fn mangle(&self) -> String {
        let mut out = String::from(SCHEME_PREFIX);
        out.push(kind_code(self.kind));
        push_name(&mut out, &self.name);
        push_type(&mut out, &self.ty);
        out
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.kind.keyword(), self.name, self.ty)
    }
}

// ============================================================================
// MANGLING
// ============================================================================

/// Mangle a `var`/`let`/`const` declaration (optionally wrapped in `pub`).
///
/// ## Errors
/// [`ManglingError::Unsupported`] for every other statement kind.
pub fn mangle(stmt: &Stmt) -> Result<String, ManglingError> {
    Ok(Symbol::from_stmt(stmt)?.mangle())
}

/// Symbols of every binding in `root`, in declaration order.
///
/// Bindings inside a subsystem are named `subsystem::name`, recursively, so equal names in different
/// subsystems get distinct symbols. Function bodies and non-binding declarations are skipped.
pub fn symbols(root: &Root) -> Vec<Symbol> {
    let mut out = Vec::new();
    collect_symbols(&root.body.stmts, None, &mut out);
    out
}

fn collect_symbols(stmts: &[Stmt], namespace: Option<&str>, out: &mut Vec<Symbol>) {
    for stmt in stmts {
        let stmt = match stmt {
            Stmt::Export(export) => export.decl.as_ref(),
            other => other,
        };
        if let Stmt::Subsystem(subsystem) = stmt {
            let inner = qualify(namespace, &subsystem.name);
            collect_symbols(&subsystem.body.stmts, Some(&inner), out);
        } else if let Ok(mut symbol) = Symbol::from_stmt(stmt) {
            symbol.name = qualify(namespace, &symbol.name);
            out.push(symbol);
        }
    }
}

fn qualify(namespace: Option<&str>, name: &str) -> String {
    match namespace {
        Some(namespace) => format!("{namespace}::{name}"),
        None => name.to_string(),
    }
}

fn kind_code(kind: BindingKind) -> char {
    match kind {
        BindingKind::Var => 'v',
        BindingKind::Let => 'l',
        BindingKind::Const => 'c',
    }
}

fn kind_from_code(c: u8) -> Option<BindingKind> {
    match c {
        b'v' => Some(BindingKind::Var),
        b'l' => Some(BindingKind::Let),
        b'c' => Some(BindingKind::Const),
        _ => None,
    }
}

/// Escape `_` as `__` and `::` as `_N`.
pub fn escape_name(name: &str) -> String {
    name.split("::")
        .map(|segment| segment.replace('_', "__"))
        .collect::<Vec<_>>()
        .join("_N")
}

fn push_name(out: &mut String, name: &str) {
    let escaped = escape_name(name);
    out.push_str(&escaped.len().to_string());
    out.push_str(&escaped);
}

fn push_fields(out: &mut String, tag: char, fields: &[TypeField]) {
    out.push(tag);
    out.push_str(&fields.len().to_string());
    out.push('_');
    for field in fields {
        push_name(out, &field.name);
        push_type(out, &field.ty);
    }
}

fn push_type(out: &mut String, ty: &Type) {
    match ty {
        Type::Primitive(id) => out.push(types::info_for(*id).code),
        Type::Array { elem, len } => {
            out.push('A');
            out.push_str(&len.to_string());
            out.push('_');
            push_type(out, elem);
        }
        Type::Struct(fields) => push_fields(out, 'S', fields),
        Type::Union(fields) => push_fields(out, 'U', fields),
        Type::Named(name) => {
            out.push('N');
            push_name(out, name);
        }
    }
}

// ============================================================================
// DEMANGLING
// ============================================================================

/// Decode a complete symbol into a declaration with no initializer.
///
/// ## Errors
/// [`ManglingError::Malformed`] if `symbol` is not exactly one well-formed symbol.
pub fn demangle(symbol: &str) -> Result<Stmt, ManglingError> {
    demangle_symbol(symbol).map(Symbol::into_stmt)
}

/// Decode a complete symbol into its [`Symbol`] parts.
pub fn demangle_symbol(symbol: &str) -> Result<Symbol, ManglingError> {
    let mut reader = Reader::new(symbol);
    let decoded = reader.symbol()?;
    if reader.pos != symbol.len() {
        return Err(reader.malformed("trailing characters"));
    }
    Ok(decoded)
}

/// Decode the symbol at the start of `input`; returns it and the number of bytes consumed.
pub fn demangle_prefix(input: &str) -> Result<(Stmt, usize), ManglingError> {
    let mut reader = Reader::new(input);
    let decoded = reader.symbol()?;
    Ok((decoded.into_stmt(), reader.pos))
}

struct Reader<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn malformed(&self, reason: &'static str) -> ManglingError {
        ManglingError::Malformed {
            symbol: self.input.to_string(),
            offset: self.pos,
            reason,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn eat(&mut self, c: u8, reason: &'static str) -> Result<(), ManglingError> {
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.malformed(reason))
        }
    }

    fn symbol(&mut self) -> Result<Symbol, ManglingError> {
        if !self.input.starts_with(SCHEME_PREFIX) {
            return Err(self.malformed("missing scheme prefix"));
        }
        self.pos = SCHEME_PREFIX.len();

        let kind = self
            .peek()
            .and_then(kind_from_code)
            .ok_or_else(|| self.malformed("unknown declaration kind"))?;
        self.pos += 1;

        let name = self.name()?;
        let ty = self.ty(0)?;
        Ok(Symbol { kind, name, ty })
    }

    /// Decimal number without leading zeros.
    fn number(&mut self) -> Result<u64, ManglingError> {
        let start = self.pos;
        let mut value: u64 = 0;
        while let Some(c @ b'0'..=b'9') = self.peek() {
            if self.pos > start && self.input.as_bytes()[start] == b'0' {
                return Err(self.malformed("number has a leading zero"));
            }
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u64::from(c - b'0')))
                .ok_or_else(|| self.malformed("number too large"))?;
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.malformed("expected a number"));
        }
        Ok(value)
    }

    /// `<len><escaped name>`
    fn name(&mut self) -> Result<String, ManglingError> {
        let len = self.number()?;
        if len == 0 {
            return Err(self.malformed("empty name"));
        }
        let len = usize::try_from(len).map_err(|_| self.malformed("name too long"))?;
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.input.len())
            .ok_or_else(|| self.malformed("name runs past the end"))?;
        let escaped = self
            .input
            .get(self.pos..end)
            .ok_or_else(|| self.malformed("name is not valid text"))?;

        let mut name = String::with_capacity(escaped.len());
        let mut chars = escaped.chars();
        while let Some(c) = chars.next() {
            match c {
                '_' => match chars.next() {
                    Some('_') => name.push('_'),
                    Some('N') => name.push_str("::"),
                    _ => return Err(self.malformed("bad escape in name")),
                },
                c if c.is_ascii_alphanumeric() => name.push(c),
                _ => return Err(self.malformed("invalid character in name")),
            }
        }
        if name.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(self.malformed("name starts with a digit"));
        }
        self.pos = end;
        Ok(name)
    }

    fn ty(&mut self, depth: usize) -> Result<Type, ManglingError> {
        if depth > MAX_TYPE_DEPTH {
            return Err(self.malformed("type nesting too deep"));
        }
        let tag = self.bump().ok_or_else(|| self.malformed("expected a type"))?;
        match tag {
            b'A' => {
                let len = self.number()?;
                self.eat(b'_', "expected '_' after array length")?;
                let elem = self.ty(depth + 1)?;
                Ok(Type::array(elem, len))
            }
            b'S' => Ok(Type::Struct(self.fields(depth)?)),
            b'U' => Ok(Type::Union(self.fields(depth)?)),
            b'N' => Ok(Type::Named(self.name()?)),
            code => types::from_code(char::from(code))
                .map(Type::Primitive)
                .ok_or_else(|| {
                    ManglingError::Malformed {
                        symbol: self.input.to_string(),
                        offset: self.pos - 1,
                        reason: "unknown type code",
                    }
                }),
        }
    }

    fn fields(&mut self, depth: usize) -> Result<Vec<TypeField>, ManglingError> {
        let count = self.number()?;
        self.eat(b'_', "expected '_' after field count")?;
        let mut fields = Vec::new();
        for _ in 0..count {
            let name = self.name()?;
            let ty = self.ty(depth + 1)?;
            fields.push(TypeField { name, ty });
        }
        Ok(fields)
    }
}
