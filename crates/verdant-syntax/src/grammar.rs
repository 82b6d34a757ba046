use std::fmt;
use std::num::NonZeroU16;

use rustc_hash::FxHashMap;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(NonZeroU16);

        impl $name {
            /// Wraps a raw table index. Panics on the reserved index 0.
            pub const fn from_raw(raw: u16) -> Self {
                match NonZeroU16::new(raw) {
                    Some(raw) => Self(raw),
                    None => panic!("id 0 is reserved"),
                }
            }

            pub const fn new(raw: u16) -> Option<Self> {
                match NonZeroU16::new(raw) {
                    Some(raw) => Some(Self(raw)),
                    None => None,
                }
            }

            pub const fn raw(self) -> u16 {
                self.0.get()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.raw())
            }
        }
    };
}

id_type! {
    /// Numeric identifier of a grammar rule or token.
    Symbol
}

id_type! {
    /// Numeric identifier of a named child slot.
    FieldId
}

impl Symbol {
    /// Error-recovery nodes. Shared by every grammar.
    pub const ERROR: Self = Self::from_raw(u16::MAX);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Named rule or token, e.g. `identifier`.
    Regular,
    /// Literal token, e.g. `";"`.
    Anonymous,
    /// Helper symbol that never appears in a tree.
    Auxiliary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymbolInfo {
    pub name: &'static str,
    pub kind: SymbolKind,
}

impl SymbolInfo {
    pub const fn named(name: &'static str) -> Self {
        Self { name, kind: SymbolKind::Regular }
    }

    pub const fn anonymous(name: &'static str) -> Self {
        Self { name, kind: SymbolKind::Anonymous }
    }

    pub const fn auxiliary(name: &'static str) -> Self {
        Self { name, kind: SymbolKind::Auxiliary }
    }
}

/// Symbol and field tables of one language.
///
/// Slot 0 of both tables is reserved; ids index the tables directly.
pub struct Grammar {
    name: &'static str,
    version: u32,
    symbols: &'static [SymbolInfo],
    fields: &'static [&'static str],
    named_symbols: FxHashMap<&'static str, Symbol>,
    anonymous_symbols: FxHashMap<&'static str, Symbol>,
    field_ids: FxHashMap<&'static str, FieldId>,
}

impl Grammar {
    pub fn new(
        name: &'static str,
        version: u32,
        symbols: &'static [SymbolInfo],
        fields: &'static [&'static str],
    ) -> Self {
        debug_assert!(symbols.len() < usize::from(u16::MAX), "too many symbols for 16-bit ids");
        debug_assert!(fields.len() <= usize::from(u16::MAX), "too many fields for 16-bit ids");

        let mut named_symbols = FxHashMap::default();
        let mut anonymous_symbols = FxHashMap::default();
        for (raw, info) in symbols.iter().enumerate().skip(1) {
            let symbol = Symbol::from_raw(raw as u16);
            let table = match info.kind {
                SymbolKind::Regular => &mut named_symbols,
                SymbolKind::Anonymous => &mut anonymous_symbols,
                SymbolKind::Auxiliary => continue,
            };
            table.entry(info.name).or_insert(symbol);
        }
        named_symbols.insert("ERROR", Symbol::ERROR);

        let field_ids = fields
            .iter()
            .enumerate()
            .skip(1)
            .map(|(raw, &name)| (name, FieldId::from_raw(raw as u16)))
            .collect();

        Self { name, version, symbols, fields, named_symbols, anonymous_symbols, field_ids }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Version of the table format this grammar was compiled for.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Number of symbol slots, the reserved one included.
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len().saturating_sub(1)
    }

    fn info(&self, symbol: Symbol) -> Option<SymbolInfo> {
        if symbol == Symbol::ERROR {
            return Some(SymbolInfo::named("ERROR"));
        }
        self.symbols.get(symbol.raw() as usize).copied()
    }

    pub fn symbol_name(&self, symbol: Symbol) -> Option<&'static str> {
        self.info(symbol).map(|info| info.name)
    }

    pub fn symbol_kind(&self, symbol: Symbol) -> Option<SymbolKind> {
        self.info(symbol).map(|info| info.kind)
    }

    pub fn is_named(&self, symbol: Symbol) -> bool {
        self.symbol_kind(symbol) == Some(SymbolKind::Regular)
    }

    pub fn symbol_for_name(&self, name: &str, named: bool) -> Option<Symbol> {
        let table = if named { &self.named_symbols } else { &self.anonymous_symbols };
        table.get(name).copied()
    }

    pub fn field_name(&self, field: FieldId) -> Option<&'static str> {
        self.fields.get(field.raw() as usize).copied()
    }

    pub fn field_id_for_name(&self, name: &str) -> Option<FieldId> {
        self.field_ids.get(name).copied()
    }
}

impl fmt::Debug for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar").field("name", &self.name).field("version", &self.version).finish()
    }
}
