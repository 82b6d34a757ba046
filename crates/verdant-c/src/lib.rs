//! A small C grammar and its engine: declarations, function definitions,
//! statements and expressions, with comments as extras.

mod grammar;
mod parser;
mod symbol_set;
mod symbols;
mod tokenizer;

use tracing::trace;
use verdant_parse::{EngineOutcome, GrammarEngine, Interrupt, Language, SourceText, Suspended};
use verdant_syntax::{Grammar, Tree};

pub use symbols::{field, fields, kinds};

/// Version of the symbol tables, checked by [`verdant_parse::Parser::set_language`].
pub const GRAMMAR_VERSION: u32 = 14;

struct CEngine;

static ENGINE: CEngine = CEngine;

impl GrammarEngine for CEngine {
    fn grammar(&self) -> &'static Grammar {
        &symbols::GRAMMAR
    }

    fn parse(
        &self,
        source: &SourceText<'_>,
        old_tree: Option<&Tree>,
        resume: Option<Suspended>,
        interrupt: &mut Interrupt,
    ) -> EngineOutcome {
        let mut p = parser::Parser::new(source, old_tree, interrupt);
        let suspension = resume.and_then(|state| state.downcast::<parser::Suspension>().ok());
        let (root, blocks) = match suspension {
            Some(suspension) => p.resume(*suspension),
            None => {
                trace!(reuse = old_tree.is_some(), "starting parse");
                (p.start_root(), Vec::new())
            }
        };

        grammar::translation_unit(&mut p, root, &blocks);
        p.finish()
    }
}

pub fn language() -> Language {
    Language::new(&ENGINE)
}
