use std::any::Any;
use std::fmt;

use verdant_syntax::{Grammar, Tree};

use crate::input::SourceText;
use crate::interrupt::Interrupt;

/// Engine-private progress of a halted parse.
pub type Suspended = Box<dyn Any + Send>;

pub enum EngineOutcome {
    Complete(Tree),
    /// The interrupt fired; the state lets a later call pick up from the last checkpoint.
    Halted(Suspended),
}

/// The state machine that turns characters into a tree for one grammar.
pub trait GrammarEngine: Send + Sync {
    fn grammar(&self) -> &'static Grammar;

    /// Parses `source`, reusing unchanged subtrees of `old_tree` when given.
    ///
    /// `resume` is state previously returned in [`EngineOutcome::Halted`]
    /// for the same input.
    fn parse(
        &self,
        source: &SourceText<'_>,
        old_tree: Option<&Tree>,
        resume: Option<Suspended>,
        interrupt: &mut Interrupt,
    ) -> EngineOutcome;
}

/// A grammar together with the engine that parses it.
#[derive(Clone, Copy)]
pub struct Language {
    engine: &'static dyn GrammarEngine,
}

impl Language {
    pub const fn new(engine: &'static dyn GrammarEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &'static dyn GrammarEngine {
        self.engine
    }

    pub fn grammar(&self) -> &'static Grammar {
        self.engine.grammar()
    }

    pub fn name(&self) -> &'static str {
        self.grammar().name()
    }

    pub fn version(&self) -> u32 {
        self.grammar().version()
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.grammar(), other.grammar())
    }
}

impl Eq for Language {}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Language")
            .field("name", &self.name())
            .field("version", &self.version())
            .finish()
    }
}
