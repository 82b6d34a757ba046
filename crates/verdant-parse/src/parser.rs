use std::hash::{Hash as _, Hasher as _};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::time::Duration;

use rustc_hash::FxHasher;
use tracing::{debug, debug_span, warn};
use verdant_syntax::{Range, Tree};

use crate::engine::{EngineOutcome, Language, Suspended};
use crate::error::{Error, HaltReason, Result};
use crate::input::{InputEncoding, SourceText};
use crate::interrupt::Interrupt;
use crate::{LANGUAGE_VERSION, MIN_COMPATIBLE_LANGUAGE_VERSION};

/// Settings applied together by [`Parser::with_options`].
#[derive(Clone, Debug, Default)]
pub struct ParserOptions {
    /// Zero disables the timeout.
    pub timeout: Duration,
    /// Empty means the whole document.
    pub included_ranges: Vec<Range>,
    pub cancellation_flag: Option<Arc<AtomicUsize>>,
}

/// Drives a [`GrammarEngine`](crate::GrammarEngine) over documents.
///
/// One parser runs one parse at a time; a halted parse can be resumed by
/// repeating the call with the same input.
pub struct Parser {
    language: Option<Language>,
    included_ranges: Vec<Range>,
    timeout: Duration,
    cancellation_flag: Option<Arc<AtomicUsize>>,
    suspended: Option<SuspendedParse>,
}

struct SuspendedParse {
    language: Language,
    fingerprint: u64,
    state: Suspended,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            language: None,
            included_ranges: vec![Range::WHOLE_DOCUMENT],
            timeout: Duration::ZERO,
            cancellation_flag: None,
            suspended: None,
        }
    }

    pub fn with_options(language: Language, options: ParserOptions) -> Result<Self> {
        let mut parser = Self::new();
        parser.set_language(language)?;
        parser.set_included_ranges(&options.included_ranges)?;
        parser.set_timeout(options.timeout);
        parser.set_cancellation_flag(options.cancellation_flag);
        Ok(parser)
    }

    pub fn language(&self) -> Option<Language> {
        self.language
    }

    /// Assigns the language used by later parses.
    ///
    /// Fails without changing anything if its tables have an unsupported version.
    pub fn set_language(&mut self, language: Language) -> Result<()> {
        let version = language.version();
        if !(MIN_COMPATIBLE_LANGUAGE_VERSION..=LANGUAGE_VERSION).contains(&version) {
            return Err(Error::VersionMismatch {
                version,
                min: MIN_COMPATIBLE_LANGUAGE_VERSION,
                max: LANGUAGE_VERSION,
            });
        }

        if self.language != Some(language) {
            self.suspended = None;
        }
        debug!(language = language.name(), version, "language set");
        self.language = Some(language);
        Ok(())
    }

    pub fn included_ranges(&self) -> &[Range] {
        &self.included_ranges
    }

    /// Restricts parsing to `ranges`. An empty slice selects the whole document.
    ///
    /// Ranges must be ordered, non-overlapping and not inverted; otherwise
    /// the previous ranges stay in effect.
    pub fn set_included_ranges(&mut self, ranges: &[Range]) -> Result<()> {
        let mut previous_end = 0;
        for (index, range) in ranges.iter().enumerate() {
            if range.start_byte < previous_end || range.end_byte < range.start_byte {
                return Err(Error::InvalidRanges { index });
            }
            previous_end = range.end_byte;
        }

        self.included_ranges =
            if ranges.is_empty() { vec![Range::WHOLE_DOCUMENT] } else { ranges.to_vec() };
        debug!(count = self.included_ranges.len(), "included ranges set");
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn cancellation_flag(&self) -> Option<&Arc<AtomicUsize>> {
        self.cancellation_flag.as_ref()
    }

    /// A non-zero value in `flag` halts the running parse at its next checkpoint.
    pub fn set_cancellation_flag(&mut self, flag: Option<Arc<AtomicUsize>>) {
        self.cancellation_flag = flag;
    }

    /// Forgets a halted parse so the next call starts over.
    pub fn reset(&mut self) {
        self.suspended = None;
    }

    /// Parses UTF-8 text.
    ///
    /// With `old_tree`, which must have been edited to match `text`,
    /// unchanged subtrees are shared with the new tree.
    pub fn parse(&mut self, text: impl AsRef<[u8]>, old_tree: Option<&Tree>) -> Result<Tree> {
        self.parse_with_encoding(text.as_ref(), InputEncoding::Utf8, old_tree)
    }

    pub fn parse_utf16(&mut self, text: &[u16], old_tree: Option<&Tree>) -> Result<Tree> {
        let bytes: Vec<u8> = text.iter().copied().flat_map(u16::to_le_bytes).collect();
        self.parse_with_encoding(&bytes, InputEncoding::Utf16, old_tree)
    }

    pub fn parse_with_encoding(
        &mut self,
        bytes: &[u8],
        encoding: InputEncoding,
        old_tree: Option<&Tree>,
    ) -> Result<Tree> {
        let Some(language) = self.language else {
            return Err(Error::NoGrammar);
        };
        let _span = debug_span!("parse", language = language.name(), bytes = bytes.len()).entered();

        let old_tree = old_tree.filter(|tree| {
            let same_grammar = std::ptr::eq(tree.grammar(), language.grammar());
            if !same_grammar {
                warn!(old = tree.grammar().name(), "ignoring old tree of another language");
            }
            same_grammar
        });
        let old_tree = old_tree.filter(|tree| {
            let same_ranges = tree.included_ranges() == self.included_ranges.as_slice();
            if !same_ranges {
                debug!("included ranges changed, not reusing the old tree");
            }
            same_ranges
        });

        let fingerprint = self.fingerprint(bytes, encoding);
        let resume = match self.suspended.take() {
            Some(suspended)
                if suspended.language == language && suspended.fingerprint == fingerprint =>
            {
                debug!("resuming halted parse");
                Some(suspended.state)
            }
            Some(_) => {
                debug!("discarding halted parse of different input");
                None
            }
            None => None,
        };

        let source = SourceText::new(bytes, encoding, &self.included_ranges);
        let mut interrupt = Interrupt::new(self.timeout, self.cancellation_flag.clone());

        match language.engine().parse(&source, old_tree, resume, &mut interrupt) {
            EngineOutcome::Complete(tree) => {
                debug!(has_error = tree.root_node().has_error(), "parse complete");
                Ok(tree)
            }
            EngineOutcome::Halted(state) => {
                let reason = interrupt.halted().unwrap_or(HaltReason::Flag);
                debug!(%reason, "parse halted");
                self.suspended = Some(SuspendedParse { language, fingerprint, state });
                Err(Error::Cancelled(reason))
            }
        }
    }

    fn fingerprint(&self, bytes: &[u8], encoding: InputEncoding) -> u64 {
        let mut hasher = FxHasher::default();
        bytes.hash(&mut hasher);
        encoding.hash(&mut hasher);
        self.included_ranges.hash(&mut hasher);
        hasher.finish()
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
