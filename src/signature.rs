use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

use crate::candidate::CandidateKind;
use crate::error::DiscoveryError;

/// The kind of symbol a [`Signature`] is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Kind {
    #[default]
    Class,
    Function,
    Any,
}

impl Kind {
    /// Whether a candidate of `actual` kind satisfies a signature requesting `self`.
    pub fn matches(self, actual: CandidateKind) -> bool {
        match self {
            Kind::Any => true,
            Kind::Class => actual == CandidateKind::Class,
            Kind::Function => matches!(actual, CandidateKind::Function | CandidateKind::AsyncFunction),
        }
    }
}

/// A structural query describing the target symbol: name, kind, required
/// methods/decorators/bases, module constraints, and docstring hints.
///
/// Sequence fields are frozen into sets at construction time so a caller
/// can't inflate a score by repeating an entry, and so insertion order is
/// never observable. Regex fields are compiled lazily, once, the first time
/// the engine evaluates this signature; the compiled pattern is cached here.
#[derive(Debug)]
pub struct Signature {
    pub(crate) name: String,
    pub(crate) kind: Kind,
    pub(crate) methods: HashSet<String>,
    pub(crate) decorators: HashSet<String>,
    pub(crate) bases: HashSet<String>,
    pub(crate) module: Option<String>,
    pub(crate) module_pattern: Option<String>,
    pub(crate) docstring_contains: HashSet<String>,
    pub(crate) regex: bool,
    pub(crate) case_sensitive: bool,

    name_regex: OnceLock<Regex>,
    module_regex: OnceLock<Regex>,
}

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Signature {
            name: name.into(),
            kind: Kind::default(),
            methods: HashSet::new(),
            decorators: HashSet::new(),
            bases: HashSet::new(),
            module: None,
            module_pattern: None,
            docstring_contains: HashSet::new(),
            regex: false,
            case_sensitive: true,
            name_regex: OnceLock::new(),
            module_regex: OnceLock::new(),
        }
    }

    pub fn kind(mut self, kind: Kind) -> Self {
        self.kind = kind;
        self
    }

    pub fn methods(mut self, methods: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.methods = methods.into_iter().map(Into::into).collect();
        self
    }

    pub fn decorators(mut self, decorators: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.decorators = decorators.into_iter().map(Into::into).collect();
        self
    }

    pub fn bases(mut self, bases: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.bases = bases.into_iter().map(Into::into).collect();
        self
    }

    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn module_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.module_pattern = Some(pattern.into());
        self
    }

    pub fn docstring_contains(mut self, fragments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.docstring_contains = fragments.into_iter().map(Into::into).collect();
        self
    }

    pub fn regex(mut self, regex: bool) -> Self {
        self.regex = regex;
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Eagerly compile any regex fields, failing fast instead of at first use.
    pub fn compiled(self) -> Result<Self, DiscoveryError> {
        if self.regex {
            self.name_regex()?;
        }
        if self.module_pattern.is_some() {
            self.module_regex()?;
        }
        Ok(self)
    }

    pub(crate) fn name_regex(&self) -> Result<&Regex, DiscoveryError> {
        if let Some(r) = self.name_regex.get() {
            return Ok(r);
        }
        let compiled = RegexBuilder::new(&self.name)
            .case_insensitive(!self.case_sensitive)
            .build()?;
        Ok(self.name_regex.get_or_init(|| compiled))
    }

    pub(crate) fn module_regex(&self) -> Result<&Regex, DiscoveryError> {
        if let Some(r) = self.module_regex.get() {
            return Ok(r);
        }
        let pattern = self.module_pattern.as_deref().unwrap_or("");
        let compiled = Regex::new(pattern)?;
        Ok(self.module_regex.get_or_init(|| compiled))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature(name={:?}, kind={:?}", self.name, self.kind)?;
        if !self.methods.is_empty() {
            let mut methods: Vec<_> = self.methods.iter().collect();
            methods.sort();
            write!(f, ", methods={methods:?}")?;
        }
        if !self.decorators.is_empty() {
            let mut decorators: Vec<_> = self.decorators.iter().collect();
            decorators.sort();
            write!(f, ", decorators={decorators:?}")?;
        }
        if !self.bases.is_empty() {
            let mut bases: Vec<_> = self.bases.iter().collect();
            bases.sort();
            write!(f, ", bases={bases:?}")?;
        }
        if let Some(module) = &self.module {
            write!(f, ", module={module:?}")?;
        }
        if let Some(pattern) = &self.module_pattern {
            write!(f, ", module_pattern={pattern:?}")?;
        }
        write!(f, ")")
    }
}
