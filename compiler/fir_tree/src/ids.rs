//! Qualified names and class/callable identifiers.
//!
//! `ClassId` separates the package from the (possibly nested) class path so
//! that `a.b.C.D` is unambiguous: package `a.b`, relative name `C.D`. Its
//! rendered form uses `/` between package segments and `.` between classes:
//! `a/b/C.D`.

use crate::{Name, StringInterner, StringLookup};
use smallvec::SmallVec;

/// Dotted path of names, for packages and relative class paths.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FqName {
    segments: SmallVec<[Name; 4]>,
}

impl FqName {
    /// The root (empty) package.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: impl IntoIterator<Item = Name>) -> Self {
        FqName {
            segments: segments.into_iter().collect(),
        }
    }

    /// Parse `a.b.c`; an empty string is the root.
    pub fn parse(interner: &StringInterner, dotted: &str) -> Self {
        if dotted.is_empty() {
            return Self::root();
        }
        Self::from_segments(dotted.split('.').map(|s| interner.intern(s)))
    }

    #[inline]
    pub fn segments(&self) -> &[Name] {
        &self.segments
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn child(&self, name: Name) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name);
        FqName { segments }
    }

    pub fn parent(&self) -> Option<FqName> {
        let (_, init) = self.segments.split_last()?;
        Some(Self::from_segments(init.iter().copied()))
    }

    pub fn short_name(&self) -> Option<Name> {
        self.segments.last().copied()
    }

    pub fn starts_with(&self, prefix: &FqName) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Concatenate `self` and `other`.
    #[must_use]
    pub fn join(&self, other: &FqName) -> Self {
        Self::from_segments(self.segments.iter().chain(other.segments.iter()).copied())
    }

    pub fn render(&self, names: &dyn StringLookup) -> String {
        self.render_with(names, ".")
    }

    fn render_with(&self, names: &dyn StringLookup, sep: &str) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push_str(sep);
            }
            out.push_str(names.lookup(*segment));
        }
        out
    }
}

/// Identity of a class-like declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId {
    package: FqName,
    relative: FqName,
    is_local: bool,
}

impl ClassId {
    pub fn new(package: FqName, relative: FqName, is_local: bool) -> Self {
        debug_assert!(!relative.is_root(), "class id needs a class name");
        ClassId {
            package,
            relative,
            is_local,
        }
    }

    pub fn top_level(package: FqName, name: Name) -> Self {
        Self::new(package, FqName::from_segments([name]), false)
    }

    /// Parse the rendered form `pkg/path/Outer.Inner`.
    pub fn parse(interner: &StringInterner, rendered: &str) -> Self {
        let (package, relative) = match rendered.rfind('/') {
            Some(slash) => (&rendered[..slash], &rendered[slash + 1..]),
            None => ("", rendered),
        };
        let package = if package.is_empty() {
            FqName::root()
        } else {
            FqName::from_segments(package.split('/').map(|s| interner.intern(s)))
        };
        Self::new(package, FqName::parse(interner, relative), false)
    }

    #[inline]
    pub fn package_fq_name(&self) -> &FqName {
        &self.package
    }

    #[inline]
    pub fn relative_class_name(&self) -> &FqName {
        &self.relative
    }

    #[inline]
    pub fn is_local(&self) -> bool {
        self.is_local
    }

    pub fn short_class_name(&self) -> Name {
        self.relative.short_name().unwrap_or(Name::EMPTY)
    }

    pub fn is_nested(&self) -> bool {
        self.relative.len() > 1
    }

    /// Enclosing class, for nested classes.
    pub fn outer_class_id(&self) -> Option<ClassId> {
        if !self.is_nested() {
            return None;
        }
        let outer = self.relative.parent()?;
        Some(ClassId::new(self.package.clone(), outer, self.is_local))
    }

    #[must_use]
    pub fn create_nested(&self, name: Name) -> ClassId {
        ClassId::new(self.package.clone(), self.relative.child(name), self.is_local)
    }

    /// Package and class path as one dotted name.
    pub fn as_fq_name(&self) -> FqName {
        self.package.join(&self.relative)
    }

    pub fn render(&self, names: &dyn StringLookup) -> String {
        let relative = self.relative.render(names);
        if self.package.is_root() {
            relative
        } else {
            format!("{}/{}", self.package.render_with(names, "/"), relative)
        }
    }
}

/// Identity of a callable: package, optional owning class, and name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallableId {
    pub package: FqName,
    pub class_name: Option<FqName>,
    pub callable_name: Name,
}

impl CallableId {
    pub fn top_level(package: FqName, callable_name: Name) -> Self {
        CallableId {
            package,
            class_name: None,
            callable_name,
        }
    }

    pub fn member(class_id: &ClassId, callable_name: Name) -> Self {
        CallableId {
            package: class_id.package_fq_name().clone(),
            class_name: Some(class_id.relative_class_name().clone()),
            callable_name,
        }
    }

    pub fn class_id(&self) -> Option<ClassId> {
        self.class_name
            .as_ref()
            .map(|relative| ClassId::new(self.package.clone(), relative.clone(), false))
    }

    pub fn render(&self, names: &dyn StringLookup) -> String {
        let mut out = self.package.render_with(names, "/");
        if let Some(class_name) = &self.class_name {
            if !out.is_empty() {
                out.push('/');
            }
            out.push_str(&class_name.render(names));
        }
        out.push('.');
        out.push_str(names.lookup(self.callable_name));
        out
    }
}

#[cfg(test)]
mod tests;
