//! Allow-list of Java member signatures.
//!
//! A Java class with a Kotlin counterpart shows the Kotlin class's members.
//! The few Java members listed here are shown as well, next to them.
//! Entries have the form
//!
//! ```text
//! java/lang/String.codePointAt(I)I
//! └── owner ─────┘ └─ name ──┘└desc┘
//! ```
//!
//! Entries are split into owner, name and descriptor when the list is
//! built; lookups compare whole owners, so `java/lang/String` never picks
//! up `java/lang/StringBuilder` entries.

use fir_tree::{ClassId, Name, StringInterner, StringLookup};
use rustc_hash::FxHashMap;

use crate::error::WhitelistError;
use crate::model::JavaPrimitive;
use crate::type_mapping::internal_name_of;

/// Java members Kotlin code keeps seeing on mapped builtin classes.
const JVM_BUILTINS: &[&str] = &[
    "java/lang/Object.getClass()Ljava/lang/Class;",
    "java/lang/Object.notify()V",
    "java/lang/Object.notifyAll()V",
    "java/lang/Object.wait()V",
    "java/lang/Object.wait(J)V",
    "java/lang/CharSequence.chars()Ljava/util/stream/IntStream;",
    "java/lang/CharSequence.codePoints()Ljava/util/stream/IntStream;",
    "java/lang/String.codePointAt(I)I",
    "java/lang/String.codePointBefore(I)I",
    "java/lang/String.codePointCount(II)I",
    "java/lang/String.compareToIgnoreCase(Ljava/lang/String;)I",
    "java/lang/String.concat(Ljava/lang/String;)Ljava/lang/String;",
    "java/lang/String.contains(Ljava/lang/CharSequence;)Z",
    "java/lang/String.contentEquals(Ljava/lang/CharSequence;)Z",
    "java/lang/String.contentEquals(Ljava/lang/StringBuffer;)Z",
    "java/lang/String.endsWith(Ljava/lang/String;)Z",
    "java/lang/String.equalsIgnoreCase(Ljava/lang/String;)Z",
    "java/lang/String.getBytes()[B",
    "java/lang/String.indexOf(I)I",
    "java/lang/String.indexOf(II)I",
    "java/lang/String.indexOf(Ljava/lang/String;)I",
    "java/lang/String.indexOf(Ljava/lang/String;I)I",
    "java/lang/String.intern()Ljava/lang/String;",
    "java/lang/String.isEmpty()Z",
    "java/lang/String.lastIndexOf(I)I",
    "java/lang/String.lastIndexOf(II)I",
    "java/lang/String.lastIndexOf(Ljava/lang/String;)I",
    "java/lang/String.lastIndexOf(Ljava/lang/String;I)I",
    "java/lang/String.matches(Ljava/lang/String;)Z",
    "java/lang/String.offsetByCodePoints(II)I",
    "java/lang/String.regionMatches(ILjava/lang/String;II)Z",
    "java/lang/String.regionMatches(ZILjava/lang/String;II)Z",
    "java/lang/String.replace(CC)Ljava/lang/String;",
    "java/lang/String.replaceAll(Ljava/lang/String;Ljava/lang/String;)Ljava/lang/String;",
    "java/lang/String.replaceFirst(Ljava/lang/String;Ljava/lang/String;)Ljava/lang/String;",
    "java/lang/String.split(Ljava/lang/String;)[Ljava/lang/String;",
    "java/lang/String.split(Ljava/lang/String;I)[Ljava/lang/String;",
    "java/lang/String.startsWith(Ljava/lang/String;)Z",
    "java/lang/String.startsWith(Ljava/lang/String;I)Z",
    "java/lang/String.substring(I)Ljava/lang/String;",
    "java/lang/String.substring(II)Ljava/lang/String;",
    "java/lang/String.toCharArray()[C",
    "java/lang/String.toLowerCase()Ljava/lang/String;",
    "java/lang/String.toUpperCase()Ljava/lang/String;",
    "java/lang/String.trim()Ljava/lang/String;",
    "java/lang/Throwable.fillInStackTrace()Ljava/lang/Throwable;",
    "java/lang/Throwable.getLocalizedMessage()Ljava/lang/String;",
    "java/lang/Throwable.getStackTrace()[Ljava/lang/StackTraceElement;",
    "java/lang/Throwable.initCause(Ljava/lang/Throwable;)Ljava/lang/Throwable;",
    "java/lang/Throwable.printStackTrace()V",
    "java/lang/Throwable.setStackTrace([Ljava/lang/StackTraceElement;)V",
    "java/lang/Iterable.forEach(Ljava/util/function/Consumer;)V",
    "java/lang/Iterable.spliterator()Ljava/util/Spliterator;",
    "java/util/Collection.parallelStream()Ljava/util/stream/Stream;",
    "java/util/Collection.removeIf(Ljava/util/function/Predicate;)Z",
    "java/util/Collection.stream()Ljava/util/stream/Stream;",
    "java/util/Collection.toArray()[Ljava/lang/Object;",
    "java/util/Collection.toArray([Ljava/lang/Object;)[Ljava/lang/Object;",
    "java/util/List.replaceAll(Ljava/util/function/UnaryOperator;)V",
    "java/util/List.sort(Ljava/util/Comparator;)V",
    "java/util/Map.compute(Ljava/lang/Object;Ljava/util/function/BiFunction;)Ljava/lang/Object;",
    "java/util/Map.computeIfAbsent(Ljava/lang/Object;Ljava/util/function/Function;)Ljava/lang/Object;",
    "java/util/Map.computeIfPresent(Ljava/lang/Object;Ljava/util/function/BiFunction;)Ljava/lang/Object;",
    "java/util/Map.forEach(Ljava/util/function/BiConsumer;)V",
    "java/util/Map.getOrDefault(Ljava/lang/Object;Ljava/lang/Object;)Ljava/lang/Object;",
    "java/util/Map.merge(Ljava/lang/Object;Ljava/lang/Object;Ljava/util/function/BiFunction;)Ljava/lang/Object;",
    "java/util/Map.putIfAbsent(Ljava/lang/Object;Ljava/lang/Object;)Ljava/lang/Object;",
    "java/util/Map.replace(Ljava/lang/Object;Ljava/lang/Object;)Ljava/lang/Object;",
    "java/util/Map.replaceAll(Ljava/util/function/BiFunction;)V",
];

/// One allow-listed member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WhitelistEntry {
    /// Internal name of the declaring class.
    pub owner: String,
    pub name: String,
    /// `(params)ret`
    pub descriptor: String,
}

impl WhitelistEntry {
    pub fn parse(entry: &str) -> Result<Self, WhitelistError> {
        let Some(open) = entry.find('(') else {
            return Err(WhitelistError::MissingParameterList {
                entry: entry.to_owned(),
            });
        };
        let (head, descriptor) = entry.split_at(open);
        let Some((owner, name)) = head.rsplit_once('.') else {
            return Err(WhitelistError::MissingOwner {
                entry: entry.to_owned(),
            });
        };
        if owner.is_empty() || owner.split('/').any(str::is_empty) {
            return Err(WhitelistError::MissingOwner {
                entry: entry.to_owned(),
            });
        }
        if name.is_empty() {
            return Err(WhitelistError::EmptyName {
                entry: entry.to_owned(),
            });
        }
        if let Err(offset) = check_method_descriptor(descriptor) {
            return Err(WhitelistError::MalformedDescriptor {
                entry: entry.to_owned(),
                offset: open + offset,
            });
        }
        Ok(WhitelistEntry {
            owner: owner.to_owned(),
            name: name.to_owned(),
            descriptor: descriptor.to_owned(),
        })
    }

    /// `name(params)ret`, the form JVM descriptors of members render to.
    pub fn signature(&self) -> String {
        format!("{}{}", self.name, self.descriptor)
    }
}

/// `Err(offset)` points at the first byte that does not fit
/// `(FieldType*)ReturnType`.
fn check_method_descriptor(descriptor: &str) -> Result<(), usize> {
    let bytes = descriptor.as_bytes();
    if bytes.first() != Some(&b'(') {
        return Err(0);
    }
    let mut pos = 1;
    while bytes.get(pos) != Some(&b')') {
        if pos >= bytes.len() {
            return Err(pos);
        }
        pos = check_field_type(bytes, pos)?;
    }
    pos += 1;
    pos = if bytes.get(pos) == Some(&b'V') {
        pos + 1
    } else {
        check_field_type(bytes, pos)?
    };
    if pos == bytes.len() {
        Ok(())
    } else {
        Err(pos)
    }
}

/// Position after one field type starting at `pos`.
fn check_field_type(bytes: &[u8], mut pos: usize) -> Result<usize, usize> {
    while bytes.get(pos) == Some(&b'[') {
        pos += 1;
    }
    match bytes.get(pos) {
        Some(&b'L') => {
            let start = pos + 1;
            let length = bytes[start..].iter().position(|&b| b == b';').ok_or(bytes.len())?;
            let name = &bytes[start..start + length];
            let valid = !name.is_empty()
                && !name.iter().any(|b| matches!(b, b'.' | b'[' | b'(' | b')'))
                && name.split(|&b| b == b'/').all(|segment| !segment.is_empty());
            if valid {
                Ok(start + length + 1)
            } else {
                Err(start)
            }
        }
        Some(&letter) if JavaPrimitive::from_descriptor(char::from(letter)).is_some() => Ok(pos + 1),
        _ => Err(pos),
    }
}

/// Parsed allow-list, grouped by owner.
#[derive(Clone, Debug, Default)]
pub struct SignatureWhitelist {
    by_owner: FxHashMap<String, Vec<WhitelistEntry>>,
    len: usize,
}

impl SignatureWhitelist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every entry; the first malformed one is an error.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, WhitelistError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut whitelist = SignatureWhitelist::new();
        for entry in entries {
            whitelist.insert(WhitelistEntry::parse(entry.as_ref())?);
        }
        Ok(whitelist)
    }

    /// The table shipped with the compiler.
    pub fn jvm_builtins() -> Self {
        let mut whitelist = SignatureWhitelist::new();
        for entry in JVM_BUILTINS {
            match WhitelistEntry::parse(entry) {
                Ok(parsed) => whitelist.insert(parsed),
                Err(error) => tracing::warn!(%error, "skipping builtin whitelist entry"),
            }
        }
        whitelist
    }

    pub fn insert(&mut self, entry: WhitelistEntry) {
        let entries = self.by_owner.entry(entry.owner.clone()).or_default();
        if !entries.contains(&entry) {
            entries.push(entry);
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Entries declared on the class with internal name `owner`.
    pub fn entries_for(&self, owner: &str) -> &[WhitelistEntry] {
        self.by_owner.get(owner).map_or(&[], Vec::as_slice)
    }

    pub fn contains(&self, owner: &str, signature: &str) -> bool {
        self.entries_for(owner).iter().any(|entry| entry.signature() == signature)
    }

    /// `name(params)ret` strings of the class's entries, keyed by name.
    pub fn signatures_by_name(
        &self,
        interner: &StringInterner,
        names: &dyn StringLookup,
        class_id: &ClassId,
    ) -> FxHashMap<Name, Vec<String>> {
        let owner = internal_name_of(names, class_id);
        let mut grouped: FxHashMap<Name, Vec<String>> = FxHashMap::default();
        for entry in self.entries_for(&owner) {
            grouped
                .entry(interner.intern(&entry.name))
                .or_default()
                .push(entry.signature());
        }
        grouped
    }
}

#[cfg(test)]
mod tests;
