//! Symbol provider: the session's index from ids to declarations.

use fir_tree::{ClassId, ClassLikeSymbol, DeclId, FqName, Name};
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

/// Top-level callables sharing a package and a name.
pub type CallableIds = SmallVec<[DeclId; 2]>;

#[derive(Default)]
pub struct SymbolProvider {
    classes: RwLock<FxHashMap<ClassId, DeclId>>,
    callables: RwLock<FxHashMap<(FqName, Name), CallableIds>>,
    packages: RwLock<FxHashSet<FqName>>,
}

impl SymbolProvider {
    pub fn new() -> Self {
        let provider = Self::default();
        provider.packages.write().insert(FqName::root());
        provider
    }

    /// Index a class and make its package (and every parent package) known.
    pub fn register_class(&self, class_id: ClassId, id: DeclId) {
        self.register_package(class_id.package_fq_name());
        self.classes.write().insert(class_id, id);
    }

    pub fn register_callable(&self, package: &FqName, name: Name, id: DeclId) {
        self.register_package(package);
        self.callables
            .write()
            .entry((package.clone(), name))
            .or_default()
            .push(id);
    }

    pub fn register_package(&self, package: &FqName) {
        let mut packages = self.packages.write();
        let mut current = Some(package.clone());
        while let Some(fq_name) = current {
            current = fq_name.parent();
            if !packages.insert(fq_name) {
                break;
            }
        }
    }

    pub fn get_class_like_symbol_by_fq_name(&self, class_id: &ClassId) -> Option<ClassLikeSymbol> {
        self.classes
            .read()
            .contains_key(class_id)
            .then(|| ClassLikeSymbol(class_id.clone()))
    }

    /// The declaration behind a class lookup tag.
    pub fn get_symbol_by_lookup_tag(&self, lookup_tag: &ClassId) -> Option<DeclId> {
        self.classes.read().get(lookup_tag).copied()
    }

    pub fn top_level_callables(&self, package: &FqName, name: Name) -> CallableIds {
        self.callables
            .read()
            .get(&(package.clone(), name))
            .cloned()
            .unwrap_or_default()
    }

    pub fn has_package(&self, package: &FqName) -> bool {
        self.packages.read().contains(package)
    }

    /// Every registered class id, in no particular order.
    pub fn all_class_ids(&self) -> Vec<ClassId> {
        self.classes.read().keys().cloned().collect()
    }
}
