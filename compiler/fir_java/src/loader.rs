//! Registering Java classes in a session.
//!
//! Every package gets one library file that holds its Java classes, so the
//! pipeline sees them as declarations but never resolves them on its own.
//! Member types go through [`JavaClassMapping::type_ref`]; the phases then
//! resolve whatever still mentions a Java type parameter.

use std::sync::Arc;

use fir_resolve::{FirBuilder, FirSession};
use fir_tree::{
    ClassId, ClassKind, DeclId, DeclarationOrigin, FirTypeRef, Modality, Name, StringInterner, Variance,
};
use parking_lot::{Mutex, RwLock};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::error::JavaLoadError;
use crate::model::{JavaClass, JavaClassKind, JavaMethod, JavaType, JavaTypeParameter};
use crate::type_mapping::{class_id_of, JavaClassMapping};

/// A supertype as the class file names it, next to the Kotlin class it is
/// seen as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JavaSuperType {
    pub java: ClassId,
    pub mapped: Option<ClassId>,
}

#[derive(Clone, Debug)]
pub struct JavaClassInfo {
    pub decl: DeclId,
    pub internal_name: String,
    pub supertypes: SmallVec<[JavaSuperType; 2]>,
}

/// Java classes loaded into one session, by their Java class id.
#[derive(Default)]
pub struct JavaClassIndex {
    classes: RwLock<FxHashMap<ClassId, Arc<JavaClassInfo>>>,
    /// Mapped-class method names whose allow-listed Java overloads and
    /// Kotlin functions disagree on arity.
    divergent_arity: Mutex<FxHashSet<(ClassId, Name)>>,
}

impl JavaClassIndex {
    pub fn get(&self, class_id: &ClassId) -> Option<Arc<JavaClassInfo>> {
        self.classes.read().get(class_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.classes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.read().is_empty()
    }

    fn insert(&self, class_id: ClassId, info: JavaClassInfo) {
        self.classes.write().insert(class_id, Arc::new(info));
    }

    pub fn has_divergent_arity(&self, class_id: &ClassId, name: Name) -> bool {
        self.divergent_arity.lock().contains(&(class_id.clone(), name))
    }

    /// Flagged `(class, method name)` pairs, in no particular order.
    pub fn divergent_arity(&self) -> Vec<(ClassId, Name)> {
        self.divergent_arity.lock().iter().cloned().collect()
    }

    pub(crate) fn flag_divergent_arity(&self, class_id: ClassId, name: Name) {
        self.divergent_arity.lock().insert((class_id, name));
    }
}

pub struct JavaClassLoader {
    mapping: Arc<JavaClassMapping>,
    index: Arc<JavaClassIndex>,
    /// Library file per dotted package name.
    package_files: RwLock<FxHashMap<String, DeclId>>,
}

impl JavaClassLoader {
    pub fn new(mapping: Arc<JavaClassMapping>, index: Arc<JavaClassIndex>) -> Self {
        JavaClassLoader {
            mapping,
            index,
            package_files: RwLock::new(FxHashMap::default()),
        }
    }

    pub fn mapping(&self) -> &Arc<JavaClassMapping> {
        &self.mapping
    }

    pub fn index(&self) -> &Arc<JavaClassIndex> {
        &self.index
    }

    /// Register a top-level Java class and its nested classes.
    pub fn load(&self, session: &FirSession, class: &JavaClass) -> Result<DeclId, JavaLoadError> {
        let simple = class.internal_name.rsplit('/').next().unwrap_or(&class.internal_name);
        if simple.contains('$') {
            return Err(JavaLoadError::NestedWithoutOuter(class.internal_name.clone()));
        }
        self.check_names(session, class)?;
        let package = match class.internal_name.rsplit_once('/') {
            Some((package, _)) => package.replace('/', "."),
            None => String::new(),
        };
        let builder = FirBuilder::new(session);
        let file = self.package_file(&builder, &package);
        let id = self.load_class(&builder, file, class)?;
        tracing::debug!(class = %class.internal_name, id = id.raw(), "loaded Java class");
        Ok(id)
    }

    /// Validate every name up front so a failed load registers nothing.
    fn check_names(&self, session: &FirSession, class: &JavaClass) -> Result<(), JavaLoadError> {
        let class_id = class_id_of(session.interner(), &class.internal_name)?;
        if session.class_symbol(&class_id).is_some() || self.index.get(&class_id).is_some() {
            return Err(JavaLoadError::DuplicateClass(class.internal_name.clone()));
        }
        for supertype in &class.supertypes {
            if let JavaType::Class { internal_name, .. } = supertype {
                class_id_of(session.interner(), internal_name)?;
            }
        }
        for nested in &class.nested {
            let direct = nested
                .internal_name
                .strip_prefix(class.internal_name.as_str())
                .and_then(|rest| rest.strip_prefix('$'))
                .is_some_and(|rest| !rest.is_empty() && !rest.contains(['$', '/']));
            if !direct {
                return Err(JavaLoadError::InvalidInternalName(nested.internal_name.clone()));
            }
            self.check_names(session, nested)?;
        }
        Ok(())
    }

    fn package_file(&self, builder: &FirBuilder<'_>, package: &str) -> DeclId {
        if let Some(file) = self.package_files.read().get(package) {
            return *file;
        }
        *self
            .package_files
            .write()
            .entry(package.to_owned())
            .or_insert_with(|| builder.library_file(&format!("{package}.java"), package))
    }

    fn load_class(&self, builder: &FirBuilder<'_>, owner: DeclId, class: &JavaClass) -> Result<DeclId, JavaLoadError> {
        let session = builder.session();
        let interner: &StringInterner = session.interner();
        let (kind, modality) = match class.kind {
            JavaClassKind::Interface => (ClassKind::Interface, Modality::Abstract),
            JavaClassKind::Class if class.is_abstract => (ClassKind::Class, Modality::Abstract),
            JavaClassKind::Class if class.is_final => (ClassKind::Class, Modality::Final),
            JavaClassKind::Class => (ClassKind::Class, Modality::Open),
        };
        let mut class_builder = builder
            .class(owner, class.simple_name())
            .kind(kind)
            .origin(DeclarationOrigin::Java)
            .modality(modality);
        for parameter in &class.type_parameters {
            class_builder = class_builder.type_parameter(
                &parameter.name,
                Variance::Invariant,
                self.bounds(interner, parameter),
            );
        }
        let mut supertypes = SmallVec::new();
        for supertype in &class.supertypes {
            class_builder = class_builder.super_type(self.mapping.type_ref(interner, supertype));
            if let JavaType::Class { internal_name, .. } = supertype {
                supertypes.push(JavaSuperType {
                    java: class_id_of(interner, internal_name)?,
                    mapped: self.mapping.to_kotlin(internal_name).cloned(),
                });
            }
        }
        let id = class_builder.build();

        for field in &class.fields {
            builder
                .property(id, &field.name)
                .origin(DeclarationOrigin::Java)
                .mutable(!field.is_final)
                .returns(self.mapping.type_ref(interner, &field.ty))
                .build();
        }
        for constructor in &class.constructors {
            let mut constructor_builder = builder.constructor(id).origin(DeclarationOrigin::Java);
            for parameter in &constructor.parameters {
                constructor_builder =
                    constructor_builder.parameter(&parameter.name, self.mapping.type_ref(interner, &parameter.ty));
            }
            constructor_builder.build();
        }
        for method in &class.methods {
            self.load_method(builder, id, method);
        }
        for nested in &class.nested {
            self.load_class(builder, id, nested)?;
        }

        let class_id = class_id_of(interner, &class.internal_name)?;
        self.index.insert(
            class_id,
            JavaClassInfo {
                decl: id,
                internal_name: class.internal_name.clone(),
                supertypes,
            },
        );
        Ok(id)
    }

    fn load_method(&self, builder: &FirBuilder<'_>, class: DeclId, method: &JavaMethod) {
        let interner: &StringInterner = builder.session().interner();
        let modality = if method.is_abstract {
            Modality::Abstract
        } else if method.is_final {
            Modality::Final
        } else {
            Modality::Open
        };
        let mut function = builder
            .function(class, &method.name)
            .origin(DeclarationOrigin::Java)
            .modality(modality);
        for parameter in &method.type_parameters {
            function = function.type_parameter(&parameter.name, self.bounds(interner, parameter));
        }
        for parameter in &method.parameters {
            let type_ref = self.mapping.type_ref(interner, &parameter.ty);
            function = if parameter.is_vararg {
                function.vararg_parameter(&parameter.name, type_ref)
            } else {
                function.parameter(&parameter.name, type_ref)
            };
        }
        function.returns(self.mapping.type_ref(interner, &method.return_type)).build();
    }

    fn bounds(&self, interner: &StringInterner, parameter: &JavaTypeParameter) -> Vec<FirTypeRef> {
        parameter
            .bounds
            .iter()
            .map(|bound| self.mapping.type_ref(interner, bound))
            .collect()
    }
}
