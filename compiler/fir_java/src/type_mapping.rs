//! Java ↔ Kotlin class mapping and Java type conversion.
//!
//! Java types become not-null Kotlin types. Classes with a Kotlin
//! counterpart (`java/lang/String`, `java/util/List`, boxed primitives)
//! are replaced by it; everything else keeps its own class id.
//!
//! A converted type that mentions a Java type parameter is emitted as a
//! user type ref so the types phase binds the parameter in its
//! declaration's scope. Everything else is resolved on the spot.

use fir_tree::{
    ClassId, ConeType, ConeTypeProjection, FirQualifierPart, FirTypeProjection, FirTypeRef, FirUserTypeRef,
    StringInterner, StringLookup, Variance,
};
use rustc_hash::FxHashMap;

use crate::error::JavaLoadError;
use crate::model::{JavaPrimitive, JavaType, JavaTypeArgument};

/// Java classes that Kotlin code sees as a Kotlin class.
const MAPPED_CLASSES: &[(&str, &str)] = &[
    ("java/lang/Object", "kotlin/Any"),
    ("java/lang/String", "kotlin/String"),
    ("java/lang/CharSequence", "kotlin/CharSequence"),
    ("java/lang/Comparable", "kotlin/Comparable"),
    ("java/lang/Number", "kotlin/Number"),
    ("java/lang/Throwable", "kotlin/Throwable"),
    ("java/lang/Exception", "kotlin/Exception"),
    ("java/lang/Iterable", "kotlin/collections/Iterable"),
    ("java/util/Collection", "kotlin/collections/Collection"),
    ("java/util/List", "kotlin/collections/List"),
    ("java/util/Map", "kotlin/collections/Map"),
];

/// `java/util/Map$Entry` as the class id `java/util/Map.Entry`.
pub fn class_id_of(interner: &StringInterner, internal_name: &str) -> Result<ClassId, JavaLoadError> {
    let simple = internal_name.rsplit('/').next().unwrap_or(internal_name);
    let malformed = internal_name.is_empty()
        || simple.is_empty()
        || internal_name.contains(['.', ';', '[', '(', ')'])
        || internal_name.split('/').any(str::is_empty)
        || simple.split('$').any(str::is_empty);
    if malformed {
        return Err(JavaLoadError::InvalidInternalName(internal_name.to_owned()));
    }
    Ok(ClassId::parse(interner, &internal_name.replace('$', ".")))
}

/// Inverse of [`class_id_of`].
pub fn internal_name_of(names: &dyn StringLookup, class_id: &ClassId) -> String {
    class_id.render(names).replace('.', "$")
}

pub struct JavaClassMapping {
    to_kotlin: FxHashMap<String, ClassId>,
    to_java: FxHashMap<ClassId, String>,
    primitives: FxHashMap<ClassId, JavaPrimitive>,
    primitive_arrays: FxHashMap<ClassId, JavaPrimitive>,
    unit: ClassId,
    nothing: ClassId,
    array: ClassId,
}

impl JavaClassMapping {
    pub fn new(interner: &StringInterner) -> Self {
        let kotlin = |rendered: &str| ClassId::parse(interner, rendered);
        let mut to_kotlin = FxHashMap::default();
        let mut to_java = FxHashMap::default();
        for &(java, kotlin_id) in MAPPED_CLASSES {
            let id = kotlin(kotlin_id);
            to_kotlin.insert(java.to_owned(), id.clone());
            to_java.insert(id, java.to_owned());
        }
        let mut primitives = FxHashMap::default();
        let mut primitive_arrays = FxHashMap::default();
        for primitive in JavaPrimitive::ALL {
            let id = kotlin(&format!("kotlin/{}", primitive.kotlin_name()));
            to_kotlin.insert(primitive.wrapper().to_owned(), id.clone());
            to_java.insert(id.clone(), primitive.wrapper().to_owned());
            primitives.insert(id, primitive);
            primitive_arrays.insert(kotlin(&format!("kotlin/{}Array", primitive.kotlin_name())), primitive);
        }
        JavaClassMapping {
            to_kotlin,
            to_java,
            primitives,
            primitive_arrays,
            unit: kotlin("kotlin/Unit"),
            nothing: kotlin("kotlin/Nothing"),
            array: kotlin("kotlin/Array"),
        }
    }

    /// The Kotlin class a Java class is seen as, if it is mapped.
    pub fn to_kotlin(&self, internal_name: &str) -> Option<&ClassId> {
        self.to_kotlin.get(internal_name)
    }

    /// Internal name of the Java class behind `class_id`. Mapped Kotlin
    /// classes give their Java counterpart, primitives their wrapper.
    pub fn java_internal_name(&self, names: &dyn StringLookup, class_id: &ClassId) -> String {
        self.to_java
            .get(class_id)
            .cloned()
            .unwrap_or_else(|| internal_name_of(names, class_id))
    }

    pub fn primitive(&self, class_id: &ClassId) -> Option<JavaPrimitive> {
        self.primitives.get(class_id).copied()
    }

    /// `kotlin/IntArray` and friends.
    pub fn primitive_array(&self, class_id: &ClassId) -> Option<JavaPrimitive> {
        self.primitive_arrays.get(class_id).copied()
    }

    pub fn unit(&self) -> &ClassId {
        &self.unit
    }

    pub fn nothing(&self) -> &ClassId {
        &self.nothing
    }

    pub fn array(&self) -> &ClassId {
        &self.array
    }

    fn primitive_class(&self, primitive: JavaPrimitive, array: bool) -> Option<&ClassId> {
        let table = if array { &self.primitive_arrays } else { &self.primitives };
        table.iter().find(|(_, p)| **p == primitive).map(|(id, _)| id)
    }

    /// The Kotlin class a Java class reference stands for.
    pub fn kotlin_class(&self, interner: &StringInterner, internal_name: &str) -> Result<ClassId, JavaLoadError> {
        match self.to_kotlin(internal_name) {
            Some(id) => Ok(id.clone()),
            None => class_id_of(interner, internal_name),
        }
    }

    /// Not-null Kotlin type of a Java type that mentions no type parameters.
    pub fn cone_type(&self, interner: &StringInterner, ty: &JavaType) -> ConeType {
        match ty {
            JavaType::Void => ConeType::simple(self.unit.clone()),
            JavaType::Primitive(primitive) => self.primitive_type(*primitive, false),
            JavaType::Array(element) => match element.as_ref() {
                JavaType::Primitive(primitive) => self.primitive_type(*primitive, true),
                element => ConeType::class(
                    self.array.clone(),
                    vec![ConeTypeProjection::invariant(self.cone_type(interner, element))],
                    false,
                ),
            },
            JavaType::Class {
                internal_name,
                arguments,
            } => match self.kotlin_class(interner, internal_name) {
                Ok(class_id) => {
                    let arguments = arguments.iter().map(|a| self.cone_projection(interner, a)).collect();
                    ConeType::class(class_id, arguments, false)
                }
                Err(error) => ConeType::error(error.to_string()),
            },
            JavaType::TypeParameter(name) => ConeType::error(format!("Unbound Java type parameter {name}")),
        }
    }

    fn primitive_type(&self, primitive: JavaPrimitive, array: bool) -> ConeType {
        match self.primitive_class(primitive, array) {
            Some(id) => ConeType::simple(id.clone()),
            None => ConeType::error(format!("No Kotlin class for {primitive:?}")),
        }
    }

    fn cone_projection(&self, interner: &StringInterner, argument: &JavaTypeArgument) -> ConeTypeProjection {
        match argument {
            JavaTypeArgument::Type(ty) => ConeTypeProjection::invariant(self.cone_type(interner, ty)),
            JavaTypeArgument::Extends(ty) => ConeTypeProjection::Type {
                variance: Variance::Out,
                ty: self.cone_type(interner, ty),
            },
            JavaTypeArgument::Super(ty) => ConeTypeProjection::Type {
                variance: Variance::In,
                ty: self.cone_type(interner, ty),
            },
            JavaTypeArgument::Wildcard => ConeTypeProjection::Star,
        }
    }

    /// Type ref for a Java type used in a member or supertype position.
    pub fn type_ref(&self, interner: &StringInterner, ty: &JavaType) -> FirTypeRef {
        if !ty.mentions_type_parameters() {
            return FirTypeRef::resolved(self.cone_type(interner, ty));
        }
        match ty {
            JavaType::TypeParameter(name) => user_type(vec![FirQualifierPart::simple(interner.intern(name))]),
            JavaType::Array(element) => {
                let class_id = self.array.clone();
                self.qualified(&class_id, vec![self.projection_ref(interner, &JavaTypeArgument::Type((**element).clone()))])
            }
            JavaType::Class {
                internal_name,
                arguments,
            } => match self.kotlin_class(interner, internal_name) {
                Ok(class_id) => {
                    let arguments = arguments.iter().map(|a| self.projection_ref(interner, a)).collect();
                    self.qualified(&class_id, arguments)
                }
                Err(error) => FirTypeRef::error(error.to_string()),
            },
            JavaType::Void | JavaType::Primitive(_) => FirTypeRef::resolved(self.cone_type(interner, ty)),
        }
    }

    fn projection_ref(&self, interner: &StringInterner, argument: &JavaTypeArgument) -> FirTypeProjection {
        let (variance, ty) = match argument {
            JavaTypeArgument::Type(ty) => (Variance::Invariant, ty),
            JavaTypeArgument::Extends(ty) => (Variance::Out, ty),
            JavaTypeArgument::Super(ty) => (Variance::In, ty),
            JavaTypeArgument::Wildcard => return FirTypeProjection::Star,
        };
        FirTypeProjection::Type {
            variance,
            type_ref: self.type_ref(interner, ty),
        }
    }

    /// A fully qualified user type whose last segment carries `arguments`.
    fn qualified(&self, class_id: &ClassId, arguments: Vec<FirTypeProjection>) -> FirTypeRef {
        let mut qualifier: Vec<FirQualifierPart> = class_id
            .as_fq_name()
            .segments()
            .iter()
            .map(|name| FirQualifierPart::simple(*name))
            .collect();
        if let Some(last) = qualifier.last_mut() {
            last.type_arguments = arguments;
        }
        user_type(qualifier)
    }
}

fn user_type(qualifier: Vec<FirQualifierPart>) -> FirTypeRef {
    FirTypeRef::User(FirUserTypeRef {
        qualifier,
        nullable: false,
    })
}
