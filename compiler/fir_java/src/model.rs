//! Java classes as a class-file reader would present them.
//!
//! Names are JVM internal names (`java/util/Map$Entry`). Nested classes
//! are listed inside their outer class and use the `$`-joined name.

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum JavaPrimitive {
    Boolean,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl JavaPrimitive {
    pub const ALL: [JavaPrimitive; 8] = [
        JavaPrimitive::Boolean,
        JavaPrimitive::Char,
        JavaPrimitive::Byte,
        JavaPrimitive::Short,
        JavaPrimitive::Int,
        JavaPrimitive::Long,
        JavaPrimitive::Float,
        JavaPrimitive::Double,
    ];

    /// Field descriptor letter.
    pub fn descriptor(self) -> char {
        match self {
            JavaPrimitive::Boolean => 'Z',
            JavaPrimitive::Char => 'C',
            JavaPrimitive::Byte => 'B',
            JavaPrimitive::Short => 'S',
            JavaPrimitive::Int => 'I',
            JavaPrimitive::Long => 'J',
            JavaPrimitive::Float => 'F',
            JavaPrimitive::Double => 'D',
        }
    }

    pub fn from_descriptor(letter: char) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.descriptor() == letter)
    }

    /// Simple name of the Kotlin class in package `kotlin`.
    pub fn kotlin_name(self) -> &'static str {
        match self {
            JavaPrimitive::Boolean => "Boolean",
            JavaPrimitive::Char => "Char",
            JavaPrimitive::Byte => "Byte",
            JavaPrimitive::Short => "Short",
            JavaPrimitive::Int => "Int",
            JavaPrimitive::Long => "Long",
            JavaPrimitive::Float => "Float",
            JavaPrimitive::Double => "Double",
        }
    }

    /// Internal name of the boxed class.
    pub fn wrapper(self) -> &'static str {
        match self {
            JavaPrimitive::Boolean => "java/lang/Boolean",
            JavaPrimitive::Char => "java/lang/Character",
            JavaPrimitive::Byte => "java/lang/Byte",
            JavaPrimitive::Short => "java/lang/Short",
            JavaPrimitive::Int => "java/lang/Integer",
            JavaPrimitive::Long => "java/lang/Long",
            JavaPrimitive::Float => "java/lang/Float",
            JavaPrimitive::Double => "java/lang/Double",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JavaType {
    /// Only meaningful as a method return type.
    Void,
    Primitive(JavaPrimitive),
    Class {
        internal_name: String,
        arguments: Vec<JavaTypeArgument>,
    },
    Array(Box<JavaType>),
    TypeParameter(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JavaTypeArgument {
    Type(JavaType),
    /// `? extends T`
    Extends(JavaType),
    /// `? super T`
    Super(JavaType),
    /// `?`
    Wildcard,
}

impl JavaType {
    pub fn class(internal_name: &str) -> Self {
        JavaType::generic(internal_name, Vec::new())
    }

    pub fn generic(internal_name: &str, arguments: Vec<JavaType>) -> Self {
        JavaType::Class {
            internal_name: internal_name.to_owned(),
            arguments: arguments.into_iter().map(JavaTypeArgument::Type).collect(),
        }
    }

    pub fn array(element: JavaType) -> Self {
        JavaType::Array(Box::new(element))
    }

    pub fn type_parameter(name: &str) -> Self {
        JavaType::TypeParameter(name.to_owned())
    }

    /// Whether resolving this type needs a type-parameter scope.
    pub fn mentions_type_parameters(&self) -> bool {
        match self {
            JavaType::Void | JavaType::Primitive(_) => false,
            JavaType::TypeParameter(_) => true,
            JavaType::Array(element) => element.mentions_type_parameters(),
            JavaType::Class { arguments, .. } => arguments.iter().any(|argument| match argument {
                JavaTypeArgument::Type(ty) | JavaTypeArgument::Extends(ty) | JavaTypeArgument::Super(ty) => {
                    ty.mentions_type_parameters()
                }
                JavaTypeArgument::Wildcard => false,
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JavaTypeParameter {
    pub name: String,
    pub bounds: Vec<JavaType>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JavaValueParameter {
    pub name: String,
    pub ty: JavaType,
    pub is_vararg: bool,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum JavaClassKind {
    #[default]
    Class,
    Interface,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JavaMethod {
    pub name: String,
    pub type_parameters: Vec<JavaTypeParameter>,
    pub parameters: Vec<JavaValueParameter>,
    pub return_type: JavaType,
    pub is_abstract: bool,
    pub is_final: bool,
}

impl JavaMethod {
    pub fn new(name: &str, return_type: JavaType) -> Self {
        JavaMethod {
            name: name.to_owned(),
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            return_type,
            is_abstract: false,
            is_final: false,
        }
    }

    #[must_use]
    pub fn type_parameter(mut self, name: &str, bounds: Vec<JavaType>) -> Self {
        self.type_parameters.push(JavaTypeParameter {
            name: name.to_owned(),
            bounds,
        });
        self
    }

    #[must_use]
    pub fn parameter(mut self, name: &str, ty: JavaType) -> Self {
        self.parameters.push(JavaValueParameter {
            name: name.to_owned(),
            ty,
            is_vararg: false,
        });
        self
    }

    /// `T... name`; `ty` is the element type.
    #[must_use]
    pub fn vararg_parameter(mut self, name: &str, ty: JavaType) -> Self {
        self.parameters.push(JavaValueParameter {
            name: name.to_owned(),
            ty,
            is_vararg: true,
        });
        self
    }

    #[must_use]
    pub fn abstract_method(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    #[must_use]
    pub fn final_method(mut self) -> Self {
        self.is_final = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JavaField {
    pub name: String,
    pub ty: JavaType,
    pub is_final: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JavaConstructor {
    pub parameters: Vec<JavaValueParameter>,
}

impl JavaConstructor {
    #[must_use]
    pub fn parameter(mut self, name: &str, ty: JavaType) -> Self {
        self.parameters.push(JavaValueParameter {
            name: name.to_owned(),
            ty,
            is_vararg: false,
        });
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JavaClass {
    pub internal_name: String,
    pub kind: JavaClassKind,
    pub is_abstract: bool,
    pub is_final: bool,
    pub type_parameters: Vec<JavaTypeParameter>,
    /// Superclass first, then interfaces, as in the class file.
    pub supertypes: Vec<JavaType>,
    pub methods: Vec<JavaMethod>,
    pub fields: Vec<JavaField>,
    pub constructors: Vec<JavaConstructor>,
    pub nested: Vec<JavaClass>,
}

impl JavaClass {
    pub fn new(internal_name: &str, kind: JavaClassKind) -> Self {
        JavaClass {
            internal_name: internal_name.to_owned(),
            kind,
            is_abstract: false,
            is_final: false,
            type_parameters: Vec::new(),
            supertypes: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
            nested: Vec::new(),
        }
    }

    /// Name after the last `/` and `$`.
    pub fn simple_name(&self) -> &str {
        let after_package = self.internal_name.rsplit('/').next().unwrap_or(&self.internal_name);
        after_package.rsplit('$').next().unwrap_or(after_package)
    }

    #[must_use]
    pub fn type_parameter(mut self, name: &str, bounds: Vec<JavaType>) -> Self {
        self.type_parameters.push(JavaTypeParameter {
            name: name.to_owned(),
            bounds,
        });
        self
    }

    #[must_use]
    pub fn super_type(mut self, ty: JavaType) -> Self {
        self.supertypes.push(ty);
        self
    }

    #[must_use]
    pub fn method(mut self, method: JavaMethod) -> Self {
        self.methods.push(method);
        self
    }

    #[must_use]
    pub fn field(mut self, name: &str, ty: JavaType, is_final: bool) -> Self {
        self.fields.push(JavaField {
            name: name.to_owned(),
            ty,
            is_final,
        });
        self
    }

    #[must_use]
    pub fn constructor(mut self, constructor: JavaConstructor) -> Self {
        self.constructors.push(constructor);
        self
    }

    #[must_use]
    pub fn nested_class(mut self, class: JavaClass) -> Self {
        self.nested.push(class);
        self
    }

    #[must_use]
    pub fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    #[must_use]
    pub fn final_class(mut self) -> Self {
        self.is_final = true;
        self
    }
}
