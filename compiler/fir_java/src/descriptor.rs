//! JVM method descriptors of resolved functions.
//!
//! # Format
//!
//! ```text
//! <name>(<parameter descriptors>)<return descriptor>
//! ```
//!
//! | Kotlin type | Descriptor |
//! |-------------|------------|
//! | `Unit` as a return type | `V` |
//! | `Int`, `Boolean`, ... | `I`, `Z`, ... |
//! | `Int?` | `Ljava/lang/Integer;` |
//! | `String`, `List<T>` | `Ljava/lang/String;`, `Ljava/util/List;` |
//! | `Array<T>`, `IntArray` | `[` + element, `[I` |
//! | type parameter `T : Bound` | erasure of `Bound`, else `Ljava/lang/Object;` |
//!
//! An extension receiver is the first parameter; a `vararg` parameter is an
//! array of its element type.

use std::fmt;

use fir_resolve::phases::ensure_at_least;
use fir_resolve::{FirSession, SessionTypeContext, TypeContext};
use fir_tree::{ConeType, FirDeclaration, FirTypeRef, FirValueParameter, FunctionSymbol, ResolvePhase};

use crate::type_mapping::JavaClassMapping;

const OBJECT: &str = "java/lang/Object";
const VOID_CLASS: &str = "java/lang/Void";
/// Stands in for types that failed to resolve.
const ERROR_CLASS: &str = "error/NonExistentClass";
/// Bounds of bounds are followed this deep before erasing to `Object`.
const MAX_ERASURE_DEPTH: usize = 16;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct JvmMethodDescriptor {
    pub name: String,
    /// Concatenated parameter descriptors, without parentheses.
    pub parameters: String,
    pub return_type: String,
}

impl JvmMethodDescriptor {
    /// `name(params)`: what an override must match. Java allows covariant
    /// return types, so the return descriptor is left out.
    pub fn override_key(&self) -> String {
        format!("{}({})", self.name, self.parameters)
    }

    pub fn arity(&self) -> usize {
        count_parameters(&self.parameters)
    }
}

impl fmt::Display for JvmMethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}){}", self.name, self.parameters, self.return_type)
    }
}

/// Number of parameter descriptors in an already well-formed list.
fn count_parameters(parameters: &str) -> usize {
    let mut count = 0;
    let mut chars = parameters.chars();
    while let Some(c) = chars.next() {
        match c {
            '[' => continue,
            'L' => {
                for c in chars.by_ref() {
                    if c == ';' {
                        break;
                    }
                }
                count += 1;
            }
            _ => count += 1,
        }
    }
    count
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Position {
    Parameter,
    Return,
    /// Array elements and erased bounds are always references.
    Boxed,
}

/// Writes descriptors for one session.
pub struct DescriptorWriter<'a> {
    session: &'a FirSession,
    mapping: &'a JavaClassMapping,
}

impl<'a> DescriptorWriter<'a> {
    pub fn new(session: &'a FirSession, mapping: &'a JavaClassMapping) -> Self {
        DescriptorWriter { session, mapping }
    }

    /// Descriptor of a function or constructor, with its signature types
    /// resolved first.
    pub fn method(&self, symbol: FunctionSymbol) -> Option<JvmMethodDescriptor> {
        ensure_at_least(self.session, symbol.0, ResolvePhase::Types);
        let init = self.session.special_names().init;
        self.session
            .declarations()
            .with(symbol.0, |declaration| match declaration {
                FirDeclaration::SimpleFunction(function) => {
                    let mut parameters = String::with_capacity(32);
                    if let Some(receiver) = function.receiver_type_ref() {
                        self.write_ref(&mut parameters, receiver, Position::Parameter);
                    }
                    for parameter in function.value_parameters() {
                        self.write_parameter(&mut parameters, parameter);
                    }
                    let mut return_type = String::with_capacity(16);
                    self.write_ref(&mut return_type, function.return_type_ref(), Position::Return);
                    Some(JvmMethodDescriptor {
                        name: self.session.text(function.name()).to_owned(),
                        parameters,
                        return_type,
                    })
                }
                FirDeclaration::Constructor(constructor) => {
                    let mut parameters = String::with_capacity(32);
                    for parameter in constructor.value_parameters() {
                        self.write_parameter(&mut parameters, parameter);
                    }
                    Some(JvmMethodDescriptor {
                        name: self.session.text(init).to_owned(),
                        parameters,
                        return_type: "V".to_owned(),
                    })
                }
                _ => None,
            })
            .flatten()
    }

    /// Field descriptor of a type in parameter position.
    pub fn type_descriptor(&self, ty: &ConeType) -> String {
        let mut out = String::with_capacity(24);
        self.write_type(&mut out, ty, Position::Parameter, 0);
        out
    }

    /// `vararg x: T` is passed as an array of `T`.
    fn write_parameter(&self, out: &mut String, parameter: &FirValueParameter) {
        if parameter.is_vararg() {
            out.push('[');
        }
        self.write_ref(out, parameter.return_type_ref(), Position::Parameter);
    }

    fn write_ref(&self, out: &mut String, type_ref: &FirTypeRef, position: Position) {
        self.write_type(out, &type_ref.cone_type_or_error(), position, 0);
    }

    fn write_type(&self, out: &mut String, ty: &ConeType, position: Position, depth: usize) {
        match ty {
            ConeType::Error(_) => write_object(out, ERROR_CLASS),
            ConeType::TypeParameter { symbol, .. } => {
                let bounds = SessionTypeContext::new(self.session).type_parameter_bounds(symbol);
                match bounds.first() {
                    Some(bound) if depth < MAX_ERASURE_DEPTH => {
                        self.write_type(out, bound, Position::Boxed, depth + 1);
                    }
                    _ => write_object(out, OBJECT),
                }
            }
            ConeType::Class(class) => {
                let id = &class.lookup_tag;
                let mapping = self.mapping;
                if id == mapping.unit() && !class.nullable && position == Position::Return {
                    out.push('V');
                } else if let Some(primitive) = mapping.primitive(id) {
                    if class.nullable || position == Position::Boxed {
                        write_object(out, primitive.wrapper());
                    } else {
                        out.push(primitive.descriptor());
                    }
                } else if let Some(primitive) = mapping.primitive_array(id) {
                    out.push('[');
                    out.push(primitive.descriptor());
                } else if id == mapping.array() {
                    out.push('[');
                    match class.type_arguments.first().and_then(|a| a.ty()) {
                        Some(element) if depth < MAX_ERASURE_DEPTH => {
                            self.write_type(out, element, Position::Boxed, depth + 1);
                        }
                        _ => write_object(out, OBJECT),
                    }
                } else if id == mapping.nothing() {
                    write_object(out, VOID_CLASS);
                } else {
                    write_object(out, &mapping.java_internal_name(self.session, id));
                }
            }
        }
    }
}

fn write_object(out: &mut String, internal_name: &str) {
    out.push('L');
    out.push_str(internal_name);
    out.push(';');
}
