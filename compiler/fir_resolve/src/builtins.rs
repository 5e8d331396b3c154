//! The builtin library every session starts with.
//!
//! Declared with the ordinary builder in two library files (`kotlin` and
//! `kotlin.collections`) and resolved through the ordinary phases right
//! away, so builtins look exactly like resolved user code.

use fir_tree::{ClassKind, DeclId, DeclarationFlags, DeclarationOrigin, Modality, ResolvePhase, Variance};

use crate::builder::FirBuilder;
use crate::phases::resolve_tree;
use crate::FirSession;

struct Library<'b, 's> {
    b: &'b FirBuilder<'s>,
}

impl Library<'_, '_> {
    fn class(&self, owner: DeclId, name: &str, kind: ClassKind) -> crate::ClassBuilder<'_, '_> {
        self.b.class(owner, name).kind(kind).origin(DeclarationOrigin::Library)
    }

    fn function(&self, owner: DeclId, name: &str) -> crate::FunctionBuilder<'_, '_> {
        self.b.function(owner, name).origin(DeclarationOrigin::Library)
    }

    fn property(&self, owner: DeclId, name: &str, ty: &str) {
        self.b
            .property(owner, name)
            .origin(DeclarationOrigin::Library)
            .returns(self.b.user_type(ty))
            .build();
    }

    /// `fun name(other: parameter): result`
    fn binary(&self, owner: DeclId, name: &str, parameter: &str, result: &str) {
        self.function(owner, name)
            .parameter("other", self.b.user_type(parameter))
            .returns(self.b.user_type(result))
            .build();
    }

    fn nullary(&self, owner: DeclId, name: &str, result: &str) {
        self.function(owner, name).returns(self.b.user_type(result)).build();
    }

    fn number(&self, file: DeclId, name: &str) {
        let b = self.b;
        let class = self
            .class(file, name, ClassKind::Class)
            .super_type(b.user_type("Number"))
            .super_type(b.generic_type("Comparable", vec![b.user_type(name)]))
            .build();
        for operator in ["plus", "minus", "times"] {
            self.function(class, operator)
                .flags(DeclarationFlags::OPERATOR)
                .parameter("other", b.user_type(name))
                .returns(b.user_type(name))
                .build();
        }
        self.function(class, "compareTo")
            .flags(DeclarationFlags::OPERATOR | DeclarationFlags::OVERRIDE)
            .parameter("other", b.user_type(name))
            .returns(b.user_type("Int"))
            .build();
    }

    fn kotlin_package(&self) -> DeclId {
        let b = self.b;
        let file = b.library_file("builtins.kt", "kotlin");
        b.star_import(file, "kotlin.collections");

        let any = self.class(file, "Any", ClassKind::Class).modality(Modality::Open).build();
        self.function(any, "equals")
            .modality(Modality::Open)
            .flags(DeclarationFlags::OPERATOR)
            .parameter("other", b.user_type("Any?"))
            .returns(b.user_type("Boolean"))
            .build();
        self.function(any, "hashCode")
            .modality(Modality::Open)
            .returns(b.user_type("Int"))
            .build();
        self.function(any, "toString")
            .modality(Modality::Open)
            .returns(b.user_type("String"))
            .build();

        self.class(file, "Nothing", ClassKind::Class).build();
        self.class(file, "Unit", ClassKind::Object).build();

        let boolean = self.class(file, "Boolean", ClassKind::Class).build();
        self.function(boolean, "not")
            .flags(DeclarationFlags::OPERATOR)
            .returns(b.user_type("Boolean"))
            .build();
        self.binary(boolean, "and", "Boolean", "Boolean");
        self.binary(boolean, "or", "Boolean", "Boolean");

        let comparable = self
            .class(file, "Comparable", ClassKind::Interface)
            .type_parameter("T", Variance::In, Vec::new())
            .build();
        self.function(comparable, "compareTo")
            .flags(DeclarationFlags::OPERATOR)
            .parameter("other", b.user_type("T"))
            .returns(b.user_type("Int"))
            .build();

        let number = self
            .class(file, "Number", ClassKind::Class)
            .modality(Modality::Abstract)
            .build();
        self.nullary(number, "toInt", "Int");
        self.nullary(number, "toLong", "Long");
        self.nullary(number, "toDouble", "Double");
        for name in ["Int", "Long", "Double"] {
            self.number(file, name);
        }

        let char = self
            .class(file, "Char", ClassKind::Class)
            .super_type(b.generic_type("Comparable", vec![b.user_type("Char")]))
            .build();
        self.binary(char, "compareTo", "Char", "Int");

        let char_sequence = self.class(file, "CharSequence", ClassKind::Interface).build();
        self.property(char_sequence, "length", "Int");

        let string = self
            .class(file, "String", ClassKind::Class)
            .super_type(b.generic_type("Comparable", vec![b.user_type("String")]))
            .super_type(b.user_type("CharSequence"))
            .build();
        self.binary(string, "plus", "Any?", "String");
        self.binary(string, "compareTo", "String", "Int");
        self.property(string, "length", "Int");

        let throwable = self
            .class(file, "Throwable", ClassKind::Class)
            .modality(Modality::Open)
            .build();
        self.property(throwable, "message", "String?");
        b.constructor(throwable).origin(DeclarationOrigin::Library).build();
        b.constructor(throwable)
            .origin(DeclarationOrigin::Library)
            .parameter("message", b.user_type("String?"))
            .build();
        let exception = self
            .class(file, "Exception", ClassKind::Class)
            .modality(Modality::Open)
            .super_type(b.user_type("Throwable"))
            .build();
        b.constructor(exception).origin(DeclarationOrigin::Library).build();
        b.constructor(exception)
            .origin(DeclarationOrigin::Library)
            .parameter("message", b.user_type("String?"))
            .build();

        let array = self
            .class(file, "Array", ClassKind::Class)
            .type_parameter("T", Variance::Invariant, Vec::new())
            .build();
        self.property(array, "size", "Int");
        self.function(array, "get")
            .flags(DeclarationFlags::OPERATOR)
            .parameter("index", b.user_type("Int"))
            .returns(b.user_type("T"))
            .build();

        for arity in 0..=self.b.session().config().max_function_arity {
            self.function_class(file, arity);
        }

        self.function(file, "TODO").returns(b.user_type("Nothing")).build();
        self.function(file, "error")
            .parameter("message", b.user_type("Any"))
            .returns(b.user_type("Nothing"))
            .build();
        file
    }

    /// `interface FunctionN<in P1, ..., in PN, out R> { fun invoke(p1: P1, ...): R }`
    fn function_class(&self, file: DeclId, arity: usize) {
        let b = self.b;
        let mut class = self.class(file, &format!("Function{arity}"), ClassKind::Interface);
        for index in 1..=arity {
            class = class.type_parameter(&format!("P{index}"), Variance::In, Vec::new());
        }
        let class = class.type_parameter("R", Variance::Out, Vec::new()).build();
        let mut invoke = self
            .function(class, "invoke")
            .flags(DeclarationFlags::OPERATOR)
            .returns(b.user_type("R"));
        for index in 1..=arity {
            invoke = invoke.parameter(&format!("p{index}"), b.user_type(&format!("P{index}")));
        }
        invoke.build();
    }

    fn collections_package(&self) -> DeclId {
        let b = self.b;
        let file = b.library_file("collections.kt", "kotlin.collections");
        b.star_import(file, "kotlin");

        self.class(file, "Iterable", ClassKind::Interface)
            .type_parameter("T", Variance::Out, Vec::new())
            .build();
        let collection = self
            .class(file, "Collection", ClassKind::Interface)
            .type_parameter("E", Variance::Out, Vec::new())
            .super_type(b.generic_type("Iterable", vec![b.user_type("E")]))
            .build();
        self.property(collection, "size", "Int");
        let list = self
            .class(file, "List", ClassKind::Interface)
            .type_parameter("E", Variance::Out, Vec::new())
            .super_type(b.generic_type("Collection", vec![b.user_type("E")]))
            .build();
        self.function(list, "get")
            .flags(DeclarationFlags::OPERATOR)
            .parameter("index", b.user_type("Int"))
            .returns(b.user_type("E"))
            .build();
        let map = self
            .class(file, "Map", ClassKind::Interface)
            .type_parameter("K", Variance::Invariant, Vec::new())
            .type_parameter("V", Variance::Out, Vec::new())
            .build();
        self.function(map, "get")
            .flags(DeclarationFlags::OPERATOR)
            .parameter("key", b.user_type("K"))
            .returns(b.user_type("V?"))
            .build();

        self.function(file, "listOf")
            .type_parameter("T", Vec::new())
            .vararg_parameter("elements", b.user_type("T"))
            .returns(b.generic_type("List", vec![b.user_type("T")]))
            .build();
        self.function(file, "emptyList")
            .type_parameter("T", Vec::new())
            .returns(b.generic_type("List", vec![b.user_type("T")]))
            .build();
        file
    }
}

/// Declare and resolve the builtin library in `session`.
pub(crate) fn register_builtins(session: &FirSession) {
    let _span = tracing::debug_span!("register_builtins", session = session.id().raw()).entered();
    let builder = FirBuilder::new(session);
    let library = Library { b: &builder };
    let files = [library.kotlin_package(), library.collections_package()];
    for file in files {
        if let Err(error) = resolve_tree(session, file, ResolvePhase::BodyResolve) {
            tracing::warn!(%error, "builtin library did not resolve");
        }
    }
}
