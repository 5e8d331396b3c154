//! Element kinds and the categories they belong to.
//!
//! The categories overlap: an anonymous function is both an expression and a
//! declaration, a local property both a statement and a declaration.

use bitflags::bitflags;

bitflags! {
    /// Abstract element kinds an element kind inherits from.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ElementCategory: u8 {
        const STATEMENT = 1 << 0;
        const EXPRESSION = 1 << 1;
        const DECLARATION = 1 << 2;
        const TYPE_REF = 1 << 3;
        const REFERENCE = 1 << 4;
        /// Carries a `resolve_phase`.
        const PHASED = 1 << 5;
    }
}

/// Every concrete element kind in the tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    File,
    Import,
    RegularClass,
    TypeParameter,
    SimpleFunction,
    Property,
    Constructor,
    ValueParameter,
    TypeRef,
    Reference,
    ConstExpression,
    QualifiedAccessExpression,
    FunctionCall,
    Block,
    WhenExpression,
    WhenBranch,
    WhenSubjectExpression,
    ElseIfTrueCondition,
    TryExpression,
    Catch,
    WhileLoop,
    DoWhileLoop,
    LoopJump,
    ReturnExpression,
    ThrowExpression,
    AnonymousFunction,
    ThisReceiverExpression,
    OperatorCall,
    TypeOperatorCall,
    BinaryLogicExpression,
    VariableAssignment,
    NoReceiver,
}

impl ElementKind {
    pub const ALL: [ElementKind; 32] = [
        ElementKind::File,
        ElementKind::Import,
        ElementKind::RegularClass,
        ElementKind::TypeParameter,
        ElementKind::SimpleFunction,
        ElementKind::Property,
        ElementKind::Constructor,
        ElementKind::ValueParameter,
        ElementKind::TypeRef,
        ElementKind::Reference,
        ElementKind::ConstExpression,
        ElementKind::QualifiedAccessExpression,
        ElementKind::FunctionCall,
        ElementKind::Block,
        ElementKind::WhenExpression,
        ElementKind::WhenBranch,
        ElementKind::WhenSubjectExpression,
        ElementKind::ElseIfTrueCondition,
        ElementKind::TryExpression,
        ElementKind::Catch,
        ElementKind::WhileLoop,
        ElementKind::DoWhileLoop,
        ElementKind::LoopJump,
        ElementKind::ReturnExpression,
        ElementKind::ThrowExpression,
        ElementKind::AnonymousFunction,
        ElementKind::ThisReceiverExpression,
        ElementKind::OperatorCall,
        ElementKind::TypeOperatorCall,
        ElementKind::BinaryLogicExpression,
        ElementKind::VariableAssignment,
        ElementKind::NoReceiver,
    ];

    /// Kind name in the tree schema (`whenExpression`, `regularClass`, ...).
    pub fn name(self) -> &'static str {
        match self {
            ElementKind::File => "file",
            ElementKind::Import => "import",
            ElementKind::RegularClass => "regularClass",
            ElementKind::TypeParameter => "typeParameter",
            ElementKind::SimpleFunction => "simpleFunction",
            ElementKind::Property => "property",
            ElementKind::Constructor => "constructor",
            ElementKind::ValueParameter => "valueParameter",
            ElementKind::TypeRef => "typeRef",
            ElementKind::Reference => "reference",
            ElementKind::ConstExpression => "constExpression",
            ElementKind::QualifiedAccessExpression => "qualifiedAccessExpression",
            ElementKind::FunctionCall => "functionCall",
            ElementKind::Block => "block",
            ElementKind::WhenExpression => "whenExpression",
            ElementKind::WhenBranch => "whenBranch",
            ElementKind::WhenSubjectExpression => "whenSubjectExpression",
            ElementKind::ElseIfTrueCondition => "elseIfTrueCondition",
            ElementKind::TryExpression => "tryExpression",
            ElementKind::Catch => "catch",
            ElementKind::WhileLoop => "whileLoop",
            ElementKind::DoWhileLoop => "doWhileLoop",
            ElementKind::LoopJump => "loopJump",
            ElementKind::ReturnExpression => "returnExpression",
            ElementKind::ThrowExpression => "throwExpression",
            ElementKind::AnonymousFunction => "anonymousFunction",
            ElementKind::ThisReceiverExpression => "thisReceiverExpression",
            ElementKind::OperatorCall => "operatorCall",
            ElementKind::TypeOperatorCall => "typeOperatorCall",
            ElementKind::BinaryLogicExpression => "binaryLogicExpression",
            ElementKind::VariableAssignment => "variableAssignment",
            ElementKind::NoReceiver => "noReceiverExpression",
        }
    }

    pub fn categories(self) -> ElementCategory {
        const EXPR: ElementCategory = ElementCategory::STATEMENT.union(ElementCategory::EXPRESSION);
        const DECL: ElementCategory = ElementCategory::DECLARATION.union(ElementCategory::PHASED);
        match self {
            ElementKind::File
            | ElementKind::RegularClass
            | ElementKind::SimpleFunction
            | ElementKind::Constructor => DECL,
            ElementKind::Property => DECL.union(ElementCategory::STATEMENT),
            ElementKind::TypeParameter | ElementKind::ValueParameter => {
                ElementCategory::DECLARATION
            }
            ElementKind::AnonymousFunction => EXPR.union(ElementCategory::DECLARATION),
            ElementKind::TypeRef => ElementCategory::TYPE_REF,
            ElementKind::Reference => ElementCategory::REFERENCE,
            ElementKind::WhileLoop | ElementKind::DoWhileLoop | ElementKind::VariableAssignment => {
                ElementCategory::STATEMENT
            }
            ElementKind::Import | ElementKind::WhenBranch | ElementKind::Catch => {
                ElementCategory::empty()
            }
            ElementKind::ConstExpression
            | ElementKind::QualifiedAccessExpression
            | ElementKind::FunctionCall
            | ElementKind::Block
            | ElementKind::WhenExpression
            | ElementKind::WhenSubjectExpression
            | ElementKind::ElseIfTrueCondition
            | ElementKind::TryExpression
            | ElementKind::LoopJump
            | ElementKind::ReturnExpression
            | ElementKind::ThrowExpression
            | ElementKind::ThisReceiverExpression
            | ElementKind::OperatorCall
            | ElementKind::TypeOperatorCall
            | ElementKind::BinaryLogicExpression
            | ElementKind::NoReceiver => EXPR,
        }
    }

    #[inline]
    pub fn is_expression(self) -> bool {
        self.categories().contains(ElementCategory::EXPRESSION)
    }

    #[inline]
    pub fn is_declaration(self) -> bool {
        self.categories().contains(ElementCategory::DECLARATION)
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
