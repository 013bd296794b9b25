//! Declaration builder: the mutable state of one declaration while it is being parsed.
//!
//! A [`DeclarationBuilder`] accumulates the declaration-specifier sequence and the comma-separated declarators of a
//! single declaration statement. Once the parser has seen the terminator (`;` or a function body) it calls one of
//! the `finish*` methods, which produce the finished nodes that are reported to the sink.
//!
//! ## Notes
//! - The builder is owned by the rule parsing the declaration and threaded by `&mut` into the specifier and
//!   declarator rules. It never outlives that declaration.
//! - Each declarator becomes its own [`SimpleDeclaration`] sharing a copy of the specifiers.

use crate::ast::{
    Access, DeclSpecifiers, Declarator, Name, SimpleDeclaration, SimpleType, SpecifierFlags, TypeSpecDeclaration,
    TypeSpecifier,
};
use crate::diagnostics::BuildError;

/// Accumulates one declaration.
#[derive(Debug, Clone, Default)]
pub struct DeclarationBuilder {
    pub specifiers: DeclSpecifiers,
    pub declarators: Vec<Declarator>,
    pub access: Option<Access>,
}

impl DeclarationBuilder {
    pub fn new(access: Option<Access>) -> Self {
        Self {
            access,
            ..Self::default()
        }
    }

    /// Record a keyword specifier. A second `long` becomes `long long`.
    pub fn add_flag(&mut self, flag: SpecifierFlags) {
        let flags = &mut self.specifiers.flags;
        if flag == SpecifierFlags::LONG && flags.contains(SpecifierFlags::LONG) {
            flags.insert(SpecifierFlags::LONG_LONG);
        } else {
            flags.insert(flag);
        }
    }

    pub fn set_simple_type(&mut self, simple_type: SimpleType) {
        self.specifiers.simple_type = simple_type;
    }

    /// Record the user-defined type name of the declaration.
    pub fn set_type_name(&mut self, name: Name) {
        self.specifiers.simple_type = SimpleType::ClassOrTypename;
        self.specifiers.type_name = Some(name);
    }

    pub fn set_type_specifier(&mut self, specifier: TypeSpecifier) {
        self.specifiers.simple_type = SimpleType::ClassOrTypename;
        self.specifiers.type_specifier = Some(specifier);
    }

    /// A builtin type keyword has been seen (`int`, `unsigned`, `long`, ...).
    pub fn has_raw_type(&self) -> bool {
        let keyword_type = !matches!(
            self.specifiers.simple_type,
            SimpleType::Unspecified | SimpleType::ClassOrTypename
        );
        keyword_type || self.specifiers.flags.intersects(SpecifierFlags::RAW_TYPE)
    }

    /// A user-defined type has been named (`Foo`, `typename T::x`, `class X { ... }`).
    pub fn has_type_name(&self) -> bool {
        self.specifiers.type_name.is_some() || self.specifiers.type_specifier.is_some()
    }

    pub fn add_declarator(&mut self, declarator: Declarator) {
        self.declarators.push(declarator);
    }

    /// One node per declarator.
    pub fn finish(self) -> Vec<SimpleDeclaration> {
        let DeclarationBuilder {
            specifiers,
            declarators,
            access,
        } = self;
        declarators
            .into_iter()
            .map(|declarator| SimpleDeclaration {
                specifiers: specifiers.clone(),
                declarator,
                access,
            })
            .collect()
    }

    /// The node of a declaration followed by a function body.
    ///
    /// ## Errors
    /// - [`BuildError::BodyWithMultipleDeclarators`] unless there is exactly one declarator.
    /// - [`BuildError::BodyWithoutFunctionDeclarator`] if that declarator has no parameter clause.
    pub fn finish_definition(self) -> Result<SimpleDeclaration, BuildError> {
        if self.declarators.len() != 1 {
            return Err(BuildError::BodyWithMultipleDeclarators(self.declarators.len()));
        }
        if !self.declarators.iter().all(is_function_declarator) {
            return Err(BuildError::BodyWithoutFunctionDeclarator);
        }
        self.finish().pop().ok_or(BuildError::BodyWithMultipleDeclarators(0))
    }

    /// A declaration without declarators, e.g. `struct S { ... };`.
    pub fn finish_type_spec(self) -> TypeSpecDeclaration {
        TypeSpecDeclaration {
            specifiers: self.specifiers,
            access: self.access,
        }
    }
}

fn is_function_declarator(declarator: &Declarator) -> bool {
    declarator.function.is_some() || declarator.nested.as_deref().is_some_and(is_function_declarator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FunctionDeclarator, Span};

    fn name(text: &str) -> Name {
        Name {
            text: text.to_string(),
            span: Span::new(0, text.len()),
            token_count: 1,
        }
    }

    fn function(text: &str) -> Declarator {
        Declarator {
            name: Some(name(text)),
            function: Some(FunctionDeclarator::default()),
            ..Declarator::default()
        }
    }

    #[test]
    fn test_long_long() {
        let mut builder = DeclarationBuilder::new(None);
        builder.add_flag(SpecifierFlags::LONG);
        builder.add_flag(SpecifierFlags::LONG);
        assert!(builder.specifiers.flags.contains(SpecifierFlags::LONG | SpecifierFlags::LONG_LONG));
        assert!(builder.has_raw_type());
        assert!(!builder.has_type_name());
    }

    #[test]
    fn test_finish_shares_specifiers() {
        let mut builder = DeclarationBuilder::new(Some(Access::Private));
        builder.set_simple_type(SimpleType::Int);
        builder.add_declarator(Declarator {
            name: Some(name("a")),
            ..Declarator::default()
        });
        builder.add_declarator(Declarator {
            name: Some(name("b")),
            ..Declarator::default()
        });
        let decls = builder.finish();
        assert_eq!(decls.len(), 2);
        assert!(decls.iter().all(|d| d.specifiers.simple_type == SimpleType::Int));
        assert!(decls.iter().all(|d| d.access == Some(Access::Private)));
    }

    #[test]
    fn test_definition_requires_single_function_declarator() {
        let mut builder = DeclarationBuilder::new(None);
        builder.add_declarator(function("f"));
        builder.add_declarator(function("g"));
        assert_eq!(
            builder.finish_definition(),
            Err(BuildError::BodyWithMultipleDeclarators(2))
        );

        let mut builder = DeclarationBuilder::new(None);
        builder.add_declarator(Declarator {
            name: Some(name("x")),
            ..Declarator::default()
        });
        assert_eq!(builder.finish_definition(), Err(BuildError::BodyWithoutFunctionDeclarator));

        let mut builder = DeclarationBuilder::new(None);
        builder.add_declarator(function("f"));
        assert!(builder.finish_definition().is_ok());
    }

    #[test]
    fn test_type_name_marks_class_or_typename() {
        let mut builder = DeclarationBuilder::new(None);
        builder.set_type_name(name("Foo"));
        assert_eq!(builder.specifiers.simple_type, SimpleType::ClassOrTypename);
        assert!(builder.has_type_name());
        assert!(!builder.has_raw_type());
    }
}
